//! Scriptable in-memory platform
//!
//! Used by tests and demos to drive the component without a real camera.
//! Requests can be held open to simulate a pending permission prompt.

use super::MediaPlatform;
use crate::constraints::MediaStreamConstraints;
use crate::device::{DeviceKind, MediaDeviceInfo};
use crate::error::PlatformError;
use crate::stream::{DisplayHandle, MediaStream, MediaTrack};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

/// Track handed out by [`MockMediaPlatform`]
#[derive(Debug)]
pub struct MockTrack {
    id: String,
    kind: DeviceKind,
    stopped: AtomicBool,
}

impl MockTrack {
    /// Create new track
    pub fn new(kind: DeviceKind) -> Arc<Self> {
        Self::with_id(Uuid::new_v4().to_string(), kind)
    }

    /// Create new track with a fixed ID
    pub fn with_id(id: impl Into<String>, kind: DeviceKind) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            kind,
            stopped: AtomicBool::new(false),
        })
    }
}

impl MediaTrack for MockTrack {
    fn id(&self) -> &str {
        &self.id
    }

    fn kind(&self) -> DeviceKind {
        self.kind
    }

    fn stop(&self) {
        self.stopped.store(true, Ordering::SeqCst);
    }

    fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }
}

/// How the mock answers stream requests
#[derive(Debug, Clone)]
pub enum MockResponse {
    /// Grant a stream with a video track, plus an audio track when requested
    Grant,
    /// Refuse with the given error
    Deny(PlatformError),
}

/// In-memory [`MediaPlatform`]
#[derive(Debug)]
pub struct MockMediaPlatform {
    capture_api: bool,
    devices: Mutex<Result<Vec<MediaDeviceInfo>, PlatformError>>,
    response: Mutex<MockResponse>,
    gate: watch::Sender<bool>,
    requests: Mutex<Vec<MediaStreamConstraints>>,
    enumerations: AtomicUsize,
    tracks: Mutex<Vec<Arc<MockTrack>>>,
    created_handles: Mutex<Vec<DisplayHandle>>,
    revoked_handles: Mutex<Vec<DisplayHandle>>,
}

impl Default for MockMediaPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMediaPlatform {
    /// Platform with one microphone and one camera that grants every request
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            capture_api: true,
            devices: Mutex::new(Ok(vec![
                MediaDeviceInfo::audio("mock-mic").with_label("Mock Microphone"),
                MediaDeviceInfo::video("mock-cam").with_label("Mock Camera"),
            ])),
            response: Mutex::new(MockResponse::Grant),
            gate,
            requests: Mutex::new(Vec::new()),
            enumerations: AtomicUsize::new(0),
            tracks: Mutex::new(Vec::new()),
            created_handles: Mutex::new(Vec::new()),
            revoked_handles: Mutex::new(Vec::new()),
        }
    }

    /// Report no capture API
    pub fn without_capture_api(mut self) -> Self {
        self.capture_api = false;
        self
    }

    /// Replace the enumerated devices
    pub fn with_devices(self, devices: Vec<MediaDeviceInfo>) -> Self {
        *self.devices.lock() = Ok(devices);
        self
    }

    /// Make enumeration fail
    pub fn with_enumeration_error(self, error: PlatformError) -> Self {
        *self.devices.lock() = Err(error);
        self
    }

    /// Refuse every stream request
    pub fn denying(self, error: PlatformError) -> Self {
        *self.response.lock() = MockResponse::Deny(error);
        self
    }

    /// Hold stream requests until [`MockMediaPlatform::release_requests`]
    pub fn held(self) -> Self {
        self.gate.send_replace(false);
        self
    }

    /// Let held requests resolve
    pub fn release_requests(&self) {
        debug!("Releasing held mock requests");
        self.gate.send_replace(true);
    }

    /// Change how later requests are answered
    pub fn set_response(&self, response: MockResponse) {
        *self.response.lock() = response;
    }

    /// Number of stream requests issued
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Constraints of every stream request issued
    pub fn requests(&self) -> Vec<MediaStreamConstraints> {
        self.requests.lock().clone()
    }

    /// Number of enumerations issued
    pub fn enumeration_count(&self) -> usize {
        self.enumerations.load(Ordering::SeqCst)
    }

    /// Every track handed out so far
    pub fn tracks(&self) -> Vec<Arc<MockTrack>> {
        self.tracks.lock().clone()
    }

    /// Display handles created so far
    pub fn created_handles(&self) -> Vec<DisplayHandle> {
        self.created_handles.lock().clone()
    }

    /// Display handles revoked so far
    pub fn revoked_handles(&self) -> Vec<DisplayHandle> {
        self.revoked_handles.lock().clone()
    }

    fn grant(&self, constraints: &MediaStreamConstraints) -> MediaStream {
        let video = MockTrack::with_id(
            constraints
                .video
                .device_id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string()),
            DeviceKind::Video,
        );
        let mut tracks = self.tracks.lock();
        tracks.push(Arc::clone(&video));
        let video: Arc<dyn MediaTrack> = video;

        let mut stream =
            MediaStream::new(Uuid::new_v4().to_string()).with_video_tracks(vec![video]);

        if let Some(audio) = &constraints.audio {
            let track = MockTrack::with_id(
                audio
                    .device_id
                    .clone()
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                DeviceKind::Audio,
            );
            tracks.push(Arc::clone(&track));
            let track: Arc<dyn MediaTrack> = track;
            stream = stream.with_audio_tracks(vec![track]);
        }

        stream
    }
}

#[async_trait]
impl MediaPlatform for MockMediaPlatform {
    fn has_capture_api(&self) -> bool {
        self.capture_api
    }

    async fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>, PlatformError> {
        self.enumerations.fetch_add(1, Ordering::SeqCst);
        self.devices.lock().clone()
    }

    async fn get_user_media(
        &self,
        constraints: MediaStreamConstraints,
    ) -> Result<MediaStream, PlatformError> {
        self.requests.lock().push(constraints.clone());

        let mut gate = self.gate.subscribe();
        loop {
            let open = *gate.borrow_and_update();
            if open {
                break;
            }
            if gate.changed().await.is_err() {
                break;
            }
        }

        let response = self.response.lock().clone();
        match response {
            MockResponse::Grant => Ok(self.grant(&constraints)),
            MockResponse::Deny(error) => Err(error),
        }
    }

    fn create_display_handle(&self, stream: &MediaStream) -> DisplayHandle {
        let handle = DisplayHandle::new(format!("blob:mock/{}", Uuid::new_v4()));
        debug!("Created display handle {} for stream {}", handle, stream.id());
        self.created_handles.lock().push(handle.clone());
        handle
    }

    fn revoke_display_handle(&self, handle: &DisplayHandle) {
        self.revoked_handles.lock().push(handle.clone());
    }
}
