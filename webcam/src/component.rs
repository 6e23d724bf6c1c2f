//! Webcam component instances
//!
//! Each [`Webcam`] is one mounted preview. Instances created on the same
//! [`MediaContext`] share a single camera stream: the first mount triggers
//! acquisition, every mounted instance receives the result, and the last
//! unmount releases the device.

use crate::config::WebcamConfig;
use crate::view::WebcamView;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;
use webcam_core::{
    DisplayHandle, InstanceId, MediaContext, MediaStream, MediaSubscriber, PlatformError,
    Registration, WebcamError, WebcamResult,
};
use webcam_media::{Canvas, FrameCapture, VideoElement};

/// Observable per-instance state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentState {
    /// The shared stream is bound to this instance
    pub has_stream: bool,
    /// Displayable URI of the bound stream
    pub display_handle: Option<DisplayHandle>,
    /// Error delivered by the last failed acquisition
    pub error: Option<PlatformError>,
    /// The instance is mounted
    pub mounted: bool,
}

#[derive(Debug, Default)]
struct InstanceState {
    view: ComponentState,
    stream: Option<Arc<MediaStream>>,
}

#[derive(Debug)]
struct WebcamInner {
    id: InstanceId,
    config: WebcamConfig,
    context: MediaContext,
    state: Mutex<InstanceState>,
    capture: Mutex<FrameCapture>,
    video: Mutex<Option<Arc<dyn VideoElement>>>,
}

impl MediaSubscriber for WebcamInner {
    fn on_media_granted(&self, stream: Arc<MediaStream>) {
        {
            let mut state = self.state.lock();
            if !state.view.mounted {
                debug!("Instance {} unmounted before the stream arrived", self.id);
                return;
            }
            if state.view.has_stream {
                return;
            }

            let handle = self.context.platform().create_display_handle(&stream);
            debug!("Instance {} bound to stream {} via {}", self.id, stream.id(), handle);

            state.view.has_stream = true;
            state.view.display_handle = Some(handle);
            state.view.error = None;
            state.stream = Some(stream);
        }

        self.config.on_user_media.call();
    }

    fn on_media_denied(&self, error: PlatformError) {
        let mut state = self.state.lock();
        if !state.view.mounted {
            return;
        }

        debug!("Instance {} recorded acquisition error: {}", self.id, error);
        state.view.has_stream = false;
        state.view.error = Some(error);
    }
}

/// One webcam preview instance.
///
/// Dropping a mounted instance unmounts it.
///
/// # Example
/// ```rust,no_run
/// use std::sync::Arc;
/// use webcam::{MediaContext, MockMediaPlatform, Webcam, WebcamConfig};
///
/// # async fn example() -> Result<(), webcam::WebcamError> {
/// let context = MediaContext::new(Arc::new(MockMediaPlatform::new()))?;
/// let webcam = Webcam::new(&context, WebcamConfig::default().mirrored(true))?;
///
/// if let Some(acquisition) = webcam.mount() {
///     let _ = acquisition.await;
/// }
/// assert!(webcam.has_stream());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Webcam {
    inner: Arc<WebcamInner>,
}

impl Webcam {
    /// Create an unmounted instance on `context`
    ///
    /// # Errors
    ///
    /// Returns [`WebcamError::InvalidConfiguration`] for an unusable aspect
    /// ratio.
    pub fn new(context: &MediaContext, config: WebcamConfig) -> WebcamResult<Self> {
        config.validate()?;
        let capture = FrameCapture::new(config.capture_settings())?;

        Ok(Self {
            inner: Arc::new(WebcamInner {
                id: Uuid::new_v4(),
                config,
                context: context.clone(),
                state: Mutex::new(InstanceState::default()),
                capture: Mutex::new(capture),
                video: Mutex::new(None),
            }),
        })
    }

    /// Instance ID
    pub fn id(&self) -> InstanceId {
        self.inner.id
    }

    /// Instance configuration
    pub fn config(&self) -> &WebcamConfig {
        &self.inner.config
    }

    /// Join the shared registry.
    ///
    /// Returns the acquisition task when this mount started it. Dropping the
    /// handle does not cancel the request. Mounting twice is a no-op, and on
    /// a platform without a capture API the instance stays inert.
    pub fn mount(&self) -> Option<JoinHandle<()>> {
        {
            let mut state = self.inner.state.lock();
            if state.view.mounted {
                return None;
            }
            state.view.mounted = true;
        }

        let subscriber: Arc<dyn MediaSubscriber> = self.inner.clone();
        let request = self.inner.config.capture_request();

        match self.inner.context.register(self.inner.id, subscriber, &request) {
            Registration::Inert => {
                info!("No capture API available, webcam {} is inert", self.inner.id);
                None
            }
            Registration::AlreadyMounted => None,
            Registration::Acquiring(handle) => Some(handle),
            Registration::Pending => {
                debug!("Webcam {} waiting on the in-flight request", self.inner.id);
                None
            }
            Registration::Resolved(Ok(stream)) => {
                self.inner.on_media_granted(stream);
                None
            }
            Registration::Resolved(Err(error)) => {
                self.inner.on_media_denied(error);
                None
            }
        }
    }

    /// Leave the shared registry.
    ///
    /// The last instance out stops every track and revokes its display
    /// handle. Returns whether the shared stream was released.
    pub fn unmount(&self) -> bool {
        let handle = {
            let mut state = self.inner.state.lock();
            if !state.view.mounted {
                return false;
            }
            state.view.mounted = false;
            state.view.display_handle.clone()
        };

        let released = self
            .inner
            .context
            .unregister(self.inner.id, handle.as_ref());

        let mut state = self.inner.state.lock();
        state.view.has_stream = false;
        state.view.display_handle = None;
        state.stream = None;

        debug!("Webcam {} unmounted (released: {})", self.inner.id, released);
        released
    }

    /// Whether the instance is mounted
    pub fn is_mounted(&self) -> bool {
        self.inner.state.lock().view.mounted
    }

    /// Whether the shared stream is bound
    pub fn has_stream(&self) -> bool {
        self.inner.state.lock().view.has_stream
    }

    /// Displayable URI of the bound stream
    pub fn display_handle(&self) -> Option<DisplayHandle> {
        self.inner.state.lock().view.display_handle.clone()
    }

    /// The bound stream
    pub fn stream(&self) -> Option<Arc<MediaStream>> {
        self.inner.state.lock().stream.clone()
    }

    /// Error delivered by a failed acquisition
    pub fn error(&self) -> Option<PlatformError> {
        self.inner.state.lock().view.error.clone()
    }

    /// Snapshot of the instance state
    pub fn state(&self) -> ComponentState {
        self.inner.state.lock().view.clone()
    }

    /// Preview description for the host to render
    pub fn view(&self) -> WebcamView {
        let handle = self.display_handle();
        WebcamView::new(&self.inner.config, handle.as_ref())
    }

    /// Attach the element rendering this instance's preview
    pub fn attach_video_element(&self, element: Arc<dyn VideoElement>) {
        *self.inner.video.lock() = Some(element);
    }

    /// Capture the current frame as a `data:` URI.
    ///
    /// Returns `Ok(None)` until the stream is bound.
    pub fn get_screenshot(&self) -> WebcamResult<Option<String>> {
        let Some(element) = self.capture_source()? else {
            return Ok(None);
        };

        let url = self.inner.capture.lock().screenshot(element.as_ref())?;
        Ok(Some(url))
    }

    /// Draw the current frame and return the capture surface.
    ///
    /// Returns `Ok(None)` until the stream is bound.
    pub fn get_canvas(&self) -> WebcamResult<Option<Canvas>> {
        let Some(element) = self.capture_source()? else {
            return Ok(None);
        };

        let mut capture = self.inner.capture.lock();
        let canvas = capture.draw(element.as_ref())?;
        Ok(Some(canvas.clone()))
    }

    /// Alias of [`Webcam::get_screenshot`]
    pub fn capture_frame(&self) -> WebcamResult<Option<String>> {
        self.get_screenshot()
    }

    /// Alias of [`Webcam::get_canvas`]
    pub fn get_drawing_surface(&self) -> WebcamResult<Option<Canvas>> {
        self.get_canvas()
    }

    fn capture_source(&self) -> WebcamResult<Option<Arc<dyn VideoElement>>> {
        if !self.has_stream() {
            return Ok(None);
        }

        match self.inner.video.lock().clone() {
            Some(element) => Ok(Some(element)),
            None => {
                warn!("Capture requested on webcam {} with no video element", self.inner.id);
                Err(WebcamError::VideoElementMissing {
                    instance_id: self.inner.id.to_string(),
                })
            }
        }
    }
}

impl Drop for Webcam {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use webcam_core::{MediaTrack, MockMediaPlatform};
    use webcam_media::{LiveVideoElement, VideoFrame};

    fn context() -> (Arc<MockMediaPlatform>, MediaContext) {
        let platform = Arc::new(MockMediaPlatform::new());
        let context = MediaContext::new(platform.clone()).unwrap();
        (platform, context)
    }

    #[tokio::test]
    async fn test_mount_binds_stream_and_fires_callback() {
        let (_platform, context) = context();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let config = WebcamConfig::default().on_user_media(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let webcam = Webcam::new(&context, config).unwrap();
        webcam.mount().unwrap().await.unwrap();

        assert!(webcam.has_stream());
        assert!(webcam.display_handle().is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Remount is a no-op
        assert!(webcam.mount().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_screenshot_requires_stream_and_element() {
        let (_platform, context) = context();
        let webcam = Webcam::new(&context, WebcamConfig::default()).unwrap();

        assert_eq!(webcam.get_screenshot().unwrap(), None);
        assert!(webcam.get_canvas().unwrap().is_none());

        webcam.mount().unwrap().await.unwrap();
        assert!(matches!(
            webcam.get_screenshot(),
            Err(WebcamError::VideoElementMissing { .. })
        ));

        let element = Arc::new(LiveVideoElement::new(64.0));
        element.push_frame(VideoFrame::solid(64, 36, [0, 255, 0, 255]));
        webcam.attach_video_element(element);

        let url = webcam.get_screenshot().unwrap().unwrap();
        assert!(url.starts_with("data:image/webp;base64,"));

        let canvas = webcam.get_canvas().unwrap().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (64, 36));
        assert_eq!(canvas.pixel(32, 18), Some([0, 255, 0, 255]));
    }

    #[tokio::test]
    async fn test_invalid_config_rejected() {
        let (_platform, context) = context();
        let result = Webcam::new(&context, WebcamConfig::default().aspect_ratio(-1.0));
        assert!(matches!(result, Err(WebcamError::InvalidConfiguration { .. })));
    }

    #[tokio::test]
    async fn test_drop_unmounts() {
        let (platform, context) = context();
        let webcam = Webcam::new(&context, WebcamConfig::default()).unwrap();
        webcam.mount().unwrap().await.unwrap();
        assert_eq!(context.mounted_count(), 1);

        drop(webcam);
        assert_eq!(context.mounted_count(), 0);
        assert!(platform.tracks().iter().all(|track| track.is_stopped()));
    }
}
