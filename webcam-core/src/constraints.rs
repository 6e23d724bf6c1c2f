//! Capture requests and the constraints sent to the platform

use crate::device::SelectedSources;

/// What a component instance asks the platform for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRequest {
    /// Whether a microphone track is wanted alongside the camera
    pub wants_audio: bool,
    /// Explicit audio input to use
    pub preferred_audio_device_id: Option<String>,
    /// Explicit video input to use
    pub preferred_video_device_id: Option<String>,
}

impl Default for CaptureRequest {
    fn default() -> Self {
        Self {
            wants_audio: true,
            preferred_audio_device_id: None,
            preferred_video_device_id: None,
        }
    }
}

impl CaptureRequest {
    /// Request camera only
    pub fn video_only() -> Self {
        Self {
            wants_audio: false,
            ..Self::default()
        }
    }

    /// Explicit sources, when the request names every device it needs.
    ///
    /// A video id is always required; an audio id only when audio is wanted.
    /// Anything less falls back to enumeration.
    pub fn explicit_sources(&self) -> Option<SelectedSources> {
        let video = self.preferred_video_device_id.clone()?;
        if self.wants_audio && self.preferred_audio_device_id.is_none() {
            return None;
        }

        Some(SelectedSources {
            audio: self.preferred_audio_device_id.clone(),
            video: Some(video),
        })
    }

    /// Build platform constraints for the chosen sources
    pub fn constraints(&self, sources: SelectedSources) -> MediaStreamConstraints {
        MediaStreamConstraints {
            video: TrackConstraints {
                device_id: sources.video,
            },
            audio: self.wants_audio.then(|| TrackConstraints {
                device_id: sources.audio,
            }),
        }
    }
}

/// Constraints for a single track kind
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackConstraints {
    /// Preferred device, if any was found or configured
    pub device_id: Option<String>,
}

/// Constraints passed to [`MediaPlatform::get_user_media`](crate::MediaPlatform::get_user_media)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaStreamConstraints {
    /// Video is always requested
    pub video: TrackConstraints,
    /// Audio is requested only when present
    pub audio: Option<TrackConstraints>,
}

impl MediaStreamConstraints {
    /// Whether an audio track was requested
    pub fn requests_audio(&self) -> bool {
        self.audio.is_some()
    }
}
