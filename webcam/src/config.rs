//! Component configuration and defaults

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use webcam_core::{CaptureRequest, WebcamError, WebcamResult};
use webcam_media::{CaptureSettings, ScreenshotFormat};

/// Callback invoked once when an instance receives the shared stream
#[derive(Clone)]
pub struct UserMediaCallback(Arc<dyn Fn() + Send + Sync>);

impl UserMediaCallback {
    /// Wrap a closure
    pub fn new(callback: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    pub(crate) fn call(&self) {
        (self.0)()
    }
}

impl Default for UserMediaCallback {
    fn default() -> Self {
        Self::new(|| {})
    }
}

impl fmt::Debug for UserMediaCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserMediaCallback")
    }
}

/// Per-instance webcam configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WebcamConfig {
    /// Request a microphone track alongside the camera
    pub audio: bool,
    /// Preferred microphone device ID
    pub audio_source: Option<String>,
    /// Preferred camera device ID
    pub video_source: Option<String>,
    /// Screenshot encoding
    pub screenshot_format: ScreenshotFormat,
    /// Width divided by height of the preview and captures
    pub aspect_ratio: f64,
    /// Flip the preview and captures left to right
    pub mirrored: bool,
    /// Mute the preview element
    pub muted: bool,
    /// Class applied to the video element
    pub class_name: String,
    /// Called once when the stream is bound
    #[serde(skip)]
    pub on_user_media: UserMediaCallback,
}

impl Default for WebcamConfig {
    fn default() -> Self {
        Self {
            audio: true,
            audio_source: None,
            video_source: None,
            screenshot_format: ScreenshotFormat::Webp,
            aspect_ratio: 16.0 / 9.0,
            mirrored: false,
            muted: false,
            class_name: String::new(),
            on_user_media: UserMediaCallback::default(),
        }
    }
}

impl WebcamConfig {
    /// Parse and validate a JSON configuration
    pub fn from_json(json: &str) -> WebcamResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| WebcamError::InvalidConfiguration {
                message: format!("Malformed webcam configuration: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> WebcamResult<()> {
        self.capture_settings().validate()?;
        Ok(())
    }

    /// Acquisition parameters derived from this configuration
    pub fn capture_request(&self) -> CaptureRequest {
        CaptureRequest {
            wants_audio: self.audio,
            preferred_audio_device_id: self.audio_source.clone(),
            preferred_video_device_id: self.video_source.clone(),
        }
    }

    /// Frame capture parameters derived from this configuration
    pub fn capture_settings(&self) -> CaptureSettings {
        CaptureSettings {
            aspect_ratio: self.aspect_ratio,
            mirrored: self.mirrored,
            format: self.screenshot_format,
            backing_store_pixel_ratio: None,
        }
    }

    /// Enable or disable the microphone
    pub fn audio(mut self, enabled: bool) -> Self {
        self.audio = enabled;
        self
    }

    /// Prefer a microphone
    pub fn audio_source(mut self, device_id: &str) -> Self {
        self.audio_source = Some(device_id.to_string());
        self
    }

    /// Prefer a camera
    pub fn video_source(mut self, device_id: &str) -> Self {
        self.video_source = Some(device_id.to_string());
        self
    }

    /// Set screenshot encoding
    pub fn screenshot_format(mut self, format: ScreenshotFormat) -> Self {
        self.screenshot_format = format;
        self
    }

    /// Set aspect ratio
    pub fn aspect_ratio(mut self, aspect_ratio: f64) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Mirror the preview and captures
    pub fn mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    /// Mute the preview
    pub fn muted(mut self, muted: bool) -> Self {
        self.muted = muted;
        self
    }

    /// Set the video element class
    pub fn class_name(mut self, class_name: &str) -> Self {
        self.class_name = class_name.to_string();
        self
    }

    /// Set the stream-bound callback
    pub fn on_user_media(mut self, callback: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_user_media = UserMediaCallback::new(callback);
        self
    }
}
