//! Rendered video element seam

use crate::error::{MediaError, MediaResult};
use crate::frame::{VideoFrame, VideoResolution};
use parking_lot::RwLock;
use std::fmt;

/// The on-screen element playing the shared stream.
///
/// Frame capture reads its intrinsic size, its laid-out width and the
/// display density, and grabs the frame currently shown.
pub trait VideoElement: Send + Sync + fmt::Debug {
    /// Intrinsic size of the playing video
    fn video_size(&self) -> VideoResolution;

    /// Laid-out width in CSS pixels
    fn client_width(&self) -> f64;

    /// Device pixels per CSS pixel, when the display reports it
    fn device_pixel_ratio(&self) -> Option<f64>;

    /// Frame currently displayed
    fn current_frame(&self) -> MediaResult<VideoFrame>;
}

/// Video element fed by the host with decoded frames
#[derive(Debug)]
pub struct LiveVideoElement {
    client_width: RwLock<f64>,
    device_pixel_ratio: Option<f64>,
    latest: RwLock<Option<VideoFrame>>,
}

impl LiveVideoElement {
    /// Create an element laid out `client_width` CSS pixels wide
    pub fn new(client_width: f64) -> Self {
        Self {
            client_width: RwLock::new(client_width),
            device_pixel_ratio: None,
            latest: RwLock::new(None),
        }
    }

    /// Report a display density
    pub fn with_device_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = Some(ratio);
        self
    }

    /// Replace the displayed frame
    pub fn push_frame(&self, frame: VideoFrame) {
        *self.latest.write() = Some(frame);
    }

    /// Update the laid-out width
    pub fn set_client_width(&self, width: f64) {
        *self.client_width.write() = width;
    }
}

impl VideoElement for LiveVideoElement {
    fn video_size(&self) -> VideoResolution {
        self.latest
            .read()
            .as_ref()
            .map(VideoFrame::resolution)
            .unwrap_or(VideoResolution::new(0, 0))
    }

    fn client_width(&self) -> f64 {
        *self.client_width.read()
    }

    fn device_pixel_ratio(&self) -> Option<f64> {
        self.device_pixel_ratio
    }

    fn current_frame(&self) -> MediaResult<VideoFrame> {
        self.latest
            .read()
            .clone()
            .ok_or_else(|| MediaError::InvalidState {
                message: "No frame has been displayed yet".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_element() {
        let element = LiveVideoElement::new(320.0);
        assert!(element.video_size().is_empty());
        assert!(element.current_frame().is_err());
        assert_eq!(element.device_pixel_ratio(), None);
    }

    #[test]
    fn test_push_frame() {
        let element = LiveVideoElement::new(320.0).with_device_pixel_ratio(2.0);
        element.push_frame(VideoFrame::solid(64, 48, [0, 0, 0, 255]));

        assert_eq!(element.video_size(), VideoResolution::new(64, 48));
        assert_eq!(element.current_frame().unwrap().width, 64);
        assert_eq!(element.device_pixel_ratio(), Some(2.0));
    }
}
