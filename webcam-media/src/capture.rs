//! Still-frame capture
//!
//! The capture surface is created on first use and kept for the lifetime of
//! the capturer: its size, crop rectangle and mirror transform are fixed at
//! that point. Later layout changes are not picked up.

use crate::canvas::Canvas;
use crate::encode::{to_data_url, ScreenshotFormat};
use crate::error::{MediaError, MediaResult};
use crate::geometry::{pixel_ratio, surface_size, DrawRect};
use crate::video::VideoElement;
use tracing::debug;

/// How captured frames are shaped and encoded
#[derive(Debug, Clone, PartialEq)]
pub struct CaptureSettings {
    /// Width divided by height of the captured image
    pub aspect_ratio: f64,
    /// Flip captures left to right
    pub mirrored: bool,
    /// Encoding used by [`FrameCapture::screenshot`]
    pub format: ScreenshotFormat,
    /// Internal pixel ratio of the drawing backend, if it reports one
    pub backing_store_pixel_ratio: Option<f64>,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            aspect_ratio: 16.0 / 9.0,
            mirrored: false,
            format: ScreenshotFormat::Webp,
            backing_store_pixel_ratio: None,
        }
    }
}

impl CaptureSettings {
    /// Validate settings
    pub fn validate(&self) -> MediaResult<()> {
        if !self.aspect_ratio.is_finite() || self.aspect_ratio <= 0.0 {
            return Err(MediaError::InvalidConfiguration {
                message: format!(
                    "Aspect ratio must be a positive number, got {}",
                    self.aspect_ratio
                ),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Clone)]
struct CaptureSurface {
    canvas: Canvas,
    rect: DrawRect,
}

/// Lazily built capture surface for one component instance
#[derive(Debug, Clone)]
pub struct FrameCapture {
    settings: CaptureSettings,
    surface: Option<CaptureSurface>,
}

impl FrameCapture {
    /// Create a capturer; no surface exists until the first draw
    pub fn new(settings: CaptureSettings) -> MediaResult<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            surface: None,
        })
    }

    /// Capture settings
    pub fn settings(&self) -> &CaptureSettings {
        &self.settings
    }

    /// The cached surface, if one has been created
    pub fn canvas(&self) -> Option<&Canvas> {
        self.surface.as_ref().map(|surface| &surface.canvas)
    }

    /// The cached crop rectangle, if the surface has been created
    pub fn draw_rect(&self) -> Option<DrawRect> {
        self.surface.as_ref().map(|surface| surface.rect)
    }

    /// Draw the element's current frame onto the surface, creating the
    /// surface first if needed
    pub fn draw(&mut self, video: &dyn VideoElement) -> MediaResult<&Canvas> {
        let frame = video.current_frame()?;

        let surface = match self.surface.take() {
            Some(surface) => surface,
            None => self.create_surface(video)?,
        };
        let surface = self.surface.insert(surface);

        surface.canvas.draw_frame(&frame, surface.rect)?;
        Ok(&surface.canvas)
    }

    /// Draw the current frame and encode it as a `data:` URI
    pub fn screenshot(&mut self, video: &dyn VideoElement) -> MediaResult<String> {
        let format = self.settings.format;
        let canvas = self.draw(video)?;
        to_data_url(canvas, format)
    }

    fn create_surface(&self, video: &dyn VideoElement) -> MediaResult<CaptureSurface> {
        let video_size = video.video_size();
        if video_size.is_empty() {
            return Err(MediaError::InvalidState {
                message: "Video has no intrinsic size yet".to_string(),
            });
        }

        let ratio = pixel_ratio(
            video.device_pixel_ratio(),
            self.settings.backing_store_pixel_ratio,
        );
        let (width, height) = surface_size(video.client_width(), self.settings.aspect_ratio, ratio);

        let mut canvas = Canvas::new(width, height)
            .with_backing_store_pixel_ratio(self.settings.backing_store_pixel_ratio);
        let rect = DrawRect::compute(width, height, video_size, self.settings.aspect_ratio);

        if self.settings.mirrored {
            canvas.mirror_horizontally();
        }

        debug!(
            "Created {}x{} capture surface (ratio {}, rect {:?}, mirrored {})",
            width, height, ratio, rect, self.settings.mirrored
        );

        Ok(CaptureSurface { canvas, rect })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::VideoFrame;
    use crate::video::LiveVideoElement;

    #[test]
    fn test_invalid_aspect_ratio_rejected() {
        for aspect_ratio in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let settings = CaptureSettings {
                aspect_ratio,
                ..CaptureSettings::default()
            };
            assert!(FrameCapture::new(settings).is_err());
        }
    }

    #[test]
    fn test_surface_created_once() {
        let element = LiveVideoElement::new(320.0).with_device_pixel_ratio(2.0);
        element.push_frame(VideoFrame::solid(640, 480, [10, 20, 30, 255]));

        let mut capture = FrameCapture::new(CaptureSettings::default()).unwrap();
        assert!(capture.canvas().is_none());

        let (width, height) = {
            let canvas = capture.draw(&element).unwrap();
            (canvas.width(), canvas.height())
        };
        assert_eq!((width, height), (640, 360));
        let rect = capture.draw_rect().unwrap();

        element.set_client_width(1000.0);
        element.push_frame(VideoFrame::solid(1920, 1080, [0, 0, 0, 255]));
        capture.draw(&element).unwrap();

        assert_eq!(capture.canvas().unwrap().width(), 640);
        assert_eq!(capture.draw_rect(), Some(rect));
    }

    #[test]
    fn test_zero_sized_video_not_cached() {
        let element = LiveVideoElement::new(320.0);
        element.push_frame(VideoFrame::new(0, 0, Vec::new(), 0));

        let mut capture = FrameCapture::new(CaptureSettings::default()).unwrap();
        assert!(capture.draw(&element).is_err());
        assert!(capture.canvas().is_none());

        element.push_frame(VideoFrame::solid(16, 9, [1, 1, 1, 255]));
        assert!(capture.draw(&element).is_ok());
    }

    #[test]
    fn test_backing_store_ratio_scales_surface() {
        let element = LiveVideoElement::new(400.0).with_device_pixel_ratio(2.0);
        element.push_frame(VideoFrame::solid(400, 400, [0, 0, 0, 255]));

        let settings = CaptureSettings {
            aspect_ratio: 1.0,
            backing_store_pixel_ratio: Some(2.0),
            ..CaptureSettings::default()
        };
        let mut capture = FrameCapture::new(settings).unwrap();
        let canvas = capture.draw(&element).unwrap();

        assert_eq!((canvas.width(), canvas.height()), (400, 400));
        assert_eq!(canvas.backing_store_pixel_ratio(), Some(2.0));
    }

    #[test]
    fn test_screenshot_uses_configured_format() {
        let element = LiveVideoElement::new(64.0);
        element.push_frame(VideoFrame::solid(64, 36, [255, 0, 0, 255]));

        let settings = CaptureSettings {
            format: ScreenshotFormat::Png,
            ..CaptureSettings::default()
        };
        let mut capture = FrameCapture::new(settings).unwrap();
        let url = capture.screenshot(&element).unwrap();

        assert!(url.starts_with("data:image/png;base64,"));
    }
}
