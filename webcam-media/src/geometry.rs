//! Surface sizing and crop rectangle calculation

use crate::frame::VideoResolution;

/// Where the video frame is drawn on the capture surface.
///
/// May extend past the surface (crop) or leave uncovered bands (pad).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Drawn width
    pub width: f64,
    /// Drawn height
    pub height: f64,
}

impl DrawRect {
    /// Fit a video of `video` intrinsic size onto a `surface_width` x
    /// `surface_height` surface configured for `aspect_ratio`.
    ///
    /// Landscape or square surfaces take the full height and center
    /// horizontally; portrait surfaces take the full width and center
    /// vertically.
    pub fn compute(
        surface_width: u32,
        surface_height: u32,
        video: VideoResolution,
        aspect_ratio: f64,
    ) -> Self {
        let video_aspect = video.aspect_ratio();
        let surface_width = surface_width as f64;
        let surface_height = surface_height as f64;

        if aspect_ratio >= 1.0 {
            let width = surface_height * video_aspect;
            Self {
                x: (surface_width - width) / 2.0,
                y: 0.0,
                width,
                height: surface_height,
            }
        } else {
            let height = surface_width / video_aspect;
            Self {
                x: 0.0,
                y: (surface_height - height) / 2.0,
                width: surface_width,
                height,
            }
        }
    }
}

/// Device pixels per surface pixel.
///
/// Either factor falls back to 1 when unreported or unusable.
pub fn pixel_ratio(device_pixel_ratio: Option<f64>, backing_store_pixel_ratio: Option<f64>) -> f64 {
    let usable = |ratio: Option<f64>| ratio.filter(|r| r.is_finite() && *r > 0.0).unwrap_or(1.0);
    usable(device_pixel_ratio) / usable(backing_store_pixel_ratio)
}

/// Pixel size of the capture surface for an element `client_width` wide.
///
/// Fractional sizes are truncated, as canvas dimensions are.
pub fn surface_size(client_width: f64, aspect_ratio: f64, ratio: f64) -> (u32, u32) {
    let width = client_width * ratio;
    let height = client_width / aspect_ratio * ratio;
    (truncate(width), truncate(height))
}

fn truncate(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.min(u32::MAX as f64) as u32
    } else {
        0
    }
}
