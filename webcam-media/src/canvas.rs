//! Software drawing surface
//!
//! A minimal offscreen canvas: an RGBA pixel buffer with an affine transform
//! applied to every draw, and source-over compositing of scaled frames.

use crate::error::MediaResult;
use crate::frame::VideoFrame;
use crate::geometry::DrawRect;
use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};
use tracing::debug;

/// 2D affine transform in canvas order (`a b c d e f`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform2D {
    /// Horizontal scale
    pub a: f64,
    /// Vertical skew
    pub b: f64,
    /// Horizontal skew
    pub c: f64,
    /// Vertical scale
    pub d: f64,
    /// Horizontal translation
    pub e: f64,
    /// Vertical translation
    pub f: f64,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    /// No transformation
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Append a translation
    pub fn translate(self, tx: f64, ty: f64) -> Self {
        Self {
            e: self.a * tx + self.c * ty + self.e,
            f: self.b * tx + self.d * ty + self.f,
            ..self
        }
    }

    /// Append a scale
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        Self {
            a: self.a * sx,
            b: self.b * sx,
            c: self.c * sy,
            d: self.d * sy,
            ..self
        }
    }

    /// Map a user-space point to device space
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }
}

/// Offscreen RGBA drawing surface
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
    transform: Transform2D,
    backing_store_pixel_ratio: Option<f64>,
}

impl Canvas {
    /// Create a transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            transform: Transform2D::IDENTITY,
            backing_store_pixel_ratio: None,
        }
    }

    /// Declare the backend's internal pixel ratio
    pub fn with_backing_store_pixel_ratio(mut self, ratio: Option<f64>) -> Self {
        self.backing_store_pixel_ratio = ratio;
        self
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Whether the surface has no pixels
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Backend pixel ratio, if declared
    pub fn backing_store_pixel_ratio(&self) -> Option<f64> {
        self.backing_store_pixel_ratio
    }

    /// Current transform
    pub fn transform(&self) -> Transform2D {
        self.transform
    }

    /// Append a translation to the current transform
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.transform = self.transform.translate(tx, ty);
    }

    /// Append a scale to the current transform
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.transform = self.transform.scale(sx, sy);
    }

    /// Flip the coordinate system so later draws are mirrored left to right
    pub fn mirror_horizontally(&mut self) {
        let width = self.width() as f64;
        self.translate(width, 0.0);
        self.scale(-1.0, 1.0);
    }

    /// Whether draws come out mirrored
    pub fn is_mirrored(&self) -> bool {
        self.transform.a < 0.0
    }

    /// Pixel buffer
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Read one pixel
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x < self.width() && y < self.height() {
            Some(self.pixels.get_pixel(x, y).0)
        } else {
            None
        }
    }

    /// Draw `frame` scaled into `rect` through the current transform.
    ///
    /// The rect origin is snapped to whole pixels; parts falling outside the
    /// surface are clipped.
    pub fn draw_frame(&mut self, frame: &VideoFrame, rect: DrawRect) -> MediaResult<()> {
        let source = frame.to_image()?;
        let width = rect.width.round();
        let height = rect.height.round();
        if !(width >= 1.0 && height >= 1.0) || self.is_empty() {
            debug!("Nothing to draw for rect {:?}", rect);
            return Ok(());
        }

        let (width, height) = (width as u32, height as u32);
        let scaled = if source.dimensions() == (width, height) {
            source
        } else {
            imageops::resize(&source, width, height, FilterType::Triangle)
        };

        let origin_x = rect.x.round();
        let origin_y = rect.y.round();
        let (surface_width, surface_height) = (self.width() as f64, self.height() as f64);

        for (i, j, pixel) in scaled.enumerate_pixels() {
            let (dx, dy) = self
                .transform
                .apply(origin_x + i as f64 + 0.5, origin_y + j as f64 + 0.5);
            let (dx, dy) = (dx.floor(), dy.floor());
            if dx < 0.0 || dy < 0.0 || dx >= surface_width || dy >= surface_height {
                continue;
            }

            let target = self.pixels.get_pixel_mut(dx as u32, dy as u32);
            *target = source_over(*pixel, *target);
        }

        Ok(())
    }
}

fn source_over(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let src_alpha = src.0[3] as u32;
    if src_alpha == 255 {
        return src;
    }
    if src_alpha == 0 {
        return dst;
    }

    let inverse = 255 - src_alpha;
    let mut out = [0u8; 4];
    for channel in 0..3 {
        out[channel] = ((src.0[channel] as u32 * src_alpha
            + dst.0[channel] as u32 * inverse
            + 127)
            / 255) as u8;
    }
    out[3] = (src_alpha + (dst.0[3] as u32 * inverse + 127) / 255).min(255) as u8;
    Rgba(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn striped_frame(width: u32, height: u32) -> VideoFrame {
        let mut data = Vec::with_capacity((width * height * 4) as usize);
        for _y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[(x * 40) as u8, 0, 0, 255]);
            }
        }
        VideoFrame::new(width, height, data, 0)
    }

    #[test]
    fn test_mirror_transform() {
        let mut canvas = Canvas::new(100, 50);
        assert!(!canvas.is_mirrored());

        canvas.mirror_horizontally();
        assert!(canvas.is_mirrored());
        assert_eq!(canvas.transform().apply(0.0, 10.0), (100.0, 10.0));
        assert_eq!(canvas.transform().apply(25.0, 10.0), (75.0, 10.0));
    }

    #[test]
    fn test_draw_at_native_size() {
        let mut canvas = Canvas::new(4, 2);
        let frame = striped_frame(4, 2);
        let rect = DrawRect {
            x: 0.0,
            y: 0.0,
            width: 4.0,
            height: 2.0,
        };

        canvas.draw_frame(&frame, rect).unwrap();
        for x in 0..4 {
            assert_eq!(canvas.pixel(x, 1), Some([(x * 40) as u8, 0, 0, 255]));
        }
    }

    #[test]
    fn test_mirrored_draw_reflects_columns() {
        let frame = striped_frame(4, 2);
        let rect = DrawRect {
            x: 0.0,
            y: 0.0,
            width: 4.0,
            height: 2.0,
        };

        let mut plain = Canvas::new(4, 2);
        plain.draw_frame(&frame, rect).unwrap();

        let mut mirrored = Canvas::new(4, 2);
        mirrored.mirror_horizontally();
        mirrored.draw_frame(&frame, rect).unwrap();

        for x in 0..4 {
            assert_eq!(plain.pixel(x, 0), mirrored.pixel(3 - x, 0));
        }
    }

    #[test]
    fn test_draw_clips_and_pads() {
        let mut canvas = Canvas::new(6, 2);
        let frame = VideoFrame::solid(2, 2, [9, 9, 9, 255]);
        let rect = DrawRect {
            x: 2.0,
            y: 0.0,
            width: 2.0,
            height: 2.0,
        };

        canvas.draw_frame(&frame, rect).unwrap();
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(canvas.pixel(2, 0), Some([9, 9, 9, 255]));
        assert_eq!(canvas.pixel(3, 1), Some([9, 9, 9, 255]));
        assert_eq!(canvas.pixel(4, 0), Some([0, 0, 0, 0]));

        let overflow = DrawRect {
            x: -4.0,
            y: 0.0,
            width: 14.0,
            height: 2.0,
        };
        canvas.draw_frame(&frame, overflow).unwrap();
        assert_eq!(canvas.pixel(0, 0).map(|p| p[3]), Some(255));
        assert_eq!(canvas.pixel(5, 1).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_source_over_blends() {
        let dst = Rgba([0, 0, 0, 255]);
        assert_eq!(source_over(Rgba([200, 100, 50, 255]), dst), Rgba([200, 100, 50, 255]));
        assert_eq!(source_over(Rgba([200, 100, 50, 0]), dst), dst);
        let half = source_over(Rgba([200, 200, 200, 128]), dst);
        assert_eq!(half.0[3], 255);
        assert_eq!(half.0[0], 100);
    }
}
