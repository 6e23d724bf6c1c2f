//! Video frame types

use crate::error::{MediaError, MediaResult};
use image::RgbaImage;

/// Video resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VideoResolution {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl VideoResolution {
    /// Create new resolution
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Whether either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// 720p
    pub fn hd720() -> Self {
        Self::new(1280, 720)
    }
}

/// Decoded video frame, tightly packed RGBA8
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// Frame width in pixels
    pub width: u32,
    /// Frame height in pixels
    pub height: u32,
    /// Pixel data, four bytes per pixel, row-major
    pub data: Vec<u8>,
    /// Timestamp in milliseconds
    pub timestamp: u64,
}

impl VideoFrame {
    /// Create a frame from raw RGBA data
    pub fn new(width: u32, height: u32, data: Vec<u8>, timestamp: u64) -> Self {
        Self {
            width,
            height,
            data,
            timestamp,
        }
    }

    /// A frame filled with one color
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self::new(width, height, data, 0)
    }

    /// Frame resolution
    pub fn resolution(&self) -> VideoResolution {
        VideoResolution::new(self.width, self.height)
    }

    /// Expected byte length for the frame dimensions
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }

    /// Borrow the pixels as an image buffer
    pub fn to_image(&self) -> MediaResult<RgbaImage> {
        let expected = self.expected_len();
        if self.data.len() != expected {
            return Err(MediaError::InvalidFrameData {
                expected,
                actual: self.data.len(),
            });
        }

        RgbaImage::from_raw(self.width, self.height, self.data.clone()).ok_or(
            MediaError::InvalidFrameData {
                expected,
                actual: self.data.len(),
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_aspect() {
        assert!((VideoResolution::hd720().aspect_ratio() - 16.0 / 9.0).abs() < 1e-9);
        assert!(VideoResolution::new(0, 480).is_empty());
    }

    #[test]
    fn test_solid_frame() {
        let frame = VideoFrame::solid(4, 2, [1, 2, 3, 4]);
        assert_eq!(frame.data.len(), 32);
        assert_eq!(&frame.data[28..], &[1, 2, 3, 4]);

        let image = frame.to_image().unwrap();
        assert_eq!(image.get_pixel(3, 1).0, [1, 2, 3, 4]);
    }

    #[test]
    fn test_short_frame_rejected() {
        let frame = VideoFrame::new(4, 4, vec![0; 10], 0);
        match frame.to_image() {
            Err(MediaError::InvalidFrameData { expected, actual }) => {
                assert_eq!(expected, 64);
                assert_eq!(actual, 10);
            }
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }
}
