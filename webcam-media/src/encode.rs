//! Screenshot serialization
//!
//! Encodes the capture surface and wraps it as a `data:` URI.

use crate::canvas::Canvas;
use crate::error::{MediaError, MediaResult};
use base64::Engine;
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Cursor;

/// Data URI returned for a surface with no pixels
pub const EMPTY_DATA_URL: &str = "data:,";

/// Image format used for screenshots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScreenshotFormat {
    /// WebP (lossless)
    #[default]
    #[serde(rename = "image/webp")]
    Webp,
    /// PNG (lossless)
    #[serde(rename = "image/png")]
    Png,
    /// JPEG (lossy, alpha dropped)
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl ScreenshotFormat {
    /// MIME type written into the data URI
    pub fn mime_type(&self) -> &'static str {
        match self {
            ScreenshotFormat::Webp => "image/webp",
            ScreenshotFormat::Png => "image/png",
            ScreenshotFormat::Jpeg => "image/jpeg",
        }
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ScreenshotFormat::Webp => ImageFormat::WebP,
            ScreenshotFormat::Png => ImageFormat::Png,
            ScreenshotFormat::Jpeg => ImageFormat::Jpeg,
        }
    }
}

impl fmt::Display for ScreenshotFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mime_type())
    }
}

/// Encode the surface's pixels in `format`
pub fn encode(canvas: &Canvas, format: ScreenshotFormat) -> MediaResult<Vec<u8>> {
    let image = DynamicImage::ImageRgba8(canvas.pixels().clone());
    let image = match format {
        ScreenshotFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()),
        _ => image,
    };

    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, format.image_format())
        .map_err(|e| MediaError::EncodingFailed {
            format: format.mime_type().to_string(),
            reason: e.to_string(),
        })?;

    Ok(bytes.into_inner())
}

/// Encode the surface as a base64 `data:` URI
pub fn to_data_url(canvas: &Canvas, format: ScreenshotFormat) -> MediaResult<String> {
    if canvas.is_empty() {
        return Ok(EMPTY_DATA_URL.to_string());
    }

    let bytes = encode(canvas, format)?;
    Ok(format!(
        "data:{};base64,{}",
        format.mime_type(),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_payload(url: &str, mime: &str) -> Vec<u8> {
        let prefix = format!("data:{};base64,", mime);
        assert!(url.starts_with(&prefix), "unexpected url prefix: {}", url);
        base64::engine::general_purpose::STANDARD
            .decode(&url[prefix.len()..])
            .unwrap()
    }

    #[test]
    fn test_png_data_url_decodes() {
        let canvas = Canvas::new(8, 4);
        let url = to_data_url(&canvas, ScreenshotFormat::Png).unwrap();
        let bytes = decode_payload(&url, "image/png");

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
    }

    #[test]
    fn test_jpeg_and_webp_encode() {
        let canvas = Canvas::new(16, 16);

        let jpeg = to_data_url(&canvas, ScreenshotFormat::Jpeg).unwrap();
        let bytes = decode_payload(&jpeg, "image/jpeg");
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);

        let webp = to_data_url(&canvas, ScreenshotFormat::Webp).unwrap();
        let bytes = decode_payload(&webp, "image/webp");
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn test_empty_surface() {
        let canvas = Canvas::new(0, 10);
        assert_eq!(to_data_url(&canvas, ScreenshotFormat::Png).unwrap(), "data:,");
    }

    #[test]
    fn test_format_serde_names() {
        let format: ScreenshotFormat = serde_json::from_str("\"image/jpeg\"").unwrap();
        assert_eq!(format, ScreenshotFormat::Jpeg);
        assert_eq!(ScreenshotFormat::default().to_string(), "image/webp");
    }
}
