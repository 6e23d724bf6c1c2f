//! # Webcam Media
//!
//! Frame capture for the webcam component. This crate handles everything
//! between the rendered video element and the encoded screenshot: sizing the
//! offscreen surface, computing the crop rectangle, mirroring, compositing
//! and serializing to a `data:` URI.

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod canvas;
pub mod capture;
pub mod encode;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod video;

// Re-export main types
pub use canvas::{Canvas, Transform2D};
pub use capture::{CaptureSettings, FrameCapture};
pub use encode::{encode, to_data_url, ScreenshotFormat, EMPTY_DATA_URL};
pub use error::{MediaError, MediaResult};
pub use frame::{VideoFrame, VideoResolution};
pub use geometry::{pixel_ratio, surface_size, DrawRect};
pub use video::{LiveVideoElement, VideoElement};
