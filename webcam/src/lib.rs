//! # Webcam - Shared Camera Preview Component
//!
//! A camera preview component that many instances can mount at once while
//! the device is opened only once. The first mount asks the platform for a
//! stream, every mounted instance receives it, and the last unmount stops
//! the tracks and releases the camera.
//!
//! ## Key Features
//!
//! - **One request per epoch**: concurrent mounts never prompt twice
//! - **Late mounts**: instances mounted after the grant bind immediately
//! - **Screenshots**: crop, mirror and encode the live frame as a `data:` URI
//! - **Injectable platform**: drive everything from a scripted mock in tests
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use webcam::{LiveVideoElement, MediaContext, MockMediaPlatform, Webcam, WebcamConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), webcam::WebcamError> {
//!     webcam::logging::init_logging();
//!
//!     let context = MediaContext::new(Arc::new(MockMediaPlatform::new()))?;
//!     let webcam = Webcam::new(&context, WebcamConfig::default().audio(false))?;
//!
//!     if let Some(acquisition) = webcam.mount() {
//!         let _ = acquisition.await;
//!     }
//!
//!     webcam.attach_video_element(Arc::new(LiveVideoElement::new(640.0)));
//!     println!("Preview: {:?}", webcam.view());
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export core types for easy access
pub use webcam_core::{
    default_platform, select_sources, AcquisitionEvent, AcquisitionOutcome, CaptureRequest,
    DeviceKind, DisplayHandle, ErrorCategory, InstanceId, MediaContext, MediaDeviceInfo,
    MediaPlatform, MediaStream, MediaStreamConstraints, MediaSubscriber, MediaTrack,
    MockMediaPlatform, MockResponse, MockTrack, PlatformError, Registration, SelectedSources,
    TrackConstraints, UnsupportedPlatform, WebcamError, WebcamResult,
};

pub use webcam_media::{
    Canvas, CaptureSettings, DrawRect, FrameCapture, LiveVideoElement, MediaError,
    ScreenshotFormat, VideoElement, VideoFrame, VideoResolution,
};

// Public API modules
pub mod component;
pub mod config;
pub mod logging;
pub mod view;

// Re-export main API types
pub use component::{ComponentState, Webcam};
pub use config::{UserMediaCallback, WebcamConfig};
pub use view::{ContainerView, Style, VideoView, WebcamView, CONTAINER_CLASS};
