//! # Webcam Core
//!
//! Shared camera acquisition for the webcam component. This crate owns the
//! platform seam, the instance registry and the coordinator that requests one
//! stream per resource epoch and fans it out to every mounted instance.

#![deny(missing_docs)]
#![warn(clippy::all)]

mod acquisition;
pub mod constraints;
pub mod context;
pub mod device;
pub mod error;
pub mod platform;
pub mod stream;

// Re-export main types
pub use constraints::{CaptureRequest, MediaStreamConstraints, TrackConstraints};
pub use context::{
    AcquisitionEvent, AcquisitionOutcome, InstanceId, MediaContext, MediaSubscriber, Registration,
};
pub use device::{select_sources, DeviceKind, MediaDeviceInfo, SelectedSources};
pub use error::{ErrorCategory, PlatformError, WebcamError, WebcamResult};
pub use platform::mock::{MockMediaPlatform, MockResponse, MockTrack};
pub use platform::{default_platform, MediaPlatform, UnsupportedPlatform};
pub use stream::{DisplayHandle, MediaStream, MediaTrack};
