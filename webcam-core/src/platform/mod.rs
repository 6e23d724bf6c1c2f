//! Host media platform seam
//!
//! The component never touches devices directly; every enumeration, stream
//! request and display handle goes through a [`MediaPlatform`].

pub mod mock;

use crate::constraints::MediaStreamConstraints;
use crate::device::MediaDeviceInfo;
use crate::error::PlatformError;
use crate::stream::{DisplayHandle, MediaStream};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Host media API the component delegates to.
///
/// Enumeration and stream requests are asynchronous and may never resolve
/// (for example while a permission prompt stays open); callers impose no
/// timeout.
#[async_trait]
pub trait MediaPlatform: Send + Sync + fmt::Debug {
    /// Whether the host exposes a device capture API at all
    fn has_capture_api(&self) -> bool;

    /// List available capture devices
    async fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>, PlatformError>;

    /// Ask for a stream matching `constraints`
    async fn get_user_media(
        &self,
        constraints: MediaStreamConstraints,
    ) -> Result<MediaStream, PlatformError>;

    /// Derive a displayable URI for `stream`
    fn create_display_handle(&self, stream: &MediaStream) -> DisplayHandle;

    /// Release a URI previously returned by [`MediaPlatform::create_display_handle`]
    fn revoke_display_handle(&self, handle: &DisplayHandle);
}

/// Get the platform for the current target
pub fn default_platform() -> Arc<dyn MediaPlatform> {
    Arc::new(UnsupportedPlatform)
}

/// Platform without a capture API. Components mounted on it stay inert.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedPlatform;

#[async_trait]
impl MediaPlatform for UnsupportedPlatform {
    fn has_capture_api(&self) -> bool {
        false
    }

    async fn enumerate_devices(&self) -> Result<Vec<MediaDeviceInfo>, PlatformError> {
        Err(PlatformError::new(
            "NotSupportedError",
            "No capture API on this platform",
        ))
    }

    async fn get_user_media(
        &self,
        _constraints: MediaStreamConstraints,
    ) -> Result<MediaStream, PlatformError> {
        Err(PlatformError::new(
            "NotSupportedError",
            "No capture API on this platform",
        ))
    }

    fn create_display_handle(&self, stream: &MediaStream) -> DisplayHandle {
        DisplayHandle::new(format!("unsupported:{}", stream.id()))
    }

    fn revoke_display_handle(&self, _handle: &DisplayHandle) {}
}
