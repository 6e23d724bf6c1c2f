//! Error types for the webcam component

use std::fmt;
use thiserror::Error;

/// Main error type for webcam operations
#[derive(Error, Debug)]
pub enum WebcamError {
    /// Initialization error
    #[error("Initialization failed: {reason}")]
    Initialization {
        /// Reason for initialization failure
        reason: String,
    },

    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },

    /// Device enumeration failed
    #[error("Device enumeration failed: {source}")]
    EnumerationFailed {
        /// Error reported by the platform
        source: PlatformError,
    },

    /// The platform refused or failed to provide a stream
    #[error("Media acquisition failed: {source}")]
    AcquisitionFailed {
        /// Error reported by the platform
        source: PlatformError,
    },

    /// Frame capture was requested before a video element was attached
    #[error("No video element attached to instance {instance_id}")]
    VideoElementMissing {
        /// Instance that has no element
        instance_id: String,
    },

    /// Frame compositing or encoding failed
    #[error("Media processing error: {reason}")]
    MediaProcessing {
        /// Reason for media error
        reason: String,
    },
}

/// Result type alias for webcam operations
pub type WebcamResult<T> = Result<T, WebcamError>;

impl WebcamError {
    /// Get error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            WebcamError::Initialization { .. } => ErrorCategory::System,
            WebcamError::InvalidConfiguration { .. } => ErrorCategory::Configuration,
            WebcamError::EnumerationFailed { .. } => ErrorCategory::Device,
            WebcamError::AcquisitionFailed { .. } => ErrorCategory::Device,
            WebcamError::VideoElementMissing { .. } => ErrorCategory::State,
            WebcamError::MediaProcessing { .. } => ErrorCategory::Media,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// System-level errors (runtime, logging)
    System,
    /// Configuration and parameter errors
    Configuration,
    /// Device enumeration and access errors
    Device,
    /// Lifecycle and state errors
    State,
    /// Compositing and encoding errors
    Media,
}

/// Error reported by the host media platform.
///
/// Mirrors the `name`/`message` pair platforms attach to enumeration and
/// permission failures (for example `NotAllowedError: Permission denied`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformError {
    /// Platform error name
    pub name: String,
    /// Human readable description
    pub message: String,
}

impl PlatformError {
    /// Create a new platform error
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }

    /// The user or the platform refused camera access
    pub fn permission_denied() -> Self {
        Self::new("NotAllowedError", "Permission denied")
    }

    /// No device matched the requested constraints
    pub fn not_found() -> Self {
        Self::new("NotFoundError", "Requested device not found")
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.message)
    }
}

impl std::error::Error for PlatformError {}
