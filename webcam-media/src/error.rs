//! Frame capture error types and handling
//!
//! This module defines the errors raised while compositing video frames onto
//! the drawing surface and encoding the result.

use thiserror::Error;
use webcam_core::WebcamError;

/// Main error type for frame capture operations
#[derive(Error, Debug)]
pub enum MediaError {
    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },

    /// Invalid frame data error
    #[error("Invalid frame data: expected {expected} bytes, got {actual}")]
    InvalidFrameData {
        /// Expected data size
        expected: usize,
        /// Actual data size
        actual: usize,
    },

    /// Invalid state for operation
    #[error("Invalid state: {message}")]
    InvalidState {
        /// State error message
        message: String,
    },

    /// Encoding operation failed
    #[error("Encoding failed: {format} - {reason}")]
    EncodingFailed {
        /// Target format
        format: String,
        /// Failure reason
        reason: String,
    },
}

/// Result type alias for media operations
pub type MediaResult<T> = Result<T, MediaError>;

impl From<MediaError> for WebcamError {
    fn from(error: MediaError) -> Self {
        match error {
            MediaError::InvalidConfiguration { message } => {
                WebcamError::InvalidConfiguration { message }
            }
            other => WebcamError::MediaProcessing {
                reason: other.to_string(),
            },
        }
    }
}
