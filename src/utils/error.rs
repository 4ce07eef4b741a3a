//! Error types and handling
//!
//! Session-level error types used across the crate.

use crate::platform::{Capability, CaptureError, ExportError};
use thiserror::Error;

/// Session-level error type
///
/// Guard violations leave the session state untouched; collaborator
/// failures are also recorded on the session as a display notice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Permission denied: {0}")]
    PermissionDenied(Capability),

    #[error("Recording already in progress")]
    AlreadyRecording,

    #[error("A clip is still awaiting review")]
    ClipPending,

    #[error("No recording in progress")]
    NotRecording,

    #[error("No clip under review")]
    NoClip,

    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Result type alias using SessionError
pub type SessionResult<T> = Result<T, SessionError>;
