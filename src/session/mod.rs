//! Session module
//!
//! The recording/review state machine and the controller that drives it:
//! - state types carrying permissions, facing, and the clip under review
//! - SessionController gluing UI events to the platform collaborators
//! - a shared state handle for readers and a broadcast event stream

pub mod controller;
pub mod state;

pub use controller::{SessionController, SessionEvent};
pub use state::{
    CaptureConfig, FacingMode, LocationStatus, PermissionSet, RecordingState, ResolutionClass,
    SessionState, SharedSessionState,
};
