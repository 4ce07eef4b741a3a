//! Platform collaborator layer
//!
//! Contracts for the platform services the session depends on, plus
//! simulated implementations for tests and embedder demos.

pub mod simulated;
pub mod traits;

pub use traits::{
    Capability, CaptureDevice, CaptureError, Coordinate, ExportError, LocationError,
    LocationProvider, MediaExporter, MediaHandle, PendingClip, PermissionProvider,
    PermissionStatus,
};
