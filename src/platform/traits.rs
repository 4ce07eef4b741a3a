//! Platform collaborator contracts
//!
//! Platform-agnostic traits for the services a camera session depends on:
//! permission prompts, the capture device, geolocation, and media export.

use crate::session::CaptureConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;
use tokio::sync::oneshot;
use uuid::Uuid;

/// A platform capability the session needs permission for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    Camera,
    Microphone,
    MediaLibrary,
    Location,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Capability::Camera => "camera",
            Capability::Microphone => "microphone",
            Capability::MediaLibrary => "media library",
            Capability::Location => "location",
        };
        write!(f, "{}", name)
    }
}

/// Verdict of a permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionStatus {
    /// Not requested yet, or the prompt has not been answered
    Unknown,
    /// The user granted access
    Granted,
    /// The user denied access
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, PermissionStatus::Granted)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, PermissionStatus::Unknown)
    }
}

impl Default for PermissionStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Reference to a completed recording
///
/// Owned by the session from capture completion until share, save, or
/// discard clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaHandle {
    /// Unique clip ID
    pub id: Uuid,

    /// Platform URI of the stored clip
    pub uri: String,

    /// Clip duration in milliseconds
    pub duration_ms: f64,

    /// When the clip finished recording
    pub recorded_at: DateTime<Utc>,
}

impl MediaHandle {
    /// Create a handle for a clip that finished just now
    pub fn new(uri: impl Into<String>, duration_ms: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            uri: uri.into(),
            duration_ms,
            recorded_at: Utc::now(),
        }
    }
}

/// A geographic position fix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Degrees north of the equator
    pub latitude: f64,

    /// Degrees east of the prime meridian
    pub longitude: f64,

    /// Horizontal accuracy in meters, if the platform reports one
    pub accuracy_m: Option<f64>,

    /// When the fix was taken
    pub fixed_at: DateTime<Utc>,
}

impl Coordinate {
    /// Create a fix taken just now, with no accuracy estimate
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy_m: None,
            fixed_at: Utc::now(),
        }
    }
}

/// Capture device errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Capture interrupted: {0}")]
    Interrupted(String),
}

/// Media export errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Export rejected: {0}")]
    Rejected(String),

    #[error("Clip no longer available: {0}")]
    ClipMissing(String),
}

/// Location provider errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location unavailable: {0}")]
    Unavailable(String),

    #[error("Position fix timed out after {0}s")]
    Timeout(u64),
}

/// One-shot token for a clip still being finalized by the device
///
/// Resolves exactly once: when the user stops the capture, or when the
/// device ends it on its own at the maximum duration.
pub type PendingClip = oneshot::Receiver<Result<MediaHandle, CaptureError>>;

/// Asynchronous permission prompts
#[async_trait]
pub trait PermissionProvider: Send + Sync {
    /// Request the given capabilities and return a verdict per capability
    ///
    /// Capabilities absent from the reply are treated as denied.
    async fn request(&self, capabilities: &[Capability]) -> HashMap<Capability, PermissionStatus>;
}

/// A camera capable of recording clips
#[async_trait]
pub trait CaptureDevice: Send {
    /// Begin recording with the given configuration
    ///
    /// Returns a receiver that resolves with the finished clip, or the
    /// capture failure, once the recording ends.
    async fn start(&mut self, config: &CaptureConfig) -> Result<PendingClip, CaptureError>;

    /// End the recording in progress
    ///
    /// A no-op when nothing is being captured, so rapid double taps on the
    /// stop control are harmless.
    async fn stop(&mut self);
}

/// One-shot geolocation lookup
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Fetch the device's current position
    async fn fetch_position(&self) -> Result<Coordinate, LocationError>;
}

/// Dispatches finished clips to the platform share sheet or media library
#[async_trait]
pub trait MediaExporter: Send {
    /// Open the platform share flow for the clip
    async fn share(&mut self, clip: &MediaHandle) -> Result<(), ExportError>;

    /// Persist the clip into the device media library
    async fn save_to_library(&mut self, clip: &MediaHandle) -> Result<(), ExportError>;
}
