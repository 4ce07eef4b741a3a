//! Session state management
//!
//! Defines the recording/review state machine, permission tracking, and the
//! shared state handle readers observe the session through.

use crate::platform::{Capability, Coordinate, MediaHandle, PermissionStatus};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which physical camera the preview is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    Front,
    Back,
}

impl FacingMode {
    /// The opposite camera
    pub fn flipped(&self) -> Self {
        match self {
            FacingMode::Front => FacingMode::Back,
            FacingMode::Back => FacingMode::Front,
        }
    }
}

impl Default for FacingMode {
    fn default() -> Self {
        Self::Back
    }
}

/// Current state of the recording session
///
/// The clip under review is carried by the Reviewing variant, so a handle
/// exists exactly while a review is on screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum RecordingState {
    /// No recording in progress
    Idle,
    /// A capture is running
    Recording,
    /// A finished clip is awaiting share/save/discard
    Reviewing { clip: MediaHandle },
}

impl RecordingState {
    pub fn is_idle(&self) -> bool {
        matches!(self, RecordingState::Idle)
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording)
    }

    pub fn is_reviewing(&self) -> bool {
        matches!(self, RecordingState::Reviewing { .. })
    }

    /// The clip under review, if any
    pub fn clip(&self) -> Option<&MediaHandle> {
        match self {
            RecordingState::Reviewing { clip } => Some(clip),
            _ => None,
        }
    }
}

impl Default for RecordingState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Permission verdicts for every capability the session touches
///
/// Gathered once at startup; verdicts are not re-queried during a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PermissionSet {
    /// Camera access
    pub camera: PermissionStatus,

    /// Microphone access
    pub microphone: PermissionStatus,

    /// Media library write access
    pub media_library: PermissionStatus,

    /// Geolocation access
    pub location: PermissionStatus,
}

impl PermissionSet {
    /// Verdict for a single capability
    pub fn status(&self, capability: Capability) -> PermissionStatus {
        match capability {
            Capability::Camera => self.camera,
            Capability::Microphone => self.microphone,
            Capability::MediaLibrary => self.media_library,
            Capability::Location => self.location,
        }
    }

    /// Record a verdict for a single capability
    pub fn record(&mut self, capability: Capability, status: PermissionStatus) {
        match capability {
            Capability::Camera => self.camera = status,
            Capability::Microphone => self.microphone = status,
            Capability::MediaLibrary => self.media_library = status,
            Capability::Location => self.location = status,
        }
    }

    /// Whether recording may start (camera and microphone both granted)
    pub fn capture_ready(&self) -> bool {
        self.camera.is_granted() && self.microphone.is_granted()
    }

    /// Whether the camera or microphone verdict is still unanswered
    pub fn awaiting_capture_verdicts(&self) -> bool {
        self.camera.is_unknown() || self.microphone.is_unknown()
    }
}

/// Outcome of the one-shot location fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum LocationStatus {
    /// The fetch has not resolved yet
    Pending,
    /// A position fix was obtained
    Fix { coordinate: Coordinate },
    /// The fetch failed, or location permission was denied
    Failed { message: String },
}

impl LocationStatus {
    /// Caption shown under the preview
    ///
    /// A pending fetch renders a fixed placeholder, a fix renders as its
    /// JSON payload, a failure renders the reason.
    pub fn caption(&self) -> String {
        match self {
            LocationStatus::Pending => "Waiting..".to_string(),
            LocationStatus::Fix { coordinate } => serde_json::to_string(coordinate)
                .unwrap_or_else(|_| {
                    format!("{:.5}, {:.5}", coordinate.latitude, coordinate.longitude)
                }),
            LocationStatus::Failed { message } => message.clone(),
        }
    }
}

impl Default for LocationStatus {
    fn default() -> Self {
        Self::Pending
    }
}

/// Named capture resolution classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionClass {
    #[serde(rename = "720p")]
    P720,
    #[serde(rename = "1080p")]
    P1080,
    #[serde(rename = "2160p")]
    P2160,
}

impl ResolutionClass {
    /// Label used in capture requests
    pub fn label(&self) -> &'static str {
        match self {
            ResolutionClass::P720 => "720p",
            ResolutionClass::P1080 => "1080p",
            ResolutionClass::P2160 => "2160p",
        }
    }

    /// Pixel dimensions as (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            ResolutionClass::P720 => (1280, 720),
            ResolutionClass::P1080 => (1920, 1080),
            ResolutionClass::P2160 => (3840, 2160),
        }
    }
}

/// Configuration handed to the capture device when recording starts
///
/// Policy constants for the session, not per-call parameters. Embedders may
/// override the defaults through the controller builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureConfig {
    /// Capture resolution class
    pub resolution: ResolutionClass,

    /// Device-enforced maximum clip length in seconds
    pub max_duration_secs: u32,

    /// Whether the audio track is suppressed
    pub muted: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            resolution: ResolutionClass::P1080,
            max_duration_secs: 60,
            muted: false,
        }
    }
}

/// Complete observable state of a camera session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Permission verdicts gathered at startup
    pub permissions: PermissionSet,

    /// Selected camera facing
    pub facing: FacingMode,

    /// Recording machine state, carrying the clip while reviewing
    pub recording: RecordingState,

    /// Outcome of the location fetch
    pub location: LocationStatus,

    /// Most recent collaborator failure, for display
    pub last_error: Option<String>,
}

impl SessionState {
    /// Move Idle -> Recording, clearing any stale notice
    pub(crate) fn begin_recording(&mut self) {
        self.recording = RecordingState::Recording;
        self.last_error = None;
    }

    /// Move Recording -> Reviewing with the finished clip
    pub(crate) fn finish_recording(&mut self, clip: MediaHandle) {
        self.recording = RecordingState::Reviewing { clip };
    }

    /// Drop the reviewed clip and return to Idle
    pub(crate) fn clear_clip(&mut self) {
        self.recording = RecordingState::Idle;
    }

    /// Abandon a capture, recording the failure for display
    pub(crate) fn abort_recording(&mut self, message: impl Into<String>) {
        self.recording = RecordingState::Idle;
        self.last_error = Some(message.into());
    }

    /// Flip the camera facing, returning the new mode
    pub(crate) fn toggle_facing(&mut self) -> FacingMode {
        self.facing = self.facing.flipped();
        self.facing
    }

    /// Record a collaborator failure without moving the machine
    pub(crate) fn set_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }
}

/// Cloneable handle to state shared between the controller and readers
///
/// Readers take snapshots or short read locks; only the controller writes.
#[derive(Clone, Default)]
pub struct SharedSessionState {
    inner: Arc<RwLock<SessionState>>,
}

impl SharedSessionState {
    /// Create a handle seeded with the startup permission verdicts
    pub fn new(permissions: PermissionSet) -> Self {
        let state = SessionState {
            permissions,
            ..SessionState::default()
        };
        Self {
            inner: Arc::new(RwLock::new(state)),
        }
    }

    /// Read access to the current state
    pub fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.inner.read()
    }

    /// Write access for controller transitions
    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.inner.write()
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.inner.read().clone()
    }

    /// Current machine state
    pub fn recording(&self) -> RecordingState {
        self.inner.read().recording.clone()
    }

    /// Current facing mode
    pub fn facing(&self) -> FacingMode {
        self.inner.read().facing
    }
}
