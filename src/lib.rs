//! Clipcam - recording and review session core for a mobile camera clip app.
//!
//! Models a single-screen camera session: permission bootstrap, a
//! recording/review state machine, a one-shot geolocation fetch, and
//! share/save dispatch on the finished clip. Every platform service sits
//! behind an async trait, and simulated collaborators make the whole flow
//! runnable without hardware.
//!
//! A session is wired up from the collaborators and driven by UI events:
//!
//! ```
//! use clipcam::platform::simulated::{SimulatedCamera, SimulatedExporter, SimulatedPermissions};
//! use clipcam::{request_capture_permissions, Screen, SessionController};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let provider = SimulatedPermissions::granting_all();
//! let permissions = request_capture_permissions(&provider).await;
//!
//! let (camera, _camera_probe) = SimulatedCamera::new();
//! let (exporter, _exporter_probe) = SimulatedExporter::new();
//! let mut session = SessionController::new(permissions, Box::new(camera), Box::new(exporter));
//!
//! session.start_recording().await.unwrap();
//! let clip = session.stop_recording().await.unwrap().unwrap();
//! assert_eq!(Screen::for_state(&session.snapshot()).notice(), None);
//!
//! session.save_clip().await.unwrap();
//! assert!(session.snapshot().recording.is_idle());
//! # let _ = clip;
//! # }
//! ```

pub mod bootstrap;
pub mod platform;
pub mod session;
pub mod surface;
pub mod utils;

pub use bootstrap::{request_capture_permissions, resolve_location, LOCATION_DENIED_MESSAGE};
pub use platform::{
    Capability, CaptureDevice, CaptureError, Coordinate, ExportError, LocationError,
    LocationProvider, MediaExporter, MediaHandle, PendingClip, PermissionProvider,
    PermissionStatus,
};
pub use session::{
    CaptureConfig, FacingMode, LocationStatus, PermissionSet, RecordingState, ResolutionClass,
    SessionController, SessionEvent, SessionState, SharedSessionState,
};
pub use surface::{PreviewControl, PreviewSurface, ReviewControl, ReviewSurface, Screen};
pub use utils::error::{SessionError, SessionResult};
