//! Session controller
//!
//! Drives the recording/review state machine and dispatches to the
//! platform collaborators.

use super::state::{
    CaptureConfig, FacingMode, LocationStatus, PermissionSet, RecordingState, SessionState,
    SharedSessionState,
};
use crate::platform::{
    Capability, CaptureDevice, CaptureError, MediaExporter, MediaHandle, PendingClip,
    PermissionStatus,
};
use crate::utils::error::{SessionError, SessionResult};
use tokio::sync::broadcast;

/// Events emitted as the session moves through its lifecycle
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A recording started
    RecordingStarted,
    /// A recording finished; the clip is under review
    RecordingFinished(MediaHandle),
    /// The reviewed clip was shared
    ClipShared,
    /// The reviewed clip was saved to the media library
    ClipSaved,
    /// The reviewed clip was discarded
    ClipDiscarded,
    /// The camera facing changed
    FacingChanged(FacingMode),
    /// A collaborator failed
    Error(String),
}

/// Drives a single camera session
///
/// Methods take `&mut self`, so overlapping invocations are impossible for
/// a single owner; embedders sharing the controller across tasks serialize
/// it behind a `tokio::sync::Mutex`.
pub struct SessionController {
    /// Shared observable state
    state: SharedSessionState,

    /// Capture policy for this session
    config: CaptureConfig,

    /// Camera backing the session
    device: Box<dyn CaptureDevice>,

    /// Share/save backend
    exporter: Box<dyn MediaExporter>,

    /// Clip receiver for the capture in flight
    pending_clip: Option<PendingClip>,

    /// Event broadcaster
    event_tx: broadcast::Sender<SessionEvent>,
}

impl SessionController {
    /// Create a controller over the given collaborators
    pub fn new(
        permissions: PermissionSet,
        device: Box<dyn CaptureDevice>,
        exporter: Box<dyn MediaExporter>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            state: SharedSessionState::new(permissions),
            config: CaptureConfig::default(),
            device,
            exporter,
            pending_clip: None,
            event_tx,
        }
    }

    /// Replace the default capture configuration
    pub fn with_config(mut self, config: CaptureConfig) -> Self {
        self.config = config;
        self
    }

    /// Shared handle to the session state
    pub fn state(&self) -> SharedSessionState {
        self.state.clone()
    }

    /// Owned copy of the current state
    pub fn snapshot(&self) -> SessionState {
        self.state.snapshot()
    }

    /// Subscribe to session events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// The capture configuration in force
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Start a recording
    ///
    /// Requires an idle session and granted camera and microphone
    /// permissions; guard violations leave the state untouched and never
    /// reach the capture device.
    pub async fn start_recording(&mut self) -> SessionResult<()> {
        let current = self.state.snapshot();
        match current.recording {
            RecordingState::Recording => return Err(SessionError::AlreadyRecording),
            RecordingState::Reviewing { .. } => return Err(SessionError::ClipPending),
            RecordingState::Idle => {}
        }
        if !current.permissions.camera.is_granted() {
            return Err(SessionError::PermissionDenied(Capability::Camera));
        }
        if !current.permissions.microphone.is_granted() {
            return Err(SessionError::PermissionDenied(Capability::Microphone));
        }

        tracing::info!(
            "Starting capture ({}, max {}s)",
            self.config.resolution.label(),
            self.config.max_duration_secs
        );

        let pending = match self.device.start(&self.config).await {
            Ok(pending) => pending,
            Err(e) => {
                tracing::error!("Capture device failed to start: {}", e);
                self.state.write().set_error(e.to_string());
                let _ = self.event_tx.send(SessionEvent::Error(e.to_string()));
                return Err(e.into());
            }
        };

        self.pending_clip = Some(pending);
        self.state.write().begin_recording();
        let _ = self.event_tx.send(SessionEvent::RecordingStarted);

        tracing::info!("Recording started");
        Ok(())
    }

    /// Stop the recording in progress and move the finished clip into review
    ///
    /// A stop with no capture in flight is ignored, so rapid double taps on
    /// the stop control are harmless.
    pub async fn stop_recording(&mut self) -> SessionResult<Option<MediaHandle>> {
        let is_recording = self.state.read().recording.is_recording();
        if !is_recording {
            tracing::debug!("Stop requested with no capture in flight");
            return Ok(None);
        }

        tracing::info!("Stopping capture");
        self.device.stop().await;

        let clip = self.finish_capture().await?;
        Ok(Some(clip))
    }

    /// Settle the capture in flight and enter review
    ///
    /// Called by [`stop_recording`](Self::stop_recording), and directly by
    /// embedders when the device ends the capture on its own (maximum
    /// duration reached). A capture failure returns the session to Idle
    /// with the failure recorded as the display notice.
    pub async fn finish_capture(&mut self) -> SessionResult<MediaHandle> {
        let pending = self.pending_clip.take().ok_or(SessionError::NotRecording)?;

        let outcome = pending.await.unwrap_or_else(|_| {
            Err(CaptureError::Interrupted(
                "capture device dropped the in-flight clip".to_string(),
            ))
        });

        match outcome {
            Ok(clip) => {
                tracing::info!("Capture finished: {} ({}ms)", clip.uri, clip.duration_ms);
                self.state.write().finish_recording(clip.clone());
                let _ = self
                    .event_tx
                    .send(SessionEvent::RecordingFinished(clip.clone()));
                Ok(clip)
            }
            Err(e) => {
                tracing::error!("Capture failed: {}", e);
                self.state.write().abort_recording(e.to_string());
                let _ = self.event_tx.send(SessionEvent::Error(e.to_string()));
                Err(e.into())
            }
        }
    }

    /// Share the reviewed clip, then return to Idle
    ///
    /// The clip is cleared only after the exporter settles; on failure it
    /// stays under review so the user can retry.
    pub async fn share_clip(&mut self) -> SessionResult<()> {
        let clip = self.reviewed_clip()?;

        tracing::info!("Sharing clip {}", clip.id);
        if let Err(e) = self.exporter.share(&clip).await {
            tracing::error!("Share failed: {}", e);
            self.state.write().set_error(e.to_string());
            let _ = self.event_tx.send(SessionEvent::Error(e.to_string()));
            return Err(e.into());
        }

        self.state.write().clear_clip();
        let _ = self.event_tx.send(SessionEvent::ClipShared);
        Ok(())
    }

    /// Save the reviewed clip to the media library, then return to Idle
    ///
    /// Requires media library permission. The clip is cleared only after
    /// the exporter settles; on failure it stays under review.
    pub async fn save_clip(&mut self) -> SessionResult<()> {
        let clip = self.reviewed_clip()?;

        let media_library = self.state.read().permissions.media_library;
        if !media_library.is_granted() {
            return Err(SessionError::PermissionDenied(Capability::MediaLibrary));
        }

        tracing::info!("Saving clip {} to media library", clip.id);
        if let Err(e) = self.exporter.save_to_library(&clip).await {
            tracing::error!("Save failed: {}", e);
            self.state.write().set_error(e.to_string());
            let _ = self.event_tx.send(SessionEvent::Error(e.to_string()));
            return Err(e.into());
        }

        self.state.write().clear_clip();
        let _ = self.event_tx.send(SessionEvent::ClipSaved);
        Ok(())
    }

    /// Discard the reviewed clip without any collaborator call
    pub fn discard_clip(&mut self) -> SessionResult<()> {
        let clip = self.reviewed_clip()?;

        tracing::info!("Discarding clip {}", clip.id);
        self.state.write().clear_clip();
        let _ = self.event_tx.send(SessionEvent::ClipDiscarded);
        Ok(())
    }

    /// Flip between the front and back camera
    ///
    /// Only effective while idle; during a capture or a review the current
    /// mode is returned unchanged.
    pub fn toggle_facing(&mut self) -> FacingMode {
        let current = self.state.snapshot();
        if !current.recording.is_idle() {
            tracing::debug!("Facing toggle ignored outside idle preview");
            return current.facing;
        }

        let facing = self.state.write().toggle_facing();
        tracing::info!("Camera facing toggled to {:?}", facing);
        let _ = self.event_tx.send(SessionEvent::FacingChanged(facing));
        facing
    }

    /// Record the outcome of the location bootstrap
    ///
    /// Location has no interaction with the recording machine; the outcome
    /// only feeds the preview caption.
    pub fn apply_location(&mut self, permission: PermissionStatus, status: LocationStatus) {
        tracing::debug!("Location outcome applied: {:?}", status);
        let mut state = self.state.write();
        state.permissions.location = permission;
        state.location = status;
    }

    /// The clip under review, or the NoClip guard error
    fn reviewed_clip(&self) -> SessionResult<MediaHandle> {
        self.state
            .read()
            .recording
            .clip()
            .cloned()
            .ok_or(SessionError::NoClip)
    }
}
