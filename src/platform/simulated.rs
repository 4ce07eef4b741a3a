//! Simulated platform collaborators
//!
//! Deterministic in-memory stand-ins for the platform services, paired
//! with probes so tests and demos can script failures and observe calls.

use super::traits::{
    Capability, CaptureDevice, CaptureError, Coordinate, ExportError, LocationError,
    LocationProvider, MediaExporter, MediaHandle, PendingClip, PermissionProvider,
    PermissionStatus,
};
use crate::session::CaptureConfig;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::oneshot;
use uuid::Uuid;

/// Permission provider answering from a fixed verdict table
pub struct SimulatedPermissions {
    verdicts: HashMap<Capability, PermissionStatus>,
}

impl SimulatedPermissions {
    /// Grant exactly the given capabilities; everything else is denied
    pub fn granting(granted: &[Capability]) -> Self {
        let verdicts = granted
            .iter()
            .map(|c| (*c, PermissionStatus::Granted))
            .collect();
        Self { verdicts }
    }

    /// Grant every capability
    pub fn granting_all() -> Self {
        Self::granting(&[
            Capability::Camera,
            Capability::Microphone,
            Capability::MediaLibrary,
            Capability::Location,
        ])
    }

    /// Deny every capability
    pub fn denying_all() -> Self {
        Self {
            verdicts: HashMap::new(),
        }
    }
}

#[async_trait]
impl PermissionProvider for SimulatedPermissions {
    async fn request(&self, capabilities: &[Capability]) -> HashMap<Capability, PermissionStatus> {
        capabilities
            .iter()
            .map(|c| {
                let status = self
                    .verdicts
                    .get(c)
                    .copied()
                    .unwrap_or(PermissionStatus::Denied);
                (*c, status)
            })
            .collect()
    }
}

/// Interior of the simulated camera, shared with its probe
#[derive(Default)]
struct CameraShared {
    /// Sender resolving the clip in flight
    pending: Mutex<Option<oneshot::Sender<Result<MediaHandle, CaptureError>>>>,

    /// When the capture in flight started
    started_at: Mutex<Option<Instant>>,

    /// Config of the most recent start call
    last_config: Mutex<Option<CaptureConfig>>,

    /// Number of start calls observed
    start_calls: AtomicUsize,

    /// Error the next start call fails with
    fail_start: Mutex<Option<CaptureError>>,
}

/// Simulated capture device
///
/// Finishes a clip when `stop` is called, or when the probe resolves it
/// the way a real device does at the maximum duration.
pub struct SimulatedCamera {
    shared: Arc<CameraShared>,
}

impl SimulatedCamera {
    /// Create a camera together with its observation probe
    pub fn new() -> (Self, CameraProbe) {
        let shared = Arc::new(CameraShared::default());
        (
            Self {
                shared: shared.clone(),
            },
            CameraProbe { shared },
        )
    }
}

#[async_trait]
impl CaptureDevice for SimulatedCamera {
    async fn start(&mut self, config: &CaptureConfig) -> Result<PendingClip, CaptureError> {
        self.shared.start_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(err) = self.shared.fail_start.lock().take() {
            return Err(err);
        }

        let (width, height) = config.resolution.dimensions();
        tracing::debug!("Simulated capture started at {}x{}", width, height);

        *self.shared.last_config.lock() = Some(config.clone());
        *self.shared.started_at.lock() = Some(Instant::now());

        let (tx, rx) = oneshot::channel();
        *self.shared.pending.lock() = Some(tx);
        Ok(rx)
    }

    async fn stop(&mut self) {
        let pending = self.shared.pending.lock().take();
        if let Some(tx) = pending {
            let duration_ms = self
                .shared
                .started_at
                .lock()
                .take()
                .map(|t| t.elapsed().as_secs_f64() * 1000.0)
                .unwrap_or(0.0);
            let clip = MediaHandle::new(
                format!("file:///captures/{}.mp4", Uuid::new_v4()),
                duration_ms,
            );
            let _ = tx.send(Ok(clip));
        }
    }
}

/// Observation and scripting handle for a [`SimulatedCamera`]
#[derive(Clone)]
pub struct CameraProbe {
    shared: Arc<CameraShared>,
}

impl CameraProbe {
    /// Number of start calls the device has seen
    pub fn start_calls(&self) -> usize {
        self.shared.start_calls.load(Ordering::SeqCst)
    }

    /// Config of the most recent start call
    pub fn last_config(&self) -> Option<CaptureConfig> {
        self.shared.last_config.lock().clone()
    }

    /// Whether a capture is currently in flight
    pub fn is_capturing(&self) -> bool {
        self.shared.pending.lock().is_some()
    }

    /// Resolve the capture in flight with the given clip, as the device
    /// does when the maximum duration elapses
    ///
    /// Returns false when no capture is in flight.
    pub fn complete_with(&self, clip: MediaHandle) -> bool {
        match self.shared.pending.lock().take() {
            Some(tx) => tx.send(Ok(clip)).is_ok(),
            None => false,
        }
    }

    /// Resolve the capture in flight with a failure
    pub fn fail_capture(&self, error: CaptureError) -> bool {
        match self.shared.pending.lock().take() {
            Some(tx) => tx.send(Err(error)).is_ok(),
            None => false,
        }
    }

    /// Drop the capture in flight without resolving it
    pub fn drop_capture(&self) {
        self.shared.pending.lock().take();
    }

    /// Make the next start call fail
    pub fn fail_next_start(&self, error: CaptureError) {
        *self.shared.fail_start.lock() = Some(error);
    }
}

/// Interior of the simulated exporter, shared with its probe
#[derive(Default)]
struct ExporterShared {
    /// Clips passed to share, including failed attempts
    shares: Mutex<Vec<MediaHandle>>,

    /// Clips passed to save_to_library, including failed attempts
    saves: Mutex<Vec<MediaHandle>>,

    /// Gate the next export waits on before settling
    gate: Mutex<Option<oneshot::Receiver<()>>>,

    /// Error the next export fails with
    fail_next: Mutex<Option<ExportError>>,
}

/// Simulated share/save backend
pub struct SimulatedExporter {
    shared: Arc<ExporterShared>,
}

impl SimulatedExporter {
    /// Create an exporter together with its observation probe
    pub fn new() -> (Self, ExporterProbe) {
        let shared = Arc::new(ExporterShared::default());
        (
            Self {
                shared: shared.clone(),
            },
            ExporterProbe { shared },
        )
    }

    async fn settle(
        &self,
        clip: &MediaHandle,
        log: &Mutex<Vec<MediaHandle>>,
    ) -> Result<(), ExportError> {
        log.lock().push(clip.clone());

        let gate = self.shared.gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        match self.shared.fail_next.lock().take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl MediaExporter for SimulatedExporter {
    async fn share(&mut self, clip: &MediaHandle) -> Result<(), ExportError> {
        self.settle(clip, &self.shared.shares).await
    }

    async fn save_to_library(&mut self, clip: &MediaHandle) -> Result<(), ExportError> {
        self.settle(clip, &self.shared.saves).await
    }
}

/// Observation and scripting handle for a [`SimulatedExporter`]
#[derive(Clone)]
pub struct ExporterProbe {
    shared: Arc<ExporterShared>,
}

impl ExporterProbe {
    /// Clips passed to share so far
    pub fn shared_clips(&self) -> Vec<MediaHandle> {
        self.shared.shares.lock().clone()
    }

    /// Clips passed to save_to_library so far
    pub fn saved_clips(&self) -> Vec<MediaHandle> {
        self.shared.saves.lock().clone()
    }

    /// Total number of export calls observed
    pub fn export_calls(&self) -> usize {
        self.shared.shares.lock().len() + self.shared.saves.lock().len()
    }

    /// Hold the next export until the returned trigger fires or is dropped
    pub fn hold_next(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.shared.gate.lock() = Some(rx);
        tx
    }

    /// Make the next export fail
    pub fn fail_next(&self, error: ExportError) {
        *self.shared.fail_next.lock() = Some(error);
    }
}

/// Simulated geolocation backend with a fixed outcome
pub struct SimulatedLocator {
    outcome: Result<Coordinate, LocationError>,
    fetch_calls: AtomicUsize,
}

impl SimulatedLocator {
    /// Locator answering every fetch with a fix at the given coordinates
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            outcome: Ok(Coordinate::new(latitude, longitude)),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Locator answering every fetch with the given error
    pub fn failing(error: LocationError) -> Self {
        Self {
            outcome: Err(error),
            fetch_calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetches observed
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationProvider for SimulatedLocator {
    async fn fetch_position(&self) -> Result<Coordinate, LocationError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permission_table_answers_per_capability() {
        let provider = SimulatedPermissions::granting(&[Capability::Camera]);
        let verdicts = provider
            .request(&[Capability::Camera, Capability::Microphone])
            .await;

        assert_eq!(
            verdicts.get(&Capability::Camera),
            Some(&PermissionStatus::Granted)
        );
        assert_eq!(
            verdicts.get(&Capability::Microphone),
            Some(&PermissionStatus::Denied)
        );
    }

    #[tokio::test]
    async fn test_camera_mints_a_clip_on_stop() {
        let (mut camera, probe) = SimulatedCamera::new();
        let pending = camera.start(&CaptureConfig::default()).await.unwrap();
        assert!(probe.is_capturing());

        camera.stop().await;
        assert!(!probe.is_capturing());

        let clip = pending.await.unwrap().unwrap();
        assert!(clip.uri.starts_with("file:///captures/"));
        assert!(clip.uri.ends_with(".mp4"));
    }

    #[tokio::test]
    async fn test_camera_stop_without_capture_is_a_noop() {
        let (mut camera, probe) = SimulatedCamera::new();
        camera.stop().await;
        assert!(!probe.is_capturing());
        assert_eq!(probe.start_calls(), 0);
    }

    #[tokio::test]
    async fn test_exporter_records_attempts_in_order() {
        let (mut exporter, probe) = SimulatedExporter::new();
        let clip = MediaHandle::new("file:///captures/attempt.mp4", 250.0);

        exporter.share(&clip).await.unwrap();
        probe.fail_next(ExportError::Rejected("cancelled".to_string()));
        let err = exporter.save_to_library(&clip).await.unwrap_err();

        assert_eq!(err, ExportError::Rejected("cancelled".to_string()));
        assert_eq!(probe.shared_clips(), vec![clip.clone()]);
        assert_eq!(probe.saved_clips(), vec![clip]);
        assert_eq!(probe.export_calls(), 2);
    }

    #[tokio::test]
    async fn test_locator_counts_fetches() {
        let locator = SimulatedLocator::at(48.8584, 2.2945);
        assert_eq!(locator.fetch_calls(), 0);

        let fix = locator.fetch_position().await.unwrap();
        assert_eq!(fix.latitude, 48.8584);
        assert_eq!(locator.fetch_calls(), 1);
    }
}
