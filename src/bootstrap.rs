//! Session bootstrap
//!
//! Startup permission acquisition and the one-shot location fetch.

use crate::platform::{Capability, LocationProvider, PermissionProvider, PermissionStatus};
use crate::session::{LocationStatus, PermissionSet};

/// Notice stored when location permission is denied
pub const LOCATION_DENIED_MESSAGE: &str = "Permission to access location was denied";

/// Request the capture-side permissions (camera, microphone, media library)
///
/// One provider round-trip resolves all three verdicts; capabilities the
/// provider leaves unanswered count as denied. The location capability is
/// resolved separately by [`resolve_location`].
pub async fn request_capture_permissions(provider: &dyn PermissionProvider) -> PermissionSet {
    let capabilities = [
        Capability::Camera,
        Capability::Microphone,
        Capability::MediaLibrary,
    ];

    tracing::info!("Requesting capture permissions");
    let verdicts = provider.request(&capabilities).await;

    let mut permissions = PermissionSet::default();
    for capability in capabilities {
        let status = verdicts
            .get(&capability)
            .copied()
            .unwrap_or(PermissionStatus::Denied);
        permissions.record(capability, status);
    }

    tracing::info!(
        "Capture permissions resolved: camera={:?} microphone={:?} mediaLibrary={:?}",
        permissions.camera,
        permissions.microphone,
        permissions.media_library
    );
    permissions
}

/// Resolve the location permission and, when granted, fetch one position fix
///
/// On denial the fixed denial message is recorded and the provider is
/// never queried. There is no retry in either case.
pub async fn resolve_location(
    permissions: &dyn PermissionProvider,
    locator: &dyn LocationProvider,
) -> (PermissionStatus, LocationStatus) {
    let verdicts = permissions.request(&[Capability::Location]).await;
    let status = verdicts
        .get(&Capability::Location)
        .copied()
        .unwrap_or(PermissionStatus::Denied);

    if !status.is_granted() {
        tracing::warn!("Location permission denied");
        return (
            status,
            LocationStatus::Failed {
                message: LOCATION_DENIED_MESSAGE.to_string(),
            },
        );
    }

    match locator.fetch_position().await {
        Ok(coordinate) => {
            tracing::info!(
                "Position fix: {:.5}, {:.5}",
                coordinate.latitude,
                coordinate.longitude
            );
            (status, LocationStatus::Fix { coordinate })
        }
        Err(e) => {
            tracing::warn!("Position fetch failed: {}", e);
            (
                status,
                LocationStatus::Failed {
                    message: e.to_string(),
                },
            )
        }
    }
}
