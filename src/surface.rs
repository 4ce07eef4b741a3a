//! Screen derivation
//!
//! Pure mapping from session state to the screen the UI presents and the
//! controls it offers.

use crate::platform::MediaHandle;
use crate::session::{FacingMode, SessionState};
use serde::{Deserialize, Serialize};

/// Notice shown while the capture permission verdicts are still pending
pub const AWAITING_PERMISSIONS_NOTICE: &str = "Requesting permissions...";

/// Notice shown when camera permission was denied
pub const CAMERA_DENIED_NOTICE: &str = "Permission for camera not granted.";

/// Banner shown on the preview when only the microphone was denied
pub const MICROPHONE_DENIED_NOTICE: &str = "Permission for microphone not granted.";

/// The screen derived from the current session state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Screen {
    /// Startup screen while camera/microphone verdicts are unknown
    AwaitingPermissions,
    /// Dead end once camera permission is denied
    CameraDenied,
    /// Live camera preview with the record controls
    Preview(PreviewSurface),
    /// Post-capture review of the finished clip
    Review(ReviewSurface),
}

impl Screen {
    /// Derive the screen for the given state
    pub fn for_state(state: &SessionState) -> Screen {
        if state.permissions.awaiting_capture_verdicts() {
            return Screen::AwaitingPermissions;
        }
        if !state.permissions.camera.is_granted() {
            return Screen::CameraDenied;
        }
        if let Some(clip) = state.recording.clip() {
            return Screen::Review(ReviewSurface {
                clip: clip.clone(),
                can_save: state.permissions.media_library.is_granted(),
                error_notice: state.last_error.clone(),
            });
        }

        let microphone_notice = if state.permissions.microphone.is_granted() {
            None
        } else {
            Some(MICROPHONE_DENIED_NOTICE.to_string())
        };
        Screen::Preview(PreviewSurface {
            facing: state.facing,
            is_recording: state.recording.is_recording(),
            can_record: state.permissions.capture_ready(),
            microphone_notice,
            location_caption: state.location.caption(),
            error_notice: state.last_error.clone(),
        })
    }

    /// Fixed notice text for the permission screens
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Screen::AwaitingPermissions => Some(AWAITING_PERMISSIONS_NOTICE),
            Screen::CameraDenied => Some(CAMERA_DENIED_NOTICE),
            Screen::Preview(_) | Screen::Review(_) => None,
        }
    }
}

/// Affordances of the live preview screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSurface {
    /// Camera the preview is bound to
    pub facing: FacingMode,

    /// Whether a capture is running
    pub is_recording: bool,

    /// Whether the record control is enabled
    pub can_record: bool,

    /// Banner shown when the microphone was denied
    pub microphone_notice: Option<String>,

    /// Caption for the location line
    pub location_caption: String,

    /// Most recent collaborator failure
    pub error_notice: Option<String>,
}

impl PreviewSurface {
    /// Controls rendered on this screen, in display order
    ///
    /// The facing toggle is only reachable while idle.
    pub fn controls(&self) -> Vec<PreviewControl> {
        let mut controls = Vec::new();
        if !self.is_recording {
            controls.push(PreviewControl::ToggleFacing);
        }
        controls.push(if self.is_recording {
            PreviewControl::Stop
        } else {
            PreviewControl::Record
        });
        controls
    }
}

/// Controls available on the preview screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PreviewControl {
    /// Flip between the front and back camera
    ToggleFacing,
    /// Start a recording
    Record,
    /// Stop the recording in progress
    Stop,
}

/// Affordances of the clip review screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSurface {
    /// The clip under review
    pub clip: MediaHandle,

    /// Whether the save control is offered
    pub can_save: bool,

    /// Most recent collaborator failure
    pub error_notice: Option<String>,
}

impl ReviewSurface {
    /// Controls rendered on this screen, in display order
    pub fn controls(&self) -> Vec<ReviewControl> {
        let mut controls = vec![ReviewControl::Share];
        if self.can_save {
            controls.push(ReviewControl::Save);
        }
        controls.push(ReviewControl::Discard);
        controls
    }
}

/// Controls available on the review screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReviewControl {
    /// Open the platform share flow
    Share,
    /// Save the clip to the media library
    Save,
    /// Drop the clip and return to the preview
    Discard,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Capability, MediaHandle, PermissionStatus};
    use crate::session::{LocationStatus, PermissionSet, SessionState};

    fn resolved(granted: &[Capability]) -> SessionState {
        let mut permissions = PermissionSet::default();
        for capability in [
            Capability::Camera,
            Capability::Microphone,
            Capability::MediaLibrary,
            Capability::Location,
        ] {
            permissions.record(capability, PermissionStatus::Denied);
        }
        for capability in granted {
            permissions.record(*capability, PermissionStatus::Granted);
        }
        SessionState {
            permissions,
            ..SessionState::default()
        }
    }

    #[test]
    fn test_unknown_verdicts_yield_awaiting_screen() {
        let state = SessionState::default();
        let screen = Screen::for_state(&state);
        assert_eq!(screen, Screen::AwaitingPermissions);
        assert_eq!(screen.notice(), Some(AWAITING_PERMISSIONS_NOTICE));

        let mut camera_only = SessionState::default();
        camera_only
            .permissions
            .record(Capability::Camera, PermissionStatus::Granted);
        assert_eq!(Screen::for_state(&camera_only), Screen::AwaitingPermissions);
    }

    #[test]
    fn test_camera_denial_is_a_fixed_notice() {
        let screen = Screen::for_state(&resolved(&[Capability::Microphone]));
        assert_eq!(screen, Screen::CameraDenied);
        assert_eq!(screen.notice(), Some(CAMERA_DENIED_NOTICE));
    }

    #[test]
    fn test_preview_iff_camera_granted() {
        // Every resolved combination of the other capabilities.
        let others = [
            Capability::Microphone,
            Capability::MediaLibrary,
            Capability::Location,
        ];
        for mask in 0..(1 << others.len()) {
            let mut granted: Vec<Capability> = others
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, c)| *c)
                .collect();

            let denied_camera = Screen::for_state(&resolved(&granted));
            assert_eq!(
                denied_camera,
                Screen::CameraDenied,
                "camera denied must block the preview (mask {:#b})",
                mask
            );

            granted.push(Capability::Camera);
            let screen = Screen::for_state(&resolved(&granted));
            assert!(
                matches!(screen, Screen::Preview(_)),
                "camera granted must reach the preview (mask {:#b})",
                mask
            );
        }
    }

    #[test]
    fn test_microphone_denial_banners_the_preview() {
        let state = resolved(&[Capability::Camera]);
        match Screen::for_state(&state) {
            Screen::Preview(preview) => {
                assert!(!preview.can_record);
                assert_eq!(
                    preview.microphone_notice.as_deref(),
                    Some(MICROPHONE_DENIED_NOTICE)
                );
            }
            other => panic!("expected preview, got {:?}", other),
        }

        let both = resolved(&[Capability::Camera, Capability::Microphone]);
        match Screen::for_state(&both) {
            Screen::Preview(preview) => {
                assert!(preview.can_record);
                assert!(preview.microphone_notice.is_none());
            }
            other => panic!("expected preview, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_carries_the_location_caption() {
        let mut state = resolved(&[Capability::Camera, Capability::Microphone]);
        state.location = LocationStatus::Failed {
            message: "Permission to access location was denied".to_string(),
        };

        match Screen::for_state(&state) {
            Screen::Preview(preview) => {
                assert_eq!(
                    preview.location_caption,
                    "Permission to access location was denied"
                );
            }
            other => panic!("expected preview, got {:?}", other),
        }
    }

    #[test]
    fn test_preview_controls_swap_record_for_stop() {
        let mut state = resolved(&[Capability::Camera, Capability::Microphone]);
        let Screen::Preview(idle) = Screen::for_state(&state) else {
            panic!("expected preview");
        };
        assert_eq!(
            idle.controls(),
            vec![PreviewControl::ToggleFacing, PreviewControl::Record]
        );

        state.begin_recording();
        let Screen::Preview(recording) = Screen::for_state(&state) else {
            panic!("expected preview");
        };
        assert_eq!(recording.controls(), vec![PreviewControl::Stop]);
    }

    #[test]
    fn test_save_control_iff_media_library_granted() {
        let clip = MediaHandle::new("file:///captures/review.mp4", 1_000.0);

        let mut with_library = resolved(&[
            Capability::Camera,
            Capability::Microphone,
            Capability::MediaLibrary,
        ]);
        with_library.finish_recording(clip.clone());
        let Screen::Review(review) = Screen::for_state(&with_library) else {
            panic!("expected review");
        };
        assert!(review.can_save);
        assert_eq!(
            review.controls(),
            vec![
                ReviewControl::Share,
                ReviewControl::Save,
                ReviewControl::Discard
            ]
        );

        let mut without_library = resolved(&[Capability::Camera, Capability::Microphone]);
        without_library.finish_recording(clip.clone());
        let Screen::Review(review) = Screen::for_state(&without_library) else {
            panic!("expected review");
        };
        assert!(!review.can_save);
        assert_eq!(
            review.controls(),
            vec![ReviewControl::Share, ReviewControl::Discard]
        );
        assert_eq!(review.clip, clip);
    }
}
