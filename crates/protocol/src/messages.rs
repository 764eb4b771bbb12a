use serde::{Deserialize, Serialize};

use crate::types::{CaptureFolderRef, StatusSnapshot};

// ---------------------------------------------------------------------------
// Detector -> control
// ---------------------------------------------------------------------------

/// The capture watcher finished writing a match recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderFinishedEvent {
    pub folder: String,
    pub user_id: String,
}

/// Capture started; `scale` is a resolution hint for preview rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartCaptureEvent {
    #[serde(default, skip_serializing_if = "is_zero_f64")]
    pub scale: f64,
}

/// Transfer engine progress report for the in-flight upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferProgressEvent {
    pub folder: String,
    pub user_id: String,
    /// Fraction in `[0, 1]`. May regress on approximate reporting; the
    /// session tracker clamps rather than rejects.
    pub progress: f64,
}

/// Transfer engine completed the in-flight upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferFinishedEvent {
    pub folder: String,
    pub user_id: String,
}

/// Transfer engine failed the in-flight upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferErrorEvent {
    pub folder: String,
    pub user_id: String,
    pub error: String,
}

// ---------------------------------------------------------------------------
// Control surface -> control
// ---------------------------------------------------------------------------

/// Explicit user-initiated upload of a finished capture (manual mode).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadCaptureRequest {
    pub folder: String,
    pub user_id: String,
}

/// Notification badge count from the notification subsystem, passed
/// through unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationCountEvent {
    pub count: u32,
}

// ---------------------------------------------------------------------------
// Control -> detector / observers
// ---------------------------------------------------------------------------

/// Instructs the transfer engine to begin uploading a capture folder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartTransferRequest {
    pub folder: String,
    pub user_id: String,
    /// Upload rate limit in KiB/s; 0 means unlimited. Opaque to the
    /// orchestrator, interpreted only by the transfer engine.
    #[serde(default, skip_serializing_if = "is_zero_u32")]
    pub bandwidth_cap: u32,
}

/// Pushed to observers whenever the orchestrator's state changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangedEvent {
    #[serde(flatten)]
    pub status: StatusSnapshot,
}

/// Capture tracking state fan-out for UI observers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureStatusEvent {
    pub capturing: bool,
    #[serde(default, skip_serializing_if = "is_zero_f64")]
    pub scale: f64,
}

impl From<FolderFinishedEvent> for CaptureFolderRef {
    fn from(e: FolderFinishedEvent) -> Self {
        CaptureFolderRef::new(e.folder, e.user_id)
    }
}

impl From<UploadCaptureRequest> for CaptureFolderRef {
    fn from(r: UploadCaptureRequest) -> Self {
        CaptureFolderRef::new(r.folder, r.user_id)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn is_zero_f64(v: &f64) -> bool {
    *v == 0.0
}

fn is_zero_u32(v: &u32) -> bool {
    *v == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CurrentUploadSnapshot, UploadMode};

    #[test]
    fn folder_finished_camel_case() {
        let evt = FolderFinishedEvent {
            folder: "/captures/match-01".into(),
            user_id: "u1".into(),
        };
        let json = serde_json::to_string(&evt).unwrap();
        assert!(json.contains("\"userId\":\"u1\""));
        let parsed: FolderFinishedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, evt);
    }

    #[test]
    fn start_transfer_omits_unlimited_cap() {
        let req = StartTransferRequest {
            folder: "m1".into(),
            user_id: "u1".into(),
            bandwidth_cap: 0,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("bandwidthCap"));

        let req = StartTransferRequest {
            bandwidth_cap: 512,
            ..req
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(json.contains("\"bandwidthCap\":512"));
    }

    #[test]
    fn status_changed_flattens_snapshot() {
        let evt = StatusChangedEvent {
            status: StatusSnapshot {
                queue_length: 2,
                current_upload: Some(CurrentUploadSnapshot {
                    folder: "m1".into(),
                    user_id: "u1".into(),
                    progress: 0.25,
                    error: None,
                }),
                mode: UploadMode::Manual,
            },
        };
        let json = serde_json::to_string(&evt).unwrap();
        // Flattened: no nested "status" object on the wire.
        assert!(!json.contains("\"status\""));
        assert!(json.contains("\"queueLength\":2"));
        assert!(json.contains("\"mode\":\"manual\""));
        let parsed: StatusChangedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, evt);
    }

    #[test]
    fn transfer_error_roundtrip() {
        let evt = TransferErrorEvent {
            folder: "m2".into(),
            user_id: "u1".into(),
            error: "network down".into(),
        };
        let json = serde_json::to_string(&evt).unwrap();
        let parsed: TransferErrorEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, evt);
    }

    #[test]
    fn capture_status_omits_zero_scale() {
        let evt = CaptureStatusEvent {
            capturing: false,
            scale: 0.0,
        };
        let json = serde_json::to_string(&evt).unwrap();
        assert!(!json.contains("scale"));
    }

    #[test]
    fn folder_ref_from_event() {
        let evt = FolderFinishedEvent {
            folder: "m1".into(),
            user_id: "u1".into(),
        };
        let r: CaptureFolderRef = evt.into();
        assert_eq!(r, CaptureFolderRef::new("m1", "u1"));
    }
}
