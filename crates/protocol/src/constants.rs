use serde::{Deserialize, Serialize};

/// Protocol version shared by both processes. Bumped on any breaking
/// change to the message set.
pub const PROTOCOL_VERSION: u32 = 1;

/// Every message type exchanged between the detector/transfer process and
/// the control process.
///
/// The set is closed: a JSON `type` string outside this enum fails
/// deserialization rather than being silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    // Detector -> control
    FolderFinished,
    StartCapture,
    StopCapture,
    TransferProgress,
    TransferFinished,
    TransferError,

    // Control surface -> control
    UploadCapture,
    PendingUploadsQuery,
    RequeueOnRestart,
    NotificationCount,

    // Control -> detector / observers
    StartTransfer,
    StatusChanged,
    CaptureStatus,
    NotificationCountChanged,

    Error,
}

impl MessageType {
    /// Returns the kebab-case wire name of this message type.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::FolderFinished => "folder-finished",
            MessageType::StartCapture => "start-capture",
            MessageType::StopCapture => "stop-capture",
            MessageType::TransferProgress => "transfer-progress",
            MessageType::TransferFinished => "transfer-finished",
            MessageType::TransferError => "transfer-error",
            MessageType::UploadCapture => "upload-capture",
            MessageType::PendingUploadsQuery => "pending-uploads-query",
            MessageType::RequeueOnRestart => "requeue-on-restart",
            MessageType::NotificationCount => "notification-count",
            MessageType::StartTransfer => "start-transfer",
            MessageType::StatusChanged => "status-changed",
            MessageType::CaptureStatus => "capture-status",
            MessageType::NotificationCountChanged => "notification-count-changed",
            MessageType::Error => "error",
        }
    }
}

impl std::fmt::Display for MessageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
