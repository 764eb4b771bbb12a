use serde::{Deserialize, Serialize};

/// Identifies one finished recording awaiting upload.
///
/// Equality is by the `(folder, user_id)` pair; the upload queue relies on
/// this for idempotent admission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureFolderRef {
    /// Opaque path or identifier of the capture folder.
    pub folder: String,
    /// Owner of the recording.
    pub user_id: String,
}

impl CaptureFolderRef {
    pub fn new(folder: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
            user_id: user_id.into(),
        }
    }
}

impl std::fmt::Display for CaptureFolderRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}@{}", self.folder, self.user_id)
    }
}

/// Whether finished captures enqueue for upload automatically or wait for
/// an explicit user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadMode {
    #[default]
    Automatic,
    Manual,
}

/// Snapshot of the single in-flight upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUploadSnapshot {
    pub folder: String,
    pub user_id: String,
    /// Fraction in `[0, 1]`, monotonically non-decreasing while healthy.
    pub progress: f64,
    /// Set when the transfer engine reported a failure; the item stays
    /// in flight until requeued or retried.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Status snapshot pushed to observers on every state transition and in
/// answer to a pending-uploads query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub queue_length: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_upload: Option<CurrentUploadSnapshot>,
    pub mode: UploadMode,
}
