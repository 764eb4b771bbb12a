use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use scrimsync_protocol::types::CaptureFolderRef;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    current_upload: Option<CaptureFolderRef>,
}

/// Minimal on-disk record of the in-flight upload.
///
/// Written when a transfer starts, cleared on confirmed completion. On the
/// next startup a surviving entry is requeued at the head of the pending
/// queue rather than resumed in place.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the in-flight item recorded at last shutdown, if any.
    ///
    /// A missing or unreadable file is treated as "nothing in flight";
    /// corruption here must never block startup.
    pub fn load(&self) -> Option<CaptureFolderRef> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "failed to read upload state");
                return None;
            }
        };
        match serde_json::from_str::<PersistedState>(&content) {
            Ok(state) => state.current_upload,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "discarding corrupt upload state");
                None
            }
        }
    }

    /// Records `item` as in flight.
    pub fn record(&self, item: &CaptureFolderRef) -> std::io::Result<()> {
        self.write(&PersistedState {
            current_upload: Some(item.clone()),
        })
    }

    /// Clears the in-flight record.
    pub fn clear(&self) -> std::io::Result<()> {
        self.write(&PersistedState::default())
    }

    fn write(&self, state: &PersistedState) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(state).map_err(std::io::Error::other)?;
        std::fs::write(&self.path, content)
    }
}
