use scrimsync_protocol::types::{CaptureFolderRef, CurrentUploadSnapshot};

/// Errors produced by the session tracker.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A `begin` was attempted while a session was already active.
    #[error("an upload session is already active")]
    AlreadyActive,

    /// A report did not match the active session identity. Dropped by the
    /// orchestrator with a diagnostic, never applied.
    #[error("report does not match the active session")]
    StaleUpdate,
}

#[derive(Debug, Clone)]
struct ActiveSession {
    item: CaptureFolderRef,
    progress: f64,
    error: Option<String>,
}

/// Tracks the single in-flight upload and enforces
/// at-most-one-concurrent-upload.
///
/// The session stays active after an error is recorded; clearing or
/// requeuing the failed item is the orchestrator's decision.
#[derive(Debug, Default)]
pub struct SessionTracker {
    active: Option<ActiveSession>,
}

impl SessionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitions from idle to active with zero progress and no error.
    pub fn begin(&mut self, item: CaptureFolderRef) -> Result<(), SessionError> {
        if self.active.is_some() {
            return Err(SessionError::AlreadyActive);
        }
        self.active = Some(ActiveSession {
            item,
            progress: 0.0,
            error: None,
        });
        Ok(())
    }

    /// Records a progress report for the active session.
    ///
    /// Progress is monotonically non-decreasing: a smaller value is
    /// clamped, not rejected, since transfer engines may report
    /// approximate fractions.
    pub fn update_progress(
        &mut self,
        item: &CaptureFolderRef,
        progress: f64,
    ) -> Result<(), SessionError> {
        let active = self.active_matching(item)?;
        if progress > active.progress {
            active.progress = progress;
        }
        Ok(())
    }

    /// Clears the active session on confirmed completion. The item is
    /// fully destroyed, not requeued.
    pub fn mark_finished(&mut self, item: &CaptureFolderRef) -> Result<(), SessionError> {
        self.active_matching(item)?;
        self.active = None;
        Ok(())
    }

    /// Records a transfer failure. The session stays active so observers
    /// keep seeing "uploading, with error".
    pub fn mark_errored(
        &mut self,
        item: &CaptureFolderRef,
        error: impl Into<String>,
    ) -> Result<(), SessionError> {
        let active = self.active_matching(item)?;
        active.error = Some(error.into());
        Ok(())
    }

    /// Removes and returns the in-flight item, if any. Used for requeue
    /// after an interruption; progress and error are discarded.
    pub fn take(&mut self) -> Option<CaptureFolderRef> {
        self.active.take().map(|s| s.item)
    }

    /// Whether a session is in progress.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Whether the active session has an error recorded.
    pub fn is_failing(&self) -> bool {
        self.active.as_ref().is_some_and(|s| s.error.is_some())
    }

    /// Identity of the in-flight item, if any.
    pub fn current_item(&self) -> Option<&CaptureFolderRef> {
        self.active.as_ref().map(|s| &s.item)
    }

    /// Snapshot of the in-flight upload for status observers.
    pub fn snapshot(&self) -> Option<CurrentUploadSnapshot> {
        self.active.as_ref().map(|s| CurrentUploadSnapshot {
            folder: s.item.folder.clone(),
            user_id: s.item.user_id.clone(),
            progress: s.progress,
            error: s.error.clone(),
        })
    }

    fn active_matching(
        &mut self,
        item: &CaptureFolderRef,
    ) -> Result<&mut ActiveSession, SessionError> {
        match self.active.as_mut() {
            Some(active) if active.item == *item => Ok(active),
            _ => Err(SessionError::StaleUpdate),
        }
    }
}
