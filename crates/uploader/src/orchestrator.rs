use tracing::{debug, info, warn};

use scrimsync_protocol::types::{CaptureFolderRef, StatusSnapshot, UploadMode};

use crate::persist::StateStore;
use crate::queue::UploadQueue;
use crate::session::SessionTracker;

/// Inbound signals consumed by the orchestrator.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// The capture watcher finished a recording. Enqueues in automatic
    /// mode only.
    FolderFinished(CaptureFolderRef),
    /// Explicit user-initiated upload. Enqueues regardless of mode.
    UploadCapture(CaptureFolderRef),
    StartCapture { scale: f64 },
    StopCapture,
    TransferProgress { item: CaptureFolderRef, progress: f64 },
    TransferFinished(CaptureFolderRef),
    TransferError { item: CaptureFolderRef, error: String },
    PendingUploadsQuery,
    /// Re-inserts any surviving in-flight item at the queue head.
    RequeueOnRestart,
    NotificationCount(u32),
}

/// Outbound requests produced by a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    StartTransfer {
        item: CaptureFolderRef,
        bandwidth_cap: u32,
    },
    StatusChanged(StatusSnapshot),
    CaptureStatus { capturing: bool, scale: f64 },
    NotificationCountChanged(u32),
}

/// Observable orchestrator state, derived from the session tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    /// No active session; the queue may or may not be empty.
    Idle,
    /// Active session, no error recorded.
    Uploading,
    /// Active session with an error recorded, awaiting requeue or retry.
    UploadFailing,
}

/// The state machine tying the capture watcher's signals, the pending
/// queue, the session tracker, and the transfer engine together.
///
/// All mutation goes through [`handle`](Self::handle); callers must
/// serialize invocations (a single-consumer event loop or a mutex), so
/// each signal is applied atomically against the current session.
pub struct Orchestrator {
    queue: UploadQueue,
    tracker: SessionTracker,
    mode: UploadMode,
    bandwidth_cap: u32,
    store: Option<StateStore>,
}

impl Orchestrator {
    pub fn new(mode: UploadMode, bandwidth_cap: u32) -> Self {
        Self {
            queue: UploadQueue::new(),
            tracker: SessionTracker::new(),
            mode,
            bandwidth_cap,
            store: None,
        }
    }

    /// Attaches an on-disk record of the in-flight upload, consulted by
    /// [`recover_persisted`](Self::recover_persisted) and maintained
    /// across transfer start/completion.
    pub fn with_state_store(mut self, store: StateStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn mode(&self) -> UploadMode {
        self.mode
    }

    /// Applies a mode change from the user's settings toggle. Queue and
    /// session semantics are unaffected; only admission on
    /// folder-finished changes.
    pub fn set_mode(&mut self, mode: UploadMode) {
        self.mode = mode;
    }

    pub fn set_bandwidth_cap(&mut self, cap: u32) {
        self.bandwidth_cap = cap;
    }

    /// Current state, derived from the session tracker.
    pub fn state(&self) -> UploadState {
        if !self.tracker.is_active() {
            UploadState::Idle
        } else if self.tracker.is_failing() {
            UploadState::UploadFailing
        } else {
            UploadState::Uploading
        }
    }

    /// Snapshot served to status observers.
    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            queue_length: self.queue.len(),
            current_upload: self.tracker.snapshot(),
            mode: self.mode,
        }
    }

    /// Requeues an upload that was in flight when the previous run shut
    /// down, then starts it if nothing else is pending ahead of it.
    ///
    /// Call once at startup, before the event loop.
    pub fn recover_persisted(&mut self) -> Vec<Outbound> {
        let mut out = Vec::new();
        let Some(store) = &self.store else {
            return out;
        };
        if let Some(item) = store.load() {
            info!(folder = %item.folder, user = %item.user_id, "requeuing upload interrupted by shutdown");
            self.queue.requeue_front(item);
            if let Err(e) = store.clear() {
                warn!(error = %e, "failed to clear upload state");
            }
            self.push_status(&mut out);
            self.try_start_next(&mut out);
        }
        out
    }

    /// The single serialized transition function. Applies one signal
    /// atomically and returns the outbound requests it produced.
    pub fn handle(&mut self, signal: Signal) -> Vec<Outbound> {
        let mut out = Vec::new();
        match signal {
            Signal::FolderFinished(item) => {
                if self.mode == UploadMode::Manual {
                    debug!(folder = %item.folder, "manual mode, not auto-enqueuing finished capture");
                } else {
                    self.admit(item, &mut out);
                }
            }
            Signal::UploadCapture(item) => {
                self.admit(item, &mut out);
            }
            Signal::StartCapture { scale } => {
                out.push(Outbound::CaptureStatus {
                    capturing: true,
                    scale,
                });
            }
            Signal::StopCapture => {
                out.push(Outbound::CaptureStatus {
                    capturing: false,
                    scale: 0.0,
                });
            }
            Signal::TransferProgress { item, progress } => {
                match self.tracker.update_progress(&item, progress) {
                    Ok(()) => self.push_status(&mut out),
                    Err(e) => {
                        warn!(folder = %item.folder, error = %e, "dropping stale progress report");
                    }
                }
            }
            Signal::TransferFinished(item) => match self.tracker.mark_finished(&item) {
                Ok(()) => {
                    info!(folder = %item.folder, user = %item.user_id, "upload completed");
                    self.clear_persisted();
                    self.push_status(&mut out);
                    self.try_start_next(&mut out);
                }
                Err(e) => {
                    warn!(folder = %item.folder, error = %e, "dropping stale completion report");
                }
            },
            Signal::TransferError { item, error } => {
                match self.tracker.mark_errored(&item, error.clone()) {
                    Ok(()) => {
                        warn!(folder = %item.folder, error = %error, "upload failed, keeping item in flight");
                        self.push_status(&mut out);
                    }
                    Err(e) => {
                        warn!(folder = %item.folder, error = %e, "dropping stale error report");
                    }
                }
            }
            Signal::PendingUploadsQuery => {
                out.push(Outbound::StatusChanged(self.snapshot()));
            }
            Signal::RequeueOnRestart => {
                if let Some(item) = self.tracker.take() {
                    info!(folder = %item.folder, "requeuing in-flight upload at queue head");
                    self.queue.requeue_front(item);
                    self.clear_persisted();
                    self.push_status(&mut out);
                    self.try_start_next(&mut out);
                } else {
                    debug!("requeue requested with nothing in flight");
                }
            }
            Signal::NotificationCount(count) => {
                out.push(Outbound::NotificationCountChanged(count));
            }
        }
        out
    }

    /// Idempotent admission: a duplicate of the in-flight item or of a
    /// queued entry is a no-op.
    fn admit(&mut self, item: CaptureFolderRef, out: &mut Vec<Outbound>) {
        if self.tracker.current_item() == Some(&item) {
            debug!(folder = %item.folder, "already uploading, ignoring duplicate");
            return;
        }
        if !self.queue.enqueue(item.clone()) {
            debug!(folder = %item.folder, "already queued, ignoring duplicate");
            return;
        }
        info!(folder = %item.folder, user = %item.user_id, depth = self.queue.len(), "capture queued for upload");
        self.push_status(out);
        self.try_start_next(out);
    }

    /// Starts the queue head when no transfer is in progress. The
    /// orchestrator is self-driving: this runs after every transition
    /// that returns to idle.
    fn try_start_next(&mut self, out: &mut Vec<Outbound>) {
        if self.tracker.is_active() {
            return;
        }
        let Some(item) = self.queue.dequeue_next() else {
            return;
        };
        if let Err(e) = self.tracker.begin(item.clone()) {
            // Unreachable after the is_active check; restore the head
            // rather than lose the item.
            warn!(folder = %item.folder, error = %e, "begin rejected, restoring queue head");
            self.queue.requeue_front(item);
            return;
        }
        if let Some(store) = &self.store {
            if let Err(e) = store.record(&item) {
                warn!(error = %e, "failed to persist upload state");
            }
        }
        info!(folder = %item.folder, user = %item.user_id, cap = self.bandwidth_cap, "starting transfer");
        out.push(Outbound::StartTransfer {
            item,
            bandwidth_cap: self.bandwidth_cap,
        });
        self.push_status(out);
    }

    fn push_status(&self, out: &mut Vec<Outbound>) {
        out.push(Outbound::StatusChanged(self.snapshot()));
    }

    fn clear_persisted(&self) {
        if let Some(store) = &self.store {
            if let Err(e) = store.clear() {
                warn!(error = %e, "failed to clear upload state");
            }
        }
    }
}
