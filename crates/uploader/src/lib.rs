//! Capture upload orchestration.
//!
//! Decides which finished capture folders get uploaded, in what order,
//! with what retry behavior, and how progress and errors are surfaced.
//! The orchestrator owns the pending queue and the single in-flight
//! session; every incoming signal is applied through one serialized
//! transition function.

mod orchestrator;
mod persist;
mod queue;
mod session;

pub use orchestrator::{Orchestrator, Outbound, Signal, UploadState};
pub use persist::StateStore;
pub use queue::UploadQueue;
pub use session::{SessionError, SessionTracker};
