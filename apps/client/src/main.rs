//! ScrimSync client entry point.
//!
//! Wires the two logical processes together: the control loop holding
//! the orchestrator's state, and the detector/transfer side reporting
//! back over the typed message contract.

mod codec;
mod config;
mod console;
mod control;
mod detector;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use scrimsync_protocol::constants::MessageType;
use scrimsync_protocol::envelope::Message;
use scrimsync_protocol::messages::StatusChangedEvent;
use scrimsync_uploader::{Orchestrator, StateStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), "starting ScrimSync client");

    // Load configuration.
    let client_config = match config::ClientConfig::load() {
        Ok(c) => {
            info!(mode = ?c.mode, cap = c.bandwidth_cap, "configuration loaded");
            c
        }
        Err(e) => {
            warn!(error = %e, "failed to load config, using defaults");
            config::ClientConfig::default()
        }
    };

    let store = StateStore::new(client_config.state_file_path()?);
    let orchestrator = Orchestrator::new(client_config.mode, client_config.bandwidth_cap)
        .with_state_store(store);

    let (to_control_tx, to_control_rx) = mpsc::channel::<Message>(64);
    let (from_control_tx, from_control_rx) = mpsc::channel::<Message>(64);
    let (to_detector_tx, to_detector_rx) = mpsc::channel::<Message>(16);
    let cancel = CancellationToken::new();

    let control_handle = tokio::spawn(control::run(
        orchestrator,
        to_control_rx,
        from_control_tx,
        cancel.clone(),
    ));
    tokio::spawn(detector::run(
        to_detector_rx,
        to_control_tx.clone(),
        cancel.clone(),
    ));
    tokio::spawn(route_outbound(from_control_rx, to_detector_tx, cancel.clone()));
    tokio::spawn(console::run(to_control_tx, cancel.clone()));

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("interrupt received"),
        _ = cancel.cancelled() => {}
    }
    cancel.cancel();
    let _ = control_handle.await;
    info!("shut down");
    Ok(())
}

/// Fans control-process output out to its consumers: transfer requests
/// go to the detector side, status messages to the observer log.
async fn route_outbound(
    mut from_control: mpsc::Receiver<Message>,
    to_detector: mpsc::Sender<Message>,
    cancel: CancellationToken,
) {
    loop {
        let msg = tokio::select! {
            _ = cancel.cancelled() => break,
            msg = from_control.recv() => match msg {
                Some(m) => m,
                None => break,
            },
        };

        match msg.msg_type {
            MessageType::StartTransfer => {
                if to_detector.send(msg).await.is_err() {
                    break;
                }
            }
            MessageType::StatusChanged => {
                if let Ok(Some(evt)) = msg.parse_payload::<StatusChangedEvent>() {
                    match &evt.status.current_upload {
                        Some(cur) if cur.error.is_some() => info!(
                            folder = %cur.folder,
                            queued = evt.status.queue_length,
                            error = cur.error.as_deref().unwrap_or_default(),
                            "upload error, will keep retrying"
                        ),
                        Some(cur) => info!(
                            folder = %cur.folder,
                            progress = cur.progress,
                            queued = evt.status.queue_length,
                            "uploading"
                        ),
                        None => info!(queued = evt.status.queue_length, "up to date"),
                    }
                }
            }
            MessageType::CaptureStatus => {
                info!("capture status changed");
            }
            MessageType::NotificationCountChanged => {
                info!("notification count changed");
            }
            MessageType::Error => {
                if let Some(err) = &msg.error {
                    warn!(id = %msg.id, code = err.code, message = %err.message, "control rejected message");
                }
            }
            other => warn!(kind = %other, "unexpected control output"),
        }
    }
}
