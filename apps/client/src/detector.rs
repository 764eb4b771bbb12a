//! Detector/transfer-process side of the channel.
//!
//! Consumes start-transfer requests from the control process and reports
//! progress, completion, and errors back over the same contract. The
//! byte-level transfer lives in the remote service SDK; this engine walks
//! progress at a fixed tick so the orchestration path is exercised end to
//! end. It accepts cancellation implicitly: once cancelled it simply
//! stops reporting, and the control side drops anything late as stale.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use scrimsync_protocol::constants::MessageType;
use scrimsync_protocol::envelope::Message;
use scrimsync_protocol::messages::{
    StartTransferRequest, TransferFinishedEvent, TransferProgressEvent,
};

const PROGRESS_STEPS: u32 = 4;
const STEP_INTERVAL: Duration = Duration::from_millis(250);

/// Runs the transfer engine loop until the channel closes or `cancel`
/// fires. Transfers are serviced one at a time; the control process
/// never issues a second start-transfer while one is in flight.
pub async fn run(
    mut transfers: mpsc::Receiver<Message>,
    reports: mpsc::Sender<Message>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("transfer engine stopping");
                break;
            }
            msg = transfers.recv() => {
                let Some(msg) = msg else { break };
                if msg.msg_type != MessageType::StartTransfer {
                    debug!(kind = %msg.msg_type, "transfer engine ignoring message");
                    continue;
                }
                let req = match msg.parse_payload::<StartTransferRequest>() {
                    Ok(Some(req)) => req,
                    Ok(None) | Err(_) => {
                        debug!(id = %msg.id, "malformed start-transfer request");
                        continue;
                    }
                };
                run_transfer(req, &reports, &cancel).await;
            }
        }
    }
}

async fn run_transfer(
    req: StartTransferRequest,
    reports: &mpsc::Sender<Message>,
    cancel: &CancellationToken,
) {
    info!(folder = %req.folder, user = %req.user_id, cap = req.bandwidth_cap, "transfer started");

    for step in 1..=PROGRESS_STEPS {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(STEP_INTERVAL) => {}
        }
        let progress = f64::from(step) / f64::from(PROGRESS_STEPS);
        let evt = TransferProgressEvent {
            folder: req.folder.clone(),
            user_id: req.user_id.clone(),
            progress,
        };
        if !send(reports, MessageType::TransferProgress, &evt).await {
            return;
        }
    }

    let evt = TransferFinishedEvent {
        folder: req.folder.clone(),
        user_id: req.user_id.clone(),
    };
    send(reports, MessageType::TransferFinished, &evt).await;
    info!(folder = %req.folder, "transfer finished");
}

async fn send<T: serde::Serialize>(
    reports: &mpsc::Sender<Message>,
    msg_type: MessageType,
    payload: &T,
) -> bool {
    let msg = match Message::new(uuid::Uuid::new_v4().to_string(), msg_type, Some(payload)) {
        Ok(m) => m,
        Err(e) => {
            debug!(error = %e, "failed to encode transfer report");
            return false;
        }
    };
    reports.send(msg).await.is_ok()
}
