//! Control-process event loop.
//!
//! Holds the orchestrator's authoritative state. Inbound envelopes are
//! applied one at a time through the orchestrator's transition function;
//! outbound requests are published on the outbound channel. This single
//! consumer is the serialization point that keeps stale reports from
//! racing a newer session.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use scrimsync_protocol::envelope::Message;
use scrimsync_uploader::{Orchestrator, Outbound};

use crate::codec::{decode_signal, encode_outbound};

/// Runs the control loop until the inbound channel closes or `cancel`
/// fires.
pub async fn run(
    mut orchestrator: Orchestrator,
    mut inbound: mpsc::Receiver<Message>,
    outbound: mpsc::Sender<Message>,
    cancel: CancellationToken,
) {
    // Requeue anything interrupted by the previous shutdown.
    for out in orchestrator.recover_persisted() {
        publish(&outbound, &out).await;
    }

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("control loop stopping");
                break;
            }
            msg = inbound.recv() => {
                let Some(msg) = msg else { break };
                let signal = match decode_signal(&msg) {
                    Ok(s) => s,
                    Err(e) => {
                        warn!(id = %msg.id, kind = %msg.msg_type, error = %e, "rejecting message");
                        let _ = outbound.send(msg.reply_error(400, e.to_string())).await;
                        continue;
                    }
                };
                for out in orchestrator.handle(signal) {
                    publish(&outbound, &out).await;
                }
            }
        }
    }
}

async fn publish(tx: &mpsc::Sender<Message>, out: &Outbound) {
    match encode_outbound(out) {
        Ok(msg) => {
            if tx.send(msg).await.is_err() {
                warn!("outbound channel closed");
            }
        }
        Err(e) => warn!(error = %e, "failed to encode outbound message"),
    }
}
