//! Translation between wire envelopes and orchestrator signals.
//!
//! The contract is closed: an envelope whose type or payload shape does
//! not match is rejected with an error, never silently ignored.

use scrimsync_protocol::constants::MessageType;
use scrimsync_protocol::envelope::Message;
use scrimsync_protocol::messages::{
    CaptureStatusEvent, FolderFinishedEvent, NotificationCountEvent, StartCaptureEvent,
    StartTransferRequest, StatusChangedEvent, TransferErrorEvent, TransferFinishedEvent,
    TransferProgressEvent, UploadCaptureRequest,
};
use scrimsync_protocol::types::CaptureFolderRef;
use scrimsync_uploader::{Outbound, Signal};

/// Errors produced while decoding an inbound envelope.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("missing payload for {0}")]
    MissingPayload(MessageType),

    #[error("{0} is not an inbound signal")]
    NotInbound(MessageType),
}

fn required<T: for<'de> serde::Deserialize<'de>>(msg: &Message) -> Result<T, DecodeError> {
    msg.parse_payload::<T>()?
        .ok_or(DecodeError::MissingPayload(msg.msg_type))
}

/// Decodes an inbound envelope into an orchestrator signal.
pub fn decode_signal(msg: &Message) -> Result<Signal, DecodeError> {
    match msg.msg_type {
        MessageType::FolderFinished => {
            let evt: FolderFinishedEvent = required(msg)?;
            Ok(Signal::FolderFinished(evt.into()))
        }
        MessageType::UploadCapture => {
            let req: UploadCaptureRequest = required(msg)?;
            Ok(Signal::UploadCapture(req.into()))
        }
        MessageType::StartCapture => {
            // Payload is optional; a bare start-capture carries no hint.
            let scale = msg
                .parse_payload::<StartCaptureEvent>()?
                .map(|e| e.scale)
                .unwrap_or(0.0);
            Ok(Signal::StartCapture { scale })
        }
        MessageType::StopCapture => Ok(Signal::StopCapture),
        MessageType::TransferProgress => {
            let evt: TransferProgressEvent = required(msg)?;
            Ok(Signal::TransferProgress {
                item: CaptureFolderRef::new(evt.folder, evt.user_id),
                progress: evt.progress,
            })
        }
        MessageType::TransferFinished => {
            let evt: TransferFinishedEvent = required(msg)?;
            Ok(Signal::TransferFinished(CaptureFolderRef::new(
                evt.folder,
                evt.user_id,
            )))
        }
        MessageType::TransferError => {
            let evt: TransferErrorEvent = required(msg)?;
            Ok(Signal::TransferError {
                item: CaptureFolderRef::new(evt.folder, evt.user_id),
                error: evt.error,
            })
        }
        MessageType::PendingUploadsQuery => Ok(Signal::PendingUploadsQuery),
        MessageType::RequeueOnRestart => Ok(Signal::RequeueOnRestart),
        MessageType::NotificationCount => {
            let evt: NotificationCountEvent = required(msg)?;
            Ok(Signal::NotificationCount(evt.count))
        }
        other => Err(DecodeError::NotInbound(other)),
    }
}

/// Encodes an orchestrator outbound request as a wire envelope.
pub fn encode_outbound(out: &Outbound) -> Result<Message, serde_json::Error> {
    let id = uuid::Uuid::new_v4().to_string();
    match out {
        Outbound::StartTransfer {
            item,
            bandwidth_cap,
        } => Message::new(
            id,
            MessageType::StartTransfer,
            Some(&StartTransferRequest {
                folder: item.folder.clone(),
                user_id: item.user_id.clone(),
                bandwidth_cap: *bandwidth_cap,
            }),
        ),
        Outbound::StatusChanged(status) => Message::new(
            id,
            MessageType::StatusChanged,
            Some(&StatusChangedEvent {
                status: status.clone(),
            }),
        ),
        Outbound::CaptureStatus { capturing, scale } => Message::new(
            id,
            MessageType::CaptureStatus,
            Some(&CaptureStatusEvent {
                capturing: *capturing,
                scale: *scale,
            }),
        ),
        Outbound::NotificationCountChanged(count) => Message::new(
            id,
            MessageType::NotificationCountChanged,
            Some(&NotificationCountEvent { count: *count }),
        ),
    }
}
