//! Line-based developer console standing in for the capture watcher and
//! the UI control surface.
//!
//! Commands:
//! - `finish <folder> [user]`: watcher reports a finished capture
//! - `upload <folder> [user]`: explicit user-initiated upload
//! - `status`: query pending uploads
//! - `requeue`: re-insert the in-flight item at the queue head
//! - `start` / `stop`: capture tracking signals
//! - `quit`: shut the client down

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use scrimsync_protocol::constants::MessageType;
use scrimsync_protocol::envelope::Message;
use scrimsync_protocol::messages::{FolderFinishedEvent, UploadCaptureRequest};

const DEFAULT_USER: &str = "local";

/// Reads commands from stdin until EOF, `quit`, or cancellation.
pub async fn run(to_control: mpsc::Sender<Message>, cancel: CancellationToken) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            _ = cancel.cancelled() => break,
            line = lines.next_line() => match line {
                Ok(Some(l)) => l,
                Ok(None) | Err(_) => break,
            },
        };

        let Some(msg) = parse_command(&line) else {
            if line.trim() == "quit" {
                cancel.cancel();
                break;
            }
            if !line.trim().is_empty() {
                warn!(input = %line.trim(), "unrecognized command");
            }
            continue;
        };
        if to_control.send(msg).await.is_err() {
            break;
        }
    }
}

fn parse_command(line: &str) -> Option<Message> {
    let mut parts = line.split_whitespace();
    let id = uuid::Uuid::new_v4().to_string();

    match parts.next()? {
        "finish" => {
            let folder = parts.next()?;
            let user = parts.next().unwrap_or(DEFAULT_USER);
            Message::new(
                id,
                MessageType::FolderFinished,
                Some(&FolderFinishedEvent {
                    folder: folder.into(),
                    user_id: user.into(),
                }),
            )
            .ok()
        }
        "upload" => {
            let folder = parts.next()?;
            let user = parts.next().unwrap_or(DEFAULT_USER);
            Message::new(
                id,
                MessageType::UploadCapture,
                Some(&UploadCaptureRequest {
                    folder: folder.into(),
                    user_id: user.into(),
                }),
            )
            .ok()
        }
        "status" => Message::new::<()>(id, MessageType::PendingUploadsQuery, None).ok(),
        "requeue" => Message::new::<()>(id, MessageType::RequeueOnRestart, None).ok(),
        "start" => Message::new::<()>(id, MessageType::StartCapture, None).ok(),
        "stop" => Message::new::<()>(id, MessageType::StopCapture, None).ok(),
        _ => None,
    }
}
