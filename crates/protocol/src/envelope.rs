use serde::{Deserialize, Serialize};

use crate::constants::MessageType;

/// Error details carried in an envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpcError {
    pub code: i32,
    pub message: String,
}

/// Envelope for all detector-control communication.
///
/// The `payload` field uses `serde_json::value::RawValue` to defer
/// deserialization until the message type has been matched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Box<serde_json::value::RawValue>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<IpcError>,
}

impl Message {
    /// Creates a new message with the given type and payload.
    pub fn new<T: Serialize>(
        id: impl Into<String>,
        msg_type: MessageType,
        payload: Option<&T>,
    ) -> Result<Self, serde_json::Error> {
        let raw = match payload {
            Some(p) => {
                let json = serde_json::to_string(p)?;
                Some(serde_json::value::RawValue::from_string(json)?)
            }
            None => None,
        };
        Ok(Self {
            id: id.into(),
            msg_type,
            payload: raw,
            error: None,
        })
    }

    /// Deserializes the payload into the given type.
    pub fn parse_payload<T: for<'de> Deserialize<'de>>(
        &self,
    ) -> Result<Option<T>, serde_json::Error> {
        match &self.payload {
            Some(raw) => Ok(Some(serde_json::from_str(raw.get())?)),
            None => Ok(None),
        }
    }

    /// Creates an error message.
    pub fn error(id: impl Into<String>, code: i32, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            msg_type: MessageType::Error,
            payload: None,
            error: Some(IpcError {
                code,
                message: message.into(),
            }),
        }
    }

    /// Creates a response message for this request.
    pub fn reply<T: Serialize>(
        &self,
        msg_type: MessageType,
        payload: Option<&T>,
    ) -> Result<Self, serde_json::Error> {
        Message::new(&self.id, msg_type, payload)
    }

    /// Creates an error response for this request.
    pub fn reply_error(&self, code: i32, message: impl Into<String>) -> Self {
        Message::error(&self.id, code, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::{FolderFinishedEvent, TransferProgressEvent};

    #[test]
    fn message_new_with_payload() {
        let payload = FolderFinishedEvent {
            folder: "/captures/m1".into(),
            user_id: "u1".into(),
        };
        let msg = Message::new("msg-1", MessageType::FolderFinished, Some(&payload)).unwrap();
        assert_eq!(msg.id, "msg-1");
        assert_eq!(msg.msg_type, MessageType::FolderFinished);
        assert!(msg.payload.is_some());
        assert!(msg.error.is_none());
    }

    #[test]
    fn message_new_without_payload() {
        let msg = Message::new::<()>("msg-2", MessageType::StopCapture, None).unwrap();
        assert!(msg.payload.is_none());
    }

    #[test]
    fn message_error_creation() {
        let msg = Message::error("msg-3", 400, "unrecognized message shape");
        assert_eq!(msg.msg_type, MessageType::Error);
        let err = msg.error.unwrap();
        assert_eq!(err.code, 400);
        assert_eq!(err.message, "unrecognized message shape");
    }

    #[test]
    fn message_parse_payload() {
        let evt = TransferProgressEvent {
            folder: "m1".into(),
            user_id: "u1".into(),
            progress: 0.5,
        };
        let msg = Message::new("m1", MessageType::TransferProgress, Some(&evt)).unwrap();
        let parsed: Option<TransferProgressEvent> = msg.parse_payload().unwrap();
        assert_eq!(parsed.unwrap(), evt);
    }

    #[test]
    fn message_json_roundtrip() {
        let msg = Message::error("e1", 500, "internal");
        let json = serde_json::to_string(&msg).unwrap();
        let parsed: Message = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.id, "e1");
        assert_eq!(parsed.msg_type, MessageType::Error);
        assert!(parsed.error.is_some());
        assert!(parsed.payload.is_none());
    }

    #[test]
    fn message_omits_null_fields() {
        let msg = Message::new::<()>("m1", MessageType::PendingUploadsQuery, None).unwrap();
        let json = serde_json::to_string(&msg).unwrap();
        assert!(!json.contains("payload"));
        assert!(!json.contains("error"));
    }

    #[test]
    fn unknown_message_type_rejected() {
        let json = r#"{"id":"x1","type":"open-settings-page"}"#;
        let result: Result<Message, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }

    #[test]
    fn reply_preserves_id() {
        let original = Message::new::<()>("req-42", MessageType::PendingUploadsQuery, None).unwrap();
        let reply = original
            .reply(
                MessageType::StatusChanged,
                Some(&serde_json::json!({"queueLength": 0, "mode": "automatic"})),
            )
            .unwrap();
        assert_eq!(reply.id, "req-42");
        assert_eq!(reply.msg_type, MessageType::StatusChanged);
    }

    #[test]
    fn reply_error_preserves_id() {
        let original = Message::new::<()>("req-99", MessageType::RequeueOnRestart, None).unwrap();
        let reply = original.reply_error(404, "no session");
        assert_eq!(reply.id, "req-99");
        assert_eq!(reply.msg_type, MessageType::Error);
    }
}
