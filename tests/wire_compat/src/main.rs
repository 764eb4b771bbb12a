fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use scrimsync_protocol::constants::MessageType;
    use scrimsync_protocol::envelope::Message;
    use scrimsync_protocol::messages::{StartTransferRequest, StatusChangedEvent};
    use scrimsync_protocol::types::StatusSnapshot;

    /// Returns the path to the fixtures directory.
    fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Loads a fixture file as raw JSON text.
    ///
    /// Fixtures are envelopes captured from the legacy JS client, so these
    /// tests pin the exact shapes both processes exchange.
    fn load_fixture(name: &str) -> String {
        let path = fixtures_dir().join(name);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("failed to read fixture {}: {e}", path.display()))
    }

    /// Deserializes a fixture into a Rust type, re-serializes it, and
    /// compares the JSON values (order-independent comparison).
    ///
    /// Roundtrips through strings because envelope payloads are
    /// `RawValue`, which only deserializes from JSON text.
    fn roundtrip_test<T>(name: &str)
    where
        T: serde::de::DeserializeOwned + serde::Serialize,
    {
        let raw = load_fixture(name);
        let parsed: T = serde_json::from_str(&raw)
            .unwrap_or_else(|e| panic!("failed to deserialize {name}: {e}"));
        let reserialized = serde_json::to_string(&parsed)
            .unwrap_or_else(|e| panic!("failed to re-serialize {name}: {e}"));

        let fixture: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let output: serde_json::Value = serde_json::from_str(&reserialized).unwrap();
        assert_eq!(
            fixture, output,
            "roundtrip mismatch for {name}:\n  fixture: {raw}\n  rust:    {reserialized}"
        );
    }

    // --- Envelope fixtures ---

    #[test]
    fn fixture_folder_finished() {
        roundtrip_test::<Message>("folder_finished.json");
    }

    #[test]
    fn fixture_start_transfer() {
        roundtrip_test::<Message>("start_transfer.json");
    }

    #[test]
    fn fixture_transfer_progress() {
        roundtrip_test::<Message>("transfer_progress.json");
    }

    #[test]
    fn fixture_transfer_error() {
        roundtrip_test::<Message>("transfer_error.json");
    }

    #[test]
    fn fixture_status_changed() {
        roundtrip_test::<Message>("status_changed.json");
    }

    #[test]
    fn fixture_error_envelope() {
        roundtrip_test::<Message>("error_envelope.json");
    }

    #[test]
    fn fixture_pending_uploads_query() {
        roundtrip_test::<Message>("pending_uploads_query.json");
    }

    // --- Payload semantics ---

    #[test]
    fn start_transfer_payload_fields() {
        let raw = load_fixture("start_transfer.json");
        let msg: Message = serde_json::from_str(&raw).unwrap();
        assert_eq!(msg.msg_type, MessageType::StartTransfer);

        let req: StartTransferRequest = msg.parse_payload().unwrap().unwrap();
        assert_eq!(req.folder, "/captures/match-2026-08-25-01");
        assert_eq!(req.user_id, "u-4821");
        assert_eq!(req.bandwidth_cap, 512);
    }

    #[test]
    fn status_changed_payload_is_flat() {
        let raw = load_fixture("status_changed.json");
        let msg: Message = serde_json::from_str(&raw).unwrap();
        let evt: StatusChangedEvent = msg.parse_payload().unwrap().unwrap();

        assert_eq!(evt.status.queue_length, 2);
        let cur = evt.status.current_upload.unwrap();
        assert_eq!(cur.progress, 0.5);
        assert_eq!(cur.error.as_deref(), Some("network down"));
    }

    #[test]
    fn status_snapshot_typed_fixture() {
        roundtrip_test::<StatusSnapshot>("status_snapshot.json");
    }

    // --- Contract closure ---

    #[test]
    fn unknown_message_type_rejected() {
        let json = r#"{"id":"x-1","type":"open-settings-page","payload":{}}"#;
        let result: Result<Message, _> = serde_json::from_str(json);
        assert!(
            result.is_err(),
            "unrecognized shapes must be rejected, not ignored"
        );
    }

    #[test]
    fn all_fixture_types_are_in_contract() {
        for entry in fs::read_dir(fixtures_dir()).unwrap() {
            let path = entry.unwrap().path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let raw = fs::read_to_string(&path).unwrap();
            let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
            // Envelope fixtures carry a type; typed payload fixtures don't.
            if let Some(t) = value.get("type") {
                let parsed: Result<MessageType, _> = serde_json::from_value(t.clone());
                assert!(
                    parsed.is_ok(),
                    "fixture {} uses unknown type {t}",
                    path.display()
                );
            }
        }
    }
}
