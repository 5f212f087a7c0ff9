use chrono::Utc;
use log::{debug, info, warn};
use tokio::sync::mpsc::{Receiver, Sender};

pub mod recognizers;
pub mod structs;
pub mod utils;

pub use structs::{Recognizer, ScanEvent, ScanFields, ScanResult};

/// Recognizers in the order they are consulted, the first hit wins
pub const RECOGNIZERS: [Recognizer; 3] = [
    Recognizer { name: "structured", recognize: recognizers::recognize_structured },
    Recognizer { name: "key-value", recognize: recognizers::recognize_key_value },
    Recognizer { name: "bare", recognize: recognizers::recognize_bare },
];

/// Runs the recognizers against the trimmed payload and returns the result of
/// the first one that matches. A payload nobody recognizes gives a result that
/// only carries `raw`.
pub fn first_match(raw: &str, recognizers: &[Recognizer]) -> ScanResult {
    let raw = utils::trim_payload(raw);

    for recognizer in recognizers {
        if let Some(fields) = (recognizer.recognize)(raw) {
            debug!("Payload {:?} recognized by {}", raw, recognizer.name);
            return ScanResult { raw: raw.to_string(), fields };
        }
    }

    debug!("Payload {:?} not recognized", raw);
    ScanResult::unrecognized(raw)
}

pub fn interpret(raw: &str) -> ScanResult {
    first_match(raw, &RECOGNIZERS)
}

/// Scan session: turns decoded payloads into scan events
pub struct ScanManager {
    sender: Sender<ScanEvent>,
}

impl ScanManager {
    pub fn new(sender: Sender<ScanEvent>) -> Self {
        Self { sender }
    }

    pub async fn start_thread(&mut self, mut receiver: Receiver<String>) {
        info!("Starting scan session");

        while let Some(payload) = receiver.recv().await {
            if utils::trim_payload(&payload).is_empty() {
                debug!("Skipping empty scan payload");
                continue;
            }

            let result = interpret(&payload);
            if result.is_unrecognized() {
                info!("Scan {:?} carries no recognizable data", result.raw);
            } else {
                info!("Scan {:?} -> {:?}", result.raw, result.fields);
            }

            let event = ScanEvent { result, scanned_at: Utc::now() };
            if self.sender.send(event).await.is_err() {
                warn!("Scan consumer is gone, closing the scan session");
                return;
            }
        }

        info!("Scan input closed, scan session finished");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpret_is_idempotent() {
        for s in ["AST-1234", "SN:XYZ789, MAC:112233445566", "hello world!", r#"{"type":"asset","id":"AST-0007"}"#] {
            assert_eq!(interpret(s), interpret(s));
        }
    }

    #[test]
    fn test_raw_is_trimmed_input() {
        for s in ["  AST-9999  ", "\tSN-ABC123\n", "hello world!", " {\"a\":1} "] {
            assert_eq!(interpret(s).raw, s.trim());
        }
    }

    #[test]
    fn test_json_takes_precedence() {
        let result = interpret(r#"{"type":"asset","id":"AST-0007","sn":"SN123"}"#);
        assert_eq!(result.id(), Some("AST-0007"));
        assert_eq!(result.serial_number(), Some("SN123"));
        assert_eq!(result.mac_address(), None);
        assert_eq!(result.name(), None);
    }

    #[test]
    fn test_key_value_mac_normalized() {
        let result = interpret("MAC: aa:bb:cc:dd:ee:ff");
        assert_eq!(result.mac_address(), Some("AABBCCDDEEFF"));
        assert_eq!(result.serial_number(), None);
    }

    #[test]
    fn test_key_value_multi_field() {
        let result = interpret("SN:XYZ789, MAC:112233445566");
        assert_eq!(result.serial_number(), Some("XYZ789"));
        assert_eq!(result.mac_address(), Some("112233445566"));
        assert_eq!(result.id(), None);
    }

    #[test]
    fn test_bare_asset_id() {
        let result = interpret("AST-1234");
        assert_eq!(result.id(), Some("AST-1234"));
        assert_eq!(result.serial_number(), None);
        assert_eq!(result.mac_address(), None);
        assert_eq!(result.name(), None);
    }

    #[test]
    fn test_bare_mac_forms() {
        assert_eq!(interpret("AA:BB:CC:DD:EE:FF").mac_address(), Some("AABBCCDDEEFF"));
        let result = interpret("aabbccddeeff");
        assert_eq!(result.mac_address(), Some("AABBCCDDEEFF"));
        assert_eq!(result.serial_number(), None);
    }

    #[test]
    fn test_bare_serial_fallback() {
        let result = interpret("SN-ABC123");
        assert_eq!(result.serial_number(), Some("SN-ABC123"));
        assert_eq!(result.id(), None);
        assert_eq!(result.mac_address(), None);
    }

    #[test]
    fn test_unrecognized_payload() {
        let result = interpret("hello world!");
        assert_eq!(result.raw, "hello world!");
        assert!(result.is_unrecognized());
    }

    #[test]
    fn test_whitespace_tolerance() {
        let result = interpret("  AST-9999  ");
        assert_eq!(result.raw, "AST-9999");
        assert_eq!(result.id(), Some("AST-9999"));
    }

    #[test]
    fn test_unrelated_json_falls_through_to_key_value() {
        /* Parsed fine, but is no asset record, so the text is split as pairs */
        let result = interpret(r#"{"sn":"X1"}"#);
        assert_eq!(result.serial_number(), Some(r#""X1"}"#));
        assert_eq!(result.id(), None);
    }

    #[test]
    fn test_key_value_wins_over_bare_pattern() {
        let result = interpret("sn=AST-1234");
        assert_eq!(result.serial_number(), Some("AST-1234"));
        assert_eq!(result.id(), None);
    }

    #[test]
    fn test_result_json_shape() {
        let json = serde_json::to_value(interpret("SN:XYZ789, MAC:112233445566")).unwrap();
        assert_eq!(json, serde_json::json!({
            "raw": "SN:XYZ789, MAC:112233445566",
            "serialNumber": "XYZ789",
            "macAddress": "112233445566"
        }));
    }

    #[test]
    fn test_first_match_respects_given_order() {
        let payload = r#"{"type":"asset","sn":"X"}"#;
        assert_eq!(interpret(payload).serial_number(), Some("X"));

        /* Pairs first: the JSON text is cut at the first colon of each segment */
        let pairs_first = [RECOGNIZERS[1], RECOGNIZERS[0]];
        assert_eq!(first_match(payload, &pairs_first).serial_number(), Some(r#""X"}"#));

        let result = first_match("AST-1234", &[]);
        assert!(result.is_unrecognized());
    }

    #[test]
    fn test_boolean_serial_stays_in_json_strategy() {
        let result = interpret(r#"{"type":"asset","sn":true}"#);
        assert_eq!(result.serial_number(), Some("true"));

        /* A falsy id is no identifier, the payload goes on to the pair splitter */
        let result = interpret(r#"{"type":"asset","id":0}"#);
        assert_eq!(result.id(), None);
    }

    #[tokio::test]
    async fn test_scan_manager_forwards_events() {
        let (raw_tx, raw_rx) = tokio::sync::mpsc::channel(4);
        let (event_tx, mut event_rx) = tokio::sync::mpsc::channel(4);

        let mut manager = ScanManager::new(event_tx);
        let handle = tokio::spawn(async move {
            manager.start_thread(raw_rx).await;
        });

        raw_tx.send("AST-0001".to_string()).await.unwrap();
        raw_tx.send("   ".to_string()).await.unwrap();
        raw_tx.send("hello world!".to_string()).await.unwrap();
        drop(raw_tx);

        let first = event_rx.recv().await.unwrap();
        assert_eq!(first.result.id(), Some("AST-0001"));
        let second = event_rx.recv().await.unwrap();
        assert!(second.result.is_unrecognized());
        assert!(event_rx.recv().await.is_none());

        handle.await.unwrap();
    }
}
