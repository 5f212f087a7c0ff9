use super::structs::ScanFields;
use super::utils::{normalize_mac, split_key_value};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    static ref ASSET_ID_PATTERN: Regex = Regex::new(r"^AST-[0-9]{4,}$").unwrap();
    static ref MAC_DELIMITED_PATTERN: Regex = Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}[0-9A-Fa-f]{2}$").unwrap();
    static ref MAC_PLAIN_PATTERN: Regex = Regex::new(r"^[0-9A-Fa-f]{12}$").unwrap();
    static ref SERIAL_PATTERN: Regex = Regex::new(r"^[A-Za-z0-9-]{6,}$").unwrap();
}

const SEGMENT_DELIMITERS: [char; 3] = [',', ';', '\n'];

pub fn is_asset_id(raw: &str) -> bool {
    ASSET_ID_PATTERN.is_match(raw)
}

pub fn is_mac_address(raw: &str) -> bool {
    MAC_DELIMITED_PATTERN.is_match(raw) || MAC_PLAIN_PATTERN.is_match(raw)
}

pub fn is_serial_number(raw: &str) -> bool {
    SERIAL_PATTERN.is_match(raw)
}

/// Falsy values (null, false, 0, "") count as absent. Strings are copied
/// as they are, anything else is written out as JSON text.
fn json_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// `{"type":"asset","id":"AST-0001","sn":"...","mac":"...","name":"..."}`
pub fn recognize_structured(raw: &str) -> Option<ScanFields> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(_) => return None,
    };

    /* Valid JSON of any other shape is handed on to the next recognizer */
    let object = value.as_object()?;
    if object.get("type").and_then(Value::as_str) != Some("asset") {
        debug!("JSON payload is not an asset record");
        return None;
    }

    let id = json_text(object.get("id"));
    let serial_number = json_text(object.get("sn"));
    let mac_address = json_text(object.get("mac")).map(|m| normalize_mac(&m));

    if id.is_none() && serial_number.is_none() && mac_address.is_none() {
        debug!("Asset JSON payload without id, sn or mac");
        return None;
    }

    Some(ScanFields {
        id,
        serial_number,
        mac_address,
        name: json_text(object.get("name")),
    })
}

/// `SN: XYZ789, MAC=aa:bb:cc:dd:ee:ff` and friends, one pair per segment
pub fn recognize_key_value(raw: &str) -> Option<ScanFields> {
    let mut fields = ScanFields::default();
    let mut matched = false;

    for segment in raw.split(SEGMENT_DELIMITERS).map(str::trim) {
        let Some((key, value)) = split_key_value(segment) else {
            continue;
        };

        let key = key.to_lowercase();
        if key.contains("sn") || key.contains("serial") {
            fields.serial_number = Some(value.to_string());
            matched = true;
        } else if key.contains("mac") {
            fields.mac_address = Some(normalize_mac(value));
            matched = true;
        }
    }

    if matched {
        return Some(fields);
    }
    None
}

/// A bare asset id, MAC or serial number, checked from strictest to loosest
pub fn recognize_bare(raw: &str) -> Option<ScanFields> {
    if is_asset_id(raw) {
        return Some(ScanFields { id: Some(raw.to_string()), ..Default::default() });
    }

    if is_mac_address(raw) {
        return Some(ScanFields { mac_address: Some(normalize_mac(raw)), ..Default::default() });
    }

    if is_serial_number(raw) {
        return Some(ScanFields { serial_number: Some(raw.to_string()), ..Default::default() });
    }

    None
}
