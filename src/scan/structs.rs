use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fields a single recognizer can contribute to a scan result
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ScanFields {
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.serial_number.is_none() && self.mac_address.is_none() && self.name.is_none()
    }
}

/// Interpretation of one decoded QR code or barcode payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// The trimmed payload exactly as it was decoded
    pub raw: String,
    #[serde(flatten)]
    pub fields: ScanFields,
}

impl ScanResult {
    pub fn unrecognized(raw: &str) -> Self {
        ScanResult { raw: raw.to_string(), fields: ScanFields::default() }
    }

    pub fn id(&self) -> Option<&str> {
        self.fields.id.as_deref()
    }

    pub fn serial_number(&self) -> Option<&str> {
        self.fields.serial_number.as_deref()
    }

    pub fn mac_address(&self) -> Option<&str> {
        self.fields.mac_address.as_deref()
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.name.as_deref()
    }

    /// True when no recognizer contributed anything besides the raw text
    pub fn is_unrecognized(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A named, pure recognition step tried by the interpreter
#[derive(Clone, Copy)]
pub struct Recognizer {
    pub name: &'static str,
    pub recognize: fn(&str) -> Option<ScanFields>,
}

/// What the scan session forwards for every decoded payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanEvent {
    pub result: ScanResult,
    pub scanned_at: DateTime<Utc>,
}
