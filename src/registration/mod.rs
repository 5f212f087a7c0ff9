use crate::models::{Asset, AssetDraft};
use crate::scan::ScanResult;
use crate::store::{InventoryStore, StoreError};
use log::{debug, info};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A message the host shows to the user, usually as a toast
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Notification { level, message: message.into() }
    }
}

/// In-progress state of the asset registration form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub name: String,
    pub category_id: String,
    pub serial_number: String,
    pub mac_address: String,
}

impl RegistrationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies serial number and MAC from a scan into the form. Only fields
    /// the scan carries are overwritten.
    pub fn apply_scan(&mut self, scan: &ScanResult) -> Notification {
        let mut filled: Vec<&str> = Vec::new();

        if let Some(serial) = scan.serial_number() {
            self.serial_number = serial.to_string();
            filled.push("serial number");
        }
        if let Some(mac) = scan.mac_address() {
            self.mac_address = mac.to_string();
            filled.push("MAC address");
        }

        if filled.is_empty() {
            debug!("Scan {:?} had nothing for the registration form", scan.raw);
            return Notification::new(NotificationLevel::Warning, "No recognizable data found");
        }

        Notification::new(NotificationLevel::Success, format!("Scanned {}", filled.join(" and ")))
    }

    pub fn to_draft(&self) -> Result<AssetDraft, StoreError> {
        if self.name.trim().is_empty() {
            return Err(StoreError::MissingField("name"));
        }
        if self.category_id.trim().is_empty() {
            return Err(StoreError::MissingField("category"));
        }

        let optional = |s: &str| {
            let s = s.trim();
            if s.is_empty() { None } else { Some(s.to_string()) }
        };

        Ok(AssetDraft {
            name: self.name.trim().to_string(),
            category_id: self.category_id.trim().to_string(),
            serial_number: optional(&self.serial_number),
            mac_address: optional(&self.mac_address),
        })
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Open the detail preview for this asset
    Found(Asset),
    NotFound(String),
    NoIdentifier,
}

impl LookupOutcome {
    pub fn notification(&self) -> Notification {
        match self {
            LookupOutcome::Found(asset) => Notification::new(NotificationLevel::Info, format!("{} - {}", asset.id, asset.name)),
            LookupOutcome::NotFound(id) => Notification::new(NotificationLevel::Error, format!("Asset {} not found", id)),
            LookupOutcome::NoIdentifier => Notification::new(NotificationLevel::Warning, "Scan carries no asset id"),
        }
    }
}

/// Global asset lookup for scans that carry an asset id
pub fn lookup_scan(store: &InventoryStore, scan: &ScanResult) -> LookupOutcome {
    let Some(id) = scan.id() else {
        return LookupOutcome::NoIdentifier;
    };

    match store.find_asset(id) {
        Some(asset) => {
            info!("Scan opened asset {}", id);
            LookupOutcome::Found(asset.clone())
        }
        None => {
            info!("Scanned asset {} is not in the inventory", id);
            LookupOutcome::NotFound(id.to_string())
        }
    }
}
