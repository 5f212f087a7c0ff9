//! Inventory core for ISP equipment
//!
//! This library keeps assets, customers, staff and their workflows in memory
//! and interprets QR code and barcode payloads scanned while registering or
//! looking up equipment.

pub mod config;
pub mod models;
pub mod registration;
pub mod scan;
pub mod store;

// Re-export common types for easier access
pub use config::CONFIG;
pub use models::{Asset, AssetStatus, Role};
pub use registration::{lookup_scan, LookupOutcome, Notification, NotificationLevel, RegistrationForm};
pub use scan::{interpret, ScanEvent, ScanManager, ScanResult};
pub use store::{InventoryStore, StoreError};
