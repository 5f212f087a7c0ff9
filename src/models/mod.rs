use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Role of a user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    Admin,
    Technician,
    Staff,
}

impl Role {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Admin" => Some(Role::Admin),
            "Technician" => Some(Role::Technician),
            "Staff" => Some(Role::Staff),
            _ => None,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            Role::Admin => "Admin".to_string(),
            Role::Technician => "Technician".to_string(),
            Role::Staff => "Staff".to_string(),
        }
    }
}

/// Where an asset currently is in its life
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum AssetStatus {
    /// In the warehouse, free to hand over or install
    Available,
    /// Installed at a customer site
    Installed,
    /// Handed over to a member of staff
    #[serde(rename = "In Use")]
    InUse,
    Maintenance,
    Retired,
}

impl AssetStatus {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "Available" => Some(AssetStatus::Available),
            "Installed" => Some(AssetStatus::Installed),
            "In Use" => Some(AssetStatus::InUse),
            "Maintenance" => Some(AssetStatus::Maintenance),
            "Retired" => Some(AssetStatus::Retired),
            _ => None,
        }
    }

    pub fn to_string(&self) -> String {
        match self {
            AssetStatus::Available => "Available".to_string(),
            AssetStatus::Installed => "Installed".to_string(),
            AssetStatus::InUse => "In Use".to_string(),
            AssetStatus::Maintenance => "Maintenance".to_string(),
            AssetStatus::Retired => "Retired".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// CPE categories can be installed at customer sites
    #[serde(default)]
    pub installable: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Division {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub division_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// Represents a tracked piece of equipment
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Asset {
    /// Identifier in the form AST-0001
    pub id: String,
    /// Human-readable name of the asset
    pub name: String,
    pub category_id: String,
    pub serial_number: Option<String>,
    /// Upper case hex digits without separators
    pub mac_address: Option<String>,
    pub status: AssetStatus,
    /// User currently holding the asset
    #[serde(default)]
    pub holder: Option<String>,
    /// Customer the asset is installed at
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default = "Utc::now")]
    pub registered_at: DateTime<Utc>,
}

/// Input for registering a new asset, the id is assigned by the store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssetDraft {
    pub name: String,
    pub category_id: String,
    pub serial_number: Option<String>,
    pub mac_address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installation {
    pub id: String,
    pub asset_id: String,
    pub customer_id: String,
    pub technician_id: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Handover {
    pub id: String,
    pub asset_id: String,
    pub from_user: Option<String>,
    pub to_user: String,
    pub note: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dismantle {
    pub id: String,
    pub asset_id: String,
    pub customer_id: String,
    pub technician_id: String,
    pub reason: String,
    pub at: DateTime<Utc>,
}

pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names() {
        for status in [AssetStatus::Available, AssetStatus::Installed, AssetStatus::InUse, AssetStatus::Maintenance, AssetStatus::Retired] {
            assert_eq!(AssetStatus::from_str(&status.to_string()), Some(status));
        }
        assert_eq!(AssetStatus::from_str("Lost"), None);
    }

    #[test]
    fn test_status_serde_matches_display_name() {
        let status: AssetStatus = serde_yml::from_str("In Use").unwrap();
        assert_eq!(status, AssetStatus::InUse);
        assert_eq!(serde_json::to_string(&AssetStatus::InUse).unwrap(), format!("\"{}\"", AssetStatus::InUse.to_string()));
        assert!(serde_yml::from_str::<AssetStatus>("InUse").is_err());
    }

    #[test]
    fn test_role_names() {
        assert_eq!(Role::from_str("Admin"), Some(Role::Admin));
        assert_eq!(Role::Technician.to_string(), "Technician");
        assert_eq!(Role::from_str("admin"), None);
    }

    #[test]
    fn test_record_ids_are_unique() {
        assert_ne!(new_record_id(), new_record_id());
    }
}
