use crate::models::{
    new_record_id, Asset, AssetDraft, AssetStatus, Category, Customer, Dismantle, Division, Handover, Installation,
    Role, User,
};
use crate::scan::{recognizers::is_asset_id, utils::normalize_mac};
use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use thiserror::Error;

/// Name of the division every admin has to belong to
pub const INVENTORY_DIVISION: &str = "Inventory";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },
    #[error("{kind} {id} already exists")]
    AlreadyExists { kind: &'static str, id: String },
    #[error("Serial number {0} is already registered")]
    DuplicateSerial(String),
    #[error("MAC address {0} is already registered")]
    DuplicateMac(String),
    #[error("Admin role requires the Inventory division")]
    AdminRequiresInventory,
    #[error("Division {0} still has members")]
    DivisionHasMembers(String),
    #[error("Category {0} is still used by assets")]
    CategoryInUse(String),
    #[error("User {0} still holds assets")]
    UserHoldsAssets(String),
    #[error("Asset {0} is installed at a customer")]
    AssetInstalled(String),
    #[error("Asset {id} is {status}, expected {expected}")]
    InvalidStatus { id: String, status: String, expected: String },
    #[error("Category {0} cannot be installed at customers")]
    NotInstallable(String),
    #[error("No asset id left after {0}")]
    AssetIdsExhausted(String),
    #[error("Field {0} is required")]
    MissingField(&'static str),
    #[error("Unable to read seed data: {0}")]
    SeedIo(#[from] std::io::Error),
    #[error("Unable to parse seed data: {0}")]
    SeedFormat(#[from] serde_yml::Error),
}

fn not_found(kind: &'static str, id: &str) -> StoreError {
    StoreError::NotFound { kind, id: id.to_string() }
}

/// Mock data the store can be started with
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub divisions: Vec<Division>,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

/// InventoryStore holds the whole application state in memory
#[derive(Debug, Default)]
pub struct InventoryStore {
    categories: Vec<Category>,
    divisions: Vec<Division>,
    users: Vec<User>,
    customers: Vec<Customer>,
    assets: Vec<Asset>,
    installations: Vec<Installation>,
    handovers: Vec<Handover>,
    dismantles: Vec<Dismantle>,
}

impl InventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_seed(seed: SeedData) -> Result<Self, StoreError> {
        let mut store = InventoryStore::new();

        for category in seed.categories {
            store.add_category(category)?;
        }
        for division in seed.divisions {
            store.add_division(division)?;
        }
        for user in seed.users {
            store.add_user(user)?;
        }
        for customer in seed.customers {
            store.add_customer(customer)?;
        }
        for asset in seed.assets {
            store.import_asset(asset)?;
        }

        info!("Store seeded with {} assets, {} users, {} customers",
              store.assets.len(), store.users.len(), store.customers.len());
        Ok(store)
    }

    pub fn load_seed(path: &str) -> Result<Self, StoreError> {
        let contents = fs::read_to_string(path)?;
        let seed: SeedData = serde_yml::from_str(&contents)?;
        Self::from_seed(seed)
    }

    /* Categories */

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn find_category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn add_category(&mut self, category: Category) -> Result<(), StoreError> {
        if self.find_category(&category.id).is_some() {
            return Err(StoreError::AlreadyExists { kind: "Category", id: category.id });
        }
        self.categories.push(category);
        Ok(())
    }

    pub fn remove_category(&mut self, id: &str) -> Result<Category, StoreError> {
        let pos = self.categories.iter().position(|c| c.id == id).ok_or_else(|| not_found("Category", id))?;
        if self.assets.iter().any(|a| a.category_id == id) {
            return Err(StoreError::CategoryInUse(id.to_string()));
        }
        Ok(self.categories.remove(pos))
    }

    /* Divisions */

    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    pub fn find_division(&self, id: &str) -> Option<&Division> {
        self.divisions.iter().find(|d| d.id == id)
    }

    pub fn add_division(&mut self, division: Division) -> Result<(), StoreError> {
        if self.find_division(&division.id).is_some() {
            return Err(StoreError::AlreadyExists { kind: "Division", id: division.id });
        }
        self.divisions.push(division);
        Ok(())
    }

    pub fn remove_division(&mut self, id: &str) -> Result<Division, StoreError> {
        let pos = self.divisions.iter().position(|d| d.id == id).ok_or_else(|| not_found("Division", id))?;
        if self.users.iter().any(|u| u.division_id == id) {
            return Err(StoreError::DivisionHasMembers(id.to_string()));
        }
        Ok(self.divisions.remove(pos))
    }

    /* Users */

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn find_user(&self, id: &str) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    fn check_role(&self, role: &Role, division_id: &str) -> Result<(), StoreError> {
        let division = self.find_division(division_id).ok_or_else(|| not_found("Division", division_id))?;
        if *role == Role::Admin && !division.name.eq_ignore_ascii_case(INVENTORY_DIVISION) {
            return Err(StoreError::AdminRequiresInventory);
        }
        Ok(())
    }

    pub fn add_user(&mut self, user: User) -> Result<(), StoreError> {
        if self.find_user(&user.id).is_some() {
            return Err(StoreError::AlreadyExists { kind: "User", id: user.id });
        }
        self.check_role(&user.role, &user.division_id)?;
        self.users.push(user);
        Ok(())
    }

    pub fn change_role(&mut self, id: &str, role: Role, division_id: &str) -> Result<(), StoreError> {
        self.check_role(&role, division_id)?;
        let user = self.users.iter_mut().find(|u| u.id == id).ok_or_else(|| not_found("User", id))?;
        debug!("User {} becomes {} in division {}", id, role.to_string(), division_id);
        user.role = role;
        user.division_id = division_id.to_string();
        Ok(())
    }

    pub fn remove_user(&mut self, id: &str) -> Result<User, StoreError> {
        let pos = self.users.iter().position(|u| u.id == id).ok_or_else(|| not_found("User", id))?;
        if self.assets.iter().any(|a| a.holder.as_deref() == Some(id)) {
            return Err(StoreError::UserHoldsAssets(id.to_string()));
        }
        Ok(self.users.remove(pos))
    }

    /* Customers */

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn find_customer(&self, id: &str) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn add_customer(&mut self, customer: Customer) -> Result<(), StoreError> {
        if self.find_customer(&customer.id).is_some() {
            return Err(StoreError::AlreadyExists { kind: "Customer", id: customer.id });
        }
        self.customers.push(customer);
        Ok(())
    }

    /* Assets */

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn find_asset(&self, id: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.id == id)
    }

    pub fn find_by_serial(&self, serial: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.serial_number.as_deref() == Some(serial))
    }

    pub fn find_by_mac(&self, mac: &str) -> Option<&Asset> {
        let mac = normalize_mac(mac);
        self.assets.iter().find(|a| a.mac_address.as_deref() == Some(mac.as_str()))
    }

    fn asset_mut(&mut self, id: &str) -> Result<&mut Asset, StoreError> {
        self.assets.iter_mut().find(|a| a.id == id).ok_or_else(|| not_found("Asset", id))
    }

    /// Next free id after the highest AST-NNNN currently known
    pub fn next_asset_id(&self) -> Result<String, StoreError> {
        let mut highest: u64 = 0;
        for asset in self.assets.iter().filter(|a| is_asset_id(&a.id)) {
            /* Digits beyond u64 leave no room for a successor either */
            let number = asset.id[4..].parse::<u64>()
                .map_err(|_| StoreError::AssetIdsExhausted(asset.id.clone()))?;
            highest = highest.max(number);
        }

        let next = highest.checked_add(1)
            .ok_or_else(|| StoreError::AssetIdsExhausted(format!("AST-{}", highest)))?;
        Ok(format!("AST-{:04}", next))
    }

    fn check_identifiers(&self, serial: Option<&str>, mac: Option<&str>) -> Result<(), StoreError> {
        if let Some(serial) = serial {
            if self.find_by_serial(serial).is_some() {
                return Err(StoreError::DuplicateSerial(serial.to_string()));
            }
        }
        if let Some(mac) = mac {
            if self.find_by_mac(mac).is_some() {
                return Err(StoreError::DuplicateMac(mac.to_string()));
            }
        }
        Ok(())
    }

    pub fn register_asset(&mut self, draft: AssetDraft) -> Result<&Asset, StoreError> {
        if draft.name.trim().is_empty() {
            return Err(StoreError::MissingField("name"));
        }
        if self.find_category(&draft.category_id).is_none() {
            return Err(not_found("Category", &draft.category_id));
        }

        let mac_address = draft.mac_address.as_deref().map(normalize_mac);
        self.check_identifiers(draft.serial_number.as_deref(), mac_address.as_deref())?;

        let asset = Asset {
            id: self.next_asset_id()?,
            name: draft.name.trim().to_string(),
            category_id: draft.category_id,
            serial_number: draft.serial_number,
            mac_address,
            status: AssetStatus::Available,
            holder: None,
            customer_id: None,
            registered_at: Utc::now(),
        };
        info!("Registered asset {} ({})", asset.id, asset.name);
        self.assets.push(asset);

        let idx = self.assets.len() - 1;
        Ok(&self.assets[idx])
    }

    /// Adds an asset that already carries its id, used for seed data
    pub fn import_asset(&mut self, mut asset: Asset) -> Result<(), StoreError> {
        if self.find_asset(&asset.id).is_some() {
            return Err(StoreError::AlreadyExists { kind: "Asset", id: asset.id });
        }
        if self.find_category(&asset.category_id).is_none() {
            return Err(not_found("Category", &asset.category_id));
        }
        if !is_asset_id(&asset.id) {
            warn!("Asset id {} does not look like AST-NNNN, scans will not find it", asset.id);
        }
        self.check_placement(&asset)?;

        asset.mac_address = asset.mac_address.as_deref().map(normalize_mac);
        self.check_identifiers(asset.serial_number.as_deref(), asset.mac_address.as_deref())?;
        self.assets.push(asset);
        Ok(())
    }

    /// Holder and customer have to exist and fit the asset status
    fn check_placement(&self, asset: &Asset) -> Result<(), StoreError> {
        if let Some(holder) = &asset.holder {
            if self.find_user(holder).is_none() {
                return Err(not_found("User", holder));
            }
        }
        if let Some(customer_id) = &asset.customer_id {
            if self.find_customer(customer_id).is_none() {
                return Err(not_found("Customer", customer_id));
            }
        }

        let invalid = |expected: &str| StoreError::InvalidStatus {
            id: asset.id.clone(),
            status: asset.status.to_string(),
            expected: expected.to_string(),
        };
        match asset.status {
            AssetStatus::Installed => {
                if asset.customer_id.is_none() {
                    return Err(invalid("an asset with a customer"));
                }
                if asset.holder.is_some() {
                    return Err(invalid("an asset without holder"));
                }
            }
            AssetStatus::InUse => {
                if asset.holder.is_none() {
                    return Err(invalid("an asset with a holder"));
                }
                if asset.customer_id.is_some() {
                    return Err(invalid("an asset without customer"));
                }
            }
            _ => {
                if asset.customer_id.is_some() {
                    return Err(invalid(&AssetStatus::Installed.to_string()));
                }
            }
        }
        Ok(())
    }

    pub fn remove_asset(&mut self, id: &str) -> Result<Asset, StoreError> {
        let pos = self.assets.iter().position(|a| a.id == id).ok_or_else(|| not_found("Asset", id))?;
        if self.assets[pos].status == AssetStatus::Installed {
            return Err(StoreError::AssetInstalled(id.to_string()));
        }
        Ok(self.assets.remove(pos))
    }

    /* Workflows */

    pub fn installations(&self) -> &[Installation] {
        &self.installations
    }

    pub fn handovers(&self) -> &[Handover] {
        &self.handovers
    }

    pub fn dismantles(&self) -> &[Dismantle] {
        &self.dismantles
    }

    pub fn install_asset(&mut self, asset_id: &str, customer_id: &str, technician_id: &str) -> Result<&Installation, StoreError> {
        if self.find_customer(customer_id).is_none() {
            return Err(not_found("Customer", customer_id));
        }
        if self.find_user(technician_id).is_none() {
            return Err(not_found("User", technician_id));
        }

        let asset = self.find_asset(asset_id).ok_or_else(|| not_found("Asset", asset_id))?;
        if asset.status != AssetStatus::Available {
            return Err(StoreError::InvalidStatus {
                id: asset_id.to_string(),
                status: asset.status.to_string(),
                expected: AssetStatus::Available.to_string(),
            });
        }
        let installable = self.find_category(&asset.category_id).map(|c| c.installable).unwrap_or(false);
        if !installable {
            return Err(StoreError::NotInstallable(asset.category_id.clone()));
        }

        let asset = self.asset_mut(asset_id)?;
        asset.status = AssetStatus::Installed;
        asset.customer_id = Some(customer_id.to_string());
        asset.holder = None;

        info!("Asset {} installed at customer {}", asset_id, customer_id);
        self.installations.push(Installation {
            id: new_record_id(),
            asset_id: asset_id.to_string(),
            customer_id: customer_id.to_string(),
            technician_id: technician_id.to_string(),
            at: Utc::now(),
        });

        let idx = self.installations.len() - 1;
        Ok(&self.installations[idx])
    }

    pub fn dismantle_asset(&mut self, asset_id: &str, technician_id: &str, reason: &str) -> Result<&Dismantle, StoreError> {
        if self.find_user(technician_id).is_none() {
            return Err(not_found("User", technician_id));
        }

        let asset = self.asset_mut(asset_id)?;
        if asset.status != AssetStatus::Installed {
            return Err(StoreError::InvalidStatus {
                id: asset_id.to_string(),
                status: asset.status.to_string(),
                expected: AssetStatus::Installed.to_string(),
            });
        }

        /* Back to the warehouse */
        let customer_id = asset.customer_id.take().unwrap_or_default();
        asset.status = AssetStatus::Available;

        info!("Asset {} retrieved from customer {}", asset_id, customer_id);
        self.dismantles.push(Dismantle {
            id: new_record_id(),
            asset_id: asset_id.to_string(),
            customer_id,
            technician_id: technician_id.to_string(),
            reason: reason.to_string(),
            at: Utc::now(),
        });

        let idx = self.dismantles.len() - 1;
        Ok(&self.dismantles[idx])
    }

    pub fn handover_asset(&mut self, asset_id: &str, to_user: &str, note: &str) -> Result<&Handover, StoreError> {
        if self.find_user(to_user).is_none() {
            return Err(not_found("User", to_user));
        }

        let asset = self.asset_mut(asset_id)?;
        if asset.status == AssetStatus::Installed || asset.status == AssetStatus::Retired {
            return Err(StoreError::InvalidStatus {
                id: asset_id.to_string(),
                status: asset.status.to_string(),
                expected: format!("{} or {}", AssetStatus::Available.to_string(), AssetStatus::InUse.to_string()),
            });
        }

        let from_user = asset.holder.replace(to_user.to_string());
        asset.status = AssetStatus::InUse;

        info!("Asset {} handed over from {:?} to {}", asset_id, from_user, to_user);
        self.handovers.push(Handover {
            id: new_record_id(),
            asset_id: asset_id.to_string(),
            from_user,
            to_user: to_user.to_string(),
            note: note.to_string(),
            at: Utc::now(),
        });

        let idx = self.handovers.len() - 1;
        Ok(&self.handovers[idx])
    }
}
