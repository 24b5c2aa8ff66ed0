//! Asset model.
//!
//! Assets are the vehicles and equipment that go out with a crew: trucks,
//! pavers, rollers, plows. The dispatch core never edits them; it only
//! reads their operational status and scans jobs for commitments.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A vehicle or equipment unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    /// Unique asset identifier.
    pub id: String,
    /// Fleet unit label (e.g., "Truck 12").
    pub unit: String,
    /// Asset classification (e.g., "Dump Truck", "Paver").
    pub asset_type: String,
    /// Current operational status.
    pub status: AssetStatus,
    /// Domain-specific metadata.
    pub attributes: HashMap<String, String>,
}

/// Operational status of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AssetStatus {
    /// Ready for dispatch.
    Operational,
    /// In the shop.
    DownForRepair,
    /// Retired or otherwise unusable.
    OutOfService,
    /// Host-specific status.
    Custom(String),
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetStatus::Operational => f.write_str("Operational"),
            AssetStatus::DownForRepair => f.write_str("Down for Repair"),
            AssetStatus::OutOfService => f.write_str("Out of Service"),
            AssetStatus::Custom(s) => f.write_str(s),
        }
    }
}

impl Asset {
    /// Creates a new operational asset.
    pub fn new(id: impl Into<String>, asset_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            unit: String::new(),
            asset_type: asset_type.into(),
            status: AssetStatus::Operational,
            attributes: HashMap::new(),
        }
    }

    /// Sets the unit label.
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: AssetStatus) -> Self {
        self.status = status;
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Whether the asset can be dispatched at all.
    pub fn is_operational(&self) -> bool {
        self.status == AssetStatus::Operational
    }
}
