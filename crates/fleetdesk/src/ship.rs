//! Ship record types.
//!
//! The JSON shape matches what the browser client stored under the ships
//! key: `{"id","name","imo","flag","status"}`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Operational state of a vessel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShipStatus {
    /// In service.
    Active,
    /// Laid up or decommissioned.
    Inactive,
    /// Under maintenance.
    Maintenance,
}

impl ShipStatus {
    /// Every status, in display order.
    pub const ALL: [ShipStatus; 3] = [
        ShipStatus::Active,
        ShipStatus::Inactive,
        ShipStatus::Maintenance,
    ];

    /// The status's canonical name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Maintenance => "Maintenance",
        }
    }
}

impl fmt::Display for ShipStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShipStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShipStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown ship status: {s}"))
    }
}

/// One managed vessel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipRecord {
    /// Assigned by the store on creation and never changed afterwards.
    pub id: String,
    /// Vessel name.
    pub name: String,
    /// IMO number, kept as entered.
    #[serde(rename = "imo", alias = "imoNumber")]
    pub imo_number: String,
    /// Flag state.
    pub flag: String,
    /// Operational status.
    pub status: ShipStatus,
}

impl ShipRecord {
    /// Attach `id` to a set of fields.
    #[must_use]
    pub fn from_fields(id: impl Into<String>, fields: ShipFields) -> Self {
        Self {
            id: id.into(),
            name: fields.name,
            imo_number: fields.imo_number,
            flag: fields.flag,
            status: fields.status,
        }
    }

    /// The user-editable part of the record.
    #[must_use]
    pub fn fields(&self) -> ShipFields {
        ShipFields {
            name: self.name.clone(),
            imo_number: self.imo_number.clone(),
            flag: self.flag.clone(),
            status: self.status,
        }
    }
}

/// Everything needed to create a record; the id is generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipFields {
    /// Vessel name.
    pub name: String,
    /// IMO number.
    pub imo_number: String,
    /// Flag state.
    pub flag: String,
    /// Operational status.
    pub status: ShipStatus,
}

impl ShipFields {
    /// Build fields from borrowed strings.
    #[must_use]
    pub fn new(name: &str, imo_number: &str, flag: &str, status: ShipStatus) -> Self {
        Self {
            name: name.to_string(),
            imo_number: imo_number.to_string(),
            flag: flag.to_string(),
            status,
        }
    }
}

/// Per-field overrides from the edit form. Unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShipPatch {
    /// New name.
    pub name: Option<String>,
    /// New IMO number.
    pub imo_number: Option<String>,
    /// New flag state.
    pub flag: Option<String>,
    /// New status.
    pub status: Option<ShipStatus>,
}

impl ShipPatch {
    /// Whether the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.imo_number.is_none()
            && self.flag.is_none()
            && self.status.is_none()
    }

    /// A copy of `record` with the patch applied. The id is carried over.
    #[must_use]
    pub fn apply_to(&self, record: &ShipRecord) -> ShipRecord {
        ShipRecord {
            id: record.id.clone(),
            name: self.name.clone().unwrap_or_else(|| record.name.clone()),
            imo_number: self
                .imo_number
                .clone()
                .unwrap_or_else(|| record.imo_number.clone()),
            flag: self.flag.clone().unwrap_or_else(|| record.flag.clone()),
            status: self.status.unwrap_or(record.status),
        }
    }
}
