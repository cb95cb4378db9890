//! Vendor domain model.

use crate::id::{new_entity_id, now_ms};
use serde::{Deserialize, Serialize};

/// Contract lifecycle state with a vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Quote,
    Negotiation,
    Signed,
    Cancelled,
}

impl ContractStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Negotiation => "negotiation",
            Self::Signed => "signed",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "quote" => Some(Self::Quote),
            "negotiation" => Some(Self::Negotiation),
            "signed" => Some(Self::Signed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }
}

/// A service provider attached to an event (caterer, florist, venue, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: String,
    pub event_id: Option<String>,
    pub name: String,
    pub service_type: String,
    pub contact_person: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub website: String,
    pub notes: String,
    pub contract_status: ContractStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Vendor {
    /// Creates a vendor in `quote` state with a generated id.
    pub fn new(event_id: impl Into<String>, name: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id: new_entity_id(),
            event_id: Some(event_id.into()),
            name: name.into(),
            service_type: String::new(),
            contact_person: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            website: String::new(),
            notes: String::new(),
            contract_status: ContractStatus::Quote,
            created_at: now,
            updated_at: now,
        }
    }
}
