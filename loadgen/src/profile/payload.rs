//! Owner creation payloads

use serde::{Deserialize, Serialize};

/// Body of a `POST /owners` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerPayload {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub telephone: String,
}

impl OwnerPayload {
    /// Payload sent by `create_owner_2`
    pub fn alice_smith() -> Self {
        Self {
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            address: "456 Main St".to_string(),
            city: "Springfield".to_string(),
            telephone: "5555555556".to_string(),
        }
    }

    /// Payload sent by `create_owner_3`
    pub fn charlie_brown() -> Self {
        Self {
            first_name: "Charlie".to_string(),
            last_name: "Brown".to_string(),
            address: "789 Main St".to_string(),
            city: "Springfield".to_string(),
            telephone: "5555555557".to_string(),
        }
    }
}
