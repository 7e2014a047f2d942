//! Verified identity attributes supplied by the authentication collaborator.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Postal address as delivered by the identity provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityAddress {
    #[serde(default)]
    pub address1: String,
    #[serde(default)]
    pub address2: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zipcode: String,
}

impl IdentityAddress {
    pub fn is_empty(&self) -> bool {
        [
            &self.address1,
            &self.address2,
            &self.city,
            &self.state,
            &self.zipcode,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }

    /// Render in the claim's address shape
    pub fn to_value(&self) -> Value {
        json!({
            "address1": self.address1,
            "address2": self.address2,
            "city": self.city,
            "state": self.state,
            "zipcode": self.zipcode,
        })
    }
}

/// Read-only verified claimant attributes.
///
/// Name, SSN and birthdate are authoritative and always override restored
/// values. Everything else only fills gaps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityBundle {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub address: Option<IdentityAddress>,
    #[serde(default)]
    pub ssn: Option<String>,
    #[serde(default)]
    pub birthdate: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Two-letter state the claimant is filing in
    #[serde(default)]
    pub jurisdiction: Option<String>,
}

impl IdentityBundle {
    /// Claim paths the identity always wins for, paired with their values
    pub fn authoritative_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("claimant_name.first_name", &self.first_name),
            ("claimant_name.middle_name", &self.middle_name),
            ("claimant_name.last_name", &self.last_name),
            ("ssn", &self.ssn),
            ("birthdate", &self.birthdate),
        ]
        .into_iter()
        .filter_map(|(path, value)| present(value).map(|v| (path, v)))
        .collect()
    }

    /// Claim paths the identity may fill when the claim has nothing there
    pub fn gap_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("email", &self.email),
            ("phones.0.number", &self.phone),
        ]
        .into_iter()
        .filter_map(|(path, value)| present(value).map(|v| (path, v)))
        .collect()
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}
