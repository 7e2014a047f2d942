//! UI-only branching flags.
//!
//! Flags are computed from the persisted claim and kept next to it, never
//! inside it. Values stored under `LOCAL_` keys in a restored claim are
//! ignored here.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::claim::{is_empty_value, Claim};

/// Per-employer flags, aligned with the `employers` collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFlags {
    /// Work-site address is the same as the employer address
    #[serde(rename = "LOCAL_same_address")]
    pub same_address: bool,
    /// No separate work-site phone number
    #[serde(rename = "LOCAL_same_phone")]
    pub same_phone: bool,
}

/// Branching state the wizard needs but the backend never sees
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedFlags {
    #[serde(rename = "LOCAL_claimant_has_alternate_names", default)]
    pub has_alternate_names: bool,
    #[serde(rename = "LOCAL_mailing_address_same", default)]
    pub mailing_address_same: bool,
    #[serde(rename = "LOCAL_employers", default)]
    pub employers: Vec<EntryFlags>,
    /// Element N is true when another employer follows employer N
    #[serde(rename = "LOCAL_more_employers", default)]
    pub more_employers: Vec<bool>,
}

/// Reference to a single derived flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagRef {
    HasAlternateNames,
    MailingAddressSame,
    SameAddress(usize),
    SamePhone(usize),
    MoreEmployers(usize),
}

impl FlagRef {
    /// Current value, or `None` when the flag has not been answered
    pub fn lookup(self, flags: &DerivedFlags) -> Option<bool> {
        match self {
            FlagRef::HasAlternateNames => Some(flags.has_alternate_names),
            FlagRef::MailingAddressSame => Some(flags.mailing_address_same),
            FlagRef::SameAddress(i) => flags.employers.get(i).map(|e| e.same_address),
            FlagRef::SamePhone(i) => flags.employers.get(i).map(|e| e.same_phone),
            FlagRef::MoreEmployers(i) => flags.more_employers.get(i).copied(),
        }
    }

    /// Boundary name used in field-level error reports
    pub fn key(self) -> String {
        match self {
            FlagRef::HasAlternateNames => "LOCAL_claimant_has_alternate_names".to_string(),
            FlagRef::MailingAddressSame => "LOCAL_mailing_address_same".to_string(),
            FlagRef::SameAddress(i) => format!("employers.{}.LOCAL_same_address", i),
            FlagRef::SamePhone(i) => format!("employers.{}.LOCAL_same_phone", i),
            FlagRef::MoreEmployers(i) => format!("LOCAL_more_employers.{}", i),
        }
    }
}

impl DerivedFlags {
    /// Compute every flag from the persisted claim
    pub fn derive(claim: &Claim) -> Self {
        let has_alternate_names = claim
            .lookup("alternate_names")
            .and_then(Value::as_array)
            .is_some_and(|names| !names.is_empty());

        let mailing_address_same = match claim.lookup("residence_address") {
            Some(residence) if !is_empty_value(residence) => {
                claim.lookup("mailing_address") == Some(residence)
            }
            _ => false,
        };

        let entries: &[Value] = claim
            .lookup("employers")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]);

        let employers = entries
            .iter()
            .map(|entry| EntryFlags {
                same_address: !has_distinct_secondary(
                    entry.get("address"),
                    entry.get("work_site_address"),
                ),
                same_phone: !has_distinct_secondary(
                    entry.pointer("/phones/0/number"),
                    entry.pointer("/phones/1/number"),
                ),
            })
            .collect();

        Self {
            has_alternate_names,
            mailing_address_same,
            employers,
            more_employers: tracking_flags(entries.len()),
        }
    }

    /// The "more entries" tracking array for a repeated collection, if it has one
    pub fn tracking(&self, collection: &str) -> Option<&[bool]> {
        match collection {
            "employers" => Some(&self.more_employers),
            _ => None,
        }
    }

    /// Record an answer, growing the per-entry collections as needed
    pub fn set(&mut self, flag: FlagRef, value: bool) {
        match flag {
            FlagRef::HasAlternateNames => self.has_alternate_names = value,
            FlagRef::MailingAddressSame => self.mailing_address_same = value,
            FlagRef::SameAddress(i) => self.entry_mut(i).same_address = value,
            FlagRef::SamePhone(i) => self.entry_mut(i).same_phone = value,
            FlagRef::MoreEmployers(i) => {
                if self.more_employers.len() <= i {
                    self.more_employers.resize(i + 1, false);
                }
                self.more_employers[i] = value;
            }
        }
    }

    fn entry_mut(&mut self, index: usize) -> &mut EntryFlags {
        if self.employers.len() <= index {
            self.employers.resize(index + 1, EntryFlags::default());
        }
        &mut self.employers[index]
    }
}

/// A secondary value is distinct when it is present and differs from the primary
fn has_distinct_secondary(primary: Option<&Value>, secondary: Option<&Value>) -> bool {
    match secondary {
        Some(value) if !is_empty_value(value) => Some(value) != primary,
        _ => false,
    }
}

/// `true` for every entry that is followed by another, then a closing `false`
fn tracking_flags(count: usize) -> Vec<bool> {
    let mut flags = Vec::with_capacity(count);
    while flags.len() < count {
        let followed = flags.len() + 1 < count;
        flags.push(followed);
    }
    flags
}
