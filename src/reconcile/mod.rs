//! Value merge reconciliation.
//!
//! Produces the initial [`Snapshot`] for a session from three sources, in
//! ascending precedence: registry skeleton defaults, the restored partial
//! claim, and the verified identity bundle.

pub mod flags;

use serde_json::{Map, Value};

use crate::claim::{is_empty_value, Claim, IdentityBundle, Snapshot};
use crate::pages::PageRegistry;

pub use flags::{DerivedFlags, EntryFlags, FlagRef};

/// Deep-merge `overlay` onto `base`.
///
/// Objects merge key by key; `null` in the overlay never replaces a base
/// value; arrays and scalars from the overlay replace the base outright.
/// Keys only present in the overlay are carried over untouched.
pub fn merge_values(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            let mut merged: Map<String, Value> = base_map.clone();
            for (key, value) in overlay_map {
                let next = match merged.get(key) {
                    Some(existing) => merge_values(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (_, Value::Null) => base.clone(),
        (_, overlay) => overlay.clone(),
    }
}

/// Build the session's starting snapshot.
///
/// `partial` is `None` when the backend has no saved claim, which differs
/// from `Some({})`: only the latter is a (blank) restored claim. A partial
/// that is not a JSON object is ignored.
pub fn reconcile(
    registry: &PageRegistry,
    identity: Option<&IdentityBundle>,
    partial: Option<&Value>,
) -> Snapshot {
    let skeleton = registry.skeleton().into_value();
    let merged = match partial {
        Some(restored) if restored.is_object() => merge_values(&skeleton, restored),
        Some(other) => {
            tracing::warn!(kind = value_kind(other), "Ignoring restored claim that is not an object");
            skeleton
        }
        None => skeleton,
    };

    let mut claim = Claim::from_value(merged).unwrap_or_default();
    if let Some(identity) = identity {
        fill_identity_gaps(&mut claim, identity);
        apply_authoritative_identity(&mut claim, identity);
    }

    let flags = DerivedFlags::derive(&claim);
    tracing::debug!(
        restored = partial.is_some(),
        employers = flags.more_employers.len(),
        "Reconciled claim snapshot"
    );
    Snapshot::new(claim, flags)
}

/// Identity values that only land where the claim has nothing
fn fill_identity_gaps(claim: &mut Claim, identity: &IdentityBundle) {
    if let Some(address) = identity.address.as_ref().filter(|a| !a.is_empty()) {
        let residence_empty = claim
            .lookup("residence_address")
            .map_or(true, is_empty_value);
        if residence_empty {
            let filled = match claim.lookup("residence_address") {
                Some(existing) => merge_values(existing, &address.to_value()),
                None => address.to_value(),
            };
            claim.set("residence_address", filled);
        }
    }

    if let Some(state) = identity
        .jurisdiction
        .as_deref()
        .filter(|s| !s.trim().is_empty())
    {
        if claim.text("residence_address.state").is_none() {
            claim.set("residence_address.state", Value::from(state));
        }
    }

    for (path, value) in identity.gap_fields() {
        if claim.lookup(path).map_or(true, is_empty_value) {
            claim.set(path, Value::from(value));
        }
    }
}

/// Identity values that win over anything restored
fn apply_authoritative_identity(claim: &mut Claim, identity: &IdentityBundle) {
    for (path, value) in identity.authoritative_fields() {
        claim.set(path, Value::from(value));
    }
}

/// Copy primary values over their "same as" twins before persisting, so the
/// flags derived on the next session match what the claimant answered.
pub fn mirror_same_fields(snapshot: &mut Snapshot) {
    if snapshot.flags.mailing_address_same {
        if let Some(residence) = snapshot.claim.lookup("residence_address").cloned() {
            snapshot.claim.set("mailing_address", residence);
        }
    }

    for (index, entry) in snapshot.flags.employers.clone().iter().enumerate() {
        if index >= snapshot.claim.entry_count("employers") {
            break;
        }
        if entry.same_address {
            let address = snapshot
                .claim
                .lookup(&format!("employers.{}.address", index))
                .cloned();
            if let Some(address) = address {
                snapshot
                    .claim
                    .set(&format!("employers.{}.work_site_address", index), address);
            }
        }
        if entry.same_phone {
            let phones_path = format!("employers.{}.phones", index);
            if let Some(Value::Array(phones)) = snapshot.claim.lookup(&phones_path).cloned() {
                if phones.len() > 1 {
                    snapshot
                        .claim
                        .set(&phones_path, Value::Array(phones[..1].to_vec()));
                }
            }
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
