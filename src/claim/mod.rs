//! Claim snapshot types.
//!
//! A [`Claim`] holds only the fields that are persisted to the backend. UI-only
//! branching state lives in [`DerivedFlags`](crate::reconcile::DerivedFlags)
//! and travels next to the claim inside a [`Snapshot`].

pub mod identity;
pub mod separation;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use identity::{IdentityAddress, IdentityBundle};
pub use separation::SeparationReason;

use crate::reconcile::DerivedFlags;

/// Name prefix carried by UI-only control fields at the boundary
pub const LOCAL_PREFIX: &str = "LOCAL_";

/// The persisted portion of a claim.
///
/// Fields the engine does not know about are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claim(Map<String, Value>);

impl Claim {
    /// Create an empty claim
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Wrap a JSON value, returning `None` unless it is an object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    /// Borrow the underlying field map
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a plain JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Clone into a plain JSON value
    pub fn to_value(&self) -> Value {
        Value::Object(self.0.clone())
    }

    /// Look up a value by dotted path (`employers.0.address.city`)
    pub fn lookup(&self, path: &str) -> Option<&Value> {
        let mut parts = path.split('.');
        let first = parts.next()?;
        let mut current = self.0.get(first)?;
        for part in parts {
            current = step_into(current, part)?;
        }
        Some(current)
    }

    /// Look up a string value by dotted path, treating blank strings as absent
    pub fn text(&self, path: &str) -> Option<&str> {
        self.lookup(path)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Set a value by dotted path, creating intermediate objects and padding
    /// arrays with empty objects as needed.
    pub fn set(&mut self, path: &str, value: Value) {
        let parts: Vec<&str> = path.split('.').collect();
        let Some((last, parents)) = parts.split_last() else {
            return;
        };
        if parents.is_empty() {
            self.0.insert((*last).to_string(), value);
            return;
        }

        let head = self
            .0
            .entry(parents[0].to_string())
            .or_insert_with(|| container_for(parents.get(1).unwrap_or(last)));
        let mut current = head;
        for (i, part) in parents.iter().enumerate().skip(1) {
            let next_key = parents.get(i + 1).unwrap_or(last);
            current = slot(current, part, || container_for(next_key));
        }
        *slot(current, last, || Value::Null) = value;
    }

    /// Number of entries in an array field; missing or non-array counts as zero
    pub fn entry_count(&self, path: &str) -> usize {
        self.lookup(path)
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Keys carrying the local-field prefix (preserved but never consulted)
    pub fn local_keys(&self) -> Vec<&str> {
        self.0
            .keys()
            .filter(|k| k.starts_with(LOCAL_PREFIX))
            .map(String::as_str)
            .collect()
    }
}

fn step_into<'a>(value: &'a Value, part: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(part),
        Value::Array(items) => part.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    }
}

fn container_for(next_key: &str) -> Value {
    if next_key.parse::<usize>().is_ok() {
        Value::Array(Vec::new())
    } else {
        Value::Object(Map::new())
    }
}

fn slot<'a>(value: &'a mut Value, part: &str, fill: impl Fn() -> Value) -> &'a mut Value {
    if let Ok(index) = part.parse::<usize>() {
        if !value.is_array() {
            *value = Value::Array(Vec::new());
        }
        let Value::Array(items) = value else {
            unreachable!("value was just replaced with an array");
        };
        while items.len() <= index {
            items.push(Value::Object(Map::new()));
        }
        let entry = &mut items[index];
        if entry.is_null() || (entry.as_object().is_some_and(Map::is_empty)) {
            let filled = fill();
            if !filled.is_null() {
                *entry = filled;
            }
        }
        entry
    } else {
        if !value.is_object() {
            *value = Value::Object(Map::new());
        }
        let Value::Object(map) = value else {
            unreachable!("value was just replaced with an object");
        };
        map.entry(part.to_string()).or_insert_with(fill)
    }
}

/// True when a value carries no user-supplied content.
///
/// Null, blank strings, empty arrays and objects whose every leaf is empty
/// all count as empty. `false` and `0` are real answers.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.values().all(is_empty_value),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// A claim together with its derived UI-only flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub claim: Claim,
    pub flags: DerivedFlags,
}

impl Snapshot {
    pub fn new(claim: Claim, flags: DerivedFlags) -> Self {
        Self { claim, flags }
    }

    /// The subset that may be handed to the submission sink
    pub fn persisted(&self) -> &Claim {
        &self.claim
    }
}
