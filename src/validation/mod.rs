//! Declarative validation schemas for wizard steps.
//!
//! A [`Schema`] is a list of [`Rule`]s built fresh for every step (and, for
//! repeatable steps, every segment). Building is pure and cheap; validation
//! runs against a [`Snapshot`] and reports at most one [`FieldError`] per
//! offending leaf.

pub mod formats;
pub mod messages;

use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::claim::{is_empty_value, Snapshot};
use crate::reconcile::FlagRef;

pub use formats::Format;
pub use messages::{DefaultText, TextLookup};

/// Inputs every schema factory receives
#[derive(Clone)]
pub struct SchemaContext {
    pub text: Arc<dyn TextLookup>,
    /// Reference date for "not in the future" checks
    pub today: NaiveDate,
}

impl SchemaContext {
    pub fn new(text: Arc<dyn TextLookup>, today: NaiveDate) -> Self {
        Self { text, today }
    }

    /// Built-in English messages with an explicit reference date
    pub fn english(today: NaiveDate) -> Self {
        Self::new(Arc::new(DefaultText), today)
    }

    /// Built-in English messages dated to the local calendar day
    pub fn current() -> Self {
        Self::english(chrono::Local::now().date_naive())
    }
}

impl std::fmt::Debug for SchemaContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaContext")
            .field("today", &self.today)
            .finish_non_exhaustive()
    }
}

/// One field-level problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Dotted claim path, or a `LOCAL_` flag key
    pub path: String,
    /// Message key, stable across languages
    pub key: String,
    /// Message resolved through the schema's text lookup
    pub message: String,
}

/// The snapshot does not satisfy a schema
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", errors.len())]
pub struct ValidationFailure {
    pub errors: Vec<FieldError>,
}

impl ValidationFailure {
    /// Paths of every offending field, in report order
    pub fn paths(&self) -> Vec<&str> {
        self.errors.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn error_for(&self, path: &str) -> Option<&FieldError> {
        self.errors.iter().find(|e| e.path == path)
    }
}

/// What a rule checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Claim path, relative to the enclosing list entry if any
    Field(String),
    /// Derived UI-only flag
    Flag(FlagRef),
}

/// Whether a value must, may, or must not be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
    Forbidden,
}

/// Accepted date window
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRange {
    pub not_future: bool,
    pub not_before: Option<NaiveDate>,
    /// Sibling date path this date may not precede
    pub on_or_after: Option<String>,
}

impl DateRange {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn past() -> Self {
        Self {
            not_future: true,
            ..Self::default()
        }
    }

    pub fn not_before(mut self, date: NaiveDate) -> Self {
        self.not_before = Some(date);
        self
    }

    pub fn on_or_after(mut self, sibling: impl Into<String>) -> Self {
        self.on_or_after = Some(sibling.into());
        self
    }
}

/// Shape and format of a value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    Text { max_length: Option<usize> },
    Bool,
    OneOf(&'static [&'static str]),
    ManyOf(&'static [&'static str]),
    Date(DateRange),
    /// Canonical integer-cent string
    Currency,
    Format(Format),
    /// Array of objects, each checked against the nested rules
    List(Vec<Rule>),
}

/// Gate on a rule; paths are relative to the rule's base
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    Equals { path: String, value: Value },
    AnyOf { path: String, values: Vec<Value> },
    Present { path: String },
    Flag { flag: FlagRef, value: bool },
}

impl Condition {
    pub fn equals(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition::Equals {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn any_of(path: impl Into<String>, values: &[&str]) -> Self {
        Condition::AnyOf {
            path: path.into(),
            values: values.iter().map(|v| Value::from(*v)).collect(),
        }
    }

    pub fn present(path: impl Into<String>) -> Self {
        Condition::Present { path: path.into() }
    }

    pub fn flag(flag: FlagRef, value: bool) -> Self {
        Condition::Flag { flag, value }
    }

    /// Holds only when the referenced sibling has been explicitly set
    fn holds(&self, base: &str, snapshot: &Snapshot) -> bool {
        let sibling = |path: &str| {
            snapshot
                .claim
                .lookup(&format!("{}{}", base, path))
                .filter(|v| !is_empty_value(v))
        };
        match self {
            Condition::Equals { path, value } => sibling(path) == Some(value),
            Condition::AnyOf { path, values } => sibling(path).is_some_and(|v| values.contains(v)),
            Condition::Present { path } => sibling(path).is_some(),
            Condition::Flag { flag, value } => flag.lookup(&snapshot.flags) == Some(*value),
        }
    }
}

/// A single declared constraint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub target: Target,
    pub kind: FieldKind,
    pub presence: Presence,
    pub when: Option<Condition>,
}

impl Rule {
    /// Optional claim field; chain `.required()` or `.forbidden()` to tighten
    pub fn field(path: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            target: Target::Field(path.into()),
            kind,
            presence: Presence::Optional,
            when: None,
        }
    }

    /// Required answer to a derived flag
    pub fn flag(flag: FlagRef) -> Self {
        Self {
            target: Target::Flag(flag),
            kind: FieldKind::Bool,
            presence: Presence::Required,
            when: None,
        }
    }

    pub fn text(path: impl Into<String>, max_length: usize) -> Self {
        Self::field(
            path,
            FieldKind::Text {
                max_length: Some(max_length),
            },
        )
    }

    pub fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    pub fn forbidden(mut self) -> Self {
        self.presence = Presence::Forbidden;
        self
    }

    /// Apply this rule only while the condition holds
    pub fn when(mut self, condition: Condition) -> Self {
        self.when = Some(condition);
        self
    }
}

/// Constraints spanning a whole collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayRule {
    /// The "more entries" tracking array has exactly one answer per entry
    TrackingAligned { collection: String },
}

/// A composed rule set for one step or segment
#[derive(Clone)]
pub struct Schema {
    rules: Vec<Rule>,
    shared: Vec<ArrayRule>,
    text: Arc<dyn TextLookup>,
    today: NaiveDate,
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("rules", &self.rules)
            .field("shared", &self.shared)
            .field("today", &self.today)
            .finish_non_exhaustive()
    }
}

impl Schema {
    pub fn new(ctx: &SchemaContext) -> Self {
        Self {
            rules: Vec::new(),
            shared: Vec::new(),
            text: Arc::clone(&ctx.text),
            today: ctx.today,
        }
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rules(mut self, rules: impl IntoIterator<Item = Rule>) -> Self {
        self.rules.extend(rules);
        self
    }

    pub fn shared(mut self, rule: ArrayRule) -> Self {
        self.shared.push(rule);
        self
    }

    pub fn rule_list(&self) -> &[Rule] {
        &self.rules
    }

    pub fn shared_rules(&self) -> &[ArrayRule] {
        &self.shared
    }

    /// Check a snapshot, collecting one error per offending leaf
    pub fn validate(&self, snapshot: &Snapshot) -> Result<(), ValidationFailure> {
        let mut errors = Vec::new();
        self.check_rules(&self.rules, "", snapshot, &mut errors);

        for shared in &self.shared {
            match shared {
                ArrayRule::TrackingAligned { collection } => {
                    let entries = snapshot.claim.entry_count(collection);
                    let answers = snapshot
                        .flags
                        .tracking(collection)
                        .map_or(0, <[bool]>::len);
                    if answers != entries {
                        errors.push(self.error(
                            format!("LOCAL_more_{}", collection),
                            "validation.tracking_length",
                        ));
                    }
                }
            }
        }

        let mut seen = HashSet::new();
        errors.retain(|e: &FieldError| seen.insert(e.path.clone()));

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationFailure { errors })
        }
    }

    fn check_rules(
        &self,
        rules: &[Rule],
        base: &str,
        snapshot: &Snapshot,
        errors: &mut Vec<FieldError>,
    ) {
        for rule in rules {
            if let Some(condition) = &rule.when {
                if !condition.holds(base, snapshot) {
                    continue;
                }
            }

            let (path, value): (String, Option<Cow<'_, Value>>) = match &rule.target {
                Target::Field(field) => {
                    let path = format!("{}{}", base, field);
                    let value = snapshot.claim.lookup(&path).map(Cow::Borrowed);
                    (path, value)
                }
                Target::Flag(flag) => (
                    flag.key(),
                    flag.lookup(&snapshot.flags).map(|b| Cow::Owned(Value::Bool(b))),
                ),
            };

            let missing = value.as_deref().map_or(true, is_empty_value);
            match (rule.presence, missing) {
                (Presence::Required, true) => {
                    errors.push(self.error(path, "validation.required"));
                    continue;
                }
                (Presence::Forbidden, false) => {
                    errors.push(self.error(path, "validation.forbidden"));
                    continue;
                }
                (_, true) | (Presence::Forbidden, _) => continue,
                _ => {}
            }

            if let Some(value) = value.as_deref() {
                self.check_kind(&rule.kind, &path, base, value, snapshot, errors);
            }
        }
    }

    fn check_kind(
        &self,
        kind: &FieldKind,
        path: &str,
        base: &str,
        value: &Value,
        snapshot: &Snapshot,
        errors: &mut Vec<FieldError>,
    ) {
        let problem = match kind {
            FieldKind::Text { max_length } => match value.as_str() {
                None => Some("validation.invalid"),
                Some(s) if max_length.is_some_and(|max| s.chars().count() > max) => {
                    Some("validation.max_length")
                }
                Some(_) => None,
            },
            FieldKind::Bool => (!value.is_boolean()).then_some("validation.invalid"),
            FieldKind::OneOf(options) => match value.as_str() {
                Some(s) if options.contains(&s) => None,
                _ => Some("validation.one_of"),
            },
            FieldKind::ManyOf(options) => {
                let all_known = value.as_array().is_some_and(|items| {
                    items
                        .iter()
                        .all(|item| item.as_str().is_some_and(|s| options.contains(&s)))
                });
                (!all_known).then_some("validation.many_of")
            }
            FieldKind::Date(range) => self.check_date(range, base, value, snapshot),
            FieldKind::Currency => match value.as_str() {
                Some(s) if formats::is_canonical_cents(s) => None,
                _ => Some("validation.currency"),
            },
            FieldKind::Format(format) => match value.as_str() {
                Some(s) if format.matches(s) => None,
                _ => Some(format.message_key()),
            },
            FieldKind::List(item_rules) => match value.as_array() {
                Some(items) => {
                    for index in 0..items.len() {
                        let item_base = format!("{}.{}.", path, index);
                        self.check_rules(item_rules, &item_base, snapshot, errors);
                    }
                    None
                }
                None => Some("validation.invalid"),
            },
        };

        if let Some(key) = problem {
            errors.push(self.error(path.to_string(), key));
        }
    }

    fn check_date(
        &self,
        range: &DateRange,
        base: &str,
        value: &Value,
        snapshot: &Snapshot,
    ) -> Option<&'static str> {
        let Some(date) = value.as_str().and_then(formats::parse_iso_date) else {
            return Some("validation.date");
        };
        if range.not_future && date > self.today {
            return Some("validation.future_date");
        }
        if range.not_before.is_some_and(|floor| date < floor) {
            return Some("validation.date_too_early");
        }
        if let Some(sibling) = &range.on_or_after {
            let earlier = snapshot
                .claim
                .lookup(&format!("{}{}", base, sibling))
                .and_then(Value::as_str)
                .and_then(formats::parse_iso_date);
            if earlier.is_some_and(|earlier| date < earlier) {
                return Some("validation.date_order");
            }
        }
        None
    }

    fn error(&self, path: String, key: &str) -> FieldError {
        FieldError {
            path,
            key: key.to_string(),
            message: self.text.text(key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::Claim;
    use crate::reconcile::DerivedFlags;
    use serde_json::json;

    fn ctx() -> SchemaContext {
        SchemaContext::english(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
    }

    fn snapshot(value: Value) -> Snapshot {
        let claim = Claim::from_value(value).unwrap();
        let flags = DerivedFlags::derive(&claim);
        Snapshot::new(claim, flags)
    }

    #[test]
    fn test_required_missing_yields_one_error_per_leaf() {
        let schema = Schema::new(&ctx())
            .rule(Rule::text("claimant_name.first_name", 36).required())
            .rule(Rule::field("ssn", FieldKind::Format(Format::Ssn)).required())
            .rule(Rule::field("ssn", FieldKind::Text { max_length: None }).required());

        let failure = schema.validate(&snapshot(json!({}))).unwrap_err();
        assert_eq!(failure.paths(), vec!["claimant_name.first_name", "ssn"]);
        assert_eq!(
            failure.error_for("ssn").unwrap().message,
            "This field is required"
        );
    }

    #[test]
    fn test_format_checked_after_presence() {
        let schema =
            Schema::new(&ctx()).rule(Rule::field("ssn", FieldKind::Format(Format::Ssn)).required());
        let failure = schema
            .validate(&snapshot(json!({"ssn": "12-34"})))
            .unwrap_err();
        assert_eq!(failure.errors[0].key, "validation.ssn");
        assert!(schema
            .validate(&snapshot(json!({"ssn": "555-55-5555"})))
            .is_ok());
    }

    #[test]
    fn test_condition_ignores_defaulted_sibling() {
        let schema = Schema::new(&ctx()).rule(
            Rule::text("union.union_name", 32)
                .required()
                .when(Condition::equals("union.is_union_member", true)),
        );
        assert!(schema
            .validate(&snapshot(json!({"union": {"is_union_member": null}})))
            .is_ok());
        assert!(schema
            .validate(&snapshot(json!({"union": {"is_union_member": false}})))
            .is_ok());
        let failure = schema
            .validate(&snapshot(json!({"union": {"is_union_member": true}})))
            .unwrap_err();
        assert_eq!(failure.paths(), vec!["union.union_name"]);
    }

    #[test]
    fn test_forbidden_when_condition_holds() {
        let schema = Schema::new(&ctx()).rule(
            Rule::field("payment.routing_number", FieldKind::Format(Format::RoutingNumber))
                .forbidden()
                .when(Condition::equals("payment.payment_method", "debit")),
        );
        let failure = schema
            .validate(&snapshot(json!({
                "payment": {"payment_method": "debit", "routing_number": "123456789"}
            })))
            .unwrap_err();
        assert_eq!(failure.errors[0].key, "validation.forbidden");
        assert!(schema
            .validate(&snapshot(json!({
                "payment": {"payment_method": "debit", "routing_number": ""}
            })))
            .is_ok());
    }

    #[test]
    fn test_currency_requires_canonical_cents() {
        let schema = Schema::new(&ctx()).rule(Rule::field("total", FieldKind::Currency).required());
        assert!(schema.validate(&snapshot(json!({"total": "125000"}))).is_ok());
        for bad in [json!("1,250.00"), json!("0125"), json!(125000)] {
            let failure = schema.validate(&snapshot(json!({ "total": bad }))).unwrap_err();
            assert_eq!(failure.errors[0].key, "validation.currency");
        }
    }

    #[test]
    fn test_date_ranges() {
        let schema = Schema::new(&ctx())
            .rule(
                Rule::field(
                    "birthdate",
                    FieldKind::Date(
                        DateRange::past().not_before(NaiveDate::from_ymd_opt(1900, 1, 1).unwrap()),
                    ),
                )
                .required(),
            )
            .rule(Rule::field(
                "recovery_date",
                FieldKind::Date(DateRange::past().on_or_after("began")),
            ));

        let key_for = |value: Value| {
            schema
                .validate(&snapshot(value))
                .err()
                .map(|f| f.errors[0].key.clone())
        };

        assert_eq!(key_for(json!({"birthdate": "1980-01-31"})), None);
        assert_eq!(
            key_for(json!({"birthdate": "2030-01-01"})),
            Some("validation.future_date".to_string())
        );
        assert_eq!(
            key_for(json!({"birthdate": "1850-01-01"})),
            Some("validation.date_too_early".to_string())
        );
        assert_eq!(
            key_for(json!({"birthdate": "1980-02-30"})),
            Some("validation.date".to_string())
        );
        assert_eq!(
            key_for(json!({
                "birthdate": "1980-01-31",
                "began": "2024-03-01",
                "recovery_date": "2024-02-01"
            })),
            Some("validation.date_order".to_string())
        );
    }

    #[test]
    fn test_list_rules_are_relative_to_each_entry() {
        let schema = Schema::new(&ctx()).rule(
            Rule::field(
                "other_pay",
                FieldKind::List(vec![
                    Rule::field("pay_type", FieldKind::OneOf(&["severance", "no_other_pay"]))
                        .required(),
                    Rule::field("total", FieldKind::Currency)
                        .required()
                        .when(Condition::equals("pay_type", "severance")),
                ]),
            )
            .required(),
        );

        let failure = schema
            .validate(&snapshot(json!({
                "other_pay": [
                    {"pay_type": "no_other_pay"},
                    {"pay_type": "severance"}
                ]
            })))
            .unwrap_err();
        assert_eq!(failure.paths(), vec!["other_pay.1.total"]);

        let failure = schema
            .validate(&snapshot(json!({"other_pay": []})))
            .unwrap_err();
        assert_eq!(failure.paths(), vec!["other_pay"]);
    }

    #[test]
    fn test_flag_rules_and_conditions() {
        let schema = Schema::new(&ctx())
            .rule(Rule::flag(FlagRef::MoreEmployers(0)))
            .rule(
                Rule::text("mailing_address.address1", 64)
                    .required()
                    .when(Condition::flag(FlagRef::MailingAddressSame, false)),
            );
        let failure = schema.validate(&snapshot(json!({}))).unwrap_err();
        assert_eq!(
            failure.paths(),
            vec!["LOCAL_more_employers.0", "mailing_address.address1"]
        );
    }

    #[test]
    fn test_tracking_aligned() {
        let schema = Schema::new(&ctx()).shared(ArrayRule::TrackingAligned {
            collection: "employers".to_string(),
        });
        let mut snap = snapshot(json!({"employers": [{"name": "A"}]}));
        assert!(schema.validate(&snap).is_ok());

        snap.flags.more_employers.push(true);
        let failure = schema.validate(&snap).unwrap_err();
        assert_eq!(failure.paths(), vec!["LOCAL_more_employers"]);
    }

    #[test]
    fn test_tracking_aligned_untracked_collection() {
        let schema = Schema::new(&ctx()).shared(ArrayRule::TrackingAligned {
            collection: "other_pay".to_string(),
        });
        let mut snap = snapshot(json!({"employers": [{"name": "A"}]}));
        assert!(schema.validate(&snap).is_ok());

        snap.claim.set("other_pay", json!([{"pay_type": "vacation"}]));
        let failure = schema.validate(&snap).unwrap_err();
        assert_eq!(failure.paths(), vec!["LOCAL_more_other_pay"]);
    }

    #[test]
    fn test_custom_text_lookup() {
        let lookup = |key: &str| format!("t:{}", key);
        let ctx = SchemaContext::new(Arc::new(lookup), NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        let schema = Schema::new(&ctx).rule(Rule::text("email", 64).required());
        let failure = schema.validate(&snapshot(json!({}))).unwrap_err();
        assert_eq!(failure.errors[0].message, "t:validation.required");
    }
}
