//! Declarations for each wizard step: owned claim fields and their rules.

mod contact;
mod demographic;
mod disability;
mod education_vr;
mod employer;
mod identity;
mod occupation;
mod other_pay;
mod payment;
mod personal;
mod self_employment;
mod union;

use serde_json::{json, Value};

use crate::pages::{PageDefinition, RepeatSpec};
use crate::segment;
use crate::validation::{Condition, FieldKind, Format, Rule};

pub use employer::{COLLECTION as EMPLOYER_COLLECTION, SEPARATION_REASON_KEYS};

/// The claim form's steps, in navigation order
pub static STANDARD_PAGES: &[PageDefinition] = &[
    PageDefinition {
        slug: "personal",
        heading: "personal.heading",
        schema: personal::schema,
        skeleton: personal::skeleton,
        repeat: None,
    },
    PageDefinition {
        slug: "contact",
        heading: "contact.heading",
        schema: contact::schema,
        skeleton: contact::skeleton,
        repeat: None,
    },
    PageDefinition {
        slug: "demographic",
        heading: "demographic.heading",
        schema: demographic::schema,
        skeleton: demographic::skeleton,
        repeat: None,
    },
    PageDefinition {
        slug: "identity",
        heading: "identity.heading",
        schema: identity::schema,
        skeleton: identity::skeleton,
        repeat: None,
    },
    PageDefinition {
        slug: "employer",
        heading: "employer.heading",
        schema: employer::schema,
        skeleton: employer::skeleton,
        repeat: Some(RepeatSpec {
            collection: employer::COLLECTION,
            segment_schema: employer::segment_schema,
            repeatable: employer::repeatable,
            next_segment: segment::next_segment,
            previous_segment: segment::previous_segment,
        }),
    },
    PageDefinition {
        slug: "self-employment",
        heading: "self_employment.heading",
        schema: self_employment::schema,
        skeleton: self_employment::skeleton,
        repeat: None,
    },
    PageDefinition {
        slug: "other-pay",
        heading: "other_pay.heading",
        schema: other_pay::schema,
        skeleton: other_pay::skeleton,
        repeat: None,
    },
    PageDefinition {
        slug: "occupation",
        heading: "occupation.heading",
        schema: occupation::schema,
        skeleton: occupation::skeleton,
        repeat: None,
    },
    PageDefinition {
        slug: "education-vr",
        heading: "education_vr.heading",
        schema: education_vr::schema,
        skeleton: education_vr::skeleton,
        repeat: None,
    },
    PageDefinition {
        slug: "union",
        heading: "union.heading",
        schema: union::schema,
        skeleton: union::skeleton,
        repeat: None,
    },
    PageDefinition {
        slug: "disability",
        heading: "disability.heading",
        schema: disability::schema,
        skeleton: disability::skeleton,
        repeat: None,
    },
    PageDefinition {
        slug: "payment",
        heading: "payment.heading",
        schema: payment::schema,
        skeleton: payment::skeleton,
        repeat: None,
    },
];

/// Two-letter codes accepted for address states and ID issuers
pub const US_STATES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY", "PR", "VI", "GU", "AS", "MP",
];

/// Empty postal address
pub(crate) fn address_skeleton() -> Value {
    json!({
        "address1": "",
        "address2": "",
        "city": "",
        "state": "",
        "zipcode": "",
    })
}

/// Rules for a postal address stored under `prefix`
pub(crate) fn address_rules(prefix: &str) -> Vec<Rule> {
    vec![
        Rule::text(format!("{}.address1", prefix), 64).required(),
        Rule::text(format!("{}.address2", prefix), 64),
        Rule::text(format!("{}.city", prefix), 64).required(),
        Rule::field(format!("{}.state", prefix), FieldKind::OneOf(US_STATES)).required(),
        Rule::field(format!("{}.zipcode", prefix), FieldKind::Format(Format::Zip)).required(),
    ]
}

/// Gate every rule on the same condition
pub(crate) fn gated(rules: Vec<Rule>, condition: &Condition) -> Vec<Rule> {
    rules
        .into_iter()
        .map(|rule| rule.when(condition.clone()))
        .collect()
}
