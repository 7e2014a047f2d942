use serde_json::{json, Value};

use crate::validation::{FieldKind, Rule, Schema, SchemaContext};

const SEXES: &[&str] = &["female", "male", "x", "opt_out"];
const ETHNICITIES: &[&str] = &["hispanic", "not_hispanic", "opt_out"];
const RACES: &[&str] = &[
    "american_indian_alaskan",
    "asian",
    "black",
    "hawaiian_pacific_islander",
    "white",
    "opt_out",
];
const EDUCATION_LEVELS: &[&str] = &[
    "none",
    "primary",
    "some_high_school",
    "high_school_ged",
    "some_college",
    "associates",
    "bachelors",
    "masters",
    "doctorate",
    "other",
];

pub fn skeleton() -> Value {
    json!({
        "sex": null,
        "ethnicity": null,
        "race": [],
        "education_level": null,
    })
}

pub fn schema(ctx: &SchemaContext) -> Schema {
    Schema::new(ctx)
        .rule(Rule::field("sex", FieldKind::OneOf(SEXES)).required())
        .rule(Rule::field("ethnicity", FieldKind::OneOf(ETHNICITIES)).required())
        .rule(Rule::field("race", FieldKind::ManyOf(RACES)).required())
        .rule(Rule::field("education_level", FieldKind::OneOf(EDUCATION_LEVELS)).required())
}
