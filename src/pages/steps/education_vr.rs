use serde_json::{json, Value};

use crate::validation::{FieldKind, Rule, Schema, SchemaContext};

const QUESTIONS: &[&str] = &[
    "student_fulltime_in_last_18_months",
    "attending_college_or_job_training",
    "registered_with_vocational_rehab",
];

pub fn skeleton() -> Value {
    json!({
        "student_fulltime_in_last_18_months": null,
        "attending_college_or_job_training": null,
        "registered_with_vocational_rehab": null,
    })
}

pub fn schema(ctx: &SchemaContext) -> Schema {
    Schema::new(ctx).rules(
        QUESTIONS
            .iter()
            .map(|question| Rule::field(*question, FieldKind::Bool).required()),
    )
}
