use serde_json::{json, Value};

use crate::validation::{FieldKind, Format, Rule, Schema, SchemaContext};

pub fn skeleton() -> Value {
    json!({
        "occupation": {
            "job_title": "",
            "job_description": "",
            "bls_code": "",
            "bls_title": "",
            "bls_description": "",
        },
    })
}

pub fn schema(ctx: &SchemaContext) -> Schema {
    Schema::new(ctx)
        .rule(Rule::text("occupation.job_title", 255).required())
        .rule(Rule::text("occupation.job_description", 1024).required())
        .rule(Rule::field("occupation.bls_code", FieldKind::Format(Format::SocCode)).required())
        .rule(Rule::text("occupation.bls_title", 255).required())
        .rule(Rule::text("occupation.bls_description", 2048))
}
