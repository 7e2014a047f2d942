use serde_json::{json, Value};

use crate::validation::{Condition, FieldKind, Format, Rule, Schema, SchemaContext};

const PHONE_TYPES: &[&str] = &["mobile", "home", "work"];

pub fn skeleton() -> Value {
    json!({
        "email": "",
        "phones": [{"number": "", "type": null, "sms": null}],
        "interpreter_required": null,
        "preferred_language": "",
    })
}

pub fn schema(ctx: &SchemaContext) -> Schema {
    Schema::new(ctx)
        .rule(Rule::field("email", FieldKind::Format(Format::Email)).required())
        .rule(Rule::field("phones.0.number", FieldKind::Format(Format::Phone)).required())
        .rule(Rule::field("phones.0.type", FieldKind::OneOf(PHONE_TYPES)).required())
        .rule(Rule::field("phones.0.sms", FieldKind::Bool))
        .rule(Rule::field("phones.1.number", FieldKind::Format(Format::Phone)))
        .rule(
            Rule::field("phones.1.type", FieldKind::OneOf(PHONE_TYPES))
                .required()
                .when(Condition::present("phones.1.number")),
        )
        .rule(Rule::field("interpreter_required", FieldKind::Bool).required())
        .rule(
            Rule::text("preferred_language", 32)
                .required()
                .when(Condition::equals("interpreter_required", true)),
        )
}
