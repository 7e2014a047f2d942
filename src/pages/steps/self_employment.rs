use serde_json::{json, Value};

use crate::validation::{Condition, FieldKind, Rule, Schema, SchemaContext};

pub fn skeleton() -> Value {
    json!({
        "self_employment": {
            "is_self_employed": null,
            "ownership_in_business": null,
            "name_of_business": "",
            "is_corporate_officer": null,
            "name_of_corporation": "",
            "related_to_owner_or_child_of_owner_under_18": null,
        },
    })
}

pub fn schema(ctx: &SchemaContext) -> Schema {
    Schema::new(ctx)
        .rule(Rule::field("self_employment.is_self_employed", FieldKind::Bool).required())
        .rule(Rule::field("self_employment.ownership_in_business", FieldKind::Bool).required())
        .rule(
            Rule::text("self_employment.name_of_business", 255)
                .required()
                .when(Condition::equals("self_employment.ownership_in_business", true)),
        )
        .rule(Rule::field("self_employment.is_corporate_officer", FieldKind::Bool).required())
        .rule(
            Rule::text("self_employment.name_of_corporation", 255)
                .required()
                .when(Condition::equals("self_employment.is_corporate_officer", true)),
        )
        .rule(
            Rule::field(
                "self_employment.related_to_owner_or_child_of_owner_under_18",
                FieldKind::Bool,
            )
            .required(),
        )
}
