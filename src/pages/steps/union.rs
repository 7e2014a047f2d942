use serde_json::{json, Value};

use crate::validation::{Condition, FieldKind, Rule, Schema, SchemaContext};

pub fn skeleton() -> Value {
    json!({
        "union": {
            "is_union_member": null,
            "union_name": "",
            "union_local_number": "",
            "required_to_seek_work_through_hiring_hall": null,
        },
    })
}

pub fn schema(ctx: &SchemaContext) -> Schema {
    let member = Condition::equals("union.is_union_member", true);
    Schema::new(ctx)
        .rule(Rule::field("union.is_union_member", FieldKind::Bool).required())
        .rule(Rule::text("union.union_name", 64).required().when(member.clone()))
        .rule(Rule::text("union.union_local_number", 16).required().when(member.clone()))
        .rule(
            Rule::field("union.required_to_seek_work_through_hiring_hall", FieldKind::Bool)
                .required()
                .when(member),
        )
}
