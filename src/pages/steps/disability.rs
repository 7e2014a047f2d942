use serde_json::{json, Value};

use crate::validation::{Condition, DateRange, FieldKind, Rule, Schema, SchemaContext};

const DISABILITY_TYPES: &[&str] = &["state_plan", "private_plan", "workers_compensation"];

pub fn skeleton() -> Value {
    json!({
        "disability": {
            "has_collected_disability": null,
            "disabled_immediately_before": null,
            "type_of_disability": null,
            "date_disability_began": "",
            "recovery_date": "",
            "contacted_last_employer_after_recovery": null,
        },
    })
}

pub fn schema(ctx: &SchemaContext) -> Schema {
    let collected = Condition::equals("disability.has_collected_disability", true);
    Schema::new(ctx)
        .rule(Rule::field("disability.has_collected_disability", FieldKind::Bool).required())
        .rule(
            Rule::field("disability.disabled_immediately_before", FieldKind::Bool)
                .required()
                .when(collected.clone()),
        )
        .rule(
            Rule::field("disability.type_of_disability", FieldKind::OneOf(DISABILITY_TYPES))
                .required()
                .when(collected.clone()),
        )
        .rule(
            Rule::field("disability.date_disability_began", FieldKind::Date(DateRange::past()))
                .required()
                .when(collected.clone()),
        )
        .rule(Rule::field(
            "disability.recovery_date",
            FieldKind::Date(DateRange::past().on_or_after("disability.date_disability_began")),
        ))
        .rule(
            Rule::field("disability.contacted_last_employer_after_recovery", FieldKind::Bool)
                .required()
                .when(Condition::present("disability.recovery_date")),
        )
        .rules(
            [
                "disability.disabled_immediately_before",
                "disability.type_of_disability",
                "disability.date_disability_began",
                "disability.recovery_date",
            ]
            .into_iter()
            .map(|path| {
                Rule::field(path, FieldKind::Text { max_length: None })
                    .forbidden()
                    .when(Condition::equals("disability.has_collected_disability", false))
            }),
        )
}
