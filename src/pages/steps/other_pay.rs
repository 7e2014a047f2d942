use serde_json::{json, Value};

use crate::validation::{Condition, DateRange, FieldKind, Rule, Schema, SchemaContext};

const PAY_TYPES: &[&str] = &[
    "vacation_sick_pto",
    "final_paycheck",
    "severance_or_continuation",
    "holiday",
    "pension_annuity_retirement",
    "other_pay",
    "no_other_pay",
];

/// Pay types that come with an amount and a date
const PAID_TYPES: &[&str] = &[
    "vacation_sick_pto",
    "final_paycheck",
    "severance_or_continuation",
    "holiday",
    "pension_annuity_retirement",
    "other_pay",
];

pub fn skeleton() -> Value {
    json!({ "other_pay": [] })
}

pub fn schema(ctx: &SchemaContext) -> Schema {
    let entry = vec![
        Rule::field("pay_type", FieldKind::OneOf(PAY_TYPES)).required(),
        Rule::field("total", FieldKind::Currency)
            .required()
            .when(Condition::any_of("pay_type", PAID_TYPES)),
        Rule::field("date_received", FieldKind::Date(DateRange::past()))
            .required()
            .when(Condition::any_of("pay_type", PAID_TYPES)),
        Rule::text("note", 1024),
    ];
    Schema::new(ctx).rule(Rule::field("other_pay", FieldKind::List(entry)).required())
}
