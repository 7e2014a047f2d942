use serde_json::{json, Value};

use crate::validation::{Condition, FieldKind, Format, Rule, Schema, SchemaContext};

const PAYMENT_METHODS: &[&str] = &["direct_deposit", "debit"];
const ACCOUNT_TYPES: &[&str] = &["checking", "savings"];

pub fn skeleton() -> Value {
    json!({
        "federal_income_tax_withholding": null,
        "payment": {
            "payment_method": null,
            "account_type": null,
            "routing_number": "",
            "account_number": "",
        },
    })
}

fn bank_rules() -> Vec<Rule> {
    vec![
        Rule::field("payment.account_type", FieldKind::OneOf(ACCOUNT_TYPES)),
        Rule::field("payment.routing_number", FieldKind::Format(Format::RoutingNumber)),
        Rule::field("payment.account_number", FieldKind::Format(Format::AccountNumber)),
    ]
}

pub fn schema(ctx: &SchemaContext) -> Schema {
    let deposit = Condition::equals("payment.payment_method", "direct_deposit");
    let debit = Condition::equals("payment.payment_method", "debit");

    Schema::new(ctx)
        .rule(Rule::field("federal_income_tax_withholding", FieldKind::Bool).required())
        .rule(Rule::field("payment.payment_method", FieldKind::OneOf(PAYMENT_METHODS)).required())
        .rules(
            bank_rules()
                .into_iter()
                .map(|rule| rule.required().when(deposit.clone())),
        )
        .rules(
            bank_rules()
                .into_iter()
                .map(|rule| rule.forbidden().when(debit.clone())),
        )
}
