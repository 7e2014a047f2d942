use serde_json::{json, Value};

use super::{address_rules, address_skeleton, gated};
use crate::reconcile::FlagRef;
use crate::validation::{Condition, FieldKind, Rule, Schema, SchemaContext};

pub fn skeleton() -> Value {
    json!({
        "claimant_name": {"first_name": "", "middle_name": "", "last_name": ""},
        "alternate_names": [],
        "residence_address": address_skeleton(),
        "mailing_address": address_skeleton(),
    })
}

fn name_rules(prefix: &str) -> Vec<Rule> {
    vec![
        Rule::text(format!("{}first_name", prefix), 36).required(),
        Rule::text(format!("{}middle_name", prefix), 36),
        Rule::text(format!("{}last_name", prefix), 36).required(),
    ]
}

pub fn schema(ctx: &SchemaContext) -> Schema {
    Schema::new(ctx)
        .rules(name_rules("claimant_name."))
        .rule(Rule::flag(FlagRef::HasAlternateNames))
        .rule(
            Rule::field("alternate_names", FieldKind::List(name_rules("")))
                .required()
                .when(Condition::flag(FlagRef::HasAlternateNames, true)),
        )
        .rules(address_rules("residence_address"))
        .rule(Rule::flag(FlagRef::MailingAddressSame))
        .rules(gated(
            address_rules("mailing_address"),
            &Condition::flag(FlagRef::MailingAddressSame, false),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::steps::fixtures::{address, ctx};
    use crate::reconcile::reconcile;
    use crate::pages::PageRegistry;

    #[test]
    fn test_alternate_names_required_once_flagged() {
        let partial = json!({
            "claimant_name": {"first_name": "Ada", "last_name": "Lovelace"},
            "residence_address": address("1 Main St"),
            "mailing_address": address("1 Main St")
        });
        let mut snapshot = reconcile(&PageRegistry::standard(), None, Some(&partial));
        assert!(schema(&ctx()).validate(&snapshot).is_ok());

        snapshot.flags.set(FlagRef::HasAlternateNames, true);
        let failure = schema(&ctx()).validate(&snapshot).unwrap_err();
        assert_eq!(failure.paths(), vec!["alternate_names"]);
    }

    #[test]
    fn test_mailing_address_checked_when_different() {
        let partial = json!({
            "claimant_name": {"first_name": "Ada", "last_name": "Lovelace"},
            "residence_address": address("1 Main St"),
            "mailing_address": {"address1": "PO Box 9", "city": "Springfield", "state": "ZZ"}
        });
        let snapshot = reconcile(&PageRegistry::standard(), None, Some(&partial));
        let failure = schema(&ctx()).validate(&snapshot).unwrap_err();
        assert_eq!(
            failure.paths(),
            vec!["mailing_address.state", "mailing_address.zipcode"]
        );
    }
}
