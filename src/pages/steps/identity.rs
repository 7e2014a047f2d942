use chrono::Datelike;
use serde_json::{json, Value};

use super::US_STATES;
use crate::validation::{Condition, DateRange, FieldKind, Format, Rule, Schema, SchemaContext};

const AUTHORIZATION_TYPES: &[&str] = &[
    "US_citizen_or_national",
    "permanent_resident",
    "temporary_legal_worker",
];

/// Authorization types that come with an alien registration number
const REGISTERED_TYPES: &[&str] = &["permanent_resident", "temporary_legal_worker"];

/// Oldest accepted birthdate, in years before today
const MAX_AGE_YEARS: i32 = 120;

pub fn skeleton() -> Value {
    json!({
        "ssn": "",
        "birthdate": "",
        "work_authorization": {
            "authorized_to_work": null,
            "authorization_type": null,
            "alien_registration_number": "",
        },
        "state_credential": {
            "drivers_license_or_state_id_number": "",
            "issuer": null,
        },
    })
}

pub fn schema(ctx: &SchemaContext) -> Schema {
    let birthdate = DateRange {
        not_before: ctx.today.with_year(ctx.today.year() - MAX_AGE_YEARS),
        ..DateRange::past()
    };

    Schema::new(ctx)
        .rule(Rule::field("ssn", FieldKind::Format(Format::Ssn)).required())
        .rule(Rule::field("birthdate", FieldKind::Date(birthdate)).required())
        .rule(Rule::field("work_authorization.authorized_to_work", FieldKind::Bool).required())
        .rule(
            Rule::field(
                "work_authorization.authorization_type",
                FieldKind::OneOf(AUTHORIZATION_TYPES),
            )
            .required()
            .when(Condition::equals("work_authorization.authorized_to_work", true)),
        )
        .rule(
            Rule::field(
                "work_authorization.alien_registration_number",
                FieldKind::Format(Format::AlienRegistration),
            )
            .required()
            .when(Condition::any_of(
                "work_authorization.authorization_type",
                REGISTERED_TYPES,
            )),
        )
        .rule(
            Rule::field(
                "work_authorization.alien_registration_number",
                FieldKind::Format(Format::AlienRegistration),
            )
            .forbidden()
            .when(Condition::equals(
                "work_authorization.authorization_type",
                "US_citizen_or_national",
            )),
        )
        .rule(Rule::text("state_credential.drivers_license_or_state_id_number", 20))
        .rule(
            Rule::field("state_credential.issuer", FieldKind::OneOf(US_STATES))
                .required()
                .when(Condition::present(
                    "state_credential.drivers_license_or_state_id_number",
                )),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{Claim, Snapshot};
    use crate::pages::steps::fixtures::ctx;
    use crate::reconcile::DerivedFlags;

    fn snapshot(value: Value) -> Snapshot {
        let claim = Claim::from_value(value).unwrap();
        let flags = DerivedFlags::derive(&claim);
        Snapshot::new(claim, flags)
    }

    #[test]
    fn test_registration_number_follows_authorization_type() {
        let base = json!({
            "ssn": "555-55-5555",
            "birthdate": "1980-12-10",
            "work_authorization": {
                "authorized_to_work": true,
                "authorization_type": "permanent_resident",
                "alien_registration_number": ""
            }
        });
        let failure = schema(&ctx()).validate(&snapshot(base)).unwrap_err();
        assert_eq!(
            failure.paths(),
            vec!["work_authorization.alien_registration_number"]
        );
        assert_eq!(failure.errors[0].key, "validation.required");

        let citizen = json!({
            "ssn": "555-55-5555",
            "birthdate": "1980-12-10",
            "work_authorization": {
                "authorized_to_work": true,
                "authorization_type": "US_citizen_or_national",
                "alien_registration_number": "A123456789"
            }
        });
        let failure = schema(&ctx()).validate(&snapshot(citizen)).unwrap_err();
        assert_eq!(failure.errors[0].key, "validation.forbidden");
    }

    #[test]
    fn test_birthdate_window() {
        let failure = schema(&ctx())
            .validate(&snapshot(json!({
                "ssn": "555-55-5555",
                "birthdate": "1890-01-01",
                "work_authorization": {"authorized_to_work": false}
            })))
            .unwrap_err();
        assert_eq!(failure.errors[0].key, "validation.date_too_early");
    }

    #[test]
    fn test_birthdate_not_in_future() {
        let failure = schema(&ctx())
            .validate(&snapshot(json!({
                "ssn": "555-55-5555",
                "birthdate": "2024-06-02",
                "work_authorization": {"authorized_to_work": false}
            })))
            .unwrap_err();
        assert_eq!(failure.paths(), vec!["birthdate"]);
        assert_eq!(failure.errors[0].key, "validation.future_date");

        let today = json!({
            "ssn": "555-55-5555",
            "birthdate": "2024-06-01",
            "work_authorization": {"authorized_to_work": false}
        });
        assert!(schema(&ctx()).validate(&snapshot(today)).is_ok());
    }

    #[test]
    fn test_issuer_required_with_credential_number() {
        let failure = schema(&ctx())
            .validate(&snapshot(json!({
                "ssn": "555-55-5555",
                "birthdate": "1980-12-10",
                "work_authorization": {"authorized_to_work": false},
                "state_credential": {"drivers_license_or_state_id_number": "D1234567"}
            })))
            .unwrap_err();
        assert_eq!(failure.paths(), vec!["state_credential.issuer"]);
    }
}
