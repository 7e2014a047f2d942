//! One segment per employer in the `employers` collection.

use serde_json::{json, Value};

use super::{address_rules, gated};
use crate::claim::{SeparationReason, Snapshot};
use crate::reconcile::FlagRef;
use crate::segment::{self, Segment};
use crate::validation::{
    ArrayRule, Condition, DateRange, FieldKind, Format, Rule, Schema, SchemaContext,
};

/// Claim array holding one entry per employer
pub const COLLECTION: &str = "employers";

/// Stored keys of every [`SeparationReason`], in display order
pub const SEPARATION_REASON_KEYS: &[&str] = &[
    "laid_off",
    "fired",
    "still_employed",
    "quit",
    "strike",
    "retired",
    "shutdown",
];

pub fn skeleton() -> Value {
    json!({ COLLECTION: [] })
}

/// Whole-step check: at least one employer and an aligned tracking array.
///
/// Only `PageDefinition::base_schema` callers see this; routes and the
/// resolver validate the employer step one segment at a time.
pub fn schema(ctx: &SchemaContext) -> Schema {
    Schema::new(ctx)
        .rule(Rule::field(COLLECTION, FieldKind::List(Vec::new())).required())
        .shared(ArrayRule::TrackingAligned {
            collection: COLLECTION.to_string(),
        })
}

/// Rules for the employer at `index`
pub fn segment_schema(ctx: &SchemaContext, index: usize) -> Schema {
    let p = format!("{}.{}.", COLLECTION, index);
    let reason = format!("{}separation_reason", p);
    let worked = DateRange::past();
    let last_worked = DateRange::past().on_or_after(format!("{}first_work_date", p));

    let mut schema = Schema::new(ctx)
        .rule(Rule::text(format!("{}name", p), 255).required())
        .rules(address_rules(&format!("{}address", p)))
        .rule(Rule::flag(FlagRef::SameAddress(index)))
        .rules(gated(
            address_rules(&format!("{}work_site_address", p)),
            &Condition::flag(FlagRef::SameAddress(index), false),
        ))
        .rule(Rule::field(format!("{}phones.0.number", p), FieldKind::Format(Format::Phone)).required())
        .rule(Rule::flag(FlagRef::SamePhone(index)))
        .rule(
            Rule::field(format!("{}phones.1.number", p), FieldKind::Format(Format::Phone))
                .required()
                .when(Condition::flag(FlagRef::SamePhone(index), false)),
        )
        .rule(Rule::field(format!("{}fein", p), FieldKind::Format(Format::Fein)))
        .rule(Rule::field(format!("{}first_work_date", p), FieldKind::Date(worked)).required())
        .rule(Rule::field(format!("{}last_work_date", p), FieldKind::Date(last_worked.clone())))
        .rule(
            Rule::field(format!("{}last_work_date", p), FieldKind::Date(last_worked))
                .required()
                .when(Condition::any_of(
                    reason.as_str(),
                    &SeparationReason::keys_where(SeparationReason::ends_employment),
                )),
        )
        .rule(Rule::field(reason.as_str(), FieldKind::OneOf(SEPARATION_REASON_KEYS)).required());

    for variant in SeparationReason::all() {
        let option = Rule::field(
            format!("{}separation_option", p),
            FieldKind::OneOf(variant.options()),
        )
        .when(Condition::equals(reason.as_str(), variant.as_str()));
        schema = schema.rule(if variant.options().is_empty() {
            option.forbidden()
        } else {
            option.required()
        });
    }

    schema
        .rule(Rule::text(format!("{}separation_comment", p), 1024))
        .rule(
            Rule::text(format!("{}separation_comment", p), 1024)
                .required()
                .when(Condition::any_of(
                    reason.as_str(),
                    &SeparationReason::keys_where(SeparationReason::comment_required),
                )),
        )
        .rule(
            Rule::field(format!("{}expect_to_be_recalled", p), FieldKind::Bool)
                .required()
                .when(Condition::any_of(
                    reason.as_str(),
                    &SeparationReason::keys_where(SeparationReason::asks_about_recall),
                )),
        )
        .rule(
            Rule::field(
                format!("{}recall_date", p),
                FieldKind::Date(DateRange::any().on_or_after(format!("{}last_work_date", p))),
            )
            .required()
            .when(Condition::equals(format!("{}expect_to_be_recalled", p), true)),
        )
        .rule(Rule::flag(FlagRef::MoreEmployers(index)))
        .shared(ArrayRule::TrackingAligned {
            collection: COLLECTION.to_string(),
        })
}

/// Another employer follows the one at `segment`
pub fn repeatable(segment: Segment, snapshot: &Snapshot) -> bool {
    segment::repeatable(segment, snapshot.flags.tracking(COLLECTION).unwrap_or_default())
}
