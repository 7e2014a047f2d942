//! End-to-end wizard sessions through the public library API.
//!
//! A claimant signs in, fills steps across sessions, and resumes where the
//! saved claim stops validating. Storage goes through the file-backed store.

use chrono::NaiveDate;
use serde_json::{json, Value};
use tempfile::TempDir;

use claimform::claim::{Claim, IdentityBundle};
use claimform::progress::{resolve, ResumePoint};
use claimform::reconcile::{mirror_same_fields, reconcile};
use claimform::segment::{next_path, previous_path};
use claimform::store::{ClaimStore, FileClaimStore};
use claimform::{PageRegistry, SchemaContext, Segment, Snapshot};

const BASE: &str = "/claim";

fn ctx() -> SchemaContext {
    SchemaContext::english(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
}

fn identity() -> IdentityBundle {
    IdentityBundle {
        first_name: Some("Grace".to_string()),
        last_name: Some("Hopper".to_string()),
        ssn: Some("555-55-5555".to_string()),
        birthdate: Some("1970-01-15".to_string()),
        email: Some("grace@example.com".to_string()),
        ..Default::default()
    }
}

fn address(line: &str) -> Value {
    json!({
        "address1": line,
        "address2": "",
        "city": "Arlington",
        "state": "VA",
        "zipcode": "22201"
    })
}

fn employer(name: &str) -> Value {
    json!({
        "name": name,
        "address": address("9 Navy Yard"),
        "phones": [{"number": "703-555-0101"}],
        "fein": "",
        "first_work_date": "2015-02-01",
        "last_work_date": "2024-05-15",
        "separation_reason": "laid_off",
        "separation_option": "lack_of_work",
        "separation_comment": "",
        "expect_to_be_recalled": false,
        "recall_date": ""
    })
}

/// Answers for every step after the identity-prefilled fields
fn answers() -> Value {
    json!({
        "claimant_name": {"first_name": "Grace", "middle_name": "", "last_name": "Hopper"},
        "alternate_names": [],
        "residence_address": address("1 Compiler Way"),
        "mailing_address": address("1 Compiler Way"),
        "email": "grace@example.com",
        "phones": [{"number": "703-555-0199", "type": "home", "sms": false}],
        "interpreter_required": false,
        "preferred_language": "",
        "sex": "female",
        "ethnicity": "not_hispanic",
        "race": ["white"],
        "education_level": "doctorate",
        "ssn": "555-55-5555",
        "birthdate": "1970-01-15",
        "work_authorization": {
            "authorized_to_work": true,
            "authorization_type": "US_citizen_or_national",
            "alien_registration_number": ""
        },
        "state_credential": {"drivers_license_or_state_id_number": "", "issuer": null},
        "employers": [employer("Eckert-Mauchly"), employer("Remington Rand")],
        "self_employment": {
            "is_self_employed": false,
            "ownership_in_business": false,
            "name_of_business": "",
            "is_corporate_officer": false,
            "name_of_corporation": "",
            "related_to_owner_or_child_of_owner_under_18": false
        },
        "other_pay": [{"pay_type": "no_other_pay"}],
        "occupation": {
            "job_title": "Programmer",
            "job_description": "Wrote compilers for business data processing",
            "bls_code": "15-1252.00",
            "bls_title": "Software Developers",
            "bls_description": ""
        },
        "student_fulltime_in_last_18_months": false,
        "attending_college_or_job_training": false,
        "registered_with_vocational_rehab": false,
        "union": {
            "is_union_member": false,
            "union_name": "",
            "union_local_number": "",
            "required_to_seek_work_through_hiring_hall": null
        },
        "disability": {
            "has_collected_disability": false,
            "disabled_immediately_before": null,
            "type_of_disability": null,
            "date_disability_began": "",
            "recovery_date": "",
            "contacted_last_employer_after_recovery": null
        },
        "federal_income_tax_withholding": true,
        "payment": {
            "payment_method": "debit",
            "account_type": null,
            "routing_number": "",
            "account_number": ""
        }
    })
}

/// Split a rendered path back into a step index and segment
fn locate(registry: &PageRegistry, path: &str) -> (usize, Segment) {
    let rest = path.strip_prefix(BASE).unwrap().trim_matches('/');
    let mut parts = rest.split('/');
    let slug = parts.next().unwrap();
    let (index, _) = registry.find(slug).unwrap();
    let segment = Segment::from_token(parts.next()).unwrap();
    (index, segment)
}

#[test]
fn test_first_session_starts_on_personal_with_identity_applied() {
    let registry = PageRegistry::standard();
    let snapshot = reconcile(&registry, Some(&identity()), None);

    assert_eq!(snapshot.claim.text("ssn"), Some("555-55-5555"));
    assert_eq!(snapshot.claim.text("claimant_name.first_name"), Some("Grace"));
    assert_eq!(snapshot.claim.text("email"), Some("grace@example.com"));

    let resolution = resolve(&registry, &ctx(), &snapshot, BASE);
    assert_eq!(resolution.point, ResumePoint::Page { index: 0 });
    assert_eq!(resolution.path, "/claim/personal/");
}

#[test]
fn test_identity_overrides_restored_name_but_not_restored_email() {
    let registry = PageRegistry::standard();
    let mut restored = answers();
    restored["ssn"] = json!("111-11-1111");
    restored["email"] = json!("hopper@navy.mil");

    let snapshot = reconcile(&registry, Some(&identity()), Some(&restored));
    assert_eq!(snapshot.claim.text("ssn"), Some("555-55-5555"));
    assert_eq!(snapshot.claim.text("email"), Some("hopper@navy.mil"));
}

#[test]
fn test_walking_every_step_visits_each_employer_and_completes() {
    let registry = PageRegistry::standard();
    let ctx = ctx();
    let snapshot = reconcile(&registry, Some(&identity()), Some(&answers()));

    let mut path = registry.path_for(BASE, 0, None);
    let mut visited = Vec::new();
    while path != registry.final_path(BASE) {
        let (index, segment) = locate(&registry, &path);
        let page = registry.get(index).unwrap();
        page.schema_for(&ctx, segment)
            .validate(&snapshot)
            .unwrap_or_else(|f| panic!("{} failed: {:?}", path, f.paths()));
        visited.push(path.clone());
        path = next_path(&registry, BASE, index, segment, &snapshot);
    }

    assert_eq!(visited.len(), registry.len() + 1);
    assert!(visited.contains(&"/claim/employer/".to_string()));
    assert!(visited.contains(&"/claim/employer/1/".to_string()));
    assert_eq!(visited.last().map(String::as_str), Some("/claim/payment/"));
}

#[test]
fn test_back_from_the_step_after_employers_lands_on_last_entry() {
    let registry = PageRegistry::standard();
    let snapshot = reconcile(&registry, None, Some(&answers()));
    let (index, _) = registry.find("self-employment").unwrap();

    let back = previous_path(&registry, BASE, index, Segment::NotStarted, &snapshot);
    assert_eq!(back.as_deref(), Some("/claim/employer/1/"));
}

#[test]
fn test_invalid_second_employer_resumes_on_its_segment() {
    let registry = PageRegistry::standard();
    let mut restored = answers();
    restored["employers"][1]["last_work_date"] = json!("2010-01-01");

    let snapshot = reconcile(&registry, Some(&identity()), Some(&restored));
    let resolution = resolve(&registry, &ctx(), &snapshot, BASE);

    let (employer_index, _) = registry.find("employer").unwrap();
    assert_eq!(
        resolution.point,
        ResumePoint::Segment {
            index: employer_index,
            segment: Segment::Index(1)
        }
    );
    assert_eq!(resolution.path, "/claim/employer/1/");
}

#[tokio::test]
async fn test_sessions_persist_and_resume_through_the_file_store() {
    let dir = TempDir::new().unwrap();
    let store = FileClaimStore::new(dir.path());
    let registry = PageRegistry::standard();
    let ctx = ctx();

    // First session stops before any employer was entered
    let mut partial = answers();
    partial["employers"] = json!([]);
    let claim = Claim::from_value(partial).unwrap();
    store.save("grace-1", &claim, false).await.unwrap();

    let restored = store.load_partial("grace-1").await.unwrap();
    let snapshot = reconcile(&registry, Some(&identity()), restored.as_ref());
    let resolution = resolve(&registry, &ctx, &snapshot, BASE);
    assert_eq!(resolution.path, "/claim/employer/0/");

    // Second session fills the employers and finishes
    let mut snapshot: Snapshot = reconcile(&registry, Some(&identity()), Some(&answers()));
    mirror_same_fields(&mut snapshot);
    let resolution = resolve(&registry, &ctx, &snapshot, BASE);
    assert!(resolution.is_complete());
    assert_eq!(resolution.path, "/claim/success/");

    store
        .save("grace-1", snapshot.persisted(), true)
        .await
        .unwrap();
    assert_eq!(store.load_partial("grace-1").await.unwrap(), None);

    let completed = store.load_completed("grace-1").await.unwrap().unwrap();
    assert_eq!(completed["employers"][1]["name"], "Remington Rand");
    assert!(completed.get("LOCAL_more_employers").is_none());
}
