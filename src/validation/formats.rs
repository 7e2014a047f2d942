//! String formats accepted by claim fields.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SSN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3}-?[0-9]{2}-?[0-9]{4}$").unwrap());
static ZIP: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{5}(-[0-9]{4})?$").unwrap());
static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\+1[ .-]?)?(\([0-9]{3}\)|[0-9]{3})[ .-]?[0-9]{3}[ .-]?[0-9]{4}$").unwrap()
});
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());
static ROUTING_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{9}$").unwrap());
static ACCOUNT_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4,17}$").unwrap());
static FEIN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2}-?[0-9]{7}$").unwrap());
static SOC_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{2}-[0-9]{4}\.[0-9]{2}$").unwrap());
static ALIEN_REGISTRATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([Aa]-?)?[0-9]{7,9}$").unwrap());
static CURRENCY_CENTS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(0|[1-9][0-9]*)$").unwrap());
static ISO_DATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap());

/// Pattern-checked string formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    Ssn,
    Zip,
    Phone,
    Email,
    RoutingNumber,
    AccountNumber,
    Fein,
    SocCode,
    AlienRegistration,
}

impl Format {
    fn regex(self) -> &'static Regex {
        match self {
            Format::Ssn => &*SSN,
            Format::Zip => &*ZIP,
            Format::Phone => &*PHONE,
            Format::Email => &*EMAIL,
            Format::RoutingNumber => &*ROUTING_NUMBER,
            Format::AccountNumber => &*ACCOUNT_NUMBER,
            Format::Fein => &*FEIN,
            Format::SocCode => &*SOC_CODE,
            Format::AlienRegistration => &*ALIEN_REGISTRATION,
        }
    }

    /// Check a candidate string against this format
    pub fn matches(self, value: &str) -> bool {
        self.regex().is_match(value.trim())
    }

    /// Message key reported when the format does not match
    pub fn message_key(self) -> &'static str {
        match self {
            Format::Ssn => "validation.ssn",
            Format::Zip => "validation.zip",
            Format::Phone => "validation.phone",
            Format::Email => "validation.email",
            Format::RoutingNumber => "validation.routing_number",
            Format::AccountNumber => "validation.account_number",
            Format::Fein => "validation.fein",
            Format::SocCode => "validation.soc_code",
            Format::AlienRegistration => "validation.alien_registration",
        }
    }
}

/// Canonical integer-cent amount: no sign, separators, decimals or leading zeros
pub fn is_canonical_cents(value: &str) -> bool {
    CURRENCY_CENTS.is_match(value)
}

/// Parse a strict `YYYY-MM-DD` calendar date
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    if !ISO_DATE.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}
