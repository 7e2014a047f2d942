//! Message lookup for validation errors.
//!
//! Translated resources live outside the engine; callers hand in any
//! [`TextLookup`]. [`DefaultText`] covers the built-in English strings.

/// Resolves a message key into display text
pub trait TextLookup: Send + Sync {
    fn text(&self, key: &str) -> String;
}

impl<F> TextLookup for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn text(&self, key: &str) -> String {
        self(key)
    }
}

/// Built-in English messages; unknown keys echo back unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultText;

impl TextLookup for DefaultText {
    fn text(&self, key: &str) -> String {
        let text = match key {
            "validation.required" => "This field is required",
            "validation.forbidden" => "This field must be left empty",
            "validation.invalid" => "This value is not valid",
            "validation.max_length" => "This value is too long",
            "validation.one_of" => "Choose one of the listed options",
            "validation.many_of" => "Choose only from the listed options",
            "validation.date" => "Enter a date as YYYY-MM-DD",
            "validation.future_date" => "This date cannot be in the future",
            "validation.date_too_early" => "This date is too far in the past",
            "validation.date_order" => "This date must come after the earlier date",
            "validation.currency" => "Enter a whole number of cents",
            "validation.ssn" => "Enter a 9-digit Social Security number",
            "validation.zip" => "Enter a 5-digit ZIP code",
            "validation.phone" => "Enter a 10-digit phone number",
            "validation.email" => "Enter a valid email address",
            "validation.routing_number" => "Enter a 9-digit routing number",
            "validation.account_number" => "Enter an account number of 4 to 17 digits",
            "validation.fein" => "Enter a 9-digit employer identification number",
            "validation.soc_code" => "Choose an occupation from the list",
            "validation.alien_registration" => "Enter a valid alien registration number",
            "validation.tracking_length" => "Answer whether more entries follow each entry",
            other => return other.to_string(),
        };
        text.to_string()
    }
}
