//! Field-level request validation.
//!
//! Requests derive `garde::Validate`; the rules shared between requests live
//! here as custom checks. Failures are collected into [`ValidationErrors`]
//! before any account is touched.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;

use prestige_shared::types::Currency;

/// Largest number of decimal places an amount may carry.
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

/// Amounts must stay below this (15 digits, 2 of them decimals for fiat).
const AMOUNT_LIMIT: Decimal = dec!(10000000000000);

/// Longest free-form description accepted.
pub const MAX_DESCRIPTION_LENGTH: usize = 255;

/// A single failed field rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Field path, e.g. `amount`.
    pub field: String,
    /// Human readable message.
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Every field rule a request failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize)]
#[error("Validation failed: {}", join_fields(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn join_fields(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Creates an empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An error set with one failed field.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Records a failed field rule.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Returns true if no rule failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The failed rules, in the order they were found.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns true if `field` failed at least one rule.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

impl From<garde::Report> for ValidationErrors {
    fn from(report: garde::Report) -> Self {
        let mut errors = Self::new();
        for (path, error) in report.iter() {
            errors.add(path.to_string(), error.to_string());
        }
        errors
    }
}

/// Runs the request's field rules.
pub fn validate<T: garde::Validate<Context = ()>>(request: &T) -> Result<(), ValidationErrors> {
    request.validate().map_err(ValidationErrors::from)
}

// ========== Shared field rules ==========

/// Amounts are at least 0.01, carry at most 2 decimal places and 15 digits.
pub fn amount(value: &Decimal, _ctx: &()) -> garde::Result {
    amount_with_places(*value, AMOUNT_DECIMAL_PLACES)
}

/// Amounts denominated in `currency`: at least one minor unit, and no finer
/// than the currency's precision (8 places for BTC, 2 for GHS).
pub fn amount_in(currency: Currency) -> impl FnOnce(&Decimal, &()) -> garde::Result {
    move |value, _| amount_with_places(*value, currency.decimal_places())
}

fn amount_with_places(value: Decimal, places: u32) -> garde::Result {
    let minimum = Decimal::new(1, places);
    if value < minimum {
        return Err(garde::Error::new(format!(
            "Ensure this value is greater than or equal to {minimum}."
        )));
    }
    if value.normalize().scale() > places {
        return Err(garde::Error::new(format!(
            "Ensure that there are no more than {places} decimal places."
        )));
    }
    if value >= AMOUNT_LIMIT {
        return Err(garde::Error::new(
            "Ensure that there are no more than 15 digits in total.",
        ));
    }
    Ok(())
}

/// Optional prices must be positive when given.
pub fn optional_price(value: &Option<Decimal>, _ctx: &()) -> garde::Result {
    match value {
        Some(price) if *price <= Decimal::ZERO => {
            Err(garde::Error::new("Price levels must be positive."))
        }
        _ => Ok(()),
    }
}

/// Descriptions are optional but bounded.
pub fn description(value: &Option<String>, _ctx: &()) -> garde::Result {
    match value {
        Some(text) if text.chars().count() > MAX_DESCRIPTION_LENGTH => Err(garde::Error::new(
            format!("Ensure this value has at most {MAX_DESCRIPTION_LENGTH} characters."),
        )),
        _ => Ok(()),
    }
}

/// Mobile numbers are up to 15 digits with an optional leading `+`.
pub fn mobile_number(value: &str, _ctx: &()) -> garde::Result {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if digits.len() < 9 || digits.len() > 15 {
        return Err(garde::Error::new(
            "Enter a mobile number of 9 to 15 digits, e.g. 0244123456.",
        ));
    }
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(garde::Error::new("Mobile numbers may only contain digits."));
    }
    Ok(())
}

/// Market symbols are upper-case alphanumerics, e.g. `BTCUSDT`.
pub fn symbol(value: &str, _ctx: &()) -> garde::Result {
    if value.is_empty() || value.len() > 20 {
        return Err(garde::Error::new("Symbols are 1 to 20 characters."));
    }
    if !value
        .chars()
        .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
    {
        return Err(garde::Error::new(
            "Symbols may only contain upper-case letters and digits.",
        ));
    }
    Ok(())
}

/// Free-text identifiers (biller codes, customer references) must not be blank.
pub fn not_blank(value: &str, _ctx: &()) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new("This field is required."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(dec!(0.01), true)]
    #[case(dec!(20), true)]
    #[case(dec!(20.50), true)]
    #[case(dec!(20.500), true)]
    #[case(dec!(9999999999999.99), true)]
    #[case(dec!(0), false)]
    #[case(dec!(0.001), false)]
    #[case(dec!(-5), false)]
    #[case(dec!(10.005), false)]
    #[case(dec!(10000000000000), false)]
    fn test_amount_rule(#[case] value: Decimal, #[case] valid: bool) {
        assert_eq!(amount(&value, &()).is_ok(), valid);
    }

    #[rstest]
    #[case("0244123456", true)]
    #[case("+233244123456", true)]
    #[case("02441", false)]
    #[case("0244-123-456", false)]
    #[case("+233244123456789", true)]
    #[case("+2332441234567890", false)]
    #[case("1234567890123456", false)]
    fn test_mobile_number_rule(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(mobile_number(value, &()).is_ok(), valid);
    }

    #[rstest]
    #[case(Currency::Btc, dec!(0.0015), true)]
    #[case(Currency::Btc, dec!(0.00000001), true)]
    #[case(Currency::Btc, dec!(0.000000001), false)]
    #[case(Currency::Eth, dec!(2.5), true)]
    #[case(Currency::Usdt, dec!(0.000001), true)]
    #[case(Currency::Usdt, dec!(0.0000001), false)]
    #[case(Currency::Ghs, dec!(0.01), true)]
    #[case(Currency::Ghs, dec!(0.001), false)]
    #[case(Currency::Ghs, dec!(10000000000000), false)]
    fn test_amount_in_follows_currency_precision(
        #[case] currency: Currency,
        #[case] value: Decimal,
        #[case] valid: bool,
    ) {
        assert_eq!(amount_in(currency)(&value, &()).is_ok(), valid);
    }

    #[rstest]
    #[case("BTCUSDT", true)]
    #[case("btcusdt", false)]
    #[case("", false)]
    fn test_symbol_rule(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(symbol(value, &()).is_ok(), valid);
    }

    #[test]
    fn test_errors_display_every_field() {
        let mut errors = ValidationErrors::single("amount", "too small");
        errors.add("mobile_number", "too short");
        assert!(errors.has_field("amount"));
        assert!(!errors.has_field("network"));
        assert_eq!(
            errors.to_string(),
            "Validation failed: amount: too small; mobile_number: too short"
        );
    }
}
