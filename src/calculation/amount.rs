//! Amount parsing and display rounding.
//!
//! Salary inputs arrive as free text from forms. This module is the one
//! place that text becomes a [`Decimal`]: anything that does not parse is
//! read as zero rather than rejected, so a calculation always produces a
//! number.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer};

/// Number of decimal places monetary figures are shown with.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Rounds an amount to two decimals, halves away from zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_for_display;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round_for_display(Decimal::from_str("177.4193").unwrap()), Decimal::from_str("177.42").unwrap());
/// assert_eq!(round_for_display(Decimal::from_str("0.125").unwrap()), Decimal::from_str("0.13").unwrap());
/// assert_eq!(round_for_display(Decimal::from_str("-0.125").unwrap()), Decimal::from_str("-0.13").unwrap());
/// ```
pub fn round_for_display(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Parses free text into an amount, reading anything unparseable as zero.
///
/// Surrounding whitespace is ignored. Plain (`"12.50"`, `"-3"`) and
/// scientific (`"1.5e3"`) notation are accepted.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount(" 250.5 "), Decimal::new(2505, 1));
/// assert_eq!(parse_amount("abc"), Decimal::ZERO);
/// assert_eq!(parse_amount(""), Decimal::ZERO);
/// ```
pub fn parse_amount(text: &str) -> Decimal {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .unwrap_or(Decimal::ZERO)
}

/// Parses free text into a non-negative amount.
///
/// Negative input is read as zero, as is anything [`parse_amount`] rejects.
pub fn parse_non_negative_amount(text: &str) -> Decimal {
    parse_amount(text).max(Decimal::ZERO)
}

/// Serde deserializer for a form amount that never fails.
///
/// Accepts a JSON number, a numeric string, or null. Strings go through
/// [`parse_non_negative_amount`]; null and any other JSON type read as zero.
///
/// ```
/// use payroll_engine::calculation::lenient_amount;
/// use rust_decimal::Decimal;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Form {
///     #[serde(default, deserialize_with = "lenient_amount")]
///     bonuses: Decimal,
/// }
///
/// let form: Form = serde_json::from_str(r#"{"bonuses": "oops"}"#).unwrap();
/// assert_eq!(form.bonuses, Decimal::ZERO);
/// ```
pub fn lenient_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    Ok(amount_from_value(&raw).unwrap_or(Decimal::ZERO))
}

/// Serde deserializer for an optional form amount that never fails.
///
/// Null, a missing field, or a blank string read as `None`; any other
/// value is parsed like [`lenient_amount`].
pub fn lenient_optional_amount<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = serde_json::Value::deserialize(deserializer)?;
    match &raw {
        serde_json::Value::Null => Ok(None),
        serde_json::Value::String(text) if text.trim().is_empty() => Ok(None),
        other => Ok(Some(amount_from_value(other).unwrap_or(Decimal::ZERO))),
    }
}

fn amount_from_value(value: &serde_json::Value) -> Option<Decimal> {
    match value {
        serde_json::Value::Number(number) => Some(parse_non_negative_amount(&number.to_string())),
        serde_json::Value::String(text) => Some(parse_non_negative_amount(text)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[derive(Debug, Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "lenient_amount")]
        amount: Decimal,
        #[serde(default, deserialize_with = "lenient_optional_amount")]
        optional: Option<Decimal>,
    }

    #[test]
    fn test_parse_plain_decimal() {
        assert_eq!(parse_amount("20.83"), dec("20.83"));
        assert_eq!(parse_amount("-100"), dec("-100"));
    }

    #[test]
    fn test_parse_scientific_notation() {
        assert_eq!(parse_amount("1.5e3"), dec("1500"));
    }

    #[test]
    fn test_unparseable_text_reads_as_zero() {
        assert_eq!(parse_amount("NaN"), Decimal::ZERO);
        assert_eq!(parse_amount("twelve"), Decimal::ZERO);
        assert_eq!(parse_amount("   "), Decimal::ZERO);
        assert_eq!(parse_amount("12abc"), Decimal::ZERO);
    }

    #[test]
    fn test_non_negative_clamps_negative_to_zero() {
        assert_eq!(parse_non_negative_amount("-5"), Decimal::ZERO);
        assert_eq!(parse_non_negative_amount("5"), dec("5"));
    }

    #[test]
    fn test_round_for_display_half_away_from_zero() {
        assert_eq!(round_for_display(dec("166.665")), dec("166.67"));
        assert_eq!(round_for_display(dec("166.664")), dec("166.66"));
        assert_eq!(round_for_display(dec("4086.7946")), dec("4086.79"));
    }

    #[test]
    fn test_lenient_amount_accepts_numbers_and_strings() {
        let form: Form = serde_json::from_str(r#"{"amount": 12.5}"#).unwrap();
        assert_eq!(form.amount, dec("12.5"));

        let form: Form = serde_json::from_str(r#"{"amount": " 300 "}"#).unwrap();
        assert_eq!(form.amount, dec("300"));
    }

    #[test]
    fn test_lenient_amount_never_fails() {
        let form: Form = serde_json::from_str(r#"{"amount": true}"#).unwrap();
        assert_eq!(form.amount, Decimal::ZERO);

        let form: Form = serde_json::from_str(r#"{"amount": null}"#).unwrap();
        assert_eq!(form.amount, Decimal::ZERO);

        let form: Form = serde_json::from_str(r#"{"amount": "-40"}"#).unwrap();
        assert_eq!(form.amount, Decimal::ZERO);

        let form: Form = serde_json::from_str("{}").unwrap();
        assert_eq!(form.amount, Decimal::ZERO);
    }

    #[test]
    fn test_lenient_optional_amount_blank_is_none() {
        let form: Form = serde_json::from_str(r#"{"optional": ""}"#).unwrap();
        assert_eq!(form.optional, None);

        let form: Form = serde_json::from_str(r#"{"optional": null}"#).unwrap();
        assert_eq!(form.optional, None);

        let form: Form = serde_json::from_str("{}").unwrap();
        assert_eq!(form.optional, None);
    }

    #[test]
    fn test_lenient_optional_amount_garbage_is_zero() {
        let form: Form = serde_json::from_str(r#"{"optional": "n/a"}"#).unwrap();
        assert_eq!(form.optional, Some(Decimal::ZERO));

        let form: Form = serde_json::from_str(r#"{"optional": "0"}"#).unwrap();
        assert_eq!(form.optional, Some(Decimal::ZERO));

        let form: Form = serde_json::from_str(r#"{"optional": 450}"#).unwrap();
        assert_eq!(form.optional, Some(dec("450")));
    }
}
