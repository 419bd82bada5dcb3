//! Coercion of raw user input into typed answer entries.
//!
//! Coercion never fails outright: input that has the right shape for a field
//! but cannot be read (e.g. `"12k"` for a number) is kept as
//! [`Entry::Invalid`] and reported later by validation. Only input of the
//! wrong shape entirely (a date for a toggle) returns `None`.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use crate::models::{Choice, Entry, RawValue};

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid number '{input}': {source}")]
pub struct ParseNumberError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Normalizes input for number parsing: trims whitespace and removes commas
/// (thousands separator).
fn normalize_number_input(s: &str) -> String {
    s.trim().replace(',', "")
}

/// Parses free-form text into a [`Decimal`].
///
/// Handles comma as thousands separator (e.g. `"1,234.56"`) and scientific
/// notation (`"1e4"`). Empty or whitespace-only input reads as 0, the same way
/// a cleared numeric input does in the browser.
pub fn parse_number(s: &str) -> Result<Decimal, ParseNumberError> {
    let normalized = normalize_number_input(s);
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|e| ParseNumberError {
            input: s.to_string(),
            source: e,
        })
}

/// Parses a calendar date, either `YYYY-MM-DD` or a full RFC 3339 timestamp
/// (of which only the date part is kept).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// Coerces input for a numeric field.
pub fn number_entry(raw: &RawValue) -> Option<Entry<Decimal>> {
    match raw {
        RawValue::Number(number) => Some(Entry::Value(*number)),
        RawValue::Text(text) => Some(match parse_number(text) {
            Ok(number) => Entry::Value(number),
            Err(e) => {
                warn!(input = %text, "number coercion failed: {}", e);
                Entry::Invalid(text.clone())
            }
        }),
        RawValue::Clear => Some(Entry::Unset),
        RawValue::Bool(_) | RawValue::Date(_) => None,
    }
}

/// Coerces input for a select-style field.
pub fn choice_entry<C: Choice>(raw: &RawValue) -> Option<Entry<C>> {
    let code = match raw {
        RawValue::Text(text) => text.trim().to_string(),
        RawValue::Number(number) => number.normalize().to_string(),
        RawValue::Clear => return Some(Entry::Unset),
        RawValue::Bool(_) | RawValue::Date(_) => return None,
    };

    if code.is_empty() {
        return Some(Entry::Unset);
    }
    Some(match C::parse(&code) {
        Some(option) => Entry::Value(option),
        None => Entry::Invalid(code),
    })
}

/// Coerces input for a date field.
pub fn date_entry(raw: &RawValue) -> Option<Entry<NaiveDate>> {
    match raw {
        RawValue::Date(date) => Some(Entry::Value(*date)),
        RawValue::Text(text) if text.trim().is_empty() => Some(Entry::Unset),
        RawValue::Text(text) => Some(match parse_date(text) {
            Some(date) => Entry::Value(date),
            None => {
                warn!(input = %text, "date coercion failed");
                Entry::Invalid(text.clone())
            }
        }),
        RawValue::Clear => Some(Entry::Unset),
        RawValue::Number(_) | RawValue::Bool(_) => None,
    }
}

/// Coerces input for a switch. Anything that is not clearly on or off is a
/// shape mismatch; switches have no "invalid" state.
pub fn toggle(raw: &RawValue) -> Option<bool> {
    match raw {
        RawValue::Bool(on) => Some(*on),
        RawValue::Text(text) => match text.trim().to_ascii_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => Some(true),
            "false" | "off" | "no" | "0" => Some(false),
            _ => None,
        },
        RawValue::Number(number) if *number == Decimal::ONE => Some(true),
        RawValue::Number(number) if number.is_zero() => Some(false),
        RawValue::Number(_) | RawValue::Date(_) | RawValue::Clear => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{IncomeCategory, Period};

    #[test]
    fn parse_number_accepts_comma_thousands_separator() {
        assert_eq!(parse_number("1,234.56").unwrap(), dec!(1234.56));
        assert_eq!(parse_number("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_number_trims_whitespace() {
        assert_eq!(parse_number("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_number_empty_treated_as_zero() {
        assert_eq!(parse_number("").unwrap(), Decimal::ZERO);
        assert_eq!(parse_number("   ").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_number_accepts_scientific_notation() {
        assert_eq!(parse_number("1e4").unwrap(), dec!(10000));
    }

    #[test]
    fn parse_number_invalid_returns_error() {
        assert!(parse_number("abc").is_err());
        assert!(parse_number("12k").is_err());
    }

    #[test]
    fn number_entry_keeps_unparseable_text() {
        assert_eq!(
            number_entry(&RawValue::from("ten")),
            Some(Entry::Invalid("ten".to_string()))
        );
    }

    #[test]
    fn number_entry_clear_unsets() {
        assert_eq!(number_entry(&RawValue::Clear), Some(Entry::Unset));
    }

    #[test]
    fn number_entry_rejects_booleans() {
        assert_eq!(number_entry(&RawValue::Bool(true)), None);
    }

    #[test]
    fn choice_entry_parses_text_and_numbers() {
        assert_eq!(
            choice_entry::<Period>(&RawValue::from("2023")),
            Some(Entry::Value(Period::Year2023))
        );
        assert_eq!(
            choice_entry::<Period>(&RawValue::from(2022)),
            Some(Entry::Value(Period::Year2022))
        );
        assert_eq!(
            choice_entry::<Period>(&RawValue::Number(dec!(2024.0))),
            Some(Entry::Value(Period::Year2024))
        );
    }

    #[test]
    fn choice_entry_keeps_values_outside_domain() {
        assert_eq!(
            choice_entry::<IncomeCategory>(&RawValue::from("C")),
            Some(Entry::Invalid("C".to_string()))
        );
    }

    #[test]
    fn choice_entry_empty_text_unsets() {
        assert_eq!(choice_entry::<IncomeCategory>(&RawValue::from(" ")), Some(Entry::Unset));
    }

    #[test]
    fn date_entry_parses_iso_dates_and_timestamps() {
        let expected = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();

        assert_eq!(date_entry(&RawValue::from("2021-03-15")), Some(Entry::Value(expected)));
        assert_eq!(
            date_entry(&RawValue::from("2021-03-15T10:30:00+00:00")),
            Some(Entry::Value(expected))
        );
    }

    #[test]
    fn date_entry_keeps_unparseable_text() {
        assert_eq!(
            date_entry(&RawValue::from("15 March")),
            Some(Entry::Invalid("15 March".to_string()))
        );
    }

    #[test]
    fn toggle_reads_common_spellings() {
        assert_eq!(toggle(&RawValue::from("TRUE")), Some(true));
        assert_eq!(toggle(&RawValue::from("off")), Some(false));
        assert_eq!(toggle(&RawValue::from(1)), Some(true));
        assert_eq!(toggle(&RawValue::Bool(false)), Some(false));
    }

    #[test]
    fn toggle_rejects_anything_else() {
        assert_eq!(toggle(&RawValue::from("maybe")), None);
        assert_eq!(toggle(&RawValue::Clear), None);
        assert_eq!(toggle(&RawValue::from(2)), None);
    }
}
