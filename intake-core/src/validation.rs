//! Validation of an answer set against the field schema.
//!
//! Only fields the caller reports as visible are checked; a hidden field is
//! inert no matter what it holds.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::{AnswerSet, Entry, Field, FieldValue};
use crate::schema::{Constraint, FieldKind, constraints_of};

/// Why a visible field blocks submission.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    /// The input could not be read as a number.
    #[error("'{input}' is not a number")]
    NotANumber { input: String },

    /// The value lies outside the field's bounds or enumeration.
    #[error("{value} is out of range, expected {expected}")]
    OutOfRange { value: String, expected: String },

    /// More ages are stored than there are children. Normalization removes
    /// the excess, so this only shows up on answers that skipped it.
    #[error("{actual} ages given for {expected} children")]
    LengthMismatch { expected: usize, actual: usize },

    /// A required field has no value.
    #[error("a value is required")]
    Missing,

    /// The input could not be read as a date.
    #[error("'{input}' is not a valid date")]
    NotADate { input: String },
}

/// The verdict of a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: BTreeMap<Field, FieldError>,
}

impl ValidationReport {
    pub fn error_for(
        &self,
        field: Field,
    ) -> Option<&FieldError> {
        self.errors.get(&field)
    }
}

fn out_of_range(
    value: impl ToString,
    kind: &FieldKind,
) -> FieldError {
    FieldError::OutOfRange {
        value: value.to_string(),
        expected: kind.to_string(),
    }
}

fn check_entry<T>(
    entry: &Entry<T>,
    constraint: &Constraint,
    invalid: impl FnOnce(&str) -> FieldError,
    check_value: impl FnOnce(&T) -> Option<FieldError>,
) -> Option<FieldError> {
    match entry {
        Entry::Unset if constraint.required_when_visible => Some(FieldError::Missing),
        Entry::Unset => None,
        Entry::Invalid(raw) => Some(invalid(raw)),
        Entry::Value(value) => check_value(value),
    }
}

/// Checks one field's stored answer against its schema constraint.
pub fn check_field(
    answers: &AnswerSet,
    field: Field,
    today: NaiveDate,
) -> Option<FieldError> {
    let constraint = constraints_of(field);
    let kind = &constraint.kind;

    match answers.value_of(field) {
        FieldValue::Toggle(_) => None,
        FieldValue::Number(entry) => check_entry(
            entry,
            &constraint,
            |raw| FieldError::NotANumber {
                input: raw.to_string(),
            },
            |value: &Decimal| (!kind.accepts_number(*value)).then(|| out_of_range(value, kind)),
        ),
        FieldValue::Choice(entry) => check_entry(
            &entry,
            &constraint,
            |raw| out_of_range(raw, kind),
            |_| None,
        ),
        FieldValue::Date(entry) => check_entry(
            entry,
            &constraint,
            |raw| FieldError::NotADate {
                input: raw.to_string(),
            },
            |date: &NaiveDate| match kind {
                FieldKind::Date { earliest } if date < earliest || *date > today => {
                    Some(out_of_range(date, kind))
                }
                _ => None,
            },
        ),
    }
}

/// Ages stored beyond the current number of children.
fn length_mismatch(answers: &AnswerSet) -> Option<FieldError> {
    let expected = answers.child_count()?;
    let actual = answers.children_age.len();
    (actual > expected).then_some(FieldError::LengthMismatch { expected, actual })
}

/// Validates the `visible` fields of `answers`. `today` bounds date fields.
pub fn validate(
    answers: &AnswerSet,
    visible: &[Field],
    today: NaiveDate,
) -> ValidationReport {
    let mut errors = BTreeMap::new();

    for &field in visible {
        if let Some(error) = check_field(answers, field, today) {
            errors.insert(field, error);
        }
    }

    if visible.contains(&Field::NumberOfChildren) && !errors.contains_key(&Field::NumberOfChildren)
    {
        if let Some(error) = length_mismatch(answers) {
            errors.insert(Field::NumberOfChildren, error);
        }
    }

    ValidationReport {
        is_valid: errors.is_empty(),
        errors,
    }
}
