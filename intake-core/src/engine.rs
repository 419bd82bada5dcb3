//! The engine facade used by the presentation layer.
//!
//! Every edit runs the same synchronous pipeline: store the raw value,
//! [`normalize`](crate::rules::normalize), derive the visible fields, then
//! validate the visible fields. Nothing is cached between calls.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use intake_core::{Field, IntakeEngine};
//!
//! let engine = IntakeEngine::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
//! let answers = engine.default_answer_set();
//!
//! let answers = engine.set_field(&answers, Field::HaveChildren, true.into()).unwrap();
//! let answers = engine.set_field(&answers, Field::NumberOfChildren, 2.into()).unwrap();
//! assert!(!engine.validation(&answers).is_valid);
//!
//! let answers = engine.set_field(&answers, Field::ChildAge(0), "10".into()).unwrap();
//! let answers = engine.set_field(&answers, Field::ChildAge(1), "8".into()).unwrap();
//! assert!(engine.validation(&answers).is_valid);
//! ```

use chrono::{Local, NaiveDate};
use thiserror::Error;
use tracing::debug;

use crate::coerce;
use crate::models::{AnswerSet, Field, RawValue};
use crate::rules::normalize_with_report;
use crate::schema::{MAX_CHILDREN, constraints_of};
use crate::validation::{ValidationReport, validate};
use crate::visibility::visible_fields;

/// Errors returned when an edit cannot be stored at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetFieldError {
    /// The raw value has the wrong shape for the field, e.g. a date for a
    /// switch. The answer set is left unchanged.
    #[error("{field} expects a {expected}, got {got:?}")]
    TypeMismatch {
        field: Field,
        expected: &'static str,
        got: RawValue,
    },

    /// A child age slot beyond the largest number of children the form
    /// accepts.
    #[error("{field} is beyond the last child age slot")]
    NoSuchSlot { field: Field },
}

/// Everything the presentation layer needs after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub answers: AnswerSet,
    pub visible: Vec<Field>,
    pub report: ValidationReport,
}

/// Stateless entry point to the intake rules.
///
/// The engine only carries the reference date used for the default atividade
/// opening date and as the upper bound for dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntakeEngine {
    today: NaiveDate,
}

impl IntakeEngine {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// An engine whose reference date is the local calendar date.
    pub fn today() -> Self {
        Self::new(Local::now().date_naive())
    }

    pub fn reference_date(&self) -> NaiveDate {
        self.today
    }

    /// The documented initial answers. These are returned as-is; the first
    /// edit normalizes them.
    pub fn default_answer_set(&self) -> AnswerSet {
        AnswerSet::with_defaults(self.today)
    }

    /// Stores `raw` into `field` and normalizes the result.
    ///
    /// # Errors
    ///
    /// Returns [`SetFieldError::TypeMismatch`] when `raw` cannot be stored in
    /// `field` at all, and [`SetFieldError::NoSuchSlot`] for a child age slot
    /// past the last one. Values of the right shape that fail coercion or range
    /// checks are stored and surface through [`IntakeEngine::validation`].
    pub fn set_field(
        &self,
        answers: &AnswerSet,
        field: Field,
        raw: RawValue,
    ) -> Result<AnswerSet, SetFieldError> {
        if matches!(field, Field::ChildAge(index) if index >= MAX_CHILDREN as usize) {
            return Err(SetFieldError::NoSuchSlot { field });
        }

        let mut candidate = answers.clone();
        store(&mut candidate, field, &raw).ok_or_else(|| SetFieldError::TypeMismatch {
            field,
            expected: constraints_of(field).kind.noun(),
            got: raw.clone(),
        })?;

        let (normalized, adjustments) = normalize_with_report(candidate);
        debug!(
            field = %field,
            value = ?raw,
            adjustments = adjustments.len(),
            "applied edit"
        );
        Ok(normalized)
    }

    /// The fields to present, in section order.
    pub fn visible_fields(
        &self,
        answers: &AnswerSet,
    ) -> Vec<Field> {
        visible_fields(answers)
    }

    /// Validates the currently visible fields of `answers`.
    pub fn validation(
        &self,
        answers: &AnswerSet,
    ) -> ValidationReport {
        validate(answers, &visible_fields(answers), self.today)
    }

    /// Derives visibility and validity for `answers` in one go.
    pub fn evaluate(
        &self,
        answers: AnswerSet,
    ) -> Evaluation {
        let visible = visible_fields(&answers);
        let report = validate(&answers, &visible, self.today);
        Evaluation {
            answers,
            visible,
            report,
        }
    }
}

/// Writes `raw` into the slot for `field`. Returns `None` on a shape
/// mismatch, leaving `answers` untouched.
fn store(
    answers: &mut AnswerSet,
    field: Field,
    raw: &RawValue,
) -> Option<()> {
    match field {
        Field::Income => answers.income = coerce::number_entry(raw)?,
        Field::Deductions => answers.deductions = coerce::number_entry(raw)?,
        Field::Period => answers.period = coerce::choice_entry(raw)?,
        Field::PortugalResidency => answers.portugal_residency = coerce::toggle(raw)?,
        Field::NhrStatus => answers.nhr_status = coerce::toggle(raw)?,
        Field::Region => answers.region = coerce::choice_entry(raw)?,
        Field::HaveChildren => answers.have_children = coerce::toggle(raw)?,
        Field::NumberOfChildren => answers.number_of_children = coerce::number_entry(raw)?,
        Field::ChildAge(index) => answers.children_age.set(index, coerce::number_entry(raw)?),
        Field::IncomeCategory => answers.income_category = coerce::choice_entry(raw)?,
        Field::NonPortugueseCompany => answers.non_portuguese_company = coerce::toggle(raw)?,
        Field::AtividadeOpenDate => answers.atividade_open_date = coerce::date_entry(raw)?,
        Field::TypeOfAtividade => answers.type_of_atividade = coerce::choice_entry(raw)?,
    }
    Some(())
}
