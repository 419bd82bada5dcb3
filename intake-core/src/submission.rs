//! The payload handed to the submission collaborator.
//!
//! A [`Submission`] only carries answers that are relevant for the filer:
//! residency details exist only for residents, and the income type carries
//! only the questions of the selected category.

use chrono::NaiveDate;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ActivityType, AnswerSet, Field, IncomeCategory, Period, Region};
use crate::visibility::is_visible;

/// Errors returned when a submission is refused.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("form is not valid: {0} field(s) need attention")]
    Invalid(usize),

    #[error("form was already submitted")]
    AlreadySubmitted,

    #[error("{0} has no usable value")]
    Incomplete(Field),
}

/// Residency details, present only for Portuguese tax residents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Residency {
    pub nhr_status: bool,
    pub region: Region,
    /// One age per child, in slot order. Empty without children.
    pub children_ages: Vec<u8>,
}

/// Category-specific answers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeType {
    /// Category A.
    Employment { foreign_company: bool },
    /// Category B.
    SelfEmployment {
        opened_on: Option<NaiveDate>,
        activity: Option<ActivityType>,
    },
}

/// A complete, consistent set of answers ready for simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub period: Period,
    pub income: Decimal,
    /// Present only when the deductions question was shown and answered.
    pub deductions: Option<Decimal>,
    pub residency: Option<Residency>,
    pub income_type: IncomeType,
}

impl Submission {
    /// Builds the payload from normalized, valid answers.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Incomplete`] naming the first relevant field
    /// without a usable value. This cannot happen for answers that passed
    /// validation.
    pub fn from_answers(answers: &AnswerSet) -> Result<Self, SubmitError> {
        let period = answers
            .period
            .get()
            .ok_or(SubmitError::Incomplete(Field::Period))?;
        let income = answers
            .income
            .get()
            .ok_or(SubmitError::Incomplete(Field::Income))?;
        let deductions = if is_visible(answers, Field::Deductions) {
            answers.deductions.get()
        } else {
            None
        };

        let residency = if answers.portugal_residency {
            Some(Residency {
                nhr_status: answers.nhr_status,
                region: answers
                    .region
                    .get()
                    .ok_or(SubmitError::Incomplete(Field::Region))?,
                children_ages: children_ages(answers)?,
            })
        } else {
            None
        };

        let income_type = match answers.income_category.get() {
            Some(IncomeCategory::Employment) => IncomeType::Employment {
                foreign_company: answers.non_portuguese_company,
            },
            Some(IncomeCategory::SelfEmployment) => IncomeType::SelfEmployment {
                opened_on: answers.atividade_open_date.get(),
                activity: answers.type_of_atividade.get(),
            },
            None => return Err(SubmitError::Incomplete(Field::IncomeCategory)),
        };

        Ok(Self {
            period,
            income,
            deductions,
            residency,
            income_type,
        })
    }
}

fn children_ages(answers: &AnswerSet) -> Result<Vec<u8>, SubmitError> {
    if !answers.have_children {
        return Ok(Vec::new());
    }
    let count = answers
        .child_count()
        .ok_or(SubmitError::Incomplete(Field::NumberOfChildren))?;

    (0..count)
        .map(|index| {
            answers
                .children_age
                .get(index)
                .get()
                .and_then(|age| age.to_u8())
                .ok_or(SubmitError::Incomplete(Field::ChildAge(index)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{ChildrenAges, Entry};
    use crate::rules::normalize;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    #[test]
    fn resident_employee_with_children() {
        let answers = normalize(AnswerSet {
            have_children: true,
            number_of_children: Entry::Value(dec!(2)),
            children_age: ChildrenAges::from_values([dec!(10), dec!(8)]),
            deductions: Entry::Value(dec!(1500)),
            ..AnswerSet::with_defaults(today())
        });

        let submission = Submission::from_answers(&answers).unwrap();

        assert_eq!(
            submission,
            Submission {
                period: Period::Year2024,
                income: dec!(10000),
                deductions: Some(dec!(1500)),
                residency: Some(Residency {
                    nhr_status: false,
                    region: Region::Continental,
                    children_ages: vec![10, 8],
                }),
                income_type: IncomeType::Employment {
                    foreign_company: false,
                },
            }
        );
    }

    #[test]
    fn non_resident_self_employed() {
        let answers = normalize(AnswerSet {
            portugal_residency: false,
            income_category: Entry::Value(IncomeCategory::SelfEmployment),
            ..AnswerSet::with_defaults(today())
        });

        let submission = Submission::from_answers(&answers).unwrap();

        assert_eq!(submission.residency, None);
        assert_eq!(submission.deductions, None);
        assert_eq!(
            submission.income_type,
            IncomeType::SelfEmployment {
                opened_on: Some(today()),
                activity: Some(ActivityType::Services),
            }
        );
    }

    #[test]
    fn missing_age_is_incomplete() {
        let answers = normalize(AnswerSet {
            have_children: true,
            number_of_children: Entry::Value(dec!(2)),
            children_age: ChildrenAges::from_values([dec!(10)]),
            ..AnswerSet::with_defaults(today())
        });

        assert_eq!(
            Submission::from_answers(&answers),
            Err(SubmitError::Incomplete(Field::ChildAge(1)))
        );
    }
}
