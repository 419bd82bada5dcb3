//! Progressive disclosure: which questions are shown for a set of answers.
//!
//! | Section | Field | Shown when |
//! |---------|-------|------------|
//! | Income | `income`, `period` | always |
//! | Income | `deductions` | resident and not working for a foreign company |
//! | Residency | `portugalResidency` | always |
//! | Residency | `nhrStatus`, `region`, `haveChildren` | resident |
//! | Residency | `numberOfChildren`, `childrenAge.<i>` | resident with children |
//! | Income type | `incomeCategory` | always |
//! | Income type | `nonPortugueseCompany` | category A |
//! | Income type | `atividadeOpenDate`, `typeOfAtividade` | category B |
//!
//! One `childrenAge.<i>` slot is shown per child, whether or not an age has
//! been entered for it yet.

use crate::models::{AnswerSet, Field, Section};
use crate::schema::MAX_CHILDREN;

/// Number of child age slots to show.
///
/// Capped at the schema maximum so an out-of-range count cannot produce an
/// unbounded field list; a count that is not a whole number shows none.
fn age_slots(answers: &AnswerSet) -> usize {
    if !(answers.portugal_residency && answers.have_children) {
        return 0;
    }
    answers
        .child_count()
        .map_or(0, |count| count.min(MAX_CHILDREN as usize))
}

/// Whether a single field is currently shown.
pub fn is_visible(
    answers: &AnswerSet,
    field: Field,
) -> bool {
    match field {
        Field::Income | Field::Period | Field::PortugalResidency | Field::IncomeCategory => true,
        Field::Deductions => answers.portugal_residency && !answers.non_portuguese_company,
        Field::NhrStatus | Field::Region | Field::HaveChildren => answers.portugal_residency,
        Field::NumberOfChildren => answers.portugal_residency && answers.have_children,
        Field::ChildAge(index) => index < age_slots(answers),
        Field::NonPortugueseCompany => answers.is_employed(),
        Field::AtividadeOpenDate | Field::TypeOfAtividade => answers.is_self_employed(),
    }
}

/// Every field of `section` that could ever be shown, in presentation order,
/// with child age slots expanded for the current count.
fn section_fields(
    answers: &AnswerSet,
    section: Section,
) -> Vec<Field> {
    match section {
        Section::Income => vec![Field::Income, Field::Period, Field::Deductions],
        Section::Residency => {
            let mut fields = vec![
                Field::PortugalResidency,
                Field::NhrStatus,
                Field::Region,
                Field::HaveChildren,
                Field::NumberOfChildren,
            ];
            fields.extend((0..age_slots(answers)).map(Field::ChildAge));
            fields
        }
        Section::IncomeType => vec![
            Field::IncomeCategory,
            Field::NonPortugueseCompany,
            Field::AtividadeOpenDate,
            Field::TypeOfAtividade,
        ],
    }
}

/// The shown fields grouped by section. Every section is present, even when
/// it shows nothing beyond its always-visible fields.
pub fn visible_sections(answers: &AnswerSet) -> Vec<(Section, Vec<Field>)> {
    Section::ALL
        .into_iter()
        .map(|section| {
            let fields = section_fields(answers, section)
                .into_iter()
                .filter(|field| is_visible(answers, *field))
                .collect();
            (section, fields)
        })
        .collect()
}

/// The shown fields in presentation order.
pub fn visible_fields(answers: &AnswerSet) -> Vec<Field> {
    visible_sections(answers)
        .into_iter()
        .flat_map(|(_, fields)| fields)
        .collect()
}
