//! Plain-text rendering of the form and of a submission.

use std::fmt;

use chrono::NaiveDate;
use intake_core::{Evaluation, IncomeCategory, IncomeType, Section, Submission};
use rust_decimal::Decimal;

fn opt_display<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "—".to_string(), |value| value.to_string())
}

fn category(category: IncomeCategory) -> String {
    format!("{category} - {}", category.label())
}

/// The visible questions grouped by section, each with its current answer
/// and any validation error.
pub struct FormView<'a>(pub &'a Evaluation);

impl fmt::Display for FormView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let evaluation = self.0;

        for section in Section::ALL {
            writeln!(f, "{}", section.title())?;
            for field in evaluation.visible.iter().filter(|field| field.section() == section) {
                let value = evaluation.answers.value_of(*field);
                write!(f, "  {} ({}): {}", field.label(), field.name(), value)?;
                if let Some(error) = evaluation.report.error_for(*field) {
                    write!(f, "  ! {error}")?;
                }
                writeln!(f)?;
            }
        }

        let errors = evaluation.report.errors.len();
        if evaluation.report.is_valid {
            write!(f, "Status: valid")
        } else {
            write!(f, "Status: invalid ({errors} field(s) need attention)")
        }
    }
}

/// A human-readable summary of a submission.
pub struct SubmissionView<'a>(pub &'a Submission);

impl fmt::Display for SubmissionView<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let submission = self.0;

        writeln!(f, "Period:        {}", submission.period)?;
        writeln!(f, "Income:        {}", submission.income)?;
        writeln!(
            f,
            "Deductions:    {}",
            opt_display::<Decimal>(submission.deductions)
        )?;

        match &submission.residency {
            Some(residency) => {
                writeln!(f, "Resident:      yes")?;
                writeln!(f, "Region:        {}", residency.region.label())?;
                writeln!(
                    f,
                    "NHR status:    {}",
                    if residency.nhr_status { "yes" } else { "no" }
                )?;
                let ages: Vec<String> = residency
                    .children_ages
                    .iter()
                    .map(|age| age.to_string())
                    .collect();
                writeln!(
                    f,
                    "Children ages: {}",
                    if ages.is_empty() { "—".to_string() } else { ages.join(", ") }
                )?;
            }
            None => writeln!(f, "Resident:      no")?,
        }

        match &submission.income_type {
            IncomeType::Employment { foreign_company } => {
                writeln!(f, "Category:      {}", category(IncomeCategory::Employment))?;
                write!(
                    f,
                    "Foreign co.:   {}",
                    if *foreign_company { "yes" } else { "no" }
                )
            }
            IncomeType::SelfEmployment {
                opened_on,
                activity,
            } => {
                writeln!(f, "Category:      {}", category(IncomeCategory::SelfEmployment))?;
                writeln!(f, "Opened on:     {}", opt_display::<NaiveDate>(*opened_on))?;
                write!(f, "Activity:      {}", opt_display(*activity))
            }
        }
    }
}
