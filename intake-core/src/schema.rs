//! Static constraints for every field of the intake form.
//!
//! | Field | Kind | Domain | Required when visible |
//! |-------|------|--------|-----------------------|
//! | `income` | number | greater than 0 | yes |
//! | `deductions` | number | at least 0 | no |
//! | `period` | choice | 2022, 2023, 2024 | yes |
//! | `portugalResidency` | toggle | on/off | yes |
//! | `nhrStatus` | toggle | on/off | yes |
//! | `haveChildren` | toggle | on/off | yes |
//! | `nonPortugueseCompany` | toggle | on/off | yes |
//! | `region` | choice | continental, madeira, azores | yes |
//! | `numberOfChildren` | whole number | 0 to 10 | yes |
//! | `childrenAge.<i>` | whole number | 1 to 18 | yes |
//! | `incomeCategory` | choice | A, B | yes |
//! | `atividadeOpenDate` | date | 1900-01-01 to today | no |
//! | `typeOfAtividade` | choice | goods, services | no |

use std::{
    fmt,
    ops::{Bound, RangeBounds},
};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::models::{ActivityType, Choice, Field, IncomeCategory, Period, Region};

/// Largest number of children the form accepts.
pub const MAX_CHILDREN: u32 = 10;

/// Youngest age, in whole years, accepted for a child.
pub const MIN_CHILD_AGE: u32 = 1;

/// Oldest age, in whole years, accepted for a child.
pub const MAX_CHILD_AGE: u32 = 18;

/// The earliest date an atividade may have been opened.
pub fn earliest_atividade_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// The semantic kind of a field together with its domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A number within `range`; `whole` additionally rejects fractions.
    Number {
        range: (Bound<Decimal>, Bound<Decimal>),
        whole: bool,
    },
    Toggle,
    Choice {
        options: &'static [&'static str],
    },
    /// A date no earlier than `earliest` and no later than the engine's
    /// reference date.
    Date { earliest: NaiveDate },
}

impl FieldKind {
    /// Whether `value` satisfies this number kind. Always `false` for other
    /// kinds.
    pub fn accepts_number(
        &self,
        value: Decimal,
    ) -> bool {
        match self {
            Self::Number { range, whole } => {
                range.contains(&value) && (!whole || value.fract().is_zero())
            }
            _ => false,
        }
    }

    /// Short noun naming what the field holds, used in mismatch errors.
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Number { whole: true, .. } => "whole number",
            Self::Number { whole: false, .. } => "number",
            Self::Toggle => "on/off value",
            Self::Choice { .. } => "choice",
            Self::Date { .. } => "date",
        }
    }
}

/// Human-readable description of the domain, e.g. `"a whole number from 1 to 18"`.
impl fmt::Display for FieldKind {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::Number { range, whole } => {
                let noun = if *whole { "a whole number" } else { "a number" };
                match range {
                    (Bound::Included(min), Bound::Included(max)) => {
                        write!(f, "{noun} from {min} to {max}")
                    }
                    (Bound::Excluded(min), Bound::Unbounded) => {
                        write!(f, "{noun} greater than {min}")
                    }
                    (Bound::Included(min), Bound::Unbounded) => {
                        write!(f, "{noun} of at least {min}")
                    }
                    (min, max) => write!(f, "{noun} in {min:?}..{max:?}"),
                }
            }
            Self::Toggle => f.write_str("on or off"),
            Self::Choice { options } => write!(f, "one of {}", options.join(", ")),
            Self::Date { earliest } => write!(f, "a date between {earliest} and today"),
        }
    }
}

/// The complete constraint attached to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub kind: FieldKind,
    /// `false` for fields that may stay empty even while shown.
    pub required_when_visible: bool,
}

impl Constraint {
    fn required(kind: FieldKind) -> Self {
        Self {
            kind,
            required_when_visible: true,
        }
    }

    fn optional(kind: FieldKind) -> Self {
        Self {
            kind,
            required_when_visible: false,
        }
    }
}

fn whole_number(
    min: u32,
    max: u32,
) -> FieldKind {
    FieldKind::Number {
        range: (
            Bound::Included(Decimal::from(min)),
            Bound::Included(Decimal::from(max)),
        ),
        whole: true,
    }
}

fn choice<C: Choice>() -> FieldKind {
    FieldKind::Choice { options: C::CODES }
}

/// Looks up the constraint for `field`. All child age slots share one
/// constraint.
pub fn constraints_of(field: Field) -> Constraint {
    match field {
        Field::Income => Constraint::required(FieldKind::Number {
            range: (Bound::Excluded(Decimal::ZERO), Bound::Unbounded),
            whole: false,
        }),
        Field::Deductions => Constraint::optional(FieldKind::Number {
            range: (Bound::Included(Decimal::ZERO), Bound::Unbounded),
            whole: false,
        }),
        Field::Period => Constraint::required(choice::<Period>()),
        Field::PortugalResidency
        | Field::NhrStatus
        | Field::HaveChildren
        | Field::NonPortugueseCompany => Constraint::required(FieldKind::Toggle),
        Field::Region => Constraint::required(choice::<Region>()),
        Field::NumberOfChildren => Constraint::required(whole_number(0, MAX_CHILDREN)),
        Field::ChildAge(_) => Constraint::required(whole_number(MIN_CHILD_AGE, MAX_CHILD_AGE)),
        Field::IncomeCategory => Constraint::required(choice::<IncomeCategory>()),
        Field::AtividadeOpenDate => Constraint::optional(FieldKind::Date {
            earliest: earliest_atividade_date(),
        }),
        Field::TypeOfAtividade => Constraint::optional(choice::<ActivityType>()),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn income_must_be_strictly_positive() {
        let kind = constraints_of(Field::Income).kind;

        assert!(!kind.accepts_number(dec!(0)));
        assert!(kind.accepts_number(dec!(0.01)));
        assert!(kind.accepts_number(dec!(1000000)));
    }

    #[test]
    fn deductions_accept_zero_and_are_optional() {
        let constraint = constraints_of(Field::Deductions);

        assert!(constraint.kind.accepts_number(dec!(0)));
        assert!(!constraint.kind.accepts_number(dec!(-1)));
        assert!(!constraint.required_when_visible);
    }

    #[test]
    fn number_of_children_is_a_whole_number_up_to_ten() {
        let kind = constraints_of(Field::NumberOfChildren).kind;

        assert!(kind.accepts_number(dec!(0)));
        assert!(kind.accepts_number(dec!(10)));
        assert!(!kind.accepts_number(dec!(11)));
        assert!(!kind.accepts_number(dec!(1.5)));
    }

    #[test]
    fn child_ages_share_one_constraint() {
        assert_eq!(constraints_of(Field::ChildAge(0)), constraints_of(Field::ChildAge(7)));

        let kind = constraints_of(Field::ChildAge(0)).kind;
        assert!(!kind.accepts_number(dec!(0)));
        assert!(kind.accepts_number(dec!(1)));
        assert!(kind.accepts_number(dec!(18)));
        assert!(!kind.accepts_number(dec!(19)));
    }

    #[test]
    fn atividade_fields_are_optional() {
        assert!(!constraints_of(Field::AtividadeOpenDate).required_when_visible);
        assert!(!constraints_of(Field::TypeOfAtividade).required_when_visible);
    }

    #[test]
    fn choice_domains_come_from_the_choice_types() {
        assert_eq!(
            constraints_of(Field::Region).kind,
            FieldKind::Choice {
                options: &["continental", "madeira", "azores"]
            }
        );
    }

    #[test]
    fn accepts_number_is_false_for_non_numeric_kinds() {
        assert!(!constraints_of(Field::NhrStatus).kind.accepts_number(dec!(1)));
    }

    #[test]
    fn describes_domains() {
        assert_eq!(
            constraints_of(Field::ChildAge(0)).kind.to_string(),
            "a whole number from 1 to 18"
        );
        assert_eq!(
            constraints_of(Field::Income).kind.to_string(),
            "a number greater than 0"
        );
        assert_eq!(
            constraints_of(Field::Period).kind.to_string(),
            "one of 2022, 2023, 2024"
        );
    }
}
