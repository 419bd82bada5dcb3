//! Dependency rules that keep an answer set internally consistent.
//!
//! After [`normalize`] the answers satisfy:
//!
//! 1. not a resident ⇒ `nhrStatus = false` and `deductions = 0`
//! 2. no children ⇒ `numberOfChildren = 0` and no ages
//! 3. no age is stored at a slot `>= numberOfChildren`
//! 4. category A ⇒ no atividade opening date and no atividade type
//! 5. category B ⇒ `nonPortugueseCompany = false`
//!
//! Rules run in the order above (3 depends on the count fixed by 2) and none
//! of them touches a field an earlier rule governs, so a single pass is
//! enough and running it twice changes nothing.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{AnswerSet, Entry, Field};
use crate::validation::FieldError;

/// One normalization rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    ResidencyClears,
    ChildrenClears,
    ChildAgeTruncation,
    IncomeCategoryClears,
}

impl Rule {
    /// The order rules are applied in.
    pub const ORDER: [Rule; 4] = [
        Rule::ResidencyClears,
        Rule::ChildrenClears,
        Rule::ChildAgeTruncation,
        Rule::IncomeCategoryClears,
    ];

    fn apply(
        self,
        answers: &mut AnswerSet,
        adjustments: &mut Vec<Adjustment>,
    ) {
        let mut reset = |field: Field| {
            adjustments.push(Adjustment {
                rule: self,
                field,
                kind: AdjustmentKind::Reset,
            })
        };

        match self {
            Rule::ResidencyClears => {
                if answers.portugal_residency {
                    return;
                }
                if answers.nhr_status {
                    answers.nhr_status = false;
                    reset(Field::NhrStatus);
                }
                if answers.deductions != Entry::Value(Decimal::ZERO) {
                    answers.deductions = Entry::Value(Decimal::ZERO);
                    reset(Field::Deductions);
                }
            }
            Rule::ChildrenClears => {
                if answers.have_children {
                    return;
                }
                if answers.number_of_children != Entry::Value(Decimal::ZERO) {
                    answers.number_of_children = Entry::Value(Decimal::ZERO);
                    reset(Field::NumberOfChildren);
                }
                if !answers.children_age.is_empty() {
                    let first = answers.children_age.iter().next().map_or(0, |(index, _)| index);
                    answers.children_age.clear();
                    reset(Field::ChildAge(first));
                }
            }
            Rule::ChildAgeTruncation => {
                // Without a usable count there is nothing safe to truncate to.
                let Some(count) = answers.child_count() else {
                    return;
                };
                let stored = answers.children_age.len();
                let discarded = answers.children_age.truncate(count);
                if let Some(&first) = discarded.first() {
                    adjustments.push(Adjustment {
                        rule: self,
                        field: Field::ChildAge(first),
                        kind: AdjustmentKind::Truncated {
                            expected: count,
                            actual: stored,
                        },
                    });
                }
            }
            Rule::IncomeCategoryClears => {
                if answers.is_employed() {
                    if !answers.atividade_open_date.is_unset() {
                        answers.atividade_open_date = Entry::Unset;
                        reset(Field::AtividadeOpenDate);
                    }
                    if !answers.type_of_atividade.is_unset() {
                        answers.type_of_atividade = Entry::Unset;
                        reset(Field::TypeOfAtividade);
                    }
                } else if answers.is_self_employed() && answers.non_portuguese_company {
                    answers.non_portuguese_company = false;
                    reset(Field::NonPortugueseCompany);
                }
            }
        }
    }
}

/// What a rule did to a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdjustmentKind {
    /// The field was forced to its canonical value (`false`, `0`, no ages,
    /// or absent).
    Reset,
    /// Ages from `field` onwards were discarded: `actual` slots were stored
    /// for `expected` children.
    Truncated { expected: usize, actual: usize },
}

/// A change made by a rule during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjustment {
    pub rule: Rule,
    pub field: Field,
    pub kind: AdjustmentKind,
}

impl Adjustment {
    /// The length mismatch a truncation resolved, if this was one.
    pub fn length_mismatch(&self) -> Option<FieldError> {
        match self.kind {
            AdjustmentKind::Truncated { expected, actual } => {
                Some(FieldError::LengthMismatch { expected, actual })
            }
            AdjustmentKind::Reset => None,
        }
    }
}

/// Brings `answers` back in line with the dependency invariants.
pub fn normalize(answers: AnswerSet) -> AnswerSet {
    normalize_with_report(answers).0
}

/// Like [`normalize`], also returning every adjustment made, in rule order.
pub fn normalize_with_report(mut answers: AnswerSet) -> (AnswerSet, Vec<Adjustment>) {
    let mut adjustments = Vec::new();
    for rule in Rule::ORDER {
        rule.apply(&mut answers, &mut adjustments);
    }

    for adjustment in &adjustments {
        debug!(
            rule = ?adjustment.rule,
            field = %adjustment.field,
            kind = ?adjustment.kind,
            "normalization adjusted field"
        );
    }

    (answers, adjustments)
}
