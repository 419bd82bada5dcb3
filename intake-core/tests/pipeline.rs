//! End-to-end properties of the edit pipeline: normalize, derive visibility,
//! validate.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use intake_core::{
    AnswerSet, ChildrenAges, Entry, Field, FormState, IncomeCategory, IntakeEngine, RawValue,
    Session, normalize, normalize_with_report,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
}

fn engine() -> IntakeEngine {
    IntakeEngine::new(today())
}

/// A spread of answer sets covering every switch combination together with
/// awkward counts, ages and categories.
fn combinations() -> Vec<AnswerSet> {
    let counts = [
        Entry::Value(dec!(0)),
        Entry::Value(dec!(2)),
        Entry::Value(dec!(2.5)),
        Entry::Value(dec!(15)),
        Entry::Invalid("two".to_string()),
        Entry::Unset,
    ];
    let ages = [
        ChildrenAges::default(),
        ChildrenAges::from_values([dec!(5)]),
        ChildrenAges::from_values([dec!(5), dec!(7), dec!(9)]),
    ];
    let categories = [
        Entry::Value(IncomeCategory::Employment),
        Entry::Value(IncomeCategory::SelfEmployment),
        Entry::Invalid("C".to_string()),
    ];

    let mut sets = Vec::new();
    for bits in 0..8u8 {
        for count in &counts {
            for age in &ages {
                for category in &categories {
                    sets.push(AnswerSet {
                        portugal_residency: bits & 1 != 0,
                        have_children: bits & 2 != 0,
                        nhr_status: bits & 4 != 0,
                        non_portuguese_company: bits & 4 != 0,
                        deductions: Entry::Value(dec!(750)),
                        number_of_children: count.clone(),
                        children_age: age.clone(),
                        income_category: category.clone(),
                        ..AnswerSet::with_defaults(today())
                    });
                }
            }
        }
    }
    sets
}

fn holds_invariants(answers: &AnswerSet) -> bool {
    let residency = answers.portugal_residency
        || (!answers.nhr_status && answers.deductions == Entry::Value(Decimal::ZERO));
    let children = answers.have_children
        || (answers.number_of_children == Entry::Value(Decimal::ZERO)
            && answers.children_age.is_empty());
    let truncated = answers
        .child_count()
        .is_none_or(|count| answers.children_age.len() <= count);
    let employed = !answers.is_employed()
        || (answers.atividade_open_date.is_unset() && answers.type_of_atividade.is_unset());
    let self_employed = !answers.is_self_employed() || !answers.non_portuguese_company;

    residency && children && truncated && employed && self_employed
}

// =============================================================================
// Normalization
// =============================================================================

#[test]
fn normalize_is_idempotent() {
    for answers in combinations() {
        let once = normalize(answers);
        let (twice, adjustments) = normalize_with_report(once.clone());

        assert_eq!(twice, once);
        assert!(adjustments.is_empty());
    }
}

#[test]
fn normalize_establishes_every_invariant() {
    for answers in combinations() {
        let normalized = normalize(answers.clone());
        assert!(holds_invariants(&normalized), "violated for {answers:?}");
    }
}

#[test]
fn lowering_the_count_truncates_without_padding() {
    let engine = engine();
    let answers = AnswerSet {
        have_children: true,
        number_of_children: Entry::Value(dec!(3)),
        children_age: ChildrenAges::from_values([dec!(5), dec!(7), dec!(9)]),
        ..engine.default_answer_set()
    };

    let lowered = engine
        .set_field(&answers, Field::NumberOfChildren, "2".into())
        .unwrap();
    assert_eq!(lowered.children_age, ChildrenAges::from_values([dec!(5), dec!(7)]));

    let single = AnswerSet {
        children_age: ChildrenAges::from_values([dec!(5)]),
        ..answers
    };
    let lowered = engine
        .set_field(&single, Field::NumberOfChildren, "2".into())
        .unwrap();
    assert_eq!(lowered.children_age, ChildrenAges::from_values([dec!(5)]));
}

// =============================================================================
// Visibility
// =============================================================================

#[test]
fn leaving_residency_hides_the_residency_questions() {
    let engine = engine();
    let answers = engine
        .set_field(&engine.default_answer_set(), Field::HaveChildren, true.into())
        .unwrap();
    let answers = engine
        .set_field(&answers, Field::NumberOfChildren, 2.into())
        .unwrap();
    let answers = engine.set_field(&answers, Field::NhrStatus, true.into()).unwrap();

    let answers = engine
        .set_field(&answers, Field::PortugalResidency, false.into())
        .unwrap();
    let visible = engine.visible_fields(&answers);

    for hidden in [
        Field::NhrStatus,
        Field::Region,
        Field::HaveChildren,
        Field::NumberOfChildren,
        Field::ChildAge(0),
        Field::ChildAge(1),
        Field::Deductions,
    ] {
        assert!(!visible.contains(&hidden), "{hidden} still visible");
    }
    assert!(!answers.nhr_status);
    assert_eq!(answers.deductions, Entry::Value(dec!(0)));
}

#[test]
fn switching_back_to_category_a_clears_atividade() {
    let engine = engine();
    let answers = engine
        .set_field(&engine.default_answer_set(), Field::IncomeCategory, "B".into())
        .unwrap();
    let answers = engine
        .set_field(&answers, Field::AtividadeOpenDate, "2020-02-01".into())
        .unwrap();
    let answers = engine
        .set_field(&answers, Field::TypeOfAtividade, "goods".into())
        .unwrap();

    let answers = engine
        .set_field(&answers, Field::IncomeCategory, "A".into())
        .unwrap();

    assert_eq!(answers.atividade_open_date, Entry::Unset);
    assert_eq!(answers.type_of_atividade, Entry::Unset);
    assert!(engine.visible_fields(&answers).contains(&Field::NonPortugueseCompany));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn out_of_range_count_only_blocks_while_visible() {
    let engine = engine();
    let answers = AnswerSet {
        number_of_children: Entry::Value(dec!(15)),
        ..engine.default_answer_set()
    };
    assert!(engine.validation(&answers).is_valid);

    let answers = engine.set_field(&answers, Field::HaveChildren, true.into()).unwrap();
    assert_eq!(answers.number_of_children, Entry::Value(dec!(15)));
    assert!(!engine.validation(&answers).is_valid);
}

#[test]
fn family_of_two_end_to_end() {
    let mut session = Session::new(engine());

    session.apply(Field::HaveChildren, true.into()).unwrap();
    let evaluation = session.apply(Field::NumberOfChildren, 2.into()).unwrap();

    assert!(evaluation.visible.contains(&Field::ChildAge(0)));
    assert!(evaluation.visible.contains(&Field::ChildAge(1)));
    assert!(!evaluation.visible.contains(&Field::ChildAge(2)));
    assert_eq!(evaluation.answers.children_age.get(0), &Entry::Unset);
    assert_eq!(session.state(), FormState::Invalid);

    session.apply(Field::ChildAge(0), RawValue::from("10")).unwrap();
    session.apply(Field::ChildAge(1), RawValue::from("8")).unwrap();
    assert_eq!(session.state(), FormState::Valid);

    let submission = session.submit().unwrap();
    assert_eq!(
        submission.residency.map(|residency| residency.children_ages),
        Some(vec![10, 8])
    );
}
