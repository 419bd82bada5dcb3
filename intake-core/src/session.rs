//! One user's intake session and its form state machine.
//!
//! ```text
//! Editing ──▶ Valid ──▶ Submitted
//!    ▲  │       │           │
//!    │  ▼       │           │
//!    └ Invalid ◀┘ (edit)    │
//!    ▲                      │
//!    └──────── edit ────────┘
//! ```
//!
//! Every successful edit passes through `Editing` and settles on `Valid` or
//! `Invalid` once the pipeline has run. Submitting is only honored from
//! `Valid`.

use tracing::{info, warn};

use crate::engine::{Evaluation, IntakeEngine, SetFieldError};
use crate::models::{AnswerSet, Field, RawValue};
use crate::rules::normalize;
use crate::submission::{SubmitError, Submission};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Valid,
    Invalid,
    Submitted,
}

/// Exclusive owner of one answer set. Edits are applied one at a time, each
/// running the whole pipeline before the next.
#[derive(Debug, Clone)]
pub struct Session {
    engine: IntakeEngine,
    evaluation: Evaluation,
    state: FormState,
}

impl Session {
    /// Starts a session from the engine's default answers, as documented
    /// and before any normalization.
    pub fn new(engine: IntakeEngine) -> Self {
        Self::start(engine, engine.default_answer_set())
    }

    /// Starts a session from existing answers, normalizing them first.
    pub fn with_answers(
        engine: IntakeEngine,
        answers: AnswerSet,
    ) -> Self {
        Self::start(engine, normalize(answers))
    }

    fn start(
        engine: IntakeEngine,
        answers: AnswerSet,
    ) -> Self {
        let mut session = Self {
            engine,
            evaluation: engine.evaluate(answers),
            state: FormState::Editing,
        };
        session.settle();
        session
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn evaluation(&self) -> &Evaluation {
        &self.evaluation
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.evaluation.answers
    }

    pub fn engine(&self) -> &IntakeEngine {
        &self.engine
    }

    /// Applies a single user edit.
    ///
    /// # Errors
    ///
    /// Returns [`SetFieldError`] when the value cannot be stored; the session
    /// keeps its answers and state and stays editable.
    pub fn apply(
        &mut self,
        field: Field,
        raw: RawValue,
    ) -> Result<&Evaluation, SetFieldError> {
        let answers = self
            .engine
            .set_field(&self.evaluation.answers, field, raw)
            .inspect_err(|e| warn!(field = %field, error = %e, "edit rejected"))?;

        self.transition(FormState::Editing);
        self.evaluation = self.engine.evaluate(answers);
        self.settle();
        Ok(&self.evaluation)
    }

    /// Hands out the submission payload if the form is valid.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Invalid`] unless the form is in [`FormState::Valid`]
    /// - [`SubmitError::AlreadySubmitted`] if nothing changed since the last
    ///   submission
    pub fn submit(&mut self) -> Result<Submission, SubmitError> {
        match self.state {
            FormState::Valid => {
                let submission = Submission::from_answers(&self.evaluation.answers)?;
                self.transition(FormState::Submitted);
                Ok(submission)
            }
            FormState::Submitted => Err(SubmitError::AlreadySubmitted),
            FormState::Editing | FormState::Invalid => {
                let errors = self.evaluation.report.errors.len();
                warn!(errors, "submit refused");
                Err(SubmitError::Invalid(errors))
            }
        }
    }

    fn settle(&mut self) {
        let next = if self.evaluation.report.is_valid {
            FormState::Valid
        } else {
            FormState::Invalid
        };
        self.transition(next);
    }

    fn transition(
        &mut self,
        next: FormState,
    ) {
        if self.state != next {
            info!(from = ?self.state, to = ?next, "form state changed");
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::Entry;

    fn session() -> Session {
        Session::new(IntakeEngine::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()))
    }

    /// Initializes tracing subscriber for tests that verify log output.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_test_writer()
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    #[test]
    fn default_session_starts_valid() {
        assert_eq!(session().state(), FormState::Valid);
    }

    #[test]
    fn session_keeps_the_engine_reference_date() {
        assert_eq!(
            session().engine().reference_date(),
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
        );
    }

    #[test]
    fn existing_answers_are_normalized_on_entry() {
        let engine = IntakeEngine::new(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        let answers = AnswerSet {
            portugal_residency: false,
            nhr_status: true,
            deductions: Entry::Value(dec!(900)),
            ..engine.default_answer_set()
        };

        let session = Session::with_answers(engine, answers);

        assert!(!session.answers().nhr_status);
        assert_eq!(session.answers().deductions, Entry::Value(dec!(0)));
        assert_eq!(session.answers().atividade_open_date, Entry::Unset);
        assert_eq!(session.state(), FormState::Valid);
    }

    #[test]
    fn invalid_edit_moves_to_invalid_and_back() {
        let _guard = init_test_tracing();
        let mut session = session();

        session.apply(Field::Income, "0".into()).unwrap();
        assert_eq!(session.state(), FormState::Invalid);

        session.apply(Field::Income, "25000".into()).unwrap();
        assert_eq!(session.state(), FormState::Valid);
    }

    #[test]
    fn submit_refused_while_invalid() {
        let mut session = session();
        session.apply(Field::Income, "-3".into()).unwrap();

        assert_eq!(session.submit(), Err(SubmitError::Invalid(1)));
        assert_eq!(session.state(), FormState::Invalid);
    }

    #[test]
    fn submit_moves_to_submitted_once() {
        let mut session = session();

        assert!(session.submit().is_ok());
        assert_eq!(session.state(), FormState::Submitted);
        assert_eq!(session.submit(), Err(SubmitError::AlreadySubmitted));
    }

    #[test]
    fn edit_after_submission_reopens_the_form() {
        let mut session = session();
        session.submit().unwrap();

        session.apply(Field::NhrStatus, true.into()).unwrap();

        assert_eq!(session.state(), FormState::Valid);
        assert!(session.submit().is_ok());
    }

    #[test]
    fn rejected_edit_keeps_answers_and_state() {
        let mut session = session();
        session.submit().unwrap();
        let before = session.answers().clone();

        let result = session.apply(Field::HaveChildren, "2024-01-01".into());

        assert!(result.is_err());
        assert_eq!(session.answers(), &before);
        assert_eq!(session.state(), FormState::Submitted);
    }
}
