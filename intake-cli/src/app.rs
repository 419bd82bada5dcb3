use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use intake_core::{IntakeEngine, Session, SubmitError};
use tracing::{debug, info};

use crate::config::IntakeConfig;
use crate::report::{FormView, SubmissionView};
use crate::script::{self, Edit};

/// What a single run should do, after merging the config file and flags.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides `[session] today`.
    pub today: Option<NaiveDate>,
    pub script: Option<PathBuf>,
    /// `--set` edits, applied after the script.
    pub sets: Vec<Edit>,
    pub submit: bool,
    /// Where to write the submission as TOML instead of printing it.
    pub output: Option<PathBuf>,
}

/// How a run ended.
#[derive(Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The form was shown; no submission was requested.
    Reviewed { valid: bool },
    Submitted,
    Refused(SubmitError),
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        !matches!(self, Self::Refused(_))
    }
}

/// Creates the engine for this run. The flag wins over the config file,
/// which wins over the local date.
pub fn build_engine(
    config: &IntakeConfig,
    today: Option<NaiveDate>,
) -> IntakeEngine {
    match today.or(config.session.today) {
        Some(date) => IntakeEngine::new(date),
        None => IntakeEngine::today(),
    }
}

/// Resolves and applies one edit; `origin` names it in error messages.
fn apply_edit(
    session: &mut Session,
    edit: &Edit,
    origin: &str,
) -> Result<()> {
    let (field, value) = edit
        .resolve()
        .with_context(|| format!("{origin}: cannot resolve '{}'", edit.field))?;
    session
        .apply(field, value)
        .with_context(|| format!("{origin}: cannot apply {field}"))?;
    Ok(())
}

/// Applies presets, then the script, then `--set` edits, in that order.
pub fn build_session(
    config: &IntakeConfig,
    options: &RunOptions,
) -> Result<Session> {
    let engine = build_engine(config, options.today);
    let mut session = Session::new(engine);
    debug!(today = %session.engine().reference_date(), "starting session");

    for (index, edit) in config.session.presets.iter().enumerate() {
        apply_edit(&mut session, edit, &format!("preset {}", index + 1))?;
    }

    if let Some(path) = &options.script {
        let edits = script::load_from_file(path)
            .with_context(|| format!("cannot load script '{}'", path.display()))?;
        for edit in edits {
            session
                .apply(edit.field, edit.value)
                .with_context(|| format!("script row {}: cannot apply {}", edit.row, edit.field))?;
        }
    }

    for edit in &options.sets {
        apply_edit(&mut session, edit, "--set")?;
    }

    Ok(session)
}

/// Runs the intake once: builds the session, prints the form and, if asked,
/// submits it.
pub fn run(
    config: &IntakeConfig,
    options: &RunOptions,
    out: &mut impl Write,
) -> Result<RunOutcome> {
    let mut session = build_session(config, options)?;

    writeln!(out, "{}", FormView(session.evaluation()))?;

    if !options.submit {
        return Ok(RunOutcome::Reviewed {
            valid: session.evaluation().report.is_valid,
        });
    }

    let submission = match session.submit() {
        Ok(submission) => submission,
        Err(e) => {
            writeln!(out, "\nSubmission refused: {e}")?;
            return Ok(RunOutcome::Refused(e));
        }
    };
    info!(period = %submission.period, "form submitted");

    match &options.output {
        Some(path) => {
            let toml = toml::to_string_pretty(&submission).context("cannot encode submission")?;
            std::fs::write(path, toml)
                .with_context(|| format!("cannot write '{}'", path.display()))?;
            writeln!(out, "\nSubmission written to {}", path.display())?;
        }
        None => writeln!(out, "\nSubmission\n{}", SubmissionView(&submission))?,
    }

    Ok(RunOutcome::Submitted)
}
