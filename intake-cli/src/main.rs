use std::{path::PathBuf, process::ExitCode};

use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use tracing::debug;

use intake_cli::{
    app::{self, RunOptions},
    config::IntakeConfig,
    logging,
    script::Edit,
};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Intake questionnaire for the Portuguese tax simulation.
///
/// Replays edits from a config preset, a CSV script and `--set` flags against
/// a fresh form, prints the resulting questions and, if asked, submits it.
#[derive(Debug, Parser)]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// CSV edit script with `field,value` columns.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Single edit as `field=value`; may be repeated.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = Edit::from_assignment)]
    sets: Vec<Edit>,

    /// Reference date (YYYY-MM-DD) used for defaults and date bounds.
    #[arg(long)]
    today: Option<NaiveDate>,

    /// Submit the form after applying the edits.
    #[arg(long)]
    submit: bool,

    /// Write the submission to this TOML file instead of printing it.
    #[arg(long, requires = "submit")]
    output: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `intake_core=trace`.
    #[arg(long)]
    log_level: Option<String>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => IntakeConfig::load_from_file(path)
            .with_context(|| format!("cannot load config '{}'", path.display()))?,
        None => IntakeConfig::default(),
    };

    logging::init_logging(&config.logging, cli.log_level.as_deref())?;
    debug!(?cli, "parsed arguments");

    let options = RunOptions {
        today: cli.today,
        script: cli.script,
        sets: cli.sets,
        submit: cli.submit,
        output: cli.output,
    };

    let outcome = app::run(&config, &options, &mut std::io::stdout().lock())?;

    Ok(if outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
