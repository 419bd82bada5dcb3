//! Edit scripts: a sequence of form edits replayed against a session.
//!
//! ## CSV Format
//!
//! | Column | Required | Notes |
//! |---------|----------|-------------------------------------------------|
//! | `field` | yes | Field wire name, e.g. `income` or `childrenAge.0` |
//! | `value` | yes | Raw input as typed; may be empty |
//!
//! Rows are applied top to bottom.
//!
//! ```csv
//! field,value
//! haveChildren,true
//! numberOfChildren,2
//! childrenAge.0,10
//! childrenAge.1,8
//! ```

use std::path::{Path, PathBuf};

use intake_core::{Field, FieldParseError, RawValue};
use serde::Deserialize;
use thiserror::Error;

/// One unresolved edit, as written in a script, a preset or `--set`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Edit {
    pub field: String,
    pub value: String,
}

impl Edit {
    pub fn new(
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Parses a `field=value` assignment. The value may itself contain `=`.
    pub fn from_assignment(assignment: &str) -> Result<Self, AssignmentError> {
        let (field, value) = assignment
            .split_once('=')
            .ok_or_else(|| AssignmentError(assignment.to_string()))?;
        if field.trim().is_empty() {
            return Err(AssignmentError(assignment.to_string()));
        }
        Ok(Self::new(field.trim(), value.trim()))
    }

    /// Resolves the field name. The value is passed on as typed text.
    pub fn resolve(&self) -> Result<(Field, RawValue), FieldParseError> {
        let field = self.field.parse::<Field>()?;
        Ok((field, RawValue::Text(self.value.clone())))
    }
}

/// A `--set` argument that is not of the form `field=value`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("expected field=value, got '{0}'")]
pub struct AssignmentError(String);

/// Errors that can occur while loading an edit script.
#[derive(Debug, Error)]
pub enum ScriptError {
    /// The CSV itself is malformed (missing column, ragged row, ...).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A `field` cell names no known field. `row` is 1-based (header = row 0).
    #[error("row {row}: {source}")]
    UnknownField {
        row: usize,
        #[source]
        source: FieldParseError,
    },

    #[error("could not read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A resolved script edit and the row it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptedEdit {
    pub row: usize,
    pub field: Field,
    pub value: RawValue,
}

/// Parses script text and resolves every field name.
///
/// # Errors
///
/// * [ScriptError::Parse] if the CSV is structurally invalid.
/// * [ScriptError::UnknownField] for the first row naming an unknown field.
pub fn load_from_str(input: &str) -> Result<Vec<ScriptedEdit>, ScriptError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<Edit>()
        .enumerate()
        .map(|(idx, result)| -> Result<ScriptedEdit, ScriptError> {
            let row = idx + 1; // 1-based for user-facing messages
            let (field, value) = result?
                .resolve()
                .map_err(|source| ScriptError::UnknownField { row, source })?;
            Ok(ScriptedEdit { row, field, value })
        })
        .collect()
}

/// Reads a script from disk and delegates to [load_from_str].
pub fn load_from_file(path: &Path) -> Result<Vec<ScriptedEdit>, ScriptError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ScriptError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_str(&contents)
}
