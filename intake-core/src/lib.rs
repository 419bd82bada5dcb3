//! Answer model and dependency rules for the tax simulation intake form.

pub mod coerce;
pub mod engine;
pub mod models;
pub mod rules;
pub mod schema;
pub mod session;
pub mod submission;
pub mod validation;
pub mod visibility;

pub use engine::{Evaluation, IntakeEngine, SetFieldError};
pub use models::*;
pub use rules::{Adjustment, AdjustmentKind, Rule, normalize, normalize_with_report};
pub use session::{FormState, Session};
pub use submission::{IncomeType, Residency, SubmitError, Submission};
pub use validation::{FieldError, ValidationReport};
pub use visibility::{is_visible, visible_fields, visible_sections};
