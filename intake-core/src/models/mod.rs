mod answers;
mod choices;
mod field;
mod raw;

pub use answers::{AnswerSet, ChildrenAges, Entry, FieldValue};
pub use choices::{ActivityType, Choice, IncomeCategory, Period, Region};
pub use field::{Field, FieldParseError, Section};
pub use raw::RawValue;
