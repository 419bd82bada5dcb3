use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::schema::MAX_CHILDREN;

/// Prefix of the index-addressed child age fields (`childrenAge.0`, ...).
const CHILD_AGE_PREFIX: &str = "childrenAge.";

/// Errors returned when a field name from the presentation layer cannot be
/// resolved.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FieldParseError {
    #[error("unknown field '{0}'")]
    Unknown(String),

    #[error("invalid child age index in '{0}'")]
    InvalidIndex(String),
}

/// Every question of the intake form.
///
/// Child ages are addressed by slot index; the number of slots offered is
/// driven by [`Field::NumberOfChildren`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Income,
    Deductions,
    Period,
    PortugalResidency,
    NhrStatus,
    Region,
    HaveChildren,
    NumberOfChildren,
    ChildAge(usize),
    IncomeCategory,
    NonPortugueseCompany,
    AtividadeOpenDate,
    TypeOfAtividade,
}

impl Field {
    /// Wire name used by the presentation layer.
    pub fn name(&self) -> String {
        self.to_string()
    }

    fn static_name(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Deductions => "deductions",
            Self::Period => "period",
            Self::PortugalResidency => "portugalResidency",
            Self::NhrStatus => "nhrStatus",
            Self::Region => "region",
            Self::HaveChildren => "haveChildren",
            Self::NumberOfChildren => "numberOfChildren",
            Self::ChildAge(_) => "childrenAge",
            Self::IncomeCategory => "incomeCategory",
            Self::NonPortugueseCompany => "nonPortugueseCompany",
            Self::AtividadeOpenDate => "atividadeOpenDate",
            Self::TypeOfAtividade => "typeOfAtividade",
        }
    }

    /// Human-readable label, as the questionnaire words the question.
    pub fn label(&self) -> String {
        let label = match self {
            Self::Income => "Annual income in €",
            Self::Deductions => "Tax deductions in €",
            Self::Period => "Period",
            Self::PortugalResidency => "I am a tax resident of Portugal for selected period",
            Self::NhrStatus => "I have NHR status for selected period",
            Self::Region => "Region",
            Self::HaveChildren => "I have children",
            Self::NumberOfChildren => "Number of children",
            Self::ChildAge(index) => return format!("Child {} age", index + 1),
            Self::IncomeCategory => "Income category",
            Self::NonPortugueseCompany => "I work for a foreign company",
            Self::AtividadeOpenDate => "Date of opening your Atividade",
            Self::TypeOfAtividade => "Type of your activity",
        };
        label.to_string()
    }

    /// The form section this field is rendered in.
    pub fn section(&self) -> Section {
        match self {
            Self::Income | Self::Deductions | Self::Period => Section::Income,
            Self::PortugalResidency
            | Self::NhrStatus
            | Self::Region
            | Self::HaveChildren
            | Self::NumberOfChildren
            | Self::ChildAge(_) => Section::Residency,
            Self::IncomeCategory
            | Self::NonPortugueseCompany
            | Self::AtividadeOpenDate
            | Self::TypeOfAtividade => Section::IncomeType,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Self::ChildAge(index) => write!(f, "{CHILD_AGE_PREFIX}{index}"),
            other => f.write_str(other.static_name()),
        }
    }
}

impl FromStr for Field {
    type Err = FieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(index) = s.strip_prefix(CHILD_AGE_PREFIX) {
            return index
                .parse::<usize>()
                .ok()
                .filter(|index| *index < MAX_CHILDREN as usize)
                .map(Self::ChildAge)
                .ok_or_else(|| FieldParseError::InvalidIndex(s.to_string()));
        }

        let field = match s {
            "income" => Self::Income,
            "deductions" => Self::Deductions,
            "period" => Self::Period,
            "portugalResidency" => Self::PortugalResidency,
            "nhrStatus" => Self::NhrStatus,
            "region" => Self::Region,
            "haveChildren" => Self::HaveChildren,
            "numberOfChildren" => Self::NumberOfChildren,
            "incomeCategory" => Self::IncomeCategory,
            "nonPortugueseCompany" => Self::NonPortugueseCompany,
            "atividadeOpenDate" => Self::AtividadeOpenDate,
            "typeOfAtividade" => Self::TypeOfAtividade,
            _ => return Err(FieldParseError::Unknown(s.to_string())),
        };
        Ok(field)
    }
}

/// The three fixed sections of the form, in presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Section {
    Income,
    Residency,
    IncomeType,
}

impl Section {
    pub const ALL: [Section; 3] = [Section::Income, Section::Residency, Section::IncomeType];

    pub fn title(&self) -> &'static str {
        match self {
            Self::Income => "Income",
            Self::Residency => "Residency",
            Self::IncomeType => "Income type",
        }
    }
}
