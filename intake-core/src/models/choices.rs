use std::fmt;

use serde::{Deserialize, Serialize};

/// A closed set of options offered by a select-style question.
///
/// Each option has a stable wire code (the value the presentation layer
/// sends back) which is also what the schema lists as the field's domain.
pub trait Choice: Sized + Copy + 'static {
    /// Every option, in the order the question presents them.
    const ALL: &'static [Self];

    /// Wire codes for [`Choice::ALL`], in the same order.
    const CODES: &'static [&'static str];

    fn as_str(&self) -> &'static str;

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|option| option.as_str() == s)
    }
}

/// Tax year the simulation applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "2022")]
    Year2022,
    #[serde(rename = "2023")]
    Year2023,
    #[serde(rename = "2024")]
    Year2024,
}

impl Choice for Period {
    const ALL: &'static [Self] = &[Self::Year2022, Self::Year2023, Self::Year2024];
    const CODES: &'static [&'static str] = &["2022", "2023", "2024"];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Year2022 => "2022",
            Self::Year2023 => "2023",
            Self::Year2024 => "2024",
        }
    }
}

/// Portuguese tax region. Only meaningful for tax residents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Continental,
    Madeira,
    Azores,
}

impl Choice for Region {
    const ALL: &'static [Self] = &[Self::Continental, Self::Madeira, Self::Azores];
    const CODES: &'static [&'static str] = &["continental", "madeira", "azores"];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Continental => "continental",
            Self::Madeira => "madeira",
            Self::Azores => "azores",
        }
    }
}

impl Region {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Continental => "Continental",
            Self::Madeira => "Madeira",
            Self::Azores => "Azores",
        }
    }
}

/// Income category under the Portuguese IRS code.
///
/// Category A covers dependent work (employment), category B covers
/// self-employed workers (trabalhador independente).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IncomeCategory {
    #[serde(rename = "A")]
    Employment,
    #[serde(rename = "B")]
    SelfEmployment,
}

impl Choice for IncomeCategory {
    const ALL: &'static [Self] = &[Self::Employment, Self::SelfEmployment];
    const CODES: &'static [&'static str] = &["A", "B"];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Employment => "A",
            Self::SelfEmployment => "B",
        }
    }
}

impl IncomeCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Employment => "Dependant worker (employment)",
            Self::SelfEmployment => "Self-employed (trabalhador independente)",
        }
    }
}

/// What a self-employed filer's atividade does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Goods,
    Services,
}

impl Choice for ActivityType {
    const ALL: &'static [Self] = &[Self::Goods, Self::Services];
    const CODES: &'static [&'static str] = &["goods", "services"];

    fn as_str(&self) -> &'static str {
        match self {
            Self::Goods => "goods",
            Self::Services => "services",
        }
    }
}

macro_rules! display_as_code {
    ($($ty:ty),+) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(
                    &self,
                    f: &mut fmt::Formatter<'_>,
                ) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_code!(Period, Region, IncomeCategory, ActivityType);
