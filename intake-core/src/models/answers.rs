use std::{collections::BTreeMap, fmt};

use chrono::NaiveDate;
use rust_decimal::{Decimal, prelude::ToPrimitive};

use super::choices::{ActivityType, Choice, IncomeCategory, Period, Region};
use super::field::Field;

/// The stored state of a single non-toggle answer.
///
/// Raw input that could not be coerced into `T` is kept verbatim in
/// [`Entry::Invalid`] so validation can report it against the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry<T> {
    Unset,
    Value(T),
    Invalid(String),
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self::Unset
    }
}

impl<T> Entry<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }

    /// Maps the stored value, keeping unset and invalid states as they are.
    pub fn map<U>(
        &self,
        f: impl FnOnce(&T) -> U,
    ) -> Entry<U> {
        match self {
            Self::Unset => Entry::Unset,
            Self::Value(value) => Entry::Value(f(value)),
            Self::Invalid(raw) => Entry::Invalid(raw.clone()),
        }
    }
}

impl<T: Copy> Entry<T> {
    pub fn get(&self) -> Option<T> {
        self.value().copied()
    }
}

static UNSET_AGE: Entry<Decimal> = Entry::Unset;

/// Children ages, stored by slot index rather than as a resizable list.
///
/// Slots that were never filled are simply absent, so a shorter list never
/// gets padded with made-up ages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChildrenAges(BTreeMap<usize, Entry<Decimal>>);

impl ChildrenAges {
    /// Builds ages for consecutive slots starting at zero.
    pub fn from_values(ages: impl IntoIterator<Item = Decimal>) -> Self {
        Self(
            ages.into_iter()
                .enumerate()
                .map(|(index, age)| (index, Entry::Value(age)))
                .collect(),
        )
    }

    /// The entry at `index`; unfilled slots read as [`Entry::Unset`].
    pub fn get(
        &self,
        index: usize,
    ) -> &Entry<Decimal> {
        self.0.get(&index).unwrap_or(&UNSET_AGE)
    }

    /// Stores an entry at `index`. Storing [`Entry::Unset`] removes the slot.
    pub fn set(
        &mut self,
        index: usize,
        entry: Entry<Decimal>,
    ) {
        match entry {
            Entry::Unset => {
                self.0.remove(&index);
            }
            entry => {
                self.0.insert(index, entry);
            }
        }
    }

    /// Length of the sequence the stored slots describe: one past the highest
    /// stored index.
    pub fn len(&self) -> usize {
        self.0.keys().next_back().map_or(0, |last| last.saturating_add(1))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Discards every slot at or beyond `count`. Returns the discarded
    /// indices, lowest first.
    pub fn truncate(
        &mut self,
        count: usize,
    ) -> Vec<usize> {
        let discarded = self.0.split_off(&count);
        discarded.into_keys().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &Entry<Decimal>)> {
        self.0.iter().map(|(index, entry)| (*index, entry))
    }
}

/// The full set of answers for one intake session.
///
/// Field meanings and the combinations in which they matter are documented on
/// [`crate::visibility`]; the invariants tying them together are enforced by
/// [`crate::rules::normalize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerSet {
    pub income: Entry<Decimal>,
    pub deductions: Entry<Decimal>,
    pub period: Entry<Period>,
    pub portugal_residency: bool,
    pub nhr_status: bool,
    pub region: Entry<Region>,
    pub have_children: bool,
    pub number_of_children: Entry<Decimal>,
    pub children_age: ChildrenAges,
    pub income_category: Entry<IncomeCategory>,
    pub non_portuguese_company: bool,
    pub atividade_open_date: Entry<NaiveDate>,
    pub type_of_atividade: Entry<ActivityType>,
}

impl AnswerSet {
    /// The answers a new session starts from. `today` seeds the atividade
    /// opening date.
    pub fn with_defaults(today: NaiveDate) -> Self {
        Self {
            income: Entry::Value(Decimal::from(10_000)),
            deductions: Entry::Value(Decimal::ZERO),
            period: Entry::Value(Period::Year2024),
            portugal_residency: true,
            nhr_status: false,
            region: Entry::Value(Region::Continental),
            have_children: false,
            number_of_children: Entry::Value(Decimal::ONE),
            children_age: ChildrenAges::default(),
            income_category: Entry::Value(IncomeCategory::Employment),
            non_portuguese_company: false,
            atividade_open_date: Entry::Value(today),
            type_of_atividade: Entry::Value(ActivityType::Services),
        }
    }

    /// The number of children as a slot count, if the stored value is a
    /// non-negative whole number.
    pub fn child_count(&self) -> Option<usize> {
        let count = self.number_of_children.get()?;
        if count.is_sign_negative() || !count.fract().is_zero() {
            return None;
        }
        count.to_usize()
    }

    pub fn is_employed(&self) -> bool {
        self.income_category.get() == Some(IncomeCategory::Employment)
    }

    pub fn is_self_employed(&self) -> bool {
        self.income_category.get() == Some(IncomeCategory::SelfEmployment)
    }

    /// A uniform, read-only view of one field's stored answer.
    pub fn value_of(
        &self,
        field: Field,
    ) -> FieldValue<'_> {
        match field {
            Field::Income => FieldValue::Number(&self.income),
            Field::Deductions => FieldValue::Number(&self.deductions),
            Field::Period => FieldValue::choice(&self.period),
            Field::PortugalResidency => FieldValue::Toggle(self.portugal_residency),
            Field::NhrStatus => FieldValue::Toggle(self.nhr_status),
            Field::Region => FieldValue::choice(&self.region),
            Field::HaveChildren => FieldValue::Toggle(self.have_children),
            Field::NumberOfChildren => FieldValue::Number(&self.number_of_children),
            Field::ChildAge(index) => FieldValue::Number(self.children_age.get(index)),
            Field::IncomeCategory => FieldValue::choice(&self.income_category),
            Field::NonPortugueseCompany => FieldValue::Toggle(self.non_portuguese_company),
            Field::AtividadeOpenDate => FieldValue::Date(&self.atividade_open_date),
            Field::TypeOfAtividade => FieldValue::choice(&self.type_of_atividade),
        }
    }
}

/// Borrowed view of a stored answer, independent of the field's Rust type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Number(&'a Entry<Decimal>),
    Toggle(bool),
    Choice(Entry<&'static str>),
    Date(&'a Entry<NaiveDate>),
}

impl FieldValue<'_> {
    fn choice<C: Choice>(entry: &Entry<C>) -> Self {
        FieldValue::Choice(entry.map(|option| option.as_str()))
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        fn entry<T: fmt::Display>(
            f: &mut fmt::Formatter<'_>,
            entry: &Entry<T>,
        ) -> fmt::Result {
            match entry {
                Entry::Unset => f.write_str("—"),
                Entry::Value(value) => write!(f, "{value}"),
                Entry::Invalid(raw) => write!(f, "{raw:?}"),
            }
        }

        match self {
            Self::Number(value) => entry(f, *value),
            Self::Toggle(on) => f.write_str(if *on { "yes" } else { "no" }),
            Self::Choice(value) => entry(f, value),
            Self::Date(value) => entry(f, *value),
        }
    }
}
