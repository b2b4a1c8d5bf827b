//! Stable finances: expenses and income entries.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};

use super::text::{self, TextError};
use super::{ExpenseId, HorseId, StaffId};

const CATEGORY_MAX: usize = 100;
const DESCRIPTION_MAX: usize = 2000;
/// Largest amount accepted for a single entry, in whole currency units.
pub const AMOUNT_MAX: f64 = 1_000_000_000.0;

/// Direction of money flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseKind {
    Expense,
    Income,
}

impl ExpenseKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expense => "expense",
            Self::Income => "income",
        }
    }
}

/// Error returned for unknown expense kinds.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown expense type: {0}")]
pub struct UnknownExpenseKind(pub String);

impl FromStr for ExpenseKind {
    type Err = UnknownExpenseKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "expense" => Ok(Self::Expense),
            "income" => Ok(Self::Income),
            other => Err(UnknownExpenseKind(other.to_owned())),
        }
    }
}

/// Collection an entry may be attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelatedModel {
    Horse,
    Staff,
}

impl RelatedModel {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Horse => "Horse",
            Self::Staff => "Staff",
        }
    }
}

/// Error returned for unknown related model names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown related model: {0}")]
pub struct UnknownRelatedModel(pub String);

impl FromStr for RelatedModel {
    type Err = UnknownRelatedModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Horse" => Ok(Self::Horse),
            "Staff" => Ok(Self::Staff),
            other => Err(UnknownRelatedModel(other.to_owned())),
        }
    }
}

/// Horse or staff member an entry is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelatedEntity {
    Horse(HorseId),
    Staff(StaffId),
}

impl RelatedEntity {
    /// Pair a raw id with its model name.
    pub fn from_parts(model: RelatedModel, id: uuid::Uuid) -> Self {
        match model {
            RelatedModel::Horse => Self::Horse(HorseId::from_uuid(id)),
            RelatedModel::Staff => Self::Staff(StaffId::from_uuid(id)),
        }
    }

    pub fn model(self) -> RelatedModel {
        match self {
            Self::Horse(_) => RelatedModel::Horse,
            Self::Staff(_) => RelatedModel::Staff,
        }
    }

    pub fn id(self) -> uuid::Uuid {
        match self {
            Self::Horse(id) => *id.as_uuid(),
            Self::Staff(id) => *id.as_uuid(),
        }
    }
}

/// Non-negative money amount stored in hundredths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Amount(i64);

impl Amount {
    /// Build an amount from a decimal value, rounding to the nearest hundredth.
    ///
    /// # Examples
    /// ```
    /// use stable_backend::domain::Amount;
    ///
    /// let amount = Amount::from_decimal(120.5).unwrap();
    /// assert_eq!(amount.cents(), 12050);
    /// assert!(Amount::from_decimal(-1.0).is_none());
    /// ```
    pub fn from_decimal(value: f64) -> Option<Self> {
        if !value.is_finite() || !(0.0..=AMOUNT_MAX).contains(&value) {
            return None;
        }
        let cents = (value * 100.0).round() as i64;
        Some(Self(cents))
    }

    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> i64 {
        self.0
    }

    pub fn as_decimal(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// Validation errors raised by [`ExpenseEntry::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    Category(TextError),
    Description(TextError),
    /// Amount was negative, not finite or too large.
    InvalidAmount,
}

impl ExpenseValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::Category(_) => "category",
            Self::Description(_) => "description",
            Self::InvalidAmount => "amount",
        }
    }
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(err) => write!(f, "category {err}"),
            Self::Description(err) => write!(f, "description {err}"),
            Self::InvalidAmount => write!(f, "amount must be a number between 0 and {AMOUNT_MAX}"),
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// Unvalidated entry fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub date: NaiveDate,
    pub kind: ExpenseKind,
    pub category: String,
    pub related: Option<RelatedEntity>,
    pub amount: f64,
    pub settled: bool,
    pub description: Option<String>,
}

/// Validated, editable entry fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpenseEntry {
    date: NaiveDate,
    kind: ExpenseKind,
    category: String,
    related: Option<RelatedEntity>,
    amount: Amount,
    settled: bool,
    description: Option<String>,
}

impl ExpenseEntry {
    pub fn new(draft: ExpenseDraft) -> Result<Self, ExpenseValidationError> {
        Ok(Self {
            date: draft.date,
            kind: draft.kind,
            category: text::required(&draft.category, CATEGORY_MAX)
                .map_err(ExpenseValidationError::Category)?,
            related: draft.related,
            amount: Amount::from_decimal(draft.amount)
                .ok_or(ExpenseValidationError::InvalidAmount)?,
            settled: draft.settled,
            description: text::optional(draft.description, DESCRIPTION_MAX)
                .map_err(ExpenseValidationError::Description)?,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn kind(&self) -> ExpenseKind {
        self.kind
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn related(&self) -> Option<RelatedEntity> {
        self.related
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn settled(&self) -> bool {
        self.settled
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Persisted entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expense {
    pub id: ExpenseId,
    pub entry: ExpenseEntry,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Filters accepted when listing entries. All bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub kind: Option<ExpenseKind>,
    pub settled: Option<bool>,
    pub related_model: Option<RelatedModel>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        let entry = &expense.entry;
        self.kind.is_none_or(|kind| entry.kind() == kind)
            && self.settled.is_none_or(|settled| entry.settled() == settled)
            && self
                .related_model
                .is_none_or(|model| entry.related().map(RelatedEntity::model) == Some(model))
            && self.from.is_none_or(|from| entry.date() >= from)
            && self.to.is_none_or(|to| entry.date() <= to)
    }
}

/// Totals over a set of entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpenseSummary {
    pub income: Amount,
    pub expense: Amount,
    /// Unsettled expenses still to be paid.
    pub unsettled: Amount,
}

impl ExpenseSummary {
    pub fn from_entries<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Self {
        let mut income = 0_i64;
        let mut expense = 0_i64;
        let mut unsettled = 0_i64;
        for item in expenses {
            let cents = item.entry.amount().cents();
            match item.entry.kind() {
                ExpenseKind::Income => income = income.saturating_add(cents),
                ExpenseKind::Expense => {
                    expense = expense.saturating_add(cents);
                    if !item.entry.settled() {
                        unsettled = unsettled.saturating_add(cents);
                    }
                }
            }
        }
        Self {
            income: Amount::from_cents(income),
            expense: Amount::from_cents(expense),
            unsettled: Amount::from_cents(unsettled),
        }
    }

    /// Income minus expenses, in hundredths. May be negative.
    pub fn balance_cents(&self) -> i64 {
        self.income.cents().saturating_sub(self.expense.cents())
    }
}
