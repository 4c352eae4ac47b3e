//! Trip expenses.
//!
//! An expense is either entered by the user or generated from the cost of a
//! transportation/accommodation entry. Generated expenses carry `linked_id` and
//! `linked_type` and are only ever touched through their source.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    CurrencyCode, EngineError, ExpenseDraft, RateTable, ResultEngine,
    util::{ensure_amount, normalize_required},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Transport,
    Accommodation,
    Food,
    Activities,
    Other,
}

impl ExpenseCategory {
    pub const ALL: [Self; 5] = [
        Self::Transport,
        Self::Accommodation,
        Self::Food,
        Self::Activities,
        Self::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Accommodation => "accommodation",
            Self::Food => "food",
            Self::Activities => "activities",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for ExpenseCategory {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "transport" => Ok(Self::Transport),
            "accommodation" => Ok(Self::Accommodation),
            "food" => Ok(Self::Food),
            "activities" => Ok(Self::Activities),
            "other" => Ok(Self::Other),
            other => Err(EngineError::InvalidField(format!(
                "invalid expense category: {other}"
            ))),
        }
    }
}

/// Which kind of entry generated a linked expense.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkedType {
    Transportation,
    Accommodation,
}

impl LinkedType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transportation => "transportation",
            Self::Accommodation => "accommodation",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub description: String,
    pub amount_minor: i64,
    pub currency: CurrencyCode,
    pub category: ExpenseCategory,
    pub date: NaiveDate,
    #[serde(default)]
    pub destination_id: Option<Uuid>,
    #[serde(default)]
    pub linked_id: Option<Uuid>,
    #[serde(default)]
    pub linked_type: Option<LinkedType>,
}

impl Expense {
    /// Validate a user-entered expense.
    pub(crate) fn from_draft(
        id: Uuid,
        draft: &ExpenseDraft,
        trip_currency: &CurrencyCode,
        rates: &RateTable,
    ) -> ResultEngine<Self> {
        let description = normalize_required(&draft.description, "description")?;
        let amount_minor = ensure_amount(draft.amount_minor, "amount")?;
        let currency = match draft.currency.as_deref() {
            Some(code) => rates.known(code)?,
            None => trip_currency.clone(),
        };
        let category = ExpenseCategory::try_from(draft.category.as_str())?;
        Ok(Self {
            id,
            description,
            amount_minor,
            currency,
            category,
            date: draft.date,
            destination_id: draft.destination_id,
            linked_id: None,
            linked_type: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ExpenseDraft {
        ExpenseDraft {
            description: " Dinner ".to_string(),
            amount_minor: 4_500,
            currency: None,
            category: "Food".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 6, 2).unwrap(),
            destination_id: None,
        }
    }

    #[test]
    fn draft_defaults_to_trip_currency() {
        let rates = RateTable::default();
        let eur = CurrencyCode::new("EUR").unwrap();
        let expense = Expense::from_draft(Uuid::new_v4(), &draft(), &eur, &rates).unwrap();
        assert_eq!(expense.description, "Dinner");
        assert_eq!(expense.currency, eur);
        assert_eq!(expense.category, ExpenseCategory::Food);
        assert_eq!(expense.linked_id, None);
    }

    #[test]
    fn draft_validation() {
        let rates = RateTable::default();
        let usd = CurrencyCode::new("USD").unwrap();

        let mut negative = draft();
        negative.amount_minor = -1;
        assert_eq!(
            Expense::from_draft(Uuid::new_v4(), &negative, &usd, &rates),
            Err(EngineError::InvalidAmount("amount must be >= 0".to_string()))
        );

        let mut unknown = draft();
        unknown.currency = Some("GBP".to_string());
        assert_eq!(
            Expense::from_draft(Uuid::new_v4(), &unknown, &usd, &rates),
            Err(EngineError::InvalidCurrency("GBP".to_string()))
        );

        let mut category = draft();
        category.category = "souvenirs".to_string();
        assert!(Expense::from_draft(Uuid::new_v4(), &category, &usd, &rates).is_err());
    }
}
