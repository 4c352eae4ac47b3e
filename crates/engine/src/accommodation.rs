use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    AccommodationDraft, CurrencyCode, ExpenseCategory, LinkedType, RateTable, ResultEngine,
    linker::{LinkSource, LinkedExpense},
    util::{ensure_amount, ensure_date_order, normalize_optional_text, normalize_required},
};

/// A stay (hotel, apartment, ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accommodation {
    pub id: Uuid,
    pub name: String,
    pub city: String,
    #[serde(default)]
    pub address: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub cost_minor: Option<i64>,
    pub currency: CurrencyCode,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub destination_id: Option<Uuid>,
}

impl Accommodation {
    pub(crate) fn from_draft(
        id: Uuid,
        draft: &AccommodationDraft,
        trip_currency: &CurrencyCode,
        rates: &RateTable,
    ) -> ResultEngine<Self> {
        let name = normalize_required(&draft.name, "name")?;
        let city = normalize_required(&draft.city, "city")?;
        ensure_date_order(draft.check_in, draft.check_out, "check_in", "check_out")?;
        let cost_minor = draft
            .cost_minor
            .map(|cost| ensure_amount(cost, "cost"))
            .transpose()?;
        let currency = match draft.currency.as_deref() {
            Some(code) => rates.known(code)?,
            None => trip_currency.clone(),
        };
        Ok(Self {
            id,
            name,
            city,
            address: normalize_optional_text(draft.address.as_deref()),
            check_in: draft.check_in,
            check_out: draft.check_out,
            cost_minor,
            currency,
            notes: normalize_optional_text(draft.notes.as_deref()),
            destination_id: draft.destination_id,
        })
    }

    /// Number of nights between check-in and check-out.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }
}

impl LinkSource for Accommodation {
    fn link_id(&self) -> Uuid {
        self.id
    }

    fn linked_type(&self) -> LinkedType {
        LinkedType::Accommodation
    }

    fn linked_expense(&self) -> LinkedExpense {
        LinkedExpense {
            description: format!("Accommodation: {} ({})", self.name, self.city),
            category: ExpenseCategory::Accommodation,
            amount_minor: self.cost_minor.unwrap_or(0),
            currency: self.currency.clone(),
            date: self.check_in,
            destination_id: self.destination_id,
        }
    }
}
