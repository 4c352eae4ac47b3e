use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    CurrencyCode, EngineError, ExpenseCategory, LinkedType, RateTable, ResultEngine,
    TransportationDraft,
    linker::{LinkSource, LinkedExpense},
    util::{
        ensure_amount, normalize_optional_text, normalize_required, normalize_time_of_day,
    },
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportKind {
    Flight,
    Train,
    Bus,
    Car,
    Ferry,
}

impl TransportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Flight => "flight",
            Self::Train => "train",
            Self::Bus => "bus",
            Self::Car => "car",
            Self::Ferry => "ferry",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Flight => "Flight",
            Self::Train => "Train",
            Self::Bus => "Bus",
            Self::Car => "Car",
            Self::Ferry => "Ferry",
        }
    }
}

impl TryFrom<&str> for TransportKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "flight" => Ok(Self::Flight),
            "train" => Ok(Self::Train),
            "bus" => Ok(Self::Bus),
            "car" => Ok(Self::Car),
            "ferry" => Ok(Self::Ferry),
            other => Err(EngineError::InvalidField(format!(
                "invalid transportation type: {other}"
            ))),
        }
    }
}

/// A transportation leg between two places.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transportation {
    pub id: Uuid,
    pub kind: TransportKind,
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub cost_minor: Option<i64>,
    pub currency: CurrencyCode,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub destination_id: Option<Uuid>,
}

impl Transportation {
    pub(crate) fn from_draft(
        id: Uuid,
        draft: &TransportationDraft,
        trip_currency: &CurrencyCode,
        rates: &RateTable,
    ) -> ResultEngine<Self> {
        let kind = TransportKind::try_from(draft.kind.as_str())?;
        let from = normalize_required(&draft.from, "from")?;
        let to = normalize_required(&draft.to, "to")?;
        let departure_time =
            normalize_time_of_day(draft.departure_time.as_deref(), "departure_time")?;
        let arrival_time = normalize_time_of_day(draft.arrival_time.as_deref(), "arrival_time")?;
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
            kind,
            from,
            to,
            date: draft.date,
            departure_time,
            arrival_time,
            cost_minor,
            currency,
            notes: normalize_optional_text(draft.notes.as_deref()),
            destination_id: draft.destination_id,
        })
    }
}

impl LinkSource for Transportation {
    fn link_id(&self) -> Uuid {
        self.id
    }

    fn linked_type(&self) -> LinkedType {
        LinkedType::Transportation
    }

    fn linked_expense(&self) -> LinkedExpense {
        LinkedExpense {
            description: format!(
                "Transport: {} ({} - {})",
                self.kind.label(),
                self.from,
                self.to
            ),
            category: ExpenseCategory::Transport,
            amount_minor: self.cost_minor.unwrap_or(0),
            currency: self.currency.clone(),
            date: self.date,
            destination_id: self.destination_id,
        }
    }
}
