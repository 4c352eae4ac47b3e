use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    DestinationDraft, ResultEngine,
    util::{ensure_date_order, normalize_optional_text, normalize_required},
};

/// A stop of the trip.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub id: Uuid,
    pub city: String,
    pub country: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub notes: Option<String>,
}

impl Destination {
    pub(crate) fn from_draft(id: Uuid, draft: &DestinationDraft) -> ResultEngine<Self> {
        let city = normalize_required(&draft.city, "city")?;
        let country = normalize_required(&draft.country, "country")?;
        ensure_date_order(
            draft.arrival_date,
            draft.departure_date,
            "arrival_date",
            "departure_date",
        )?;
        Ok(Self {
            id,
            city,
            country,
            arrival_date: draft.arrival_date,
            departure_date: draft.departure_date,
            notes: normalize_optional_text(draft.notes.as_deref()),
        })
    }
}
