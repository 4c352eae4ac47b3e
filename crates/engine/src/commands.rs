//! Command structs for engine operations.
//!
//! Drafts carry the raw values a caller wants to write. They are validated by
//! the engine before they touch the aggregate, so a draft can be built straight
//! from a request body.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

/// Header fields of a trip (create and full replace).
#[derive(Clone, Debug)]
pub struct TripDraft {
    pub title: String,
    pub budget_minor: i64,
    /// Defaults to the reference currency of the rate table.
    pub currency: Option<String>,
    pub logo: Option<String>,
}

/// An element of a whole-trip replace. A supplied `id` is kept, a missing one
/// is generated.
#[derive(Clone, Debug)]
pub struct Keyed<D> {
    pub id: Option<Uuid>,
    pub draft: D,
}

impl<D> Keyed<D> {
    pub fn new(draft: D) -> Self {
        Self { id: None, draft }
    }
}

/// Replace of a whole trip: the header always, each collection when present.
///
/// Linked expenses are never taken from the input; they are derived again from
/// the resulting transportation and accommodation entries.
#[derive(Clone, Debug)]
pub struct TripReplace {
    pub header: TripDraft,
    pub destinations: Option<Vec<Keyed<DestinationDraft>>>,
    pub expenses: Option<Vec<Keyed<ExpenseDraft>>>,
    pub transportation: Option<Vec<Keyed<TransportationDraft>>>,
    pub accommodation: Option<Vec<Keyed<AccommodationDraft>>>,
}

impl From<TripDraft> for TripReplace {
    fn from(header: TripDraft) -> Self {
        Self {
            header,
            destinations: None,
            expenses: None,
            transportation: None,
            accommodation: None,
        }
    }
}

/// Partial update of the trip header. `None` leaves the field untouched; an
/// empty `logo` removes the current one.
#[derive(Clone, Debug, Default)]
pub struct TripPatch {
    pub title: Option<String>,
    pub budget_minor: Option<i64>,
    pub currency: Option<String>,
    pub logo: Option<String>,
}

impl TripPatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.budget_minor.is_none()
            && self.currency.is_none()
            && self.logo.is_none()
    }
}

#[derive(Clone, Debug)]
pub struct DestinationDraft {
    pub city: String,
    pub country: String,
    pub arrival_date: NaiveDate,
    pub departure_date: NaiveDate,
    pub notes: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ExpenseDraft {
    pub description: String,
    pub amount_minor: i64,
    /// Defaults to the trip currency.
    pub currency: Option<String>,
    pub category: String,
    pub date: NaiveDate,
    pub destination_id: Option<Uuid>,
}

#[derive(Clone, Debug)]
pub struct TransportationDraft {
    pub kind: String,
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub departure_time: Option<String>,
    pub arrival_time: Option<String>,
    pub cost_minor: Option<i64>,
    /// Defaults to the trip currency.
    pub currency: Option<String>,
    pub notes: Option<String>,
    pub destination_id: Option<Uuid>,
}

#[derive(Clone, Debug)]
pub struct AccommodationDraft {
    pub name: String,
    pub city: String,
    pub address: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub cost_minor: Option<i64>,
    /// Defaults to the trip currency.
    pub currency: Option<String>,
    pub notes: Option<String>,
    pub destination_id: Option<Uuid>,
}

/// A new account. The password is already hashed by the caller.
#[derive(Clone, Debug)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub name: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub default_currency: Option<String>,
    pub theme: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TripSort {
    #[default]
    CreatedAt,
    UpdatedAt,
    Title,
}

impl TripSort {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Title => "title",
        }
    }
}

impl TryFrom<&str> for TripSort {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "created_at" | "createdAt" => Ok(Self::CreatedAt),
            "updated_at" | "updatedAt" => Ok(Self::UpdatedAt),
            "title" => Ok(Self::Title),
            other => Err(EngineError::InvalidField(format!(
                "cannot sort trips by {other}"
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl TryFrom<&str> for SortOrder {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(EngineError::InvalidField(format!(
                "order must be asc or desc, got {other}"
            ))),
        }
    }
}

/// Page of the caller's trips.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TripListQuery {
    pub page: u64,
    pub limit: u64,
    pub sort_by: TripSort,
    pub order: SortOrder,
}

impl TripListQuery {
    pub const DEFAULT_LIMIT: u64 = 10;
    pub const MAX_LIMIT: u64 = 50;
    pub const MAX_PAGE: u64 = 1_000_000;

    /// Build a query from optional request parameters.
    pub fn new(
        page: Option<u64>,
        limit: Option<u64>,
        sort_by: Option<&str>,
        order: Option<&str>,
    ) -> ResultEngine<Self> {
        let page = page.unwrap_or(1);
        if !(1..=Self::MAX_PAGE).contains(&page) {
            return Err(EngineError::InvalidField(format!(
                "page must be between 1 and {}",
                Self::MAX_PAGE
            )));
        }
        let limit = limit.unwrap_or(Self::DEFAULT_LIMIT);
        if !(1..=Self::MAX_LIMIT).contains(&limit) {
            return Err(EngineError::InvalidField(format!(
                "limit must be between 1 and {}",
                Self::MAX_LIMIT
            )));
        }
        let sort_by = sort_by.map(TripSort::try_from).transpose()?.unwrap_or_default();
        let order = order.map(SortOrder::try_from).transpose()?.unwrap_or_default();
        Ok(Self {
            page,
            limit,
            sort_by,
            order,
        })
    }

    pub(crate) fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for TripListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
            sort_by: TripSort::default(),
            order: SortOrder::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults() {
        let query = TripListQuery::new(None, None, None, None).unwrap();
        assert_eq!(query, TripListQuery::default());
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn list_query_bounds() {
        assert!(TripListQuery::new(Some(0), None, None, None).is_err());
        assert!(TripListQuery::new(None, Some(0), None, None).is_err());
        assert!(TripListQuery::new(None, Some(51), None, None).is_err());
        let query = TripListQuery::new(Some(3), Some(50), Some("title"), Some("asc")).unwrap();
        assert_eq!(query.offset(), 100);
        assert_eq!(query.sort_by, TripSort::Title);
        assert_eq!(query.order, SortOrder::Asc);
    }

    #[test]
    fn list_query_rejects_huge_pages() {
        assert_eq!(
            TripListQuery::new(Some(u64::MAX), Some(10), None, None),
            Err(EngineError::InvalidField(
                "page must be between 1 and 1000000".to_string()
            ))
        );
        let last = TripListQuery::new(Some(TripListQuery::MAX_PAGE), Some(50), None, None).unwrap();
        assert_eq!(last.offset(), 49_999_950);

        let built = TripListQuery {
            page: u64::MAX,
            ..TripListQuery::default()
        };
        assert_eq!(built.offset(), u64::MAX);
    }

    #[test]
    fn list_query_rejects_unknown_sort() {
        assert_eq!(
            TripListQuery::new(None, None, Some("budget"), None),
            Err(EngineError::InvalidField("cannot sort trips by budget".to_string()))
        );
        assert!(TripListQuery::new(None, None, None, Some("up")).is_err());
    }
}
