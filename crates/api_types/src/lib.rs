use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Success body: `{ "success": true, "data": ... }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Failure body: `{ "success": false, "error": "..." }`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Health {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

pub mod auth {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RegisterRequest {
        pub email: String,
        pub password: String,
        pub name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginRequest {
        pub email: String,
        pub password: String,
    }

    /// The refresh token may come from the body or from the `refreshToken`
    /// cookie.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct RefreshRequest {
        pub refresh_token: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AuthResponse {
        pub user: user::UserView,
        pub access_token: String,
        pub refresh_token: String,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Preferences {
        pub default_currency: String,
        pub theme: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub email: String,
        pub name: Option<String>,
        pub avatar: Option<String>,
        pub preferences: Preferences,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PreferencesUpdate {
        pub default_currency: Option<String>,
        pub theme: Option<String>,
    }

    /// Profile changes. Absent fields are kept; an empty `name`/`avatar`
    /// clears it.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct ProfileUpdate {
        pub name: Option<String>,
        pub avatar: Option<String>,
        #[serde(default)]
        pub preferences: Option<PreferencesUpdate>,
    }
}

pub mod trip {
    use super::*;

    /// Body of `POST /api/trips`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripNew {
        pub title: String,
        #[serde(default)]
        pub budget_minor: i64,
        pub currency: Option<String>,
        pub logo: Option<String>,
    }

    /// Body of `PUT /api/trips/{trip_id}`. Collections left out are kept as
    /// stored; linked expenses are always derived again.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripReplace {
        pub title: String,
        #[serde(default)]
        pub budget_minor: i64,
        pub currency: Option<String>,
        pub logo: Option<String>,
        pub destinations: Option<Vec<destination::DestinationInput>>,
        pub expenses: Option<Vec<expense::ExpenseInput>>,
        pub transportation: Option<Vec<transportation::TransportationInput>>,
        pub accommodation: Option<Vec<accommodation::AccommodationInput>>,
    }

    /// Body of `PATCH /api/trips/{trip_id}`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TripPatch {
        pub title: Option<String>,
        pub budget_minor: Option<i64>,
        pub currency: Option<String>,
        /// Empty string removes the logo.
        pub logo: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TripListParams {
        pub page: Option<u64>,
        pub limit: Option<u64>,
        pub sort_by: Option<String>,
        pub order: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpendView {
        pub category: String,
        pub total_minor: i64,
    }

    /// Budget figures, in minor units of `reference_currency`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub reference_currency: String,
        pub budget_minor: i64,
        pub total_spent_minor: i64,
        pub remaining_minor: i64,
        pub spent_by_category: Vec<CategorySpendView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripView {
        pub id: Uuid,
        pub title: String,
        pub budget_minor: i64,
        pub currency: String,
        pub logo: Option<String>,
        pub destinations: Vec<destination::DestinationView>,
        pub expenses: Vec<expense::ExpenseView>,
        pub transportation: Vec<transportation::TransportationView>,
        pub accommodation: Vec<accommodation::AccommodationView>,
        /// Plain sum of the expense amounts, currencies not converted.
        pub total_expenses_minor: i64,
        pub budget: BudgetView,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripPage {
        pub trips: Vec<TripView>,
        pub total: u64,
        pub page: u64,
        pub limit: u64,
        pub total_pages: u64,
    }
}

pub mod destination {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DestinationInput {
        /// Only read by a whole-trip replace, where it keeps the element id.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<Uuid>,
        pub city: String,
        pub country: String,
        pub arrival_date: NaiveDate,
        pub departure_date: NaiveDate,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DestinationView {
        pub id: Uuid,
        pub city: String,
        pub country: String,
        pub arrival_date: NaiveDate,
        pub departure_date: NaiveDate,
        pub notes: Option<String>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseInput {
        /// Only read by a whole-trip replace, where it keeps the element id.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<Uuid>,
        pub description: String,
        pub amount_minor: i64,
        /// Defaults to the trip currency.
        pub currency: Option<String>,
        /// `transport`, `accommodation`, `food`, `activities` or `other`.
        pub category: String,
        pub date: NaiveDate,
        pub destination_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: Uuid,
        pub description: String,
        pub amount_minor: i64,
        pub currency: String,
        pub category: String,
        pub date: NaiveDate,
        pub destination_id: Option<Uuid>,
        /// Set on expenses generated from a transportation/accommodation cost.
        pub linked_id: Option<Uuid>,
        pub linked_type: Option<String>,
    }
}

pub mod transportation {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransportationInput {
        /// Only read by a whole-trip replace, where it keeps the element id.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<Uuid>,
        /// `flight`, `train`, `bus`, `car` or `ferry`.
        #[serde(rename = "type")]
        pub kind: String,
        pub from: String,
        pub to: String,
        pub date: NaiveDate,
        pub departure_time: Option<String>,
        pub arrival_time: Option<String>,
        pub cost_minor: Option<i64>,
        pub currency: Option<String>,
        pub notes: Option<String>,
        pub destination_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransportationView {
        pub id: Uuid,
        #[serde(rename = "type")]
        pub kind: String,
        pub from: String,
        pub to: String,
        pub date: NaiveDate,
        pub departure_time: Option<String>,
        pub arrival_time: Option<String>,
        pub cost_minor: Option<i64>,
        pub currency: String,
        pub notes: Option<String>,
        pub destination_id: Option<Uuid>,
    }
}

pub mod accommodation {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccommodationInput {
        /// Only read by a whole-trip replace, where it keeps the element id.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub id: Option<Uuid>,
        pub name: String,
        pub city: String,
        pub address: Option<String>,
        pub check_in: NaiveDate,
        pub check_out: NaiveDate,
        pub cost_minor: Option<i64>,
        pub currency: Option<String>,
        pub notes: Option<String>,
        pub destination_id: Option<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccommodationView {
        pub id: Uuid,
        pub name: String,
        pub city: String,
        pub address: Option<String>,
        pub check_in: NaiveDate,
        pub check_out: NaiveDate,
        pub nights: i64,
        pub cost_minor: Option<i64>,
        pub currency: String,
        pub notes: Option<String>,
        pub destination_id: Option<Uuid>,
    }
}
