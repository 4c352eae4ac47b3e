use api_types::ErrorBody;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{AuthConfig, ServerConfig, ServerState, router, run, run_with_listener, spawn_with_listener};

mod accommodation;
mod auth;
mod destinations;
mod expenses;
mod extract;
mod server;
mod token;
mod transportation;
mod trips;
mod users;
mod views;

pub mod types {
    pub mod trip {
        pub use api_types::trip::{
            BudgetView, CategorySpendView, TripListParams, TripNew, TripPage, TripPatch,
            TripReplace, TripView,
        };
    }

    pub mod destination {
        pub use api_types::destination::{DestinationInput, DestinationView};
    }

    pub mod expense {
        pub use api_types::expense::{ExpenseInput, ExpenseView};
    }

    pub mod transportation {
        pub use api_types::transportation::{TransportationInput, TransportationView};
    }

    pub mod accommodation {
        pub use api_types::accommodation::{AccommodationInput, AccommodationView};
    }

    pub mod auth {
        pub use api_types::auth::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest};
    }

    pub mod user {
        pub use api_types::user::{Preferences, PreferencesUpdate, ProfileUpdate, UserView};
    }

    pub use api_types::{Envelope, ErrorBody, Health, Message};
}

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    Generic(String),
    Unauthorized(String),
    Internal(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
        EngineError::Database(_) | EngineError::Document(_) => StatusCode::INTERNAL_SERVER_ERROR,
        EngineError::InvalidAmount(_)
        | EngineError::InvalidField(_)
        | EngineError::InvalidCurrency(_)
        | EngineError::ManagedExpense(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Document(doc_err) => {
            tracing::error!("stored trip document is corrupt: {doc_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Engine(err) => (status_for_engine_error(&err), message_for_engine_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::Unauthorized(err) => (StatusCode::UNAUTHORIZED, err),
            ServerError::Internal(err) => {
                tracing::error!("{err}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };

        (status, Json(ErrorBody::new(error))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
