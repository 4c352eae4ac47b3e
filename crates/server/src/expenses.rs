use api_types::expense::ExpenseInput;
use axum::{Extension, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    ServerError,
    extract::{ApiJson, ApiPath},
    server::{CurrentUser, ServerState},
    trips::{TripReply, trip_reply},
    views,
};

pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath(trip_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<ExpenseInput>,
) -> Result<TripReply, ServerError> {
    let trip = state
        .engine
        .add_expense(trip_id, &current.id, &views::expense_draft(payload))
        .await?;
    Ok(trip_reply(&state, StatusCode::CREATED, &trip))
}

// Linked expenses are rejected here; they change through their source entry.
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath((trip_id, item_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<ExpenseInput>,
) -> Result<TripReply, ServerError> {
    let trip = state
        .engine
        .update_expense(trip_id, item_id, &current.id, &views::expense_draft(payload))
        .await?;
    Ok(trip_reply(&state, StatusCode::OK, &trip))
}

pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath((trip_id, item_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<TripReply, ServerError> {
    let trip = state.engine.delete_expense(trip_id, item_id, &current.id).await?;
    Ok(trip_reply(&state, StatusCode::OK, &trip))
}
