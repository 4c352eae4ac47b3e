use api_types::transportation::TransportationInput;
use axum::{Extension, extract::State, http::StatusCode};
use uuid::Uuid;

use crate::{
    ServerError,
    extract::{ApiJson, ApiPath},
    server::{CurrentUser, ServerState},
    trips::{TripReply, trip_reply},
    views,
};

/// Add a transportation entry. A positive cost also adds its linked expense.
pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath(trip_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<TransportationInput>,
) -> Result<TripReply, ServerError> {
    let trip = state
        .engine
        .add_transportation(trip_id, &current.id, &views::transportation_draft(payload))
        .await?;
    Ok(trip_reply(&state, StatusCode::CREATED, &trip))
}

/// Replace the entry and regenerate its linked expense. A zero or missing
/// cost drops the expense.
pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath((trip_id, item_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<TransportationInput>,
) -> Result<TripReply, ServerError> {
    let trip = state
        .engine
        .update_transportation(trip_id, item_id, &current.id, &views::transportation_draft(payload))
        .await?;
    Ok(trip_reply(&state, StatusCode::OK, &trip))
}

pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath((trip_id, item_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<TripReply, ServerError> {
    let trip = state.engine.delete_transportation(trip_id, item_id, &current.id).await?;
    Ok(trip_reply(&state, StatusCode::OK, &trip))
}
