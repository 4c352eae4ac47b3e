use api_types::accommodation::AccommodationInput;
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
    ApiJson(payload): ApiJson<AccommodationInput>,
) -> Result<TripReply, ServerError> {
    let trip = state
        .engine
        .add_accommodation(trip_id, &current.id, &views::accommodation_draft(payload))
        .await?;
    Ok(trip_reply(&state, StatusCode::CREATED, &trip))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath((trip_id, item_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<AccommodationInput>,
) -> Result<TripReply, ServerError> {
    let trip = state
        .engine
        .update_accommodation(trip_id, item_id, &current.id, &views::accommodation_draft(payload))
        .await?;
    Ok(trip_reply(&state, StatusCode::OK, &trip))
}

/// Removes the stay together with its linked expense.
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath((trip_id, item_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<TripReply, ServerError> {
    let trip = state.engine.delete_accommodation(trip_id, item_id, &current.id).await?;
    Ok(trip_reply(&state, StatusCode::OK, &trip))
}
