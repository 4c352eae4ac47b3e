use api_types::destination::DestinationInput;
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
    ApiJson(payload): ApiJson<DestinationInput>,
) -> Result<TripReply, ServerError> {
    let trip = state
        .engine
        .add_destination(trip_id, &current.id, &views::destination_draft(payload))
        .await?;
    Ok(trip_reply(&state, StatusCode::CREATED, &trip))
}

pub async fn update(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath((trip_id, item_id)): ApiPath<(Uuid, Uuid)>,
    ApiJson(payload): ApiJson<DestinationInput>,
) -> Result<TripReply, ServerError> {
    let trip = state
        .engine
        .update_destination(trip_id, item_id, &current.id, &views::destination_draft(payload))
        .await?;
    Ok(trip_reply(&state, StatusCode::OK, &trip))
}

/// Items pointing at the destination keep existing, unassigned.
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath((trip_id, item_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<TripReply, ServerError> {
    let trip = state.engine.delete_destination(trip_id, item_id, &current.id).await?;
    Ok(trip_reply(&state, StatusCode::OK, &trip))
}
