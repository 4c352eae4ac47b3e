use api_types::{
    Envelope, Message,
    trip::{TripListParams, TripNew, TripPage, TripPatch, TripReplace, TripView},
};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::TripListQuery;
use uuid::Uuid;

use crate::{
    ServerError,
    extract::{ApiJson, ApiPath, ApiQuery},
    server::{CurrentUser, ServerState},
    views,
};

pub(crate) type TripReply = (StatusCode, Json<Envelope<TripView>>);

pub(crate) fn trip_reply(state: &ServerState, status: StatusCode, trip: &engine::Trip) -> TripReply {
    (
        status,
        Json(Envelope::ok(views::trip_view(trip, state.engine.rates()))),
    )
}

pub async fn list(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiQuery(params): ApiQuery<TripListParams>,
) -> Result<(StatusCode, Json<Envelope<TripPage>>), ServerError> {
    let query = TripListQuery::new(
        params.page,
        params.limit,
        params.sort_by.as_deref(),
        params.order.as_deref(),
    )?;
    let page = state.engine.list_trips(&current.id, &query).await?;
    Ok((
        StatusCode::OK,
        Json(Envelope::ok(views::trip_page(&page, state.engine.rates()))),
    ))
}

pub async fn create(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<TripNew>,
) -> Result<TripReply, ServerError> {
    let trip = state
        .engine
        .new_trip(&current.id, &views::trip_draft(payload))
        .await?;
    tracing::info!(trip_id = %trip.id, user_id = %current.id, "trip created");
    Ok(trip_reply(&state, StatusCode::CREATED, &trip))
}

pub async fn get(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath(trip_id): ApiPath<Uuid>,
) -> Result<TripReply, ServerError> {
    let trip = state.engine.trip(trip_id, &current.id).await?;
    Ok(trip_reply(&state, StatusCode::OK, &trip))
}

/// Replace the trip header and every collection present in the body.
pub async fn replace(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath(trip_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<TripReplace>,
) -> Result<TripReply, ServerError> {
    let trip = state
        .engine
        .replace_trip(trip_id, &current.id, &views::trip_replace(payload))
        .await?;
    Ok(trip_reply(&state, StatusCode::OK, &trip))
}

pub async fn patch(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath(trip_id): ApiPath<Uuid>,
    ApiJson(payload): ApiJson<TripPatch>,
) -> Result<TripReply, ServerError> {
    let trip = state
        .engine
        .patch_trip(trip_id, &current.id, &views::trip_patch(payload))
        .await?;
    Ok(trip_reply(&state, StatusCode::OK, &trip))
}

pub async fn delete(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiPath(trip_id): ApiPath<Uuid>,
) -> Result<(StatusCode, Json<Envelope<Message>>), ServerError> {
    state.engine.delete_trip(trip_id, &current.id).await?;
    tracing::info!(%trip_id, user_id = %current.id, "trip deleted");
    Ok((
        StatusCode::OK,
        Json(Envelope::ok(Message {
            message: "trip deleted".to_string(),
        })),
    ))
}
