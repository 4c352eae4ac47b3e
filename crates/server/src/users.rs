use api_types::{
    Envelope,
    user::{ProfileUpdate, UserView},
};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    ServerError,
    extract::ApiJson,
    server::{CurrentUser, ServerState},
    views,
};

pub async fn me(
    Extension(current): Extension<CurrentUser>,
) -> Result<(StatusCode, Json<Envelope<UserView>>), ServerError> {
    Ok((
        StatusCode::OK,
        Json(Envelope::ok(views::user_view(&current.user))),
    ))
}

pub async fn update_me(
    State(state): State<ServerState>,
    Extension(current): Extension<CurrentUser>,
    ApiJson(payload): ApiJson<ProfileUpdate>,
) -> Result<(StatusCode, Json<Envelope<UserView>>), ServerError> {
    let user = state
        .engine
        .update_profile(&current.id, &views::profile_update(payload))
        .await?;
    Ok((StatusCode::OK, Json(Envelope::ok(views::user_view(&user)))))
}
