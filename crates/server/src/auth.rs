//! Account registration and sessions.
//!
//! A session is a short lived access token (JWT, sent as a bearer token) plus a
//! rotating refresh token kept in the `refreshToken` cookie.

use api_types::{
    Envelope, Message,
    auth::{AuthResponse, LoginRequest, RefreshRequest, RegisterRequest},
    user::UserView,
};
use axum::{Extension, Json, body::Bytes, extract::State, http::StatusCode};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use engine::{EngineError, NewUser, User};

use crate::{
    ServerError,
    extract::ApiJson,
    server::{CurrentUser, ServerState},
    token, views,
};

const MIN_PASSWORD_CHARS: usize = 8;

type AuthReply = (StatusCode, CookieJar, Json<Envelope<AuthResponse>>);

/// Issue an access token and a stored refresh token for `user`.
async fn open_session(
    state: &ServerState,
    jar: CookieJar,
    user: &User,
    status: StatusCode,
) -> Result<AuthReply, ServerError> {
    let now = Utc::now();
    let user_id = user.id.to_string();
    let access_token = token::issue_access_token(&user_id, &user.email, &state.auth, now)?;
    let refresh_token = token::new_refresh_token();
    state
        .engine
        .store_refresh_token(&user_id, &refresh_token, now + state.auth.refresh_token_ttl)
        .await?;

    let jar = jar.add(token::refresh_cookie(refresh_token.clone(), &state.auth));
    Ok((
        status,
        jar,
        Json(Envelope::ok(AuthResponse {
            user: views::user_view(user),
            access_token,
            refresh_token,
        })),
    ))
}

/// Refresh token from the cookie, falling back to the JSON body.
fn presented_refresh_token(jar: &CookieJar, body: &Bytes) -> Result<Option<String>, ServerError> {
    if let Some(cookie) = jar.get(token::REFRESH_COOKIE) {
        return Ok(Some(cookie.value().to_string()));
    }
    if body.is_empty() {
        return Ok(None);
    }
    let request: RefreshRequest = serde_json::from_slice(body)
        .map_err(|err| ServerError::Generic(format!("invalid request body: {err}")))?;
    Ok(request.refresh_token.filter(|token| !token.is_empty()))
}

pub async fn register(
    State(state): State<ServerState>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Result<AuthReply, ServerError> {
    if payload.password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(EngineError::InvalidField(format!(
            "password must be at least {MIN_PASSWORD_CHARS} characters"
        ))
        .into());
    }
    let password_hash = token::hash_password(&payload.password)?;
    let user = state
        .engine
        .new_user(&NewUser {
            email: payload.email,
            password_hash,
            name: payload.name,
        })
        .await?;
    tracing::info!(user_id = %user.id, "user registered");

    open_session(&state, jar, &user, StatusCode::CREATED).await
}

pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Result<AuthReply, ServerError> {
    let invalid = || ServerError::Unauthorized("invalid email or password".to_string());
    let user = state
        .engine
        .user_by_email(&payload.email)
        .await?
        .ok_or_else(invalid)?;
    if !token::verify_password(&payload.password, &user.password_hash) {
        return Err(invalid());
    }

    open_session(&state, jar, &user, StatusCode::OK).await
}

/// Rotate the refresh token and issue a new access token.
pub async fn refresh(
    State(state): State<ServerState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<AuthReply, ServerError> {
    let Some(old) = presented_refresh_token(&jar, &body)? else {
        return Err(ServerError::Unauthorized(
            "refresh token required".to_string(),
        ));
    };

    let now = Utc::now();
    let new = token::new_refresh_token();
    let user_id = state
        .engine
        .rotate_refresh_token(&old, &new, now + state.auth.refresh_token_ttl, now)
        .await?;
    let user = state.engine.user(&user_id).await?;
    let access_token = token::issue_access_token(&user_id, &user.email, &state.auth, now)?;

    let jar = jar.add(token::refresh_cookie(new.clone(), &state.auth));
    Ok((
        StatusCode::OK,
        jar,
        Json(Envelope::ok(AuthResponse {
            user: views::user_view(&user),
            access_token,
            refresh_token: new,
        })),
    ))
}

pub async fn logout(
    State(state): State<ServerState>,
    jar: CookieJar,
    body: Bytes,
) -> Result<(StatusCode, CookieJar, Json<Envelope<Message>>), ServerError> {
    if let Some(token) = presented_refresh_token(&jar, &body)? {
        state.engine.revoke_refresh_token(&token).await?;
    }
    let jar = jar.remove(token::cleared_refresh_cookie());
    Ok((
        StatusCode::OK,
        jar,
        Json(Envelope::ok(Message {
            message: "logged out".to_string(),
        })),
    ))
}

pub async fn me(
    Extension(current): Extension<CurrentUser>,
) -> Result<(StatusCode, Json<Envelope<UserView>>), ServerError> {
    Ok((
        StatusCode::OK,
        Json(Envelope::ok(views::user_view(&current.user))),
    ))
}
