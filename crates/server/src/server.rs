use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderValue, Method, header},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use std::sync::Arc;

use crate::{
    ServerError, accommodation, auth, destinations, expenses, token, transportation, trips, users,
};
use api_types::Health;
use engine::{Engine, EngineError, User};

/// Token settings shared by the auth handlers and the middleware.
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_ttl: chrono::Duration,
    pub refresh_token_ttl: chrono::Duration,
    /// Mark the refresh cookie `Secure`.
    pub secure_cookies: bool,
}

#[derive(Clone, Debug, Default)]
pub struct ServerConfig {
    /// Browser origin allowed to call the API with credentials.
    pub cors_origin: Option<String>,
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub auth: Arc<AuthConfig>,
}

/// The authenticated caller, inserted by the auth middleware.
#[derive(Clone, Debug)]
pub(crate) struct CurrentUser {
    pub id: String,
    pub user: User,
}

async fn require_user(
    State(state): State<ServerState>,
    bearer: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let Ok(TypedHeader(Authorization(bearer))) = bearer else {
        return Err(ServerError::Unauthorized("missing bearer token".to_string()));
    };
    let claims = token::verify_access_token(bearer.token(), &state.auth)?;

    let user = match state.engine.user(&claims.sub).await {
        Ok(user) => user,
        Err(EngineError::KeyNotFound(_)) => {
            return Err(ServerError::Unauthorized("user no longer exists".to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    request.extensions_mut().insert(CurrentUser {
        id: claims.sub,
        user,
    });
    Ok(next.run(request).await)
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
    })
}

async fn not_found() -> ServerError {
    ServerError::Engine(EngineError::KeyNotFound("route not exists".to_string()))
}

fn cors_layer(origin: &str) -> Result<CorsLayer, ServerError> {
    let origin = HeaderValue::from_str(origin)
        .map_err(|_| ServerError::Generic(format!("invalid CORS origin: {origin}")))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]))
}

pub fn router(state: ServerState, config: &ServerConfig) -> Result<Router, ServerError> {
    let protected = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/users/me", get(users::me).put(users::update_me))
        .route("/trips", get(trips::list).post(trips::create))
        .route(
            "/trips/{trip_id}",
            get(trips::get)
                .put(trips::replace)
                .patch(trips::patch)
                .delete(trips::delete),
        )
        .route("/trips/{trip_id}/destinations", post(destinations::create))
        .route(
            "/trips/{trip_id}/destinations/{item_id}",
            put(destinations::update).delete(destinations::delete),
        )
        .route("/trips/{trip_id}/expenses", post(expenses::create))
        .route(
            "/trips/{trip_id}/expenses/{item_id}",
            put(expenses::update).delete(expenses::delete),
        )
        .route(
            "/trips/{trip_id}/transportation",
            post(transportation::create),
        )
        .route(
            "/trips/{trip_id}/transportation/{item_id}",
            put(transportation::update).delete(transportation::delete),
        )
        .route("/trips/{trip_id}/accommodation", post(accommodation::create))
        .route(
            "/trips/{trip_id}/accommodation/{item_id}",
            put(accommodation::update).delete(accommodation::delete),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_user));

    let public = Router::new()
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/refresh", post(auth::refresh));

    let mut app = Router::new()
        .route("/health", get(health))
        .nest("/api", public.merge(protected))
        .fallback(not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if let Some(origin) = config.cors_origin.as_deref() {
        app = app.layer(cors_layer(origin)?);
    }
    Ok(app)
}

pub async fn run(
    engine: Engine,
    auth: AuthConfig,
    config: ServerConfig,
    addr: std::net::SocketAddr,
) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_with_listener(engine, auth, config, listener).await
}

pub async fn run_with_listener(
    engine: Engine,
    auth: AuthConfig,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;

    let state = ServerState {
        engine: Arc::new(engine),
        auth: Arc::new(auth),
    };
    let app = router(state, &config).map_err(|err| {
        std::io::Error::new(std::io::ErrorKind::InvalidInput, format!("{err:?}"))
    })?;

    tracing::info!("Server listening on {}", addr);
    axum::serve(listener, app).await
}

pub fn spawn_with_listener(
    engine: Engine,
    auth: AuthConfig,
    config: ServerConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, auth, config, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
