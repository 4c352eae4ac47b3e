use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;
use server::{AuthConfig, ServerConfig, ServerState, router};

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    let state = ServerState {
        engine: Arc::new(engine),
        auth: Arc::new(AuthConfig {
            jwt_secret: "test-secret".to_string(),
            access_token_ttl: chrono::Duration::minutes(15),
            refresh_token_ttl: chrono::Duration::days(7),
            secure_cookies: false,
        }),
    };
    router(state, &ServerConfig::default()).unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(body) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": email, "password": "correct horse", "name": "Ada" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["access_token"].as_str().unwrap().to_string()
}

async fn create_trip(app: &Router, token: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/trips",
        Some(token),
        Some(json!({ "title": "France", "budget_minor": 100000, "currency": "USD" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

fn train(cost_minor: i64) -> Value {
    json!({
        "type": "train",
        "from": "Paris",
        "to": "Lyon",
        "date": "2026-10-02",
        "departure_time": "08:15",
        "cost_minor": cost_minor,
        "currency": "EUR"
    })
}

#[tokio::test]
async fn health_is_public() {
    let app = app().await;
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_routes_require_a_bearer_token() {
    let app = app().await;

    let (status, body) = send(&app, "GET", "/api/trips", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", "/api/trips", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn register_login_and_me() {
    let app = app().await;
    register(&app, "Ada@Example.com").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "ada@example.com", "password": "another pass" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "wrong password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "correct horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["email"], "ada@example.com");
    assert_eq!(body["data"]["preferences"]["default_currency"], "USD");
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = app().await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "ada@example.com", "password": "short" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn refresh_rotates_the_cookie_token() {
    let app = app().await;
    let (_, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "email": "ada@example.com", "password": "correct horse" })),
    )
    .await;
    let refresh_token = body["data"]["refresh_token"].as_str().unwrap().to_string();

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/refresh")
        .header(header::COOKIE, format!("refreshToken={refresh_token}"))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("refreshToken="));
    assert!(cookie.contains("HttpOnly"));

    // The old token was consumed by the rotation.
    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/refresh",
        None,
        Some(json!({ "refresh_token": refresh_token })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, "POST", "/api/auth/refresh", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn trip_crud() {
    let app = app().await;
    let token = register(&app, "ada@example.com").await;
    let trip_id = create_trip(&app, &token).await;

    let (status, body) = send(
        &app,
        "PATCH",
        &format!("/api/trips/{trip_id}"),
        Some(&token),
        Some(json!({ "title": "France in autumn" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "France in autumn");
    assert_eq!(body["data"]["budget_minor"], 100000);

    let (status, body) = send(&app, "GET", "/api/trips?limit=5", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert_eq!(body["data"]["limit"], 5);
    assert_eq!(body["data"]["total_pages"], 1);

    let (status, _) = send(&app, "GET", "/api/trips?limit=51", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        "GET",
        "/api/trips?page=18446744073709551615",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);

    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/trips/{trip_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/trips/{trip_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transportation_cost_flows_into_the_budget() {
    let app = app().await;
    let token = register(&app, "ada@example.com").await;
    let trip_id = create_trip(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/trips/{trip_id}/transportation"),
        Some(&token),
        Some(train(20_000)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let trip = &body["data"];
    let transport_id = trip["transportation"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(trip["transportation"][0]["departure_time"], "08:15");
    assert_eq!(trip["expenses"].as_array().unwrap().len(), 1);
    assert_eq!(trip["expenses"][0]["linked_id"], transport_id.as_str());
    assert_eq!(trip["expenses"][0]["linked_type"], "transportation");
    assert_eq!(trip["expenses"][0]["category"], "transport");
    assert_eq!(trip["budget"]["total_spent_minor"], 21_600);
    assert_eq!(trip["budget"]["remaining_minor"], 78_400);

    let expense_id = trip["expenses"][0]["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/trips/{trip_id}/expenses/{expense_id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/trips/{trip_id}/transportation/{transport_id}"),
        Some(&token),
        Some(train(0)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["expenses"].as_array().unwrap().is_empty());
    assert_eq!(body["data"]["budget"]["total_spent_minor"], 0);
    assert_eq!(body["data"]["budget"]["remaining_minor"], 100_000);
}

#[tokio::test]
async fn accommodation_and_plain_expenses() {
    let app = app().await;
    let token = register(&app, "ada@example.com").await;
    let trip_id = create_trip(&app, &token).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/trips/{trip_id}/accommodation"),
        Some(&token),
        Some(json!({
            "name": "Hotel Lumiere",
            "city": "Lyon",
            "check_in": "2026-10-02",
            "check_out": "2026-10-05",
            "cost_minor": 30000
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["accommodation"][0]["nights"], 3);
    assert_eq!(body["data"]["expenses"][0]["category"], "accommodation");

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/trips/{trip_id}/expenses"),
        Some(&token),
        Some(json!({
            "description": "Dinner",
            "amount_minor": 4500,
            "category": "food",
            "date": "2026-10-03"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["expenses"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["budget"]["total_spent_minor"], 34_500);
    assert_eq!(body["data"]["budget"]["remaining_minor"], 65_500);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/trips/{trip_id}/expenses"),
        Some(&token),
        Some(json!({
            "description": "Souvenir",
            "amount_minor": -1,
            "category": "other",
            "date": "2026-10-03"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/trips/{trip_id}/expenses"),
        Some(&token),
        Some(json!({
            "description": "Yacht",
            "amount_minor": 10_000_000_000_001_i64,
            "category": "other",
            "date": "2026-10-03"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn whole_trip_put_relinks_transportation() {
    let app = app().await;
    let token = register(&app, "ada@example.com").await;
    let trip_id = create_trip(&app, &token).await;

    let body = json!({
        "title": "France by rail",
        "budget_minor": 100000,
        "currency": "USD",
        "transportation": [train(20_000)]
    });
    let (status, reply) = send(
        &app,
        "PUT",
        &format!("/api/trips/{trip_id}"),
        Some(&token),
        Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let trip = &reply["data"];
    assert_eq!(trip["title"], "France by rail");
    let transport_id = trip["transportation"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(trip["expenses"].as_array().unwrap().len(), 1);
    assert_eq!(trip["expenses"][0]["linked_id"], transport_id.as_str());
    assert_eq!(trip["budget"]["total_spent_minor"], 21_600);

    // Echoing the whole document back keeps ids and a single linked expense.
    let echo = trip.clone();
    let (status, reply) = send(
        &app,
        "PUT",
        &format!("/api/trips/{trip_id}"),
        Some(&token),
        Some(json!({
            "title": echo["title"],
            "budget_minor": echo["budget_minor"],
            "currency": echo["currency"],
            "transportation": echo["transportation"],
            "expenses": echo["expenses"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["data"]["transportation"][0]["id"], transport_id.as_str());
    assert_eq!(reply["data"]["expenses"].as_array().unwrap().len(), 1);
    assert_eq!(reply["data"]["budget"]["total_spent_minor"], 21_600);

    // A header-only PUT leaves the collections alone.
    let (status, reply) = send(
        &app,
        "PUT",
        &format!("/api/trips/{trip_id}"),
        Some(&token),
        Some(json!({ "title": "France", "budget_minor": 100000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply["data"]["transportation"].as_array().unwrap().len(), 1);
    assert_eq!(reply["data"]["expenses"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn foreign_trip_is_not_found() {
    let app = app().await;
    let owner = register(&app, "owner@example.com").await;
    let intruder = register(&app, "intruder@example.com").await;
    let trip_id = create_trip(&app, &owner).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/trips/{trip_id}"),
        Some(&intruder),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/trips/{trip_id}/transportation"),
        Some(&intruder),
        Some(train(20_000)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(&app, "GET", "/api/trips", Some(&intruder), None).await;
    assert_eq!(body["data"]["total"], 0);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/trips/{trip_id}"),
        Some(&owner),
        None,
    )
    .await;
    assert!(body["data"]["transportation"].as_array().unwrap().is_empty());

    // A real element id does not help either.
    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/trips/{trip_id}/transportation"),
        Some(&owner),
        Some(train(20_000)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let before = body["data"].clone();
    let transport_id = before["transportation"][0]["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/trips/{trip_id}/transportation/{transport_id}"),
        Some(&intruder),
        Some(train(1)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "trip not exists");

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/trips/{trip_id}"),
        Some(&intruder),
        Some(json!({ "title": "Mine now", "budget_minor": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/trips/{trip_id}"),
        Some(&owner),
        None,
    )
    .await;
    assert_eq!(body["data"]["title"], before["title"]);
    assert_eq!(body["data"]["transportation"], before["transportation"]);
    assert_eq!(body["data"]["expenses"], before["expenses"]);
}

#[tokio::test]
async fn malformed_requests_use_the_error_envelope() {
    let app = app().await;
    let token = register(&app, "ada@example.com").await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/trips")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, "GET", "/api/trips/not-a-uuid", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, body) = send(&app, "GET", "/api/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn profile_preferences_update() {
    let app = app().await;
    let token = register(&app, "ada@example.com").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/users/me",
        Some(&token),
        Some(json!({ "name": "Ada L.", "preferences": { "default_currency": "eur", "theme": "dark" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Ada L.");
    assert_eq!(body["data"]["preferences"]["default_currency"], "EUR");
    assert_eq!(body["data"]["preferences"]["theme"], "dark");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/users/me",
        Some(&token),
        Some(json!({ "preferences": { "default_currency": "XYZ" } })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}
