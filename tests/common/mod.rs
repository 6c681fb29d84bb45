#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use homestead::config::Config;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

pub async fn spawn_app() -> Router {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.server.secure_cookies = false;
    config.security.argon2_memory_cost_kib = 8;
    config.security.argon2_time_cost = 1;
    config.security.argon2_parallelism = 1;

    let state = homestead::api::create_app_state_from_config(config, None)
        .await
        .expect("Failed to create app state");
    homestead::api::router(state).await
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub cookie: Option<String>,
}

/// Sends one request. `cookie` is the `name=value` pair of a session.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };

    TestResponse {
        status,
        body,
        cookie,
    }
}

/// Registers `username` and returns its session cookie and user id.
pub async fn register(app: &Router, username: &str) -> (String, i64) {
    let response = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": username,
            "password": "correct-horse",
            "email": format!("{username}@example.com"),
            "name": username,
        })),
    )
    .await;

    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    let cookie = response.cookie.expect("register should set a session cookie");
    let id = response.body["data"]["id"].as_i64().unwrap();
    (cookie, id)
}

pub fn listing(title: &str, city: &str, price: &str) -> Value {
    json!({
        "title": title,
        "description": "Bright and quiet",
        "price": price,
        "address": "1 Main St",
        "city": city,
        "lat": "30.2672",
        "lng": "-97.7431",
        "bedrooms": "3",
        "bathrooms": 2,
        "squareFeet": 1800,
        "yearBuilt": "1998",
        "propertyType": "house",
        "listingType": "buy",
        "imageUrl": "https://images.example.com/house.jpg"
    })
}

/// Creates a listing owned by the session user and returns its id.
pub async fn create_listing(app: &Router, cookie: &str, payload: Value) -> i64 {
    let response = send(app, "POST", "/api/properties", Some(cookie), Some(payload)).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    response.body["data"]["id"].as_i64().unwrap()
}
