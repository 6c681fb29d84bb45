mod common;

use axum::http::StatusCode;
use common::{create_listing, listing, register, send, spawn_app};
use serde_json::json;

#[tokio::test]
async fn test_register_login_and_me() {
    let app = spawn_app().await;

    let (cookie, id) = register(&app, "jdoe").await;

    let me = send(&app, "GET", "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["id"].as_i64(), Some(id));
    assert_eq!(me.body["data"]["username"], "jdoe");
    assert!(me.body["data"].get("password").is_none());
    assert_eq!(me.body["data"]["savedProperties"], json!([]));

    let logout = send(&app, "POST", "/api/auth/logout", Some(&cookie), None).await;
    assert_eq!(logout.status, StatusCode::OK);

    let after = send(&app, "GET", "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    let login = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "jdoe", "password": "correct-horse" })),
    )
    .await;
    assert_eq!(login.status, StatusCode::OK);
    let cookie = login.cookie.expect("login should set a session cookie");

    let me = send(&app, "GET", "/api/auth/me", Some(&cookie), None).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["data"]["username"], "jdoe");
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = spawn_app().await;
    register(&app, "jdoe").await;

    let response = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "jdoe", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["success"], false);

    let response = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "nobody", "password": "correct-horse" })),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_conflicts_and_validation() {
    let app = spawn_app().await;
    register(&app, "jdoe").await;

    let duplicate = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": "jdoe",
            "password": "another-secret",
            "email": "other@example.com",
            "name": "Other"
        })),
    )
    .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let short = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "username": "shorty",
            "password": "abc",
            "email": "shorty@example.com",
            "name": "Shorty"
        })),
    )
    .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert_eq!(short.body["errors"][0]["field"], "password");

    let missing = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "username": "partial" })),
    )
    .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    let fields: Vec<&str> = missing.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["password", "email", "name"]);
    assert_eq!(missing.body["errors"][0]["kind"], "missing_field");
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = spawn_app().await;

    for (method, uri) in [
        ("GET", "/api/auth/me"),
        ("GET", "/api/appointments"),
        ("GET", "/api/users/me/saved"),
        ("GET", "/api/users/me/properties"),
    ] {
        let response = send(&app, method, uri, None, None).await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }

    let response = send(
        &app,
        "POST",
        "/api/properties",
        None,
        Some(listing("Cottage", "Austin", "250000")),
    )
    .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_and_fetch_property() {
    let app = spawn_app().await;
    let (cookie, user_id) = register(&app, "owner").await;

    let id = create_listing(&app, &cookie, listing("Cottage", "Austin", "250000.50")).await;

    let response = send(&app, "GET", &format!("/api/properties/{id}"), None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["price"], "250000.50");
    assert_eq!(data["bedrooms"], 3);
    assert_eq!(data["yearBuilt"], 1998);
    assert_eq!(data["userId"].as_i64(), Some(user_id));
    assert_eq!(data["status"], "available");
    assert_eq!(data["featured"], false);
    assert_eq!(data["ratingCount"], 0);

    let missing = send(&app, "GET", "/api/properties/9999", None, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let mine = send(&app, "GET", "/api/users/me/properties", Some(&cookie), None).await;
    assert_eq!(mine.status, StatusCode::OK);
    assert_eq!(mine.body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_property_reports_every_bad_field() {
    let app = spawn_app().await;
    let (cookie, _) = register(&app, "owner").await;

    let mut payload = listing("Cottage", "Austin", "cheap");
    payload["bedrooms"] = json!("three");
    payload["listingType"] = json!("lease");

    let response = send(&app, "POST", "/api/properties", Some(&cookie), Some(payload)).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let fields: Vec<&str> = response.body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert!(fields.contains(&"price"));
    assert!(fields.contains(&"bedrooms"));
    assert!(fields.contains(&"listingType"));
}

#[tokio::test]
async fn test_search_filters() {
    let app = spawn_app().await;
    let (cookie, _) = register(&app, "owner").await;

    create_listing(&app, &cookie, listing("Cottage", "Austin", "250000")).await;
    create_listing(&app, &cookie, listing("Loft", "Austin", "450000")).await;
    create_listing(&app, &cookie, listing("Bungalow", "Denver", "300000")).await;
    create_listing(&app, &cookie, listing("Farmhouse", "Springfield", "200000")).await;
    create_listing(&app, &cookie, listing("Duplex", "West Springfield", "200000")).await;

    let all = send(&app, "GET", "/api/properties", None, None).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body["data"].as_array().unwrap().len(), 5);

    let austin = send(&app, "GET", "/api/properties?city=austin", None, None).await;
    assert_eq!(austin.body["data"].as_array().unwrap().len(), 2);

    let springfield = send(&app, "GET", "/api/properties?city=Springfield", None, None).await;
    let data = springfield.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Farmhouse");

    let wildcard = send(&app, "GET", "/api/properties?city=%25", None, None).await;
    assert_eq!(wildcard.status, StatusCode::OK);
    assert!(wildcard.body["data"].as_array().unwrap().is_empty());

    let priced = send(
        &app,
        "GET",
        "/api/properties?city=Austin&minPrice=300000",
        None,
        None,
    )
    .await;
    let data = priced.body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "Loft");

    let empty_bound = send(&app, "GET", "/api/properties?minPrice=&sort=price", None, None).await;
    assert_eq!(empty_bound.status, StatusCode::OK);
    assert_eq!(empty_bound.body["data"].as_array().unwrap().len(), 5);

    let limited = send(&app, "GET", "/api/properties?limit=2", None, None).await;
    assert_eq!(limited.body["data"].as_array().unwrap().len(), 2);

    let bad = send(&app, "GET", "/api/properties?minBeds=lots", None, None).await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad.body["errors"][0]["field"], "minBeds");

    let bad_limit = send(&app, "GET", "/api/properties?limit=0", None, None).await;
    assert_eq!(bad_limit.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_ignores_client_rating_aggregate() {
    let app = spawn_app().await;
    let (cookie, _) = register(&app, "owner").await;

    let mut negative = listing("Cottage", "Austin", "250000");
    negative["avgRating"] = json!("-7");
    negative["ratingCount"] = json!(1000);
    let rejected = send(&app, "POST", "/api/properties", Some(&cookie), Some(negative)).await;
    assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
    assert_eq!(rejected.body["errors"][0]["field"], "avgRating");

    let mut forged = listing("Penthouse", "Austin", "900000");
    forged["avgRating"] = json!("4.9");
    forged["ratingCount"] = json!(1000);
    forged["featured"] = json!(true);
    let created = send(&app, "POST", "/api/properties", Some(&cookie), Some(forged)).await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    let data = &created.body["data"];
    assert_eq!(data["avgRating"], "0");
    assert_eq!(data["ratingCount"], 0);
    assert_eq!(data["featured"], false);

    let featured = send(&app, "GET", "/api/properties/featured", None, None).await;
    assert_eq!(featured.status, StatusCode::OK);
    assert!(featured.body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_status_update_is_owner_only() {
    let app = spawn_app().await;
    let (owner, _) = register(&app, "owner").await;
    let (stranger, _) = register(&app, "stranger").await;

    let id = create_listing(&app, &owner, listing("Cottage", "Austin", "250000")).await;
    let uri = format!("/api/properties/{id}/status");

    let denied = send(&app, "PUT", &uri, Some(&stranger), Some(json!({ "status": "sold" }))).await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let invalid = send(&app, "PUT", &uri, Some(&owner), Some(json!({ "status": "gone" }))).await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.body["errors"][0]["field"], "status");

    let updated = send(&app, "PUT", &uri, Some(&owner), Some(json!({ "status": "sold" }))).await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["data"]["status"], "sold");
}

#[tokio::test]
async fn test_rating_updates_average() {
    let app = spawn_app().await;
    let (owner, _) = register(&app, "owner").await;
    let (alice, _) = register(&app, "alice").await;
    let (bob, _) = register(&app, "bob").await;

    let id = create_listing(&app, &owner, listing("Cottage", "Austin", "250000")).await;
    let uri = format!("/api/properties/{id}/ratings");

    let own = send(&app, "POST", &uri, Some(&owner), Some(json!({ "score": 5 }))).await;
    assert_eq!(own.status, StatusCode::FORBIDDEN);

    let first = send(&app, "POST", &uri, Some(&alice), Some(json!({ "score": 4 }))).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["data"]["avgRating"], "4.00");

    let second = send(&app, "POST", &uri, Some(&bob), Some(json!({ "score": "5" }))).await;
    assert_eq!(second.body["data"]["avgRating"], "4.50");
    assert_eq!(second.body["data"]["ratingCount"], 2);

    let repeat = send(&app, "POST", &uri, Some(&alice), Some(json!({ "score": 1 }))).await;
    assert_eq!(repeat.status, StatusCode::CONFLICT);

    let unchanged = send(&app, "GET", &format!("/api/properties/{id}"), None, None).await;
    assert_eq!(unchanged.body["data"]["avgRating"], "4.50");
    assert_eq!(unchanged.body["data"]["ratingCount"], 2);

    let out_of_range = send(&app, "POST", &uri, Some(&bob), Some(json!({ "score": 6 }))).await;
    assert_eq!(out_of_range.status, StatusCode::BAD_REQUEST);

    let missing = send(
        &app,
        "POST",
        "/api/properties/9999/ratings",
        Some(&alice),
        Some(json!({ "score": 3 })),
    )
    .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
