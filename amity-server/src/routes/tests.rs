use amity_core::AmityCore;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use super::*;
use crate::auth::TokenIssuer;

fn app() -> Router {
    let core = AmityCore::open_in_memory().unwrap();
    router(AppState::new(core, TokenIssuer::new_dev(3600)), None, false)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

/// Registers a user and returns (token, id).
async fn register(app: &Router, name: &str) -> (String, i64) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": name,
            "username": name.to_lowercase(),
            "password": "password123",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    (
        body["token"].as_str().unwrap().to_string(),
        body["user"]["id"].as_i64().unwrap(),
    )
}

#[tokio::test]
async fn health_is_ok() {
    let app = app();
    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn login_with_registered_credentials() {
    let app = app();
    register(&app, "Alice").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["username"], "alice");
    assert!(body["user"].get("passwordHash").is_none());

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid username or password");
}

#[tokio::test]
async fn duplicate_username_is_conflict() {
    let app = app();
    register(&app, "Alice").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Other", "username": "ALICE", "password": "password123" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn protected_routes_require_token() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/friends", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", "/api/friends", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app();
    let (token, _) = register(&app, "Alice").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/friends/requests",
        Some(&token),
        Some(json!({ "someoneElse": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Malformed payload"));
}

#[tokio::test]
async fn malformed_path_and_query_are_json_bad_requests() {
    let app = app();
    let (token, _) = register(&app, "Alice").await;

    for (method, uri) in [
        ("GET", "/api/friends/abc/profile"),
        ("GET", "/api/friends/abc/relationship"),
        ("DELETE", "/api/friends/abc"),
        ("GET", "/api/users/abc"),
        ("PUT", "/api/notifications/abc/read"),
        ("GET", "/api/notifications?unread=maybe"),
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{method} {uri}");
        assert_eq!(
            response.headers()["content-type"],
            "application/json",
            "{method} {uri}"
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(
            body["error"].as_str().unwrap().starts_with("Malformed payload"),
            "{method} {uri}: {body}"
        );
    }
}

#[tokio::test]
async fn friend_request_flow() {
    let app = app();
    let (alice_token, alice) = register(&app, "Alice").await;
    let (bob_token, bob) = register(&app, "Bob").await;

    let (status, request) = send(
        &app,
        "POST",
        "/api/friends/requests",
        Some(&alice_token),
        Some(json!({ "recipientId": bob })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(request["status"], "pending");
    let request_id = request["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "POST",
        "/api/friends/requests",
        Some(&bob_token),
        Some(json!({ "recipientId": alice })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, incoming) = send(&app, "GET", "/api/friends/requests", Some(&bob_token), None).await;
    assert_eq!(incoming[0]["id"], request_id);
    assert_eq!(incoming[0]["sender"]["username"], "alice");

    let (_, sent) = send(&app, "GET", "/api/friends/requests/sent", Some(&alice_token), None).await;
    assert_eq!(sent.as_array().unwrap().len(), 1);

    let (_, relationship) = send(
        &app,
        "GET",
        &format!("/api/friends/{bob}/relationship"),
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(relationship["status"], "request_sent");

    let uri = format!("/api/friends/requests/{request_id}");
    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&alice_token),
        Some(json!({ "status": "accepted" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, accepted) = send(
        &app,
        "PUT",
        &uri,
        Some(&bob_token),
        Some(json!({ "status": "accepted" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "accepted");

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&bob_token),
        Some(json!({ "status": "rejected" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, friends) = send(&app, "GET", "/api/friends", Some(&alice_token), None).await;
    assert_eq!(friends[0]["id"], bob);

    let (status, profile) = send(
        &app,
        "GET",
        &format!("/api/friends/{alice}/profile"),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["username"], "alice");
    assert!(profile["interests"].is_array());

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/friends/{alice}"),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/friends/{alice}"),
        Some(&bob_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn self_request_is_bad_request() {
    let app = app();
    let (token, me) = register(&app, "Alice").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/friends/requests",
        Some(&token),
        Some(json!({ "recipientId": me })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn notifications_inbox() {
    let app = app();
    let (alice_token, _) = register(&app, "Alice").await;
    let (bob_token, bob) = register(&app, "Bob").await;

    send(
        &app,
        "POST",
        "/api/friends/requests",
        Some(&alice_token),
        Some(json!({ "recipientId": bob })),
    )
    .await;

    let (_, inbox) = send(&app, "GET", "/api/notifications?unread=true", Some(&bob_token), None).await;
    assert_eq!(inbox.as_array().unwrap().len(), 1);
    assert_eq!(inbox[0]["type"], "friend_request_received");
    let id = inbox[0]["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/notifications/{id}/read"),
        Some(&alice_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "PUT", "/api/notifications/read-all", Some(&bob_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (_, inbox) = send(&app, "GET", "/api/notifications?unread=true", Some(&bob_token), None).await;
    assert!(inbox.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn profile_and_interests() {
    let app = app();
    let (token, _) = register(&app, "Alice").await;

    let (status, user) = send(
        &app,
        "PUT",
        "/api/users/profile",
        Some(&token),
        Some(json!({ "bio": "Climber" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["bio"], "Climber");

    let catalog = json!([{ "category": "Music", "items": [{ "name": "Jazz", "rating": 8 }] }]);
    let (status, stored) = send(&app, "PUT", "/api/interests", Some(&token), Some(catalog.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, catalog);

    let bad = json!([{ "category": "Music", "items": [{ "name": "Jazz", "rating": 11 }] }]);
    let (status, _) = send(&app, "PUT", "/api/interests", Some(&token), Some(bad)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, current) = send(&app, "GET", "/api/interests", Some(&token), None).await;
    assert_eq!(current, catalog);
}

#[tokio::test]
async fn search_excludes_caller() {
    let app = app();
    let (token, _) = register(&app, "Alice").await;
    register(&app, "Alicia").await;

    let (status, found) = send(&app, "GET", "/api/users/search?q=ali", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let usernames: Vec<_> = found
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(usernames, vec!["alicia"]);
}

#[tokio::test]
async fn https_redirect_honors_forwarded_proto() {
    let core = AmityCore::open_in_memory().unwrap();
    let app = router(AppState::new(core, TokenIssuer::new_dev(60)), None, true);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health?x=1")
                .header("host", "amity.example")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(
        response.headers()["location"],
        "https://amity.example/health?x=1"
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("host", "amity.example")
                .header("x-forwarded-proto", "https")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn static_fallback_serves_index() {
    let dir = tempfile::TempDir::new().unwrap();
    std::fs::write(dir.path().join("index.html"), "<html>amity</html>").unwrap();
    let core = AmityCore::open_in_memory().unwrap();
    let app = router(
        AppState::new(core, TokenIssuer::new_dev(60)),
        Some(dir.path()),
        false,
    );

    let response = app
        .oneshot(
            Request::builder()
                .uri("/friends/some/client/route")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"<html>amity</html>");
}
