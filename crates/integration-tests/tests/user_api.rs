//! End-to-end tests for `/api/users` and `/api/login`.

use axum::http::StatusCode;
use domains::TokenService;
use integration_tests::TestApp;
use serde_json::json;

async fn seeded_with_root() -> TestApp {
    let app = TestApp::new();
    app.create_user("root", "sekret").await;
    app
}

fn usernames(users: &[serde_json::Value]) -> Vec<&str> {
    users.iter().filter_map(|u| u["username"].as_str()).collect()
}

#[tokio::test]
async fn fresh_username_can_register() {
    let app = seeded_with_root().await;

    let response = app
        .post(
            "/api/users",
            None,
            json!({ "username": "mluukkai", "name": "Matti Luukkainen", "password": "salainen" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.is_json());
    assert_eq!(response.body["name"], "Matti Luukkainen");
    assert_eq!(response.body["blogs"], json!([]));

    let users = app.users().await;
    assert_eq!(users.len(), 2);
    assert!(usernames(&users).contains(&"mluukkai"));
}

#[tokio::test]
async fn registered_user_can_log_in() {
    let app = seeded_with_root().await;
    let created = app
        .post("/api/users", None, json!({ "username": "xyz", "password": "abcd" }))
        .await;
    assert_eq!(created.status, StatusCode::CREATED);

    let login = app
        .post("/api/login", None, json!({ "username": "xyz", "password": "abcd" }))
        .await;

    assert_eq!(login.status, StatusCode::OK);
    assert_eq!(login.body["username"], "xyz");
    assert_eq!(login.body["id"], created.body["id"]);

    let token = login.body["token"].as_str().unwrap();
    let claims = app.tokens.verify(token).unwrap();
    assert_eq!(claims.username, "xyz");
    assert_eq!(claims.user_id.to_string(), created.body["id"].as_str().unwrap());
}

#[tokio::test]
async fn duplicate_username_is_rejected() {
    let app = seeded_with_root().await;

    let response = app
        .post(
            "/api/users",
            None,
            json!({ "username": "root", "name": "Superuser", "password": "salainen" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.error().contains("expected `username` to be unique"));
    assert_eq!(app.users().await.len(), 1);
}

#[tokio::test]
async fn short_username_is_rejected() {
    let app = seeded_with_root().await;

    let response = app
        .post("/api/users", None, json!({ "username": "ab", "password": "salainen" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.error(),
        "`username` (`ab`) is shorter than the minimum allowed length (3)"
    );
    assert_eq!(app.users().await.len(), 1);
}

#[tokio::test]
async fn missing_username_is_rejected() {
    let app = seeded_with_root().await;

    let response = app
        .post("/api/users", None, json!({ "password": "salainen" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "`username` is required");
    assert_eq!(app.users().await.len(), 1);
}

#[tokio::test]
async fn short_password_is_rejected() {
    let app = seeded_with_root().await;

    let response = app
        .post("/api/users", None, json!({ "username": "shorty", "password": "ab" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "password too short");
    assert_eq!(app.users().await.len(), 1);
}

#[tokio::test]
async fn missing_password_is_rejected() {
    let app = seeded_with_root().await;

    let response = app
        .post("/api/users", None, json!({ "username": "nopass" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "password missing");
    assert_eq!(app.users().await.len(), 1);
}

#[tokio::test]
async fn user_bodies_never_contain_the_hash() {
    let app = seeded_with_root().await;

    for user in app.users().await {
        let object = user.as_object().unwrap();
        assert!(object.keys().all(|k| !k.to_lowercase().contains("hash")));
        assert!(object.get("password").is_none());
    }
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let app = seeded_with_root().await;

    let response = app
        .post("/api/login", None, json!({ "username": "root", "password": "wrong" }))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "invalid username or password");
    assert!(response.body.get("token").is_none());
}

#[tokio::test]
async fn unknown_user_cannot_log_in() {
    let app = seeded_with_root().await;

    let response = app
        .post("/api/login", None, json!({ "username": "ghost", "password": "sekret" }))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "invalid username or password");
}

#[tokio::test]
async fn login_requires_both_fields() {
    let app = seeded_with_root().await;

    let response = app
        .post("/api/login", None, json!({ "username": "root" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.error(), "username and password are required");
}

#[tokio::test]
async fn token_of_deleted_identity_is_rejected() {
    // A token signed with the right secret for a user this store never saw.
    let app = seeded_with_root().await;
    let stranger = domains::UserId::generate();
    let token = app.tokens.issue(stranger, "stranger").unwrap();

    let response = app
        .post(
            "/api/blogs",
            Some(&token),
            json!({ "title": "Orphan", "url": "https://example.com" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.error(), "token invalid");
}
