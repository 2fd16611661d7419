/// Integration tests for the Goalsetter API
///
/// These tests drive the full router in-process:
/// - Registration and login
/// - The session middleware and its failure messages
/// - Goal CRUD and ownership checks
/// - Method fallback and response headers

mod common;

use axum::http::{Method, StatusCode};
use common::{TestContext, TEST_PASSWORD};
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await.unwrap();

    let res = ctx.send(Method::GET, "/health", None, None).await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["status"], "healthy");
    assert_eq!(res.body["users"], 1);
    assert_eq!(res.body["goals"], 0);
}

#[tokio::test]
async fn test_register_then_me() {
    let ctx = TestContext::new().await.unwrap();

    let res = ctx
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "name": "Ada", "email": "ada@example.com", "password": "pw123456" })),
        )
        .await;

    assert_eq!(res.status, StatusCode::CREATED);
    assert_eq!(res.body["name"], "Ada");
    assert_eq!(res.body["email"], "ada@example.com");
    assert!(res.body.get("password").is_none());
    assert!(res.body.get("passwordHash").is_none());

    let id = res.body["_id"].as_str().unwrap().to_string();
    let token = res.body["token"].as_str().unwrap();

    let me = ctx
        .send(Method::GET, "/api/users/me", Some(&format!("Bearer {token}")), None)
        .await;

    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["_id"], id.as_str());
    assert_eq!(me.body["email"], "ada@example.com");
    assert!(me.body["createdAt"].is_string());
    assert!(me.body.get("passwordHash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let ctx = TestContext::new().await.unwrap();

    let res = ctx
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "name": "Copy", "email": ctx.user.email, "password": "pw" })),
        )
        .await;

    assert_eq!(res.status, StatusCode::CONFLICT);
    assert_eq!(ctx.store.users().count(), 1);
}

#[tokio::test]
async fn test_register_validation() {
    let ctx = TestContext::new().await.unwrap();

    let res = ctx
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({ "email": "not-an-email" })),
        )
        .await;

    assert_eq!(res.status, StatusCode::UNPROCESSABLE_ENTITY);
    let fields: Vec<&str> = res.body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "name", "password"]);
}

#[tokio::test]
async fn test_login() {
    let ctx = TestContext::new().await.unwrap();

    let res = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "email": ctx.user.email, "password": TEST_PASSWORD })),
        )
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["_id"], ctx.user.id.as_str());
    assert!(res.body["token"].is_string());

    let wrong = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "email": ctx.user.email, "password": "nope" })),
        )
        .await;
    assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong.body["message"], "Invalid credentials");

    let unknown = ctx
        .send(
            Method::POST,
            "/api/users/login",
            None,
            Some(json!({ "email": "nobody@example.com", "password": TEST_PASSWORD })),
        )
        .await;
    assert_eq!(unknown.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown.body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_session_failures() {
    let ctx = TestContext::new().await.unwrap();

    let missing = ctx.send(Method::GET, "/api/goals", None, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(missing.body["message"], "Not authorized, no token");

    let garbage = ctx
        .send(Method::GET, "/api/goals", Some("Bearer not.a.jwt"), None)
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body["message"], "Not authorized - please log in again");

    let (ghost, token) = ctx.create_user("Ghost").unwrap();
    ctx.store.users().delete(&ghost.id);

    let stale = ctx
        .send(Method::GET, "/api/goals", Some(&format!("Bearer {token}")), None)
        .await;
    assert_eq!(stale.status, StatusCode::UNAUTHORIZED);
    assert_eq!(stale.body["message"], "User not found - please log in again");
}

#[tokio::test]
async fn test_create_and_list_goals() {
    let ctx = TestContext::new().await.unwrap();

    for text in ["first", "second", "third"] {
        let res = ctx
            .send_authed(Method::POST, "/api/goals", Some(json!({ "text": text })))
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
        assert_eq!(res.body["text"], text);
        assert_eq!(res.body["user"], ctx.user.id.as_str());
        assert_eq!(res.body["createdAt"], res.body["updatedAt"]);
    }

    // Someone else's goal must not show up
    let (_, other_token) = ctx.create_user("Other").unwrap();
    ctx.send(
        Method::POST,
        "/api/goals",
        Some(&format!("Bearer {other_token}")),
        Some(json!({ "text": "not yours" })),
    )
    .await;

    let res = ctx.send_authed(Method::GET, "/api/goals", None).await;
    assert_eq!(res.status, StatusCode::OK);

    let texts: Vec<&str> = res.body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["text"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_create_goal_requires_text() {
    let ctx = TestContext::new().await.unwrap();

    for body in [json!({}), json!({ "text": "" })] {
        let res = ctx.send_authed(Method::POST, "/api/goals", Some(body)).await;
        assert_eq!(res.status, StatusCode::BAD_REQUEST);
        assert_eq!(res.body["message"], "Please add a text field");
    }

    assert_eq!(ctx.store.goals().count(), 0);

    // Whitespace is still text
    let spaces = ctx
        .send_authed(Method::POST, "/api/goals", Some(json!({ "text": "   " })))
        .await;
    assert_eq!(spaces.status, StatusCode::CREATED);
    assert_eq!(spaces.body["text"], "   ");
    assert_eq!(ctx.store.goals().count(), 1);
}

#[tokio::test]
async fn test_update_goal_ownership() {
    let ctx = TestContext::new().await.unwrap();

    let created = ctx
        .send_authed(Method::POST, "/api/goals", Some(json!({ "text": "draft" })))
        .await;
    let id = created.body["_id"].as_str().unwrap().to_string();
    let uri = format!("/api/goals/{id}");

    let res = ctx
        .send_authed(Method::PUT, &uri, Some(json!({ "text": "final" })))
        .await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Goal updated successfully");
    assert_eq!(res.body["goal"]["text"], "final");
    assert_eq!(res.body["goal"]["createdAt"], created.body["createdAt"]);
    assert_ne!(res.body["goal"]["updatedAt"], created.body["updatedAt"]);

    let (_, other_token) = ctx.create_user("Intruder").unwrap();
    let forbidden = ctx
        .send(
            Method::PUT,
            &uri,
            Some(&format!("Bearer {other_token}")),
            Some(json!({ "text": "hijacked" })),
        )
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.body["message"], "User not authorized");
    assert_eq!(ctx.store.get_goal(&id).unwrap().text, "final");

    let missing = ctx
        .send_authed(Method::PUT, "/api/goals/missing", Some(json!({ "text": "x" })))
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["message"], "Goal not found");
}

#[tokio::test]
async fn test_update_goal_without_body() {
    let ctx = TestContext::new().await.unwrap();

    let created = ctx
        .send_authed(Method::POST, "/api/goals", Some(json!({ "text": "keep me" })))
        .await;
    let id = created.body["_id"].as_str().unwrap().to_string();

    let res = ctx
        .send_authed(Method::PUT, &format!("/api/goals/{id}"), None)
        .await;

    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Goal updated successfully");
    assert_eq!(res.body["goal"]["text"], "keep me");
    assert_ne!(res.body["goal"]["updatedAt"], created.body["updatedAt"]);
    assert_eq!(ctx.store.get_goal(&id).unwrap().text, "keep me");
}

#[tokio::test]
async fn test_delete_goal() {
    let ctx = TestContext::new().await.unwrap();

    let created = ctx
        .send_authed(Method::POST, "/api/goals", Some(json!({ "text": "done soon" })))
        .await;
    let id = created.body["_id"].as_str().unwrap().to_string();
    let uri = format!("/api/goals/{id}");

    let (_, other_token) = ctx.create_user("Intruder").unwrap();
    let forbidden = ctx
        .send(Method::DELETE, &uri, Some(&format!("Bearer {other_token}")), None)
        .await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let res = ctx.send_authed(Method::DELETE, &uri, None).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["message"], "Goal deleted successfully");
    assert_eq!(res.body["id"], id.as_str());

    let again = ctx.send_authed(Method::DELETE, &uri, None).await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_method_not_allowed_needs_no_token() {
    let ctx = TestContext::new().await.unwrap();

    let res = ctx.send(Method::PATCH, "/api/goals", None, None).await;

    assert_eq!(res.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.body["message"], "Method not allowed");
}

#[tokio::test]
async fn test_security_headers() {
    let ctx = TestContext::new().await.unwrap();

    let res = ctx.send(Method::GET, "/health", None, None).await;

    assert_eq!(res.headers["x-content-type-options"], "nosniff");
    assert_eq!(res.headers["x-frame-options"], "DENY");
}
