mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use collegehub::{api::create_app, config::Settings, domain::*};
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(t: &common::TestContext) -> Router {
    create_app(t.ctx.clone(), Arc::new(Settings::default()))
}

fn request(method: &str, uri: &str, user: Option<&User>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user.id.to_string());
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, body))
}

#[tokio::test]
async fn test_health_is_public() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let (status, body) = send(app(&t), request("GET", "/health", None, None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    Ok(())
}

#[tokio::test]
async fn test_api_requires_known_identity() -> anyhow::Result<()> {
    let t = common::setup().await?;

    let (status, body) = send(app(&t), request("GET", "/api/me", None, None)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");

    let bogus = Request::builder()
        .uri("/api/me")
        .header("x-user-id", "not-a-uuid")
        .body(Body::empty())?;
    let (status, _) = send(app(&t), bogus).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let user = t.user("sam", Role::Student).await?;
    let (status, body) = send(app(&t), request("GET", "/api/me", Some(&user), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "sam");

    Ok(())
}

#[tokio::test]
async fn test_public_signup_creates_student() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let payload = json!({
        "username": "newbie",
        "email": "newbie@college.edu",
        "first_name": "New",
        "last_name": "Bie"
    });

    let (status, body) = send(app(&t), request("POST", "/public/signup", None, Some(payload.clone()))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "student");
    assert_eq!(body["student_id"], "STU0001");

    let mut taken = payload;
    taken["email"] = json!("someone.else@college.edu");
    let (status, body) = send(app(&t), request("POST", "/public/signup", None, Some(taken))).await?;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Username already taken");

    Ok(())
}

#[tokio::test]
async fn test_join_outcomes_over_http() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let user = t.user("sam", Role::Student).await?;
    let club = t.club("Chess", Category::Academic).await?;
    let uri = format!("/api/clubs/{}/join", club.id);

    let (status, body) = send(app(&t), request("POST", &uri, Some(&user), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "requested");
    assert_eq!(body["membership"]["status"], "pending");

    let (status, body) = send(app(&t), request("POST", &uri, Some(&user), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "already_pending");
    assert_eq!(body["message"], "Your membership request is still pending.");

    Ok(())
}

#[tokio::test]
async fn test_denials_and_business_rules_map_to_statuses() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let admin = t.user("ada", Role::Admin).await?;
    let first = t.user("finn", Role::Student).await?;
    let second = t.user("sean", Role::Student).await?;
    let club = t.club("Chess", Category::Academic).await?;
    let event = t.event(&club, &admin, 3, 1).await?;
    let uri = format!("/api/events/{}/register", event.id);

    let (status, body) = send(app(&t), request("POST", &uri, Some(&first), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "registered");

    let (status, body) = send(app(&t), request("POST", &uri, Some(&second), None)).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "This event is full.");

    let (status, _) = send(
        app(&t),
        request("POST", &format!("/api/events/{}/approve", event.id), Some(&admin), None),
    ).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        app(&t),
        request("GET", &format!("/api/events/{}", uuid::Uuid::new_v4()), Some(&first), None),
    ).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_admin_routes_reject_non_admins() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let admin = t.user("ada", Role::Admin).await?;
    let student = t.user("sam", Role::Student).await?;
    let payload = json!({
        "username": "prof",
        "email": "prof@college.edu",
        "first_name": "Pat",
        "last_name": "Prof",
        "role": "faculty"
    });

    let (status, _) = send(app(&t), request("POST", "/admin/users", Some(&student), Some(payload.clone()))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(app(&t), request("POST", "/admin/users", Some(&admin), Some(payload))).await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "faculty");

    Ok(())
}

#[tokio::test]
async fn test_listing_limits_and_literal_search() -> anyhow::Result<()> {
    let t = common::setup().await?;
    let admin = t.user("ada", Role::Admin).await?;
    let robotics = t.club("Robotics", Category::Technical).await?;
    t.club("Chess", Category::Academic).await?;
    t.event(&robotics, &admin, 1, 0).await?;
    t.event(&robotics, &admin, 2, 0).await?;

    let (status, body) = send(app(&t), request("GET", "/api/events?limit=-1", Some(&admin), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, body) = send(app(&t), request("GET", "/api/clubs/popular?limit=0", Some(&admin), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (_, body) = send(app(&t), request("GET", "/api/events?limit=100000", Some(&admin), None)).await?;
    assert_eq!(body.as_array().map(Vec::len), Some(2));

    // A bare wildcard is searched for literally.
    let (status, body) = send(app(&t), request("GET", "/api/clubs?q=%25", Some(&admin), None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(0));

    let (_, body) = send(app(&t), request("GET", "/api/clubs?q=bot", Some(&admin), None)).await?;
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    Ok(())
}
