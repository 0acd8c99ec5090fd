//! Handler tests for the developers domain
//!
//! These exercise the HTTP surface through the router: request
//! deserialization, the bearer-token gate, ownership checks, envelope
//! shapes and status codes. Everything runs against the in-memory
//! repository with a tempdir photo store.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum_helpers::{JwtAuth, JwtConfig};
use domain_developers::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

struct TestApp {
    app: Router,
    service: DeveloperService<InMemoryDeveloperRepository>,
    jwt: JwtAuth,
    _uploads: tempfile::TempDir,
}

fn test_app() -> TestApp {
    let uploads = tempfile::tempdir().unwrap();
    let service = DeveloperService::new(
        Arc::new(InMemoryDeveloperRepository::new()),
        Arc::new(LocalDiskPhotoStore::new(uploads.path())),
    );
    let jwt = JwtAuth::new(&JwtConfig::new(TEST_SECRET));
    let app = handlers::router(service.clone(), jwt.clone());
    TestApp {
        app,
        service,
        jwt,
        _uploads: uploads,
    }
}

fn token_for(jwt: &JwtAuth, id: Uuid) -> String {
    jwt.issue_token(id, "caller@example.com", "Caller").unwrap()
}

async fn json_body(body: Body) -> Value {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn developer_payload(name: &str, email: &str) -> Value {
    json!({
        "name": name,
        "email": email,
        "role": "Frontend",
        "techStack": ["React", "TypeScript"],
        "experience": 3.5,
        "description": "Builds accessible interfaces.",
    })
}

fn post_json(uri: &str, token: &str, payload: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(serde_json::to_string(payload).unwrap()))
        .unwrap()
}

#[tokio::test]
async fn test_create_developer_returns_201_envelope() {
    let t = test_app();
    let token = token_for(&t.jwt, Uuid::new_v4());

    let response = t
        .app
        .oneshot(post_json(
            "/",
            &token,
            &developer_payload("Alice", "alice@example.com"),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["message"], json!("Developer created successfully"));
    assert_eq!(body["data"]["name"], json!("Alice"));
    assert_eq!(body["data"]["role"], json!("Frontend"));
    assert!(body["data"]["id"].is_string());
}

#[tokio::test]
async fn test_requests_without_token_are_rejected() {
    let t = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .body(Body::empty())
        .unwrap();
    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("No token provided. Please login."));
}

#[tokio::test]
async fn test_expired_token_gets_distinct_message() {
    let t = test_app();
    let token = t
        .jwt
        .issue_token_with_ttl(Uuid::new_v4(), "caller@example.com", "Caller", -60)
        .unwrap();

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response.into_body()).await;
    assert_eq!(
        body["message"],
        json!("Token has expired. Please login again.")
    );
}

#[tokio::test]
async fn test_garbage_token_is_invalid() {
    let t = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/")
        .header("authorization", "Bearer not-a-token")
        .body(Body::empty())
        .unwrap();
    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], json!("Invalid token. Please login again."));
}

#[tokio::test]
async fn test_analytics_is_public() {
    let t = test_app();

    let request = Request::builder()
        .method("GET")
        .uri("/analytics")
        .body(Body::empty())
        .unwrap();
    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["totalDevelopers"], json!(0));
}

#[tokio::test]
async fn test_list_carries_pagination_block() {
    let t = test_app();
    let owner = Uuid::new_v4();
    for i in 0..12 {
        t.service
            .create_developer(
                serde_json::from_value(developer_payload(
                    &format!("Dev {i}"),
                    &format!("dev{i}@example.com"),
                ))
                .unwrap(),
                owner,
            )
            .await
            .unwrap();
    }

    let token = token_for(&t.jwt, owner);
    let request = Request::builder()
        .method("GET")
        .uri("/?page=2&limit=10")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["pagination"]["total"], json!(12));
    assert_eq!(body["pagination"]["page"], json!(2));
    assert_eq!(body["pagination"]["pages"], json!(2));
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_list_filters_by_role_and_sorts() {
    let t = test_app();
    let owner = Uuid::new_v4();
    let records = [
        ("Alice", "Frontend", 2.0),
        ("Bob", "Backend", 5.0),
        ("Cara", "Frontend", 1.0),
    ];
    for (name, role, experience) in records {
        let mut payload = developer_payload(name, &format!("{}@example.com", name.to_lowercase()));
        payload["role"] = json!(role);
        payload["experience"] = json!(experience);
        t.service
            .create_developer(serde_json::from_value(payload).unwrap(), owner)
            .await
            .unwrap();
    }

    let token = token_for(&t.jwt, owner);
    let request = Request::builder()
        .method("GET")
        .uri("/?role=Frontend&sortBy=experience-desc")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = t.app.oneshot(request).await.unwrap();

    let body = json_body(response.into_body()).await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Alice", "Cara"]);
    assert_eq!(body["pagination"]["total"], json!(2));
}

#[tokio::test]
async fn test_update_by_non_owner_returns_403() {
    let t = test_app();
    let owner = Uuid::new_v4();
    let created = t
        .service
        .create_developer(
            serde_json::from_value(developer_payload("Alice", "alice@example.com")).unwrap(),
            owner,
        )
        .await
        .unwrap();

    let intruder_token = token_for(&t.jwt, Uuid::new_v4());
    let request = Request::builder()
        .method("PUT")
        .uri(format!("/{}", created.id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {intruder_token}"))
        .body(Body::from(
            serde_json::to_string(&developer_payload("Mallory", "alice@example.com")).unwrap(),
        ))
        .unwrap();
    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = json_body(response.into_body()).await;
    assert_eq!(
        body["message"],
        json!("You do not have permission to update this developer")
    );

    // Record is unchanged
    let unchanged = t.service.get_developer(created.id).await.unwrap();
    assert_eq!(unchanged.name, "Alice");
}

#[tokio::test]
async fn test_delete_by_owner_succeeds() {
    let t = test_app();
    let owner = Uuid::new_v4();
    let created = t
        .service
        .create_developer(
            serde_json::from_value(developer_payload("Alice", "alice@example.com")).unwrap(),
            owner,
        )
        .await
        .unwrap();

    let token = token_for(&t.jwt, owner);
    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/{}", created.id))
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], json!("Developer deleted successfully"));

    assert!(t.service.get_developer(created.id).await.is_err());
}

#[tokio::test]
async fn test_duplicate_email_returns_409() {
    let t = test_app();
    let token = token_for(&t.jwt, Uuid::new_v4());

    let first = t
        .app
        .clone()
        .oneshot(post_json(
            "/",
            &token,
            &developer_payload("Alice", "alice@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = t
        .app
        .oneshot(post_json(
            "/",
            &token,
            &developer_payload("Other Alice", "alice@example.com"),
        ))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = json_body(second.into_body()).await;
    assert_eq!(body["error"], json!("CONFLICT"));
}

#[tokio::test]
async fn test_validation_failure_returns_400_with_details() {
    let t = test_app();
    let token = token_for(&t.jwt, Uuid::new_v4());

    let mut payload = developer_payload("A", "not-an-email");
    payload["experience"] = json!(120.0);
    let response = t.app.oneshot(post_json("/", &token, &payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_invalid_uuid_in_path_returns_400() {
    let t = test_app();
    let token = token_for(&t.jwt, Uuid::new_v4());

    let request = Request::builder()
        .method("GET")
        .uri("/not-a-uuid")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_missing_developer_returns_404() {
    let t = test_app();
    let token = token_for(&t.jwt, Uuid::new_v4());

    let request = Request::builder()
        .method("GET")
        .uri(format!("/{}", Uuid::new_v4()))
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response.into_body()).await;
    assert_eq!(body["message"], json!("Developer not found"));
}

#[tokio::test]
async fn test_photo_upload_sets_reference() {
    let t = test_app();
    let owner = Uuid::new_v4();
    let created = t
        .service
        .create_developer(
            serde_json::from_value(developer_payload("Alice", "alice@example.com")).unwrap(),
            owner,
        )
        .await
        .unwrap();

    let boundary = "X-HANDLER-TEST-BOUNDARY";
    let multipart_body = format!(
        "--{boundary}\r\ncontent-disposition: form-data; name=\"photo\"; filename=\"avatar.png\"\r\ncontent-type: image/png\r\n\r\nfakepngbytes\r\n--{boundary}--\r\n"
    );

    let token = token_for(&t.jwt, owner);
    let request = Request::builder()
        .method("POST")
        .uri(format!("/{}/photo", created.id))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={boundary}"),
        )
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(multipart_body))
        .unwrap();
    let response = t.app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response.into_body()).await;
    let photo = body["data"]["photo"].as_str().unwrap();
    assert!(photo.starts_with("/uploads/"));
    assert!(photo.ends_with(".png"));
}
