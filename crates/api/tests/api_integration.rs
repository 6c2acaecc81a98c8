//! API integration tests.
//!
//! These tests drive the router end to end over a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::Utc;
use imgarena_api::{auth_middleware, middleware::AppState, router as api_router};
use imgarena_common::{LocalStorage, TokenService};
use imgarena_core::{ComparisonService, IdentityService, MediaService, RatingService};
use imgarena_db::entities::{comparison, rating, user};
use imgarena_db::repositories::{ComparisonRepository, RatingRepository, UserRepository};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

const TEST_SECRET: &str = "test-secret";

fn create_test_state(db: DatabaseConnection) -> AppState {
    let db = Arc::new(db);

    let user_repo = UserRepository::new(Arc::clone(&db));
    let comparison_repo = ComparisonRepository::new(Arc::clone(&db));
    let rating_repo = RatingRepository::new(Arc::clone(&db));

    let storage = Arc::new(LocalStorage::new(
        PathBuf::from("/tmp/imgarena-test-files"),
        "/files".to_string(),
    ));

    AppState {
        identity_service: IdentityService::new(user_repo, TokenService::new(TEST_SECRET, 7)),
        comparison_service: ComparisonService::new(comparison_repo.clone()),
        rating_service: RatingService::new(rating_repo, comparison_repo),
        media_service: MediaService::new(storage),
    }
}

fn app(state: AppState) -> Router {
    api_router()
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
}

fn test_user(id: &str, email: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        email: email.to_string(),
        created_at: Utc::now().into(),
    }
}

fn test_comparison(id: &str) -> comparison::Model {
    comparison::Model {
        id: id.to_string(),
        input_image: "2024/01/01/input.png".to_string(),
        model1_image: "2024/01/01/out1.png".to_string(),
        model2_image: "2024/01/01/out2.png".to_string(),
        prompt: "a red bicycle in the rain".to_string(),
        created_by: "author1".to_string(),
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn test_rating(id: &str, comparison_id: &str, variant: &str, rater_id: &str) -> rating::Model {
    rating::Model {
        id: id.to_string(),
        comparison_id: comparison_id.to_string(),
        variant: variant.to_string(),
        rater_id: rater_id.to_string(),
        stars: serde_json::json!([5, 5, 5, 5, 5, 5]),
        rated_at: Utc::now().into(),
    }
}

fn bearer(user_id: &str, email: &str) -> String {
    let token = TokenService::new(TEST_SECRET, 7)
        .issue(user_id, email)
        .unwrap();
    format!("Bearer {token}")
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_login_creates_user_and_sets_cookie() {
    let created = test_user("user1", "a@example.com");
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<user::Model>::new()])
        .append_query_results([vec![created]])
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection();

    let response = app(create_test_state(db))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email":"a@example.com"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("auth_token="));

    let body = body_json(response).await;
    assert_eq!(body["email"], "a@example.com");
    assert!(body["token"].as_str().unwrap().contains('.'));
}

#[tokio::test]
async fn test_me_with_bearer_token() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![test_user("user1", "a@example.com")]])
        .into_connection();

    let response = app(create_test_state(db))
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header(header::AUTHORIZATION, bearer("user1", "a@example.com"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], "user1");
}

#[tokio::test]
async fn test_me_without_token_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let response = app(create_test_state(db))
        .oneshot(Request::builder().uri("/auth/me").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_submit_without_auth_is_unauthorized() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let response = app(create_test_state(db))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ratings/submit")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"comparisonId":"cmp1","variant":"model1","stars":[5,5,5,5,5,5]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_submit_bad_vector_is_bad_request() {
    // First query authenticates the caller; validation fails before any
    // rating query is issued.
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![test_user("user1", "a@example.com")]])
        .into_connection();

    let response = app(create_test_state(db))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ratings/submit")
                .header(header::AUTHORIZATION, bearer("user1", "a@example.com"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"comparisonId":"cmp1","variant":"model1","stars":[9,9,9]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_submit_unknown_comparison_is_not_found() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![test_user("user1", "a@example.com")]])
        .append_query_results([Vec::<comparison::Model>::new()])
        .into_connection();

    let response = app(create_test_state(db))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ratings/submit")
                .header(header::AUTHORIZATION, bearer("user1", "a@example.com"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"comparisonId":"missing","variant":"model2","stars":[4,0,0,0,0,0]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_submit_happy_path() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![test_user("user1", "a@example.com")]])
        .append_query_results([vec![test_comparison("cmp1")]])
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ])
        .into_connection();

    let response = app(create_test_state(db))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ratings/submit")
                .header(header::AUTHORIZATION, bearer("user1", "a@example.com"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"comparisonId":"cmp1","variant":"model1","stars":[4,4,0,0,0,0]}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn test_bulk_empty_set_returns_empty_mapping() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let response = app(create_test_state(db))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ratings/bulk")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"comparisonIds":[]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body, serde_json::json!({}));
}

#[tokio::test]
async fn test_bulk_anonymous_returns_aggregates_with_null_own() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![test_comparison("cmp1")]])
        .append_query_results([vec![
            test_rating("r1", "cmp1", "model1", "u1"),
            test_rating("r2", "cmp1", "model1", "u2"),
        ]])
        .into_connection();

    let response = app(create_test_state(db))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ratings/bulk")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"comparisonIds":["cmp1"]}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["cmp1"]["own"]["model1"], serde_json::Value::Null);
    assert_eq!(body["cmp1"]["aggregate"]["model1"]["count"], 2);
    assert_eq!(
        body["cmp1"]["aggregate"]["model1"]["stars"],
        serde_json::json!([5.0, 5.0, 5.0, 5.0, 5.0, 5.0])
    );
}

#[tokio::test]
async fn test_average_degrades_to_nulls_on_storage_failure() {
    // No mock results appended: the ratings query fails, but the read path
    // must still answer 200 with empty data.
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let response = app(create_test_state(db))
        .oneshot(
            Request::builder()
                .uri("/ratings/average?comparisonId=cmp1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["model1"], serde_json::Value::Null);
    assert_eq!(body["count"]["model1"], 0);
}

#[tokio::test]
async fn test_own_without_auth_returns_nulls() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let response = app(create_test_state(db))
        .oneshot(
            Request::builder()
                .uri("/ratings/own?comparisonId=cmp1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["model1"], serde_json::Value::Null);
    assert_eq!(body["model2"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_list_comparisons() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![test_comparison("cmp1"), test_comparison("cmp2")]])
        .into_connection();

    let response = app(create_test_state(db))
        .oneshot(
            Request::builder()
                .uri("/comparisons/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_sign_requires_auth() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

    let response = app(create_test_state(db))
        .oneshot(
            Request::builder()
                .uri("/images/sign?key=2024/01/01/a.png")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
