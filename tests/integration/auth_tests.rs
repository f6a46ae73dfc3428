//! Authentication integration tests.
//!
//! Tests verify:
//! - Missing or wrong tokens are rejected with 401 on both endpoints
//! - Rejected requests never touch the tier directories
//! - The health check stays public

use axum::body::Body;
use axum::http::{Request, StatusCode};

use cover_store::Tier;

use super::test_utils::{
    create_test_png, delete_request, read_json, upload_request, MultipartBuilder, TestServer,
    TEST_TOKEN,
};

fn png_upload() -> super::test_utils::MultipartBody {
    MultipartBuilder::new()
        .file("file", "cover.png", "image/png", &create_test_png(64, 64, [255, 0, 0]))
        .build()
}

fn assert_tiers_empty(server: &TestServer) {
    for tier in Tier::ALL {
        assert_eq!(server.count(tier), 0, "tier {} should be empty", tier);
    }
}

// =============================================================================
// Upload
// =============================================================================

#[tokio::test]
async fn test_upload_without_token_rejected() {
    let server = TestServer::new();

    let response = server.send(upload_request(None, png_upload())).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid token");

    assert_tiers_empty(&server);
}

#[tokio::test]
async fn test_upload_with_wrong_token_rejected() {
    let server = TestServer::new();

    for token in ["wrong", "", "test-upload-token-extra", "TEST-UPLOAD-TOKEN"] {
        let response = server.send(upload_request(Some(token), png_upload())).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "token {:?}", token);
    }

    assert_tiers_empty(&server);
}

#[tokio::test]
async fn test_token_checked_before_body() {
    let server = TestServer::with_max_file_size(100);

    // Oversized and not multipart: the gate still answers first
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "text/plain")
        .body(Body::from(vec![0u8; 10_000]))
        .unwrap();

    let response = server.send(request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_upload_with_valid_token_accepted() {
    let server = TestServer::new();

    let response = server
        .send(upload_request(Some(TEST_TOKEN), png_upload()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// =============================================================================
// Delete
// =============================================================================

#[tokio::test]
async fn test_delete_without_token_rejected() {
    let server = TestServer::new();
    server.put(Tier::Original, "cover.png", b"data");

    let response = server.send(delete_request(None, "cover.png")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(server.exists(Tier::Original, "cover.png"));
}

#[tokio::test]
async fn test_delete_with_wrong_token_leaves_files() {
    let server = TestServer::new();
    for tier in Tier::ALL {
        server.put(tier, "cover.png", b"data");
    }

    let response = server
        .send(delete_request(Some("nope"), "cover.png"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid token");

    for tier in Tier::ALL {
        assert!(server.exists(tier, "cover.png"));
    }
}

#[tokio::test]
async fn test_delete_of_missing_cover_without_token_is_401_not_404() {
    let server = TestServer::new();

    let response = server.send(delete_request(None, "ghost.png")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Public Routes
// =============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let server = TestServer::new();

    let request = Request::builder()
        .uri("/health/live")
        .body(Body::empty())
        .unwrap();

    let response = server.send(request).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");
}
