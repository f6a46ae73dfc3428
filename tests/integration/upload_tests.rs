//! Upload integration tests.
//!
//! Tests verify:
//! - Successful uploads land in all three tiers with bounded dimensions
//! - Each validation failure yields its own 400 and writes nothing
//! - Re-uploading overwrites every tier
//! - Decode and write failures surface as 500 without cleanup

use axum::body::Body;
use axum::http::{Request, StatusCode};

use cover_store::Tier;

use super::test_utils::{
    center_pixel, create_test_jpeg, create_test_png, read_json, upload_file, upload_request,
    FaultyStore, MultipartBuilder, TestServer, TEST_TOKEN,
};

// =============================================================================
// Successful Uploads
// =============================================================================

#[tokio::test]
async fn test_png_upload_writes_all_tiers() {
    let server = TestServer::new();
    let png = create_test_png(1600, 1200, [200, 30, 30]);

    let response = server
        .send(upload_file("cover.png", "image/png", &png))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = read_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["file"], "cover.png");

    // Original is byte-for-byte the upload
    let original = std::fs::read(server.path(Tier::Original, "cover.png")).unwrap();
    assert_eq!(original, png);

    assert_eq!(server.dimensions(Tier::Mid, "cover.png"), (768, 576));
    assert_eq!(server.dimensions(Tier::Low, "cover.png"), (384, 288));

    // Variants keep the source format
    let mid = std::fs::read(server.path(Tier::Mid, "cover.png")).unwrap();
    assert_eq!(image::guess_format(&mid).unwrap(), image::ImageFormat::Png);
}

#[tokio::test]
async fn test_portrait_upload_bounded_on_longer_side() {
    let server = TestServer::new();
    let png = create_test_png(600, 1800, [0, 0, 0]);

    let response = server
        .send(upload_file("tall.png", "image/png", &png))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(server.dimensions(Tier::Mid, "tall.png"), (256, 768));
    assert_eq!(server.dimensions(Tier::Low, "tall.png"), (128, 384));
}

#[tokio::test]
async fn test_jpeg_upload_with_jpg_content_type() {
    let server = TestServer::new();
    let jpeg = create_test_jpeg(1000, 1000, [20, 120, 220]);

    let response = server
        .send(upload_file("photo.jpg", "image/jpg", &jpeg))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let (w, h) = server.dimensions(Tier::Mid, "photo.jpg");
    assert!(w <= 768 && h <= 768);
    let (w, h) = server.dimensions(Tier::Low, "photo.jpg");
    assert!(w <= 384 && h <= 384);

    let low = std::fs::read(server.path(Tier::Low, "photo.jpg")).unwrap();
    assert_eq!(image::guess_format(&low).unwrap(), image::ImageFormat::Jpeg);
}

#[tokio::test]
async fn test_small_upload_not_upscaled() {
    let server = TestServer::new();
    let png = create_test_png(200, 100, [1, 2, 3]);

    let response = server
        .send(upload_file("small.png", "image/png", &png))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(server.dimensions(Tier::Mid, "small.png"), (200, 100));
    assert_eq!(server.dimensions(Tier::Low, "small.png"), (200, 100));
}

#[tokio::test]
async fn test_reupload_overwrites_all_tiers() {
    let server = TestServer::new();

    let red = create_test_png(1600, 1200, [255, 0, 0]);
    let response = server.send(upload_file("cover.png", "image/png", &red)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let blue = create_test_png(800, 400, [0, 0, 255]);
    let response = server.send(upload_file("cover.png", "image/png", &blue)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let original = std::fs::read(server.path(Tier::Original, "cover.png")).unwrap();
    assert_eq!(original, blue);

    assert_eq!(server.dimensions(Tier::Mid, "cover.png"), (768, 384));
    assert_eq!(server.dimensions(Tier::Low, "cover.png"), (384, 192));
    for tier in [Tier::Mid, Tier::Low] {
        assert_eq!(center_pixel(&server.path(tier, "cover.png")), [0, 0, 255]);
    }
}

#[tokio::test]
async fn test_non_file_parts_are_skipped() {
    let server = TestServer::new();
    let png = create_test_png(32, 32, [9, 9, 9]);

    let body = MultipartBuilder::new()
        .text("title", b"My Book")
        .file("cover", "book.png", "image/png", &png)
        .build();

    let response = server.send(upload_request(Some(TEST_TOKEN), body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(server.exists(Tier::Low, "book.png"));
}

#[tokio::test]
async fn test_only_first_file_part_is_stored() {
    let server = TestServer::new();

    let body = MultipartBuilder::new()
        .file("file", "first.png", "image/png", &create_test_png(16, 16, [1, 1, 1]))
        .file("file", "second.png", "image/png", &create_test_png(16, 16, [2, 2, 2]))
        .build();

    let response = server.send(upload_request(Some(TEST_TOKEN), body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["file"], "first.png");

    assert!(server.exists(Tier::Original, "first.png"));
    assert!(!server.exists(Tier::Original, "second.png"));
}

// =============================================================================
// Validation Failures
// =============================================================================

#[tokio::test]
async fn test_non_multipart_rejected() {
    let server = TestServer::new();

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header("x-upload-token", TEST_TOKEN)
        .body(Body::from(r#"{"file":"cover.png"}"#))
        .unwrap();

    let response = server.send(request).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Request must be multipart/form-data with a file"
    );
}

#[tokio::test]
async fn test_no_file_part_rejected() {
    let server = TestServer::new();

    let body = MultipartBuilder::new()
        .text("file", b"not really a file")
        .build();

    let response = server.send(upload_request(Some(TEST_TOKEN), body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "No file uploaded");
}

#[tokio::test]
async fn test_empty_multipart_rejected() {
    let server = TestServer::new();

    let response = server
        .send(upload_request(Some(TEST_TOKEN), MultipartBuilder::new().build()))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "No file uploaded");
}

#[tokio::test]
async fn test_file_over_default_cap_rejected() {
    let server = TestServer::new();
    let data = vec![0u8; 10_000_001];

    let response = server
        .send(upload_file("huge.png", "image/png", &data))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await["error"],
        "File too big! Cover should be smaller than 10MB."
    );
    assert_eq!(server.count(Tier::Original), 0);
}

#[tokio::test]
async fn test_file_at_cap_is_not_too_large() {
    let server = TestServer::with_max_file_size(2_000_000);
    let mut png = create_test_png(64, 64, [5, 5, 5]);
    assert!(png.len() < 2_000_000);
    png.resize(2_000_000, 0);

    // Trailing bytes after IEND are ignored by the decoder
    let response = server.send(upload_file("edge.png", "image/png", &png)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_too_large_checked_before_type() {
    let server = TestServer::with_max_file_size(1_000);
    let data = vec![b'a'; 5_000];

    let response = server
        .send(upload_file("notes.txt", "text/plain", &data))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        read_json(response).await["error"],
        "File too big! Cover should be smaller than 1000 bytes."
    );
    assert_eq!(server.count(Tier::Original), 0);
}

#[tokio::test]
async fn test_oversized_body_before_file_rejected() {
    let server = TestServer::with_max_file_size(1_000);

    // Padding field pushes the body past the transport limit
    let body = MultipartBuilder::new()
        .text("padding", &vec![b'x'; 200_000])
        .file("file", "cover.png", "image/png", &create_test_png(8, 8, [0, 0, 0]))
        .build();

    let response = server.send(upload_request(Some(TEST_TOKEN), body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(server.count(Tier::Original), 0);
}

#[tokio::test]
async fn test_declared_type_checked_not_extension() {
    let server = TestServer::new();

    let response = server
        .send(upload_file("cover.png", "text/plain", b"hello, I am text"))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Invalid file type");

    for tier in Tier::ALL {
        assert!(!server.exists(tier, "cover.png"));
    }
}

#[tokio::test]
async fn test_unsupported_image_types_rejected() {
    let server = TestServer::new();
    let png = create_test_png(8, 8, [0, 0, 0]);

    for content_type in ["image/gif", "image/webp", "application/octet-stream"] {
        let response = server
            .send(upload_file("cover.png", content_type, &png))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{}", content_type);
    }
    assert_eq!(server.count(Tier::Original), 0);
}

#[tokio::test]
async fn test_traversal_filename_rejected() {
    let server = TestServer::new();
    let png = create_test_png(8, 8, [0, 0, 0]);

    let response = server
        .send(upload_file("../escape.png", "image/png", &png))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json(response).await["error"], "Invalid file name");

    assert!(!server.store.base().join("escape.png").exists());
    assert_eq!(server.count(Tier::Original), 0);
}

// =============================================================================
// Internal Failures
// =============================================================================

#[tokio::test]
async fn test_corrupt_image_is_server_error() {
    let server = TestServer::new();
    let mut png = create_test_png(64, 64, [0, 0, 0]);
    png.truncate(50);

    let response = server
        .send(upload_file("broken.png", "image/png", &png))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(read_json(response).await["success"], false);

    // The original stays behind, no variants were produced
    assert!(server.exists(Tier::Original, "broken.png"));
    assert!(!server.exists(Tier::Mid, "broken.png"));
    assert!(!server.exists(Tier::Low, "broken.png"));
}

#[tokio::test]
async fn test_non_image_bytes_with_image_type_is_server_error() {
    let server = TestServer::new();

    let response = server
        .send(upload_file("fake.jpg", "image/jpeg", b"definitely not a jpeg"))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_write_failure_leaves_earlier_tiers() {
    let server = TestServer::with_store(|config| config, |fs| {
        FaultyStore::new(fs).fail_write(Tier::Low)
    });
    let png = create_test_png(1000, 500, [7, 7, 7]);

    let response = server.send(upload_file("cover.png", "image/png", &png)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let error = read_json(response).await["error"].as_str().unwrap().to_string();
    assert!(error.starts_with("Failed writing"));
    assert!(error.ends_with("cover.png"));

    assert!(server.exists(Tier::Original, "cover.png"));
    assert!(server.exists(Tier::Mid, "cover.png"));
    assert!(!server.exists(Tier::Low, "cover.png"));
}
