use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use shared_types::DocumentDownload;

use crate::common;

const PDF: &[u8] = b"%PDF-1.4 quarterly statement";

#[tokio::test]
async fn upload_list_and_download_round_trip() {
    let Some(app) = common::test_app().await else { return };
    let token = common::admin_token(&app.router).await;
    let family_id = app.demo.family_id.to_string();

    let (status, doc) = common::post_multipart(
        &app.router,
        "/api/documents/upload",
        &[
            ("file", Some("Q2 Statement.pdf"), PDF),
            ("family_id", None, family_id.as_bytes()),
            ("document_type", None, b"report"),
            ("description", None, b"  Second quarter  "),
            ("tags", None, b"quarterly, 2024 ,"),
        ],
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{doc}");
    assert_eq!(doc["original_filename"], "Q2 Statement.pdf");
    assert_eq!(doc["document_type"], "report");
    assert_eq!(doc["description"], "Second quarter");
    assert_eq!(doc["tags"], serde_json::json!(["quarterly", "2024"]));
    assert_eq!(doc["file_size"], PDF.len() as i64);
    assert_ne!(doc["filename"], doc["original_filename"]);

    let (status, list) = common::get(&app.router, "/api/documents", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let id = doc["id"].as_str().unwrap();
    let (status, body) =
        common::get(&app.router, &format!("/api/documents/{id}/download"), Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    let download: DocumentDownload = serde_json::from_value(body).unwrap();
    let file = download.decode().unwrap();
    assert_eq!(file.filename, "Q2 Statement.pdf");
    assert_eq!(file.content_type, "application/pdf");
    assert_eq!(file.bytes, PDF.to_vec());
}

#[tokio::test]
async fn upload_without_family_is_rejected() {
    let Some(app) = common::test_app().await else { return };
    let token = common::admin_token(&app.router).await;

    let (status, body) = common::post_multipart(
        &app.router,
        "/api/documents/upload",
        &[("file", Some("orphan.pdf"), PDF)],
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Family ID is required");
}

#[tokio::test]
async fn upload_without_file_is_rejected() {
    let Some(app) = common::test_app().await else { return };
    let token = common::admin_token(&app.router).await;
    let family_id = app.demo.family_id.to_string();

    let (status, _) = common::post_multipart(
        &app.router,
        "/api/documents/upload",
        &[("family_id", None, family_id.as_bytes())],
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn member_cannot_upload_to_other_family() {
    let Some(app) = common::test_app().await else { return };
    let admin = common::admin_token(&app.router).await;
    let body = serde_json::json!({
        "name": "Private Family",
        "family_office_id": app.demo.family_office_id,
    })
    .to_string();
    let (_, family) = common::post_json(&app.router, "/api/families", &body, Some(&admin)).await;
    let other_family = family["id"].as_str().unwrap().to_string();

    let member = common::member_token(&app.router).await;
    let (status, _) = common::post_multipart(
        &app.router,
        "/api/documents/upload",
        &[
            ("file", Some("peek.pdf"), PDF),
            ("family_id", None, other_family.as_bytes()),
        ],
        Some(&member),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn member_does_not_see_other_family_documents() {
    let Some(app) = common::test_app().await else { return };
    let admin = common::admin_token(&app.router).await;
    let body = serde_json::json!({
        "name": "Private Family",
        "family_office_id": app.demo.family_office_id,
    })
    .to_string();
    let (_, family) = common::post_json(&app.router, "/api/families", &body, Some(&admin)).await;
    let other_family = family["id"].as_str().unwrap().to_string();

    let (status, doc) = common::post_multipart(
        &app.router,
        "/api/documents/upload",
        &[
            ("file", Some("private.pdf"), PDF),
            ("family_id", None, other_family.as_bytes()),
        ],
        Some(&admin),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let member = common::member_token(&app.router).await;
    let (status, list) = common::get(&app.router, "/api/documents", Some(&member)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());

    let id = doc["id"].as_str().unwrap();
    let (status, _) =
        common::get(&app.router, &format!("/api/documents/{id}/download"), Some(&member)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn unknown_document_is_not_found() {
    let Some(app) = common::test_app().await else { return };
    let token = common::admin_token(&app.router).await;

    let id = uuid::Uuid::new_v4();
    let (status, _) =
        common::get(&app.router, &format!("/api/documents/{id}/download"), Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
