use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common;

#[tokio::test]
async fn admin_creates_and_lists_offices() {
    let Some(app) = common::test_app().await else { return };
    let token = common::admin_token(&app.router).await;

    let body = r#"{"name":"  North Star Office ","description":"Second office"}"#;
    let (status, office) =
        common::post_json(&app.router, "/api/family-offices", body, Some(&token)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(office["name"], "North Star Office");
    assert_eq!(office["description"], "Second office");

    let (status, list) = common::get(&app.router, "/api/family-offices", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn member_cannot_create_office() {
    let Some(app) = common::test_app().await else { return };
    let token = common::member_token(&app.router).await;

    let (status, body) = common::post_json(
        &app.router,
        "/api/family-offices",
        r#"{"name":"Rogue Office"}"#,
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["kind"], "Forbidden");
}

#[tokio::test]
async fn member_sees_only_own_office() {
    let Some(app) = common::test_app().await else { return };
    let admin = common::admin_token(&app.router).await;
    common::post_json(
        &app.router,
        "/api/family-offices",
        r#"{"name":"Other Office"}"#,
        Some(&admin),
    )
    .await;

    let member = common::member_token(&app.router).await;
    let (status, list) = common::get(&app.router, "/api/family-offices", Some(&member)).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], app.demo.family_office_id.to_string());
}

#[tokio::test]
async fn listing_offices_requires_auth() {
    let Some(app) = common::test_app().await else { return };

    let (status, _) = common::get(&app.router, "/api/family-offices", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
