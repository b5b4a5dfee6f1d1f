use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common;

#[tokio::test]
async fn admin_creates_family_in_office() {
    let Some(app) = common::test_app().await else { return };
    let token = common::admin_token(&app.router).await;

    let body = serde_json::json!({
        "name": "Hartley Family",
        "family_office_id": app.demo.family_office_id,
    })
    .to_string();
    let (status, family) =
        common::post_json(&app.router, "/api/families", &body, Some(&token)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(family["name"], "Hartley Family");
    assert_eq!(family["family_office_id"], app.demo.family_office_id.to_string());

    let (status, list) = common::get(&app.router, "/api/families", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn family_in_unknown_office_is_not_found() {
    let Some(app) = common::test_app().await else { return };
    let token = common::admin_token(&app.router).await;

    let body = serde_json::json!({
        "name": "Nowhere Family",
        "family_office_id": uuid::Uuid::new_v4(),
    })
    .to_string();
    let (status, _) = common::post_json(&app.router, "/api/families", &body, Some(&token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn member_cannot_create_family() {
    let Some(app) = common::test_app().await else { return };
    let token = common::member_token(&app.router).await;

    let body = serde_json::json!({
        "name": "Sneaky Family",
        "family_office_id": app.demo.family_office_id,
    })
    .to_string();
    let (status, _) = common::post_json(&app.router, "/api/families", &body, Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn member_lists_only_own_family() {
    let Some(app) = common::test_app().await else { return };
    let admin = common::admin_token(&app.router).await;
    let body = serde_json::json!({
        "name": "Another Family",
        "family_office_id": app.demo.family_office_id,
    })
    .to_string();
    common::post_json(&app.router, "/api/families", &body, Some(&admin)).await;

    let member = common::member_token(&app.router).await;
    let (status, list) = common::get(&app.router, "/api/families", Some(&member)).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], app.demo.family_id.to_string());
}
