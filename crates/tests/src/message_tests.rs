use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common;

async fn my_id(app: &axum::Router, token: &str) -> String {
    let (_, me) = common::get(app, "/api/auth/me", Some(token)).await;
    me["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn send_and_list_round_trip() {
    let Some(app) = common::test_app().await else { return };
    let admin = common::admin_token(&app.router).await;
    let member = common::member_token(&app.router).await;
    let member_id = my_id(&app.router, &member).await;
    let admin_id = my_id(&app.router, &admin).await;

    let body = serde_json::json!({
        "content": "  Your statements are ready.  ",
        "recipient_id": member_id,
        "family_id": app.demo.family_id,
    })
    .to_string();
    let (status, sent) = common::post_json(&app.router, "/api/messages", &body, Some(&admin)).await;
    assert_eq!(status, StatusCode::CREATED, "{sent}");
    assert_eq!(sent["sender_id"], admin_id);
    assert_eq!(sent["message_type"], "text");
    assert_eq!(sent["is_read"], false);

    let reply = serde_json::json!({
        "content": "Thanks!",
        "recipient_id": admin_id,
        "family_id": app.demo.family_id,
    })
    .to_string();
    let (status, _) = common::post_json(&app.router, "/api/messages", &reply, Some(&member)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, list) = common::get(&app.router, "/api/messages", Some(&member)).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["id"], sent["id"]);
    assert_eq!(list[1]["content"], "Thanks!");
}

#[tokio::test]
async fn blank_message_is_rejected() {
    let Some(app) = common::test_app().await else { return };
    let admin = common::admin_token(&app.router).await;
    let member = common::member_token(&app.router).await;
    let member_id = my_id(&app.router, &member).await;

    let body = serde_json::json!({
        "content": "   ",
        "recipient_id": member_id,
        "family_id": app.demo.family_id,
    })
    .to_string();
    let (status, _) = common::post_json(&app.router, "/api/messages", &body, Some(&admin)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn third_party_does_not_see_conversation() {
    let Some(app) = common::test_app().await else { return };
    let admin = common::admin_token(&app.router).await;
    let member = common::member_token(&app.router).await;
    let member_id = my_id(&app.router, &member).await;

    let body = serde_json::json!({
        "content": "Private note",
        "recipient_id": member_id,
        "family_id": app.demo.family_id,
    })
    .to_string();
    common::post_json(&app.router, "/api/messages", &body, Some(&admin)).await;

    let register = serde_json::json!({
        "email": "cousin@demo.com",
        "password": "cousin123",
        "first_name": "Cou",
        "last_name": "Sin",
        "role": "family_member",
        "family_office_id": app.demo.family_office_id,
        "family_id": app.demo.family_id,
    })
    .to_string();
    let (status, _) =
        common::post_json(&app.router, "/api/auth/register", &register, Some(&admin)).await;
    assert_eq!(status, StatusCode::CREATED);

    let cousin = common::login(&app.router, "cousin@demo.com", "cousin123").await;
    let (status, list) = common::get(&app.router, "/api/messages", Some(&cousin)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(list.as_array().unwrap().is_empty());
}
