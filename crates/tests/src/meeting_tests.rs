use axum::http::StatusCode;
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;

use crate::common;

async fn my_id(app: &axum::Router, token: &str) -> String {
    let (_, me) = common::get(app, "/api/auth/me", Some(token)).await;
    me["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn admin_schedules_meeting_for_family() {
    let Some(app) = common::test_app().await else { return };
    let token = common::admin_token(&app.router).await;
    let advisor_id = my_id(&app.router, &token).await;
    let start = Utc::now() + Duration::days(2);

    let body = serde_json::json!({
        "title": "Quarterly Review",
        "description": "Portfolio walkthrough",
        "start_time": start,
        "end_time": start + Duration::hours(1),
        "family_id": app.demo.family_id,
        "advisor_id": advisor_id,
        "meeting_link": "https://meet.example.com/q2",
    })
    .to_string();
    let (status, meeting) =
        common::post_json(&app.router, "/api/meetings", &body, Some(&token)).await;
    assert_eq!(status, StatusCode::CREATED, "{meeting}");
    assert_eq!(meeting["status"], "scheduled");
    assert_eq!(meeting["title"], "Quarterly Review");

    let member = common::member_token(&app.router).await;
    let (status, list) = common::get(&app.router, "/api/meetings", Some(&member)).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], meeting["id"]);
}

#[tokio::test]
async fn meeting_must_end_after_it_starts() {
    let Some(app) = common::test_app().await else { return };
    let token = common::admin_token(&app.router).await;
    let advisor_id = my_id(&app.router, &token).await;
    let start = Utc::now() + Duration::days(1);

    let body = serde_json::json!({
        "title": "Backwards",
        "start_time": start,
        "end_time": start - Duration::minutes(30),
        "family_id": app.demo.family_id,
        "advisor_id": advisor_id,
    })
    .to_string();
    let (status, error) =
        common::post_json(&app.router, "/api/meetings", &body, Some(&token)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["field_errors"]["end_time"], "End time must be after start time");
}

#[tokio::test]
async fn listing_meetings_requires_auth() {
    let Some(app) = common::test_app().await else { return };

    let (status, _) = common::get(&app.router, "/api/meetings", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
