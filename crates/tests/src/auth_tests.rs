use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common;

#[tokio::test]
async fn admin_login_returns_bearer_token_and_user() {
    let Some(app) = common::test_app().await else { return };

    let body = r#"{"email":"admin@demo.com","password":"admin123"}"#;
    let (status, response) = common::post_json(&app.router, "/api/auth/login", body, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["token_type"], "bearer");
    assert_eq!(response["user"]["email"], "admin@demo.com");
    assert_eq!(response["user"]["role"], "admin");
    assert!(response["access_token"].as_str().is_some_and(|t| !t.is_empty()));
    assert!(response["expires_in"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn login_email_is_case_insensitive() {
    let Some(app) = common::test_app().await else { return };

    let body = r#"{"email":"Admin@Demo.com","password":"admin123"}"#;
    let (status, _) = common::post_json(&app.router, "/api/auth/login", body, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let Some(app) = common::test_app().await else { return };

    let (status, wrong) = common::post_json(
        &app.router,
        "/api/auth/login",
        r#"{"email":"admin@demo.com","password":"nope"}"#,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, unknown) = common::post_json(
        &app.router,
        "/api/auth/login",
        r#"{"email":"ghost@demo.com","password":"admin123"}"#,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong["message"], "Invalid email or password");
    assert_eq!(wrong["message"], unknown["message"]);
}

#[tokio::test]
async fn me_requires_a_token() {
    let Some(app) = common::test_app().await else { return };

    let (status, body) = common::get(&app.router, "/api/auth/me", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "Unauthorized");

    let (status, _) = common::get(&app.router, "/api/auth/me", Some("garbage")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn me_returns_the_caller() {
    let Some(app) = common::test_app().await else { return };
    let token = common::member_token(&app.router).await;

    let (status, user) = common::get(&app.router, "/api/auth/me", Some(&token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["email"], "member@demo.com");
    assert_eq!(user["role"], "family_member");
    assert_eq!(user["family_id"], app.demo.family_id.to_string());
    assert!(user.get("password_hash").is_none());
}

#[tokio::test]
async fn logout_always_succeeds() {
    let Some(app) = common::test_app().await else { return };

    let (status, _) = common::post_json(&app.router, "/api/auth/logout", "", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn admin_registers_user_in_office() {
    let Some(app) = common::test_app().await else { return };
    let token = common::admin_token(&app.router).await;

    let body = serde_json::json!({
        "email": "advisor@demo.com",
        "password": "advisor123",
        "first_name": "Ada",
        "last_name": "Visor",
        "role": "advisor",
        "family_office_id": app.demo.family_office_id,
    })
    .to_string();
    let (status, response) =
        common::post_json(&app.router, "/api/auth/register", &body, Some(&token)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response["user"]["role"], "advisor");

    let (status, conflict) =
        common::post_json(&app.router, "/api/auth/register", &body, Some(&token)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(conflict["kind"], "Conflict");

    let advisor = common::login(&app.router, "advisor@demo.com", "advisor123").await;
    assert!(!advisor.is_empty());
}

#[tokio::test]
async fn member_cannot_register_users() {
    let Some(app) = common::test_app().await else { return };
    let token = common::member_token(&app.router).await;

    let body = serde_json::json!({
        "email": "intruder@demo.com",
        "password": "intruder123",
        "first_name": "In",
        "last_name": "Truder",
        "role": "admin",
        "family_office_id": app.demo.family_office_id,
    })
    .to_string();
    let (status, _) =
        common::post_json(&app.router, "/api/auth/register", &body, Some(&token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
