use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware, Router,
};
use serde_json::Value;
use server::seed::DemoData;
use sqlx::{Pool, Postgres};
use tokio::sync::{Mutex, MutexGuard};
use tower::ServiceExt;

pub const ADMIN_EMAIL: &str = server::seed::DEMO_ADMIN_EMAIL;
pub const ADMIN_PASSWORD: &str = "admin123";
pub const MEMBER_EMAIL: &str = server::seed::DEMO_MEMBER_EMAIL;
pub const MEMBER_PASSWORD: &str = "member123";

/// Tests share one database, so they take turns.
static TEST_MUTEX: std::sync::LazyLock<Mutex<()>> = std::sync::LazyLock::new(|| Mutex::new(()));

pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Postgres>,
    pub demo: DemoData,
    _guard: MutexGuard<'static, ()>,
}

/// Router over a freshly truncated and seeded database.
///
/// Returns `None` when neither `TEST_DATABASE_URL` nor `DATABASE_URL` is
/// set, so the suite passes on machines without Postgres.
pub async fn test_app() -> Option<TestApp> {
    let guard = TEST_MUTEX.lock().await;

    let _ = dotenvy::dotenv();
    let Ok(database_url) =
        std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL"))
    else {
        eprintln!("skipping: TEST_DATABASE_URL or DATABASE_URL not set");
        return None;
    };
    if std::env::var("JWT_SECRET").is_err() {
        std::env::set_var("JWT_SECRET", "integration-test-secret");
    }
    // The seeded passwords must match the constants above.
    std::env::remove_var("DEMO_ADMIN_PASSWORD");
    std::env::remove_var("DEMO_MEMBER_PASSWORD");

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    server::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    sqlx::query("TRUNCATE messages, meetings, documents, users, families, family_offices CASCADE")
        .execute(&pool)
        .await
        .expect("Failed to truncate");

    let demo = server::seed::seed_demo_data(&pool)
        .await
        .expect("Failed to seed demo data");

    let state = server::db::AppState { pool: pool.clone() };
    let router = server::rest::api_router()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            server::auth::middleware::auth_middleware,
        ))
        .with_state(state);

    Some(TestApp {
        router,
        pool,
        demo,
        _guard: guard,
    })
}

/// Log in and return the bearer token.
pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let body = serde_json::json!({ "email": email, "password": password }).to_string();
    let (status, response) = post_json(app, "/api/auth/login", &body, None).await;
    assert_eq!(status, StatusCode::OK, "login failed: {response}");
    response["access_token"]
        .as_str()
        .expect("access_token in login response")
        .to_string()
}

pub async fn admin_token(app: &Router) -> String {
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

pub async fn member_token(app: &Router) -> String {
    login(app, MEMBER_EMAIL, MEMBER_PASSWORD).await
}

fn authorized(builder: axum::http::request::Builder, token: Option<&str>) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header("authorization", format!("Bearer {token}")),
        None => builder,
    }
}

pub async fn post_json(
    app: &Router,
    uri: &str,
    body: &str,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let req = authorized(Request::builder().method("POST").uri(uri), token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    send(app, req).await
}

pub async fn get(app: &Router, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
    let req = authorized(Request::builder().method("GET").uri(uri), token)
        .body(Body::empty())
        .unwrap();

    send(app, req).await
}

pub const BOUNDARY: &str = "portal-test-boundary";

/// One part of a multipart body: `(name, filename, content)`.
pub type Part<'a> = (&'a str, Option<&'a str>, &'a [u8]);

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/pdf\r\n\r\n"
                    )
                    .as_bytes(),
                );
            }
            None => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(
    app: &Router,
    uri: &str,
    parts: &[Part<'_>],
    token: Option<&str>,
) -> (StatusCode, Value) {
    let req = authorized(Request::builder().method("POST").uri(uri), token)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();

    send(app, req).await
}

/// Send a request through the router and parse the response.
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(req)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if body_bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
    };

    (status, body)
}
