use axum::Router;
use shared_types::{
    AppError, AppErrorKind, AuthResponse, CreateFamilyOfficeRequest, CreateFamilyRequest,
    CreateMeetingRequest, Document, DocumentDownload, DocumentType, Family, FamilyOffice,
    LoginRequest, Meeting, MeetingStatus, Message, MessageType, RegisterRequest,
    SendMessageRequest, User, UserRole,
};
use sqlx::{Pool, Postgres};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::db::AppState;
use crate::health;
use crate::rest;

#[derive(OpenApi)]
#[openapi(
    paths(
        // Service
        health::root,
        health::health_check,
        // Auth
        rest::auth::register,
        rest::auth::login,
        rest::auth::me,
        rest::auth::logout,
        // Family offices
        rest::family_offices::create_family_office,
        rest::family_offices::list_family_offices,
        // Families
        rest::families::create_family,
        rest::families::list_families,
        // Documents
        rest::documents::upload_document,
        rest::documents::list_documents,
        rest::documents::download_document,
        // Meetings
        rest::meetings::create_meeting,
        rest::meetings::list_meetings,
        // Messages
        rest::messages::send_message,
        rest::messages::list_messages,
    ),
    components(schemas(
        AppError, AppErrorKind,
        User, UserRole, LoginRequest, RegisterRequest, AuthResponse,
        FamilyOffice, Family, CreateFamilyOfficeRequest, CreateFamilyRequest,
        Document, DocumentType, DocumentDownload,
        Meeting, MeetingStatus, CreateMeetingRequest,
        Message, MessageType, SendMessageRequest,
        health::HealthResponse, health::ServiceInfo,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Login, registration and session endpoints"),
        (name = "family-offices", description = "Family office management"),
        (name = "families", description = "Family management"),
        (name = "documents", description = "Document upload, listing and download"),
        (name = "meetings", description = "Meeting scheduling"),
        (name = "messages", description = "Secure messaging"),
        (name = "health", description = "Service banner and health check")
    ),
    info(
        title = "Family Office Portal API",
        description = "Documents, meetings and messages shared between family offices, advisors and families",
        version = "1.0.0"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Access token from /api/auth/login"))
                        .build(),
                ),
            )
        }
    }
}

/// Build an Axum router that serves the API docs at `/docs`
/// and the REST API at `/api/*`.
pub fn api_router(pool: Pool<Postgres>) -> Router {
    let state = AppState { pool };

    Router::new()
        .merge(rest::api_router())
        .route("/", axum::routing::get(health::root))
        .route("/api/health", axum::routing::get(health::health_check))
        .with_state(state)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
}
