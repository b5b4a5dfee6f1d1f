pub mod auth;
pub mod documents;
pub mod families;
pub mod family_offices;
pub mod meetings;
pub mod messages;

use axum::{
    routing::{get, post},
    Router,
};

use crate::db::AppState;

/// Build the portal REST router.
pub fn api_router() -> Router<AppState> {
    Router::new()
        // Auth
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        // Family offices
        .route(
            "/api/family-offices",
            get(family_offices::list_family_offices).post(family_offices::create_family_office),
        )
        // Families
        .route(
            "/api/families",
            get(families::list_families).post(families::create_family),
        )
        // Documents
        .route("/api/documents", get(documents::list_documents))
        .route("/api/documents/upload", post(documents::upload_document))
        .route("/api/documents/{id}/download", get(documents::download_document))
        // Meetings
        .route(
            "/api/meetings",
            get(meetings::list_meetings).post(meetings::create_meeting),
        )
        // Messages
        .route(
            "/api/messages",
            get(messages::list_messages).post(messages::send_message),
        )
}
