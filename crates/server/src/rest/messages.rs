use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, Message, MessageQuery, SendMessageRequest};

use crate::access;
use crate::auth::extractors::AuthRequired;
use crate::error_convert::ValidateRequest;

#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 400, description = "Unknown recipient or family", body = AppError),
        (status = 403, description = "No access to this family", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "messages",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn send_message(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), AppError> {
    body.validate_request()?;
    if body.content.trim().is_empty() {
        return Err(AppError::validation("Message cannot be empty", Default::default()));
    }

    let user = auth.0;
    access::require_family_access(&pool, &user, body.family_id).await?;

    let message = crate::repo::messages::create(&pool, user.id, &body).await?;
    tracing::info!(
        message_id = %message.id,
        recipient_id = %message.recipient_id,
        "message sent"
    );
    Ok((StatusCode::CREATED, Json(message)))
}

#[utoipa::path(
    get,
    path = "/api/messages",
    params(MessageQuery),
    responses(
        (status = 200, description = "Messages sent or received by the caller, oldest first", body = Vec<Message>),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "messages",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn list_messages(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Query(params): Query<MessageQuery>,
) -> Result<Json<Vec<Message>>, AppError> {
    let messages = crate::repo::messages::list_for_user(
        &pool,
        auth.0.id,
        params.family_id,
        params.recipient_id,
    )
    .await?;
    Ok(Json(messages))
}
