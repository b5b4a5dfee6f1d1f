use shared_types::{AppError, Message, SendMessageRequest};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

pub async fn create(
    pool: &Pool<Postgres>,
    sender_id: Uuid,
    req: &SendMessageRequest,
) -> Result<Message, AppError> {
    sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (id, sender_id, recipient_id, family_id, content,
                              message_type, attachment_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, sender_id, recipient_id, family_id, content, message_type,
                  attachment_id, created_at, is_read
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(sender_id)
    .bind(req.recipient_id)
    .bind(req.family_id)
    .bind(req.content.trim())
    .bind(req.message_type)
    .bind(req.attachment_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Messages the user sent or received, oldest first.
///
/// `counterpart` narrows to the conversation with one other user, in both
/// directions.
pub async fn list_for_user(
    pool: &Pool<Postgres>,
    user_id: Uuid,
    family_id: Option<Uuid>,
    counterpart: Option<Uuid>,
) -> Result<Vec<Message>, AppError> {
    sqlx::query_as::<_, Message>(
        r#"
        SELECT id, sender_id, recipient_id, family_id, content, message_type,
               attachment_id, created_at, is_read
        FROM messages
        WHERE (sender_id = $1 OR recipient_id = $1)
          AND ($2::uuid IS NULL OR family_id = $2)
          AND ($3::uuid IS NULL
               OR (sender_id = $1 AND recipient_id = $3)
               OR (sender_id = $3 AND recipient_id = $1))
        ORDER BY created_at, id
        "#,
    )
    .bind(user_id)
    .bind(family_id)
    .bind(counterpart)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
