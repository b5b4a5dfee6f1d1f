use shared_types::{AppError, Family};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

pub async fn create(
    pool: &Pool<Postgres>,
    name: &str,
    family_office_id: Uuid,
) -> Result<Family, AppError> {
    sqlx::query_as::<_, Family>(
        r#"
        INSERT INTO families (id, name, family_office_id)
        VALUES ($1, $2, $3)
        RETURNING id, name, family_office_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(family_office_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Family>, AppError> {
    sqlx::query_as::<_, Family>(
        "SELECT id, name, family_office_id, created_at FROM families WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_name(
    pool: &Pool<Postgres>,
    family_office_id: Uuid,
    name: &str,
) -> Result<Option<Family>, AppError> {
    sqlx::query_as::<_, Family>(
        r#"
        SELECT id, name, family_office_id, created_at
        FROM families
        WHERE family_office_id = $1 AND name = $2
        ORDER BY created_at
        LIMIT 1
        "#,
    )
    .bind(family_office_id)
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list_all(pool: &Pool<Postgres>) -> Result<Vec<Family>, AppError> {
    sqlx::query_as::<_, Family>(
        "SELECT id, name, family_office_id, created_at FROM families ORDER BY created_at",
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list_by_office(
    pool: &Pool<Postgres>,
    family_office_id: Uuid,
) -> Result<Vec<Family>, AppError> {
    sqlx::query_as::<_, Family>(
        r#"
        SELECT id, name, family_office_id, created_at
        FROM families
        WHERE family_office_id = $1
        ORDER BY created_at
        "#,
    )
    .bind(family_office_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Whether an advisor has met with, or messaged within, a family.
pub async fn advisor_is_engaged(
    pool: &Pool<Postgres>,
    advisor_id: Uuid,
    family_id: Uuid,
) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
                   SELECT 1 FROM meetings WHERE advisor_id = $1 AND family_id = $2
               )
            OR EXISTS(
                   SELECT 1 FROM messages
                   WHERE family_id = $2 AND (sender_id = $1 OR recipient_id = $1)
               )
        "#,
    )
    .bind(advisor_id)
    .bind(family_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
