use shared_types::{AppError, FamilyOffice};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

pub async fn create(
    pool: &Pool<Postgres>,
    name: &str,
    description: Option<&str>,
) -> Result<FamilyOffice, AppError> {
    sqlx::query_as::<_, FamilyOffice>(
        r#"
        INSERT INTO family_offices (id, name, description)
        VALUES ($1, $2, $3)
        RETURNING id, name, description, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<FamilyOffice>, AppError> {
    sqlx::query_as::<_, FamilyOffice>(
        "SELECT id, name, description, created_at FROM family_offices WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_by_name(pool: &Pool<Postgres>, name: &str) -> Result<Option<FamilyOffice>, AppError> {
    sqlx::query_as::<_, FamilyOffice>(
        r#"
        SELECT id, name, description, created_at
        FROM family_offices
        WHERE name = $1
        ORDER BY created_at
        LIMIT 1
        "#,
    )
    .bind(name)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn list_all(pool: &Pool<Postgres>) -> Result<Vec<FamilyOffice>, AppError> {
    sqlx::query_as::<_, FamilyOffice>(
        "SELECT id, name, description, created_at FROM family_offices ORDER BY created_at",
    )
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
