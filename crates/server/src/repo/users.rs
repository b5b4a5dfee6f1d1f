use shared_types::{AppError, RegisterRequest, User};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// A user row together with its password hash. Only used by login.
#[derive(Debug, sqlx::FromRow)]
pub struct UserCredentials {
    #[sqlx(flatten)]
    pub user: User,
    pub password_hash: String,
}

/// Find an active user by ID.
pub async fn find_active_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<User>, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, first_name, last_name, role, family_office_id, family_id,
               is_active, created_at, updated_at
        FROM users
        WHERE id = $1 AND is_active
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Look up login credentials by (normalized) email.
pub async fn find_credentials_by_email(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Option<UserCredentials>, AppError> {
    sqlx::query_as::<_, UserCredentials>(
        r#"
        SELECT id, email, first_name, last_name, role, family_office_id, family_id,
               is_active, created_at, updated_at, password_hash
        FROM users
        WHERE email = $1
        "#,
    )
    .bind(email)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn email_exists(pool: &Pool<Postgres>, email: &str) -> Result<bool, AppError> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(pool)
        .await
        .map_err(SqlxErrorExt::into_app_error)
}

/// Insert a new user. The email is stored as given; callers normalize it.
pub async fn create(
    pool: &Pool<Postgres>,
    req: &RegisterRequest,
    email: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (id, email, password_hash, first_name, last_name, role,
                           family_office_id, family_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING id, email, first_name, last_name, role, family_office_id, family_id,
                  is_active, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(req.first_name.trim())
    .bind(req.last_name.trim())
    .bind(req.role)
    .bind(req.family_office_id)
    .bind(req.family_id)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Lowercase and trim an email for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_normalized() {
        assert_eq!(normalize_email("  Admin@Demo.COM "), "admin@demo.com");
    }
}
