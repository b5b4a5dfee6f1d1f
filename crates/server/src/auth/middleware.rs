use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use sqlx::{Pool, Postgres};

use super::cookies;
use super::jwt::{token_fingerprint, validate_access_token};

/// Permissive auth middleware.
///
/// Validates the access token from the cookie (or Bearer header fallback),
/// loads the user it names, and inserts both the `Claims` and the `User`
/// into request extensions when the user still exists and is active.
///
/// Does NOT reject unauthenticated requests; downstream extractors decide.
pub async fn auth_middleware(
    State(pool): State<Pool<Postgres>>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(token) = cookies::extract_access_token(req.headers()) {
        match validate_access_token(&token) {
            Ok(claims) => match crate::repo::users::find_active_by_id(&pool, claims.sub).await {
                Ok(Some(user)) => {
                    req.extensions_mut().insert(claims);
                    req.extensions_mut().insert(user);
                }
                Ok(None) => {
                    tracing::warn!(user_id = %claims.sub, "token for missing or inactive user");
                }
                Err(e) => {
                    tracing::error!(user_id = %claims.sub, error = %e, "user lookup failed");
                }
            },
            Err(e) => {
                tracing::debug!(
                    token = %token_fingerprint(&token),
                    error = %e,
                    "rejected access token"
                );
            }
        }
    }

    next.run(req).await
}
