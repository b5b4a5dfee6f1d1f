use axum::{extract::FromRequestParts, http::request::Parts};
use shared_types::{AppError, User, UserRole};

/// Extractor that requires authentication. Returns 401 if no valid token.
///
/// Carries the active user row the auth middleware loaded for the token.
pub struct AuthRequired(pub User);

impl<S: Send + Sync> FromRequestParts<S> for AuthRequired {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthRequired)
            .ok_or_else(|| AppError::unauthorized("Authentication required"))
    }
}

/// Extractor that optionally extracts the authenticated user. Never fails.
pub struct MaybeAuth(pub Option<User>);

impl<S: Send + Sync> FromRequestParts<S> for MaybeAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuth(parts.extensions.get::<User>().cloned()))
    }
}

/// Role constants for [`RoleRequired`].
pub const OFFICE_ADMIN: u8 = 1;
pub const ADMIN: u8 = 2;

/// Extractor that requires authentication AND an administrative role.
/// Returns 401 if unauthenticated, 403 if the role is insufficient.
///
/// - `OFFICE_ADMIN`: admin or family office admin
/// - `ADMIN`: admin only
pub struct RoleRequired<const ROLE: u8>(pub User);

/// Whether `role` passes a [`RoleRequired`] check for `required`.
pub fn role_satisfies(role: UserRole, required: u8) -> bool {
    match required {
        ADMIN => role == UserRole::Admin,
        OFFICE_ADMIN => role.manages_families(),
        _ => true,
    }
}

impl<const ROLE: u8, S: Send + Sync> FromRequestParts<S> for RoleRequired<ROLE> {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<User>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized("Authentication required"))?;

        if !role_satisfies(user.role, ROLE) {
            let message = match ROLE {
                ADMIN => "Administrator role required",
                _ => "Family office administrator role required",
            };
            return Err(AppError::forbidden(message));
        }

        Ok(RoleRequired(user))
    }
}
