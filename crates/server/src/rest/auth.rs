use axum::{extract::State, http::HeaderMap, http::StatusCode, Json};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, AuthResponse, LoginRequest, RegisterRequest, User, UserRole};

use crate::auth::extractors::{AuthRequired, MaybeAuth};
use crate::auth::{cookies, jwt, password as pw};
use crate::error_convert::ValidateRequest;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Sign a token for `user` and report its lifetime in seconds.
fn issue_token(user: &User) -> Result<(String, i64), AppError> {
    let token = jwt::create_access_token(user.id, &user.email, user.role.as_str())
        .map_err(|e| AppError::internal(e.to_string()))?;
    Ok((token, jwt::access_token_expiry_minutes() * 60))
}

/// Open registration is behind the `registration` flag. Without it only
/// administrators may create accounts, and office admins only in their office.
fn check_registration_allowed(caller: Option<&User>, req: &RegisterRequest) -> Result<(), AppError> {
    match caller.map(|u| (u.role, u.family_office_id)) {
        Some((UserRole::Admin, _)) => Ok(()),
        Some((UserRole::FamilyOfficeAdmin, office)) if office == req.family_office_id => Ok(()),
        Some((UserRole::FamilyOfficeAdmin, _)) => Err(AppError::forbidden(
            "Office administrators can only register users in their own office",
        )),
        _ if crate::config::feature_flags().registration => {
            if req.role == UserRole::Admin {
                Err(AppError::forbidden("Administrator accounts cannot self-register"))
            } else {
                Ok(())
            }
        }
        _ => Err(AppError::forbidden("Registration is disabled")),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User registered", body = AuthResponse),
        (status = 403, description = "Registration not allowed", body = AppError),
        (status = 404, description = "Family office or family not found", body = AppError),
        (status = 409, description = "Email already registered", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, caller, payload), fields(email = %payload.email))]
pub async fn register(
    State(pool): State<Pool<Postgres>>,
    MaybeAuth(caller): MaybeAuth,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), AppError> {
    payload.validate_request()?;
    check_registration_allowed(caller.as_ref(), &payload)?;

    let email = crate::repo::users::normalize_email(&payload.email);
    if crate::repo::users::email_exists(&pool, &email).await? {
        return Err(AppError::conflict("An account with this email already exists"));
    }

    crate::repo::family_offices::find_by_id(&pool, payload.family_office_id)
        .await?
        .ok_or_else(|| AppError::not_found("Family office not found"))?;

    if let Some(family_id) = payload.family_id {
        let family = crate::repo::families::find_by_id(&pool, family_id)
            .await?
            .ok_or_else(|| AppError::not_found("Family not found"))?;
        if family.family_office_id != payload.family_office_id {
            return Err(AppError::bad_request(
                "Family does not belong to the given family office",
            ));
        }
    }

    let password_hash =
        pw::hash_password(&payload.password).map_err(|e| AppError::internal(e.to_string()))?;
    let user = crate::repo::users::create(&pool, &payload, &email, &password_hash).await?;
    let (access_token, expires_in) = issue_token(&user)?;

    // An administrator creating an account keeps their own session.
    let mut headers = HeaderMap::new();
    if caller.is_none() {
        cookies::set_auth_cookie(&mut headers, &access_token);
    }

    tracing::info!(user_id = %user.id, role = %user.role, "user registered");
    Ok((
        StatusCode::CREATED,
        headers,
        Json(AuthResponse::bearer(access_token, expires_in, user)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in; also sets the access cookie", body = AuthResponse),
        (status = 401, description = "Invalid email or password", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(pool, payload), fields(email = %payload.email))]
pub async fn login(
    State(pool): State<Pool<Postgres>>,
    Json(payload): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), AppError> {
    payload.validate_request()?;

    let email = crate::repo::users::normalize_email(&payload.email);
    let Some(credentials) = crate::repo::users::find_credentials_by_email(&pool, &email).await?
    else {
        tracing::warn!("login for unknown email");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    };

    if !credentials.user.is_active {
        tracing::warn!(user_id = %credentials.user.id, "login for inactive user");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let valid = pw::verify_password(&payload.password, &credentials.password_hash)
        .unwrap_or_else(|e| {
            tracing::error!(user_id = %credentials.user.id, error = %e, "stored password hash is malformed");
            false
        });
    if !valid {
        tracing::warn!(user_id = %credentials.user.id, "wrong password");
        return Err(AppError::unauthorized(INVALID_CREDENTIALS));
    }

    let user = credentials.user;
    let (access_token, expires_in) = issue_token(&user)?;
    let mut headers = HeaderMap::new();
    cookies::set_auth_cookie(&mut headers, &access_token);

    tracing::info!(user_id = %user.id, role = %user.role, "user logged in");
    Ok((headers, Json(AuthResponse::bearer(access_token, expires_in, user))))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "auth",
    security(("bearer_auth" = []))
)]
pub async fn me(auth: AuthRequired) -> Json<User> {
    Json(auth.0)
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 204, description = "Logged out; the access cookie is cleared")
    ),
    tag = "auth"
)]
#[tracing::instrument(skip(auth))]
pub async fn logout(auth: MaybeAuth) -> (StatusCode, HeaderMap) {
    if let Some(user) = auth.0 {
        tracing::info!(user_id = %user.id, "user logged out");
    }
    let mut headers = HeaderMap::new();
    cookies::clear_auth_cookie(&mut headers);
    (StatusCode::NO_CONTENT, headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn caller(role: UserRole, office: Uuid) -> User {
        User {
            id: Uuid::new_v4(),
            email: "caller@demo.com".to_string(),
            first_name: "Call".to_string(),
            last_name: "Er".to_string(),
            role,
            family_office_id: office,
            family_id: None,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn request(office: Uuid, role: UserRole) -> RegisterRequest {
        RegisterRequest {
            email: "new@demo.com".to_string(),
            password: "password123".to_string(),
            first_name: "New".to_string(),
            last_name: "User".to_string(),
            role,
            family_office_id: office,
            family_id: None,
        }
    }

    #[test]
    fn admin_may_register_anyone() {
        let office = Uuid::new_v4();
        let admin = caller(UserRole::Admin, Uuid::new_v4());
        assert!(check_registration_allowed(Some(&admin), &request(office, UserRole::Admin)).is_ok());
    }

    #[test]
    fn office_admin_limited_to_own_office() {
        let office = Uuid::new_v4();
        let foa = caller(UserRole::FamilyOfficeAdmin, office);
        assert!(check_registration_allowed(Some(&foa), &request(office, UserRole::Advisor)).is_ok());
        assert!(check_registration_allowed(
            Some(&foa),
            &request(Uuid::new_v4(), UserRole::Advisor)
        )
        .is_err());
    }

    #[test]
    fn anonymous_registration_follows_flag() {
        // Flags are never loaded in unit tests, so registration stays closed.
        let err = check_registration_allowed(None, &request(Uuid::new_v4(), UserRole::FamilyMember))
            .unwrap_err();
        assert_eq!(err.message, "Registration is disabled");
    }
}
