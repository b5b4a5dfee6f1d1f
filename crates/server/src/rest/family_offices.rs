use axum::{extract::State, http::StatusCode, Json};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, CreateFamilyOfficeRequest, FamilyOffice, UserRole};

use crate::auth::extractors::{AuthRequired, RoleRequired, ADMIN};
use crate::error_convert::ValidateRequest;

#[utoipa::path(
    post,
    path = "/api/family-offices",
    request_body = CreateFamilyOfficeRequest,
    responses(
        (status = 201, description = "Family office created", body = FamilyOffice),
        (status = 403, description = "Administrator role required", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "family-offices",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn create_family_office(
    State(pool): State<Pool<Postgres>>,
    auth: RoleRequired<ADMIN>,
    Json(body): Json<CreateFamilyOfficeRequest>,
) -> Result<(StatusCode, Json<FamilyOffice>), AppError> {
    body.validate_request()?;

    let office = crate::repo::family_offices::create(
        &pool,
        body.name.trim(),
        body.description.as_deref(),
    )
    .await?;

    tracing::info!(office_id = %office.id, created_by = %auth.0.id, "family office created");
    Ok((StatusCode::CREATED, Json(office)))
}

#[utoipa::path(
    get,
    path = "/api/family-offices",
    responses(
        (status = 200, description = "Family offices visible to the caller", body = Vec<FamilyOffice>),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "family-offices",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn list_family_offices(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<Vec<FamilyOffice>>, AppError> {
    let user = auth.0;
    if user.role == UserRole::Admin {
        return Ok(Json(crate::repo::family_offices::list_all(&pool).await?));
    }

    let own = crate::repo::family_offices::find_by_id(&pool, user.family_office_id).await?;
    Ok(Json(own.into_iter().collect()))
}
