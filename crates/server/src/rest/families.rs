use axum::{extract::State, http::StatusCode, Json};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, CreateFamilyRequest, Family, UserRole};

use crate::auth::extractors::{AuthRequired, RoleRequired, OFFICE_ADMIN};
use crate::error_convert::ValidateRequest;

#[utoipa::path(
    post,
    path = "/api/families",
    request_body = CreateFamilyRequest,
    responses(
        (status = 201, description = "Family created", body = Family),
        (status = 403, description = "Family office administrator role required", body = AppError),
        (status = 404, description = "Family office not found", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn create_family(
    State(pool): State<Pool<Postgres>>,
    auth: RoleRequired<OFFICE_ADMIN>,
    Json(body): Json<CreateFamilyRequest>,
) -> Result<(StatusCode, Json<Family>), AppError> {
    body.validate_request()?;
    let user = auth.0;

    if user.role == UserRole::FamilyOfficeAdmin && user.family_office_id != body.family_office_id {
        return Err(AppError::forbidden(
            "Office administrators can only create families in their own office",
        ));
    }

    crate::repo::family_offices::find_by_id(&pool, body.family_office_id)
        .await?
        .ok_or_else(|| AppError::not_found("Family office not found"))?;

    let family =
        crate::repo::families::create(&pool, body.name.trim(), body.family_office_id).await?;

    tracing::info!(family_id = %family.id, created_by = %user.id, "family created");
    Ok((StatusCode::CREATED, Json(family)))
}

#[utoipa::path(
    get,
    path = "/api/families",
    responses(
        (status = 200, description = "Families visible to the caller", body = Vec<Family>),
        (status = 401, description = "Not authenticated", body = AppError)
    ),
    tag = "families",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn list_families(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
) -> Result<Json<Vec<Family>>, AppError> {
    let user = auth.0;
    let families = match user.role {
        UserRole::Admin => crate::repo::families::list_all(&pool).await?,
        UserRole::FamilyOfficeAdmin => {
            crate::repo::families::list_by_office(&pool, user.family_office_id).await?
        }
        UserRole::Advisor | UserRole::FamilyMember => match user.family_id {
            Some(family_id) => crate::repo::families::find_by_id(&pool, family_id)
                .await?
                .into_iter()
                .collect(),
            None => Vec::new(),
        },
    };
    Ok(Json(families))
}
