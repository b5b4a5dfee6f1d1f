use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, CreateMeetingRequest, Meeting, MeetingQuery, UserRole};

use crate::access;
use crate::auth::extractors::AuthRequired;
use crate::error_convert::ValidateRequest;
use crate::repo::meetings::MeetingFilter;

#[utoipa::path(
    post,
    path = "/api/meetings",
    request_body = CreateMeetingRequest,
    responses(
        (status = 201, description = "Meeting scheduled", body = Meeting),
        (status = 403, description = "No access to this family", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "meetings",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth, body))]
pub async fn create_meeting(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Json(body): Json<CreateMeetingRequest>,
) -> Result<(StatusCode, Json<Meeting>), AppError> {
    body.validate_request()?;
    body.check_times()?;

    let user = auth.0;
    access::require_family_access(&pool, &user, body.family_id).await?;

    let meeting = crate::repo::meetings::create(&pool, &body, user.id).await?;
    tracing::info!(meeting_id = %meeting.id, family_id = %meeting.family_id, "meeting scheduled");
    Ok((StatusCode::CREATED, Json(meeting)))
}

#[utoipa::path(
    get,
    path = "/api/meetings",
    params(MeetingQuery),
    responses(
        (status = 200, description = "Meetings visible to the caller", body = Vec<Meeting>),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "No access to this family", body = AppError)
    ),
    tag = "meetings",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn list_meetings(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Query(params): Query<MeetingQuery>,
) -> Result<Json<Vec<Meeting>>, AppError> {
    let user = auth.0;
    if let Some(family_id) = params.family_id {
        access::require_family_access(&pool, &user, family_id).await?;
    }

    let mut filter = MeetingFilter {
        family_id: params.family_id,
        status: params.status,
        advisor_id: None,
    };
    match user.role {
        UserRole::Advisor => filter.advisor_id = Some(user.id),
        UserRole::FamilyMember => match user.family_id {
            Some(own) => filter.family_id = Some(own),
            None => return Ok(Json(Vec::new())),
        },
        UserRole::Admin | UserRole::FamilyOfficeAdmin => {}
    }

    Ok(Json(crate::repo::meetings::list(&pool, &filter).await?))
}
