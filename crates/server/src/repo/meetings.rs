use shared_types::{AppError, CreateMeetingRequest, Meeting, MeetingStatus};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// Narrowing applied to a meetings listing.
#[derive(Debug, Clone, Default)]
pub struct MeetingFilter {
    pub family_id: Option<Uuid>,
    pub status: Option<MeetingStatus>,
    pub advisor_id: Option<Uuid>,
}

pub async fn create(
    pool: &Pool<Postgres>,
    req: &CreateMeetingRequest,
    created_by: Uuid,
) -> Result<Meeting, AppError> {
    sqlx::query_as::<_, Meeting>(
        r#"
        INSERT INTO meetings (id, title, description, start_time, end_time, family_id,
                              advisor_id, attendees, meeting_link, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id, title, description, start_time, end_time, family_id, advisor_id,
                  status, attendees, meeting_link, notes, action_items, created_by,
                  created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(req.title.trim())
    .bind(req.description.as_deref())
    .bind(req.start_time)
    .bind(req.end_time)
    .bind(req.family_id)
    .bind(req.advisor_id)
    .bind(&req.attendees)
    .bind(req.meeting_link.as_deref())
    .bind(created_by)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Meetings matching every set filter, soonest first.
pub async fn list(pool: &Pool<Postgres>, filter: &MeetingFilter) -> Result<Vec<Meeting>, AppError> {
    sqlx::query_as::<_, Meeting>(
        r#"
        SELECT id, title, description, start_time, end_time, family_id, advisor_id,
               status, attendees, meeting_link, notes, action_items, created_by,
               created_at, updated_at
        FROM meetings
        WHERE ($1::uuid IS NULL OR family_id = $1)
          AND ($2::meeting_status IS NULL OR status = $2)
          AND ($3::uuid IS NULL OR advisor_id = $3)
        ORDER BY start_time, id
        "#,
    )
    .bind(filter.family_id)
    .bind(filter.status)
    .bind(filter.advisor_id)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
