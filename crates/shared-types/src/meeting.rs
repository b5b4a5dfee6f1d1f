use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::Type))]
#[cfg_attr(
    feature = "server",
    sqlx(type_name = "meeting_status", rename_all = "snake_case")
)]
pub enum MeetingStatus {
    #[default]
    Scheduled,
    Confirmed,
    Completed,
    Cancelled,
}

impl MeetingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "scheduled",
            MeetingStatus::Confirmed => "confirmed",
            MeetingStatus::Completed => "completed",
            MeetingStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeetingStatus::Scheduled => "Scheduled",
            MeetingStatus::Confirmed => "Confirmed",
            MeetingStatus::Completed => "Completed",
            MeetingStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Meeting {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub family_id: Uuid,
    pub advisor_id: Uuid,
    pub status: MeetingStatus,
    pub attendees: Vec<Uuid>,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
    pub action_items: Vec<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/meetings`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct CreateMeetingRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 200, message = "Title is required"))
    )]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub family_id: Uuid,
    pub advisor_id: Uuid,
    #[serde(default)]
    pub attendees: Vec<Uuid>,
    #[serde(default)]
    pub meeting_link: Option<String>,
}

impl CreateMeetingRequest {
    /// A meeting must end after it starts.
    pub fn check_times(&self) -> Result<(), AppError> {
        if self.end_time <= self.start_time {
            let mut fields = HashMap::new();
            fields.insert(
                "end_time".to_string(),
                "End time must be after start time".to_string(),
            );
            return Err(AppError::validation("Validation failed", fields));
        }
        Ok(())
    }
}

/// Filters for `GET /api/meetings`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct MeetingQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<MeetingStatus>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingPartition {
    /// Soonest first.
    pub upcoming: Vec<Meeting>,
    /// Most recent first.
    pub past: Vec<Meeting>,
}

/// Split meetings around `now`: a start strictly after `now` is upcoming.
pub fn partition_meetings(meetings: &[Meeting], now: DateTime<Utc>) -> MeetingPartition {
    let (mut upcoming, mut past): (Vec<Meeting>, Vec<Meeting>) = meetings
        .iter()
        .cloned()
        .partition(|m| m.start_time > now);
    upcoming.sort_by_key(|m| m.start_time);
    past.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    MeetingPartition { upcoming, past }
}
