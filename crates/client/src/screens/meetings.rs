use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, Utc};
use shared_types::{
    partition_meetings, CreateMeetingRequest, Meeting, MeetingPartition, MeetingQuery,
};
use uuid::Uuid;

use crate::api::PortalApi;
use crate::notify::Notifications;
use crate::screens::keep_edits;

/// Value format of `<input type="datetime-local">`.
const LOCAL_INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Offset for minutes east of UTC, falling back to UTC when out of range.
pub fn offset_from_minutes(minutes: i32) -> FixedOffset {
    minutes
        .checked_mul(60)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix())
}

/// Read a datetime-local value entered at `offset`, or an RFC 3339 timestamp.
pub fn parse_meeting_time(raw: &str, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, LOCAL_INPUT_FORMAT)
        .ok()
        .and_then(|naive| naive.and_local_timezone(offset).single())
        .map(|local| local.with_timezone(&Utc))
}

/// Render an instant as a datetime-local value at `offset`.
pub fn local_input_value(at: DateTime<Utc>, offset: FixedOffset) -> String {
    at.with_timezone(&offset).format(LOCAL_INPUT_FORMAT).to_string()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingForm {
    pub title: String,
    pub description: String,
    pub start: String,
    pub end: String,
    pub family_id: Option<Uuid>,
    /// Typed or picked advisor id.
    pub advisor_id: String,
    pub meeting_link: String,
    /// Browser offset in minutes east of UTC; start and end are read at it.
    pub utc_offset_minutes: i32,
}

impl MeetingForm {
    fn merge(&mut self, before: &Self, after: Self) {
        keep_edits(&mut self.title, &before.title, after.title);
        keep_edits(&mut self.description, &before.description, after.description);
        keep_edits(&mut self.start, &before.start, after.start);
        keep_edits(&mut self.end, &before.end, after.end);
        keep_edits(&mut self.family_id, &before.family_id, after.family_id);
        keep_edits(&mut self.advisor_id, &before.advisor_id, after.advisor_id);
        keep_edits(&mut self.meeting_link, &before.meeting_link, after.meeting_link);
        keep_edits(
            &mut self.utc_offset_minutes,
            &before.utc_offset_minutes,
            after.utc_offset_minutes,
        );
    }

    pub fn offset(&self) -> FixedOffset {
        offset_from_minutes(self.utc_offset_minutes)
    }

    pub fn to_request(&self) -> Result<CreateMeetingRequest, &'static str> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err("Title is required");
        }
        let offset = self.offset();
        let start_time =
            parse_meeting_time(&self.start, offset).ok_or("Please enter a start time")?;
        let end_time = parse_meeting_time(&self.end, offset).ok_or("Please enter an end time")?;
        if end_time <= start_time {
            return Err("End time must be after start time");
        }
        let family_id = self.family_id.ok_or("Please choose a family")?;
        let advisor_id =
            Uuid::parse_str(self.advisor_id.trim()).map_err(|_| "Please choose an advisor")?;

        let optional = |s: &str| {
            let s = s.trim();
            (!s.is_empty()).then(|| s.to_string())
        };
        Ok(CreateMeetingRequest {
            title: title.to_string(),
            description: optional(&self.description),
            start_time,
            end_time,
            family_id,
            advisor_id,
            attendees: Vec::new(),
            meeting_link: optional(&self.meeting_link),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeetingsView {
    pub meetings: Vec<Meeting>,
    pub form: MeetingForm,
    pub show_form: bool,
    pub loading: bool,
    pub scheduling: bool,
}

impl MeetingsView {
    pub fn partition(&self, now: DateTime<Utc>) -> MeetingPartition {
        partition_meetings(&self.meetings, now)
    }

    /// Fold a finished request on `before` back into this live view.
    pub fn merge(&mut self, before: &Self, after: Self) {
        self.meetings = after.meetings;
        self.loading = after.loading;
        self.scheduling = after.scheduling;
        keep_edits(&mut self.show_form, &before.show_form, after.show_form);
        self.form.merge(&before.form, after.form);
    }

    pub async fn load<A: PortalApi>(&mut self, api: &A, notices: &mut Notifications) {
        self.loading = true;
        match api.list_meetings(&MeetingQuery::default()).await {
            Ok(meetings) => self.meetings = meetings,
            Err(err) => notices.failure("Failed to load meetings", &err),
        }
        self.loading = false;
    }

    pub async fn schedule<A: PortalApi>(&mut self, api: &A, notices: &mut Notifications) -> bool {
        let request = match self.form.to_request() {
            Ok(request) => request,
            Err(message) => {
                notices.error(message);
                return false;
            }
        };

        self.scheduling = true;
        let result = api.create_meeting(&request).await;
        self.scheduling = false;

        match result {
            Ok(meeting) => {
                tracing::info!(meeting_id = %meeting.id, "meeting scheduled");
                notices.success("Meeting scheduled successfully");
                self.form = MeetingForm {
                    family_id: self.form.family_id,
                    advisor_id: std::mem::take(&mut self.form.advisor_id),
                    utc_offset_minutes: self.form.utc_offset_minutes,
                    ..MeetingForm::default()
                };
                self.show_form = false;
                self.load(api, notices).await;
                true
            }
            Err(err) => {
                notices.failure("Failed to schedule meeting", &err);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{at, meeting, FakeApi, ADMIN_ID, FAMILY_ID};
    use pretty_assertions::assert_eq;

    fn form(start: &str, end: &str) -> MeetingForm {
        MeetingForm {
            title: "Estate planning".to_string(),
            start: start.to_string(),
            end: end.to_string(),
            family_id: Some(FAMILY_ID),
            advisor_id: ADMIN_ID.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn datetime_local_is_read_at_browser_offset() {
        let utc = offset_from_minutes(0);
        let berlin = offset_from_minutes(120);
        let new_york = offset_from_minutes(-240);
        assert_eq!(parse_meeting_time("2024-06-01T14:00", utc), Some(at(14)));
        assert_eq!(parse_meeting_time("2024-06-01T16:00", berlin), Some(at(14)));
        assert_eq!(parse_meeting_time("2024-06-01T10:00", new_york), Some(at(14)));
        assert_eq!(parse_meeting_time("2024-06-01T16:00:00+02:00", new_york), Some(at(14)));
        assert_eq!(parse_meeting_time("tomorrow", utc), None);
    }

    #[test]
    fn input_value_uses_same_offset() {
        let berlin = offset_from_minutes(120);
        assert_eq!(local_input_value(at(14), berlin), "2024-06-01T16:00");
        assert_eq!(offset_from_minutes(i32::MAX), offset_from_minutes(0));
    }

    #[test]
    fn form_times_are_converted_to_utc() {
        let mut local = form("2024-06-01T16:00", "2024-06-01T17:00");
        local.utc_offset_minutes = 120;
        let request = local.to_request().unwrap();
        assert_eq!(request.start_time, at(14));
        assert_eq!(request.end_time, at(15));
    }

    #[tokio::test]
    async fn editing_form_during_schedule_survives() {
        let api = FakeApi::signed_in_admin();
        let mut live = MeetingsView {
            form: form("2024-06-01T14:00", "2024-06-01T15:00"),
            show_form: true,
            ..Default::default()
        };
        let before = live.clone();
        let mut next = before.clone();
        let mut notices = Notifications::default();
        assert!(next.schedule(&api, &mut notices).await);

        live.form.meeting_link = "https://meet.example.com/review".to_string();
        live.merge(&before, next);

        assert_eq!(live.form.meeting_link, "https://meet.example.com/review");
        assert_eq!(live.form.title, "");
        assert!(!live.show_form);
        assert_eq!(live.meetings.len(), 1);
        assert!(!live.scheduling);
    }

    #[test]
    fn end_must_follow_start() {
        let err = form("2024-06-01T14:00", "2024-06-01T14:00")
            .to_request()
            .unwrap_err();
        assert_eq!(err, "End time must be after start time");

        let request = form("2024-06-01T14:00", "2024-06-01T15:00").to_request().unwrap();
        assert_eq!(request.description, None);
        assert_eq!(request.end_time, at(15));
    }

    #[test]
    fn partition_uses_now() {
        let view = MeetingsView {
            meetings: vec![meeting("Kickoff", 9), meeting("Review", 15)],
            ..Default::default()
        };
        let split = view.partition(at(12));
        assert_eq!(split.upcoming[0].title, "Review");
        assert_eq!(split.past[0].title, "Kickoff");
    }

    #[tokio::test]
    async fn schedule_resets_form_and_reloads() {
        let api = FakeApi::signed_in_admin();
        let mut view = MeetingsView {
            form: form("2024-06-01T14:00", "2024-06-01T15:00"),
            show_form: true,
            ..Default::default()
        };
        let mut notices = Notifications::default();

        assert!(view.schedule(&api, &mut notices).await);
        assert_eq!(view.meetings.len(), 1);
        assert_eq!(view.form.title, "");
        assert_eq!(view.form.family_id, Some(FAMILY_ID));
        assert!(!view.show_form);
        assert_eq!(notices.len(), 1);
    }

    #[tokio::test]
    async fn failed_schedule_keeps_form_open() {
        let api = FakeApi::signed_in_admin();
        api.fail("create_meeting");
        let mut view = MeetingsView {
            form: form("2024-06-01T14:00", "2024-06-01T15:00"),
            show_form: true,
            ..Default::default()
        };
        let mut notices = Notifications::default();

        assert!(!view.schedule(&api, &mut notices).await);
        assert!(view.show_form);
        assert_eq!(view.form.title, "Estate planning");
        assert_eq!(api.calls("meetings"), 0);
        assert_eq!(notices.len(), 1);
    }
}
