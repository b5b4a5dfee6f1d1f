use chrono::{DateTime, Utc};

use crate::document::Document;
use crate::family::Family;
use crate::meeting::Meeting;
use crate::message::Message;

/// How many items each "recent" list on the dashboard shows.
pub const RECENT_LIMIT: usize = 5;

/// Counts and recent items across the four dashboard collections.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    pub family_count: usize,
    pub document_count: usize,
    pub meeting_count: usize,
    pub message_count: usize,
    pub upcoming_meeting_count: usize,
    pub recent_families: Vec<Family>,
    pub recent_documents: Vec<Document>,
    pub recent_meetings: Vec<Meeting>,
    pub recent_messages: Vec<Message>,
}

impl DashboardSummary {
    pub fn build(
        families: &[Family],
        documents: &[Document],
        meetings: &[Meeting],
        messages: &[Message],
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            family_count: families.len(),
            document_count: documents.len(),
            meeting_count: meetings.len(),
            message_count: messages.len(),
            upcoming_meeting_count: meetings.iter().filter(|m| m.start_time > now).count(),
            recent_families: newest(families, |f| f.created_at),
            recent_documents: newest(documents, |d| d.uploaded_at),
            recent_meetings: newest(meetings, |m| m.start_time),
            recent_messages: newest(messages, |m| m.created_at),
        }
    }
}

fn newest<T: Clone>(items: &[T], at: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut sorted: Vec<T> = items.to_vec();
    sorted.sort_by_key(|item| std::cmp::Reverse(at(item)));
    sorted.truncate(RECENT_LIMIT);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::MessageType;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn family(n: i64) -> Family {
        Family {
            id: Uuid::new_v4(),
            name: format!("Family {n}"),
            family_office_id: Uuid::new_v4(),
            created_at: now() - Duration::days(n),
        }
    }

    fn message(n: i64) -> Message {
        Message {
            id: Uuid::new_v4(),
            sender_id: Uuid::new_v4(),
            recipient_id: Uuid::new_v4(),
            family_id: Uuid::new_v4(),
            content: format!("message {n}"),
            message_type: MessageType::Text,
            attachment_id: None,
            created_at: now() - Duration::minutes(n),
            is_read: false,
        }
    }

    #[test]
    fn counts_match_collection_lengths() {
        let families: Vec<Family> = (0..7).map(family).collect();
        let messages: Vec<Message> = (0..3).map(message).collect();
        let summary = DashboardSummary::build(&families, &[], &[], &messages, now());
        assert_eq!(summary.family_count, 7);
        assert_eq!(summary.message_count, 3);
        assert_eq!(summary.document_count, 0);
        assert_eq!(summary.meeting_count, 0);
        assert_eq!(summary.upcoming_meeting_count, 0);
    }

    #[test]
    fn recent_lists_are_capped_and_newest_first() {
        // Oldest first on input, so ordering has to come from the summary.
        let families: Vec<Family> = (0..7).rev().map(family).collect();
        let summary = DashboardSummary::build(&families, &[], &[], &[], now());
        assert_eq!(summary.recent_families.len(), RECENT_LIMIT);
        let names: Vec<&str> = summary
            .recent_families
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Family 0", "Family 1", "Family 2", "Family 3", "Family 4"]
        );
    }

    #[test]
    fn empty_collections() {
        let summary = DashboardSummary::build(&[], &[], &[], &[], now());
        assert_eq!(summary, DashboardSummary::default());
    }
}
