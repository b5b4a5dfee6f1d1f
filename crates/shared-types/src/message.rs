use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

#[cfg(feature = "validation")]
use validator::Validate;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::Type))]
#[cfg_attr(
    feature = "server",
    sqlx(type_name = "message_type", rename_all = "snake_case")
)]
pub enum MessageType {
    #[default]
    Text,
    Document,
    MeetingRequest,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub family_id: Uuid,
    pub content: String,
    pub message_type: MessageType,
    pub attachment_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub is_read: bool,
}

/// Body of `POST /api/messages`. The sender is always the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(Validate))]
pub struct SendMessageRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 10000, message = "Message cannot be empty"))
    )]
    pub content: String,
    pub recipient_id: Uuid,
    pub family_id: Uuid,
    #[serde(default)]
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attachment_id: Option<Uuid>,
}

/// Filters for `GET /api/messages`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct MessageQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<Uuid>,
}

// ── Conversations ───────────────────────────────────────────────────

/// Unordered pair of participants.
///
/// `low` sorts before `high`, which is the same order as comparing the
/// hyphenated lowercase ids as strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConversationKey {
    pub low: Uuid,
    pub high: Uuid,
}

impl ConversationKey {
    pub fn new(a: Uuid, b: Uuid) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    pub fn for_message(message: &Message) -> Self {
        Self::new(message.sender_id, message.recipient_id)
    }

    /// The participant who is not `me`.
    pub fn other_participant(&self, me: Uuid) -> Uuid {
        if self.low == me {
            self.high
        } else {
            self.low
        }
    }
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.low, self.high)
    }
}

/// Group messages by participant pair, keeping arrival order inside each group.
pub fn group_conversations(messages: &[Message]) -> BTreeMap<ConversationKey, Vec<Message>> {
    let mut groups: BTreeMap<ConversationKey, Vec<Message>> = BTreeMap::new();
    for message in messages {
        groups
            .entry(ConversationKey::for_message(message))
            .or_default()
            .push(message.clone());
    }
    groups
}

/// Inbox row for one conversation, seen from one user.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversationSummary {
    pub key: ConversationKey,
    pub counterpart: Uuid,
    /// Last message in arrival order.
    pub latest: Message,
    pub message_count: usize,
    pub sent_by_me: bool,
    pub unread: bool,
}

/// Inbox rows for `me`, newest conversation first.
pub fn summarize_conversations(messages: &[Message], me: Uuid) -> Vec<ConversationSummary> {
    let mut summaries: Vec<ConversationSummary> = group_conversations(messages)
        .into_iter()
        .filter_map(|(key, thread)| {
            let message_count = thread.len();
            let latest = thread.into_iter().last()?;
            let sent_by_me = latest.sender_id == me;
            Some(ConversationSummary {
                key,
                counterpart: key.other_participant(me),
                unread: !latest.is_read && !sent_by_me,
                sent_by_me,
                message_count,
                latest,
            })
        })
        .collect();
    summaries.sort_by(|a, b| b.latest.created_at.cmp(&a.latest.created_at));
    summaries
}
