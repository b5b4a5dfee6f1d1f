use shared_types::{
    summarize_conversations, ConversationKey, ConversationSummary, Message, MessageQuery,
    MessageType, SendMessageRequest,
};
use uuid::Uuid;

use crate::api::PortalApi;
use crate::notify::Notifications;
use crate::screens::keep_edits;

/// Compose box state. Ids are held as typed text until sent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComposeForm {
    pub recipient_id: String,
    pub family_id: Option<Uuid>,
    pub content: String,
}

impl ComposeForm {
    pub fn to_request(&self) -> Result<SendMessageRequest, &'static str> {
        let content = self.content.trim();
        if content.is_empty() {
            return Err("Message cannot be empty");
        }
        let recipient_id =
            Uuid::parse_str(self.recipient_id.trim()).map_err(|_| "Please choose a recipient")?;
        let family_id = self.family_id.ok_or("Please choose a family")?;
        Ok(SendMessageRequest {
            content: content.to_string(),
            recipient_id,
            family_id,
            message_type: MessageType::Text,
            attachment_id: None,
        })
    }

    fn merge(&mut self, before: &Self, after: Self) {
        keep_edits(&mut self.recipient_id, &before.recipient_id, after.recipient_id);
        keep_edits(&mut self.family_id, &before.family_id, after.family_id);
        keep_edits(&mut self.content, &before.content, after.content);
    }

    /// Point the form at an existing conversation.
    pub fn reply_to(&mut self, summary: &ConversationSummary) {
        self.recipient_id = summary.counterpart.to_string();
        self.family_id = Some(summary.latest.family_id);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessagesView {
    /// Oldest first, as returned by the server.
    pub messages: Vec<Message>,
    pub compose: ComposeForm,
    pub selected: Option<ConversationKey>,
    pub loading: bool,
    pub sending: bool,
}

impl MessagesView {
    pub fn conversations(&self, me: Uuid) -> Vec<ConversationSummary> {
        summarize_conversations(&self.messages, me)
    }

    /// Messages of the selected conversation in arrival order.
    pub fn thread(&self) -> Vec<&Message> {
        let Some(key) = self.selected else {
            return Vec::new();
        };
        self.messages
            .iter()
            .filter(|m| ConversationKey::for_message(m) == key)
            .collect()
    }

    pub fn select(&mut self, summary: &ConversationSummary) {
        self.selected = Some(summary.key);
        self.compose.reply_to(summary);
    }

    /// Fold a finished request on `before` back into this live view.
    pub fn merge(&mut self, before: &Self, after: Self) {
        self.messages = after.messages;
        self.loading = after.loading;
        self.sending = after.sending;
        keep_edits(&mut self.selected, &before.selected, after.selected);
        self.compose.merge(&before.compose, after.compose);
    }

    pub async fn load<A: PortalApi>(&mut self, api: &A, notices: &mut Notifications) {
        self.loading = true;
        match api.list_messages(&MessageQuery::default()).await {
            Ok(messages) => self.messages = messages,
            Err(err) => notices.failure("Failed to load messages", &err),
        }
        self.loading = false;
    }

    /// Send the compose box. On failure the list and the draft stay as they were.
    pub async fn send<A: PortalApi>(&mut self, api: &A, notices: &mut Notifications) -> bool {
        let request = match self.compose.to_request() {
            Ok(request) => request,
            Err(message) => {
                notices.error(message);
                return false;
            }
        };

        self.sending = true;
        let result = api.send_message(&request).await;
        self.sending = false;

        match result {
            Ok(sent) => {
                tracing::info!(message_id = %sent.id, "message sent");
                self.compose.content.clear();
                self.selected = Some(ConversationKey::for_message(&sent));
                notices.success("Message sent");
                self.load(api, notices).await;
                true
            }
            Err(err) => {
                notices.failure("Failed to send message", &err);
                false
            }
        }
    }
}
