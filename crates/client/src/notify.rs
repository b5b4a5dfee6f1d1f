use crate::error::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Notices raised by a view model, drained by the UI into toasts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Notifications {
    pending: Vec<Notice>,
    session_expired: bool,
}

impl Notifications {
    pub fn success(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Success, message.into());
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Info, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(NoticeLevel::Error, message.into());
    }

    /// Log a failed request and tell the user about it.
    pub fn failure(&mut self, action: &str, err: &ClientError) {
        tracing::warn!(action, error = %err, "request failed");
        if err.is_unauthorized() {
            self.session_expired = true;
        }
        self.error(format!("{action}: {}", err.user_message()));
    }

    /// Whether any recorded failure was a 401.
    pub fn session_expired(&self) -> bool {
        self.session_expired
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notice> {
        self.pending.iter()
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }

    fn push(&mut self, level: NoticeLevel, message: String) {
        self.pending.push(Notice { level, message });
    }
}
