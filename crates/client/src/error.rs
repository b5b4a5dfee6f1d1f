use shared_types::{AppError, AppErrorKind, DownloadDecodeError};

/// Everything that can go wrong talking to the backend.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The backend answered with a non-2xx status.
    #[error("{error}")]
    Status { status: u16, error: AppError },
    /// A response arrived but could not be turned into the expected type.
    #[error("could not read response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Build a [`ClientError::Status`] from a failed response.
    ///
    /// The body is parsed as an `AppError` when possible; otherwise the
    /// status alone picks the kind.
    pub fn from_response(status: u16, body: &str) -> Self {
        let error = AppError::from_response_body(body)
            .unwrap_or_else(|| AppError::from_status(status, AppError::friendly_message(body)));
        ClientError::Status { status, error }
    }

    /// Text for a notification.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Transport(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            ClientError::Status { error, .. } if !error.message.is_empty() => error.message.clone(),
            ClientError::Status { .. } => AppError::friendly_message(""),
            ClientError::Decode(_) => "The server sent a response we could not read.".to_string(),
        }
    }

    /// A 401 means the session is gone and must be torn down.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ClientError::Status { status: 401, .. }
                | ClientError::Status {
                    error: AppError {
                        kind: AppErrorKind::Unauthorized,
                        ..
                    },
                    ..
                }
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Transport(err.to_string())
        }
    }
}

impl From<DownloadDecodeError> for ClientError {
    fn from(err: DownloadDecodeError) -> Self {
        ClientError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_error_body_is_kept() {
        let body = r#"{"kind":"Forbidden","message":"No access to this family"}"#;
        let err = ClientError::from_response(403, body);
        assert_eq!(err.user_message(), "No access to this family");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn plain_body_falls_back_to_status() {
        let err = ClientError::from_response(500, "Internal Server Error");
        match &err {
            ClientError::Status { status, error } => {
                assert_eq!(*status, 500);
                assert_eq!(error.kind, AppErrorKind::InternalError);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(err.user_message(), "Something went wrong. Please try again.");
    }

    #[test]
    fn unauthorized_detected_by_status() {
        assert!(ClientError::from_response(401, "").is_unauthorized());
        assert!(!ClientError::Transport("offline".into()).is_unauthorized());
    }
}
