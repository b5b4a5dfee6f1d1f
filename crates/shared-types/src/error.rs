use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Categorization of application errors.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum AppErrorKind {
    NotFound,
    BadRequest,
    ValidationError,
    Conflict,
    DatabaseError,
    Unauthorized,
    Forbidden,
    PayloadTooLarge,
    InternalError,
}

impl fmt::Display for AppErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AppErrorKind::NotFound => "NotFound",
            AppErrorKind::BadRequest => "BadRequest",
            AppErrorKind::ValidationError => "ValidationError",
            AppErrorKind::Conflict => "Conflict",
            AppErrorKind::DatabaseError => "DatabaseError",
            AppErrorKind::Unauthorized => "Unauthorized",
            AppErrorKind::Forbidden => "Forbidden",
            AppErrorKind::PayloadTooLarge => "PayloadTooLarge",
            AppErrorKind::InternalError => "InternalError",
        };
        f.write_str(name)
    }
}

/// Structured error returned by every portal endpoint and understood by the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct AppError {
    pub kind: AppErrorKind,
    pub message: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub field_errors: HashMap<String, String>,
}

const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

impl AppError {
    fn new(kind: AppErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field_errors: HashMap::new(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::NotFound, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::BadRequest, message)
    }

    pub fn validation(message: impl Into<String>, field_errors: HashMap<String, String>) -> Self {
        Self {
            kind: AppErrorKind::ValidationError,
            message: message.into(),
            field_errors,
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Conflict, message)
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::DatabaseError, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Unauthorized, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::Forbidden, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::PayloadTooLarge, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(AppErrorKind::InternalError, message)
    }

    /// Best-effort error for a response status whose body was not an `AppError`.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let kind = match status {
            400 => AppErrorKind::BadRequest,
            401 => AppErrorKind::Unauthorized,
            403 => AppErrorKind::Forbidden,
            404 => AppErrorKind::NotFound,
            409 => AppErrorKind::Conflict,
            413 => AppErrorKind::PayloadTooLarge,
            422 => AppErrorKind::ValidationError,
            _ => AppErrorKind::InternalError,
        };
        Self::new(kind, message)
    }

    /// Parse an `AppError` out of a response body.
    ///
    /// Accepts the raw JSON object or a string with the object embedded in it
    /// (proxies and log lines sometimes wrap the payload).
    pub fn from_response_body(body: &str) -> Option<Self> {
        if let Ok(err) = serde_json::from_str::<Self>(body) {
            return Some(err);
        }
        let start = body.find('{')?;
        let end = body.rfind('}')?;
        if end > start {
            serde_json::from_str(&body[start..=end]).ok()
        } else {
            None
        }
    }

    /// Per-field validation errors carried in a response body, if any.
    pub fn parse_field_errors(body: &str) -> HashMap<String, String> {
        Self::from_response_body(body)
            .map(|e| e.field_errors)
            .unwrap_or_default()
    }

    /// User-facing message for a response body, with a generic fallback.
    pub fn friendly_message(body: &str) -> String {
        match Self::from_response_body(body) {
            Some(err) if !err.message.is_empty() => err.message,
            _ => FALLBACK_MESSAGE.to_string(),
        }
    }

    pub fn status_code_u16(&self) -> u16 {
        match self.kind {
            AppErrorKind::NotFound => 404,
            AppErrorKind::BadRequest => 400,
            AppErrorKind::ValidationError => 422,
            AppErrorKind::Conflict => 409,
            AppErrorKind::DatabaseError => 500,
            AppErrorKind::Unauthorized => 401,
            AppErrorKind::Forbidden => 403,
            AppErrorKind::PayloadTooLarge => 413,
            AppErrorKind::InternalError => 500,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for AppError {}

#[cfg(feature = "validation")]
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut field_errors = HashMap::new();
        for (field, errs) in errors.field_errors() {
            if let Some(first) = errs.first() {
                let msg = first
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                field_errors.insert(field.to_string(), msg);
            }
        }
        AppError::validation("Validation failed", field_errors)
    }
}

#[cfg(feature = "server")]
impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = axum::http::StatusCode::from_u16(self.status_code_u16())
            .unwrap_or(axum::http::StatusCode::INTERNAL_SERVER_ERROR);
        (status, axum::Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_raw_json_body() {
        let json = r#"{"kind":"Unauthorized","message":"Invalid email or password"}"#;
        let err = AppError::from_response_body(json).unwrap();
        assert_eq!(err.kind, AppErrorKind::Unauthorized);
        assert_eq!(err.message, "Invalid email or password");
    }

    #[test]
    fn parses_wrapped_json_body() {
        let wrapped = r#"upstream said: {"kind":"Forbidden","message":"No access to this family"} (502)"#;
        let err = AppError::from_response_body(wrapped).unwrap();
        assert_eq!(err.kind, AppErrorKind::Forbidden);
    }

    #[test]
    fn garbage_body_is_none() {
        assert!(AppError::from_response_body("<html>Bad Gateway</html>").is_none());
        assert!(AppError::from_response_body("").is_none());
    }

    #[test]
    fn friendly_message_falls_back() {
        assert_eq!(AppError::friendly_message("nope"), FALLBACK_MESSAGE);
        let json = r#"{"kind":"NotFound","message":"Document not found"}"#;
        assert_eq!(AppError::friendly_message(json), "Document not found");
    }

    #[test]
    fn field_errors_survive_the_wire() {
        let mut fields = HashMap::new();
        fields.insert("email".to_string(), "Valid email is required".to_string());
        let err = AppError::validation("Validation failed", fields);
        let body = serde_json::to_string(&err).unwrap();
        let parsed = AppError::parse_field_errors(&body);
        assert_eq!(parsed.get("email").unwrap(), "Valid email is required");
    }

    #[test]
    fn status_code_mapping() {
        assert_eq!(AppError::not_found("").status_code_u16(), 404);
        assert_eq!(AppError::validation("", HashMap::new()).status_code_u16(), 422);
        assert_eq!(AppError::payload_too_large("").status_code_u16(), 413);
        assert_eq!(AppError::database("").status_code_u16(), 500);
        assert_eq!(AppError::unauthorized("").status_code_u16(), 401);
        assert_eq!(AppError::forbidden("").status_code_u16(), 403);
    }

    #[test]
    fn from_status_picks_matching_kind() {
        assert_eq!(AppError::from_status(401, "x").kind, AppErrorKind::Unauthorized);
        assert_eq!(AppError::from_status(413, "x").kind, AppErrorKind::PayloadTooLarge);
        assert_eq!(AppError::from_status(500, "x").kind, AppErrorKind::InternalError);
        assert_eq!(AppError::from_status(502, "x").kind, AppErrorKind::InternalError);
    }

    #[test]
    fn display_formats_kind_and_message() {
        let err = AppError::forbidden("Only admins can create family offices");
        assert_eq!(
            err.to_string(),
            "Forbidden: Only admins can create family offices"
        );
    }
}
