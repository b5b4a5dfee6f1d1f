use shared_types::{
    AuthResponse, CreateMeetingRequest, Document, DocumentDownload, DocumentQuery, DocumentType,
    Family, LoginRequest, Meeting, MeetingQuery, Message, MessageQuery, SendMessageRequest, User,
};
use uuid::Uuid;

use crate::error::ClientError;

/// A file picked for upload plus its form fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
    pub document_type: DocumentType,
    pub family_id: Uuid,
    pub description: Option<String>,
    pub tags: Vec<String>,
}

/// Every backend call the screens make.
///
/// Futures are not required to be `Send`: the browser build runs them on a
/// single thread.
#[allow(async_fn_in_trait)]
pub trait PortalApi {
    /// Attach (or drop) the bearer token sent with later requests.
    fn set_token(&self, token: Option<String>);

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError>;
    async fn current_user(&self) -> Result<User, ClientError>;
    async fn logout(&self) -> Result<(), ClientError>;

    async fn list_families(&self) -> Result<Vec<Family>, ClientError>;

    async fn list_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, ClientError>;
    async fn upload_document(&self, upload: DocumentUpload) -> Result<Document, ClientError>;
    async fn download_document(&self, id: Uuid) -> Result<DocumentDownload, ClientError>;

    async fn list_meetings(&self, query: &MeetingQuery) -> Result<Vec<Meeting>, ClientError>;
    async fn create_meeting(&self, request: &CreateMeetingRequest)
        -> Result<Meeting, ClientError>;

    async fn list_messages(&self, query: &MessageQuery) -> Result<Vec<Message>, ClientError>;
    async fn send_message(&self, request: &SendMessageRequest) -> Result<Message, ClientError>;
}
