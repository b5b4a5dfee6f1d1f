//! In-memory [`PortalApi`] for view-model tests.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, TimeZone, Utc};
use shared_types::{
    AuthResponse, CreateMeetingRequest, Document, DocumentDownload, DocumentQuery, Family,
    LoginRequest, Meeting, MeetingQuery, MeetingStatus, Message, MessageQuery, SendMessageRequest,
    User, UserRole,
};
use uuid::Uuid;

use crate::api::{DocumentUpload, PortalApi};
use crate::error::ClientError;

pub const OFFICE_ID: Uuid = Uuid::from_u128(0x0f);
pub const FAMILY_ID: Uuid = Uuid::from_u128(0xfa);
pub const ADMIN_ID: Uuid = Uuid::from_u128(0xa1);
pub const MEMBER_ID: Uuid = Uuid::from_u128(0xb2);

pub fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, hour, 0, 0).unwrap()
}

fn user(id: Uuid, email: &str, role: UserRole, family_id: Option<Uuid>) -> User {
    User {
        id,
        email: email.to_string(),
        first_name: "Demo".to_string(),
        last_name: "User".to_string(),
        role,
        family_office_id: OFFICE_ID,
        family_id,
        is_active: true,
        created_at: at(0),
        updated_at: at(0),
    }
}

pub fn demo_admin() -> User {
    user(ADMIN_ID, "admin@demo.com", UserRole::Admin, None)
}

pub fn demo_member() -> User {
    user(MEMBER_ID, "member@demo.com", UserRole::FamilyMember, Some(FAMILY_ID))
}

pub fn message(sender: Uuid, recipient: Uuid, hour: u32, content: &str) -> Message {
    Message {
        id: Uuid::new_v4(),
        sender_id: sender,
        recipient_id: recipient,
        family_id: FAMILY_ID,
        content: content.to_string(),
        message_type: Default::default(),
        attachment_id: None,
        created_at: at(hour),
        is_read: false,
    }
}

pub fn meeting(title: &str, start_hour: u32) -> Meeting {
    Meeting {
        id: Uuid::new_v4(),
        title: title.to_string(),
        description: None,
        start_time: at(start_hour),
        end_time: at(start_hour + 1),
        family_id: FAMILY_ID,
        advisor_id: ADMIN_ID,
        status: MeetingStatus::Scheduled,
        attendees: vec![],
        meeting_link: None,
        notes: None,
        action_items: vec![],
        created_by: ADMIN_ID,
        created_at: at(0),
        updated_at: at(0),
    }
}

pub fn document(name: &str, document_type: shared_types::DocumentType) -> Document {
    Document {
        id: Uuid::new_v4(),
        filename: format!("{}_{name}", Uuid::new_v4()),
        original_filename: name.to_string(),
        document_type,
        description: None,
        tags: vec![],
        file_size: 3,
        content_type: "application/pdf".to_string(),
        family_id: FAMILY_ID,
        uploaded_by: ADMIN_ID,
        uploaded_at: at(1),
        access_permissions: vec![],
        is_active: true,
    }
}

#[derive(Default)]
pub struct FakeState {
    pub users: Vec<(User, String)>,
    pub token: Option<String>,
    pub families: Vec<Family>,
    pub documents: Vec<Document>,
    pub downloads: HashMap<Uuid, DocumentDownload>,
    pub meetings: Vec<Meeting>,
    pub messages: Vec<Message>,
    /// Endpoint names that answer 500.
    pub failing: HashSet<&'static str>,
    pub calls: Vec<&'static str>,
}

#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn with_demo_users() -> Self {
        let api = Self::default();
        {
            let mut state = api.state();
            state.users.push((demo_admin(), "admin123".to_string()));
            state.users.push((demo_member(), "member123".to_string()));
            state.families.push(Family {
                id: FAMILY_ID,
                name: "Demo Family".to_string(),
                family_office_id: OFFICE_ID,
                created_at: at(0),
            });
        }
        api
    }

    /// Demo data with the admin already signed in.
    pub fn signed_in_admin() -> Self {
        let api = Self::with_demo_users();
        api.set_token(Some("token-admin@demo.com".to_string()));
        api
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    pub fn token(&self) -> Option<String> {
        self.state().token.clone()
    }

    pub fn fail(&self, endpoint: &'static str) {
        self.state().failing.insert(endpoint);
    }

    pub fn calls(&self, endpoint: &str) -> usize {
        self.state().calls.iter().filter(|c| **c == endpoint).count()
    }

    fn enter(&self, endpoint: &'static str) -> Result<User, ClientError> {
        let mut state = self.state();
        state.calls.push(endpoint);
        if state.failing.contains(endpoint) {
            return Err(ClientError::from_response(
                500,
                r#"{"kind":"InternalError","message":"Internal server error"}"#,
            ));
        }
        let token = state.token.clone();
        state
            .users
            .iter()
            .map(|(u, _)| u)
            .find(|u| token.as_deref() == Some(format!("token-{}", u.email).as_str()))
            .cloned()
            .ok_or_else(|| ClientError::from_response(401, ""))
    }
}

impl PortalApi for FakeApi {
    fn set_token(&self, token: Option<String>) {
        self.state().token = token;
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        let mut state = self.state();
        state.calls.push("login");
        let found = state
            .users
            .iter()
            .find(|(u, p)| u.email == request.email && *p == request.password)
            .map(|(u, _)| u.clone());
        match found {
            Some(user) => Ok(AuthResponse::bearer(
                format!("token-{}", user.email),
                86400,
                user,
            )),
            None => Err(ClientError::from_response(
                401,
                r#"{"kind":"Unauthorized","message":"Invalid email or password"}"#,
            )),
        }
    }

    async fn current_user(&self) -> Result<User, ClientError> {
        self.enter("me")
    }

    async fn logout(&self) -> Result<(), ClientError> {
        self.state().calls.push("logout");
        Ok(())
    }

    async fn list_families(&self) -> Result<Vec<Family>, ClientError> {
        self.enter("families")?;
        Ok(self.state().families.clone())
    }

    async fn list_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, ClientError> {
        self.enter("documents")?;
        Ok(self
            .state()
            .documents
            .iter()
            .filter(|d| query.family_id.is_none_or(|f| d.family_id == f))
            .filter(|d| query.document_type.is_none_or(|t| d.document_type == t))
            .cloned()
            .collect())
    }

    async fn upload_document(&self, upload: DocumentUpload) -> Result<Document, ClientError> {
        let me = self.enter("upload")?;
        let mut doc = document(&upload.filename, upload.document_type);
        doc.family_id = upload.family_id;
        doc.description = upload.description;
        doc.tags = upload.tags;
        doc.content_type = upload.content_type.clone();
        doc.file_size = upload.bytes.len() as i64;
        doc.uploaded_by = me.id;
        let mut state = self.state();
        state.downloads.insert(
            doc.id,
            DocumentDownload::encode(upload.filename, upload.content_type, &upload.bytes),
        );
        state.documents.insert(0, doc.clone());
        Ok(doc)
    }

    async fn download_document(&self, id: Uuid) -> Result<DocumentDownload, ClientError> {
        self.enter("download")?;
        self.state().downloads.get(&id).cloned().ok_or_else(|| {
            ClientError::from_response(404, r#"{"kind":"NotFound","message":"Document not found"}"#)
        })
    }

    async fn list_meetings(&self, query: &MeetingQuery) -> Result<Vec<Meeting>, ClientError> {
        self.enter("meetings")?;
        Ok(self
            .state()
            .meetings
            .iter()
            .filter(|m| query.family_id.is_none_or(|f| m.family_id == f))
            .filter(|m| query.status.is_none_or(|s| m.status == s))
            .cloned()
            .collect())
    }

    async fn create_meeting(
        &self,
        request: &CreateMeetingRequest,
    ) -> Result<Meeting, ClientError> {
        let me = self.enter("create_meeting")?;
        let mut created = meeting(&request.title, 0);
        created.description = request.description.clone();
        created.start_time = request.start_time;
        created.end_time = request.end_time;
        created.family_id = request.family_id;
        created.advisor_id = request.advisor_id;
        created.meeting_link = request.meeting_link.clone();
        created.created_by = me.id;
        self.state().meetings.push(created.clone());
        Ok(created)
    }

    async fn list_messages(&self, query: &MessageQuery) -> Result<Vec<Message>, ClientError> {
        let me = self.enter("messages")?;
        Ok(self
            .state()
            .messages
            .iter()
            .filter(|m| m.sender_id == me.id || m.recipient_id == me.id)
            .filter(|m| query.family_id.is_none_or(|f| m.family_id == f))
            .cloned()
            .collect())
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<Message, ClientError> {
        let me = self.enter("send_message")?;
        let mut sent = message(me.id, request.recipient_id, 23, &request.content);
        sent.family_id = request.family_id;
        self.state().messages.push(sent.clone());
        Ok(sent)
    }
}
