use std::sync::{Arc, RwLock};

use reqwest::multipart::{Form, Part};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared_types::{
    AuthResponse, CreateMeetingRequest, Document, DocumentDownload, DocumentQuery, Family,
    LoginRequest, Meeting, MeetingQuery, Message, MessageQuery, SendMessageRequest, User,
};
use uuid::Uuid;

use crate::api::{DocumentUpload, PortalApi};
use crate::config::ClientConfig;
use crate::error::ClientError;

/// [`PortalApi`] over HTTP with reqwest.
///
/// Clones share the token, so the session and every screen see the same
/// login.
#[derive(Debug, Clone)]
pub struct HttpPortalApi {
    client: reqwest::Client,
    config: ClientConfig,
    token: Arc<RwLock<Option<String>>>,
}

impl HttpPortalApi {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
            token: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.config.url(path));
        let token = self.token.read().ok().and_then(|t| t.clone());
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn check(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_response(status.as_u16(), &body);
        tracing::warn!(status = status.as_u16(), error = %err, "request rejected");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, ClientError> {
        let response = Self::check(builder.send().await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))
    }
}

impl Default for HttpPortalApi {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

fn upload_form(upload: DocumentUpload) -> Result<Form, ClientError> {
    let file = Part::bytes(upload.bytes)
        .file_name(upload.filename)
        .mime_str(&upload.content_type)
        .map_err(|e| ClientError::Decode(format!("invalid content type: {e}")))?;

    let mut form = Form::new()
        .part("file", file)
        .text("document_type", upload.document_type.as_str())
        .text("family_id", upload.family_id.to_string());
    if let Some(description) = upload.description {
        form = form.text("description", description);
    }
    if !upload.tags.is_empty() {
        form = form.text("tags", upload.tags.join(","));
    }
    Ok(form)
}

impl PortalApi for HttpPortalApi {
    fn set_token(&self, token: Option<String>) {
        if let Ok(mut slot) = self.token.write() {
            *slot = token;
        }
    }

    async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ClientError> {
        Self::send_json(self.request(Method::POST, "/api/auth/login").json(request)).await
    }

    async fn current_user(&self) -> Result<User, ClientError> {
        Self::send_json(self.request(Method::GET, "/api/auth/me")).await
    }

    async fn logout(&self) -> Result<(), ClientError> {
        let response = self.request(Method::POST, "/api/auth/logout").send().await?;
        Self::check(response).await.map(|_| ())
    }

    async fn list_families(&self) -> Result<Vec<Family>, ClientError> {
        Self::send_json(self.request(Method::GET, "/api/families")).await
    }

    async fn list_documents(&self, query: &DocumentQuery) -> Result<Vec<Document>, ClientError> {
        Self::send_json(self.request(Method::GET, "/api/documents").query(query)).await
    }

    async fn upload_document(&self, upload: DocumentUpload) -> Result<Document, ClientError> {
        let form = upload_form(upload)?;
        Self::send_json(self.request(Method::POST, "/api/documents/upload").multipart(form)).await
    }

    async fn download_document(&self, id: Uuid) -> Result<DocumentDownload, ClientError> {
        let path = format!("/api/documents/{id}/download");
        Self::send_json(self.request(Method::GET, &path)).await
    }

    async fn list_meetings(&self, query: &MeetingQuery) -> Result<Vec<Meeting>, ClientError> {
        Self::send_json(self.request(Method::GET, "/api/meetings").query(query)).await
    }

    async fn create_meeting(
        &self,
        request: &CreateMeetingRequest,
    ) -> Result<Meeting, ClientError> {
        Self::send_json(self.request(Method::POST, "/api/meetings").json(request)).await
    }

    async fn list_messages(&self, query: &MessageQuery) -> Result<Vec<Message>, ClientError> {
        Self::send_json(self.request(Method::GET, "/api/messages").query(query)).await
    }

    async fn send_message(&self, request: &SendMessageRequest) -> Result<Message, ClientError> {
        Self::send_json(self.request(Method::POST, "/api/messages").json(request)).await
    }
}
