use shared_types::{
    filter_documents, parse_tags, Document, DocumentQuery, DocumentType, DownloadedFile, Family,
};
use uuid::Uuid;

use crate::api::{DocumentUpload, PortalApi};
use crate::error::ClientError;
use crate::notify::Notifications;
use crate::screens::keep_edits;

/// A file read from the browser's file input.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UploadForm {
    pub file: Option<SelectedFile>,
    pub document_type: DocumentType,
    pub family_id: Option<Uuid>,
    pub description: String,
    /// Comma-separated.
    pub tags: String,
}

impl UploadForm {
    fn merge(&mut self, before: &Self, after: Self) {
        keep_edits(&mut self.file, &before.file, after.file);
        keep_edits(&mut self.document_type, &before.document_type, after.document_type);
        keep_edits(&mut self.family_id, &before.family_id, after.family_id);
        keep_edits(&mut self.description, &before.description, after.description);
        keep_edits(&mut self.tags, &before.tags, after.tags);
    }

    /// Build the upload, or say what is missing.
    pub fn to_upload(&self) -> Result<DocumentUpload, &'static str> {
        let file = self.file.as_ref().ok_or("Please choose a file to upload")?;
        let family_id = self.family_id.ok_or("Please choose a family")?;
        let content_type = if file.content_type.is_empty() {
            "application/octet-stream".to_string()
        } else {
            file.content_type.clone()
        };
        let description = self.description.trim();
        Ok(DocumentUpload {
            filename: file.name.clone(),
            content_type,
            bytes: file.bytes.clone(),
            document_type: self.document_type,
            family_id,
            description: (!description.is_empty()).then(|| description.to_string()),
            tags: parse_tags(&self.tags),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentsView {
    pub documents: Vec<Document>,
    pub families: Vec<Family>,
    pub search: String,
    /// A `DocumentType` string, or empty for every type.
    pub type_filter: String,
    pub loading: bool,
    pub upload: UploadForm,
    pub uploading: bool,
}

impl DocumentsView {
    /// Documents matching the search box and type filter.
    pub fn visible(&self) -> Vec<&Document> {
        filter_documents(&self.documents, &self.search, &self.type_filter)
    }

    /// Fold a finished request on `before` back into this live view.
    pub fn merge(&mut self, before: &Self, after: Self) {
        self.documents = after.documents;
        self.families = after.families;
        self.loading = after.loading;
        self.uploading = after.uploading;
        keep_edits(&mut self.search, &before.search, after.search);
        keep_edits(&mut self.type_filter, &before.type_filter, after.type_filter);
        self.upload.merge(&before.upload, after.upload);
    }

    pub async fn load<A: PortalApi>(&mut self, api: &A, notices: &mut Notifications) {
        self.loading = true;
        match api.list_documents(&DocumentQuery::default()).await {
            Ok(documents) => self.documents = documents,
            Err(err) => notices.failure("Failed to load documents", &err),
        }
        self.loading = false;
    }

    /// Families for the upload form. Defaults the form to the first one.
    pub async fn load_families<A: PortalApi>(&mut self, api: &A, notices: &mut Notifications) {
        match api.list_families().await {
            Ok(families) => {
                if self.upload.family_id.is_none() {
                    self.upload.family_id = families.first().map(|f| f.id);
                }
                self.families = families;
            }
            Err(err) => notices.failure("Failed to load families", &err),
        }
    }

    /// Upload the form's file, then reload the list. Returns whether the
    /// upload went through.
    pub async fn submit_upload<A: PortalApi>(
        &mut self,
        api: &A,
        notices: &mut Notifications,
    ) -> bool {
        let upload = match self.upload.to_upload() {
            Ok(upload) => upload,
            Err(message) => {
                notices.error(message);
                return false;
            }
        };

        self.uploading = true;
        let result = api.upload_document(upload).await;
        self.uploading = false;

        match result {
            Ok(document) => {
                tracing::info!(document_id = %document.id, "document uploaded");
                notices.success("Document uploaded successfully");
                let family_id = self.upload.family_id;
                self.upload = UploadForm {
                    family_id,
                    ..UploadForm::default()
                };
                self.load(api, notices).await;
                true
            }
            Err(err) => {
                notices.failure("Failed to upload document", &err);
                false
            }
        }
    }

    /// Fetch and decode a document for saving.
    pub async fn download<A: PortalApi>(
        api: &A,
        notices: &mut Notifications,
        id: Uuid,
    ) -> Option<DownloadedFile> {
        let result = match api.download_document(id).await {
            Ok(payload) => payload.decode().map_err(ClientError::from),
            Err(err) => Err(err),
        };
        match result {
            Ok(file) => Some(file),
            Err(err) => {
                notices.failure("Failed to download document", &err);
                None
            }
        }
    }
}
