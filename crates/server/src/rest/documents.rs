use std::collections::HashMap;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use shared_types::{
    parse_tags, AppError, Document, DocumentDownload, DocumentQuery, DocumentType,
};

use crate::access;
use crate::auth::extractors::AuthRequired;
use crate::repo::documents::NewDocument;

/// Fields collected from an upload form.
#[derive(Debug, Default)]
struct UploadForm {
    file: Option<(String, String, Vec<u8>)>,
    document_type: Option<String>,
    family_id: Option<String>,
    description: Option<String>,
    tags: Option<String>,
}

fn field_error(field: &str, message: &str) -> AppError {
    let mut errors = HashMap::new();
    errors.insert(field.to_string(), message.to_string());
    AppError::validation(message, errors)
}

async fn read_upload_form(multipart: &mut Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();
    let limit = crate::config::max_upload_bytes();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::validation(e.to_string(), Default::default()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let filename = field
                .file_name()
                .map(str::to_string)
                .filter(|f| !f.trim().is_empty())
                .ok_or_else(|| field_error("file", "Uploaded file must have a name"))?;
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::validation(e.to_string(), Default::default()))?;
            if data.len() > limit {
                return Err(AppError::payload_too_large(format!(
                    "File exceeds the {} byte upload limit",
                    limit
                )));
            }
            form.file = Some((filename, content_type, data.to_vec()));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::validation(e.to_string(), Default::default()))?;
        match name.as_str() {
            "document_type" => form.document_type = Some(value),
            "family_id" => form.family_id = Some(value),
            "description" => form.description = Some(value),
            "tags" => form.tags = Some(value),
            other => tracing::debug!(field = other, "ignoring unknown upload field"),
        }
    }

    Ok(form)
}

#[utoipa::path(
    post,
    path = "/api/documents/upload",
    request_body(content_type = "multipart/form-data", description = "file, document_type, family_id, description, tags"),
    responses(
        (status = 201, description = "Document stored", body = Document),
        (status = 400, description = "Family ID is required", body = AppError),
        (status = 403, description = "No access to this family", body = AppError),
        (status = 413, description = "File too large", body = AppError),
        (status = 422, description = "Validation error", body = AppError)
    ),
    tag = "documents",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth, multipart))]
pub async fn upload_document(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let user = auth.0;
    let form = read_upload_form(&mut multipart).await?;

    let family_id = form
        .family_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::bad_request("Family ID is required"))?;
    let family_id = Uuid::parse_str(family_id)
        .map_err(|_| field_error("family_id", "Family ID must be a valid UUID"))?;

    let document_type = match form.document_type.as_deref().map(str::trim) {
        None | Some("") => DocumentType::Other,
        Some(raw) => DocumentType::parse(raw)
            .ok_or_else(|| field_error("document_type", "Unknown document type"))?,
    };

    let (original_filename, content_type, content) =
        form.file.ok_or_else(|| field_error("file", "No file provided"))?;

    access::require_family_access(&pool, &user, family_id).await?;

    let tags = form.tags.as_deref().map(parse_tags).unwrap_or_default();
    let description = form
        .description
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());
    let stored_name = format!("{}_{}", Uuid::new_v4(), original_filename);

    let document = crate::repo::documents::create(
        &pool,
        NewDocument {
            filename: &stored_name,
            original_filename: &original_filename,
            document_type,
            description,
            tags: &tags,
            content_type: &content_type,
            content: &content,
            family_id,
            uploaded_by: user.id,
        },
    )
    .await?;

    tracing::info!(
        document_id = %document.id,
        %family_id,
        size = document.file_size,
        "document uploaded"
    );
    Ok((StatusCode::CREATED, Json(document)))
}

#[utoipa::path(
    get,
    path = "/api/documents",
    params(DocumentQuery),
    responses(
        (status = 200, description = "Active documents the caller may read", body = Vec<Document>),
        (status = 401, description = "Not authenticated", body = AppError),
        (status = 403, description = "No access to this family", body = AppError)
    ),
    tag = "documents",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn list_documents(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Query(params): Query<DocumentQuery>,
) -> Result<Json<Vec<Document>>, AppError> {
    let user = auth.0;
    if let Some(family_id) = params.family_id {
        access::require_family_access(&pool, &user, family_id).await?;
    }

    let documents =
        crate::repo::documents::list_active(&pool, params.family_id, params.document_type).await?;

    // One family check per family, however many documents it holds.
    let mut family_allowed: HashMap<Uuid, bool> = HashMap::new();
    let mut visible = Vec::with_capacity(documents.len());
    for document in documents {
        if !access::document_permits(&user, &document) {
            continue;
        }
        let allowed = match family_allowed.get(&document.family_id) {
            Some(allowed) => *allowed,
            None => {
                let allowed = access::can_access_family(&pool, &user, document.family_id).await?;
                family_allowed.insert(document.family_id, allowed);
                allowed
            }
        };
        if allowed {
            visible.push(document);
        }
    }

    Ok(Json(visible))
}

#[utoipa::path(
    get,
    path = "/api/documents/{id}/download",
    params(("id" = Uuid, Path, description = "Document UUID")),
    responses(
        (status = 200, description = "Base64 file content", body = DocumentDownload),
        (status = 403, description = "No access to this document", body = AppError),
        (status = 404, description = "Document not found", body = AppError)
    ),
    tag = "documents",
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(pool, auth))]
pub async fn download_document(
    State(pool): State<Pool<Postgres>>,
    auth: AuthRequired,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentDownload>, AppError> {
    let user = auth.0;
    let document = crate::repo::documents::find_active_by_id(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Document not found"))?;

    if !access::can_access_document(&pool, &user, &document).await? {
        tracing::warn!(user_id = %user.id, document_id = %id, "document access denied");
        return Err(AppError::forbidden("No access to this document"));
    }

    let content = crate::repo::documents::find_content(&pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Document not found"))?;

    Ok(Json(DocumentDownload::encode(
        content.original_filename,
        content.content_type,
        &content.content,
    )))
}
