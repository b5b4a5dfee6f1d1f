use shared_types::{AppError, Document, DocumentType};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::error_convert::SqlxErrorExt;

/// Everything needed to store an uploaded file.
#[derive(Debug)]
pub struct NewDocument<'a> {
    pub filename: &'a str,
    pub original_filename: &'a str,
    pub document_type: DocumentType,
    pub description: Option<&'a str>,
    pub tags: &'a [String],
    pub content_type: &'a str,
    pub content: &'a [u8],
    pub family_id: Uuid,
    pub uploaded_by: Uuid,
}

/// Stored bytes plus the metadata needed to serve them.
#[derive(Debug, sqlx::FromRow)]
pub struct DocumentContent {
    pub original_filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

pub async fn create(pool: &Pool<Postgres>, doc: NewDocument<'_>) -> Result<Document, AppError> {
    sqlx::query_as::<_, Document>(
        r#"
        INSERT INTO documents (id, filename, original_filename, document_type, description,
                               tags, file_size, content_type, content, family_id, uploaded_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id, filename, original_filename, document_type, description, tags,
                  file_size, content_type, family_id, uploaded_by, uploaded_at,
                  access_permissions, is_active
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(doc.filename)
    .bind(doc.original_filename)
    .bind(doc.document_type)
    .bind(doc.description)
    .bind(doc.tags)
    .bind(doc.content.len() as i64)
    .bind(doc.content_type)
    .bind(doc.content)
    .bind(doc.family_id)
    .bind(doc.uploaded_by)
    .fetch_one(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

/// Active documents, newest first, optionally narrowed by family and type.
pub async fn list_active(
    pool: &Pool<Postgres>,
    family_id: Option<Uuid>,
    document_type: Option<DocumentType>,
) -> Result<Vec<Document>, AppError> {
    sqlx::query_as::<_, Document>(
        r#"
        SELECT id, filename, original_filename, document_type, description, tags,
               file_size, content_type, family_id, uploaded_by, uploaded_at,
               access_permissions, is_active
        FROM documents
        WHERE is_active
          AND ($1::uuid IS NULL OR family_id = $1)
          AND ($2::document_type IS NULL OR document_type = $2)
        ORDER BY uploaded_at DESC, id
        "#,
    )
    .bind(family_id)
    .bind(document_type)
    .fetch_all(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_active_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<Document>, AppError> {
    sqlx::query_as::<_, Document>(
        r#"
        SELECT id, filename, original_filename, document_type, description, tags,
               file_size, content_type, family_id, uploaded_by, uploaded_at,
               access_permissions, is_active
        FROM documents
        WHERE id = $1 AND is_active
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}

pub async fn find_content(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DocumentContent>, AppError> {
    sqlx::query_as::<_, DocumentContent>(
        "SELECT original_filename, content_type, content FROM documents WHERE id = $1 AND is_active",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(SqlxErrorExt::into_app_error)
}
