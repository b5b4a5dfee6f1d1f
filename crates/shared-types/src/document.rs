use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of document stored in a family vault.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::Type))]
#[cfg_attr(
    feature = "server",
    sqlx(type_name = "document_type", rename_all = "snake_case")
)]
pub enum DocumentType {
    Contract,
    Report,
    TaxReturn,
    InvestmentDocument,
    MeetingNotes,
    #[default]
    Other,
}

impl DocumentType {
    pub const ALL: [DocumentType; 6] = [
        DocumentType::Contract,
        DocumentType::Report,
        DocumentType::TaxReturn,
        DocumentType::InvestmentDocument,
        DocumentType::MeetingNotes,
        DocumentType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Contract => "contract",
            DocumentType::Report => "report",
            DocumentType::TaxReturn => "tax_return",
            DocumentType::InvestmentDocument => "investment_document",
            DocumentType::MeetingNotes => "meeting_notes",
            DocumentType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Contract => "Contract",
            DocumentType::Report => "Report",
            DocumentType::TaxReturn => "Tax Return",
            DocumentType::InvestmentDocument => "Investment Document",
            DocumentType::MeetingNotes => "Meeting Notes",
            DocumentType::Other => "Other",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

/// Document metadata. Content is only served by the download endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct Document {
    pub id: Uuid,
    /// Stored name, unique per upload.
    pub filename: String,
    pub original_filename: String,
    pub document_type: DocumentType,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub file_size: i64,
    pub content_type: String,
    pub family_id: Uuid,
    pub uploaded_by: Uuid,
    pub uploaded_at: DateTime<Utc>,
    /// When non-empty, only these users may see the document.
    pub access_permissions: Vec<Uuid>,
    pub is_active: bool,
}

/// Filters for `GET /api/documents`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[cfg_attr(feature = "openapi", into_params(parameter_in = Query))]
pub struct DocumentQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_type: Option<DocumentType>,
}

/// Body of `GET /api/documents/{id}/download`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct DocumentDownload {
    pub filename: String,
    pub content_type: String,
    /// Standard base64 of the raw bytes.
    pub file_content: String,
}

/// A decoded download ready to hand to the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadedFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DownloadDecodeError(pub String);

impl std::fmt::Display for DownloadDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "could not decode download: {}", self.0)
    }
}

impl std::error::Error for DownloadDecodeError {}

impl DocumentDownload {
    pub fn encode(filename: String, content_type: String, bytes: &[u8]) -> Self {
        Self {
            filename,
            content_type,
            file_content: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    pub fn decode(&self) -> Result<DownloadedFile, DownloadDecodeError> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(self.file_content.trim())
            .map_err(|e| DownloadDecodeError(e.to_string()))?;
        let content_type = if self.content_type.is_empty() {
            "application/octet-stream".to_string()
        } else {
            self.content_type.clone()
        };
        Ok(DownloadedFile {
            filename: self.filename.clone(),
            content_type,
            bytes,
        })
    }
}

impl DownloadedFile {
    /// `data:` URL usable as the `href` of a download anchor.
    pub fn to_data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.content_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// Split a comma separated tag field, dropping blanks.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keep documents matching the search term and type filter.
///
/// The term matches case-insensitively, as typed, against the original
/// filename or the description; a blank term matches everything. The type
/// filter is a `DocumentType` string compared exactly, empty for every type.
pub fn filter_documents<'a>(
    documents: &'a [Document],
    search: &str,
    type_filter: &str,
) -> Vec<&'a Document> {
    let needle = search.to_lowercase();
    let any_text = search.trim().is_empty();
    documents
        .iter()
        .filter(|doc| {
            any_text
                || doc.original_filename.to_lowercase().contains(&needle)
                || doc
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(&needle))
        })
        .filter(|doc| type_filter.is_empty() || doc.document_type.as_str() == type_filter)
        .collect()
}

/// "1.4 MB" style size for tables.
pub fn human_file_size(bytes: i64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes.max(0) as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes.max(0), UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
