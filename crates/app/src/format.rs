//! Display helpers shared by the screens.

use chrono::{DateTime, Utc};
use shared_types::{DocumentType, MeetingStatus, UserRole};
use shared_ui::BadgeVariant;
use uuid::Uuid;

/// "Jun 1, 2024"
pub fn format_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

/// "Jun 1, 2024 2:30 PM UTC"
pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y %-I:%M %p UTC").to_string()
}

/// First eight hex digits, enough to tell people apart in a list.
pub fn short_id(id: Uuid) -> String {
    id.simple().to_string()[..8].to_string()
}

/// Cut long message bodies for inbox rows.
pub fn preview(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(max_chars).collect();
    format!("{}…", cut.trim_end())
}

pub fn meeting_status_variant(status: MeetingStatus) -> BadgeVariant {
    match status {
        MeetingStatus::Scheduled => BadgeVariant::Primary,
        MeetingStatus::Confirmed => BadgeVariant::Success,
        MeetingStatus::Completed => BadgeVariant::Secondary,
        MeetingStatus::Cancelled => BadgeVariant::Destructive,
    }
}

pub fn document_type_variant(document_type: DocumentType) -> BadgeVariant {
    match document_type {
        DocumentType::Contract | DocumentType::TaxReturn => BadgeVariant::Primary,
        DocumentType::Report | DocumentType::InvestmentDocument => BadgeVariant::Secondary,
        DocumentType::MeetingNotes | DocumentType::Other => BadgeVariant::Outline,
    }
}

pub fn role_variant(role: UserRole) -> BadgeVariant {
    match role {
        UserRole::Admin => BadgeVariant::Destructive,
        UserRole::FamilyOfficeAdmin => BadgeVariant::Warning,
        UserRole::Advisor => BadgeVariant::Primary,
        UserRole::FamilyMember => BadgeVariant::Secondary,
    }
}
