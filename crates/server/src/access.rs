//! Family and document authorization rules.

use shared_types::{AppError, Document, User, UserRole};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Outcome of the role-only part of a family access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FamilyAccess {
    Granted,
    Denied,
    /// Advisors need a meeting or message with the family on record.
    NeedsEngagement,
}

pub fn family_access(user: &User, family_id: Uuid) -> FamilyAccess {
    match user.role {
        UserRole::Admin | UserRole::FamilyOfficeAdmin => FamilyAccess::Granted,
        UserRole::FamilyMember if user.family_id == Some(family_id) => FamilyAccess::Granted,
        UserRole::FamilyMember => FamilyAccess::Denied,
        UserRole::Advisor => FamilyAccess::NeedsEngagement,
    }
}

pub async fn can_access_family(
    pool: &Pool<Postgres>,
    user: &User,
    family_id: Uuid,
) -> Result<bool, AppError> {
    match family_access(user, family_id) {
        FamilyAccess::Granted => Ok(true),
        FamilyAccess::Denied => Ok(false),
        FamilyAccess::NeedsEngagement => {
            crate::repo::families::advisor_is_engaged(pool, user.id, family_id).await
        }
    }
}

/// 403 unless the user may act within the family.
pub async fn require_family_access(
    pool: &Pool<Postgres>,
    user: &User,
    family_id: Uuid,
) -> Result<(), AppError> {
    if can_access_family(pool, user, family_id).await? {
        Ok(())
    } else {
        tracing::warn!(user_id = %user.id, %family_id, "family access denied");
        Err(AppError::forbidden("No access to this family"))
    }
}

/// A non-empty permission list restricts a document to the listed users.
pub fn document_permits(user: &User, document: &Document) -> bool {
    document.access_permissions.is_empty() || document.access_permissions.contains(&user.id)
}

pub async fn can_access_document(
    pool: &Pool<Postgres>,
    user: &User,
    document: &Document,
) -> Result<bool, AppError> {
    if !document_permits(user, document) {
        return Ok(false);
    }
    can_access_family(pool, user, document.family_id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use shared_types::DocumentType;

    fn user(role: UserRole, family_id: Option<Uuid>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "someone@demo.com".to_string(),
            first_name: "Some".to_string(),
            last_name: "One".to_string(),
            role,
            family_office_id: Uuid::new_v4(),
            family_id,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn document(family_id: Uuid, access_permissions: Vec<Uuid>) -> Document {
        Document {
            id: Uuid::new_v4(),
            filename: "stored.pdf".to_string(),
            original_filename: "plan.pdf".to_string(),
            document_type: DocumentType::Report,
            description: None,
            tags: vec![],
            file_size: 10,
            content_type: "application/pdf".to_string(),
            family_id,
            uploaded_by: Uuid::new_v4(),
            uploaded_at: Utc::now(),
            access_permissions,
            is_active: true,
        }
    }

    #[test]
    fn admins_reach_every_family() {
        let family = Uuid::new_v4();
        assert_eq!(family_access(&user(UserRole::Admin, None), family), FamilyAccess::Granted);
        assert_eq!(
            family_access(&user(UserRole::FamilyOfficeAdmin, None), family),
            FamilyAccess::Granted
        );
    }

    #[test]
    fn members_reach_only_their_family() {
        let own = Uuid::new_v4();
        let member = user(UserRole::FamilyMember, Some(own));
        assert_eq!(family_access(&member, own), FamilyAccess::Granted);
        assert_eq!(family_access(&member, Uuid::new_v4()), FamilyAccess::Denied);
        let orphan = user(UserRole::FamilyMember, None);
        assert_eq!(family_access(&orphan, own), FamilyAccess::Denied);
    }

    #[test]
    fn advisors_need_engagement() {
        let advisor = user(UserRole::Advisor, None);
        assert_eq!(
            family_access(&advisor, Uuid::new_v4()),
            FamilyAccess::NeedsEngagement
        );
    }

    #[test]
    fn permission_list_restricts_documents() {
        let reader = user(UserRole::FamilyMember, None);
        let family = Uuid::new_v4();
        assert!(document_permits(&reader, &document(family, vec![])));
        assert!(document_permits(&reader, &document(family, vec![reader.id])));
        assert!(!document_permits(&reader, &document(family, vec![Uuid::new_v4()])));
    }
}
