use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Portal user role.
///
/// - `Admin`: platform operator, sees every office and family.
/// - `FamilyOfficeAdmin`: runs one family office and its families.
/// - `Advisor`: works with the families they meet or message.
/// - `FamilyMember`: belongs to exactly one family.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::Type))]
#[cfg_attr(
    feature = "server",
    sqlx(type_name = "user_role", rename_all = "snake_case")
)]
pub enum UserRole {
    Admin,
    FamilyOfficeAdmin,
    Advisor,
    FamilyMember,
}

impl UserRole {
    /// Lowercase string for database / JWT storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::FamilyOfficeAdmin => "family_office_admin",
            UserRole::Advisor => "advisor",
            UserRole::FamilyMember => "family_member",
        }
    }

    /// Parse from the JWT `role` claim.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(UserRole::Admin),
            "family_office_admin" => Some(UserRole::FamilyOfficeAdmin),
            "advisor" => Some(UserRole::Advisor),
            "family_member" => Some(UserRole::FamilyMember),
            _ => None,
        }
    }

    /// Human readable label for the navbar and dashboard greeting.
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Admin => "Administrator",
            UserRole::FamilyOfficeAdmin => "Family Office Admin",
            UserRole::Advisor => "Advisor",
            UserRole::FamilyMember => "Family Member",
        }
    }

    /// Admins and family office admins see every family in scope.
    pub fn manages_families(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::FamilyOfficeAdmin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A portal account. The password hash never leaves the server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub family_office_id: Uuid,
    pub family_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}
