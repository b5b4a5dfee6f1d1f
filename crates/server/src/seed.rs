//! Demo data loaded at startup when the `demo_seed` flag is on.
//!
//! Seeding is idempotent: rows are looked up by name or email first and
//! only created when missing.

use shared_types::{AppError, RegisterRequest, UserRole};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::auth::password;
use crate::repo;

pub const DEMO_OFFICE_NAME: &str = "Demo Family Office";
pub const DEMO_FAMILY_NAME: &str = "Demo Family";
pub const DEMO_ADMIN_EMAIL: &str = "admin@demo.com";
pub const DEMO_MEMBER_EMAIL: &str = "member@demo.com";

/// Ids of the seeded rows, for callers that build on top of the demo data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoData {
    pub family_office_id: Uuid,
    pub family_id: Uuid,
}

struct DemoUser {
    email: &'static str,
    password_var: &'static str,
    default_password: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    role: UserRole,
    in_family: bool,
}

const DEMO_USERS: [DemoUser; 2] = [
    DemoUser {
        email: DEMO_ADMIN_EMAIL,
        password_var: "DEMO_ADMIN_PASSWORD",
        default_password: "admin123",
        first_name: "Admin",
        last_name: "User",
        role: UserRole::Admin,
        in_family: false,
    },
    DemoUser {
        email: DEMO_MEMBER_EMAIL,
        password_var: "DEMO_MEMBER_PASSWORD",
        default_password: "member123",
        first_name: "Family",
        last_name: "Member",
        role: UserRole::FamilyMember,
        in_family: true,
    },
];

pub async fn seed_demo_data(pool: &Pool<Postgres>) -> Result<DemoData, AppError> {
    let office = match repo::family_offices::find_by_name(pool, DEMO_OFFICE_NAME).await? {
        Some(office) => office,
        None => {
            repo::family_offices::create(
                pool,
                DEMO_OFFICE_NAME,
                Some("Demo family office for testing"),
            )
            .await?
        }
    };

    let family = match repo::families::find_by_name(pool, office.id, DEMO_FAMILY_NAME).await? {
        Some(family) => family,
        None => repo::families::create(pool, DEMO_FAMILY_NAME, office.id).await?,
    };

    for demo in &DEMO_USERS {
        if repo::users::email_exists(pool, demo.email).await? {
            continue;
        }
        let plain = std::env::var(demo.password_var)
            .ok()
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| demo.default_password.to_string());
        let hash =
            password::hash_password(&plain).map_err(|e| AppError::internal(e.to_string()))?;
        let request = RegisterRequest {
            email: demo.email.to_string(),
            password: plain,
            first_name: demo.first_name.to_string(),
            last_name: demo.last_name.to_string(),
            role: demo.role,
            family_office_id: office.id,
            family_id: demo.in_family.then_some(family.id),
        };
        let user = repo::users::create(pool, &request, demo.email, &hash).await?;
        tracing::info!(user_id = %user.id, email = demo.email, "seeded demo user");
    }

    tracing::info!(office_id = %office.id, family_id = %family.id, "demo data ready");
    Ok(DemoData {
        family_office_id: office.id,
        family_id: family.id,
    })
}
