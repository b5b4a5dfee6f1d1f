//! Typed client for the family office portal REST API.
//!
//! Screens hold their state in plain view models and talk to the backend
//! through [`PortalApi`], so the same logic runs in the Dioxus app and in
//! tests against an in-memory fake.

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod http;
pub mod notify;
pub mod screens;
pub mod session;

pub use api::{DocumentUpload, PortalApi};
pub use config::ClientConfig;
pub use error::ClientError;
pub use guard::{guard_route, GuardDecision};
pub use http::HttpPortalApi;
pub use notify::{Notice, NoticeLevel, Notifications};
pub use session::{MemorySessionStore, PersistedSession, SessionContext, SessionStore};

#[cfg(test)]
pub(crate) mod testing;
