use client::{ClientError, HttpPortalApi, MemorySessionStore, SessionContext};
use dioxus::prelude::*;
use shared_types::User;

pub type PortalSession = SessionContext<HttpPortalApi, MemorySessionStore>;

/// Session shared by every screen.
///
/// Async operations run on a clone of the session and write it back when
/// they finish, so no signal borrow is held across an await.
#[derive(Clone, Copy)]
pub struct AuthState {
    pub session: Signal<PortalSession>,
}

impl AuthState {
    pub fn new() -> Self {
        let api = HttpPortalApi::default();
        Self {
            session: Signal::new(SessionContext::new(api, MemorySessionStore::default())),
        }
    }

    /// API handle carrying the current token.
    pub fn api(&self) -> HttpPortalApi {
        self.session.read().api().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.session.read().current_user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    pub fn is_hydrated(&self) -> bool {
        self.session.read().is_hydrated()
    }

    pub async fn hydrate(mut self) {
        let mut session = self.session.peek().clone();
        session.hydrate().await;
        self.session.set(session);
    }

    pub async fn login(mut self, email: String, password: String) -> Result<User, ClientError> {
        let mut session = self.session.peek().clone();
        let user = session.login(&email, &password).await?.clone();
        self.session.set(session);
        Ok(user)
    }

    pub async fn logout(mut self) {
        let mut session = self.session.peek().clone();
        session.logout().await;
        self.session.set(session);
    }

    /// Drop the session after the backend rejected it. The guard then
    /// redirects to login.
    pub fn expire(mut self) {
        tracing::info!("session expired");
        self.session.with_mut(|session| session.teardown());
    }
}

pub fn use_auth() -> AuthState {
    use_context::<AuthState>()
}
