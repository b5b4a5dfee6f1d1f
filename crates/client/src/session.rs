use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use shared_types::{LoginRequest, User};

use crate::api::PortalApi;
use crate::error::ClientError;

/// What survives a page reload.
///
/// `access_token` is `None` when the session rides on the HTTP-only cookie
/// alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub access_token: Option<String>,
    pub user: User,
}

/// Storage for the session between page loads.
pub trait SessionStore {
    fn load(&self) -> Option<PersistedSession>;
    fn save(&self, session: &PersistedSession);
    fn clear(&self);
}

/// Keeps the session for the lifetime of the process only.
#[derive(Debug, Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<Mutex<Option<PersistedSession>>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<PersistedSession> {
        self.inner.lock().ok().and_then(|s| s.clone())
    }

    fn save(&self, session: &PersistedSession) {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = Some(session.clone());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.inner.lock() {
            *slot = None;
        }
    }
}

/// The authenticated user and token shared by every screen.
///
/// Lifecycle: [`hydrate`](Self::hydrate) once at startup, [`login`](Self::login)
/// from the login form, [`teardown`](Self::teardown) on logout or when any
/// request comes back 401.
#[derive(Clone)]
pub struct SessionContext<A, S> {
    api: A,
    store: S,
    session: Option<PersistedSession>,
    hydrated: bool,
}

impl<A: PortalApi, S: SessionStore> SessionContext<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self {
            api,
            store,
            session: None,
            hydrated: false,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Whether [`hydrate`](Self::hydrate) has finished.
    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    /// Restore the stored session and confirm it with the backend.
    ///
    /// A 401 clears everything. Other failures keep the stored user so a
    /// flaky network does not log anyone out.
    pub async fn hydrate(&mut self) -> Option<&User> {
        let stored = self.store.load();
        let token = stored.as_ref().and_then(|s| s.access_token.clone());
        self.api.set_token(token.clone());

        match self.api.current_user().await {
            Ok(user) => {
                let session = PersistedSession {
                    access_token: token,
                    user,
                };
                self.store.save(&session);
                self.session = Some(session);
            }
            Err(err) if err.is_unauthorized() => {
                tracing::debug!("no active session");
                self.teardown();
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not confirm stored session");
                self.session = stored;
            }
        }
        self.hydrated = true;
        self.current_user()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User, ClientError> {
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.api.login(&request).await?;
        self.api.set_token(Some(response.access_token.clone()));

        let session = PersistedSession {
            access_token: Some(response.access_token),
            user: response.user,
        };
        self.store.save(&session);
        tracing::info!(user_id = %session.user.id, role = %session.user.role, "logged in");
        self.hydrated = true;
        Ok(&self.session.insert(session).user)
    }

    /// Tell the backend, then drop local state whatever it answered.
    pub async fn logout(&mut self) {
        if let Err(err) = self.api.logout().await {
            tracing::warn!(error = %err, "logout request failed");
        }
        self.teardown();
    }

    pub fn teardown(&mut self) {
        self.api.set_token(None);
        self.store.clear();
        self.session = None;
    }

    /// Tear the session down if `err` says it expired. Returns whether it did.
    pub fn handle_error(&mut self, err: &ClientError) -> bool {
        if err.is_unauthorized() && self.session.is_some() {
            tracing::info!("session expired");
            self.teardown();
            return true;
        }
        false
    }
}
