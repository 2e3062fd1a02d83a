//! # Session State
//!
//! Holds the signed-in administrator and the bearer token. The token is mirrored into the
//! [`CredentialSlot`] the HTTP transport reads, and persisted through a
//! [`CredentialStore`] so a restart can pick the session back up.
//!
//! ```rust
//! use admin_console::credentials::MemoryCredentialStore;
//! use admin_console::session::Session;
//! use store_framework::mock::MockTransport;
//! use store_framework::CredentialSlot;
//! use std::sync::Arc;
//!
//! let session = Session::new(
//!     Arc::new(MockTransport::new()),
//!     CredentialSlot::new(),
//!     Arc::new(MemoryCredentialStore::new()),
//! );
//! assert!(!session.restore().unwrap());
//! assert!(!session.is_authenticated());
//! ```

use crate::credentials::{CredentialStore, IDENTITY_ENTRY, TOKEN_ENTRY};
use crate::error::ConsoleError;
use crate::model::{AdminRole, Identity, LoginRequest, LoginResponse};
use std::sync::Arc;
use store_framework::{ApiRequest, CredentialSlot, Transport};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

pub const LOGIN_PATH: &str = "/auth/login";
const LOGIN_FAILED: &str = "Login failed";
const MISSING_CREDENTIALS: &str = "Email and password are required";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    identity: Option<Identity>,
    token: Option<String>,
    is_loading: bool,
    error: Option<String>,
}

impl SessionState {
    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some() && self.token.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Cloneable handle to the Session State.
#[derive(Clone)]
pub struct Session {
    transport: Arc<dyn Transport>,
    slot: CredentialSlot,
    credentials: Arc<dyn CredentialStore>,
    state: Arc<watch::Sender<SessionState>>,
}

impl Session {
    pub fn new(
        transport: Arc<dyn Transport>,
        slot: CredentialSlot,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            transport,
            slot,
            credentials,
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn has_role(&self, role: AdminRole) -> bool {
        self.has_any_role(&[role])
    }

    pub fn has_any_role(&self, roles: &[AdminRole]) -> bool {
        self.state
            .borrow()
            .identity
            .as_ref()
            .is_some_and(|identity| roles.contains(&identity.role))
    }

    /// Picks up a persisted session.
    ///
    /// Both entries must be present and the identity must parse. A half-written or corrupt
    /// pair is removed and the session starts signed out. Returns whether a session was
    /// restored.
    #[instrument(skip(self))]
    pub fn restore(&self) -> Result<bool, ConsoleError> {
        let token = self.credentials.read(TOKEN_ENTRY)?;
        let identity = self.credentials.read(IDENTITY_ENTRY)?;

        let (token, identity) = match (token, identity) {
            (None, None) => return Ok(false),
            (Some(token), Some(identity)) => (token, identity),
            _ => {
                warn!("Incomplete stored session, discarding");
                self.forget()?;
                return Ok(false);
            }
        };
        let identity: Identity = match serde_json::from_str(&identity) {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "Stored identity does not parse, discarding");
                self.forget()?;
                return Ok(false);
            }
        };

        info!(user = %identity.email, "Session restored");
        self.slot.set(token.clone());
        self.state.send_replace(SessionState {
            identity: Some(identity),
            token: Some(token),
            is_loading: false,
            error: None,
        });
        Ok(true)
    }

    /// Signs in and persists the session.
    ///
    /// On failure the session is left as it was and the error field holds the server's
    /// message, or "Login failed" when there is none.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, ConsoleError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(self.fail(MISSING_CREDENTIALS.to_owned()));
        }
        let body = serde_json::to_value(LoginRequest {
            email: email.trim().to_owned(),
            password: password.to_owned(),
        })?;
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error = None;
        });
        let response = match self
            .transport
            .send(ApiRequest::post(LOGIN_PATH).json(body))
            .await
        {
            Ok(body) => body,
            Err(e) => {
                let message = e.message().unwrap_or(LOGIN_FAILED).to_owned();
                return Err(self.fail(message));
            }
        };
        let LoginResponse { token, user } = match serde_json::from_value(response) {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Login response does not decode");
                return Err(self.fail(LOGIN_FAILED.to_owned()));
            }
        };

        self.slot.set(token.clone());
        self.state.send_replace(SessionState {
            identity: Some(user.clone()),
            token: Some(token.clone()),
            is_loading: false,
            error: None,
        });
        info!(user = %user.email, role = %user.role, "Signed in");

        if let Err(e) = self.persist(&token, &user) {
            warn!(error = %e, "Session could not be persisted");
        }
        Ok(user)
    }

    /// Signs out and removes the persisted session.
    #[instrument(skip(self))]
    pub fn logout(&self) -> Result<(), ConsoleError> {
        self.slot.clear();
        self.state.send_replace(SessionState::default());
        info!("Signed out");
        self.forget()
    }

    fn fail(&self, message: String) -> ConsoleError {
        warn!(%message, "Login failed");
        self.state.send_modify(|state| {
            state.is_loading = false;
            state.error = Some(message.clone());
        });
        ConsoleError::Auth(message)
    }

    fn persist(&self, token: &str, identity: &Identity) -> Result<(), ConsoleError> {
        let identity = serde_json::to_string(identity)?;
        self.credentials.write(TOKEN_ENTRY, token)?;
        self.credentials.write(IDENTITY_ENTRY, &identity)
    }

    fn forget(&self) -> Result<(), ConsoleError> {
        let token = self.credentials.remove(TOKEN_ENTRY);
        let identity = self.credentials.remove(IDENTITY_ENTRY);
        token.and(identity)
    }
}
