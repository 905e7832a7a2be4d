//! Session lifecycle: login, restore, sign-out.
//!
//! The manager is the sole owner of the in-memory identity, the durable
//! credential store, and the ambient auth headers. It is constructed once at
//! process start and shared by `Arc` for the process lifetime.

use std::sync::Arc;

use meetflow_protocol::{LoginRequest, Role, SessionUser};
use parking_lot::{Mutex, RwLock};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::SESSION_TTL_SECS;
use crate::api;
use crate::error::{Error, Result};
use crate::notify::{Notifier, Severity};
use crate::store::{CredentialStore, KEY_ACCESS_TOKEN, KEY_REFRESH_TOKEN, KEY_USER};
use crate::transport::{AuthHeaders, Transport};

/// Owns the authenticated-user identity and its persistence.
pub struct SessionManager {
    transport: Arc<dyn Transport>,
    auth: Arc<AuthHeaders>,
    notifier: Arc<dyn Notifier>,
    store: Mutex<CredentialStore>,
    user: RwLock<Option<SessionUser>>,
}

impl SessionManager {
    pub fn new(
        transport: Arc<dyn Transport>,
        auth: Arc<AuthHeaders>,
        notifier: Arc<dyn Notifier>,
        store: CredentialStore,
    ) -> Self {
        Self {
            transport,
            auth,
            notifier,
            store: Mutex::new(store),
            user: RwLock::new(None),
        }
    }

    /// Authenticates against the remote and persists the session.
    ///
    /// On success the identity and both credentials are written to durable
    /// storage with a fixed 30-day expiry, the bearer token is installed for
    /// subsequent requests, and a success notification is emitted.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] for malformed input, before any dispatch
    /// - [`Error::Authentication`] when the remote rejects the credentials
    /// - [`Error::Network`] / [`Error::Api`] for transport-level failures
    ///
    /// A dispatch failure also emits exactly one error notification;
    /// validation failures do not, since nothing was attempted. No retry is
    /// performed; retry policy belongs to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        if email.trim().is_empty() || !email.contains('@') {
            return Err(Error::Validation("email must be a well-formed address".to_string()));
        }
        if password.is_empty() {
            return Err(Error::Validation("password must not be empty".to_string()));
        }

        let response = match api::auth::login(self.transport.as_ref(), &LoginRequest::new(email, password)).await {
            Ok(response) => response,
            Err(err) => {
                self.notifier.notify(&format!("Login failed: {err}"), Severity::Error);
                return Err(err);
            }
        };

        let user_json =
            serde_json::to_string(&response.user).map_err(|e| Error::Storage(e.to_string()))?;
        {
            let mut store = self.store.lock();
            store.set(KEY_ACCESS_TOKEN, &response.access_token, SESSION_TTL_SECS);
            store.set(KEY_REFRESH_TOKEN, &response.refresh_token, SESSION_TTL_SECS);
            store.set(KEY_USER, user_json, SESSION_TTL_SECS);
            store.save()?;
        }

        self.auth.install(Some(&response.access_token), &response.refresh_token);
        *self.user.write() = Some(response.user);

        info!(target = "meetflow.session", email, "login succeeded");
        self.notifier.notify("Logged in successfully", Severity::Success);
        Ok(())
    }

    /// Clears durable storage and in-memory identity unconditionally.
    ///
    /// Never fails; a storage write failure is logged and the in-memory
    /// state is cleared regardless.
    pub fn sign_out(&self) {
        {
            let mut store = self.store.lock();
            store.remove(KEY_ACCESS_TOKEN);
            store.remove(KEY_REFRESH_TOKEN);
            store.remove(KEY_USER);
            if let Err(err) = store.save() {
                warn!(target = "meetflow.session", error = %err, "failed to persist cleared credentials");
            }
        }
        self.auth.clear();
        *self.user.write() = None;
        debug!(target = "meetflow.session", "session cleared");
    }

    /// Restores a persisted session, called once at startup.
    ///
    /// Requires both a parseable identity and a live refresh credential;
    /// anything less falls through to [`sign_out`](Self::sign_out) so the
    /// session is never left half-populated. Idempotent.
    pub fn restore_session(&self) {
        let restored = {
            let store = self.store.lock();
            let user = store
                .get(KEY_USER)
                .and_then(|raw| serde_json::from_str::<SessionUser>(raw).ok());
            let refresh = store.get(KEY_REFRESH_TOKEN).map(str::to_string);
            let access = store.get(KEY_ACCESS_TOKEN).map(str::to_string);
            match (user, refresh) {
                (Some(user), Some(refresh)) => Some((user, refresh, access)),
                _ => None,
            }
        };

        match restored {
            Some((user, refresh, access)) => {
                self.auth.install(access.as_deref(), &refresh);
                info!(target = "meetflow.session", user_id = %user.id, "session restored");
                *self.user.write() = Some(user);
            }
            None => {
                debug!(target = "meetflow.session", "no valid persisted session; clearing");
                self.sign_out();
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.read().is_some()
    }

    pub fn user(&self) -> Option<SessionUser> {
        self.user.read().clone()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.read().as_ref().map(|user| user.role)
    }

    /// The live refresh credential, if a session is active.
    pub fn refresh_token(&self) -> Option<String> {
        self.auth.refresh_token()
    }

    /// Structured session status for front ends.
    pub fn status(&self) -> serde_json::Value {
        match self.user.read().as_ref() {
            Some(user) => json!({
                "authenticated": true,
                "userId": user.id,
                "email": user.email,
                "role": user.role,
            }),
            None => json!({
                "authenticated": false,
                "message": "No active session; run login first",
            }),
        }
    }
}
