use crate::auth::hasher::PasswordHasher;
use crate::core::error::StoreError;
use crate::models::user::User;
use crate::stores::{session_store::Session, session_store::SessionStore, user_store::UserStore};
use crate::utils::email::normalize_email;
use crate::utils::time::current_timestamp;
use crate::wal::wal::{Wal, WalOperation};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Email/password authentication and session login
pub struct AuthBackend {
    users: Arc<UserStore>,
    sessions: Arc<SessionStore>,
    hasher: Arc<dyn PasswordHasher>,
    wal: Arc<Wal>,
}

impl AuthBackend {
    pub fn new(
        users: Arc<UserStore>,
        sessions: Arc<SessionStore>,
        hasher: Arc<dyn PasswordHasher>,
        wal: Arc<Wal>,
    ) -> Self {
        Self {
            users,
            sessions,
            hasher,
            wal,
        }
    }

    /// Resolve credentials to an active user
    pub fn authenticate(&self, email: &str, password: &str) -> Option<Arc<User>> {
        let email = normalize_email(email);

        let Some(user) = self.users.get(&email) else {
            debug!(email = %email, "Authentication failed: unknown email");
            return None;
        };

        if !self.hasher.verify(password, &user.password) {
            debug!(email = %email, "Authentication failed: wrong password");
            return None;
        }

        if !user.is_active {
            debug!(email = %email, "Authentication failed: inactive user");
            return None;
        }

        Some(user)
    }

    /// Record the login on the user and open a session for it
    pub fn login(&self, user: &User) -> Result<(Arc<User>, Session), StoreError> {
        let now = current_timestamp();
        let user = self.users.update(&user.email, |u| u.last_login = Some(now))?;

        if let Err(e) = self.wal.log_operation(&WalOperation::RecordLogin {
            email: user.email.clone(),
            at: now,
        }) {
            warn!(error = %e, "Failed to log login to WAL");
        }

        let session = self.sessions.create(&user);
        info!(user_id = user.id, email = %user.email, "User logged in");

        Ok((user, session))
    }

    /// Drop a session; returns whether one existed
    pub fn logout(&self, token: &str) -> bool {
        match self.sessions.remove(token) {
            Some(session) => {
                info!(email = %session.email, "User logged out");
                true
            }
            None => false,
        }
    }

    /// The user owning a session token, if the session and user still exist
    pub fn current_user(&self, token: &str) -> Option<Arc<User>> {
        let session = self.sessions.get(token)?;
        self.users.get(&session.email)
    }
}
