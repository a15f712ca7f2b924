use crate::models::user::User;
use crate::utils::time::current_timestamp;
use dashmap::DashMap;
use rand::RngCore;

/// Number of random bytes in a session token
const TOKEN_BYTES: usize = 32;

/// Session lifetime when none is configured: two weeks
pub const DEFAULT_MAX_AGE: i64 = 14 * 24 * 60 * 60;

/// An authenticated session
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    /// Hex-encoded random token handed to the client
    pub token: String,
    pub user_id: u64,
    pub email: String,
    pub created_at: i64,
}

/// In-memory session table keyed by token
///
/// A session older than `max_age` seconds is treated as gone. Expired
/// entries are dropped when looked up and by [`SessionStore::cleanup_expired`].
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    max_age: i64,
}

impl SessionStore {
    pub fn new(max_age: i64) -> Self {
        Self {
            sessions: DashMap::new(),
            max_age,
        }
    }

    fn is_expired(&self, session: &Session, now: i64) -> bool {
        now - session.created_at >= self.max_age
    }

    /// Open a new session for `user`
    pub fn create(&self, user: &User) -> Session {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut bytes);

        let session = Session {
            token: hex::encode(bytes),
            user_id: user.id,
            email: user.email.clone(),
            created_at: current_timestamp(),
        };

        self.sessions.insert(session.token.clone(), session.clone());
        session
    }

    /// Look a session up, dropping it if it has expired
    pub fn get(&self, token: &str) -> Option<Session> {
        let now = current_timestamp();
        self.sessions.remove_if(token, |_, session| self.is_expired(session, now));
        self.sessions.get(token).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, token: &str) -> Option<Session> {
        self.sessions.remove(token).map(|(_, session)| session)
    }

    /// Remove every expired session; returns how many were removed
    pub fn cleanup_expired(&self) -> usize {
        self.cleanup_expired_at(current_timestamp())
    }

    fn cleanup_expired_at(&self, now: i64) -> usize {
        let mut removed = 0;
        self.sessions.retain(|_, session| {
            let expired = self.is_expired(session, now);
            if expired {
                removed += 1;
            }
            !expired
        });
        removed
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_AGE)
    }
}
