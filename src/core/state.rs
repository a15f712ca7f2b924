// Application state (AppState)

use crate::auth::backend::AuthBackend;
use crate::auth::hasher::{Argon2Hasher, PasswordHasher};
use crate::auth::manager::UserManager;
use crate::core::config::Config;
use crate::mail::{LogMailer, Mailer};
use crate::registration::view::RegistrationView;
use crate::signals::Signals;
use crate::stores::{group_store::GroupStore, session_store::SessionStore, user_store::UserStore};
use crate::wal::wal::Wal;
use std::sync::Arc;

/// Shared application state
///
/// Stores are shared between the manager, the auth backend and the
/// registration view; handlers reach all of them through this struct.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub groups: Arc<GroupStore>,
    pub sessions: Arc<SessionStore>,

    /// Creates users and groups
    pub manager: Arc<UserManager>,

    /// Authenticates credentials and opens sessions
    pub backend: Arc<AuthBackend>,

    pub registration: Arc<RegistrationView>,

    pub signals: Arc<Signals>,

    pub mailer: Arc<dyn Mailer>,

    /// Write-Ahead Log for persistence
    pub wal: Arc<Wal>,

    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config, wal: Wal) -> Self {
        Self::with_parts(
            config,
            wal,
            Arc::new(Signals::with_default_receivers()),
            Arc::new(LogMailer),
        )
    }

    /// Build the state around caller-supplied signals and mailer
    pub fn with_parts(
        config: Config,
        wal: Wal,
        signals: Arc<Signals>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        let config = Arc::new(config);
        let wal = Arc::new(wal);

        let users = Arc::new(UserStore::new());
        let groups = Arc::new(GroupStore::new());
        let sessions = Arc::new(SessionStore::new(config.session.max_age));
        let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());

        let manager = Arc::new(UserManager::new(
            Arc::clone(&users),
            Arc::clone(&groups),
            Arc::clone(&hasher),
            Arc::clone(&wal),
        ));

        let backend = Arc::new(AuthBackend::new(
            Arc::clone(&users),
            Arc::clone(&sessions),
            hasher,
            Arc::clone(&wal),
        ));

        let registration = Arc::new(RegistrationView::new(
            Arc::clone(&manager),
            Arc::clone(&backend),
            Arc::clone(&signals),
            config.registration.open,
        ));

        Self {
            users,
            groups,
            sessions,
            manager,
            backend,
            registration,
            signals,
            mailer,
            wal,
            config,
        }
    }
}
