use crate::auth::backend::AuthBackend;
use crate::auth::manager::{ExtraFields, UserManager};
use crate::core::error::RegistrationError;
use crate::models::user::User;
use crate::signals::{Signals, UserRegistered};
use crate::stores::session_store::Session;
use crate::validation::forms::RegistrationForm;
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a successful registration
#[derive(Debug, Clone)]
pub struct Registered {
    pub user: Arc<User>,
    pub session: Session,
}

/// The simplest registration workflow: a user supplies an email address and
/// a password and is immediately signed up and logged in.
pub struct RegistrationView {
    manager: Arc<UserManager>,
    backend: Arc<AuthBackend>,
    signals: Arc<Signals>,
    registration_open: Option<bool>,
}

impl RegistrationView {
    pub fn new(
        manager: Arc<UserManager>,
        backend: Arc<AuthBackend>,
        signals: Arc<Signals>,
        registration_open: Option<bool>,
    ) -> Self {
        Self {
            manager,
            backend,
            signals,
            registration_open,
        }
    }

    /// Whether account registration is currently permitted
    ///
    /// Permitted when the flag is unset or true, refused only when it is
    /// explicitly false.
    pub fn registration_allowed(&self) -> bool {
        self.registration_open.unwrap_or(true)
    }

    /// Validate the form, create the user, log them in and announce it
    pub fn register(&self, form: &RegistrationForm) -> Result<Registered, RegistrationError> {
        if !self.registration_allowed() {
            warn!("Registration attempt while registration is closed");
            return Err(RegistrationError::Closed);
        }

        let cleaned = form.clean().map_err(RegistrationError::InvalidForm)?;

        self.manager.create_user(
            &cleaned.email,
            Some(&cleaned.password),
            None,
            ExtraFields::default(),
        )?;

        let user = self
            .backend
            .authenticate(&cleaned.email, &cleaned.password)
            .ok_or(RegistrationError::AuthenticationFailed)?;

        let (user, session) = self
            .backend
            .login(&user)
            .map_err(|e| RegistrationError::Manager(e.into()))?;

        self.signals.user_registered.send(&UserRegistered {
            user: Arc::clone(&user),
        });

        info!(user_id = user.id, email = %user.email, "Registration complete");

        Ok(Registered { user, session })
    }

    /// Where to send the user after registering
    pub fn success_url(&self, user: &User) -> String {
        user.absolute_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hasher::{Argon2Hasher, PasswordHasher};
    use crate::stores::{
        group_store::GroupStore, session_store::SessionStore, user_store::UserStore,
    };
    use crate::wal::wal::Wal;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct Fixture {
        view: RegistrationView,
        users: Arc<UserStore>,
        backend: Arc<AuthBackend>,
        signal_calls: Arc<AtomicUsize>,
        _dir: TempDir,
    }

    fn fixture(registration_open: Option<bool>) -> Fixture {
        let dir = TempDir::new().unwrap();
        let wal = Arc::new(Wal::new(dir.path().join("test.wal")).unwrap());
        let users = Arc::new(UserStore::new());
        let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());

        let manager = Arc::new(UserManager::new(
            Arc::clone(&users),
            Arc::new(GroupStore::new()),
            Arc::clone(&hasher),
            Arc::clone(&wal),
        ));
        let backend = Arc::new(AuthBackend::new(
            Arc::clone(&users),
            Arc::new(SessionStore::default()),
            hasher,
            wal,
        ));

        let signals = Arc::new(Signals::new());
        let signal_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&signal_calls);
        signals.user_registered.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let view = RegistrationView::new(manager, Arc::clone(&backend), signals, registration_open);

        Fixture {
            view,
            users,
            backend,
            signal_calls,
            _dir: dir,
        }
    }

    fn form(email: &str, password: &str) -> RegistrationForm {
        RegistrationForm {
            email: email.to_string(),
            password1: password.to_string(),
            password2: password.to_string(),
        }
    }

    #[test]
    fn test_registration_allowed() {
        assert!(fixture(None).view.registration_allowed());
        assert!(fixture(Some(true)).view.registration_allowed());
        assert!(!fixture(Some(false)).view.registration_allowed());
    }

    #[test]
    fn test_register_end_to_end() {
        let f = fixture(None);
        let registered = f.view.register(&form("user@example.com", "user123")).unwrap();

        assert_eq!(f.users.len(), 1);
        assert_eq!(registered.user.email, "user@example.com");
        assert!(!registered.user.is_staff);

        let current = f.backend.current_user(&registered.session.token).unwrap();
        assert_eq!(current.id, registered.user.id);

        assert_eq!(f.signal_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_register_when_closed() {
        let f = fixture(Some(false));
        let err = f.view.register(&form("user@example.com", "user123")).unwrap_err();

        assert!(matches!(err, RegistrationError::Closed));
        assert!(f.users.is_empty());
        assert_eq!(f.signal_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_register_invalid_form() {
        let f = fixture(None);
        let mut bad = form("user@example.com", "user123");
        bad.password2 = "other".to_string();

        let err = f.view.register(&bad).unwrap_err();
        assert!(matches!(err, RegistrationError::InvalidForm(_)));
        assert!(f.users.is_empty());
    }

    #[test]
    fn test_register_rejects_malformed_email() {
        let f = fixture(None);
        let err = f.view.register(&form("a@b@ex.com", "pw")).unwrap_err();

        match err {
            RegistrationError::InvalidForm(errors) => {
                assert_eq!(errors.get("email").unwrap(), ["Enter a valid email address."]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(f.users.is_empty());
        assert_eq!(f.signal_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_register_duplicate_email() {
        let f = fixture(None);
        f.view.register(&form("user@example.com", "user123")).unwrap();

        let err = f.view.register(&form("user@example.com", "other")).unwrap_err();
        assert!(matches!(err, RegistrationError::Manager(_)));
        assert_eq!(f.users.len(), 1);
        assert_eq!(f.signal_calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_success_url() {
        let f = fixture(None);
        let registered = f.view.register(&form("user@example.com", "user123")).unwrap();
        assert_eq!(
            f.view.success_url(&registered.user),
            "/users/user%40example.com/"
        );
    }
}
