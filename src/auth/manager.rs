use crate::auth::hasher::{make_unusable_password, PasswordHasher};
use crate::core::error::{ManagerError, StoreError};
use crate::models::group::Group;
use crate::models::user::{User, MAX_EMAIL_LENGTH, MAX_NAME_LENGTH};
use crate::stores::{group_store::GroupStore, user_store::UserStore};
use crate::utils::email::normalize_email;
use crate::utils::time::current_timestamp;
use crate::wal::wal::{Wal, WalOperation};
use std::sync::Arc;
use tracing::{info, warn};

/// Optional profile fields accepted by the user constructors
#[derive(Debug, Default, Clone)]
pub struct ExtraFields {
    pub first_name: String,
    pub last_name: String,
}

/// Builds and persists user records
pub struct UserManager {
    users: Arc<UserStore>,
    groups: Arc<GroupStore>,
    hasher: Arc<dyn PasswordHasher>,
    wal: Arc<Wal>,
}

impl UserManager {
    pub fn new(
        users: Arc<UserStore>,
        groups: Arc<GroupStore>,
        hasher: Arc<dyn PasswordHasher>,
        wal: Arc<Wal>,
    ) -> Self {
        Self {
            users,
            groups,
            hasher,
            wal,
        }
    }

    /// Create a user who is neither staff nor superuser
    ///
    /// When `group_name` is given the group must already exist; it is looked
    /// up before anything is stored.
    pub fn create_user(
        &self,
        email: &str,
        password: Option<&str>,
        group_name: Option<&str>,
        extra: ExtraFields,
    ) -> Result<Arc<User>, ManagerError> {
        let group = match group_name.filter(|name| !name.is_empty()) {
            Some(name) => Some(self.groups.get(name)?),
            None => None,
        };

        let user = self.create(email, password, false, false, extra)?;

        match group {
            Some(group) => Ok(self.add_to_group(&user.email, &group)?),
            None => Ok(user),
        }
    }

    /// Create a user with staff and superuser flags set
    ///
    /// A superuser can have any email.
    pub fn create_superuser(
        &self,
        email: &str,
        password: Option<&str>,
        extra: ExtraFields,
    ) -> Result<Arc<User>, ManagerError> {
        self.create(email, password, true, true, extra)
    }

    /// Add an existing user to an existing group
    pub fn join_group(&self, email: &str, group_name: &str) -> Result<Arc<User>, StoreError> {
        let group = self.groups.get(group_name)?;
        self.add_to_group(&normalize_email(email), &group)
    }

    pub fn create_group(&self, name: &str) -> Result<Group, StoreError> {
        let group = self.groups.create(name)?;

        if let Err(e) = self.wal.log_operation(&WalOperation::create_group(&group)) {
            warn!(error = %e, "Failed to log group creation to WAL");
        }

        info!(group_id = group.id, group = %group.name, "Group created");
        Ok(group)
    }

    fn create(
        &self,
        email: &str,
        password: Option<&str>,
        is_staff: bool,
        is_superuser: bool,
        extra: ExtraFields,
    ) -> Result<Arc<User>, ManagerError> {
        if email.is_empty() {
            return Err(ManagerError::EmptyEmail);
        }

        let email = normalize_email(email);
        check_length("email", &email, MAX_EMAIL_LENGTH)?;
        check_length("first_name", &extra.first_name, MAX_NAME_LENGTH)?;
        check_length("last_name", &extra.last_name, MAX_NAME_LENGTH)?;

        let password = match password {
            Some(password) => self
                .hasher
                .hash(password)
                .map_err(|e| ManagerError::Hash(e.to_string()))?,
            None => make_unusable_password(),
        };

        let now = current_timestamp();
        let user = self.users.insert(User {
            id: 0,
            email,
            first_name: extra.first_name,
            last_name: extra.last_name,
            password,
            is_staff,
            is_active: true,
            is_superuser,
            groups: Vec::new(),
            last_login: Some(now),
            date_joined: now,
        })?;

        if let Err(e) = self.wal.log_operation(&WalOperation::create_user(&user)) {
            warn!(error = %e, "Failed to log user creation to WAL");
        }

        info!(
            user_id = user.id,
            email = %user.email,
            is_staff = user.is_staff,
            is_superuser = user.is_superuser,
            "User created"
        );

        Ok(user)
    }

    fn add_to_group(&self, email: &str, group: &Group) -> Result<Arc<User>, StoreError> {
        let user = self.users.update(email, |user| {
            if !user.in_group(&group.name) {
                user.groups.push(group.name.clone());
            }
        })?;

        if let Err(e) = self.wal.log_operation(&WalOperation::JoinGroup {
            email: user.email.clone(),
            group: group.name.clone(),
        }) {
            warn!(error = %e, "Failed to log group membership to WAL");
        }

        info!(email = %user.email, group = %group.name, "User joined group");
        Ok(user)
    }
}

fn check_length(field: &'static str, value: &str, max: usize) -> Result<(), ManagerError> {
    let actual = value.chars().count();
    if actual > max {
        return Err(ManagerError::FieldTooLong { field, max, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::hasher::Argon2Hasher;
    use tempfile::TempDir;

    struct Fixture {
        manager: UserManager,
        users: Arc<UserStore>,
        groups: Arc<GroupStore>,
        wal: Arc<Wal>,
        _dir: TempDir,
    }

    fn fixture() -> Fixture {
        let dir = TempDir::new().unwrap();
        let wal = Arc::new(Wal::new(dir.path().join("test.wal")).unwrap());
        let users = Arc::new(UserStore::new());
        let groups = Arc::new(GroupStore::new());
        let manager = UserManager::new(
            Arc::clone(&users),
            Arc::clone(&groups),
            Arc::new(Argon2Hasher::new()),
            Arc::clone(&wal),
        );

        Fixture {
            manager,
            users,
            groups,
            wal,
            _dir: dir,
        }
    }

    #[test]
    fn test_can_create_superuser() {
        let f = fixture();
        f.manager
            .create_superuser(
                "superuser@justice-league.org",
                Some("krypton1te"),
                ExtraFields::default(),
            )
            .unwrap();

        let all = f.users.all();
        assert_eq!(all.len(), 1);
        assert!(all[0].is_staff);
        assert!(all[0].is_superuser);
        assert!(all[0].is_active);
    }

    #[test]
    fn test_create_superuser_accepts_any_email_format() {
        let f = fixture();
        f.manager
            .create_superuser("root", Some("toor"), ExtraFields::default())
            .unwrap();
        f.manager
            .create_superuser("ROOT@Host", Some("toor"), ExtraFields::default())
            .unwrap();

        assert_eq!(f.users.len(), 2);
        assert!(f.users.get("root").unwrap().is_superuser);

        let mixed = f.users.get("ROOT@host").unwrap();
        assert!(mixed.is_superuser);
        assert!(f.users.get("ROOT@Host").is_none());
    }

    #[test]
    fn test_create_regular_user() {
        let f = fixture();
        f.manager
            .create_user("user@example.com", Some("user123"), None, ExtraFields::default())
            .unwrap();

        let all = f.users.all();
        assert_eq!(all.len(), 1);
        assert!(!all[0].is_staff);
        assert!(!all[0].is_superuser);
        assert!(all[0].is_active);
        assert_eq!(all[0].last_login, Some(all[0].date_joined));
    }

    #[test]
    fn test_cannot_create_user_with_same_email() {
        let f = fixture();
        f.manager
            .create_user("user@example.com", Some("user123"), None, ExtraFields::default())
            .unwrap();

        let err = f
            .manager
            .create_user("user@example.com", None, None, ExtraFields::default())
            .unwrap_err();
        assert!(matches!(
            err,
            ManagerError::Store(StoreError::DuplicateEmail(ref email))
                if email == "user@example.com"
        ));
        assert_eq!(f.users.len(), 1);
    }

    #[test]
    fn test_duplicate_detected_after_domain_normalization() {
        let f = fixture();
        f.manager
            .create_user("user@example.com", None, None, ExtraFields::default())
            .unwrap();

        let err = f
            .manager
            .create_user("user@EXAMPLE.COM", None, None, ExtraFields::default())
            .unwrap_err();
        assert!(matches!(err, ManagerError::Store(StoreError::DuplicateEmail(_))));
    }

    #[test]
    fn test_empty_email_rejected() {
        let f = fixture();
        let err = f
            .manager
            .create_user("", Some("pw"), None, ExtraFields::default())
            .unwrap_err();

        assert!(matches!(err, ManagerError::EmptyEmail));
        assert!(f.users.is_empty());
    }

    #[test]
    fn test_email_domain_normalized() {
        let f = fixture();
        let user = f
            .manager
            .create_user("Clark.Kent@DailyPlanet.COM", None, None, ExtraFields::default())
            .unwrap();
        assert_eq!(user.email, "Clark.Kent@dailyplanet.com");
    }

    #[test]
    fn test_password_is_hashed() {
        let f = fixture();
        let user = f
            .manager
            .create_user("user@example.com", Some("user123"), None, ExtraFields::default())
            .unwrap();

        assert_ne!(user.password, "user123");
        assert!(Argon2Hasher::new().verify("user123", &user.password));
    }

    #[test]
    fn test_missing_password_is_unusable() {
        let f = fixture();
        let user = f
            .manager
            .create_user("user@example.com", None, None, ExtraFields::default())
            .unwrap();
        assert!(!user.has_usable_password());
    }

    #[test]
    fn test_field_lengths_enforced() {
        let f = fixture();
        let long_email = format!("{}@example.com", "a".repeat(250));
        let err = f
            .manager
            .create_user(&long_email, None, None, ExtraFields::default())
            .unwrap_err();
        assert!(matches!(err, ManagerError::FieldTooLong { field: "email", .. }));

        let extra = ExtraFields {
            first_name: "x".repeat(31),
            last_name: String::new(),
        };
        let err = f
            .manager
            .create_user("user@example.com", None, None, extra)
            .unwrap_err();
        assert!(matches!(
            err,
            ManagerError::FieldTooLong { field: "first_name", max: 30, actual: 31 }
        ));
        assert!(f.users.is_empty());
    }

    #[test]
    fn test_create_user_with_group() {
        let f = fixture();
        f.manager.create_group("justice-league").unwrap();

        let user = f
            .manager
            .create_user(
                "diana@themyscira.gr",
                Some("lasso"),
                Some("justice-league"),
                ExtraFields::default(),
            )
            .unwrap();

        assert!(user.in_group("justice-league"));
        assert!(f.users.get("diana@themyscira.gr").unwrap().in_group("justice-league"));
    }

    #[test]
    fn test_create_user_with_unknown_group() {
        let f = fixture();
        let err = f
            .manager
            .create_user("user@example.com", Some("pw"), Some("nobody"), ExtraFields::default())
            .unwrap_err();

        assert!(matches!(
            err,
            ManagerError::Store(StoreError::GroupNotFound(ref g)) if g == "nobody"
        ));
        assert!(f.users.is_empty());
    }

    #[test]
    fn test_join_group_is_idempotent() {
        let f = fixture();
        f.groups.create("editors").unwrap();
        f.manager
            .create_user("user@example.com", None, None, ExtraFields::default())
            .unwrap();

        f.manager.join_group("user@example.com", "editors").unwrap();
        let user = f.manager.join_group("user@EXAMPLE.com", "editors").unwrap();
        assert_eq!(user.groups, vec!["editors".to_string()]);
    }

    #[test]
    fn test_operations_logged_to_wal() {
        let f = fixture();
        f.manager.create_group("editors").unwrap();
        f.manager
            .create_user("user@example.com", Some("pw"), Some("editors"), ExtraFields::default())
            .unwrap();

        let ops = f.wal.replay().unwrap();
        assert_eq!(ops.len(), 3);
        assert!(matches!(ops[0], WalOperation::CreateGroup { .. }));
        assert!(matches!(
            ops[1],
            WalOperation::CreateUser { ref email, .. } if email == "user@example.com"
        ));
        assert!(matches!(ops[2], WalOperation::JoinGroup { ref group, .. } if group == "editors"));
    }
}
