use crate::core::error::StoreError;
use crate::models::user::User;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// In-memory user table keyed by normalized email
///
/// The map key is the uniqueness constraint: an insert for an email that is
/// already present is rejected atomically through the entry API.
pub struct UserStore {
    users: DashMap<String, Arc<User>>,
    next_id: AtomicU64,
}

impl UserStore {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Insert a new user, assigning it the next primary key
    pub fn insert(&self, mut user: User) -> Result<Arc<User>, StoreError> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail(user.email)),
            Entry::Vacant(slot) => {
                user.id = self.next_id.fetch_add(1, Ordering::Relaxed);
                let user = Arc::new(user);
                slot.insert(Arc::clone(&user));
                Ok(user)
            }
        }
    }

    /// Insert a user that already carries its primary key (log replay)
    pub fn restore(&self, user: User) -> Result<Arc<User>, StoreError> {
        match self.users.entry(user.email.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateEmail(user.email)),
            Entry::Vacant(slot) => {
                self.next_id.fetch_max(user.id + 1, Ordering::Relaxed);
                let user = Arc::new(user);
                slot.insert(Arc::clone(&user));
                Ok(user)
            }
        }
    }

    pub fn get(&self, email: &str) -> Option<Arc<User>> {
        self.users.get(email).map(|entry| Arc::clone(entry.value()))
    }

    /// Apply `change` to a copy of the stored user and store the result
    ///
    /// The email is the key and must not be changed here.
    pub fn update<F>(&self, email: &str, change: F) -> Result<Arc<User>, StoreError>
    where
        F: FnOnce(&mut User),
    {
        let mut entry = self
            .users
            .get_mut(email)
            .ok_or_else(|| StoreError::UserNotFound(email.to_string()))?;

        let mut user = User::clone(entry.value());
        change(&mut user);
        user.email = email.to_string();

        let user = Arc::new(user);
        *entry.value_mut() = Arc::clone(&user);
        Ok(user)
    }

    /// All users ordered by primary key
    pub fn all(&self) -> Vec<Arc<User>> {
        let mut users: Vec<Arc<User>> = self
            .users
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();
        users.sort_by_key(|u| u.id);
        users
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}
