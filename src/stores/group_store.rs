use crate::core::error::StoreError;
use crate::models::group::Group;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory group table keyed by name
pub struct GroupStore {
    groups: DashMap<String, Group>,
    next_id: AtomicU64,
}

impl GroupStore {
    pub fn new() -> Self {
        Self {
            groups: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }

    /// Create a group; names are unique
    pub fn create(&self, name: &str) -> Result<Group, StoreError> {
        match self.groups.entry(name.to_string()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateGroup(name.to_string())),
            Entry::Vacant(slot) => {
                let group = Group::new(self.next_id.fetch_add(1, Ordering::Relaxed), name);
                slot.insert(group.clone());
                Ok(group)
            }
        }
    }

    /// Insert a group that already carries its primary key (log replay)
    pub fn restore(&self, group: Group) {
        self.next_id.fetch_max(group.id + 1, Ordering::Relaxed);
        self.groups.insert(group.name.clone(), group);
    }

    /// Look a group up by name, failing if it does not exist
    pub fn get(&self, name: &str) -> Result<Group, StoreError> {
        self.groups
            .get(name)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::GroupNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl Default for GroupStore {
    fn default() -> Self {
        Self::new()
    }
}
