//! In-process notifications
//!
//! A [`Signal`] keeps a list of receivers and calls each of them, in the
//! order they were connected, every time the signal is sent.

use crate::models::user::User;
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

type Receiver<T> = Arc<dyn Fn(&T) + Send + Sync>;

pub struct Signal<T> {
    name: &'static str,
    receivers: RwLock<Vec<Receiver<T>>>,
}

impl<T> Signal<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            receivers: RwLock::new(Vec::new()),
        }
    }

    pub fn connect<F>(&self, receiver: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let mut receivers = self.receivers.write().unwrap_or_else(|e| e.into_inner());
        receivers.push(Arc::new(receiver));
    }

    /// Call every connected receiver once; returns how many were called
    pub fn send(&self, payload: &T) -> usize {
        // Snapshot so a receiver may connect further receivers without deadlocking
        let receivers: Vec<Receiver<T>> = self
            .receivers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone();

        for receiver in &receivers {
            receiver(payload);
        }

        debug!(signal = self.name, receivers = receivers.len(), "Signal sent");
        receivers.len()
    }
}

/// Sent after a user has registered and been logged in
#[derive(Clone, Debug)]
pub struct UserRegistered {
    pub user: Arc<User>,
}

/// Signals the application emits
pub struct Signals {
    pub user_registered: Signal<UserRegistered>,
}

impl Signals {
    /// Signals with no receivers connected
    pub fn new() -> Self {
        Self {
            user_registered: Signal::new("user_registered"),
        }
    }

    /// Signals with the default logging receivers connected
    pub fn with_default_receivers() -> Self {
        let signals = Self::new();
        signals.user_registered.connect(|event: &UserRegistered| {
            info!(
                user_id = event.user.id,
                email = %event.user.email,
                "User registered"
            );
        });
        signals
    }
}

impl Default for Signals {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[test]
    fn test_send_without_receivers() {
        let signal: Signal<u32> = Signal::new("noop");
        assert_eq!(signal.send(&1), 0);
    }

    #[test]
    fn test_receivers_called_in_order() {
        let signal: Signal<u32> = Signal::new("ordered");
        let seen = Arc::new(Mutex::new(Vec::new()));

        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            signal.connect(move |value: &u32| seen.lock().unwrap().push((tag, *value)));
        }

        assert_eq!(signal.send(&7), 2);
        assert_eq!(*seen.lock().unwrap(), vec![("first", 7), ("second", 7)]);
    }

    #[test]
    fn test_each_send_calls_once() {
        let signal: Signal<()> = Signal::new("counted");
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        signal.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        signal.send(&());
        signal.send(&());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_default_receivers() {
        let event = UserRegistered {
            user: Arc::new(User {
                id: 1,
                email: "user@example.com".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                password: "!".to_string(),
                is_staff: false,
                is_active: true,
                is_superuser: false,
                groups: vec![],
                last_login: None,
                date_joined: 0,
            }),
        };

        assert_eq!(Signals::new().user_registered.send(&event), 0);
        assert_eq!(Signals::with_default_receivers().user_registered.send(&event), 1);
    }
}
