use crate::utils::email::urlquote;
use serde::Serialize;
use std::fmt;

/// Maximum length of the email address (RFC 5321 path limit)
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length of first and last names
pub const MAX_NAME_LENGTH: usize = 30;

/// Prefix marking a password that can never be verified
pub const UNUSABLE_PASSWORD_PREFIX: &str = "!";

/// A user account identified by its email address
#[derive(Clone, Debug, PartialEq)]
pub struct User {
    /// Store-assigned primary key
    pub id: u64,
    /// Normalized email, unique across the store
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// PHC-encoded password hash, or an unusable marker
    pub password: String,
    /// Designates whether the user can log into the admin site
    pub is_staff: bool,
    /// Inactive users are kept but cannot authenticate
    pub is_active: bool,
    /// Holds every permission without being granted them explicitly
    pub is_superuser: bool,
    /// Names of the groups this user belongs to
    pub groups: Vec<String>,
    /// Unix timestamp of the last successful login
    pub last_login: Option<i64>,
    /// Unix timestamp of account creation
    pub date_joined: i64,
}

impl User {
    /// Path of this user's profile page
    pub fn absolute_url(&self) -> String {
        format!("/users/{}/", urlquote(&self.email))
    }

    /// First name plus last name, with a space in between
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn short_name(&self) -> &str {
        &self.first_name
    }

    /// Email prefixed with the full name when one is set,
    /// e.g. `Bruce Wayne <bruce@wayne.com>`
    pub fn nice_email(&self) -> String {
        let full_name = self.full_name();
        if full_name.is_empty() {
            self.email.clone()
        } else {
            format!("{} <{}>", full_name, self.email)
        }
    }

    pub fn has_usable_password(&self) -> bool {
        !self.password.starts_with(UNUSABLE_PASSWORD_PREFIX)
    }

    pub fn in_group(&self, group_name: &str) -> bool {
        self.groups.iter().any(|g| g == group_name)
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.nice_email())
    }
}

/// Public view of a user, safe to serialize into responses
#[derive(Debug, Serialize, serde::Deserialize, PartialEq)]
pub struct UserProfile {
    pub id: u64,
    pub email: String,
    pub full_name: String,
    pub nice_email: String,
    pub url: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub is_superuser: bool,
    pub groups: Vec<String>,
    pub date_joined: i64,
    pub last_login: Option<i64>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            full_name: user.full_name(),
            nice_email: user.nice_email(),
            url: user.absolute_url(),
            is_staff: user.is_staff,
            is_active: user.is_active,
            is_superuser: user.is_superuser,
            groups: user.groups.clone(),
            date_joined: user.date_joined,
            last_login: user.last_login,
        }
    }
}
