use crate::models::user::MAX_EMAIL_LENGTH;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::ValidateEmail;

const REQUIRED: &str = "This field is required.";

/// Validation messages keyed by field name
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result<T>(self, value: T) -> Result<T, FormErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Submitted registration form
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct RegistrationForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

/// Registration data that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRegistration {
    pub email: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn clean(&self) -> Result<CleanedRegistration, FormErrors> {
        let mut errors = FormErrors::default();
        let email = self.email.trim();

        if email.is_empty() {
            errors.add("email", REQUIRED);
        } else if email.chars().count() > MAX_EMAIL_LENGTH {
            errors.add(
                "email",
                format!("Ensure this value has at most {} characters.", MAX_EMAIL_LENGTH),
            );
        } else if !email.validate_email() {
            errors.add("email", "Enter a valid email address.");
        }

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        }
        if !self.password1.is_empty()
            && !self.password2.is_empty()
            && self.password1 != self.password2
        {
            errors.add("password2", "The two password fields didn't match.");
        }

        errors.into_result(CleanedRegistration {
            email: email.to_string(),
            password: self.password1.clone(),
        })
    }
}

/// Submitted login form
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.email.trim().is_empty() {
            errors.add("email", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.into_result(())
    }
}
