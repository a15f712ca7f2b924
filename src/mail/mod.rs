//! Outgoing email
//!
//! Delivery is behind the [`Mailer`] trait. The service ships a mailer that
//! writes messages to the log and an in-memory outbox for tests.

use crate::models::user::User;
use anyhow::{anyhow, Result};
use std::sync::Mutex;
use tracing::info;

#[derive(Clone, Debug, PartialEq)]
pub struct EmailMessage {
    pub subject: String,
    pub body: String,
    pub from_email: String,
    pub to: Vec<String>,
}

pub trait Mailer: Send + Sync {
    fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Writes each message to the log instead of delivering it
#[derive(Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            from = %message.from_email,
            to = ?message.to,
            subject = %message.subject,
            body = %message.body,
            "Email sent"
        );
        Ok(())
    }
}

/// Keeps sent messages in memory
#[derive(Default)]
pub struct MemoryMailer {
    outbox: Mutex<Vec<EmailMessage>>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outbox(&self) -> Vec<EmailMessage> {
        self.outbox.lock().map(|o| o.clone()).unwrap_or_default()
    }
}

impl Mailer for MemoryMailer {
    fn send(&self, message: &EmailMessage) -> Result<()> {
        self.outbox
            .lock()
            .map_err(|_| anyhow!("outbox lock poisoned"))?
            .push(message.clone());
        Ok(())
    }
}

/// Send an email to a single user
///
/// `from_email` falls back to `default_from` when not given.
pub fn email_user(
    mailer: &dyn Mailer,
    user: &User,
    subject: &str,
    message: &str,
    from_email: Option<&str>,
    default_from: &str,
) -> Result<EmailMessage> {
    let email = EmailMessage {
        subject: subject.to_string(),
        body: message.to_string(),
        from_email: from_email.unwrap_or(default_from).to_string(),
        to: vec![user.email.clone()],
    };

    mailer.send(&email)?;
    Ok(email)
}
