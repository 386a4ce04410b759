//! Lead delivery
//!
//! Submissions leave the service as plain-text emails through a [`Mailer`].
//! SMTP lives outside this crate; the bundled mailers log or record.

use async_trait::async_trait;
use essentia_forms::{FormKey, Submission};
use parking_lot::RwLock;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Outgoing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub to: String,
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("transport rejected message: {0}")]
    Rejected(String),
    #[error("transport unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

/// Writes each message to the log instead of sending it.
#[derive(Debug, Default)]
pub struct TracingMailer;

#[async_trait]
impl Mailer for TracingMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        info!(
            to = %email.to,
            reply_to = email.reply_to.as_deref().unwrap_or("-"),
            subject = %email.subject,
            "\n{}",
            email.text
        );
        Ok(())
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct OutboxMailer {
    sent: RwLock<Vec<Email>>,
}

impl OutboxMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Email> {
        self.sent.read().clone()
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        self.sent.write().push(email.clone());
        Ok(())
    }
}

fn sender_name(submission: &Submission) -> Option<&str> {
    let keys: &[&str] = match submission.form {
        FormKey::Join => &["full_name", "name"],
        _ => &["contact_name", "name", "full_name"],
    };
    submission.pick_first(keys)
}

/// Internal notification for a filtered submission.
pub fn notification(submission: &Submission, to: &str) -> Email {
    let name = sender_name(submission);
    let (heading, subject) = match submission.form {
        FormKey::Enquire => (
            "New venue / event enquiry",
            format!("New venue / event enquiry from {}", name.unwrap_or("website visitor")),
        ),
        FormKey::Join => (
            "New artist application",
            format!("New artist application from {}", name.unwrap_or("website visitor")),
        ),
        FormKey::Contact => (
            "New contact message",
            match name {
                Some(n) => format!("New contact message from {n}"),
                None => "New contact message".to_string(),
            },
        ),
    };

    let mut lines = vec![heading.to_string(), String::new()];
    lines.extend(submission.summary_lines());

    Email {
        to: to.to_string(),
        reply_to: submission.pick_first(&["email"]).map(String::from),
        subject,
        text: lines.join("\n"),
    }
}

/// Thank-you note to the submitter, when they left an address.
pub fn auto_reply(submission: &Submission, reply_to: &str) -> Option<Email> {
    let to = submission.pick_first(&["email"])?;
    let greeting = format!("Hi {},", sender_name(submission).unwrap_or("there"));
    let (subject, body) = match submission.form {
        FormKey::Enquire => (
            "Thanks for your enquiry",
            "Thanks for getting in touch. We'll review your brief and come back to you shortly.",
        ),
        FormKey::Join => (
            "Thanks for your interest in joining Essentia",
            "Thanks for sending through your details. We review every application carefully and will come back to you if we think there's a fit.",
        ),
        FormKey::Contact => (
            "Thanks for your message",
            "Thanks for reaching out. We'll get back to you soon.",
        ),
    };

    Some(Email {
        to: to.to_string(),
        reply_to: Some(reply_to.to_string()),
        subject: subject.to_string(),
        text: [greeting.as_str(), "", body, "", "Essentia"].join("\n"),
    })
}
