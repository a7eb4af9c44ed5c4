//! Outbound email delivery for OTP codes.

use anyhow::{Context, Result};
use async_trait::async_trait;
use lettre::{
    Message, SmtpTransport, Transport,
    message::{MultiPart, SinglePart, header},
    transport::smtp::authentication::Credentials,
};
use secrecy::{ExposeSecret, SecretString};
use std::time::Duration;
use tracing::{debug, info};

const SMTP_TIMEOUT_SECONDS: u64 = 30;

#[derive(Clone, Debug)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: Option<String>,
}

/// Delivery backend for outbound email.
#[async_trait]
pub trait EmailSender: Send + Sync {
    /// Deliver a single message.
    ///
    /// # Errors
    /// Returns an error when the message cannot be handed to the backend.
    async fn send(&self, message: &EmailMessage) -> Result<()>;
}

/// Logs messages instead of delivering them. Used when no SMTP relay is
/// configured.
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.text_body,
            "email (log only)"
        );
        Ok(())
    }
}

/// Delivers through an SMTP relay with STARTTLS.
pub struct SmtpSender {
    host: String,
    port: u16,
    credentials: Option<Credentials>,
    from: String,
}

impl SmtpSender {
    /// Build a sender for the given relay.
    ///
    /// # Errors
    /// Returns an error if the From address does not parse as a mailbox.
    pub fn new(
        host: String,
        port: u16,
        username: Option<String>,
        password: Option<SecretString>,
        from: String,
    ) -> Result<Self> {
        // Fail fast on a bad From address instead of on the first send
        from.parse::<lettre::message::Mailbox>()
            .with_context(|| format!("Invalid From address: {from}"))?;

        let credentials = match (username, password) {
            (Some(username), Some(password)) => Some(Credentials::new(
                username,
                password.expose_secret().to_string(),
            )),
            _ => None,
        };

        Ok(Self {
            host,
            port,
            credentials,
            from,
        })
    }

    fn build_transport(&self) -> Result<SmtpTransport> {
        let mut builder = SmtpTransport::starttls_relay(&self.host)
            .context("Failed to create SMTP transport")?
            .port(self.port)
            .timeout(Some(Duration::from_secs(SMTP_TIMEOUT_SECONDS)));

        if let Some(credentials) = &self.credentials {
            builder = builder.credentials(credentials.clone());
        }

        Ok(builder.build())
    }

    fn build_message(&self, message: &EmailMessage) -> Result<Message> {
        let from = self
            .from
            .parse()
            .with_context(|| format!("Invalid From address: {}", self.from))?;
        let to = message
            .to
            .parse()
            .with_context(|| format!("Invalid To address: {}", message.to))?;

        let text = SinglePart::builder()
            .header(header::ContentType::TEXT_PLAIN)
            .body(message.text_body.clone());

        let body = if let Some(html) = &message.html_body {
            MultiPart::alternative().singlepart(text).singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_HTML)
                    .body(html.clone()),
            )
        } else {
            MultiPart::alternative().singlepart(text)
        };

        Message::builder()
            .from(from)
            .to(to)
            .subject(&message.subject)
            .multipart(body)
            .context("Failed to build email message")
    }
}

#[async_trait]
impl EmailSender for SmtpSender {
    async fn send(&self, message: &EmailMessage) -> Result<()> {
        debug!(to = %message.to, subject = %message.subject, "Sending email");

        let transport = self.build_transport()?;
        let built = self.build_message(message)?;

        // lettre's SMTP transport is blocking
        tokio::task::spawn_blocking(move || transport.send(&built))
            .await
            .context("SMTP send task failed")?
            .context("Failed to send email")?;

        info!(to = %message.to, "Email sent");

        Ok(())
    }
}

/// Render the OTP email for a freshly issued code.
pub(crate) fn otp_message(to: &str, code: &str, expires_minutes: i64) -> EmailMessage {
    EmailMessage {
        to: to.to_string(),
        subject: "Your OTP Code".to_string(),
        text_body: format!(
            "Your OTP code is: {code}\n\nThis code will expire in {expires_minutes} minutes."
        ),
        html_body: Some(format!(
            "<p>Your OTP code is: <strong>{code}</strong></p>\
             <p>This code will expire in {expires_minutes} minutes.</p>"
        )),
    }
}
