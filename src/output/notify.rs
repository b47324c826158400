//! Notification sinks for the end-of-run report
//!
//! Delivery is best effort: a sink reports failure through
//! [`NotificationError`] and the caller logs it without failing the run.

use crate::config::{NotificationConfig, SinkKind, SmtpSecurity, UserAgentConfig};
use crate::NotificationError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use lettre::message::header::{ContentType, HeaderName, HeaderValue, Headers};
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

/// Delivers a rendered report
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Sends `body` to `to` with the given subject
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError>;
}

/// Formats a message as headers, blank line, body
///
/// Header values that are not plain ASCII (a subject carrying UTF-8 query
/// tags, for instance) are RFC 2047 encoded.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use job_sift::output::format_message;
///
/// let date = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
/// let message = format_message("me@example.com", "a@example.com", "Hi", "Body", date);
/// assert!(message.starts_with("From: me@example.com\r\nTo: a@example.com\r\nSubject: Hi\r\n"));
/// assert!(message.ends_with("\r\n\r\nBody"));
/// ```
pub fn format_message(
    from: &str,
    to: &str,
    subject: &str,
    body: &str,
    date: DateTime<Utc>,
) -> String {
    let mut headers = Headers::new();
    for (name, value) in [
        ("From", from.to_string()),
        ("To", to.to_string()),
        ("Subject", subject.to_string()),
        ("Date", date.to_rfc2822()),
    ] {
        headers.insert_raw(HeaderValue::new(HeaderName::new_from_ascii_str(name), value));
    }
    headers.set(ContentType::TEXT_PLAIN);

    format!("{}\r\n{}", headers, body)
}

/// Writes each message as a file into a directory
///
/// Files are named `<UTC timestamp>-<sequence>.eml` so that several messages
/// sent in the same millisecond do not collide.
#[derive(Debug)]
pub struct MailboxSink {
    dir: PathBuf,
    from: String,
    sequence: AtomicU32,
}

impl MailboxSink {
    pub fn new(dir: impl Into<PathBuf>, from: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            from: from.into(),
            sequence: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl NotificationSink for MailboxSink {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let now = Utc::now();
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let path = self
            .dir
            .join(format!("{}-{:03}.eml", now.format("%Y%m%dT%H%M%S%.3fZ"), seq));

        tokio::fs::write(&path, format_message(&self.from, to, subject, body, now)).await?;
        tracing::info!("Report written to {}", path.display());

        Ok(())
    }
}

/// Prints each message to standard output
#[derive(Debug)]
pub struct StdoutSink {
    from: String,
}

impl StdoutSink {
    pub fn new(from: impl Into<String>) -> Self {
        Self { from: from.into() }
    }
}

#[async_trait]
impl NotificationSink for StdoutSink {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        println!("{}", format_message(&self.from, to, subject, body, Utc::now()));
        Ok(())
    }
}

/// Sends each message through an SMTP relay
///
/// A connection is opened per message; the run sends at most one.
pub struct SmtpSink {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpSink {
    /// Builds the transport from the `[notification]` settings
    ///
    /// No connection is made until the first [`send`](NotificationSink::send).
    pub fn new(config: &NotificationConfig, from: &str) -> Result<Self, NotificationError> {
        let host = config
            .smtp_host
            .as_deref()
            .filter(|host| !host.trim().is_empty())
            .ok_or_else(|| NotificationError::Delivery("smtp sink requires smtp_host".to_string()))?;

        let mut builder = match config.smtp_security {
            SmtpSecurity::Starttls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?,
            SmtpSecurity::Tls => AsyncSmtpTransport::<Tokio1Executor>::relay(host)?,
            SmtpSecurity::None => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
        };

        if let Some(port) = config.smtp_port {
            builder = builder.port(port);
        }

        if let (Some(user), Some(password)) = (&config.smtp_user, &config.smtp_password) {
            builder = builder.credentials(Credentials::new(user.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from: from.parse()?,
        })
    }
}

#[async_trait]
impl NotificationSink for SmtpSink {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), NotificationError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(to.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?;

        self.transport.send(message).await?;
        tracing::info!("Report mailed to {}", to);

        Ok(())
    }
}

/// Builds the sink selected in the configuration
///
/// The sender is `notification.from`, or the user agent contact e-mail when
/// that is unset.
pub fn build_sink(
    notification: &NotificationConfig,
    user_agent: &UserAgentConfig,
) -> Result<Arc<dyn NotificationSink>, NotificationError> {
    let from = notification.sender(user_agent);

    match notification.sink {
        SinkKind::Stdout => Ok(Arc::new(StdoutSink::new(from))),
        SinkKind::Mailbox => {
            let dir = notification.mailbox_dir.as_deref().ok_or_else(|| {
                NotificationError::Delivery("mailbox sink requires mailbox_dir".to_string())
            })?;
            Ok(Arc::new(MailboxSink::new(dir, from)))
        }
        SinkKind::Smtp => Ok(Arc::new(SmtpSink::new(notification, from)?)),
    }
}
