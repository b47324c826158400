use serde::Deserialize;

/// Main configuration structure for job-sift
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub notification: NotificationConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Job-search results page the query tags are appended to
    #[serde(rename = "search-url")]
    pub search_url: String,

    /// Maximum number of concurrent detail page fetches
    #[serde(rename = "max-concurrent-pages-open")]
    pub max_concurrent_pages_open: u32,

    /// Per-request timeout (seconds)
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Retries for transient failures (429, 5xx, timeouts)
    #[serde(rename = "max-retries", default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay between retries (milliseconds)
    #[serde(rename = "retry-delay-ms", default = "default_retry_delay")]
    pub retry_delay_ms: u64,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_delay() -> u64 {
    500
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Where the end-of-run report goes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationConfig {
    /// Recipient address for the report
    #[serde(rename = "send-to")]
    pub send_to: String,

    /// Which sink delivers the report
    #[serde(default)]
    pub sink: SinkKind,

    /// Sender address; falls back to the user agent contact e-mail
    pub from: Option<String>,

    /// Directory the mailbox sink writes messages into
    #[serde(rename = "mailbox-dir")]
    pub mailbox_dir: Option<String>,

    /// SMTP relay host, required when `sink = "smtp"`
    #[serde(rename = "smtp-host")]
    pub smtp_host: Option<String>,

    /// SMTP port; the transport default for `smtp-security` when unset
    #[serde(rename = "smtp-port")]
    pub smtp_port: Option<u16>,

    #[serde(rename = "smtp-user")]
    pub smtp_user: Option<String>,

    #[serde(rename = "smtp-password")]
    pub smtp_password: Option<String>,

    /// How the SMTP connection is secured
    #[serde(rename = "smtp-security", default)]
    pub smtp_security: SmtpSecurity,
}

impl NotificationConfig {
    /// Address the report is sent from
    pub fn sender<'a>(&'a self, user_agent: &'a UserAgentConfig) -> &'a str {
        self.from.as_deref().unwrap_or(&user_agent.contact_email)
    }
}

/// Available notification sinks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SinkKind {
    #[default]
    Mailbox,
    Stdout,
    Smtp,
}

/// Transport security for the SMTP sink
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (port 587)
    #[default]
    Starttls,
    /// Implicit TLS (port 465)
    Tls,
    /// Unencrypted, for local relays only (port 25)
    None,
}
