//! job-sift: a tag-filtered job listing crawler
//!
//! This crate fetches a job-search results page, follows every listing on it,
//! keeps the listings whose technology tags intersect the caller's query tags,
//! and delivers a single report of the matches once the crawl completes.

pub mod config;
pub mod crawler;
pub mod output;
pub mod query;
pub mod state;

use thiserror::Error;

/// Main error type for job-sift operations
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    #[error("Notification error: {0}")]
    Notification(#[from] NotificationError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid run state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunState,
        to: state::RunState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Errors raised while turning raw input into query tags
#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("No query tags supplied: at least one tag is required")]
    InvalidQuery,
}

/// Structural extraction failures on a single detail page
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Missing field '{field}' in detail page")]
    MissingField { field: &'static str },
}

/// Delivery failures reported by a notification sink
#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Failed to write message: {0}")]
    Io(#[from] std::io::Error),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// Result type alias for job-sift operations
pub type Result<T> = std::result::Result<T, SiftError>;

// Re-export commonly used types
pub use config::Config;
pub use query::{build_search_url, normalize, QueryTagSet};
pub use state::{CrawlRunContext, JobRecord, ResultStore, RunState};
