//! Output module for the end-of-run report
//!
//! This module handles:
//! - Rendering matched listings into the plain-text report
//! - Delivering the report through a notification sink
//! - Recording crawl statistics

mod notify;
mod report;
pub mod stats;

pub use notify::{
    build_sink, format_message, MailboxSink, NotificationSink, SmtpSink, StdoutSink,
};
pub use report::{
    delimiter_line, notification_subject, render_report, DELIMITER_CHAR, DELIMITER_WIDTH,
};
pub use stats::{format_statistics, print_statistics, CrawlStatistics};
