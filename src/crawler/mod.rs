//! Crawler module for fetching, parsing and matching job listings
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Search and detail page parsing
//! - Tag matching against the query
//! - Bounded fan-out of detail page fetches
//! - Overall crawl coordination and the end-of-run decision

mod coordinator;
mod fetcher;
mod matcher;
mod parser;
mod scheduler;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome};
pub use fetcher::{build_http_client, fetch_url, FetchResult, HttpFetcher, PageFetcher};
pub use matcher::{match_listing, match_tags};
pub use parser::{extract_detail, extract_job_urls, JobDetail};
pub use scheduler::{CompletedFetch, Scheduler};
