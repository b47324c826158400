//! Query tag handling for job-sift
//!
//! This module turns the caller's free-text tag input into a canonical
//! [`QueryTagSet`] and builds the search URL the crawl starts from.

mod search_url;
mod tags;

pub use search_url::build_search_url;
pub use tags::{normalize, QueryTagSet};
