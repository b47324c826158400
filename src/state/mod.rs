//! State module for tracking a crawl run
//!
//! # Components
//!
//! - `RunState`: Lifecycle of a run (running, completing, notified, skipped)
//! - `JobRecord` / `ResultStore`: Matched listings and their per-run accumulator
//! - `CrawlRunContext`: Query tags, store and state owned by one run

mod job_record;
mod run_context;
mod run_state;

// Re-export main types
pub use job_record::{JobRecord, ResultStore};
pub use run_context::CrawlRunContext;
pub use run_state::RunState;
