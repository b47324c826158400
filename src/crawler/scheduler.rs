//! Scheduler for detail page fetches
//!
//! This module handles:
//! - Fanning out one fetch task per job listing
//! - Global concurrency limiting via a semaphore
//! - Handing completed fetches back one at a time, in completion order
//!
//! Only the network wait happens inside the spawned tasks. Parsing and
//! matching run on the caller's task as completions are drained, so the
//! per-run result store is never touched concurrently.

use crate::crawler::fetcher::{FetchResult, PageFetcher};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use url::Url;

/// A finished fetch, ready to be parsed
#[derive(Debug)]
pub struct CompletedFetch {
    /// The URL that was requested
    pub url: Url,

    /// Outcome of the fetch
    pub result: FetchResult,
}

/// Runs fetches concurrently up to a fixed limit
pub struct Scheduler {
    /// Global semaphore for limiting concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Fetch tasks that have not been drained yet
    in_flight: JoinSet<CompletedFetch>,

    fetcher: Arc<dyn PageFetcher>,

    /// Total number of fetches scheduled over the scheduler's lifetime
    scheduled: usize,
}

impl Scheduler {
    /// Creates a new scheduler
    ///
    /// # Arguments
    ///
    /// * `fetcher` - The page fetcher every task uses
    /// * `max_concurrent` - Upper bound on fetches in progress at once
    pub fn new(fetcher: Arc<dyn PageFetcher>, max_concurrent: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent.max(1))),
            in_flight: JoinSet::new(),
            fetcher,
            scheduled: 0,
        }
    }

    /// Queues a fetch for `url`
    ///
    /// The task starts immediately but waits for a semaphore permit before
    /// issuing the request.
    pub fn schedule(&mut self, url: Url) {
        let semaphore = Arc::clone(&self.semaphore);
        let fetcher = Arc::clone(&self.fetcher);

        tracing::trace!("Scheduling fetch for {}", url);
        self.scheduled += 1;

        self.in_flight.spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => fetcher.fetch(&url).await,
                Err(_) => FetchResult::NetworkError {
                    error: "Scheduler closed".to_string(),
                    transient: false,
                },
            };

            CompletedFetch { url, result }
        });
    }

    /// Waits for the next fetch to finish
    ///
    /// Returns `None` once every scheduled fetch has been drained, which is
    /// the crawl's completion signal.
    pub async fn next_completed(&mut self) -> Option<CompletedFetch> {
        loop {
            match self.in_flight.join_next().await? {
                Ok(completed) => return Some(completed),
                Err(e) if e.is_cancelled() => continue,
                Err(e) => {
                    tracing::error!("Fetch task failed: {}", e);
                    continue;
                }
            }
        }
    }

    /// Number of fetches not yet drained
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Number of fetches scheduled so far
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Aborts every outstanding fetch
    pub fn shutdown(&mut self) {
        self.semaphore.close();
        self.in_flight.abort_all();
        tracing::debug!("Scheduler shut down with {} fetches in flight", self.in_flight.len());
    }
}
