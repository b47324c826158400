//! Per-run state shared by the crawl callbacks

use crate::query::QueryTagSet;
use crate::state::{JobRecord, ResultStore, RunState};
use crate::SiftError;

/// State scoped to one crawl run
///
/// Holds the query tags, a fresh [`ResultStore`] and the run lifecycle state.
/// Nothing here outlives the run: the context is consumed by
/// [`CrawlRunContext::into_store`] once the notification decision is made.
#[derive(Debug)]
pub struct CrawlRunContext {
    query: QueryTagSet,
    store: ResultStore,
    state: RunState,
}

impl CrawlRunContext {
    /// Starts a new run in the `Running` state with an empty store
    pub fn new(query: QueryTagSet) -> Self {
        Self {
            query,
            store: ResultStore::new(),
            state: RunState::Running,
        }
    }

    pub fn query(&self) -> &QueryTagSet {
        &self.query
    }

    pub fn store(&self) -> &ResultStore {
        &self.store
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Appends a match to the store
    ///
    /// Records arriving after the run has left `Running` are dropped.
    pub fn record_match(&mut self, record: JobRecord) -> bool {
        if self.state != RunState::Running {
            tracing::warn!(
                "Dropping match for {} received in state {}",
                record.source_url(),
                self.state
            );
            return false;
        }

        self.store.push(record);
        true
    }

    /// Moves the run to `next`, rejecting transitions the lifecycle does not allow
    pub fn transition(&mut self, next: RunState) -> Result<(), SiftError> {
        if !self.state.can_transition_to(next) {
            return Err(SiftError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        tracing::debug!("Run state {} -> {}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Tears the context down, returning the accumulated records
    pub fn into_store(self) -> ResultStore {
        self.store
    }
}
