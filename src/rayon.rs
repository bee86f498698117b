//! Parallel library search.
//!
//! This module provides [`parallel_search`], which scores every library
//! entry on the rayon thread pool. Entries are only read, so workers share
//! no mutable state apart from the progress tracker.
//!
//! The public API is exposed through
//! [`Library::search_parallel`](crate::Library::search_parallel) — this
//! module contains only the internal implementation.

use std::sync::Mutex;

use ::rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::configuration::SearchOptions;
use crate::error::VidsiftError;
use crate::library::{Entry, MatchResult, operation_for};
use crate::progress::ProgressTracker;
use crate::query::SearchQuery;

/// Score entries in parallel. Results come back in entry order, unranked.
pub(crate) fn parallel_search(
    entries: &[Entry],
    query: &SearchQuery,
    options: &SearchOptions,
) -> Result<Vec<MatchResult>, VidsiftError> {
    let tracker = Mutex::new(ProgressTracker::new(
        options.progress.clone(),
        operation_for(query),
        Some(entries.len() as u64),
        options.batch_size,
    ));

    let results: Result<Vec<MatchResult>, VidsiftError> = entries
        .par_iter()
        .map(|entry| {
            if options.is_cancelled() {
                return Err(VidsiftError::Cancelled);
            }
            let result = entry.score_against(query, options)?;
            if let Ok(mut tracker) = tracker.lock() {
                tracker.advance(Some(&entry.video.id));
            }
            Ok(result)
        })
        .collect();

    if let Ok(mut tracker) = tracker.lock() {
        tracker.finish();
    }
    results
}
