//! Progress reporting and cancellation support.
//!
//! This module provides [`ProgressCallback`] for monitoring library-wide
//! searches, [`CancellationToken`] for cooperative cancellation, and
//! [`ProgressInfo`] for detailed progress snapshots.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use vidsift::{Library, ProgressCallback, ProgressInfo, SearchOptions, SearchQuery};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         if let Some(pct) = info.percentage {
//!             println!("[{:?}] {pct:.1}% complete", info.operation);
//!         }
//!     }
//! }
//!
//! let library = Library::new();
//! let options = SearchOptions::new().with_progress(Arc::new(PrintProgress));
//! let results = library.search(&SearchQuery::text("cat"), &options)?;
//! assert!(results.is_empty());
//! # Ok::<(), vidsift::VidsiftError>(())
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

/// The kind of operation currently in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Scoring videos against a text query.
    TextSearch,
    /// Scoring videos against an image-derived tag set.
    ImageSearch,
    /// Loading insights documents.
    InsightsLoading,
}

/// A snapshot of search progress.
///
/// Delivered to [`ProgressCallback::on_progress`] at a cadence controlled
/// by [`SearchOptions::with_batch_size`](crate::SearchOptions::with_batch_size).
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// What kind of work is being performed.
    pub operation: OperationType,
    /// How many videos have been processed so far.
    pub current: u64,
    /// Total videos expected, if known ahead of time.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known.
    pub percentage: Option<f32>,
    /// Wall-clock time elapsed since the operation started.
    pub elapsed: Duration,
    /// Estimated time remaining, based on current throughput.
    pub estimated_remaining: Option<Duration>,
    /// Id of the video that was just processed.
    pub current_video: Option<String>,
}

/// Trait for receiving progress updates during a search.
///
/// Implementations must be [`Send`] and [`Sync`] because callbacks may be
/// invoked from worker threads during parallel searches.
///
/// Progress callbacks are **infallible** — they observe but cannot halt
/// the operation. Use [`CancellationToken`] for cooperative cancellation.
pub trait ProgressCallback: Send + Sync {
    /// Called at regular intervals during a search.
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. The default callback.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clone this token and share it between threads; call
/// [`cancel`](CancellationToken::cancel) from any thread to request
/// cancellation. Library searches check
/// [`is_cancelled`](CancellationToken::is_cancelled) before each video.
///
/// # Example
///
/// ```
/// use vidsift::CancellationToken;
///
/// let token = CancellationToken::new();
/// assert!(!token.is_cancelled());
///
/// token.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks progress timing and emits callbacks.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    batch_size: u64,
    start_time: Instant,
    items_since_last_report: u64,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
        batch_size: u64,
    ) -> Self {
        Self {
            callback,
            operation,
            total,
            current: 0,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            items_since_last_report: 0,
        }
    }

    /// Record one processed video and fire the callback if the batch
    /// threshold is reached.
    pub(crate) fn advance(&mut self, video_id: Option<&str>) {
        self.current += 1;
        self.items_since_last_report += 1;

        if self.items_since_last_report >= self.batch_size {
            self.report(video_id);
            self.items_since_last_report = 0;
        }
    }

    /// Unconditionally emit a final progress report.
    pub(crate) fn finish(&mut self) {
        self.report(None);
    }

    fn report(&self, video_id: Option<&str>) {
        let elapsed = self.start_time.elapsed();

        let percentage = self
            .total
            .filter(|&t| t > 0)
            .map(|t| (self.current as f32 / t as f32) * 100.0);

        let estimated_remaining = estimate_remaining(elapsed, self.current, self.total);

        let info = ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            percentage,
            elapsed,
            estimated_remaining,
            current_video: video_id.map(str::to_string),
        };

        self.callback.on_progress(&info);
    }
}

/// Time left if the remaining videos take as long as the processed ones did.
fn estimate_remaining(elapsed: Duration, current: u64, total: Option<u64>) -> Option<Duration> {
    if current == 0 {
        return None;
    }
    let remaining = total?.saturating_sub(current);
    Some(elapsed.mul_f64(remaining as f64 / current as f64))
}
