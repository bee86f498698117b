//! Search configuration.
//!
//! [`SearchOptions`] is a builder that threads progress callbacks,
//! cancellation tokens, and matching policy through search methods without
//! polluting every function signature.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use vidsift::{CancellationToken, ProgressCallback, ProgressInfo, SearchOptions, TimestampPolicy};
//!
//! struct LogProgress;
//! impl ProgressCallback for LogProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("{:?}: {} videos scored", info.operation, info.current);
//!     }
//! }
//!
//! let token = CancellationToken::new();
//! let options = SearchOptions::new()
//!     .with_progress(Arc::new(LogProgress))
//!     .with_cancellation(token.clone())
//!     .with_timestamp_policy(TimestampPolicy::Strict)
//!     .with_batch_size(10);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// What to do with an appearance whose timestamps do not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampPolicy {
    /// Drop the offending appearance and keep going. This is the default.
    #[default]
    Skip,
    /// Fail the whole match with
    /// [`VidsiftError::MalformedTimestamp`](crate::VidsiftError::MalformedTimestamp).
    Strict,
}

/// Configuration for matching and library searches.
///
/// All fields have sensible defaults; a default-constructed value matches
/// every category, including the transcript, and skips malformed
/// timestamps.
#[derive(Clone)]
pub struct SearchOptions {
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
    /// How often to fire the progress callback (every N videos).
    pub(crate) batch_size: u64,
    /// Handling of malformed appearance timestamps.
    pub(crate) timestamp_policy: TimestampPolicy,
    /// Whether transcript segments produce subtitle groups.
    pub(crate) include_subtitles: bool,
}

impl Debug for SearchOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("SearchOptions")
            .field("has_progress", &true)
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .field("timestamp_policy", &self.timestamp_policy)
            .field("include_subtitles", &self.include_subtitles)
            .finish()
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchOptions {
    /// Create options with default settings.
    ///
    /// Defaults: no progress callback, no cancellation, batch size 1,
    /// [`TimestampPolicy::Skip`], subtitles included.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
            timestamp_policy: TimestampPolicy::Skip,
            include_subtitles: true,
        }
    }

    /// Attach a progress callback, invoked every
    /// [`batch_size`](SearchOptions::with_batch_size) videos.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// When the token is cancelled, a library search stops before the next
    /// video and returns [`VidsiftError::Cancelled`](crate::VidsiftError::Cancelled).
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Set how often the progress callback fires. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    /// Set the malformed-timestamp policy.
    #[must_use]
    pub fn with_timestamp_policy(mut self, policy: TimestampPolicy) -> Self {
        self.timestamp_policy = policy;
        self
    }

    /// Enable or disable transcript matching. Enabled by default.
    #[must_use]
    pub fn with_subtitles(mut self, include: bool) -> Self {
        self.include_subtitles = include;
        self
    }

    /// The configured malformed-timestamp policy.
    pub fn timestamp_policy(&self) -> TimestampPolicy {
        self.timestamp_policy
    }

    /// Whether transcript segments are matched.
    pub fn includes_subtitles(&self) -> bool {
        self.include_subtitles
    }

    /// Returns `true` if cancellation has been requested.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
