//! Searching a collection of videos.
//!
//! [`Library`] holds the metadata of every known video together with its
//! lower-cased tag-name set, so repeated searches do not rebuild it.
//! Replacing a video's metadata through [`Library::insert`] recomputes that
//! set; nothing else can change an entry.
//!
//! [`Library::search`] scores every video and returns [`MatchResult`]s
//! ranked by score, highest first. Image searches additionally drop videos
//! that matched nothing.
//!
//! # Example
//!
//! ```
//! use vidsift::{Library, SearchOptions, SearchQuery, Tag, VideoMetadata, VideoRef};
//!
//! let mut library = Library::new();
//! library.insert(
//!     VideoRef::new("a", "Garden"),
//!     VideoMetadata { labels: vec![Tag::new("Dog", vec![])], ..Default::default() },
//! );
//! library.insert(
//!     VideoRef::new("b", "Kitchen"),
//!     VideoMetadata { labels: vec![Tag::new("Cat", vec![])], ..Default::default() },
//! );
//!
//! let results = library.search(&SearchQuery::text("cat"), &SearchOptions::new())?;
//! assert_eq!(results[0].video.id, "b");
//! assert_eq!(results[0].score, 1.0);
//! # Ok::<(), vidsift::VidsiftError>(())
//! ```

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::configuration::SearchOptions;
use crate::error::VidsiftError;
use crate::insights::{VideoInsights, VideoMetadata};
use crate::matcher::{MatchGroup, MatchOutcome, match_with_tag_names};
use crate::progress::{OperationType, ProgressTracker};
use crate::query::{SearchMode, SearchQuery};

/// Identity of a video in the library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoRef {
    pub id: String,
    pub name: String,
}

impl VideoRef {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// One video's result for one query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResult {
    pub video: VideoRef,
    pub matching_tag_names: Vec<String>,
    /// Fraction of search terms found, in `[0, 1]`.
    pub score: f64,
    pub matching_timestamps: Vec<MatchGroup>,
}

impl MatchResult {
    pub fn new(video: VideoRef, outcome: MatchOutcome) -> Self {
        Self {
            video,
            matching_tag_names: outcome.matching_tag_names,
            score: outcome.score,
            matching_timestamps: outcome.matching_timestamps,
        }
    }
}

/// A library entry with its cached tag-name set.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    pub(crate) video: VideoRef,
    pub(crate) metadata: VideoMetadata,
    pub(crate) tag_names: HashSet<String>,
}

impl Entry {
    fn new(video: VideoRef, metadata: VideoMetadata) -> Self {
        let tag_names = metadata.tag_names();
        Self {
            video,
            metadata,
            tag_names,
        }
    }

    pub(crate) fn score_against(
        &self,
        query: &SearchQuery,
        options: &SearchOptions,
    ) -> Result<MatchResult, VidsiftError> {
        let outcome = match_with_tag_names(&self.metadata, &self.tag_names, query, options)?;
        Ok(MatchResult::new(self.video.clone(), outcome))
    }
}

/// An insertion-ordered collection of videos and their metadata.
#[derive(Debug, Clone, Default)]
pub struct Library {
    entries: Vec<Entry>,
}

impl Library {
    /// Create an empty library.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load one insights document per path.
    ///
    /// A document without an `id` is keyed by its file stem; a document
    /// without a `name` is named after its id.
    ///
    /// # Errors
    ///
    /// - [`VidsiftError::IoError`] if a file cannot be read.
    /// - [`VidsiftError::InvalidInsights`] if a file is not a valid document.
    /// - [`VidsiftError::Cancelled`] if the options' token is cancelled.
    pub fn load<P: AsRef<Path>>(paths: &[P], options: &SearchOptions) -> Result<Self, VidsiftError> {
        let mut tracker = ProgressTracker::new(
            options.progress.clone(),
            OperationType::InsightsLoading,
            Some(paths.len() as u64),
            options.batch_size,
        );

        let mut library = Library::new();
        for path in paths {
            if options.is_cancelled() {
                return Err(VidsiftError::Cancelled);
            }

            let path = path.as_ref();
            let mut insights = VideoInsights::open(path)?;
            let id = insights.id.take().unwrap_or_else(|| {
                path.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });
            let name = insights.name.take().unwrap_or_else(|| id.clone());

            tracker.advance(Some(&id));
            library.insert(VideoRef::new(id, name), VideoMetadata::from(insights));
        }

        tracker.finish();
        Ok(library)
    }

    /// Add a video or replace the metadata of an existing one.
    ///
    /// Returns the previous metadata when `video.id` was already present.
    /// The replaced entry keeps its position.
    pub fn insert(&mut self, video: VideoRef, metadata: VideoMetadata) -> Option<VideoMetadata> {
        let entry = Entry::new(video, metadata);
        match self.position(&entry.video.id) {
            Some(index) => {
                log::debug!("Replacing metadata for video {}", entry.video.id);
                let previous = std::mem::replace(&mut self.entries[index], entry);
                Some(previous.metadata)
            }
            None => {
                self.entries.push(entry);
                None
            }
        }
    }

    /// Remove a video, returning its metadata.
    pub fn remove(&mut self, id: &str) -> Option<VideoMetadata> {
        let index = self.position(id)?;
        Some(self.entries.remove(index).metadata)
    }

    /// Metadata of one video.
    pub fn get(&self, id: &str) -> Option<&VideoMetadata> {
        self.entries
            .iter()
            .find(|entry| entry.video.id == id)
            .map(|entry| &entry.metadata)
    }

    /// All videos in insertion order.
    pub fn videos(&self) -> impl Iterator<Item = &VideoRef> {
        self.entries.iter().map(|entry| &entry.video)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.video.id == id)
    }

    /// Score every video against `query` and rank the results.
    ///
    /// # Errors
    ///
    /// - [`VidsiftError::Cancelled`] if the options' token is cancelled
    ///   before the search finishes.
    /// - [`VidsiftError::MalformedTimestamp`] under
    ///   [`TimestampPolicy::Strict`](crate::TimestampPolicy::Strict).
    pub fn search(
        &self,
        query: &SearchQuery,
        options: &SearchOptions,
    ) -> Result<Vec<MatchResult>, VidsiftError> {
        log::debug!(
            "Searching {} video(s) for {} term(s)",
            self.entries.len(),
            query.terms().len()
        );

        let mut tracker = ProgressTracker::new(
            options.progress.clone(),
            operation_for(query),
            Some(self.entries.len() as u64),
            options.batch_size,
        );

        let mut results = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            if options.is_cancelled() {
                return Err(VidsiftError::Cancelled);
            }
            results.push(entry.score_against(query, options)?);
            tracker.advance(Some(&entry.video.id));
        }
        tracker.finish();

        rank(&mut results, query.mode());
        Ok(results)
    }

    /// [`search`](Library::search), scoring videos across rayon threads.
    ///
    /// Results are identical to the sequential search.
    #[cfg(feature = "rayon")]
    pub fn search_parallel(
        &self,
        query: &SearchQuery,
        options: &SearchOptions,
    ) -> Result<Vec<MatchResult>, VidsiftError> {
        let mut results = crate::rayon::parallel_search(&self.entries, query, options)?;
        rank(&mut results, query.mode());
        Ok(results)
    }
}

pub(crate) fn operation_for(query: &SearchQuery) -> OperationType {
    match query.mode() {
        SearchMode::Text => OperationType::TextSearch,
        SearchMode::Image => OperationType::ImageSearch,
    }
}

/// Sort results by score, highest first, keeping insertion order for ties.
///
/// For [`SearchMode::Image`] results scoring zero are dropped.
pub fn rank(results: &mut Vec<MatchResult>, mode: SearchMode) {
    if mode == SearchMode::Image {
        results.retain(|result| result.score > 0.0);
    }
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}
