//! Query-to-video matching and scoring.
//!
//! [`match_video`] reconciles a [`SearchQuery`] against one video's
//! [`VideoMetadata`]. It produces the query terms found among the video's
//! tag names, a relevance score, and the [`MatchGroup`]s a viewer can click
//! to jump to a matching moment.
//!
//! Groups come out in a fixed order: labels, keywords, topics, then
//! transcript matches, each in the order the metadata lists them.
//!
//! # Example
//!
//! ```
//! use vidsift::{
//!     MatchKind, SearchOptions, SearchQuery, Tag, TimeRange, TranscriptInstance,
//!     TranscriptSegment, VideoMetadata, match_video,
//! };
//!
//! let metadata = VideoMetadata {
//!     keywords: vec![Tag::new("cat", vec![TimeRange::new("0:05", "0:10")])],
//!     transcript: vec![TranscriptSegment::new(
//!         "a cat ran",
//!         vec![TranscriptInstance::new("0:05", "0:10")],
//!     )],
//!     ..VideoMetadata::default()
//! };
//!
//! let outcome = match_video(&metadata, &SearchQuery::text("cat dog"), &SearchOptions::new())?;
//! assert_eq!(outcome.matching_tag_names, ["cat"]);
//! assert_eq!(outcome.score, 0.5);
//! assert_eq!(outcome.matching_timestamps[0].kind, MatchKind::Keyword);
//! assert_eq!(outcome.matching_timestamps[1].kind, MatchKind::Subtitle);
//! # Ok::<(), vidsift::VidsiftError>(())
//! ```

use std::collections::HashSet;
use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};

use crate::configuration::{SearchOptions, TimestampPolicy};
use crate::error::VidsiftError;
use crate::insights::{TagCategory, TimeRange, VideoMetadata};
use crate::query::{SearchMode, SearchQuery};

/// Where a [`MatchGroup`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    Label,
    Keyword,
    Topic,
    /// A transcript segment containing a search term.
    Subtitle,
}

impl From<TagCategory> for MatchKind {
    fn from(category: TagCategory) -> Self {
        match category {
            TagCategory::Label => MatchKind::Label,
            TagCategory::Keyword => MatchKind::Keyword,
            TagCategory::Topic => MatchKind::Topic,
        }
    }
}

impl Display for MatchKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MatchKind::Label => write!(f, "label"),
            MatchKind::Keyword => write!(f, "keyword"),
            MatchKind::Topic => write!(f, "topic"),
            MatchKind::Subtitle => write!(f, "subtitle"),
        }
    }
}

/// A clickable group of time ranges for one matched tag or transcript
/// segment.
///
/// `appearances` is never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchGroup {
    #[serde(rename = "type")]
    pub kind: MatchKind,
    /// Tag name as the service spelled it, or for subtitles the first
    /// search term found in the segment.
    pub name: String,
    pub appearances: Vec<TimeRange>,
}

/// What [`match_video`] computes for one video.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOutcome {
    /// Search terms found among the video's tag names.
    pub matching_tag_names: Vec<String>,
    /// Fraction of search terms found, in `[0, 1]`.
    pub score: f64,
    pub matching_timestamps: Vec<MatchGroup>,
}

/// Match a query against one video.
///
/// Text queries count every term, duplicates included, in the score
/// denominator. Image queries are already deduplicated; their timestamp
/// groups are built from the matched tags only. An empty query scores `0`.
///
/// # Errors
///
/// [`VidsiftError::MalformedTimestamp`] when an appearance fails to parse
/// and the options use [`TimestampPolicy::Strict`]. With the default
/// [`TimestampPolicy::Skip`] this never fails.
pub fn match_video(
    metadata: &VideoMetadata,
    query: &SearchQuery,
    options: &SearchOptions,
) -> Result<MatchOutcome, VidsiftError> {
    match_with_tag_names(metadata, &metadata.tag_names(), query, options)
}

/// [`match_video`] with a precomputed lower-cased tag-name set.
pub(crate) fn match_with_tag_names(
    metadata: &VideoMetadata,
    tag_names: &HashSet<String>,
    query: &SearchQuery,
    options: &SearchOptions,
) -> Result<MatchOutcome, VidsiftError> {
    let terms = query.terms();
    let matching_tag_names: Vec<String> = terms
        .iter()
        .filter(|term| tag_names.contains(term.as_str()))
        .cloned()
        .collect();

    let score = score(matching_tag_names.len(), terms.len());

    let timestamp_terms = match query.mode() {
        SearchMode::Text => terms,
        SearchMode::Image => matching_tag_names.as_slice(),
    };
    let matching_timestamps = matching_timestamps(metadata, timestamp_terms, options)?;

    Ok(MatchOutcome {
        matching_tag_names,
        score,
        matching_timestamps,
    })
}

/// `matched / total`, defined as `0.0` when `total` is zero.
pub fn score(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    matched as f64 / total as f64
}

/// Collect timestamp groups for `terms`, which must already be lower-cased.
///
/// # Errors
///
/// See [`match_video`].
pub fn matching_timestamps(
    metadata: &VideoMetadata,
    terms: &[String],
    options: &SearchOptions,
) -> Result<Vec<MatchGroup>, VidsiftError> {
    let term_set: HashSet<&str> = terms.iter().map(String::as_str).collect();
    let mut groups = Vec::new();

    for category in TagCategory::ALL {
        for tag in metadata.category(category) {
            if !term_set.contains(tag.name.to_lowercase().as_str()) {
                continue;
            }
            let appearances = checked_appearances(&tag.appearances, options.timestamp_policy)?;
            if appearances.is_empty() {
                continue;
            }
            groups.push(MatchGroup {
                kind: category.into(),
                name: tag.name.clone(),
                appearances,
            });
        }
    }

    if !options.include_subtitles {
        return Ok(groups);
    }

    for segment in &metadata.transcript {
        let text = segment.text.to_lowercase();
        let Some(term) = terms.iter().find(|term| text.contains(term.as_str())) else {
            continue;
        };

        let annotated: Vec<TimeRange> = segment
            .instances
            .iter()
            .map(|instance| {
                TimeRange::new(instance.start.clone(), instance.end.clone())
                    .with_text(segment.text.clone())
            })
            .collect();
        let appearances = checked_appearances(&annotated, options.timestamp_policy)?;
        if appearances.is_empty() {
            continue;
        }

        groups.push(MatchGroup {
            kind: MatchKind::Subtitle,
            name: term.clone(),
            appearances,
        });
    }

    log::debug!("Collected {} timestamp group(s) for {} term(s)", groups.len(), terms.len());
    Ok(groups)
}

/// Apply the timestamp policy to a list of appearances.
fn checked_appearances(
    appearances: &[TimeRange],
    policy: TimestampPolicy,
) -> Result<Vec<TimeRange>, VidsiftError> {
    let mut kept = Vec::with_capacity(appearances.len());
    for appearance in appearances {
        match appearance.seconds() {
            Ok(_) => kept.push(appearance.clone()),
            Err(error) if policy == TimestampPolicy::Skip => {
                log::warn!("Skipping appearance: {error}");
            }
            Err(error) => return Err(error),
        }
    }
    Ok(kept)
}
