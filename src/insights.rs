//! Video metadata and the insights payload it is built from.
//!
//! [`VideoMetadata`] is the read-only bundle the matcher works on: three tag
//! categories plus a transcript, each defaulting to empty when the service
//! omitted it. [`VideoInsights`] mirrors the JSON document returned by the
//! video-intelligence service and converts into a [`VideoMetadata`].
//!
//! # Example
//!
//! ```
//! use vidsift::{VideoInsights, VideoMetadata};
//!
//! let insights = VideoInsights::from_json(r#"{
//!     "id": "abc123",
//!     "summarizedInsights": {
//!         "keywords": [
//!             { "name": "Cat", "appearances": [{ "startTime": "0:05", "endTime": "0:10" }] }
//!         ]
//!     }
//! }"#)?;
//! let metadata = VideoMetadata::from(insights);
//! assert_eq!(metadata.keywords[0].name, "Cat");
//! assert!(metadata.labels.is_empty());
//! # Ok::<(), vidsift::VidsiftError>(())
//! ```

use std::collections::HashSet;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::VidsiftError;
use crate::timestamp::parse_seconds;

/// The three extracted tag categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagCategory {
    /// Visual labels (objects, scenes).
    Label,
    /// Keywords extracted from speech and on-screen text.
    Keyword,
    /// Inferred topics.
    Topic,
}

impl TagCategory {
    /// All categories, in match-output order.
    pub const ALL: [TagCategory; 3] = [TagCategory::Label, TagCategory::Keyword, TagCategory::Topic];

    /// Lower-case name used in output.
    pub fn as_str(self) -> &'static str {
        match self {
            TagCategory::Label => "label",
            TagCategory::Keyword => "keyword",
            TagCategory::Topic => "topic",
        }
    }
}

impl Display for TagCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A start/end pair during which a tag or a line of speech is present.
///
/// `start` and `end` are kept exactly as the service sent them; use
/// [`start_seconds`](TimeRange::start_seconds) and friends to interpret them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start, as `minutes:seconds`.
    #[serde(rename = "startTime", alias = "start")]
    pub start: String,
    /// End (exclusive), as `minutes:seconds`.
    #[serde(rename = "endTime", alias = "end")]
    pub end: String,
    /// Spoken text for subtitle appearances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl TimeRange {
    /// Create a range without text.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
            text: None,
        }
    }

    /// Attach subtitle text.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Parsed start in elapsed seconds.
    pub fn start_seconds(&self) -> Result<f64, VidsiftError> {
        parse_seconds(&self.start)
    }

    /// Parsed end in elapsed seconds.
    pub fn end_seconds(&self) -> Result<f64, VidsiftError> {
        parse_seconds(&self.end)
    }

    /// Playback position to seek to when this range is selected.
    pub fn seek_seconds(&self) -> Result<f64, VidsiftError> {
        self.start_seconds()
    }

    /// Both endpoints parsed, as `(start, end)` seconds.
    pub fn seconds(&self) -> Result<(f64, f64), VidsiftError> {
        Ok((self.start_seconds()?, self.end_seconds()?))
    }
}

/// A named concept with the time ranges where it appears.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Display name, in the service's casing.
    pub name: String,
    /// Where the tag appears.
    #[serde(default)]
    pub appearances: Vec<TimeRange>,
}

impl Tag {
    /// Create a tag.
    pub fn new(name: impl Into<String>, appearances: Vec<TimeRange>) -> Self {
        Self {
            name: name.into(),
            appearances,
        }
    }
}

/// One occurrence of a transcript segment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptInstance {
    /// Start, as `minutes:seconds`.
    pub start: String,
    /// End (exclusive), as `minutes:seconds`.
    pub end: String,
}

impl TranscriptInstance {
    /// Create an instance.
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

/// A block of spoken text, possibly repeated at several instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// The spoken text.
    pub text: String,
    /// Every time the text is spoken.
    #[serde(default)]
    pub instances: Vec<TranscriptInstance>,
}

impl TranscriptSegment {
    /// Create a segment.
    pub fn new(text: impl Into<String>, instances: Vec<TranscriptInstance>) -> Self {
        Self {
            text: text.into(),
            instances,
        }
    }
}

/// Everything the matcher reads about one video.
///
/// Missing categories deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Visual labels.
    #[serde(default)]
    pub labels: Vec<Tag>,
    /// Extracted keywords.
    #[serde(default)]
    pub keywords: Vec<Tag>,
    /// Inferred topics.
    #[serde(default)]
    pub topics: Vec<Tag>,
    /// Ordered transcript.
    #[serde(default)]
    pub transcript: Vec<TranscriptSegment>,
}

impl VideoMetadata {
    /// Tags of one category.
    pub fn category(&self, category: TagCategory) -> &[Tag] {
        match category {
            TagCategory::Label => &self.labels,
            TagCategory::Keyword => &self.keywords,
            TagCategory::Topic => &self.topics,
        }
    }

    /// Lower-cased names across all three tag categories.
    pub fn tag_names(&self) -> HashSet<String> {
        TagCategory::ALL
            .iter()
            .flat_map(|&category| self.category(category))
            .map(|tag| tag.name.to_lowercase())
            .collect()
    }

    /// `true` when there are no tags and no transcript.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
            && self.keywords.is_empty()
            && self.topics.is_empty()
            && self.transcript.is_empty()
    }
}

/// The insights document returned by the video-intelligence service.
///
/// Only the fields the matcher needs are modelled; everything else in the
/// document is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInsights {
    /// Service-side video id.
    #[serde(default)]
    pub id: Option<String>,
    /// Video display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Aggregated tag categories.
    #[serde(default)]
    pub summarized_insights: Option<SummarizedInsights>,
    /// Per-video detailed insights. Only the first entry is read.
    #[serde(default)]
    pub videos: Vec<IndexedVideo>,
}

/// The `summarizedInsights` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummarizedInsights {
    #[serde(default)]
    pub labels: Vec<Tag>,
    #[serde(default)]
    pub keywords: Vec<Tag>,
    #[serde(default)]
    pub topics: Vec<Tag>,
}

/// One entry of the `videos` array.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexedVideo {
    #[serde(default)]
    pub insights: Option<IndexedVideoInsights>,
}

/// Detailed insights for one indexed video.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IndexedVideoInsights {
    #[serde(default)]
    pub transcript: Vec<TranscriptSegment>,
}

impl VideoInsights {
    /// Decode an insights document from a JSON string.
    ///
    /// # Errors
    ///
    /// [`VidsiftError::InvalidInsights`] if the JSON does not match the
    /// expected shape.
    pub fn from_json(json: &str) -> Result<Self, VidsiftError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode an insights document from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, VidsiftError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read and decode an insights document from disk.
    ///
    /// # Errors
    ///
    /// - [`VidsiftError::IoError`] if the file cannot be opened.
    /// - [`VidsiftError::InvalidInsights`] if it is not a valid document.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, VidsiftError> {
        let path = path.as_ref();
        log::debug!("Loading insights from {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// The transcript of the first indexed video, if any.
    pub fn transcript(&self) -> &[TranscriptSegment] {
        self.videos
            .first()
            .and_then(|video| video.insights.as_ref())
            .map(|insights| insights.transcript.as_slice())
            .unwrap_or_default()
    }
}

impl From<VideoInsights> for VideoMetadata {
    fn from(mut insights: VideoInsights) -> Self {
        let transcript = insights
            .videos
            .drain(..)
            .next()
            .and_then(|video| video.insights)
            .map(|details| details.transcript)
            .unwrap_or_default();
        let summary = insights.summarized_insights.unwrap_or_default();

        VideoMetadata {
            labels: summary.labels,
            keywords: summary.keywords,
            topics: summary.topics,
            transcript,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_are_empty() {
        let metadata = VideoMetadata::from(VideoInsights::from_json("{}").unwrap());
        assert!(metadata.is_empty());
    }

    #[test]
    fn tag_names_are_lowercased_across_categories() {
        let metadata = VideoMetadata {
            labels: vec![Tag::new("Dog", vec![])],
            keywords: vec![Tag::new("CAT", vec![])],
            topics: vec![Tag::new("dog", vec![])],
            transcript: vec![],
        };
        let names = metadata.tag_names();
        assert_eq!(names.len(), 2);
        assert!(names.contains("dog"));
        assert!(names.contains("cat"));
    }

    #[test]
    fn appearances_accept_both_key_spellings() {
        let range: TimeRange =
            serde_json::from_str(r#"{ "start": "0:01", "end": "0:02" }"#).unwrap();
        assert_eq!(range, TimeRange::new("0:01", "0:02"));

        let range: TimeRange =
            serde_json::from_str(r#"{ "startTime": "0:01", "endTime": "0:02" }"#).unwrap();
        assert_eq!(range.seconds().unwrap(), (1.0, 2.0));
    }

    #[test]
    fn serializes_with_service_key_names() {
        let range = TimeRange::new("0:05", "0:10").with_text("a cat ran");
        let value = serde_json::to_value(&range).unwrap();
        assert_eq!(value["startTime"], "0:05");
        assert_eq!(value["endTime"], "0:10");
        assert_eq!(value["text"], "a cat ran");

        let bare = serde_json::to_value(TimeRange::new("0:05", "0:10")).unwrap();
        assert!(bare.get("text").is_none());
    }
}
