//! # vidsift
//!
//! Rank indexed videos against a text query or an analysed image, and jump
//! straight to the moments that matched.
//!
//! `vidsift` works on the insights a video-intelligence service extracts
//! from each video: labels, keywords and topics with the time ranges where
//! they appear, plus a timed transcript. For every video it reports which
//! search terms were found among its tags, a relevance score, and a list of
//! clickable timestamp groups. During playback it finds the transcript line
//! to show at the current position.
//!
//! ## Quick Start
//!
//! ### Score One Video
//!
//! ```
//! use vidsift::{SearchOptions, SearchQuery, VideoInsights, VideoMetadata, match_video};
//!
//! let insights = VideoInsights::from_json(r#"{
//!     "summarizedInsights": {
//!         "keywords": [{ "name": "cat", "appearances": [{ "startTime": "0:05", "endTime": "0:10" }] }]
//!     },
//!     "videos": [{ "insights": { "transcript": [
//!         { "text": "a cat ran", "instances": [{ "start": "0:05", "end": "0:10" }] }
//!     ] } }]
//! }"#)?;
//! let metadata = VideoMetadata::from(insights);
//!
//! let outcome = match_video(&metadata, &SearchQuery::text("cat"), &SearchOptions::new())?;
//! assert_eq!(outcome.score, 1.0);
//! assert_eq!(outcome.matching_timestamps.len(), 2);
//! # Ok::<(), vidsift::VidsiftError>(())
//! ```
//!
//! ### Rank a Library
//!
//! ```no_run
//! use vidsift::{Library, SearchOptions, SearchQuery};
//!
//! let options = SearchOptions::new();
//! let library = Library::load(&["insights/a.json", "insights/b.json"], &options)?;
//! for result in library.search(&SearchQuery::text("red car"), &options)? {
//!     println!("{} {:.0}%", result.video.name, result.score * 100.0);
//! }
//! # Ok::<(), vidsift::VidsiftError>(())
//! ```
//!
//! ### Sync Subtitles
//!
//! ```
//! use vidsift::{SubtitleLocator, TranscriptInstance, TranscriptSegment};
//!
//! let transcript = vec![TranscriptSegment::new(
//!     "hello there",
//!     vec![TranscriptInstance::new("0:10", "0:20")],
//! )];
//! let locator = SubtitleLocator::new(&transcript);
//! assert_eq!(locator.text_at(12.5), Some("hello there"));
//! ```
//!
//! ## Features
//!
//! - **Text search** — whitespace-split, lower-cased terms scored against
//!   label, keyword and topic names
//! - **Image search** — deduplicated tags from an image analysis
//! - **Timestamp groups** — per label, keyword, topic, and transcript segment
//! - **Subtitle sync** — half-open `[start, end)` lookup over every instance
//! - **Highlighting** — case-insensitive keyword spans for subtitle text
//! - **Progress & cancellation** — callbacks and `CancellationToken` for
//!   library-wide searches
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `rayon` | `Library::search_parallel()` scores videos across rayon threads |
//! | `full` | Enables all of the above |

pub mod configuration;
pub mod error;
pub mod highlight;
pub mod insights;
pub mod library;
pub mod locator;
pub mod matcher;
pub mod progress;
pub mod query;
#[cfg(feature = "rayon")]
mod rayon;
pub mod timestamp;

pub use configuration::{SearchOptions, TimestampPolicy};
pub use error::VidsiftError;
pub use highlight::{HighlightSpan, highlight};
pub use insights::{
    IndexedVideo, IndexedVideoInsights, SummarizedInsights, Tag, TagCategory, TimeRange,
    TranscriptInstance, TranscriptSegment, VideoInsights, VideoMetadata,
};
pub use library::{Library, MatchResult, VideoRef, rank};
pub use locator::{SubtitleLocator, locate};
pub use matcher::{MatchGroup, MatchKind, MatchOutcome, match_video, matching_timestamps, score};
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
pub use query::{ImageAnalysis, ImageCaption, ImageDescription, ImageTag, SearchMode, SearchQuery};
pub use timestamp::{Timestamp, format_timestamp, parse_seconds};
