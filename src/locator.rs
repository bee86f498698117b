//! Subtitle lookup by playback position.
//!
//! Players call into this module on every time update to decide which line
//! of the transcript to show. A segment is active while the position lies in
//! `[start, end)` of any of its instances; the end is exclusive so two
//! back-to-back segments are never both active at the boundary.
//!
//! [`locate`] parses timestamps on every call and suits one-off lookups.
//! [`SubtitleLocator`] parses the transcript once and is the better fit for
//! the steady stream of time-update events during playback.
//!
//! # Example
//!
//! ```
//! use vidsift::{SubtitleLocator, TranscriptInstance, TranscriptSegment};
//!
//! let transcript = vec![
//!     TranscriptSegment::new("hello", vec![TranscriptInstance::new("0:10", "0:20")]),
//!     TranscriptSegment::new("world", vec![TranscriptInstance::new("0:20", "0:25")]),
//! ];
//! let locator = SubtitleLocator::new(&transcript);
//! assert_eq!(locator.text_at(10.0), Some("hello"));
//! assert_eq!(locator.text_at(20.0), Some("world"));
//! assert_eq!(locator.text_at(25.0), None);
//! ```

use crate::error::VidsiftError;
use crate::insights::{TranscriptInstance, TranscriptSegment};
use crate::timestamp::parse_seconds;

/// Text of the first segment, in transcript order, active at
/// `position_seconds`.
///
/// Every instance of a segment is checked, so repeated phrases are found on
/// each occurrence. Instances whose timestamps do not parse never match.
pub fn locate(transcript: &[TranscriptSegment], position_seconds: f64) -> Option<&str> {
    transcript
        .iter()
        .find(|segment| {
            segment
                .instances
                .iter()
                .filter_map(|instance| instance_bounds(instance).ok())
                .any(|(start, end)| start <= position_seconds && position_seconds < end)
        })
        .map(|segment| segment.text.as_str())
}

fn instance_bounds(instance: &TranscriptInstance) -> Result<(f64, f64), VidsiftError> {
    Ok((parse_seconds(&instance.start)?, parse_seconds(&instance.end)?))
}

#[derive(Debug, Clone, Copy)]
struct Cue {
    start: f64,
    end: f64,
    segment: usize,
}

/// A transcript with its timestamps parsed once up front.
#[derive(Debug, Clone, Default)]
pub struct SubtitleLocator {
    /// Ordered by segment index, then instance order.
    cues: Vec<Cue>,
    texts: Vec<String>,
}

impl SubtitleLocator {
    /// Parse every instance of `transcript`.
    ///
    /// Instances with malformed timestamps are logged and left out.
    pub fn new(transcript: &[TranscriptSegment]) -> Self {
        let mut cues = Vec::new();
        for (segment, entry) in transcript.iter().enumerate() {
            for instance in &entry.instances {
                match instance_bounds(instance) {
                    Ok((start, end)) => cues.push(Cue { start, end, segment }),
                    Err(error) => log::warn!("Ignoring transcript instance: {error}"),
                }
            }
        }

        Self {
            cues,
            texts: transcript.iter().map(|segment| segment.text.clone()).collect(),
        }
    }

    /// Text active at `position_seconds`, if any.
    pub fn text_at(&self, position_seconds: f64) -> Option<&str> {
        self.cues
            .iter()
            .find(|cue| cue.start <= position_seconds && position_seconds < cue.end)
            .map(|cue| self.texts[cue.segment].as_str())
    }

    /// Number of usable instances.
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str, instances: &[(&str, &str)]) -> TranscriptSegment {
        TranscriptSegment::new(
            text,
            instances
                .iter()
                .map(|(start, end)| TranscriptInstance::new(*start, *end))
                .collect(),
        )
    }

    #[test]
    fn start_inclusive_end_exclusive() {
        let transcript = vec![segment("hello", &[("0:10", "0:20")])];
        assert_eq!(locate(&transcript, 10.0), Some("hello"));
        assert_eq!(locate(&transcript, 19.99), Some("hello"));
        assert_eq!(locate(&transcript, 20.0), None);
        assert_eq!(locate(&transcript, 9.99), None);
    }

    #[test]
    fn later_instances_are_checked() {
        let transcript = vec![segment("again", &[("0:01", "0:02"), ("1:00", "1:05")])];
        assert_eq!(locate(&transcript, 62.0), Some("again"));
        assert_eq!(SubtitleLocator::new(&transcript).text_at(62.0), Some("again"));
    }

    #[test]
    fn first_segment_wins_on_overlap() {
        let transcript = vec![
            segment("first", &[("0:00", "0:10")]),
            segment("second", &[("0:05", "0:15")]),
        ];
        assert_eq!(locate(&transcript, 7.0), Some("first"));
        assert_eq!(SubtitleLocator::new(&transcript).text_at(7.0), Some("first"));
    }

    #[test]
    fn malformed_instances_are_ignored() {
        let transcript = vec![segment("bad", &[("x:01", "0:10")]), segment("good", &[("0:00", "0:10")])];
        assert_eq!(locate(&transcript, 5.0), Some("good"));

        let locator = SubtitleLocator::new(&transcript);
        assert_eq!(locator.len(), 1);
        assert_eq!(locator.text_at(5.0), Some("good"));
    }
}
