//! Matching and scoring tests.
//!
//! Metadata is built inline except where a fixture from `tests/fixtures/`
//! exercises the full insights document.

use vidsift::{
    MatchGroup, MatchKind, SearchOptions, SearchQuery, Tag, TimeRange, TimestampPolicy,
    TranscriptInstance, TranscriptSegment, VideoInsights, VideoMetadata, VidsiftError,
    match_video,
};

fn kitchen_cat() -> VideoMetadata {
    VideoMetadata::from(
        VideoInsights::open("tests/fixtures/kitchen_cat.json").expect("Failed to load fixture"),
    )
}

fn cat_scenario() -> VideoMetadata {
    VideoMetadata {
        keywords: vec![Tag::new("cat", vec![TimeRange::new("0:05", "0:10")])],
        transcript: vec![TranscriptSegment::new(
            "a cat ran",
            vec![TranscriptInstance::new("0:05", "0:10")],
        )],
        ..VideoMetadata::default()
    }
}

// ── Scoring ──────────────────────────────────────────────────────

#[test]
fn keyword_and_subtitle_scenario() {
    let outcome = match_video(&cat_scenario(), &SearchQuery::text("cat"), &SearchOptions::new())
        .expect("Match failed");

    assert_eq!(outcome.matching_tag_names, ["cat"]);
    assert_eq!(outcome.score, 1.0);
    assert_eq!(
        outcome.matching_timestamps,
        vec![
            MatchGroup {
                kind: MatchKind::Keyword,
                name: "cat".to_string(),
                appearances: vec![TimeRange::new("0:05", "0:10")],
            },
            MatchGroup {
                kind: MatchKind::Subtitle,
                name: "cat".to_string(),
                appearances: vec![TimeRange::new("0:05", "0:10").with_text("a cat ran")],
            },
        ]
    );
}

#[test]
fn half_the_terms_score_one_half() {
    let outcome = match_video(&cat_scenario(), &SearchQuery::text("cat dog"), &SearchOptions::new())
        .expect("Match failed");
    assert_eq!(outcome.matching_tag_names, ["cat"]);
    assert_eq!(outcome.score, 0.5);
}

#[test]
fn empty_query_scores_zero() {
    let outcome = match_video(&kitchen_cat(), &SearchQuery::text(""), &SearchOptions::new())
        .expect("Match failed");
    assert_eq!(outcome.score, 0.0);
    assert!(!outcome.score.is_nan());
    assert!(outcome.matching_tag_names.is_empty());
    assert!(outcome.matching_timestamps.is_empty());
}

#[test]
fn duplicate_text_terms_count_in_denominator() {
    let outcome = match_video(&cat_scenario(), &SearchQuery::text("cat cat dog"), &SearchOptions::new())
        .expect("Match failed");
    assert_eq!(outcome.matching_tag_names, ["cat", "cat"]);
    assert!((outcome.score - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn term_matching_several_tags_counts_once() {
    // "cat" is both a label and a keyword in the fixture.
    let outcome = match_video(&kitchen_cat(), &SearchQuery::text("cat"), &SearchOptions::new())
        .expect("Match failed");
    assert_eq!(outcome.matching_tag_names, ["cat"]);
    assert_eq!(outcome.score, 1.0);
}

#[test]
fn score_stays_within_bounds() {
    let metadata = kitchen_cat();
    for query in ["cat", "CAT kitchen pets", "nothing here", "cat cat cat", "pets dog"] {
        let outcome = match_video(&metadata, &SearchQuery::text(query), &SearchOptions::new())
            .expect("Match failed");
        assert!(
            (0.0..=1.0).contains(&outcome.score),
            "score {} out of range for {query:?}",
            outcome.score,
        );
    }
}

#[test]
fn query_is_case_insensitive() {
    let outcome = match_video(&kitchen_cat(), &SearchQuery::text("KITCHEN"), &SearchOptions::new())
        .expect("Match failed");
    assert_eq!(outcome.matching_tag_names, ["kitchen"]);
    assert_eq!(outcome.matching_timestamps[0].name, "Kitchen");
}

// ── Timestamp groups ─────────────────────────────────────────────

#[test]
fn groups_follow_category_order() {
    let outcome = match_video(
        &kitchen_cat(),
        &SearchQuery::text("pets cat kitty"),
        &SearchOptions::new(),
    )
    .expect("Match failed");

    let kinds: Vec<MatchKind> = outcome.matching_timestamps.iter().map(|g| g.kind).collect();
    assert_eq!(
        kinds,
        [
            MatchKind::Label,
            MatchKind::Keyword,
            MatchKind::Topic,
            MatchKind::Subtitle,
            MatchKind::Subtitle,
        ]
    );
}

#[test]
fn tag_group_carries_full_appearances() {
    let metadata = kitchen_cat();
    let outcome = match_video(&metadata, &SearchQuery::text("cat"), &SearchOptions::new())
        .expect("Match failed");

    let label = &outcome.matching_timestamps[0];
    assert_eq!(label.kind, MatchKind::Label);
    assert_eq!(label.name, "Cat");
    assert_eq!(label.appearances, metadata.labels[0].appearances);

    let label_groups = outcome
        .matching_timestamps
        .iter()
        .filter(|g| g.kind == MatchKind::Label && g.name == "Cat")
        .count();
    assert_eq!(label_groups, 1);
}

#[test]
fn subtitle_group_named_after_first_matching_term() {
    let metadata = VideoMetadata {
        transcript: vec![TranscriptSegment::new(
            "The dog chased the cat",
            vec![TranscriptInstance::new("0:01", "0:04")],
        )],
        ..VideoMetadata::default()
    };

    let outcome = match_video(&metadata, &SearchQuery::text("cat dog"), &SearchOptions::new())
        .expect("Match failed");
    assert_eq!(outcome.matching_timestamps.len(), 1);
    assert_eq!(outcome.matching_timestamps[0].name, "cat");
    assert_eq!(
        outcome.matching_timestamps[0].appearances[0].text.as_deref(),
        Some("The dog chased the cat")
    );
}

#[test]
fn subtitle_matches_substrings_once_per_segment() {
    let outcome = match_video(&kitchen_cat(), &SearchQuery::text("kitty"), &SearchOptions::new())
        .expect("Match failed");

    // Matching a transcript segment does not affect the score.
    assert_eq!(outcome.score, 0.0);
    assert_eq!(outcome.matching_timestamps.len(), 1);

    let group = &outcome.matching_timestamps[0];
    assert_eq!(group.kind, MatchKind::Subtitle);
    assert_eq!(group.appearances.len(), 2);
    assert!(group.appearances.iter().all(|a| a.text.as_deref() == Some("Here kitty kitty")));
}

#[test]
fn segments_without_terms_produce_nothing() {
    let outcome = match_video(&kitchen_cat(), &SearchQuery::text("floor"), &SearchOptions::new())
        .expect("Match failed");
    let subtitles: Vec<_> = outcome
        .matching_timestamps
        .iter()
        .filter(|g| g.kind == MatchKind::Subtitle)
        .collect();
    assert_eq!(subtitles.len(), 1);
    assert_eq!(subtitles[0].appearances[0].start, "0:05");
}

#[test]
fn subtitles_can_be_disabled() {
    let options = SearchOptions::new().with_subtitles(false);
    let outcome =
        match_video(&cat_scenario(), &SearchQuery::text("cat"), &options).expect("Match failed");
    assert_eq!(outcome.matching_timestamps.len(), 1);
    assert_eq!(outcome.matching_timestamps[0].kind, MatchKind::Keyword);
}

#[test]
fn absent_categories_contribute_nothing() {
    let outcome = match_video(&VideoMetadata::default(), &SearchQuery::text("cat"), &SearchOptions::new())
        .expect("Match failed");
    assert_eq!(outcome.score, 0.0);
    assert!(outcome.matching_timestamps.is_empty());
}

#[test]
fn blank_terms_never_match_every_segment() {
    let metadata = VideoMetadata {
        labels: vec![Tag::new("", vec![TimeRange::new("0:00", "0:01")])],
        transcript: vec![
            TranscriptSegment::new("nothing to see", vec![TranscriptInstance::new("0:01", "0:02")]),
            TranscriptSegment::new("move along", vec![TranscriptInstance::new("0:02", "0:03")]),
        ],
        ..VideoMetadata::default()
    };

    for query in [SearchQuery::text("  \t "), SearchQuery::image(["", "   "])] {
        assert!(query.is_empty());
        let outcome = match_video(&metadata, &query, &SearchOptions::new()).expect("Match failed");
        assert_eq!(outcome.score, 0.0);
        assert!(outcome.matching_tag_names.is_empty());
        assert!(outcome.matching_timestamps.is_empty());
    }

    let query = SearchQuery::image(["", " Cat "]);
    assert_eq!(query.terms(), ["cat"]);
}

// ── Image search ─────────────────────────────────────────────────

#[test]
fn image_search_scores_against_unique_tags() {
    let query = SearchQuery::image(["Cat", "cat", "sofa", "Kitchen"]);
    let outcome = match_video(&kitchen_cat(), &query, &SearchOptions::new()).expect("Match failed");

    assert_eq!(outcome.matching_tag_names, ["cat", "kitchen"]);
    assert!((outcome.score - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn image_search_timestamps_use_matched_tags_only() {
    // "kitty" is not a tag, so it must not pull in transcript matches.
    let query = SearchQuery::image(["kitty", "pets"]);
    let outcome = match_video(&kitchen_cat(), &query, &SearchOptions::new()).expect("Match failed");

    assert_eq!(outcome.matching_tag_names, ["pets"]);
    assert_eq!(outcome.matching_timestamps.len(), 1);
    assert_eq!(outcome.matching_timestamps[0].kind, MatchKind::Topic);
}

#[test]
fn empty_image_query_scores_zero() {
    let query = SearchQuery::image(Vec::<String>::new());
    let outcome = match_video(&kitchen_cat(), &query, &SearchOptions::new()).expect("Match failed");
    assert_eq!(outcome.score, 0.0);
    assert!(outcome.matching_tag_names.is_empty());
}

// ── Malformed timestamps ─────────────────────────────────────────

fn with_bad_appearance() -> VideoMetadata {
    VideoMetadata {
        labels: vec![
            Tag::new(
                "cat",
                vec![TimeRange::new("0:01", "0:02"), TimeRange::new("soon", "0:09")],
            ),
            Tag::new("cat", vec![TimeRange::new("??", "0:09")]),
        ],
        ..VideoMetadata::default()
    }
}

#[test]
fn skip_policy_drops_only_bad_appearances() {
    let outcome = match_video(&with_bad_appearance(), &SearchQuery::text("cat"), &SearchOptions::new())
        .expect("Skip policy should not fail");

    assert_eq!(outcome.matching_timestamps.len(), 1);
    assert_eq!(
        outcome.matching_timestamps[0].appearances,
        [TimeRange::new("0:01", "0:02")]
    );
}

#[test]
fn strict_policy_fails_the_match() {
    let options = SearchOptions::new().with_timestamp_policy(TimestampPolicy::Strict);
    let error = match_video(&with_bad_appearance(), &SearchQuery::text("cat"), &options).unwrap_err();
    assert!(matches!(error, VidsiftError::MalformedTimestamp { ref value, .. } if value == "soon"));
}

// ── Serialization ────────────────────────────────────────────────

#[test]
fn outcome_serializes_for_the_presentation_layer() {
    let outcome = match_video(&cat_scenario(), &SearchQuery::text("cat"), &SearchOptions::new())
        .expect("Match failed");
    let value = serde_json::to_value(&outcome).expect("Serialize failed");

    assert_eq!(value["matchingTagNames"], serde_json::json!(["cat"]));
    assert_eq!(value["score"], 1.0);
    assert_eq!(value["matchingTimestamps"][0]["type"], "keyword");
    assert_eq!(value["matchingTimestamps"][1]["type"], "subtitle");
    assert_eq!(value["matchingTimestamps"][1]["appearances"][0]["text"], "a cat ran");
}
