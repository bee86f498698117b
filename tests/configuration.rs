//! SearchOptions and TimestampPolicy tests.

use std::sync::Arc;

use vidsift::{
    CancellationToken, ProgressCallback, ProgressInfo, SearchOptions, TimestampPolicy,
};

// ── SearchOptions builder ────────────────────────────────────────

#[test]
fn options_defaults() {
    let options = SearchOptions::new();
    let debug = format!("{options:?}");
    assert!(debug.contains("SearchOptions"));
    assert!(debug.contains("has_cancellation: false"));
    assert!(debug.contains("batch_size: 1"));
    assert!(debug.contains("include_subtitles: true"));
    assert_eq!(options.timestamp_policy(), TimestampPolicy::Skip);
    assert!(options.includes_subtitles());
}

#[test]
fn options_default_trait_matches_new() {
    assert_eq!(
        format!("{:?}", SearchOptions::default()),
        format!("{:?}", SearchOptions::new()),
    );
}

#[test]
fn options_with_batch_size() {
    let options = SearchOptions::new().with_batch_size(10);
    assert!(format!("{options:?}").contains("batch_size: 10"));
}

#[test]
fn options_with_batch_size_clamps_zero() {
    let options = SearchOptions::new().with_batch_size(0);
    // Clamped to 1.
    assert!(format!("{options:?}").contains("batch_size: 1"));
}

#[test]
fn options_with_cancellation() {
    let options = SearchOptions::new().with_cancellation(CancellationToken::new());
    assert!(format!("{options:?}").contains("has_cancellation: true"));
}

#[test]
fn options_with_policy_and_subtitles() {
    let options = SearchOptions::new()
        .with_timestamp_policy(TimestampPolicy::Strict)
        .with_subtitles(false);
    assert_eq!(options.timestamp_policy(), TimestampPolicy::Strict);
    assert!(!options.includes_subtitles());
}

#[test]
fn options_accept_custom_progress() {
    struct Silent;
    impl ProgressCallback for Silent {
        fn on_progress(&self, _info: &ProgressInfo) {}
    }

    let options = SearchOptions::new().with_progress(Arc::new(Silent));
    assert!(format!("{options:?}").contains("has_progress: true"));
}

// ── CancellationToken ────────────────────────────────────────────

#[test]
fn cancellation_is_shared_between_clones() {
    let token = CancellationToken::new();
    let clone = token.clone();
    assert!(!clone.is_cancelled());

    token.cancel();
    assert!(clone.is_cancelled());
}

#[test]
fn cancellation_crosses_threads() {
    let token = CancellationToken::default();
    let worker = token.clone();
    std::thread::spawn(move || worker.cancel())
        .join()
        .expect("Thread panicked");
    assert!(token.is_cancelled());
}
