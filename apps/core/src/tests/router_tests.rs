//! Router Tests
//!
//! Mode dispatch, session state updates and history management.

use super::mocks::{error_reply, raw_reply, sample_chart, MockBackend, MockGenerator};
use crate::error::AppError;
use crate::models::{CanonicalResult, ChartData, HistoryRecord, Mode, RawEmotion, Sentiment, Source};
use crate::providers::router::ProviderRouter;
use crate::state::AnalysisState;
use serde_json::json;
use std::sync::Arc;

const GOOD_REPLY: &str = "{\"sentiment\":\"Positive\",\"emotion\":[\"joy\"],\"topic\":\"food\"}";

fn router(
    generator: Option<MockGenerator>,
    backend: MockBackend,
) -> (ProviderRouter<MockGenerator, MockBackend>, Arc<MockBackend>) {
    let backend = Arc::new(backend);
    (ProviderRouter::new(generator.map(Arc::new), backend.clone()), backend)
}

fn previous_result() -> CanonicalResult {
    CanonicalResult {
        text: "earlier".into(),
        sentiment: Sentiment::Negative,
        emotion: vec!["sadness".into()],
        topic: "rain".into(),
        source: Source::Local,
        timestamp: None,
    }
}

// ============================================================================
// Offline
// ============================================================================

#[tokio::test]
async fn test_offline_success_updates_result_and_chart() {
    let backend = MockBackend::new().with_analyze(Ok(raw_reply("POSITIVE", &["joy"], "food")));
    let (router, backend) = router(None, backend);
    let mut state = AnalysisState::new();

    let result = router.analyze(&mut state, "great pizza", Mode::Offline).await.unwrap();

    let result = result.expect("offline success should produce a result");
    assert_eq!(result.sentiment, Sentiment::Positive);
    assert_eq!(result.source, Source::Local);
    assert_eq!(state.last_result.as_ref(), Some(&result));
    assert_eq!(state.chart, Some(sample_chart()));
    assert_eq!(backend.calls(), vec!["analyze", "chart-data"]);
}

#[tokio::test]
async fn test_offline_error_marker_keeps_prior_result() {
    let backend = MockBackend::new().with_analyze(Ok(error_reply("Invalid JSON from Ollama")));
    let (router, backend) = router(None, backend);
    let mut state = AnalysisState {
        last_result: Some(previous_result()),
        ..Default::default()
    };

    let result = router.analyze(&mut state, "anything", Mode::Offline).await.unwrap();

    assert_eq!(result, Some(previous_result()));
    assert_eq!(state.last_result, Some(previous_result()));
    assert!(state.chart.is_none());
    assert!(!backend.called("chart-data"));
}

#[tokio::test]
async fn test_offline_transport_failure_keeps_prior_result() {
    let backend = MockBackend::new().with_analyze(Err(AppError::Transport("refused".into())));
    let (router, _) = router(None, backend);
    let mut state = AnalysisState {
        last_result: Some(previous_result()),
        ..Default::default()
    };

    let result = router.analyze(&mut state, "anything", Mode::Offline).await.unwrap();

    assert_eq!(result, Some(previous_result()));
}

#[tokio::test]
async fn test_offline_failure_without_prior_result_is_none() {
    let backend = MockBackend::new().with_analyze(Ok(error_reply("No text provided")));
    let (router, _) = router(None, backend);
    let mut state = AnalysisState::new();

    let result = router.analyze(&mut state, "anything", Mode::Offline).await.unwrap();

    assert!(result.is_none());
}

#[tokio::test]
async fn test_offline_wrongly_typed_reply_replaces_result_with_unknown() {
    // 1. Arrange
    let body = json!({"sentiment": "positive", "emotion": [{"label": "joy"}], "topic": "x"});
    let backend = MockBackend::new().with_analyze_body(Ok(body));
    let (router, backend) = router(None, backend);
    let mut state = AnalysisState {
        last_result: Some(previous_result()),
        ..Default::default()
    };

    // 2. Act
    let result = router.analyze(&mut state, "odd reply", Mode::Offline).await.unwrap();

    // 3. Assert
    let result = result.expect("a malformed reply still yields a result");
    assert_eq!(result.sentiment, Sentiment::Unknown);
    assert_eq!(result.text, "odd reply");
    assert_eq!(result.source, Source::Local);
    assert_eq!(state.last_result, Some(result));
    assert_eq!(state.chart, Some(sample_chart()));
    assert_eq!(backend.calls(), vec!["analyze", "chart-data"]);
}

#[tokio::test]
async fn test_offline_unreadable_body_becomes_unknown() {
    let backend =
        MockBackend::new().with_analyze_body(Err(AppError::MalformedResponse("<html>".into())));
    let (router, _) = router(None, backend);
    let mut state = AnalysisState {
        last_result: Some(previous_result()),
        ..Default::default()
    };

    let result = router.analyze(&mut state, "x", Mode::Offline).await.unwrap().unwrap();

    assert_eq!(result.sentiment, Sentiment::Unknown);
    assert!(state.chart.is_some());
}

#[tokio::test]
async fn test_offline_never_uses_remote() {
    let (router, _) = router(Some(MockGenerator::replying(GOOD_REPLY)), MockBackend::new());
    let mut state = AnalysisState::new();

    let result = router.analyze(&mut state, "text", Mode::Offline).await.unwrap().unwrap();

    assert_eq!(result.source, Source::Local);
}

// ============================================================================
// Online
// ============================================================================

#[tokio::test]
async fn test_online_success_saves_and_refreshes_chart() {
    let (router, backend) = router(Some(MockGenerator::replying(GOOD_REPLY)), MockBackend::new());
    let mut state = AnalysisState::new();

    let result = router.analyze(&mut state, "great pizza", Mode::Online).await.unwrap().unwrap();

    assert_eq!(result.sentiment, Sentiment::Positive);
    assert_eq!(result.source, Source::Remote);
    assert_eq!(backend.calls(), vec!["save-analysis", "chart-data"]);
    assert!(state.chart.is_some());
}

#[tokio::test]
async fn test_online_failure_replaces_prior_result_with_error() {
    let (router, backend) = router(Some(MockGenerator::unreachable()), MockBackend::new());
    let mut state = AnalysisState {
        last_result: Some(previous_result()),
        ..Default::default()
    };

    let result = router.analyze(&mut state, "text", Mode::Online).await.unwrap().unwrap();

    assert_eq!(result.sentiment, Sentiment::Error);
    assert_eq!(state.last_result.unwrap().sentiment, Sentiment::Error);
    // No fallback to the local provider, and nothing to refresh.
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_online_unusable_reply_sets_unknown_without_refresh() {
    let (router, backend) = router(Some(MockGenerator::replying("no idea")), MockBackend::new());
    let mut state = AnalysisState::new();

    let result = router.analyze(&mut state, "text", Mode::Online).await.unwrap().unwrap();

    assert_eq!(result.sentiment, Sentiment::Unknown);
    assert!(!backend.called("chart-data"));
}

#[tokio::test]
async fn test_online_without_remote_is_config_error() {
    let (router, backend) = router(None, MockBackend::new());
    let mut state = AnalysisState::new();

    let result = router.analyze(&mut state, "text", Mode::Online).await;

    assert!(matches!(result, Err(AppError::Config(_))));
    assert!(!router.supports_online());
    assert!(backend.calls().is_empty());
}

// ============================================================================
// Basic, validation, chart and history
// ============================================================================

#[tokio::test]
async fn test_basic_always_uses_basic_endpoint() {
    let (router, backend) = router(Some(MockGenerator::replying(GOOD_REPLY)), MockBackend::new());
    let mut state = AnalysisState::new();

    let result = router.analyze_basic(&mut state, "I love it").await.unwrap().unwrap();

    assert_eq!(result.sentiment, Sentiment::Neutral);
    assert_eq!(result.emotion, vec!["unsure"]);
    assert_eq!(backend.calls(), vec!["analyze-basic", "chart-data"]);
}

#[tokio::test]
async fn test_basic_error_keeps_prior_result() {
    let backend = MockBackend::new().with_basic(Ok(error_reply("No text provided")));
    let (router, _) = router(None, backend);
    let mut state = AnalysisState {
        last_result: Some(previous_result()),
        ..Default::default()
    };

    let result = router.analyze_basic(&mut state, "x").await.unwrap();

    assert_eq!(result, Some(previous_result()));
}

#[tokio::test]
async fn test_blank_text_is_rejected_before_any_call() {
    let (router, backend) = router(Some(MockGenerator::replying(GOOD_REPLY)), MockBackend::new());
    let mut state = AnalysisState::new();

    for mode in [Mode::Online, Mode::Offline] {
        let result = router.analyze(&mut state, "   ", mode).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
    assert!(matches!(router.analyze_basic(&mut state, "").await, Err(AppError::Validation(_))));
    assert!(backend.calls().is_empty());
}

#[tokio::test]
async fn test_chart_refresh_failure_keeps_previous_chart() {
    let backend = MockBackend::new().with_chart(Err(AppError::Transport("down".into())));
    let (router, _) = router(None, backend);
    let old_chart = ChartData::default();
    let mut state = AnalysisState {
        chart: Some(old_chart.clone()),
        ..Default::default()
    };

    let result = router.analyze(&mut state, "text", Mode::Offline).await.unwrap();

    assert!(result.is_some());
    assert_eq!(state.chart, Some(old_chart));
}

#[tokio::test]
async fn test_refresh_history_normalizes_records() {
    let records = vec![
        HistoryRecord {
            text: Some("a".into()),
            sentiment: Some("positive".into()),
            emotion: Some(RawEmotion::Scalar("unsure".into())),
            topic: Some("reddit".into()),
            source: Some("reddit".into()),
            timestamp: Some("2024-10-15T10:00:00Z".into()),
        },
        HistoryRecord {
            text: Some("b".into()),
            sentiment: Some("Whatever".into()),
            ..Default::default()
        },
    ];
    let (router, _) = router(None, MockBackend::new().with_history(Ok(records)));
    let mut state = AnalysisState::new();

    let count = router.refresh_history(&mut state).await.unwrap();

    assert_eq!(count, 2);
    assert_eq!(state.history[0].source, Source::Social);
    assert_eq!(state.history[0].emotion, vec!["unsure"]);
    assert!(state.history[0].timestamp.is_some());
    assert_eq!(state.history[1].sentiment, Sentiment::Unknown);

    let stats = state.history_stats();
    assert_eq!(stats.positive, 1);
    assert_eq!(stats.unknown, 1);
    assert_eq!(stats.total(), state.history.len());

    let chart = state.history_chart(Some(Source::Social));
    assert_eq!(chart.sentiments.len(), 1);
    assert_eq!(chart.emotions[0].name, "unsure");
}

#[tokio::test]
async fn test_refresh_history_failure_keeps_cache() {
    let backend = MockBackend::new().with_history(Err(AppError::Transport("down".into())));
    let (router, _) = router(None, backend);
    let mut state = AnalysisState {
        history: vec![previous_result()],
        ..Default::default()
    };

    assert!(router.refresh_history(&mut state).await.is_err());
    assert_eq!(state.history.len(), 1);
}

#[tokio::test]
async fn test_clear_history_only_empties_cache_when_acknowledged() {
    let (refusing, _) = router(None, MockBackend::new().with_clear(Ok(false)));
    let mut state = AnalysisState {
        history: vec![previous_result()],
        ..Default::default()
    };
    assert!(!refusing.clear_history(&mut state).await.unwrap());
    assert_eq!(state.history.len(), 1);

    let (accepting, _) = router(None, MockBackend::new());
    assert!(accepting.clear_history(&mut state).await.unwrap());
    assert!(state.history.is_empty());
}
