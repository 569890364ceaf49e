use crate::analysis::{aggregate, chart_from_results};
use crate::models::{CanonicalResult, ChartData, SentimentStats, Source};

/// Per-session context threaded through the router.
///
/// Holds what a front end would otherwise keep as globals: the result on
/// display, the last chart data fetched from the backend and the cached
/// history.
#[derive(Debug, Clone, Default)]
pub struct AnalysisState {
    pub last_result: Option<CanonicalResult>,
    /// Replaced wholesale on every refresh.
    pub chart: Option<ChartData>,
    pub history: Vec<CanonicalResult>,
}

impl AnalysisState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sentiment buckets over the cached history.
    pub fn history_stats(&self) -> SentimentStats {
        aggregate(self.history.iter().map(|r| r.sentiment.as_str()))
    }

    /// Chart data computed from the cached history instead of the backend.
    pub fn history_chart(&self, source: Option<Source>) -> ChartData {
        chart_from_results(&self.history, source)
    }
}
