use crate::error::AppError;
use crate::models::{CanonicalResult, ChartData, HistoryRecord, RawAnalysis};
use async_trait::async_trait;
use serde_json::Value;

/// Defines the public interface for a remote generative-language service.
///
/// This trait abstracts the concrete API so the remote adapter can be driven
/// by any backend (Gemini in production, scripted mocks in tests).
#[async_trait]
pub trait GenerativeClient: Send + Sync + 'static {
    /// Sends a single prompt and returns the model's free-text reply.
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}

/// Defines the public interface for the analysis backend service.
///
/// One method per endpoint. Implementations return `Err` only for transport
/// problems or unreadable bodies; an `{error}` reply from an analysis endpoint
/// is returned as `Ok` with the marker in place.
#[async_trait]
pub trait BackendClient: Send + Sync + 'static {
    /// GET chart-data.
    async fn chart_data(&self) -> Result<ChartData, AppError>;

    /// POST analyze: local inference provider. The body is returned as-is;
    /// its fields are whatever the model produced.
    async fn analyze(&self, text: &str) -> Result<Value, AppError>;

    /// POST analyze-basic: keyword classifier.
    async fn analyze_basic(&self, text: &str) -> Result<Value, AppError>;

    /// POST save-analysis: persists a remote-provider result.
    async fn save_analysis(&self, result: &CanonicalResult) -> Result<(), AppError>;

    /// GET history.
    async fn history(&self) -> Result<Vec<HistoryRecord>, AppError>;

    /// DELETE history. `Ok(true)` when the backend acknowledged the deletion.
    async fn clear_history(&self) -> Result<bool, AppError>;

    /// GET reddit-search?subreddit=X.
    async fn reddit_search(&self, subreddit: &str) -> Result<Vec<String>, AppError>;

    /// POST reddit-textblob: sentiment of one social post.
    async fn reddit_sentiment(&self, text: &str, source: &str) -> Result<RawAnalysis, AppError>;
}
