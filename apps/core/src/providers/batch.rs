use crate::analysis::aggregate;
use crate::error::AppError;
use crate::models::{BatchEntry, Sentiment, SentimentStats};
use crate::providers::traits::BackendClient;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Source tag sent with every social post.
pub const SOCIAL_SOURCE: &str = "reddit";

/// Result of analyzing one subreddit.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub batch_id: Uuid,
    pub subreddit: String,
    /// One entry per post, in post order.
    pub entries: Vec<BatchEntry>,
    /// How many entries are `Unknown` because their request failed.
    pub failures: usize,
}

impl BatchReport {
    /// Finds the entry for `post` by text equality.
    pub fn result_for(&self, post: &str) -> Option<&BatchEntry> {
        self.entries.iter().find(|entry| entry.text == post)
    }

    pub fn stats(&self) -> SentimentStats {
        aggregate(self.entries.iter().map(|e| e.sentiment.as_str()))
    }
}

/// Runs the social sentiment classifier over a list of posts.
///
/// Items are analyzed one at a time, in order; each request completes before
/// the next one starts. A failed item is recorded as `Unknown` at its own
/// position and the batch carries on.
pub struct BatchAnalyzer<B: BackendClient> {
    backend: Arc<B>,
}

impl<B: BackendClient> BatchAnalyzer<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Fetches post titles for `subreddit`.
    #[instrument(skip(self))]
    pub async fn fetch_posts(&self, subreddit: &str) -> Result<Vec<String>, AppError> {
        let subreddit = subreddit.trim();
        if subreddit.is_empty() {
            return Err(AppError::Validation("Subreddit is required".to_string()));
        }
        let posts = self.backend.reddit_search(subreddit).await?;
        info!(count = posts.len(), "Fetched posts");
        Ok(posts)
    }

    /// Analyzes `items`; output has the same length and order as the input.
    pub async fn analyze_batch(&self, items: &[String]) -> Vec<BatchEntry> {
        self.run(items).await.0
    }

    /// Fetches the posts of `subreddit` and analyzes them.
    #[instrument(skip(self), fields(batch_id))]
    pub async fn analyze_subreddit(&self, subreddit: &str) -> Result<BatchReport, AppError> {
        let batch_id = Uuid::new_v4();
        tracing::Span::current().record("batch_id", tracing::field::display(batch_id));

        let posts = self.fetch_posts(subreddit).await?;
        let (entries, failures) = self.run(&posts).await;
        if failures > 0 {
            warn!(failures, total = entries.len(), "Batch finished with isolated failures");
        } else {
            info!(total = entries.len(), "Batch finished");
        }

        Ok(BatchReport {
            batch_id,
            subreddit: subreddit.trim().to_string(),
            entries,
            failures,
        })
    }

    async fn run(&self, items: &[String]) -> (Vec<BatchEntry>, usize) {
        let outcomes: Vec<(BatchEntry, bool)> = stream::iter(items.iter().enumerate())
            .then(|(index, item)| self.analyze_item(index, item))
            .collect()
            .await;

        let failures = outcomes.iter().filter(|(_, failed)| *failed).count();
        let entries = outcomes.into_iter().map(|(entry, _)| entry).collect();
        (entries, failures)
    }

    /// Returns the entry and whether the item failed.
    async fn analyze_item(&self, index: usize, item: &str) -> (BatchEntry, bool) {
        let sentiment = match self.backend.reddit_sentiment(item, SOCIAL_SOURCE).await {
            Ok(raw) if raw.is_error() => {
                warn!(index, "Post analysis rejected: {:?}", raw.error);
                None
            }
            Ok(raw) => match raw.sentiment {
                Some(label) => Some(Sentiment::from_label(&label)),
                None => {
                    warn!(index, "Post analysis reply has no sentiment");
                    None
                }
            },
            Err(e) => {
                warn!(index, "Post analysis failed: {}", e);
                None
            }
        };

        let failed = sentiment.is_none();
        let entry = BatchEntry {
            text: item.to_string(),
            sentiment: sentiment.unwrap_or(Sentiment::Unknown),
        };
        (entry, failed)
    }
}
