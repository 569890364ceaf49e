use crate::analysis::{error_marker, normalize_value};
use crate::error::AppError;
use crate::models::{CanonicalResult, Source};
use crate::providers::traits::BackendClient;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Classifies text through the backend's local inference endpoints.
///
/// The endpoints answer with structured data and persist on their own. On an
/// `{error}` reply or a transport failure the adapter returns `None` and the
/// caller keeps whatever result it already had. Any other reply, however
/// malformed, is normalized.
pub struct LocalProviderAdapter<B: BackendClient> {
    backend: Arc<B>,
}

#[derive(Debug, Clone, Copy)]
enum Endpoint {
    Analyze,
    Basic,
}

impl<B: BackendClient> LocalProviderAdapter<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    /// Local inference model.
    pub async fn analyze(&self, text: &str) -> Option<CanonicalResult> {
        self.run(Endpoint::Analyze, text).await
    }

    /// Keyword-based classifier; independent of the online/offline mode.
    pub async fn analyze_basic(&self, text: &str) -> Option<CanonicalResult> {
        self.run(Endpoint::Basic, text).await
    }

    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn run(&self, endpoint: Endpoint, text: &str) -> Option<CanonicalResult> {
        let reply = match endpoint {
            Endpoint::Analyze => self.backend.analyze(text).await,
            Endpoint::Basic => self.backend.analyze_basic(text).await,
        };

        match reply {
            Ok(value) => {
                if let Some(marker) = error_marker(&value) {
                    warn!(?endpoint, "Local provider reported an error: {}", marker);
                    return None;
                }
                let result = normalize_value(text, Some(value), Source::Local);
                info!(?endpoint, sentiment = %result.sentiment, "Local analysis complete");
                Some(result)
            }
            Err(AppError::MalformedResponse(e)) => {
                warn!(?endpoint, "Local provider reply unreadable, normalizing to Unknown: {}", e);
                Some(CanonicalResult::unknown(text, Source::Local))
            }
            Err(e) => {
                error!(?endpoint, "Local provider request failed: {}", e);
                None
            }
        }
    }
}
