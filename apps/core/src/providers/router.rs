use crate::error::AppError;
use crate::models::{CanonicalResult, HistoryRecord, Mode};
use crate::providers::local::LocalProviderAdapter;
use crate::providers::remote::RemoteProviderAdapter;
use crate::providers::traits::{BackendClient, GenerativeClient};
use crate::state::AnalysisState;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Single entry point for analyzing one item.
///
/// Dispatch is by mode only: `Online` goes to the remote adapter, `Offline`
/// to the local one, and neither falls back to the other.
pub struct ProviderRouter<G, B>
where
    G: GenerativeClient,
    B: BackendClient,
{
    remote: Option<RemoteProviderAdapter<G, B>>,
    local: LocalProviderAdapter<B>,
    backend: Arc<B>,
}

impl<G, B> ProviderRouter<G, B>
where
    G: GenerativeClient,
    B: BackendClient,
{
    /// Creates a router. Without a generator, online mode is unavailable.
    pub fn new(generator: Option<Arc<G>>, backend: Arc<B>) -> Self {
        Self {
            remote: generator.map(|g| RemoteProviderAdapter::new(g, backend.clone())),
            local: LocalProviderAdapter::new(backend.clone()),
            backend,
        }
    }

    pub fn supports_online(&self) -> bool {
        self.remote.is_some()
    }

    /// Analyzes `text` with the provider selected by `mode` and returns the
    /// session's current result.
    ///
    /// Online always replaces the current result, sentinels included. Offline
    /// only replaces it on success; a local failure leaves the previous result
    /// in place.
    #[instrument(skip(self, state, text), fields(len = text.len()))]
    pub async fn analyze(
        &self,
        state: &mut AnalysisState,
        text: &str,
        mode: Mode,
    ) -> Result<Option<CanonicalResult>, AppError> {
        validate_text(text)?;

        match mode {
            Mode::Online => {
                let remote = self.remote.as_ref().ok_or_else(|| {
                    AppError::Config("Online mode requested but no remote provider is configured".to_string())
                })?;
                let outcome = remote.analyze_detailed(text).await;
                let saved = outcome.is_classified();
                state.last_result = Some(outcome.into_result());
                if saved {
                    self.refresh_chart(state).await;
                }
            }
            Mode::Offline => {
                if let Some(result) = self.local.analyze(text).await {
                    state.last_result = Some(result);
                    self.refresh_chart(state).await;
                }
            }
        }

        Ok(state.last_result.clone())
    }

    /// Analyzes `text` with the basic classifier, whatever the mode. Same
    /// state policy as offline analysis.
    #[instrument(skip(self, state, text), fields(len = text.len()))]
    pub async fn analyze_basic(
        &self,
        state: &mut AnalysisState,
        text: &str,
    ) -> Result<Option<CanonicalResult>, AppError> {
        validate_text(text)?;

        if let Some(result) = self.local.analyze_basic(text).await {
            state.last_result = Some(result);
            self.refresh_chart(state).await;
        }
        Ok(state.last_result.clone())
    }

    /// Re-fetches chart data. A failure is logged and the previous chart kept.
    pub async fn refresh_chart(&self, state: &mut AnalysisState) {
        match self.backend.chart_data().await {
            Ok(chart) => state.chart = Some(chart),
            Err(e) => warn!("Chart data refresh failed: {}", e),
        }
    }

    /// Reloads the history cache from the backend.
    #[instrument(skip(self, state))]
    pub async fn refresh_history(&self, state: &mut AnalysisState) -> Result<usize, AppError> {
        let records = self.backend.history().await?;
        state.history = records.into_iter().map(HistoryRecord::into_canonical).collect();
        info!(count = state.history.len(), "History refreshed");
        Ok(state.history.len())
    }

    /// Asks the backend to delete all history. The cache is emptied only if
    /// the backend confirmed.
    #[instrument(skip(self, state))]
    pub async fn clear_history(&self, state: &mut AnalysisState) -> Result<bool, AppError> {
        let cleared = self.backend.clear_history().await?;
        if cleared {
            state.history.clear();
            info!("History cleared");
        }
        Ok(cleared)
    }
}

fn validate_text(text: &str) -> Result<(), AppError> {
    if text.trim().is_empty() {
        return Err(AppError::Validation("No text provided".to_string()));
    }
    Ok(())
}
