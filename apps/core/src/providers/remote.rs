use crate::analysis::{extract_json_object, normalize};
use crate::models::{CanonicalResult, RawAnalysis, Source};
use crate::providers::traits::{BackendClient, GenerativeClient};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// What happened to a remote analysis.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteOutcome {
    /// The model produced a complete classification; it was handed to the
    /// backend for persistence.
    Classified(CanonicalResult),
    /// The model replied but no usable structure could be extracted.
    Unusable(CanonicalResult),
    /// The service could not be reached.
    Unreachable(CanonicalResult),
}

impl RemoteOutcome {
    pub fn result(&self) -> &CanonicalResult {
        match self {
            RemoteOutcome::Classified(r) | RemoteOutcome::Unusable(r) | RemoteOutcome::Unreachable(r) => r,
        }
    }

    pub fn into_result(self) -> CanonicalResult {
        match self {
            RemoteOutcome::Classified(r) | RemoteOutcome::Unusable(r) | RemoteOutcome::Unreachable(r) => r,
        }
    }

    pub fn is_classified(&self) -> bool {
        matches!(self, RemoteOutcome::Classified(_))
    }
}

/// Classifies text with a remote generative model.
///
/// The model answers in free text, so the reply goes through the JSON
/// extractor before normalization. Complete results are saved through the
/// backend with source `remote`.
pub struct RemoteProviderAdapter<G, B>
where
    G: GenerativeClient,
    B: BackendClient,
{
    generator: Arc<G>,
    backend: Arc<B>,
}

impl<G, B> RemoteProviderAdapter<G, B>
where
    G: GenerativeClient,
    B: BackendClient,
{
    pub fn new(generator: Arc<G>, backend: Arc<B>) -> Self {
        Self { generator, backend }
    }

    /// Analyzes one text. Never fails: transport problems yield the Error
    /// sentinel, unusable replies the Unknown result.
    pub async fn analyze(&self, text: &str) -> CanonicalResult {
        self.analyze_detailed(text).await.into_result()
    }

    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn analyze_detailed(&self, text: &str) -> RemoteOutcome {
        let prompt = build_classification_prompt(text);

        let reply = match self.generator.generate(&prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                error!("Remote provider unreachable: {}", e);
                return RemoteOutcome::Unreachable(CanonicalResult::error(text, Source::Remote));
            }
        };
        debug!("Remote reply: {}", reply);

        let Some(value) = extract_json_object(&reply) else {
            warn!("Remote reply contains no JSON object");
            return RemoteOutcome::Unusable(CanonicalResult::unknown(text, Source::Remote));
        };

        let raw = match serde_json::from_value::<RawAnalysis>(value) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Remote reply object has unexpected field types: {}", e);
                return RemoteOutcome::Unusable(CanonicalResult::unknown(text, Source::Remote));
            }
        };

        if !raw.is_complete() {
            warn!("Remote reply is missing classification fields");
            return RemoteOutcome::Unusable(normalize(text, raw, Source::Remote));
        }

        let result = normalize(text, raw, Source::Remote);
        match self.backend.save_analysis(&result).await {
            Ok(()) => info!(sentiment = %result.sentiment, "Remote analysis saved"),
            Err(e) => error!("Persistence failure, keeping remote result: {}", e),
        }
        RemoteOutcome::Classified(result)
    }
}

/// The prompt asking the model for a bare JSON classification of `text`.
pub fn build_classification_prompt(text: &str) -> String {
    format!(
        "You are a sentiment, emotion, and topic classifier.\n\
         Classify this text:\n\
         \"{}\"\n\
         Return only a valid JSON object like this, without comments or explanations:\n\
         {{\n  \"sentiment\": \"Positive | Neutral | Negative\",\n  \"emotion\": [\"...\"],\n  \"topic\": \"...\"\n}}",
        text
    )
}
