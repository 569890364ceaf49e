//! Response normalization.
//!
//! Every provider reply ends up here. Normalization never fails: a reply that
//! is missing any of `sentiment`, `emotion` or `topic` becomes the Unknown
//! result so downstream consumers always get something renderable.

use serde_json::Value;
use tracing::debug;

use crate::models::{CanonicalResult, RawAnalysis, Sentiment, Source};

/// Coerces a typed raw reply into a `CanonicalResult`.
pub fn normalize(text: &str, raw: RawAnalysis, source: Source) -> CanonicalResult {
    match (raw.sentiment, raw.emotion, raw.topic) {
        (Some(sentiment), Some(emotion), Some(topic)) => CanonicalResult {
            text: text.to_string(),
            sentiment: Sentiment::from_label(&sentiment),
            emotion: emotion.into_list(),
            topic,
            source,
            timestamp: None,
        },
        (sentiment, emotion, topic) => {
            debug!(
                has_sentiment = sentiment.is_some(),
                has_emotion = emotion.is_some(),
                has_topic = topic.is_some(),
                "Incomplete provider reply, normalizing to Unknown"
            );
            CanonicalResult::unknown(text, source)
        }
    }
}

/// Coerces an arbitrary JSON value. Values that are not objects, or whose
/// fields have the wrong types, normalize to Unknown.
pub fn normalize_value(text: &str, raw: Option<Value>, source: Source) -> CanonicalResult {
    let Some(value) = raw else {
        return CanonicalResult::unknown(text, source);
    };
    match serde_json::from_value::<RawAnalysis>(value) {
        Ok(raw) => normalize(text, raw, source),
        Err(e) => {
            debug!("Provider reply has unexpected field types: {}", e);
            CanonicalResult::unknown(text, source)
        }
    }
}

/// The backend's `{error}` marker, if `value` carries a non-null one.
pub fn error_marker(value: &Value) -> Option<&Value> {
    value.get("error").filter(|e| !e.is_null())
}
