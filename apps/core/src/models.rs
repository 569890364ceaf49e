use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical sentiment label.
///
/// Input is matched case-insensitively; anything outside the three real
/// classes becomes `Unknown`. `Error` is only ever produced locally, as the
/// remote provider's transport-failure sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Unknown,
    Error,
}

impl Sentiment {
    /// Classifies a provider label. Never fails.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "neutral" => Sentiment::Neutral,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Negative",
            Sentiment::Unknown => "Unknown",
            Sentiment::Error => "Error",
        }
    }

    /// Badge style used when rendering a sentiment.
    pub fn badge(&self) -> &'static str {
        match self {
            Sentiment::Positive => "success",
            Sentiment::Negative => "danger",
            Sentiment::Neutral => "secondary",
            Sentiment::Unknown | Sentiment::Error => "dark",
        }
    }
}

/// Deserialization of our own serialized results. Unlike `from_label`, the
/// Error sentinel survives the trip.
impl From<String> for Sentiment {
    fn from(label: String) -> Self {
        if label.trim().eq_ignore_ascii_case("error") {
            return Sentiment::Error;
        }
        Sentiment::from_label(&label)
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Source {
    Remote,
    Local,
    Social,
}

impl Source {
    /// Maps stored provenance tags, including the legacy ones written by
    /// older backends, onto the three canonical sources.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "remote" | "gemini" => Source::Remote,
            "social" | "reddit" | "reddit-ai" => Source::Social,
            _ => Source::Local,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Remote => "remote",
            Source::Local => "local",
            Source::Social => "social",
        }
    }
}

impl From<String> for Source {
    fn from(tag: String) -> Self {
        Source::from_tag(&tag)
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider selection for single-item analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Remote generative service.
    Online,
    /// Local inference endpoint.
    #[default]
    Offline,
}

/// The normalized result every provider must produce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalResult {
    /// The original input text.
    pub text: String,
    pub sentiment: Sentiment,
    /// Zero or more emotion labels, in provider order.
    pub emotion: Vec<String>,
    /// Free-form topic; empty when the provider gave none.
    pub topic: String,
    pub source: Source,
    /// Set once the result has been persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl CanonicalResult {
    /// The "no usable structure" result.
    pub fn unknown(text: impl Into<String>, source: Source) -> Self {
        Self {
            text: text.into(),
            sentiment: Sentiment::Unknown,
            emotion: Vec::new(),
            topic: String::new(),
            source,
            timestamp: None,
        }
    }

    /// The provider-unreachable sentinel.
    pub fn error(text: impl Into<String>, source: Source) -> Self {
        Self {
            text: text.into(),
            sentiment: Sentiment::Error,
            emotion: vec!["error".to_string()],
            topic: "error".to_string(),
            source,
            timestamp: None,
        }
    }
}

/// Emotion as replied by a provider: a bare string or a list of strings.
///
/// Only lives at the deserialization boundary; the normalizer turns it into a
/// `Vec<String>` straight away.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawEmotion {
    Scalar(String),
    List(Vec<String>),
}

impl RawEmotion {
    pub fn into_list(self) -> Vec<String> {
        match self {
            RawEmotion::Scalar(s) => vec![s],
            RawEmotion::List(list) => list,
        }
    }
}

/// A provider reply before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawAnalysis {
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub emotion: Option<RawEmotion>,
    #[serde(default)]
    pub topic: Option<String>,
    /// Failure marker sent by the backend's analysis endpoints.
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

impl RawAnalysis {
    /// All three classification fields are present.
    pub fn is_complete(&self) -> bool {
        self.sentiment.is_some() && self.emotion.is_some() && self.topic.is_some()
    }

    pub fn is_error(&self) -> bool {
        self.error.as_ref().is_some_and(|e| !e.is_null())
    }
}

/// Body of a save-analysis request.
#[derive(Debug, Clone, Serialize)]
pub struct SaveAnalysisRequest<'a> {
    pub text: &'a str,
    pub sentiment: Sentiment,
    pub emotion: &'a [String],
    pub topic: &'a str,
    pub source: Source,
}

impl<'a> From<&'a CanonicalResult> for SaveAnalysisRequest<'a> {
    fn from(result: &'a CanonicalResult) -> Self {
        Self {
            text: &result.text,
            sentiment: result.sentiment,
            emotion: &result.emotion,
            topic: &result.topic,
            source: result.source,
        }
    }
}

/// A record as returned by the history endpoint.
///
/// Fields are kept loose because the store holds whatever each provider wrote.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryRecord {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub sentiment: Option<String>,
    #[serde(default)]
    pub emotion: Option<RawEmotion>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl HistoryRecord {
    /// Accepts RFC 3339 as well as the RFC 2822 dates Flask emits by default.
    pub fn parsed_timestamp(&self) -> Option<DateTime<Utc>> {
        let raw = self.timestamp.as_deref()?.trim();
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| DateTime::parse_from_rfc2822(raw))
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    pub fn into_canonical(self) -> CanonicalResult {
        let timestamp = self.parsed_timestamp();
        CanonicalResult {
            text: self.text.unwrap_or_default(),
            sentiment: self
                .sentiment
                .as_deref()
                .map(Sentiment::from_label)
                .unwrap_or(Sentiment::Unknown),
            emotion: self.emotion.map(RawEmotion::into_list).unwrap_or_default(),
            topic: self.topic.unwrap_or_default(),
            source: self
                .source
                .as_deref()
                .map(Source::from_tag)
                .unwrap_or(Source::Local),
            timestamp,
        }
    }
}

/// One slice of a chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameCount {
    pub name: String,
    pub count: usize,
}

/// Aggregate chart data as served by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    #[serde(default)]
    pub sentiments: Vec<NameCount>,
    #[serde(default)]
    pub emotions: Vec<NameCount>,
}

/// Bucketed sentiment counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SentimentStats {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub unknown: usize,
}

impl SentimentStats {
    pub fn total(&self) -> usize {
        self.positive + self.negative + self.neutral + self.unknown
    }
}

/// One line of a batch analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub text: String,
    pub sentiment: Sentiment,
}
