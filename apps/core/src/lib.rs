//! # FeelScope Core
//!
//! Analysis orchestration and result normalization for FeelScope.
//!
//! Text is classified (sentiment, emotions, topic) by either a remote
//! generative model or the backend's local inference endpoint. Whatever shape
//! the provider replies in, callers get a `CanonicalResult`.
//!
//! ## Modules
//! - `models`: canonical and boundary data types
//! - `analysis`: JSON extraction, normalization, sentiment statistics
//! - `providers`: HTTP clients, provider adapters, router, batch analyzer
//! - `state`: explicit session context
//! - `config`, `error`, `telemetry`: ambient plumbing

pub mod analysis;
pub mod config;
pub mod error;
pub mod models;
pub mod providers;
pub mod state;
pub mod telemetry;

pub use config::AppConfig;
pub use error::AppError;
pub use models::{BatchEntry, CanonicalResult, ChartData, Mode, Sentiment, SentimentStats, Source};
pub use state::AnalysisState;

#[cfg(test)]
mod tests;
