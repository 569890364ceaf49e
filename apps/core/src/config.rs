//! Runtime configuration, read from the environment (and `.env` if present).

use std::env;
use std::fmt;
use std::time::Duration;

use tracing::info;
use validator::Validate;

use crate::error::AppError;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";
pub const DEFAULT_REMOTE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REMOTE_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Endpoints and credentials for the two providers and the backend.
#[derive(Clone, Validate)]
pub struct AppConfig {
    /// Base URL of the analysis backend.
    #[validate(url)]
    pub backend_url: String,
    /// Base URL of the generative-language API.
    #[validate(url)]
    pub remote_url: String,
    #[validate(length(min = 1))]
    pub remote_model: String,
    /// Only needed in online mode.
    pub remote_api_key: Option<String>,
    /// Per-request timeout, in seconds.
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            remote_url: DEFAULT_REMOTE_URL.to_string(),
            remote_model: DEFAULT_REMOTE_MODEL.to_string(),
            remote_api_key: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// Hand-written so the API key never ends up in logs.
impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("backend_url", &self.backend_url)
            .field("remote_url", &self.remote_url)
            .field("remote_model", &self.remote_model)
            .field("remote_api_key", &self.remote_api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl AppConfig {
    /// Loads `.env` (if any) and then reads the environment.
    pub fn load() -> Result<Self, AppError> {
        if let Ok(path) = dotenv::dotenv() {
            info!("Loaded environment overrides from {:?}", path);
        }
        Self::from_env()
    }

    /// Reads the environment only. Unset variables fall back to defaults.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let timeout_secs = match non_empty_var("FEELSCOPE_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map_err(|e| {
                AppError::Config(format!("FEELSCOPE_TIMEOUT_SECS must be a number: {}", e))
            })?,
            None => defaults.timeout_secs,
        };

        let config = Self {
            backend_url: non_empty_var("FEELSCOPE_BACKEND_URL").unwrap_or(defaults.backend_url),
            remote_url: non_empty_var("FEELSCOPE_REMOTE_URL").unwrap_or(defaults.remote_url),
            remote_model: non_empty_var("FEELSCOPE_REMOTE_MODEL").unwrap_or(defaults.remote_model),
            remote_api_key: non_empty_var("GEMINI_API_KEY"),
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Replaces the backend URL, re-validating the result.
    pub fn with_backend_url(mut self, url: impl Into<String>) -> Result<Self, AppError> {
        self.backend_url = url.into();
        self.validate()?;
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The API key, or a configuration error if online mode was requested
    /// without one.
    pub fn require_api_key(&self) -> Result<&str, AppError> {
        self.remote_api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("GEMINI_API_KEY is not set; online mode is unavailable".to_string()))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
