use crate::analysis::error_marker;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{CanonicalResult, ChartData, HistoryRecord, RawAnalysis, SaveAnalysisRequest};
use crate::providers::traits::BackendClient;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

/// reqwest-backed client for the analysis backend.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

#[derive(Deserialize)]
struct PostsReply {
    #[serde(default)]
    posts: Option<Vec<String>>,
    #[serde(default)]
    error: Option<String>,
}

impl HttpBackend {
    /// Creates a client rooted at `base_url`. Endpoint paths are resolved
    /// relative to it, so a base with a path prefix keeps that prefix.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, base_url })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AppError> {
        Self::new(&config.backend_url, config.timeout())
    }

    fn endpoint(&self, path: &str) -> Result<Url, AppError> {
        Ok(self.base_url.join(path)?)
    }

    /// Reads an analysis reply regardless of status: the backend answers
    /// failures with a 4xx/5xx *and* an `{error}` body, and the adapters need
    /// to see that marker. A successful reply is returned untyped.
    async fn read_reply(endpoint: &str, res: Response) -> Result<Value, AppError> {
        let status = res.status();
        let body = res.text().await?;
        match serde_json::from_str::<Value>(&body) {
            Ok(value) if status.is_success() || error_marker(&value).is_some() => Ok(value),
            Ok(_) => Err(status_error(endpoint, status, &body)),
            Err(_) if !status.is_success() => Err(status_error(endpoint, status, &body)),
            Err(e) => Err(AppError::MalformedResponse(format!(
                "{} returned an unreadable body: {}",
                endpoint, e
            ))),
        }
    }

    async fn expect_success(endpoint: &str, res: Response) -> Result<Response, AppError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        Err(status_error(endpoint, status, &body))
    }
}

fn status_error(endpoint: &str, status: StatusCode, body: &str) -> AppError {
    AppError::Transport(format!(
        "{} request failed with status {}: {}",
        endpoint, status, body
    ))
}

#[async_trait]
impl BackendClient for HttpBackend {
    #[instrument(skip(self))]
    async fn chart_data(&self) -> Result<ChartData, AppError> {
        let res = self.client.get(self.endpoint("chart-data")?).send().await?;
        let res = Self::expect_success("chart-data", res).await?;
        Ok(res.json::<ChartData>().await?)
    }

    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn analyze(&self, text: &str) -> Result<Value, AppError> {
        let res = self
            .client
            .post(self.endpoint("analyze")?)
            .json(&json!({ "text": text }))
            .send()
            .await?;
        Self::read_reply("analyze", res).await
    }

    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn analyze_basic(&self, text: &str) -> Result<Value, AppError> {
        let res = self
            .client
            .post(self.endpoint("analyze-basic")?)
            .json(&json!({ "text": text }))
            .send()
            .await?;
        Self::read_reply("analyze-basic", res).await
    }

    #[instrument(skip(self, result), fields(source = %result.source))]
    async fn save_analysis(&self, result: &CanonicalResult) -> Result<(), AppError> {
        let res = self
            .client
            .post(self.endpoint("save-analysis")?)
            .json(&SaveAnalysisRequest::from(result))
            .send()
            .await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Persistence(format!(
                "save-analysis failed with status {}: {}",
                status, body
            )));
        }
        debug!("Analysis persisted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn history(&self) -> Result<Vec<HistoryRecord>, AppError> {
        let res = self.client.get(self.endpoint("history")?).send().await?;
        let res = Self::expect_success("history", res).await?;
        Ok(res.json::<Vec<HistoryRecord>>().await?)
    }

    #[instrument(skip(self))]
    async fn clear_history(&self) -> Result<bool, AppError> {
        let res = self.client.delete(self.endpoint("history")?).send().await?;
        let status = res.status();
        if !status.is_success() {
            warn!("Backend refused to clear history: {}", status);
        }
        Ok(status.is_success())
    }

    #[instrument(skip(self))]
    async fn reddit_search(&self, subreddit: &str) -> Result<Vec<String>, AppError> {
        let mut url = self.endpoint("reddit-search")?;
        url.query_pairs_mut().append_pair("subreddit", subreddit);

        let res = self.client.get(url).send().await?;
        let res = Self::expect_success("reddit-search", res).await?;
        let reply = res.json::<PostsReply>().await?;
        match (reply.posts, reply.error) {
            (Some(posts), _) => Ok(posts),
            (None, Some(error)) => Err(AppError::MalformedResponse(format!(
                "reddit-search returned an error: {}",
                error
            ))),
            (None, None) => Err(AppError::MalformedResponse(
                "reddit-search reply has no posts".to_string(),
            )),
        }
    }

    #[instrument(skip(self, text), fields(len = text.len()))]
    async fn reddit_sentiment(&self, text: &str, source: &str) -> Result<RawAnalysis, AppError> {
        let res = self
            .client
            .post(self.endpoint("reddit-textblob")?)
            .json(&json!({ "text": text, "source": source }))
            .send()
            .await?;
        let value = Self::read_reply("reddit-textblob", res).await?;
        Ok(serde_json::from_value::<RawAnalysis>(value)?)
    }
}
