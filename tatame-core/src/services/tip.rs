//! Daily training tip
//!
//! A short piece of advice fetched from a generative language API. The
//! dashboard must render even when the API is down or unconfigured, so
//! [`TipService::daily_tip`] always returns text.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Shown whenever no tip could be fetched
pub const FALLBACK_TIP: &str =
    "Could not load today's tip. Remember: showing up consistently beats talent.";

const TIP_PROMPT: &str = "Give a short, useful jiu-jitsu tip for practitioners in at most 2 sentences. The tip should be about technique, strategy or mindset.";

#[derive(Debug, Error)]
pub enum TipError {
    #[error("Tip API key not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Tip API returned status {0}")]
    Status(u16),

    #[error("Tip API returned no text")]
    EmptyResponse,
}

impl From<TipError> for shared::error::AppError {
    fn from(err: TipError) -> Self {
        shared::error::AppError::with_message(shared::error::ErrorCode::NetworkError, err.to_string())
    }
}

/// Anything that can produce a tip
#[async_trait]
pub trait TipSource: Send + Sync {
    async fn fetch_tip(&self) -> Result<String, TipError>;
}

/// REST client for the `generateContent` endpoint
#[derive(Debug, Clone)]
pub struct GeminiTipClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model: String,
}

impl GeminiTipClient {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TipError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: model.into(),
        })
    }

    pub fn from_config(config: &crate::core::Config) -> Result<Self, TipError> {
        Self::new(
            config.tip_endpoint.clone(),
            config.tip_api_key.clone(),
            config.tip_model.clone(),
            Duration::from_millis(config.tip_timeout_ms),
        )
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

#[async_trait]
impl TipSource for GeminiTipClient {
    async fn fetch_tip(&self) -> Result<String, TipError> {
        let api_key = self.api_key.as_deref().ok_or(TipError::MissingApiKey)?;
        let url = format!("{}/models/{}:generateContent", self.endpoint, self.model);
        let body = json!({
            "contents": [{ "parts": [{ "text": TIP_PROMPT }] }]
        });

        let resp = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(TipError::Status(resp.status().as_u16()));
        }

        let parsed: GenerateContentResponse = resp.json().await?;
        parsed.text().ok_or(TipError::EmptyResponse)
    }
}

/// Tip provider with a guaranteed answer
#[derive(Clone)]
pub struct TipService {
    source: Arc<dyn TipSource>,
}

impl TipService {
    pub fn new(source: Arc<dyn TipSource>) -> Self {
        Self { source }
    }

    pub async fn daily_tip(&self) -> String {
        match self.source.fetch_tip().await {
            Ok(tip) if !tip.trim().is_empty() => tip,
            Ok(_) => {
                tracing::warn!("Tip source returned empty text, using fallback");
                FALLBACK_TIP.to_string()
            }
            Err(TipError::MissingApiKey) => {
                tracing::debug!("Tip API key not configured, using fallback");
                FALLBACK_TIP.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch daily tip, using fallback");
                FALLBACK_TIP.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedTip(Option<&'static str>);

    #[async_trait]
    impl TipSource for FixedTip {
        async fn fetch_tip(&self) -> Result<String, TipError> {
            self.0.map(str::to_string).ok_or(TipError::Status(503))
        }
    }

    #[tokio::test]
    async fn test_daily_tip_passes_through() {
        let service = TipService::new(Arc::new(FixedTip(Some("Keep your elbows in."))));
        assert_eq!(service.daily_tip().await, "Keep your elbows in.");
    }

    #[tokio::test]
    async fn test_daily_tip_falls_back() {
        let service = TipService::new(Arc::new(FixedTip(None)));
        assert_eq!(service.daily_tip().await, FALLBACK_TIP);

        let service = TipService::new(Arc::new(FixedTip(Some("   "))));
        assert_eq!(service.daily_tip().await, FALLBACK_TIP);
    }

    #[tokio::test]
    async fn test_missing_key_does_not_call_out() {
        let client = GeminiTipClient::new(
            "http://127.0.0.1:9",
            Some("  ".to_string()),
            "gemini-2.5-flash",
            Duration::from_millis(100),
        )
        .unwrap();
        assert!(matches!(client.fetch_tip().await, Err(TipError::MissingApiKey)));

        let service = TipService::new(Arc::new(client));
        assert_eq!(service.daily_tip().await, FALLBACK_TIP);
    }

    #[test]
    fn test_response_text_extraction() {
        let parsed: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Base first. "},{"text":"Then grips."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.text().as_deref(), Some("Base first. Then grips."));

        let empty: GenerateContentResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(empty.text(), None);
    }
}
