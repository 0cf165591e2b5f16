//! HTTP summarizer for Hugging Face style inference endpoints

use super::{SummaryBounds, Summarizer};
use crate::error::{NotesError, Result, SummarizationError};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hosted BART summarization model
pub const DEFAULT_SUMMARIZER_URL: &str =
    "https://api-inference.huggingface.co/models/facebook/bart-large-cnn";

#[derive(Debug, Serialize)]
struct SummaryPayload<'a> {
    inputs: &'a str,
    parameters: SummaryBounds,
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: Option<String>,
}

/// Calls a summarization endpoint over HTTP
#[derive(Debug, Clone)]
pub struct HttpSummarizer {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpSummarizer {
    /// Create a summarizer for `url`, sending `token` as a bearer token
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotesError::Other(format!("Failed to create HTTP client: {}", e)))?;

        let url = url.into();
        tracing::debug!(
            "Summarizer endpoint {} (token {})",
            url,
            if token.is_some() { "set" } else { "not set" }
        );
        Ok(Self { client, url, token })
    }

    /// The endpoint URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Summarizer for HttpSummarizer {
    async fn summarize(
        &self,
        text: &str,
        bounds: SummaryBounds,
    ) -> std::result::Result<String, SummarizationError> {
        let mut request = self.client.post(&self.url).json(&SummaryPayload {
            inputs: text,
            parameters: bounds,
        });
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SummarizationError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SummarizationError::Status {
                status: status.as_u16(),
            });
        }

        let items: Vec<SummaryItem> = response
            .json()
            .await
            .map_err(|e| SummarizationError::MalformedResponse(e.to_string()))?;

        items
            .into_iter()
            .next()
            .and_then(|item| item.summary_text)
            .filter(|summary| !summary.is_empty())
            .ok_or_else(|| SummarizationError::MalformedResponse("missing summary_text".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn summarizer(server: &MockServer, token: Option<&str>) -> HttpSummarizer {
        HttpSummarizer::new(
            format!("{}/summarize", server.uri()),
            token.map(String::from),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_sends_inputs_and_bounds() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/summarize"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({
                "inputs": "Some long text",
                "parameters": {"min_length": 20, "max_length": 50}
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!([{"summary_text": "Short"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let summary = summarizer(&server, Some("secret"))
            .summarize("Some long text", SummaryBounds::default())
            .await
            .unwrap();
        assert_eq!(summary, "Short");
    }

    #[tokio::test]
    async fn test_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = summarizer(&server, None)
            .summarize("text", SummaryBounds::default())
            .await;
        assert_eq!(result, Err(SummarizationError::Status { status: 503 }));
    }

    #[tokio::test]
    async fn test_malformed_bodies() {
        for body in [json!({"error": "loading"}), json!([]), json!([{"summary_text": ""}])] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
                .mount(&server)
                .await;

            let result = summarizer(&server, None)
                .summarize("text", SummaryBounds::default())
                .await;
            assert!(
                matches!(result, Err(SummarizationError::MalformedResponse(_))),
                "{} should be rejected",
                body
            );
        }
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let summarizer =
            HttpSummarizer::new("http://127.0.0.1:9/summarize", None, Duration::from_secs(2))
                .unwrap();
        let result = summarizer.summarize("text", SummaryBounds::default()).await;
        assert!(matches!(result, Err(SummarizationError::Network(_))));
    }
}
