//! Hugging Face Inference API summary model.
//!
//! Runs a pretrained summarization pipeline (distilbart by default) hosted by
//! Hugging Face. Length bounds map onto the pipeline's `max_length` and
//! `min_length` parameters; sampling is disabled.

use super::{SummaryLength, SummaryModel};
use crate::error::{EduAidError, Result};
use crate::openai::create_http_client;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

/// Default Inference API base.
const DEFAULT_ENDPOINT: &str = "https://api-inference.huggingface.co/models/";

/// Environment variables checked for an access token, in order.
const TOKEN_VARS: &[&str] = &["HF_TOKEN", "HUGGINGFACE_API_TOKEN"];

/// Summary model served by the Hugging Face Inference API.
pub struct HuggingFaceModel {
    http: reqwest::Client,
    model: String,
    url: Url,
    token: Option<String>,
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: InferenceParameters,
    options: InferenceOptions,
}

#[derive(Serialize)]
struct InferenceParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

#[derive(Serialize)]
struct InferenceOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum InferenceResponse {
    Summaries(Vec<SummaryItem>),
    Error { error: String },
}

#[derive(Deserialize)]
struct SummaryItem {
    summary_text: String,
}

impl HuggingFaceModel {
    /// Create a client for the default distilbart model.
    pub fn new() -> Result<Self> {
        Self::with_config("sshleifer/distilbart-cnn-12-6", None)
    }

    /// Create a client for `model`, optionally against a custom endpoint base.
    pub fn with_config(model: &str, endpoint: Option<&str>) -> Result<Self> {
        let base = Url::parse(endpoint.unwrap_or(DEFAULT_ENDPOINT))?;
        let url = model_url(&base, model)?;

        Ok(Self {
            http: create_http_client()?,
            model: model.to_string(),
            url,
            token: api_token(),
        })
    }

    /// Use an explicit access token instead of the environment.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Full URL requests are sent to.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl SummaryModel for HuggingFaceModel {
    #[instrument(skip(self, text), fields(model = %self.model, chars = text.len()))]
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String> {
        let body = InferenceRequest {
            inputs: text,
            parameters: InferenceParameters {
                max_length: length.max_words,
                min_length: length.min_words,
                do_sample: false,
            },
            options: InferenceOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.http.post(self.url.clone()).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let payload = response.text().await?;
        debug!("Inference API responded with {}", status);

        parse_response(status, &payload)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

/// Check whether a Hugging Face token is present in the environment.
pub fn api_token() -> Option<String> {
    TOKEN_VARS
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|token| !token.is_empty())
}

fn model_url(base: &Url, model: &str) -> Result<Url> {
    if model.is_empty() {
        return Err(EduAidError::Config("summary model name is empty".to_string()));
    }
    // Url::join replaces the last segment unless the base ends with '/'.
    let base = if base.path().ends_with('/') {
        base.clone()
    } else {
        Url::parse(&format!("{}/", base))?
    };
    Ok(base.join(model)?)
}

fn parse_response(status: reqwest::StatusCode, payload: &str) -> Result<String> {
    let parsed: Option<InferenceResponse> = serde_json::from_str(payload).ok();

    match parsed {
        Some(InferenceResponse::Summaries(items)) if status.is_success() => items
            .into_iter()
            .next()
            .map(|item| item.summary_text.trim().to_string())
            .ok_or_else(|| EduAidError::Summarization("empty response from model".to_string())),
        Some(InferenceResponse::Error { error }) => Err(EduAidError::Summarization(format!(
            "{} ({})",
            error, status
        ))),
        _ => Err(EduAidError::Summarization(format!(
            "unexpected response ({}): {}",
            status,
            truncate(payload, 200)
        ))),
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        format!("{}...", s.chars().take(max_chars).collect::<String>())
    }
}
