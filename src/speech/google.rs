//! Google Translate text-to-speech.
//!
//! Uses the public `translate_tts` endpoint. It accepts at most 100 characters
//! per request, so the script is split and the returned MP3 segments are
//! concatenated in order.

use super::{normalize_for_speech, split_for_speech, AudioArtifact, SpeechSynthesizer};
use crate::error::{EduAidError, Result};
use crate::openai::create_http_client;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::{debug, info, instrument};
use url::Url;

/// Longest text accepted by one request.
const MAX_CHARS_PER_REQUEST: usize = 100;

/// Segments fetched at once. Results stay in order.
const MAX_CONCURRENT_REQUESTS: usize = 2;

/// Google Translate speech synthesizer.
pub struct GoogleSpeech {
    http: reqwest::Client,
    url: Url,
    language: String,
    name: String,
}

impl GoogleSpeech {
    /// English voice on translate.google.com.
    pub fn new() -> Result<Self> {
        Self::with_config("en", "com", None)
    }

    /// Create a synthesizer for `language`, served from the given top-level
    /// domain unless `endpoint` overrides the full URL.
    pub fn with_config(language: &str, tld: &str, endpoint: Option<&str>) -> Result<Self> {
        if language.is_empty() {
            return Err(EduAidError::Config("speech language is empty".to_string()));
        }
        let url = match endpoint {
            Some(e) => Url::parse(e)?,
            None => Url::parse(&format!("https://translate.google.{}/translate_tts", tld))?,
        };

        Ok(Self {
            http: create_http_client()?,
            url,
            language: language.to_string(),
            name: format!("google-translate ({})", language),
        })
    }

    /// Build the request URL for segment `idx` of `total`.
    fn segment_url(&self, text: &str, idx: usize, total: usize) -> Url {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("ie", "UTF-8")
            .append_pair("q", text)
            .append_pair("tl", &self.language)
            .append_pair("client", "tw-ob")
            .append_pair("ttsspeed", "1")
            .append_pair("total", &total.to_string())
            .append_pair("idx", &idx.to_string())
            .append_pair("textlen", &text.chars().count().to_string());
        url
    }

    async fn fetch_segment(&self, text: &str, idx: usize, total: usize) -> Result<Bytes> {
        let response = self.http.get(self.segment_url(text, idx, total)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EduAidError::Speech(format!(
                "segment {} of {} rejected ({})",
                idx + 1,
                total,
                status
            )));
        }

        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return Err(EduAidError::Speech(format!(
                "segment {} of {} returned no audio",
                idx + 1,
                total
            )));
        }
        debug!("Segment {}/{}: {} bytes", idx + 1, total, bytes.len());
        Ok(bytes)
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleSpeech {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<AudioArtifact> {
        let pieces = split_for_speech(&normalize_for_speech(text), MAX_CHARS_PER_REQUEST);
        if pieces.is_empty() {
            return Err(EduAidError::Speech("no text to speak".to_string()));
        }

        let total = pieces.len();
        info!("Synthesizing {} speech segments", total);

        let parts: Vec<Bytes> = stream::iter(pieces.into_iter().enumerate())
            .map(|(idx, piece)| async move { self.fetch_segment(&piece, idx, total).await })
            .buffered(MAX_CONCURRENT_REQUESTS)
            .try_collect()
            .await?;

        Ok(AudioArtifact::concat(parts))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
