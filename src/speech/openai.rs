//! OpenAI speech synthesis.

use super::{normalize_for_speech, split_for_speech, AudioArtifact, SpeechSynthesizer};
use crate::error::{EduAidError, Result};
use crate::openai::create_client;
use async_openai::types::{CreateSpeechRequestArgs, SpeechModel, SpeechResponseFormat, Voice};
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, info, instrument, warn};

/// Longest input accepted by the speech endpoint.
const MAX_CHARS_PER_REQUEST: usize = 4096;

/// OpenAI text-to-speech synthesizer.
pub struct OpenAISpeech {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: SpeechModel,
    voice: Voice,
    name: String,
}

impl OpenAISpeech {
    /// `tts-1` with the alloy voice.
    pub fn new() -> Result<Self> {
        Self::with_config("tts-1", "alloy")
    }

    pub fn with_config(model: &str, voice: &str) -> Result<Self> {
        Ok(Self {
            client: create_client()?,
            model: parse_model(model),
            voice: parse_voice(voice),
            name: format!("openai {} ({})", model, voice),
        })
    }

    async fn synthesize_piece(&self, text: &str) -> Result<Bytes> {
        let request = CreateSpeechRequestArgs::default()
            .input(text)
            .model(self.model.clone())
            .voice(self.voice.clone())
            .response_format(SpeechResponseFormat::Mp3)
            .build()
            .map_err(|e| EduAidError::Speech(format!("Failed to build request: {}", e)))?;

        let response = self
            .client
            .audio()
            .speech(request)
            .await
            .map_err(|e| EduAidError::OpenAI(format!("Speech API error: {}", e)))?;

        Ok(response.bytes)
    }
}

#[async_trait]
impl SpeechSynthesizer for OpenAISpeech {
    #[instrument(skip(self, text), fields(chars = text.len()))]
    async fn synthesize(&self, text: &str) -> Result<AudioArtifact> {
        let pieces = split_for_speech(&normalize_for_speech(text), MAX_CHARS_PER_REQUEST);
        if pieces.is_empty() {
            return Err(EduAidError::Speech("no text to speak".to_string()));
        }
        info!("Synthesizing {} speech segments", pieces.len());

        let mut parts = Vec::with_capacity(pieces.len());
        for (idx, piece) in pieces.iter().enumerate() {
            let bytes = self.synthesize_piece(piece).await?;
            debug!("Segment {}: {} bytes", idx + 1, bytes.len());
            parts.push(bytes);
        }

        Ok(AudioArtifact::concat(parts))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn parse_model(model: &str) -> SpeechModel {
    match model {
        "tts-1" => SpeechModel::Tts1,
        "tts-1-hd" => SpeechModel::Tts1Hd,
        other => SpeechModel::Other(other.to_string()),
    }
}

fn parse_voice(voice: &str) -> Voice {
    match voice.to_lowercase().as_str() {
        "alloy" => Voice::Alloy,
        "echo" => Voice::Echo,
        "fable" => Voice::Fable,
        "onyx" => Voice::Onyx,
        "nova" => Voice::Nova,
        "shimmer" => Voice::Shimmer,
        other => {
            warn!("Unknown voice '{}', using alloy", other);
            Voice::Alloy
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_model() {
        assert!(matches!(parse_model("tts-1"), SpeechModel::Tts1));
        assert!(matches!(parse_model("tts-1-hd"), SpeechModel::Tts1Hd));
        assert!(matches!(parse_model("gpt-4o-mini-tts"), SpeechModel::Other(m) if m == "gpt-4o-mini-tts"));
    }

    #[test]
    fn test_parse_voice() {
        assert!(matches!(parse_voice("Nova"), Voice::Nova));
        assert!(matches!(parse_voice("unknown"), Voice::Alloy));
    }

    #[test]
    fn test_synthesizer_name() {
        let speech = OpenAISpeech::with_config("tts-1", "onyx").unwrap();
        assert_eq!(speech.name(), "openai tts-1 (onyx)");
    }
}
