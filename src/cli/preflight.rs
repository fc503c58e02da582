//! Pre-flight checks before expensive operations.
//!
//! Validates that the credentials the configured providers need are present
//! before starting work that would otherwise fail halfway through a document.

use crate::config::{Settings, SpeechProvider, SummarizerProvider};
use crate::error::{EduAidError, Result};
use crate::openai::is_api_key_configured;
use crate::summarize::huggingface_token;
use tracing::warn;

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Summarizing needs the summary provider's credentials.
    Summarize,
    /// Speaking needs the speech provider's credentials.
    Speak,
    /// A full podcast needs both.
    Podcast,
    /// Extraction runs locally.
    Extract,
}

/// Run pre-flight checks for the given operation.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Summarize => check_summarizer(settings),
        Operation::Speak => check_speech(settings),
        Operation::Podcast => {
            check_summarizer(settings)?;
            check_speech(settings)
        }
        Operation::Extract => Ok(()),
    }
}

fn check_summarizer(settings: &Settings) -> Result<()> {
    match settings.summarizer.provider {
        SummarizerProvider::OpenAI => check_api_key(),
        SummarizerProvider::HuggingFace => {
            // Anonymous inference works, only with tighter rate limits.
            if huggingface_token().is_none() {
                warn!("HF_TOKEN not set, using anonymous Hugging Face inference");
            }
            Ok(())
        }
    }
}

fn check_speech(settings: &Settings) -> Result<()> {
    match settings.speech.provider {
        SpeechProvider::OpenAI => check_api_key(),
        SpeechProvider::Google => Ok(()),
    }
}

/// Check if OpenAI API key is configured.
fn check_api_key() -> Result<()> {
    if is_api_key_configured() {
        Ok(())
    } else {
        Err(EduAidError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_has_no_requirements() {
        assert!(check(Operation::Extract, &Settings::default()).is_ok());
    }

    #[test]
    fn test_default_providers_need_no_key() {
        // Hugging Face and Google both accept anonymous requests.
        assert!(check(Operation::Podcast, &Settings::default()).is_ok());
    }
}
