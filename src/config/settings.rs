//! Configuration settings for EduAid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub chunking: ChunkingSettings,
    pub budget: BudgetSettings,
    pub summarizer: SummarizerSettings,
    pub speech: SpeechSettings,
    pub server: ServerSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level used when no -v flag is given (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Text chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Approximate word budget per chunk fed to the summary model.
    pub max_words: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self { max_words: 450 }
    }
}

/// Listening duration to word budget settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetSettings {
    /// Assumed speaking rate.
    pub words_per_minute: u32,
    /// Longest selectable duration in minutes.
    pub max_minutes: u32,
    /// Duration preselected when none is given.
    pub default_minutes: u32,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            words_per_minute: 150,
            max_minutes: 10,
            default_minutes: 2,
        }
    }
}

/// Summary model provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SummarizerProvider {
    /// Hugging Face Inference API running a pretrained summarization model.
    #[default]
    #[serde(alias = "hf")]
    HuggingFace,
    /// OpenAI chat completion prompted to summarize.
    OpenAI,
}

impl std::str::FromStr for SummarizerProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(SummarizerProvider::HuggingFace),
            "openai" => Ok(SummarizerProvider::OpenAI),
            _ => Err(format!("Unknown summarizer provider: {}", s)),
        }
    }
}

impl std::fmt::Display for SummarizerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SummarizerProvider::HuggingFace => write!(f, "huggingface"),
            SummarizerProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// What to do when a single chunk cannot be summarized.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Drop the failed chunk, report it, and build the script from the rest.
    #[default]
    Skip,
    /// Fail the whole run on the first chunk failure.
    Abort,
}

impl std::str::FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "skip" => Ok(FailurePolicy::Skip),
            "abort" => Ok(FailurePolicy::Abort),
            _ => Err(format!("Unknown failure policy: {}", s)),
        }
    }
}

/// Summarization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerSettings {
    /// Model provider (huggingface, openai).
    pub provider: SummarizerProvider,
    /// Model name. Empty selects the provider default.
    pub model: String,
    /// Override for the provider endpoint.
    pub endpoint: Option<String>,
    /// Maximum chunks summarized concurrently.
    pub max_concurrent: usize,
    /// Failure handling for individual chunks.
    pub failure_policy: FailurePolicy,
    /// Gap between the maximum and minimum summary length, in words.
    pub length_offset: u32,
}

impl Default for SummarizerSettings {
    fn default() -> Self {
        Self {
            provider: SummarizerProvider::HuggingFace,
            model: String::new(),
            endpoint: None,
            max_concurrent: 2,
            failure_policy: FailurePolicy::Skip,
            length_offset: 30,
        }
    }
}

impl SummarizerSettings {
    /// Model name, falling back to the provider default.
    pub fn model_name(&self) -> &str {
        if !self.model.is_empty() {
            return &self.model;
        }
        match self.provider {
            SummarizerProvider::HuggingFace => "sshleifer/distilbart-cnn-12-6",
            SummarizerProvider::OpenAI => "gpt-4o-mini",
        }
    }
}

/// Speech synthesis provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpeechProvider {
    /// Google Translate text-to-speech endpoint.
    #[default]
    #[serde(alias = "gtts")]
    Google,
    /// OpenAI speech API.
    OpenAI,
}

impl std::str::FromStr for SpeechProvider {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "google" | "gtts" => Ok(SpeechProvider::Google),
            "openai" => Ok(SpeechProvider::OpenAI),
            _ => Err(format!("Unknown speech provider: {}", s)),
        }
    }
}

impl std::fmt::Display for SpeechProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeechProvider::Google => write!(f, "google"),
            SpeechProvider::OpenAI => write!(f, "openai"),
        }
    }
}

/// Speech synthesis settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechSettings {
    /// Provider (google, openai).
    pub provider: SpeechProvider,
    /// Spoken language (google provider).
    pub language: String,
    /// Top-level domain for the Google endpoint (accent).
    pub tld: String,
    /// Speech model (openai provider).
    pub model: String,
    /// Voice name (openai provider).
    pub voice: String,
    /// Override for the provider endpoint.
    pub endpoint: Option<String>,
}

impl Default for SpeechSettings {
    fn default() -> Self {
        Self {
            provider: SpeechProvider::Google,
            language: "en".to_string(),
            tld: "com".to_string(),
            model: "tts-1".to_string(),
            voice: "alloy".to_string(),
            endpoint: None,
        }
    }
}

/// Web server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Host to bind to.
    pub host: String,
    /// Port to bind to.
    pub port: u16,
    /// Largest accepted upload in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::EduAidError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eduaid")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.max_words, 450);
        assert_eq!(settings.budget.words_per_minute, 150);
        assert_eq!(settings.budget.max_minutes, 10);
        assert_eq!(settings.summarizer.length_offset, 30);
        assert_eq!(settings.summarizer.failure_policy, FailurePolicy::Skip);
        assert_eq!(settings.summarizer.model_name(), "sshleifer/distilbart-cnn-12-6");
        assert_eq!(settings.speech.language, "en");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [summarizer]
            provider = "openai"
            failure_policy = "abort"

            [speech]
            voice = "nova"
            "#,
        )
        .unwrap();

        assert_eq!(settings.summarizer.provider, SummarizerProvider::OpenAI);
        assert_eq!(settings.summarizer.failure_policy, FailurePolicy::Abort);
        assert_eq!(settings.summarizer.model_name(), "gpt-4o-mini");
        assert_eq!(settings.summarizer.max_concurrent, 2);
        assert_eq!(settings.speech.voice, "nova");
        assert_eq!(settings.speech.provider, SpeechProvider::Google);
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.chunking.max_words = 300;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.chunking.max_words, 300);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = PathBuf::from("/definitely/not/here/config.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.server.port, 8501);
    }

    #[test]
    fn test_provider_parsing() {
        assert_eq!("HF".parse::<SummarizerProvider>().unwrap(), SummarizerProvider::HuggingFace);
        assert_eq!("gtts".parse::<SpeechProvider>().unwrap(), SpeechProvider::Google);
        assert!("polly".parse::<SpeechProvider>().is_err());
        assert_eq!(SpeechProvider::OpenAI.to_string(), "openai");
    }

    #[test]
    fn test_provider_aliases_in_toml() {
        let settings: Settings = toml::from_str(
            r#"
            [summarizer]
            provider = "hf"

            [speech]
            provider = "gtts"
            "#,
        )
        .unwrap();

        assert_eq!(settings.summarizer.provider, SummarizerProvider::HuggingFace);
        assert_eq!(settings.speech.provider, SpeechProvider::Google);
    }
}
