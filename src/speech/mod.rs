//! Text-to-speech synthesis.
//!
//! Speech services limit how much text one request may carry, so scripts are
//! cut into pieces at clause boundaries, synthesized in order, and the MP3
//! streams are concatenated.

mod google;
mod openai;

pub use google::GoogleSpeech;
pub use openai::OpenAISpeech;

use crate::config::{SpeechProvider, SpeechSettings};
use crate::error::{EduAidError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use regex::Regex;
use std::io::Write;
use std::path::Path;
use std::sync::{Arc, OnceLock};
use tracing::info;

/// Suggested file name for downloaded podcasts.
pub const DOWNLOAD_FILE_NAME: &str = "summary_audio.mp3";

/// MIME type of synthesized audio.
pub const AUDIO_MIME: &str = "audio/mpeg";

/// Trait for speech synthesis backends.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` and return MP3 audio.
    async fn synthesize(&self, text: &str) -> Result<AudioArtifact>;

    /// Backend identifier, for logs and diagnostics.
    fn name(&self) -> &str;
}

/// Create the speech synthesizer configured in settings.
pub fn create_synthesizer(settings: &SpeechSettings) -> Result<Arc<dyn SpeechSynthesizer>> {
    let synthesizer: Arc<dyn SpeechSynthesizer> = match settings.provider {
        SpeechProvider::Google => Arc::new(GoogleSpeech::with_config(
            &settings.language,
            &settings.tld,
            settings.endpoint.as_deref(),
        )?),
        SpeechProvider::OpenAI => {
            Arc::new(OpenAISpeech::with_config(&settings.model, &settings.voice)?)
        }
    };
    info!("Using {} speech synthesis", synthesizer.name());
    Ok(synthesizer)
}

/// Synthesized MP3 audio held in memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioArtifact {
    pub bytes: Bytes,
}

impl AudioArtifact {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// Concatenate MP3 segments in order.
    pub fn concat(parts: Vec<Bytes>) -> Self {
        let mut buf = Vec::with_capacity(parts.iter().map(Bytes::len).sum());
        for part in parts {
            buf.extend_from_slice(&part);
        }
        Self::new(buf)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Write the audio to `path`, replacing any existing file atomically.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".eduaid-")
            .suffix(".mp3")
            .tempfile_in(dir)?;
        tmp.write_all(&self.bytes)?;
        tmp.flush()?;
        tmp.persist(path).map_err(|e| EduAidError::Io(e.error))?;
        Ok(())
    }
}

/// Prepare a script for speech: re-join words hyphenated across line breaks
/// and collapse runs of whitespace.
pub fn normalize_for_speech(text: &str) -> String {
    static HYPHEN_BREAK: OnceLock<Regex> = OnceLock::new();
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();

    let hyphen = HYPHEN_BREAK.get_or_init(|| Regex::new(r"(\w)-\s*\n\s*(\w)").expect("valid regex"));
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid regex"));

    let joined = hyphen.replace_all(text, "$1$2");
    whitespace.replace_all(&joined, " ").trim().to_string()
}

/// Split `text` into pieces of at most `max_chars` characters.
///
/// Pieces break after clause punctuation where possible, otherwise between
/// words. A single word longer than `max_chars` is cut mid-word.
pub fn split_for_speech(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut pieces = Vec::new();
    let mut current = String::new();

    for clause in clauses(text) {
        let clause_text = clause.join(" ");
        if fits(&current, &clause_text, max_chars) {
            push_word(&mut current, &clause_text);
            continue;
        }
        if !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
        }
        if char_len(&clause_text) <= max_chars {
            current = clause_text;
            continue;
        }
        for word in clause {
            for part in hard_cut(word, max_chars) {
                if !fits(&current, &part, max_chars) && !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
                push_word(&mut current, &part);
            }
        }
    }

    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Group words into clauses ending at punctuation.
fn clauses(text: &str) -> Vec<Vec<&str>> {
    let mut clauses = Vec::new();
    let mut clause = Vec::new();
    for word in text.split_whitespace() {
        clause.push(word);
        if word.ends_with(['.', '!', '?', ';', ':', ',']) {
            clauses.push(std::mem::take(&mut clause));
        }
    }
    if !clause.is_empty() {
        clauses.push(clause);
    }
    clauses
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn fits(current: &str, addition: &str, max_chars: usize) -> bool {
    let sep = usize::from(!current.is_empty());
    char_len(current) + sep + char_len(addition) <= max_chars
}

fn push_word(current: &mut String, word: &str) {
    if !current.is_empty() {
        current.push(' ');
    }
    current.push_str(word);
}

fn hard_cut(word: &str, max_chars: usize) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    chars
        .chunks(max_chars)
        .map(|c| c.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = "Enzymes are proteins that speed up chemical reactions, lowering the \
activation energy required. Each enzyme binds a specific substrate at its active site; the fit \
is often described as a lock and key, although induced fit is more accurate. Temperature and pH \
both affect enzyme activity: too much heat denatures the protein.";

    #[test]
    fn test_pieces_respect_limit() {
        let pieces = split_for_speech(SCRIPT, 100);
        assert!(pieces.len() > 1);
        for piece in &pieces {
            assert!(!piece.is_empty());
            assert!(piece.chars().count() <= 100, "{piece:?} too long");
        }
    }

    #[test]
    fn test_no_words_lost() {
        let pieces = split_for_speech(SCRIPT, 100);
        let rejoined = pieces.join(" ");
        assert_eq!(
            rejoined.split_whitespace().collect::<Vec<_>>(),
            SCRIPT.split_whitespace().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_prefers_clause_boundaries() {
        let pieces = split_for_speech("First clause here, second clause there.", 20);
        assert_eq!(pieces, vec!["First clause here,", "second clause there."]);
    }

    #[test]
    fn test_short_text_single_piece() {
        assert_eq!(split_for_speech("Hello there.", 100), vec!["Hello there."]);
        assert!(split_for_speech("   ", 100).is_empty());
    }

    #[test]
    fn test_overlong_word_is_cut() {
        let word = "a".repeat(250);
        let pieces = split_for_speech(&word, 100);
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces.concat(), word);
    }

    #[test]
    fn test_normalize_for_speech() {
        let text = "The mito-\nchondria   is the\n\npowerhouse ";
        assert_eq!(normalize_for_speech(text), "The mitochondria is the powerhouse");
    }

    #[test]
    fn test_concat_and_save() {
        let artifact = AudioArtifact::concat(vec![
            Bytes::from_static(b"ID3"),
            Bytes::from_static(b"frame"),
        ]);
        assert_eq!(artifact.bytes, Bytes::from_static(b"ID3frame"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join(DOWNLOAD_FILE_NAME);
        artifact.save_to(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"ID3frame");

        // Overwrites in place.
        AudioArtifact::new(b"new".to_vec()).save_to(&path).unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
    }
}
