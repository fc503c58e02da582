//! Pipeline orchestrator for EduAid.
//!
//! Owns the long-lived components (summary model, speech synthesizer, budget
//! table) and runs the individual pipeline stages: extract, chunk and
//! summarize, synthesize.

use crate::budget::BudgetTable;
use crate::chunking::split_text;
use crate::config::Settings;
use crate::document::{Document, ExtractedText, PdfExtractor, TextExtractor};
use crate::error::{EduAidError, Result};
use crate::speech::{create_synthesizer, AudioArtifact, SpeechSynthesizer};
use crate::summarize::{create_model, Summarizer, SummaryModel, SummaryOutcome};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// The main orchestrator for the EduAid pipeline.
pub struct Orchestrator {
    settings: Settings,
    budget: BudgetTable,
    extractor: Arc<dyn TextExtractor>,
    summarizer: Summarizer,
    speech: Arc<dyn SpeechSynthesizer>,
}

impl Orchestrator {
    /// Create an orchestrator with the providers named in settings.
    ///
    /// The summary model is constructed here, once, and shared by every run.
    pub fn new(settings: Settings) -> Result<Self> {
        let model = create_model(&settings.summarizer)?;
        let speech = create_synthesizer(&settings.speech)?;
        Ok(Self::with_components(settings, Arc::new(PdfExtractor), model, speech))
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        extractor: Arc<dyn TextExtractor>,
        model: Arc<dyn SummaryModel>,
        speech: Arc<dyn SpeechSynthesizer>,
    ) -> Self {
        let budget = BudgetTable::from_settings(&settings.budget);
        let summarizer = Summarizer::with_config(model, &settings.summarizer);
        Self {
            settings,
            budget,
            extractor,
            summarizer,
            speech,
        }
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get the duration budget table.
    pub fn budget(&self) -> &BudgetTable {
        &self.budget
    }

    /// Extract the text of a document.
    pub async fn extract(&self, document: &Document) -> Result<ExtractedText> {
        self.extractor.extract(document).await
    }

    /// Chunk extracted text and summarize it to fit `minutes` of listening.
    #[instrument(skip(self, document, text), fields(name = %document.name))]
    pub async fn build_script(
        &self,
        document: &Document,
        text: &ExtractedText,
        minutes: u32,
    ) -> Result<PodcastScript> {
        let word_budget = self.budget.word_budget(minutes)?;

        let chunks = split_text(&text.text, self.settings.chunking.max_words);
        if chunks.is_empty() {
            return Err(EduAidError::EmptyDocument(document.name.clone()));
        }
        info!(
            "Split {} words into {} chunks (budget {} words per chunk)",
            text.word_count(),
            chunks.len(),
            word_budget
        );

        let summary = self.summarizer.summarize(&chunks, word_budget).await?;

        Ok(PodcastScript {
            source: document.name.clone(),
            pages: text.page_count,
            source_words: text.word_count(),
            minutes,
            word_budget,
            summary,
        })
    }

    /// Synthesize a finished script into audio.
    pub async fn synthesize(&self, script: &str) -> Result<AudioArtifact> {
        if script.trim().is_empty() {
            return Err(EduAidError::InvalidInput("script is empty".to_string()));
        }
        self.speech.synthesize(script).await
    }

    /// Extract and summarize a document in one go.
    pub async fn process_document(&self, document: &Document, minutes: u32) -> Result<PodcastScript> {
        let text = self.extract(document).await?;
        self.build_script(document, &text, minutes).await
    }
}

/// A podcast script and how it was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PodcastScript {
    /// Name of the source document.
    pub source: String,
    /// Pages in the source document.
    pub pages: usize,
    /// Words extracted from the source document.
    pub source_words: usize,
    /// Listening duration selected by the user.
    pub minutes: u32,
    /// Word budget derived from the selection.
    pub word_budget: u32,
    /// Summarization result.
    #[serde(flatten)]
    pub summary: SummaryOutcome,
}

impl PodcastScript {
    /// The text to be spoken.
    pub fn text(&self) -> &str {
        &self.summary.script
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::summarize::tests::EchoModel;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Treats document bytes as UTF-8 text; "BROKEN" documents fail.
    pub(crate) struct PlainTextExtractor;

    #[async_trait]
    impl TextExtractor for PlainTextExtractor {
        async fn extract(&self, document: &Document) -> Result<ExtractedText> {
            let text = String::from_utf8_lossy(&document.bytes).into_owned();
            if text.contains("BROKEN") {
                return Err(EduAidError::Pdf("unreadable".to_string()));
            }
            Ok(ExtractedText::from_pages(vec![text]))
        }
    }

    /// Returns the script bytes as "audio".
    pub(crate) struct FakeSpeech {
        pub calls: AtomicUsize,
    }

    impl FakeSpeech {
        pub(crate) fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for FakeSpeech {
        async fn synthesize(&self, text: &str) -> Result<AudioArtifact> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(AudioArtifact::new(text.as_bytes().to_vec()))
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    pub(crate) fn test_orchestrator(max_words: usize) -> (Orchestrator, Arc<EchoModel>, Arc<FakeSpeech>) {
        let mut settings = Settings::default();
        settings.chunking.max_words = max_words;
        let model = Arc::new(EchoModel::new());
        let speech = Arc::new(FakeSpeech::new());
        let orchestrator = Orchestrator::with_components(
            settings,
            Arc::new(PlainTextExtractor),
            model.clone(),
            speech.clone(),
        );
        (orchestrator, model, speech)
    }

    fn text(s: &str) -> ExtractedText {
        ExtractedText::from_pages(vec![s.to_string()])
    }

    #[tokio::test]
    async fn test_build_script() {
        let (orchestrator, model, _) = test_orchestrator(3);
        let doc = Document::new("bio.pdf", b"%PDF-".to_vec());

        let script = orchestrator
            .build_script(&doc, &text("Cells divide. Genes encode proteins. Enzymes catalyze"), 2)
            .await
            .unwrap();

        assert_eq!(script.text(), "Cells Genes Enzymes");
        assert_eq!(script.word_budget, 451);
        assert_eq!(script.summary.chunk_count, 3);
        assert_eq!(script.source, "bio.pdf");
        assert_eq!(model.lengths.lock().unwrap()[0].max_words, 451);
    }

    #[tokio::test]
    async fn test_build_script_rejects_bad_duration() {
        let (orchestrator, model, _) = test_orchestrator(450);
        let doc = Document::new("bio.pdf", b"%PDF-".to_vec());

        let err = orchestrator.build_script(&doc, &text("Some text."), 0).await.unwrap_err();
        assert!(matches!(err, EduAidError::InvalidInput(_)));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_process_document() {
        let (orchestrator, _, _) = test_orchestrator(450);
        let doc = Document::new("notes.pdf", b"Plants need light. Roots absorb water.".to_vec());

        let script = orchestrator.process_document(&doc, 10).await.unwrap();
        assert_eq!(script.text(), "Plants");
        assert_eq!(script.word_budget, 1501);
        assert_eq!(script.source_words, 6);
    }

    #[tokio::test]
    async fn test_synthesize_rejects_empty_script() {
        let (orchestrator, _, speech) = test_orchestrator(450);
        tokio_test::assert_err!(orchestrator.synthesize("  ").await);
        assert_eq!(speech.calls.load(Ordering::SeqCst), 0);

        let audio = tokio_test::assert_ok!(orchestrator.synthesize("Hello.").await);
        assert_eq!(audio.bytes.as_ref(), b"Hello.");
    }
}
