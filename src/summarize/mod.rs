//! Chunk-wise summarization.
//!
//! A [`SummaryModel`] turns one piece of text into a shorter one. The
//! [`Summarizer`] fans chunks out to the model with bounded concurrency,
//! collects the results back in chunk order, and joins them into the final
//! podcast script.

mod huggingface;
mod openai;

pub use huggingface::{api_token as huggingface_token, HuggingFaceModel};
pub use openai::OpenAIModel;

use crate::config::{FailurePolicy, SummarizerProvider, SummarizerSettings};
use crate::error::{EduAidError, Result};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Output length bounds for one summary, in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SummaryLength {
    pub max_words: u32,
    pub min_words: u32,
}

impl SummaryLength {
    /// Bounds with the minimum `offset` words below the maximum.
    pub fn with_offset(max_words: u32, offset: u32) -> Self {
        Self {
            max_words,
            min_words: max_words.saturating_sub(offset),
        }
    }
}

/// Trait for summary model backends.
#[async_trait]
pub trait SummaryModel: Send + Sync {
    /// Summarize `text` within the given length bounds. Decoding must be
    /// deterministic.
    async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String>;

    /// Model identifier, for logs and diagnostics.
    fn name(&self) -> &str;
}

/// Create the summary model configured in settings.
pub fn create_model(settings: &SummarizerSettings) -> Result<Arc<dyn SummaryModel>> {
    let model: Arc<dyn SummaryModel> = match settings.provider {
        SummarizerProvider::HuggingFace => Arc::new(HuggingFaceModel::with_config(
            settings.model_name(),
            settings.endpoint.as_deref(),
        )?),
        SummarizerProvider::OpenAI => Arc::new(OpenAIModel::with_config(settings.model_name())?),
    };
    info!("Using {} summary model {}", settings.provider, model.name());
    Ok(model)
}

/// A chunk that could not be summarized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkFailure {
    /// Position of the chunk in document order.
    pub index: usize,
    /// Error reported by the model.
    pub message: String,
}

/// Result of summarizing a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SummaryOutcome {
    /// Surviving summaries, space-joined in chunk order.
    pub script: String,
    /// Number of chunks submitted.
    pub chunk_count: usize,
    /// Chunks that were dropped, in chunk order.
    pub failures: Vec<ChunkFailure>,
}

impl SummaryOutcome {
    /// Whether any chunk was dropped from the script.
    pub fn is_partial(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Number of words in the script.
    pub fn word_count(&self) -> usize {
        crate::chunking::word_count(&self.script)
    }
}

/// Summarizes chunk sequences with an injected model.
pub struct Summarizer {
    model: Arc<dyn SummaryModel>,
    max_concurrent: usize,
    failure_policy: FailurePolicy,
    length_offset: u32,
}

impl Summarizer {
    /// Create a summarizer with default concurrency and policy.
    pub fn new(model: Arc<dyn SummaryModel>) -> Self {
        Self::with_config(model, &SummarizerSettings::default())
    }

    /// Create a summarizer using the concurrency and policy from settings.
    pub fn with_config(model: Arc<dyn SummaryModel>, settings: &SummarizerSettings) -> Self {
        Self {
            model,
            max_concurrent: settings.max_concurrent.max(1),
            failure_policy: settings.failure_policy,
            length_offset: settings.length_offset,
        }
    }

    /// Override the failure policy.
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Override the number of chunks summarized at once.
    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    /// The injected model.
    pub fn model(&self) -> &Arc<dyn SummaryModel> {
        &self.model
    }

    /// Summarize every chunk to at most `max_words_per_chunk` words and join
    /// the results in chunk order.
    ///
    /// Under [`FailurePolicy::Skip`] failed chunks are reported in
    /// [`SummaryOutcome::failures`] and left out of the script; if every
    /// chunk fails the call returns [`EduAidError::AllChunksFailed`]. Under
    /// [`FailurePolicy::Abort`] the first failure is returned as an error.
    #[instrument(skip(self, chunks), fields(chunks = chunks.len(), model = %self.model.name()))]
    pub async fn summarize(
        &self,
        chunks: &[&str],
        max_words_per_chunk: u32,
    ) -> Result<SummaryOutcome> {
        if chunks.is_empty() {
            return Ok(SummaryOutcome::default());
        }

        let length = SummaryLength::with_offset(max_words_per_chunk, self.length_offset);
        info!(
            "Summarizing {} chunks ({}-{} words each)",
            chunks.len(),
            length.min_words,
            length.max_words
        );

        let mut summaries: Vec<Option<String>> = vec![None; chunks.len()];
        let mut failures = Vec::new();

        let owned: Vec<String> = chunks.iter().map(|c| c.to_string()).collect();
        let mut stream = stream::iter(owned.into_iter().enumerate())
            .map(|(idx, chunk)| {
                let model = self.model.clone();
                async move {
                    let result = model.summarize(&chunk, length).await.and_then(|summary| {
                        if summary.trim().is_empty() {
                            Err(EduAidError::Summarization("empty summary".to_string()))
                        } else {
                            Ok(summary)
                        }
                    });
                    (idx, result)
                }
            })
            .buffer_unordered(self.max_concurrent);

        while let Some((idx, result)) = stream.next().await {
            match result {
                Ok(summary) => {
                    debug!("Chunk {} summarized", idx);
                    summaries[idx] = Some(summary);
                }
                Err(e) => {
                    warn!("Summarization of chunk {} failed: {}", idx, e);
                    if self.failure_policy == FailurePolicy::Abort {
                        return Err(EduAidError::Summarization(format!(
                            "chunk {} of {}: {}",
                            idx + 1,
                            chunks.len(),
                            e
                        )));
                    }
                    failures.push(ChunkFailure {
                        index: idx,
                        message: e.to_string(),
                    });
                }
            }
        }

        failures.sort_by_key(|f| f.index);

        if failures.len() == chunks.len() {
            return Err(EduAidError::AllChunksFailed {
                count: chunks.len(),
                first_error: failures[0].message.clone(),
            });
        }

        let script = summaries
            .iter()
            .flatten()
            .map(|s| s.trim())
            .collect::<Vec<_>>()
            .join(" ");

        Ok(SummaryOutcome {
            script,
            chunk_count: chunks.len(),
            failures,
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Echoes the first word of each chunk, failing on chunks that contain
    /// "FAIL".
    pub(crate) struct EchoModel {
        pub calls: AtomicUsize,
        pub lengths: Mutex<Vec<SummaryLength>>,
    }

    impl EchoModel {
        pub(crate) fn new() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                lengths: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SummaryModel for EchoModel {
        async fn summarize(&self, text: &str, length: SummaryLength) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.lengths.lock().unwrap().push(length);
            if text.contains("FAIL") {
                return Err(EduAidError::Summarization("input too long".to_string()));
            }
            Ok(format!(" {} ", text.split_whitespace().next().unwrap_or_default()))
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    #[test]
    fn test_length_offset() {
        assert_eq!(
            SummaryLength::with_offset(451, 30),
            SummaryLength { max_words: 451, min_words: 421 }
        );
        assert_eq!(SummaryLength::with_offset(20, 30).min_words, 0);
    }

    #[tokio::test]
    async fn test_joins_in_chunk_order() {
        let model = Arc::new(EchoModel::new());
        let summarizer = Summarizer::new(model.clone()).with_max_concurrent(4);

        let chunks = ["alpha one", "beta two", "gamma three", "delta four"];
        let outcome = summarizer.summarize(&chunks, 451).await.unwrap();

        assert_eq!(outcome.script, "alpha beta gamma delta");
        assert_eq!(outcome.chunk_count, 4);
        assert!(!outcome.is_partial());
        assert_eq!(model.calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_passes_length_bounds() {
        let model = Arc::new(EchoModel::new());
        let summarizer = Summarizer::new(model.clone());

        summarizer.summarize(&["one"], 1501).await.unwrap();

        let lengths = model.lengths.lock().unwrap();
        assert_eq!(lengths[0], SummaryLength { max_words: 1501, min_words: 1471 });
    }

    #[tokio::test]
    async fn test_skips_failed_chunk() {
        let summarizer = Summarizer::new(Arc::new(EchoModel::new()));

        let chunks = ["first chunk", "FAIL here", "third chunk"];
        let outcome = summarizer.summarize(&chunks, 451).await.unwrap();

        assert_eq!(outcome.script, "first third");
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].index, 1);
        assert!(outcome.failures[0].message.contains("input too long"));
    }

    #[tokio::test]
    async fn test_all_chunks_failed_is_terminal() {
        let summarizer = Summarizer::new(Arc::new(EchoModel::new()));

        let err = summarizer
            .summarize(&["FAIL a", "FAIL b"], 451)
            .await
            .unwrap_err();

        match err {
            EduAidError::AllChunksFailed { count, first_error } => {
                assert_eq!(count, 2);
                assert!(first_error.contains("input too long"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Returns whitespace for every chunk except those containing "keep".
    struct BlankModel;

    #[async_trait]
    impl SummaryModel for BlankModel {
        async fn summarize(&self, text: &str, _length: SummaryLength) -> Result<String> {
            if text.contains("keep") {
                Ok("kept".to_string())
            } else {
                Ok("   ".to_string())
            }
        }

        fn name(&self) -> &str {
            "blank"
        }
    }

    #[tokio::test]
    async fn test_blank_summaries_count_as_failures() {
        let summarizer = Summarizer::new(Arc::new(BlankModel));

        let outcome = summarizer
            .summarize(&["a", "keep this", "b"], 451)
            .await
            .unwrap();
        assert_eq!(outcome.script, "kept");
        assert_eq!(outcome.failures.len(), 2);
        assert_eq!(outcome.failures[0].index, 0);
        assert_eq!(outcome.failures[1].index, 2);
        assert_eq!(outcome.failures[0].message, "Summarization failed: empty summary");
    }

    #[tokio::test]
    async fn test_all_blank_summaries_fail() {
        let summarizer = Summarizer::new(Arc::new(BlankModel));

        let err = summarizer.summarize(&["a", "b"], 451).await.unwrap_err();
        assert!(matches!(err, EduAidError::AllChunksFailed { count: 2, .. }));
    }

    #[tokio::test]
    async fn test_abort_policy() {
        let summarizer =
            Summarizer::new(Arc::new(EchoModel::new())).with_failure_policy(FailurePolicy::Abort);

        let err = summarizer
            .summarize(&["ok", "FAIL", "ok"], 451)
            .await
            .unwrap_err();
        assert!(matches!(err, EduAidError::Summarization(_)));
    }

    #[tokio::test]
    async fn test_empty_input() {
        let model = Arc::new(EchoModel::new());
        let summarizer = Summarizer::new(model.clone());

        let outcome = summarizer.summarize(&[], 451).await.unwrap();
        assert_eq!(outcome, SummaryOutcome::default());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }
}
