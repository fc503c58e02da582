//! Interactive podcast session.
//!
//! One session follows one user through the tool:
//!
//! ```text
//! Idle -> FileUploaded -> TextExtracted -> Summarized -> AudioGenerated
//! ```
//!
//! Selecting a file runs extraction and summarization straight away.
//! Changing the duration re-runs both from scratch. Audio is only produced
//! when explicitly requested. A failing stage leaves the session in the last
//! state it reached; the next event starts over normally.

use crate::document::{Document, ExtractedText};
use crate::error::{EduAidError, Result};
use crate::orchestrator::{Orchestrator, PodcastScript};
use crate::speech::AudioArtifact;
use crate::summarize::ChunkFailure;
use std::sync::Arc;
use tracing::{debug, info};

/// Input events.
#[derive(Debug, Clone)]
pub enum Event {
    /// A file was chosen.
    FileSelected(Document),
    /// The listening duration changed.
    DurationChanged(u32),
    /// The user asked for the podcast audio.
    GenerateAudio,
}

/// Where the session is in the pipeline, with the data produced so far.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    Idle,
    FileUploaded {
        document: Document,
    },
    TextExtracted {
        document: Document,
        text: ExtractedText,
    },
    Summarized {
        document: Document,
        text: ExtractedText,
        script: PodcastScript,
    },
    AudioGenerated {
        document: Document,
        text: ExtractedText,
        script: PodcastScript,
        audio: AudioArtifact,
    },
}

/// Name of a [`SessionState`] without its data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    FileUploaded,
    TextExtracted,
    Summarized,
    AudioGenerated,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::FileUploaded => "file uploaded",
            Stage::TextExtracted => "text extracted",
            Stage::Summarized => "summarized",
            Stage::AudioGenerated => "audio generated",
        };
        write!(f, "{}", name)
    }
}

impl SessionState {
    pub fn stage(&self) -> Stage {
        match self {
            SessionState::Idle => Stage::Idle,
            SessionState::FileUploaded { .. } => Stage::FileUploaded,
            SessionState::TextExtracted { .. } => Stage::TextExtracted,
            SessionState::Summarized { .. } => Stage::Summarized,
            SessionState::AudioGenerated { .. } => Stage::AudioGenerated,
        }
    }

    pub fn document(&self) -> Option<&Document> {
        match self {
            SessionState::Idle => None,
            SessionState::FileUploaded { document }
            | SessionState::TextExtracted { document, .. }
            | SessionState::Summarized { document, .. }
            | SessionState::AudioGenerated { document, .. } => Some(document),
        }
    }

    pub fn script(&self) -> Option<&PodcastScript> {
        match self {
            SessionState::Summarized { script, .. }
            | SessionState::AudioGenerated { script, .. } => Some(script),
            _ => None,
        }
    }

    pub fn audio(&self) -> Option<&AudioArtifact> {
        match self {
            SessionState::AudioGenerated { audio, .. } => Some(audio),
            _ => None,
        }
    }
}

/// Event-driven controller for one user.
pub struct Session {
    orchestrator: Arc<Orchestrator>,
    minutes: u32,
    state: SessionState,
}

impl Session {
    /// Start an idle session with the configured default duration.
    pub fn new(orchestrator: Arc<Orchestrator>) -> Self {
        let minutes = orchestrator.settings().budget.default_minutes;
        Self {
            orchestrator,
            minutes,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage()
    }

    /// Currently selected listening duration.
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Chunks dropped from the current script.
    pub fn failures(&self) -> &[ChunkFailure] {
        self.state
            .script()
            .map(|s| s.summary.failures.as_slice())
            .unwrap_or_default()
    }

    /// Apply an event and run the stages it triggers to completion.
    pub async fn handle(&mut self, event: Event) -> Result<&SessionState> {
        debug!("Session at '{}' received {}", self.stage(), event_name(&event));
        match event {
            Event::FileSelected(document) => {
                info!("File selected: {}", document.name);
                self.run_pipeline(document).await?;
            }
            Event::DurationChanged(minutes) => {
                self.orchestrator.budget().validate(minutes)?;
                self.minutes = minutes;
                if let Some(document) = self.state.document().cloned() {
                    self.run_pipeline(document).await?;
                }
            }
            Event::GenerateAudio => self.generate_audio().await?,
        }
        Ok(&self.state)
    }

    async fn run_pipeline(&mut self, document: Document) -> Result<()> {
        self.state = SessionState::FileUploaded {
            document: document.clone(),
        };

        let text = self.orchestrator.extract(&document).await?;
        self.state = SessionState::TextExtracted {
            document: document.clone(),
            text: text.clone(),
        };

        let script = self
            .orchestrator
            .build_script(&document, &text, self.minutes)
            .await?;
        self.state = SessionState::Summarized {
            document,
            text,
            script,
        };
        Ok(())
    }

    async fn generate_audio(&mut self) -> Result<()> {
        let script = self.state.script().ok_or_else(|| {
            EduAidError::InvalidState(format!(
                "no podcast script to speak (session is {})",
                self.stage()
            ))
        })?;

        let audio = self.orchestrator.synthesize(script.text()).await?;

        self.state = match std::mem::take(&mut self.state) {
            SessionState::Summarized {
                document,
                text,
                script,
            }
            | SessionState::AudioGenerated {
                document,
                text,
                script,
                ..
            } => SessionState::AudioGenerated {
                document,
                text,
                script,
                audio,
            },
            other => other,
        };
        Ok(())
    }
}

fn event_name(event: &Event) -> &'static str {
    match event {
        Event::FileSelected(_) => "FileSelected",
        Event::DurationChanged(_) => "DurationChanged",
        Event::GenerateAudio => "GenerateAudio",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::tests::test_orchestrator;
    use std::sync::atomic::Ordering;

    const TEXT: &[u8] = b"Plants need light. Roots absorb water. Leaves make sugar";

    fn session(max_words: usize) -> (Session, Arc<crate::summarize::tests::EchoModel>) {
        let (orchestrator, model, _) = test_orchestrator(max_words);
        (Session::new(Arc::new(orchestrator)), model)
    }

    #[tokio::test]
    async fn test_full_flow() {
        let (mut session, _) = session(3);
        assert_eq!(session.stage(), Stage::Idle);
        assert_eq!(session.minutes(), 2);

        let state = session
            .handle(Event::FileSelected(Document::new("bio.pdf", TEXT.to_vec())))
            .await
            .unwrap();
        assert_eq!(state.stage(), Stage::Summarized);
        let script = state.script().unwrap();
        assert_eq!(script.text(), "Plants Roots Leaves");
        assert_eq!(script.word_budget, 451);

        let state = session.handle(Event::GenerateAudio).await.unwrap();
        assert_eq!(state.stage(), Stage::AudioGenerated);
        assert_eq!(state.audio().unwrap().bytes.as_ref(), b"Plants Roots Leaves");
    }

    #[tokio::test]
    async fn test_audio_requires_script() {
        let (mut session, _) = session(450);
        let err = session.handle(Event::GenerateAudio).await.unwrap_err();
        assert!(matches!(err, EduAidError::InvalidState(_)));
        assert_eq!(session.stage(), Stage::Idle);
    }

    #[tokio::test]
    async fn test_duration_change_recomputes() {
        let (mut session, model) = session(450);
        session
            .handle(Event::FileSelected(Document::new("bio.pdf", TEXT.to_vec())))
            .await
            .unwrap();
        session.handle(Event::GenerateAudio).await.unwrap();
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);

        let state = session.handle(Event::DurationChanged(10)).await.unwrap();
        assert_eq!(state.stage(), Stage::Summarized);
        assert_eq!(state.script().unwrap().word_budget, 1501);
        assert!(state.audio().is_none());
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_duration_change_without_file() {
        let (mut session, model) = session(450);
        let state = session.handle(Event::DurationChanged(5)).await.unwrap();
        assert_eq!(state.stage(), Stage::Idle);
        assert_eq!(session.minutes(), 5);
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_duration_keeps_state() {
        let (mut session, _) = session(450);
        assert!(session.handle(Event::DurationChanged(11)).await.is_err());
        assert_eq!(session.minutes(), 2);
    }

    #[tokio::test]
    async fn test_extraction_failure_stops_at_upload() {
        let (mut session, _) = session(450);
        let err = session
            .handle(Event::FileSelected(Document::new("bad.pdf", b"BROKEN".to_vec())))
            .await
            .unwrap_err();
        assert!(matches!(err, EduAidError::Pdf(_)));
        assert_eq!(session.stage(), Stage::FileUploaded);

        // A new upload starts over.
        let state = session
            .handle(Event::FileSelected(Document::new("ok.pdf", TEXT.to_vec())))
            .await
            .unwrap();
        assert_eq!(state.stage(), Stage::Summarized);
    }

    #[tokio::test]
    async fn test_partial_failures_are_exposed() {
        let (mut session, _) = session(3);
        session
            .handle(Event::FileSelected(Document::new(
                "mixed.pdf",
                b"Alpha beta. FAIL chunk. Gamma delta".to_vec(),
            )))
            .await
            .unwrap();

        assert_eq!(session.state().script().unwrap().text(), "Alpha Gamma");
        assert_eq!(session.failures().len(), 1);
        assert_eq!(session.failures()[0].index, 1);
    }

    #[tokio::test]
    async fn test_all_chunks_failing_stops_at_extraction() {
        let (mut session, _) = session(450);
        let err = session
            .handle(Event::FileSelected(Document::new("bad.pdf", b"FAIL everything".to_vec())))
            .await
            .unwrap_err();
        assert!(matches!(err, EduAidError::AllChunksFailed { .. }));
        assert_eq!(session.stage(), Stage::TextExtracted);
    }
}
