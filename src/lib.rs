//! EduAid - PDF to podcast
//!
//! Turns a PDF into a short spoken summary sized to the listener's commute.
//!
//! # Overview
//!
//! EduAid:
//! - Extracts the text of an uploaded PDF
//! - Splits it into sentence-aligned chunks and summarizes each one
//! - Sizes the summary from a chosen listening duration
//! - Reads the script aloud and produces a downloadable MP3
//!
//! # Architecture
//!
//! - `config` - Configuration management
//! - `document` - PDF input and text extraction
//! - `chunking` - Sentence-aligned text chunking
//! - `budget` - Listening duration to word budget mapping
//! - `summarize` - Summary models and the chunk-wise summarizer
//! - `speech` - Text-to-speech synthesis
//! - `orchestrator` - Pipeline coordination
//! - `session` - Event-driven state machine for one user
//!
//! # Example
//!
//! ```rust,no_run
//! use eduaid::config::Settings;
//! use eduaid::document::Document;
//! use eduaid::orchestrator::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!
//!     let document = Document::from_path("lecture.pdf".as_ref()).await?;
//!     let script = orchestrator.process_document(&document, 5).await?;
//!     let audio = orchestrator.synthesize(script.text()).await?;
//!     audio.save_to("summary_audio.mp3".as_ref())?;
//!
//!     Ok(())
//! }
//! ```

pub mod budget;
pub mod chunking;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod openai;
pub mod orchestrator;
pub mod session;
pub mod speech;
pub mod summarize;

pub use error::{EduAidError, Result};
