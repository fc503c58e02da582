//! Configuration module for EduAid.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    BudgetSettings, ChunkingSettings, FailurePolicy, GeneralSettings, ServerSettings,
    Settings, SpeechProvider, SpeechSettings, SummarizerProvider, SummarizerSettings,
};
