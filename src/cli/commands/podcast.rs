//! Podcast command implementation.
//!
//! Runs the same event sequence the web tool does: select a file (which
//! extracts and summarizes it), then request audio.

use super::summarize::print_script;
use crate::cli::output::format_size;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::document::Document;
use crate::orchestrator::Orchestrator;
use crate::session::{Event, Session};
use anyhow::Result;
use std::sync::Arc;

/// Run the podcast command.
pub async fn run_podcast(
    input: &str,
    minutes: Option<u32>,
    output: &str,
    no_audio: bool,
    settings: Settings,
) -> Result<()> {
    let operation = if no_audio {
        Operation::Summarize
    } else {
        Operation::Podcast
    };
    if let Err(e) = preflight::check(operation, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'eduaid doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let orchestrator = Arc::new(Orchestrator::new(settings)?);
    let mut session = Session::new(orchestrator);

    if let Some(minutes) = minutes {
        session.handle(Event::DurationChanged(minutes)).await?;
    }

    let document = Document::from_path(&Settings::expand_path(input)).await?;
    Output::info(&format!(
        "Processing: {} ({}, {} min)",
        document.name,
        format_size(document.len() as u64),
        session.minutes()
    ));

    let spinner = Output::spinner("Extracting and summarizing...");
    let result = session.handle(Event::FileSelected(document)).await.map(|_| ());
    spinner.finish_and_clear();
    if let Err(e) = result {
        Output::error(&format!("Failed at '{}': {}", session.stage(), e));
        return Err(e.into());
    }

    if let Some(script) = session.state().script() {
        print_script(script);
    }

    if no_audio {
        return Ok(());
    }

    let spinner = Output::spinner("Generating audio...");
    let result = session.handle(Event::GenerateAudio).await.map(|_| ());
    spinner.finish_and_clear();
    if let Err(e) = result {
        Output::error(&format!("Audio generation failed: {}", e));
        return Err(e.into());
    }

    if let Some(audio) = session.state().audio() {
        let output = Settings::expand_path(output);
        audio.save_to(&output)?;
        Output::success(&format!(
            "Saved podcast ({}) to {}",
            format_size(audio.len() as u64),
            output.display()
        ));
    }

    Ok(())
}
