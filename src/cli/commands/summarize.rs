//! Summarize command implementation.

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::document::Document;
use crate::orchestrator::{Orchestrator, PodcastScript};
use anyhow::Result;

/// Run the summarize command.
pub async fn run_summarize(
    input: &str,
    minutes: Option<u32>,
    json: bool,
    settings: Settings,
) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Summarize, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'eduaid doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let minutes = minutes.unwrap_or(settings.budget.default_minutes);
    let orchestrator = Orchestrator::new(settings)?;
    orchestrator.budget().validate(minutes)?;

    let document = Document::from_path(&Settings::expand_path(input)).await?;

    let spinner = Output::spinner(&format!("Summarizing {}...", document.name));
    let script = orchestrator.process_document(&document, minutes).await;
    spinner.finish_and_clear();
    let script = script?;

    if json {
        println!("{}", serde_json::to_string_pretty(&script)?);
    } else {
        print_script(&script);
    }

    Ok(())
}

/// Print a script with its statistics.
pub(super) fn print_script(script: &PodcastScript) {
    Output::header("Podcast Script");
    Output::kv("Source", &script.source);
    Output::kv(
        "Length",
        &format!(
            "{} words from {} ({} pages)",
            script.summary.word_count(),
            script.source_words,
            script.pages
        ),
    );
    Output::kv(
        "Target",
        &format!("{} min, up to {} words per chunk", script.minutes, script.word_budget),
    );
    println!();
    Output::prose(script.text());
    println!();

    for failure in &script.summary.failures {
        Output::warning(&format!(
            "Chunk {} of {} was skipped: {}",
            failure.index + 1,
            script.summary.chunk_count,
            failure.message
        ));
    }
}
