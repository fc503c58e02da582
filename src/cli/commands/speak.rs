//! Speak command implementation.

use crate::cli::output::format_size;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::speech::create_synthesizer;
use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;

/// Run the speak command.
pub async fn run_speak(input: &str, output: &str, settings: Settings) -> Result<()> {
    if let Err(e) = preflight::check(Operation::Speak, &settings) {
        Output::error(&format!("{}", e));
        Output::info("Run 'eduaid doctor' for detailed diagnostics.");
        return Err(e.into());
    }

    let script = if input == "-" {
        let mut buf = String::new();
        tokio::io::stdin().read_to_string(&mut buf).await?;
        buf
    } else {
        let path = Settings::expand_path(input);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?
    };

    if script.trim().is_empty() {
        anyhow::bail!("Script is empty, nothing to speak");
    }

    let synthesizer = create_synthesizer(&settings.speech)?;

    let spinner = Output::spinner("Generating audio...");
    let audio = synthesizer.synthesize(&script).await;
    spinner.finish_and_clear();
    let audio = audio?;

    let output = Settings::expand_path(output);
    audio.save_to(&output)?;
    Output::success(&format!(
        "Saved {} to {}",
        format_size(audio.len() as u64),
        output.display()
    ));

    Ok(())
}
