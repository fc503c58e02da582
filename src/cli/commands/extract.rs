//! Extract command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::document::{Document, PdfExtractor, TextExtractor};
use anyhow::Result;

/// Run the extract command.
pub async fn run_extract(input: &str, output: Option<String>) -> Result<()> {
    let path = Settings::expand_path(input);
    let document = Document::from_path(&path).await?;

    let spinner = Output::spinner(&format!("Reading {}...", document.name));
    let extracted = PdfExtractor.extract(&document).await;
    spinner.finish_and_clear();
    let extracted = extracted?;

    match output {
        Some(output) => {
            let output = Settings::expand_path(&output);
            tokio::fs::write(&output, &extracted.text).await?;
            Output::success(&format!(
                "Extracted {} words from {} pages to {}",
                extracted.word_count(),
                extracted.page_count,
                output.display()
            ));
        }
        None => println!("{}", extracted.text),
    }

    Ok(())
}
