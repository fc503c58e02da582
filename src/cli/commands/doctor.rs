//! Doctor command - verify credentials and configuration.

use crate::budget::BudgetTable;
use crate::cli::Output;
use crate::config::{Settings, SpeechProvider, SummarizerProvider};
use crate::summarize::huggingface_token;
use console::style;
use std::path::Path;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let icon = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };

        println!("  {} {} - {}", icon, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings, config_path: &Path) -> anyhow::Result<()> {
    Output::header("EduAid Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("Providers").bold());
    let provider_checks = vec![check_summarizer(settings), check_speech(settings)];
    for check in &provider_checks {
        check.print();
    }
    checks.extend(provider_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_checks = vec![
        check_config_file(config_path),
        check_budget(settings),
        check_chunking(settings),
    ];
    for check in &config_checks {
        check.print();
    }
    checks.extend(config_checks);

    println!();

    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using EduAid.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! EduAid is ready to use.");
    }

    Ok(())
}

fn check_summarizer(settings: &Settings) -> CheckResult {
    let name = format!("Summarizer ({})", settings.summarizer.provider);
    let model = settings.summarizer.model_name();
    match settings.summarizer.provider {
        SummarizerProvider::OpenAI => check_openai_api_key(&name, model),
        SummarizerProvider::HuggingFace => match huggingface_token() {
            Some(_) => CheckResult::ok(&name, &format!("{} (HF_TOKEN set)", model)),
            None => CheckResult::warning(
                &name,
                &format!("{} (anonymous)", model),
                "Set HF_TOKEN for higher rate limits: export HF_TOKEN='hf_...'",
            ),
        },
    }
}

fn check_speech(settings: &Settings) -> CheckResult {
    let name = format!("Speech ({})", settings.speech.provider);
    match settings.speech.provider {
        SpeechProvider::OpenAI => check_openai_api_key(
            &name,
            &format!("{} / {}", settings.speech.model, settings.speech.voice),
        ),
        SpeechProvider::Google => CheckResult::ok(
            &name,
            &format!("language '{}', no key needed", settings.speech.language),
        ),
    }
}

/// Check the OpenAI API key for a provider that needs it.
fn check_openai_api_key(name: &str, model: &str) -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok(name, &format!("{} (key {})", model, masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            name,
            "OPENAI_API_KEY is empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            name,
            "OPENAI_API_KEY format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            name,
            "OPENAI_API_KEY not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

fn check_config_file(config_path: &Path) -> CheckResult {
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: eduaid config init",
        )
    }
}

fn check_budget(settings: &Settings) -> CheckResult {
    let table = BudgetTable::from_settings(&settings.budget);
    match table.validate(settings.budget.default_minutes) {
        Ok(()) => CheckResult::ok(
            "Duration",
            &format!(
                "1-{} min at {} words/min, default {} min",
                table.max_minutes(),
                table.words_per_minute(),
                settings.budget.default_minutes
            ),
        ),
        Err(e) => CheckResult::error(
            "Duration",
            &e.to_string(),
            "Set [budget] default_minutes within 1..=max_minutes",
        ),
    }
}

fn check_chunking(settings: &Settings) -> CheckResult {
    if settings.chunking.max_words == 0 {
        CheckResult::error(
            "Chunking",
            "max_words is 0",
            "Set [chunking] max_words to a positive value (default 450)",
        )
    } else {
        CheckResult::ok(
            "Chunking",
            &format!("up to {} words per chunk", settings.chunking.max_words),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }

    #[test]
    fn test_check_budget() {
        let mut settings = Settings::default();
        assert_eq!(check_budget(&settings).status, CheckStatus::Ok);

        settings.budget.default_minutes = 12;
        assert_eq!(check_budget(&settings).status, CheckStatus::Error);
    }

    #[test]
    fn test_check_chunking() {
        let mut settings = Settings::default();
        assert_eq!(check_chunking(&settings).status, CheckStatus::Ok);

        settings.chunking.max_words = 0;
        assert_eq!(check_chunking(&settings).status, CheckStatus::Error);
    }

    #[test]
    fn test_google_speech_needs_no_key() {
        let settings = Settings::default();
        assert_eq!(check_speech(&settings).status, CheckStatus::Ok);
    }
}
