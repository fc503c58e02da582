//! EduAid CLI entry point.

use anyhow::Result;
use clap::Parser;
use eduaid::cli::{commands, Cli, Commands};
use eduaid::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = cli.config.as_deref().map(Settings::expand_path);
    let settings = Settings::load_from(config_path.as_ref())?;

    // Initialize logging; -v flags override the configured level
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("eduaid={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match cli.command {
        Commands::Podcast {
            input,
            minutes,
            output,
            no_audio,
        } => {
            commands::run_podcast(&input, minutes, &output, no_audio, settings).await?;
        }

        Commands::Extract { input, output } => {
            commands::run_extract(&input, output).await?;
        }

        Commands::Summarize {
            input,
            minutes,
            json,
        } => {
            commands::run_summarize(&input, minutes, json, settings).await?;
        }

        Commands::Speak { input, output } => {
            commands::run_speak(&input, &output, settings).await?;
        }

        Commands::Serve { host, port } => {
            commands::run_serve(host, port, settings).await?;
        }

        Commands::Doctor => {
            let path = config_path.unwrap_or_else(Settings::default_config_path);
            commands::run_doctor(&settings, &path)?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings, config_path)?;
        }
    }

    Ok(())
}
