//! CLI module for EduAid.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// EduAid - PDF to podcast
///
/// Extracts the text of a PDF, summarizes it to fit your listening time,
/// and reads the summary aloud as an MP3.
#[derive(Parser, Debug)]
#[command(name = "eduaid")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "EDUAID_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Make a podcast from a PDF: extract, summarize, and synthesize
    Podcast {
        /// PDF file to convert
        input: String,

        /// How long is your commute? (minutes, 1-10)
        #[arg(short, long)]
        minutes: Option<u32>,

        /// Where to write the MP3
        #[arg(short, long, default_value = "summary_audio.mp3")]
        output: String,

        /// Only produce the script, skip audio generation
        #[arg(long)]
        no_audio: bool,
    },

    /// Print the text extracted from a PDF
    Extract {
        /// PDF file to read
        input: String,

        /// Write text to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Summarize a PDF into a podcast script
    Summarize {
        /// PDF file to summarize
        input: String,

        /// Listening time in minutes (1-10)
        #[arg(short, long)]
        minutes: Option<u32>,

        /// Print the script with chunk statistics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Synthesize an existing script (text file) into an MP3
    Speak {
        /// Text file with the script ("-" for stdin)
        input: String,

        /// Where to write the MP3
        #[arg(short, long, default_value = "summary_audio.mp3")]
        output: String,
    },

    /// Start the single-page web tool
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Check credentials and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_podcast() {
        let cli = Cli::try_parse_from(["eduaid", "-v", "podcast", "notes.pdf", "-m", "5"]).unwrap();
        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Podcast { input, minutes, output, no_audio } => {
                assert_eq!(input, "notes.pdf");
                assert_eq!(minutes, Some(5));
                assert_eq!(output, "summary_audio.mp3");
                assert!(!no_audio);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_config_init() {
        let cli = Cli::try_parse_from(["eduaid", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config { action: ConfigAction::Init { force: true } }
        ));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
