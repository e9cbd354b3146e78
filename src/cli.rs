//! CLI interface for the resume critic

use crate::config::OutputFormat;
use clap::{ArgGroup, Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "resume-critic")]
#[command(about = "Score how well a resume matches a job description")]
#[command(long_about = "Compare a resume against a job description using a technical-term vocabulary, \
alternative requirements (\"Python or Java\"), semantic similarity and an optional qualitative analysis")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Score a resume against a job description
    #[command(group(ArgGroup::new("job_source").required(true).args(["job", "job_text"])))]
    Score {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD)
        #[arg(short, long)]
        job: Option<PathBuf>,

        /// Job description given inline
        #[arg(long)]
        job_text: Option<String>,

        /// Semantic similarity in [0, 1] from an external embedding service
        #[arg(long)]
        semantic: Option<f32>,

        /// JSON response of the qualitative analysis service
        #[arg(short, long)]
        analysis: Option<PathBuf>,

        /// Output format: console, json, markdown
        #[arg(short, long)]
        output: Option<String>,

        /// Save output to file
        #[arg(short, long)]
        save: Option<PathBuf>,

        /// Output detailed analysis
        #[arg(short, long)]
        detailed: bool,
    },

    /// Inspect the term vocabulary
    Vocab {
        #[command(subcommand)]
        action: VocabAction,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum VocabAction {
    /// List vocabulary terms
    List,

    /// Show the keywords and alternative groups found in a text
    Check {
        /// Text to analyze
        text: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(OutputFormat::Console),
        "json" => Ok(OutputFormat::Json),
        "markdown" | "md" => Ok(OutputFormat::Markdown),
        _ => Err(format!("Invalid output format: {}. Supported: console, json, markdown", format)),
    }
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_score_requires_a_job_source() {
        assert!(Cli::try_parse_from(["resume-critic", "score", "--resume", "cv.pdf"]).is_err());
        assert!(Cli::try_parse_from([
            "resume-critic", "score", "--resume", "cv.pdf", "--job", "job.txt", "--job-text", "Rust"
        ])
        .is_err());

        let cli = Cli::try_parse_from([
            "resume-critic", "score", "-r", "cv.pdf", "--job-text", "Rust developer", "--semantic", "0.7",
        ])
        .unwrap();
        match cli.command {
            Commands::Score { job, job_text, semantic, .. } => {
                assert!(job.is_none());
                assert_eq!(job_text.as_deref(), Some("Rust developer"));
                assert_eq!(semantic, Some(0.7));
            }
            _ => panic!("expected score command"),
        }
    }

    #[test]
    fn test_parse_output_format() {
        assert_eq!(parse_output_format("JSON"), Ok(OutputFormat::Json));
        assert_eq!(parse_output_format("md"), Ok(OutputFormat::Markdown));
        assert!(parse_output_format("html").is_err());
    }

    #[test]
    fn test_validate_file_extension() {
        assert!(validate_file_extension(Path::new("cv.PDF"), &["pdf", "txt"]).is_ok());
        assert!(validate_file_extension(Path::new("cv.docx"), &["pdf", "txt"]).is_err());
        assert!(validate_file_extension(Path::new("cv"), &["pdf"]).is_err());
    }
}
