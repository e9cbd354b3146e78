//! resume-critic: score how well a resume matches a job description

use clap::Parser;
use log::{error, info};
use resume_critic::cli::{self, Cli, Commands, ConfigAction, VocabAction};
use resume_critic::config::Config;
use resume_critic::input::manager::InputManager;
use resume_critic::llm::analysis::QualitativeAnalysis;
use resume_critic::output::formatter::{resolve_save_path, save_report_to_file, ReportGenerator};
use resume_critic::output::report::AnalysisReport;
use resume_critic::processing::alternatives::AlternativeGroupDetector;
use resume_critic::processing::analyzer::AnalysisEngine;
use resume_critic::processing::keyword_extractor::KeywordExtractor;
use resume_critic::processing::similarity::FixedSimilarity;
use resume_critic::processing::vocabulary::Vocabulary;
use resume_critic::{Result, ResumeCriticError};
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;

const RESUME_EXTENSIONS: &[&str] = &["pdf", "txt", "text", "md", "markdown"];
const JOB_EXTENSIONS: &[&str] = &["txt", "text", "md", "markdown"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, config, cli.config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

async fn run_command(command: Commands, config: Config, config_path: Option<PathBuf>) -> Result<()> {
    match command {
        Commands::Score {
            resume,
            job,
            job_text,
            semantic,
            analysis,
            output,
            save,
            detailed,
        } => {
            info!("Starting resume match analysis");

            cli::validate_file_extension(&resume, RESUME_EXTENSIONS)
                .map_err(|e| ResumeCriticError::InvalidInput(format!("Resume file: {}", e)))?;
            if let Some(job) = &job {
                cli::validate_file_extension(job, JOB_EXTENSIONS)
                    .map_err(|e| ResumeCriticError::InvalidInput(format!("Job description file: {}", e)))?;
            }

            let output_format = match output {
                Some(format) => cli::parse_output_format(&format).map_err(ResumeCriticError::InvalidInput)?,
                None => config.output.format,
            };

            let mut input_manager =
                InputManager::new(config.input.max_upload_bytes).with_cache(config.input.enable_caching);

            let resume_text = input_manager.extract_text(&resume).await?;
            let (job_text, job_name) = match (job, job_text) {
                (Some(path), _) => (
                    input_manager.extract_text(&path).await?,
                    path.display().to_string(),
                ),
                (None, Some(text)) => (text, "inline".to_string()),
                (None, None) => {
                    return Err(ResumeCriticError::InvalidInput(
                        "Either --job or --job-text is required".to_string(),
                    ))
                }
            };
            info!(
                "Resume text: {} characters, job description: {} characters",
                resume_text.len(),
                job_text.len()
            );

            let qualitative_analysis = match &analysis {
                Some(path) => QualitativeAnalysis::from_file(path).await,
                None => QualitativeAnalysis::disabled("no qualitative analysis supplied"),
            };

            let vocabulary = Arc::new(Vocabulary::load(config.vocabulary.path.as_deref()));
            let mut engine = AnalysisEngine::new(&config, Arc::clone(&vocabulary))?;
            if let Some(score) = semantic {
                engine = engine.with_similarity(Box::new(FixedSimilarity::new(score)?));
            }

            let alignment = engine.analyze(&resume_text, &job_text, qualitative_analysis)?;
            let report = AnalysisReport::from_alignment(
                alignment,
                &vocabulary,
                resume.display().to_string(),
                job_name,
            );

            let generator = ReportGenerator::with_options(
                config.output.color_output && save.is_none(),
                detailed || config.output.detailed,
                true,
                true,
            );
            let rendered = generator.generate_report(&report, &output_format)?;

            match save {
                Some(target) => {
                    let path = resolve_save_path(&target, &output_format, &resume.to_string_lossy());
                    save_report_to_file(&rendered, &path)?;
                    println!("💾 Report saved to {}", path.display());
                    println!("🎯 Match score: {}%", report.match_score);
                }
                None => println!("{}", rendered),
            }
        }

        Commands::Vocab { action } => {
            let vocabulary = Arc::new(Vocabulary::load(config.vocabulary.path.as_deref()));

            match action {
                VocabAction::List => {
                    println!("📚 Vocabulary ({} terms, {:?})\n", vocabulary.len(), vocabulary.source());
                    for term in vocabulary.iter() {
                        println!("  • {}", term);
                    }
                }
                VocabAction::Check { text } => {
                    let extractor = KeywordExtractor::new(Arc::clone(&vocabulary))?;
                    let detector = AlternativeGroupDetector::new()?
                        .with_sentence_fallback(config.matching.sentence_fallback);

                    let keywords = extractor.extract(&text);
                    let groups = detector.detect(&text, &keywords);

                    println!("🔤 Keywords ({}):", keywords.len());
                    for keyword in &keywords {
                        println!("  • {}", keyword);
                    }
                    if !groups.is_empty() {
                        println!("\n🔀 Alternative groups:");
                        for group in &groups {
                            println!("  • {}", group);
                        }
                    }
                }
            }
        }

        Commands::Config { action } => {
            let path = config_path.clone().unwrap_or_else(Config::config_path);

            match action {
                Some(ConfigAction::Show) | None => show_config(&config, &path),
                Some(ConfigAction::Reset) => {
                    println!("🔄 Resetting configuration to defaults...");
                    match &config_path {
                        Some(custom) => Config::default().save_to(custom)?,
                        None => Config::default().save()?,
                    }
                    println!("✅ Configuration reset: {}", path.display());
                }
            }
        }
    }

    Ok(())
}

fn show_config(config: &Config, path: &Path) {
    println!("⚙️  Current Configuration ({})\n", path.display());
    match &config.vocabulary.path {
        Some(vocabulary) => println!("Vocabulary: {}", vocabulary.display()),
        None => println!("Vocabulary: built-in"),
    }
    println!("Sentence fallback: {}", config.matching.sentence_fallback);
    println!("Scoring weights (with qualitative analysis):");
    println!("  Semantic: {:.1}%", config.scoring.semantic_weight * 100.0);
    println!("  Keywords: {:.1}%", config.scoring.keyword_weight * 100.0);
    println!("  Qualitative: {:.1}%", config.scoring.qualitative_weight * 100.0);
    println!("Scoring weights (without):");
    println!("  Semantic: {:.1}%", config.scoring.fallback_semantic_weight * 100.0);
    println!("  Keywords: {:.1}%", config.scoring.fallback_keyword_weight * 100.0);
    println!("Max upload: {} bytes", config.input.max_upload_bytes);
    println!("Output: {:?} (detailed: {}, colors: {})",
        config.output.format, config.output.detailed, config.output.color_output);
}
