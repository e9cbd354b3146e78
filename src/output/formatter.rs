//! Output formatters for analysis reports

use crate::config::OutputFormat;
use crate::error::Result;
use crate::llm::analysis::QualitativeAnalysis;
use crate::output::report::AnalysisReport;
use colored::{Color, Colorize};
use std::path::{Path, PathBuf};

pub trait OutputFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with optional colors
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Dispatches a report to the formatter for the requested format
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, score: u32) -> String {
        let (badge, color) = match score {
            90.. => ("EXCELLENT", Color::Green),
            80..=89 => ("VERY GOOD", Color::BrightGreen),
            70..=79 => ("GOOD", Color::Yellow),
            60..=69 => ("FAIR", Color::BrightYellow),
            50..=59 => ("BELOW AVG", Color::Red),
            _ => ("POOR", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_term_list(&self, terms: &[String], color: Color) -> String {
        if terms.is_empty() {
            return self.colorize("(none)", Color::BrightBlack);
        }
        terms
            .iter()
            .map(|term| self.colorize(term, color))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header("📊 RESUME MATCH ANALYSIS", 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));

        output.push_str(&self.format_header("Summary", 2));
        output.push_str(&format!(
            "Match Score: {}% {}\n",
            report.match_score,
            self.format_score_badge(report.match_score)
        ));
        output.push_str(&format!("Verdict: {}\n", self.colorize(&report.verdict, Color::Cyan)));

        output.push_str(&self.format_header("Score Breakdown", 3));
        output.push_str(&format!(
            "🎯 Semantic Score: {:.1}% (weight: {:.1}%)\n",
            report.semantic_score,
            report.weights.semantic * 100.0
        ));
        output.push_str(&format!(
            "🔍 Keyword Score: {}% (weight: {:.1}%)\n",
            report.keyword_score,
            report.weights.keyword * 100.0
        ));
        match (&report.qualitative_analysis, report.weights.qualitative) {
            (QualitativeAnalysis::Enabled(assessment), Some(weight)) => {
                output.push_str(&format!(
                    "🤖 Qualitative Score: {:.1}% (weight: {:.1}%)\n",
                    assessment.overall_score,
                    weight * 100.0
                ));
            }
            (QualitativeAnalysis::Disabled { reason }, _) => {
                output.push_str(&format!(
                    "🤖 Qualitative analysis: {}\n",
                    self.colorize(&format!("disabled ({})", reason), Color::BrightBlack)
                ));
            }
            _ => {}
        }

        output.push_str(&self.format_header("Keywords", 3));
        output.push_str(&format!(
            "✅ Matched: {}\n",
            self.format_term_list(&report.matched_keywords, Color::Green)
        ));
        output.push_str(&format!(
            "❌ Missing: {}\n",
            self.format_term_list(&report.missing_keywords, Color::Red)
        ));

        if !report.alternative_groups.is_empty() {
            output.push_str(&self.format_header("Alternative Requirements", 3));
            for group in &report.alternative_groups {
                let satisfied = report.matched_groups.contains(group);
                let marker = if satisfied {
                    self.colorize("✓", Color::Green)
                } else {
                    self.colorize("✗", Color::Red)
                };
                output.push_str(&format!("  {} {}\n", marker, group.join(" / ")));
            }
        }

        if let Some(assessment) = report.qualitative_analysis.assessment() {
            output.push_str(&self.format_header("🤖 Qualitative Assessment", 2));
            output.push_str(&format!(
                "Recommendation: {}\n",
                self.colorize(assessment.recommendation.label(), Color::Cyan)
            ));
            if !assessment.summary.is_empty() {
                output.push_str(&format!("{} {}\n", self.colorize("Summary:", Color::Cyan), assessment.summary));
            }
            for strength in &assessment.strengths {
                output.push_str(&format!("  • {}\n", self.colorize(strength, Color::Green)));
            }
            for gap in &assessment.gaps {
                output.push_str(&format!("  • {}\n", self.colorize(gap, Color::Yellow)));
            }
        }

        if self.detailed {
            output.push_str(&self.format_header("Details", 3));
            output.push_str(&format!(
                "Job keywords ({}): {}\n",
                report.job_keywords.len(),
                self.format_term_list(&report.job_keywords, Color::White)
            ));
            output.push_str(&format!(
                "Resume keywords ({}): {}\n",
                report.resume_keywords.len(),
                self.format_term_list(&report.resume_keywords, Color::White)
            ));
            output.push_str(&format!(
                "Adjusted total: {} | Regular matches: {} | Total matched: {}\n",
                report.breakdown.adjusted_total,
                report.breakdown.regular_matches,
                report.breakdown.total_matched
            ));
            if let Some(assessment) = report.qualitative_analysis.assessment() {
                for (dimension, score) in &assessment.dimension_scores {
                    output.push_str(&format!("  {}: {:.1}\n", dimension, score));
                }
            }
            output.push_str(&format!(
                "Vocabulary: {} terms ({}) | Similarity: {} | Version: {}\n",
                report.metadata.vocabulary_size,
                report.metadata.vocabulary_source,
                report.metadata.similarity_source,
                report.metadata.critic_version
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(score: u32) -> &'static str {
        match score {
            90.. => "🟢 Excellent",
            80..=89 => "🟡 Very Good",
            70..=79 => "🟠 Good",
            60..=69 => "🔴 Fair",
            50..=59 => "🔴 Below Average",
            _ => "🔴 Poor",
        }
    }

    fn code_list(terms: &[String]) -> String {
        if terms.is_empty() {
            return "_none_".to_string();
        }
        terms
            .iter()
            .map(|term| format!("`{}`", term))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &AnalysisReport) -> Result<String> {
        let mut output = String::new();

        output.push_str("# 📊 Resume Match Analysis Report\n\n");

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!(
                "**Resume:** `{}` | **Job:** `{}`\n\n",
                file_name(&report.metadata.resume_file),
                file_name(&report.metadata.job_file)
            ));
        }

        output.push_str("## Summary\n\n");
        output.push_str(&format!(
            "**Match Score:** {}% {}\n\n",
            report.match_score,
            Self::markdown_score_badge(report.match_score)
        ));
        output.push_str(&format!("**Verdict:** {}\n\n", report.verdict));

        output.push_str("### Score Breakdown\n\n");
        output.push_str("| Component | Score | Weight |\n");
        output.push_str("|-----------|-------|--------|\n");
        output.push_str(&format!(
            "| 🎯 Semantic Similarity | {:.1}% | {:.1}% |\n",
            report.semantic_score,
            report.weights.semantic * 100.0
        ));
        output.push_str(&format!(
            "| 🔍 Keyword Matching | {}% | {:.1}% |\n",
            report.keyword_score,
            report.weights.keyword * 100.0
        ));
        if let (Some(score), Some(weight)) =
            (report.qualitative_analysis.overall_score(), report.weights.qualitative)
        {
            output.push_str(&format!(
                "| 🤖 Qualitative Analysis | {:.1}% | {:.1}% |\n",
                score,
                weight * 100.0
            ));
        }
        output.push('\n');

        output.push_str("### Keywords\n\n");
        output.push_str(&format!("- **Matched:** {}\n", Self::code_list(&report.matched_keywords)));
        output.push_str(&format!("- **Missing:** {}\n", Self::code_list(&report.missing_keywords)));
        output.push('\n');

        if !report.alternative_groups.is_empty() {
            output.push_str("### Alternative Requirements\n\n");
            for group in &report.alternative_groups {
                let check = if report.matched_groups.contains(group) { "x" } else { " " };
                output.push_str(&format!("- [{}] {}\n", check, group.join(" / ")));
            }
            output.push('\n');
        }

        match &report.qualitative_analysis {
            QualitativeAnalysis::Enabled(assessment) => {
                output.push_str("## 🤖 Qualitative Assessment\n\n");
                output.push_str(&format!(
                    "**Recommendation:** {}\n\n",
                    assessment.recommendation.label()
                ));
                if !assessment.summary.is_empty() {
                    output.push_str(&format!("{}\n\n", assessment.summary));
                }
                if !assessment.strengths.is_empty() {
                    output.push_str("### ✅ Strengths\n\n");
                    for strength in &assessment.strengths {
                        output.push_str(&format!("- {}\n", strength));
                    }
                    output.push('\n');
                }
                if !assessment.gaps.is_empty() {
                    output.push_str("### 🎯 Gaps\n\n");
                    for gap in &assessment.gaps {
                        output.push_str(&format!("- {}\n", gap));
                    }
                    output.push('\n');
                }
            }
            QualitativeAnalysis::Disabled { reason } => {
                output.push_str(&format!("_Qualitative analysis disabled: {}_\n\n", reason));
            }
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Vocabulary: {} terms ({}) | Similarity: {} | resume-critic v{}*\n",
                report.metadata.vocabulary_size,
                report.metadata.vocabulary_source,
                report.metadata.similarity_source,
                report.metadata.critic_version
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

impl ReportGenerator {
    pub fn new() -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(true, false),
            json_formatter: JsonFormatter::new(true),
            markdown_formatter: MarkdownFormatter::new(true),
        }
    }

    pub fn with_options(use_colors: bool, detailed: bool, pretty_json: bool, include_metadata: bool) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(&self, report: &AnalysisReport, format: &OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Console => self.console_formatter.format_report(report),
            OutputFormat::Json => self.json_formatter.format_report(report),
            OutputFormat::Markdown => self.markdown_formatter.format_report(report),
        }
    }
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    use std::fs;
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(file_path, content)?;
    Ok(())
}

/// Where a report saved with `--save` ends up: a directory target gets a
/// generated, timestamped file name inside it.
pub fn resolve_save_path(target: &Path, format: &OutputFormat, resume_name: &str) -> PathBuf {
    if target.is_dir() {
        target.join(suggest_filename(format, resume_name, true))
    } else {
        target.to_path_buf()
    }
}

pub fn suggest_filename(format: &OutputFormat, resume_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(resume_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    let extension = match format {
        OutputFormat::Console => "txt",
        OutputFormat::Json => "json",
        OutputFormat::Markdown => "md",
    };

    format!("{}_critique{}.{}", base_name, timestamp_suffix, extension)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::processing::analyzer::AnalysisEngine;
    use crate::processing::similarity::FixedSimilarity;
    use crate::processing::vocabulary::Vocabulary;
    use std::sync::Arc;
    use tempfile::TempDir;

    const JOB: &str = "Python or Java developer needed, Django required, AWS preferred";

    fn report(qualitative: QualitativeAnalysis) -> AnalysisReport {
        let mut config = Config::default();
        config.matching.sentence_fallback = false;
        let vocabulary = Arc::new(Vocabulary::from_terms(&["python", "java", "django", "aws"]));
        let engine = AnalysisEngine::new(&config, Arc::clone(&vocabulary))
            .unwrap()
            .with_similarity(Box::new(FixedSimilarity::new(0.8).unwrap()));
        let alignment = engine.analyze("Java backend engineer, AWS", JOB, qualitative).unwrap();
        AnalysisReport::from_alignment(alignment, &vocabulary, "cv/resume.txt", "job.txt")
    }

    #[test]
    fn test_console_without_colors() {
        let report = report(QualitativeAnalysis::disabled("no analysis supplied"));
        let output = ConsoleFormatter::new(false, true).format_report(&report).unwrap();

        assert!(output.contains("Match Score: 76% [GOOD]"));
        assert!(output.contains("✅ Matched: aws, java, python\n"));
        assert!(output.contains("❌ Missing: django"));
        assert!(output.contains("✓ java / python"));
        assert!(output.contains("disabled (no analysis supplied)"));
        assert!(output.contains("Adjusted total: 3"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_json_output_parses() {
        let report = report(QualitativeAnalysis::disabled("no analysis supplied"));
        let output = JsonFormatter::new(false).format_report(&report).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["match_score"], 76);
        assert_eq!(value["keyword_score"], 67);
        assert_eq!(value["missing_keywords"][0], "django");
        assert_eq!(value["qualitative_analysis"]["enabled"], false);

        let restored: AnalysisReport = serde_json::from_str(&output).unwrap();
        assert_eq!(restored, report);
    }

    #[test]
    fn test_markdown_with_qualitative_analysis() {
        let qualitative = QualitativeAnalysis::from_service_json(
            r#"{"overall_score": 70, "strengths": ["Java"], "gaps": ["Django"], "summary": "Close fit."}"#,
        );
        let report = report(qualitative);
        let output = MarkdownFormatter::new(true).format_report(&report).unwrap();

        // 40 + 20.1 + 14 = 74.1
        assert_eq!(report.match_score, 74);
        assert!(output.contains("**Match Score:** 74% 🟠 Good"));
        assert!(output.contains("| 🤖 Qualitative Analysis | 70.0% | 20.0% |"));
        assert!(output.contains("- [x] java / python"));
        assert!(output.contains("**Resume:** `resume.txt`"));
        assert!(output.contains("### 🎯 Gaps"));
    }

    #[test]
    fn test_generator_dispatch() {
        let report = report(QualitativeAnalysis::disabled("none"));
        let generator = ReportGenerator::with_options(false, false, true, false);

        let json = generator.generate_report(&report, &OutputFormat::Json).unwrap();
        assert!(json.starts_with('{'));

        let markdown = generator.generate_report(&report, &OutputFormat::Markdown).unwrap();
        assert!(markdown.starts_with("# "));
        assert!(!markdown.contains("**Generated:**"));
    }

    #[test]
    fn test_save_and_suggest_filename() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reports").join("out.md");

        save_report_to_file("# report", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# report");

        assert_eq!(
            suggest_filename(&OutputFormat::Json, "cv/jane_doe.pdf", false),
            "jane_doe_critique.json"
        );
        assert!(suggest_filename(&OutputFormat::Markdown, "resume.txt", true).ends_with(".md"));
    }

    #[test]
    fn test_save_into_directory_uses_suggested_name() {
        let dir = TempDir::new().unwrap();

        let resolved = resolve_save_path(dir.path(), &OutputFormat::Json, "cv/jane_doe.pdf");
        assert_eq!(resolved.parent(), Some(dir.path()));
        let name = resolved.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("jane_doe_critique_"));
        assert!(name.ends_with(".json"));

        let explicit = dir.path().join("report.md");
        assert_eq!(resolve_save_path(&explicit, &OutputFormat::Json, "cv.pdf"), explicit);
    }
}
