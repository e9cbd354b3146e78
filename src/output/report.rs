//! Response structures assembled from an alignment analysis

use crate::llm::analysis::QualitativeAnalysis;
use crate::processing::analyzer::{AlignmentReport, ComponentWeights};
use crate::processing::match_scorer::ScoreBreakdown;
use crate::processing::vocabulary::{Vocabulary, VocabularySource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response returned to the caller of an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Blended final percentage
    pub match_score: u32,
    pub semantic_score: f64,
    pub keyword_score: u32,
    pub qualitative_analysis: QualitativeAnalysis,

    pub missing_keywords: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub job_keywords: Vec<String>,
    pub resume_keywords: Vec<String>,
    /// Each group sorted, groups in the order they were found
    pub alternative_groups: Vec<Vec<String>>,
    /// Groups the resume satisfies
    pub matched_groups: Vec<Vec<String>>,

    pub breakdown: ScoreBreakdown,
    pub weights: ComponentWeights,
    pub verdict: String,
    pub metadata: ReportMetadata,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub critic_version: String,
    pub resume_file: String,
    pub job_file: String,
    pub vocabulary_size: usize,
    pub vocabulary_source: String,
    pub similarity_source: String,
    pub processing_time_ms: u64,
}

impl AnalysisReport {
    pub fn from_alignment(
        alignment_report: AlignmentReport,
        vocabulary: &Vocabulary,
        resume_file: impl Into<String>,
        job_file: impl Into<String>,
    ) -> Self {
        let metadata = ReportMetadata {
            generated_at: Utc::now(),
            critic_version: env!("CARGO_PKG_VERSION").to_string(),
            resume_file: resume_file.into(),
            job_file: job_file.into(),
            vocabulary_size: vocabulary.len(),
            vocabulary_source: describe_source(vocabulary.source()),
            similarity_source: alignment_report.similarity_source.clone(),
            processing_time_ms: alignment_report.processing_time_ms,
        };

        let keywords = alignment_report.keyword_analysis;
        let result = keywords.result;

        Self {
            match_score: alignment_report.match_score,
            semantic_score: alignment_report.semantic_score,
            keyword_score: alignment_report.keyword_score,
            qualitative_analysis: alignment_report.qualitative_analysis,
            missing_keywords: result.missing.into_iter().collect(),
            matched_keywords: result.matched.into_iter().collect(),
            job_keywords: keywords.job_keywords.into_iter().collect(),
            resume_keywords: keywords.resume_keywords.into_iter().collect(),
            alternative_groups: keywords
                .alternative_groups
                .iter()
                .map(|group| group.iter().map(str::to_string).collect())
                .collect(),
            matched_groups: result
                .matched_groups
                .iter()
                .map(|group| group.iter().map(str::to_string).collect())
                .collect(),
            breakdown: result.breakdown,
            weights: alignment_report.weights,
            verdict: verdict(alignment_report.match_score).to_string(),
            metadata,
        }
    }
}

pub fn verdict(match_score: u32) -> &'static str {
    match match_score {
        90.. => "Excellent match - strong candidate for this role",
        80..=89 => "Very good match - minor improvements could help",
        70..=79 => "Good match - some targeted improvements recommended",
        60..=69 => "Fair match - several improvements needed",
        50..=59 => "Below average match - significant improvements required",
        _ => "Poor match - major revisions needed",
    }
}

fn describe_source(source: &VocabularySource) -> String {
    match source {
        VocabularySource::File(path) => path.display().to_string(),
        VocabularySource::Builtin => "built-in".to_string(),
        VocabularySource::Inline => "inline".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::processing::analyzer::AnalysisEngine;
    use crate::processing::similarity::FixedSimilarity;
    use std::sync::Arc;

    fn sample_report() -> AnalysisReport {
        let mut config = Config::default();
        config.matching.sentence_fallback = false;
        let vocabulary = Arc::new(Vocabulary::from_terms(&["python", "java", "django", "aws"]));
        let engine = AnalysisEngine::new(&config, Arc::clone(&vocabulary))
            .unwrap()
            .with_similarity(Box::new(FixedSimilarity::new(0.8).unwrap()));

        let alignment = engine
            .analyze(
                "Java backend engineer, AWS",
                "Python or Java developer needed, Django required, AWS preferred",
                QualitativeAnalysis::disabled("not configured"),
            )
            .unwrap();

        AnalysisReport::from_alignment(alignment, &vocabulary, "resume.txt", "job.txt")
    }

    #[test]
    fn test_report_lists_are_sorted() {
        let report = sample_report();

        assert_eq!(report.job_keywords, vec!["aws", "django", "java", "python"]);
        assert_eq!(report.resume_keywords, vec!["aws", "java"]);
        // every member of a satisfied group counts as matched
        assert_eq!(report.matched_keywords, vec!["aws", "java", "python"]);
        assert_eq!(report.missing_keywords, vec!["django"]);
        assert_eq!(report.alternative_groups, vec![vec!["java", "python"]]);
        assert_eq!(report.matched_groups, report.alternative_groups);
    }

    #[test]
    fn test_report_scores_and_metadata() {
        let report = sample_report();

        assert_eq!(report.keyword_score, 67);
        // 80 * 0.7 + 67 * 0.3 = 76.1
        assert_eq!(report.match_score, 76);
        assert_eq!(report.verdict, verdict(76));
        assert_eq!(report.metadata.vocabulary_size, 4);
        assert_eq!(report.metadata.vocabulary_source, "inline");
        assert_eq!(report.metadata.similarity_source, "external");
        assert_eq!(report.metadata.resume_file, "resume.txt");
    }

    #[test]
    fn test_verdict_bands() {
        assert!(verdict(100).starts_with("Excellent"));
        assert!(verdict(85).starts_with("Very good"));
        assert!(verdict(50).starts_with("Below average"));
        assert!(verdict(0).starts_with("Poor"));
    }
}
