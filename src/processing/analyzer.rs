//! Analysis engine combining keyword matching, semantic similarity and the
//! optional qualitative analysis

use crate::config::{Config, ScoringConfig};
use crate::error::Result;
use crate::llm::analysis::QualitativeAnalysis;
use crate::processing::alternatives::{AlternativeGroup, AlternativeGroupDetector};
use crate::processing::keyword_extractor::{KeywordExtractor, KeywordSet};
use crate::processing::match_scorer::{score_match, MatchResult};
use crate::processing::similarity::{SimilarityScorer, TokenOverlapScorer};
use crate::processing::vocabulary::Vocabulary;
use log::info;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

/// Main analysis engine; one instance serves any number of requests
pub struct AnalysisEngine {
    vocabulary: Arc<Vocabulary>,
    extractor: KeywordExtractor,
    detector: AlternativeGroupDetector,
    similarity: Box<dyn SimilarityScorer>,
    scoring: ScoringConfig,
}

/// Keyword-level view of one resume/job comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    pub resume_keywords: KeywordSet,
    pub job_keywords: KeywordSet,
    pub alternative_groups: Vec<AlternativeGroup>,
    pub result: MatchResult,
}

/// Weights actually applied to produce the match score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub semantic: f64,
    pub keyword: f64,
    pub qualitative: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentReport {
    /// Blended final percentage
    pub match_score: u32,
    /// Semantic similarity as a percentage, one decimal place
    pub semantic_score: f64,
    pub keyword_score: u32,
    pub weights: ComponentWeights,
    pub keyword_analysis: KeywordAnalysis,
    pub qualitative_analysis: QualitativeAnalysis,
    pub similarity_source: String,
    pub processing_time_ms: u64,
}

impl AnalysisEngine {
    /// Create an engine using the local token-overlap similarity
    pub fn new(config: &Config, vocabulary: Arc<Vocabulary>) -> Result<Self> {
        let extractor = KeywordExtractor::new(Arc::clone(&vocabulary))?;
        let detector = AlternativeGroupDetector::new()?
            .with_sentence_fallback(config.matching.sentence_fallback);

        Ok(Self {
            vocabulary,
            extractor,
            detector,
            similarity: Box::new(TokenOverlapScorer::new()),
            scoring: config.scoring.clone(),
        })
    }

    /// Replace the semantic-similarity collaborator
    pub fn with_similarity(mut self, similarity: Box<dyn SimilarityScorer>) -> Self {
        self.similarity = similarity;
        self
    }

    /// Extract keywords from both texts, detect alternative groups in the
    /// job text and score the match.
    pub fn analyze_keywords(&self, resume_text: &str, job_text: &str) -> KeywordAnalysis {
        let resume_keywords = self.extractor.extract(resume_text);
        let job_keywords = self.extractor.extract(job_text);
        let alternative_groups = self.detector.detect(job_text, &job_keywords);

        let result = score_match(&resume_keywords, &job_keywords, &alternative_groups);

        info!(
            "Keyword score {}% ({} job terms, {} groups, {} missing)",
            result.keyword_score,
            job_keywords.len(),
            alternative_groups.len(),
            result.missing.len()
        );

        KeywordAnalysis {
            resume_keywords,
            job_keywords,
            alternative_groups,
            result,
        }
    }

    /// Full analysis: keyword score, semantic similarity and blending with
    /// the qualitative analysis when it is enabled.
    pub fn analyze(
        &self,
        resume_text: &str,
        job_text: &str,
        qualitative_analysis: QualitativeAnalysis,
    ) -> Result<AlignmentReport> {
        let start_time = Instant::now();

        let keyword_analysis = self.analyze_keywords(resume_text, job_text);
        let keyword_score = keyword_analysis.result.keyword_score;

        let similarity = self.similarity.similarity(resume_text, job_text)?;
        let semantic_score = f64::from(similarity) * 100.0;

        let (match_score, weights) = blend_scores(
            &self.scoring,
            semantic_score,
            keyword_score,
            qualitative_analysis.overall_score(),
        );

        info!(
            "Match score {}% (semantic {:.1}%, keywords {}%, qualitative {})",
            match_score,
            semantic_score,
            keyword_score,
            qualitative_analysis
                .overall_score()
                .map_or_else(|| "disabled".to_string(), |s| format!("{:.1}%", s))
        );

        Ok(AlignmentReport {
            match_score,
            semantic_score: (semantic_score * 10.0).round() / 10.0,
            keyword_score,
            weights,
            keyword_analysis,
            qualitative_analysis,
            similarity_source: self.similarity.name().to_string(),
            processing_time_ms: start_time.elapsed().as_millis() as u64,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn sentence_fallback(&self) -> bool {
        self.detector.sentence_fallback()
    }
}

/// Weighted average of the component percentages, truncated to an integer.
///
/// Uses the three-way weights when a qualitative score is available and the
/// two-way fallback weights otherwise.
pub fn blend_scores(
    weights: &ScoringConfig,
    semantic_score: f64,
    keyword_score: u32,
    qualitative_score: Option<f32>,
) -> (u32, ComponentWeights) {
    let keyword_score = f64::from(keyword_score);

    let (blended, applied) = match qualitative_score {
        Some(qualitative) => (
            semantic_score * weights.semantic_weight
                + keyword_score * weights.keyword_weight
                + f64::from(qualitative) * weights.qualitative_weight,
            ComponentWeights {
                semantic: weights.semantic_weight,
                keyword: weights.keyword_weight,
                qualitative: Some(weights.qualitative_weight),
            },
        ),
        None => (
            semantic_score * weights.fallback_semantic_weight
                + keyword_score * weights.fallback_keyword_weight,
            ComponentWeights {
                semantic: weights.fallback_semantic_weight,
                keyword: weights.fallback_keyword_weight,
                qualitative: None,
            },
        ),
    };

    // 1e-9 absorbs representation error such as 0.3 * 90 = 26.999...
    ((blended + 1e-9).max(0.0).floor() as u32, applied)
}
