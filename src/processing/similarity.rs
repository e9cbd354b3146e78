//! Semantic-similarity collaborators

use crate::error::{Result, ResumeCriticError};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Scores how similar two texts are, in `[0, 1]`
pub trait SimilarityScorer: Send + Sync {
    fn similarity(&self, text1: &str, text2: &str) -> Result<f32>;

    fn name(&self) -> &str;
}

/// Similarity supplied by an external embedding service
#[derive(Debug, Clone, Copy)]
pub struct FixedSimilarity(f32);

impl FixedSimilarity {
    pub fn new(score: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&score) {
            return Err(ResumeCriticError::InvalidInput(format!(
                "Semantic similarity must be within [0, 1], got {}",
                score
            )));
        }
        Ok(Self(score))
    }
}

impl SimilarityScorer for FixedSimilarity {
    fn similarity(&self, text1: &str, text2: &str) -> Result<f32> {
        if text1.trim().is_empty() || text2.trim().is_empty() {
            return Ok(0.0);
        }
        Ok(self.0)
    }

    fn name(&self) -> &str {
        "external"
    }
}

/// Local stand-in for an embedding model: Jaccard similarity over
/// unicode word tokens with stop words removed.
pub struct TokenOverlapScorer {
    stop_words: HashSet<&'static str>,
}

impl Default for TokenOverlapScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenOverlapScorer {
    pub fn new() -> Self {
        Self {
            stop_words: STOP_WORDS.iter().copied().collect(),
        }
    }

    /// Lowercased word tokens, skipping stop words, single characters and
    /// purely numeric tokens
    pub fn tokenize(&self, text: &str) -> HashSet<String> {
        text.unicode_words()
            .map(str::to_lowercase)
            .filter(|token| token.chars().count() > 1)
            .filter(|token| !self.stop_words.contains(token.as_str()))
            .filter(|token| token.chars().any(char::is_alphabetic))
            .collect()
    }
}

impl SimilarityScorer for TokenOverlapScorer {
    fn similarity(&self, text1: &str, text2: &str) -> Result<f32> {
        let set1 = self.tokenize(text1);
        let set2 = self.tokenize(text2);

        let union = set1.union(&set2).count();
        if union == 0 {
            return Ok(0.0);
        }

        let intersection = set1.intersection(&set2).count();
        Ok(intersection as f32 / union as f32)
    }

    fn name(&self) -> &str {
        "token-overlap"
    }
}

const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from",
    "has", "he", "in", "is", "it", "its", "of", "on", "that", "the",
    "to", "was", "will", "with", "this", "but", "they", "have", "had",
    "what", "which", "she", "do", "how", "their", "if", "up", "out",
    "so", "some", "her", "would", "into", "him", "more", "no", "could",
    "my", "than", "been", "who", "now", "did", "get", "may", "over",
    "only", "me", "our", "just", "very", "after", "also", "any", "same",
    "we", "you", "your", "or", "all", "must", "should", "can", "years",
    "year", "experience", "work", "team", "strong", "including",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_similarity_bounds() {
        assert!(FixedSimilarity::new(0.42).is_ok());
        assert!(FixedSimilarity::new(1.5).is_err());
        assert!(FixedSimilarity::new(-0.1).is_err());
    }

    #[test]
    fn test_fixed_similarity_blank_text() {
        let scorer = FixedSimilarity::new(0.8).unwrap();

        assert_eq!(scorer.similarity("resume", "job").unwrap(), 0.8);
        assert_eq!(scorer.similarity("   ", "job").unwrap(), 0.0);
    }

    #[test]
    fn test_tokenization_filters_stop_words() {
        let scorer = TokenOverlapScorer::new();
        let tokens = scorer.tokenize("The Rust programmer is writing Rust with 5 years of experience");

        assert!(tokens.contains("rust"));
        assert!(tokens.contains("programmer"));
        assert!(tokens.contains("writing"));
        assert!(!tokens.contains("the"));
        assert!(!tokens.contains("5"));
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_token_overlap_similarity() {
        let scorer = TokenOverlapScorer::new();

        let same = scorer.similarity("Python Django developer", "python django developer").unwrap();
        assert!((same - 1.0).abs() < f32::EPSILON);

        let partial = scorer.similarity("Python Django developer", "Python Flask developer").unwrap();
        assert!(partial > 0.0 && partial < 1.0);

        assert_eq!(scorer.similarity("", "").unwrap(), 0.0);
        assert_eq!(scorer.similarity("Python", "Cooking").unwrap(), 0.0);
    }
}
