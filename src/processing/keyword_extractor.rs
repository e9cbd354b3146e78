//! Vocabulary-driven keyword extraction

use crate::error::Result;
use crate::processing::vocabulary::Vocabulary;
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Terms present in one text. Presence is boolean; no counts are kept.
pub type KeywordSet = BTreeSet<String>;

/// Surface forms whose canonical term differs from naive matching.
/// Each canonical term is emitted whether or not it is in the vocabulary.
const SPECIAL_PATTERNS: &[(&str, &str)] = &[
    (r"(?:^|[^\w+])c\+\+(?:[^\w+]|$)", "c++"),
    (r"(?:^|[^\w#])c#(?:[^\w#]|$)", "c#"),
    (r"\.net\b", ".net"),
    (r"\bnode\.?js\b", "nodejs"),
];

/// Bare uppercase tokens that may be acronyms of vocabulary terms
const ACRONYM_PATTERN: &str = r"\b[A-Z]{2,5}\b";

struct TermRule {
    term: String,
    pattern: Regex,
}

/// Extracts vocabulary terms from free text.
///
/// All match rules are compiled once from the vocabulary, so a single
/// extractor can be reused for every request.
pub struct KeywordExtractor {
    vocabulary: Arc<Vocabulary>,
    term_rules: Vec<TermRule>,
    special_rules: Vec<TermRule>,
    acronym_regex: Regex,
}

impl KeywordExtractor {
    pub fn new(vocabulary: Arc<Vocabulary>) -> Result<Self> {
        let term_rules = vocabulary
            .iter()
            .map(|term| {
                Ok(TermRule {
                    term: term.to_string(),
                    pattern: Regex::new(&Self::term_pattern(term))?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let special_rules = SPECIAL_PATTERNS
            .iter()
            .map(|(pattern, term)| {
                Ok(TermRule {
                    term: term.to_string(),
                    pattern: Regex::new(pattern)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            vocabulary,
            term_rules,
            special_rules,
            acronym_regex: Regex::new(ACRONYM_PATTERN)?,
        })
    }

    /// Extract every recognised term present in `text`.
    /// Blank text yields an empty set.
    pub fn extract(&self, text: &str) -> KeywordSet {
        let mut keywords = KeywordSet::new();
        if text.trim().is_empty() {
            return keywords;
        }

        let text_lower = text.to_lowercase();

        for rule in self.term_rules.iter().chain(&self.special_rules) {
            if rule.pattern.is_match(&text_lower) {
                keywords.insert(rule.term.clone());
            }
        }

        // Acronyms only confirm membership, they never add new vocabulary
        for acronym in self.acronym_regex.find_iter(text) {
            let acronym_lower = acronym.as_str().to_lowercase();
            if self.vocabulary.contains(&acronym_lower) {
                keywords.insert(acronym_lower);
            }
        }

        keywords
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Build the presence pattern for one term.
    ///
    /// Phrases (space or hyphen separated) accept any run of spaces or
    /// hyphens between their words and match anywhere. Single words are
    /// bounded on each side; a side that ends in a non-word character
    /// (`c++`, `.net`) uses a non-word-or-edge guard instead of `\b`.
    fn term_pattern(term: &str) -> String {
        if term.contains(' ') || term.contains('-') {
            let words: Vec<String> = term
                .split(|c| c == ' ' || c == '-')
                .filter(|w| !w.is_empty())
                .map(regex::escape)
                .collect();
            return words.join(r"[\s\-]+");
        }

        let starts_with_word = term.chars().next().map_or(false, is_word_char);
        let ends_with_word = term.chars().last().map_or(false, is_word_char);

        let prefix = if starts_with_word { r"\b" } else { r"(?:^|\W)" };
        let suffix = if ends_with_word { r"\b" } else { r"(?:\W|$)" };

        format!("{}{}{}", prefix, regex::escape(term), suffix)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(terms: &[&str]) -> KeywordExtractor {
        KeywordExtractor::new(Arc::new(Vocabulary::from_terms(terms))).unwrap()
    }

    fn set(terms: &[&str]) -> KeywordSet {
        terms.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_blank_text_is_empty() {
        let extractor = extractor(&["python", "aws"]);

        assert!(extractor.extract("").is_empty());
        assert!(extractor.extract("   \n\t ").is_empty());
    }

    #[test]
    fn test_single_word_terms() {
        let extractor = extractor(&["python", "django", "aws", "java"]);
        let keywords = extractor.extract("5 years Python, Django experience");

        assert_eq!(keywords, set(&["django", "python"]));
    }

    #[test]
    fn test_word_boundary() {
        let extractor = extractor(&["go", "java"]);

        assert!(extractor.extract("We are going places").is_empty());
        assert!(extractor.extract("JavaScript only").is_empty());
        assert_eq!(extractor.extract("Written in Go."), set(&["go"]));
    }

    #[test]
    fn test_phrases_accept_spaces_or_hyphens() {
        let extractor = extractor(&["machine learning", "ci-cd", "full stack"]);

        assert_eq!(
            extractor.extract("Machine-Learning pipelines and CI CD"),
            set(&["ci-cd", "machine learning"])
        );
        assert_eq!(extractor.extract("full  stack engineer"), set(&["full stack"]));
    }

    #[test]
    fn test_special_patterns() {
        // canonical forms are emitted even when absent from the vocabulary
        let extractor = extractor(&["python"]);
        let keywords = extractor.extract("C++ and C# on .NET, plus Node.js services");

        assert!(keywords.contains("c++"));
        assert!(keywords.contains("c#"));
        assert!(keywords.contains(".net"));
        assert!(keywords.contains("nodejs"));
        assert!(!keywords.contains("python"));
    }

    #[test]
    fn test_symbol_terms_in_vocabulary() {
        let extractor = extractor(&["c++", "c"]);

        assert!(extractor.extract("Modern C++ (C++17)").contains("c++"));
        assert_eq!(extractor.extract("Embedded C firmware"), set(&["c"]));
        // "c" is also word-bounded inside "c++" and "c#"
        assert_eq!(
            extractor.extract("Embedded C++ firmware and C#"),
            set(&["c", "c#", "c++"])
        );
    }

    #[test]
    fn test_acronyms_confirm_membership_only() {
        let extractor = extractor(&["aws", "gcp"]);
        let keywords = extractor.extract("Deploys on AWS and GCP, not on IBM");

        assert_eq!(keywords, set(&["aws", "gcp"]));
        assert!(!keywords.contains("ibm"));
    }

    #[test]
    fn test_multiple_occurrences_count_once() {
        let extractor = extractor(&["rust"]);
        let keywords = extractor.extract("Rust, rust and more RUST");

        assert_eq!(keywords.len(), 1);
    }

    #[test]
    fn test_every_isolated_term_is_found() {
        let terms = ["python", "java", "aws", "docker", "kubernetes", "sql"];
        let extractor = extractor(&terms);

        for term in terms {
            let text = format!("Experience: {} (required).", term.to_uppercase());
            assert!(extractor.extract(&text).contains(term), "missed {}", term);
        }
    }
}
