//! Term vocabulary: the configured universe of recognised technical terms

use crate::error::{Result, ResumeCriticError};
use log::{info, warn};
use serde_yaml::Value;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Terms used when no external vocabulary source is available
pub const FALLBACK_TERMS: &[&str] = &[
    "python", "java", "javascript", "typescript", "c++", "c#", "sql",
    "react", "django", "flask", "fastapi", "aws", "docker", "kubernetes",
];

/// Where a vocabulary's terms came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VocabularySource {
    File(PathBuf),
    Builtin,
    Inline,
}

/// Immutable set of normalised (trimmed, lowercase) terms.
///
/// Built once at startup and shared by reference with the extractor and
/// the alternative-group detector; never mutated after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vocabulary {
    terms: BTreeSet<String>,
    source: VocabularySource,
}

impl Vocabulary {
    /// Build a vocabulary from arbitrary strings, normalising each one.
    /// Entries that are empty after trimming are skipped.
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms = terms
            .into_iter()
            .filter_map(|t| Self::normalize_term(t.as_ref()))
            .collect();

        Self {
            terms,
            source: VocabularySource::Inline,
        }
    }

    /// The small built-in vocabulary
    pub fn builtin() -> Self {
        let mut vocabulary = Self::from_terms(FALLBACK_TERMS.iter());
        vocabulary.source = VocabularySource::Builtin;
        vocabulary
    }

    /// Load the vocabulary without ever failing.
    ///
    /// A missing, unreadable or malformed source logs a warning and yields
    /// the built-in terms.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            warn!(
                "No vocabulary source configured; using {} built-in terms",
                FALLBACK_TERMS.len()
            );
            return Self::builtin();
        };

        if !path.exists() {
            warn!(
                "Vocabulary file {} not found; using {} built-in terms",
                path.display(),
                FALLBACK_TERMS.len()
            );
            return Self::builtin();
        }

        match Self::try_load_from_path(path) {
            Ok(vocabulary) => {
                info!(
                    "Loaded {} technical terms from {}",
                    vocabulary.len(),
                    path.display()
                );
                vocabulary
            }
            Err(e) => {
                warn!(
                    "Failed to load vocabulary from {}: {}; using {} built-in terms",
                    path.display(),
                    e,
                    FALLBACK_TERMS.len()
                );
                Self::builtin()
            }
        }
    }

    /// Strict loader used by [`Vocabulary::load`]
    pub fn try_load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let terms = Self::parse_terms(&content)?;

        Ok(Self {
            terms,
            source: VocabularySource::File(path.to_path_buf()),
        })
    }

    /// Parse a YAML document whose top level must be a sequence of strings.
    pub fn parse_terms(content: &str) -> Result<BTreeSet<String>> {
        let document: Value = serde_yaml::from_str(content)?;

        let Value::Sequence(entries) = document else {
            return Err(ResumeCriticError::Vocabulary(
                "vocabulary content is not a list".to_string(),
            ));
        };

        let terms: BTreeSet<String> = entries
            .iter()
            .filter_map(|entry| match entry {
                Value::String(s) => Self::normalize_term(s),
                _ => None,
            })
            .collect();

        if terms.is_empty() {
            return Err(ResumeCriticError::Vocabulary(
                "vocabulary list contains no usable terms".to_string(),
            ));
        }

        Ok(terms)
    }

    /// Trim and lowercase a raw entry; `None` if nothing is left
    pub fn normalize_term(raw: &str) -> Option<String> {
        let term = raw.trim().to_lowercase();
        if term.is_empty() {
            None
        } else {
            Some(term)
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Terms in lexical order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    pub fn source(&self) -> &VocabularySource {
        &self.source
    }
}

/// Lazily loaded vocabulary with guarded-once initialisation.
///
/// Concurrent first calls read the source exactly once.
#[derive(Debug)]
pub struct SharedVocabulary {
    path: Option<PathBuf>,
    cell: OnceLock<Vocabulary>,
}

impl SharedVocabulary {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            cell: OnceLock::new(),
        }
    }

    pub fn get(&self) -> &Vocabulary {
        self.cell.get_or_init(|| Vocabulary::load(self.path.as_deref()))
    }

    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_vocab(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_from_terms_normalizes() {
        let vocab = Vocabulary::from_terms(["  Python ", "AWS", "", "   ", "machine learning"]);

        assert_eq!(vocab.len(), 3);
        assert!(vocab.contains("python"));
        assert!(vocab.contains("aws"));
        assert!(vocab.contains("machine learning"));
        assert_eq!(vocab.source(), &VocabularySource::Inline);
    }

    #[test]
    fn test_builtin_fallback_terms() {
        let vocab = Vocabulary::builtin();

        assert_eq!(vocab.len(), FALLBACK_TERMS.len());
        assert!(vocab.contains("c++"));
        assert!(vocab.contains("kubernetes"));
        assert_eq!(vocab.source(), &VocabularySource::Builtin);
    }

    #[test]
    fn test_load_yaml_list() {
        let file = write_vocab("- Rust\n- Tokio\n- 42\n- true\n- ''\n- Machine Learning\n");
        let vocab = Vocabulary::load(Some(file.path()));

        assert_eq!(vocab.len(), 3);
        assert!(vocab.contains("rust"));
        assert!(vocab.contains("tokio"));
        assert!(vocab.contains("machine learning"));
        assert!(!vocab.contains("42"));
        assert_eq!(vocab.source(), &VocabularySource::File(file.path().to_path_buf()));
    }

    #[test]
    fn test_non_list_source_falls_back() {
        let file = write_vocab("languages:\n  - rust\n");
        let vocab = Vocabulary::load(Some(file.path()));

        assert_eq!(vocab.source(), &VocabularySource::Builtin);
        assert!(vocab.contains("python"));
    }

    #[test]
    fn test_invalid_yaml_falls_back() {
        let file = write_vocab("- [unterminated\n");
        let vocab = Vocabulary::load(Some(file.path()));

        assert_eq!(vocab.source(), &VocabularySource::Builtin);
    }

    #[test]
    fn test_missing_source_falls_back() {
        let vocab = Vocabulary::load(Some(Path::new("does/not/exist.yaml")));
        assert_eq!(vocab.source(), &VocabularySource::Builtin);

        let vocab = Vocabulary::load(None);
        assert_eq!(vocab.source(), &VocabularySource::Builtin);
    }

    #[test]
    fn test_strict_loader_reports_errors() {
        let file = write_vocab("just a string");
        assert!(Vocabulary::try_load_from_path(file.path()).is_err());
    }

    #[test]
    fn test_shared_vocabulary_loads_once() {
        let file = write_vocab("- go\n- rust\n");
        let shared = SharedVocabulary::new(Some(file.path().to_path_buf()));
        assert!(!shared.is_loaded());

        let first = shared.get() as *const Vocabulary;
        let second = shared.get() as *const Vocabulary;

        assert!(shared.is_loaded());
        assert_eq!(first, second);
        assert!(shared.get().contains("go"));
    }
}
