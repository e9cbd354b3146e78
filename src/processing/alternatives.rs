//! Detection of alternative requirement groups ("Python or Java")

use crate::error::Result;
use crate::processing::keyword_extractor::KeywordSet;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// `A or B`, `A/B or C` and `A, B, or C`, where each side is a short
/// phrase of one or two words.
const OR_PATTERNS: &[&str] = &[
    r"\b(\w+(?:\s+\w+)?)\s+or\s+(\w+(?:\s+\w+)?)",
    r"\b(\w+(?:\s+\w+)?)\s*/\s*(\w+(?:\s+\w+)?)\s+or\s+(\w+(?:\s+\w+)?)",
    r"\b(\w+(?:\s+\w+)?)\s*,\s*(\w+(?:\s+\w+)?)\s*,\s*or\s+(\w+(?:\s+\w+)?)",
];

const SENTENCE_DELIMITERS: &str = r"[.!?;]";

/// Two or more interchangeable terms that satisfy one requirement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AlternativeGroup(BTreeSet<String>);

impl AlternativeGroup {
    /// Returns `None` unless at least two distinct terms are given
    pub fn new<I, S>(terms: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let terms: BTreeSet<String> = terms.into_iter().map(Into::into).collect();
        if terms.len() >= 2 {
            Some(Self(terms))
        } else {
            None
        }
    }

    pub fn terms(&self) -> &BTreeSet<String> {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.contains(term)
    }

    pub fn is_subset(&self, other: &AlternativeGroup) -> bool {
        self.0.is_subset(&other.0)
    }

    /// True if any member of the group is in `keywords`
    pub fn intersects(&self, keywords: &KeywordSet) -> bool {
        self.0.iter().any(|term| keywords.contains(term))
    }
}

impl std::fmt::Display for AlternativeGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let terms: Vec<&str> = self.iter().collect();
        write!(f, "{}", terms.join(" / "))
    }
}

/// Finds "or" constructions in a job description and resolves each side
/// to known keywords.
pub struct AlternativeGroupDetector {
    or_patterns: Vec<Regex>,
    sentence_splitter: Regex,
    sentence_fallback: bool,
}

impl AlternativeGroupDetector {
    pub fn new() -> Result<Self> {
        let or_patterns = OR_PATTERNS
            .iter()
            .map(|p| Regex::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            or_patterns,
            sentence_splitter: Regex::new(SENTENCE_DELIMITERS)?,
            sentence_fallback: true,
        })
    }

    /// Toggle the coarse sentence-level pass
    pub fn with_sentence_fallback(mut self, enabled: bool) -> Self {
        self.sentence_fallback = enabled;
        self
    }

    pub fn sentence_fallback(&self) -> bool {
        self.sentence_fallback
    }

    /// Detect alternative groups in `text`, referencing only `known` terms.
    ///
    /// Phrase-level groups come first, then sentence-level groups; the
    /// combined list is deduplicated by subsumption in encounter order.
    pub fn detect(&self, text: &str, known: &KeywordSet) -> Vec<AlternativeGroup> {
        let text_lower = text.to_lowercase();

        let mut candidates = self.phrase_groups(&text_lower, known);
        if self.sentence_fallback {
            candidates.extend(self.sentence_groups(&text_lower, known));
        }

        let groups = dedup_groups(candidates);
        debug!("Detected {} alternative groups", groups.len());
        groups
    }

    fn phrase_groups(&self, text_lower: &str, known: &KeywordSet) -> Vec<AlternativeGroup> {
        let mut groups = Vec::new();

        for pattern in &self.or_patterns {
            for captures in pattern.captures_iter(text_lower) {
                let resolved: BTreeSet<&str> = captures
                    .iter()
                    .skip(1)
                    .flatten()
                    .filter_map(|span| resolve_span(span.as_str(), known))
                    .collect();

                if let Some(group) = AlternativeGroup::new(resolved) {
                    groups.push(group);
                }
            }
        }

        groups
    }

    fn sentence_groups(&self, text_lower: &str, known: &KeywordSet) -> Vec<AlternativeGroup> {
        self.sentence_splitter
            .split(text_lower)
            .filter(|sentence| sentence.contains(" or ") || sentence.contains("/ or "))
            .filter(|sentence| sentence.split_whitespace().any(|word| word == "or"))
            .filter_map(|sentence| {
                AlternativeGroup::new(
                    known
                        .iter()
                        .filter(|term| sentence.contains(term.as_str()))
                        .map(String::as_str),
                )
            })
            .collect()
    }
}

/// Resolve a captured span to a known term: exact membership first, then
/// the first known term that contains or is contained by the span.
fn resolve_span<'a>(span: &str, known: &'a KeywordSet) -> Option<&'a str> {
    let clean = span.trim().to_lowercase();
    if clean.is_empty() {
        return None;
    }

    if let Some(term) = known.get(&clean) {
        return Some(term.as_str());
    }

    known
        .iter()
        .find(|term| clean.contains(term.as_str()) || term.contains(clean.as_str()))
        .map(String::as_str)
}

/// Deduplicate groups by subsumption, keeping encounter order.
///
/// A group contained in an already-kept group is dropped; kept groups
/// contained in a new group are replaced by it.
pub fn dedup_groups(groups: Vec<AlternativeGroup>) -> Vec<AlternativeGroup> {
    let mut kept: Vec<AlternativeGroup> = Vec::with_capacity(groups.len());

    for group in groups {
        if kept.iter().any(|existing| group.is_subset(existing)) {
            continue;
        }
        kept.retain(|existing| !existing.is_subset(&group));
        kept.push(group);
    }

    kept
}
