//! Keyword match scoring with alternative groups counted as one requirement

use crate::processing::alternatives::AlternativeGroup;
use crate::processing::keyword_extractor::KeywordSet;
use serde::{Deserialize, Serialize};

/// Outcome of matching resume keywords against job keywords
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Literal overlaps plus every member of each satisfied group
    pub matched: KeywordSet,
    /// Job terms absent from the resume, minus members of satisfied groups
    pub missing: KeywordSet,
    pub matched_groups: Vec<AlternativeGroup>,
    /// Integer percentage; not clamped
    pub keyword_score: u32,
    pub breakdown: ScoreBreakdown,
}

/// The requirement arithmetic behind `keyword_score`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Job terms with every group collapsed into a single slot
    pub adjusted_total: i64,
    /// Literal overlaps outside any group
    pub regular_matches: usize,
    pub total_matched: usize,
}

/// Compare resume and job keyword sets under the given alternative groups.
pub fn score_match(
    resume_keywords: &KeywordSet,
    job_keywords: &KeywordSet,
    groups: &[AlternativeGroup],
) -> MatchResult {
    let literal: KeywordSet = resume_keywords
        .intersection(job_keywords)
        .cloned()
        .collect();

    let matched_groups: Vec<AlternativeGroup> = groups
        .iter()
        .filter(|group| group.intersects(resume_keywords) && group.intersects(job_keywords))
        .cloned()
        .collect();

    let mut matched = literal.clone();
    for group in &matched_groups {
        matched.extend(group.iter().map(str::to_string));
    }

    let missing: KeywordSet = job_keywords
        .difference(resume_keywords)
        .filter(|term| !matched_groups.iter().any(|group| group.contains(term)))
        .cloned()
        .collect();

    let grouped_terms: KeywordSet = groups
        .iter()
        .flat_map(|group| group.iter().map(str::to_string))
        .collect();

    let adjusted_total =
        job_keywords.len() as i64 - grouped_terms.len() as i64 + groups.len() as i64;
    let regular_matches = literal.difference(&grouped_terms).count();
    let total_matched = regular_matches + matched_groups.len();

    let keyword_score = if adjusted_total > 0 {
        (100.0 * total_matched as f64 / adjusted_total as f64).round() as u32
    } else {
        0
    };

    MatchResult {
        matched,
        missing,
        matched_groups,
        keyword_score,
        breakdown: ScoreBreakdown {
            adjusted_total,
            regular_matches,
            total_matched,
        },
    }
}
