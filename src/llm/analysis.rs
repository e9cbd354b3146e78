//! Results of the external qualitative (LLM) resume analysis

use crate::error::{Result, ResumeCriticError};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Dimension names reported by the analysis service
pub const DIMENSIONS: &[&str] = &[
    "technical_skills",
    "experience_level",
    "education",
    "domain_knowledge",
    "overall_fit",
];

/// Hiring recommendation category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    StrongMatch,
    GoodMatch,
    PartialMatch,
    WeakMatch,
}

impl Recommendation {
    /// Parse labels like `STRONG_MATCH`, `strong match` or `Strong-Match`
    pub fn parse(label: &str) -> Option<Self> {
        let normalized = label.trim().to_uppercase().replace(&[' ', '-'][..], "_");
        match normalized.as_str() {
            "STRONG_MATCH" => Some(Self::StrongMatch),
            "GOOD_MATCH" => Some(Self::GoodMatch),
            "PARTIAL_MATCH" => Some(Self::PartialMatch),
            "WEAK_MATCH" => Some(Self::WeakMatch),
            _ => None,
        }
    }

    /// Category implied by an overall score when the service gives none
    pub fn from_score(score: f32) -> Self {
        match score {
            s if s >= 80.0 => Self::StrongMatch,
            s if s >= 65.0 => Self::GoodMatch,
            s if s >= 45.0 => Self::PartialMatch,
            _ => Self::WeakMatch,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongMatch => "Strong match",
            Self::GoodMatch => "Good match",
            Self::PartialMatch => "Partial match",
            Self::WeakMatch => "Weak match",
        }
    }
}

/// Scored assessment returned when the analysis service is available
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualitativeAssessment {
    /// 0-100
    pub overall_score: f32,
    pub dimension_scores: BTreeMap<String, f32>,
    pub strengths: Vec<String>,
    pub gaps: Vec<String>,
    pub recommendation: Recommendation,
    pub summary: String,
}

/// Qualitative analysis outcome: either disabled with a reason, or a full
/// assessment. Serialises as `{"enabled": false, "reason": ...}` or
/// `{"enabled": true, "overall_score": ..., ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AnalysisWire", into = "AnalysisWire")]
pub enum QualitativeAnalysis {
    Disabled { reason: String },
    Enabled(QualitativeAssessment),
}

impl QualitativeAnalysis {
    pub fn disabled(reason: impl Into<String>) -> Self {
        Self::Disabled {
            reason: reason.into(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }

    /// Overall score when the analysis is enabled
    pub fn overall_score(&self) -> Option<f32> {
        match self {
            Self::Enabled(assessment) => Some(assessment.overall_score),
            Self::Disabled { .. } => None,
        }
    }

    pub fn assessment(&self) -> Option<&QualitativeAssessment> {
        match self {
            Self::Enabled(assessment) => Some(assessment),
            Self::Disabled { .. } => None,
        }
    }

    /// Interpret a raw service response. Never fails: anything that cannot
    /// be understood becomes `Disabled` with the reason.
    pub fn from_service_json(raw: &str) -> Self {
        match Self::parse_service_json(raw) {
            Ok(assessment) => {
                debug!(
                    "Qualitative analysis parsed with overall score {:.1}",
                    assessment.overall_score
                );
                Self::Enabled(assessment)
            }
            Err(e) => {
                warn!("Qualitative analysis unavailable: {}", e);
                Self::disabled(e.to_string())
            }
        }
    }

    /// Load a raw service response saved to disk. An unreadable file
    /// disables the analysis like any other unusable response.
    pub async fn from_file(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(raw) => Self::from_service_json(&raw),
            Err(e) => {
                warn!("Cannot read qualitative analysis {}: {}", path.display(), e);
                Self::disabled(format!("cannot read {}: {}", path.display(), e))
            }
        }
    }

    fn parse_service_json(raw: &str) -> Result<QualitativeAssessment> {
        let body = strip_code_fences(raw);
        if body.is_empty() {
            return Err(ResumeCriticError::QualitativeAnalysis(
                "empty response".to_string(),
            ));
        }

        let response: ServiceResponse = serde_json::from_str(body)?;

        let mut dimension_scores = BTreeMap::new();
        for (name, score) in DIMENSIONS.iter().zip(response.dimension_values()) {
            if let Some(score) = score {
                dimension_scores.insert(name.to_string(), clamp_score(score));
            }
        }

        let overall_score = match response.overall_score {
            Some(score) => clamp_score(score),
            None if !dimension_scores.is_empty() => {
                dimension_scores.values().sum::<f32>() / dimension_scores.len() as f32
            }
            None => {
                return Err(ResumeCriticError::QualitativeAnalysis(
                    "response contained no scores".to_string(),
                ))
            }
        };

        let recommendation = response
            .recommendation
            .as_deref()
            .and_then(Recommendation::parse)
            .unwrap_or_else(|| Recommendation::from_score(overall_score));

        Ok(QualitativeAssessment {
            overall_score,
            dimension_scores,
            strengths: response.strengths,
            gaps: response.gaps,
            recommendation,
            summary: response.summary.unwrap_or_default(),
        })
    }
}

/// Flat JSON object the analysis service is prompted to return
#[derive(Debug, Deserialize)]
struct ServiceResponse {
    technical_skills: Option<f32>,
    experience_level: Option<f32>,
    education: Option<f32>,
    domain_knowledge: Option<f32>,
    overall_fit: Option<f32>,
    overall_score: Option<f32>,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    gaps: Vec<String>,
    recommendation: Option<String>,
    summary: Option<String>,
}

impl ServiceResponse {
    /// Values in `DIMENSIONS` order
    fn dimension_values(&self) -> [Option<f32>; 5] {
        [
            self.technical_skills,
            self.experience_level,
            self.education,
            self.domain_knowledge,
            self.overall_fit,
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnalysisWire {
    enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    overall_score: Option<f32>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    dimension_scores: BTreeMap<String, f32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    strengths: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    gaps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    recommendation: Option<Recommendation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    summary: Option<String>,
}

impl TryFrom<AnalysisWire> for QualitativeAnalysis {
    type Error = String;

    fn try_from(wire: AnalysisWire) -> std::result::Result<Self, Self::Error> {
        if !wire.enabled {
            return Ok(Self::Disabled {
                reason: wire.reason.unwrap_or_default(),
            });
        }

        let overall_score = wire
            .overall_score
            .ok_or_else(|| "enabled analysis is missing overall_score".to_string())?;

        Ok(Self::Enabled(QualitativeAssessment {
            overall_score,
            dimension_scores: wire.dimension_scores,
            strengths: wire.strengths,
            gaps: wire.gaps,
            recommendation: wire
                .recommendation
                .unwrap_or_else(|| Recommendation::from_score(overall_score)),
            summary: wire.summary.unwrap_or_default(),
        }))
    }
}

impl From<QualitativeAnalysis> for AnalysisWire {
    fn from(analysis: QualitativeAnalysis) -> Self {
        match analysis {
            QualitativeAnalysis::Disabled { reason } => Self {
                enabled: false,
                reason: Some(reason),
                overall_score: None,
                dimension_scores: BTreeMap::new(),
                strengths: Vec::new(),
                gaps: Vec::new(),
                recommendation: None,
                summary: None,
            },
            QualitativeAnalysis::Enabled(assessment) => Self {
                enabled: true,
                reason: None,
                overall_score: Some(assessment.overall_score),
                dimension_scores: assessment.dimension_scores,
                strengths: assessment.strengths,
                gaps: assessment.gaps,
                recommendation: Some(assessment.recommendation),
                summary: Some(assessment.summary),
            },
        }
    }
}

/// Remove a surrounding Markdown code fence (```json ... ```)
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn clamp_score(score: f32) -> f32 {
    score.clamp(0.0, 100.0)
}
