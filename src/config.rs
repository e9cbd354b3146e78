//! Configuration management for the resume critic

use crate::error::{Result, ResumeCriticError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub vocabulary: VocabularyConfig,
    pub matching: MatchingConfig,
    pub scoring: ScoringConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyConfig {
    /// YAML list of technical terms; built-in terms are used when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Also group every known term of a sentence containing "or"
    pub sentence_fallback: bool,
}

/// Weights for blending the component scores into the final match score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub semantic_weight: f64,
    pub keyword_weight: f64,
    pub qualitative_weight: f64,
    /// Used when no qualitative analysis is available
    pub fallback_semantic_weight: f64,
    pub fallback_keyword_weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputConfig {
    pub max_upload_bytes: u64,
    pub enable_caching: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            semantic_weight: 0.5,
            keyword_weight: 0.3,
            qualitative_weight: 0.2,
            fallback_semantic_weight: 0.7,
            fallback_keyword_weight: 0.3,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            vocabulary: VocabularyConfig { path: None },
            matching: MatchingConfig {
                sentence_fallback: true,
            },
            scoring: ScoringConfig::default(),
            input: InputConfig {
                max_upload_bytes: 5 * 1024 * 1024,
                enable_caching: true,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from `path` (or the default location). A missing file is
    /// created with default values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = path.map(Path::to_path_buf).unwrap_or_else(Self::config_path);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeCriticError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-critic")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        let weights = &self.scoring;
        let all = [
            ("semantic_weight", weights.semantic_weight),
            ("keyword_weight", weights.keyword_weight),
            ("qualitative_weight", weights.qualitative_weight),
            ("fallback_semantic_weight", weights.fallback_semantic_weight),
            ("fallback_keyword_weight", weights.fallback_keyword_weight),
        ];

        for (name, value) in all {
            if !value.is_finite() || value < 0.0 {
                return Err(ResumeCriticError::Configuration(format!(
                    "scoring.{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if self.input.max_upload_bytes == 0 {
            return Err(ResumeCriticError::Configuration(
                "input.max_upload_bytes must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_weights() {
        let config = Config::default();

        assert_eq!(config.scoring.semantic_weight, 0.5);
        assert_eq!(config.scoring.fallback_semantic_weight, 0.7);
        assert_eq!(config.input.max_upload_bytes, 5 * 1024 * 1024);
        assert!(config.matching.sentence_fallback);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_creates_default_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load(Some(&path)).unwrap();

        assert!(path.exists());
        assert_eq!(config, Config::default());
        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }

    #[test]
    fn test_load_custom_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut custom = Config::default();
        custom.vocabulary.path = Some(PathBuf::from("/etc/terms.yaml"));
        custom.matching.sentence_fallback = false;
        custom.output.format = OutputFormat::Json;
        custom.save_to(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();

        assert_eq!(loaded, custom);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut bad = Config::default();
        bad.scoring.keyword_weight = -1.0;
        bad.save_to(&path).unwrap();

        assert!(matches!(
            Config::load(Some(&path)),
            Err(ResumeCriticError::Configuration(_))
        ));

        std::fs::write(&path, "not = [valid").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let mut custom = Config::default();
        custom.matching.sentence_fallback = false;
        custom.save_to(&path).unwrap();

        Config::default().save_to(&path).unwrap();

        assert_eq!(Config::load(Some(&path)).unwrap(), Config::default());
    }

    #[test]
    fn test_default_config_location() {
        let path = Config::config_path();
        assert!(path.ends_with("resume-critic/config.toml"));
    }
}
