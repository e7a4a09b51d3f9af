use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Direction in which raw answer values read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// Higher answers mean more distress; the reported score is inverted.
    Concern,
    /// Higher answers mean better outcomes; the reported score is direct.
    Wellbeing,
}

/// One logical wellness category and the question-id prefixes that feed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub key: String,
    pub display_name: String,
    pub polarity: Polarity,
    pub prefixes: Vec<String>,
    /// Largest value in the category's option set.
    pub max_scale: u8,
}

impl CategoryRule {
    pub fn new(
        key: &str,
        display_name: &str,
        polarity: Polarity,
        prefixes: &[&str],
        max_scale: u8,
    ) -> Self {
        Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            polarity,
            prefixes: prefixes.iter().map(|prefix| prefix.to_string()).collect(),
            max_scale,
        }
    }

    pub fn matches(&self, question_id: &str) -> bool {
        self.prefixes
            .iter()
            .any(|prefix| question_id.starts_with(prefix.as_str()))
    }

    /// Stable lookup key used in results payloads, e.g. `Depression_Category`.
    pub fn result_key(&self) -> String {
        let mut chars = self.key.chars();
        match chars.next() {
            Some(first) => format!("{}{}_Category", first.to_uppercase(), chars.as_str()),
            None => "_Category".to_string(),
        }
    }
}

/// Uniform jitter window applied to a score to simulate a population percentile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentileJitter {
    pub below: u8,
    pub above: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PercentileBounds {
    pub min: u8,
    pub max: u8,
}

/// Every tunable of the scoring engine. Missing fields in a JSON override fall back to the
/// standard table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub categories: Vec<CategoryRule>,
    pub confidence: u8,
    pub neutral_score: u8,
    pub percentile_jitter: PercentileJitter,
    pub percentile_bounds: PercentileBounds,
    pub recommendation_limit: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScoringConfig {
    /// PHQ, GAD and DASS items are scored 0-3 on the concern scale; WHO-5 and sleep items
    /// feed wellbeing on a 0-5 scale.
    pub fn standard() -> Self {
        Self {
            categories: vec![
                CategoryRule::new("depression", "Mood & Energy", Polarity::Concern, &["phq_"], 3),
                CategoryRule::new("anxiety", "Anxiety Level", Polarity::Concern, &["gad_"], 3),
                CategoryRule::new(
                    "stress",
                    "Stress Management",
                    Polarity::Concern,
                    &["dass_"],
                    3,
                ),
                CategoryRule::new(
                    "wellbeing",
                    "Overall Wellbeing",
                    Polarity::Wellbeing,
                    &["who_", "sleep_"],
                    5,
                ),
            ],
            confidence: 85,
            neutral_score: 75,
            percentile_jitter: PercentileJitter {
                below: 10,
                above: 9,
            },
            percentile_bounds: PercentileBounds { min: 5, max: 95 },
            recommendation_limit: 3,
        }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ConfigurationError> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigurationError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Rejects tables the engine cannot score against. An empty category list is allowed and
    /// yields an empty result set with an overall score of zero.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut result_keys: HashSet<String> = HashSet::new();
        let mut prefixes: HashMap<&str, &str> = HashMap::new();

        for rule in &self.categories {
            if rule.key.trim().is_empty() {
                return Err(ConfigurationError::BlankCategoryKey);
            }
            let result_key = rule.result_key();
            if !result_keys.insert(result_key.clone()) {
                return Err(ConfigurationError::DuplicateCategory(result_key));
            }
            if rule.max_scale == 0 {
                return Err(ConfigurationError::InvalidMaxScale {
                    category: rule.key.clone(),
                });
            }
            if rule.prefixes.is_empty() || rule.prefixes.iter().any(|p| p.is_empty()) {
                return Err(ConfigurationError::MissingPrefixes {
                    category: rule.key.clone(),
                });
            }
            for prefix in &rule.prefixes {
                if let Some(first) = prefixes.insert(prefix.as_str(), rule.key.as_str()) {
                    return Err(ConfigurationError::DuplicatePrefix {
                        prefix: prefix.clone(),
                        first: first.to_string(),
                        second: rule.key.clone(),
                    });
                }
            }
        }

        if self.confidence > 100 {
            return Err(ConfigurationError::OutOfRange {
                field: "confidence",
                value: self.confidence,
            });
        }
        if self.neutral_score > 100 {
            return Err(ConfigurationError::OutOfRange {
                field: "neutral_score",
                value: self.neutral_score,
            });
        }

        let bounds = self.percentile_bounds;
        if bounds.min > bounds.max || bounds.max > 100 {
            return Err(ConfigurationError::InvalidPercentileBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }

        Ok(())
    }
}

/// Raised while loading or validating a scoring table, before any answers are scored.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("category keys must not be blank")]
    BlankCategoryKey,
    #[error("more than one category maps to result key '{0}'")]
    DuplicateCategory(String),
    #[error("category '{category}' must declare a max_scale above zero")]
    InvalidMaxScale { category: String },
    #[error("category '{category}' must declare at least one non-empty prefix")]
    MissingPrefixes { category: String },
    #[error("prefix '{prefix}' is claimed by both '{first}' and '{second}'")]
    DuplicatePrefix {
        prefix: String,
        first: String,
        second: String,
    },
    #[error("{field} must be between 0 and 100 (got {value})")]
    OutOfRange { field: &'static str, value: u8 },
    #[error("percentile bounds {min}..={max} are not a valid range within 0..=100")]
    InvalidPercentileBounds { min: u8, max: u8 },
    #[error("failed to read scoring config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scoring config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_is_valid() {
        let config = ScoringConfig::standard();
        config.validate().expect("standard table validates");
        assert_eq!(config.categories.len(), 4);
        assert_eq!(config.confidence, 85);
        assert_eq!(config.neutral_score, 75);
    }

    #[test]
    fn result_key_capitalizes_category() {
        let rule = CategoryRule::new(
            "wellbeing",
            "Overall Wellbeing",
            Polarity::Wellbeing,
            &["who_"],
            5,
        );
        assert_eq!(rule.result_key(), "Wellbeing_Category");
    }

    #[test]
    fn rejects_zero_max_scale() {
        let mut config = ScoringConfig::standard();
        config.categories[2].max_scale = 0;
        match config.validate() {
            Err(ConfigurationError::InvalidMaxScale { category }) => {
                assert_eq!(category, "stress")
            }
            other => panic!("expected max scale error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_keys_that_collide_in_results() {
        let json = r#"{
            "categories": [
                { "key": "stress", "display_name": "Stress A", "polarity": "concern",
                  "prefixes": ["dass_"], "max_scale": 3 },
                { "key": "Stress", "display_name": "Stress B", "polarity": "wellbeing",
                  "prefixes": ["who_"], "max_scale": 5 }
            ]
        }"#;
        match ScoringConfig::from_reader(json.as_bytes()) {
            Err(ConfigurationError::DuplicateCategory(key)) => {
                assert_eq!(key, "Stress_Category")
            }
            other => panic!("expected duplicate category, got {other:?}"),
        }
    }

    #[test]
    fn rejects_shared_prefix() {
        let mut config = ScoringConfig::standard();
        config.categories[1].prefixes.push("phq_".to_string());
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::DuplicatePrefix { .. })
        ));
    }

    #[test]
    fn rejects_missing_prefixes() {
        let mut config = ScoringConfig::standard();
        config.categories[0].prefixes.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::MissingPrefixes { .. })
        ));
    }

    #[test]
    fn rejects_inverted_percentile_bounds() {
        let mut config = ScoringConfig::standard();
        config.percentile_bounds = PercentileBounds { min: 60, max: 40 };
        assert!(matches!(
            config.validate(),
            Err(ConfigurationError::InvalidPercentileBounds { .. })
        ));
    }

    #[test]
    fn empty_category_list_is_allowed() {
        let config = ScoringConfig {
            categories: Vec::new(),
            ..ScoringConfig::standard()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let json = r#"{ "confidence": 70, "neutral_score": 50 }"#;
        let config = ScoringConfig::from_reader(json.as_bytes()).expect("override parses");
        assert_eq!(config.confidence, 70);
        assert_eq!(config.neutral_score, 50);
        assert_eq!(config.categories, ScoringConfig::standard().categories);
    }

    #[test]
    fn override_with_custom_categories() {
        let json = r#"{
            "categories": [
                { "key": "stress", "display_name": "Stress", "polarity": "concern",
                  "prefixes": ["stress_"], "max_scale": 4 }
            ]
        }"#;
        let config = ScoringConfig::from_reader(json.as_bytes()).expect("override parses");
        assert_eq!(config.categories.len(), 1);
        assert_eq!(config.categories[0].polarity, Polarity::Concern);
        assert_eq!(config.recommendation_limit, 3);
    }
}
