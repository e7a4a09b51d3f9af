use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aggregate::CategoryAggregate;
use super::config::{CategoryRule, PercentileBounds, PercentileJitter, Polarity};

/// Qualitative band reported for a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WellnessLevel {
    #[serde(rename = "Low Concern")]
    LowConcern,
    #[serde(rename = "Mild to Moderate Concern")]
    MildToModerateConcern,
    #[serde(rename = "High Concern")]
    HighConcern,
    #[serde(rename = "Low Well-being")]
    LowWellbeing,
    #[serde(rename = "Moderate Well-being")]
    ModerateWellbeing,
    #[serde(rename = "High Well-being")]
    HighWellbeing,
}

impl WellnessLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::LowConcern => "Low Concern",
            Self::MildToModerateConcern => "Mild to Moderate Concern",
            Self::HighConcern => "High Concern",
            Self::LowWellbeing => "Low Well-being",
            Self::ModerateWellbeing => "Moderate Well-being",
            Self::HighWellbeing => "High Well-being",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::LowConcern => {
                "Your responses suggest this area is well-managed. Keep up the good work!"
            }
            Self::MildToModerateConcern => {
                "Some areas may benefit from attention and self-care practices."
            }
            Self::HighConcern => {
                "This area shows signs that may benefit from professional support."
            }
            Self::LowWellbeing => {
                "There are opportunities to enhance your wellbeing through positive changes."
            }
            Self::ModerateWellbeing => "Your wellbeing shows room for growth and improvement.",
            Self::HighWellbeing => "Excellent! You demonstrate strong wellbeing in this area.",
        }
    }

    /// Levels whose label names "High Concern".
    pub const fn needs_professional_support(self) -> bool {
        matches!(self, Self::HighConcern)
    }

    /// Levels whose label names "Moderate", on either polarity.
    pub const fn invites_self_care(self) -> bool {
        matches!(self, Self::MildToModerateConcern | Self::ModerateWellbeing)
    }

    /// Wellbeing bands read directly off the percentage.
    fn for_wellbeing(percentage: f64) -> Self {
        if percentage >= 80.0 {
            Self::HighWellbeing
        } else if percentage >= 60.0 {
            Self::ModerateWellbeing
        } else {
            Self::LowWellbeing
        }
    }

    /// Concern bands read off the raw severity percentage, before inversion.
    fn for_concern(percentage: f64) -> Self {
        if percentage <= 20.0 {
            Self::LowConcern
        } else if percentage <= 50.0 {
            Self::MildToModerateConcern
        } else {
            Self::HighConcern
        }
    }
}

/// Shown when a category received no answers.
pub const NO_DATA_DESCRIPTION: &str = "No specific data available for this category.";

/// Score and band for one category before the cosmetic fields are attached.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CategoryScore {
    pub score: u8,
    pub level: WellnessLevel,
    pub description: &'static str,
}

pub(crate) fn score_category(
    rule: &CategoryRule,
    aggregate: &CategoryAggregate,
    neutral_score: u8,
) -> CategoryScore {
    let Some(average) = aggregate.average() else {
        return CategoryScore {
            score: neutral_score.min(100),
            level: WellnessLevel::ModerateWellbeing,
            description: NO_DATA_DESCRIPTION,
        };
    };

    let percentage = (average / f64::from(rule.max_scale)) * 100.0;
    let (score, level) = match rule.polarity {
        Polarity::Wellbeing => (
            bounded_round(percentage),
            WellnessLevel::for_wellbeing(percentage),
        ),
        Polarity::Concern => (
            bounded_round(100.0 - percentage),
            WellnessLevel::for_concern(percentage),
        ),
    };

    CategoryScore {
        score,
        level,
        description: level.description(),
    }
}

/// Rounds half up and pins the result into 0..=100; out-of-range answers never escape it.
fn bounded_round(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    (value + 0.5).floor().clamp(0.0, 100.0) as u8
}

/// Simulated population percentile: the score nudged by uniform noise, then bounded.
pub(crate) fn population_percentile<R: Rng + ?Sized>(
    score: u8,
    jitter: PercentileJitter,
    bounds: PercentileBounds,
    rng: &mut R,
) -> u8 {
    let offset = rng.gen_range(-i16::from(jitter.below)..=i16::from(jitter.above));
    let nudged = i16::from(score) + offset;
    nudged.clamp(i16::from(bounds.min), i16::from(bounds.max)) as u8
}
