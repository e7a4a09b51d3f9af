mod aggregate;
mod classifier;
mod config;
mod levels;
mod overall;
mod recommendations;
mod results;

pub use aggregate::CategoryAggregate;
pub use classifier::CategoryClassifier;
pub use config::{
    CategoryRule, ConfigurationError, PercentileBounds, PercentileJitter, Polarity, ScoringConfig,
};
pub use levels::{WellnessLevel, NO_DATA_DESCRIPTION};
pub use recommendations::{filler_recommendations, Recommendation};
pub use results::{CategoryResult, CategoryResults};

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Question id to the numeric value chosen for it. May cover any subset of the catalog.
pub type AnswerSet = BTreeMap<String, f64>;

/// Stateless engine that turns an answer set into category results, recommendations and an
/// overall score. The only randomness is the percentile decoration, drawn from `rng`.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn standard() -> Self {
        Self {
            config: ScoringConfig::standard(),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn classifier(&self) -> CategoryClassifier<'_> {
        CategoryClassifier::new(&self.config.categories)
    }

    pub fn classify(&self, question_id: &str) -> Option<&CategoryRule> {
        self.classifier().classify(question_id)
    }

    /// Aggregates aligned with `config().categories`.
    pub fn aggregate(&self, answers: &AnswerSet) -> Vec<CategoryAggregate> {
        aggregate::aggregate_answers(answers, &self.classifier(), self.config.categories.len())
    }

    pub fn score<R: Rng + ?Sized>(&self, answers: &AnswerSet, rng: &mut R) -> Scorecard {
        let aggregates = self.aggregate(answers);

        let mut results = CategoryResults::new();
        for (rule, aggregate) in self.config.categories.iter().zip(&aggregates) {
            let scored = levels::score_category(rule, aggregate, self.config.neutral_score);
            let population_percentile = levels::population_percentile(
                scored.score,
                self.config.percentile_jitter,
                self.config.percentile_bounds,
                rng,
            );
            results.insert(
                rule.result_key(),
                CategoryResult {
                    name: rule.display_name.clone(),
                    level: scored.level,
                    score: scored.score,
                    confidence: self.config.confidence,
                    description: scored.description.to_string(),
                    population_percentile,
                    questions_answered: aggregate.count,
                },
            );
        }

        let recommendations = recommendations::recommend(
            results
                .values()
                .map(|result| (result.name.as_str(), result.level)),
            self.config.recommendation_limit,
        );
        let overall_score = overall::overall_score(results.values().map(|result| result.score));

        let classified: usize = aggregates.iter().map(|aggregate| aggregate.count).sum();
        debug!(
            answers = answers.len(),
            classified,
            categories = results.len(),
            overall_score,
            "scored answer set"
        );

        Scorecard {
            results,
            recommendations,
            overall_score,
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::standard()
    }
}

/// Pure output of one scoring run, before session metadata is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scorecard {
    pub results: CategoryResults,
    pub recommendations: Vec<Recommendation>,
    pub overall_score: u8,
}
