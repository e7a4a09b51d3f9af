use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::catalog::AssessmentMode;
use super::scoring::{CategoryResult, CategoryResults, Recommendation, Scorecard};

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Process-unique id of the form `assessment-000001`.
pub fn next_assessment_id() -> String {
    let value = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("assessment-{value:06}")
}

/// Complete output of one assessment, as cached and handed to rendering/export layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultsPayload {
    pub results: CategoryResults,
    pub recommendations: Vec<Recommendation>,
    pub overall_score: u8,
    pub assessment_mode: AssessmentMode,
    pub answers_count: usize,
    pub assessment_id: String,
    pub timestamp: DateTime<Utc>,
}

impl ResultsPayload {
    pub fn from_scorecard(card: Scorecard, mode: AssessmentMode, answers_count: usize) -> Self {
        Self::with_metadata(card, mode, answers_count, next_assessment_id(), Utc::now())
    }

    pub fn with_metadata(
        card: Scorecard,
        mode: AssessmentMode,
        answers_count: usize,
        assessment_id: String,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            results: card.results,
            recommendations: card.recommendations,
            overall_score: card.overall_score,
            assessment_mode: mode,
            answers_count,
            assessment_id,
            timestamp,
        }
    }

    /// Highest-scoring category; the last one wins ties.
    pub fn strongest(&self) -> Option<&CategoryResult> {
        self.results.values().fold(None, |best, result| match best {
            Some(current) if current.score > result.score => Some(current),
            _ => Some(result),
        })
    }

    /// Lowest-scoring category; the last one wins ties.
    pub fn weakest(&self) -> Option<&CategoryResult> {
        self.results.values().fold(None, |worst, result| match worst {
            Some(current) if current.score < result.score => Some(current),
            _ => Some(result),
        })
    }
}
