use std::sync::Arc;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::cache::{CacheError, ResultsCache};
use super::catalog::{AssessmentMode, Question, QuestionCatalog};
use super::payload::ResultsPayload;
use super::quick::DEFAULT_QUICK_COUNT;
use super::scoring::{AnswerSet, ScoringEngine};
use super::share::ShareData;

/// Questions served for one mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub title: String,
    pub mode: AssessmentMode,
    pub total_questions: usize,
    pub questions: Vec<Question>,
}

/// Body of an assessment submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRequest {
    #[serde(default)]
    pub answers: AnswerSet,
    #[serde(default)]
    pub mode: AssessmentMode,
}

/// Composes the catalog, the scoring engine and the results cache.
pub struct AssessmentService<C> {
    catalog: Arc<QuestionCatalog>,
    engine: Arc<ScoringEngine>,
    cache: Arc<C>,
    quick_count: usize,
}

impl<C> AssessmentService<C>
where
    C: ResultsCache + 'static,
{
    pub fn new(catalog: QuestionCatalog, engine: ScoringEngine, cache: Arc<C>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            engine: Arc::new(engine),
            cache,
            quick_count: DEFAULT_QUICK_COUNT,
        }
    }

    pub fn with_quick_count(mut self, quick_count: usize) -> Self {
        self.quick_count = quick_count.max(1);
        self
    }

    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub fn questions<R: Rng + ?Sized>(&self, mode: AssessmentMode, rng: &mut R) -> QuestionSet {
        let questions = self.catalog.questions_for(mode, self.quick_count, rng);
        QuestionSet {
            title: self.catalog.title.clone(),
            mode,
            total_questions: questions.len(),
            questions,
        }
    }

    /// Scores and caches a submission. A failing cache is logged and does not fail the
    /// assessment.
    pub fn assess<R: Rng + ?Sized>(
        &self,
        request: AssessmentRequest,
        rng: &mut R,
    ) -> Result<ResultsPayload, AssessmentServiceError> {
        if request.answers.is_empty() {
            return Err(AssessmentServiceError::NoAnswers);
        }

        let card = self.engine.score(&request.answers, rng);
        let payload = ResultsPayload::from_scorecard(card, request.mode, request.answers.len());

        if let Err(error) = self.cache.store(&payload) {
            warn!(%error, assessment_id = %payload.assessment_id, "failed to cache results");
        }

        info!(
            assessment_id = %payload.assessment_id,
            mode = %payload.assessment_mode,
            answers = payload.answers_count,
            overall_score = payload.overall_score,
            "assessment scored"
        );
        Ok(payload)
    }

    pub fn latest(&self) -> Result<ResultsPayload, AssessmentServiceError> {
        self.cache.latest()?.ok_or(AssessmentServiceError::NoResults)
    }

    /// Share texts for the latest cached payload.
    pub fn share<R: Rng + ?Sized>(
        &self,
        share_url: Option<&str>,
        rng: &mut R,
    ) -> Result<ShareData, AssessmentServiceError> {
        let payload = self.latest()?;
        Ok(ShareData::build(&payload, share_url, Utc::now(), rng))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error("No answers provided")]
    NoAnswers,
    #[error("no assessment results available")]
    NoResults,
    #[error(transparent)]
    Cache(#[from] CacheError),
}
