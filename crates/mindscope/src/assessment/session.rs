use rand::Rng;
use tracing::debug;

use super::catalog::{AssessmentMode, Question, QuestionCatalog};
use super::payload::ResultsPayload;
use super::scoring::{AnswerSet, ScoringEngine};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum SessionError {
    #[error("question '{0}' is not part of this assessment")]
    UnknownQuestion(String),
    #[error("{value} is not an option for question '{question}'")]
    InvalidValue { question: String, value: f64 },
    #[error("the assessment has no questions")]
    Empty,
}

/// One respondent's walk through a question list.
#[derive(Debug, Clone)]
pub struct AssessmentSession {
    mode: AssessmentMode,
    questions: Vec<Question>,
    answers: AnswerSet,
    current_index: usize,
}

impl AssessmentSession {
    pub fn new<R: Rng + ?Sized>(
        catalog: &QuestionCatalog,
        mode: AssessmentMode,
        quick_count: usize,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        Self::with_questions(mode, catalog.questions_for(mode, quick_count, rng))
    }

    pub fn with_questions(
        mode: AssessmentMode,
        questions: Vec<Question>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        Ok(Self {
            mode,
            questions,
            answers: AnswerSet::new(),
            current_index: 0,
        })
    }

    pub fn mode(&self) -> AssessmentMode {
        self.mode
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current(&self) -> &Question {
        &self.questions[self.current_index]
    }

    /// Records (or replaces) an answer. The value must be one of the question's options.
    pub fn answer(&mut self, question_id: &str, value: f64) -> Result<(), SessionError> {
        let question = self
            .questions
            .iter()
            .find(|question| question.id == question_id)
            .ok_or_else(|| SessionError::UnknownQuestion(question_id.to_string()))?;

        if !question.accepts(value) {
            return Err(SessionError::InvalidValue {
                question: question_id.to_string(),
                value,
            });
        }

        self.answers.insert(question_id.to_string(), value);
        Ok(())
    }

    pub fn answer_current(&mut self, value: f64) -> Result<(), SessionError> {
        let id = self.current().id.clone();
        self.answer(&id, value)
    }

    /// Moves forward; returns false when already on the last question.
    pub fn advance(&mut self) -> bool {
        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
            true
        } else {
            false
        }
    }

    /// Moves back; returns false on the first question.
    pub fn back(&mut self) -> bool {
        if self.current_index > 0 {
            self.current_index -= 1;
            true
        } else {
            false
        }
    }

    /// (answered, total)
    pub fn progress(&self) -> (usize, usize) {
        (self.answers.len(), self.questions.len())
    }

    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.questions.len()
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn finish<R: Rng + ?Sized>(self, engine: &ScoringEngine, rng: &mut R) -> ResultsPayload {
        let (answered, total) = self.progress();
        if answered < total {
            debug!(answered, total, "finishing with unanswered questions");
        }
        let card = engine.score(&self.answers, rng);
        ResultsPayload::from_scorecard(card, self.mode, answered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn quick_session() -> AssessmentSession {
        let catalog = QuestionCatalog::bundled().expect("bundled catalog");
        AssessmentSession::new(&catalog, AssessmentMode::Quick, 12, &mut StdRng::seed_from_u64(9))
            .expect("session")
    }

    #[test]
    fn walks_forward_and_back() {
        let mut session = quick_session();
        assert_eq!(session.current_index(), 0);
        assert!(!session.back());
        assert!(session.advance());
        assert_eq!(session.current_index(), 1);
        assert!(session.back());

        for _ in 0..20 {
            session.advance();
        }
        assert_eq!(session.current_index(), 11);
        assert!(!session.advance());
    }

    #[test]
    fn validates_answers_against_options() {
        let mut session = quick_session();
        assert_eq!(
            session.answer("nope_1", 1.0),
            Err(SessionError::UnknownQuestion("nope_1".to_string()))
        );
        assert!(matches!(
            session.answer("phq_1", 7.0),
            Err(SessionError::InvalidValue { .. })
        ));
        session.answer("phq_1", 2.0).expect("valid answer");
        session.answer("phq_1", 3.0).expect("answers can be replaced");
        assert_eq!(session.answers().get("phq_1"), Some(&3.0));
        assert_eq!(session.progress(), (1, 12));
        assert!(!session.is_complete());
    }

    #[test]
    fn finishing_a_complete_session_scores_it() {
        let mut session = quick_session();
        loop {
            let max = session.current().max_value().expect("options");
            session.answer_current(max).expect("answer");
            if !session.advance() {
                break;
            }
        }
        assert!(session.is_complete());

        let payload = session.finish(&ScoringEngine::standard(), &mut StdRng::seed_from_u64(1));
        assert_eq!(payload.assessment_mode, AssessmentMode::Quick);
        assert_eq!(payload.answers_count, 12);
        let depression = payload.results.get("Depression_Category").expect("depression");
        assert_eq!(depression.score, 0);
    }

    #[test]
    fn sparse_sessions_can_finish() {
        let session = quick_session();
        let payload = session.finish(&ScoringEngine::standard(), &mut StdRng::seed_from_u64(1));
        assert_eq!(payload.answers_count, 0);
        assert_eq!(payload.overall_score, 75);
    }

    #[test]
    fn empty_question_list_is_rejected() {
        assert_eq!(
            AssessmentSession::with_questions(AssessmentMode::Full, Vec::new()).err(),
            Some(SessionError::Empty)
        );
    }
}
