//! The assessment pipeline: catalog and question selection, scoring, the
//! results payload, and the service surface built on top of them.

pub mod bulk;
pub mod cache;
pub mod catalog;
pub mod payload;
pub mod quick;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
pub mod share;

pub use bulk::{parse_answer_sheet, score_sheet, BulkError, RespondentAnswers, RespondentOutcome};
pub use cache::{CacheError, FileResultsCache, InMemoryResultsCache, ResultsCache};
pub use catalog::{
    AnswerOption, AssessmentMode, CatalogError, CatalogQuestion, Question, QuestionCatalog,
    QuickQuestion, Section,
};
pub use payload::{next_assessment_id, ResultsPayload};
pub use quick::{select_quick_questions, DEFAULT_QUICK_COUNT};
pub use router::assessment_router;
pub use scoring::{
    AnswerSet, CategoryResult, CategoryResults, ConfigurationError, Recommendation, Scorecard,
    ScoringConfig, ScoringEngine, WellnessLevel,
};
pub use service::{AssessmentRequest, AssessmentService, AssessmentServiceError, QuestionSet};
pub use session::{AssessmentSession, SessionError};
pub use share::{ShareData, ShareInsights, SocialTexts};
