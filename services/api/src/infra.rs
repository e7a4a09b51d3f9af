use metrics_exporter_prometheus::PrometheusHandle;
use mindscope::assessment::{
    AssessmentMode, AssessmentService, CacheError, FileResultsCache, InMemoryResultsCache,
    QuestionCatalog, ResultsCache, ResultsPayload, ScoringConfig, ScoringEngine,
};
use mindscope::config::AssessmentSettings;
use mindscope::error::AppError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Results cache chosen by configuration: a file when a path is set, memory otherwise.
pub(crate) enum ConfiguredCache {
    Memory(InMemoryResultsCache),
    File(FileResultsCache),
}

impl ConfiguredCache {
    pub(crate) fn from_settings(settings: &AssessmentSettings) -> Self {
        match &settings.results_cache_path {
            Some(path) => Self::File(FileResultsCache::new(path.clone())),
            None => Self::Memory(InMemoryResultsCache::new()),
        }
    }

    pub(crate) fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "memory".to_string(),
            Self::File(cache) => cache.path().display().to_string(),
        }
    }
}

impl ResultsCache for ConfiguredCache {
    fn store(&self, payload: &ResultsPayload) -> Result<(), CacheError> {
        match self {
            Self::Memory(cache) => cache.store(payload),
            Self::File(cache) => cache.store(payload),
        }
    }

    fn latest(&self) -> Result<Option<ResultsPayload>, CacheError> {
        match self {
            Self::Memory(cache) => cache.latest(),
            Self::File(cache) => cache.latest(),
        }
    }
}

pub(crate) fn load_catalog(settings: &AssessmentSettings) -> Result<QuestionCatalog, AppError> {
    let catalog = match &settings.catalog_path {
        Some(path) => QuestionCatalog::from_path(path)?,
        None => QuestionCatalog::bundled()?,
    };
    Ok(catalog)
}

pub(crate) fn load_engine(settings: &AssessmentSettings) -> Result<ScoringEngine, AppError> {
    let config = match &settings.scoring_config_path {
        Some(path) => ScoringConfig::from_path(path)?,
        None => ScoringConfig::standard(),
    };
    Ok(ScoringEngine::new(config)?)
}

pub(crate) fn build_service(
    settings: &AssessmentSettings,
) -> Result<AssessmentService<ConfiguredCache>, AppError> {
    let catalog = load_catalog(settings)?;
    let engine = load_engine(settings)?;
    let cache = ConfiguredCache::from_settings(settings);

    info!(
        questions = catalog.total_questions(),
        categories = engine.config().categories.len(),
        cache = %cache.describe(),
        "assessment service assembled"
    );

    Ok(AssessmentService::new(catalog, engine, Arc::new(cache))
        .with_quick_count(settings.quick_count))
}

/// Seeded generator for reproducible runs, entropy-seeded otherwise.
pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

pub(crate) fn parse_mode(raw: &str) -> Result<AssessmentMode, String> {
    raw.parse::<AssessmentMode>().map_err(|err| err.to_string())
}
