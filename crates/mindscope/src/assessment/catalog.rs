use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::quick::select_quick_questions;

const BUNDLED_CATALOG: &str = include_str!("../../data/questions.json");

/// Which question set an assessment runs against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentMode {
    #[default]
    Full,
    Quick,
}

impl AssessmentMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Quick => "quick",
        }
    }
}

impl fmt::Display for AssessmentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssessmentMode {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" | "complete" => Ok(Self::Full),
            "quick" => Ok(Self::Quick),
            other => Err(CatalogError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub label: String,
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl AnswerOption {
    pub fn new(label: &str, value: f64) -> Self {
        Self {
            label: label.to_string(),
            value,
            emoji: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogQuestion {
    pub id: String,
    pub text: String,
    pub options_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub category: String,
    pub questions: Vec<CatalogQuestion>,
}

/// Pre-flattened question with its options inlined.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuickQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<AnswerOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_name: Option<String>,
}

/// The question catalog as supplied by a catalog provider or the bundled fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionCatalog {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub option_sets: BTreeMap<String, Vec<AnswerOption>>,
    #[serde(default)]
    pub quick_questions: Vec<QuickQuestion>,
}

/// A question ready to be asked: options resolved, category attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
    pub category: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    pub fn max_value(&self) -> Option<f64> {
        self.options.iter().map(|option| option.value).reduce(f64::max)
    }

    pub fn min_value(&self) -> Option<f64> {
        self.options.iter().map(|option| option.value).reduce(f64::min)
    }

    /// True when `value` is one of the declared option values.
    pub fn accepts(&self, value: f64) -> bool {
        self.options.iter().any(|option| option.value == value)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("option set '{0}' has no options")]
    EmptyOptionSet(String),
    #[error("question '{question}' references unknown option set '{options_id}'")]
    UnknownOptionSet { question: String, options_id: String },
    #[error("question id '{0}' appears more than once")]
    DuplicateQuestion(String),
    #[error("question ids must not be blank")]
    BlankQuestionId,
    #[error("section categories must not be blank")]
    BlankCategory,
    #[error("quick question '{0}' has no options")]
    EmptyQuickOptions(String),
    #[error("unknown assessment mode '{0}' (expected 'full' or 'quick')")]
    UnknownMode(String),
    #[error("failed to read question catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid question catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

impl QuestionCatalog {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_reader(reader)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let catalog: Self = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Static fallback catalog compiled into the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json_str(BUNDLED_CATALOG)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if let Some((name, _)) = self.option_sets.iter().find(|(_, options)| options.is_empty()) {
            return Err(CatalogError::EmptyOptionSet(name.clone()));
        }

        let mut seen: HashSet<&str> = HashSet::new();
        for section in &self.sections {
            if section.category.trim().is_empty() {
                return Err(CatalogError::BlankCategory);
            }
            for question in &section.questions {
                if question.id.trim().is_empty() {
                    return Err(CatalogError::BlankQuestionId);
                }
                if !seen.insert(question.id.as_str()) {
                    return Err(CatalogError::DuplicateQuestion(question.id.clone()));
                }
                if !self.option_sets.contains_key(&question.options_id) {
                    return Err(CatalogError::UnknownOptionSet {
                        question: question.id.clone(),
                        options_id: question.options_id.clone(),
                    });
                }
            }
        }

        let mut quick_seen: HashSet<&str> = HashSet::new();
        for question in &self.quick_questions {
            if question.id.trim().is_empty() {
                return Err(CatalogError::BlankQuestionId);
            }
            if !quick_seen.insert(question.id.as_str()) {
                return Err(CatalogError::DuplicateQuestion(question.id.clone()));
            }
            if question.options.is_empty() {
                return Err(CatalogError::EmptyQuickOptions(question.id.clone()));
            }
        }

        Ok(())
    }

    /// Every sectioned question in section order. Assumes a validated catalog; questions
    /// whose option set is missing are skipped.
    pub fn flatten(&self) -> Vec<Question> {
        self.sections
            .iter()
            .flat_map(|section| {
                section.questions.iter().filter_map(move |question| {
                    self.option_sets
                        .get(&question.options_id)
                        .map(|options| Question {
                            id: question.id.clone(),
                            text: question.text.clone(),
                            category: section.category.clone(),
                            options: options.clone(),
                        })
                })
            })
            .collect()
    }

    pub fn total_questions(&self) -> usize {
        if self.sections.is_empty() {
            self.quick_questions.len()
        } else {
            self.sections.iter().map(|section| section.questions.len()).sum()
        }
    }

    /// Questions to ask for `mode`. Quick mode serves the first `count` entries of the
    /// pre-flattened quick list when the catalog has one, and otherwise samples `count`
    /// questions from the sections. Full mode falls back to the quick list only when the
    /// catalog has no sections.
    pub fn questions_for<R: Rng + ?Sized>(
        &self,
        mode: AssessmentMode,
        count: usize,
        rng: &mut R,
    ) -> Vec<Question> {
        match mode {
            AssessmentMode::Quick if !self.quick_questions.is_empty() => {
                self.quick_as_questions().into_iter().take(count).collect()
            }
            AssessmentMode::Quick => select_quick_questions(&self.flatten(), count, rng),
            AssessmentMode::Full if self.sections.is_empty() => self.quick_as_questions(),
            AssessmentMode::Full => self.flatten(),
        }
    }

    fn quick_as_questions(&self) -> Vec<Question> {
        self.quick_questions
            .iter()
            .map(|question| Question {
                id: question.id.clone(),
                text: question.text.clone(),
                category: question
                    .section_name
                    .clone()
                    .unwrap_or_else(|| "General".to_string()),
                options: question.options.clone(),
            })
            .collect()
    }
}
