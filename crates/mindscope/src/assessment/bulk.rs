use std::io::Read;

use rand::Rng;
use serde::Serialize;

use super::scoring::{AnswerSet, Scorecard, ScoringEngine, WellnessLevel};

const RESPONDENT_COLUMN: &str = "respondent";

/// One CSV row: who answered, and what.
#[derive(Debug, Clone, PartialEq)]
pub struct RespondentAnswers {
    pub respondent: String,
    pub answers: AnswerSet,
}

#[derive(Debug, thiserror::Error)]
pub enum BulkError {
    #[error("answers CSV must start with a 'respondent' column")]
    MissingRespondentColumn,
    #[error("row {row}: '{value}' in column '{column}' is not a finite number")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Parses a `respondent,<question id>...` sheet. Empty cells are unanswered.
pub fn parse_answer_sheet<R: Read>(reader: R) -> Result<Vec<RespondentAnswers>, BulkError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    match headers.get(0) {
        Some(first) if first.eq_ignore_ascii_case(RESPONDENT_COLUMN) => {}
        _ => return Err(BulkError::MissingRespondentColumn),
    }

    let mut rows = Vec::new();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let row = index + 2;
        let respondent = record.get(0).unwrap_or_default().to_string();

        let mut answers = AnswerSet::new();
        for (column, cell) in headers.iter().zip(record.iter()).skip(1) {
            if cell.is_empty() {
                continue;
            }
            let invalid = || BulkError::InvalidValue {
                row,
                column: column.to_string(),
                value: cell.to_string(),
            };
            let value: f64 = cell.parse().map_err(|_| invalid())?;
            if !value.is_finite() {
                return Err(invalid());
            }
            answers.insert(column.to_string(), value);
        }

        rows.push(RespondentAnswers {
            respondent,
            answers,
        });
    }

    Ok(rows)
}

/// Condensed per-respondent outcome for batch reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RespondentOutcome {
    pub respondent: String,
    pub answers_count: usize,
    pub overall_score: u8,
    pub levels: Vec<(String, WellnessLevel)>,
}

impl RespondentOutcome {
    fn from_scorecard(respondent: String, answers_count: usize, card: &Scorecard) -> Self {
        Self {
            respondent,
            answers_count,
            overall_score: card.overall_score,
            levels: card
                .results
                .values()
                .map(|result| (result.name.clone(), result.level))
                .collect(),
        }
    }

    /// `id: overall NN% | Name: Level | ...`
    pub fn line(&self) -> String {
        let mut line = format!("{}: overall {}%", self.respondent, self.overall_score);
        for (name, level) in &self.levels {
            line.push_str(&format!(" | {name}: {}", level.label()));
        }
        line
    }
}

pub fn score_sheet<R: Rng + ?Sized>(
    rows: &[RespondentAnswers],
    engine: &ScoringEngine,
    rng: &mut R,
) -> Vec<RespondentOutcome> {
    rows.iter()
        .map(|row| {
            let card = engine.score(&row.answers, rng);
            RespondentOutcome::from_scorecard(row.respondent.clone(), row.answers.len(), &card)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SHEET: &str = "respondent,phq_1,phq_2,who_1,social_1\n\
                         r-1,3,3,5,\n\
                         r-2,0,,1,4\n";

    #[test]
    fn parses_rows_and_skips_empty_cells() {
        let rows = parse_answer_sheet(SHEET.as_bytes()).expect("parses");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].respondent, "r-1");
        assert_eq!(rows[0].answers.len(), 3);
        assert_eq!(rows[1].answers.get("phq_2"), None);
        assert_eq!(rows[1].answers.get("social_1"), Some(&4.0));
    }

    #[test]
    fn requires_respondent_column() {
        let result = parse_answer_sheet("phq_1,phq_2\n1,2\n".as_bytes());
        assert!(matches!(result, Err(BulkError::MissingRespondentColumn)));
    }

    #[test]
    fn reports_non_numeric_cells() {
        let result = parse_answer_sheet("respondent,phq_1\nr-1,often\n".as_bytes());
        match result {
            Err(BulkError::InvalidValue { row, column, value }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "phq_1");
                assert_eq!(value, "often");
            }
            other => panic!("expected invalid value, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_finite_cells() {
        for (sheet, bad) in [
            ("respondent,phq_1,who_1\nr-1,NaN,2\n", "NaN"),
            ("respondent,phq_1,who_1\nr-1,1,inf\n", "inf"),
            ("respondent,phq_1\nr-1,-infinity\n", "-infinity"),
        ] {
            match parse_answer_sheet(sheet.as_bytes()) {
                Err(BulkError::InvalidValue { row, value, .. }) => {
                    assert_eq!(row, 2);
                    assert_eq!(value, bad);
                }
                other => panic!("expected invalid value for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn scores_each_respondent() {
        let rows = parse_answer_sheet(SHEET.as_bytes()).expect("parses");
        let outcomes = score_sheet(&rows, &ScoringEngine::standard(), &mut StdRng::seed_from_u64(3));
        assert_eq!(outcomes.len(), 2);
        // depression 0, wellbeing 100, anxiety and stress neutral
        assert_eq!(outcomes[0].overall_score, 63);
        assert_eq!(
            outcomes[0].line(),
            "r-1: overall 63% | Mood & Energy: High Concern | Anxiety Level: Moderate Well-being \
             | Stress Management: Moderate Well-being | Overall Wellbeing: High Well-being"
        );
    }
}
