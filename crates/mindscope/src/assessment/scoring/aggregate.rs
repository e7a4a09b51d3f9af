use serde::Serialize;

use super::classifier::CategoryClassifier;
use super::AnswerSet;

/// Running sum and count of the answers one category received.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CategoryAggregate {
    pub total: f64,
    pub count: usize,
}

impl CategoryAggregate {
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.total / self.count as f64)
        }
    }
}

/// Reduces an answer set to one aggregate per rule, aligned with the rule order.
pub(crate) fn aggregate_answers(
    answers: &AnswerSet,
    classifier: &CategoryClassifier<'_>,
    categories: usize,
) -> Vec<CategoryAggregate> {
    let mut aggregates = vec![CategoryAggregate::default(); categories];

    for (question_id, value) in answers {
        if let Some(index) = classifier.position(question_id) {
            let aggregate = &mut aggregates[index];
            aggregate.total += value;
            aggregate.count += 1;
        }
    }

    aggregates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::scoring::config::ScoringConfig;

    fn answers(pairs: &[(&str, f64)]) -> AnswerSet {
        pairs
            .iter()
            .map(|(id, value)| (id.to_string(), *value))
            .collect()
    }

    #[test]
    fn sums_per_category_and_skips_unknown_ids() {
        let config = ScoringConfig::standard();
        let classifier = CategoryClassifier::new(&config.categories);
        let set = answers(&[
            ("phq_1", 2.0),
            ("phq_2", 1.0),
            ("gad_1", 3.0),
            ("who_1", 4.0),
            ("sleep_1", 5.0),
            ("social_1", 4.0),
        ]);

        let aggregates = aggregate_answers(&set, &classifier, config.categories.len());

        assert_eq!(aggregates[0], CategoryAggregate { total: 3.0, count: 2 });
        assert_eq!(aggregates[1], CategoryAggregate { total: 3.0, count: 1 });
        assert_eq!(aggregates[2], CategoryAggregate::default());
        assert_eq!(aggregates[3], CategoryAggregate { total: 9.0, count: 2 });
    }

    #[test]
    fn average_is_none_without_answers() {
        assert_eq!(CategoryAggregate::default().average(), None);
        let aggregate = CategoryAggregate {
            total: 5.0,
            count: 2,
        };
        assert_eq!(aggregate.average(), Some(2.5));
    }
}
