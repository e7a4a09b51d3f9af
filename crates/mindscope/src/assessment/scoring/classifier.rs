use super::config::CategoryRule;

/// Maps question ids onto categories by id prefix. The first rule in declaration order wins.
#[derive(Debug, Clone, Copy)]
pub struct CategoryClassifier<'a> {
    rules: &'a [CategoryRule],
}

impl<'a> CategoryClassifier<'a> {
    pub fn new(rules: &'a [CategoryRule]) -> Self {
        Self { rules }
    }

    /// Returns `None` for ids no rule claims; those answers are left out of every aggregate.
    pub fn classify(&self, question_id: &str) -> Option<&'a CategoryRule> {
        self.position(question_id).map(|index| &self.rules[index])
    }

    pub(crate) fn position(&self, question_id: &str) -> Option<usize> {
        self.rules.iter().position(|rule| rule.matches(question_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::scoring::config::ScoringConfig;

    #[test]
    fn classifies_known_prefixes() {
        let config = ScoringConfig::standard();
        let classifier = CategoryClassifier::new(&config.categories);

        let key = |id: &str| classifier.classify(id).map(|rule| rule.key.as_str());
        assert_eq!(key("phq_1"), Some("depression"));
        assert_eq!(key("gad_7"), Some("anxiety"));
        assert_eq!(key("dass_s_3"), Some("stress"));
        assert_eq!(key("who_5"), Some("wellbeing"));
        assert_eq!(key("sleep_2"), Some("wellbeing"));
    }

    #[test]
    fn unrecognized_prefixes_are_unclassified() {
        let config = ScoringConfig::standard();
        let classifier = CategoryClassifier::new(&config.categories);

        assert!(classifier.classify("stress_1").is_none());
        assert!(classifier.classify("social_2").is_none());
        assert!(classifier.classify("energy_1").is_none());
        assert!(classifier.classify("").is_none());
        assert!(classifier.classify("PHQ_1").is_none());
    }
}
