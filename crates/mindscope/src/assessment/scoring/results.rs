use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::levels::WellnessLevel;

/// Scored view of one category, as rendered on a result card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryResult {
    pub name: String,
    pub level: WellnessLevel,
    pub score: u8,
    pub confidence: u8,
    pub description: String,
    pub population_percentile: u8,
    pub questions_answered: usize,
}

/// Category results keyed by `<Category>_Category`, kept in rule declaration order.
pub type CategoryResults = IndexMap<String, CategoryResult>;

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, score: u8) -> CategoryResult {
        CategoryResult {
            name: name.to_string(),
            level: WellnessLevel::LowConcern,
            score,
            confidence: 85,
            description: WellnessLevel::LowConcern.description().to_string(),
            population_percentile: score,
            questions_answered: 1,
        }
    }

    #[test]
    fn serializes_in_insertion_order() {
        let results: CategoryResults = [
            ("Wellbeing_Category".to_string(), result("Overall Wellbeing", 80)),
            ("Anxiety_Category".to_string(), result("Anxiety Level", 70)),
        ]
        .into_iter()
        .collect();

        let json = serde_json::to_string(&results).expect("serializes");
        let wellbeing = json.find("Wellbeing_Category").expect("wellbeing key");
        let anxiety = json.find("Anxiety_Category").expect("anxiety key");
        assert!(wellbeing < anxiety);
        assert!(json.contains(r#""level":"Low Concern""#));
    }

    #[test]
    fn deserializing_keeps_document_order() {
        let entry = |name: &str, score: u8| {
            serde_json::to_string(&result(name, score)).expect("serializes")
        };
        let text = format!(
            r#"{{"Wellbeing_Category":{},"Depression_Category":{},"Anxiety_Category":{}}}"#,
            entry("Overall Wellbeing", 90),
            entry("Mood & Energy", 60),
            entry("Anxiety Level", 40),
        );

        let parsed: CategoryResults = serde_json::from_str(&text).expect("parses");
        assert_eq!(
            parsed.keys().map(String::as_str).collect::<Vec<_>>(),
            ["Wellbeing_Category", "Depression_Category", "Anxiety_Category"]
        );
        assert_eq!(
            parsed.get("Depression_Category").map(|result| result.score),
            Some(60)
        );
    }

    #[test]
    fn value_round_trip_keeps_order() {
        let results: CategoryResults = [
            ("Stress_Category".to_string(), result("Stress Management", 40)),
            ("Anxiety_Category".to_string(), result("Anxiety Level", 70)),
        ]
        .into_iter()
        .collect();

        let value = serde_json::to_value(&results).expect("serializes");
        let back: CategoryResults = serde_json::from_value(value).expect("deserializes");
        assert_eq!(
            back.keys().map(String::as_str).collect::<Vec<_>>(),
            ["Stress_Category", "Anxiety_Category"]
        );
    }
}
