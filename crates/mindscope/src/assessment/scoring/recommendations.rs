use serde::{Deserialize, Serialize};

use super::levels::WellnessLevel;

/// Actionable suggestion surfaced beneath the category cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub icon: String,
    pub title: String,
    pub description: String,
}

impl Recommendation {
    fn new(icon: &str, title: &str, description: impl Into<String>) -> Self {
        Self {
            icon: icon.to_string(),
            title: title.to_string(),
            description: description.into(),
        }
    }

    fn professional_support(display_name: &str) -> Self {
        Self::new(
            "👩‍⚕️",
            "Consider Professional Support",
            format!(
                "Your {} responses suggest you might benefit from speaking with a mental health professional.",
                display_name.to_lowercase()
            ),
        )
    }

    fn self_care(display_name: &str) -> Self {
        Self::new(
            "🧘‍♀️",
            "Practice Self-Care",
            format!(
                "Focus on {} through mindfulness, exercise, and healthy routines.",
                display_name.to_lowercase()
            ),
        )
    }
}

/// Generic suggestions appended, in this order, when too few categories triggered one.
pub fn filler_recommendations() -> [Recommendation; 3] {
    [
        Recommendation::new(
            "🏃‍♂️",
            "Stay Active",
            "Regular physical activity can significantly boost mood and energy levels.",
        ),
        Recommendation::new(
            "💬",
            "Connect with Others",
            "Maintain social connections and don't hesitate to reach out for support.",
        ),
        Recommendation::new(
            "🌱",
            "Build Resilience",
            "Consider building on your strong foundation with resilience practices like gratitude, goal-setting, or new hobbies.",
        ),
    ]
}

/// Category-triggered suggestions first, in category order, then fillers up to `limit`.
pub(crate) fn recommend<'a, I>(categories: I, limit: usize) -> Vec<Recommendation>
where
    I: IntoIterator<Item = (&'a str, WellnessLevel)>,
{
    let mut recommendations: Vec<Recommendation> = categories
        .into_iter()
        .filter_map(|(display_name, level)| {
            if level.needs_professional_support() {
                Some(Recommendation::professional_support(display_name))
            } else if level.invites_self_care() {
                Some(Recommendation::self_care(display_name))
            } else {
                None
            }
        })
        .collect();

    if recommendations.len() < limit {
        let missing = limit - recommendations.len();
        recommendations.extend(filler_recommendations().into_iter().take(missing));
    }

    recommendations.truncate(limit);
    recommendations
}
