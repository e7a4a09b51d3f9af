use mindscope::assessment::{AssessmentMode, QuestionSet, ResultsPayload};
use std::fmt::Write;

fn mode_label(mode: AssessmentMode) -> &'static str {
    match mode {
        AssessmentMode::Quick => "quick",
        AssessmentMode::Full => "complete",
    }
}

/// Plain-text rendering of a results payload for terminal output.
pub(crate) fn render_results(payload: &ResultsPayload) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "MindScope results ({} assessment, {} answers) [{}]",
        mode_label(payload.assessment_mode),
        payload.answers_count,
        payload.assessment_id
    );
    let _ = writeln!(
        out,
        "Scored {}",
        payload.timestamp.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(out, "Overall wellness score: {}%", payload.overall_score);

    let _ = writeln!(out, "\nCategories");
    for result in payload.results.values() {
        let _ = writeln!(
            out,
            "- {}: {}% {} (confidence {}%, percentile {}, {} answered)",
            result.name,
            result.score,
            result.level.label(),
            result.confidence,
            result.population_percentile,
            result.questions_answered
        );
        let _ = writeln!(out, "  {}", result.description);
    }

    let _ = writeln!(out, "\nRecommendations");
    for recommendation in &payload.recommendations {
        let _ = writeln!(
            out,
            "- {} {}: {}",
            recommendation.icon, recommendation.title, recommendation.description
        );
    }

    out
}

pub(crate) fn render_questions(set: &QuestionSet) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({} mode, {} questions)",
        set.title, set.mode, set.total_questions
    );

    let mut current_category: Option<&str> = None;
    for question in &set.questions {
        if current_category != Some(question.category.as_str()) {
            let _ = writeln!(out, "\n[{}]", question.category);
            current_category = Some(question.category.as_str());
        }
        let _ = writeln!(out, "{}: {}", question.id, question.text);
        let options: Vec<String> = question
            .options
            .iter()
            .map(|option| format!("{}={}", option.value, option.label))
            .collect();
        let _ = writeln!(out, "    {}", options.join(" | "));
    }

    out
}
