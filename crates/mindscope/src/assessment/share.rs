use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::catalog::AssessmentMode;
use super::payload::ResultsPayload;

const FALLBACK_AREA: &str = "your overall wellbeing";
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Three registers of the same headline findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareInsights {
    pub summary: String,
    pub detailed: String,
    pub casual: String,
}

impl ShareInsights {
    pub fn for_payload(payload: &ResultsPayload) -> Self {
        let overall = payload.overall_score;
        let (strong_name, strong_score) = payload
            .strongest()
            .map(|result| (result.name.as_str(), result.score))
            .unwrap_or((FALLBACK_AREA, overall));
        let growth_name = payload
            .weakest()
            .map(|result| result.name.as_str())
            .unwrap_or(FALLBACK_AREA);

        Self {
            summary: format!(
                "My wellness score: {overall}%. Strongest area: {strong_name}. Working on: {growth_name}."
            ),
            detailed: format!(
                "Key findings:\n\
                 • Overall wellness score: {overall}%\n\
                 • Strongest area: {strong_name} ({strong_score}%)\n\
                 • Growth opportunity: {growth_name}\n\
                 • Personalized recommendations provided"
            ),
            casual: format!(
                "Got my wellness score: {overall}%! 📊\n\
                 Doing great with {strong_name}, and focusing on {growth_name}. \
                 The insights were really helpful! 💪"
            ),
        }
    }
}

/// Ready-to-post texts per destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialTexts {
    pub twitter: String,
    pub linkedin: String,
    pub whatsapp: String,
    pub generic: String,
}

impl SocialTexts {
    pub fn for_payload(payload: &ResultsPayload, share_url: &str) -> Self {
        Self::from_insights(
            &ShareInsights::for_payload(payload),
            payload.assessment_mode,
            share_url,
        )
    }

    pub fn from_insights(insights: &ShareInsights, mode: AssessmentMode, share_url: &str) -> Self {
        let mode_word = mode_word(mode);
        Self {
            twitter: format!(
                "I just completed a {mode_word} mental wellness assessment on MindScope! 🧠✨\n\n\
                 {}\n\nTake yours: {share_url} #MentalHealth #Wellness",
                insights.summary
            ),
            linkedin: format!(
                "I recently took a comprehensive mental wellness assessment that provided valuable \
                 insights into my wellbeing. 🌟\n\n{}\n\nMental health awareness is crucial for all \
                 of us. Check out MindScope: {share_url}\n\n#MentalHealthAwareness #Wellness #SelfCare",
                insights.detailed
            ),
            whatsapp: format!(
                "Hey! I just used MindScope for a mental wellness check-in 🧠\n\n{}\n\n\
                 You should try it too: {share_url}",
                insights.casual
            ),
            generic: format!(
                "I completed a mental wellness assessment on MindScope and gained valuable insights! \
                 {share_url}"
            ),
        }
    }
}

fn mode_word(mode: AssessmentMode) -> &'static str {
    match mode {
        AssessmentMode::Quick => "quick",
        AssessmentMode::Full => "complete",
    }
}

/// Everything a share sheet needs for one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareData {
    pub share_id: String,
    pub share_url: String,
    pub assessment_id: String,
    pub overall_score: u8,
    pub mode: AssessmentMode,
    pub timestamp: DateTime<Utc>,
    pub insights: ShareInsights,
    pub social_texts: SocialTexts,
}

impl ShareData {
    /// Without an explicit URL the link points at `/share/<share_id>`.
    pub fn build<R: Rng + ?Sized>(
        payload: &ResultsPayload,
        share_url: Option<&str>,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Self {
        let share_id = share_id(now, rng);
        let share_url = match share_url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => url.to_string(),
            None => format!("/share/{share_id}"),
        };
        let insights = ShareInsights::for_payload(payload);
        let social_texts =
            SocialTexts::from_insights(&insights, payload.assessment_mode, &share_url);

        Self {
            share_id,
            share_url,
            assessment_id: payload.assessment_id.clone(),
            overall_score: payload.overall_score,
            mode: payload.assessment_mode,
            timestamp: now,
            insights,
            social_texts,
        }
    }
}

/// Base-36 millisecond timestamp plus five random base-36 characters.
fn share_id<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    let suffix: String = (0..5)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect();
    let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
    format!("{}-{suffix}", to_base36(millis))
}

fn to_base36(mut value: u64) -> String {
    if value == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(BASE36[(value % 36) as usize]);
        value /= 36;
    }
    digits.reverse();
    String::from_utf8_lossy(&digits).into_owned()
}
