use tracing::warn;

/// Rounded mean of the category scores; zero when there is nothing to average.
pub(crate) fn overall_score<I>(scores: I) -> u8
where
    I: IntoIterator<Item = u8>,
{
    let (sum, count) = scores
        .into_iter()
        .fold((0u32, 0u32), |(sum, count), score| {
            (sum + u32::from(score), count + 1)
        });

    if count == 0 {
        warn!("no categories were scored; reporting an overall score of 0");
        return 0;
    }

    // half-up integer rounding of sum / count
    ((sum * 2 + count) / (count * 2)) as u8
}
