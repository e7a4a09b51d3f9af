use rand::seq::SliceRandom;
use rand::Rng;

use super::catalog::Question;

/// Default size of a quick assessment.
pub const DEFAULT_QUICK_COUNT: usize = 12;

/// Picks `count` questions spread across categories.
///
/// Every category (in the order it first appears) contributes its first
/// `count / categories` questions; remaining slots are filled by sampling the
/// unchosen questions without replacement. The first phase is deterministic.
/// Selected questions come back in catalog order, so the flow still reads
/// section by section.
pub fn select_quick_questions<R: Rng + ?Sized>(
    questions: &[Question],
    count: usize,
    rng: &mut R,
) -> Vec<Question> {
    if count >= questions.len() {
        return questions.to_vec();
    }

    let groups = category_groups(questions);
    let per_category = if groups.is_empty() {
        0
    } else {
        count / groups.len()
    };

    let mut chosen = vec![false; questions.len()];
    for indices in &groups {
        for &index in indices.iter().take(per_category) {
            chosen[index] = true;
        }
    }

    let picked = chosen.iter().filter(|flag| **flag).count();
    let remaining: Vec<usize> = (0..questions.len()).filter(|index| !chosen[*index]).collect();
    let fill = count.saturating_sub(picked);
    for &index in remaining.choose_multiple(rng, fill) {
        chosen[index] = true;
    }

    questions
        .iter()
        .zip(chosen)
        .filter_map(|(question, selected)| selected.then(|| question.clone()))
        .collect()
}

/// Question indices grouped by category, groups ordered by first appearance.
fn category_groups(questions: &[Question]) -> Vec<Vec<usize>> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    for (index, question) in questions.iter().enumerate() {
        match order.iter().position(|category| *category == question.category) {
            Some(slot) => groups[slot].push(index),
            None => {
                order.push(question.category.as_str());
                groups.push(vec![index]);
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::catalog::AnswerOption;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn question(id: &str, category: &str) -> Question {
        Question {
            id: id.to_string(),
            text: format!("{id}?"),
            category: category.to_string(),
            options: vec![AnswerOption::new("No", 0.0), AnswerOption::new("Yes", 1.0)],
        }
    }

    fn unequal_catalog() -> Vec<Question> {
        let sizes = [("A", 9), ("B", 7), ("C", 6), ("D", 5), ("E", 8)];
        sizes
            .iter()
            .flat_map(|(category, size)| {
                (0..*size).map(move |n| question(&format!("{category}{n}"), category))
            })
            .collect()
    }

    #[test]
    fn returns_exactly_count() {
        let questions = unequal_catalog();
        let mut rng = StdRng::seed_from_u64(5);
        let selected = select_quick_questions(&questions, 12, &mut rng);
        assert_eq!(selected.len(), 12);

        let mut ids: Vec<&str> = selected.iter().map(|q| q.id.as_str()).collect();
        ids.dedup();
        assert_eq!(ids.len(), 12);
    }

    #[test]
    fn round_robin_phase_is_deterministic() {
        let questions = unequal_catalog();
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let selected = select_quick_questions(&questions, 12, &mut rng);
            // 12 / 5 categories = 2 leading questions from each
            for category in ["A", "B", "C", "D", "E"] {
                for n in 0..2 {
                    let id = format!("{category}{n}");
                    assert!(selected.iter().any(|q| q.id == id), "{id} missing");
                }
            }
        }
    }

    #[test]
    fn same_seed_same_selection() {
        let questions = unequal_catalog();
        let first = select_quick_questions(&questions, 12, &mut StdRng::seed_from_u64(42));
        let second = select_quick_questions(&questions, 12, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn small_pool_returns_everything() {
        let questions: Vec<Question> = unequal_catalog().into_iter().take(4).collect();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_quick_questions(&questions, 12, &mut rng), questions);
    }

    #[test]
    fn more_categories_than_slots_fills_randomly() {
        let questions = unequal_catalog();
        let mut rng = StdRng::seed_from_u64(8);
        let selected = select_quick_questions(&questions, 3, &mut rng);
        assert_eq!(selected.len(), 3);
    }
}
