use rand::seq::SliceRandom;
use rand::Rng;
use tracing::warn;

use crate::store::{AnswerKeyEntry, Question};

/// Placeholder answer key: one randomly chosen option per question, meant to be
/// corrected by hand afterwards.
pub fn generate<R: Rng + ?Sized>(questions: &[Question], rng: &mut R) -> Vec<AnswerKeyEntry> {
    questions
        .iter()
        .filter_map(|q| {
            let Some(answer) = q.answers.choose(&mut *rng) else {
                warn!(number = %q.number, "question has no answers, skipped in answer key");
                return None;
            };
            Some(AnswerKeyEntry {
                id: q.id,
                number: q.number.clone(),
                category: q.category.clone(),
                correct_option: answer.option.clone(),
            })
        })
        .collect()
}
