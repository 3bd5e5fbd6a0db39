use tracing::debug;

use super::lines::{classify_lines, LineKind};
use super::sections::segment;
use crate::store::{AnswerOption, Question};

/// Where continuation lines are currently appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    None,
    Question,
    Answer,
}

struct Draft<'a> {
    number: &'a str,
    question: Vec<&'a str>,
    answers: Vec<(&'a str, Vec<&'a str>)>,
}

impl<'a> Draft<'a> {
    fn new(number: &'a str, first_line: &'a str) -> Self {
        Draft {
            number,
            question: vec![first_line],
            answers: Vec::new(),
        }
    }

    /// A question without answers is dropped.
    fn finish(self) -> Option<Question> {
        if self.answers.is_empty() {
            return None;
        }
        Some(Question {
            id: None,
            number: self.number.to_string(),
            category: None,
            question: join_trimmed(&self.question),
            answers: self
                .answers
                .into_iter()
                .map(|(option, parts)| AnswerOption {
                    option: option.to_string(),
                    text: join_trimmed(&parts),
                })
                .collect(),
        })
    }
}

fn join_trimmed(parts: &[&str]) -> String {
    parts.join("\n").trim().to_string()
}

/// Extract numbered questions with lettered answers from a text span.
///
/// A question's text runs until the next answer, numbered or lettered line;
/// its answers are collected until the next numbered line, which both ends
/// the block and (if it is a question start) opens the next question.
pub fn extract_questions(text: &str) -> Vec<Question> {
    let mut questions = Vec::new();
    let mut current: Option<Draft> = None;
    let mut target = Target::None;

    for line in classify_lines(text) {
        match line.kind {
            LineKind::Question { number, text } => {
                questions.extend(current.take().and_then(Draft::finish));
                current = Some(Draft::new(number, text));
                target = Target::Question;
            }
            LineKind::Numbered => {
                questions.extend(current.take().and_then(Draft::finish));
                target = Target::None;
            }
            LineKind::Answer { option, text } => match current.as_mut() {
                Some(draft) => {
                    draft.answers.push((option, vec![text]));
                    target = Target::Answer;
                }
                None => target = Target::None,
            },
            LineKind::Lettered => target = Target::None,
            LineKind::Blank | LineKind::Caps | LineKind::Text => {
                let Some(draft) = current.as_mut() else {
                    continue;
                };
                match target {
                    Target::Question => draft.question.push(line.raw),
                    Target::Answer => {
                        if let Some((_, parts)) = draft.answers.last_mut() {
                            parts.push(line.raw);
                        }
                    }
                    Target::None => {}
                }
            }
        }
    }

    questions.extend(current.take().and_then(Draft::finish));
    questions
}

/// Segment into categories, extract each section, and number the questions
/// 1, 2, 3… across the whole document.
pub fn extract_with_categories(text: &str) -> Vec<Question> {
    let mut all = Vec::new();
    let mut next_id = 1u32;

    for section in segment(text) {
        let found = extract_questions(&section.body);
        debug!(category = %section.name, start = section.start, questions = found.len(), "section extracted");
        for mut q in found {
            q.id = Some(next_id);
            q.category = Some(section.name.clone());
            next_id += 1;
            all.push(q);
        }
    }

    all
}

/// Question counts per category, in order of first appearance.
pub fn category_counts(questions: &[Question]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for q in questions {
        let Some(category) = q.category.as_deref() else {
            continue;
        };
        match counts.iter_mut().find(|(name, _)| name == category) {
            Some((_, n)) => *n += 1,
            None => counts.push((category.to_string(), 1)),
        }
    }
    counts
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    const SCENARIO: &str = "REGULAMINY I PODSTAWOWE TERMINY\n1. Pytanie testowe\nA. Opcja pierwsza\nB. Opcja druga\n2. Kolejne pytanie\nA. Tak\nB. Nie";

    fn options(q: &Question) -> Vec<&str> {
        q.answers.iter().map(|a| a.option.as_str()).collect()
    }

    #[test]
    fn categorized_scenario() {
        let questions = extract_with_categories(SCENARIO);
        assert_eq!(questions.len(), 2);
        assert_eq!(category_counts(&questions), vec![("REGULAMINY I PODSTAWOWE TERMINY".to_string(), 2)]);

        assert_eq!(questions[0].id, Some(1));
        assert_eq!(questions[0].number, "1");
        assert_eq!(questions[0].question, "Pytanie testowe");
        assert_eq!(questions[0].answers.len(), 2);
        assert_eq!(questions[0].answers[1].text, "Opcja druga");

        assert_eq!(questions[1].id, Some(2));
        assert_eq!(questions[1].question, "Kolejne pytanie");
        assert_eq!(options(&questions[1]), vec!["A", "B"]);
        assert_eq!(questions[1].answers[1].text, "Nie");
    }

    #[test]
    fn flat_extraction_has_no_ids() {
        let questions = extract_questions(SCENARIO);
        assert_eq!(questions.len(), 2);
        assert!(questions.iter().all(|q| q.id.is_none() && q.category.is_none()));
    }

    #[test]
    fn consecutive_numbers_drop_the_first() {
        let questions = extract_questions("1. Bez odpowiedzi\n2. Z odpowiedzią\nA. Tak\nB. Nie");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].number, "2");
    }

    #[test]
    fn every_question_has_answers() {
        let text = "1. Pierwsze\n2. Drugie\nA. Tak\n3. Trzecie\n\n4. Czwarte\nB. Może";
        let questions = extract_questions(text);
        assert!(!questions.is_empty());
        assert!(questions.iter().all(|q| !q.answers.is_empty()));
    }

    #[test]
    fn multi_line_text_keeps_breaks() {
        let text = "134. Jaki symbol został ustalony przez IMO dla wskazania transpondera AIS SART na mapie\nelektronicznej?\nA. okrąg\nz krzyżykiem\nB. trójkąt  \nC. kwadrat";
        let questions = extract_questions(text);
        assert_eq!(questions.len(), 1);
        let q = &questions[0];
        assert_eq!(q.number, "134");
        assert!(q.question.ends_with("na mapie\nelektronicznej?"));
        assert_eq!(q.answers[0].text, "okrąg\nz krzyżykiem");
        assert_eq!(q.answers[1].text, "trójkąt");
        assert_eq!(options(q), vec!["A", "B", "C"]);
    }

    #[test]
    fn printed_numbers_kept_verbatim() {
        let questions = extract_questions("7. Siódme\nA. Tak\n7. Znowu siódme\nA. Nie\n12. Dwunaste\nC. Może");
        let numbers: Vec<&str> = questions.iter().map(|q| q.number.as_str()).collect();
        assert_eq!(numbers, vec!["7", "7", "12"]);
    }

    #[test]
    fn numbered_line_closes_the_block() {
        // `3.5 metra` is not a question start, but answers after it no longer
        // belong to question 1.
        let questions = extract_questions("1. Wysokość anteny\n3.5 metra\nA. Tak");
        assert!(questions.is_empty());
    }

    #[test]
    fn lettered_line_ends_text_but_not_block() {
        let questions = extract_questions("1. Skrót\nA.B.C oznacza\nB. Tak\nC. Nie");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].question, "Skrót");
        assert_eq!(options(&questions[0]), vec!["B", "C"]);
    }

    #[test]
    fn numbers_inside_answers_are_not_questions() {
        let questions = extract_questions("1. Kanał wywoławczy\nA. kanał 16. lub 70\nB. kanał 6");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answers[0].text, "kanał 16. lub 70");
    }

    #[test]
    fn answers_before_any_question_ignored() {
        let questions = extract_questions("A. sierota\n1. Pytanie\nA. Tak");
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].answers.len(), 1);
    }

    #[test]
    fn ids_continue_across_sections() {
        let text = "\
REGULAMINY I PODSTAWOWE TERMINY
1. Pierwsze
A. Tak
2. Bez odpowiedzi
ŁĄCZNOŚĆ W NIEBEZPIECZEŃSTWIE
1. Drugie
A. Tak
2. Trzecie
B. Nie";
        let questions = extract_with_categories(text);
        let ids: Vec<u32> = questions.iter().filter_map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(
            category_counts(&questions),
            vec![
                ("REGULAMINY I PODSTAWOWE TERMINY".to_string(), 1),
                ("ŁĄCZNOŚĆ W NIEBEZPIECZEŃSTWIE".to_string(), 2),
            ]
        );
    }

    #[test]
    fn no_headings_no_categorized_questions() {
        assert!(extract_with_categories("1. Pytanie\nA. Tak").is_empty());
    }

    #[test]
    fn extraction_is_deterministic() {
        let text = std::fs::read_to_string("tests/fixtures/radio_exam.txt").unwrap();
        assert_eq!(extract_with_categories(&text), extract_with_categories(&text));
        assert_eq!(extract_questions(&text), extract_questions(&text));
    }

    #[test]
    fn radio_exam_fixture() {
        let text = std::fs::read_to_string("tests/fixtures/radio_exam.txt").unwrap();
        let questions = extract_with_categories(&text);
        assert_eq!(questions.len(), 6, "got: {:#?}", questions);
        assert!(questions.iter().all(|q| !q.answers.is_empty()));

        let counts = category_counts(&questions);
        assert_eq!(counts.len(), 2);
        assert_eq!(
            counts[0].0,
            "REGULAMINY I PODSTAWOWE TERMINY ANGLOJĘZYCZNE\nSTOSOWANE W SŁUŻBIE RADIOKOMUNIKACYJNEJ MORSKIEJ"
        );
        assert_eq!(counts[0].1, 3);
        assert_eq!(counts[1], ("PROCEDURY ŁĄCZNOŚCI W NIEBEZPIECZEŃSTWIE".to_string(), 3));

        // Page boundary inside question 3: text continues on the next page.
        let q3 = questions.iter().find(|q| q.number == "3").unwrap();
        assert_eq!(q3.answers.len(), 3);
        assert_eq!(q3.answers[2].text, "kanał 70\nw paśmie VHF");

        // Question 4 has no answers in the fixture and is skipped.
        assert!(questions.iter().all(|q| q.number != "4"));
        let ids: Vec<u32> = questions.iter().filter_map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
    }
}
