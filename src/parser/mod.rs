pub mod lines;
pub mod questions;
pub mod sections;

use crate::store::Question;

/// Pipeline: pages → document text → (sections) → questions.
pub fn process_pages(pages: &[String], with_categories: bool) -> Vec<Question> {
    let text = crate::pdf::document_text(pages);
    if with_categories {
        questions::extract_with_categories(&text)
    } else {
        questions::extract_questions(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn pdf_fixture_end_to_end() {
        let pages = crate::pdf::read_pages(Path::new("tests/fixtures/radio_exam.pdf")).unwrap();

        let questions = process_pages(&pages, true);
        assert_eq!(
            questions::category_counts(&questions),
            vec![
                ("REGULAMINY I PODSTAWOWE TERMINY".to_string(), 2),
                ("PROCEDURY LACZNOSCI RADIOWEJ".to_string(), 1),
            ]
        );
        let ids: Vec<u32> = questions.iter().filter_map(|q| q.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(questions[0].question, "Co oznacza MAYDAY?");
        assert_eq!(questions[1].answers[1].text, "kanal 70");
        let options: Vec<&str> = questions[2].answers.iter().map(|a| a.option.as_str()).collect();
        assert_eq!(options, vec!["A", "C"]);

        let flat = process_pages(&pages, false);
        assert_eq!(flat.len(), 3);
        assert!(flat.iter().all(|q| q.id.is_none()));
    }
}
