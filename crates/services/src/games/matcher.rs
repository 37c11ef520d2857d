use wonder_core::model::Question;

/// Decides whether a candidate answer satisfies a question.
pub trait AnswerMatcher<Q: Question>: Send + Sync {
    fn is_match(&self, question: &Q, candidate: &str) -> bool;
}

/// Exact string equality, ignoring case.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitiveMatch;

impl<Q: Question> AnswerMatcher<Q> for CaseInsensitiveMatch {
    fn is_match(&self, question: &Q, candidate: &str) -> bool {
        candidate.to_lowercase() == question.expected_answer().to_lowercase()
    }
}

/// First character of the trimmed, uppercased guess against the expected letter.
///
/// Handwriting recognizers return a best-guess string that may carry extra
/// characters; only the first one counts.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstLetterMatch;

impl<Q: Question> AnswerMatcher<Q> for FirstLetterMatch {
    fn is_match(&self, question: &Q, candidate: &str) -> bool {
        let guess = candidate.trim().to_uppercase();
        let expected = question.expected_answer().trim().to_uppercase();
        match (guess.chars().next(), expected.chars().next()) {
            (Some(g), Some(e)) => g == e,
            _ => false,
        }
    }
}
