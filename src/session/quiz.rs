use std::collections::HashMap;

/// How an answer option should be drawn once its question is answered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OptionMark {
    Neutral,
    /// The learner picked this option and it was right.
    Correct,
    /// The learner picked this option and it was wrong.
    Incorrect,
    /// Not picked, but it is the right answer to a missed question.
    CorrectAnswer,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnsweredQuestion {
    pub chosen: String,
    pub correct: String,
}

impl AnsweredQuestion {
    pub fn is_correct(&self) -> bool {
        self.chosen == self.correct
    }
}

/// First answer per question is final; `score <= total_answered` always.
#[derive(Clone, Debug, Default)]
pub struct QuizSession {
    answers: HashMap<String, AnsweredQuestion>,
    score: u32,
    total_answered: u32,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when the question was already answered.
    pub fn check_answer(&mut self, question_id: &str, chosen: &str, correct: &str) -> Option<bool> {
        if self.answers.contains_key(question_id) {
            return None;
        }
        let answer = AnsweredQuestion {
            chosen: chosen.to_string(),
            correct: correct.to_string(),
        };
        let is_correct = answer.is_correct();
        self.answers.insert(question_id.to_string(), answer);
        self.total_answered += 1;
        if is_correct {
            self.score += 1;
        }
        Some(is_correct)
    }

    pub fn is_locked(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    pub fn answer(&self, question_id: &str) -> Option<&AnsweredQuestion> {
        self.answers.get(question_id)
    }

    pub fn mark(&self, question_id: &str, value: &str) -> OptionMark {
        let Some(answer) = self.answers.get(question_id) else {
            return OptionMark::Neutral;
        };
        if value == answer.chosen {
            if answer.is_correct() {
                OptionMark::Correct
            } else {
                OptionMark::Incorrect
            }
        } else if value == answer.correct && !answer.is_correct() {
            OptionMark::CorrectAnswer
        } else {
            OptionMark::Neutral
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_answered(&self) -> u32 {
        self.total_answered
    }

    pub fn all_correct(&self) -> bool {
        self.score == self.total_answered
    }

    pub fn reset(&mut self) {
        self.answers.clear();
        self.score = 0;
        self.total_answered = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_answer_marks_both_options() {
        let mut quiz = QuizSession::new();
        assert_eq!(quiz.check_answer("q1", "a", "b"), Some(false));
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.total_answered(), 1);
        assert_eq!(quiz.mark("q1", "a"), OptionMark::Incorrect);
        assert_eq!(quiz.mark("q1", "b"), OptionMark::CorrectAnswer);
        assert_eq!(quiz.mark("q1", "c"), OptionMark::Neutral);
        assert!(quiz.is_locked("q1"));
    }

    #[test]
    fn test_right_answer_marks_only_chosen() {
        let mut quiz = QuizSession::new();
        assert_eq!(quiz.check_answer("q1", "b", "b"), Some(true));
        assert_eq!(quiz.score(), 1);
        assert_eq!(quiz.mark("q1", "b"), OptionMark::Correct);
        assert_eq!(quiz.mark("q1", "a"), OptionMark::Neutral);
        assert!(quiz.all_correct());
    }

    #[test]
    fn test_first_answer_is_final() {
        let mut quiz = QuizSession::new();
        quiz.check_answer("q1", "a", "b");
        assert_eq!(quiz.check_answer("q1", "b", "b"), None);
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.total_answered(), 1);
        assert_eq!(quiz.answer("q1").map(|a| a.chosen.as_str()), Some("a"));
    }

    #[test]
    fn test_score_never_exceeds_answered() {
        let mut quiz = QuizSession::new();
        let plays = [("q1", "a", "a"), ("q2", "b", "c"), ("q1", "x", "a"), ("q3", "d", "d")];
        for (q, chosen, correct) in plays {
            quiz.check_answer(q, chosen, correct);
            assert!(quiz.score() <= quiz.total_answered());
        }
        assert_eq!(quiz.score(), 2);
        assert_eq!(quiz.total_answered(), 3);
        assert!(!quiz.all_correct());
    }

    #[test]
    fn test_reset_unlocks_everything() {
        let mut quiz = QuizSession::new();
        quiz.check_answer("q1", "a", "a");
        quiz.reset();
        assert_eq!(quiz.score(), 0);
        assert_eq!(quiz.total_answered(), 0);
        assert!(!quiz.is_locked("q1"));
        assert_eq!(quiz.mark("q1", "a"), OptionMark::Neutral);
        assert_eq!(quiz.check_answer("q1", "b", "a"), Some(false));
    }
}
