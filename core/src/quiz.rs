//! Question contracts shared by the quiz gate and the combat answer loop.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A multiple-choice question supplied by a [`QuestionSource`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    correct_answer: String,
    options: Vec<String>,
}

impl Question {
    /// Builds a question, validating that the correct answer is offered.
    pub fn new(
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        options: Vec<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let correct_answer = correct_answer.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }

        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions {
                count: options.len(),
            });
        }

        if !options.iter().any(|option| *option == correct_answer) {
            return Err(QuestionError::AnswerNotOffered {
                answer: correct_answer,
            });
        }

        Ok(Self {
            prompt,
            correct_answer,
            options,
        })
    }

    /// Text shown to the player.
    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The option that answers the question.
    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// Options presented to the player, in display order.
    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Index of the correct option.
    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.options
            .iter()
            .position(|option| *option == self.correct_answer)
            .unwrap_or_default()
    }

    /// Reports whether the option at `choice` is the correct one.
    ///
    /// Returns `None` when `choice` does not index an option.
    #[must_use]
    pub fn is_correct(&self, choice: usize) -> Option<bool> {
        self.options
            .get(choice)
            .map(|option| *option == self.correct_answer)
    }
}

/// Reasons a question cannot be constructed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum QuestionError {
    /// The prompt contained no visible text.
    #[error("question prompt is empty")]
    EmptyPrompt,
    /// Fewer than two options were supplied.
    #[error("question offers {count} option(s), at least two are required")]
    TooFewOptions {
        /// Number of options supplied.
        count: usize,
    },
    /// The correct answer is missing from the options.
    #[error("correct answer `{answer}` is not among the options")]
    AnswerNotOffered {
        /// The answer that could not be found.
        answer: String,
    },
}

/// External oracle that supplies questions on demand.
///
/// Implementations may be called at any rate and must not touch simulation
/// state.
pub trait QuestionSource {
    /// Produces the next question, optionally restricted to a topic.
    fn next(&mut self, topic: Option<&str>) -> Question;
}

impl<S: QuestionSource + ?Sized> QuestionSource for Box<S> {
    fn next(&mut self, topic: Option<&str>) -> Question {
        (**self).next(topic)
    }
}

/// Question source that cycles through a fixed list.
#[derive(Clone, Debug)]
pub struct QuestionDeck {
    questions: Vec<Question>,
    cursor: usize,
}

impl QuestionDeck {
    /// Creates a deck from the provided questions.
    ///
    /// Returns `None` when `questions` is empty.
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }

        Some(Self {
            questions,
            cursor: 0,
        })
    }
}

impl QuestionSource for QuestionDeck {
    fn next(&mut self, _topic: Option<&str>) -> Question {
        let question = self.questions[self.cursor % self.questions.len()].clone();
        self.cursor = (self.cursor + 1) % self.questions.len();
        question
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_owned()).collect()
    }

    #[test]
    fn rejects_answer_missing_from_options() {
        let error = Question::new("2 + 2", "4", options(&["3", "5"])).unwrap_err();
        assert_eq!(
            error,
            QuestionError::AnswerNotOffered {
                answer: "4".to_owned()
            }
        );
    }

    #[test]
    fn rejects_single_option() {
        let error = Question::new("2 + 2", "4", options(&["4"])).unwrap_err();
        assert_eq!(error, QuestionError::TooFewOptions { count: 1 });
    }

    #[test]
    fn choice_is_checked_by_index() {
        let question = Question::new("2 + 2", "4", options(&["3", "4", "5"])).unwrap();
        assert_eq!(question.correct_index(), 1);
        assert_eq!(question.is_correct(1), Some(true));
        assert_eq!(question.is_correct(0), Some(false));
        assert_eq!(question.is_correct(9), None);
    }

    #[test]
    fn deck_cycles_in_order() {
        let first = Question::new("a", "1", options(&["1", "2"])).unwrap();
        let second = Question::new("b", "2", options(&["1", "2"])).unwrap();
        let mut deck = QuestionDeck::new(vec![first.clone(), second.clone()]).unwrap();

        assert_eq!(deck.next(None), first);
        assert_eq!(deck.next(None), second);
        assert_eq!(deck.next(Some("math")), first);
    }
}
