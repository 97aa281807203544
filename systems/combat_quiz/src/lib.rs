#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Rapid-fire question loop that drives the player's weapon.
//!
//! The system always holds exactly one question once loaded. Every valid
//! answer, right or wrong, is turned into a [`Command::PlayerShot`] and is
//! immediately followed by the next question, so the loop never stalls.

use log::debug;
use quiz_defence_core::{Command, Event, Question, QuestionSource, Rejection};

/// Holds the current combat question and grades answers to it.
#[derive(Debug, Default)]
pub struct CombatQuiz {
    topic: Option<String>,
    current: Option<Question>,
}

impl CombatQuiz {
    /// Creates an empty loop that requests questions on the provided topic.
    #[must_use]
    pub fn new(topic: Option<String>) -> Self {
        Self {
            topic,
            current: None,
        }
    }

    /// Question currently awaiting an answer.
    #[must_use]
    pub fn current(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// Replaces the current question with a fresh one from `source`.
    pub fn load(&mut self, source: &mut dyn QuestionSource) {
        self.current = Some(source.next(self.topic.as_deref()));
    }

    /// Reloads the question when the session is reset.
    pub fn handle(&mut self, events: &[Event], source: &mut dyn QuestionSource) {
        if events
            .iter()
            .any(|event| matches!(event, Event::SessionReset { .. }))
        {
            self.load(source);
        }
    }

    /// Grades `choice` against the current question and queues the shot.
    ///
    /// Returns whether the answer was correct. An out-of-range choice is
    /// rejected and keeps the current question.
    pub fn answer(
        &mut self,
        choice: usize,
        source: &mut dyn QuestionSource,
        out: &mut Vec<Command>,
    ) -> Result<bool, Rejection> {
        let question = self.current.as_ref().ok_or(Rejection::NoActiveQuestion)?;
        let correct = question
            .is_correct(choice)
            .ok_or(Rejection::InvalidChoice { choice })?;

        debug!("combat answer to `{}` correct: {correct}", question.prompt());
        out.push(Command::PlayerShot { correct });
        self.load(source);
        Ok(correct)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_defence_core::QuestionDeck;

    fn deck() -> QuestionDeck {
        let make = |prompt: &str, answer: &str| {
            Question::new(prompt, answer, vec!["1".into(), "2".into(), "3".into()])
                .expect("question")
        };
        QuestionDeck::new(vec![make("first", "1"), make("second", "2")]).expect("deck")
    }

    #[test]
    fn answering_without_question_is_rejected() {
        let mut quiz = CombatQuiz::default();
        let mut source = deck();
        let mut out = Vec::new();

        assert_eq!(
            quiz.answer(0, &mut source, &mut out),
            Err(Rejection::NoActiveQuestion)
        );
        assert!(out.is_empty());
    }

    #[test]
    fn both_outcomes_advance_to_next_question() {
        let mut quiz = CombatQuiz::default();
        let mut source = deck();
        let mut out = Vec::new();
        quiz.load(&mut source);

        assert_eq!(quiz.answer(0, &mut source, &mut out), Ok(true));
        assert_eq!(quiz.current().map(Question::prompt), Some("second"));

        assert_eq!(quiz.answer(0, &mut source, &mut out), Ok(false));
        assert_eq!(quiz.current().map(Question::prompt), Some("first"));

        assert_eq!(
            out,
            vec![
                Command::PlayerShot { correct: true },
                Command::PlayerShot { correct: false },
            ]
        );
    }

    #[test]
    fn invalid_choice_keeps_question() {
        let mut quiz = CombatQuiz::default();
        let mut source = deck();
        let mut out = Vec::new();
        quiz.load(&mut source);

        assert_eq!(
            quiz.answer(7, &mut source, &mut out),
            Err(Rejection::InvalidChoice { choice: 7 })
        );
        assert_eq!(quiz.current().map(Question::prompt), Some("first"));
        assert!(out.is_empty());
    }

    #[test]
    fn session_reset_loads_question() {
        let mut quiz = CombatQuiz::new(None);
        let mut source = deck();

        quiz.handle(&[Event::SessionReset { gold: 50, lives: 10 }], &mut source);

        assert!(quiz.current().is_some());
    }
}
