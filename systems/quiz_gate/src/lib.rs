#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Quiz gate system that fetches a checkpoint question whenever a wave clears.
//!
//! The world raises [`Event::WaveCleared`] at most once per wave; this system
//! answers it with a single [`Command::OpenGate`]. Resolution is driven by
//! the player through [`Command::AnswerGate`].

use log::info;
use quiz_defence_core::{Command, Event, QuestionSource};

/// Pure system that opens the quiz gate between waves.
#[derive(Debug, Default)]
pub struct QuizGate {
    topic: Option<String>,
}

impl QuizGate {
    /// Creates a gate system that requests questions on the provided topic.
    #[must_use]
    pub fn new(topic: Option<String>) -> Self {
        Self { topic }
    }

    /// Consumes world events and emits `Command::OpenGate` for cleared waves.
    pub fn handle(
        &mut self,
        events: &[Event],
        source: &mut dyn QuestionSource,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            match event {
                Event::WaveCleared { wave } => {
                    let question = source.next(self.topic.as_deref());
                    info!("wave {wave} cleared, gate asks: {}", question.prompt());
                    out.push(Command::OpenGate { question });
                }
                Event::GateResolved {
                    wave,
                    correct,
                    bonus_awarded,
                } => {
                    info!("gate of wave {wave} resolved (correct: {correct}, bonus: {bonus_awarded})");
                }
                _ => {}
            }
        }
    }
}
