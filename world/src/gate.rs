//! Quiz gate state machine guarding the transition between waves.

use quiz_defence_core::{gate_bonus, GateSnapshot, Question, Rejection};

#[derive(Clone, Debug, PartialEq)]
enum GatePhase {
    Idle,
    Active { question: Question, bonus: u32 },
}

/// Outcome of a successfully answered gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct GateAnswer {
    pub(crate) correct: bool,
    pub(crate) bonus: u32,
}

/// Tracks the gate for the current wave.
///
/// `shown` is raised when the wave is cleared and stays raised until the
/// gate is answered, so a cleared wave can trigger at most one gate.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct QuizGate {
    phase: GatePhase,
    shown: bool,
}

impl QuizGate {
    pub(crate) const fn new() -> Self {
        Self {
            phase: GatePhase::Idle,
            shown: false,
        }
    }

    /// Marks the current wave's gate as triggered. Returns `false` if it
    /// already was.
    pub(crate) fn trigger(&mut self) -> bool {
        if self.shown || self.phase != GatePhase::Idle {
            return false;
        }
        self.shown = true;
        true
    }

    /// Activates a triggered gate and returns the bonus at stake.
    pub(crate) fn open(&mut self, question: Question, wave: u32) -> Option<u32> {
        if !self.shown || self.phase != GatePhase::Idle {
            return None;
        }

        let bonus = gate_bonus(wave);
        self.phase = GatePhase::Active { question, bonus };
        Some(bonus)
    }

    /// Resolves the active gate, returning to idle for the next wave.
    pub(crate) fn answer(&mut self, choice: usize) -> Result<GateAnswer, Rejection> {
        let GatePhase::Active { question, bonus } = &self.phase else {
            return Err(Rejection::GateAlreadyResolved);
        };

        let Some(correct) = question.is_correct(choice) else {
            return Err(Rejection::InvalidChoice { choice });
        };

        let bonus = if correct { *bonus } else { 0 };
        self.phase = GatePhase::Idle;
        self.shown = false;
        Ok(GateAnswer { correct, bonus })
    }

    pub(crate) fn snapshot(&self) -> GateSnapshot {
        match &self.phase {
            GatePhase::Idle => GateSnapshot::Idle { shown: self.shown },
            GatePhase::Active { question, bonus } => GateSnapshot::Active {
                question: question.clone(),
                bonus: *bonus,
            },
        }
    }

    /// Reports whether spawning and tower fire must pause.
    pub(crate) fn blocks_progress(&self) -> bool {
        self.shown || self.phase != GatePhase::Idle
    }
}
