#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that turns target assignments into tower fire commands.
//!
//! This is the only auto-fire path: a tower fires when its per-weapon
//! interval has elapsed since its previous shot and it holds a target.

use quiz_defence_core::{
    Command, GateSnapshot, PlayState, TowerCooldownView, TowerId, TowerTarget,
};

/// Auto-fire driver for placed towers.
#[derive(Debug, Default)]
pub struct TowerCombat {
    ready: Vec<TowerId>,
}

impl TowerCombat {
    /// Creates the system with an empty readiness buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a `Command::FireTower` for every targeted tower whose interval has elapsed.
    ///
    /// Nothing fires outside [`PlayState::Running`] or while the quiz gate holds the wave.
    /// Commands follow the order of `tower_targets`.
    pub fn handle(
        &mut self,
        play_state: PlayState,
        gate: &GateSnapshot,
        tower_cooldowns: TowerCooldownView,
        tower_targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        let halted = play_state != PlayState::Running || gate.blocks_progress();
        if halted || tower_targets.is_empty() {
            return;
        }

        // The view is sorted by tower id, so the filtered ids are too.
        self.ready.clear();
        self.ready.extend(
            tower_cooldowns
                .iter()
                .filter(|cooldown| cooldown.ready_in.is_zero())
                .map(|cooldown| cooldown.tower),
        );

        let ready = &self.ready;
        out.extend(
            tower_targets
                .iter()
                .filter(|assignment| ready.binary_search(&assignment.tower).is_ok())
                .map(|assignment| Command::FireTower {
                    tower: assignment.tower,
                    target: assignment.enemy,
                }),
        );
    }
}
