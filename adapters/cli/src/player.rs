//! Scripted player that answers questions with a fixed accuracy and builds towers.

use log::{debug, info};
use quiz_defence_core::{
    upgrade_price, GateSnapshot, Question, SlotId, WeaponKind, LANE_CENTER, MAX_TOWER_LEVEL,
};
use quiz_defence_simulation::{Session, SessionSnapshot};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

const BUILD_ORDER: [WeaponKind; 4] = [
    WeaponKind::Blaster,
    WeaponKind::Frost,
    WeaponKind::Cannon,
    WeaponKind::Tesla,
];

/// Drives a [`Session`] the way a moderately skilled player would.
#[derive(Debug)]
pub(crate) struct AutoPlayer {
    rng: ChaCha8Rng,
    accuracy: f64,
    answer_every: u64,
    built: usize,
}

impl AutoPlayer {
    pub(crate) fn new(accuracy: f64, answer_every: u64, seed: u64) -> Self {
        let accuracy = if accuracy.is_nan() {
            0.0
        } else {
            accuracy.clamp(0.0, 1.0)
        };
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            accuracy,
            answer_every: answer_every.max(1),
            built: 0,
        }
    }

    /// Submits this tick's inputs. Rejections are logged and otherwise ignored.
    pub(crate) fn act(&mut self, session: &mut Session, tick: u64) {
        let snapshot = session.snapshot();

        if let GateSnapshot::Active { question, .. } = &snapshot.gate {
            let choice = self.choose(question);
            match session.answer_gate_question(choice) {
                Ok(correct) => info!("gate `{}` answered, correct: {correct}", question.prompt()),
                Err(reason) => debug!("gate answer refused: {reason}"),
            }
        }

        for drop in &snapshot.drops {
            if let Err(reason) = session.collect_drop(drop.id) {
                debug!("drop {} not collected: {reason}", drop.id.get());
            }
        }

        self.build(session, &snapshot);

        if tick % self.answer_every == 0 {
            if let Some(question) = &snapshot.combat_question {
                let choice = self.choose(question);
                if let Err(reason) = session.answer_combat_question(choice) {
                    debug!("combat answer refused: {reason}");
                }
            }
        }
    }

    fn choose(&mut self, question: &Question) -> usize {
        let correct = question.correct_index();
        if self.rng.gen_bool(self.accuracy) {
            return correct;
        }
        let count = question.options().len();
        (correct + self.rng.gen_range(1..count)) % count
    }

    fn build(&mut self, session: &mut Session, snapshot: &SessionSnapshot) {
        let weapon = BUILD_ORDER[self.built % BUILD_ORDER.len()];
        let positions = &session.config().slot_positions;
        let slot = snapshot.free_slots.iter().copied().min_by(|a, b| {
            let distance = |slot: &SlotId| {
                positions
                    .get(slot.index())
                    .map_or(f32::MAX, |position| (position - LANE_CENTER).abs())
            };
            distance(a).total_cmp(&distance(b))
        });

        if let Some(slot) = slot {
            if snapshot.gold >= weapon.stats().cost {
                match session.place_tower(slot, weapon) {
                    Ok(tower) => {
                        info!("placed {weapon:?} tower {} in slot {}", tower.get(), slot.get());
                        self.built += 1;
                    }
                    Err(reason) => debug!("tower placement refused: {reason}"),
                }
            }
            return;
        }

        let candidate = snapshot
            .towers
            .iter()
            .filter(|tower| tower.level < MAX_TOWER_LEVEL)
            .min_by_key(|tower| (tower.level, tower.id));
        if let Some(tower) = candidate {
            if snapshot.gold >= upgrade_price(tower.cost) {
                match session.upgrade_tower(tower.id) {
                    Ok(level) => info!("tower {} upgraded to level {level}", tower.id.get()),
                    Err(reason) => debug!("upgrade refused: {reason}"),
                }
            }
        }
    }
}
