#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Loot system that rolls power-up drops for killed enemies.

use log::debug;
use quiz_defence_core::{Command, EnemyKind, Event, PowerUpKind};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the loot system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    drop_chance: f64,
    rng_seed: u64,
}

impl Config {
    /// Creates a configuration. `drop_chance` is clamped to `0.0..=1.0`.
    #[must_use]
    pub fn new(drop_chance: f64, rng_seed: u64) -> Self {
        let drop_chance = if drop_chance.is_nan() {
            0.0
        } else {
            drop_chance.clamp(0.0, 1.0)
        };
        Self {
            drop_chance,
            rng_seed,
        }
    }
}

/// Pure system that turns kills into `Command::SpawnDrop` requests.
#[derive(Debug)]
pub struct Loot {
    drop_chance: f64,
    rng_seed: u64,
    rng: ChaCha8Rng,
}

impl Loot {
    /// Creates a new loot system seeded from the configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            drop_chance: config.drop_chance,
            rng_seed: config.rng_seed,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Consumes world events and emits drops for killed enemies.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::SessionReset { .. } => {
                    self.rng = ChaCha8Rng::seed_from_u64(self.rng_seed);
                }
                Event::EnemyKilled { kind, position, .. } => {
                    let guaranteed = *kind == EnemyKind::Boss;
                    if !guaranteed && !self.rng.gen_bool(self.drop_chance) {
                        continue;
                    }

                    let drop = PowerUpKind::ALL[self.rng.gen_range(0..PowerUpKind::ALL.len())];
                    debug!("{kind:?} dropped {drop:?} at {position:.1}");
                    out.push(Command::SpawnDrop {
                        kind: drop,
                        position: *position,
                    });
                }
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_defence_core::EnemyId;

    fn kill(id: u32, kind: EnemyKind) -> Event {
        Event::EnemyKilled {
            enemy: EnemyId::new(id),
            kind,
            position: 22.0,
        }
    }

    #[test]
    fn bosses_always_drop() {
        let mut loot = Loot::new(Config::new(0.0, 5));
        let mut out = Vec::new();

        loot.handle(&[kill(1, EnemyKind::Walker), kill(2, EnemyKind::Boss)], &mut out);

        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], Command::SpawnDrop { position, .. } if position == 22.0));
    }

    #[test]
    fn certain_chance_drops_for_every_kill() {
        let mut loot = Loot::new(Config::new(3.0, 5));
        let mut out = Vec::new();

        let kills: Vec<Event> = (0..10).map(|id| kill(id, EnemyKind::Runner)).collect();
        loot.handle(&kills, &mut out);

        assert_eq!(out.len(), 10);
    }

    #[test]
    fn reset_replays_the_same_rolls() {
        let mut loot = Loot::new(Config::new(0.5, 99));
        let kills: Vec<Event> = (0..40).map(|id| kill(id, EnemyKind::Walker)).collect();

        let mut first = Vec::new();
        loot.handle(&kills, &mut first);

        let mut second = Vec::new();
        loot.handle(&[Event::SessionReset { gold: 50, lives: 10 }], &mut second);
        loot.handle(&kills, &mut second);

        assert_eq!(first, second);
    }
}
