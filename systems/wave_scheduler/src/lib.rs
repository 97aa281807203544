#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave scheduler responsible for emitting enemy spawn commands.
//!
//! Every wave draws its enemy kinds and entry sides from a `ChaCha8Rng`
//! whose seed is derived from the session seed and the wave number, so a
//! wave plays out identically no matter how the previous waves went.

use std::time::Duration;

use log::{debug, info};
use quiz_defence_core::{
    Command, EnemyKind, Event, GateSnapshot, LaneSide, PlayState, WaveSnapshot,
    BOSS_COUNTDOWN_SECONDS,
};
use rand::{
    distributions::{Distribution, WeightedIndex},
    Rng, SeedableRng,
};
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

const BOSS_COUNTDOWN_STEP: Duration = Duration::from_secs(1);

/// Configuration parameters required to construct the wave scheduler.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided session seed.
    #[must_use]
    pub const fn new(rng_seed: u64) -> Self {
        Self { rng_seed }
    }
}

/// Pure system that paces enemy spawns for the active wave.
#[derive(Debug)]
pub struct WaveScheduler {
    rng_seed: u64,
    wave: u32,
    rng: ChaCha8Rng,
    pool: Vec<EnemyKind>,
    weights: Option<WeightedIndex<u32>>,
    accumulator: Duration,
    boss_countdown: Option<u32>,
}

impl WaveScheduler {
    /// Creates a new scheduler positioned at the first wave.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let mut scheduler = Self {
            rng_seed: config.rng_seed,
            wave: 0,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            pool: Vec::new(),
            weights: None,
            accumulator: Duration::ZERO,
            boss_countdown: None,
        };
        scheduler.begin_wave(1);
        scheduler
    }

    /// Consumes events and immutable views to emit spawn commands.
    pub fn handle(
        &mut self,
        events: &[Event],
        play_state: PlayState,
        wave: &WaveSnapshot,
        gate: &GateSnapshot,
        out: &mut Vec<Command>,
    ) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::SessionReset { .. } => self.begin_wave(1),
                Event::WaveStarted { plan } => self.begin_wave(plan.wave()),
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                _ => {}
            }
        }

        if play_state != PlayState::Running || gate.blocks_progress() || wave.fully_spawned() {
            return;
        }
        if wave.plan.wave() != self.wave {
            self.begin_wave(wave.plan.wave());
        }

        if wave.plan.is_boss() {
            self.pace_boss_wave(wave, accumulated, out);
        } else {
            self.pace_regular_wave(wave, accumulated, out);
        }
    }

    fn begin_wave(&mut self, wave: u32) {
        self.wave = wave.max(1);
        self.rng = ChaCha8Rng::seed_from_u64(derive_wave_seed(self.rng_seed, self.wave));
        let (pool, weights): (Vec<EnemyKind>, Vec<u32>) = EnemyKind::spawn_pool(self.wave).unzip();
        self.weights = WeightedIndex::new(&weights).ok();
        self.pool = pool;
        self.accumulator = Duration::ZERO;
        self.boss_countdown = None;
    }

    fn pace_regular_wave(&mut self, wave: &WaveSnapshot, dt: Duration, out: &mut Vec<Command>) {
        let interval = wave.plan.spawn_interval();
        if interval.is_zero() {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(dt);
        let mut remaining = wave.plan.total().saturating_sub(wave.spawned);
        while remaining > 0 && self.accumulator >= interval {
            self.accumulator -= interval;
            remaining -= 1;
            self.spawn_minion(out);
        }
    }

    fn pace_boss_wave(&mut self, wave: &WaveSnapshot, dt: Duration, out: &mut Vec<Command>) {
        if wave.spawned > 0 {
            return;
        }

        let Some(mut countdown) = self.boss_countdown else {
            info!("boss approaching on wave {}", self.wave);
            self.boss_countdown = Some(BOSS_COUNTDOWN_SECONDS);
            self.accumulator = Duration::ZERO;
            out.push(Command::AnnounceBoss {
                remaining: BOSS_COUNTDOWN_SECONDS,
            });
            return;
        };

        self.accumulator = self.accumulator.saturating_add(dt);
        while countdown > 0 && self.accumulator >= BOSS_COUNTDOWN_STEP {
            self.accumulator -= BOSS_COUNTDOWN_STEP;
            countdown -= 1;
            if countdown > 0 {
                out.push(Command::AnnounceBoss {
                    remaining: countdown,
                });
            }
        }
        self.boss_countdown = Some(countdown);

        if countdown > 0 {
            return;
        }

        let side = self.next_side();
        debug!("spawning boss of wave {} from {side:?}", self.wave);
        out.push(Command::SpawnEnemy {
            kind: EnemyKind::Boss,
            side,
        });
        for _ in 0..wave.plan.minions() {
            self.spawn_minion(out);
        }
    }

    fn spawn_minion(&mut self, out: &mut Vec<Command>) {
        let kind = self.next_kind();
        let side = self.next_side();
        debug!("spawning {kind:?} from {side:?} on wave {}", self.wave);
        out.push(Command::SpawnEnemy { kind, side });
    }

    fn next_kind(&mut self) -> EnemyKind {
        match &self.weights {
            Some(weights) => self.pool[weights.sample(&mut self.rng)],
            None => EnemyKind::Walker,
        }
    }

    fn next_side(&mut self) -> LaneSide {
        if self.rng.gen_bool(0.5) {
            LaneSide::West
        } else {
            LaneSide::East
        }
    }
}

fn derive_wave_seed(session_seed: u64, wave: u32) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(session_seed.to_le_bytes());
    hasher.update(wave.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wave_seeds_differ_per_wave_and_session() {
        let first = derive_wave_seed(7, 1);
        assert_eq!(first, derive_wave_seed(7, 1));
        assert_ne!(first, derive_wave_seed(7, 2));
        assert_ne!(first, derive_wave_seed(8, 1));
    }

    #[test]
    fn first_wave_pool_only_holds_walkers() {
        let mut scheduler = WaveScheduler::new(Config::new(3));
        for _ in 0..32 {
            assert_eq!(scheduler.next_kind(), EnemyKind::Walker);
        }
    }

    #[test]
    fn later_pools_draw_unlocked_kinds_only() {
        let mut scheduler = WaveScheduler::new(Config::new(11));
        scheduler.begin_wave(2);
        for _ in 0..64 {
            let kind = scheduler.next_kind();
            assert!(matches!(kind, EnemyKind::Walker | EnemyKind::Runner), "{kind:?}");
        }
    }
}
