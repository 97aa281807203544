#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Session driver that pumps the world and every system in a fixed order.
//!
//! A [`Session`] owns the authoritative world, the pure systems, the
//! question source, and the score store. Adapters advance it with
//! [`Session::tick`], submit player input through the operation methods,
//! and read [`Session::snapshot`] between ticks.
//!
//! Events produced by player operations are buffered and handed to the
//! systems on the next tick, so systems always observe every world event
//! exactly once.

mod config;
mod scores;

pub use config::SessionConfig;
pub use scores::{MemoryScoreStore, ScoreStore};

use log::{debug, info};
use quiz_defence_core::{
    Command, DropId, DropSnapshot, EffectSnapshot, EnemySnapshot, Event, GateSnapshot, PlayState,
    PowerUpKind, ProjectileSnapshot, Question, QuestionSource, Rejection, SlotId, TowerId,
    TowerSnapshot, TowerTarget, WaveSnapshot, WeaponKind, GAME_ID,
};
use quiz_defence_system_combat_quiz::CombatQuiz;
use quiz_defence_system_loot::{self as loot, Loot};
use quiz_defence_system_quiz_gate::QuizGate;
use quiz_defence_system_tower_combat::TowerCombat;
use quiz_defence_system_tower_targeting::TowerTargeting;
use quiz_defence_system_wave_scheduler::{self as wave_scheduler, WaveScheduler};
use quiz_defence_world::{self as world, query, World};

/// Everything a presentation layer needs to draw one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionSnapshot {
    /// Whether the session is running, paused, or over.
    pub play_state: PlayState,
    /// Number of running ticks processed since the last reset.
    pub tick_index: u64,
    /// Current gold balance.
    pub gold: u32,
    /// Lives remaining.
    pub lives: u32,
    /// Score accumulated this session.
    pub score: u64,
    /// Consecutive correct combat answers.
    pub streak: u32,
    /// Best score known to the score store.
    pub best_score: Option<u64>,
    /// Progress of the current wave.
    pub wave: WaveSnapshot,
    /// Quiz gate state.
    pub gate: GateSnapshot,
    /// Weapon used by player shots.
    pub selected_weapon: WeaponKind,
    /// Ticks of overcharge remaining.
    pub overcharge_ticks: u32,
    /// Combat question awaiting an answer.
    pub combat_question: Option<Question>,
    /// Enemies in the lane, ordered by identifier.
    pub enemies: Vec<EnemySnapshot>,
    /// Towers on the field, ordered by identifier.
    pub towers: Vec<TowerSnapshot>,
    /// Slots that can take a tower.
    pub free_slots: Vec<SlotId>,
    /// Projectiles in flight.
    pub projectiles: Vec<ProjectileSnapshot>,
    /// Drops waiting to be collected.
    pub drops: Vec<DropSnapshot>,
    /// Transient visual effects.
    pub effects: Vec<EffectSnapshot>,
}

struct Systems {
    scheduler: WaveScheduler,
    targeting: TowerTargeting,
    combat: TowerCombat,
    gate: QuizGate,
    combat_quiz: CombatQuiz,
    loot: Loot,
}

impl Systems {
    fn new(config: &SessionConfig) -> Self {
        Self {
            scheduler: WaveScheduler::new(wave_scheduler::Config::new(config.rng_seed)),
            targeting: TowerTargeting::new(),
            combat: TowerCombat::new(),
            gate: QuizGate::new(config.topic.clone()),
            combat_quiz: CombatQuiz::new(config.topic.clone()),
            loot: Loot::new(loot::Config::new(config.drop_chance, config.rng_seed)),
        }
    }
}

/// A single playthrough of Quiz Defence, from first wave to game over.
pub struct Session {
    config: SessionConfig,
    world: World,
    systems: Systems,
    source: Box<dyn QuestionSource>,
    scores: Box<dyn ScoreStore>,
    best_score: Option<u64>,
    pending: Vec<Event>,
    targets: Vec<TowerTarget>,
}

impl Session {
    /// Creates a fresh session at wave one with a combat question loaded.
    #[must_use]
    pub fn new(
        config: SessionConfig,
        source: Box<dyn QuestionSource>,
        scores: Box<dyn ScoreStore>,
    ) -> Self {
        let mut session = Self {
            world: World::with_rules(config.rules()),
            systems: Systems::new(&config),
            best_score: scores.best(GAME_ID),
            config,
            source,
            scores,
            pending: Vec::new(),
            targets: Vec::new(),
        };
        session.reset(Command::ConfigureSession {
            rules: session.config.rules(),
        });
        session
    }

    /// Configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Banner adapters may greet the player with.
    #[must_use]
    pub fn welcome_banner(&self) -> &'static str {
        query::welcome_banner(&self.world)
    }

    /// Advances the session by one fixed tick and returns every event emitted.
    ///
    /// Order within a tick: the world moves enemies, resolves projectiles
    /// and detects wave clears; then loot, the quiz gate and the wave
    /// scheduler react; finally towers pick targets and fire.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut feed = std::mem::take(&mut self.pending);
        let start = feed.len();
        world::apply(
            &mut self.world,
            Command::Tick {
                dt: self.config.tick_duration(),
            },
            &mut feed,
        );
        self.observe(&feed[start..]);

        if query::play_state(&self.world) != PlayState::Running {
            let emitted = feed.split_off(start);
            self.pending = feed;
            return emitted;
        }

        let mut commands = Vec::new();
        self.systems.loot.handle(&feed, &mut commands);
        self.systems
            .gate
            .handle(&feed, &mut *self.source, &mut commands);
        self.systems.scheduler.handle(
            &feed,
            query::play_state(&self.world),
            &query::wave(&self.world),
            &query::gate(&self.world),
            &mut commands,
        );

        let mut produced = Vec::new();
        self.execute(commands, &mut produced);

        let gate = query::gate(&self.world);
        let play_state = query::play_state(&self.world);
        self.systems.targeting.handle(
            play_state,
            &gate,
            &query::tower_view(&self.world),
            &query::enemy_view(&self.world),
            &mut self.targets,
        );
        let mut commands = Vec::new();
        self.systems.combat.handle(
            play_state,
            &gate,
            query::tower_cooldowns(&self.world),
            &self.targets,
            &mut commands,
        );
        self.execute(commands, &mut produced);

        let mut emitted = feed.split_off(start);
        emitted.extend(produced.iter().cloned());
        self.pending = produced;
        emitted
    }

    /// Places a tower with `weapon` in `slot`, debiting its cost.
    pub fn place_tower(&mut self, slot: SlotId, weapon: WeaponKind) -> Result<TowerId, Rejection> {
        let events = self.submit(Command::PlaceTower { slot, weapon })?;
        acknowledged(&events, |event| match event {
            Event::TowerPlaced { tower, .. } => Some(*tower),
            _ => None,
        })
    }

    /// Upgrades `tower` by one level and returns the level reached.
    pub fn upgrade_tower(&mut self, tower: TowerId) -> Result<u32, Rejection> {
        let events = self.submit(Command::UpgradeTower { tower })?;
        acknowledged(&events, |event| match event {
            Event::TowerUpgraded { level, .. } => Some(*level),
            _ => None,
        })
    }

    /// Sells `tower` and returns the gold refunded.
    pub fn sell_tower(&mut self, tower: TowerId) -> Result<u32, Rejection> {
        let events = self.submit(Command::SellTower { tower })?;
        acknowledged(&events, |event| match event {
            Event::TowerSold { refund, .. } => Some(*refund),
            _ => None,
        })
    }

    /// Switches the weapon used by player shots.
    pub fn select_weapon(&mut self, weapon: WeaponKind) -> Result<(), Rejection> {
        let _ = self.submit(Command::SelectWeapon { weapon })?;
        Ok(())
    }

    /// Answers the current combat question and fires or penalises accordingly.
    ///
    /// Returns whether the answer was correct. The next question is loaded
    /// either way.
    pub fn answer_combat_question(&mut self, choice: usize) -> Result<bool, Rejection> {
        if query::play_state(&self.world) == PlayState::GameOver {
            return Err(Rejection::InvalidOperationInGameOver);
        }

        let mut commands = Vec::new();
        let correct = self
            .systems
            .combat_quiz
            .answer(choice, &mut *self.source, &mut commands)?;
        for command in commands {
            let _ = self.submit(command)?;
        }
        Ok(correct)
    }

    /// Answers the active quiz gate and returns whether the answer was correct.
    pub fn answer_gate_question(&mut self, choice: usize) -> Result<bool, Rejection> {
        let events = self.submit(Command::AnswerGate { choice })?;
        acknowledged(&events, |event| match event {
            Event::GateResolved { correct, .. } => Some(*correct),
            _ => None,
        })
    }

    /// Collects `drop` and returns the power-up it granted.
    pub fn collect_drop(&mut self, drop: DropId) -> Result<PowerUpKind, Rejection> {
        let events = self.submit(Command::CollectDrop { drop })?;
        acknowledged(&events, |event| match event {
            Event::DropCollected { kind, .. } => Some(*kind),
            _ => None,
        })
    }

    /// Pauses or resumes the session.
    pub fn set_paused(&mut self, paused: bool) -> Result<(), Rejection> {
        let _ = self.submit(Command::SetPaused { paused })?;
        Ok(())
    }

    /// Returns the session to its canonical fresh state.
    pub fn restart(&mut self) -> Result<(), Rejection> {
        self.reset(Command::Restart);
        Ok(())
    }

    /// Captures the state adapters present to the player.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            play_state: query::play_state(&self.world),
            tick_index: query::tick_index(&self.world),
            gold: query::gold(&self.world),
            lives: query::lives(&self.world),
            score: query::score(&self.world),
            streak: query::streak(&self.world),
            best_score: self.best_score,
            wave: query::wave(&self.world),
            gate: query::gate(&self.world),
            selected_weapon: query::selected_weapon(&self.world),
            overcharge_ticks: query::overcharge_ticks(&self.world),
            combat_question: self.systems.combat_quiz.current().cloned(),
            enemies: query::enemy_view(&self.world).into_vec(),
            towers: query::tower_view(&self.world).into_vec(),
            free_slots: query::free_slots(&self.world),
            projectiles: query::projectiles(&self.world),
            drops: query::drops(&self.world),
            effects: query::effects(&self.world),
        }
    }

    fn reset(&mut self, command: Command) {
        self.systems = Systems::new(&self.config);
        self.pending.clear();
        self.targets.clear();
        self.best_score = self.scores.best(GAME_ID);

        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.systems
            .combat_quiz
            .handle(&events, &mut *self.source);
        info!(
            "session reset with {} gold and {} lives",
            query::gold(&self.world),
            query::lives(&self.world)
        );
    }

    fn submit(&mut self, command: Command) -> Result<Vec<Event>, Rejection> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        if let Some(reason) = rejection(&events) {
            debug!("player command rejected: {reason}");
            return Err(reason);
        }

        self.observe(&events);
        self.pending.extend(events.iter().cloned());
        Ok(events)
    }

    fn execute(&mut self, commands: Vec<Command>, out: &mut Vec<Event>) {
        for command in commands {
            let start = out.len();
            world::apply(&mut self.world, command, out);
            if let Some(reason) = rejection(&out[start..]) {
                debug!("system command rejected: {reason}");
            }
        }
    }

    fn observe(&mut self, events: &[Event]) {
        for event in events {
            if let Event::GameOver { wave, score } = event {
                info!("game over on wave {wave} with score {score}");
                self.record_best(*score);
            }
        }
    }

    fn record_best(&mut self, score: u64) {
        if self.best_score.is_some_and(|best| best >= score) {
            return;
        }

        info!("new best score {score}");
        self.scores.record(GAME_ID, score);
        self.best_score = Some(score);
    }
}

/// Picks the outcome event of an accepted player command.
///
/// Every accepted player command reports its outcome, so a miss is a world bug.
/// Release builds surface it as [`Rejection::Unacknowledged`].
fn acknowledged<T>(
    events: &[Event],
    outcome: impl FnMut(&Event) -> Option<T>,
) -> Result<T, Rejection> {
    let found = events.iter().find_map(outcome);
    debug_assert!(found.is_some(), "accepted command reported no outcome");
    found.ok_or(Rejection::Unacknowledged)
}

fn rejection(events: &[Event]) -> Option<Rejection> {
    events.iter().find_map(|event| match event {
        Event::CommandRejected { reason } => Some(*reason),
        _ => None,
    })
}
