#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Quiz Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod kinds;
mod quiz;

pub use kinds::{EnemyKind, EnemyStats, PowerUpKind, WeaponEffect, WeaponKind, WeaponStats};
pub use quiz::{Question, QuestionDeck, QuestionError, QuestionSource};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Quiz Defence.";

/// Identifier under which best scores are persisted.
pub const GAME_ID: &str = "quiz-defence";

/// Lowest lane coordinate; West enemies spawn here.
pub const LANE_START: f32 = 0.0;
/// Highest lane coordinate; East enemies spawn here.
pub const LANE_END: f32 = 100.0;
/// Midpoint of the lane, origin of player shots.
pub const LANE_CENTER: f32 = 50.0;
/// Lower edge of the defended zone.
pub const DEFENDED_ZONE_START: f32 = 40.0;
/// Upper edge of the defended zone.
pub const DEFENDED_ZONE_END: f32 = 60.0;
/// Radius of the point-circle collision test between projectiles and enemies.
pub const HIT_RADIUS: f32 = 2.0;
/// Player shots only reach enemies within this distance of the lane centre.
pub const PLAYER_SHOT_RANGE: f32 = 40.0;

/// Every wave whose number is divisible by this cadence is a boss wave.
pub const BOSS_WAVE_CADENCE: u32 = 5;
/// Seconds announced before a boss wave spawns.
pub const BOSS_COUNTDOWN_SECONDS: u32 = 3;
/// Highest level a tower can be upgraded to.
pub const MAX_TOWER_LEVEL: u32 = 5;
/// Flat surcharge added to every upgrade price.
pub const UPGRADE_SURCHARGE: u32 = 10;
/// Consecutive correct answers required per streak bonus.
pub const STREAK_BONUS_EVERY: u32 = 5;
/// Ticks an impact or breach effect remains visible.
pub const EFFECT_TTL_TICKS: u32 = 6;
/// Ticks a drop remains collectable.
pub const DROP_TTL_TICKS: u32 = 80;
/// Poison deals damage on every n-th remaining poison tick.
pub const POISON_PULSE_TICKS: u32 = 5;
/// Fraction of base speed retained by frozen enemies.
pub const FROZEN_SPEED_FACTOR: f32 = 0.3;

/// Slot positions used when no explicit layout is configured.
pub const DEFAULT_SLOT_POSITIONS: [f32; 6] = [15.0, 30.0, 45.0, 55.0, 70.0, 85.0];

/// Reports whether a lane coordinate lies inside the defended zone.
#[must_use]
pub fn in_defended_zone(position: f32) -> bool {
    (DEFENDED_ZONE_START..=DEFENDED_ZONE_END).contains(&position)
}

/// Distance from a lane coordinate to the nearest edge of the defended zone.
///
/// Positions inside the zone report zero.
#[must_use]
pub fn distance_to_defended_zone(position: f32) -> f32 {
    if position < DEFENDED_ZONE_START {
        DEFENDED_ZONE_START - position
    } else if position > DEFENDED_ZONE_END {
        position - DEFENDED_ZONE_END
    } else {
        0.0
    }
}

/// Price of upgrading a tower whose accumulated cost is `current_cost`.
#[must_use]
pub const fn upgrade_price(current_cost: u32) -> u32 {
    current_cost / 2 + UPGRADE_SURCHARGE
}

/// Gold refunded when selling a tower whose accumulated cost is `cost`.
#[must_use]
pub const fn sale_refund(cost: u32) -> u32 {
    cost / 2
}

/// Gold granted for answering the gate of `wave` correctly.
#[must_use]
pub const fn gate_bonus(wave: u32) -> u32 {
    10 + wave.saturating_mul(5)
}

/// Reports whether `wave` is a boss wave.
#[must_use]
pub const fn is_boss_wave(wave: u32) -> bool {
    wave > 0 && wave % BOSS_WAVE_CADENCE == 0
}

/// Describes the active lifecycle state of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    /// Ticks advance the simulation.
    Running,
    /// Ticks are ignored until play resumes.
    Paused,
    /// Lives ran out; only a restart is accepted.
    GameOver,
}

/// Side of the lane an enemy enters from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneSide {
    /// Enters at the start of the lane and travels toward increasing positions.
    West,
    /// Enters at the end of the lane and travels toward decreasing positions.
    East,
}

impl LaneSide {
    /// Lane coordinate at which enemies from this side appear.
    #[must_use]
    pub const fn spawn_position(self) -> f32 {
        match self {
            Self::West => LANE_START,
            Self::East => LANE_END,
        }
    }

    /// Sign applied to enemy speed for this side.
    #[must_use]
    pub const fn direction(self) -> f32 {
        match self {
            Self::West => 1.0,
            Self::East => -1.0,
        }
    }

    /// Returns the opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }
}

/// Identifies where a projectile originated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileSource {
    /// Fired automatically by a tower.
    Tower(TowerId),
    /// Fired by a correct combat answer.
    Player,
}

/// Reason recorded alongside a gold credit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreditReason {
    /// Reward for killing an enemy.
    Kill,
    /// Refund for selling a tower.
    Sale,
    /// Bonus for answering a gate correctly.
    GateBonus,
    /// Bonus for a streak of correct combat answers.
    Streak,
    /// Gold cache picked up from a drop.
    Drop,
}

/// Deterministic plan describing the composition of a wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WavePlan {
    wave: u32,
    total: u32,
    boss: bool,
    spawn_interval: Duration,
}

impl WavePlan {
    /// Computes the plan for the provided wave number. Wave zero is treated as one.
    #[must_use]
    pub fn for_wave(wave: u32) -> Self {
        let wave = wave.max(1);
        let boss = is_boss_wave(wave);
        let total = if boss {
            wave.saturating_add(1)
        } else {
            wave.saturating_mul(2).saturating_add(5).min(15)
        };
        let shortened = 2_500_u64.saturating_sub(u64::from(wave).saturating_mul(150));
        let spawn_interval = Duration::from_millis(shortened.max(600));

        Self {
            wave,
            total,
            boss,
            spawn_interval,
        }
    }

    /// Wave number the plan describes.
    #[must_use]
    pub const fn wave(&self) -> u32 {
        self.wave
    }

    /// Total enemies spawned during the wave, boss included.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.total
    }

    /// Reports whether the wave is led by a boss.
    #[must_use]
    pub const fn is_boss(&self) -> bool {
        self.boss
    }

    /// Number of non-boss enemies in the wave.
    #[must_use]
    pub const fn minions(&self) -> u32 {
        if self.boss {
            self.total.saturating_sub(1)
        } else {
            self.total
        }
    }

    /// Delay between consecutive regular spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> Duration {
        self.spawn_interval
    }
}

/// Starting parameters a session is created and restarted with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionRules {
    /// Gold balance at session start.
    pub starting_gold: u32,
    /// Lives at session start.
    pub starting_lives: u32,
    /// Lane coordinate of every tower slot, indexed by [`SlotId`].
    pub slot_positions: Vec<f32>,
}

impl Default for SessionRules {
    fn default() -> Self {
        Self {
            starting_gold: 50,
            starting_lives: 10,
            slot_positions: DEFAULT_SLOT_POSITIONS.to_vec(),
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the session rules and resets the world to a fresh session.
    ConfigureSession {
        /// Rules applied to the fresh session and to later restarts.
        rules: SessionRules,
    },
    /// Resets the world to a fresh session using the current rules.
    Restart,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Pauses or resumes the simulation.
    SetPaused {
        /// Whether ticks should be ignored.
        paused: bool,
    },
    /// Requests that a new enemy enter the lane.
    SpawnEnemy {
        /// Kind of enemy to create.
        kind: EnemyKind,
        /// Side of the lane the enemy enters from.
        side: LaneSide,
    },
    /// Publishes the remaining boss countdown for the current wave.
    AnnounceBoss {
        /// Whole seconds remaining before the boss spawns.
        remaining: u32,
    },
    /// Requests placement of a tower in a slot.
    PlaceTower {
        /// Slot that should hold the tower.
        slot: SlotId,
        /// Weapon mounted on the tower.
        weapon: WeaponKind,
    },
    /// Requests an upgrade of an existing tower.
    UpgradeTower {
        /// Identifier of the tower to upgrade.
        tower: TowerId,
    },
    /// Requests the sale of an existing tower.
    SellTower {
        /// Identifier of the tower to sell.
        tower: TowerId,
    },
    /// Requests that a ready tower fire at the provided enemy.
    FireTower {
        /// Tower that should fire.
        tower: TowerId,
        /// Enemy the projectile is aimed at.
        target: EnemyId,
    },
    /// Changes the weapon used by player shots.
    SelectWeapon {
        /// Weapon to select.
        weapon: WeaponKind,
    },
    /// Resolves one answer of the combat question loop.
    PlayerShot {
        /// Whether the player answered correctly.
        correct: bool,
    },
    /// Activates the quiz gate for the cleared wave.
    OpenGate {
        /// Question the player must answer.
        question: Question,
    },
    /// Answers the active quiz gate.
    AnswerGate {
        /// Index of the option the player selected.
        choice: usize,
    },
    /// Leaves a collectable power-up in the lane.
    SpawnDrop {
        /// Power-up granted on collection.
        kind: PowerUpKind,
        /// Lane coordinate of the drop.
        position: f32,
    },
    /// Collects a drop, applying its power-up.
    CollectDrop {
        /// Drop to collect.
        drop: DropId,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the world was reset to a fresh session.
    SessionReset {
        /// Gold balance of the fresh session.
        gold: u32,
        /// Lives of the fresh session.
        lives: u32,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Announces that the session entered a new play state.
    PlayStateChanged {
        /// State that became active.
        state: PlayState,
    },
    /// Announces that a wave began.
    WaveStarted {
        /// Plan describing the wave.
        plan: WavePlan,
    },
    /// Reports the boss countdown for the current wave.
    BossIncoming {
        /// Wave led by the boss.
        wave: u32,
        /// Whole seconds remaining before the boss spawns.
        remaining: u32,
    },
    /// Confirms that an enemy entered the lane.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Kind of enemy spawned.
        kind: EnemyKind,
        /// Side the enemy entered from.
        side: LaneSide,
        /// Hit points the enemy spawned with.
        hp: u32,
    },
    /// Reports that an enemy reached the defended zone.
    EnemyBreached {
        /// Identifier of the enemy that breached.
        enemy: EnemyId,
        /// Kind of enemy that breached.
        kind: EnemyKind,
    },
    /// Reports lives removed in a single tick or answer.
    LivesLost {
        /// Lives removed.
        amount: u32,
        /// Lives remaining afterwards.
        remaining: u32,
    },
    /// Announces that lives ran out.
    GameOver {
        /// Wave during which the session ended.
        wave: u32,
        /// Final score of the session.
        score: u64,
    },
    /// Confirms that a projectile was created.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Origin of the projectile.
        source: ProjectileSource,
        /// Weapon that produced the projectile.
        weapon: WeaponKind,
        /// Enemy the projectile is aimed at.
        target: EnemyId,
        /// Damage carried by the projectile.
        damage: u32,
    },
    /// Reports that an enemy took damage.
    EnemyDamaged {
        /// Identifier of the damaged enemy.
        enemy: EnemyId,
        /// Damage applied.
        amount: u32,
        /// Hit points remaining afterwards.
        remaining: u32,
    },
    /// Reports that an enemy died and was removed.
    EnemyKilled {
        /// Identifier of the killed enemy.
        enemy: EnemyId,
        /// Kind of the killed enemy.
        kind: EnemyKind,
        /// Lane coordinate at which the enemy died.
        position: f32,
    },
    /// Reports that a correct combat answer found nothing to shoot.
    ShotSkipped,
    /// Reports the streak after a combat answer.
    StreakChanged {
        /// Consecutive correct combat answers.
        streak: u32,
    },
    /// Reports gold credited to the ledger.
    GoldCredited {
        /// Gold credited.
        amount: u32,
        /// Source of the credit.
        reason: CreditReason,
        /// Balance afterwards.
        balance: u32,
    },
    /// Reports score credited for a kill.
    ScoreAwarded {
        /// Score credited.
        amount: u64,
        /// Total score afterwards.
        total: u64,
    },
    /// Confirms that a tower was placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Slot occupied by the tower.
        slot: SlotId,
        /// Weapon mounted on the tower.
        weapon: WeaponKind,
        /// Gold debited.
        cost: u32,
    },
    /// Confirms that a tower was upgraded.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached.
        level: u32,
        /// Gold debited.
        price: u32,
    },
    /// Confirms that a tower was sold.
    TowerSold {
        /// Identifier of the sold tower.
        tower: TowerId,
        /// Slot freed by the sale.
        slot: SlotId,
        /// Gold refunded.
        refund: u32,
    },
    /// Confirms that the player selected a weapon.
    WeaponSelected {
        /// Weapon now used by player shots.
        weapon: WeaponKind,
    },
    /// Announces that every enemy of the wave was dealt with.
    WaveCleared {
        /// Wave that was cleared.
        wave: u32,
    },
    /// Announces that the quiz gate became active.
    GateOpened {
        /// Wave the gate guards.
        wave: u32,
        /// Gold granted for a correct answer.
        bonus: u32,
    },
    /// Announces that the quiz gate was answered.
    GateResolved {
        /// Wave the gate guarded.
        wave: u32,
        /// Whether the answer was correct.
        correct: bool,
        /// Gold credited for the answer.
        bonus_awarded: u32,
    },
    /// Confirms that a drop appeared in the lane.
    DropSpawned {
        /// Identifier assigned to the drop.
        drop: DropId,
        /// Power-up carried by the drop.
        kind: PowerUpKind,
        /// Lane coordinate of the drop.
        position: f32,
    },
    /// Confirms that a drop was collected.
    DropCollected {
        /// Identifier of the collected drop.
        drop: DropId,
        /// Power-up that was applied.
        kind: PowerUpKind,
    },
    /// Reports that a drop disappeared uncollected.
    DropExpired {
        /// Identifier of the expired drop.
        drop: DropId,
    },
    /// Reports that a command was rejected without changing state.
    CommandRejected {
        /// Specific reason the command failed.
        reason: Rejection,
    },
}

/// Reasons a command may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum Rejection {
    /// The requested slot already holds a tower.
    #[error("slot {} already holds a tower", .slot.get())]
    SlotOccupied {
        /// Slot that was requested.
        slot: SlotId,
    },
    /// The ledger cannot cover the requested debit.
    #[error("{required} gold required but only {available} available")]
    InsufficientFunds {
        /// Gold the operation costs.
        required: u32,
        /// Gold currently held.
        available: u32,
    },
    /// No enemy is within range.
    #[error("no enemy within range")]
    NoTarget,
    /// Lives ran out; only a restart is accepted.
    #[error("the game is over; only a restart is accepted")]
    InvalidOperationInGameOver,
    /// No gate is active.
    #[error("no quiz gate is awaiting an answer")]
    GateAlreadyResolved,
    /// The requested slot does not exist.
    #[error("slot {} does not exist", .slot.get())]
    UnknownSlot {
        /// Slot that was requested.
        slot: SlotId,
    },
    /// No tower with the provided identifier exists.
    #[error("tower {} does not exist", .tower.get())]
    MissingTower {
        /// Tower that was requested.
        tower: TowerId,
    },
    /// The tower is already at the highest level.
    #[error("tower {} is already at the maximum level", .tower.get())]
    MaxLevel {
        /// Tower that was requested.
        tower: TowerId,
    },
    /// No drop with the provided identifier exists.
    #[error("drop {} does not exist", .drop.get())]
    MissingDrop {
        /// Drop that was requested.
        drop: DropId,
    },
    /// The selected option does not exist.
    #[error("option {choice} does not exist")]
    InvalidChoice {
        /// Option index that was selected.
        choice: usize,
    },
    /// No combat question is loaded.
    #[error("no combat question is loaded")]
    NoActiveQuestion,
    /// The world accepted a command without reporting its outcome.
    #[error("the command was accepted but reported no outcome")]
    Unacknowledged,
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(u32);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u32) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u32 {
                self.0
            }
        }
    };
}

identifier!(
    /// Unique identifier assigned to an enemy.
    EnemyId
);
identifier!(
    /// Unique identifier assigned to a tower.
    TowerId
);
identifier!(
    /// Unique identifier assigned to a projectile.
    ProjectileId
);
identifier!(
    /// Unique identifier assigned to a drop.
    DropId
);
identifier!(
    /// Index of a tower placement slot.
    SlotId
);

impl SlotId {
    /// Index of the slot inside the configured slot list.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Hit points carried by an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the health value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether no hit points remain.
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Subtracts damage, clamping at zero.
    #[must_use]
    pub const fn saturating_sub(self, damage: u32) -> Self {
        Self(self.0.saturating_sub(damage))
    }
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Kind of the enemy.
    pub kind: EnemyKind,
    /// Lane coordinate of the enemy.
    pub position: f32,
    /// Side the enemy entered from.
    pub side: LaneSide,
    /// Current hit points.
    pub health: Health,
    /// Hit points at spawn.
    pub max_health: Health,
    /// Remaining ticks of slow.
    pub frozen_ticks: u32,
    /// Remaining ticks of poison.
    pub poison_ticks: u32,
}

/// Read-only snapshot describing all enemies in the lane.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Reports whether the view contains no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Slot occupied by the tower.
    pub slot: SlotId,
    /// Lane coordinate of the slot.
    pub position: f32,
    /// Weapon mounted on the tower.
    pub weapon: WeaponKind,
    /// Upgrade level, starting at one.
    pub level: u32,
    /// Gold invested in the tower so far.
    pub cost: u32,
}

/// Read-only snapshot describing all towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Cooldown state of a single tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Identifier of the tower.
    pub tower: TowerId,
    /// Weapon mounted on the tower.
    pub weapon: WeaponKind,
    /// Time remaining until the tower may fire again.
    pub ready_in: Duration,
}

/// Read-only snapshot of every tower's cooldown, sorted by tower.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Iterator over the captured cooldowns in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerCooldownSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerCooldownSnapshot> {
        self.snapshots
    }
}

/// Target assignment computed for a tower.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower that will fire.
    pub tower: TowerId,
    /// Enemy selected as the target.
    pub enemy: EnemyId,
    /// Distance between the enemy and the defended zone.
    pub zone_distance: f32,
}

/// Immutable representation of a projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier of the projectile.
    pub id: ProjectileId,
    /// Lane coordinate of the projectile.
    pub position: f32,
    /// Signed lane units travelled per second.
    pub velocity: f32,
    /// Weapon that produced the projectile.
    pub weapon: WeaponKind,
    /// Damage carried by the projectile.
    pub damage: u32,
    /// Enemy the projectile is aimed at, if any.
    pub target: Option<EnemyId>,
    /// Origin of the projectile.
    pub source: ProjectileSource,
}

/// Immutable representation of a collectable drop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DropSnapshot {
    /// Identifier of the drop.
    pub id: DropId,
    /// Power-up carried by the drop.
    pub kind: PowerUpKind,
    /// Lane coordinate of the drop.
    pub position: f32,
    /// Ticks before the drop expires.
    pub ttl_ticks: u32,
}

/// Category of a transient visual effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectKind {
    /// A projectile struck an enemy.
    Impact,
    /// An enemy died.
    Death,
    /// An enemy reached the defended zone.
    Breach,
}

/// Transient visual effect record; carries no gameplay significance.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectSnapshot {
    /// Category of the effect.
    pub kind: EffectKind,
    /// Lane coordinate of the effect.
    pub position: f32,
    /// Ticks before the effect fades.
    pub ttl_ticks: u32,
}

/// Progress of the current wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveSnapshot {
    /// Plan describing the wave.
    pub plan: WavePlan,
    /// Enemies spawned so far.
    pub spawned: u32,
    /// Remaining boss countdown, if one is running.
    pub boss_countdown: Option<u32>,
}

impl WaveSnapshot {
    /// Reports whether every planned enemy has been spawned.
    #[must_use]
    pub const fn fully_spawned(&self) -> bool {
        self.spawned >= self.plan.total()
    }
}

/// State of the quiz gate as seen by systems and adapters.
#[derive(Clone, Debug, PartialEq)]
pub enum GateSnapshot {
    /// No gate is pending.
    Idle {
        /// Whether the gate for the current wave was already triggered.
        shown: bool,
    },
    /// A gate awaits an answer.
    Active {
        /// Question the player must answer.
        question: Question,
        /// Gold granted for a correct answer.
        bonus: u32,
    },
}

impl GateSnapshot {
    /// Reports whether spawning and auto-fire must be suppressed.
    ///
    /// This covers both an active gate and a cleared wave whose gate has been
    /// triggered but not yet opened.
    #[must_use]
    pub const fn blocks_progress(&self) -> bool {
        matches!(self, Self::Active { .. } | Self::Idle { shown: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn rejection_round_trips_through_bincode() {
        assert_round_trip(&Rejection::InsufficientFunds {
            required: 30,
            available: 20,
        });
    }

    #[test]
    fn session_rules_round_trip_through_bincode() {
        assert_round_trip(&SessionRules::default());
    }

    #[test]
    fn regular_wave_plan_caps_enemy_count() {
        assert_eq!(WavePlan::for_wave(1).total(), 7);
        assert_eq!(WavePlan::for_wave(4).total(), 13);
        assert_eq!(WavePlan::for_wave(6).total(), 15);
        assert_eq!(WavePlan::for_wave(12).total(), 15);
    }

    #[test]
    fn boss_wave_plan_counts_boss_and_escort() {
        let plan = WavePlan::for_wave(5);
        assert!(plan.is_boss());
        assert_eq!(plan.total(), 6);
        assert_eq!(plan.minions(), 5);
    }

    #[test]
    fn spawn_interval_shortens_to_floor() {
        assert_eq!(
            WavePlan::for_wave(1).spawn_interval(),
            Duration::from_millis(2_350)
        );
        assert_eq!(
            WavePlan::for_wave(10).spawn_interval(),
            Duration::from_millis(1_000)
        );
        assert_eq!(
            WavePlan::for_wave(40).spawn_interval(),
            Duration::from_millis(600)
        );
    }

    #[test]
    fn wave_zero_is_treated_as_first_wave() {
        assert_eq!(WavePlan::for_wave(0), WavePlan::for_wave(1));
    }

    #[test]
    fn economy_formulas_match_rules() {
        assert_eq!(upgrade_price(30), 25);
        assert_eq!(sale_refund(55), 27);
        assert_eq!(gate_bonus(3), 25);
    }

    #[test]
    fn defended_zone_distance_is_zero_inside() {
        assert_eq!(distance_to_defended_zone(50.0), 0.0);
        assert_eq!(distance_to_defended_zone(35.0), 5.0);
        assert_eq!(distance_to_defended_zone(72.5), 12.5);
        assert!(in_defended_zone(40.0));
        assert!(!in_defended_zone(39.9));
    }

    #[test]
    fn rejection_messages_are_readable() {
        let message = Rejection::SlotOccupied {
            slot: SlotId::new(2),
        }
        .to_string();
        assert_eq!(message, "slot 2 already holds a tower");
    }
}
