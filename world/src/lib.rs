#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Quiz Defence.
//!
//! The world owns every piece of mutable session state: the gold ledger,
//! lives, score, the current wave, the quiz gate, and all lane entities.
//! It changes only through [`apply`] and reports each change as an
//! [`Event`]. Rejected commands leave the state untouched and surface as
//! [`Event::CommandRejected`].

mod combat;
mod economy;
mod gate;
mod towers;

use std::{cmp::Ordering, time::Duration};

use combat::{Enemy, Projectile};
use economy::Ledger;
use gate::QuizGate;
use towers::TowerRegistry;

use quiz_defence_core::{
    sale_refund, upgrade_price, Command, CreditReason, DropId, EffectKind, EnemyId, EnemyKind,
    Event, LaneSide, PlayState, PowerUpKind, ProjectileId, ProjectileSource, Question, Rejection,
    SessionRules, SlotId, TowerId, WavePlan, WeaponKind, DROP_TTL_TICKS, EFFECT_TTL_TICKS,
    LANE_CENTER, MAX_TOWER_LEVEL, PLAYER_SHOT_RANGE, STREAK_BONUS_EVERY, WELCOME_BANNER,
};

/// Transient visual effect; decays every running tick.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Effect {
    kind: EffectKind,
    position: f32,
    ttl_ticks: u32,
}

impl Effect {
    pub(crate) const fn new(kind: EffectKind, position: f32) -> Self {
        Self {
            kind,
            position,
            ttl_ticks: EFFECT_TTL_TICKS,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct LaneDrop {
    id: DropId,
    kind: PowerUpKind,
    position: f32,
    ttl_ticks: u32,
}

#[derive(Clone, Copy, Debug)]
struct WaveState {
    plan: WavePlan,
    spawned: u32,
    boss_countdown: Option<u32>,
}

impl WaveState {
    fn start(wave: u32) -> Self {
        Self {
            plan: WavePlan::for_wave(wave),
            spawned: 0,
            boss_countdown: None,
        }
    }

    fn fully_spawned(&self) -> bool {
        self.spawned >= self.plan.total()
    }
}

/// Represents the authoritative Quiz Defence world state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    rules: SessionRules,
    play_state: PlayState,
    tick_index: u64,
    elapsed: Duration,
    ledger: Ledger,
    lives: u32,
    score: u64,
    streak: u32,
    selected_weapon: WeaponKind,
    overcharge_ticks: u32,
    wave: WaveState,
    gate: QuizGate,
    enemies: Vec<Enemy>,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    drops: Vec<LaneDrop>,
    effects: Vec<Effect>,
    next_enemy_id: EnemyId,
    next_projectile_id: ProjectileId,
    next_drop_id: DropId,
}

impl World {
    /// Creates a new world using the default session rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(SessionRules::default())
    }

    /// Creates a new world at wave one using the provided session rules.
    #[must_use]
    pub fn with_rules(rules: SessionRules) -> Self {
        Self {
            banner: WELCOME_BANNER,
            play_state: PlayState::Running,
            tick_index: 0,
            elapsed: Duration::ZERO,
            ledger: Ledger::new(rules.starting_gold),
            lives: rules.starting_lives,
            score: 0,
            streak: 0,
            selected_weapon: WeaponKind::Blaster,
            overcharge_ticks: 0,
            wave: WaveState::start(1),
            gate: QuizGate::new(),
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            drops: Vec::new(),
            effects: Vec::new(),
            next_enemy_id: EnemyId::new(0),
            next_projectile_id: ProjectileId::new(0),
            next_drop_id: DropId::new(0),
            rules,
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        let rules = std::mem::take(&mut self.rules);
        *self = Self::with_rules(rules);
        out_events.push(Event::SessionReset {
            gold: self.ledger.balance(),
            lives: self.lives,
        });
        out_events.push(Event::WaveStarted {
            plan: self.wave.plan,
        });
    }

    fn reject(reason: Rejection, out_events: &mut Vec<Event>) {
        out_events.push(Event::CommandRejected { reason });
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().wrapping_add(1));
        id
    }

    fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().wrapping_add(1));
        id
    }

    fn allocate_drop_id(&mut self) -> DropId {
        let id = self.next_drop_id;
        self.next_drop_id = DropId::new(id.get().wrapping_add(1));
        id
    }

    fn credit(&mut self, amount: u32, reason: CreditReason, out_events: &mut Vec<Event>) {
        let balance = self.ledger.credit(amount);
        out_events.push(Event::GoldCredited {
            amount,
            reason,
            balance,
        });
    }

    /// Removes lives and enters the game over state when none remain.
    /// Returns `true` if the session ended.
    fn lose_lives(&mut self, amount: u32, out_events: &mut Vec<Event>) -> bool {
        self.lives = self.lives.saturating_sub(amount);
        out_events.push(Event::LivesLost {
            amount,
            remaining: self.lives,
        });

        if self.lives > 0 {
            return false;
        }

        self.play_state = PlayState::GameOver;
        self.projectiles.clear();
        out_events.push(Event::PlayStateChanged {
            state: PlayState::GameOver,
        });
        out_events.push(Event::GameOver {
            wave: self.wave.plan.wave(),
            score: self.score,
        });
        true
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.play_state != PlayState::Running {
            return;
        }

        self.tick_index = self.tick_index.saturating_add(1);
        self.elapsed = self.elapsed.saturating_add(dt);
        out_events.push(Event::TimeAdvanced { dt });

        let dt_seconds = dt.as_secs_f32();
        let breached = combat::advance_enemies(&mut self.enemies, dt_seconds, out_events);
        if !breached.is_empty() {
            let mut lane_damage = 0_u32;
            for enemy in &breached {
                self.effects
                    .push(Effect::new(EffectKind::Breach, enemy.position));
                lane_damage = lane_damage.saturating_add(enemy.kind.stats().lane_damage);
            }
            if self.lose_lives(lane_damage, out_events) {
                return;
            }
        }

        combat::resolve_projectiles(
            &mut self.enemies,
            &mut self.projectiles,
            dt_seconds,
            &mut self.effects,
            out_events,
        );
        self.compact_dead(out_events);
        self.decay(out_events);
        self.detect_wave_clear(out_events);
    }

    fn compact_dead(&mut self, out_events: &mut Vec<Event>) {
        if self.enemies.iter().all(Enemy::is_alive) {
            return;
        }

        let (alive, dead): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(&mut self.enemies)
            .into_iter()
            .partition(Enemy::is_alive);
        self.enemies = alive;

        for enemy in dead {
            let stats = enemy.kind.stats();
            self.effects
                .push(Effect::new(EffectKind::Death, enemy.position));
            out_events.push(Event::EnemyKilled {
                enemy: enemy.id,
                kind: enemy.kind,
                position: enemy.position,
            });
            self.credit(stats.reward, CreditReason::Kill, out_events);
            self.score = self.score.saturating_add(stats.score);
            out_events.push(Event::ScoreAwarded {
                amount: stats.score,
                total: self.score,
            });
        }
    }

    fn decay(&mut self, out_events: &mut Vec<Event>) {
        self.effects.retain_mut(|effect| {
            effect.ttl_ticks = effect.ttl_ticks.saturating_sub(1);
            effect.ttl_ticks > 0
        });

        self.drops.retain_mut(|drop| {
            drop.ttl_ticks = drop.ttl_ticks.saturating_sub(1);
            if drop.ttl_ticks > 0 {
                return true;
            }
            out_events.push(Event::DropExpired { drop: drop.id });
            false
        });

        self.overcharge_ticks = self.overcharge_ticks.saturating_sub(1);
    }

    fn detect_wave_clear(&mut self, out_events: &mut Vec<Event>) {
        if !self.wave.fully_spawned() || !self.enemies.is_empty() {
            return;
        }

        if self.gate.trigger() {
            out_events.push(Event::WaveCleared {
                wave: self.wave.plan.wave(),
            });
        }
    }

    fn spawn_enemy(&mut self, kind: EnemyKind, side: LaneSide, out_events: &mut Vec<Event>) {
        if self.play_state != PlayState::Running
            || self.wave.fully_spawned()
            || self.gate.blocks_progress()
        {
            return;
        }
        if kind == EnemyKind::Boss {
            let boss_present = self.enemies.iter().any(|enemy| enemy.kind == EnemyKind::Boss);
            if !self.wave.plan.is_boss() || boss_present || self.wave.boss_countdown.is_none() {
                return;
            }
            self.wave.boss_countdown = None;
        }

        let id = self.allocate_enemy_id();
        let enemy = Enemy::spawn(id, kind, side, self.wave.plan.wave());
        out_events.push(Event::EnemySpawned {
            enemy: id,
            kind,
            side,
            hp: enemy.health.get(),
        });
        self.enemies.push(enemy);
        self.wave.spawned += 1;
    }

    fn announce_boss(&mut self, remaining: u32, out_events: &mut Vec<Event>) {
        if self.play_state != PlayState::Running
            || !self.wave.plan.is_boss()
            || self.wave.spawned > 0
        {
            return;
        }

        self.wave.boss_countdown = Some(remaining);
        out_events.push(Event::BossIncoming {
            wave: self.wave.plan.wave(),
            remaining,
        });
    }

    fn place_tower(&mut self, slot: SlotId, weapon: WeaponKind, out_events: &mut Vec<Event>) {
        let Some(&position) = self.rules.slot_positions.get(slot.index()) else {
            Self::reject(Rejection::UnknownSlot { slot }, out_events);
            return;
        };
        if self.towers.occupant(slot).is_some() {
            Self::reject(Rejection::SlotOccupied { slot }, out_events);
            return;
        }

        let cost = weapon.stats().cost;
        if let Err(reason) = self.ledger.debit(cost) {
            Self::reject(reason, out_events);
            return;
        }

        let tower = self.towers.insert(slot, position, weapon, cost);
        out_events.push(Event::TowerPlaced {
            tower,
            slot,
            weapon,
            cost,
        });
    }

    fn upgrade_tower(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        let Some(state) = self.towers.get_mut(tower) else {
            Self::reject(Rejection::MissingTower { tower }, out_events);
            return;
        };
        if state.level >= MAX_TOWER_LEVEL {
            Self::reject(Rejection::MaxLevel { tower }, out_events);
            return;
        }

        let price = upgrade_price(state.cost);
        if let Err(reason) = self.ledger.debit(price) {
            Self::reject(reason, out_events);
            return;
        }

        state.level += 1;
        state.cost = state.cost.saturating_add(price);
        out_events.push(Event::TowerUpgraded {
            tower,
            level: state.level,
            price,
        });
    }

    fn sell_tower(&mut self, tower: TowerId, out_events: &mut Vec<Event>) {
        let Some(state) = self.towers.remove(tower) else {
            Self::reject(Rejection::MissingTower { tower }, out_events);
            return;
        };

        let refund = sale_refund(state.cost);
        out_events.push(Event::TowerSold {
            tower,
            slot: state.slot,
            refund,
        });
        self.credit(refund, CreditReason::Sale, out_events);
    }

    fn fire_tower(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        if self.play_state != PlayState::Running || self.gate.blocks_progress() {
            return;
        }
        let Some(state) = self.towers.get(tower) else {
            return;
        };
        if !state.ready_in(self.elapsed).is_zero() {
            return;
        }
        let Some(enemy) = self
            .enemies
            .iter()
            .find(|enemy| enemy.id == target && enemy.is_alive())
        else {
            return;
        };

        let stats = state.weapon.stats();
        if (enemy.position - state.position).abs() > stats.range {
            return;
        }

        let (origin, aim, weapon, damage) = (
            state.position,
            enemy.position,
            state.weapon,
            state.weapon.damage_at(state.level),
        );
        let source = ProjectileSource::Tower(tower);
        self.launch(origin, aim, weapon, damage, target, source, out_events);

        if let Some(state) = self.towers.get_mut(tower) {
            state.last_fired = Some(self.elapsed);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn launch(
        &mut self,
        origin: f32,
        aim: f32,
        weapon: WeaponKind,
        damage: u32,
        target: EnemyId,
        source: ProjectileSource,
        out_events: &mut Vec<Event>,
    ) {
        let id = self.allocate_projectile_id();
        self.projectiles.push(Projectile::aimed(
            id, origin, aim, weapon, damage, target, source,
        ));
        out_events.push(Event::ProjectileFired {
            projectile: id,
            source,
            weapon,
            target,
            damage,
        });
    }

    fn player_shot(&mut self, correct: bool, out_events: &mut Vec<Event>) {
        if !correct {
            self.streak = 0;
            out_events.push(Event::StreakChanged { streak: 0 });
            let _ = self.lose_lives(1, out_events);
            return;
        }

        self.streak = self.streak.saturating_add(1);
        out_events.push(Event::StreakChanged {
            streak: self.streak,
        });
        if self.streak % STREAK_BONUS_EVERY == 0 {
            self.credit(
                self.streak.saturating_mul(2),
                CreditReason::Streak,
                out_events,
            );
        }

        let Some((target, aim)) = self.nearest_to_center() else {
            out_events.push(Event::ShotSkipped);
            return;
        };

        let weapon = self.selected_weapon;
        let multiplier = if self.overcharge_ticks > 0 { 2 } else { 1 };
        let damage = weapon.stats().base_damage.saturating_mul(multiplier);
        self.launch(
            LANE_CENTER,
            aim,
            weapon,
            damage,
            target,
            ProjectileSource::Player,
            out_events,
        );
    }

    fn nearest_to_center(&self) -> Option<(EnemyId, f32)> {
        self.enemies
            .iter()
            .filter(|enemy| enemy.is_alive())
            .map(|enemy| (enemy, (enemy.position - LANE_CENTER).abs()))
            .filter(|(_, distance)| *distance <= PLAYER_SHOT_RANGE)
            .min_by(|(a, a_distance), (b, b_distance)| {
                a_distance
                    .partial_cmp(b_distance)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .map(|(enemy, _)| (enemy.id, enemy.position))
    }

    fn open_gate(&mut self, question: Question, out_events: &mut Vec<Event>) {
        let wave = self.wave.plan.wave();
        if let Some(bonus) = self.gate.open(question, wave) {
            out_events.push(Event::GateOpened { wave, bonus });
        }
    }

    fn answer_gate(&mut self, choice: usize, out_events: &mut Vec<Event>) {
        let answer = match self.gate.answer(choice) {
            Ok(answer) => answer,
            Err(reason) => {
                Self::reject(reason, out_events);
                return;
            }
        };

        let wave = self.wave.plan.wave();
        out_events.push(Event::GateResolved {
            wave,
            correct: answer.correct,
            bonus_awarded: answer.bonus,
        });
        if answer.bonus > 0 {
            self.credit(answer.bonus, CreditReason::GateBonus, out_events);
        }

        self.wave = WaveState::start(wave.saturating_add(1));
        out_events.push(Event::WaveStarted {
            plan: self.wave.plan,
        });
    }

    fn spawn_drop(&mut self, kind: PowerUpKind, position: f32, out_events: &mut Vec<Event>) {
        let id = self.allocate_drop_id();
        self.drops.push(LaneDrop {
            id,
            kind,
            position,
            ttl_ticks: DROP_TTL_TICKS,
        });
        out_events.push(Event::DropSpawned {
            drop: id,
            kind,
            position,
        });
    }

    fn collect_drop(&mut self, drop: DropId, out_events: &mut Vec<Event>) {
        let Some(index) = self.drops.iter().position(|candidate| candidate.id == drop) else {
            Self::reject(Rejection::MissingDrop { drop }, out_events);
            return;
        };

        let collected = self.drops.remove(index);
        out_events.push(Event::DropCollected {
            drop,
            kind: collected.kind,
        });

        let gold = collected.kind.gold();
        if gold > 0 {
            self.credit(gold, CreditReason::Drop, out_events);
        }
        self.overcharge_ticks = self.overcharge_ticks.max(collected.kind.buff_ticks());
    }

    fn set_paused(&mut self, paused: bool, out_events: &mut Vec<Event>) {
        let state = if paused {
            PlayState::Paused
        } else {
            PlayState::Running
        };
        if self.play_state == state {
            return;
        }

        self.play_state = state;
        out_events.push(Event::PlayStateChanged { state });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    let resets = matches!(
        command,
        Command::Restart | Command::ConfigureSession { .. } | Command::Tick { .. }
    );
    if world.play_state == PlayState::GameOver && !resets {
        World::reject(Rejection::InvalidOperationInGameOver, out_events);
        return;
    }

    match command {
        Command::ConfigureSession { rules } => {
            world.rules = rules;
            world.reset(out_events);
        }
        Command::Restart => world.reset(out_events),
        Command::Tick { dt } => world.tick(dt, out_events),
        Command::SetPaused { paused } => world.set_paused(paused, out_events),
        Command::SpawnEnemy { kind, side } => world.spawn_enemy(kind, side, out_events),
        Command::AnnounceBoss { remaining } => world.announce_boss(remaining, out_events),
        Command::PlaceTower { slot, weapon } => world.place_tower(slot, weapon, out_events),
        Command::UpgradeTower { tower } => world.upgrade_tower(tower, out_events),
        Command::SellTower { tower } => world.sell_tower(tower, out_events),
        Command::FireTower { tower, target } => world.fire_tower(tower, target, out_events),
        Command::SelectWeapon { weapon } => {
            world.selected_weapon = weapon;
            out_events.push(Event::WeaponSelected { weapon });
        }
        Command::PlayerShot { correct } => world.player_shot(correct, out_events),
        Command::OpenGate { question } => world.open_gate(question, out_events),
        Command::AnswerGate { choice } => world.answer_gate(choice, out_events),
        Command::SpawnDrop { kind, position } => world.spawn_drop(kind, position, out_events),
        Command::CollectDrop { drop } => world.collect_drop(drop, out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::World;
    use quiz_defence_core::{
        DropSnapshot, EffectSnapshot, EnemyView, GateSnapshot, PlayState, ProjectileSnapshot,
        SessionRules, SlotId, TowerCooldownView, TowerView, WaveSnapshot, WeaponKind,
    };

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Rules the session was configured with and restarts return to.
    #[must_use]
    pub fn rules(world: &World) -> &SessionRules {
        &world.rules
    }

    /// Current lifecycle state of the session.
    #[must_use]
    pub fn play_state(world: &World) -> PlayState {
        world.play_state
    }

    /// Total simulated time of the session.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.elapsed
    }

    /// Number of running ticks processed since the last reset.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Current gold balance.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.ledger.balance()
    }

    /// Lives remaining.
    #[must_use]
    pub fn lives(world: &World) -> u32 {
        world.lives
    }

    /// Score accumulated from kills.
    #[must_use]
    pub fn score(world: &World) -> u64 {
        world.score
    }

    /// Consecutive correct combat answers.
    #[must_use]
    pub fn streak(world: &World) -> u32 {
        world.streak
    }

    /// Weapon used by player shots.
    #[must_use]
    pub fn selected_weapon(world: &World) -> WeaponKind {
        world.selected_weapon
    }

    /// Ticks of Overcharge remaining on player shots.
    #[must_use]
    pub fn overcharge_ticks(world: &World) -> u32 {
        world.overcharge_ticks
    }

    /// Progress of the current wave.
    #[must_use]
    pub fn wave(world: &World) -> WaveSnapshot {
        WaveSnapshot {
            plan: world.wave.plan,
            spawned: world.wave.spawned,
            boss_countdown: world.wave.boss_countdown,
        }
    }

    /// State of the quiz gate.
    #[must_use]
    pub fn gate(world: &World) -> GateSnapshot {
        world.gate.snapshot()
    }

    /// Captures a read-only view of the enemies in the lane.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of the placed towers.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures the cooldown of every tower at the current simulation time.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(
            world
                .towers
                .iter()
                .map(|tower| tower.cooldown(world.elapsed))
                .collect(),
        )
    }

    /// Slots that currently hold no tower, in slot order.
    #[must_use]
    pub fn free_slots(world: &World) -> Vec<SlotId> {
        (0..world.rules.slot_positions.len())
            .filter_map(|index| u32::try_from(index).ok())
            .map(SlotId::new)
            .filter(|slot| world.towers.occupant(*slot).is_none())
            .collect()
    }

    /// Projectiles in flight, in firing order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Collectable drops, in spawn order.
    #[must_use]
    pub fn drops(world: &World) -> Vec<DropSnapshot> {
        world
            .drops
            .iter()
            .map(|drop| DropSnapshot {
                id: drop.id,
                kind: drop.kind,
                position: drop.position,
                ttl_ticks: drop.ttl_ticks,
            })
            .collect()
    }

    /// Transient visual effects.
    #[must_use]
    pub fn effects(world: &World) -> Vec<EffectSnapshot> {
        world
            .effects
            .iter()
            .map(|effect| EffectSnapshot {
                kind: effect.kind,
                position: effect.position,
                ttl_ticks: effect.ttl_ticks,
            })
            .collect()
    }
}
