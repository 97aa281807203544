//! Per-tick movement and projectile resolution.
//!
//! Enemies move and breach first; projectiles are resolved against the
//! survivors afterwards. Damage only lowers health here. Removal and reward
//! crediting happen once, in the world's compaction pass.

use std::cmp::Ordering;

use quiz_defence_core::{
    in_defended_zone, EffectKind, EnemyId, EnemyKind, EnemySnapshot, Event, Health, LaneSide,
    ProjectileId, ProjectileSnapshot, ProjectileSource, WeaponEffect, WeaponKind,
    DEFENDED_ZONE_END, DEFENDED_ZONE_START, FROZEN_SPEED_FACTOR, HIT_RADIUS, LANE_END, LANE_START,
    POISON_PULSE_TICKS,
};

use crate::Effect;

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) side: LaneSide,
    pub(crate) position: f32,
    pub(crate) health: Health,
    pub(crate) max_health: Health,
    pub(crate) frozen_ticks: u32,
    pub(crate) poison_ticks: u32,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, kind: EnemyKind, side: LaneSide, wave: u32) -> Self {
        let max_health = Health::new(kind.max_hp(wave));
        Self {
            id,
            kind,
            side,
            position: side.spawn_position(),
            health: max_health,
            max_health,
            frozen_ticks: 0,
            poison_ticks: 0,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        !self.health.is_zero()
    }

    fn speed_multiplier(&self) -> f32 {
        if self.frozen_ticks > 0 {
            FROZEN_SPEED_FACTOR
        } else {
            1.0
        }
    }

    fn take_damage(&mut self, amount: u32, out_events: &mut Vec<Event>) {
        self.health = self.health.saturating_sub(amount);
        debug_assert!(self.health <= self.max_health);
        out_events.push(Event::EnemyDamaged {
            enemy: self.id,
            amount,
            remaining: self.health.get(),
        });
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            side: self.side,
            health: self.health,
            max_health: self.max_health,
            frozen_ticks: self.frozen_ticks,
            poison_ticks: self.poison_ticks,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) id: ProjectileId,
    pub(crate) position: f32,
    pub(crate) velocity: f32,
    pub(crate) weapon: WeaponKind,
    pub(crate) damage: u32,
    pub(crate) target: Option<EnemyId>,
    pub(crate) source: ProjectileSource,
    hits_remaining: u32,
    struck: Vec<EnemyId>,
}

impl Projectile {
    /// Creates a projectile at `origin` heading toward `aim`.
    pub(crate) fn aimed(
        id: ProjectileId,
        origin: f32,
        aim: f32,
        weapon: WeaponKind,
        damage: u32,
        target: EnemyId,
        source: ProjectileSource,
    ) -> Self {
        let speed = weapon.stats().projectile_speed;
        let velocity = if aim < origin { -speed } else { speed };
        Self {
            id,
            position: origin,
            velocity,
            weapon,
            damage,
            target: Some(target),
            source,
            hits_remaining: weapon.pierce_budget(),
            struck: Vec::new(),
        }
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            weapon: self.weapon,
            damage: self.damage,
            target: self.target,
            source: self.source,
        }
    }
}

/// Applies status decay and movement, removing enemies that breach the
/// defended zone. Returns the breached enemies.
pub(crate) fn advance_enemies(
    enemies: &mut Vec<Enemy>,
    dt_seconds: f32,
    out_events: &mut Vec<Event>,
) -> Vec<Enemy> {
    for enemy in enemies.iter_mut() {
        if !enemy.is_alive() {
            continue;
        }

        if enemy.poison_ticks > 0 {
            if enemy.poison_ticks % POISON_PULSE_TICKS == 0 {
                enemy.take_damage(1, out_events);
            }
            enemy.poison_ticks -= 1;
            if !enemy.is_alive() {
                continue;
            }
        }

        let speed = enemy.kind.stats().speed * enemy.speed_multiplier();
        let step = speed * enemy.side.direction() * dt_seconds;
        let from = enemy.position;
        let to = (from + step).clamp(LANE_START, LANE_END);
        // A long step may jump the whole zone; stop at its near edge instead.
        let (low, high) = if from <= to { (from, to) } else { (to, from) };
        let swept = low <= DEFENDED_ZONE_END && high >= DEFENDED_ZONE_START;
        enemy.position = if swept && !in_defended_zone(to) {
            from.clamp(DEFENDED_ZONE_START, DEFENDED_ZONE_END)
        } else {
            to
        };
        enemy.frozen_ticks = enemy.frozen_ticks.saturating_sub(1);
    }

    let (breached, remaining): (Vec<Enemy>, Vec<Enemy>) = std::mem::take(enemies)
        .into_iter()
        .partition(|enemy| enemy.is_alive() && in_defended_zone(enemy.position));
    *enemies = remaining;

    for enemy in &breached {
        out_events.push(Event::EnemyBreached {
            enemy: enemy.id,
            kind: enemy.kind,
        });
    }

    breached
}

/// Moves projectiles and applies every strike they land this tick.
pub(crate) fn resolve_projectiles(
    enemies: &mut [Enemy],
    projectiles: &mut Vec<Projectile>,
    dt_seconds: f32,
    effects: &mut Vec<Effect>,
    out_events: &mut Vec<Event>,
) {
    let targetable: Vec<bool> = enemies.iter().map(Enemy::is_alive).collect();
    let mut candidates: Vec<(f32, usize)> = Vec::new();

    projectiles.retain_mut(|projectile| {
        if let Some(target) = projectile.target {
            let present = enemies
                .iter()
                .zip(&targetable)
                .any(|(enemy, alive)| *alive && enemy.id == target);
            // Once a piercing shot has landed it keeps flying past its original target.
            if !present && projectile.struck.is_empty() {
                return false;
            }
        }

        let start = projectile.position;
        let end = start + projectile.velocity * dt_seconds;
        let (low, high) = if start <= end { (start, end) } else { (end, start) };

        candidates.clear();
        for (index, enemy) in enemies.iter().enumerate() {
            if !targetable[index] || projectile.struck.contains(&enemy.id) {
                continue;
            }
            if enemy.position + HIT_RADIUS < low || enemy.position - HIT_RADIUS > high {
                continue;
            }
            let travelled = ((enemy.position - start) * projectile.velocity.signum()).max(0.0);
            candidates.push((travelled, index));
        }
        candidates.sort_by(|a, b| {
            a.0.partial_cmp(&b.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| enemies[a.1].id.cmp(&enemies[b.1].id))
        });

        for &(_, index) in candidates.iter() {
            if projectile.hits_remaining == 0 {
                break;
            }
            strike(enemies, &targetable, index, projectile, effects, out_events);
            projectile.struck.push(enemies[index].id);
            projectile.hits_remaining -= 1;
        }

        if projectile.hits_remaining == 0 || !(LANE_START..=LANE_END).contains(&end) {
            return false;
        }

        projectile.position = end;
        true
    });
}

fn strike(
    enemies: &mut [Enemy],
    targetable: &[bool],
    index: usize,
    projectile: &Projectile,
    effects: &mut Vec<Effect>,
    out_events: &mut Vec<Event>,
) {
    let impact = enemies[index].position;
    enemies[index].take_damage(projectile.damage, out_events);
    effects.push(Effect::new(EffectKind::Impact, impact));

    let splash = (projectile.damage / 2).max(1);
    match projectile.weapon.stats().effect {
        WeaponEffect::None | WeaponEffect::Pierce { .. } => {}
        WeaponEffect::Freeze { ticks } => {
            let enemy = &mut enemies[index];
            enemy.frozen_ticks = enemy.frozen_ticks.max(ticks);
        }
        WeaponEffect::Burn { ticks } => {
            let enemy = &mut enemies[index];
            enemy.poison_ticks = enemy.poison_ticks.max(ticks);
        }
        WeaponEffect::Area { radius } => {
            for (other, enemy) in enemies.iter_mut().enumerate() {
                if other == index || !targetable[other] {
                    continue;
                }
                if (enemy.position - impact).abs() <= radius {
                    enemy.take_damage(splash, out_events);
                }
            }
        }
        WeaponEffect::Chain { links, reach } => {
            let mut nearby: Vec<(f32, usize)> = enemies
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != index && targetable[*other])
                .map(|(other, enemy)| ((enemy.position - impact).abs(), other))
                .filter(|(distance, _)| *distance <= reach)
                .collect();
            nearby.sort_by(|a, b| {
                a.0.partial_cmp(&b.0)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| enemies[a.1].id.cmp(&enemies[b.1].id))
            });
            for (_, other) in nearby.into_iter().take(links) {
                enemies[other].take_damage(splash, out_events);
            }
        }
    }
}
