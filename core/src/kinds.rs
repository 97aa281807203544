//! Closed attribute tables for enemy, weapon, and power-up kinds.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Species of enemy that can walk the lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Baseline enemy available from the first wave.
    Walker,
    /// Fragile but fast enemy unlocked at wave two.
    Runner,
    /// Slow, durable enemy unlocked at wave three.
    Tank,
    /// Airborne enemy unlocked at wave four.
    Flyer,
    /// Boss that leads every boss wave.
    Boss,
}

/// Per-kind enemy attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyStats {
    /// Hit points granted before wave scaling.
    pub base_hp: u32,
    /// Additional hit points granted per wave number.
    pub hp_per_wave: u32,
    /// Lane units travelled per second when unimpeded.
    pub speed: f32,
    /// Gold credited when the enemy is killed.
    pub reward: u32,
    /// Score credited when the enemy is killed.
    pub score: u64,
    /// Lives removed when the enemy breaches the defended zone.
    pub lane_damage: u32,
    /// First wave at which the kind joins the regular spawn pool.
    pub unlock_wave: u32,
    /// Relative weight inside the regular spawn pool.
    pub pool_weight: u32,
}

const WALKER: EnemyStats = EnemyStats {
    base_hp: 3,
    hp_per_wave: 1,
    speed: 4.0,
    reward: 5,
    score: 10,
    lane_damage: 1,
    unlock_wave: 1,
    pool_weight: 6,
};

const RUNNER: EnemyStats = EnemyStats {
    base_hp: 2,
    hp_per_wave: 1,
    speed: 7.0,
    reward: 6,
    score: 15,
    lane_damage: 1,
    unlock_wave: 2,
    pool_weight: 3,
};

const TANK: EnemyStats = EnemyStats {
    base_hp: 8,
    hp_per_wave: 2,
    speed: 2.5,
    reward: 12,
    score: 30,
    lane_damage: 2,
    unlock_wave: 3,
    pool_weight: 2,
};

const FLYER: EnemyStats = EnemyStats {
    base_hp: 4,
    hp_per_wave: 1,
    speed: 5.5,
    reward: 8,
    score: 20,
    lane_damage: 1,
    unlock_wave: 4,
    pool_weight: 2,
};

const BOSS: EnemyStats = EnemyStats {
    base_hp: 20,
    hp_per_wave: 5,
    speed: 2.0,
    reward: 50,
    score: 200,
    lane_damage: 5,
    unlock_wave: u32::MAX,
    pool_weight: 0,
};

impl EnemyKind {
    /// Every enemy kind in table order.
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Walker,
        EnemyKind::Runner,
        EnemyKind::Tank,
        EnemyKind::Flyer,
        EnemyKind::Boss,
    ];

    /// Attribute table row for the kind.
    #[must_use]
    pub const fn stats(self) -> &'static EnemyStats {
        match self {
            Self::Walker => &WALKER,
            Self::Runner => &RUNNER,
            Self::Tank => &TANK,
            Self::Flyer => &FLYER,
            Self::Boss => &BOSS,
        }
    }

    /// Maximum hit points of the kind when spawned during `wave`.
    #[must_use]
    pub const fn max_hp(self, wave: u32) -> u32 {
        let stats = self.stats();
        stats
            .base_hp
            .saturating_add(stats.hp_per_wave.saturating_mul(wave))
    }

    /// Reports whether the kind participates in the regular pool for `wave`.
    #[must_use]
    pub const fn unlocked_at(self, wave: u32) -> bool {
        let stats = self.stats();
        stats.pool_weight > 0 && wave >= stats.unlock_wave
    }

    /// Weighted spawn pool for non-boss spawns during `wave`.
    pub fn spawn_pool(wave: u32) -> impl Iterator<Item = (EnemyKind, u32)> {
        Self::ALL
            .into_iter()
            .filter(move |kind| kind.unlocked_at(wave))
            .map(|kind| (kind, kind.stats().pool_weight))
    }
}

/// Secondary behaviour triggered when a projectile strikes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum WeaponEffect {
    /// Damage only.
    None,
    /// Sets the struck enemy's frozen countdown.
    Freeze {
        /// Ticks the enemy remains slowed.
        ticks: u32,
    },
    /// Sets the struck enemy's poison countdown.
    Burn {
        /// Ticks the enemy keeps taking poison damage.
        ticks: u32,
    },
    /// Splashes reduced damage around the impact point.
    Area {
        /// Radius around the impact point in lane units.
        radius: f32,
    },
    /// Arcs reduced damage to the nearest other enemies.
    Chain {
        /// Number of additional enemies struck.
        links: usize,
        /// Maximum lane distance of a chained enemy from the impact point.
        reach: f32,
    },
    /// Continues past the first impact.
    Pierce {
        /// Number of distinct enemies the projectile may strike.
        hits: u32,
    },
}

/// Weapon carried by towers and by the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Cheap single-target weapon.
    Blaster,
    /// Slows the struck enemy.
    Frost,
    /// Poisons the struck enemy.
    Flame,
    /// Area damage around the impact.
    Cannon,
    /// Chains to nearby enemies.
    Tesla,
    /// Pierces through several enemies.
    Railgun,
}

/// Per-kind weapon attributes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeaponStats {
    /// Purchase price of a tower carrying the weapon.
    pub cost: u32,
    /// Damage dealt per projectile at level one.
    pub base_damage: u32,
    /// Targeting range in lane units when mounted on a tower.
    pub range: f32,
    /// Minimum time between consecutive tower shots.
    pub fire_interval: Duration,
    /// Projectile speed in lane units per second.
    pub projectile_speed: f32,
    /// Secondary behaviour applied on impact.
    pub effect: WeaponEffect,
}

const BLASTER: WeaponStats = WeaponStats {
    cost: 30,
    base_damage: 2,
    range: 25.0,
    fire_interval: Duration::from_millis(800),
    projectile_speed: 60.0,
    effect: WeaponEffect::None,
};

const FROST: WeaponStats = WeaponStats {
    cost: 40,
    base_damage: 1,
    range: 20.0,
    fire_interval: Duration::from_millis(1_000),
    projectile_speed: 50.0,
    effect: WeaponEffect::Freeze { ticks: 20 },
};

const FLAME: WeaponStats = WeaponStats {
    cost: 45,
    base_damage: 1,
    range: 18.0,
    fire_interval: Duration::from_millis(900),
    projectile_speed: 50.0,
    effect: WeaponEffect::Burn { ticks: 30 },
};

const CANNON: WeaponStats = WeaponStats {
    cost: 60,
    base_damage: 3,
    range: 22.0,
    fire_interval: Duration::from_millis(1_500),
    projectile_speed: 40.0,
    effect: WeaponEffect::Area { radius: 8.0 },
};

const TESLA: WeaponStats = WeaponStats {
    cost: 70,
    base_damage: 2,
    range: 24.0,
    fire_interval: Duration::from_millis(1_200),
    projectile_speed: 80.0,
    effect: WeaponEffect::Chain {
        links: 2,
        reach: 15.0,
    },
};

const RAILGUN: WeaponStats = WeaponStats {
    cost: 80,
    base_damage: 4,
    range: 35.0,
    fire_interval: Duration::from_millis(2_000),
    projectile_speed: 120.0,
    effect: WeaponEffect::Pierce { hits: 3 },
};

impl WeaponKind {
    /// Every weapon kind in table order.
    pub const ALL: [WeaponKind; 6] = [
        WeaponKind::Blaster,
        WeaponKind::Frost,
        WeaponKind::Flame,
        WeaponKind::Cannon,
        WeaponKind::Tesla,
        WeaponKind::Railgun,
    ];

    /// Attribute table row for the weapon.
    #[must_use]
    pub const fn stats(self) -> &'static WeaponStats {
        match self {
            Self::Blaster => &BLASTER,
            Self::Frost => &FROST,
            Self::Flame => &FLAME,
            Self::Cannon => &CANNON,
            Self::Tesla => &TESLA,
            Self::Railgun => &RAILGUN,
        }
    }

    /// Damage a tower of this kind deals at the provided upgrade level.
    #[must_use]
    pub const fn damage_at(self, level: u32) -> u32 {
        self.stats().base_damage.saturating_mul(level)
    }

    /// Number of distinct enemies a projectile of this kind may strike.
    #[must_use]
    pub const fn pierce_budget(self) -> u32 {
        match self.stats().effect {
            WeaponEffect::Pierce { hits } => hits,
            _ => 1,
        }
    }
}

/// Power-up left behind by a killed enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Credits a lump of gold when collected.
    GoldCache,
    /// Multiplies player shot damage for a number of ticks.
    Overcharge,
}

impl PowerUpKind {
    /// Every power-up kind in table order.
    pub const ALL: [PowerUpKind; 2] = [PowerUpKind::GoldCache, PowerUpKind::Overcharge];

    /// Gold credited on collection.
    #[must_use]
    pub const fn gold(self) -> u32 {
        match self {
            Self::GoldCache => 15,
            Self::Overcharge => 0,
        }
    }

    /// Ticks of weapon buff granted on collection.
    #[must_use]
    pub const fn buff_ticks(self) -> u32 {
        match self {
            Self::GoldCache => 0,
            Self::Overcharge => 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boss_hp_scales_with_wave() {
        assert_eq!(EnemyKind::Boss.max_hp(5), 45);
        assert_eq!(EnemyKind::Boss.max_hp(10), 70);
    }

    #[test]
    fn spawn_pool_unlocks_by_wave() {
        let kinds = |wave| {
            EnemyKind::spawn_pool(wave)
                .map(|(kind, _)| kind)
                .collect::<Vec<_>>()
        };

        assert_eq!(kinds(1), vec![EnemyKind::Walker]);
        assert_eq!(kinds(2), vec![EnemyKind::Walker, EnemyKind::Runner]);
        assert_eq!(
            kinds(3),
            vec![EnemyKind::Walker, EnemyKind::Runner, EnemyKind::Tank]
        );
        assert_eq!(
            kinds(4),
            vec![
                EnemyKind::Walker,
                EnemyKind::Runner,
                EnemyKind::Tank,
                EnemyKind::Flyer
            ]
        );
    }

    #[test]
    fn boss_never_enters_regular_pool() {
        assert!(EnemyKind::spawn_pool(500).all(|(kind, _)| kind != EnemyKind::Boss));
    }

    #[test]
    fn damage_scales_with_level_only() {
        assert_eq!(WeaponKind::Blaster.damage_at(1), 2);
        assert_eq!(WeaponKind::Blaster.damage_at(3), 6);
        assert_eq!(
            WeaponKind::Blaster.stats().fire_interval,
            Duration::from_millis(800)
        );
    }

    #[test]
    fn only_railgun_pierces() {
        for weapon in WeaponKind::ALL {
            let expected = if weapon == WeaponKind::Railgun { 3 } else { 1 };
            assert_eq!(weapon.pierce_budget(), expected, "{weapon:?}");
        }
    }

    #[test]
    fn effects_compare_by_parameters() {
        assert_eq!(
            WeaponKind::Cannon.stats().effect,
            WeaponEffect::Area { radius: 8.0 }
        );
        assert_ne!(
            WeaponKind::Cannon.stats().effect,
            WeaponEffect::Area { radius: 4.0 }
        );
        assert_ne!(WeaponKind::Frost.stats().effect, WeaponEffect::None);
    }
}
