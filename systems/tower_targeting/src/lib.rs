#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that computes deterministic tower targets from world snapshots.
//!
//! Each tower picks the enemy in weapon range that is closest to the defended
//! zone, so the most urgent threat is shot first.

use quiz_defence_core::{
    distance_to_defended_zone, EnemyId, EnemyView, GateSnapshot, PlayState, TowerId, TowerTarget,
    TowerView,
};

/// Tower targeting system that reuses scratch buffers to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    tower_workspace: Vec<TowerWorkspace>,
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes tower targets for the provided world snapshot.
    ///
    /// The output buffer is cleared before populating it with the latest
    /// assignments.
    pub fn handle(
        &mut self,
        play_state: PlayState,
        gate: &GateSnapshot,
        towers: &TowerView,
        enemies: &EnemyView,
        out: &mut Vec<TowerTarget>,
    ) {
        out.clear();

        if play_state != PlayState::Running || gate.blocks_progress() {
            return;
        }

        if towers.iter().next().is_none() || enemies.is_empty() {
            return;
        }

        self.prepare_tower_workspace(towers);
        self.prepare_enemy_workspace(enemies);
        if self.enemy_workspace.is_empty() {
            return;
        }

        for tower in &self.tower_workspace {
            let mut best: Option<BestCandidate> = None;

            for candidate in &self.enemy_workspace {
                if (candidate.position - tower.position).abs() > tower.range {
                    continue;
                }

                let current = BestCandidate {
                    zone_distance: candidate.zone_distance,
                    enemy: candidate.id,
                };

                match &mut best {
                    Some(existing) => {
                        if current.precedes(existing) {
                            *existing = current;
                        }
                    }
                    None => best = Some(current),
                }
            }

            if let Some(best_candidate) = best {
                out.push(TowerTarget {
                    tower: tower.id,
                    enemy: best_candidate.enemy,
                    zone_distance: best_candidate.zone_distance,
                });
            }
        }
    }

    fn prepare_tower_workspace(&mut self, towers: &TowerView) {
        self.tower_workspace.clear();
        let (lower, _) = towers.iter().size_hint();
        self.tower_workspace.reserve(lower);

        for snapshot in towers.iter() {
            self.tower_workspace.push(TowerWorkspace {
                id: snapshot.id,
                position: snapshot.position,
                range: snapshot.weapon.stats().range,
            });
        }
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        let (lower, _) = enemies.iter().size_hint();
        self.enemy_workspace.reserve(lower);

        for snapshot in enemies.iter() {
            if snapshot.health.is_zero() {
                continue;
            }

            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
                zone_distance: distance_to_defended_zone(snapshot.position),
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerWorkspace {
    id: TowerId,
    position: f32,
    range: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: f32,
    zone_distance: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BestCandidate {
    zone_distance: f32,
    enemy: EnemyId,
}

impl BestCandidate {
    fn precedes(&self, other: &Self) -> bool {
        if self.zone_distance != other.zone_distance {
            return self.zone_distance < other.zone_distance;
        }

        self.enemy < other.enemy
    }
}

#[cfg(test)]
mod tests {
    use super::{TowerTarget, TowerTargeting};
    use quiz_defence_core::{
        EnemyId, EnemyKind, EnemySnapshot, EnemyView, GateSnapshot, Health, LaneSide, PlayState,
        SlotId, TowerId, TowerSnapshot, TowerView, WeaponKind,
    };

    const OPEN: GateSnapshot = GateSnapshot::Idle { shown: false };

    fn tower(id: u32, position: f32, weapon: WeaponKind) -> TowerSnapshot {
        TowerSnapshot {
            id: TowerId::new(id),
            slot: SlotId::new(id),
            position,
            weapon,
            level: 1,
            cost: weapon.stats().cost,
        }
    }

    fn enemy(id: u32, position: f32) -> EnemySnapshot {
        EnemySnapshot {
            id: EnemyId::new(id),
            kind: EnemyKind::Walker,
            position,
            side: LaneSide::West,
            health: Health::new(4),
            max_health: Health::new(4),
            frozen_ticks: 0,
            poison_ticks: 0,
        }
    }

    #[test]
    fn targets_enemy_within_range() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(1, 15.0, WeaponKind::Blaster)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(2, 30.0)]);

        let mut out = Vec::new();
        system.handle(PlayState::Running, &OPEN, &towers, &enemies, &mut out);

        assert_eq!(
            out,
            vec![TowerTarget {
                tower: TowerId::new(1),
                enemy: EnemyId::new(2),
                zone_distance: 10.0,
            }]
        );
    }

    #[test]
    fn enemy_outside_range_is_ignored() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(1, 85.0, WeaponKind::Flame)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(2, 62.0)]);

        let mut out = Vec::new();
        system.handle(PlayState::Running, &OPEN, &towers, &enemies, &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn enemy_closest_to_zone_is_preferred() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(1, 30.0, WeaponKind::Railgun)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, 10.0), enemy(2, 35.0), enemy(3, 20.0)]);

        let mut out = Vec::new();
        system.handle(PlayState::Running, &OPEN, &towers, &enemies, &mut out);

        assert_eq!(out[0].enemy, EnemyId::new(2));
    }

    #[test]
    fn smaller_enemy_id_is_preferred_when_distances_match() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(1, 45.0, WeaponKind::Railgun)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(20, 30.0), enemy(10, 70.0)]);

        let mut out = Vec::new();
        system.handle(PlayState::Running, &OPEN, &towers, &enemies, &mut out);

        assert_eq!(out.len(), 1);
        assert_eq!(out[0].enemy, EnemyId::new(10));
    }

    #[test]
    fn dead_enemies_are_not_targeted() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(1, 30.0, WeaponKind::Blaster)]);
        let mut dead = enemy(1, 35.0);
        dead.health = Health::new(0);
        let enemies = EnemyView::from_snapshots(vec![dead, enemy(2, 20.0)]);

        let mut out = Vec::new();
        system.handle(PlayState::Running, &OPEN, &towers, &enemies, &mut out);

        assert_eq!(out[0].enemy, EnemyId::new(2));
    }

    #[test]
    fn inactive_sessions_clear_output() {
        let mut system = TowerTargeting::new();
        let towers = TowerView::from_snapshots(vec![tower(1, 15.0, WeaponKind::Blaster)]);
        let enemies = EnemyView::from_snapshots(vec![enemy(1, 20.0)]);

        let mut out = vec![TowerTarget {
            tower: TowerId::new(99),
            enemy: EnemyId::new(99),
            zone_distance: 0.0,
        }];

        system.handle(PlayState::Paused, &OPEN, &towers, &enemies, &mut out);
        assert!(out.is_empty());

        system.handle(
            PlayState::Running,
            &GateSnapshot::Idle { shown: true },
            &towers,
            &enemies,
            &mut out,
        );
        assert!(out.is_empty());
    }

    #[test]
    fn empty_collections_produce_no_targets() {
        let mut system = TowerTargeting::new();
        let mut out = Vec::new();

        system.handle(
            PlayState::Running,
            &OPEN,
            &TowerView::from_snapshots(Vec::new()),
            &EnemyView::from_snapshots(vec![enemy(1, 20.0)]),
            &mut out,
        );
        assert!(out.is_empty());

        system.handle(
            PlayState::Running,
            &OPEN,
            &TowerView::from_snapshots(vec![tower(1, 15.0, WeaponKind::Blaster)]),
            &EnemyView::from_snapshots(Vec::new()),
            &mut out,
        );
        assert!(out.is_empty());
    }
}
