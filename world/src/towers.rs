//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use quiz_defence_core::{SlotId, TowerCooldownSnapshot, TowerId, TowerSnapshot, WeaponKind};

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Slot occupied by the tower.
    pub(crate) slot: SlotId,
    /// Lane coordinate of the slot.
    pub(crate) position: f32,
    /// Weapon mounted on the tower.
    pub(crate) weapon: WeaponKind,
    /// Upgrade level, starting at one.
    pub(crate) level: u32,
    /// Gold invested so far; drives upgrade prices and refunds.
    pub(crate) cost: u32,
    /// Simulation time of the most recent shot.
    pub(crate) last_fired: Option<Duration>,
}

impl TowerState {
    /// Time remaining before the tower may fire again at `now`.
    pub(crate) fn ready_in(&self, now: Duration) -> Duration {
        match self.last_fired {
            None => Duration::ZERO,
            Some(fired) => {
                let since = now.saturating_sub(fired);
                self.weapon.stats().fire_interval.saturating_sub(since)
            }
        }
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            slot: self.slot,
            position: self.position,
            weapon: self.weapon,
            level: self.level,
            cost: self.cost,
        }
    }

    pub(crate) fn cooldown(&self, now: Duration) -> TowerCooldownSnapshot {
        TowerCooldownSnapshot {
            tower: self.id,
            weapon: self.weapon,
            ready_in: self.ready_in(now),
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Tower currently standing in `slot`, if any.
    pub(crate) fn occupant(&self, slot: SlotId) -> Option<TowerId> {
        self.entries
            .values()
            .find(|tower| tower.slot == slot)
            .map(|tower| tower.id)
    }

    /// Stores a new level-one tower and returns its identifier.
    pub(crate) fn insert(
        &mut self,
        slot: SlotId,
        position: f32,
        weapon: WeaponKind,
        cost: u32,
    ) -> TowerId {
        debug_assert!(self.occupant(slot).is_none(), "slot holds two towers");

        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().wrapping_add(1));
        let previous = self.entries.insert(
            id,
            TowerState {
                id,
                slot,
                position,
                weapon,
                level: 1,
                cost,
                last_fired: None,
            },
        );
        debug_assert!(previous.is_none(), "tower identifier reused");
        id
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        self.entries.remove(&id)
    }

    /// Towers in identifier order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }
}
