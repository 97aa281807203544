use std::time::Duration;

use quiz_defence_core::{Command, EnemyKind, Event, LaneSide, SlotId, WeaponKind};
use quiz_defence_system_tower_combat::TowerCombat;
use quiz_defence_system_tower_targeting::TowerTargeting;
use quiz_defence_world::{self as world, query, World};

const TICK: Duration = Duration::from_millis(100);

/// Drives the world with the targeting and combat systems and records the
/// tick index of every projectile and kill.
fn replay(weapon: WeaponKind, ticks: usize) -> (World, Vec<usize>, Vec<usize>) {
    let mut world = World::new();
    let mut events = Vec::new();
    for command in [
        Command::PlaceTower {
            slot: SlotId::new(0),
            weapon,
        },
        Command::SpawnEnemy {
            kind: EnemyKind::Walker,
            side: LaneSide::West,
        },
    ] {
        world::apply(&mut world, command, &mut events);
    }

    let mut targeting = TowerTargeting::new();
    let mut combat = TowerCombat::new();
    let mut targets = Vec::new();
    let mut fired = Vec::new();
    let mut kills = Vec::new();

    for tick in 0..ticks {
        events.clear();
        world::apply(&mut world, Command::Tick { dt: TICK }, &mut events);
        if events
            .iter()
            .any(|event| matches!(event, Event::EnemyKilled { .. }))
        {
            kills.push(tick);
        }

        let state = query::play_state(&world);
        let gate = query::gate(&world);
        targeting.handle(
            state,
            &gate,
            &query::tower_view(&world),
            &query::enemy_view(&world),
            &mut targets,
        );
        let mut commands = Vec::new();
        combat.handle(
            state,
            &gate,
            query::tower_cooldowns(&world),
            &targets,
            &mut commands,
        );

        events.clear();
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        if events
            .iter()
            .any(|event| matches!(event, Event::ProjectileFired { .. }))
        {
            fired.push(tick);
        }
    }

    (world, fired, kills)
}

#[test]
fn blaster_kills_approaching_walker() {
    let (world, fired, kills) = replay(WeaponKind::Blaster, 60);

    assert_eq!(kills.len(), 1);
    assert!(fired.len() >= 2, "a walker takes two blaster hits");
    assert_eq!(query::gold(&world), 50 - 30 + 5);
    assert_eq!(query::lives(&world), 10);
}

#[test]
fn shots_respect_weapon_interval() {
    let (_, fired, _) = replay(WeaponKind::Frost, 60);

    assert!(fired.len() >= 2);
    for pair in fired.windows(2) {
        assert!(pair[1] - pair[0] >= 10, "frost fires once per second: {fired:?}");
    }
}

#[test]
fn replays_are_deterministic() {
    let (first_world, first_fired, first_kills) = replay(WeaponKind::Cannon, 80);
    let (second_world, second_fired, second_kills) = replay(WeaponKind::Cannon, 80);

    assert_eq!(first_fired, second_fired);
    assert_eq!(first_kills, second_kills);
    assert_eq!(
        query::enemy_view(&first_world).into_vec(),
        query::enemy_view(&second_world).into_vec()
    );
}
