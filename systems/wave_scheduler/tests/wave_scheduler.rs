use std::time::Duration;

use quiz_defence_core::{
    Command, EnemyKind, Event, GateSnapshot, PlayState, Question, SessionRules, WavePlan,
    WaveSnapshot,
};
use quiz_defence_system_wave_scheduler::{Config, WaveScheduler};
use quiz_defence_world::{self as world, query, World};

const TICK: Duration = Duration::from_millis(100);

fn fresh_world() -> (World, Vec<Event>) {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureSession {
            rules: SessionRules {
                starting_lives: 1_000,
                ..SessionRules::default()
            },
        },
        &mut events,
    );
    (world, events)
}

/// Runs the world and scheduler together, returning every spawn command issued.
fn replay(seed: u64, ticks: usize) -> (World, Vec<Command>) {
    let (mut world, mut events) = fresh_world();
    let mut scheduler = WaveScheduler::new(Config::new(seed));
    let mut issued = Vec::new();

    for _ in 0..ticks {
        world::apply(&mut world, Command::Tick { dt: TICK }, &mut events);

        let mut commands = Vec::new();
        scheduler.handle(
            &events,
            query::play_state(&world),
            &query::wave(&world),
            &query::gate(&world),
            &mut commands,
        );
        events.clear();

        for command in commands {
            issued.push(command.clone());
            world::apply(&mut world, command, &mut events);
        }
    }

    (world, issued)
}

#[test]
fn first_wave_stops_after_seven_spawns() {
    let (world, issued) = replay(0x5eed, 600);

    assert_eq!(issued.len(), 7);
    assert!(issued
        .iter()
        .all(|command| matches!(command, Command::SpawnEnemy { kind: EnemyKind::Walker, .. })));
    assert!(query::wave(&world).fully_spawned());
}

#[test]
fn first_spawn_waits_one_interval() {
    let (_, before) = replay(1, 23);
    let (_, after) = replay(1, 24);

    assert!(before.is_empty(), "2.3 s is shorter than the first interval");
    assert_eq!(after.len(), 1);
}

#[test]
fn identical_seeds_replay_identically() {
    let (_, first) = replay(42, 400);
    let (_, second) = replay(42, 400);
    assert_eq!(first, second);
}

#[test]
fn no_spawns_while_gate_blocks() {
    let mut scheduler = WaveScheduler::new(Config::new(9));
    let wave = WaveSnapshot {
        plan: WavePlan::for_wave(1),
        spawned: 0,
        boss_countdown: None,
    };
    let question = Question::new("1 + 1", "2", vec!["2".into(), "3".into()]).expect("question");
    let mut commands = Vec::new();

    for gate in [
        GateSnapshot::Idle { shown: true },
        GateSnapshot::Active { question, bonus: 15 },
    ] {
        scheduler.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(30),
            }],
            PlayState::Running,
            &wave,
            &gate,
            &mut commands,
        );
    }

    assert!(commands.is_empty());
}

#[test]
fn paused_sessions_do_not_spawn() {
    let mut scheduler = WaveScheduler::new(Config::new(9));
    let wave = WaveSnapshot {
        plan: WavePlan::for_wave(1),
        spawned: 0,
        boss_countdown: None,
    };
    let mut commands = Vec::new();

    for state in [PlayState::Paused, PlayState::GameOver] {
        scheduler.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(30),
            }],
            state,
            &wave,
            &GateSnapshot::Idle { shown: false },
            &mut commands,
        );
    }

    assert!(commands.is_empty());
}

#[test]
fn spawn_issued_before_a_pause_is_ignored_by_the_world() {
    let (mut world, mut events) = fresh_world();
    let mut scheduler = WaveScheduler::new(Config::new(1));
    let mut commands = Vec::new();

    for _ in 0..24 {
        world::apply(&mut world, Command::Tick { dt: TICK }, &mut events);
        scheduler.handle(
            &events,
            query::play_state(&world),
            &query::wave(&world),
            &query::gate(&world),
            &mut commands,
        );
        events.clear();
    }
    assert_eq!(commands.len(), 1, "first interval elapsed");

    world::apply(&mut world, Command::SetPaused { paused: true }, &mut events);
    events.clear();
    for command in commands {
        world::apply(&mut world, command, &mut events);
    }

    assert!(events.is_empty());
    assert!(query::enemy_view(&world).is_empty());
    assert_eq!(query::wave(&world).spawned, 0);
}

#[test]
fn boss_wave_counts_down_then_spawns_boss_with_escort() {
    let plan = WavePlan::for_wave(5);
    let wave = WaveSnapshot {
        plan,
        spawned: 0,
        boss_countdown: None,
    };
    let gate = GateSnapshot::Idle { shown: false };
    let mut scheduler = WaveScheduler::new(Config::new(77));
    let mut commands = Vec::new();

    scheduler.handle(
        &[Event::WaveStarted { plan }, Event::TimeAdvanced { dt: TICK }],
        PlayState::Running,
        &wave,
        &gate,
        &mut commands,
    );
    assert_eq!(commands, vec![Command::AnnounceBoss { remaining: 3 }]);

    for _ in 0..3 {
        scheduler.handle(
            &[Event::TimeAdvanced {
                dt: Duration::from_secs(1),
            }],
            PlayState::Running,
            &wave,
            &gate,
            &mut commands,
        );
    }

    let announcements: Vec<u32> = commands
        .iter()
        .filter_map(|command| match command {
            Command::AnnounceBoss { remaining } => Some(*remaining),
            _ => None,
        })
        .collect();
    assert_eq!(announcements, vec![3, 2, 1]);

    let spawned: Vec<EnemyKind> = commands
        .iter()
        .filter_map(|command| match command {
            Command::SpawnEnemy { kind, .. } => Some(*kind),
            _ => None,
        })
        .collect();
    assert_eq!(spawned.len(), 6);
    assert_eq!(spawned[0], EnemyKind::Boss);
    assert!(spawned[1..].iter().all(|kind| *kind != EnemyKind::Boss));
}
