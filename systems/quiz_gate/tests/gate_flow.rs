use std::time::Duration;

use quiz_defence_core::{
    Command, EnemyKind, GateSnapshot, LaneSide, Question, QuestionDeck, SessionRules,
};
use quiz_defence_system_quiz_gate::QuizGate;
use quiz_defence_world::{self as world, query, World};

fn deck() -> QuestionDeck {
    QuestionDeck::new(vec![
        Question::new("9 - 4", "5", vec!["5".into(), "4".into()]).expect("question"),
    ])
    .expect("deck")
}

#[test]
fn cleared_wave_blocks_until_gate_answered() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(
        &mut world,
        Command::ConfigureSession {
            rules: SessionRules {
                starting_lives: 50,
                ..SessionRules::default()
            },
        },
        &mut events,
    );
    for _ in 0..7 {
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Walker,
                side: LaneSide::East,
            },
            &mut events,
        );
    }

    let mut gate = QuizGate::default();
    let mut source = deck();
    let mut opened = 0;
    for _ in 0..300 {
        events.clear();
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(100),
            },
            &mut events,
        );

        let mut commands = Vec::new();
        gate.handle(&events, &mut source, &mut commands);
        for command in commands {
            opened += 1;
            world::apply(&mut world, command, &mut events);
        }
    }

    assert_eq!(opened, 1, "one gate per cleared wave");
    assert!(matches!(
        query::gate(&world),
        GateSnapshot::Active { bonus: 15, .. }
    ));

    let extra_spawn = {
        let mut out = Vec::new();
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                kind: EnemyKind::Walker,
                side: LaneSide::West,
            },
            &mut out,
        );
        out
    };
    assert!(extra_spawn.is_empty(), "no spawning while the gate is active");

    let mut out = Vec::new();
    world::apply(&mut world, Command::AnswerGate { choice: 0 }, &mut out);
    assert_eq!(query::gold(&world), 65);
    assert_eq!(query::wave(&world).plan.wave(), 2);
}
