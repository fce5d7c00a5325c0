/// Property-based tests for the roulette state machine using proptest
///
/// Random command streams from random players are thrown at games with a
/// known bullet position, and the engine's bookkeeping is checked after
/// every step.
use proptest::prelude::*;
use roulette::{
    GameSettings, GameStateManagement, Outcome, RouletteError, RouletteState,
    entities::{Command, Cylinder, Phase, PlayerId},
};

const ROSTER: [&str; 4] = ["p0", "p1", "p2", "p3"];

fn command_strategy() -> impl Strategy<Value = Command> {
    prop_oneof![
        1 => Just(Command::Join),
        1 => Just(Command::Begin),
        4 => Just(Command::Pull),
        3 => Just(Command::Pass),
        3 => Just(Command::Skip),
        1 => Just(Command::Status),
    ]
}

// A step is a command issued by one of the roster (or an outsider at index 4).
fn step_strategy() -> impl Strategy<Value = (usize, Command)> {
    (0usize..=4, command_strategy())
}

fn player(idx: usize) -> PlayerId {
    ROSTER
        .get(idx)
        .map(|name| PlayerId::new(name))
        .unwrap_or_else(|| PlayerId::new("outsider"))
}

proptest! {
    #[test]
    fn test_bookkeeping_holds_for_any_command_stream(
        bullet in 0usize..6,
        steps in prop::collection::vec(step_strategy(), 1..200),
    ) {
        let mut game = RouletteState::with_cylinder(
            &player(0),
            GameSettings::default(),
            Cylinder::with_bullet(6, bullet),
        );
        let mut last_pulls = 0;

        for (idx, command) in steps {
            let actor = player(idx);
            let before = game.get_view();
            let pulls_before = game.pulls_fired();
            let result = game.apply(&actor, command);

            let after = game.get_view();
            prop_assert!(after.pulls_fired >= last_pulls, "pulls went backwards");
            prop_assert!(after.pulls_fired <= 6);
            last_pulls = after.pulls_fired;

            match result {
                Err(_) => prop_assert_eq!(&after, &before, "error mutated state"),
                Ok(Outcome::Fatal { player }) => {
                    prop_assert_eq!(pulls_before, bullet);
                    prop_assert_eq!(player, actor);
                    prop_assert_eq!(game.phase(), Phase::Finished);
                }
                Ok(Outcome::Survived { remaining_chambers, .. }) => {
                    prop_assert_ne!(pulls_before, bullet);
                    prop_assert_eq!(after.pulls_fired, pulls_before + 1);
                    prop_assert_eq!(remaining_chambers, 6 - after.pulls_fired);
                }
                Ok(Outcome::Skipped { player, skips_left, .. }) => {
                    let old = before.players.iter().find(|s| s.player == player).map(|s| s.skips_left);
                    prop_assert_eq!(old, Some(skips_left + 1));
                    prop_assert_eq!(after.pulls_fired, pulls_before);
                }
                Ok(_) => {}
            }

            if game.is_finished() {
                break;
            }
        }
    }

    #[test]
    fn test_roster_never_has_duplicates(joins in prop::collection::vec(0usize..=4, 0..30)) {
        let mut game = RouletteState::new(&player(0), GameSettings::default());
        let mut expected = vec![player(0)];

        for idx in joins {
            let candidate = player(idx);
            match game.join(&candidate) {
                Ok(_) => {
                    prop_assert!(!expected.contains(&candidate));
                    expected.push(candidate);
                }
                Err(RouletteError::DuplicatePlayer { player }) => {
                    prop_assert!(expected.contains(&player));
                }
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }

        prop_assert_eq!(game.players(), expected.as_slice());
    }

    #[test]
    fn test_pulling_alone_always_ends_on_bullet(chambers in 2usize..12, seed in any::<usize>()) {
        // A cylinder must never run dry before the bullet is reached; the
        // exhausted-cylinder guard should never trigger.
        let bullet = seed % chambers;
        let mut game = RouletteState::with_cylinder(
            &player(0),
            GameSettings::new(chambers, 2, 2),
            Cylinder::with_bullet(chambers, bullet),
        );
        game.join(&player(1)).unwrap();
        game.begin().unwrap();

        let mut survived = 0;
        loop {
            match game.pull(&player(0)).unwrap() {
                Outcome::Survived { .. } => survived += 1,
                Outcome::Fatal { .. } => break,
                other => prop_assert!(false, "unexpected outcome {:?}", other),
            }
        }
        prop_assert_eq!(survived, bullet);
    }
}
