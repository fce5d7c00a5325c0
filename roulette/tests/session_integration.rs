/// Integration tests for the session registry
///
/// These tests exercise the registry the way the transport shell does:
/// through `SessionManager::handle`, including concurrent commands for the
/// same and for different sessions.
use std::sync::Arc;

use roulette::{
    Outcome, RouletteError,
    entities::{Command, Phase, PlayerId},
    session::{BulletSource, RegistryConfig, SessionManager},
};

fn p(name: &str) -> PlayerId {
    PlayerId::new(name)
}

fn manager_with_bullet(chamber: usize) -> Arc<SessionManager> {
    Arc::new(SessionManager::new(RegistryConfig {
        bullets: BulletSource::Fixed(chamber),
        ..RegistryConfig::default()
    }))
}

async fn started(manager: &SessionManager, key: i64, players: &[&str]) {
    manager
        .handle(key, &p(players[0]), Command::Create)
        .await
        .unwrap();
    for name in &players[1..] {
        manager.handle(key, &p(name), Command::Join).await.unwrap();
    }
    manager
        .handle(key, &p(players[0]), Command::Begin)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_create_twice_is_already_active() {
    let manager = manager_with_bullet(0);

    manager.handle(1, &p("alice"), Command::Create).await.unwrap();
    assert_eq!(
        manager.handle(1, &p("bob"), Command::Create).await,
        Err(RouletteError::AlreadyActive)
    );

    // The original lobby is untouched.
    let view = manager.view(1).await.unwrap();
    assert_eq!(view.players.len(), 1);
    assert_eq!(view.players[0].player, p("alice"));
}

#[tokio::test]
async fn test_commands_without_game_fail() {
    let manager = manager_with_bullet(0);

    for command in [
        Command::Join,
        Command::Begin,
        Command::Pull,
        Command::Pass,
        Command::Skip,
        Command::Stop,
        Command::Status,
    ] {
        assert_eq!(
            manager.handle(1, &p("alice"), command).await,
            Err(RouletteError::NoActiveGame),
            "{command} should need a game"
        );
    }
}

#[tokio::test]
async fn test_help_needs_no_game() {
    let manager = manager_with_bullet(0);
    assert_eq!(
        manager.handle(1, &p("alice"), Command::Help).await,
        Ok(Outcome::Help)
    );
    assert_eq!(manager.session_count().await, 0);
}

#[tokio::test]
async fn test_fatal_pull_releases_session() {
    let manager = manager_with_bullet(1);
    started(&manager, 1, &["p1", "p2"]).await;

    manager.handle(1, &p("p1"), Command::Pull).await.unwrap();
    manager.handle(1, &p("p1"), Command::Pass).await.unwrap();
    assert_eq!(
        manager.handle(1, &p("p2"), Command::Pull).await,
        Ok(Outcome::Fatal { player: p("p2") })
    );

    assert!(manager.get(1).await.is_none());
    assert_eq!(manager.session_count().await, 0);
    assert_eq!(
        manager.handle(1, &p("p1"), Command::Status).await,
        Err(RouletteError::NoActiveGame)
    );

    // The room is free for a new game.
    assert!(manager.handle(1, &p("p2"), Command::Create).await.is_ok());
}

#[tokio::test]
async fn test_stop_twice_is_consistent() {
    let manager = manager_with_bullet(0);
    started(&manager, 1, &["p1", "p2"]).await;

    assert_eq!(
        manager.handle(1, &p("p2"), Command::Stop).await,
        Ok(Outcome::Stopped)
    );
    assert_eq!(
        manager.handle(1, &p("p2"), Command::Stop).await,
        Err(RouletteError::NoActiveGame)
    );
    assert_eq!(
        manager.handle(1, &p("p2"), Command::Stop).await,
        Err(RouletteError::NoActiveGame)
    );
    assert_eq!(manager.session_count().await, 0);
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let manager = manager_with_bullet(0);
    manager.handle(1, &p("alice"), Command::Create).await.unwrap();

    manager.remove(1).await;
    manager.remove(1).await;

    assert!(manager.get(1).await.is_none());
    assert!(manager.handle(1, &p("alice"), Command::Create).await.is_ok());
}

#[tokio::test]
async fn test_sessions_are_independent() {
    let manager = manager_with_bullet(0);
    started(&manager, 1, &["a1", "a2"]).await;
    started(&manager, 2, &["b1", "b2"]).await;

    assert_eq!(
        manager.handle(1, &p("a1"), Command::Pull).await,
        Ok(Outcome::Fatal { player: p("a1") })
    );

    let view = manager.view(2).await.unwrap();
    assert_eq!(view.phase, Phase::Active);
    assert_eq!(view.current_player, Some(p("b1")));
    assert_eq!(manager.session_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_yield_one_game() {
    let manager = manager_with_bullet(0);

    let tasks: Vec<_> = (0..16)
        .map(|i| {
            let manager = manager.clone();
            tokio::spawn(async move {
                manager
                    .handle(1, &p(&format!("host{i}")), Command::Create)
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(Outcome::Created { .. }) => created += 1,
            Err(RouletteError::AlreadyActive) => rejected += 1,
            other => panic!("unexpected result {other:?}"),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(rejected, 15);
    assert_eq!(manager.session_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_joins_are_not_lost() {
    let manager = manager_with_bullet(0);
    manager.handle(1, &p("host"), Command::Create).await.unwrap();

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let manager = manager.clone();
            tokio::spawn(async move {
                // Every player tries to join twice.
                let player = p(&format!("player{}", i % 10));
                manager.handle(1, &player, Command::Join).await
            })
        })
        .collect();

    let mut joined = 0;
    let mut duplicates = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(Outcome::Joined { .. }) => joined += 1,
            Err(RouletteError::DuplicatePlayer { .. }) => duplicates += 1,
            other => panic!("unexpected result {other:?}"),
        }
    }

    assert_eq!(joined, 10);
    assert_eq!(duplicates, 10);

    let view = manager.view(1).await.unwrap();
    assert_eq!(view.players.len(), 11);
    assert_eq!(view.players[0].player, p("host"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_pull_racing_stop_has_one_winner() {
    for _ in 0..20 {
        let manager = manager_with_bullet(5);
        started(&manager, 1, &["p1", "p2"]).await;

        let puller = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.handle(1, &p("p1"), Command::Pull).await })
        };
        let stopper = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.handle(1, &p("p2"), Command::Stop).await })
        };

        let pulled = puller.await.unwrap();
        let stopped = stopper.await.unwrap();

        // Stop always wins eventually; the pull either happened first or
        // found the game gone.
        assert_eq!(stopped, Ok(Outcome::Stopped));
        assert!(matches!(
            pulled,
            Ok(Outcome::Survived { .. }) | Err(RouletteError::NoActiveGame)
        ));
        assert_eq!(manager.session_count().await, 0);
    }
}

#[tokio::test]
async fn test_create_replaces_finished_game_still_in_map() {
    let manager = manager_with_bullet(5);
    started(&manager, 1, &["p1", "p2"]).await;

    // Stopping through the handle bypasses the registry, so the entry
    // stays behind pointing at the exited actor.
    let old = manager.get(1).await.unwrap();
    assert_eq!(
        old.command(p("p2"), Command::Stop).await,
        Ok(Outcome::Stopped)
    );

    assert_eq!(
        manager.handle(1, &p("p3"), Command::Create).await,
        Ok(Outcome::Created { host: p("p3") })
    );
    let new = manager.get(1).await.unwrap();
    assert_ne!(new.generation(), old.generation());

    let view = manager.view(1).await.unwrap();
    assert_eq!(view.phase, Phase::Lobby);
    assert_eq!(view.players[0].player, p("p3"));

    assert_eq!(
        manager.handle(1, &p("p3"), Command::Stop).await,
        Ok(Outcome::Stopped)
    );
    assert_eq!(manager.session_count().await, 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_create_racing_stop_never_loses_new_game() {
    for _ in 0..50 {
        let manager = manager_with_bullet(5);
        started(&manager, 1, &["p1", "p2"]).await;

        let stopper = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.handle(1, &p("p2"), Command::Stop).await })
        };
        let creator = {
            let manager = manager.clone();
            tokio::spawn(async move { manager.handle(1, &p("p3"), Command::Create).await })
        };

        assert_eq!(stopper.await.unwrap(), Ok(Outcome::Stopped));
        match creator.await.unwrap() {
            // The new lobby must survive the old game's release.
            Ok(Outcome::Created { host }) => {
                assert_eq!(host, p("p3"));
                assert_eq!(manager.session_count().await, 1);
                let view = manager.view(1).await.unwrap();
                assert_eq!(view.phase, Phase::Lobby);
                assert_eq!(view.players[0].player, p("p3"));
            }
            Err(RouletteError::AlreadyActive) => {
                assert_eq!(manager.session_count().await, 0);
            }
            other => panic!("unexpected create result {other:?}"),
        }
    }
}
