//! Integration tests for the tabletop stack
//!
//! Plays whole games through the registry with simple scripted clients.

use tabletop_core::{
    DiceConfig, GameManager, GameStatus, GameType, RegistryConfig, StateSnapshot,
};
use tabletop_server::ServerState;

// ============================================================================
// CLIENTS
// ============================================================================

/// Play first-accepted-move checkers for up to `plies` moves
fn play_checkers(manager: &GameManager, game_id: &str, plies: usize) -> StateSnapshot {
    for _ in 0..plies {
        let state = manager.get_game_state(game_id).unwrap();
        if state.status() == GameStatus::Finished {
            return state;
        }
        let StateSnapshot::Checkers(snapshot) = &state else {
            panic!("expected checkers");
        };
        let player = snapshot.current_player.clone().unwrap();

        // a client only sees the snapshot; try pieces until the server accepts
        let mut accepted = false;
        'search: for piece in &snapshot.pieces[&player] {
            for dist in [2i8, 1] {
                for (dr, dc) in [(-1i8, -1i8), (-1, 1), (1, -1), (1, 1)] {
                    let to = piece.position.offset(dr * dist, dc * dist);
                    if !to.is_valid() {
                        continue;
                    }
                    let mv = tabletop_core::CheckersMove::new(piece.position, to);
                    if manager.make_move(game_id, &player, mv).is_ok() {
                        accepted = true;
                        break 'search;
                    }
                }
            }
        }
        assert!(accepted, "player to move must have a legal move");
    }
    manager.get_game_state(game_id).unwrap()
}

/// Roll and move the first offered piece until someone wins
fn play_ludo(manager: &GameManager, game_id: &str) -> StateSnapshot {
    for _ in 0..20_000 {
        let state = manager.get_game_state(game_id).unwrap();
        if state.status() == GameStatus::Finished {
            return state;
        }
        let StateSnapshot::Ludo(snapshot) = &state else {
            panic!("expected ludo");
        };
        let player = snapshot.current_player.clone().unwrap();
        let roll = manager.roll_dice(game_id, &player).unwrap();
        if let Some(first) = roll.outcome.possible_moves.first() {
            manager.move_ludo_piece(game_id, &player, &first.piece_id).unwrap();
        }
    }
    panic!("ludo game did not finish");
}

// ============================================================================
// TESTS
// ============================================================================

#[test]
fn test_full_checkers_game() {
    let manager = GameManager::new();
    let id = manager.create_game("w", "Walt", GameType::Checkers).unwrap().game_id;
    manager.join_game(&id, "b", "Bea").unwrap();

    // kings can shuffle forever, so a long game ends by resignation
    let mut final_state = play_checkers(&manager, &id, 300);
    if final_state.status() == GameStatus::Playing {
        final_state = manager.remove_player(&id, "b").unwrap();
    }
    assert_eq!(final_state.status(), GameStatus::Finished);
    let winner = final_state.winner().unwrap();
    assert!(winner == "w" || winner == "b");

    // both players may start new games once theirs is over
    manager.create_game("w", "Walt", GameType::Ludo).unwrap();
    manager.create_game("b", "Bea", GameType::Ludo).unwrap();
    assert_eq!(manager.get_available_games().len(), 2);
}

#[test]
fn test_full_seeded_ludo_game() {
    let manager = GameManager::with_config(RegistryConfig::seeded(2024));
    let id = manager.create_game("p1", "One", GameType::Ludo).unwrap().game_id;
    manager.join_game(&id, "p2", "Two").unwrap();
    manager.join_game(&id, "p3", "Three").unwrap();

    let final_state = play_ludo(&manager, &id);
    let StateSnapshot::Ludo(snapshot) = &final_state else {
        panic!("expected ludo");
    };
    let winner = snapshot.winner.clone().unwrap();
    let champion = snapshot.players.iter().find(|p| p.id == winner).unwrap();
    assert_eq!(champion.finished_pieces, 4);
    assert!(snapshot
        .players
        .iter()
        .filter(|p| p.id != winner)
        .all(|p| p.finished_pieces < 4));
}

#[test]
fn test_seeded_ludo_games_replay_identically() {
    let run = || {
        let manager = GameManager::with_config(RegistryConfig::default().with_dice(DiceConfig::Seeded(7)));
        let id = manager.create_game("a", "A", GameType::Ludo).unwrap().game_id;
        manager.join_game(&id, "b", "B").unwrap();
        (0..30)
            .map(|_| {
                let StateSnapshot::Ludo(s) = manager.get_game_state(&id).unwrap() else {
                    panic!("expected ludo");
                };
                let player = s.current_player.unwrap();
                let roll = manager.roll_dice(&id, &player).unwrap();
                if let Some(first) = roll.outcome.possible_moves.first() {
                    manager.move_ludo_piece(&id, &player, &first.piece_id).unwrap();
                }
                roll.outcome.dice_value
            })
            .collect::<Vec<u8>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_server_state_broadcasts_game_end() {
    let state = ServerState::new();
    let id = state.manager.create_game("w", "W", GameType::Checkers).unwrap().game_id;
    state.manager.join_game(&id, "b", "B").unwrap();
    let mut rx = state.events.subscribe(&id);

    state.manager.remove_player(&id, "b").unwrap();

    let event = rx.try_recv().unwrap();
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["type"], "opponentLeft");
    assert_eq!(json["gameState"]["winner"], "w");
    assert_eq!(json["gameState"]["status"], "finished");
    assert!(rx.try_recv().is_err());
}
