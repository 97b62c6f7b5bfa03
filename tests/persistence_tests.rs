use chess_core::logic::board::Board;
use chess_core::logic::clock::ManualClock;
use chess_core::logic::game::{GameConfig, GameState, GameStatus};
use chess_core::logic::persistence::{PersistenceError, SavedGame};
use chess_core::logic::piece::{Color, Piece, PieceType};
use chess_core::logic::square::Square;
use std::sync::Arc;

fn sq(name: &str) -> Square {
    Square::from_algebraic(name).unwrap()
}

fn game_at(start: f64, allowed_time: f64) -> (GameState, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start));
    let config = GameConfig {
        allowed_time,
        ..GameConfig::default()
    };
    let game = GameState::new(&config).with_clock(clock.clone());
    (game, clock)
}

/// Italian opening with both sides castling short, two seconds per ply.
fn played_game() -> (GameState, Arc<ManualClock>) {
    let (mut game, clock) = game_at(1_000.0, 1800.0);
    let moves = [
        ("e2", "e4"),
        ("e7", "e5"),
        ("g1", "f3"),
        ("b8", "c6"),
        ("f1", "c4"),
        ("f8", "c5"),
        ("e1", "g1"),
        ("g8", "f6"),
        ("d2", "d3"),
        ("e8", "g8"),
        ("c4", "f7"),
    ];
    for (from, to) in moves {
        clock.advance(2.0);
        game.make_move(sq(from), sq(to), None, true);
    }
    (game, clock)
}

#[test]
fn test_round_trip_shifts_timestamps() {
    let (game, _clock) = played_game();
    let json = game.to_json().unwrap();

    let (fresh, _later) = game_at(5_000.0, 1800.0);
    let loaded = fresh.load_json(&json).unwrap();

    assert_eq!(loaded.board, game.board);
    assert_eq!(loaded.turn, game.turn);
    assert_eq!(loaded.history().len(), game.history().len());
    for (restored, original) in loaded.history().iter().zip(game.history()) {
        assert_eq!(restored.as_move(), original.as_move());
        assert_eq!(restored.piece, original.piece);
        assert_eq!(restored.captured, original.captured);
        assert!((restored.move_cost - original.move_cost).abs() < 1e-9);
        // Saved at 1022, loaded at 5000.
        assert!((restored.dt - original.dt - 3_978.0).abs() < 1e-6);
    }
    for color in [Color::White, Color::Black] {
        assert!(
            (loaded.player(color).elapsed - game.player(color).elapsed).abs() < 1e-9
        );
        assert!(
            (loaded.remaining_time(color) - game.remaining_time(color)).abs() < 1e-6
        );
    }
    assert!(!loaded.can_undo());
}

#[test]
fn test_saved_capture_is_recorded() {
    let (game, _clock) = played_game();
    let saved = SavedGame::from_json(&game.to_json().unwrap()).unwrap();

    let last = saved.log.last().unwrap();
    assert_eq!(last.sp, [4, 2]);
    assert_eq!(last.ep, [1, 5]);
    assert_eq!(last.piece, 1);
    // Black pawn.
    assert_eq!(last.attacked, 6);
    assert_eq!(last.promoted, None);
    assert!((saved.time - 1_000.0).abs() < 1e-9);
    assert!((saved.save - 1_022.0).abs() < 1e-9);
}

#[test]
fn test_reader_and_writer() {
    let (game, _clock) = played_game();
    let mut buffer = Vec::new();
    game.save_to_writer(&mut buffer).unwrap();

    let (fresh, _later) = game_at(2_000.0, 1800.0);
    let loaded = fresh.load_from_reader(buffer.as_slice()).unwrap();
    assert_eq!(loaded.board, game.board);
    assert_eq!(loaded.winner(), GameStatus::Running);
}

#[test]
fn test_load_game_with_observer() {
    let (game, _clock) = played_game();
    let json = game.to_json().unwrap();

    let loaded = GameState::load_game(&json, || {}, 1800.0).unwrap();
    assert_eq!(loaded.board, game.board);
    assert_eq!(loaded.history().len(), 11);
}

#[test]
fn test_promotion_survives_reload() {
    let (mut game, _clock) = game_at(0.0, 1800.0);
    for (from, to) in [
        ("h2", "h4"),
        ("g7", "g5"),
        ("h4", "g5"),
        ("h7", "h6"),
        ("g5", "h6"),
        ("f8", "g7"),
        ("h6", "g7"),
        ("b8", "c6"),
    ] {
        game.make_move(sq(from), sq(to), None, true);
    }
    let knight = Piece::new(PieceType::Knight, Color::White);
    game.make_move(sq("g7"), sq("h8"), Some(knight), true);
    assert_eq!(game.board.get(sq("h8")), Some(knight));

    let json = game.to_json().unwrap();
    let (fresh, _later) = game_at(100.0, 1800.0);
    let loaded = fresh.load_json(&json).unwrap();

    assert_eq!(loaded.board, game.board);
    assert_eq!(loaded.history().last().unwrap().promoted, Some(knight));
    assert_eq!(loaded.turn, Color::Black);
    assert_eq!(loaded.pending_promotion(), None);
}

#[test]
fn test_empty_log_loads_initial_position() {
    let json = r#"{"time": 10.0, "save": 20.0, "log": []}"#;
    let (fresh, _clock) = game_at(50.0, 1800.0);
    let loaded = fresh.load_json(json).unwrap();

    assert_eq!(loaded.board, Board::new());
    assert_eq!(loaded.turn, Color::White);
    // Ten seconds had passed at save time and are still on White's clock.
    assert!((loaded.remaining_time(Color::White) - 1790.0).abs() < 1e-6);
}

#[test]
fn test_spent_clock_is_restored() {
    let json = r#"{"time": 0.0, "save": 70.0, "log": [
        {"dt": 65.0, "moveCost": 65.0, "sp": [6, 4], "ep": [4, 4],
         "piece": 0, "attacked": -1, "promoted": null}]}"#;
    let (fresh, _clock) = game_at(500.0, 60.0);
    let loaded = fresh.load_json(json).unwrap();

    assert_eq!(loaded.turn, Color::Black);
    assert_eq!(loaded.winner(), GameStatus::TimedOut(Color::White));
}

#[test]
fn test_invalid_piece_code_is_rejected() {
    let json = r#"{"time": 0.0, "save": 1.0, "log": [
        {"dt": 1.0, "moveCost": 1.0, "sp": [6, 4], "ep": [4, 4],
         "piece": 42, "attacked": -1, "promoted": null}]}"#;
    let (fresh, _clock) = game_at(0.0, 1800.0);
    assert!(matches!(
        fresh.load_json(json),
        Err(PersistenceError::InvalidPieceCode { code: 42 })
    ));
}

#[test]
fn test_out_of_turn_record_is_rejected() {
    let json = r#"{"time": 0.0, "save": 1.0, "log": [
        {"dt": 1.0, "moveCost": 1.0, "sp": [1, 4], "ep": [3, 4],
         "piece": 6, "attacked": -1, "promoted": null}]}"#;
    let (fresh, _clock) = game_at(0.0, 1800.0);
    assert!(matches!(
        fresh.load_json(json),
        Err(PersistenceError::IllegalRecord { index: 0, .. })
    ));
}

#[test]
fn test_record_from_empty_square_is_rejected() {
    let json = r#"{"time": 0.0, "save": 1.0, "log": [
        {"dt": 1.0, "moveCost": 1.0, "sp": [4, 4], "ep": [3, 4],
         "piece": 0, "attacked": -1, "promoted": null}]}"#;
    let (fresh, _clock) = game_at(0.0, 1800.0);
    assert!(matches!(
        fresh.load_json(json),
        Err(PersistenceError::IllegalRecord { index: 0, .. })
    ));
}

#[test]
fn test_garbage_is_a_json_error() {
    let (fresh, _clock) = game_at(0.0, 1800.0);
    assert!(matches!(
        fresh.load_json("not a save"),
        Err(PersistenceError::Json(_))
    ));
}
