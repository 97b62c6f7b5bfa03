//! Chess rules, game bookkeeping and a fixed-depth minimax opponent.
//!
//! ```
//! use chess_core::logic::game::{GameState, GameStatus};
//! use chess_core::logic::square::Square;
//!
//! let mut game = GameState::new_game(|| {}, 600.0);
//! let from = Square::from_algebraic("e2").unwrap();
//! let to = Square::from_algebraic("e4").unwrap();
//! game.make_move(from, to, None, true);
//! assert_eq!(game.winner(), GameStatus::Running);
//! ```

pub mod engine;
pub mod logic;

pub use engine::minimax::MinMaxEngine;
pub use logic::board::Board;
pub use logic::game::{GameConfig, GameState, GameStatus};
pub use logic::piece::{Color, Piece, PieceType};
pub use logic::record::{Move, MoveRecord};
pub use logic::square::Square;
