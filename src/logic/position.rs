use crate::logic::board::Board;
use crate::logic::generator::MoveGenerator;
use crate::logic::piece::{Color, Piece, PieceType};
use crate::logic::record::{Move, MoveRecord};
use crate::logic::rules::{apply_move, is_in_check, is_promotion_square};
use serde::{Deserialize, Serialize};

/// An owned board/log/side-to-move triple for hypothetical play.
/// Playing a move always yields a fresh copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub board: Board,
    pub turn: Color,
    pub history: Vec<MoveRecord>,
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

impl Position {
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Color::White,
            history: Vec::new(),
        }
    }

    pub fn legal_moves(&self) -> Vec<Move> {
        MoveGenerator::new().generate_moves(&self.board, &self.history, self.turn)
    }

    pub fn is_in_check(&self) -> bool {
        is_in_check(&self.board, &self.history, self.turn)
    }

    /// Returns the position after `mv`. A pawn reaching the last rank becomes
    /// `mv.promotion`, or a queen when none is given, and the turn passes.
    #[must_use]
    pub fn play(&self, mv: &Move) -> Self {
        let mut next = self.clone();
        let Some(piece) = next.board.get(mv.from) else {
            return next;
        };

        let captured = apply_move(&mut next.board, &next.history, mv.from, mv.to);
        let promoted = is_promotion_square(piece, mv.to)
            .then(|| mv.promotion.unwrap_or(Piece::new(PieceType::Queen, piece.color)));
        if let Some(promoted) = promoted {
            next.board.set_piece(mv.to, Some(promoted));
        }

        next.history.push(MoveRecord {
            dt: 0.0,
            from: mv.from,
            to: mv.to,
            piece,
            captured,
            promoted,
            move_cost: 0.0,
        });
        next.turn = piece.color.opposite();
        next
    }
}
