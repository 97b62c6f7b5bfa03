use crate::logic::piece::{Color, Piece, PieceType};
use crate::logic::square::{Square, BOARD_SIZE};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

const BACK_ROW: [PieceType; BOARD_SIZE] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// A complete position: every square holds a piece or nothing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    #[serde(with = "BigArray")]
    grid: [Option<Piece>; SQUARE_COUNT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// The standard starting layout.
    #[must_use]
    pub fn new() -> Self {
        let mut board = Self::empty();
        board.setup_pieces(Color::White);
        board.setup_pieces(Color::Black);
        board
    }

    #[must_use]
    pub const fn empty() -> Self {
        Self {
            grid: [None; SQUARE_COUNT],
        }
    }

    fn setup_pieces(&mut self, color: Color) {
        for (file, &piece_type) in BACK_ROW.iter().enumerate() {
            self.grid[color.back_rank() * BOARD_SIZE + file] = Some(Piece::new(piece_type, color));
            self.grid[color.pawn_rank() * BOARD_SIZE + file] =
                Some(Piece::new(PieceType::Pawn, color));
        }
    }

    #[must_use]
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.grid[square.index()]
    }

    /// Lookup by raw coordinates; anything off the board reads as empty.
    #[must_use]
    pub fn piece_at(&self, rank: isize, file: isize) -> Option<Piece> {
        Square::new(rank, file).and_then(|square| self.get(square))
    }

    pub fn set_piece(&mut self, square: Square, piece: Option<Piece>) {
        self.grid[square.index()] = piece;
    }

    pub fn add_piece(&mut self, square: Square, piece_type: PieceType, color: Color) {
        self.set_piece(square, Some(Piece::new(piece_type, color)));
    }

    pub fn clear(&mut self) {
        self.grid = [None; SQUARE_COUNT];
    }

    /// Moves whatever stands on `from` onto `to`, leaving `from` empty.
    /// Returns what `to` held before.
    pub fn move_piece_quiet(&mut self, from: Square, to: Square) -> Option<Piece> {
        let captured = self.get(to);
        self.grid[to.index()] = self.grid[from.index()].take();
        captured
    }

    /// Pure variant of [`Board::move_piece_quiet`]. No castling, en passant
    /// or promotion handling.
    #[must_use]
    pub fn with_move(&self, from: Square, to: Square) -> Self {
        let mut next = self.clone();
        next.move_piece_quiet(from, to);
        next
    }

    /// First square (rank by rank) holding exactly `piece`.
    #[must_use]
    pub fn find(&self, piece: Piece) -> Option<Square> {
        Square::all().find(|&square| self.get(square) == Some(piece))
    }

    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|square| self.get(square).map(|piece| (square, piece)))
    }

    #[must_use]
    pub fn count(&self, color: Color) -> usize {
        self.pieces()
            .filter(|(_, piece)| piece.is_owned_by(color))
            .count()
    }

    /// Piece placement in FEN order (rank 8 first) followed by the side to move.
    #[must_use]
    pub fn to_fen_string(&self, turn: Color) -> String {
        let mut fen = String::new();
        for rank in 0..BOARD_SIZE {
            let mut empty_count = 0;
            for file in 0..BOARD_SIZE {
                if let Some(piece) = self.grid[rank * BOARD_SIZE + file] {
                    if empty_count > 0 {
                        fen.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    let char_code = match piece.piece_type {
                        PieceType::Pawn => 'p',
                        PieceType::Bishop => 'b',
                        PieceType::Knight => 'n',
                        PieceType::Rook => 'r',
                        PieceType::Queen => 'q',
                        PieceType::King => 'k',
                    };
                    fen.push(if piece.color == Color::White {
                        char_code.to_ascii_uppercase()
                    } else {
                        char_code
                    });
                } else {
                    empty_count += 1;
                }
            }
            if empty_count > 0 {
                fen.push_str(&empty_count.to_string());
            }
            if rank + 1 < BOARD_SIZE {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(if turn == Color::White { 'w' } else { 'b' });
        fen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).unwrap()
    }

    #[test]
    fn test_initial_setup() {
        let board = Board::new();
        assert_eq!(board.pieces().count(), 32);
        assert_eq!(board.count(Color::White), 16);
        assert_eq!(board.count(Color::Black), 16);

        let king = board.get(sq("e1")).unwrap();
        assert_eq!(king.piece_type, PieceType::King);
        assert_eq!(king.color, Color::White);

        let queen = board.get(sq("d8")).unwrap();
        assert_eq!(queen.piece_type, PieceType::Queen);
        assert_eq!(queen.color, Color::Black);

        assert_eq!(Board::new(), board);
    }

    #[test]
    fn test_fen_generation() {
        let board = Board::new();
        assert_eq!(
            board.to_fen_string(Color::White),
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w"
        );
    }

    #[test]
    fn test_with_move_leaves_original_untouched() {
        let board = Board::new();
        let next = board.with_move(sq("e2"), sq("e4"));

        assert!(next.get(sq("e2")).is_none());
        assert_eq!(next.get(sq("e4")), board.get(sq("e2")));
        assert!(board.get(sq("e4")).is_none());
        assert!(board.get(sq("e2")).is_some());
    }

    #[test]
    fn test_off_board_lookup_fails_closed() {
        let board = Board::new();
        assert!(board.piece_at(-1, 3).is_none());
        assert!(board.piece_at(3, 8).is_none());
        assert!(board.piece_at(0, 0).is_some());
    }

    #[test]
    fn test_find_piece() {
        let board = Board::new();
        let black_king = Piece::new(PieceType::King, Color::Black);
        assert_eq!(board.find(black_king), Some(sq("e8")));

        let mut empty = Board::empty();
        assert_eq!(empty.find(black_king), None);
        empty.add_piece(sq("h5"), PieceType::King, Color::Black);
        assert_eq!(empty.find(black_king), Some(sq("h5")));
    }
}
