use crate::logic::board::Board;
use crate::logic::piece::{Color, Piece, PieceType};
use crate::logic::record::{Move, MoveRecord};
use crate::logic::rules::{
    en_passant_target, has_moved, is_attacked, leaves_king_attacked, square_disturbed,
};
use crate::logic::square::Square;

const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const KING_FILE: usize = 4;

#[derive(Debug, Default, Clone, Copy)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub const fn new() -> Self {
        Self
    }

    /// Every legal move of `turn`, scanning the board rank by rank.
    pub fn generate_moves(&self, board: &Board, log: &[MoveRecord], turn: Color) -> Vec<Move> {
        let mut moves = Vec::with_capacity(64);
        for (from, piece) in board.pieces() {
            if piece.is_owned_by(turn) {
                moves.extend(self.legal_moves_from(board, log, from));
            }
        }
        moves
    }

    /// Checks if `turn` has at least one legal move, stopping at the first one found.
    pub fn has_legal_moves(&self, board: &Board, log: &[MoveRecord], turn: Color) -> bool {
        board
            .pieces()
            .filter(|(_, piece)| piece.is_owned_by(turn))
            .any(|(from, _)| !self.legal_moves_from(board, log, from).is_empty())
    }

    /// Legal moves of whatever piece stands on `from`, empty for an empty square.
    pub fn legal_moves_from(&self, board: &Board, log: &[MoveRecord], from: Square) -> Vec<Move> {
        let mut moves = self.pseudo_legal_moves(board, log, from, true);
        moves.retain(|mv| !leaves_king_attacked(board, log, mv));
        moves
    }

    /// Moves obeying piece movement rules only. Castling is skipped when
    /// `castling` is false, which is how attack detection avoids recursing
    /// back into itself.
    pub fn pseudo_legal_moves(
        &self,
        board: &Board,
        log: &[MoveRecord],
        from: Square,
        castling: bool,
    ) -> Vec<Move> {
        let Some(piece) = board.get(from) else {
            return Vec::new();
        };

        let mut moves = Vec::new();
        match piece.piece_type {
            PieceType::Pawn => self.generate_pawn_moves(board, log, from, piece, &mut moves),
            PieceType::Bishop | PieceType::Rook | PieceType::Queen => {
                self.generate_sliding_moves(board, from, piece, &mut moves);
            }
            PieceType::Knight => {
                self.generate_step_moves(board, from, piece, &KNIGHT_OFFSETS, &mut moves);
            }
            PieceType::King => {
                self.generate_step_moves(board, from, piece, &KING_OFFSETS, &mut moves);
                if castling {
                    self.generate_castling_moves(board, log, from, piece, &mut moves);
                }
            }
        }
        moves
    }

    fn generate_pawn_moves(
        &self,
        board: &Board,
        log: &[MoveRecord],
        from: Square,
        pawn: Piece,
        moves: &mut Vec<Move>,
    ) {
        let forward = pawn.color.forward();

        if let Some(one) = from.offset(forward, 0) {
            if board.get(one).is_none() {
                moves.push(Move::new(from, one));
                if from.rank() == pawn.color.pawn_rank() {
                    if let Some(two) = from.offset(2 * forward, 0) {
                        if board.get(two).is_none() {
                            moves.push(Move::new(from, two));
                        }
                    }
                }
            }
        }

        for df in [1, -1] {
            if let Some(to) = from.offset(forward, df) {
                if board.get(to).is_some_and(|target| pawn.is_hostile_to(target)) {
                    moves.push(Move::new(from, to));
                }
            }
        }

        if let Some(to) = en_passant_target(board, log, from) {
            moves.push(Move::new(from, to));
        }
    }

    fn generate_sliding_moves(
        &self,
        board: &Board,
        from: Square,
        piece: Piece,
        moves: &mut Vec<Move>,
    ) {
        for &(dr, df) in piece.piece_type.directions() {
            let mut current = from.offset(dr, df);
            while let Some(to) = current {
                match board.get(to) {
                    None => moves.push(Move::new(from, to)),
                    Some(target) => {
                        if piece.is_hostile_to(target) {
                            moves.push(Move::new(from, to));
                        }
                        break;
                    }
                }
                current = to.offset(dr, df);
            }
        }
    }

    fn generate_step_moves(
        &self,
        board: &Board,
        from: Square,
        piece: Piece,
        offsets: &[(isize, isize)],
        moves: &mut Vec<Move>,
    ) {
        for &(dr, df) in offsets {
            if let Some(to) = from.offset(dr, df) {
                if board.get(to).is_none_or(|target| piece.is_hostile_to(target)) {
                    moves.push(Move::new(from, to));
                }
            }
        }
    }

    fn generate_castling_moves(
        &self,
        board: &Board,
        log: &[MoveRecord],
        from: Square,
        king: Piece,
        moves: &mut Vec<Move>,
    ) {
        let rank = king.color.back_rank();
        if from.rank() != rank || from.file() != KING_FILE || has_moved(log, king) {
            return;
        }

        // (rook file, squares that must be empty, squares the king crosses, destination file)
        let sides: [(usize, &[usize], [usize; 3], usize); 2] = [
            (0, &[1, 2, 3], [4, 3, 2], 2),
            (7, &[5, 6], [4, 5, 6], 6),
        ];

        for (rook_file, between, path, target_file) in sides {
            let square = |file: usize| Square::new(rank as isize, file as isize);
            let Some(rook_square) = square(rook_file) else {
                continue;
            };
            let rook = Piece::new(PieceType::Rook, king.color);
            // Both rooks share one identity, so the corner's own history stands in for it.
            if board.get(rook_square) != Some(rook) || square_disturbed(log, rook_square) {
                continue;
            }
            let clear = between
                .iter()
                .all(|&file| square(file).is_some_and(|sq| board.get(sq).is_none()));
            if !clear {
                continue;
            }
            let safe = path.iter().all(|&file| {
                square(file).is_some_and(|sq| !is_attacked(board, log, sq, king.color))
            });
            if !safe {
                continue;
            }
            if let Some(to) = square(target_file) {
                moves.push(Move::new(from, to));
            }
        }
    }
}
