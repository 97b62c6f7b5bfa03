use crate::logic::board::Board;
use crate::logic::generator::MoveGenerator;
use crate::logic::piece::{Color, Piece, PieceType};
use crate::logic::record::{Move, MoveRecord};
use crate::logic::square::Square;

/// True if `piece` (exact color and kind) appears as the mover of any record.
pub fn has_moved(log: &[MoveRecord], piece: Piece) -> bool {
    log.iter().any(|record| record.piece == piece)
}

/// True if anything ever left or landed on `square`.
pub fn square_disturbed(log: &[MoveRecord], square: Square) -> bool {
    log.iter()
        .any(|record| record.from == square || record.to == square)
}

/// Destination of an en passant capture for the pawn on `from`, if the last
/// logged move makes one available.
pub fn en_passant_target(board: &Board, log: &[MoveRecord], from: Square) -> Option<Square> {
    let last = log.last()?;
    let pawn = board.get(from)?;
    let victim = board.get(last.to)?;

    let double_step = last.piece.is_kind(PieceType::Pawn)
        && last.from.file() == last.to.file()
        && last.from.rank().abs_diff(last.to.rank()) == 2;
    let adjacent = last.to.rank() == from.rank() && last.to.file().abs_diff(from.file()) == 1;

    if !double_step
        || !adjacent
        || !pawn.is_kind(PieceType::Pawn)
        || !victim.is_kind(PieceType::Pawn)
        || !pawn.is_hostile_to(victim)
    {
        return None;
    }

    let skipped_rank = (last.from.rank() + last.to.rank()) / 2;
    Square::new(skipped_rank as isize, last.to.file() as isize)
}

/// True if a pawn of `color` standing on `to` must promote.
pub fn is_promotion_square(piece: Piece, to: Square) -> bool {
    piece.is_kind(PieceType::Pawn) && to.rank() == piece.color.opposite().back_rank()
}

/// True if a king move from `from` to `to` is a castling hop.
pub fn is_castling(piece: Piece, from: Square, to: Square) -> bool {
    piece.is_kind(PieceType::King)
        && from.rank() == to.rank()
        && from.file().abs_diff(to.file()) == 2
}

/// Commits a move to `board`: en passant removal, the square swap itself and
/// the rook hop of a castling move. Promotion is left to the caller.
/// Returns the captured piece, if any.
pub fn apply_move(board: &mut Board, log: &[MoveRecord], from: Square, to: Square) -> Option<Piece> {
    let mut captured = board.get(to);

    if en_passant_target(board, log, from) == Some(to) {
        if let Some(victim) = Square::new(from.rank() as isize, to.file() as isize) {
            captured = board.get(victim);
            board.set_piece(victim, None);
        }
    }

    board.move_piece_quiet(from, to);

    if let Some(piece) = board.get(to) {
        if is_castling(piece, from, to) {
            let rook_file = if to.file() > from.file() { 7 } else { 0 };
            let hop_file = (from.file() + to.file()) / 2;
            if let (Some(rook_from), Some(rook_to)) = (
                Square::new(from.rank() as isize, rook_file),
                Square::new(from.rank() as isize, hop_file as isize),
            ) {
                board.move_piece_quiet(rook_from, rook_to);
            }
        }
    }

    captured
}

/// True if any piece of `defender`'s opponent could move onto `square`.
///
/// An empty target is treated as holding a defender pawn, so that pawn
/// diagonals count as attacks and plain pawn pushes do not.
pub fn is_attacked(board: &Board, log: &[MoveRecord], square: Square, defender: Color) -> bool {
    let mut probe = board.clone();
    if probe.get(square).is_none() {
        probe.add_piece(square, PieceType::Pawn, defender);
    }

    let generator = MoveGenerator::new();
    let attacker = defender.opposite();
    Square::all().any(|from| {
        probe.get(from).is_some_and(|piece| piece.is_owned_by(attacker))
            && generator
                .pseudo_legal_moves(&probe, log, from, false)
                .iter()
                .any(|mv| mv.to == square)
    })
}

/// Checks if `color`'s king is attacked. A board without that king is never in check.
pub fn is_in_check(board: &Board, log: &[MoveRecord], color: Color) -> bool {
    board
        .find(Piece::new(PieceType::King, color))
        .is_some_and(|king| is_attacked(board, log, king, color))
}

/// Plays `mv` on a copy of `board` and reports whether the mover's king ends up attacked.
pub fn leaves_king_attacked(board: &Board, log: &[MoveRecord], mv: &Move) -> bool {
    let Some(mover) = board.get(mv.from) else {
        return false;
    };
    let mut next_board = board.clone();
    let captured = apply_move(&mut next_board, log, mv.from, mv.to);

    let mut next_log = log.to_vec();
    next_log.push(MoveRecord {
        dt: 0.0,
        from: mv.from,
        to: mv.to,
        piece: mover,
        captured,
        promoted: None,
        move_cost: 0.0,
    });
    is_in_check(&next_board, &next_log, mover.color)
}
