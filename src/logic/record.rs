use crate::logic::piece::Piece;
use crate::logic::square::Square;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A move as produced by the generator. `promotion` is only ever filled by the
/// caller, once it knows which piece a pawn reaching the last rank becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<Piece>,
}

impl Move {
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    #[must_use]
    pub const fn with_promotion(mut self, piece: Piece) -> Self {
        self.promotion = Some(piece);
        self
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            write!(f, "={piece}")?;
        }
        Ok(())
    }
}

/// One entry of the game log. The log alone is enough to rebuild a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    /// Wall-clock timestamp (seconds) at which the move was played.
    pub dt: f64,
    pub from: Square,
    pub to: Square,
    /// The piece that moved. For a promotion this is still the pawn.
    pub piece: Piece,
    pub captured: Option<Piece>,
    pub promoted: Option<Piece>,
    /// Seconds charged to the mover.
    pub move_cost: f64,
}

impl MoveRecord {
    pub fn as_move(&self) -> Move {
        Move {
            from: self.from,
            to: self.to,
            promotion: self.promoted,
        }
    }
}

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.3}: went from {} to {} with {}",
            self.dt, self.from, self.to, self.piece
        )?;
        if let Some(captured) = self.captured {
            write!(f, " and captured {captured}")?;
        }
        Ok(())
    }
}
