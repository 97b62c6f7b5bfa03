use serde::{Deserialize, Serialize};
use std::fmt;

/// The two sides. White is the first side and moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::White => 0,
            Self::Black => 1,
        }
    }

    /// Rank delta of a forward pawn step. White starts at the bottom (rank 7).
    pub const fn forward(self) -> isize {
        match self {
            Self::White => -1,
            Self::Black => 1,
        }
    }

    pub const fn back_rank(self) -> usize {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    pub const fn pawn_rank(self) -> usize {
        match self {
            Self::White => 6,
            Self::Black => 1,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::White => write!(f, "White"),
            Self::Black => write!(f, "Black"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    Pawn = 0,
    Bishop = 1,
    Knight = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl PieceType {
    pub const ALL: [Self; 6] = [
        Self::Pawn,
        Self::Bishop,
        Self::Knight,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Ray directions for sliding pieces, empty for everything else.
    pub const fn directions(self) -> &'static [(isize, isize)] {
        const DIAGONALS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];
        const ORTHOGONALS: [(isize, isize); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];
        const ALL: [(isize, isize); 8] = [
            (-1, -1),
            (-1, 0),
            (-1, 1),
            (0, -1),
            (0, 1),
            (1, -1),
            (1, 0),
            (1, 1),
        ];
        match self {
            Self::Bishop => &DIAGONALS,
            Self::Rook => &ORTHOGONALS,
            Self::Queen => &ALL,
            Self::Pawn | Self::Knight | Self::King => &[],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub color: Color,
}

impl Piece {
    #[must_use]
    pub const fn new(piece_type: PieceType, color: Color) -> Self {
        Self { piece_type, color }
    }

    pub fn is_owned_by(self, color: Color) -> bool {
        self.color == color
    }

    /// Same kind regardless of color.
    pub fn is_same_kind_as(self, other: Self) -> bool {
        self.piece_type == other.piece_type
    }

    pub fn is_hostile_to(self, other: Self) -> bool {
        self.color != other.color
    }

    pub fn is_kind(self, piece_type: PieceType) -> bool {
        self.piece_type == piece_type
    }

    /// Ordinal used by the save format: 0..=5 for White, 6..=11 for Black.
    pub const fn code(self) -> i8 {
        (self.color.index() * 6 + self.piece_type.index()) as i8
    }

    /// Inverse of [`Piece::code`]. Returns `None` for anything outside 0..=11.
    pub fn from_code(code: i64) -> Option<Self> {
        let code = usize::try_from(code).ok()?;
        let piece_type = *PieceType::ALL.get(code % 6)?;
        let color = match code / 6 {
            0 => Color::White,
            1 => Color::Black,
            _ => return None,
        };
        Some(Self::new(piece_type, color))
    }
}

/// Save-format code of a square's content, `-1` for an empty square.
pub fn occupant_code(piece: Option<Piece>) -> i8 {
    piece.map_or(-1, Piece::code)
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.color {
            Color::White => 'w',
            Color::Black => 'b',
        };
        let name = match self.piece_type {
            PieceType::Pawn => "pawn",
            PieceType::Bishop => "bishop",
            PieceType::Knight => "knight",
            PieceType::Rook => "rook",
            PieceType::Queen => "queen",
            PieceType::King => "king",
        };
        write!(f, "{prefix}{name}")
    }
}
