use crate::logic::piece::PieceType;
use serde::{Deserialize, Serialize};

pub const VAL_PAWN: i64 = 20;
pub const VAL_BISHOP: i64 = 70;
pub const VAL_KNIGHT: i64 = 80;
pub const VAL_ROOK: i64 = 120;
pub const VAL_QUEEN: i64 = 300;
pub const VAL_KING: i64 = 999_999_999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Plies explored below the root move.
    pub depth: u8,

    // Capture weights
    pub val_pawn: i64,
    pub val_bishop: i64,
    pub val_knight: i64,
    pub val_rook: i64,
    pub val_queen: i64,
    pub val_king: i64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            depth: 2,
            val_pawn: VAL_PAWN,
            val_bishop: VAL_BISHOP,
            val_knight: VAL_KNIGHT,
            val_rook: VAL_ROOK,
            val_queen: VAL_QUEEN,
            val_king: VAL_KING,
        }
    }
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json_str)
    }

    pub const fn piece_value(&self, piece_type: PieceType) -> i64 {
        match piece_type {
            PieceType::Pawn => self.val_pawn,
            PieceType::Bishop => self.val_bishop,
            PieceType::Knight => self.val_knight,
            PieceType::Rook => self.val_rook,
            PieceType::Queen => self.val_queen,
            PieceType::King => self.val_king,
        }
    }
}
