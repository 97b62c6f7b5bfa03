//! The JSON save format.
//!
//! ```json
//! {"time": 1700000000.0, "save": 1700000042.5,
//!  "log": [{"dt": 1700000003.1, "moveCost": 3.1, "sp": [6, 4], "ep": [4, 4],
//!           "piece": 0, "attacked": -1, "promoted": null}]}
//! ```
//!
//! Piece codes are `0..=5` for White (pawn, bishop, knight, rook, queen,
//! king), `6..=11` for Black and `-1` for an empty square.

use crate::logic::piece::{occupant_code, Piece};
use crate::logic::record::MoveRecord;
use crate::logic::square::Square;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not read or write save data: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid piece code {code}")]
    InvalidPieceCode { code: i64 },

    #[error("empty piece code where a piece is required")]
    EmptyPieceCode,

    #[error("square [{rank}, {file}] is not on the board")]
    InvalidSquare { rank: i64, file: i64 },

    #[error("log entry {index} cannot be replayed: {reason}")]
    IllegalRecord { index: usize, reason: String },
}

/// A persisted game, also used as the undo/redo snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedGame {
    /// Logical start of the game, shifted forward on every reload.
    pub time: f64,
    /// Wall-clock time at which the snapshot was taken.
    pub save: f64,
    pub log: Vec<RecordJson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordJson {
    pub dt: f64,
    #[serde(rename = "moveCost")]
    pub move_cost: f64,
    pub sp: [i64; 2],
    pub ep: [i64; 2],
    pub piece: i64,
    pub attacked: i64,
    pub promoted: Option<i64>,
}

impl From<&MoveRecord> for RecordJson {
    fn from(record: &MoveRecord) -> Self {
        Self {
            dt: record.dt,
            move_cost: record.move_cost,
            sp: square_to_pair(record.from),
            ep: square_to_pair(record.to),
            piece: i64::from(record.piece.code()),
            attacked: i64::from(occupant_code(record.captured)),
            promoted: record.promoted.map(|piece| i64::from(piece.code())),
        }
    }
}

impl RecordJson {
    /// Decodes the entry, shifting its timestamp by `offset` seconds.
    pub fn to_record(&self, offset: f64) -> Result<MoveRecord, PersistenceError> {
        Ok(MoveRecord {
            dt: self.dt + offset,
            from: pair_to_square(self.sp)?,
            to: pair_to_square(self.ep)?,
            piece: required_piece(self.piece)?,
            captured: occupant(self.attacked)?,
            promoted: self.promoted.map(required_piece).transpose()?,
            move_cost: self.move_cost,
        })
    }
}

impl SavedGame {
    pub fn new(time: f64, save: f64, log: &[MoveRecord]) -> Self {
        Self {
            time,
            save,
            log: log.iter().map(RecordJson::from).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decodes every entry, shifting timestamps by `offset` seconds.
    pub fn records(&self, offset: f64) -> Result<Vec<MoveRecord>, PersistenceError> {
        self.log.iter().map(|entry| entry.to_record(offset)).collect()
    }
}

fn square_to_pair(square: Square) -> [i64; 2] {
    [square.rank() as i64, square.file() as i64]
}

fn pair_to_square([rank, file]: [i64; 2]) -> Result<Square, PersistenceError> {
    isize::try_from(rank)
        .ok()
        .zip(isize::try_from(file).ok())
        .and_then(|(r, f)| Square::new(r, f))
        .ok_or(PersistenceError::InvalidSquare { rank, file })
}

fn required_piece(code: i64) -> Result<Piece, PersistenceError> {
    occupant(code)?.ok_or(PersistenceError::EmptyPieceCode)
}

fn occupant(code: i64) -> Result<Option<Piece>, PersistenceError> {
    if code == -1 {
        return Ok(None);
    }
    Piece::from_code(code)
        .map(Some)
        .ok_or(PersistenceError::InvalidPieceCode { code })
}
