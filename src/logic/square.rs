use serde::{Deserialize, Serialize};
use std::fmt;

pub const BOARD_SIZE: usize = 8;

/// A square on the board. Rank 0 is Black's back rank, file 0 is the a-file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSquare")]
pub struct Square {
    rank: u8,
    file: u8,
}

/// Unchecked wire form, only turned into a [`Square`] through [`Square::new`].
#[derive(Deserialize)]
struct RawSquare {
    rank: i64,
    file: i64,
}

impl TryFrom<RawSquare> for Square {
    type Error = String;

    fn try_from(raw: RawSquare) -> Result<Self, Self::Error> {
        isize::try_from(raw.rank)
            .ok()
            .zip(isize::try_from(raw.file).ok())
            .and_then(|(rank, file)| Self::new(rank, file))
            .ok_or_else(|| format!("square [{}, {}] is not on the board", raw.rank, raw.file))
    }
}

impl Square {
    /// Returns `None` for anything off the board.
    pub fn new(rank: isize, file: isize) -> Option<Self> {
        let rank = u8::try_from(rank).ok()?;
        let file = u8::try_from(file).ok()?;
        if usize::from(rank) < BOARD_SIZE && usize::from(file) < BOARD_SIZE {
            Some(Self { rank, file })
        } else {
            None
        }
    }

    pub const fn rank(self) -> usize {
        self.rank as usize
    }

    pub const fn file(self) -> usize {
        self.file as usize
    }

    pub const fn index(self) -> usize {
        self.rank() * BOARD_SIZE + self.file()
    }

    /// Square reached by stepping `(dr, df)`, `None` once it leaves the board.
    pub fn offset(self, dr: isize, df: isize) -> Option<Self> {
        Self::new(self.rank as isize + dr, self.file as isize + df)
    }

    /// All 64 squares, rank by rank.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..BOARD_SIZE as u8)
            .flat_map(|rank| (0..BOARD_SIZE as u8).map(move |file| Self { rank, file }))
    }

    /// Parses algebraic notation such as `e4`.
    pub fn from_algebraic(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let file = chars.next()?;
        let rank = chars.next()?.to_digit(10)?;
        if chars.next().is_some() || !('a'..='h').contains(&file) {
            return None;
        }
        Self::new(8 - rank as isize, file as isize - 'a' as isize)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let file = char::from(b'a' + self.file);
        write!(f, "{file}{}", BOARD_SIZE - self.rank())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_off_board_is_unrepresentable() {
        assert!(Square::new(-1, 0).is_none());
        assert!(Square::new(0, 8).is_none());
        assert!(Square::new(8, 8).is_none());
        assert!(Square::new(7, 7).is_some());
        assert!(Square::new(0, 0).unwrap().offset(-1, 0).is_none());
    }

    #[test]
    fn test_algebraic_names() {
        let e2 = Square::from_algebraic("e2").unwrap();
        assert_eq!((e2.rank(), e2.file()), (6, 4));
        assert_eq!(e2.to_string(), "e2");
        assert_eq!(Square::new(0, 0).unwrap().to_string(), "a8");
        assert!(Square::from_algebraic("i1").is_none());
        assert!(Square::from_algebraic("a9").is_none());
        assert_eq!(Square::all().count(), 64);
    }

    #[test]
    fn test_deserialize_rejects_off_board() {
        assert!(serde_json::from_str::<Square>(r#"{"rank":9,"file":3}"#).is_err());
        assert!(serde_json::from_str::<Square>(r#"{"rank":0,"file":-1}"#).is_err());

        let e2 = Square::from_algebraic("e2").unwrap();
        let json = serde_json::to_string(&e2).unwrap();
        assert_eq!(json, r#"{"rank":6,"file":4}"#);
        assert_eq!(serde_json::from_str::<Square>(&json).unwrap(), e2);
    }
}
