//! Board squares and promotion pieces shared by the rules engine, the widget
//! and the controller.
//!
//! Squares use the same 0-63 indexing as a mailbox board: `0 = a1`, `7 = h1`,
//! `56 = a8`, `63 = h8`. Text form is algebraic (`"e4"`).

use crate::error::RulesError;
use std::fmt;
use std::str::FromStr;

/// A square on the 8x8 board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square(u8);

impl Square {
    /// Create a square from its index (0-63).
    ///
    /// # Panics
    ///
    /// Panics if `index` is >= 64.
    pub fn new(index: u8) -> Self {
        assert!(index < 64, "Square index {} out of bounds (0-63)", index);
        Self(index)
    }

    /// Create a square from zero-based file (a = 0) and rank (1 = 0).
    pub fn from_coords(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self(rank * 8 + file))
        } else {
            None
        }
    }

    pub fn index(self) -> u8 {
        self.0
    }

    pub fn file(self) -> u8 {
        self.0 % 8
    }

    pub fn rank(self) -> u8 {
        self.0 / 8
    }

    /// All 64 squares, a1 first, h8 last.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

impl FromStr for Square {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(RulesError::InvalidSquare(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Square::from_coords(file, rank).ok_or_else(|| RulesError::InvalidSquare(s.to_string()))
    }
}

/// Pieces a pawn may promote to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromotionPiece {
    Rook,
    Knight,
    Bishop,
    Queen,
}

impl PromotionPiece {
    pub const ALL: [PromotionPiece; 4] = [
        PromotionPiece::Queen,
        PromotionPiece::Rook,
        PromotionPiece::Bishop,
        PromotionPiece::Knight,
    ];

    /// Parse the lowercase letter used by engines and move text (`q`, `r`, `b`, `n`).
    /// Uppercase letters are accepted as well.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'r' => Some(Self::Rook),
            'n' => Some(Self::Knight),
            'b' => Some(Self::Bishop),
            'q' => Some(Self::Queen),
            _ => None,
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Self::Rook => 'r',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Queen => 'q',
        }
    }
}

impl fmt::Display for PromotionPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}
