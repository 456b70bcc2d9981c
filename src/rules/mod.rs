//! Rules-engine boundary.
//!
//! The controller never computes legality itself. Everything it needs from
//! chess rules goes through [`RulesEngine`]; [`ChessRules`] is the bundled
//! implementation.

use crate::color::Turn;
use crate::error::RulesError;
use crate::square::{PromotionPiece, Square};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

mod chess_rules;
pub use chess_rules::ChessRules;

/// FEN of the standard starting position.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Legal destinations of one origin square, in engine order, without duplicates.
pub type Destinations = SmallVec<[Square; 8]>;

/// A move the rules engine accepted and applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PromotionPiece>,
    /// Side that made the move.
    pub color: Turn,
    /// Position before the move.
    pub before: String,
    /// Position after the move.
    pub after: String,
}

impl MoveRecord {
    /// Coordinate notation, e.g. `e2e4` or `a7a8q`.
    pub fn uci(&self) -> String {
        MoveText {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
        .to_string()
    }
}

/// Result of a move attempt that was not rejected outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveAttempt {
    Played(MoveRecord),
    /// A pawn reaches the last rank and no promotion piece was given.
    /// Nothing was applied; retry with a piece.
    NeedsPromotion,
}

/// Parsed coordinate move text (`e2e4`, `e7e8q`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveText {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PromotionPiece>,
}

impl FromStr for MoveText {
    type Err = RulesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if !s.is_ascii() || !(4..=5).contains(&s.len()) {
            return Err(RulesError::InvalidMoveText(s.to_string()));
        }
        let invalid = |_| RulesError::InvalidMoveText(s.to_string());
        let from = s[0..2].parse::<Square>().map_err(invalid)?;
        let to = s[2..4].parse::<Square>().map_err(invalid)?;
        let promotion = match s[4..].chars().next() {
            Some(c) => Some(
                PromotionPiece::from_char(c)
                    .ok_or_else(|| RulesError::InvalidMoveText(s.to_string()))?,
            ),
            None => None,
        };
        Ok(Self { from, to, promotion })
    }
}

impl fmt::Display for MoveText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(piece) = self.promotion {
            write!(f, "{}", piece)?;
        }
        Ok(())
    }
}

/// Chess rules as seen by the board controller.
///
/// Implementations own one position. The controller is the only caller that
/// mutates it (`make_move`, `load_position`).
pub trait RulesEngine {
    /// Try to play `from -> to`.
    ///
    /// Returns [`MoveAttempt::NeedsPromotion`] when the move would be legal with
    /// a promotion piece but none was given, and `Err(RulesError::IllegalMove)`
    /// for every other rejection. Neither case touches the position.
    fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PromotionPiece>,
    ) -> Result<MoveAttempt, RulesError>;

    /// Legal destinations of the piece on `square` for the side to move.
    fn legal_moves(&self, square: Square) -> Destinations;

    /// Replace the position. On error the previous position is kept.
    fn load_position(&mut self, fen: &str) -> Result<(), RulesError>;

    fn current_position(&self) -> String;

    /// Whether the side to move is in check.
    fn is_in_check(&self) -> bool;

    fn turn_to_move(&self) -> Turn;
}

/// Flip the turn field of a FEN string.
///
/// The en passant field is cleared because a target square is only meaningful
/// for the side that was to move.
pub fn invert_fen_turn(fen: &str) -> Result<String, RulesError> {
    let mut fields: Vec<&str> = fen.split_whitespace().collect();
    let invalid = |reason: &str| RulesError::InvalidPosition {
        fen: fen.to_string(),
        reason: reason.to_string(),
    };
    let turn = fields
        .get(1)
        .and_then(|field| Turn::from_fen_field(field))
        .ok_or_else(|| invalid("missing or malformed turn field"))?;
    let inverted = crate::color::Invert::invert(turn);
    fields[1] = inverted.as_fen_field();
    if fields.len() > 3 {
        fields[3] = "-";
    }
    Ok(fields.join(" "))
}
