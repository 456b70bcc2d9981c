use crate::color::{Perspective, Side};
use crate::rules::Destinations;
use crate::square::{PromotionPiece, Square};
use std::collections::BTreeMap;

pub mod console;

/// Legal destinations keyed by origin square. Origins without destinations are absent.
pub type Dests = BTreeMap<Square, Destinations>;

/// Piece-layer overrides: `Some` places a piece, `None` clears the square.
pub type PiecesDiff = Vec<(Square, Option<PieceView>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Role {
    pub fn name(self) -> &'static str {
        match self {
            Role::Pawn => "pawn",
            Role::Knight => "knight",
            Role::Bishop => "bishop",
            Role::Rook => "rook",
            Role::Queen => "queen",
            Role::King => "king",
        }
    }
}

impl From<PromotionPiece> for Role {
    fn from(piece: PromotionPiece) -> Self {
        match piece {
            PromotionPiece::Rook => Role::Rook,
            PromotionPiece::Knight => Role::Knight,
            PromotionPiece::Bishop => Role::Bishop,
            PromotionPiece::Queen => Role::Queen,
        }
    }
}

/// A piece as the widget draws it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PieceView {
    pub role: Role,
    pub color: Side,
}

/// Which pieces the user may drag and where they may go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Movable {
    /// Allow moves to any square, ignoring `dests`. The controller always sends `false`.
    pub free: bool,
    pub color: Perspective,
    pub dests: Dests,
}

/// Highlighting options of the widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    pub check: bool,
    pub last_move: bool,
}

/// A partial widget update. Fields left as `None` keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WidgetConfig {
    pub fen: Option<String>,
    pub check: Option<bool>,
    pub turn_color: Option<Side>,
    pub movable: Option<Movable>,
    pub last_move: Option<(Square, Square)>,
    pub highlight: Option<Highlight>,
    pub pieces: Option<PiecesDiff>,
}

/// The visual board the controller drives.
///
/// The widget is a rendering mirror only: it never decides legality. When the
/// user completes a drag on it, the host forwards `(origin, destination)` to
/// [`Board::submit`](crate::board::Board::submit).
pub trait BoardWidget {
    /// Apply a partial configuration update.
    fn set(&mut self, config: WidgetConfig);

    /// Move the piece on `from` to `to` without any legality check.
    /// Used to mirror moves that did not originate from a drag on the widget.
    fn move_piece(&mut self, from: Square, to: Square);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_promotion() {
        assert_eq!(Role::from(PromotionPiece::Queen), Role::Queen);
        assert_eq!(Role::from(PromotionPiece::Knight).name(), "knight");
    }

    #[test]
    fn test_default_config_is_empty() {
        let config = WidgetConfig::default();
        assert!(config.fen.is_none());
        assert!(config.movable.is_none());
        assert!(config.pieces.is_none());
    }
}
