//! Turn colors as seen by the rules engine and by the board widget.
//!
//! The rules engine speaks FEN (`w` / `b`), the widget speaks `white` / `black`.
//! Both are plain enums here; conversion between them is total and lossless.

use std::fmt;

/// Side to move in the rules engine's representation (the FEN turn field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Turn {
    W,
    B,
}

/// Color in the board widget's representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

/// Flip a color to the other side.
pub trait Invert {
    fn invert(self) -> Self;
}

impl Invert for Turn {
    fn invert(self) -> Self {
        match self {
            Turn::W => Turn::B,
            Turn::B => Turn::W,
        }
    }
}

impl Invert for Side {
    fn invert(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }
}

pub fn to_engine_color(side: Side) -> Turn {
    match side {
        Side::White => Turn::W,
        Side::Black => Turn::B,
    }
}

pub fn to_widget_color(turn: Turn) -> Side {
    match turn {
        Turn::W => Side::White,
        Turn::B => Side::Black,
    }
}

impl From<Side> for Turn {
    fn from(side: Side) -> Self {
        to_engine_color(side)
    }
}

impl From<Turn> for Side {
    fn from(turn: Turn) -> Self {
        to_widget_color(turn)
    }
}

impl Turn {
    /// Parse the FEN turn field.
    pub fn from_fen_field(field: &str) -> Option<Self> {
        match field {
            "w" => Some(Turn::W),
            "b" => Some(Turn::B),
            _ => None,
        }
    }

    pub fn as_fen_field(self) -> &'static str {
        match self {
            Turn::W => "w",
            Turn::B => "b",
        }
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_fen_field())
    }
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::White => "white",
            Side::Black => "black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which side(s) the local player enters moves for.
///
/// Also used as the widget's movable color: `Both` lets either side's pieces move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Perspective {
    White,
    Black,
    Both,
}

impl From<Side> for Perspective {
    fn from(side: Side) -> Self {
        match side {
            Side::White => Perspective::White,
            Side::Black => Perspective::Black,
        }
    }
}

impl Perspective {
    /// Whether pieces of `side` may be moved under this perspective.
    pub fn allows(self, side: Side) -> bool {
        match self {
            Perspective::Both => true,
            Perspective::White => side == Side::White,
            Perspective::Black => side == Side::Black,
        }
    }
}
