//! Session configuration for a [`Board`](crate::board::Board).
//!
//! A configuration is fixed for the lifetime of a board; start a new board to
//! change it.

use crate::color::{Perspective, Side};
use crate::pacing::REVEAL_DELAY;
use crate::rules::START_FEN;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Playing one side against an opponent or engine.
    Game,
    /// Free exploration, both sides movable.
    Analysis,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    pub mode: Mode,
    /// Side(s) the local player enters moves for
    pub perspective: Perspective,
    /// Enable idea and prediction moves
    pub predictive_play: bool,
    /// How long idea and prediction moves stay visible before the board resyncs
    pub reveal_delay: Duration,
    /// Position the session starts from
    pub start_position: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Analysis,
            perspective: Perspective::Both,
            predictive_play: false,
            reveal_delay: REVEAL_DELAY,
            start_position: START_FEN.to_string(),
        }
    }
}

impl BoardConfig {
    /// Play `side` against an opponent.
    pub fn game(side: Side, predictive_play: bool) -> Self {
        Self {
            mode: Mode::Game,
            perspective: side.into(),
            predictive_play,
            ..Self::default()
        }
    }

    /// Analysis board: both sides movable, no predictive play.
    pub fn analysis() -> Self {
        Self::default()
    }

    pub fn with_start_position(mut self, fen: impl Into<String>) -> Self {
        self.start_position = fen.into();
        self
    }

    pub fn with_reveal_delay(mut self, delay: Duration) -> Self {
        self.reveal_delay = delay;
        self
    }

    /// The side the local player controls, `None` in analysis.
    pub fn controlled_side(&self) -> Option<Side> {
        match self.perspective {
            Perspective::White => Some(Side::White),
            Perspective::Black => Some(Side::Black),
            Perspective::Both => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_config() {
        let config = BoardConfig::game(Side::Black, true);
        assert_eq!(config.mode, Mode::Game);
        assert_eq!(config.perspective, Perspective::Black);
        assert!(config.predictive_play);
        assert_eq!(config.controlled_side(), Some(Side::Black));
        assert_eq!(config.reveal_delay, Duration::from_millis(700));
    }

    #[test]
    fn test_analysis_defaults() {
        let config = BoardConfig::analysis();
        assert_eq!(config.mode, Mode::Analysis);
        assert_eq!(config.perspective, Perspective::Both);
        assert!(!config.predictive_play);
        assert_eq!(config.controlled_side(), None);
        assert_eq!(config.start_position, START_FEN);
    }

    #[test]
    fn test_builders() {
        let config = BoardConfig::game(Side::White, false)
            .with_start_position("4k3/P7/8/8/8/8/8/4K3 w - - 0 1")
            .with_reveal_delay(Duration::ZERO);
        assert_eq!(config.reveal_delay, Duration::ZERO);
        assert!(config.start_position.starts_with("4k3/P7"));
    }
}
