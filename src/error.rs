//! Error types for the rules engine, the board controller and the UCI channel.

use crate::square::Square;
use thiserror::Error;

/// Failures reported by a [`RulesEngine`](crate::rules::RulesEngine).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RulesError {
    /// The move is not legal in the loaded position.
    #[error("illegal move {from}{to}")]
    IllegalMove { from: Square, to: Square },

    /// The position string could not be loaded.
    #[error("invalid position '{fen}': {reason}")]
    InvalidPosition { fen: String, reason: String },

    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    /// Move text that is not coordinate notation (`e2e4`, `a7a8q`).
    #[error("invalid move text '{0}'")]
    InvalidMoveText(String),
}

/// Definitive rejections of a move attempt on the [`Board`](crate::board::Board).
///
/// Whenever one of these is returned the history tree, the state machine and
/// the rules-engine position are exactly as they were before the attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// The promotion resolver did not yield a usable piece.
    #[error("promotion on {from}{to} was not resolved")]
    PromotionUnresolved { from: Square, to: Square },

    /// An externally reported move reached the last rank without naming a piece.
    #[error("move {from}{to} needs a promotion piece")]
    PromotionRequired { from: Square, to: Square },
}

/// Errors of the UCI command channel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UciError {
    /// A command is still waiting for its completion line.
    #[error("engine is busy with '{0}'")]
    Busy(String),

    #[error("engine output arrived with no pending command: '{0}'")]
    NoPendingCommand(String),

    #[error("malformed engine output: '{0}'")]
    Malformed(String),
}
