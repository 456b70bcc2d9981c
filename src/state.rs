//! Controller states and the transition function.

use std::fmt;

/// What the board is waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BoardState {
    /// Before the first update.
    #[default]
    Unknown,
    /// Waiting for the opponent's (or engine's) move.
    OpponentMove,
    /// Waiting for the local player's real move.
    PendingMove,
    /// Predictive play: the local player enters the reply they intend to make.
    PendingIdeaMove,
    /// Predictive play: the local player enters the opponent replies they expect.
    PendingPredictionMove,
}

/// A `(previous, current)` pair of states, matched as a unit for edge actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Transition {
    pub previous: BoardState,
    pub current: BoardState,
}

impl Transition {
    pub fn new(previous: BoardState, current: BoardState) -> Self {
        Self { previous, current }
    }
}

/// Background tint shown for a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tint {
    Neutral,
    Idea,
    Prediction,
}

impl Tint {
    pub fn hex(self) -> &'static str {
        match self {
            Tint::Neutral => "#f0d9b5",
            Tint::Idea => "#a3f79c",
            Tint::Prediction => "#efb3b3",
        }
    }
}

impl BoardState {
    /// State following `self` once the move it waits for has been made.
    ///
    /// `previous` only matters when `self` is [`PendingMove`](Self::PendingMove):
    /// a real move made right after an idea opens the prediction phase.
    pub fn next(self, previous: BoardState, predictive_play: bool) -> BoardState {
        match self {
            BoardState::OpponentMove if predictive_play => BoardState::PendingIdeaMove,
            BoardState::OpponentMove => BoardState::PendingMove,
            BoardState::PendingMove
                if predictive_play && previous == BoardState::PendingIdeaMove =>
            {
                BoardState::PendingPredictionMove
            }
            BoardState::PendingMove => BoardState::OpponentMove,
            BoardState::PendingIdeaMove => BoardState::PendingMove,
            BoardState::PendingPredictionMove => BoardState::OpponentMove,
            BoardState::Unknown => BoardState::Unknown,
        }
    }

    pub fn tint(self) -> Tint {
        match self {
            BoardState::PendingIdeaMove => Tint::Idea,
            BoardState::PendingPredictionMove => Tint::Prediction,
            _ => Tint::Neutral,
        }
    }
}

impl fmt::Display for BoardState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BoardState::Unknown => "unknown",
            BoardState::OpponentMove => "opponentMove",
            BoardState::PendingMove => "pendingMove",
            BoardState::PendingIdeaMove => "pendingIdeaMove",
            BoardState::PendingPredictionMove => "pendingPredictionMove",
        };
        f.write_str(name)
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.previous, self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BoardState::*;

    const ALL: [BoardState; 5] = [
        Unknown,
        OpponentMove,
        PendingMove,
        PendingIdeaMove,
        PendingPredictionMove,
    ];

    #[test]
    fn test_transition_table() {
        for previous in ALL {
            assert_eq!(OpponentMove.next(previous, true), PendingIdeaMove);
            assert_eq!(OpponentMove.next(previous, false), PendingMove);
            assert_eq!(PendingIdeaMove.next(previous, true), PendingMove);
            assert_eq!(PendingIdeaMove.next(previous, false), PendingMove);
            assert_eq!(PendingPredictionMove.next(previous, true), OpponentMove);
            assert_eq!(PendingPredictionMove.next(previous, false), OpponentMove);
            assert_eq!(Unknown.next(previous, true), Unknown);
            assert_eq!(Unknown.next(previous, false), Unknown);
        }
    }

    #[test]
    fn test_pending_move_depends_on_previous() {
        assert_eq!(PendingMove.next(PendingIdeaMove, true), PendingPredictionMove);
        assert_eq!(PendingMove.next(PendingIdeaMove, false), OpponentMove);
        for previous in [Unknown, OpponentMove, PendingMove, PendingPredictionMove] {
            assert_eq!(PendingMove.next(previous, true), OpponentMove);
            assert_eq!(PendingMove.next(previous, false), OpponentMove);
        }
    }

    #[test]
    fn test_only_pending_move_reads_previous() {
        for state in ALL.into_iter().filter(|s| *s != PendingMove) {
            for predictive in [true, false] {
                let outcomes: Vec<BoardState> =
                    ALL.iter().map(|prev| state.next(*prev, predictive)).collect();
                assert!(outcomes.windows(2).all(|w| w[0] == w[1]), "{} varies", state);
            }
        }
    }

    #[test]
    fn test_tints() {
        assert_eq!(PendingMove.tint(), Tint::Neutral);
        assert_eq!(OpponentMove.tint().hex(), "#f0d9b5");
        assert_eq!(PendingIdeaMove.tint().hex(), "#a3f79c");
        assert_eq!(PendingPredictionMove.tint().hex(), "#efb3b3");
    }

    #[test]
    fn test_transition_display() {
        let edge = Transition::new(PendingPredictionMove, OpponentMove);
        assert_eq!(edge.to_string(), "pendingPredictionMove -> opponentMove");
    }
}
