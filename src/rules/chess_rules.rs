use super::{Destinations, MoveAttempt, MoveRecord, RulesEngine};
use crate::color::Turn;
use crate::error::RulesError;
use crate::square::{PromotionPiece, Square};
use chess::{ChessMove, MoveGen};
use std::str::FromStr;

/// [`RulesEngine`] backed by the `chess` crate's legal move generator.
#[derive(Clone, Debug)]
pub struct ChessRules {
    board: chess::Board,
}

impl Default for ChessRules {
    fn default() -> Self {
        Self {
            board: chess::Board::default(),
        }
    }
}

impl ChessRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_fen(fen: &str) -> Result<Self, RulesError> {
        Ok(Self {
            board: parse_board(fen)?,
        })
    }

    fn legal_from(&self, from: Square) -> impl Iterator<Item = ChessMove> {
        let source = to_chess_square(from);
        MoveGen::new_legal(&self.board).filter(move |mv| mv.get_source() == source)
    }
}

impl RulesEngine for ChessRules {
    fn make_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PromotionPiece>,
    ) -> Result<MoveAttempt, RulesError> {
        let candidate = ChessMove::new(
            to_chess_square(from),
            to_chess_square(to),
            promotion.map(to_chess_piece),
        );

        if !self.board.legal(candidate) {
            let dest = to_chess_square(to);
            let promotes = promotion.is_none()
                && self
                    .legal_from(from)
                    .any(|mv| mv.get_dest() == dest && mv.get_promotion().is_some());
            return if promotes {
                Ok(MoveAttempt::NeedsPromotion)
            } else {
                Err(RulesError::IllegalMove { from, to })
            };
        }

        let color = self.turn_to_move();
        let before = self.current_position();
        self.board = self.board.make_move_new(candidate);

        Ok(MoveAttempt::Played(MoveRecord {
            from,
            to,
            promotion,
            color,
            before,
            after: self.current_position(),
        }))
    }

    fn legal_moves(&self, square: Square) -> Destinations {
        let mut dests = Destinations::new();
        for mv in self.legal_from(square) {
            let dest = from_chess_square(mv.get_dest());
            // The four promotion choices share one destination.
            if !dests.contains(&dest) {
                dests.push(dest);
            }
        }
        dests
    }

    fn load_position(&mut self, fen: &str) -> Result<(), RulesError> {
        self.board = parse_board(fen)?;
        Ok(())
    }

    fn current_position(&self) -> String {
        self.board.to_string()
    }

    fn is_in_check(&self) -> bool {
        self.board.checkers().popcnt() > 0
    }

    fn turn_to_move(&self) -> Turn {
        match self.board.side_to_move() {
            chess::Color::White => Turn::W,
            chess::Color::Black => Turn::B,
        }
    }
}

fn parse_board(fen: &str) -> Result<chess::Board, RulesError> {
    chess::Board::from_str(fen).map_err(|err| RulesError::InvalidPosition {
        fen: fen.to_string(),
        reason: format!("{:?}", err),
    })
}

fn to_chess_square(square: Square) -> chess::Square {
    chess::Square::make_square(
        chess::Rank::from_index(square.rank() as usize),
        chess::File::from_index(square.file() as usize),
    )
}

fn from_chess_square(square: chess::Square) -> Square {
    Square::new(square.to_index() as u8)
}

fn to_chess_piece(piece: PromotionPiece) -> chess::Piece {
    match piece {
        PromotionPiece::Rook => chess::Piece::Rook,
        PromotionPiece::Knight => chess::Piece::Knight,
        PromotionPiece::Bishop => chess::Piece::Bishop,
        PromotionPiece::Queen => chess::Piece::Queen,
    }
}
