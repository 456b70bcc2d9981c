use crate::color::{Invert, Side};
use crate::config::BoardConfig;
use crate::error::BoardError;
use crate::history::{History, MoveNode};
use crate::pacing::{Pacer, ThreadPacer};
use crate::promotion::PromotionResolver;
use crate::rules::{invert_fen_turn, ChessRules, MoveAttempt, MoveRecord, MoveText, RulesEngine};
use crate::square::{PromotionPiece, Square};
use crate::state::{BoardState, Tint, Transition};
use crate::widget::{BoardWidget, Dests, Highlight, Movable, PieceView, WidgetConfig};
use log::{debug, error, info, warn};

/// Board controller: owns the rules engine, the widget handle and the move
/// history of one session, and keeps the three consistent.
///
/// # Architecture
///
/// - The rules engine holds the authoritative position; the board is its only mutator
/// - The widget is a rendering mirror updated through [`BoardWidget::set`]
/// - The [`History`] records realized, idea and prediction moves
/// - A [`BoardState`] machine decides what the next move means
///
/// # Exclusive access
///
/// [`submit`](Self::submit), [`apply`](Self::apply) and [`update`](Self::update)
/// take `&mut self` and may suspend (promotion prompt, reveal delay). The
/// borrow lasts until the returned future settles, so two moves can never
/// interleave on one board; a caller holding the board in shared ownership
/// must not hand it out again while a future is pending.
///
/// # Usage
///
/// ```rust,ignore
/// let mut board = Board::new(widget, Box::new(AutoPromote::default()), BoardConfig::game(Side::White, true))?;
/// board.on_move(|mv| engine.make_move(mv.uci()));
///
/// // A drag completed on the widget
/// pollster::block_on(board.submit(from, to))?;
///
/// // The engine answered
/// pollster::block_on(board.play("e7e5"))?;
/// ```
pub struct Board {
    rules: Box<dyn RulesEngine>,
    widget: Box<dyn BoardWidget>,
    promoter: Box<dyn PromotionResolver>,
    pacer: Box<dyn Pacer>,
    config: BoardConfig,
    history: History,
    state: BoardState,
    previous_state: BoardState,
    move_listener: Option<Box<dyn FnMut(&MoveRecord)>>,
}

impl Board {
    /// Create a board using [`ChessRules`] and real-time pacing.
    pub fn new(
        widget: Box<dyn BoardWidget>,
        promoter: Box<dyn PromotionResolver>,
        config: BoardConfig,
    ) -> Result<Self, BoardError> {
        Self::with_parts(
            Box::new(ChessRules::new()),
            widget,
            promoter,
            Box::new(ThreadPacer),
            config,
        )
    }

    /// Create a board from explicit collaborators.
    ///
    /// The rules engine is reset to `config.start_position`.
    pub fn with_parts(
        mut rules: Box<dyn RulesEngine>,
        widget: Box<dyn BoardWidget>,
        promoter: Box<dyn PromotionResolver>,
        pacer: Box<dyn Pacer>,
        config: BoardConfig,
    ) -> Result<Self, BoardError> {
        rules.load_position(&config.start_position)?;
        info!("new board: {:?}", config);

        let mut board = Self {
            rules,
            widget,
            promoter,
            pacer,
            config,
            history: History::new(),
            previous_state: BoardState::Unknown,
            state: BoardState::Unknown,
            move_listener: None,
        };
        // Bootstrap straight into the first move; the (unknown, pendingMove)
        // edge creates the first history node on the first update.
        board.state = BoardState::PendingMove;

        let turn = Side::from(board.rules.turn_to_move());
        let initial = WidgetConfig {
            fen: Some(board.config.start_position.clone()),
            check: Some(board.rules.is_in_check()),
            turn_color: Some(turn),
            movable: Some(Movable {
                free: false,
                color: turn.into(),
                dests: board.dests(),
            }),
            highlight: Some(Highlight {
                check: true,
                last_move: true,
            }),
            ..Default::default()
        };
        board.widget.set(initial);
        Ok(board)
    }

    // ===========================
    // Queries
    // ===========================

    pub fn state(&self) -> BoardState {
        self.state
    }

    pub fn previous_state(&self) -> BoardState {
        self.previous_state
    }

    /// The `(previous, current)` edge the machine last took.
    pub fn transition(&self) -> Transition {
        Transition::new(self.previous_state, self.state)
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn rules(&self) -> &dyn RulesEngine {
        self.rules.as_ref()
    }

    /// Background tint for the current state.
    pub fn tint(&self) -> Tint {
        self.state.tint()
    }

    /// Legal destinations of every origin square that has at least one.
    pub fn dests(&self) -> Dests {
        Square::all()
            .filter_map(|square| {
                let dests = self.rules.legal_moves(square);
                (!dests.is_empty()).then_some((square, dests))
            })
            .collect()
    }

    /// Rebuild the game position by replaying the realized moves of the current
    /// line from the start position. Ideas and predictions are skipped.
    pub fn replay_position(&self) -> Result<String, BoardError> {
        let mut rules = ChessRules::from_fen(&self.config.start_position)?;
        for mv in self.history.realized_moves() {
            if let MoveAttempt::NeedsPromotion = rules.make_move(mv.from, mv.to, mv.promotion)? {
                return Err(BoardError::PromotionRequired {
                    from: mv.from,
                    to: mv.to,
                });
            }
        }
        Ok(rules.current_position())
    }

    /// Register the listener called with the local player's realized move each
    /// time the board starts waiting for the opponent.
    pub fn on_move(&mut self, listener: impl FnMut(&MoveRecord) + 'static) {
        self.move_listener = Some(Box::new(listener));
    }

    // ===========================
    // Moves
    // ===========================

    /// Handle a move the user completed on the widget.
    ///
    /// An unresolved promotion suspends on the promotion resolver; the chosen
    /// piece is shown on the widget before the move is finalized. Any rejection
    /// leaves history, state, position and widget untouched.
    pub async fn submit(&mut self, from: Square, to: Square) -> Result<MoveRecord, BoardError> {
        let mover = Side::from(self.rules.turn_to_move());

        let record = match self.rules.make_move(from, to, None) {
            Ok(MoveAttempt::Played(record)) => record,
            Ok(MoveAttempt::NeedsPromotion) => {
                debug!("{}{} needs a promotion piece", from, to);
                let piece = self
                    .promoter
                    .resolve()
                    .await
                    .ok_or(BoardError::PromotionUnresolved { from, to })?;
                self.show_promotion(to, piece, mover);
                match self.rules.make_move(from, to, Some(piece))? {
                    MoveAttempt::Played(record) => record,
                    MoveAttempt::NeedsPromotion => {
                        return Err(BoardError::PromotionUnresolved { from, to })
                    }
                }
            }
            Err(err) => {
                debug!("rejected {}{}: {}", from, to, err);
                return Err(err.into());
            }
        };

        self.update(record.clone()).await;
        Ok(record)
    }

    /// Apply a move reported from outside the widget (opponent, engine).
    ///
    /// The widget mirrors the piece movement before the board advances.
    pub async fn apply(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PromotionPiece>,
    ) -> Result<MoveRecord, BoardError> {
        let record = match self.rules.make_move(from, to, promotion)? {
            MoveAttempt::Played(record) => record,
            MoveAttempt::NeedsPromotion => return Err(BoardError::PromotionRequired { from, to }),
        };

        self.widget.move_piece(from, to);
        self.widget.set(WidgetConfig {
            fen: Some(record.after.clone()),
            last_move: Some((from, to)),
            ..Default::default()
        });

        self.update(record.clone()).await;
        Ok(record)
    }

    /// [`apply`](Self::apply) a move given in coordinate notation (`e7e5`, `b2b1q`).
    pub async fn play(&mut self, text: &str) -> Result<MoveRecord, BoardError> {
        let mv: MoveText = text.parse()?;
        self.apply(mv.from, mv.to, mv.promotion).await
    }

    /// Advance the board after the rules engine completed `mv`.
    ///
    /// `mv` must already be applied to the rules engine; [`submit`](Self::submit)
    /// and [`apply`](Self::apply) do that before calling here.
    pub async fn update(&mut self, mv: MoveRecord) {
        let mut turn = Side::from(mv.color.invert());
        let mut movable = self.config.perspective;
        let next = self.state.next(self.previous_state, self.config.predictive_play);

        if self.transition() == Transition::new(BoardState::Unknown, BoardState::PendingMove) {
            self.history.create_child();
        }

        match self.state {
            BoardState::OpponentMove => self.history.create_child().set_realized(mv),
            BoardState::PendingMove => {
                // Fill the node opened by the bootstrap or an idea; after a
                // realized opponent move the reply goes one ply deeper.
                if self.history.line().is_empty() || self.history.current_node().is_completed() {
                    self.history.create_child();
                }
                self.history.current_node_mut().set_realized(mv);
            }
            BoardState::PendingIdeaMove => {
                self.history.create_child().set_idea(mv);
                self.pacer.pause(self.config.reveal_delay).await;
                self.resync_to_last_completed();
                // The idea's mover is the inverted side, or the real one if inversion was refused.
                turn = Side::from(self.rules.turn_to_move());
            }
            BoardState::PendingPredictionMove => self.history.current_node_mut().push_prediction(mv),
            BoardState::Unknown => {
                error!("update with move {} in state {}", mv.uci(), self.state);
            }
        }

        self.previous_state = self.state;
        self.state = next;
        debug!("board transition {}", self.transition());

        match self.state {
            BoardState::PendingIdeaMove => {
                if self.invert_engine_turn() {
                    turn = turn.invert();
                    movable = turn.into();
                }
            }
            BoardState::PendingPredictionMove => movable = turn.into(),
            _ => {}
        }

        if self.transition()
            == Transition::new(BoardState::PendingPredictionMove, BoardState::OpponentMove)
        {
            self.pacer.pause(self.config.reveal_delay).await;
            self.resync_to_last_completed();
            // The prediction's mover no longer decides the turn once it is discarded.
            turn = Side::from(self.rules.turn_to_move());
        }

        if self.state == BoardState::OpponentMove {
            if let (Some(listener), Some(mv)) =
                (self.move_listener.as_mut(), self.history.current_node().realized())
            {
                listener(mv);
            }
        }

        let refresh = WidgetConfig {
            fen: Some(self.rules.current_position()),
            check: Some(self.rules.is_in_check()),
            turn_color: Some(turn),
            movable: Some(Movable {
                free: false,
                color: movable,
                dests: self.dests(),
            }),
            ..Default::default()
        };
        self.widget.set(refresh);
    }

    // ===========================
    // Internals
    // ===========================

    /// Put the engine and the widget back on the last realized move, dropping
    /// whatever idea or prediction is on display.
    fn resync_to_last_completed(&mut self) {
        let (fen, last_move) = match self.history.last_completed_node().and_then(MoveNode::realized) {
            Some(mv) => (mv.after.clone(), Some((mv.from, mv.to))),
            None => (self.config.start_position.clone(), None),
        };

        if let Err(err) = self.rules.load_position(&fen) {
            error!("failed to resync to last completed position: {}", err);
        }
        self.widget.set(WidgetConfig {
            fen: Some(fen),
            last_move,
            ..Default::default()
        });
    }

    /// Flip the side to move in the engine so the local player can enter a
    /// move for the other side. Returns `false` when the engine keeps the real turn.
    fn invert_engine_turn(&mut self) -> bool {
        let fen = self.rules.current_position();
        let inverted = invert_fen_turn(&fen).and_then(|inverted| self.rules.load_position(&inverted));
        match inverted {
            Ok(()) => true,
            Err(err) => {
                // Usually the side not to move would be left in check.
                warn!("cannot invert side to move, keeping {}: {}", fen, err);
                false
            }
        }
    }

    fn show_promotion(&mut self, square: Square, piece: PromotionPiece, color: Side) {
        self.widget.set(WidgetConfig {
            pieces: Some(vec![(
                square,
                Some(PieceView {
                    role: piece.into(),
                    color,
                }),
            )]),
            ..Default::default()
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Perspective, Turn};
    use crate::pacing::NoPacer;
    use crate::promotion::AutoPromote;
    use crate::rules::START_FEN;

    struct NullWidget;

    impl BoardWidget for NullWidget {
        fn set(&mut self, _config: WidgetConfig) {}
        fn move_piece(&mut self, _from: Square, _to: Square) {}
    }

    /// Keeps the last full update (the one carrying `movable`).
    #[derive(Clone, Default)]
    struct LastUpdate(std::rc::Rc<std::cell::RefCell<Option<WidgetConfig>>>);

    impl BoardWidget for LastUpdate {
        fn set(&mut self, config: WidgetConfig) {
            if config.movable.is_some() {
                *self.0.borrow_mut() = Some(config);
            }
        }
        fn move_piece(&mut self, _from: Square, _to: Square) {}
    }

    fn board(config: BoardConfig) -> Board {
        Board::with_parts(
            Box::new(ChessRules::new()),
            Box::new(NullWidget),
            Box::new(AutoPromote::default()),
            Box::new(NoPacer),
            config,
        )
        .unwrap()
    }

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_new_board_loads_start_position() {
        let board = board(BoardConfig::analysis());
        assert_eq!(board.rules().current_position(), START_FEN);
        assert_eq!(board.transition(), Transition::new(BoardState::Unknown, BoardState::PendingMove));
        assert_eq!(board.tint(), Tint::Neutral);
        assert_eq!(board.config().perspective, Perspective::Both);
    }

    #[test]
    fn test_dests_only_lists_movable_pieces() {
        let board = board(BoardConfig::analysis());
        let dests = board.dests();
        assert_eq!(dests.len(), 10);
        let mut pawn = dests[&sq("e2")].to_vec();
        pawn.sort();
        assert_eq!(pawn, [sq("e3"), sq("e4")]);
        assert_eq!(dests[&sq("g1")].len(), 2);
        assert!(!dests.contains_key(&sq("e1")));
    }

    #[test]
    fn test_replay_from_custom_start() {
        let fen = "4k3/8/8/8/8/8/4P3/4K3 w - - 0 1";
        let mut board = board(BoardConfig::analysis().with_start_position(fen));
        pollster::block_on(board.submit(sq("e2"), sq("e4"))).unwrap();
        pollster::block_on(board.submit(sq("e8"), sq("d7"))).unwrap();
        assert_eq!(board.replay_position().unwrap(), board.rules().current_position());
        assert_eq!(board.rules().turn_to_move(), Turn::W);
    }

    /// Refuses every position whose side to move differs from the loaded one.
    struct FixedTurnRules(ChessRules);

    impl RulesEngine for FixedTurnRules {
        fn make_move(
            &mut self,
            from: Square,
            to: Square,
            promotion: Option<PromotionPiece>,
        ) -> Result<MoveAttempt, crate::error::RulesError> {
            self.0.make_move(from, to, promotion)
        }
        fn legal_moves(&self, square: Square) -> crate::rules::Destinations {
            self.0.legal_moves(square)
        }
        fn load_position(&mut self, fen: &str) -> Result<(), crate::error::RulesError> {
            let next = ChessRules::from_fen(fen)?;
            if next.turn_to_move() != self.0.turn_to_move() {
                return Err(crate::error::RulesError::InvalidPosition {
                    fen: fen.to_string(),
                    reason: "turn change refused".to_string(),
                });
            }
            self.0 = next;
            Ok(())
        }
        fn current_position(&self) -> String {
            self.0.current_position()
        }
        fn is_in_check(&self) -> bool {
            self.0.is_in_check()
        }
        fn turn_to_move(&self) -> Turn {
            self.0.turn_to_move()
        }
    }

    #[test]
    fn test_failed_turn_inversion_keeps_real_turn() {
        let widget = LastUpdate::default();
        let pushed = widget.0.clone();
        let mut board = Board::with_parts(
            Box::new(FixedTurnRules(ChessRules::new())),
            Box::new(widget),
            Box::new(AutoPromote::default()),
            Box::new(NoPacer),
            BoardConfig::game(Side::White, true),
        )
        .unwrap();
        pollster::block_on(board.submit(sq("e2"), sq("e4"))).unwrap();
        pollster::block_on(board.play("e7e5")).unwrap();

        assert_eq!(board.state(), BoardState::PendingIdeaMove);
        assert_eq!(board.rules().turn_to_move(), Turn::W);
        let config = pushed.borrow().clone().unwrap();
        assert_eq!(config.turn_color, Some(Side::White));
        assert_eq!(config.movable.as_ref().unwrap().color, Perspective::White);

        // The idea is entered for the real side and the widget stays on it
        pollster::block_on(board.submit(sq("g1"), sq("f3"))).unwrap();
        assert_eq!(board.state(), BoardState::PendingMove);
        assert_eq!(board.rules().turn_to_move(), Turn::W);
        assert_eq!(pushed.borrow().as_ref().unwrap().turn_color, Some(Side::White));
    }
}
