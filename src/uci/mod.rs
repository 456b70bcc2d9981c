//! Command channel to an external UCI engine.
//!
//! The channel only formats commands and interprets output lines; moving the
//! text to and from the engine process is up to the `send` function and the
//! caller feeding [`EngineChannel::information`].
//!
//! ```text
//! execute(Go) ──send──> "go movetime 500"
//! information("info depth 12 ...")  -> Ok(None)
//! information("bestmove e7e5")      -> Ok(Some(Completion::BestMove { .. }))
//! ```

mod command;

pub use command::{Completion, EngineOutput, GoParams, UciCommand};

use crate::error::UciError;
use command::Pending;
use log::debug;

/// Where the engine position starts before the move list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionKind {
    StartPos,
    Fen(String),
}

pub struct EngineChannel<S: FnMut(&str)> {
    send: S,
    pending: Option<Pending>,
    position: PositionKind,
    moves: Vec<String>,
}

impl<S: FnMut(&str)> EngineChannel<S> {
    pub fn new(send: S) -> Self {
        Self {
            send,
            pending: None,
            position: PositionKind::StartPos,
            moves: Vec::new(),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    /// Feed one line of engine output.
    ///
    /// Returns the completion of the pending command when this line finishes it.
    /// Informational lines with nothing pending are dropped; a completion line
    /// with nothing pending is an error.
    pub fn information(&mut self, line: &str) -> Result<Option<Completion>, UciError> {
        let output: EngineOutput = line.parse()?;

        let Some(pending) = self.pending.as_mut() else {
            return match output {
                EngineOutput::Info(_) | EngineOutput::Other(_) => {
                    debug!("engine: {}", line.trim());
                    Ok(None)
                }
                _ => Err(UciError::NoPendingCommand(line.trim().to_string())),
            };
        };

        let completion = pending.process(output);
        if completion.is_some() {
            self.pending = None;
        }
        Ok(completion)
    }

    /// Send a command and wait for its completion through [`information`](Self::information).
    pub fn execute(&mut self, command: UciCommand) -> Result<(), UciError> {
        self.ensure_idle()?;
        (self.send)(&command.command_string());
        self.pending = Some(Pending::new(command));
        Ok(())
    }

    /// Replace the start position and/or the move list, then resend the position.
    pub fn set_position(
        &mut self,
        kind: Option<PositionKind>,
        moves: Option<Vec<String>>,
    ) -> Result<(), UciError> {
        self.ensure_idle()?;
        if let Some(kind) = kind {
            self.position = kind;
        }
        if let Some(moves) = moves {
            self.moves = moves;
        }
        self.update_position()
    }

    /// Append a move and resend the position. A busy channel keeps its move list.
    pub fn make_move(&mut self, mv: impl Into<String>) -> Result<(), UciError> {
        self.ensure_idle()?;
        self.moves.push(mv.into());
        self.update_position()
    }

    pub fn make_moves<I, M>(&mut self, moves: I) -> Result<(), UciError>
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        self.ensure_idle()?;
        self.moves.extend(moves.into_iter().map(Into::into));
        self.update_position()
    }

    pub fn new_game(&mut self) -> Result<(), UciError> {
        self.run_raw("ucinewgame", true)?;
        self.set_position(Some(PositionKind::StartPos), Some(Vec::new()))
    }

    /// Ask the engine to stop searching. Sent even while a command is pending.
    pub fn stop(&mut self) {
        // A following `bestmove` still completes the pending go.
        let _ = self.run_raw("stop", false);
    }

    /// The `position` command for the current start position and moves.
    pub fn position_command(&self) -> String {
        let mut cmd = match &self.position {
            PositionKind::StartPos => String::from("position startpos"),
            PositionKind::Fen(fen) => format!("position fen {}", fen),
        };
        if !self.moves.is_empty() {
            cmd.push_str(" moves ");
            cmd.push_str(&self.moves.join(" "));
        }
        cmd
    }

    fn update_position(&mut self) -> Result<(), UciError> {
        let cmd = self.position_command();
        self.run_raw(&cmd, true)
    }

    fn ensure_idle(&self) -> Result<(), UciError> {
        match &self.pending {
            Some(pending) => Err(UciError::Busy(pending.command.command_string())),
            None => Ok(()),
        }
    }

    fn run_raw(&mut self, cmd: &str, check: bool) -> Result<(), UciError> {
        if check {
            self.ensure_idle()?;
        }
        debug!("engine <- {}", cmd);
        (self.send)(cmd);
        Ok(())
    }
}
