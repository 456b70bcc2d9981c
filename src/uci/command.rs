use crate::error::UciError;
use std::str::FromStr;

/// Commands that wait for a completion line from the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UciCommand {
    /// `uci`, completed by `uciok`
    Uci,
    /// `isready`, completed by `readyok`
    IsReady,
    /// `go ...`, completed by `bestmove`
    Go(GoParams),
}

impl UciCommand {
    pub fn command_string(&self) -> String {
        match self {
            UciCommand::Uci => "uci".to_string(),
            UciCommand::IsReady => "isready".to_string(),
            UciCommand::Go(params) => params.command_string(),
        }
    }
}

/// Search limits of a `go` command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoParams {
    pub depth: Option<u32>,
    /// Milliseconds
    pub movetime: Option<u64>,
    /// Search until `stop`
    pub infinite: bool,
}

impl GoParams {
    pub fn fixed_depth(depth: u32) -> Self {
        Self {
            depth: Some(depth),
            ..Default::default()
        }
    }

    pub fn fixed_time(ms: u64) -> Self {
        Self {
            movetime: Some(ms),
            ..Default::default()
        }
    }

    pub fn infinite() -> Self {
        Self {
            infinite: true,
            ..Default::default()
        }
    }

    fn command_string(&self) -> String {
        let mut cmd = String::from("go");
        if let Some(depth) = self.depth {
            cmd.push_str(&format!(" depth {}", depth));
        }
        if let Some(ms) = self.movetime {
            cmd.push_str(&format!(" movetime {}", ms));
        }
        if self.infinite {
            cmd.push_str(" infinite");
        }
        cmd
    }
}

/// One line printed by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutput {
    IdName(String),
    IdAuthor(String),
    UciOk,
    ReadyOk,
    BestMove { best: String, ponder: Option<String> },
    Info(String),
    Other(String),
}

impl FromStr for EngineOutput {
    type Err = UciError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let line = s.trim();
        let mut tokens = line.split_whitespace();

        match tokens.next() {
            Some("uciok") => Ok(Self::UciOk),
            Some("readyok") => Ok(Self::ReadyOk),
            Some("id") => {
                let key = tokens.next();
                let value = tokens.collect::<Vec<&str>>().join(" ");
                match key {
                    Some("name") => Ok(Self::IdName(value)),
                    Some("author") => Ok(Self::IdAuthor(value)),
                    _ => Err(UciError::Malformed(line.to_string())),
                }
            }
            Some("bestmove") => {
                let best = tokens
                    .next()
                    .ok_or_else(|| UciError::Malformed(line.to_string()))?
                    .to_string();
                let ponder = match (tokens.next(), tokens.next()) {
                    (Some("ponder"), Some(mv)) => Some(mv.to_string()),
                    (None, _) => None,
                    _ => return Err(UciError::Malformed(line.to_string())),
                };
                Ok(Self::BestMove { best, ponder })
            }
            Some("info") => Ok(Self::Info(tokens.collect::<Vec<&str>>().join(" "))),
            Some(_) => Ok(Self::Other(line.to_string())),
            None => Err(UciError::Malformed(line.to_string())),
        }
    }
}

/// Result of a finished [`UciCommand`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Uci { name: Option<String> },
    Ready,
    BestMove { best: String, ponder: Option<String> },
}

/// A command waiting for its completion line.
#[derive(Debug, Clone)]
pub(crate) struct Pending {
    pub(crate) command: UciCommand,
    name: Option<String>,
}

impl Pending {
    pub(crate) fn new(command: UciCommand) -> Self {
        Self { command, name: None }
    }

    /// Feed one output line. Returns the completion once the command is done.
    pub(crate) fn process(&mut self, output: EngineOutput) -> Option<Completion> {
        match (&self.command, output) {
            (UciCommand::Uci, EngineOutput::IdName(name)) => {
                self.name = Some(name);
                None
            }
            (UciCommand::Uci, EngineOutput::UciOk) => Some(Completion::Uci {
                name: self.name.take(),
            }),
            (UciCommand::IsReady, EngineOutput::ReadyOk) => Some(Completion::Ready),
            (UciCommand::Go(_), EngineOutput::BestMove { best, ponder }) => {
                Some(Completion::BestMove { best, ponder })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_go_command_string() {
        assert_eq!(UciCommand::Go(GoParams::default()).command_string(), "go");
        assert_eq!(UciCommand::Go(GoParams::fixed_depth(12)).command_string(), "go depth 12");
        assert_eq!(UciCommand::Go(GoParams::fixed_time(500)).command_string(), "go movetime 500");
        assert_eq!(UciCommand::Go(GoParams::infinite()).command_string(), "go infinite");
        assert_eq!(UciCommand::IsReady.command_string(), "isready");
    }

    #[test]
    fn test_parse_output() {
        assert_eq!("uciok".parse::<EngineOutput>().unwrap(), EngineOutput::UciOk);
        assert_eq!("readyok\n".parse::<EngineOutput>().unwrap(), EngineOutput::ReadyOk);
        assert_eq!(
            "id name Stockfish 16".parse::<EngineOutput>().unwrap(),
            EngineOutput::IdName("Stockfish 16".to_string())
        );
        assert_eq!(
            "bestmove e2e4 ponder e7e5".parse::<EngineOutput>().unwrap(),
            EngineOutput::BestMove {
                best: "e2e4".to_string(),
                ponder: Some("e7e5".to_string())
            }
        );
        assert_eq!(
            "bestmove a7a8q".parse::<EngineOutput>().unwrap(),
            EngineOutput::BestMove { best: "a7a8q".to_string(), ponder: None }
        );
        assert!(matches!(
            "info depth 10 score cp 20".parse::<EngineOutput>().unwrap(),
            EngineOutput::Info(text) if text == "depth 10 score cp 20"
        ));
        assert!(matches!(
            "option name Hash type spin".parse::<EngineOutput>().unwrap(),
            EngineOutput::Other(_)
        ));
    }

    #[test]
    fn test_parse_malformed() {
        assert!("".parse::<EngineOutput>().is_err());
        assert!("bestmove".parse::<EngineOutput>().is_err());
        assert!("bestmove e2e4 e7e5".parse::<EngineOutput>().is_err());
        assert!("id nickname x".parse::<EngineOutput>().is_err());
    }

    #[test]
    fn test_pending_uci_collects_name() {
        let mut pending = Pending::new(UciCommand::Uci);
        assert_eq!(pending.process(EngineOutput::IdName("Engine".to_string())), None);
        assert_eq!(pending.process(EngineOutput::Other("option name Hash".to_string())), None);
        assert_eq!(
            pending.process(EngineOutput::UciOk),
            Some(Completion::Uci { name: Some("Engine".to_string()) })
        );
    }

    #[test]
    fn test_pending_ignores_unrelated_lines() {
        let mut pending = Pending::new(UciCommand::Go(GoParams::fixed_depth(1)));
        assert_eq!(pending.process(EngineOutput::ReadyOk), None);
        assert_eq!(pending.process(EngineOutput::Info("depth 1".to_string())), None);
        assert!(pending.process(EngineOutput::BestMove { best: "e2e4".into(), ponder: None }).is_some());
    }
}
