//! Console host for the predictive board.
//!
//! Moves are typed in coordinate notation (`e2e4`, `a7a8`). Without `--engine`
//! the opponent's moves are typed as well; with it, an external UCI engine
//! answers every move the local player completes.

use clap::{Parser, ValueEnum};
use log::{info, warn};
use predictive_chess::promotion::PromptPromotion;
use predictive_chess::rules::MoveText;
use predictive_chess::uci::{Completion, EngineChannel, GoParams, PositionKind, UciCommand};
use predictive_chess::widget::console::ConsoleWidget;
use predictive_chess::{Board, BoardConfig, BoardState, RulesEngine, Side};
use std::cell::RefCell;
use std::error::Error;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdout, Command, Stdio};
use std::rc::Rc;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "predictive_chess")]
#[command(version, about = "Chess board with idea and prediction moves", long_about = None)]
struct Cli {
    /// Side the local player enters moves for
    #[arg(long, value_enum, default_value_t = SideArg::White)]
    side: SideArg,

    /// Analysis board: both sides movable, no opponent
    #[arg(long)]
    analysis: bool,

    /// Enter an idea and predictions after every opponent move
    #[arg(long)]
    predictive: bool,

    /// Start position
    #[arg(long)]
    fen: Option<String>,

    /// Path to a UCI engine playing the opponent
    #[arg(long)]
    engine: Option<PathBuf>,

    /// Engine thinking time per move in milliseconds
    #[arg(long, default_value_t = 500)]
    movetime: u64,

    /// How long ideas and predictions stay visible, in milliseconds
    #[arg(long, default_value_t = 700)]
    reveal_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SideArg {
    White,
    Black,
}

impl From<SideArg> for Side {
    fn from(side: SideArg) -> Self {
        match side {
            SideArg::White => Side::White,
            SideArg::Black => Side::Black,
        }
    }
}

type SendFn = Box<dyn FnMut(&str)>;

/// An engine process spoken to over its stdin/stdout.
struct EngineProcess {
    child: Child,
    output: BufReader<ChildStdout>,
    channel: EngineChannel<SendFn>,
}

impl EngineProcess {
    fn spawn(path: &Path) -> Result<Self, Box<dyn Error>> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()?;
        let mut stdin = child.stdin.take().ok_or("engine stdin unavailable")?;
        let stdout = child.stdout.take().ok_or("engine stdout unavailable")?;

        let send: SendFn = Box::new(move |cmd: &str| {
            if let Err(err) = writeln!(stdin, "{}", cmd).and_then(|_| stdin.flush()) {
                warn!("failed to write to engine: {}", err);
            }
        });

        Ok(Self {
            child,
            output: BufReader::new(stdout),
            channel: EngineChannel::new(send),
        })
    }

    /// Block until the pending command completes.
    fn wait(&mut self) -> Result<Completion, Box<dyn Error>> {
        let mut line = String::new();
        loop {
            line.clear();
            if self.output.read_line(&mut line)? == 0 {
                return Err("engine closed its output".into());
            }
            if line.trim().is_empty() {
                continue;
            }
            if let Some(completion) = self.channel.information(&line)? {
                return Ok(completion);
            }
        }
    }

    fn handshake(&mut self, start: Option<&str>) -> Result<(), Box<dyn Error>> {
        self.channel.execute(UciCommand::Uci)?;
        if let Completion::Uci { name } = self.wait()? {
            info!("engine: {}", name.as_deref().unwrap_or("unnamed"));
        }
        self.channel.execute(UciCommand::IsReady)?;
        self.wait()?;

        self.channel.new_game()?;
        if let Some(fen) = start {
            self.channel.set_position(Some(PositionKind::Fen(fen.to_string())), None)?;
        }
        Ok(())
    }

    fn best_move(&mut self, movetime: u64) -> Result<String, Box<dyn Error>> {
        self.channel.execute(UciCommand::Go(GoParams::fixed_time(movetime)))?;
        match self.wait()? {
            Completion::BestMove { best, .. } => Ok(best),
            other => Err(format!("unexpected engine reply {:?}", other).into()),
        }
    }
}

impl Drop for EngineProcess {
    fn drop(&mut self) {
        self.channel.stop();
        let _ = self.child.kill();
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let side = Side::from(cli.side);
    let mut config = if cli.analysis {
        BoardConfig::analysis()
    } else {
        BoardConfig::game(side, cli.predictive)
    };
    if let Some(fen) = &cli.fen {
        config = config.with_start_position(fen.clone());
    }
    config = config.with_reveal_delay(Duration::from_millis(cli.reveal_ms));

    let widget = ConsoleWidget::new(io::stdout(), side);
    let mut board = Board::new(
        Box::new(widget),
        Box::new(PromptPromotion::stdin()),
        config,
    )?;

    if let Some(controlled) = board.config().controlled_side() {
        let to_move = Side::from(board.rules().turn_to_move());
        if controlled != to_move {
            return Err(format!("{} moves first here; start from a position with {} to move", to_move, controlled).into());
        }
    }

    let engine = match (&cli.engine, cli.analysis) {
        (Some(path), false) => {
            let mut engine = EngineProcess::spawn(path)?;
            engine.handshake(cli.fen.as_deref())?;
            Some(Rc::new(RefCell::new(engine)))
        }
        (Some(_), true) => {
            warn!("--engine is ignored on an analysis board");
            None
        }
        (None, _) => None,
    };

    if let Some(engine) = &engine {
        let engine = Rc::clone(engine);
        board.on_move(move |mv| {
            if let Err(err) = engine.borrow_mut().channel.make_move(mv.uci()) {
                warn!("engine did not take {}: {}", mv.uci(), err);
            }
        });
    }

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        if let (Some(engine), BoardState::OpponentMove) = (&engine, board.state()) {
            let best = engine.borrow_mut().best_move(cli.movetime)?;
            if best == "(none)" || best == "0000" {
                println!("engine has no move, game over");
                break;
            }
            let record = pollster::block_on(board.play(&best))?;
            engine.borrow_mut().channel.make_move(record.uci())?;
            continue;
        }

        print!("{} ({})> ", board.state(), board.tint().hex());
        io::stdout().flush()?;

        line.clear();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let input = line.trim();
        match input {
            "" => continue,
            "quit" | "exit" => break,
            _ => {}
        }

        let mv: MoveText = match input.parse() {
            Ok(mv) => mv,
            Err(err) => {
                println!("{}", err);
                continue;
            }
        };

        let result = if board.state() == BoardState::OpponentMove {
            pollster::block_on(board.apply(mv.from, mv.to, mv.promotion))
        } else {
            pollster::block_on(board.submit(mv.from, mv.to))
        };
        if let Err(err) = result {
            println!("{}", err);
        }
    }

    info!("{} moves played", board.history().realized_moves().count());
    Ok(())
}
