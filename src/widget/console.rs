//! Text-mode widget for terminal hosts.
//!
//! Keeps a mirror of everything the controller pushes and redraws an ASCII
//! board into its sink whenever the turn changes or a position is loaded.

use super::{BoardWidget, Dests, PieceView, Role, WidgetConfig};
use crate::color::{Perspective, Side};
use crate::square::Square;
use log::warn;
use std::io::Write;

pub struct ConsoleWidget<W: Write> {
    out: W,
    pieces: [Option<PieceView>; 64],
    turn: Side,
    check: bool,
    last_move: Option<(Square, Square)>,
    movable: Perspective,
    dests: Dests,
    /// Board orientation: this side is drawn at the bottom.
    pov: Side,
}

impl<W: Write> ConsoleWidget<W> {
    pub fn new(out: W, pov: Side) -> Self {
        Self {
            out,
            pieces: [None; 64],
            turn: Side::White,
            check: false,
            last_move: None,
            movable: Perspective::Both,
            dests: Dests::new(),
            pov,
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<PieceView> {
        self.pieces[square.index() as usize]
    }

    pub fn dests(&self) -> &Dests {
        &self.dests
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// The mirrored board as text, rank 8 first from White's point of view.
    pub fn render(&self) -> String {
        let mut text = String::new();
        let ranks: Vec<u8> = match self.pov {
            Side::White => (0..8).rev().collect(),
            Side::Black => (0..8).collect(),
        };
        let files: Vec<u8> = match self.pov {
            Side::White => (0..8).collect(),
            Side::Black => (0..8).rev().collect(),
        };

        for &rank in &ranks {
            text.push_str(&format!("{} ", rank + 1));
            for &file in &files {
                let Some(square) = Square::from_coords(file, rank) else {
                    continue;
                };
                let marked = self
                    .last_move
                    .map_or(false, |(from, to)| from == square || to == square);
                let glyph = self.piece_at(square).map_or('.', piece_char);
                text.push(if marked { '[' } else { ' ' });
                text.push(glyph);
                text.push(if marked { ']' } else { ' ' });
            }
            text.push('\n');
        }
        text.push_str("  ");
        for &file in &files {
            text.push_str(&format!(" {} ", (b'a' + file) as char));
        }
        text.push('\n');

        let movable = match self.movable {
            Perspective::White => "white",
            Perspective::Black => "black",
            Perspective::Both => "both",
        };
        text.push_str(&format!(
            "{} to move{}, movable: {}\n",
            self.turn,
            if self.check { " (check)" } else { "" },
            movable
        ));
        text
    }

    fn load_fen(&mut self, fen: &str) {
        let placement = fen.split_whitespace().next().unwrap_or("");
        let mut pieces = [None; 64];
        let mut rank: u8 = 7;
        let mut file: u8 = 0;

        for c in placement.chars() {
            match c {
                '/' => {
                    rank = rank.saturating_sub(1);
                    file = 0;
                }
                '1'..='8' => {
                    file = file.saturating_add(c as u8 - b'0');
                    if file > 8 {
                        warn!("console widget ignored malformed placement '{}'", placement);
                        return;
                    }
                }
                _ => {
                    match (Square::from_coords(file, rank), piece_from_char(c)) {
                        (Some(square), Some(piece)) => pieces[square.index() as usize] = Some(piece),
                        _ => {
                            warn!("console widget ignored malformed placement '{}'", placement);
                            return;
                        }
                    }
                    file += 1;
                }
            }
        }
        self.pieces = pieces;
    }

    fn redraw(&mut self) {
        let text = self.render();
        if let Err(err) = writeln!(self.out, "{}", text) {
            warn!("console widget failed to draw: {}", err);
        }
    }
}

impl<W: Write> BoardWidget for ConsoleWidget<W> {
    fn set(&mut self, config: WidgetConfig) {
        let mut dirty = false;

        if let Some(fen) = &config.fen {
            self.load_fen(fen);
            dirty = true;
        }
        if let Some(pieces) = config.pieces {
            for (square, piece) in pieces {
                self.pieces[square.index() as usize] = piece;
            }
        }
        if let Some(check) = config.check {
            self.check = check;
        }
        if let Some(last_move) = config.last_move {
            self.last_move = Some(last_move);
        }
        if let Some(movable) = config.movable {
            self.movable = movable.color;
            self.dests = movable.dests;
        }
        if let Some(turn) = config.turn_color {
            self.turn = turn;
            dirty = true;
        }

        if dirty {
            self.redraw();
        }
    }

    fn move_piece(&mut self, from: Square, to: Square) {
        let piece = self.pieces[from.index() as usize].take();
        self.pieces[to.index() as usize] = piece;
        self.last_move = Some((from, to));
    }
}

fn piece_from_char(c: char) -> Option<PieceView> {
    let color = if c.is_ascii_uppercase() { Side::White } else { Side::Black };
    let role = match c.to_ascii_lowercase() {
        'p' => Role::Pawn,
        'n' => Role::Knight,
        'b' => Role::Bishop,
        'r' => Role::Rook,
        'q' => Role::Queen,
        'k' => Role::King,
        _ => return None,
    };
    Some(PieceView { role, color })
}

fn piece_char(piece: PieceView) -> char {
    let c = match piece.role {
        Role::Pawn => 'p',
        Role::Knight => 'n',
        Role::Bishop => 'b',
        Role::Rook => 'r',
        Role::Queen => 'q',
        Role::King => 'k',
    };
    match piece.color {
        Side::White => c.to_ascii_uppercase(),
        Side::Black => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::START_FEN;

    fn sq(name: &str) -> Square {
        name.parse().unwrap()
    }

    #[test]
    fn test_loads_position() {
        let mut widget = ConsoleWidget::new(Vec::new(), Side::White);
        widget.set(WidgetConfig {
            fen: Some(START_FEN.to_string()),
            ..Default::default()
        });

        assert_eq!(
            widget.piece_at(sq("e1")),
            Some(PieceView { role: Role::King, color: Side::White })
        );
        assert_eq!(
            widget.piece_at(sq("d8")),
            Some(PieceView { role: Role::Queen, color: Side::Black })
        );
        assert_eq!(widget.piece_at(sq("e4")), None);

        let drawn = String::from_utf8(widget.into_inner()).unwrap();
        assert!(drawn.contains("8  r  n  b  q  k  b  n  r"));
    }

    #[test]
    fn test_piece_overrides_and_moves() {
        let mut widget = ConsoleWidget::new(Vec::new(), Side::White);
        widget.set(WidgetConfig {
            fen: Some("4k3/P7/8/8/8/8/8/4K3 w - - 0 1".to_string()),
            ..Default::default()
        });
        widget.move_piece(sq("a7"), sq("a8"));
        assert_eq!(widget.piece_at(sq("a8")).unwrap().role, Role::Pawn);
        assert_eq!(widget.piece_at(sq("a7")), None);

        widget.set(WidgetConfig {
            pieces: Some(vec![(sq("a8"), Some(PieceView { role: Role::Queen, color: Side::White }))]),
            ..Default::default()
        });
        assert_eq!(widget.piece_at(sq("a8")).unwrap().role, Role::Queen);
        assert!(widget.render().contains("[Q]"));
    }

    #[test]
    fn test_black_point_of_view() {
        let mut widget = ConsoleWidget::new(Vec::new(), Side::Black);
        widget.set(WidgetConfig {
            fen: Some(START_FEN.to_string()),
            turn_color: Some(Side::Black),
            check: Some(true),
            ..Default::default()
        });
        let text = widget.render();
        assert!(text.starts_with("1 "));
        assert!(text.contains("black to move (check)"));
    }

    #[test]
    fn test_malformed_position_is_ignored() {
        let mut widget = ConsoleWidget::new(Vec::new(), Side::White);
        widget.set(WidgetConfig {
            fen: Some(START_FEN.to_string()),
            ..Default::default()
        });
        widget.set(WidgetConfig {
            fen: Some("xx/8 w - - 0 1".to_string()),
            ..Default::default()
        });
        assert_eq!(widget.piece_at(sq("e1")).unwrap().role, Role::King);

        // Runs of empty squares past the h-file
        widget.set(WidgetConfig {
            fen: Some(format!("{}/8/8/8/8/8/8/8 w - - 0 1", "8".repeat(40))),
            ..Default::default()
        });
        assert_eq!(widget.piece_at(sq("e1")).unwrap().role, Role::King);
    }
}
