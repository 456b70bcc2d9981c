pub mod board;
pub mod color;
pub mod config;
pub mod error;
pub mod history;
pub mod pacing;
pub mod promotion;
pub mod rules;
pub mod square;
pub mod state;
pub mod uci;
pub mod widget;

pub use board::Board;
pub use color::{Invert, Perspective, Side, Turn};
pub use config::{BoardConfig, Mode};
pub use error::{BoardError, RulesError, UciError};
pub use history::{History, MoveNode, NodeId};
pub use rules::{ChessRules, MoveRecord, RulesEngine};
pub use square::{PromotionPiece, Square};
pub use state::{BoardState, Tint, Transition};
pub use widget::{BoardWidget, WidgetConfig};
