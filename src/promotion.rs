//! Promotion resolution.
//!
//! When a pawn reaches the last rank without a chosen piece, the board asks a
//! [`PromotionResolver`] and waits. Resolvers may take as long as they like
//! (a dialog, a prompt); the board stays suspended on that one move.

use crate::square::PromotionPiece;
use std::future::{self, Future};
use std::io;
use std::pin::Pin;

pub type PromotionFuture<'a> = Pin<Box<dyn Future<Output = Option<PromotionPiece>> + 'a>>;

pub trait PromotionResolver {
    /// Pick the piece to promote to. `None` rejects the move.
    fn resolve(&mut self) -> PromotionFuture<'_>;
}

/// Always promotes to the same piece.
#[derive(Debug, Clone, Copy)]
pub struct AutoPromote(pub PromotionPiece);

impl Default for AutoPromote {
    fn default() -> Self {
        Self(PromotionPiece::Queen)
    }
}

impl PromotionResolver for AutoPromote {
    fn resolve(&mut self) -> PromotionFuture<'_> {
        Box::pin(future::ready(Some(self.0)))
    }
}

/// Asks on a text prompt: reads one line and takes its first letter (`q`, `r`, `b`, `n`).
///
/// Lines come from a reader function so the prompt can share an input stream
/// with the rest of the host.
pub struct PromptPromotion<F> {
    read_line: F,
}

impl<F> PromptPromotion<F>
where
    F: FnMut(&mut String) -> io::Result<usize>,
{
    pub fn new(read_line: F) -> Self {
        Self { read_line }
    }
}

impl PromptPromotion<fn(&mut String) -> io::Result<usize>> {
    /// Prompt on the process stdin.
    pub fn stdin() -> Self {
        Self::new(|line| io::stdin().read_line(line))
    }
}

impl<F> PromotionResolver for PromptPromotion<F>
where
    F: FnMut(&mut String) -> io::Result<usize>,
{
    fn resolve(&mut self) -> PromotionFuture<'_> {
        println!("promote to? [q/r/b/n]");
        let mut line = String::new();
        let piece = match (self.read_line)(&mut line) {
            Ok(_) => line.trim().chars().next().and_then(PromotionPiece::from_char),
            Err(err) => {
                log::warn!("failed to read promotion choice: {}", err);
                None
            }
        };
        Box::pin(future::ready(piece))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, Cursor};

    #[test]
    fn test_auto_promote() {
        let mut resolver = AutoPromote::default();
        assert_eq!(pollster::block_on(resolver.resolve()), Some(PromotionPiece::Queen));
        let mut resolver = AutoPromote(PromotionPiece::Knight);
        assert_eq!(pollster::block_on(resolver.resolve()), Some(PromotionPiece::Knight));
    }

    #[test]
    fn test_prompt_promotion() {
        let mut input = Cursor::new("r\nx\n");
        let mut resolver = PromptPromotion::new(|line: &mut String| input.read_line(line));
        assert_eq!(pollster::block_on(resolver.resolve()), Some(PromotionPiece::Rook));
        assert_eq!(pollster::block_on(resolver.resolve()), None);
        // Exhausted input
        assert_eq!(pollster::block_on(resolver.resolve()), None);
    }
}
