//! Display pacing.
//!
//! Idea and prediction moves stay on screen for a moment before the board
//! snaps back to the real game position. The pause is purely visual; nothing
//! in the controller depends on how long it actually lasts.

use std::future::{self, Future};
use std::pin::Pin;
use std::time::Duration;

/// How long speculative moves stay visible before the board is resynced.
pub const REVEAL_DELAY: Duration = Duration::from_millis(700);

pub type PauseFuture<'a> = Pin<Box<dyn Future<Output = ()> + 'a>>;

pub trait Pacer {
    fn pause(&mut self, duration: Duration) -> PauseFuture<'_>;
}

/// Sleeps the calling thread. Suitable for hosts that drive the board with
/// `pollster::block_on` on their own thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) -> PauseFuture<'_> {
        Box::pin(async move { std::thread::sleep(duration) })
    }
}

/// Skips every pause. Used by tests and by hosts without animation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacer;

impl Pacer for NoPacer {
    fn pause(&mut self, _duration: Duration) -> PauseFuture<'_> {
        Box::pin(future::ready(()))
    }
}
