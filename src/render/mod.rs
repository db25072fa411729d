pub mod keys;
pub mod log;
pub mod spans;
pub mod tui;

use std::time::Instant;

use crate::state::MarketBoard;

/// Draws the board somewhere.
///
/// Synchronous: a draw reads a consistent board snapshot and must not await.
pub trait BoardRenderer: Send {
    /// Label for logs and metrics.
    fn mode(&self) -> &'static str;

    fn draw(&mut self, board: &MarketBoard, now: Instant) -> anyhow::Result<()>;
}

pub use log::LogRenderer;
pub use tui::{StatusLine, TerminalRenderer};
