use std::collections::HashMap;
use std::time::Instant;

use tracing::info;

use super::BoardRenderer;
use crate::highlight::{PriceSegments, SuffixStyle};
use crate::state::{MarketBoard, RowView};

/// Plain-text renderer for pipes and headless runs. Emits one log line per
/// row whose revision moved since the previous draw.
#[derive(Debug, Default)]
pub struct LogRenderer {
    seen: HashMap<String, u64>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows updated since the last call, in board order.
    pub fn take_updates(&mut self, board: &MarketBoard, now: Instant) -> Vec<RowView> {
        board
            .snapshot(now)
            .into_iter()
            .filter(|view| {
                let previous = self.seen.insert(view.symbol.clone(), view.revision);
                previous != Some(view.revision)
            })
            .collect()
    }
}

/// Marks the highlighted suffix with brackets: `64,0[12.50]`.
pub fn bracketed(segments: &PriceSegments) -> String {
    if segments.suffix_style == SuffixStyle::None || segments.suffix.is_empty() {
        return segments.text();
    }
    format!("{}[{}]", segments.prefix, segments.suffix)
}

impl BoardRenderer for LogRenderer {
    fn mode(&self) -> &'static str {
        "log"
    }

    fn draw(&mut self, board: &MarketBoard, now: Instant) -> anyhow::Result<()> {
        for view in self.take_updates(board, now) {
            let direction = match view.segments.suffix_style {
                SuffixStyle::Flash(direction) | SuffixStyle::Static(direction) => direction.as_str(),
                SuffixStyle::None => "-",
            };
            info!(
                symbol = %view.symbol,
                price = %bracketed(&view.segments),
                direction,
                outcome = view.outcome.as_str(),
                change_pct = view.change_pct.unwrap_or(0.0),
                stale = view.stale,
                "price"
            );
        }
        Ok(())
    }
}
