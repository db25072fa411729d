use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::highlight::{FlashOutcome, PriceHighlighter, PriceSegments};
use crate::market_data::types::PriceObservation;
use crate::state::row::BoardRow;

/// Everything a renderer needs for one table row.
#[derive(Clone, Debug, PartialEq)]
pub struct RowView {
    pub symbol: String,
    pub segments: PriceSegments,
    pub change_pct: Option<f64>,
    pub ticks: u64,
    pub revision: u64,
    pub outcome: FlashOutcome,
    pub stale: bool,
}

/// The market table: rows in first-seen order plus the highlighter that
/// styles their prices. Owned by a single worker task.
#[derive(Debug)]
pub struct MarketBoard {
    highlighter: PriceHighlighter,
    rows: Vec<BoardRow>,
    positions: HashMap<String, usize>,
    stale_after: Duration,
}

impl MarketBoard {
    pub fn new(highlighter: PriceHighlighter, stale_after: Duration) -> Self {
        MarketBoard {
            highlighter,
            rows: Vec::new(),
            positions: HashMap::new(),
            stale_after,
        }
    }

    pub fn apply(&mut self, observation: &PriceObservation, now: Instant) -> FlashOutcome {
        let (outcome, _) = self.highlighter.observe(observation, now);

        let position = match self.positions.get(&observation.symbol) {
            Some(&position) => position,
            None => {
                self.rows.push(BoardRow::new(observation.symbol.clone(), now));
                let position = self.rows.len() - 1;
                self.positions.insert(observation.symbol.clone(), position);
                position
            }
        };
        self.rows[position].record(observation.price, outcome, now);

        outcome
    }

    pub fn rows(&self) -> &[BoardRow] {
        &self.rows
    }

    pub fn row(&self, symbol: &str) -> Option<&BoardRow> {
        self.positions.get(symbol).map(|&position| &self.rows[position])
    }

    pub fn segments(&self, symbol: &str, now: Instant) -> Option<PriceSegments> {
        self.highlighter.segments(symbol, now)
    }

    pub fn highlighter(&self) -> &PriceHighlighter {
        &self.highlighter
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Renders every row at `now`.
    pub fn snapshot(&self, now: Instant) -> Vec<RowView> {
        self.rows
            .iter()
            .filter_map(|row| {
                let segments = self.highlighter.segments(&row.symbol, now)?;
                Some(RowView {
                    symbol: row.symbol.clone(),
                    segments,
                    change_pct: row.change_pct(),
                    ticks: row.ticks,
                    revision: row.revision,
                    outcome: row.last_outcome,
                    stale: row.is_stale(now, self.stale_after),
                })
            })
            .collect()
    }
}
