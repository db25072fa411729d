use std::time::{Duration, Instant};

use crate::highlight::FlashOutcome;

/// Lightweight per-symbol bookkeeping for the board table.
/// Styling state lives in the highlighter, not here.
#[derive(Clone, Debug)]
pub struct BoardRow {
    pub symbol: String,
    /// First valid price, used for the change column.
    pub first_price: Option<f64>,
    pub last_price: Option<f64>,
    pub ticks: u64,
    /// Bumped on every observation, valid or not.
    pub revision: u64,
    pub last_outcome: FlashOutcome,
    pub updated_at: Instant,
}

impl BoardRow {
    pub fn new(symbol: impl Into<String>, now: Instant) -> Self {
        Self {
            symbol: symbol.into(),
            first_price: None,
            last_price: None,
            ticks: 0,
            revision: 0,
            last_outcome: FlashOutcome::FirstObservation,
            updated_at: now,
        }
    }

    pub fn record(&mut self, price: f64, outcome: FlashOutcome, now: Instant) {
        self.ticks += 1;
        self.revision += 1;
        self.last_outcome = outcome;
        self.updated_at = now;

        if outcome != FlashOutcome::Invalid {
            self.first_price.get_or_insert(price);
            self.last_price = Some(price);
        }
    }

    /// Percent change since the first valid price.
    pub fn change_pct(&self) -> Option<f64> {
        let first = self.first_price?;
        let last = self.last_price?;
        if first.abs() < f64::EPSILON {
            return None;
        }
        Some((last - first) / first * 100.0)
    }

    pub fn is_stale(&self, now: Instant, stale_after: Duration) -> bool {
        now.saturating_duration_since(self.updated_at) >= stale_after
    }
}
