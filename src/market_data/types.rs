use std::fmt;
use std::time::Instant;

use serde::Deserialize;

/// One price for one symbol, as delivered by a feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PriceObservation {
    pub symbol: String,
    #[serde(alias = "markPrice", alias = "lastPrice")]
    pub price: f64,
    /// Decimal places. `None` means the board default. Signed so a negative
    /// value can be told apart from a missing one.
    #[serde(default)]
    pub precision: Option<i32>,
}

impl PriceObservation {
    pub fn new(symbol: impl Into<String>, price: f64, precision: Option<i32>) -> Self {
        Self {
            symbol: symbol.into(),
            price,
            precision,
        }
    }
}

/// Which adapter produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    Demo,
    Stdin,
    Rest,
}

impl FeedSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedSource::Demo => "demo",
            FeedSource::Stdin => "stdin",
            FeedSource::Rest => "rest",
        }
    }
}

impl fmt::Display for FeedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An observation in flight from an adapter to the board.
#[derive(Debug, Clone)]
pub struct FeedEvent {
    pub observation: PriceObservation,
    pub source: FeedSource,
    /// Monotonic time the adapter received it.
    pub received_at: Instant,
}

impl FeedEvent {
    pub fn new(observation: PriceObservation, source: FeedSource) -> Self {
        Self {
            observation,
            source,
            received_at: Instant::now(),
        }
    }
}
