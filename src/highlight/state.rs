use std::fmt;
use std::time::{Duration, Instant};

/// Which way the price moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn between(previous: f64, next: f64) -> Self {
        if next > previous {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifetimes of the flash animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashTimings {
    /// Minimum gap between two flashes of the same symbol.
    pub min_interval: Duration,
    /// How long the whole value stays flashed.
    pub whole: Duration,
    /// How long the changed suffix keeps its flash colour.
    pub suffix: Duration,
}

impl Default for FlashTimings {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(150),
            whole: Duration::from_millis(900),
            suffix: Duration::from_millis(1400),
        }
    }
}

/// A running flash. Overwritten by each qualifying change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashState {
    pub direction: Direction,
    pub started_at: Instant,
    pub whole_style_expiry: Instant,
    pub suffix_style_expiry: Instant,
    pub suffix_split_index: usize,
}

impl FlashState {
    pub fn start(direction: Direction, suffix_split_index: usize, now: Instant, timings: &FlashTimings) -> Self {
        Self {
            direction,
            started_at: now,
            whole_style_expiry: now + timings.whole,
            suffix_style_expiry: now + timings.suffix,
            suffix_split_index,
        }
    }

    pub fn whole_active(&self, now: Instant) -> bool {
        now < self.whole_style_expiry
    }

    pub fn suffix_active(&self, now: Instant) -> bool {
        now < self.suffix_style_expiry
    }

    /// True while the last flash is younger than `min_interval`.
    pub fn debounces(&self, now: Instant, min_interval: Duration) -> bool {
        now.saturating_duration_since(self.started_at) < min_interval
    }
}

/// Tint left on the last changed digits once the flash has faded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistentSuffixState {
    pub direction: Direction,
    pub suffix_split_index: usize,
}

/// Everything the highlighter remembers about one symbol.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SymbolFlashState {
    /// Last valid price seen.
    pub previous_price: Option<f64>,
    /// Display text of the last observation.
    pub display: String,
    /// `display` is the placeholder for a malformed observation.
    pub fallback: bool,
    pub flash: Option<FlashState>,
    pub persistent: Option<PersistentSuffixState>,
}
