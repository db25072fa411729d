//! Price delta highlighting.
//!
//! Decides when a price change flashes, which trailing digits changed, and
//! how the formatted price should be styled at a given instant.

pub mod diff;
pub mod format;
pub mod highlighter;
pub mod segments;
pub mod state;

pub use format::NumberLocale;
pub use highlighter::PriceHighlighter;
pub use segments::{
    DisplayUpdate, FlashOutcome, PriceSegments, SuffixStyle, compute_price_display_segments,
    render_segments,
};
pub use state::{Direction, FlashTimings, SymbolFlashState};

/// Knobs shared by every symbol on a board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightSettings {
    /// Feature flag. When false prices render as plain text.
    pub enabled: bool,
    pub default_precision: u32,
    pub locale: NumberLocale,
    pub timings: FlashTimings,
}

impl Default for HighlightSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            default_precision: 2,
            locale: NumberLocale::default(),
            timings: FlashTimings::default(),
        }
    }
}
