use std::collections::HashMap;
use std::time::Instant;

use tracing::{debug, warn};

use crate::highlight::HighlightSettings;
use crate::highlight::segments::{
    FlashOutcome, PriceSegments, compute_price_display_segments, render_segments,
};
use crate::highlight::state::SymbolFlashState;
use crate::market_data::types::PriceObservation;
use crate::metrics;

/// Per-symbol highlight state, owned by one board.
///
/// Not shared and not locked: the owner mutates it on each tick and reads it
/// during its render pass.
#[derive(Debug, Clone, Default)]
pub struct PriceHighlighter {
    settings: HighlightSettings,
    symbols: HashMap<String, SymbolFlashState>,
}

impl PriceHighlighter {
    pub fn new(settings: HighlightSettings) -> Self {
        Self {
            settings,
            symbols: HashMap::new(),
        }
    }

    pub fn settings(&self) -> &HighlightSettings {
        &self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Applies one observation and returns what it did plus the segments to
    /// show right now.
    pub fn observe(&mut self, observation: &PriceObservation, now: Instant) -> (FlashOutcome, PriceSegments) {
        let current = self.symbols.remove(&observation.symbol).unwrap_or_default();
        let update = compute_price_display_segments(&current, observation, now, &self.settings);

        match update.outcome {
            FlashOutcome::Triggered { direction, digits_from_end } => {
                debug!(
                    symbol = %observation.symbol,
                    price = observation.price,
                    %direction,
                    digits_from_end,
                    "price flash"
                );
                metrics::record_flash(direction.as_str());
                metrics::record_changed_digits(digits_from_end);
            }
            FlashOutcome::Debounced => metrics::record_flash_debounced(),
            FlashOutcome::Invalid => {
                warn!(
                    symbol = %observation.symbol,
                    price = observation.price,
                    precision = ?observation.precision,
                    "malformed price observation, rendering zero"
                );
                metrics::record_invalid_price();
            }
            FlashOutcome::Unchanged | FlashOutcome::FirstObservation | FlashOutcome::Disabled => {}
        }

        self.symbols.insert(observation.symbol.clone(), update.state);
        (update.outcome, update.segments)
    }

    /// Segments for `symbol` at `now`, or `None` if it was never observed.
    pub fn segments(&self, symbol: &str, now: Instant) -> Option<PriceSegments> {
        self.symbols
            .get(symbol)
            .map(|state| render_segments(state, now, &self.settings))
    }

    pub fn state(&self, symbol: &str) -> Option<&SymbolFlashState> {
        self.symbols.get(symbol)
    }

    pub fn previous_price(&self, symbol: &str) -> Option<f64> {
        self.symbols.get(symbol).and_then(|state| state.previous_price)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::state::Direction;
    use crate::highlight::SuffixStyle;
    use std::time::Duration;

    #[test]
    fn symbols_are_tracked_independently() {
        let mut highlighter = PriceHighlighter::new(HighlightSettings::default());
        let base = Instant::now();

        highlighter.observe(&PriceObservation::new("BTCUSDT", 64000.0, Some(2)), base);
        highlighter.observe(&PriceObservation::new("ETHUSDT", 3200.0, Some(2)), base);

        let (btc, _) = highlighter.observe(
            &PriceObservation::new("BTCUSDT", 64010.0, Some(2)),
            base + Duration::from_millis(50),
        );
        // a flash on one symbol never debounces another
        let (eth, _) = highlighter.observe(
            &PriceObservation::new("ETHUSDT", 3199.0, Some(2)),
            base + Duration::from_millis(60),
        );

        assert!(matches!(btc, FlashOutcome::Triggered { direction: Direction::Up, .. }));
        assert!(matches!(eth, FlashOutcome::Triggered { direction: Direction::Down, .. }));
        assert_eq!(highlighter.len(), 2);
    }

    #[test]
    fn render_without_new_tick_follows_the_clock() {
        let mut highlighter = PriceHighlighter::new(HighlightSettings::default());
        let base = Instant::now();
        highlighter.observe(&PriceObservation::new("SOLUSDT", 150.25, None), base);
        highlighter.observe(&PriceObservation::new("SOLUSDT", 150.5, None), base + Duration::from_secs(1));

        let late = highlighter
            .segments("SOLUSDT", base + Duration::from_secs(5))
            .unwrap();
        assert_eq!(late.whole_flash, None);
        assert_eq!(late.suffix_style, SuffixStyle::Static(Direction::Up));
        assert_eq!(late.text(), "150.50");
        assert!(highlighter.segments("XRPUSDT", base).is_none());
    }

    #[test]
    fn disabled_highlighter_never_styles() {
        let settings = HighlightSettings {
            enabled: false,
            ..HighlightSettings::default()
        };
        let mut highlighter = PriceHighlighter::new(settings);
        let base = Instant::now();
        for (i, price) in [1.0, 2.0, 1.5, 3.0].iter().enumerate() {
            let (_, segments) = highlighter.observe(
                &PriceObservation::new("BTCUSDT", *price, Some(2)),
                base + Duration::from_secs(i as u64),
            );
            assert!(segments.is_plain());
        }
        assert_eq!(highlighter.previous_price("BTCUSDT"), Some(3.0));
        assert!(highlighter.segments("BTCUSDT", base).unwrap().is_plain());
    }

    #[test]
    fn malformed_first_observation_still_registers_symbol() {
        let mut highlighter = PriceHighlighter::new(HighlightSettings::default());
        let (outcome, segments) =
            highlighter.observe(&PriceObservation::new("BTCUSDT", f64::INFINITY, None), Instant::now());
        assert_eq!(outcome, FlashOutcome::Invalid);
        assert_eq!(segments.text(), "0.00");
        assert_eq!(highlighter.previous_price("BTCUSDT"), None);
        assert!(highlighter.state("BTCUSDT").unwrap().fallback);
    }
}
