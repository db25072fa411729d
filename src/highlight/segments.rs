//! Pure state transition and render for one symbol's price.

use std::time::Instant;

use crate::highlight::HighlightSettings;
use crate::highlight::diff::{changed_digits_from_end, clamp_split_index, suffix_split_index};
use crate::highlight::format::{fallback_display, format_price, resolve_precision};
use crate::highlight::state::{Direction, FlashState, PersistentSuffixState, SymbolFlashState};
use crate::market_data::types::PriceObservation;

/// Styling applied to the changed suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuffixStyle {
    None,
    /// Bright colour while the suffix flash runs.
    Flash(Direction),
    /// Steady tint after the flash has faded.
    Static(Direction),
}

/// A price split into an unchanged prefix and a changed suffix, with the
/// styling that applies right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSegments {
    pub prefix: String,
    pub suffix: String,
    pub whole_flash: Option<Direction>,
    pub suffix_style: SuffixStyle,
}

impl PriceSegments {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            prefix: text.into(),
            suffix: String::new(),
            whole_flash: None,
            suffix_style: SuffixStyle::None,
        }
    }

    /// No styling at all.
    pub fn is_plain(&self) -> bool {
        self.whole_flash.is_none() && self.suffix_style == SuffixStyle::None
    }

    pub fn text(&self) -> String {
        format!("{}{}", self.prefix, self.suffix)
    }

    /// Byte offset of the suffix within `text()`.
    pub fn split_index(&self) -> usize {
        self.prefix.len()
    }
}

/// What one observation did to a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashOutcome {
    Triggered { direction: Direction, digits_from_end: usize },
    /// Changed inside the minimum interval; absorbed without a new flash.
    Debounced,
    Unchanged,
    FirstObservation,
    Disabled,
    Invalid,
}

impl FlashOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlashOutcome::Triggered { .. } => "triggered",
            FlashOutcome::Debounced => "debounced",
            FlashOutcome::Unchanged => "unchanged",
            FlashOutcome::FirstObservation => "first",
            FlashOutcome::Disabled => "disabled",
            FlashOutcome::Invalid => "invalid",
        }
    }
}

/// Result of applying one observation.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayUpdate {
    pub segments: PriceSegments,
    pub state: SymbolFlashState,
    pub outcome: FlashOutcome,
}

/// Applies `observation` to `state` at `now` and renders the result.
///
/// The previous price is read from `state`; the returned state always
/// carries the new price unless the observation is malformed, in which case
/// only the display text is replaced by the zero placeholder.
pub fn compute_price_display_segments(
    state: &SymbolFlashState,
    observation: &PriceObservation,
    now: Instant,
    settings: &HighlightSettings,
) -> DisplayUpdate {
    let formatted = resolve_precision(observation.precision, settings.default_precision)
        .and_then(|precision| {
            format_price(observation.price, precision, settings.locale).map(|f| (precision, f))
        });

    let Some((precision, formatted)) = formatted else {
        let mut next = state.clone();
        next.display = fallback_display(settings.default_precision, settings.locale);
        next.fallback = true;
        return DisplayUpdate {
            segments: PriceSegments::plain(next.display.clone()),
            state: next,
            outcome: FlashOutcome::Invalid,
        };
    };

    let mut next = state.clone();
    next.display = formatted.display;
    next.fallback = false;
    next.previous_price = Some(observation.price);

    if !settings.enabled {
        return DisplayUpdate {
            segments: PriceSegments::plain(next.display.clone()),
            state: next,
            outcome: FlashOutcome::Disabled,
        };
    }

    let outcome = match state.previous_price {
        None => FlashOutcome::FirstObservation,
        Some(previous) if previous == observation.price => FlashOutcome::Unchanged,
        Some(_)
            if state
                .flash
                .is_some_and(|flash| flash.debounces(now, settings.timings.min_interval)) =>
        {
            FlashOutcome::Debounced
        }
        Some(previous) => {
            let direction = Direction::between(previous, observation.price);
            let previous_diff = format_price(previous, precision, settings.locale)
                .map(|f| f.diff)
                .unwrap_or_default();
            let digits_from_end = changed_digits_from_end(&previous_diff, &formatted.diff);
            let split = suffix_split_index(&next.display, digits_from_end);

            next.flash = Some(FlashState::start(direction, split, now, &settings.timings));
            next.persistent = Some(PersistentSuffixState {
                direction,
                suffix_split_index: split.max(1),
            });

            FlashOutcome::Triggered { direction, digits_from_end }
        }
    };

    DisplayUpdate {
        segments: render_segments(&next, now, settings),
        state: next,
        outcome,
    }
}

/// Renders a stored state at `now` without a new observation.
pub fn render_segments(state: &SymbolFlashState, now: Instant, settings: &HighlightSettings) -> PriceSegments {
    if !settings.enabled || state.fallback {
        return PriceSegments::plain(state.display.clone());
    }

    let whole_flash = state
        .flash
        .filter(|flash| flash.whole_active(now))
        .map(|flash| flash.direction);

    let (split, suffix_style) = match (state.flash, state.persistent) {
        (Some(flash), _) if flash.suffix_active(now) => {
            (Some(flash.suffix_split_index), SuffixStyle::Flash(flash.direction))
        }
        (_, Some(persistent)) => (
            Some(persistent.suffix_split_index),
            SuffixStyle::Static(persistent.direction),
        ),
        _ => (None, SuffixStyle::None),
    };

    let split = split.map_or(state.display.len(), |index| clamp_split_index(&state.display, index));
    let (prefix, suffix) = state.display.split_at(split);

    PriceSegments {
        prefix: prefix.to_string(),
        suffix: suffix.to_string(),
        whole_flash,
        suffix_style,
    }
}
