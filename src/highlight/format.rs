//! Fixed-precision price formatting.
//!
//! Every price is rendered twice from the same rounded decimal: a display form
//! with locale grouping, and a diff form with no grouping that the digit diff
//! runs against. Building both from one value keeps repeated renders of the
//! same price byte-identical.

use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::FormatError;

/// Largest precision honoured; larger requests are clamped.
pub const MAX_PRECISION: u32 = 18;

/// Grouping and decimal separator conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NumberLocale {
    /// `1,234.56`
    #[default]
    EnUs,
    /// `1.234,56`
    DeDe,
    /// `1 234,56` (narrow no-break space)
    FrFr,
    /// `1'234.56`
    DeCh,
    /// `1234.56`
    Plain,
}

impl NumberLocale {
    pub fn group_separator(&self) -> Option<&'static str> {
        match self {
            NumberLocale::EnUs => Some(","),
            NumberLocale::DeDe => Some("."),
            NumberLocale::FrFr => Some("\u{202f}"),
            NumberLocale::DeCh => Some("'"),
            NumberLocale::Plain => None,
        }
    }

    pub fn decimal_separator(&self) -> char {
        match self {
            NumberLocale::DeDe | NumberLocale::FrFr => ',',
            NumberLocale::EnUs | NumberLocale::DeCh | NumberLocale::Plain => '.',
        }
    }
}

impl FromStr for NumberLocale {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "en" | "en-us" => Ok(NumberLocale::EnUs),
            "de" | "de-de" => Ok(NumberLocale::DeDe),
            "fr" | "fr-fr" => Ok(NumberLocale::FrFr),
            "de-ch" => Ok(NumberLocale::DeCh),
            "plain" | "none" => Ok(NumberLocale::Plain),
            _ => Err(FormatError::UnsupportedLocale(s.to_string())),
        }
    }
}

impl fmt::Display for NumberLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            NumberLocale::EnUs => "en-US",
            NumberLocale::DeDe => "de-DE",
            NumberLocale::FrFr => "fr-FR",
            NumberLocale::DeCh => "de-CH",
            NumberLocale::Plain => "plain",
        };
        f.write_str(tag)
    }
}

/// The two renderings of one price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedPrice {
    /// Grouped, locale separators. Shown to the user.
    pub display: String,
    /// Ungrouped, `.` decimal point. Only used for digit diffs.
    pub diff: String,
}

/// Resolves the precision of an observation.
///
/// `None` falls back to `default_precision`; a negative request is malformed
/// and yields `None`.
pub fn resolve_precision(requested: Option<i32>, default_precision: u32) -> Option<u32> {
    match requested {
        None => Some(default_precision.min(MAX_PRECISION)),
        Some(p) if p < 0 => None,
        Some(p) => Some((p as u32).min(MAX_PRECISION)),
    }
}

/// Formats `price` at `precision` decimals.
///
/// Rounds half away from zero on the shortest decimal representation of the
/// float, so `1.005` becomes `1.01`. Returns `None` for NaN, infinities and
/// magnitudes outside the decimal range.
pub fn format_price(price: f64, precision: u32, locale: NumberLocale) -> Option<FormattedPrice> {
    if !price.is_finite() {
        return None;
    }
    let precision = precision.min(MAX_PRECISION);

    let mut value = Decimal::from_str(&price.to_string())
        .ok()?
        .round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(precision);
    if value.is_zero() {
        value.set_sign_positive(true);
    }

    let text = value.to_string();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.as_str()),
    };
    let (int_digits, frac_digits) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let sign = if negative { "-" } else { "" };

    let grouped = match locale.group_separator() {
        Some(separator) => group_digits(int_digits, separator),
        None => int_digits.to_string(),
    };

    let (display, diff) = if frac_digits.is_empty() {
        (format!("{sign}{grouped}"), format!("{sign}{int_digits}"))
    } else {
        (
            format!("{sign}{grouped}{}{frac_digits}", locale.decimal_separator()),
            format!("{sign}{int_digits}.{frac_digits}"),
        )
    };

    Some(FormattedPrice { display, diff })
}

/// Display text used in place of a malformed price.
pub fn fallback_display(default_precision: u32, locale: NumberLocale) -> String {
    format_price(0.0, default_precision, locale)
        .map(|formatted| formatted.display)
        .unwrap_or_else(|| "0".to_string())
}

fn group_digits(digits: &str, separator: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + (len / 3) * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}
