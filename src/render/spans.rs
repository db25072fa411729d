//! Styled spans for highlighted prices.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::highlight::{Direction, PriceSegments, SuffixStyle};

/// Background behind the whole value while it flashes.
pub fn whole_style(flash: Option<Direction>) -> Style {
    match flash {
        Some(Direction::Up) => Style::default()
            .fg(Color::Black)
            .bg(Color::Green)
            .add_modifier(Modifier::BOLD),
        Some(Direction::Down) => Style::default()
            .fg(Color::White)
            .bg(Color::Red)
            .add_modifier(Modifier::BOLD),
        None => Style::default(),
    }
}

pub fn suffix_style(style: SuffixStyle) -> Style {
    match style {
        SuffixStyle::Flash(Direction::Up) => Style::default()
            .fg(Color::LightGreen)
            .add_modifier(Modifier::BOLD),
        SuffixStyle::Flash(Direction::Down) => Style::default()
            .fg(Color::LightRed)
            .add_modifier(Modifier::BOLD),
        SuffixStyle::Static(Direction::Up) => Style::default().fg(Color::Green),
        SuffixStyle::Static(Direction::Down) => Style::default().fg(Color::Red),
        SuffixStyle::None => Style::default(),
    }
}

/// One line for a price. Unstyled segments become a single raw span.
pub fn price_line(segments: &PriceSegments) -> Line<'static> {
    if segments.is_plain() {
        return Line::raw(segments.text());
    }

    let base = whole_style(segments.whole_flash);
    let suffix = base.patch(suffix_style(segments.suffix_style));

    let mut spans = Vec::with_capacity(2);
    if !segments.prefix.is_empty() {
        spans.push(Span::styled(segments.prefix.clone(), base));
    }
    if !segments.suffix.is_empty() {
        spans.push(Span::styled(segments.suffix.clone(), suffix));
    }
    Line::from(spans)
}

/// Signed percent change, coloured by sign.
pub fn change_span(change_pct: Option<f64>) -> Span<'static> {
    match change_pct {
        Some(pct) if pct > 0.0 => Span::styled(format!("+{pct:.2}%"), Style::default().fg(Color::Green)),
        Some(pct) if pct < 0.0 => Span::styled(format!("{pct:.2}%"), Style::default().fg(Color::Red)),
        Some(_) => Span::raw("0.00%"),
        None => Span::styled("--", Style::default().fg(Color::DarkGray)),
    }
}
