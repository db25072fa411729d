use std::io::{self, Stdout};
use std::time::Instant;

use anyhow::Context;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::{Frame, Terminal};

use super::BoardRenderer;
use super::spans::{change_span, price_line};
use crate::market_data::types::FeedSource;
use crate::state::{MarketBoard, RowView};

/// What the header and footer report about the running session.
#[derive(Debug, Clone, Copy)]
pub struct StatusLine {
    pub feed: FeedSource,
    pub flash_enabled: bool,
}

/// Full-screen board on the alternate screen. The terminal is restored when
/// the renderer is dropped.
pub struct TerminalRenderer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    status: StatusLine,
}

impl TerminalRenderer {
    pub fn enter(status: StatusLine) -> anyhow::Result<Self> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(err).context("failed to enter alternate screen");
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout)).context("failed to create terminal")?;
        Ok(Self { terminal, status })
    }
}

impl Drop for TerminalRenderer {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

impl BoardRenderer for TerminalRenderer {
    fn mode(&self) -> &'static str {
        "tui"
    }

    fn draw(&mut self, board: &MarketBoard, now: Instant) -> anyhow::Result<()> {
        let status = self.status;
        self.terminal
            .draw(|frame| draw_board(frame, board, now, &status))
            .context("failed to draw board")?;
        Ok(())
    }
}

pub fn draw_board(frame: &mut Frame, board: &MarketBoard, now: Instant, status: &StatusLine) {
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    draw_header(frame, board, header);

    let rows = board.snapshot(now);
    if rows.is_empty() {
        let waiting = Paragraph::new(Line::styled("waiting for prices...", Style::default().fg(Color::DarkGray)))
            .block(Block::default().borders(Borders::ALL).title(" Prices "));
        frame.render_widget(waiting, body);
    } else {
        draw_table(frame, &rows, body);
    }

    draw_footer(frame, status, footer);
}

fn draw_header(frame: &mut Frame, board: &MarketBoard, area: Rect) {
    let header = Line::from(vec![
        Span::styled(" price-flash ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(format!("| symbols: {}", board.len())),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

fn draw_footer(frame: &mut Frame, status: &StatusLine, area: Rect) {
    let flash = if status.flash_enabled { "on" } else { "off" };
    let footer = Line::from(vec![
        Span::raw(format!(" feed: {} | flash: {flash} | ", status.feed)),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw("/"),
        Span::styled("esc", Style::default().fg(Color::Yellow)),
        Span::raw(" quit"),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}

fn draw_table(frame: &mut Frame, rows: &[RowView], area: Rect) {
    let header = Row::new(["Symbol", "Price", "Chg %", "Ticks"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let body = rows.iter().map(|view| {
        let row = Row::new(vec![
            Cell::from(view.symbol.clone()),
            Cell::from(price_line(&view.segments).right_aligned()),
            Cell::from(Line::from(change_span(view.change_pct)).right_aligned()),
            Cell::from(Line::raw(view.ticks.to_string()).right_aligned()),
        ]);
        if view.stale {
            row.style(Style::default().fg(Color::DarkGray))
        } else {
            row
        }
    });

    let table = Table::new(
        body,
        [
            Constraint::Length(12),
            Constraint::Min(16),
            Constraint::Length(10),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(" Prices "));

    frame.render_widget(table, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::{HighlightSettings, PriceHighlighter};
    use crate::market_data::types::PriceObservation;
    use ratatui::backend::TestBackend;
    use std::time::Duration;

    fn render(board: &MarketBoard, now: Instant) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        let status = StatusLine {
            feed: FeedSource::Demo,
            flash_enabled: true,
        };
        terminal.draw(|frame| draw_board(frame, board, now, &status)).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect())
            .collect()
    }

    fn board() -> MarketBoard {
        MarketBoard::new(
            PriceHighlighter::new(HighlightSettings::default()),
            Duration::from_secs(180),
        )
    }

    #[test]
    fn empty_board_shows_placeholder() {
        let lines = render(&board(), Instant::now());
        assert!(lines[9].contains("feed: demo | flash: on"));
        assert!(lines.iter().any(|line| line.contains("waiting for prices")));
    }

    #[test]
    fn rows_show_formatted_prices() {
        let mut board = board();
        let now = Instant::now();
        board.apply(&PriceObservation::new("BTCUSDT", 64000.0, Some(2)), now);
        board.apply(&PriceObservation::new("ETHUSDT", 3200.5, Some(2)), now);

        let lines = render(&board, now);
        assert!(lines[0].contains("symbols: 2"));
        assert!(lines.iter().any(|line| line.contains("Symbol") && line.contains("Price")));
        let btc = lines.iter().find(|line| line.contains("BTCUSDT")).unwrap();
        assert!(btc.contains("64,000.00"));
        let eth = lines.iter().find(|line| line.contains("ETHUSDT")).unwrap();
        assert!(eth.contains("3,200.50"));
    }
}
