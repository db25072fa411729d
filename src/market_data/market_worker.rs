use std::time::{Duration, Instant};

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::market_data::types::FeedEvent;
use crate::metrics;
use crate::render::BoardRenderer;
use crate::state::MarketBoard;

/// Owns the board: applies observations as they arrive and redraws on every
/// refresh tick. Draws once more and hands the board back when the router
/// closes the channel.
pub async fn run_board_worker(
    mut rx: mpsc::Receiver<FeedEvent>,
    mut board: MarketBoard,
    mut renderer: Box<dyn BoardRenderer>,
    refresh_interval: Duration,
) -> anyhow::Result<MarketBoard> {
    let mut ticker = tokio::time::interval(refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!(mode = renderer.mode(), refresh_ms = refresh_interval.as_millis() as u64, "board worker started");

    loop {
        tokio::select! {
            maybe_event = rx.recv() => {
                let Some(event) = maybe_event else {
                    break;
                };
                let outcome = board.apply(&event.observation, Instant::now());
                debug!(
                    symbol = %event.observation.symbol,
                    price = event.observation.price,
                    outcome = outcome.as_str(),
                    "board updated"
                );
            }
            _ = ticker.tick() => {
                draw(renderer.as_mut(), &board)?;
            }
        }
    }

    draw(renderer.as_mut(), &board)?;
    info!(symbols = board.len(), "router channel closed, board worker finished");
    Ok(board)
}

fn draw(renderer: &mut dyn BoardRenderer, board: &MarketBoard) -> anyhow::Result<()> {
    let started = Instant::now();
    renderer.draw(board, started)?;
    metrics::record_render_duration_us(renderer.mode(), started.elapsed().as_micros());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::{HighlightSettings, PriceHighlighter};
    use crate::market_data::types::{FeedSource, PriceObservation};
    use std::sync::{Arc, Mutex};

    /// Records the text of every row on each draw.
    struct RecordingRenderer {
        frames: Arc<Mutex<Vec<Vec<String>>>>,
    }

    impl BoardRenderer for RecordingRenderer {
        fn mode(&self) -> &'static str {
            "recording"
        }

        fn draw(&mut self, board: &MarketBoard, now: Instant) -> anyhow::Result<()> {
            let frame = board
                .snapshot(now)
                .into_iter()
                .map(|view| format!("{} {}", view.symbol, view.segments.text()))
                .collect();
            self.frames.lock().unwrap().push(frame);
            Ok(())
        }
    }

    struct FailingRenderer;

    impl BoardRenderer for FailingRenderer {
        fn mode(&self) -> &'static str {
            "failing"
        }

        fn draw(&mut self, _board: &MarketBoard, _now: Instant) -> anyhow::Result<()> {
            anyhow::bail!("terminal went away")
        }
    }

    fn board() -> MarketBoard {
        MarketBoard::new(
            PriceHighlighter::new(HighlightSettings::default()),
            Duration::from_secs(180),
        )
    }

    #[tokio::test]
    async fn drains_channel_and_draws_final_frame() {
        let frames = Arc::new(Mutex::new(Vec::new()));
        let renderer = Box::new(RecordingRenderer { frames: frames.clone() });
        let (tx, rx) = mpsc::channel(16);

        for (symbol, price) in [("BTCUSDT", 64000.0), ("ETHUSDT", 3200.5), ("BTCUSDT", 64001.25)] {
            tx.send(FeedEvent::new(PriceObservation::new(symbol, price, Some(2)), FeedSource::Stdin))
                .await
                .unwrap();
        }
        drop(tx);

        let board = run_board_worker(rx, board(), renderer, Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(board.len(), 2);
        assert_eq!(board.row("BTCUSDT").unwrap().ticks, 2);

        let frames = frames.lock().unwrap();
        let last = frames.last().unwrap();
        assert_eq!(last, &["BTCUSDT 64,001.25", "ETHUSDT 3,200.50"]);
    }

    #[tokio::test]
    async fn renderer_errors_stop_the_worker() {
        let (_tx, rx) = mpsc::channel(1);
        let result = run_board_worker(rx, board(), Box::new(FailingRenderer), Duration::from_millis(10)).await;
        assert!(result.is_err());
    }
}
