use tokio::sync::mpsc;
use tracing::{debug, info, trace, warn};

use crate::market_data::types::FeedEvent;
use crate::metrics;

/// Upper-cases and trims a feed symbol. Empty symbols are dropped.
pub fn normalize_symbol(raw: &str) -> Option<String> {
    let symbol = raw.trim();
    if symbol.is_empty() {
        None
    } else {
        Some(symbol.to_ascii_uppercase())
    }
}

/// Forwards feed events to the board, normalising symbols on the way.
/// Returns when the feed side closes or the board side is gone.
pub async fn run_router(mut rx: mpsc::Receiver<FeedEvent>, board_tx: mpsc::Sender<FeedEvent>) -> anyhow::Result<()> {
    while let Some(mut event) = rx.recv().await {
        let source = event.source.as_str();
        metrics::record_feed_event(source);
        metrics::record_feed_latency_us(source, event.received_at.elapsed().as_micros());

        let Some(symbol) = normalize_symbol(&event.observation.symbol) else {
            warn!(source, price = event.observation.price, "dropping observation without symbol");
            metrics::record_feed_error(source, "empty_symbol");
            continue;
        };
        event.observation.symbol = symbol;

        trace!(
            source,
            symbol = %event.observation.symbol,
            price = event.observation.price,
            precision = ?event.observation.precision,
            "routing observation"
        );

        if board_tx.send(event).await.is_err() {
            debug!("board channel closed, router stopping");
            return Ok(());
        }
    }

    info!("feed channel closed, router shutting down");
    Ok(())
}
