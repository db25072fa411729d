//! Line-oriented feed on standard input.
//!
//! Each line is either a JSON object (`{"symbol": "BTCUSDT", "price": 1.5}`)
//! or whitespace-separated `SYMBOL PRICE [PRECISION]`. Blank lines and lines
//! starting with `#` are ignored.

use anyhow::Context;
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::PriceFeed;
use crate::error::FeedError;
use crate::market_data::types::{FeedEvent, FeedSource, PriceObservation};
use crate::metrics;

pub struct StdinFeed;

pub fn parse_line(line: &str) -> Result<Option<PriceObservation>, FeedError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let malformed = |reason: String| FeedError::MalformedLine {
        line: trimmed.to_string(),
        reason,
    };

    if trimmed.starts_with('{') {
        return serde_json::from_str::<PriceObservation>(trimmed)
            .map(Some)
            .map_err(|err| malformed(err.to_string()));
    }

    let mut fields = trimmed.split_whitespace();
    let symbol = fields
        .next()
        .ok_or_else(|| malformed("missing symbol".to_string()))?;
    let price = fields
        .next()
        .ok_or_else(|| malformed("missing price".to_string()))?
        .parse::<f64>()
        .map_err(|err| malformed(format!("bad price: {err}")))?;
    let precision = fields
        .next()
        .map(|raw| {
            raw.parse::<i32>()
                .map_err(|err| malformed(format!("bad precision: {err}")))
        })
        .transpose()?;

    if fields.next().is_some() {
        return Err(malformed("unexpected trailing fields".to_string()));
    }

    Ok(Some(PriceObservation::new(symbol, price, precision)))
}

#[async_trait]
impl PriceFeed for StdinFeed {
    fn source(&self) -> FeedSource {
        FeedSource::Stdin
    }

    async fn run(self: Box<Self>, tx: mpsc::Sender<FeedEvent>) -> anyhow::Result<()> {
        info!("reading prices from stdin");
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        while let Some(line) = lines.next_line().await.context("failed to read stdin")? {
            let observation = match parse_line(&line) {
                Ok(Some(observation)) => observation,
                Ok(None) => continue,
                Err(err) => {
                    warn!(error = %err, "skipping feed line");
                    metrics::record_feed_error(FeedSource::Stdin.as_str(), err.kind());
                    continue;
                }
            };

            if tx.send(FeedEvent::new(observation, FeedSource::Stdin)).await.is_err() {
                debug!("router channel closed, stdin feed stopping");
                return Ok(());
            }
        }

        info!("stdin closed, feed finished");
        Ok(())
    }
}
