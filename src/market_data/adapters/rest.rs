//! Polls a snapshot endpoint on a fixed interval.
//!
//! Two response shapes are understood: a bare array of observations, and the
//! backend's batch envelope where each entry carries either a `markPrice` or
//! an `error`.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use super::PriceFeed;
use crate::error::FeedError;
use crate::market_data::types::{FeedEvent, FeedSource, PriceObservation};
use crate::metrics;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SnapshotBody {
    List(Vec<PriceObservation>),
    Batch { data: Vec<BatchEntry> },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BatchEntry {
    symbol: String,
    #[serde(default)]
    mark_price: Option<f64>,
    #[serde(default)]
    precision: Option<i32>,
    #[serde(default)]
    error: Option<String>,
}

/// An entry the backend reported without a usable price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub symbol: String,
    pub reason: String,
}

#[derive(Debug, Default, PartialEq)]
pub struct Snapshot {
    pub observations: Vec<PriceObservation>,
    pub rejected: Vec<RejectedEntry>,
}

pub fn parse_snapshot(body: &str) -> Result<Snapshot, FeedError> {
    match serde_json::from_str::<SnapshotBody>(body)? {
        SnapshotBody::List(observations) => Ok(Snapshot {
            observations,
            rejected: Vec::new(),
        }),
        SnapshotBody::Batch { data } => {
            let mut snapshot = Snapshot::default();
            for entry in data {
                match (entry.error, entry.mark_price) {
                    (Some(reason), _) => snapshot.rejected.push(RejectedEntry {
                        symbol: entry.symbol,
                        reason,
                    }),
                    (None, Some(price)) => snapshot.observations.push(PriceObservation::new(
                        entry.symbol,
                        price,
                        entry.precision,
                    )),
                    (None, None) => snapshot.rejected.push(RejectedEntry {
                        symbol: entry.symbol,
                        reason: "missing markPrice".to_string(),
                    }),
                }
            }
            Ok(snapshot)
        }
    }
}

pub struct RestFeed {
    client: reqwest::Client,
    url: String,
    poll_interval: Duration,
}

impl RestFeed {
    pub fn new(url: String, poll_interval: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            url,
            poll_interval,
        })
    }

    async fn fetch(&self) -> Result<Snapshot, FeedError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }
        let body = response.text().await?;
        parse_snapshot(&body)
    }
}

#[async_trait]
impl PriceFeed for RestFeed {
    fn source(&self) -> FeedSource {
        FeedSource::Rest
    }

    async fn run(self: Box<Self>, tx: mpsc::Sender<FeedEvent>) -> anyhow::Result<()> {
        info!(url = %self.url, interval_ms = self.poll_interval.as_millis() as u64, "polling price snapshots");

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            let snapshot = match self.fetch().await {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    // try again on the next tick
                    warn!(error = %err, "snapshot poll failed");
                    metrics::record_feed_error(FeedSource::Rest.as_str(), err.kind());
                    continue;
                }
            };

            for rejected in &snapshot.rejected {
                debug!(symbol = %rejected.symbol, reason = %rejected.reason, "snapshot entry rejected");
                metrics::record_feed_error(FeedSource::Rest.as_str(), "rejected_entry");
            }

            for observation in snapshot.observations {
                if tx.send(FeedEvent::new(observation, FeedSource::Rest)).await.is_err() {
                    debug!("router channel closed, rest feed stopping");
                    return Ok(());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_list() {
        let body = r#"[{"symbol":"BTCUSDT","price":64012.5,"precision":2},{"symbol":"ETHUSDT","price":3200}]"#;
        let snapshot = parse_snapshot(body).unwrap();
        assert_eq!(
            snapshot.observations,
            vec![
                PriceObservation::new("BTCUSDT", 64012.5, Some(2)),
                PriceObservation::new("ETHUSDT", 3200.0, None),
            ]
        );
        assert!(snapshot.rejected.is_empty());
    }

    #[test]
    fn parses_batch_envelope() {
        let body = r#"{
            "data": [
                {"symbol": "BTCUSDT", "markPrice": 64012.5, "fundingRate": 0.0001, "ageSeconds": 1.2},
                {"symbol": "XYZUSDT", "error": "Symbol not found"},
                {"symbol": "ETHUSDT", "error": "Data stale", "ageSeconds": 200.5, "maxAgeSeconds": 180}
            ],
            "found": 1,
            "missing": 2,
            "total": 3
        }"#;
        let snapshot = parse_snapshot(body).unwrap();
        assert_eq!(
            snapshot.observations,
            vec![PriceObservation::new("BTCUSDT", 64012.5, None)]
        );
        assert_eq!(
            snapshot.rejected,
            vec![
                RejectedEntry {
                    symbol: "XYZUSDT".to_string(),
                    reason: "Symbol not found".to_string(),
                },
                RejectedEntry {
                    symbol: "ETHUSDT".to_string(),
                    reason: "Data stale".to_string(),
                },
            ]
        );
    }

    #[test]
    fn batch_entry_without_price_is_rejected() {
        let snapshot = parse_snapshot(r#"{"data":[{"symbol":"BTCUSDT"}]}"#).unwrap();
        assert!(snapshot.observations.is_empty());
        assert_eq!(snapshot.rejected[0].reason, "missing markPrice");
    }

    #[test]
    fn garbage_is_a_snapshot_error() {
        let err = parse_snapshot("<html>502</html>").unwrap_err();
        assert_eq!(err.kind(), "snapshot");
        assert!(parse_snapshot(r#"{"rows": []}"#).is_err());
    }
}
