//! Synthetic random-walk feed for running the board without a backend.

use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use tokio::sync::mpsc;
use tracing::{debug, info};

use super::PriceFeed;
use crate::market_data::types::{FeedEvent, FeedSource, PriceObservation};

/// Relative standard deviation of one step.
const STEP_SIGMA: f64 = 0.0004;
/// Chance that a step is a larger jump.
const JUMP_PROBABILITY: f64 = 0.03;
const JUMP_SIZE: f64 = 0.01;
const MIN_DELAY_MS: u64 = 20;
const MAX_DELAY_MS: u64 = 400;

const STARTING_PRICES: &[(&str, f64)] = &[
    ("BTCUSDT", 64_000.0),
    ("ETHUSDT", 3_200.0),
    ("BNBUSDT", 580.0),
    ("SOLUSDT", 150.0),
    ("XRPUSDT", 0.52),
    ("DOGEUSDT", 0.15),
];
const FALLBACK_PRICE: f64 = 100.0;

#[derive(Debug, Clone)]
struct Walker {
    symbol: String,
    price: f64,
    precision: i32,
}

pub struct DemoFeed {
    walkers: Vec<Walker>,
    rng: StdRng,
    step: Normal<f64>,
}

impl DemoFeed {
    /// `seed` makes the walk reproducible; `None` seeds from the OS.
    pub fn new(symbols: &[String], seed: Option<u64>) -> anyhow::Result<Self> {
        let walkers = symbols
            .iter()
            .map(|symbol| {
                let price = STARTING_PRICES
                    .iter()
                    .find(|(known, _)| *known == symbol.as_str())
                    .map_or(FALLBACK_PRICE, |(_, price)| *price);
                Walker {
                    symbol: symbol.clone(),
                    price,
                    precision: precision_for(price),
                }
            })
            .collect();

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let step = Normal::new(0.0, STEP_SIGMA).context("invalid demo step distribution")?;

        Ok(Self { walkers, rng, step })
    }

    /// Advances one random symbol and returns its new observation.
    fn next_observation(&mut self) -> Option<PriceObservation> {
        if self.walkers.is_empty() {
            return None;
        }
        let index = self.rng.random_range(0..self.walkers.len());

        let mut change = self.step.sample(&mut self.rng);
        if self.rng.random_bool(JUMP_PROBABILITY) {
            change += if self.rng.random_bool(0.5) { JUMP_SIZE } else { -JUMP_SIZE };
        }

        let walker = &mut self.walkers[index];
        walker.price = (walker.price * (1.0 + change)).max(f64::EPSILON);

        Some(PriceObservation::new(
            walker.symbol.clone(),
            walker.price,
            Some(walker.precision),
        ))
    }

    fn next_delay(&mut self) -> Duration {
        Duration::from_millis(self.rng.random_range(MIN_DELAY_MS..=MAX_DELAY_MS))
    }
}

/// Decimal places that keep roughly five significant digits visible.
fn precision_for(price: f64) -> i32 {
    if price >= 100.0 {
        2
    } else if price >= 1.0 {
        3
    } else {
        5
    }
}

#[async_trait]
impl PriceFeed for DemoFeed {
    fn source(&self) -> FeedSource {
        FeedSource::Demo
    }

    async fn run(self: Box<Self>, tx: mpsc::Sender<FeedEvent>) -> anyhow::Result<()> {
        let mut feed = self;
        info!(symbols = feed.walkers.len(), "demo feed started");

        loop {
            tokio::time::sleep(feed.next_delay()).await;

            let Some(observation) = feed.next_observation() else {
                info!("demo feed has no symbols, stopping");
                return Ok(());
            };

            if tx.send(FeedEvent::new(observation, FeedSource::Demo)).await.is_err() {
                debug!("router channel closed, demo feed stopping");
                return Ok(());
            }
        }
    }
}
