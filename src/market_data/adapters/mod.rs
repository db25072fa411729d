pub mod demo;
pub mod rest;
pub mod stdin;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::config::FeedConfig;
use crate::market_data::types::{FeedEvent, FeedSource};

/// A source of price observations.
///
/// `run` pushes events until the source is exhausted or the receiver is
/// dropped. Returning `Ok(())` in the latter case is not an error.
#[async_trait]
pub trait PriceFeed: Send {
    fn source(&self) -> FeedSource;

    async fn run(self: Box<Self>, tx: mpsc::Sender<FeedEvent>) -> anyhow::Result<()>;
}

pub fn build_feed(config: &FeedConfig) -> anyhow::Result<Box<dyn PriceFeed>> {
    let feed: Box<dyn PriceFeed> = match config {
        FeedConfig::Demo { symbols, seed } => Box::new(demo::DemoFeed::new(symbols, *seed)?),
        FeedConfig::Stdin => Box::new(stdin::StdinFeed),
        FeedConfig::Rest { url, poll_interval } => {
            Box::new(rest::RestFeed::new(url.clone(), *poll_interval)?)
        }
    };
    Ok(feed)
}
