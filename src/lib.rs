pub mod config;
pub mod error;
pub mod highlight;
pub mod market_data;
pub mod metrics;
pub mod render;
pub mod state;
