pub mod adapters;
pub mod market_worker;
pub mod router;
pub mod types;
