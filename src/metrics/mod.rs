//! Metric recording. Every call is a no-op until a recorder is installed.

pub mod prometheus;

pub use prometheus::*;
