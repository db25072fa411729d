use anyhow::Context;
use ::metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus HTTP exporter on `port`.
/// After this call, any metrics recorded via the `metrics` crate
/// macros (counter!, histogram!) are exported at /metrics.
pub fn init_metrics_server(port: u16) -> anyhow::Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .with_context(|| format!("failed to start Prometheus metrics server on port {port}"))
}

// ── Feed metrics ─────────────────────────────────────────────────

pub fn record_feed_event(source: &str) {
    counter!("feed_events_total", "source" => source.to_string()).increment(1);
}

pub fn record_feed_error(source: &str, kind: &str) {
    counter!("feed_errors_total", "source" => source.to_string(), "kind" => kind.to_string())
        .increment(1);
}

/// Time from adapter receive to router hand-off.
pub fn record_feed_latency_us(source: &str, latency_us: u128) {
    histogram!("feed_router_latency_us", "source" => source.to_string()).record(latency_us as f64);
}

// ── Highlight metrics ────────────────────────────────────────────

pub fn record_flash(direction: &str) {
    counter!("price_flashes_total", "direction" => direction.to_string()).increment(1);
}

pub fn record_flash_debounced() {
    counter!("price_flashes_debounced_total").increment(1);
}

pub fn record_invalid_price() {
    counter!("price_invalid_total").increment(1);
}

pub fn record_changed_digits(digits: usize) {
    histogram!("price_changed_digits").record(digits as f64);
}

// ── Render metrics ───────────────────────────────────────────────

pub fn record_render_duration_us(mode: &str, duration_us: u128) {
    histogram!("board_render_duration_us", "mode" => mode.to_string()).record(duration_us as f64);
}
