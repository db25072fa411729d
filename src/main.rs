use std::fs::OpenOptions;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use price_flash::config::{Config, RenderMode};
use price_flash::highlight::PriceHighlighter;
use price_flash::market_data::adapters::build_feed;
use price_flash::market_data::{market_worker, router};
use price_flash::metrics;
use price_flash::render::{BoardRenderer, LogRenderer, StatusLine, TerminalRenderer, keys};
use price_flash::state::MarketBoard;

/// Feed adapter to router. Absorbs bursts without back-pressuring the feed.
const ADAPTER_CHANNEL_BUFFER: usize = 4_096;

/// Router to board worker.
const BOARD_CHANNEL_BUFFER: usize = 1_024;

fn init_tracing(config: &Config) -> Result<()> {
    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("invalid log filter {:?}", config.log_level))?;

    match &config.log_file {
        // the terminal belongs to the board, so logs go to a file
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config)?;

    if let Some(port) = config.metrics_port {
        metrics::init_metrics_server(port)?;
    }

    let feed = build_feed(&config.feed)?;
    let source = feed.source();

    info!(
        feed = %source,
        render = ?config.render_mode,
        locale = %config.highlight.locale,
        flash = config.highlight.enabled,
        "price-flash starting"
    );

    let (tx, rx) = mpsc::channel(ADAPTER_CHANNEL_BUFFER);
    let (board_tx, board_rx) = mpsc::channel(BOARD_CHANNEL_BUFFER);

    let board = MarketBoard::new(PriceHighlighter::new(config.highlight.clone()), config.stale_after);
    let renderer: Box<dyn BoardRenderer> = match config.render_mode {
        RenderMode::Tui => Box::new(TerminalRenderer::enter(StatusLine {
            feed: source,
            flash_enabled: config.highlight.enabled,
        })?),
        RenderMode::Log => Box::new(LogRenderer::new()),
    };

    tokio::spawn(async move {
        match feed.run(tx).await {
            Ok(()) => info!(feed = %source, "feed finished"),
            Err(err) => error!(feed = %source, error = %err, "feed failed"),
        }
    });
    tokio::spawn(async move {
        if let Err(err) = router::run_router(rx, board_tx).await {
            error!(error = %err, "router failed");
        }
    });
    let mut worker_handle = tokio::spawn(market_worker::run_board_worker(
        board_rx,
        board,
        renderer,
        config.refresh_interval,
    ));

    let quit = async {
        match config.render_mode {
            RenderMode::Tui => keys::wait_for_quit().await,
            RenderMode::Log => std::future::pending().await,
        }
    };

    tokio::select! {
        res = &mut worker_handle => {
            return match res {
                Ok(Ok(board)) => {
                    info!(symbols = board.len(), "board worker exited");
                    Ok(())
                }
                Ok(Err(err)) => Err(err.context("board worker failed")),
                Err(err) => Err(anyhow::Error::new(err).context("board worker panicked")),
            };
        }
        res = quit => {
            if let Err(err) = res {
                warn!(error = %err, "terminal input failed");
            }
            info!("quit requested, shutting down");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("received Ctrl-C, shutting down");
        }
    }

    // dropping the worker's future drops the renderer, which restores the terminal
    worker_handle.abort();
    let _ = worker_handle.await;

    Ok(())
}
