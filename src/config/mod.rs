use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, bail};

use crate::highlight::{FlashTimings, HighlightSettings, NumberLocale};

const DEFAULT_DEMO_SYMBOLS: &str = "BTCUSDT,ETHUSDT,SOLUSDT,DOGEUSDT";
const DEFAULT_TUI_LOG_FILE: &str = "price-flash.log";

/// Where prices come from.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedConfig {
    Demo { symbols: Vec<String>, seed: Option<u64> },
    Stdin,
    Rest { url: String, poll_interval: Duration },
}

/// How the board is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    Tui,
    Log,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub highlight: HighlightSettings,
    pub feed: FeedConfig,
    pub render_mode: RenderMode,
    pub refresh_interval: Duration,
    pub stale_after: Duration,
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        // dotenvy loads .env, but doesn't override already-set env vars
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env { lookup };

        let log_level = env.trimmed("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let locale = match env.trimmed("PRICE_LOCALE") {
            Some(tag) => tag.parse::<NumberLocale>().context("PRICE_LOCALE")?,
            None => NumberLocale::default(),
        };

        let defaults = FlashTimings::default();
        let timings = FlashTimings {
            min_interval: env.millis("FLASH_MIN_INTERVAL_MS")?.unwrap_or(defaults.min_interval),
            whole: env.millis("FLASH_WHOLE_MS")?.unwrap_or(defaults.whole),
            suffix: env.millis("FLASH_SUFFIX_MS")?.unwrap_or(defaults.suffix),
        };

        let highlight = HighlightSettings {
            enabled: env.boolean("PRICE_FLASH_ENABLED")?.unwrap_or(true),
            default_precision: env.parsed("PRICE_DEFAULT_PRECISION")?.unwrap_or(2),
            locale,
            timings,
        };

        let feed = match env
            .trimmed("FEED_SOURCE")
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
            .unwrap_or("demo")
        {
            "demo" => FeedConfig::Demo {
                symbols: parse_symbols(
                    &env.trimmed("DEMO_SYMBOLS").unwrap_or_else(|| DEFAULT_DEMO_SYMBOLS.to_string()),
                ),
                seed: env.parsed("DEMO_SEED")?,
            },
            "stdin" => FeedConfig::Stdin,
            "rest" => {
                let url = env
                    .trimmed("FEED_URL")
                    .context("FEED_URL is required when FEED_SOURCE=rest")?;
                let poll_interval = env.millis("FEED_POLL_MS")?.unwrap_or(Duration::from_secs(1));
                if poll_interval.is_zero() {
                    bail!("FEED_POLL_MS must be greater than zero");
                }
                FeedConfig::Rest { url, poll_interval }
            }
            other => bail!("unknown FEED_SOURCE {other:?} (expected demo, stdin or rest)"),
        };

        let render_mode = match env
            .trimmed("RENDER_MODE")
            .map(|s| s.to_ascii_lowercase())
            .as_deref()
            .unwrap_or("tui")
        {
            "tui" => RenderMode::Tui,
            "log" => RenderMode::Log,
            other => bail!("unknown RENDER_MODE {other:?} (expected tui or log)"),
        };

        if render_mode == RenderMode::Tui && feed == FeedConfig::Stdin {
            bail!("FEED_SOURCE=stdin needs RENDER_MODE=log; the terminal UI reads keys from stdin");
        }

        let refresh_interval = env
            .millis("RENDER_REFRESH_MS")?
            .unwrap_or(Duration::from_millis(100));
        if refresh_interval.is_zero() {
            bail!("RENDER_REFRESH_MS must be greater than zero");
        }

        let stale_after = env
            .millis("STALE_AFTER_MS")?
            .unwrap_or(Duration::from_secs(180));

        // the terminal UI owns the screen, so logs always go to a file there
        let log_file = env.trimmed("LOG_FILE").map(PathBuf::from).or_else(|| {
            (render_mode == RenderMode::Tui).then(|| PathBuf::from(DEFAULT_TUI_LOG_FILE))
        });

        Ok(Self {
            log_level,
            log_file,
            highlight,
            feed,
            render_mode,
            refresh_interval,
            stale_after,
            metrics_port: env.parsed("METRICS_PORT")?,
        })
    }
}

fn parse_symbols(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_ascii_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

struct Env<F> {
    lookup: F,
}

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn trimmed(&self, key: &str) -> Option<String> {
        let value = (self.lookup)(key)?;
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn parsed<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.trimmed(key)
            .map(|value| {
                value
                    .parse::<T>()
                    .with_context(|| format!("invalid value for {key}: {value:?}"))
            })
            .transpose()
    }

    fn millis(&self, key: &str) -> anyhow::Result<Option<Duration>> {
        Ok(self.parsed::<u64>(key)?.map(Duration::from_millis))
    }

    fn boolean(&self, key: &str) -> anyhow::Result<Option<bool>> {
        let Some(value) = self.trimmed(key) else {
            return Ok(None);
        };
        match value.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "y" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "n" | "off" => Ok(Some(false)),
            _ => bail!("invalid boolean for {key}: {value:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(move |key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.log_level, "info");
        assert!(config.highlight.enabled);
        assert_eq!(config.highlight.default_precision, 2);
        assert_eq!(config.highlight.locale, NumberLocale::EnUs);
        assert_eq!(config.highlight.timings, FlashTimings::default());
        assert_eq!(config.render_mode, RenderMode::Tui);
        assert_eq!(config.refresh_interval, Duration::from_millis(100));
        assert_eq!(config.stale_after, Duration::from_secs(180));
        assert_eq!(config.log_file, Some(PathBuf::from(DEFAULT_TUI_LOG_FILE)));
        assert_eq!(config.metrics_port, None);
        assert_eq!(
            config.feed,
            FeedConfig::Demo {
                symbols: vec![
                    "BTCUSDT".to_string(),
                    "ETHUSDT".to_string(),
                    "SOLUSDT".to_string(),
                    "DOGEUSDT".to_string(),
                ],
                seed: None,
            }
        );
    }

    #[test]
    fn flag_and_timings_from_env() {
        let config = config(&[
            ("PRICE_FLASH_ENABLED", "off"),
            ("FLASH_MIN_INTERVAL_MS", "250"),
            ("FLASH_WHOLE_MS", "500"),
            ("FLASH_SUFFIX_MS", "2000"),
            ("PRICE_LOCALE", "de-DE"),
            ("PRICE_DEFAULT_PRECISION", "4"),
        ])
        .unwrap();
        assert!(!config.highlight.enabled);
        assert_eq!(config.highlight.timings.min_interval, Duration::from_millis(250));
        assert_eq!(config.highlight.timings.whole, Duration::from_millis(500));
        assert_eq!(config.highlight.timings.suffix, Duration::from_millis(2000));
        assert_eq!(config.highlight.locale, NumberLocale::DeDe);
        assert_eq!(config.highlight.default_precision, 4);
    }

    #[test]
    fn rest_feed_needs_url() {
        assert!(config(&[("FEED_SOURCE", "rest")]).is_err());

        let config = config(&[
            ("FEED_SOURCE", "REST"),
            ("FEED_URL", "http://127.0.0.1:8888/funding/batch?symbols=BTCUSDT"),
            ("FEED_POLL_MS", "2500"),
        ])
        .unwrap();
        assert_eq!(
            config.feed,
            FeedConfig::Rest {
                url: "http://127.0.0.1:8888/funding/batch?symbols=BTCUSDT".to_string(),
                poll_interval: Duration::from_millis(2500),
            }
        );
    }

    #[test]
    fn stdin_feed_requires_log_mode() {
        assert!(config(&[("FEED_SOURCE", "stdin")]).is_err());

        let config = config(&[("FEED_SOURCE", "stdin"), ("RENDER_MODE", "log")]).unwrap();
        assert_eq!(config.feed, FeedConfig::Stdin);
        assert_eq!(config.render_mode, RenderMode::Log);
        assert_eq!(config.log_file, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(config(&[("PRICE_FLASH_ENABLED", "maybe")]).is_err());
        assert!(config(&[("PRICE_LOCALE", "xx-YY")]).is_err());
        assert!(config(&[("FLASH_WHOLE_MS", "-5")]).is_err());
        assert!(config(&[("RENDER_REFRESH_MS", "0")]).is_err());
        assert!(config(&[("FEED_SOURCE", "kafka")]).is_err());
        assert!(config(&[("METRICS_PORT", "70000")]).is_err());
    }

    #[test]
    fn demo_symbols_are_normalised() {
        let config = config(&[("DEMO_SYMBOLS", " btcusdt, ,ethusdt "), ("DEMO_SEED", "7")]).unwrap();
        assert_eq!(
            config.feed,
            FeedConfig::Demo {
                symbols: vec!["BTCUSDT".to_string(), "ETHUSDT".to_string()],
                seed: Some(7),
            }
        );
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let config = config(&[("RUST_LOG", "  "), ("METRICS_PORT", ""), ("LOG_FILE", "/tmp/flash.log")]).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.metrics_port, None);
        assert_eq!(config.log_file, Some(PathBuf::from("/tmp/flash.log")));
    }
}
