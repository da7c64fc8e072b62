use std::sync::Arc;

use anyhow::{Context, Result};

use crate::deck::{DeckShuffler, RandomShuffler};
use crate::driver::RenderOptions;
use crate::layout::grid::default_grid_config;
use crate::layout::paragraph::OverflowPolicy;

/// Application configuration loaded from environment variables (and `.env`).
/// Every variable is optional; malformed values fail at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub max_upload_bytes: usize,
    pub overflow: OverflowPolicy,
    /// Fixed shuffle seed for reproducible decks. Random when unset.
    pub shuffle_seed: Option<u64>,
    pub cut_guides: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Config {
            port: parse_or(&lookup, "PORT", 9193).context("PORT must be a valid port number")?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", 2 * 1024 * 1024)
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            overflow: match lookup("CARD_OVERFLOW") {
                Some(v) => v.parse().map_err(anyhow::Error::msg)?,
                None => OverflowPolicy::default(),
            },
            shuffle_seed: lookup("SHUFFLE_SEED")
                .map(|v| v.trim().parse::<u64>())
                .transpose()
                .context("SHUFFLE_SEED must be an unsigned integer")?,
            cut_guides: match lookup("CUT_GUIDES") {
                Some(v) => parse_flag(&v)
                    .with_context(|| format!("CUT_GUIDES must be true or false, got '{v}'"))?,
                None => false,
            },
        })
    }

    pub fn shuffler(&self) -> Arc<dyn DeckShuffler> {
        match self.shuffle_seed {
            Some(seed) => Arc::new(RandomShuffler::seeded(seed)),
            None => Arc::new(RandomShuffler::from_entropy()),
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            grid: default_grid_config(),
            overflow: self.overflow,
            shuffler: self.shuffler(),
            cut_guides: self.cut_guides,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(v) => Ok(v.trim().parse::<T>()?),
        None => Ok(default),
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
