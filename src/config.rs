use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Refresh interval in minutes
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: u64,
    #[serde(default = "default_headlines_per_source")]
    pub headlines_per_source: usize,
    #[serde(default)]
    pub ticker: TickerConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
}

fn default_refresh_interval() -> u64 {
    15
}

fn default_headlines_per_source() -> usize {
    5
}

#[derive(Debug, Deserialize, Clone)]
pub struct TickerConfig {
    /// How many full traversals one announcement lasts
    #[serde(default = "default_loop_count")]
    pub loop_count: u32,
    #[serde(default = "default_pixels_per_second")]
    pub pixels_per_second: f64,
    #[serde(default = "default_font_size")]
    pub font_size: f64,
}

fn default_loop_count() -> u32 {
    2
}

fn default_pixels_per_second() -> f64 {
    60.0
}

fn default_font_size() -> f64 {
    12.0
}

impl Default for TickerConfig {
    fn default() -> Self {
        Self {
            loop_count: default_loop_count(),
            pixels_per_second: default_pixels_per_second(),
            font_size: default_font_size(),
        }
    }
}

impl TickerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.pixels_per_second.is_finite() && self.pixels_per_second > 0.0,
            "ticker.pixels_per_second must be a positive number, got {}",
            self.pixels_per_second
        );
        anyhow::ensure!(
            self.font_size.is_finite() && self.font_size > 0.0,
            "ticker.font_size must be a positive number, got {}",
            self.font_size
        );
        Ok(())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourcesConfig {
    #[serde(default = "default_bbc_feed_url")]
    pub bbc_feed_url: String,
    #[serde(default = "default_hn_top_stories_url")]
    pub hn_top_stories_url: String,
    #[serde(default = "default_hn_item_base_url")]
    pub hn_item_base_url: String,
}

fn default_bbc_feed_url() -> String {
    "https://feeds.bbci.co.uk/news/rss.xml".to_string()
}

fn default_hn_top_stories_url() -> String {
    "https://hacker-news.firebaseio.com/v0/topstories.json".to_string()
}

fn default_hn_item_base_url() -> String {
    "https://hacker-news.firebaseio.com/v0/item".to_string()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            bbc_feed_url: default_bbc_feed_url(),
            hn_top_stories_url: default_hn_top_stories_url(),
            hn_item_base_url: default_hn_item_base_url(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval: default_refresh_interval(),
            headlines_per_source: default_headlines_per_source(),
            ticker: TickerConfig::default(),
            sources: SourcesConfig::default(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse config from a TOML string (useful for testing)
    pub fn from_str(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the scheduler and the ticker timing cannot work with.
    pub fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.refresh_interval > 0,
            "refresh_interval must be at least 1 minute"
        );
        anyhow::ensure!(
            self.refresh_interval.checked_mul(60).is_some(),
            "refresh_interval of {} minutes is too large",
            self.refresh_interval
        );
        self.ticker.validate()
    }

    pub fn refresh_period(&self) -> Duration {
        Duration::from_secs(self.refresh_interval.saturating_mul(60))
    }
}
