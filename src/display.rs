//! Display-cycle state machine: static icon while idle, scrolling ticker
//! while announcing.

use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;
use unicode_width::UnicodeWidthStr;

use crate::config::TickerConfig;
use crate::models::HeadlineRecord;

pub const HEADLINE_SEPARATOR: &str = "  ●  ";

/// Pixel width of a single line of text.
pub trait TextMetrics: Send + Sync {
    fn width(&self, text: &str) -> f64;
}

/// Fixed-advance monospaced font; every column is 0.6 em wide.
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMetrics {
    advance: f64,
}

impl MonospaceMetrics {
    pub fn new(font_size: f64) -> Self {
        Self {
            advance: font_size * 0.6,
        }
    }

    pub fn advance(&self) -> f64 {
        self.advance
    }
}

impl TextMetrics for MonospaceMetrics {
    fn width(&self, text: &str) -> f64 {
        UnicodeWidthStr::width(text) as f64 * self.advance
    }
}

pub struct TickerTiming {
    metrics: Box<dyn TextMetrics>,
    pixels_per_second: f64,
    loop_count: u32,
}

impl TickerTiming {
    pub fn new(metrics: Box<dyn TextMetrics>, pixels_per_second: f64, loop_count: u32) -> Self {
        Self {
            metrics,
            pixels_per_second,
            loop_count,
        }
    }

    pub fn from_config(config: &TickerConfig) -> Self {
        Self::new(
            Box::new(MonospaceMetrics::new(config.font_size)),
            config.pixels_per_second,
            config.loop_count,
        )
    }

    /// Titles joined by the separator, with a trailing separator so the
    /// doubled copy reads seamlessly.
    pub fn joined_text(headlines: &[HeadlineRecord]) -> String {
        if headlines.is_empty() {
            return String::new();
        }
        let mut text = headlines
            .iter()
            .map(|h| h.title())
            .collect::<Vec<_>>()
            .join(HEADLINE_SEPARATOR);
        text.push_str(HEADLINE_SEPARATOR);
        text
    }

    pub fn text_width(&self, text: &str) -> f64 {
        self.metrics.width(text)
    }

    /// Time for one full traversal of a single copy of `text`.
    /// Zero when the speed or the measured width is not a usable number.
    pub fn loop_duration(&self, text: &str) -> Duration {
        if !(self.pixels_per_second.is_finite() && self.pixels_per_second > 0.0) {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(self.text_width(text) / self.pixels_per_second)
            .unwrap_or_default()
    }

    pub fn total_duration(&self, text: &str) -> Duration {
        self.loop_duration(text).saturating_mul(self.loop_count)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CycleId(u64);

impl CycleId {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Announcement {
    cycle: CycleId,
    headlines: Vec<HeadlineRecord>,
    text: String,
    text_width: f64,
    started_at: Instant,
    loop_duration: Duration,
    total_duration: Duration,
}

impl Announcement {
    pub fn cycle(&self) -> CycleId {
        self.cycle
    }

    pub fn headlines(&self) -> &[HeadlineRecord] {
        &self.headlines
    }

    /// Single copy of the joined headline text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Two back-to-back copies, for a seamless scroll loop.
    pub fn scroll_text(&self) -> String {
        self.text.repeat(2)
    }

    pub fn text_width(&self) -> f64 {
        self.text_width
    }

    pub fn started_at(&self) -> Instant {
        self.started_at
    }

    pub fn loop_duration(&self) -> Duration {
        self.loop_duration
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    pub fn expires_at(&self) -> Instant {
        self.started_at + self.total_duration
    }

    /// Leftward scroll offset in pixels after `elapsed`, wrapping every loop.
    pub fn scroll_offset(&self, elapsed: Duration) -> f64 {
        if self.loop_duration.is_zero() {
            return 0.0;
        }
        let loops = elapsed.as_secs_f64() / self.loop_duration.as_secs_f64();
        loops.fract() * self.text_width
    }

    /// Visible window of `columns` characters after `elapsed`.
    pub fn frame(&self, elapsed: Duration, columns: usize) -> String {
        let chars = self.text.chars().count();
        if chars == 0 || self.text_width <= 0.0 {
            return String::new();
        }
        let start = (self.scroll_offset(elapsed) / self.text_width * chars as f64) as usize;
        self.scroll_text()
            .chars()
            .skip(start % chars)
            .take(columns.min(chars))
            .collect()
    }
}

#[derive(Debug, Clone)]
pub enum DisplayState {
    Idle,
    Announcing(Announcement),
}

/// Outcome of feeding a refresh result into the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// A new cycle started; any earlier expiry is stale.
    Announce(CycleId),
    /// An announcement is in progress and the result did not interrupt it.
    KeepAnnouncing,
    Idle,
}

pub struct DisplayCycle {
    timing: TickerTiming,
    state: DisplayState,
    next_cycle: u64,
}

impl DisplayCycle {
    pub fn new(timing: TickerTiming) -> Self {
        Self {
            timing,
            state: DisplayState::Idle,
            next_cycle: 1,
        }
    }

    pub fn state(&self) -> &DisplayState {
        &self.state
    }

    pub fn is_announcing(&self) -> bool {
        matches!(self.state, DisplayState::Announcing(_))
    }

    pub fn announcement(&self) -> Option<&Announcement> {
        match &self.state {
            DisplayState::Announcing(announcement) => Some(announcement),
            DisplayState::Idle => None,
        }
    }

    pub fn timing(&self) -> &TickerTiming {
        &self.timing
    }

    pub fn apply(&mut self, headlines: &[HeadlineRecord], is_novel: bool, now: Instant) -> Transition {
        if is_novel && !headlines.is_empty() {
            let cycle = CycleId(self.next_cycle);
            self.next_cycle += 1;

            let text = TickerTiming::joined_text(headlines);
            self.state = DisplayState::Announcing(Announcement {
                cycle,
                headlines: headlines.to_vec(),
                text_width: self.timing.text_width(&text),
                loop_duration: self.timing.loop_duration(&text),
                total_duration: self.timing.total_duration(&text),
                started_at: now,
                text,
            });
            return Transition::Announce(cycle);
        }

        if self.is_announcing() {
            return Transition::KeepAnnouncing;
        }

        self.state = DisplayState::Idle;
        Transition::Idle
    }

    /// Handles an expiry for `cycle`. Returns true if the cycle ended.
    ///
    /// Expiries from superseded cycles, or ones that arrive before the
    /// current cycle has run its full duration, are ignored.
    pub fn timer_elapsed(&mut self, cycle: CycleId, now: Instant) -> bool {
        let Some(current) = self.announcement() else {
            debug!(cycle = cycle.value(), "Expiry while idle, ignoring");
            return false;
        };

        if current.cycle != cycle {
            debug!(
                cycle = cycle.value(),
                current = current.cycle.value(),
                "Stale ticker expiry, ignoring"
            );
            return false;
        }

        if now < current.expires_at() {
            debug!(cycle = cycle.value(), "Premature ticker expiry, ignoring");
            return false;
        }

        self.state = DisplayState::Idle;
        true
    }
}
