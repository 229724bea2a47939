//! Refresh widget configuration.

use ratatui::style::Color;

use super::Thresholds;

/// Default pull distance (points) that primes a refresh.
pub const DEFAULT_TOP_THRESHOLD: f64 = 68.0;

/// Default pull distance (points) that primes a load-more.
pub const DEFAULT_BOTTOM_THRESHOLD: f64 = 100.0;

/// Single threshold shared by both edges in the earlier widget revision.
pub const LEGACY_THRESHOLD: f64 = 68.0;

/// Configuration for the refreshable list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshConfig {
    pub thresholds: Thresholds,
    /// Whether the list draws a scrollbar.
    pub shows_scroll_indicators: bool,
    /// Background behind the indicator regions.
    pub background: Color,
}

impl RefreshConfig {
    /// Earlier revision: one threshold for both edges.
    pub fn legacy() -> Self {
        Self {
            thresholds: Thresholds::uniform(LEGACY_THRESHOLD),
            ..Self::default()
        }
    }

    pub fn with_thresholds(mut self, top: f64, bottom: f64) -> Self {
        self.thresholds = Thresholds { top, bottom };
        self
    }

    pub fn with_scroll_indicators(mut self, shows: bool) -> Self {
        self.shows_scroll_indicators = shows;
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds {
                top: DEFAULT_TOP_THRESHOLD,
                bottom: DEFAULT_BOTTOM_THRESHOLD,
            },
            shows_scroll_indicators: true,
            background: Color::Reset,
        }
    }
}
