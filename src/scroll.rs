//! List viewport with rubber-band overscroll.
//!
//! The terminal has no touch gestures, so pulls are synthesized: pressing up
//! at the first row or down at the last row stretches the list past its edge.
//! When input stops, the stretch springs back, which is the release that
//! fires a primed gesture.

use std::time::{Duration, Instant};

use crate::refresh::AnchorReport;

/// Points per terminal row; thresholds are configured in points.
pub const POINTS_PER_ROW: f64 = 17.0;

/// Overscroll added by one key press before resistance.
pub const PULL_STEP: f64 = 3.0 * POINTS_PER_ROW;

/// Time without pulls after which the stretch starts to spring back.
pub const RELEASE_DELAY: Duration = Duration::from_millis(300);

/// Fraction of the stretch kept per spring-back tick.
const SPRING_DECAY: f64 = 0.7;

/// Stretch below which the list snaps back to rest.
const REST_EPSILON: f64 = 0.5;

/// Resistance at zero stretch and at maximum stretch.
const RESISTANCE_START: f64 = 0.55;
const RESISTANCE_END: f64 = 0.10;

/// Vertical scroll state for the list.
#[derive(Debug, Clone)]
pub struct Viewport {
    /// First visible item.
    pub first: usize,
    /// Overscroll in points; positive past the top, negative past the bottom.
    overscroll: f64,
    /// Largest stretch allowed in either direction.
    max_overscroll: f64,
    last_pull: Option<Instant>,
}

impl Viewport {
    /// Create a viewport at rest.
    pub fn new(max_overscroll: f64) -> Self {
        Self {
            first: 0,
            overscroll: 0.0,
            max_overscroll: max_overscroll.max(POINTS_PER_ROW),
            last_pull: None,
        }
    }

    pub fn overscroll(&self) -> f64 {
        self.overscroll
    }

    /// Stretch past an edge. `delta` is positive to pull down past the top.
    ///
    /// Resistance grows with the stretch, from 55% of `delta` at rest to 10%
    /// at the maximum.
    pub fn pull(&mut self, delta: f64, now: Instant) {
        let pushing_further = self.overscroll == 0.0 || self.overscroll.signum() == delta.signum();
        let applied = if pushing_further {
            let stretch_ratio = (self.overscroll.abs() / self.max_overscroll).min(1.0);
            let resistance = RESISTANCE_START - stretch_ratio * (RESISTANCE_START - RESISTANCE_END);
            delta * resistance
        } else {
            delta
        };

        self.overscroll =
            (self.overscroll + applied).clamp(-self.max_overscroll, self.max_overscroll);
        self.last_pull = Some(now);
    }

    /// Stretch to exactly `overscroll`, as if the user had pulled there.
    pub fn stretch_to(&mut self, overscroll: f64, now: Instant) {
        self.overscroll = overscroll.clamp(-self.max_overscroll, self.max_overscroll);
        self.last_pull = Some(now);
    }

    /// Spring back one step if nothing pulled recently.
    ///
    /// Returns true while the list is still moving.
    pub fn release_tick(&mut self, now: Instant) -> bool {
        if self.overscroll == 0.0 {
            return false;
        }
        let held = self
            .last_pull
            .is_some_and(|at| now.saturating_duration_since(at) < RELEASE_DELAY);
        if held {
            return true;
        }

        self.overscroll *= SPRING_DECAY;
        if self.overscroll.abs() < REST_EPSILON {
            self.overscroll = 0.0;
        }
        self.overscroll != 0.0
    }

    /// Anchor positions for the current frame.
    ///
    /// The fixed anchor is the top of the scroll container; the moving anchor
    /// is the top of the content, displaced by the overscroll.
    pub fn anchor_reports(&self, container_top: u16) -> [AnchorReport; 2] {
        let fixed = f64::from(container_top) * POINTS_PER_ROW;
        [
            AnchorReport::fixed(fixed),
            AnchorReport::moving(fixed + self.overscroll),
        ]
    }

    /// Keep `selected` inside a window of `visible` items.
    pub fn ensure_visible(&mut self, selected: usize, visible: usize) {
        let visible = visible.max(1);
        if selected < self.first {
            self.first = selected;
        } else if selected >= self.first + visible {
            self.first = selected + 1 - visible;
        }
    }
}

/// Whole rows covered by `points`, rounded to nearest.
pub fn points_to_rows(points: f64) -> u16 {
    if !points.is_finite() || points <= 0.0 {
        return 0;
    }
    (points / POINTS_PER_ROW).round().min(f64::from(u16::MAX)) as u16
}
