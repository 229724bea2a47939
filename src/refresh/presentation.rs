//! Indicator attributes derived from the refresh state.

use super::{RefreshState, Thresholds};

/// Display attributes for one indicator region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegionPresentation {
    /// In `[0, 1]`.
    pub opacity: f64,
    /// Whether the spinner animates.
    pub spinning: bool,
}

/// Display attributes for both indicator regions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub top: RegionPresentation,
    pub bottom: RegionPresentation,
}

/// Map the current state and offset to indicator attributes.
///
/// Opacity follows the pull distance relative to the threshold and is pinned
/// to 1 while that region is loading.
pub fn present(state: RefreshState, offset: f64, thresholds: Thresholds) -> Presentation {
    let top_loading = state == RefreshState::TopLoading;
    let bottom_loading = state == RefreshState::BottomLoading;

    Presentation {
        top: RegionPresentation {
            opacity: if top_loading {
                1.0
            } else {
                pull_ratio(offset, thresholds.top)
            },
            spinning: top_loading,
        },
        bottom: RegionPresentation {
            opacity: if bottom_loading {
                1.0
            } else {
                pull_ratio(-offset, thresholds.bottom)
            },
            spinning: bottom_loading,
        },
    }
}

fn pull_ratio(pull: f64, threshold: f64) -> f64 {
    if pull.is_nan() {
        return 0.0;
    }
    if threshold <= 0.0 || threshold.is_nan() {
        return if pull > 0.0 { 1.0 } else { 0.0 };
    }
    (pull / threshold).clamp(0.0, 1.0)
}
