//! Pull offset derived from the moving and fixed anchors.

/// The two positions observed to compute the pull offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorKind {
    /// Attached to the scroll container; unaffected by scrolling.
    Fixed,
    /// Attached to the top edge of the scrolled content.
    Moving,
}

/// A single position report from the layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnchorReport {
    pub kind: AnchorKind,
    /// Global vertical position, in points.
    pub y: f64,
}

impl AnchorReport {
    pub fn fixed(y: f64) -> Self {
        Self {
            kind: AnchorKind::Fixed,
            y,
        }
    }

    pub fn moving(y: f64) -> Self {
        Self {
            kind: AnchorKind::Moving,
            y,
        }
    }
}

/// Latest reported position per anchor.
///
/// Reports arriving in one batch overwrite each other per anchor, so a layout
/// pass that reports the same anchor several times keeps only the last value.
/// Until both anchors have reported, the offset is zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OffsetTracker {
    fixed: Option<f64>,
    moving: Option<f64>,
}

impl OffsetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one report.
    pub fn record(&mut self, report: AnchorReport) {
        let slot = match report.kind {
            AnchorKind::Fixed => &mut self.fixed,
            AnchorKind::Moving => &mut self.moving,
        };
        *slot = Some(report.y);
    }

    /// Merge a batch of reports and return the resulting offset.
    pub fn merge<I>(&mut self, reports: I) -> f64
    where
        I: IntoIterator<Item = AnchorReport>,
    {
        for report in reports {
            self.record(report);
        }
        self.offset()
    }

    /// `moving - fixed`, or `0.0` while either anchor is unknown.
    pub fn offset(&self) -> f64 {
        match (self.moving, self.fixed) {
            (Some(moving), Some(fixed)) => moving - fixed,
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_defaults_to_zero() {
        let mut tracker = OffsetTracker::new();
        assert_eq!(tracker.offset(), 0.0);

        // Only one side reported: still the baseline
        tracker.record(AnchorReport::moving(120.0));
        assert_eq!(tracker.offset(), 0.0);

        let mut tracker = OffsetTracker::new();
        tracker.record(AnchorReport::fixed(40.0));
        assert_eq!(tracker.offset(), 0.0);
    }

    #[test]
    fn test_offset_is_moving_minus_fixed() {
        let mut tracker = OffsetTracker::new();
        let offset = tracker.merge([AnchorReport::fixed(100.0), AnchorReport::moving(150.0)]);
        assert_eq!(offset, 50.0);

        let offset = tracker.merge([AnchorReport::moving(60.0)]);
        assert_eq!(offset, -40.0);
    }

    #[test]
    fn test_report_order_does_not_matter() {
        let mut a = OffsetTracker::new();
        let mut b = OffsetTracker::new();
        a.merge([AnchorReport::fixed(10.0), AnchorReport::moving(30.0)]);
        b.merge([AnchorReport::moving(30.0), AnchorReport::fixed(10.0)]);
        assert_eq!(a.offset(), b.offset());
        assert_eq!(a.offset(), 20.0);
    }

    #[test]
    fn test_batch_keeps_latest_per_anchor() {
        let mut tracker = OffsetTracker::new();
        let offset = tracker.merge([
            AnchorReport::moving(10.0),
            AnchorReport::fixed(0.0),
            AnchorReport::moving(25.0),
            AnchorReport::moving(40.0),
        ]);
        // Latest value wins; nothing is summed
        assert_eq!(offset, 40.0);
    }
}
