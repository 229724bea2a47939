//! Refresh and load-more handling for App.

use std::time::Instant;

use log::info;

use crate::feed::FeedMessage;
use crate::refresh::{Animation, Edge, RefreshSnapshot, RefreshState};
use crate::scroll::{POINTS_PER_ROW, points_to_rows};

use super::{App, Collapse, FetchOutcome};

/// Frames the release flash stays visible.
pub const FLASH_FRAMES: u8 = 4;

/// Frames an indicator takes to collapse after completing.
pub const COLLAPSE_FRAMES: u8 = 6;

impl App {
    /// Advance one frame: apply completions and fetched data, spring the list
    /// back, and feed the new anchor positions to the refresh machine.
    pub fn tick(&mut self, now: Instant) {
        // Completions first: their data was queued before they were sent
        for change in self.refresh.pump() {
            if change.animation == Animation::Smooth
                && let Some(edge) = change.from.edge()
            {
                self.collapsing = Some(Collapse {
                    edge,
                    frames_left: COLLAPSE_FRAMES,
                });
            }
        }
        while let Ok(message) = self.feed_rx.try_recv() {
            self.apply_feed_message(message);
        }

        self.viewport.release_tick(now);
        let reports = self.viewport.anchor_reports(self.container_top);
        self.refresh.observe(reports);

        self.spinner_frame = self.spinner_frame.wrapping_add(1);
        self.flash.set(self.flash.get().saturating_sub(1));
        self.collapsing = self.collapsing.and_then(|c| {
            (c.frames_left > 1).then(|| Collapse {
                frames_left: c.frames_left - 1,
                ..c
            })
        });
    }

    /// Apply a result delivered by the feed worker.
    pub fn apply_feed_message(&mut self, message: FeedMessage) {
        match message {
            FeedMessage::Refreshed(Ok(list)) => {
                info!("refresh loaded {} app(s)", list.len());
                let message = if list.is_empty() {
                    "No apps match this search".to_string()
                } else {
                    format!("Loaded {} apps", list.len())
                };
                self.records = list.results;
                self.visible_count = self.page_size.min(self.records.len());
                self.selected = 0;
                self.viewport.first = 0;
                self.last_outcome = Some(FetchOutcome {
                    success: true,
                    message,
                });
            }
            FeedMessage::Refreshed(Err(message)) => {
                self.last_outcome = Some(FetchOutcome {
                    success: false,
                    message,
                });
            }
            FeedMessage::PageRevealed => {
                let message = if self.has_more() {
                    self.visible_count = (self.visible_count + self.page_size).min(self.records.len());
                    format!("Showing {} of {} apps", self.visible_count, self.records.len())
                } else {
                    "No more apps".to_string()
                };
                self.last_outcome = Some(FetchOutcome {
                    success: true,
                    message,
                });
            }
        }
    }

    /// Whether fetched records remain hidden.
    pub fn has_more(&self) -> bool {
        self.visible_count < self.records.len()
    }

    /// Stretch the list just past the refresh threshold, as a pull would.
    ///
    /// The refresh fires once the stretch springs back.
    pub fn pull_to_refresh(&mut self) {
        if self.refresh.state() != RefreshState::Idle {
            return;
        }
        let target = self.refresh.thresholds().top.max(0.0) + POINTS_PER_ROW;
        self.viewport.stretch_to(target, Instant::now());
    }

    /// Read-only view of the refresh machine.
    pub fn refresh_snapshot(&self) -> RefreshSnapshot {
        self.refresh.snapshot()
    }

    pub fn refresh_state(&self) -> RefreshState {
        self.refresh.state()
    }

    /// Rows for the top and bottom indicator regions.
    ///
    /// Regions follow the stretch, stay open at threshold height while
    /// loading, and shrink over a few frames after completing.
    pub fn indicator_rows(&self) -> (u16, u16) {
        let snapshot = self.refresh.snapshot();
        let overscroll = self.viewport.overscroll();
        let open_top = points_to_rows(snapshot.thresholds.top).max(1);
        let open_bottom = points_to_rows(snapshot.thresholds.bottom).max(1);

        let mut top = points_to_rows(overscroll);
        let mut bottom = points_to_rows(-overscroll);
        match snapshot.state {
            RefreshState::TopLoading => top = top.max(open_top),
            RefreshState::BottomLoading => bottom = bottom.max(open_bottom),
            _ => {}
        }

        if let Some(collapse) = self.collapsing {
            let scale = |open: u16| {
                (u32::from(open) * u32::from(collapse.frames_left) / u32::from(COLLAPSE_FRAMES))
                    as u16
            };
            match collapse.edge {
                Edge::Top => top = top.max(scale(open_top)),
                Edge::Bottom => bottom = bottom.max(scale(open_bottom)),
            }
        }
        (top, bottom)
    }
}
