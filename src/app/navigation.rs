//! Navigation methods for App.

use std::time::Instant;

use crate::feed::AppRecord;
use crate::scroll::PULL_STEP;

use super::App;

impl App {
    /// Get the number of revealed records.
    pub fn record_count(&self) -> usize {
        self.visible_count
    }

    /// Get the currently selected record.
    pub fn selected_record(&self) -> Option<&AppRecord> {
        self.records[..self.visible_count].get(self.selected)
    }

    /// Move selection down, or pull up past the bottom at the last record.
    pub fn select_next(&mut self) {
        let count = self.record_count();
        if count > 0 && self.selected < count - 1 {
            self.selected += 1;
        } else {
            self.viewport.pull(-PULL_STEP, Instant::now());
        }
    }

    /// Move selection up, or pull down past the top at the first record.
    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.viewport.pull(PULL_STEP, Instant::now());
        }
    }

    /// Jump to the first record.
    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    /// Jump to the last revealed record.
    pub fn select_last(&mut self) {
        let count = self.record_count();
        if count > 0 {
            self.selected = count - 1;
        }
    }

    /// Page down (move by visible height).
    pub fn page_down(&mut self, page_size: usize) {
        let count = self.record_count();
        if count == 0 {
            return;
        }
        let new_selected = self.selected.saturating_add(page_size);
        self.selected = new_selected.min(count - 1);
    }

    /// Page up (move by visible height).
    pub fn page_up(&mut self, page_size: usize) {
        self.selected = self.selected.saturating_sub(page_size);
    }
}
