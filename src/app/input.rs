//! Input mode methods for App.

use tui_input::Input;

use super::{App, InputMode};

impl App {
    /// Start input mode for text entry.
    pub fn start_input_mode(&mut self, mode: InputMode) {
        self.input_mode = Some(mode);
        self.input = match mode {
            InputMode::Search => Input::new(self.search_term()),
        };
    }

    /// Cancel input mode without executing.
    pub fn cancel_input_mode(&mut self) {
        self.input_mode = None;
        self.input.reset();
    }

    /// Check if currently in input mode.
    pub fn is_input_mode(&self) -> bool {
        self.input_mode.is_some()
    }

    /// Submit the current input.
    ///
    /// A new search term takes effect through a regular pull-to-refresh.
    pub fn submit_input(&mut self) {
        let Some(mode) = self.input_mode.take() else {
            return;
        };
        let value = self.input.value().trim().to_string();
        self.input.reset();

        match mode {
            InputMode::Search => {
                if value.is_empty() || value == self.search_term() {
                    return;
                }
                self.worker.set_term(&value);
                self.pull_to_refresh();
            }
        }
    }
}
