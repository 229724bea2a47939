//! Application state management.

mod input;
mod loading;
mod navigation;


use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;
use std::sync::mpsc::Receiver;

use tui_input::Input;

use crate::feed::{AppList, AppRecord, FeedMessage, FeedWorker};
use crate::refresh::{Edge, RefreshConfig, RefreshMachine};
use crate::scroll::Viewport;

pub use loading::FLASH_FRAMES;

/// Current view mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    List,
    Detail,
}

/// Input mode for text entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    /// Editing the search term.
    Search,
}

impl InputMode {
    /// Get the placeholder text for this input mode.
    pub fn placeholder(&self) -> &'static str {
        match self {
            InputMode::Search => "Enter search term...",
        }
    }
}

/// State for detail view.
#[derive(Debug, Clone)]
pub struct DetailState {
    /// The record being displayed.
    pub record: AppRecord,
    /// Vertical scroll offset.
    pub scroll: usize,
    /// Total content height (for scroll calculation).
    pub content_height: usize,
}

/// Result of the last refresh or load-more.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// Whether the action succeeded.
    pub success: bool,
    /// Message for the status bar.
    pub message: String,
}

/// An indicator easing closed after its action completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collapse {
    pub edge: Edge,
    pub frames_left: u8,
}

/// Default number of rows revealed per page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Application state.
pub struct App {
    /// All fetched records.
    pub records: Vec<AppRecord>,
    /// How many records are revealed.
    pub visible_count: usize,
    /// Rows revealed per load-more.
    page_size: usize,
    /// Currently selected record index.
    pub selected: usize,
    /// List scroll and overscroll.
    pub viewport: Viewport,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Feed source label for the title bar.
    pub source_label: String,
    /// Current view mode.
    pub view: View,
    /// Detail view state.
    pub detail_state: Option<DetailState>,
    /// Whether the help modal is shown.
    pub show_help: bool,
    /// Current input mode (if any).
    pub input_mode: Option<InputMode>,
    /// Text input buffer.
    pub input: Input,
    /// Last refresh/load-more result for status display.
    pub last_outcome: Option<FetchOutcome>,
    /// Track ids the user liked.
    pub liked: HashSet<u64>,
    /// Widget configuration.
    pub config: RefreshConfig,
    /// Indicator collapse animation, if running.
    pub collapsing: Option<Collapse>,
    /// Spinner animation frame.
    pub spinner_frame: usize,
    refresh: RefreshMachine,
    worker: FeedWorker,
    feed_rx: Receiver<FeedMessage>,
    /// Frames left in the release flash; set by the refresh feedback hook.
    flash: Rc<Cell<u8>>,
    /// Top row of the scroll container, reported by the renderer.
    container_top: u16,
    /// Records that fit in the list area, reported by the renderer.
    list_capacity: usize,
}

impl App {
    /// Create a new App showing the first page of `list`.
    pub fn new(
        list: AppList,
        worker: FeedWorker,
        feed_rx: Receiver<FeedMessage>,
        config: RefreshConfig,
        page_size: usize,
    ) -> Self {
        let flash = Rc::new(Cell::new(0));
        let top = worker.clone();
        let bottom = worker.clone();
        let hits = Rc::clone(&flash);
        let refresh = RefreshMachine::new(
            config.thresholds,
            move |completion| top.spawn_refresh(completion),
            move |completion| bottom.spawn_load_more(completion),
        )
        .with_feedback(move || hits.set(FLASH_FRAMES));

        let max_pull = config.thresholds.top.max(config.thresholds.bottom) * 1.5;
        let page_size = page_size.max(1);
        let visible_count = page_size.min(list.len());

        Self {
            records: list.results,
            visible_count,
            page_size,
            selected: 0,
            viewport: Viewport::new(max_pull),
            should_quit: false,
            source_label: worker.source().label(),
            view: View::default(),
            detail_state: None,
            show_help: false,
            input_mode: None,
            input: Input::default(),
            last_outcome: None,
            liked: HashSet::new(),
            config,
            collapsing: None,
            spinner_frame: 0,
            refresh,
            worker,
            feed_rx,
            flash,
            container_top: 0,
            list_capacity: 1,
        }
    }

    /// Request application quit.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Toggle help modal visibility.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Close help modal.
    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    /// Current search term.
    pub fn search_term(&self) -> String {
        self.worker.query().term
    }

    /// Whether the release flash is showing.
    pub fn is_flashing(&self) -> bool {
        self.flash.get() > 0
    }

    /// Toggle the like mark on the selected record.
    pub fn toggle_like(&mut self) {
        let Some(id) = self.selected_record().map(|r| r.track_id) else {
            return;
        };
        if !self.liked.remove(&id) {
            self.liked.insert(id);
        }
    }

    pub fn is_liked(&self, record: &AppRecord) -> bool {
        self.liked.contains(&record.track_id)
    }

    /// Record list geometry from the last render.
    pub fn set_list_geometry(&mut self, container_top: u16, capacity: usize) {
        self.container_top = container_top;
        self.list_capacity = capacity.max(1);
        self.viewport.ensure_visible(self.selected, self.list_capacity);
    }

    /// Open detail view for the selected record.
    pub fn open_detail(&mut self) {
        if let Some(record) = self.selected_record().cloned() {
            self.detail_state = Some(DetailState {
                record,
                scroll: 0,
                content_height: 0, // Calculated during render
            });
            self.view = View::Detail;
        }
    }

    /// Close detail view and return to the list.
    pub fn close_detail(&mut self) {
        self.view = View::List;
        self.detail_state = None;
    }

    /// Scroll detail view down.
    pub fn detail_scroll_down(&mut self, amount: usize) {
        if let Some(state) = &mut self.detail_state {
            state.scroll = state.scroll.saturating_add(amount);
        }
    }

    /// Scroll detail view up.
    pub fn detail_scroll_up(&mut self, amount: usize) {
        if let Some(state) = &mut self.detail_state {
            state.scroll = state.scroll.saturating_sub(amount);
        }
    }

    /// Set content height for detail view (called from render).
    pub fn set_detail_content_height(&mut self, height: usize) {
        if let Some(state) = &mut self.detail_state {
            state.content_height = height;
            // Clamp scroll to valid range
            if height > 0 && state.scroll >= height {
                state.scroll = height.saturating_sub(1);
            }
        }
    }
}
