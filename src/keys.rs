//! Keyboard and mouse event handlers.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use tui_input::backend::crossterm::EventHandler;

use crate::app::{App, InputMode, View};

/// Rows moved by one page key.
const PAGE_ROWS: usize = 10;

/// Direction of a page key: `Ctrl+d`/`PgDn` is down, `Ctrl+u`/`PgUp` is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Down,
    Up,
}

fn page_key(key: KeyEvent) -> Option<Page> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::PageDown => Some(Page::Down),
        KeyCode::PageUp => Some(Page::Up),
        KeyCode::Char('d') if ctrl => Some(Page::Down),
        KeyCode::Char('u') if ctrl => Some(Page::Up),
        _ => None,
    }
}

/// Keys for the app list, where moving past an edge pulls.
pub fn handle_list_keys(app: &mut App, key: KeyEvent) {
    if let Some(page) = page_key(key) {
        match page {
            Page::Down => app.page_down(PAGE_ROWS),
            Page::Up => app.page_up(PAGE_ROWS),
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),
        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),
        KeyCode::Enter => app.open_detail(),
        KeyCode::Char('r') => app.pull_to_refresh(),
        KeyCode::Char('l') => app.toggle_like(),
        KeyCode::Char('/') => app.start_input_mode(InputMode::Search),
        _ => {}
    }
}

/// Keys while the search box is open.
pub fn handle_input_keys(app: &mut App, key: KeyEvent, event: &Event) {
    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Esc => app.cancel_input_mode(),
        _ => {
            app.input.handle_event(event);
        }
    }
}

/// Keys for a single app's detail page.
pub fn handle_detail_keys(app: &mut App, key: KeyEvent) {
    if let Some(page) = page_key(key) {
        match page {
            Page::Down => app.detail_scroll_down(PAGE_ROWS),
            Page::Up => app.detail_scroll_up(PAGE_ROWS),
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.close_detail(),
        KeyCode::Char('j') | KeyCode::Down => app.detail_scroll_down(1),
        KeyCode::Char('k') | KeyCode::Up => app.detail_scroll_up(1),
        KeyCode::Char('l') => app.toggle_like(),
        _ => {}
    }
}

/// Handle mouse wheel events.
///
/// The wheel moves the selection like `j`/`k`, so it also pulls at the edges.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.show_help || app.is_input_mode() {
        return;
    }
    match (app.view, mouse.kind) {
        (View::List, MouseEventKind::ScrollDown) => app.select_next(),
        (View::List, MouseEventKind::ScrollUp) => app.select_previous(),
        (View::Detail, MouseEventKind::ScrollDown) => app.detail_scroll_down(1),
        (View::Detail, MouseEventKind::ScrollUp) => app.detail_scroll_up(1),
        _ => {}
    }
}

/// Route a key press to the active overlay or view.
///
/// Returns `true` when the key only toggled the help modal.
pub fn dispatch_key_event(app: &mut App, key: KeyEvent, event: &Event) -> bool {
    if app.is_input_mode() {
        handle_input_keys(app, key, event);
        return false;
    }

    match (key.code, app.show_help) {
        (KeyCode::Char('?'), _) => {
            app.toggle_help();
            return true;
        }
        (KeyCode::Esc, true) => {
            app.close_help();
            return true;
        }
        // Any other key dismisses help and still acts
        (_, true) => app.close_help(),
        _ => {}
    }

    match app.view {
        View::List => handle_list_keys(app, key),
        View::Detail => handle_detail_keys(app, key),
    }
    false
}
