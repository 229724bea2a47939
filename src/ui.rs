//! UI rendering with ratatui.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Flex, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Clear, List, ListItem, ListState, Paragraph, Scrollbar,
        ScrollbarOrientation, ScrollbarState,
    },
};

use crate::app::{App, InputMode, View};
use crate::feed::AppRecord;
use crate::refresh::{Edge, RefreshState, RegionPresentation};
use crate::text::{fit_width, flatten};

/// Terminal rows per list cell: name line and summary line.
pub const CELL_HEIGHT: u16 = 2;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the entire UI based on current view.
pub fn render(frame: &mut Frame, app: &mut App) {
    match app.view {
        View::List => render_list_view(frame, app),
        View::Detail => render_detail_view(frame, app),
    }

    // Render input overlay if in input mode
    if app.is_input_mode() {
        render_input_overlay(frame, app);
    }

    // Render help modal on top if visible
    if app.show_help {
        render_help(frame);
    }
}

/// Render the list view.
fn render_list_view(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Min(3),    // Indicators and list
        Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

    render_title_bar(frame, chunks[0], app);
    render_scroll_container(frame, chunks[1], app);
    render_list_status_bar(frame, chunks[2], app);
}

/// Render the title bar.
fn render_title_bar(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" pullist - {} \"{}\" ", app.source_label, app.search_term());
    let title_bar = Paragraph::new(title).style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_widget(title_bar, area);
}

/// Render the indicator regions around the list.
fn render_scroll_container(frame: &mut Frame, area: Rect, app: &mut App) {
    let (top_rows, bottom_rows) = app.indicator_rows();
    // Leave at least one row for the list
    let room = area.height.saturating_sub(1);
    let top_rows = top_rows.min(room);
    let bottom_rows = bottom_rows.min(room - top_rows);

    let [top_area, list_area, bottom_area] = Layout::vertical([
        Constraint::Length(top_rows),
        Constraint::Min(1),
        Constraint::Length(bottom_rows),
    ])
    .areas(area);

    let capacity = (list_area.height / CELL_HEIGHT).max(1) as usize;
    app.set_list_geometry(area.y, capacity);

    let snapshot = app.refresh_snapshot();
    let presentation = snapshot.presentation();
    let state = snapshot.state;
    if top_rows > 0 {
        let label = indicator_label(Edge::Top, state, app.has_more());
        render_indicator(frame, top_area, app, presentation.top, label);
    }
    if bottom_rows > 0 {
        let label = indicator_label(Edge::Bottom, state, app.has_more());
        render_indicator(frame, bottom_area, app, presentation.bottom, label);
    }

    render_record_list(frame, list_area, app, capacity);
}

/// Text for an indicator region in the given state.
fn indicator_label(edge: Edge, state: RefreshState, has_more: bool) -> &'static str {
    match (edge, state) {
        (Edge::Top, RefreshState::TopPrimed) => "Release to refresh",
        (Edge::Top, RefreshState::TopLoading) => "Refreshing...",
        (Edge::Top, _) => "Pull to refresh",
        (Edge::Bottom, RefreshState::BottomPrimed) => "Release to load more",
        (Edge::Bottom, RefreshState::BottomLoading) => "Loading more...",
        (Edge::Bottom, _) if !has_more => "No more apps",
        (Edge::Bottom, _) => "Pull to load more",
    }
}

/// Map an opacity to a grayscale foreground.
fn fade(opacity: f64) -> Color {
    let step = (opacity.clamp(0.0, 1.0) * 23.0).round() as u8;
    Color::Indexed(232 + step)
}

/// Render one indicator region.
fn render_indicator(
    frame: &mut Frame,
    area: Rect,
    app: &App,
    region: RegionPresentation,
    label: &str,
) {
    let glyph = if region.spinning {
        SPINNER[app.spinner_frame % SPINNER.len()]
    } else {
        "·"
    };
    let style = Style::default()
        .fg(fade(region.opacity))
        .bg(app.config.background);

    // Center the label vertically within the region
    let [row] = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .areas(area);

    frame.render_widget(Block::default().style(style), area);
    let text = Paragraph::new(format!("{glyph} {label}"))
        .alignment(Alignment::Center)
        .style(style);
    frame.render_widget(text, row);
}

/// Render the record list.
fn render_record_list(frame: &mut Frame, area: Rect, app: &App, capacity: usize) {
    if app.record_count() == 0 {
        let empty = Paragraph::new(Line::styled(
            "No apps. Pull down or press r to refresh.",
            Style::default().fg(Color::DarkGray).italic(),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let text_width = area.width.saturating_sub(3) as usize;
    let items: Vec<ListItem> = app.records[..app.record_count()]
        .iter()
        .enumerate()
        .map(|(i, record)| {
            create_list_item(record, app.is_liked(record), i == app.selected, text_width)
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::NONE))
        .highlight_style(
            Style::default()
                .bg(Color::Indexed(236)) // Dark blue-gray, distinct from DarkGray text
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default()
        .with_offset(app.viewport.first)
        .with_selected(Some(app.selected));

    frame.render_stateful_widget(list, area, &mut state);

    // Scrollbar
    let count = app.record_count();
    if app.config.shows_scroll_indicators && count > capacity {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));
        let mut scrollbar_state =
            ScrollbarState::new(count.saturating_sub(capacity)).position(app.viewport.first);
        frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

/// Create a two-line list item for one record.
///
/// When `is_selected` is true, dim colors are brightened for visibility
/// against the highlight background.
fn create_list_item(
    record: &AppRecord,
    liked: bool,
    is_selected: bool,
    max_width: usize,
) -> ListItem<'static> {
    let dim_color = if is_selected {
        Color::Indexed(245)
    } else {
        Color::DarkGray
    };

    let heart = if liked {
        Span::styled("♥ ", Style::default().fg(Color::Red))
    } else {
        Span::styled("♡ ", Style::default().fg(dim_color))
    };

    let mut spans = vec![
        heart,
        Span::styled(
            fit_width(&record.track_name, max_width.saturating_sub(2)),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if !record.primary_genre_name.is_empty() {
        spans.push(Span::styled(
            format!("  {}", record.primary_genre_name),
            Style::default().fg(Color::Cyan),
        ));
    }
    if !record.formatted_price.is_empty() {
        spans.push(Span::styled(
            format!("  {}", record.formatted_price),
            Style::default().fg(Color::Green),
        ));
    }
    if let Some(rating) = record.rating_label() {
        spans.push(Span::styled(
            format!("  {rating}"),
            Style::default().fg(Color::Yellow),
        ));
    }

    let summary = Line::styled(
        format!("  {}", fit_width(&flatten(record.summary()), max_width.saturating_sub(2))),
        Style::default().fg(dim_color),
    );

    ListItem::new(vec![Line::from(spans), summary])
}

/// Render the status bar for list view.
fn render_list_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let base = if app.is_flashing() {
        Style::default().bg(Color::Indexed(240))
    } else {
        Style::default().bg(Color::DarkGray)
    };

    let (text, style) = match app.refresh_state() {
        RefreshState::TopLoading => (" Refreshing... ".to_string(), base.fg(Color::Yellow)),
        RefreshState::BottomLoading => (" Loading more... ".to_string(), base.fg(Color::Yellow)),
        _ => {
            if let Some(outcome) = &app.last_outcome {
                let color = if outcome.success {
                    Color::Green
                } else {
                    Color::Red
                };
                let prefix = if outcome.success { "✓" } else { "✗" };
                let msg = format!(
                    " {prefix} {} ",
                    truncate_message(&outcome.message, (area.width as usize).saturating_sub(4))
                );
                (msg, base.fg(color))
            } else {
                let count_info = format!("[{}/{} apps] ", app.record_count(), app.records.len());
                let help = format!(
                    " {count_info}k at top: refresh  j at bottom: more  /: search  Enter: show  q: quit  ?: help "
                );
                (help, base.fg(Color::White))
            }
        }
    };

    let status_bar = Paragraph::new(text).style(style);
    frame.render_widget(status_bar, area);
}

/// Truncate a message (first line only) to fit within the given display width.
fn truncate_message(msg: &str, max_width: usize) -> String {
    let first_line = msg.lines().next().unwrap_or(msg);
    fit_width(first_line, max_width)
}

/// Render the detail view.
fn render_detail_view(frame: &mut Frame, app: &mut App) {
    let Some(state) = &app.detail_state else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Min(3),    // Content
        Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

    // Title bar
    let title = format!(" App: {} ", fit_width(&state.record.track_name, 60));
    let title_bar =
        Paragraph::new(title).style(Style::default().bg(Color::Magenta).fg(Color::White));
    frame.render_widget(title_bar, chunks[0]);

    // Content area
    render_detail_content(frame, chunks[1], app);

    // Status bar
    render_detail_status_bar(frame, chunks[2]);
}

/// Render the detail content with scrolling.
fn render_detail_content(frame: &mut Frame, area: Rect, app: &mut App) {
    let Some(state) = &app.detail_state else {
        return;
    };

    // Build content lines
    let lines = build_detail_lines(&state.record, app.is_liked(&state.record));
    let content_height = lines.len();

    // Update content height in app state
    app.set_detail_content_height(content_height);

    // Get current scroll position (re-borrow after mutation)
    let scroll = app.detail_state.as_ref().map(|s| s.scroll).unwrap_or(0);

    let visible_height = area.height as usize;
    let max_scroll = content_height.saturating_sub(visible_height);
    let clamped_scroll = scroll.min(max_scroll);

    let paragraph = Paragraph::new(lines)
        .scroll((clamped_scroll as u16, 0))
        .block(Block::default().borders(Borders::LEFT | Borders::RIGHT));
    frame.render_widget(paragraph, area);

    // Scrollbar
    if app.config.shows_scroll_indicators && content_height > visible_height {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("▲"))
            .end_symbol(Some("▼"));
        let mut scrollbar_state =
            ScrollbarState::new(content_height.saturating_sub(visible_height))
                .position(clamped_scroll);
        frame.render_stateful_widget(scrollbar, area, &mut scrollbar_state);
    }
}

fn field_line(label: &'static str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(label, Style::default().bold()),
        Span::styled(value, Style::default().fg(color)),
    ])
}

/// Build lines for detail view content.
fn build_detail_lines(record: &AppRecord, liked: bool) -> Vec<Line<'static>> {
    let mut lines = vec![
        field_line("Name:     ", record.track_name.clone(), Color::White),
        field_line("Seller:   ", record.seller_name.clone(), Color::Cyan),
        field_line("Genre:    ", record.primary_genre_name.clone(), Color::Cyan),
        field_line("Price:    ", record.formatted_price.clone(), Color::Green),
    ];

    if let Some(rating) = record.rating_label() {
        lines.push(field_line("Rating:   ", rating, Color::Yellow));
    }
    if !record.artwork_url_60.is_empty() {
        lines.push(field_line(
            "Artwork:  ",
            record.artwork_url_60.clone(),
            Color::DarkGray,
        ));
    }
    lines.push(field_line(
        "Liked:    ",
        if liked { "♥ yes" } else { "no" }.to_string(),
        if liked { Color::Red } else { Color::DarkGray },
    ));

    lines.push(Line::raw(""));
    lines.push(Line::styled(
        "─── Description ───",
        Style::default().fg(Color::DarkGray),
    ));
    for desc_line in record.description.lines() {
        lines.push(Line::raw(desc_line.to_string()));
    }
    if record.description.is_empty() {
        lines.push(Line::styled(
            "(no description)",
            Style::default().fg(Color::DarkGray).italic(),
        ));
    }

    lines
}

/// Render the status bar for detail view.
fn render_detail_status_bar(frame: &mut Frame, area: Rect) {
    let help_text = " j/k: scroll  Ctrl+d/u: page  l: like  q/Esc: back  ?: help ";
    let status_bar =
        Paragraph::new(help_text).style(Style::default().bg(Color::DarkGray).fg(Color::White));
    frame.render_widget(status_bar, area);
}

fn key_line(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(key, Style::default().fg(Color::Yellow)),
        Span::raw(action),
    ])
}

/// Render the help modal.
fn render_help(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 50, 80);

    // Clear the area first to avoid background bleed-through
    frame.render_widget(Clear, area);

    let help_lines = vec![
        Line::styled(
            "─── Keyboard Shortcuts ───",
            Style::default().fg(Color::Cyan).bold(),
        ),
        Line::raw(""),
        Line::styled("  Navigation", Style::default().bold()),
        key_line("  j / ↓      ", "Move down (pull up at the bottom)"),
        key_line("  k / ↑      ", "Move up (pull down at the top)"),
        key_line("  g / Home   ", "Go to top"),
        key_line("  G / End    ", "Go to bottom"),
        key_line("  Ctrl+d     ", "Page down"),
        key_line("  Ctrl+u     ", "Page up"),
        key_line("  Wheel      ", "Move / pull"),
        Line::raw(""),
        Line::styled("  Feed", Style::default().bold()),
        key_line("  r          ", "Refresh"),
        key_line("  /          ", "Search term"),
        key_line("  l          ", "Like / unlike"),
        Line::raw(""),
        Line::styled("  General", Style::default().bold()),
        key_line("  Enter      ", "Open detail view"),
        key_line("  q          ", "Quit / Close view"),
        key_line("  Esc        ", "Close detail / help"),
        key_line("  ?          ", "Toggle this help"),
    ];

    let help_widget = Paragraph::new(help_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Help "),
    );

    frame.render_widget(help_widget, area);
}

/// Calculate a centered rectangle with given percentage of width and height.
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Render the input overlay for text entry.
fn render_input_overlay(frame: &mut Frame, app: &App) {
    let Some(mode) = &app.input_mode else {
        return;
    };

    // Calculate centered area for input box
    let area = frame.area();
    let width = (area.width * 60 / 100)
        .max(40)
        .min(area.width.saturating_sub(4));
    let height = 3;
    let x = (area.width.saturating_sub(width)) / 2;
    let y = (area.height.saturating_sub(height)) / 2;
    let input_area = Rect::new(x, y, width, height);

    // Clear the area behind the input box
    frame.render_widget(Clear, input_area);

    let title = match mode {
        InputMode::Search => " Search ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title)
        .title_style(Style::default().fg(Color::Cyan).bold());

    let inner_area = block.inner(input_area);
    frame.render_widget(block, input_area);

    // Render the input text
    let input_value = app.input.value();
    let display_text = if input_value.is_empty() {
        Span::styled(mode.placeholder(), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(input_value)
    };

    // Calculate scroll for long input
    let scroll = app.input.visual_scroll(inner_area.width as usize);
    let input_paragraph = Paragraph::new(Line::from(display_text)).scroll((0, scroll as u16));
    frame.render_widget(input_paragraph, inner_area);

    // Set cursor position
    let cursor_x = app.input.visual_cursor().saturating_sub(scroll);
    frame.set_cursor_position(Position::new(inner_area.x + cursor_x as u16, inner_area.y));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_message_ascii() {
        assert_eq!(truncate_message("hello world", 8), "hello w…");
        assert_eq!(truncate_message("short", 10), "short");
    }

    #[test]
    fn test_truncate_message_multiline() {
        // Should only use the first line
        assert_eq!(truncate_message("first\nsecond", 20), "first");
        assert_eq!(truncate_message("日本語\n英語", 20), "日本語");
    }

    #[test]
    fn test_indicator_labels() {
        assert_eq!(
            indicator_label(Edge::Top, RefreshState::Idle, true),
            "Pull to refresh"
        );
        assert_eq!(
            indicator_label(Edge::Top, RefreshState::TopPrimed, true),
            "Release to refresh"
        );
        assert_eq!(
            indicator_label(Edge::Top, RefreshState::TopLoading, true),
            "Refreshing..."
        );
        assert_eq!(
            indicator_label(Edge::Bottom, RefreshState::BottomPrimed, true),
            "Release to load more"
        );
        assert_eq!(
            indicator_label(Edge::Bottom, RefreshState::BottomLoading, false),
            "Loading more..."
        );
        assert_eq!(
            indicator_label(Edge::Bottom, RefreshState::Idle, false),
            "No more apps"
        );
        // Bottom region ignores top states
        assert_eq!(
            indicator_label(Edge::Bottom, RefreshState::TopLoading, true),
            "Pull to load more"
        );
    }

    #[test]
    fn test_fade_ramp() {
        assert_eq!(fade(0.0), Color::Indexed(232));
        assert_eq!(fade(1.0), Color::Indexed(255));
        assert_eq!(fade(7.0), Color::Indexed(255));
        assert_eq!(fade(-1.0), Color::Indexed(232));
    }

    #[test]
    fn test_detail_lines() {
        let record = AppRecord {
            track_name: "Chatter".to_string(),
            average_user_rating: Some(4.0),
            artwork_url_60: "https://example.com/a.png".to_string(),
            ..Default::default()
        };
        let lines = build_detail_lines(&record, true);
        // 4 fields + rating + artwork + liked + blank + header + placeholder
        assert_eq!(lines.len(), 10);

        let record = AppRecord {
            description: "one\ntwo".to_string(),
            ..Default::default()
        };
        let lines = build_detail_lines(&record, false);
        // 4 fields + liked + blank + header + 2 description lines
        assert_eq!(lines.len(), 9);
    }
}
