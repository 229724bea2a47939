//! Display-width helpers for list cells and status messages.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Fit `s` into `max_width` terminal columns, ending with `…` when cut.
///
/// Wide characters (CJK, emoji) count as two columns.
pub fn fit_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    // One column goes to the ellipsis
    let budget = max_width - 1;
    let mut used = 0;
    let mut out: String = s
        .chars()
        .take_while(|ch| {
            used += ch.width().unwrap_or(0);
            used <= budget
        })
        .collect();
    out.push(ELLIPSIS);
    out
}

/// Collapse whitespace runs (tabs, newlines, repeated spaces) into single spaces.
pub fn flatten(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
