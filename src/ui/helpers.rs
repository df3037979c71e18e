use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::models::PairMatch;

/// Text shown in the results pane when a search finds nothing.
pub(crate) const NO_RESULTS: &str = "No results found";

/// Render search hits as two-line blocks separated by a blank line.
pub(crate) fn format_results(results: &[PairMatch]) -> String {
    if results.is_empty() {
        return NO_RESULTS.to_string();
    }
    results
        .iter()
        .map(PairMatch::to_string)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Produce a rectangle of a fixed size centered within `area`, shrunk to fit
/// when the terminal is smaller. Used for notifications.
pub(crate) fn centered_box(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(width.min(area.width)),
            Constraint::Fill(1),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height.min(area.height)),
            Constraint::Fill(1),
        ])
        .split(horizontal[1]);

    vertical[1]
}
