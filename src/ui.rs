//! UI rendering functions

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use pacpick::render::{visible_rows, wrap_words};
use pacpick::select::SelectionState;

/// Full-frame layout: candidate names on the left half, the cursor item's
/// description word-wrapped on the right half.
pub fn ui(frame: &mut Frame, state: &SelectionState) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(frame.area());

    render_candidates(frame, state, panes[0]);
    render_description(frame, state, panes[1]);
}

fn render_candidates(frame: &mut Frame, state: &SelectionState, area: Rect) {
    let lines: Vec<Line> = visible_rows(state, area.width as usize)
        .into_iter()
        .map(|row| {
            // Bold only the foreground; a bold background makes some
            // terminals blink.
            let mut style = Style::default();
            if row.attrs.selected {
                style = style.fg(Color::Yellow).bold();
            }
            if row.attrs.cursor {
                style = style.reversed();
            }
            Line::from(Span::styled(row.text, style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_description(frame: &mut Frame, state: &SelectionState, area: Rect) {
    let Some(item) = state.cursor_item() else {
        return;
    };
    let lines: Vec<Line> = wrap_words(&item.record.description, area.width as usize)
        .into_iter()
        .map(Line::from)
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}
