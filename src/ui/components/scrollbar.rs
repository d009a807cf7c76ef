//! Vertical scrollbar for scrollable panes

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget},
};

use super::palette::{TEXT_FAINT, TEXT_MUTED};

/// Render a scrollbar on the right edge of `area`, only when the content
/// overflows.
pub fn render_vertical_scrollbar(
    area: Rect,
    buf: &mut Buffer,
    total: usize,
    visible: usize,
    offset: usize,
) {
    if total <= visible || area.height == 0 {
        return;
    }

    let max_scroll = total.saturating_sub(visible);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .begin_symbol(None)
        .end_symbol(None)
        .track_symbol(Some("│"))
        .thumb_symbol("█")
        .track_style(Style::default().fg(TEXT_FAINT))
        .thumb_style(Style::default().fg(TEXT_MUTED));

    let mut state = ScrollbarState::new(max_scroll).position(offset.min(max_scroll));
    scrollbar.render(area, buf, &mut state);
}
