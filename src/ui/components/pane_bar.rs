//! Session header: back hint, session name and the pane view buttons

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};
use unicode_width::UnicodeWidthStr;

use super::palette::{ACCENT_PRIMARY, BG_ELEVATED, TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY};
use crate::ui::layout::PaneView;
use crate::util::truncate_to_width;

const BUTTONS: [(PaneView, &str); 4] = [
    (PaneView::All, "All"),
    (PaneView::Docs, "Docs"),
    (PaneView::Chat, "Chat"),
    (PaneView::Summary, "Summary"),
];

fn button_label(view: PaneView) -> String {
    let name = BUTTONS
        .iter()
        .find(|(v, _)| *v == view)
        .map(|(_, name)| *name)
        .unwrap_or_default();
    format!(" {name} ")
}

/// Screen areas of the pane buttons, right-aligned in `area`
pub fn button_areas(area: Rect) -> Vec<(PaneView, Rect)> {
    let widths: Vec<u16> = BUTTONS
        .iter()
        .map(|(view, _)| u16::try_from(button_label(*view).width()).unwrap_or(0))
        .collect();
    let total: u16 = widths.iter().sum::<u16>() + widths.len() as u16;
    if total >= area.width {
        return Vec::new();
    }

    let mut x = area.x + area.width - total;
    BUTTONS
        .iter()
        .zip(widths)
        .map(|((view, _), width)| {
            let rect = Rect::new(x, area.y, width, 1);
            x += width + 1;
            (*view, rect)
        })
        .collect()
}

pub struct PaneBar<'a> {
    title: &'a str,
    active: PaneView,
}

impl<'a> PaneBar<'a> {
    pub fn new(title: &'a str, active: PaneView) -> Self {
        Self { title, active }
    }
}

impl Widget for PaneBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }

        let bg = Style::default().bg(BG_ELEVATED);
        buf.set_style(area, bg);

        let buttons = button_areas(area);
        let title_room = buttons
            .first()
            .map(|(_, rect)| rect.x.saturating_sub(area.x))
            .unwrap_or(area.width)
            .saturating_sub(12) as usize;

        let left = Line::from(vec![
            Span::styled(" ‹ Esc ", bg.fg(TEXT_MUTED)),
            Span::styled(
                truncate_to_width(self.title, title_room),
                bg.fg(TEXT_PRIMARY).add_modifier(Modifier::BOLD),
            ),
        ]);
        buf.set_line(area.x, area.y, &left, area.width);

        for (view, rect) in buttons {
            let style = if view == self.active {
                Style::default().bg(ACCENT_PRIMARY).fg(TEXT_PRIMARY)
            } else {
                bg.fg(TEXT_SECONDARY)
            };
            buf.set_string(rect.x, rect.y, button_label(view), style);
        }
    }
}
