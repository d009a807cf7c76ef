use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use super::palette::{ACCENT_ERROR, ACCENT_SUCCESS, BG_ELEVATED, TEXT_MUTED, TEXT_SECONDARY};
use crate::ui::events::{Notice, NoticeLevel};

/// Bottom line: the current notice if any, otherwise key hints
pub struct StatusLine<'a> {
    notice: Option<&'a Notice>,
    hints: &'a [(&'a str, &'a str)],
}

impl<'a> StatusLine<'a> {
    pub fn new(notice: Option<&'a Notice>, hints: &'a [(&'a str, &'a str)]) -> Self {
        Self { notice, hints }
    }
}

impl Widget for StatusLine<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let bg = Style::default().bg(BG_ELEVATED);
        buf.set_style(area, bg);

        let line = match self.notice {
            Some(notice) => {
                let color = match notice.level {
                    NoticeLevel::Error => ACCENT_ERROR,
                    NoticeLevel::Info => ACCENT_SUCCESS,
                };
                Line::from(Span::styled(format!(" {}", notice.text), bg.fg(color)))
            }
            None => {
                let mut spans = vec![Span::styled(" ", bg)];
                for (key, action) in self.hints {
                    spans.push(Span::styled(*key, bg.fg(TEXT_SECONDARY)));
                    spans.push(Span::styled(format!(" {action}  "), bg.fg(TEXT_MUTED)));
                }
                Line::from(spans)
            }
        };
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
