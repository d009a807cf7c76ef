use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use super::palette::{BORDER_DEFAULT, TEXT_FAINT, TEXT_MUTED, TEXT_PRIMARY, TEXT_SECONDARY};

pub const NO_SUMMARY: &str = "No summary yet. Upload documents to generate one.";
pub const SUMMARY_FOOTNOTE: &str = "Updates automatically as you upload documents";

/// The evolving session summary
pub struct SummaryPane<'a> {
    summary: Option<&'a str>,
}

impl<'a> SummaryPane<'a> {
    pub fn new(summary: Option<&'a str>) -> Self {
        Self { summary }
    }
}

impl Widget for SummaryPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER_DEFAULT))
            .title(Span::styled(" Summary ", Style::default().fg(TEXT_PRIMARY)));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 {
            return;
        }

        buf.set_line(
            inner.x,
            inner.y,
            &Line::from(Span::styled(
                SUMMARY_FOOTNOTE,
                Style::default().fg(TEXT_FAINT).add_modifier(Modifier::ITALIC),
            )),
            inner.width,
        );

        let body_area = Rect {
            y: inner.y + 1,
            height: inner.height.saturating_sub(1),
            ..inner
        };
        let body = match self.summary {
            Some(text) => Paragraph::new(text).style(Style::default().fg(TEXT_SECONDARY)),
            None => Paragraph::new(NO_SUMMARY).style(
                Style::default()
                    .fg(TEXT_MUTED)
                    .add_modifier(Modifier::ITALIC),
            ),
        };
        body.wrap(Wrap { trim: false }).render(body_area, buf);
    }
}
