use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::palette::{ACCENT_PRIMARY, BORDER_DEFAULT, TEXT_FAINT, TEXT_MUTED, TEXT_PRIMARY};
use super::spinner::Spinner;
use crate::data::{format_message_time, Document};
use crate::util::truncate_to_width;

pub const NO_DOCUMENTS: &str = "No documents uploaded";

/// Uploaded documents, newest first, with the upload action at the bottom
pub struct DocumentsPane<'a> {
    documents: &'a [Document],
    uploading: bool,
    spinner: Spinner,
}

impl<'a> DocumentsPane<'a> {
    pub fn new(documents: &'a [Document]) -> Self {
        Self {
            documents,
            uploading: false,
            spinner: Spinner::default(),
        }
    }

    pub fn uploading(mut self, uploading: bool, spinner: Spinner) -> Self {
        self.uploading = uploading;
        self.spinner = spinner;
        self
    }
}

impl Widget for DocumentsPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER_DEFAULT))
            .title(Span::styled(" Documents ", Style::default().fg(TEXT_PRIMARY)));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let width = inner.width as usize;
        let mut lines = Vec::new();
        if self.documents.is_empty() {
            lines.push(Line::from(Span::styled(
                NO_DOCUMENTS,
                Style::default().fg(TEXT_MUTED),
            )));
        }
        for document in self.documents {
            lines.push(Line::from(Span::styled(
                truncate_to_width(&document.filename, width),
                Style::default().fg(TEXT_PRIMARY),
            )));
            lines.push(Line::from(Span::styled(
                format_message_time(&document.uploaded_at),
                Style::default().fg(TEXT_FAINT),
            )));
        }

        let list_height = inner.height.saturating_sub(1);
        Paragraph::new(lines).render(Rect { height: list_height, ..inner }, buf);

        let action = if self.uploading {
            Line::from(self.spinner.with_label("Uploading...", ACCENT_PRIMARY))
        } else {
            Line::from(vec![
                Span::styled("Ctrl+O ", Style::default().fg(ACCENT_PRIMARY)),
                Span::styled("Upload PDF", Style::default().fg(TEXT_PRIMARY)),
            ])
        };
        buf.set_line(inner.x, inner.y + list_height, &action, inner.width);
    }
}
