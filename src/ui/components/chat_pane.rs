//! Chat transcript with row-based scrolling
//!
//! The pane scrolls in rows. [`ChatPaneState::metrics`] turns the row position
//! into pixel metrics for the scroll anchor, and a follow request from the
//! anchor is applied on the next render, once the new content height is known.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, StatefulWidget, Widget},
};

use super::palette::{
    ACCENT_PRIMARY, BG_ASSISTANT_MESSAGE, BG_USER_MESSAGE, BORDER_DEFAULT, TEXT_FAINT, TEXT_MUTED,
    TEXT_PRIMARY, TEXT_SECONDARY,
};
use super::scrollbar::render_vertical_scrollbar;
use super::spinner::Spinner;
use crate::data::{format_message_time, Message, MessageBody, Role};
use crate::ui::geometry::CellScale;
use crate::ui::scroll_anchor::ScrollMetrics;
use crate::util::wrap_to_width;

pub const EMPTY_CHAT: &str = "Start chatting to ask questions about your documents";
pub const PENDING_LABEL: &str = "Analyzing...";

#[derive(Debug, Clone, Default)]
pub struct ChatPaneState {
    offset: usize,
    total_rows: usize,
    visible_rows: usize,
    follow_requested: bool,
    jumped: bool,
}

impl ChatPaneState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    fn max_offset(&self) -> usize {
        self.total_rows.saturating_sub(self.visible_rows)
    }

    /// Jump to the last row on the next render
    pub fn scroll_to_end(&mut self) {
        self.follow_requested = true;
    }

    pub fn scroll_by(&mut self, rows: isize) {
        let target = if rows < 0 {
            self.offset.saturating_sub(rows.unsigned_abs())
        } else {
            self.offset.saturating_add(rows.unsigned_abs())
        };
        self.offset = target.min(self.max_offset());
    }

    pub fn page_up(&mut self) {
        let page = self.visible_rows.saturating_sub(1).max(1);
        self.scroll_by(-(page as isize));
    }

    pub fn page_down(&mut self) {
        let page = self.visible_rows.saturating_sub(1).max(1);
        self.scroll_by(page as isize);
    }

    pub fn metrics(&self, scale: CellScale) -> ScrollMetrics {
        scale.scroll_metrics(self.offset, self.total_rows, self.visible_rows)
    }

    /// Whether the last render moved the view to the end. A programmatic
    /// jump counts as a scroll sample.
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jumped)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

fn message_lines(message: &Message, width: usize, spinner: Spinner) -> Vec<Line<'static>> {
    let (who, bg) = match message.role {
        Role::User => ("You", BG_USER_MESSAGE),
        Role::Assistant => ("Assistant", BG_ASSISTANT_MESSAGE),
    };

    let mut lines = vec![Line::from(vec![
        Span::styled(
            who,
            Style::default().fg(ACCENT_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", format_message_time(&message.timestamp)),
            Style::default().fg(TEXT_FAINT),
        ),
    ])];

    match &message.body {
        MessageBody::Pending => {
            lines.push(Line::from(spinner.with_label(PENDING_LABEL, TEXT_SECONDARY)));
        }
        MessageBody::Text(text) => {
            let style = Style::default().fg(TEXT_PRIMARY).bg(bg);
            for row in wrap_to_width(text, width.saturating_sub(1)) {
                lines.push(Line::from(Span::styled(format!(" {row}"), style)));
            }
        }
    }
    lines
}

pub struct ChatPane<'a> {
    messages: &'a [Message],
    spinner: Spinner,
    focused: bool,
}

impl<'a> ChatPane<'a> {
    pub fn new(messages: &'a [Message]) -> Self {
        Self {
            messages,
            spinner: Spinner::default(),
            focused: true,
        }
    }

    pub fn spinner(mut self, spinner: Spinner) -> Self {
        self.spinner = spinner;
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl StatefulWidget for ChatPane<'_> {
    type State = ChatPaneState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let border = if self.focused { ACCENT_PRIMARY } else { BORDER_DEFAULT };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(Span::styled(" Chat ", Style::default().fg(TEXT_PRIMARY)));
        let inner = block.inner(area);
        block.render(area, buf);
        if inner.height == 0 || inner.width < 2 {
            return;
        }

        if self.messages.is_empty() {
            state.total_rows = 0;
            state.visible_rows = inner.height as usize;
            state.offset = 0;
            state.follow_requested = false;
            Paragraph::new(Span::styled(EMPTY_CHAT, Style::default().fg(TEXT_MUTED)))
                .render(inner, buf);
            return;
        }

        // Leave a column for the scrollbar
        let text_width = inner.width.saturating_sub(1) as usize;
        let mut lines = Vec::new();
        for (i, message) in self.messages.iter().enumerate() {
            if i > 0 {
                lines.push(Line::default());
            }
            lines.extend(message_lines(message, text_width, self.spinner));
        }

        state.total_rows = lines.len();
        state.visible_rows = inner.height as usize;
        if state.follow_requested {
            state.follow_requested = false;
            state.offset = state.max_offset();
            state.jumped = true;
        } else {
            state.offset = state.offset.min(state.max_offset());
        }

        let visible: Vec<Line> = lines
            .into_iter()
            .skip(state.offset)
            .take(state.visible_rows)
            .collect();
        let text_area = Rect {
            width: inner.width.saturating_sub(1),
            ..inner
        };
        Paragraph::new(visible).render(text_area, buf);
        render_vertical_scrollbar(
            inner,
            buf,
            state.total_rows,
            state.visible_rows,
            state.offset,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::data::{LocalId, MessageId};
    use chrono::{TimeZone, Utc};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn message(id: i64, role: Role, text: &str) -> Message {
        Message {
            id: MessageId::Persisted(id),
            role,
            body: MessageBody::Text(text.into()),
            timestamp: Utc.with_ymd_and_hms(2025, 1, 5, 10, 30, 0).unwrap(),
        }
    }

    fn screen(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn pending_placeholder_renders_as_analyzing() {
        let messages = vec![
            message(1, Role::User, "What was decided?"),
            Message::pending_reply(LocalId(1), Utc::now()),
        ];
        let mut terminal = Terminal::new(TestBackend::new(50, 10)).unwrap();
        let mut state = ChatPaneState::new();
        terminal
            .draw(|f| f.render_stateful_widget(ChatPane::new(&messages), f.area(), &mut state))
            .unwrap();

        let text = screen(&terminal);
        assert!(text.contains("What was decided?"));
        assert!(text.contains(PENDING_LABEL));
        assert!(text.contains("Jan 5, 10:30 AM"));
    }

    #[test]
    fn empty_chat_shows_prompt() {
        let mut terminal = Terminal::new(TestBackend::new(70, 5)).unwrap();
        let mut state = ChatPaneState::new();
        terminal
            .draw(|f| f.render_stateful_widget(ChatPane::new(&[]), f.area(), &mut state))
            .unwrap();
        assert!(screen(&terminal).contains(EMPTY_CHAT));
    }

    #[test]
    fn follow_request_jumps_to_last_row() {
        let messages: Vec<_> = (0..20)
            .map(|i| message(i, Role::Assistant, "Line of text"))
            .collect();
        let mut terminal = Terminal::new(TestBackend::new(40, 12)).unwrap();
        let mut state = ChatPaneState::new();
        state.scroll_to_end();
        terminal
            .draw(|f| f.render_stateful_widget(ChatPane::new(&messages), f.area(), &mut state))
            .unwrap();

        // 20 messages of 2 rows plus 19 separators, 10 visible rows
        assert_eq!(state.offset(), 59 - 10);
        assert!(state.take_jump());
        assert!(!state.take_jump());

        let scale = CellScale::from_config(&LayoutConfig::default());
        assert_eq!(state.metrics(scale).distance_from_bottom(), 0);

        state.page_up();
        assert!(state.metrics(scale).distance_from_bottom() > 100);
    }
}
