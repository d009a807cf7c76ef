use ratatui::{
    style::{Color, Style},
    text::Span,
};

const FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Braille spinner advanced by the app tick
#[derive(Debug, Clone, Copy, Default)]
pub struct Spinner {
    tick: usize,
}

impl Spinner {
    pub fn tick(&mut self) {
        self.tick = (self.tick + 1) % FRAMES.len();
    }

    pub fn frame(&self) -> &'static str {
        FRAMES[self.tick % FRAMES.len()]
    }

    /// Frame followed by a label, both in `color`
    pub fn with_label(&self, label: &str, color: Color) -> Vec<Span<'static>> {
        let style = Style::default().fg(color);
        vec![
            Span::styled(self.frame(), style),
            Span::raw(" "),
            Span::styled(label.to_string(), style),
        ]
    }
}
