//! Decides whether new chat content should pull the view to the end.
//!
//! The anchor samples scroll position on every scroll event. When the
//! message list grows, it follows only if the last sample was near the
//! bottom, so someone reading older messages is not yanked away while
//! replies keep arriving.

/// Default distance from the end, in pixels, that still counts as "at the bottom"
pub const NEAR_BOTTOM_THRESHOLD_PX: u32 = 100;

/// Scroll geometry of the chat container, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollMetrics {
    pub scroll_top: u32,
    pub scroll_height: u32,
    pub client_height: u32,
}

impl ScrollMetrics {
    /// Distance between the bottom of the viewport and the end of the content
    pub fn distance_from_bottom(&self) -> i64 {
        i64::from(self.scroll_height) - i64::from(self.scroll_top) - i64::from(self.client_height)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDecision {
    Stay,
    ScrollToEnd,
}

#[derive(Debug, Clone)]
pub struct ScrollAnchor {
    threshold_px: u32,
    should_auto_scroll: bool,
    previous_message_count: usize,
}

impl ScrollAnchor {
    pub fn new(threshold_px: u32) -> Self {
        Self {
            threshold_px,
            should_auto_scroll: true,
            previous_message_count: 0,
        }
    }

    pub fn should_auto_scroll(&self) -> bool {
        self.should_auto_scroll
    }

    /// Record a scroll sample
    pub fn on_scroll(&mut self, metrics: ScrollMetrics) {
        self.should_auto_scroll = metrics.distance_from_bottom() < i64::from(self.threshold_px);
    }

    /// The user sent something; their own message must come into view.
    pub fn force_auto_scroll(&mut self) {
        self.should_auto_scroll = true;
    }

    /// Called after every message-list update. Uses the last scroll sample,
    /// not the layout after the update.
    pub fn on_messages_changed(&mut self, count: usize) -> ScrollDecision {
        let grew = count > self.previous_message_count;
        self.previous_message_count = count;
        if grew && self.should_auto_scroll {
            ScrollDecision::ScrollToEnd
        } else {
            ScrollDecision::Stay
        }
    }
}

impl Default for ScrollAnchor {
    fn default() -> Self {
        Self::new(NEAR_BOTTOM_THRESHOLD_PX)
    }
}
