//! Three-pane layout: which of documents, chat and summary are shown, and
//! how they are arranged for a given viewport width.

use std::sync::Arc;

use crate::config::LayoutConfig;
use crate::ui::resize::{PointerSurface, ResizeController, ResizeState, Splitter};

/// Which panes are on screen. `All` shows every pane; the others show a
/// single pane on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaneView {
    #[default]
    All,
    Docs,
    Chat,
    Summary,
}

impl PaneView {
    /// Result of pressing the button for `requested` while `self` is active.
    /// Pressing the active single-pane button again returns to `All`.
    pub fn select(self, requested: PaneView) -> PaneView {
        match requested {
            PaneView::All => PaneView::All,
            other if other == self => PaneView::All,
            other => other,
        }
    }

    pub fn visibility(self) -> PaneVisibility {
        PaneVisibility {
            docs: matches!(self, PaneView::All | PaneView::Docs),
            chat: matches!(self, PaneView::All | PaneView::Chat),
            summary: matches!(self, PaneView::All | PaneView::Summary),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaneView::All => "All",
            PaneView::Docs => "Docs",
            PaneView::Chat => "Chat",
            PaneView::Summary => "Summary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaneVisibility {
    pub docs: bool,
    pub chat: bool,
    pub summary: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Docs,
    Chat,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowDirection {
    /// Side by side
    Row,
    /// Stacked, used below the wide breakpoint
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneSize {
    /// Fixed width in pixels
    Fixed(u32),
    /// Take the remaining space
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutItem {
    Pane { pane: Pane, size: PaneSize },
    Splitter(Splitter),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arrangement {
    pub direction: FlowDirection,
    pub items: Vec<LayoutItem>,
}

impl Arrangement {
    pub fn has_splitter(&self, splitter: Splitter) -> bool {
        self.items.contains(&LayoutItem::Splitter(splitter))
    }

    pub fn panes(&self) -> impl Iterator<Item = (Pane, PaneSize)> + '_ {
        self.items.iter().filter_map(|item| match item {
            LayoutItem::Pane { pane, size } => Some((*pane, *size)),
            LayoutItem::Splitter(_) => None,
        })
    }
}

/// Pane selection plus the two splitter drags
pub struct PaneLayout {
    view: PaneView,
    resize: ResizeController,
}

impl PaneLayout {
    pub fn new(config: &LayoutConfig, surface: Arc<dyn PointerSurface>) -> Self {
        Self {
            view: PaneView::All,
            resize: ResizeController::new(config, surface),
        }
    }

    pub fn view(&self) -> PaneView {
        self.view
    }

    pub fn visibility(&self) -> PaneVisibility {
        self.view.visibility()
    }

    pub fn select(&mut self, requested: PaneView) -> PaneView {
        let next = self.view.select(requested);
        if next != PaneView::All {
            // Splitters disappear outside the all-panes view
            self.resize.release();
        }
        if next != self.view {
            tracing::debug!(from = ?self.view, to = ?next, "Pane view changed");
        }
        self.view = next;
        next
    }

    pub fn resize_state(&self) -> ResizeState {
        self.resize.state()
    }

    pub fn begin_drag(&mut self, splitter: Splitter, viewport_width: u32) -> bool {
        self.resize.begin_drag(splitter, self.view, viewport_width)
    }

    pub fn pointer_moved(&mut self, pointer_x: i64, viewport_width: u32) {
        self.resize.pointer_moved(pointer_x, viewport_width);
    }

    pub fn release_drag(&mut self) {
        self.resize.release();
    }

    /// Lay out the visible panes for a viewport.
    ///
    /// Wide viewports in the `All` view get fixed-width side panes around a
    /// filling chat pane, with a splitter on each side of the chat. A single
    /// pane view always fills. Narrow viewports stack the visible panes.
    pub fn arrange(&self, viewport_width: u32) -> Arrangement {
        let visible = self.visibility();
        let wide = self.resize.is_wide(viewport_width);
        let state = self.resize.state();

        if !wide {
            let items = [
                (visible.docs, Pane::Docs),
                (visible.chat, Pane::Chat),
                (visible.summary, Pane::Summary),
            ]
            .into_iter()
            .filter(|(shown, _)| *shown)
            .map(|(_, pane)| LayoutItem::Pane {
                pane,
                size: PaneSize::Fill,
            })
            .collect();
            return Arrangement {
                direction: FlowDirection::Column,
                items,
            };
        }

        let side_size = |width: u32| {
            if self.view == PaneView::All {
                PaneSize::Fixed(width)
            } else {
                PaneSize::Fill
            }
        };
        let splitters = self.view == PaneView::All && visible.chat;

        let mut items = Vec::with_capacity(5);
        if visible.docs {
            items.push(LayoutItem::Pane {
                pane: Pane::Docs,
                size: side_size(state.docs_width),
            });
            if splitters {
                items.push(LayoutItem::Splitter(Splitter::Docs));
            }
        }
        if visible.chat {
            items.push(LayoutItem::Pane {
                pane: Pane::Chat,
                size: PaneSize::Fill,
            });
        }
        if visible.summary {
            if splitters {
                items.push(LayoutItem::Splitter(Splitter::Summary));
            }
            items.push(LayoutItem::Pane {
                pane: Pane::Summary,
                size: side_size(state.summary_width),
            });
        }

        Arrangement {
            direction: FlowDirection::Row,
            items,
        }
    }
}
