//! Drag-resize for the documents and summary splitters.
//!
//! Only one splitter can be dragged at a time: the active drag is a single
//! `Option` holding a [`DragGuard`]. The guard switches the pointer surface
//! into resize mode when acquired and restores it when dropped, so release,
//! teardown and error paths all leave the surface clean.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::LayoutConfig;
use crate::ui::layout::PaneView;

pub const MIN_PANE_WIDTH: u32 = 200;
pub const MAX_PANE_WIDTH: u32 = 600;
pub const DEFAULT_DOCS_WIDTH: u32 = 256;
pub const DEFAULT_SUMMARY_WIDTH: u32 = 320;

/// A draggable pane divider, named after the pane it resizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Splitter {
    Docs,
    Summary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorStyle {
    #[default]
    Default,
    ColumnResize,
}

/// Global pointer affordances that a drag overrides
pub trait PointerSurface: Send + Sync {
    fn set_cursor(&self, cursor: CursorStyle);
    fn set_text_selection(&self, enabled: bool);
}

/// Surface for headless use; drags still work, nothing is drawn.
#[derive(Debug, Default)]
pub struct NoopSurface;

impl PointerSurface for NoopSurface {
    fn set_cursor(&self, _cursor: CursorStyle) {}
    fn set_text_selection(&self, _enabled: bool) {}
}

/// Surface that records the current affordances so a renderer can reflect them
#[derive(Debug, Clone, Default)]
pub struct SharedSurface {
    state: Arc<Mutex<SurfaceState>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceState {
    pub cursor: CursorStyle,
    pub text_selection: bool,
}

impl Default for SurfaceState {
    fn default() -> Self {
        Self {
            cursor: CursorStyle::Default,
            text_selection: true,
        }
    }
}

impl SharedSurface {
    pub fn snapshot(&self) -> SurfaceState {
        *self.state.lock()
    }
}

impl PointerSurface for SharedSurface {
    fn set_cursor(&self, cursor: CursorStyle) {
        self.state.lock().cursor = cursor;
    }

    fn set_text_selection(&self, enabled: bool) {
        self.state.lock().text_selection = enabled;
    }
}

/// Held for the lifetime of one drag
pub struct DragGuard {
    splitter: Splitter,
    surface: Arc<dyn PointerSurface>,
}

impl DragGuard {
    fn acquire(splitter: Splitter, surface: Arc<dyn PointerSurface>) -> Self {
        surface.set_cursor(CursorStyle::ColumnResize);
        surface.set_text_selection(false);
        Self { splitter, surface }
    }

    pub fn splitter(&self) -> Splitter {
        self.splitter
    }
}

impl Drop for DragGuard {
    fn drop(&mut self) {
        self.surface.set_cursor(CursorStyle::Default);
        self.surface.set_text_selection(true);
    }
}

/// Snapshot of the resize state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeState {
    pub active: Option<Splitter>,
    pub docs_width: u32,
    pub summary_width: u32,
}

/// Clamp a candidate width into the allowed pane range
pub fn clamp_width(candidate: i64) -> u32 {
    candidate.clamp(i64::from(MIN_PANE_WIDTH), i64::from(MAX_PANE_WIDTH)) as u32
}

pub struct ResizeController {
    surface: Arc<dyn PointerSurface>,
    drag: Option<DragGuard>,
    docs_width: u32,
    summary_width: u32,
    wide_breakpoint: u32,
    left_inset: u32,
    right_inset: u32,
}

impl ResizeController {
    pub fn new(layout: &LayoutConfig, surface: Arc<dyn PointerSurface>) -> Self {
        Self {
            surface,
            drag: None,
            docs_width: DEFAULT_DOCS_WIDTH,
            summary_width: DEFAULT_SUMMARY_WIDTH,
            wide_breakpoint: layout.wide_breakpoint_px,
            left_inset: layout.container_left_inset_px,
            right_inset: layout.container_right_inset_px,
        }
    }

    pub fn state(&self) -> ResizeState {
        ResizeState {
            active: self.active(),
            docs_width: self.docs_width,
            summary_width: self.summary_width,
        }
    }

    pub fn active(&self) -> Option<Splitter> {
        self.drag.as_ref().map(DragGuard::splitter)
    }

    pub fn docs_width(&self) -> u32 {
        self.docs_width
    }

    pub fn summary_width(&self) -> u32 {
        self.summary_width
    }

    pub fn is_wide(&self, viewport_width: u32) -> bool {
        viewport_width >= self.wide_breakpoint
    }

    /// Pointer pressed on a splitter. Splitters only exist in the wide
    /// all-panes layout, so anything else is ignored. Returns whether a drag
    /// started.
    pub fn begin_drag(&mut self, splitter: Splitter, view: PaneView, viewport_width: u32) -> bool {
        if view != PaneView::All || !self.is_wide(viewport_width) {
            tracing::trace!(?splitter, ?view, viewport_width, "Ignoring splitter press");
            return false;
        }
        // Restore the surface from any previous drag before taking it again
        self.drag = None;
        self.drag = Some(DragGuard::acquire(splitter, Arc::clone(&self.surface)));
        tracing::debug!(?splitter, "Splitter drag started");
        true
    }

    /// Pointer moved anywhere. Only affects the pane whose splitter is held.
    pub fn pointer_moved(&mut self, pointer_x: i64, viewport_width: u32) {
        match self.active() {
            Some(Splitter::Docs) => {
                self.docs_width = clamp_width(pointer_x - i64::from(self.left_inset));
            }
            Some(Splitter::Summary) => {
                self.summary_width = clamp_width(
                    i64::from(viewport_width) - pointer_x - i64::from(self.right_inset),
                );
            }
            None => {}
        }
    }

    /// Pointer released anywhere
    pub fn release(&mut self) {
        if let Some(guard) = self.drag.take() {
            tracing::debug!(
                splitter = ?guard.splitter(),
                docs_width = self.docs_width,
                summary_width = self.summary_width,
                "Splitter drag ended"
            );
        }
    }
}
