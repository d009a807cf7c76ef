//! Mapping between terminal cells and the pixel units the layout core uses

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::config::LayoutConfig;
use crate::ui::layout::{Arrangement, FlowDirection, LayoutItem, Pane, PaneSize};
use crate::ui::resize::Splitter;
use crate::ui::scroll_anchor::ScrollMetrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellScale {
    pub width_px: u32,
    pub height_px: u32,
}

impl CellScale {
    pub fn from_config(layout: &LayoutConfig) -> Self {
        Self {
            width_px: layout.cell_width_px.max(1),
            height_px: layout.cell_height_px.max(1),
        }
    }

    pub fn columns_to_px(&self, columns: u16) -> u32 {
        u32::from(columns) * self.width_px
    }

    /// Pointer position of a column, in pixels
    pub fn pointer_x(&self, column: u16) -> i64 {
        i64::from(self.columns_to_px(column))
    }

    pub fn px_to_columns(&self, px: u32) -> u16 {
        u16::try_from(px / self.width_px).unwrap_or(u16::MAX)
    }

    /// Express a row-based scroll position in pixels
    pub fn scroll_metrics(&self, offset: usize, total: usize, visible: usize) -> ScrollMetrics {
        let px = |rows: usize| u32::try_from(rows).unwrap_or(u32::MAX).saturating_mul(self.height_px);
        ScrollMetrics {
            scroll_top: px(offset),
            scroll_height: px(total.max(visible)),
            client_height: px(visible),
        }
    }
}

/// Where each pane and splitter landed on screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlacedLayout {
    pub panes: Vec<(Pane, Rect)>,
    pub splitters: Vec<(Splitter, Rect)>,
}

impl PlacedLayout {
    pub fn pane(&self, pane: Pane) -> Option<Rect> {
        self.panes.iter().find(|(p, _)| *p == pane).map(|(_, r)| *r)
    }

    pub fn splitter_at(&self, column: u16, row: u16) -> Option<Splitter> {
        self.splitters
            .iter()
            .find(|(_, rect)| contains(*rect, column, row))
            .map(|(splitter, _)| *splitter)
    }
}

pub fn contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Lay out an arrangement inside `area`. `area` already excludes the
/// container insets.
pub fn place(area: Rect, arrangement: &Arrangement, scale: CellScale) -> PlacedLayout {
    let direction = match arrangement.direction {
        FlowDirection::Row => Direction::Horizontal,
        FlowDirection::Column => Direction::Vertical,
    };

    let constraints: Vec<Constraint> = arrangement
        .items
        .iter()
        .map(|item| match (item, arrangement.direction) {
            (LayoutItem::Splitter(_), _) => Constraint::Length(1),
            (LayoutItem::Pane { size: PaneSize::Fixed(px), .. }, _) => {
                Constraint::Length(scale.px_to_columns(*px))
            }
            // Stacked chat keeps most of the height
            (LayoutItem::Pane { pane: Pane::Chat, .. }, FlowDirection::Column) => Constraint::Fill(2),
            (LayoutItem::Pane { .. }, _) => Constraint::Fill(1),
        })
        .collect();

    let rects = Layout::default()
        .direction(direction)
        .constraints(constraints)
        .split(area);

    let mut placed = PlacedLayout::default();
    for (item, rect) in arrangement.items.iter().zip(rects.iter()) {
        match item {
            LayoutItem::Pane { pane, .. } => placed.panes.push((*pane, *rect)),
            LayoutItem::Splitter(splitter) => placed.splitters.push((*splitter, *rect)),
        }
    }
    placed
}
