//! Pane selection, splitter clamping and the scroll threshold

use std::sync::Arc;

use briefly::config::LayoutConfig;
use briefly::ui::layout::{PaneLayout, PaneView};
use briefly::ui::resize::{NoopSurface, Splitter, MAX_PANE_WIDTH, MIN_PANE_WIDTH};
use briefly::ui::scroll_anchor::{ScrollAnchor, ScrollDecision, ScrollMetrics};
use proptest::prelude::*;

const VIEWPORT: u32 = 1440;

fn layout() -> PaneLayout {
    PaneLayout::new(&LayoutConfig::default(), Arc::new(NoopSurface))
}

proptest! {
    #[test]
    fn docs_width_stays_in_bounds(pointer_x in -1_000_000i64..1_000_000i64) {
        let mut layout = layout();
        prop_assert!(layout.begin_drag(Splitter::Docs, VIEWPORT));
        layout.pointer_moved(pointer_x, VIEWPORT);

        let width = layout.resize_state().docs_width;
        prop_assert!((MIN_PANE_WIDTH..=MAX_PANE_WIDTH).contains(&width));
    }

    #[test]
    fn summary_width_stays_in_bounds(
        moves in proptest::collection::vec(any::<i32>(), 1..20)
    ) {
        let mut layout = layout();
        prop_assert!(layout.begin_drag(Splitter::Summary, VIEWPORT));
        for x in moves {
            layout.pointer_moved(i64::from(x), VIEWPORT);
            let width = layout.resize_state().summary_width;
            prop_assert!((MIN_PANE_WIDTH..=MAX_PANE_WIDTH).contains(&width));
        }
    }
}

#[test]
fn test_selecting_a_pane_twice_returns_to_all() {
    let mut layout = layout();
    assert_eq!(layout.select(PaneView::Docs), PaneView::Docs);
    assert_eq!(layout.select(PaneView::Docs), PaneView::All);

    assert_eq!(layout.select(PaneView::Chat), PaneView::Chat);
    assert_eq!(layout.select(PaneView::Summary), PaneView::Summary);
    assert_eq!(layout.select(PaneView::Chat), PaneView::Chat);
    assert_eq!(layout.select(PaneView::Chat), PaneView::All);
}

#[test]
fn test_scroll_threshold_boundary() {
    let metrics = |scroll_top| ScrollMetrics {
        scroll_top,
        scroll_height: 1000,
        client_height: 500,
    };

    let mut near = ScrollAnchor::new(100);
    near.on_messages_changed(3);
    near.on_scroll(metrics(401));
    assert_eq!(near.on_messages_changed(4), ScrollDecision::ScrollToEnd);

    let mut away = ScrollAnchor::new(100);
    away.on_messages_changed(3);
    away.on_scroll(metrics(399));
    assert_eq!(away.on_messages_changed(4), ScrollDecision::Stay);
}
