pub mod app;
pub mod components;
pub mod events;
pub mod geometry;
pub mod layout;
pub mod resize;
pub mod scroll_anchor;
pub mod terminal_guard;

pub use app::App;
pub use events::{InputMode, Notice, NoticeLevel, Screen};
pub use geometry::{CellScale, PlacedLayout};
pub use layout::{Arrangement, Pane, PaneLayout, PaneView};
pub use resize::{PointerSurface, ResizeController, SharedSurface, Splitter};
pub use scroll_anchor::{ScrollAnchor, ScrollDecision, ScrollMetrics};
pub use terminal_guard::{install_panic_hook, TerminalGuard};
