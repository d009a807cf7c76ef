mod chat_pane;
mod documents_pane;
mod input_line;
pub mod palette;
mod pane_bar;
mod scrollbar;
mod session_list;
mod spinner;
mod status_line;
mod summary_pane;

pub use chat_pane::{ChatPane, ChatPaneState, EMPTY_CHAT, PENDING_LABEL};
pub use documents_pane::{DocumentsPane, NO_DOCUMENTS};
pub use input_line::{InputLine, InputLineState};
pub use pane_bar::{button_areas, PaneBar};
pub use scrollbar::render_vertical_scrollbar;
pub use session_list::{SessionList, SessionListState};
pub use spinner::Spinner;
pub use status_line::StatusLine;
pub use summary_pane::{SummaryPane, NO_SUMMARY, SUMMARY_FOOTNOTE};
