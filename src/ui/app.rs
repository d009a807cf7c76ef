use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::api::SessionApi;
use crate::config::Config;
use crate::data::SessionId;
use crate::ui::components::palette::{
    ACCENT_PRIMARY, BG_BASE, BORDER_DEFAULT, BORDER_FOCUSED, TEXT_MUTED, TEXT_PRIMARY,
};
use crate::ui::components::{
    button_areas, ChatPane, ChatPaneState, DocumentsPane, InputLine, InputLineState, PaneBar,
    SessionList, SessionListState, Spinner, StatusLine, SummaryPane,
};
use crate::ui::events::{InputMode, Notice, Screen};
use crate::ui::geometry::{contains, place, CellScale, PlacedLayout};
use crate::ui::layout::{Pane, PaneView};
use crate::ui::resize::{CursorStyle, SharedSurface};
use crate::ui::scroll_anchor::ScrollDecision;
use crate::ui::terminal_guard::TerminalGuard;
use crate::workspace::chat::{SubmitRejected, SEND_FAILED_NOTICE};
use crate::workspace::directory::DirectoryError;
use crate::workspace::events::{self, EventReceiver, EventSender, WorkspaceEvent};
use crate::workspace::upload::is_pdf;
use crate::workspace::view::{SessionView, LOADING_TEXT};
use crate::workspace::SessionDirectory;

/// Spinner and notice expiry cadence
const TICK_INTERVAL: Duration = Duration::from_millis(100);
/// Rows moved per mouse wheel notch
const WHEEL_ROWS: isize = 3;

const HOME_HINTS: &[(&str, &str)] = &[
    ("↑↓", "select"),
    ("Enter", "open"),
    ("n", "new"),
    ("r", "rename"),
    ("Ctrl+R", "refresh"),
    ("q", "quit"),
];

const SESSION_HINTS: &[(&str, &str)] = &[
    ("Enter", "send"),
    ("Ctrl+O", "upload"),
    ("Alt+A/D/C/S", "panes"),
    ("PgUp/PgDn", "scroll"),
    ("Esc", "back"),
    ("Ctrl+Q", "quit"),
];

/// Screen areas from the last draw, used to route mouse input
#[derive(Debug, Clone, Default)]
struct HitAreas {
    placed: PlacedLayout,
    pane_bar: Option<Rect>,
    viewport_px: u32,
}

/// Main application state
pub struct App {
    config: Config,
    api: Arc<dyn SessionApi>,
    /// Pointer affordances overridden while a splitter is dragged
    surface: SharedSurface,
    scale: CellScale,
    screen: Screen,
    directory: SessionDirectory,
    list_state: SessionListState,
    /// The mounted session, if the session screen is showing
    view: Option<SessionView>,
    chat_state: ChatPaneState,
    input: InputLineState,
    mode: InputMode,
    prompt: InputLineState,
    notice: Option<Notice>,
    events_tx: EventSender,
    events_rx: EventReceiver,
    spinner: Spinner,
    hit: HitAreas,
    /// Reload the session list after the next draw
    refresh_pending: bool,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, api: Arc<dyn SessionApi>) -> Self {
        let (events_tx, events_rx) = events::channel();
        Self {
            scale: CellScale::from_config(&config.layout),
            directory: SessionDirectory::new(Arc::clone(&api)),
            config,
            api,
            surface: SharedSurface::default(),
            screen: Screen::Home,
            list_state: SessionListState::default(),
            view: None,
            chat_state: ChatPaneState::new(),
            input: InputLineState::new(),
            mode: InputMode::Normal,
            prompt: InputLineState::new(),
            notice: None,
            events_tx,
            events_rx,
            spinner: Spinner::default(),
            hit: HitAreas::default(),
            refresh_pending: true,
            should_quit: false,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn view(&self) -> Option<&SessionView> {
        self.view.as_ref()
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the application main loop
    pub async fn run(&mut self) -> anyhow::Result<()> {
        let mut guard = TerminalGuard::enter()?;
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = self.event_loop(&mut terminal).await;

        self.close_session();
        guard.restore()?;
        terminal.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> anyhow::Result<()> {
        let mut input = EventStream::new();
        let mut tick = tokio::time::interval(TICK_INTERVAL);

        loop {
            terminal.draw(|f| self.draw(f))?;

            // Draw the loading state before the list request goes out
            if self.refresh_pending {
                self.refresh_pending = false;
                self.refresh_sessions().await;
                continue;
            }

            tokio::select! {
                maybe_event = input.next() => match maybe_event {
                    Some(Ok(event)) => self.handle_event(event).await,
                    Some(Err(e)) => return Err(e.into()),
                    None => self.should_quit = true,
                },

                Some(event) = self.events_rx.recv() => {
                    self.handle_workspace_event(event);
                }

                _ = tick.tick() => self.on_tick(Instant::now()),
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Reload the session list, keeping the old one on failure
    pub async fn refresh_sessions(&mut self) {
        match self.directory.refresh().await {
            Ok(sessions) => {
                let len = sessions.len();
                self.list_state.clamp(len);
            }
            Err(_) => self.notice = Some(Notice::error("Failed to fetch sessions")),
        }
    }

    /// Mount `id` and switch to its screen, replacing any mounted session
    pub fn open_session(&mut self, id: SessionId) {
        self.close_session();
        let view = SessionView::mount(
            Arc::clone(&self.api),
            id,
            &self.config,
            Arc::new(self.surface.clone()),
            self.events_tx.clone(),
        );
        self.view = Some(view);
        self.input.clear();
        self.screen = Screen::Session(id);
    }

    fn close_session(&mut self) {
        if let Some(mut view) = self.view.take() {
            view.unmount();
        }
        self.chat_state.reset();
        self.hit = HitAreas::default();
    }

    fn back_to_home(&mut self) {
        self.close_session();
        self.screen = Screen::Home;
        self.refresh_pending = true;
    }

    pub fn on_tick(&mut self, now: Instant) {
        self.spinner.tick();
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now)) {
            self.notice = None;
        }
    }

    pub async fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key).await,
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            Event::Paste(text) => self.handle_paste(&text),
            _ => {}
        }
    }

    /// Apply a background event. Events from views that are no longer
    /// mounted are dropped.
    pub fn handle_workspace_event(&mut self, event: WorkspaceEvent) {
        let Some(view) = self.view.as_mut() else {
            tracing::trace!(?event, "Ignoring workspace event with no session open");
            return;
        };
        if event.mount() != view.mount_id() {
            tracing::trace!(?event, "Ignoring workspace event from an unmounted view");
            return;
        }

        match &event {
            WorkspaceEvent::SubmissionFailed { .. } => {
                self.notice = Some(Notice::error(SEND_FAILED_NOTICE));
            }
            WorkspaceEvent::UploadFinished {
                filename,
                summary_updated,
                ..
            } => {
                let text = if *summary_updated {
                    format!("Uploaded {filename}, summary updated")
                } else {
                    format!("Uploaded {filename}")
                };
                self.notice = Some(Notice::info(text));
            }
            WorkspaceEvent::UploadFailed { filename, error, .. } => {
                self.notice = Some(Notice::error(format!("Failed to upload {filename}: {error}")));
            }
            _ => {}
        }

        if view.on_messages_updated() == ScrollDecision::ScrollToEnd {
            self.chat_state.scroll_to_end();
        }
    }

    async fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('q') {
            self.should_quit = true;
            return;
        }

        if self.mode != InputMode::Normal {
            self.handle_prompt_key(key).await;
            return;
        }

        match self.screen {
            Screen::Home => self.handle_home_key(key).await,
            Screen::Session(_) => self.handle_session_key(key),
        }
    }

    async fn handle_home_key(&mut self, key: KeyEvent) {
        let len = self.directory.sessions().len();
        match (key.code, key.modifiers) {
            (KeyCode::Char('r'), KeyModifiers::CONTROL) => self.refresh_sessions().await,
            (KeyCode::Char('q'), _) => self.should_quit = true,
            (KeyCode::Up | KeyCode::Char('k'), _) => self.list_state.select_previous(),
            (KeyCode::Down | KeyCode::Char('j'), _) => self.list_state.select_next(len),
            (KeyCode::Enter, _) => {
                if let Some(session) = self.directory.sessions().get(self.list_state.selected()) {
                    let id = session.id;
                    self.open_session(id);
                }
            }
            (KeyCode::Char('n'), _) => self.open_prompt(InputMode::NewSession, ""),
            (KeyCode::Char('r'), _) => {
                if let Some(session) = self.directory.sessions().get(self.list_state.selected()) {
                    let (id, name) = (session.id, session.name.clone());
                    self.open_prompt(InputMode::RenameSession(id), &name);
                }
            }
            _ => {}
        }
    }

    fn handle_session_key(&mut self, key: KeyEvent) {
        let Some(view) = self.view.as_mut() else {
            return;
        };

        if key.modifiers.contains(KeyModifiers::ALT) {
            let requested = match key.code {
                KeyCode::Char('a') => Some(PaneView::All),
                KeyCode::Char('d') => Some(PaneView::Docs),
                KeyCode::Char('c') => Some(PaneView::Chat),
                KeyCode::Char('s') => Some(PaneView::Summary),
                _ => None,
            };
            if let Some(requested) = requested {
                view.layout_mut().select(requested);
            }
            return;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            if key.code == KeyCode::Char('o') {
                self.open_prompt(InputMode::UploadPath, "");
            }
            return;
        }

        let enabled = view.chat_input().enabled;
        match key.code {
            KeyCode::Esc => self.back_to_home(),
            KeyCode::PageUp => {
                self.chat_state.page_up();
                view.on_scroll(self.chat_state.metrics(self.scale));
            }
            KeyCode::PageDown => {
                self.chat_state.page_down();
                view.on_scroll(self.chat_state.metrics(self.scale));
            }
            KeyCode::Enter => self.submit_chat(),
            KeyCode::Char(c) if enabled => self.input.insert_char(c),
            KeyCode::Backspace if enabled => self.input.backspace(),
            KeyCode::Delete if enabled => self.input.delete(),
            KeyCode::Left => self.input.move_left(),
            KeyCode::Right => self.input.move_right(),
            KeyCode::Home => self.input.move_start(),
            KeyCode::End => self.input.move_end(),
            _ => {}
        }
    }

    fn submit_chat(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        match view.submit(self.input.value()) {
            Ok(_task) => {
                // The task reports back through the event channel
                self.input.clear();
                if view.on_messages_updated() == ScrollDecision::ScrollToEnd {
                    self.chat_state.scroll_to_end();
                }
            }
            Err(SubmitRejected::NoDocuments) => {
                self.notice = Some(Notice::error(SubmitRejected::NoDocuments.to_string()));
            }
            Err(rejected) => {
                tracing::debug!(%rejected, "Chat submission ignored");
            }
        }
    }

    fn open_prompt(&mut self, mode: InputMode, initial: &str) {
        self.mode = mode;
        self.prompt.clear();
        self.prompt.insert_str(initial);
    }

    async fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.mode = InputMode::Normal;
                self.prompt.clear();
            }
            KeyCode::Enter => {
                let mode = std::mem::take(&mut self.mode);
                let value = self.prompt.take();
                self.commit_prompt(mode, value).await;
            }
            KeyCode::Char(c) => self.prompt.insert_char(c),
            KeyCode::Backspace => self.prompt.backspace(),
            KeyCode::Delete => self.prompt.delete(),
            KeyCode::Left => self.prompt.move_left(),
            KeyCode::Right => self.prompt.move_right(),
            KeyCode::Home => self.prompt.move_start(),
            KeyCode::End => self.prompt.move_end(),
            _ => {}
        }
    }

    async fn commit_prompt(&mut self, mode: InputMode, value: String) {
        match mode {
            InputMode::Normal => {}
            InputMode::NewSession => match self.directory.create(&value).await {
                Ok(session) => {
                    self.list_state.select_first();
                    self.notice = Some(Notice::info(format!("Created {}", session.name)));
                }
                Err(DirectoryError::EmptyName) => {}
                Err(_) => self.notice = Some(Notice::error("Failed to create session")),
            },
            InputMode::RenameSession(id) => match self.directory.rename(id, &value).await {
                Ok(session) => {
                    self.notice = Some(Notice::info(format!("Renamed to {}", session.name)));
                }
                Err(DirectoryError::EmptyName) => {}
                Err(_) => self.notice = Some(Notice::error("Failed to rename session")),
            },
            InputMode::UploadPath => self.start_upload(value.trim()),
        }
    }

    fn start_upload(&mut self, raw_path: &str) {
        let Some(view) = self.view.as_ref() else {
            return;
        };
        if raw_path.is_empty() {
            return;
        }
        let path = PathBuf::from(raw_path);
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if !is_pdf(&filename) {
            self.notice = Some(Notice::error("Only PDF files can be uploaded"));
            return;
        }
        if view.is_uploading() {
            self.notice = Some(Notice::error("An upload is already in progress"));
            return;
        }
        // The task reports back through the event channel
        let _task = view.upload(path);
    }

    fn handle_paste(&mut self, text: &str) {
        if self.mode != InputMode::Normal {
            self.prompt.insert_str(text);
        } else if let Some(view) = self.view.as_ref() {
            if view.chat_input().enabled {
                self.input.insert_str(text);
            }
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if self.mode != InputMode::Normal {
            return;
        }
        let Some(view) = self.view.as_mut() else {
            return;
        };
        let (column, row) = (mouse.column, mouse.row);
        let viewport_px = self.hit.viewport_px;

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(bar) = self.hit.pane_bar {
                    if let Some((requested, _)) = button_areas(bar)
                        .into_iter()
                        .find(|(_, rect)| contains(*rect, column, row))
                    {
                        view.layout_mut().select(requested);
                        return;
                    }
                }
                if let Some(splitter) = self.hit.placed.splitter_at(column, row) {
                    view.layout_mut().begin_drag(splitter, viewport_px);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if view.layout().resize_state().active.is_some() {
                    view.layout_mut()
                        .pointer_moved(self.scale.pointer_x(column), viewport_px);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => view.layout_mut().release_drag(),
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown => {
                let over_chat = self
                    .hit
                    .placed
                    .pane(Pane::Chat)
                    .is_some_and(|rect| contains(rect, column, row));
                if over_chat {
                    let rows = if mouse.kind == MouseEventKind::ScrollUp {
                        -WHEEL_ROWS
                    } else {
                        WHEEL_ROWS
                    };
                    self.chat_state.scroll_by(rows);
                    view.on_scroll(self.chat_state.metrics(self.scale));
                }
            }
            _ => {}
        }
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let area = f.area();
        f.render_widget(Block::default().style(Style::default().bg(BG_BASE)), area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);

        let hints = match self.screen {
            Screen::Home => {
                self.draw_home(f, chunks[0]);
                HOME_HINTS
            }
            Screen::Session(_) => {
                self.draw_session(f, chunks[0]);
                SESSION_HINTS
            }
        };
        f.render_widget(StatusLine::new(self.notice.as_ref(), hints), chunks[1]);

        if let Some(label) = self.mode.prompt_label() {
            self.draw_prompt(f, chunks[0], label);
        }
    }

    fn draw_home(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(area);

        let header = Line::from(vec![
            Span::styled(
                " Briefly ",
                Style::default().fg(ACCENT_PRIMARY).add_modifier(Modifier::BOLD),
            ),
            Span::styled("Document chat sessions", Style::default().fg(TEXT_MUTED)),
        ]);
        f.render_widget(Paragraph::new(header), chunks[0]);

        let list = SessionList::new(self.directory.sessions()).loading(self.directory.is_loading());
        f.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }

    fn draw_session(&mut self, f: &mut Frame, area: Rect) {
        let Some(view) = self.view.as_mut() else {
            return;
        };

        if view.is_loading() {
            let loading = Paragraph::new(Span::styled(LOADING_TEXT, Style::default().fg(TEXT_MUTED)))
                .alignment(Alignment::Center);
            let middle = Rect {
                y: area.y + area.height / 2,
                height: area.height.min(1),
                ..area
            };
            f.render_widget(loading, middle);
            self.hit = HitAreas::default();
            return;
        }

        let (title, summary, documents, messages) = {
            let store = view.store().lock();
            let session = store.session();
            (
                session.map(|s| s.name.clone()).unwrap_or_default(),
                session.and_then(|s| s.summary_text().map(str::to_owned)),
                store.documents().to_vec(),
                store.messages().cloned().collect::<Vec<_>>(),
            )
        };
        let input_state = view.chat_input();

        let hint_rows = u16::from(input_state.hint.is_some());
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(3),
                Constraint::Length(hint_rows),
            ])
            .split(area);

        let layout = view.layout();
        f.render_widget(PaneBar::new(&title, layout.view()), chunks[0]);

        let left = self
            .scale
            .px_to_columns(self.config.layout.container_left_inset_px);
        let right = self
            .scale
            .px_to_columns(self.config.layout.container_right_inset_px);
        let container = Rect {
            x: chunks[1].x.saturating_add(left),
            width: chunks[1].width.saturating_sub(left.saturating_add(right)),
            ..chunks[1]
        };
        let viewport_px = self.scale.columns_to_px(area.width);
        let placed = place(container, &layout.arrange(viewport_px), self.scale);

        let dragging = self.surface.snapshot().cursor == CursorStyle::ColumnResize;
        let active = layout.resize_state().active;
        for (splitter, rect) in &placed.splitters {
            let color = if dragging && active == Some(*splitter) {
                ACCENT_PRIMARY
            } else {
                BORDER_DEFAULT
            };
            let bar: Vec<Line> = (0..rect.height).map(|_| Line::from("│")).collect();
            f.render_widget(Paragraph::new(bar).style(Style::default().fg(color)), *rect);
        }

        for (pane, rect) in &placed.panes {
            match pane {
                Pane::Docs => f.render_widget(
                    DocumentsPane::new(&documents).uploading(view.is_uploading(), self.spinner),
                    *rect,
                ),
                Pane::Summary => f.render_widget(SummaryPane::new(summary.as_deref()), *rect),
                Pane::Chat => {
                    let chat = ChatPane::new(&messages)
                        .spinner(self.spinner)
                        .focused(self.mode == InputMode::Normal);
                    f.render_stateful_widget(chat, *rect, &mut self.chat_state);
                    // A jump to the end is a scroll sample like any other
                    if self.chat_state.take_jump() {
                        view.on_scroll(self.chat_state.metrics(self.scale));
                    }
                }
            }
        }

        let border = if input_state.enabled {
            ACCENT_PRIMARY
        } else {
            BORDER_DEFAULT
        };
        let title = if input_state.submitting {
            Line::from(self.spinner.with_label("Sending...", ACCENT_PRIMARY))
        } else {
            Line::from(Span::styled(" Message ", Style::default().fg(TEXT_PRIMARY)))
        };
        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title);
        let input_area = input_block.inner(chunks[2]);
        f.render_widget(input_block, chunks[2]);
        f.render_widget(
            InputLine::new(&self.input)
                .placeholder(input_state.placeholder)
                .enabled(input_state.enabled)
                .focused(self.mode == InputMode::Normal),
            input_area,
        );

        if let Some(hint) = input_state.hint {
            f.render_widget(
                Paragraph::new(Span::styled(hint, Style::default().fg(TEXT_MUTED))),
                chunks[3],
            );
        }

        self.hit = HitAreas {
            placed,
            pane_bar: Some(chunks[0]),
            viewport_px,
        };
    }

    fn draw_prompt(&self, f: &mut Frame, area: Rect, label: &str) {
        let height = 3.min(area.height);
        let width = area.width.saturating_sub(4).min(72);
        let popup = Rect {
            x: area.x + (area.width.saturating_sub(width)) / 2,
            y: area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BORDER_FOCUSED))
            .title(Span::styled(
                format!(" {label} "),
                Style::default().fg(TEXT_PRIMARY),
            ));
        let inner = block.inner(popup);
        f.render_widget(Clear, popup);
        f.render_widget(block, popup);
        f.render_widget(
            InputLine::new(&self.prompt).placeholder(self.mode.prompt_placeholder()),
            inner,
        );
    }
}
