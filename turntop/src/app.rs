//! App state and main loop: terminal input, live-channel events, and drawing.
//!
//! Everything runs on one `select!` loop, so the session is only ever touched
//! by one branch at a time.

use std::{io, time::Duration};

use chrono::{DateTime, Local};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    Terminal,
};
use tracing::{debug, info, warn};

use crate::actions::{KillDispatcher, Terminate};
use crate::endpoint::Endpoint;
use crate::render::KillControl;
use crate::session::Session;
use crate::ui::{
    completions::draw_completions,
    confirm::draw_confirm,
    filter_bar::draw_filter_bar,
    footer::draw_footer,
    header::draw_header,
    prediction::draw_prediction,
    processes::{draw_processes, keep_visible, processes_hit, viewport_rows},
};
use crate::ws::{LinkEvent, LinkHandle};

// Redraw cadence when nothing else happens (keeps the clock and staleness fresh).
const TICK: Duration = Duration::from_millis(500);
// Page size before the first draw has measured the table.
const DEFAULT_PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Filter,
    Confirm { control: KillControl, name: String },
}

pub struct App {
    session: Session,
    endpoint: Endpoint,
    reconnect_delay: Duration,
    mode: InputMode,

    // Selection follows the pid across re-renders; the index is derived.
    selected: usize,
    selected_pid: Option<u32>,
    procs_scroll_offset: usize,
    last_procs_area: Option<Rect>,

    last_dispatch: Option<(u32, DateTime<Local>)>,
    should_quit: bool,
}

impl App {
    pub fn new(endpoint: Endpoint, reconnect_delay: Duration) -> Self {
        Self {
            session: Session::new(),
            endpoint,
            reconnect_delay,
            mode: InputMode::Normal,
            selected: 0,
            selected_pid: None,
            procs_scroll_offset: 0,
            last_procs_area: None,
            last_dispatch: None,
            should_quit: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn mode(&self) -> &InputMode {
        &self.mode
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let dispatcher = KillDispatcher::new(self.endpoint.clone())?;
        let mut link = LinkHandle::spawn(self.endpoint.ws_url(), self.reconnect_delay);
        info!(url = %self.endpoint.ws_url(), "console starting");

        // Terminal setup
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        // Main loop
        let res = self.event_loop(&mut terminal, &mut link, &dispatcher).await;

        // Teardown: release the channel and any pending reconnect first
        link.shutdown().await;
        disable_raw_mode()?;
        let backend = terminal.backend_mut();
        execute!(backend, DisableMouseCapture, LeaveAlternateScreen)?;
        terminal.show_cursor()?;
        info!("console stopped");

        res
    }

    async fn event_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        link: &mut LinkHandle,
        dispatcher: &KillDispatcher,
    ) -> anyhow::Result<()> {
        let mut events = EventStream::new();
        let mut tick = tokio::time::interval(TICK);
        let mut link_open = true;

        loop {
            terminal.draw(|f| self.draw(f))?;

            tokio::select! {
                ev = events.next() => match ev {
                    Some(Ok(ev)) => self.handle_terminal_event(ev, dispatcher),
                    Some(Err(e)) => return Err(e.into()),
                    None => break,
                },
                ev = link.recv(), if link_open => match ev {
                    Some(ev) => self.handle_link_event(ev),
                    None => {
                        warn!("live channel task stopped");
                        link_open = false;
                    }
                },
                _ = tick.tick() => {}
            }

            if self.should_quit {
                break;
            }
        }
        Ok(())
    }

    pub fn handle_link_event(&mut self, ev: LinkEvent) {
        match ev {
            LinkEvent::Status(status) => self.session.set_status(status),
            LinkEvent::Frame(text) => match self.session.apply_frame(&text) {
                Ok(()) => {
                    debug!(rows = self.session.view().rows.len(), "snapshot applied");
                    self.sync_selection();
                }
                Err(e) => warn!(error = %e, bytes = text.len(), "dropping malformed frame"),
            },
        }
    }

    pub fn handle_terminal_event(&mut self, ev: Event, target: &impl Terminate) {
        match ev {
            Event::Key(k) if k.kind == KeyEventKind::Press => self.handle_key(k, target),
            Event::Mouse(m) => self.handle_mouse(m),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, k: KeyEvent, target: &impl Terminate) {
        if k.code == KeyCode::Char('c') && k.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match std::mem::replace(&mut self.mode, InputMode::Normal) {
            InputMode::Confirm { control, .. } => {
                if matches!(k.code, KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter) {
                    self.activate(control, target);
                }
            }
            InputMode::Filter => {
                self.mode = InputMode::Filter;
                match k.code {
                    KeyCode::Enter | KeyCode::Esc => self.mode = InputMode::Normal,
                    KeyCode::Backspace => self.session.pop_filter_char(),
                    KeyCode::Char('u') if k.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.session.clear_filter()
                    }
                    KeyCode::Char(c) if !k.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.session.push_filter_char(c)
                    }
                    _ => {}
                }
                self.sync_selection();
            }
            InputMode::Normal => self.handle_normal_key(k),
        }
    }

    fn handle_normal_key(&mut self, k: KeyEvent) {
        let page = self
            .last_procs_area
            .map(viewport_rows)
            .unwrap_or(DEFAULT_PAGE)
            .max(1);
        match k.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('/') => self.mode = InputMode::Filter,
            KeyCode::Char('c') => {
                self.session.clear_filter();
                self.sync_selection();
            }
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::PageUp => self.move_selection(-(page as isize)),
            KeyCode::PageDown => self.move_selection(page as isize),
            KeyCode::Home => self.select_index(0),
            KeyCode::End => self.select_index(usize::MAX),
            KeyCode::Char('x') | KeyCode::Delete => self.open_confirm(self.selected),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, m: MouseEvent) {
        if !matches!(self.mode, InputMode::Normal) {
            return;
        }
        match m.kind {
            MouseEventKind::ScrollUp => self.move_selection(-1),
            MouseEventKind::ScrollDown => self.move_selection(1),
            _ => {
                let Some(area) = self.last_procs_area else {
                    return;
                };
                let total = self.session.view().rows.len();
                if let Some(hit) = processes_hit(m, area, self.procs_scroll_offset, total) {
                    self.select_index(hit.row);
                    if hit.on_kill {
                        self.open_confirm(hit.row);
                    }
                }
            }
        }
    }

    /// Ask for confirmation before terminating the row's captured pid.
    fn open_confirm(&mut self, row: usize) {
        let Some(r) = self.session.view().rows.get(row) else {
            return;
        };
        // rows without a usable pid cannot be terminated
        if let Some(control) = r.kill {
            self.mode = InputMode::Confirm {
                control,
                name: r.name.clone(),
            };
        }
    }

    fn activate(&mut self, control: KillControl, target: &impl Terminate) {
        info!(pid = control.pid(), "terminate requested by operator");
        control.activate(target);
        self.last_dispatch = Some((control.pid(), Local::now()));
    }

    fn move_selection(&mut self, delta: isize) {
        let next = self.selected.saturating_add_signed(delta);
        self.select_index(next);
    }

    fn select_index(&mut self, ix: usize) {
        let rows = &self.session.view().rows;
        if rows.is_empty() {
            self.selected = 0;
            self.selected_pid = None;
            return;
        }
        self.selected = ix.min(rows.len() - 1);
        self.selected_pid = rows[self.selected].pid;
    }

    // After a re-render, keep the same process selected if it is still visible.
    fn sync_selection(&mut self) {
        let found = self.selected_pid.and_then(|pid| {
            self.session
                .view()
                .rows
                .iter()
                .position(|r| r.pid == Some(pid))
        });
        self.select_index(found.unwrap_or(self.selected));
    }

    pub fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let area = f.area();

        let has_completions = self
            .session
            .last_snapshot()
            .is_some_and(|s| !s.recent_completions.is_empty());
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // header
                Constraint::Length(4), // prediction + trend
                Constraint::Length(3), // filter
                Constraint::Min(6),    // processes
                Constraint::Length(if has_completions { 8 } else { 0 }),
                Constraint::Length(1), // footer
            ])
            .split(area);

        draw_header(f, rows[0], &self.session, &self.endpoint.authority());
        draw_prediction(f, rows[1], &self.session);

        let view = self.session.view();
        draw_filter_bar(
            f,
            rows[2],
            self.session.filter_text(),
            matches!(self.mode, InputMode::Filter),
            view.rows.len(),
            view.total_items,
        );

        let procs_area = rows[3];
        self.last_procs_area = Some(procs_area);
        self.procs_scroll_offset = keep_visible(
            self.selected,
            self.procs_scroll_offset,
            viewport_rows(procs_area),
        );
        draw_processes(
            f,
            procs_area,
            self.session.view(),
            self.selected,
            self.procs_scroll_offset,
        );

        if has_completions {
            draw_completions(f, rows[4], &self.session.view().completions);
        }
        draw_footer(f, rows[5], self.last_dispatch);

        if let InputMode::Confirm { control, name } = &self.mode {
            draw_confirm(f, area, control.pid(), name);
        }
    }
}
