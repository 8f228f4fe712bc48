//! App: component-based event loop.
//!
//! Architecture:
//! - `App` owns all components and `AppState` (shared read-only data for components).
//! - A `tokio::mpsc` channel carries terminal events in from a blocking reader.
//! - Launch results arrive on the dispatcher's report channel.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use ratatui::crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use deck_proto::channel::channel_id;
use deck_proto::config::ChannelsConfig;
use deck_proto::error::DeckError;
use deck_proto::launch::{LaunchDispatcher, LaunchError, LaunchReport, Launcher};
use deck_proto::navigation::{
    KeyContext, NavKey, NavigationController, POINTER_BACK, POINTER_FORWARD,
};
use deck_proto::sound::SoundCues;
use deck_proto::Deck;

use crate::{
    action::Action,
    app_state::AppState,
    component::Component,
    components::{
        channel_editor::ChannelEditor, channel_grid::ChannelGrid, help_overlay::HelpOverlay,
        page_nav::PageNav,
    },
    idle::{AutoFade, IdleAnimator},
    theme::{C_ACCENT, C_ADMIN, C_BG, C_MUTED},
    widgets::{
        status_bar::{self, InputMode},
        toast::ToastManager,
    },
};

// ── Internal event bus ────────────────────────────────────────────────────────

enum AppMessage {
    Event(Event),
}

/// Screen areas from the last draw, used for mouse hit-testing.
#[derive(Default, Clone, Copy)]
struct PaneAreas {
    grid: Rect,
    page_nav: Rect,
}

fn hit(r: Rect, col: u16, row: u16) -> bool {
    r.width > 0
        && r.height > 0
        && col >= r.x
        && col < r.x + r.width
        && row >= r.y
        && row < r.y + r.height
}

pub struct App {
    state: AppState,
    grid: ChannelGrid,
    page_nav: PageNav,
    editor: ChannelEditor,
    help_overlay: HelpOverlay,
    toast: ToastManager,
    sounds: Box<dyn SoundCues>,
    dispatcher: LaunchDispatcher,
    reports: Option<mpsc::UnboundedReceiver<LaunchReport>>,
    idle: IdleAnimator,
    fade: AutoFade,
    next_preset: usize,
    areas: PaneAreas,
    should_quit: bool,
}

impl App {
    pub fn new(
        deck: Deck,
        channels: &ChannelsConfig,
        launcher: Arc<dyn Launcher>,
        sounds: Box<dyn SoundCues>,
    ) -> Self {
        let now = Instant::now();
        let (dispatcher, reports) = LaunchDispatcher::new(launcher);
        Self {
            state: AppState::new(deck),
            grid: ChannelGrid::new(),
            page_nav: PageNav::new(),
            editor: ChannelEditor::new(),
            help_overlay: HelpOverlay::new(),
            toast: ToastManager::new(),
            sounds,
            dispatcher,
            reports: Some(reports),
            idle: IdleAnimator::new(
                channels.idle_animation_enabled,
                Duration::from_secs(channels.idle_animation_interval_secs),
                now,
            ),
            fade: AutoFade::new(Duration::from_secs(channels.auto_fade_timeout_secs), now),
            next_preset: 0,
            areas: PaneAreas::default(),
            should_quit: false,
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(mut self) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let (tx, mut rx) = mpsc::channel::<AppMessage>(1024);
        let mut reports = self
            .reports
            .take()
            .ok_or_else(|| anyhow::anyhow!("app already running"))?;

        // ── Background task: keyboard/mouse events ────────────────────────────
        let event_tx = tx.clone();
        tokio::task::spawn_blocking(move || loop {
            match event::read() {
                Ok(ev) => {
                    if event_tx.blocking_send(AppMessage::Event(ev)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        });

        // Transitions, toast expiry, idle animations and fade all run off this.
        let mut ui_tick = tokio::time::interval(Duration::from_millis(100));
        ui_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        // ── Main loop ─────────────────────────────────────────────────────────
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            tokio::select! {
                Some(msg) = rx.recv() => {
                    const MAX_DRAIN: usize = 256;
                    needs_redraw |= self.handle_message(msg);
                    let mut drained = 0;
                    while drained < MAX_DRAIN {
                        match rx.try_recv() {
                            Ok(msg) => needs_redraw |= self.handle_message(msg),
                            Err(_) => break,
                        }
                        drained += 1;
                    }
                }

                Some(report) = reports.recv() => {
                    self.on_launch_report(report);
                    needs_redraw = true;
                }

                _ = ui_tick.tick() => {
                    needs_redraw = self.on_tick(Instant::now());
                }
            }

            if self.should_quit {
                break;
            }
        }

        // ── Teardown ──────────────────────────────────────────────────────────
        self.sounds.stop_all_sounds();
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        info!("chdeck exiting");

        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) -> bool {
        match msg {
            AppMessage::Event(ev) => match ev {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Release {
                        return false;
                    }
                    self.on_activity();
                    for a in self.handle_key(key) {
                        self.dispatch(a);
                    }
                    true
                }
                Event::Mouse(mouse) => {
                    let unfaded = self.on_activity();
                    let actions = self.handle_mouse(mouse);
                    let any = !actions.is_empty();
                    for a in actions {
                        self.dispatch(a);
                    }
                    unfaded || any || mouse.kind != MouseEventKind::Moved
                }
                Event::Resize(_, _) => true,
                _ => false,
            },
        }
    }

    /// Returns `true` if the grid was faded and is now restored.
    fn on_activity(&mut self) -> bool {
        let now = Instant::now();
        self.idle.reset(now);
        if self.fade.activity(now) {
            self.state.faded = false;
            return true;
        }
        false
    }

    /// Periodic housekeeping.  Returns `true` if anything visible changed.
    fn on_tick(&mut self, now: Instant) -> bool {
        let mut redraw = self.state.deck.navigation_mut().tick(now);
        redraw |= self.state.deck.navigation().is_animating();
        redraw |= self.toast.tick(now);

        if self.fade.tick(now) {
            debug!("grid faded");
            self.state.faded = true;
            redraw = true;
        }

        let candidates: Vec<usize> = if self.state.faded {
            Vec::new()
        } else {
            let nav = self.state.deck.navigation();
            nav.channel_index_range(nav.current_page())
                .filter(|&i| !self.state.deck.is_empty(&channel_id(i)))
                .collect()
        };
        redraw |= self.idle.tick(now, &candidates, &mut rand::thread_rng());
        self.state.idle = self.idle.current();
        redraw
    }

    fn on_launch_report(&mut self, report: LaunchReport) {
        match report.outcome {
            Ok(()) => self.toast.success(format!("launched {}", report.channel_id)),
            Err(msg) => self
                .toast
                .error(format!("{} failed: {}", report.channel_id, msg)),
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return vec![Action::Quit];
        }

        // The editor owns the keyboard; navigation keys are text input there.
        if self.editor.is_open() {
            return self.editor.handle_key(key, &self.state);
        }

        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        if key.modifiers == KeyModifiers::NONE || key.modifiers == KeyModifiers::SHIFT {
            let id = self.state.selected_id();
            match key.code {
                KeyCode::Char('q') => return vec![Action::Quit],
                KeyCode::Char('?') => return vec![Action::ToggleHelp],
                KeyCode::Char('e') => return vec![Action::OpenEditor(id)],
                KeyCode::Char('x') => return vec![Action::ClearChannel(id)],
                KeyCode::Char('p') => return vec![Action::ApplyNextPreset],
                KeyCode::Char('u') => return vec![Action::RestoreUserChannels],
                KeyCode::Char('y') => {
                    return match self.state.deck.effective(&id).launch_path() {
                        Some(path) => vec![Action::CopyToClipboard(path.to_string())],
                        None => {
                            self.toast.info(format!("{} has no path", id));
                            vec![]
                        }
                    };
                }
                _ => {}
            }
        }

        let nav_key = match key.code {
            KeyCode::Left => NavKey::ArrowLeft,
            KeyCode::Right => NavKey::ArrowRight,
            KeyCode::Home => NavKey::Home,
            KeyCode::End => NavKey::End,
            KeyCode::Char(c @ '0'..='9') => NavKey::Digit(c as u8 - b'0'),
            _ => NavKey::Other,
        };
        let ctx = KeyContext {
            modifier: key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER),
            in_text_input: self.editor.is_open(),
        };
        let page_before = self.state.deck.navigation().current_page();
        if self
            .state
            .deck
            .navigation_mut()
            .handle_key(nav_key, ctx)
            .prevent_default
        {
            self.after_page_change(page_before);
            return vec![];
        }

        self.grid.handle_key(key, &self.state)
    }

    // ── Mouse handling ────────────────────────────────────────────────────────

    fn handle_mouse(&mut self, event: MouseEvent) -> Vec<Action> {
        if self.editor.is_open() || self.help_overlay.visible {
            return vec![];
        }
        // Terminals do not report side buttons; horizontal scroll stands in.
        match event.kind {
            MouseEventKind::ScrollLeft => return vec![Action::PointerButton(POINTER_BACK)],
            MouseEventKind::ScrollRight => return vec![Action::PointerButton(POINTER_FORWARD)],
            MouseEventKind::ScrollUp => return vec![Action::PrevPage],
            MouseEventKind::ScrollDown => return vec![Action::NextPage],
            _ => {}
        }

        let (col, row) = (event.column, event.row);
        let areas = self.areas;
        if hit(areas.grid, col, row) {
            return self.grid.handle_mouse(event, areas.grid, &self.state);
        }
        if event.kind == MouseEventKind::Moved && self.state.hovered.is_some() {
            return vec![Action::HoverChannel(None)];
        }
        if hit(areas.page_nav, col, row) {
            return self.page_nav.handle_mouse(event, areas.page_nav, &self.state);
        }
        vec![]
    }

    // ── Action dispatcher ─────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        let secondary: Vec<Action> = {
            let s = &self.state;
            let mut out = Vec::new();
            out.extend(self.editor.on_action(&action, s));
            out.extend(self.help_overlay.on_action(&action, s));
            out.extend(self.grid.on_action(&action, s));
            out
        };

        self.apply_action(action);

        for a in secondary {
            self.apply_action(a);
        }
        self.sync_input_mode();
    }

    fn apply_action(&mut self, action: Action) {
        match action {
            Action::SelectSlot(slot) => {
                self.state.selected = slot;
                self.state.clamp_selection();
            }
            Action::HoverChannel(Some(id)) => {
                let eff = self.state.deck.effective(&id);
                if eff.is_empty() {
                    self.sounds.stop_all_sounds();
                } else {
                    self.sounds.play_channel_hover(eff.hover_sound.as_ref());
                }
                self.state.hovered = Some(id);
            }
            Action::HoverChannel(None) => {
                self.state.hovered = None;
                self.sounds.stop_all_sounds();
            }
            Action::ActivateChannel(id) => self.activate(id),

            Action::OpenEditor(_) | Action::CloseEditor | Action::ToggleHelp | Action::Noop => {}
            Action::SaveChannel(id, draft) => match self.state.deck.save_channel(&id, draft) {
                Ok(()) => {
                    self.toast.success(format!("saved {}", id));
                    self.dispatch(Action::CloseEditor);
                }
                Err(e @ DeckError::InvalidPath { .. }) => self.toast.warning(e.user_message()),
                Err(e) => {
                    self.toast.error(e.user_message());
                    self.dispatch(Action::CloseEditor);
                }
            },
            Action::ClearChannel(id) => match self.state.deck.clear_channel(&id) {
                Ok(()) => self.toast.info(format!("cleared {}", id)),
                Err(e) => self.toast.error(e.user_message()),
            },
            Action::ApplyNextPreset => self.apply_next_preset(),
            Action::RestoreUserChannels => match self.state.deck.restore_user_channels() {
                Ok(true) => {
                    self.next_preset = 0;
                    self.toast.success("restored your channels");
                }
                Ok(false) => self.toast.info("no preset applied"),
                Err(e) => self.toast.error(e.user_message()),
            },

            Action::PrevPage => self.change_page(|nav| nav.prev_page()),
            Action::NextPage => self.change_page(|nav| nav.next_page()),
            Action::GoToPage(page) => self.change_page(|nav| nav.go_to_page(page)),
            Action::PointerButton(code) => {
                self.change_page(|nav| nav.handle_pointer_button(code).prevent_default)
            }

            Action::CopyToClipboard(text) => {
                match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(text.clone())) {
                    Ok(()) => {
                        let display = if text.chars().count() > 40 {
                            format!("{}…", text.chars().take(40).collect::<String>())
                        } else {
                            text.clone()
                        };
                        self.toast.success(format!("copied: {}", display));
                    }
                    Err(e) => {
                        warn!("clipboard error: {}", e);
                        self.toast.error(format!("clipboard error: {}", e));
                    }
                }
            }
            Action::Quit => self.should_quit = true,
        }
    }

    fn activate(&mut self, id: String) {
        match self.state.deck.launch_route(&id) {
            Ok(route) => {
                self.sounds.play_channel_click();
                self.toast.info(format!("launching {}", route.target()));
                self.dispatcher.dispatch(&id, route);
            }
            Err(LaunchError::Empty { .. }) => self.dispatch(Action::OpenEditor(id)),
            Err(e) => {
                warn!("not launching: {}", e);
                self.toast.warning(e.to_string());
            }
        }
    }

    fn apply_next_preset(&mut self) {
        let count = self.state.deck.presets().len();
        if count == 0 {
            self.toast.info("no presets found");
            return;
        }
        let index = self.next_preset % count;
        match self.state.deck.apply_preset_at(index) {
            Ok(Some(name)) => {
                self.next_preset = index + 1;
                self.toast.success(format!("preset: {}", name));
            }
            Ok(None) => {}
            Err(e) => self.toast.error(e.user_message()),
        }
    }

    fn change_page(&mut self, f: impl FnOnce(&mut NavigationController) -> bool) {
        let before = self.state.deck.navigation().current_page();
        f(self.state.deck.navigation_mut());
        self.after_page_change(before);
    }

    fn after_page_change(&mut self, before: usize) {
        if self.state.deck.navigation().current_page() == before {
            return;
        }
        self.state.clamp_selection();
        if self.state.hovered.take().is_some() {
            self.sounds.stop_all_sounds();
        }
    }

    fn sync_input_mode(&mut self) {
        self.state.input_mode = if self.editor.is_open() {
            InputMode::Edit
        } else if self.help_overlay.visible {
            InputMode::Help
        } else {
            InputMode::Normal
        };
    }

    // ── Drawing ───────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut ratatui::Frame) {
        use ratatui::widgets::Block;
        let area = frame.area();
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(self.grid.min_height()),
                Constraint::Length(self.page_nav.min_height()),
                Constraint::Length(1),
            ])
            .split(area);

        self.draw_header(frame, outer[0]);

        self.areas.grid = outer[1];
        self.grid.draw(frame, outer[1], true, &self.state);
        self.areas.page_nav = outer[2];
        self.page_nav.draw(frame, outer[2], false, &self.state);

        let nav = self.state.deck.navigation();
        status_bar::draw_keys_bar(
            frame,
            outer[3],
            self.state.input_mode,
            Some((nav.current_page(), nav.total_pages())),
        );

        self.editor.draw(frame, area, true, &self.state);
        self.help_overlay.draw(frame, area, false, &self.state);
        // Above the status bar.
        self.toast.draw(
            frame,
            Rect {
                height: area.height.saturating_sub(1),
                ..area
            },
        );
    }

    fn draw_header(&self, frame: &mut ratatui::Frame, area: Rect) {
        let store = self.state.deck.store();
        let mut spans = vec![
            Span::styled(
                " chdeck ",
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("{} channels configured", store.configured_count()),
                Style::default().fg(C_MUTED),
            ),
        ];
        if store.has_user_backup() {
            spans.push(Span::styled(
                "  · preset active (u restores)",
                Style::default().fg(C_ADMIN),
            ));
        }
        if let Some(id) = &self.state.hovered {
            spans.push(Span::styled(
                format!("  · {}", id),
                Style::default().fg(C_MUTED),
            ));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}
