//! HelpOverlay component: centered popup with keyboard shortcut reference.

use ratatui::crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph, Wrap},
    Frame,
};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_MUTED, C_PRIMARY, C_SECONDARY},
    widgets::pane_chrome::{centered_rect, popup_chrome},
};

pub struct HelpOverlay {
    pub visible: bool,
}

impl HelpOverlay {
    pub fn new() -> Self {
        Self { visible: false }
    }
}

impl Default for HelpOverlay {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for HelpOverlay {
    fn id(&self) -> ComponentId {
        ComponentId::HelpOverlay
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        if !self.visible {
            return vec![];
        }
        match key.code {
            KeyCode::Char('?') | KeyCode::Char('q') | KeyCode::Esc => vec![Action::ToggleHelp],
            // Consume all keys while overlay is open
            _ => vec![Action::Noop],
        }
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, action: &Action, _state: &AppState) -> Vec<Action> {
        if let Action::ToggleHelp = action {
            self.visible = !self.visible;
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        if !self.visible {
            return;
        }

        let popup = centered_rect(64, 30, area);
        let nav = state.deck.navigation();

        let help_lines: Vec<Line> = vec![
            section(" channels"),
            help_row("h j k l / ↑ ↓", "move selection on the page"),
            help_row("enter / click", "launch (empty slot: edit)"),
            help_row("e / right-click", "edit selected channel"),
            help_row("x", "clear selected channel"),
            help_row("y", "copy selected channel's path"),
            Line::from(""),
            section(" pages"),
            help_row("← / →", "previous / next page"),
            help_row("home / end", "first / last page"),
            help_row("1 … 9", "jump to page"),
            help_row("wheel / side btns", "previous / next page"),
            Line::from(""),
            section(" presets"),
            help_row("p", "apply next preset"),
            help_row("u", "restore your own channels"),
            Line::from(""),
            section(" editor"),
            help_row("tab / ↑ ↓", "move between fields"),
            help_row("← → / space", "change type or toggle"),
            help_row("enter", "apply media / save on save row"),
            help_row("ctrl+s", "save (blocked while path invalid)"),
            help_row("esc", "discard and close"),
            Line::from(""),
            help_row("?", "toggle this help overlay"),
            help_row("q / ctrl+c", "quit"),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    " {} pages of {} · {} configured",
                    nav.total_pages(),
                    nav.geometry().channels_per_page(),
                    state.deck.store().configured_count()
                ),
                Style::default().fg(C_MUTED),
            )),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(help_lines)
                .block(popup_chrome("keys"))
                .wrap(Wrap { trim: false }),
            popup,
        );
    }
}

fn section(title: &str) -> Line<'_> {
    Line::from(Span::styled(
        title,
        Style::default().fg(C_MUTED).add_modifier(Modifier::BOLD),
    ))
}

fn help_row<'a>(key: &'a str, desc: &'a str) -> Line<'a> {
    Line::from(vec![
        Span::raw(" "),
        Span::styled(
            format!("{:<18}", key),
            Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD),
        ),
        Span::styled(desc, Style::default().fg(C_SECONDARY)),
    ])
}
