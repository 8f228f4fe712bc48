//! ChannelEditor component: modal form over one channel's draft.
//!
//! The draft is seeded from the deck when the editor opens and only written
//! back through `Action::SaveChannel`.  Save is refused while the path fails
//! validation; the reason is shown under the path field.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Clear, Paragraph},
    Frame,
};

use deck_proto::channel::{ChannelDraft, ChannelType, KenBurnsMode, MediaItem, Override};
use deck_proto::validate::{validate, Validation};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{type_color, C_ADMIN, C_ERROR, C_MUTED, C_PRIMARY, C_SECONDARY, C_TOAST_SUCCESS},
    widgets::{
        pane_chrome::{centered_rect, popup_chrome},
        text_field::{FieldAction, TextField},
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Row {
    Type,
    Path,
    Media,
    Admin,
    Animated,
    KenBurns,
    KenBurnsMode,
    Save,
}

const ROWS: [Row; 8] = [
    Row::Type,
    Row::Path,
    Row::Media,
    Row::Admin,
    Row::Animated,
    Row::KenBurns,
    Row::KenBurnsMode,
    Row::Save,
];

impl Row {
    fn label(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Path => "path",
            Self::Media => "media",
            Self::Admin => "run as admin",
            Self::Animated => "animate on hover",
            Self::KenBurns => "ken burns",
            Self::KenBurnsMode => "ken burns mode",
            Self::Save => "",
        }
    }
}

struct Session {
    id: String,
    draft: ChannelDraft,
    row: Row,
    path: TextField,
    media: TextField,
    validation: Validation,
    /// Elevation the slot resolves to while the draft leaves it unset.
    inherited_admin: bool,
}

impl Session {
    fn new(id: String, draft: ChannelDraft, inherited_admin: bool) -> Self {
        let mut path = TextField::new(path_placeholder(draft.kind));
        path.set_value(&draft.path);
        let mut media = TextField::new("image or video path");
        if let Some(m) = &draft.media {
            media.set_value(&m.url);
        }
        let validation = validate(draft.kind, &draft.path);
        Self {
            id,
            draft,
            row: Row::Type,
            path,
            media,
            validation,
            inherited_admin,
        }
    }

    fn as_admin(&self) -> bool {
        self.draft.as_admin.unwrap_or(self.inherited_admin)
    }

    /// Media follows the field and is only written on save.
    fn set_media(&mut self, location: &str) {
        let location = location.trim();
        if location.is_empty() {
            self.draft.media = None;
        } else if self.draft.media.as_ref().map_or(true, |m| m.url != location) {
            self.draft.media = Some(MediaItem::from_location(location).into());
        }
    }

    /// Rows shown for the current type; admin only applies to executables.
    fn rows(&self) -> impl Iterator<Item = Row> + '_ {
        ROWS.into_iter()
            .filter(move |r| *r != Row::Admin || self.draft.kind == ChannelType::Exe)
    }

    fn step(&mut self, forward: bool) {
        let rows: Vec<Row> = self.rows().collect();
        let pos = rows.iter().position(|r| *r == self.row).unwrap_or(0);
        let next = if forward {
            (pos + 1) % rows.len()
        } else {
            (pos + rows.len() - 1) % rows.len()
        };
        self.row = rows[next];
    }

    fn revalidate(&mut self) {
        self.validation = validate(self.draft.kind, &self.draft.path);
    }

    fn set_kind(&mut self, kind: ChannelType) {
        self.draft.kind = kind;
        self.path = {
            let mut field = TextField::new(path_placeholder(kind));
            field.set_value(&self.draft.path);
            field
        };
        self.revalidate();
    }

    fn save(&self) -> Vec<Action> {
        if !self.validation.is_ok() {
            return vec![];
        }
        vec![Action::SaveChannel(self.id.clone(), self.draft.clone())]
    }
}

fn path_placeholder(kind: ChannelType) -> &'static str {
    match kind {
        ChannelType::Exe => "C:\\Games\\App.exe --args",
        ChannelType::Url => "https://example.com",
        ChannelType::Steam => "steam://rungameid/252950",
        ChannelType::Epic => "com.epicgames.launcher://apps/Fortnite?action=launch&silent=true",
        ChannelType::MicrosoftStore => "Publisher.App_8wekyb3d8bbwe!App",
    }
}

fn override_label(value: Override<bool>) -> &'static str {
    match value {
        Override::Inherit => "global",
        Override::Set(true) => "on",
        Override::Set(false) => "off",
    }
}

fn mode_label(value: Override<KenBurnsMode>) -> &'static str {
    match value {
        Override::Inherit => "global",
        Override::Set(mode) => mode.as_str(),
    }
}

pub struct ChannelEditor {
    session: Option<Session>,
}

impl ChannelEditor {
    pub fn new() -> Self {
        Self { session: None }
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }
}

impl Default for ChannelEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for ChannelEditor {
    fn id(&self) -> ComponentId {
        ComponentId::ChannelEditor
    }

    fn handle_key(&mut self, key: KeyEvent, _state: &AppState) -> Vec<Action> {
        let Some(s) = self.session.as_mut() else {
            return vec![];
        };

        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return s.save();
        }
        match key.code {
            KeyCode::Esc => return vec![Action::CloseEditor],
            KeyCode::Tab | KeyCode::Down => {
                s.step(true);
                return vec![];
            }
            KeyCode::BackTab | KeyCode::Up => {
                s.step(false);
                return vec![];
            }
            _ => {}
        }

        let toggle = matches!(
            key.code,
            KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Left | KeyCode::Right
        );
        match s.row {
            Row::Type => match key.code {
                KeyCode::Left => s.set_kind(s.draft.kind.prev()),
                KeyCode::Right | KeyCode::Char(' ') | KeyCode::Enter => {
                    s.set_kind(s.draft.kind.next())
                }
                _ => {}
            },
            Row::Path => match s.path.handle_key(key) {
                FieldAction::Changed(text) => {
                    s.draft.path = text;
                    s.revalidate();
                }
                FieldAction::Submitted => s.step(true),
                FieldAction::None => {}
            },
            Row::Media => match s.media.handle_key(key) {
                FieldAction::Changed(text) => s.set_media(&text),
                FieldAction::Submitted => s.step(true),
                FieldAction::None => {}
            },
            Row::Admin if toggle => s.draft.as_admin = Some(!s.as_admin()),
            Row::Animated if toggle => s.draft.animated_on_hover = s.draft.animated_on_hover.cycle(),
            Row::KenBurns if toggle => s.draft.ken_burns_enabled = s.draft.ken_burns_enabled.cycle(),
            Row::KenBurnsMode if toggle => s.draft.ken_burns_mode = s.draft.ken_burns_mode.cycle(),
            Row::Save if key.code == KeyCode::Enter => return s.save(),
            _ => {}
        }
        vec![]
    }

    fn handle_mouse(&mut self, _event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn on_action(&mut self, action: &Action, state: &AppState) -> Vec<Action> {
        match action {
            Action::OpenEditor(id) => {
                tracing::debug!("editing {}", id);
                self.session = Some(Session::new(
                    id.clone(),
                    state.deck.draft_for(id),
                    state.deck.effective(id).as_admin,
                ));
            }
            Action::CloseEditor => self.session = None,
            _ => {}
        }
        vec![]
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, _state: &AppState) {
        let Some(s) = self.session.as_ref() else {
            return;
        };
        let popup = centered_rect(70, 16, area);
        frame.render_widget(Clear, popup);
        let title = format!("edit {}", s.id);
        let block = popup_chrome(&title);
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let label_w = 18u16;
        let mut y = inner.y + 1;
        let bottom = inner.y + inner.height;
        for row in s.rows() {
            if y >= bottom {
                break;
            }
            let active = row == s.row;
            let label_style = if active {
                Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_SECONDARY)
            };
            let marker = if active { "›" } else { " " };
            let label_area = Rect::new(inner.x, y, label_w.min(inner.width), 1);
            let value_area = Rect::new(
                inner.x + label_w,
                y,
                inner.width.saturating_sub(label_w + 1),
                1,
            );

            if row != Row::Save {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!("{} {:<16}", marker, row.label()),
                        label_style,
                    )),
                    label_area,
                );
            }

            let chip = |text: &str, color| {
                Paragraph::new(Line::from(Span::styled(
                    format!("‹ {} ›", text),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                )))
            };
            match row {
                Row::Type => frame.render_widget(
                    chip(s.draft.kind.label(), type_color(s.draft.kind)),
                    value_area,
                ),
                Row::Path => {
                    s.path.draw(frame, value_area, active);
                    y += 1;
                    let (text, color) = match s.validation.reason() {
                        Some(reason) => (format!("✗ {}", reason), C_ERROR),
                        None if s.draft.path.trim().is_empty() => (String::new(), C_MUTED),
                        None => ("✓".to_string(), C_TOAST_SUCCESS),
                    };
                    frame.render_widget(
                        Paragraph::new(Span::styled(text, Style::default().fg(color))),
                        Rect::new(value_area.x, y, value_area.width, 1),
                    );
                }
                Row::Media => s.media.draw(frame, value_area, active),
                Row::Admin => {
                    let (text, color) = if s.as_admin() {
                        ("yes", C_ADMIN)
                    } else {
                        ("no", C_SECONDARY)
                    };
                    frame.render_widget(chip(text, color), value_area);
                }
                Row::Animated => frame.render_widget(
                    chip(override_label(s.draft.animated_on_hover), C_PRIMARY),
                    value_area,
                ),
                Row::KenBurns => frame.render_widget(
                    chip(override_label(s.draft.ken_burns_enabled), C_PRIMARY),
                    value_area,
                ),
                Row::KenBurnsMode => frame.render_widget(
                    chip(mode_label(s.draft.ken_burns_mode), C_PRIMARY),
                    value_area,
                ),
                Row::Save => {
                    y += 1;
                    let style = if !s.validation.is_ok() {
                        Style::default().fg(C_MUTED)
                    } else if active {
                        Style::default().fg(C_TOAST_SUCCESS).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(C_SECONDARY)
                    };
                    frame.render_widget(
                        Paragraph::new(Span::styled(format!("{} [ save ]", marker), style)),
                        Rect::new(inner.x, y.min(bottom.saturating_sub(1)), inner.width, 1),
                    );
                }
            }
            y += 1;
        }
    }

    fn min_height(&self) -> u16 {
        16
    }
}
