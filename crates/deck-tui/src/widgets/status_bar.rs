//! Status bar: bottom line with input mode, page position and keybindings.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::theme::{C_MODE_EDIT, C_MODE_NORMAL, C_MUTED, C_SECONDARY};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    /// Channel editor open; keys go to its fields.
    Edit,
    Help,
}

impl InputMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "GRID",
            Self::Edit => "EDIT",
            Self::Help => "HELP",
        }
    }

    pub fn color(self) -> ratatui::style::Color {
        match self {
            Self::Normal | Self::Help => C_MODE_NORMAL,
            Self::Edit => C_MODE_EDIT,
        }
    }

    pub fn keys(self) -> &'static str {
        match self {
            Self::Normal => {
                " hjkl/↑↓ select  ←→ page  1-9 jump  Enter launch  e edit  x clear  p preset  u restore  y copy  ? help  q quit"
            }
            Self::Edit => {
                " Tab/↑↓ field  ←→/Space change  Enter apply  Ctrl-S save  Esc cancel"
            }
            Self::Help => " ? / Esc close",
        }
    }
}

/// Draw the keybindings footer bar (one row).
pub fn draw_keys_bar(frame: &mut Frame, area: Rect, mode: InputMode, page: Option<(usize, usize)>) {
    let mut spans = vec![Span::styled(
        format!(" {} ", mode.label()),
        Style::default()
            .fg(mode.color())
            .add_modifier(Modifier::BOLD),
    )];
    if let Some((current, total)) = page {
        spans.push(Span::styled(
            format!("{}/{}", current + 1, total),
            Style::default().fg(C_SECONDARY),
        ));
    }
    spans.push(Span::raw(" "));
    spans.push(Span::styled(mode.keys(), Style::default().fg(C_MUTED)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
