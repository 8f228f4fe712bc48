//! Color palette and style constants for the channel deck.

use ratatui::style::{Color, Style};

use deck_proto::channel::ChannelType;

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(18, 18, 18);
pub const C_ACCENT: Color = Color::Rgb(95, 175, 255);
pub const C_ERROR: Color = Color::Rgb(255, 80, 80);
pub const C_MUTED: Color = Color::Rgb(72, 72, 88);
pub const C_SECONDARY: Color = Color::Rgb(115, 115, 138);
pub const C_PRIMARY: Color = Color::Rgb(210, 210, 225);
pub const C_FADED: Color = Color::Rgb(52, 52, 64);
pub const C_PANEL_BORDER: Color = Color::Rgb(40, 40, 52);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(120, 100, 200);
pub const C_TILE_BORDER: Color = Color::Rgb(60, 60, 76);
pub const C_TILE_EMPTY: Color = Color::Rgb(34, 34, 44);
pub const C_POPUP_BG: Color = Color::Rgb(18, 18, 26);
pub const C_INPUT_BG: Color = Color::Rgb(20, 20, 32);
pub const C_INPUT_FG: Color = Color::Rgb(255, 200, 80);
pub const C_ADMIN: Color = Color::Rgb(255, 184, 80);
pub const C_GLOW: Color = Color::Rgb(170, 220, 255);
pub const C_TOAST_INFO: Color = Color::Rgb(80, 160, 220);
pub const C_TOAST_SUCCESS: Color = Color::Rgb(80, 200, 120);
pub const C_TOAST_WARNING: Color = Color::Rgb(255, 184, 80);
pub const C_TOAST_ERROR: Color = Color::Rgb(255, 95, 95);
pub const C_MODE_NORMAL: Color = Color::Rgb(115, 115, 138);
pub const C_MODE_EDIT: Color = Color::Rgb(255, 200, 80);

/// Badge colour per launch type.
pub fn type_color(kind: ChannelType) -> Color {
    match kind {
        ChannelType::Exe => Color::Rgb(180, 120, 220),
        ChannelType::Url => Color::Rgb(80, 140, 200),
        ChannelType::Steam => Color::Rgb(100, 160, 130),
        ChannelType::Epic => Color::Rgb(200, 200, 200),
        ChannelType::MicrosoftStore => Color::Rgb(80, 200, 120),
    }
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_muted() -> Style {
    Style::default().fg(C_MUTED)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

pub fn style_input() -> Style {
    Style::default().fg(C_INPUT_FG).bg(C_INPUT_BG)
}
