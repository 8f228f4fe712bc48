//! ChannelGrid component: the current page as `columns × rows` tiles.

use std::time::Instant;

use ratatui::crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use deck_proto::channel::{channel_id, KenBurnsMode};
use deck_proto::navigation;
use deck_proto::resolve::EffectiveChannelConfig;

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    idle::{IdleKind, IdlePulse},
    theme::{
        style_focused_border, style_muted, style_secondary, type_color, C_ACCENT, C_ADMIN,
        C_FADED, C_GLOW, C_MUTED, C_PRIMARY, C_TILE_BORDER, C_TILE_EMPTY,
    },
    widgets::pane_chrome::{pane_chrome, tile_chrome, Badge},
};

pub struct ChannelGrid {
    /// Tile rects from the last draw, `(slot, rect)`; used for mouse hits.
    tiles: Vec<(usize, Rect)>,
}

impl ChannelGrid {
    pub fn new() -> Self {
        Self { tiles: Vec::new() }
    }

    fn slot_at(&self, col: u16, row: u16) -> Option<usize> {
        self.tiles
            .iter()
            .find(|(_, r)| col >= r.x && col < r.x + r.width && row >= r.y && row < r.y + r.height)
            .map(|(slot, _)| *slot)
    }

    fn move_selection(&self, state: &AppState, dx: isize, dy: isize) -> Vec<Action> {
        let nav = state.deck.navigation();
        let cols = nav.geometry().columns() as isize;
        let len = nav.channel_index_range(nav.current_page()).len() as isize;
        if len == 0 {
            return vec![];
        }
        let cur = state.selected as isize;
        let col = cur % cols + dx;
        if !(0..cols).contains(&col) {
            return vec![];
        }
        let target = cur + dx + dy * cols;
        if (0..len).contains(&target) {
            vec![Action::SelectSlot(target as usize)]
        } else {
            vec![]
        }
    }
}

impl Default for ChannelGrid {
    fn default() -> Self {
        Self::new()
    }
}

fn slot_id(state: &AppState, slot: usize) -> String {
    let nav = state.deck.navigation();
    channel_id(nav.channel_index_range(nav.current_page()).start + slot)
}

impl Component for ChannelGrid {
    fn id(&self) -> ComponentId {
        ComponentId::ChannelGrid
    }

    fn handle_key(&mut self, key: KeyEvent, state: &AppState) -> Vec<Action> {
        match key.code {
            KeyCode::Char('h') => self.move_selection(state, -1, 0),
            KeyCode::Char('l') => self.move_selection(state, 1, 0),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(state, 0, -1),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(state, 0, 1),
            KeyCode::Enter => vec![Action::ActivateChannel(state.selected_id())],
            _ => vec![],
        }
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, state: &AppState) -> Vec<Action> {
        let hit = self.slot_at(event.column, event.row);
        match event.kind {
            MouseEventKind::Moved => {
                let id = hit.map(|slot| slot_id(state, slot));
                if id != state.hovered {
                    return vec![Action::HoverChannel(id)];
                }
                vec![]
            }
            MouseEventKind::Down(MouseButton::Left) => match hit {
                Some(slot) => vec![
                    Action::SelectSlot(slot),
                    Action::ActivateChannel(slot_id(state, slot)),
                ],
                None => vec![],
            },
            MouseEventKind::Down(MouseButton::Right) => match hit {
                Some(slot) => vec![Action::SelectSlot(slot), Action::OpenEditor(slot_id(state, slot))],
                None => vec![],
            },
            _ => vec![],
        }
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, focused: bool, state: &AppState) {
        let nav = state.deck.navigation();
        let page = nav.current_page();
        let title = match nav.direction() {
            Some(navigation::Direction::Left) => format!(" ◀ channels {} ", page + 1),
            Some(navigation::Direction::Right) => format!(" channels {} ▶ ", page + 1),
            None => format!(" channels {} ", page + 1),
        };
        let block = pane_chrome(&title, focused && !state.faded, None);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        self.tiles.clear();
        let geometry = nav.geometry();
        let (cols, rows) = (geometry.columns(), geometry.rows());
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Ratio(1, rows as u32); rows])
            .split(inner);

        let now = Instant::now();
        for (slot, view) in state.deck.page_slots().iter().enumerate() {
            let (r, c) = (slot / cols, slot % cols);
            let Some(row_area) = row_areas.get(r) else {
                break;
            };
            let col_areas = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
                .split(*row_area);
            let tile_area = col_areas[c];
            self.tiles.push((slot, tile_area));

            let id = view.id();
            let eff = state.deck.effective(&id);
            let pulse = state.idle.filter(|p| p.index == view.index);
            let tile = TileView {
                eff: &eff,
                empty: view.is_empty,
                selected: slot == state.selected,
                hovered: state.hovered.as_deref() == Some(id.as_str()),
                faded: state.faded,
                animating: nav.is_animating(),
                pulse,
            };
            draw_tile(frame, tile_area, &tile, now);
        }
    }

    fn min_height(&self) -> u16 {
        8
    }
}

struct TileView<'a> {
    eff: &'a EffectiveChannelConfig,
    empty: bool,
    selected: bool,
    hovered: bool,
    faded: bool,
    animating: bool,
    pulse: Option<IdlePulse>,
}

fn draw_tile(frame: &mut Frame, area: Rect, view: &TileView<'_>, now: Instant) {
    let eff = view.eff;
    let empty = view.empty;

    let mut border = if view.faded {
        Style::default().fg(C_FADED)
    } else if view.selected {
        style_focused_border()
    } else if view.hovered {
        Style::default().fg(if eff.animated_on_hover { C_GLOW } else { C_ACCENT })
    } else if empty {
        Style::default().fg(C_TILE_EMPTY)
    } else {
        Style::default().fg(C_TILE_BORDER)
    };
    let mut bounce = 0;
    if let Some(p) = view.pulse.filter(|_| !view.faded) {
        let level = p.intensity(now);
        match p.kind {
            IdleKind::Pulse if level > 0.5 => border = border.fg(C_ACCENT),
            IdleKind::Glow => border = border.fg(C_GLOW).add_modifier(Modifier::BOLD),
            IdleKind::Bounce if level > 0.5 => bounce = 1,
            _ => {}
        }
    }

    let marker = if view.selected { "› " } else { "" };
    let title_style = if view.faded || view.animating {
        style_muted()
    } else if view.selected {
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        style_secondary()
    };
    let title = Line::from(Span::styled(
        format!(" {}{} ", marker, eff.id),
        title_style,
    ));

    let mut badges = Vec::new();
    if let Some(kind) = eff.kind.filter(|_| !empty) {
        badges.push(Badge {
            text: kind.badge(),
            color: if view.faded { C_FADED } else { type_color(kind) },
        });
    }
    if eff.as_admin && !empty {
        badges.push(Badge {
            text: "ADMIN",
            color: if view.faded { C_FADED } else { C_ADMIN },
        });
    }

    let block = tile_chrome(title, border, badges);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 {
        return;
    }

    let body = tile_body(eff, view, inner.width as usize);
    let pad = (inner.height as usize).saturating_sub(body.len()) / 2 + bounce;
    let mut lines: Vec<Line> = std::iter::repeat_with(Line::default).take(pad).collect();
    lines.extend(body);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), inner);
}

/// Cut `s` to `width` display columns, marking the cut with `…`.
fn fit(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

fn tile_body<'a>(
    eff: &EffectiveChannelConfig,
    view: &TileView<'_>,
    width: usize,
) -> Vec<Line<'a>> {
    let dim = view.faded || view.animating;
    if view.empty {
        let mut lines = vec![Line::from(Span::styled("+", style_muted()))];
        if let Some(media) = &eff.media {
            lines.push(Line::from(Span::styled(fit(&media.name, width), style_muted())));
        }
        return lines;
    }

    let name_style = if dim {
        style_muted()
    } else {
        Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
    };
    let mut lines = vec![Line::from(Span::styled(
        fit(&eff.title().unwrap_or_default(), width),
        name_style,
    ))];
    if let Some(media) = &eff.media {
        let icon = if media.is_video() { "▶" } else { "▣" };
        lines.push(Line::from(Span::styled(
            format!("{} {}", icon, media.mime),
            Style::default().fg(C_MUTED),
        )));
    }
    if eff.ken_burns_enabled && !dim {
        let active = view.hovered || eff.ken_burns_mode == KenBurnsMode::Autoplay;
        if active {
            lines.push(Line::from(Span::styled(
                format!("~ {} ~", eff.ken_burns_mode.as_str()),
                Style::default().fg(C_GLOW),
            )));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_proto::channel::ChannelMap;
    use deck_proto::config::Config;
    use deck_proto::repository::MemoryRepository;
    use deck_proto::Deck;
    use ratatui::crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use std::collections::HashMap;

    fn state() -> AppState {
        let deck = Deck::load(
            &Config::default(),
            Box::new(MemoryRepository::new(ChannelMap::new())),
            HashMap::new(),
        )
        .unwrap();
        AppState::new(deck)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_selection_moves_within_rows() {
        let mut grid = ChannelGrid::new();
        let mut s = state();
        assert!(matches!(
            grid.handle_key(key(KeyCode::Char('l')), &s)[..],
            [Action::SelectSlot(1)]
        ));
        assert!(grid.handle_key(key(KeyCode::Char('h')), &s).is_empty());
        assert!(matches!(
            grid.handle_key(key(KeyCode::Down), &s)[..],
            [Action::SelectSlot(4)]
        ));
        s.selected = 3;
        assert!(grid.handle_key(key(KeyCode::Char('l')), &s).is_empty());
        s.selected = 9;
        assert!(grid.handle_key(key(KeyCode::Char('j')), &s).is_empty());
    }

    #[test]
    fn test_fit_truncates_by_display_width() {
        assert_eq!(fit("doom.exe", 10), "doom.exe");
        assert_eq!(fit("doom eternal.exe", 6), "doom …");
        assert_eq!(fit("ゲームランチャー", 5), "ゲー…");
    }

    #[test]
    fn test_enter_activates_selected_channel() {
        let mut grid = ChannelGrid::new();
        let mut s = state();
        s.selected = 2;
        let actions = grid.handle_key(key(KeyCode::Enter), &s);
        assert!(matches!(&actions[..], [Action::ActivateChannel(id)] if id == "channel-2"));
    }
}
