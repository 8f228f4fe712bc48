//! PageNav component: page chrome under the grid.
//!
//! `Dots` timing renders one dot per page; `Wii` renders side buttons with
//! a page counter.  Nothing is drawn when the controller hides its chrome.

use ratatui::crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use deck_proto::navigation::{Direction, TransitionTiming};

use crate::{
    action::{Action, ComponentId},
    app_state::AppState,
    component::Component,
    theme::{C_ACCENT, C_FADED, C_MUTED, C_PRIMARY, C_SECONDARY},
};

pub struct PageNav {
    /// Clickable regions from the last draw.
    targets: Vec<(Rect, Action)>,
}

impl PageNav {
    pub fn new() -> Self {
        Self {
            targets: Vec::new(),
        }
    }

    fn draw_dots(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let nav = state.deck.navigation();
        let total = nav.total_pages();
        let width = (total * 2).saturating_sub(1) as u16;
        let mut x = area.x + area.width.saturating_sub(width) / 2;

        let mut spans = Vec::with_capacity(total * 2);
        for page in 0..total {
            let current = page == nav.current_page();
            let (glyph, color) = match (current, state.faded) {
                (_, true) => ("·", C_FADED),
                (true, false) => ("●", C_ACCENT),
                (false, false) => ("○", C_MUTED),
            };
            if page > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(glyph, Style::default().fg(color)));
            if x < area.x + area.width {
                self.targets.push((Rect::new(x, area.y, 1, 1), Action::GoToPage(page)));
            }
            x += 2;
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            area,
        );
    }

    fn draw_side_buttons(&mut self, frame: &mut Frame, area: Rect, state: &AppState) {
        let nav = state.deck.navigation();
        let current = nav.current_page();
        let last = nav.total_pages() - 1;
        let arrow_style = |enabled: bool, lit: bool| {
            if state.faded || !enabled {
                Style::default().fg(C_FADED)
            } else if lit {
                Style::default().fg(C_ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(C_PRIMARY)
            }
        };
        let moving = nav.direction();

        let left = Rect::new(area.x, area.y, 3.min(area.width), 1);
        frame.render_widget(
            Paragraph::new(Span::styled(
                " ◀ ",
                arrow_style(current > 0, moving == Some(Direction::Left)),
            )),
            left,
        );
        let right_x = area.x + area.width.saturating_sub(3);
        let right = Rect::new(right_x, area.y, 3.min(area.width), 1);
        frame.render_widget(
            Paragraph::new(Span::styled(
                " ▶ ",
                arrow_style(current < last, moving == Some(Direction::Right)),
            )),
            right,
        );
        let counter = format!("page {}/{}", current + 1, last + 1);
        frame.render_widget(
            Paragraph::new(Span::styled(counter, Style::default().fg(C_SECONDARY)))
                .alignment(Alignment::Center),
            area,
        );

        self.targets.push((left, Action::PrevPage));
        self.targets.push((right, Action::NextPage));
    }
}

impl Default for PageNav {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for PageNav {
    fn id(&self) -> ComponentId {
        ComponentId::PageNav
    }

    fn handle_key(&mut self, _key: KeyEvent, _state: &AppState) -> Vec<Action> {
        vec![]
    }

    fn handle_mouse(&mut self, event: MouseEvent, _area: Rect, _state: &AppState) -> Vec<Action> {
        if event.kind != MouseEventKind::Down(MouseButton::Left) {
            return vec![];
        }
        self.targets
            .iter()
            .find(|(r, _)| {
                event.column >= r.x
                    && event.column < r.x + r.width
                    && event.row >= r.y
                    && event.row < r.y + r.height
            })
            .map(|(_, action)| vec![action.clone()])
            .unwrap_or_default()
    }

    fn draw(&mut self, frame: &mut Frame, area: Rect, _focused: bool, state: &AppState) {
        self.targets.clear();
        let nav = state.deck.navigation();
        if !nav.chrome_visible() || area.height == 0 || area.width < 9 {
            return;
        }
        match nav.timing() {
            TransitionTiming::Dots => self.draw_dots(frame, area, state),
            TransitionTiming::Wii => self.draw_side_buttons(frame, area, state),
        }
    }

    fn min_height(&self) -> u16 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::KeyModifiers;

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn test_click_hits_target() {
        let mut nav = PageNav::new();
        nav.targets.push((Rect::new(0, 5, 3, 1), Action::PrevPage));
        nav.targets.push((Rect::new(20, 5, 3, 1), Action::NextPage));
        let deck = deck_proto::Deck::load(
            &deck_proto::config::Config::default(),
            Box::new(deck_proto::repository::MemoryRepository::default()),
            Default::default(),
        )
        .unwrap();
        let state = AppState::new(deck);
        let area = Rect::new(0, 5, 23, 1);
        assert!(matches!(
            nav.handle_mouse(click(21, 5), area, &state)[..],
            [Action::NextPage]
        ));
        assert!(nav.handle_mouse(click(10, 5), area, &state).is_empty());
    }
}
