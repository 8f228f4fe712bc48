//! AppState: shared read-only data passed to all components during render/event.
//!
//! The App event-loop is the only thing that writes to AppState.

use deck_proto::channel::channel_id;
use deck_proto::Deck;

use crate::idle::IdlePulse;
use crate::widgets::status_bar::InputMode;

pub struct AppState {
    pub deck: Deck,
    pub input_mode: InputMode,
    /// Selected slot on the current page (row-major).
    pub selected: usize,
    /// Channel under the pointer.
    pub hovered: Option<String>,
    pub idle: Option<IdlePulse>,
    pub faded: bool,
}

impl AppState {
    pub fn new(deck: Deck) -> Self {
        Self {
            deck,
            input_mode: InputMode::Normal,
            selected: 0,
            hovered: None,
            idle: None,
            faded: false,
        }
    }

    /// Absolute index of the selected slot.
    pub fn selected_index(&self) -> usize {
        let nav = self.deck.navigation();
        nav.channel_index_range(nav.current_page()).start + self.selected
    }

    pub fn selected_id(&self) -> String {
        channel_id(self.selected_index())
    }

    /// Keep the selection inside the current page's slot count.
    pub fn clamp_selection(&mut self) {
        let nav = self.deck.navigation();
        let len = nav.channel_index_range(nav.current_page()).len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }
}
