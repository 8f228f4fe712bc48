//! Action enum: all user-initiated intents and internal events.

use deck_proto::channel::ChannelDraft;

/// Unique identifier for a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentId {
    ChannelGrid,
    PageNav,
    ChannelEditor,
    HelpOverlay,
}

/// All actions that can flow through the system.
/// Components produce Actions; the App dispatches them.
#[derive(Debug, Clone)]
pub enum Action {
    // ── Grid ─────────────────────────────────────────────────────────────────
    /// Select a slot on the current page (0-based, row-major).
    SelectSlot(usize),
    /// Pointer entered a channel (`None` = left the grid).
    HoverChannel(Option<String>),
    ActivateChannel(String),

    // ── Editing ──────────────────────────────────────────────────────────────
    OpenEditor(String),
    CloseEditor,
    SaveChannel(String, ChannelDraft),
    ClearChannel(String),
    ApplyNextPreset,
    RestoreUserChannels,

    // ── Paging ───────────────────────────────────────────────────────────────
    PrevPage,
    NextPage,
    GoToPage(usize),
    /// Raw pointer button code (3 = back, 4 = forward).
    PointerButton(u16),

    // ── UI / system ──────────────────────────────────────────────────────────
    ToggleHelp,
    CopyToClipboard(String),
    Quit,
    Noop,
}
