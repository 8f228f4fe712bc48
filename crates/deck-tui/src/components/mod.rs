pub mod channel_editor;
pub mod channel_grid;
pub mod help_overlay;
pub mod page_nav;
