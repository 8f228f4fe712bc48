//! Channel grid engine: data model, validation, resolution, paging and the
//! launch boundary for the chdeck launcher.

pub mod channel;
pub mod config;
pub mod deck;
pub mod error;
pub mod launch;
pub mod navigation;
pub mod platform;
pub mod repository;
pub mod resolve;
pub mod sound;
pub mod store;
pub mod validate;

pub use deck::Deck;
pub use error::DeckError;
