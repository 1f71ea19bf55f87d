pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod models;
pub mod sync;

pub use error::{Result, StoreError};
pub use models::{Deck, Flashcard, Rating, SyncData};
