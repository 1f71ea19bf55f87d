pub mod deck;
pub mod flashcard;
pub mod folder;
pub mod gamification;
pub mod progress;
pub mod review_queue;
pub mod sm2;
pub mod sync_data;
pub mod unique;

pub use deck::{Deck, ReviewCue};
pub use flashcard::{CardFace, Flashcard, Question, Rating, ReviewLog};
pub use folder::Folder;
pub use gamification::{GamificationState, PageReadProgress};
pub use progress::ProgressData;
pub use review_queue::{CustomReviewConfig, DeckStats, ReviewOrder};
pub use sync_data::SyncData;
