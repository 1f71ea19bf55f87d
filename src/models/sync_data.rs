//! Complete transportable snapshot of a user's data.
use super::{Flashcard, Folder, GamificationState, ProgressData};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncData {
    /// Epoch ms at which the snapshot was produced.
    pub timestamp: i64,
    pub gamification: GamificationState,
    /// Keyed by document id.
    pub progress: BTreeMap<String, ProgressData>,
    pub folders: Vec<Folder>,
    pub flashcards: Vec<Flashcard>,
}
