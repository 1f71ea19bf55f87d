//! Gamification counters kept per device and merged on sync.
use super::unique::deserialize_unique;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_THEME_ID: &str = "theme-kian-dark";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReadProgress {
    #[serde(default)]
    pub read_pages: BTreeSet<u32>,
    #[serde(default)]
    pub total_pages: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BadgeUnlock {
    pub id: String,
    pub timestamp: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GamificationState {
    pub level_index: u32,
    pub xp: u64,
    pub tokens: u64,
    pub active_theme: String,
    #[serde(deserialize_with = "deserialize_unique")]
    pub unlocked_themes: Vec<String>,
    pub last_session_date: Option<String>,
    pub study_streak: u32,
    #[serde(deserialize_with = "deserialize_unique")]
    pub unlocked_badges: Vec<String>,
    pub pages_read_per_pdf: BTreeMap<String, PageReadProgress>,
    pub completed_pages_per_pdf: BTreeMap<String, BTreeSet<u32>>,
    pub total_correct_answers: u64,
    pub total_questions_answered: u64,
    pub correct_streak: u32,
    pub incorrect_streak: u32,
    pub badges_unlocked_this_session: Vec<BadgeUnlock>,
    pub session_start_timestamp: i64,
    pub max_correct_answers_in_a_day: u64,
    #[serde(deserialize_with = "deserialize_unique")]
    pub pdfs_with_questions_generated: Vec<String>,
    pub night_owl_streak: u32,
    pub early_bird_streak: u32,
    pub last_streak_broken_date: Option<String>,
    pub correct_answers_today: u64,
    pub questions_answered_this_session: u64,
    /// Seconds.
    pub session_duration_today: u64,
}

impl Default for GamificationState {
    fn default() -> Self {
        Self {
            level_index: 0,
            xp: 0,
            tokens: 0,
            active_theme: DEFAULT_THEME_ID.to_string(),
            unlocked_themes: vec![DEFAULT_THEME_ID.to_string()],
            last_session_date: None,
            study_streak: 0,
            unlocked_badges: Vec::new(),
            pages_read_per_pdf: BTreeMap::new(),
            completed_pages_per_pdf: BTreeMap::new(),
            total_correct_answers: 0,
            total_questions_answered: 0,
            correct_streak: 0,
            incorrect_streak: 0,
            badges_unlocked_this_session: Vec::new(),
            session_start_timestamp: 0,
            max_correct_answers_in_a_day: 0,
            pdfs_with_questions_generated: Vec::new(),
            night_owl_streak: 0,
            early_bird_streak: 0,
            last_streak_broken_date: None,
            correct_answers_today: 0,
            questions_answered_this_session: 0,
            session_duration_today: 0,
        }
    }
}
