//! Reading and question progress snapshot for one document.
use super::Question;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressData {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub current_page: u32,
    #[serde(default = "default_scale")]
    pub scale: f64,
    /// Generated questions keyed by page number.
    #[serde(default)]
    pub questions_by_page: BTreeMap<String, Vec<Question>>,
    #[serde(default)]
    pub session_errors: Vec<Question>,
    /// When this snapshot was taken; the epoch when absent.
    #[serde(default)]
    pub session_date: DateTime<Utc>,
    #[serde(default)]
    pub study_time_in_seconds: u64,
    #[serde(default)]
    pub questions_answered: u32,
    #[serde(default)]
    pub flashcards_created: u32,
    #[serde(default)]
    pub pages_completed: u32,
}

fn default_scale() -> f64 {
    1.0
}

impl ProgressData {
    pub fn new(file_name: &str, total_pages: u32, session_date: DateTime<Utc>) -> Self {
        Self {
            file_name: file_name.to_string(),
            total_pages,
            current_page: 1,
            scale: default_scale(),
            questions_by_page: BTreeMap::new(),
            session_errors: Vec::new(),
            session_date,
            study_time_in_seconds: 0,
            questions_answered: 0,
            flashcards_created: 0,
            pages_completed: 0,
        }
    }
}
