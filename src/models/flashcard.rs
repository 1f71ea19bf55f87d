//! Flashcard is a generated exam question (or a manual front/back pair) plus its
//! spaced repetition schedule and review history.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Ease factor given to every new card.
pub const DEFAULT_EASE_FACTOR: f64 = 2.5;

/// Outcome of a single review.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rating {
    Wrong,
    Hard,
    Easy,
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Rating::Wrong => "wrong",
            Rating::Hard => "hard",
            Rating::Easy => "easy",
        };
        f.write_str(s)
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "wrong" => Ok(Rating::Wrong),
            "hard" => Ok(Rating::Hard),
            "easy" => Ok(Rating::Easy),
            other => Err(format!("unknown rating '{}'", other)),
        }
    }
}

/// Manually authored front/back pair.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardFace {
    pub front: String,
    pub back: String,
}

/// Exam-style question as produced from a page of text.
///
/// Keys keep the names used by the question generator (`question_text`, ...).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub correct_answer: String,
    #[serde(default)]
    pub justification_anchor: String,
    #[serde(
        default,
        rename = "userAnswer",
        skip_serializing_if = "Option::is_none"
    )]
    pub user_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flashcard: Option<CardFace>,
}

/// One entry of a card's review history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReviewLog {
    pub date: i64,
    pub rating: Rating,
    pub interval: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub id: String,
    pub question: Question,
    pub source_pdf_id: String,
    #[serde(default)]
    pub source_pdf_name: String,
    #[serde(default)]
    pub created_at: i64,
    /// Epoch ms; the card is due once this is <= now.
    #[serde(default)]
    pub next_review: i64,
    /// Epoch ms, 0 when the card was never reviewed.
    #[serde(default)]
    pub last_review_date: i64,
    /// Days.
    #[serde(default)]
    pub interval: i64,
    #[serde(default = "default_ease_factor")]
    pub ease_factor: f64,
    #[serde(default)]
    pub repetitions: u32,
    #[serde(default)]
    pub history: Vec<ReviewLog>,
    #[serde(default)]
    pub is_flagged_error: bool,
}

fn default_ease_factor() -> f64 {
    DEFAULT_EASE_FACTOR
}

impl Flashcard {
    /// Creates a never-reviewed card that is due immediately.
    pub fn new(
        id: String,
        question: Question,
        source_pdf_id: &str,
        source_pdf_name: &str,
        now: i64,
    ) -> Self {
        Self {
            id,
            question,
            source_pdf_id: source_pdf_id.to_string(),
            source_pdf_name: source_pdf_name.to_string(),
            created_at: now,
            next_review: now,
            last_review_date: 0,
            interval: 0,
            ease_factor: DEFAULT_EASE_FACTOR,
            repetitions: 0,
            history: Vec::new(),
            is_flagged_error: true,
        }
    }

    /// A card is manual iff it carries a front/back pair.
    pub fn is_manual(&self) -> bool {
        self.question.flashcard.is_some()
    }

    pub fn is_due(&self, now: i64) -> bool {
        self.next_review <= now
    }

    /// Text shown on the front of the card.
    pub fn front_text(&self) -> &str {
        match &self.question.flashcard {
            Some(face) => &face.front,
            None => &self.question.question_text,
        }
    }

    pub fn last_rating(&self) -> Option<Rating> {
        self.history.last().map(|log| log.rating)
    }
}
