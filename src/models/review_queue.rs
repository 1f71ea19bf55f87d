//! Read-only views over a set of cards: what is due, what goes into a custom
//! error-review deck, and the review calendar.

use super::{Flashcard, Rating};
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewOrder {
    Newest,
    Oldest,
    #[default]
    Random,
}

impl fmt::Display for ReviewOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ReviewOrder::Newest => "newest",
            ReviewOrder::Oldest => "oldest",
            ReviewOrder::Random => "random",
        };
        f.write_str(s)
    }
}

impl FromStr for ReviewOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "newest" => Ok(ReviewOrder::Newest),
            "oldest" => Ok(ReviewOrder::Oldest),
            "random" => Ok(ReviewOrder::Random),
            other => Err(format!("unknown order '{}'", other)),
        }
    }
}

/// Settings for an error-review deck.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomReviewConfig {
    pub count: usize,
    pub order: ReviewOrder,
    #[serde(default)]
    pub include_hard: bool,
}

/// Counters shown next to the deck.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DeckStats {
    pub pending: usize,
    pub errors: usize,
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalendarEntry<'a> {
    pub card: &'a Flashcard,
    pub overdue: bool,
}

/// Cards with `next_review <= now`, most overdue first.
pub fn get_due_flashcards(cards: &[Flashcard], now: i64) -> Vec<Flashcard> {
    let mut due: Vec<Flashcard> = cards.iter().filter(|c| c.is_due(now)).cloned().collect();
    due.sort_by_key(|c| c.next_review);
    due
}

/// Flagged cards, plus cards whose latest review was hard when `include_hard` is set.
pub fn get_custom_review_deck(cards: &[Flashcard], config: &CustomReviewConfig) -> Vec<Flashcard> {
    let mut deck: Vec<Flashcard> = cards
        .iter()
        .filter(|c| {
            c.is_flagged_error || (config.include_hard && c.last_rating() == Some(Rating::Hard))
        })
        .cloned()
        .collect();

    match config.order {
        ReviewOrder::Newest => deck.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        ReviewOrder::Oldest => deck.sort_by_key(|c| c.created_at),
        ReviewOrder::Random => deck.shuffle(&mut rand::thread_rng()),
    }

    deck.truncate(config.count);
    deck
}

pub fn deck_stats(cards: &[Flashcard], now: i64) -> DeckStats {
    DeckStats {
        pending: cards.iter().filter(|c| c.is_due(now)).count(),
        errors: cards.iter().filter(|c| c.is_flagged_error).count(),
        total: cards.len(),
    }
}

/// Every card ordered by its next review.
pub fn review_calendar(cards: &[Flashcard], now: i64) -> Vec<CalendarEntry<'_>> {
    let mut entries: Vec<CalendarEntry> = cards
        .iter()
        .map(|card| CalendarEntry {
            card,
            overdue: card.next_review < now,
        })
        .collect();
    entries.sort_by_key(|e| e.card.next_review);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Question, ReviewLog};
    use std::collections::HashSet;

    fn card(id: &str, created_at: i64, next_review: i64, flagged: bool) -> Flashcard {
        let mut card = Flashcard::new(
            id.to_string(),
            Question {
                question_text: format!("question {}", id),
                ..Default::default()
            },
            "doc",
            "Doc.pdf",
            created_at,
        );
        card.next_review = next_review;
        card.is_flagged_error = flagged;
        card
    }

    fn with_history(mut card: Flashcard, ratings: &[Rating]) -> Flashcard {
        for (i, rating) in ratings.iter().enumerate() {
            card.history.push(ReviewLog {
                date: i as i64,
                rating: *rating,
                interval: 1,
            });
        }
        card
    }

    fn ids(cards: &[Flashcard]) -> Vec<&str> {
        cards.iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn test_due_cards_sorted_and_bounded() {
        let cards = vec![
            card("a", 0, 50, false),
            card("b", 0, 10, false),
            card("c", 0, 101, false),
            card("d", 0, 100, false),
        ];

        let due = get_due_flashcards(&cards, 100);
        assert_eq!(ids(&due), vec!["b", "a", "d"]);
        assert!(due.iter().all(|c| c.next_review <= 100));
    }

    #[test]
    fn test_custom_deck_oldest_first_two() {
        let cards: Vec<Flashcard> = (1..=5)
            .rev()
            .map(|t| card(&format!("c{}", t), t, 0, true))
            .collect();
        let config = CustomReviewConfig {
            count: 2,
            order: ReviewOrder::Oldest,
            include_hard: false,
        };

        let deck = get_custom_review_deck(&cards, &config);
        assert_eq!(ids(&deck), vec!["c1", "c2"]);
    }

    #[test]
    fn test_custom_deck_newest_first() {
        let cards: Vec<Flashcard> = (1..=4).map(|t| card(&format!("c{}", t), t, 0, true)).collect();
        let config = CustomReviewConfig {
            count: 3,
            order: ReviewOrder::Newest,
            include_hard: false,
        };

        assert_eq!(ids(&get_custom_review_deck(&cards, &config)), vec!["c4", "c3", "c2"]);
    }

    #[test]
    fn test_custom_deck_hard_uses_latest_entry_only() {
        let cards = vec![
            with_history(card("recent-hard", 1, 0, false), &[Rating::Easy, Rating::Hard]),
            with_history(card("old-hard", 2, 0, false), &[Rating::Hard, Rating::Easy]),
            card("flagged", 3, 0, true),
            card("clean", 4, 0, false),
        ];
        let mut config = CustomReviewConfig {
            count: 10,
            order: ReviewOrder::Oldest,
            include_hard: true,
        };

        assert_eq!(ids(&get_custom_review_deck(&cards, &config)), vec!["recent-hard", "flagged"]);

        config.include_hard = false;
        assert_eq!(ids(&get_custom_review_deck(&cards, &config)), vec!["flagged"]);
    }

    #[test]
    fn test_custom_deck_random_keeps_membership() {
        let cards: Vec<Flashcard> = (1..=6)
            .map(|t| card(&format!("c{}", t), t, 0, t % 2 == 0))
            .collect();
        let config = CustomReviewConfig {
            count: 100,
            order: ReviewOrder::Random,
            include_hard: false,
        };

        let deck = get_custom_review_deck(&cards, &config);
        let got: HashSet<&str> = ids(&deck).into_iter().collect();
        let expected: HashSet<&str> = ["c2", "c4", "c6"].into_iter().collect();
        assert_eq!(deck.len(), 3);
        assert_eq!(got, expected);

        let config = CustomReviewConfig { count: 2, ..config };
        assert_eq!(get_custom_review_deck(&cards, &config).len(), 2);
    }

    #[test]
    fn test_custom_deck_zero_count_is_empty() {
        let cards = vec![card("a", 1, 0, true)];
        let config = CustomReviewConfig {
            count: 0,
            order: ReviewOrder::Newest,
            include_hard: true,
        };

        assert!(get_custom_review_deck(&cards, &config).is_empty());
    }

    #[test]
    fn test_stats_and_calendar() {
        let cards = vec![
            card("later", 0, 500, false),
            card("overdue", 0, 10, true),
            card("now", 0, 100, true),
        ];

        assert_eq!(
            deck_stats(&cards, 100),
            DeckStats {
                pending: 2,
                errors: 2,
                total: 3
            }
        );

        let calendar = review_calendar(&cards, 100);
        let order: Vec<(&str, bool)> = calendar.iter().map(|e| (e.card.id.as_str(), e.overdue)).collect();
        assert_eq!(order, vec![("overdue", true), ("now", false), ("later", false)]);
    }

    #[test]
    fn test_order_parse() {
        assert_eq!("OLDEST".parse::<ReviewOrder>(), Ok(ReviewOrder::Oldest));
        assert!("sideways".parse::<ReviewOrder>().is_err());
    }
}
