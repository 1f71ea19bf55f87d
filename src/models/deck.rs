//! Deck is the user's whole set of flashcards. It owns card creation, removal and
//! reviews; scheduling itself is delegated to [`sm2::process_review`].
use super::review_queue::{self, CalendarEntry, CustomReviewConfig, DeckStats};
use super::{CardFace, Flashcard, Question, Rating, sm2};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Feedback the caller plays after a review.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReviewCue {
    Success,
    Failure,
}

impl ReviewCue {
    pub fn for_rating(rating: Rating) -> Self {
        if rating == Rating::Wrong {
            ReviewCue::Failure
        } else {
            ReviewCue::Success
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub flashcards: Vec<Flashcard>,
}

impl Deck {
    pub fn new(flashcards: Vec<Flashcard>) -> Self {
        Self { flashcards }
    }

    pub fn len(&self) -> usize {
        self.flashcards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flashcards.is_empty()
    }

    pub fn get(&self, card_id: &str) -> Option<&Flashcard> {
        self.flashcards.iter().find(|c| c.id == card_id)
    }

    /// Records a question the user got wrong.
    ///
    /// A card for the same document and question text is re-flagged instead of
    /// duplicated. Returns the id of the new or existing card.
    pub fn add_error(&mut self, question: &Question, pdf_id: &str, pdf_name: &str, now: i64) -> String {
        if let Some(existing) = self
            .flashcards
            .iter_mut()
            .find(|c| c.source_pdf_id == pdf_id && c.question.question_text == question.question_text)
        {
            existing.is_flagged_error = true;
            debug!("Re-flagged existing card {}", existing.id);
            return existing.id.clone();
        }

        let mut clean = question.clone();
        clean.user_answer = None;

        let id = format!("{}-{}", pdf_id, Uuid::new_v4());
        self.flashcards
            .push(Flashcard::new(id.clone(), clean, pdf_id, pdf_name, now));
        info!("Added error card {} from '{}'", id, pdf_name);
        id
    }

    /// Adds a hand-written front/back card. Returns `None` when the document
    /// already has a card with the same question text or front.
    pub fn add_manual_flashcard(
        &mut self,
        question: &Question,
        face: CardFace,
        pdf_id: &str,
        pdf_name: &str,
        now: i64,
    ) -> Option<String> {
        let exists = self.flashcards.iter().any(|c| {
            c.source_pdf_id == pdf_id
                && (c.question.question_text == question.question_text
                    || c.question.flashcard.as_ref().map(|f| f.front.as_str()) == Some(face.front.as_str()))
        });
        if exists {
            debug!("Manual card for '{}' already exists", face.front);
            return None;
        }

        let mut clean = question.clone();
        clean.user_answer = None;
        clean.flashcard = Some(face);

        let id = format!("{}-manual-{}", pdf_id, Uuid::new_v4());
        let mut card = Flashcard::new(id.clone(), clean, pdf_id, pdf_name, now);
        card.is_flagged_error = false;
        self.flashcards.push(card);
        info!("Added manual card {} from '{}'", id, pdf_name);
        Some(id)
    }

    pub fn remove_flashcard(&mut self, card_id: &str) -> bool {
        let before = self.flashcards.len();
        self.flashcards.retain(|c| c.id != card_id);
        before != self.flashcards.len()
    }

    /// Replaces every card, e.g. after a sync.
    pub fn import_flashcards(&mut self, cards: Vec<Flashcard>) {
        info!("Imported {} cards", cards.len());
        self.flashcards = cards;
    }

    /// Reviews the card with `card_id`. An unknown id leaves the deck untouched
    /// and returns `None`.
    pub fn process_review(
        &mut self,
        card_id: &str,
        rating: Rating,
        sync_with_srs: bool,
        now: i64,
    ) -> Option<ReviewCue> {
        let card = self.flashcards.iter_mut().find(|c| c.id == card_id)?;
        *card = sm2::process_review(card, rating, sync_with_srs, now);
        debug!(
            "Reviewed {} as {} (interval {}d, reps {}, ef {:.2})",
            card.id, rating, card.interval, card.repetitions, card.ease_factor
        );
        Some(ReviewCue::for_rating(rating))
    }

    pub fn due(&self, now: i64) -> Vec<Flashcard> {
        review_queue::get_due_flashcards(&self.flashcards, now)
    }

    pub fn custom_review_deck(&self, config: &CustomReviewConfig) -> Vec<Flashcard> {
        review_queue::get_custom_review_deck(&self.flashcards, config)
    }

    pub fn stats(&self, now: i64) -> DeckStats {
        review_queue::deck_stats(&self.flashcards, now)
    }

    pub fn calendar(&self, now: i64) -> Vec<CalendarEntry<'_>> {
        review_queue::review_calendar(&self.flashcards, now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::review_queue::ReviewOrder;

    fn question(text: &str) -> Question {
        Question {
            question_text: text.to_string(),
            correct_answer: "B".to_string(),
            justification_anchor: "p. 4".to_string(),
            user_answer: Some("A".to_string()),
            ..Default::default()
        }
    }

    fn face(front: &str) -> CardFace {
        CardFace {
            front: front.to_string(),
            back: "back".to_string(),
        }
    }

    #[test]
    fn test_add_error_strips_answer_and_dedups() {
        let mut deck = Deck::default();
        let id = deck.add_error(&question("Q1"), "doc", "Doc.pdf", 100);

        let card = deck.get(&id).unwrap();
        assert!(id.starts_with("doc-"));
        assert!(card.question.user_answer.is_none());
        assert_eq!(card.next_review, 100);
        assert!(card.is_flagged_error);

        deck.process_review(&id, Rating::Easy, true, 200);
        assert!(!deck.get(&id).unwrap().is_flagged_error);

        let again = deck.add_error(&question("Q1"), "doc", "Doc.pdf", 300);
        assert_eq!(again, id);
        assert_eq!(deck.len(), 1);
        assert!(deck.get(&id).unwrap().is_flagged_error);

        deck.add_error(&question("Q1"), "other-doc", "Other.pdf", 300);
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_add_manual_flashcard() {
        let mut deck = Deck::default();
        let id = deck
            .add_manual_flashcard(&question("Q1"), face("Front"), "doc", "Doc.pdf", 10)
            .unwrap();

        let card = deck.get(&id).unwrap();
        assert!(id.starts_with("doc-manual-"));
        assert!(card.is_manual());
        assert!(!card.is_flagged_error);

        assert!(deck
            .add_manual_flashcard(&question("Q1"), face("Other front"), "doc", "Doc.pdf", 11)
            .is_none());
        assert!(deck
            .add_manual_flashcard(&question("Q2"), face("Front"), "doc", "Doc.pdf", 12)
            .is_none());
        assert!(deck
            .add_manual_flashcard(&question("Q2"), face("Front"), "doc2", "Doc2.pdf", 13)
            .is_some());
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_review_unknown_card_is_noop() {
        let mut deck = Deck::default();
        deck.add_error(&question("Q1"), "doc", "Doc.pdf", 0);
        let before = deck.clone();

        assert_eq!(deck.process_review("missing", Rating::Wrong, true, 5), None);
        assert_eq!(deck, before);
    }

    #[test]
    fn test_review_cue_follows_rating() {
        let mut deck = Deck::default();
        let id = deck.add_error(&question("Q1"), "doc", "Doc.pdf", 0);

        assert_eq!(deck.process_review(&id, Rating::Wrong, true, 1), Some(ReviewCue::Failure));
        assert_eq!(deck.process_review(&id, Rating::Hard, false, 2), Some(ReviewCue::Success));
        assert_eq!(deck.get(&id).unwrap().history.len(), 2);
    }

    #[test]
    fn test_remove_and_import() {
        let mut deck = Deck::default();
        let a = deck.add_error(&question("Q1"), "doc", "Doc.pdf", 0);
        deck.add_error(&question("Q2"), "doc", "Doc.pdf", 0);

        assert!(deck.remove_flashcard(&a));
        assert!(!deck.remove_flashcard(&a));
        assert_eq!(deck.len(), 1);

        deck.import_flashcards(Vec::new());
        assert!(deck.is_empty());
    }

    #[test]
    fn test_queries_delegate_to_cards() {
        let mut deck = Deck::default();
        let a = deck.add_error(&question("Q1"), "doc", "Doc.pdf", 1);
        let b = deck.add_error(&question("Q2"), "doc", "Doc.pdf", 2);
        deck.process_review(&a, Rating::Easy, true, 10);

        let due: Vec<String> = deck.due(10).into_iter().map(|c| c.id).collect();
        assert_eq!(due, vec![b.clone()]);

        let config = CustomReviewConfig {
            count: 5,
            order: ReviewOrder::Newest,
            include_hard: false,
        };
        let flagged: Vec<String> = deck.custom_review_deck(&config).into_iter().map(|c| c.id).collect();
        assert_eq!(flagged, vec![b]);

        let stats = deck.stats(10);
        assert_eq!((stats.pending, stats.errors, stats.total), (1, 1, 2));
        assert_eq!(deck.calendar(10).len(), 2);
    }
}
