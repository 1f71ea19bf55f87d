//! SM-2 (SuperMemo 2) spaced repetition with flexible spacing.
//!
//! Three ratings drive the schedule:
//! - wrong: repetitions and interval reset, the card comes back after one minute
//! - hard: progresses like a success, but the ease factor drops by 0.15 (floor 1.3)
//!   and the new interval is cut to 80%
//! - easy: progresses and the ease factor grows by 0.15
//!
//! Successful reviews follow the classic 1 day → 6 days → interval × EF ladder.
//! A review made before the scheduled date only earns credit for the days that
//! actually elapsed.

use super::{Flashcard, Rating, ReviewLog};

pub const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Delay before a card rated wrong is due again.
pub const RELEARN_DELAY_MS: i64 = 60_000;

pub const MIN_EASE_FACTOR: f64 = 1.3;

const EASE_STEP: f64 = 0.15;
const HARD_INTERVAL_FACTOR: f64 = 0.8;

/// Computes the card state after a review at `now` (epoch ms).
///
/// With `sync_with_srs` false the review is practice only: the error flag and
/// history change, the schedule does not.
pub fn process_review(card: &Flashcard, rating: Rating, sync_with_srs: bool, now: i64) -> Flashcard {
    let mut next = card.clone();

    if !sync_with_srs {
        next.is_flagged_error = rating != Rating::Easy;
        next.history.push(ReviewLog {
            date: now,
            rating,
            interval: card.interval,
        });
        return next;
    }

    let days_since_last_review = if card.last_review_date > 0 {
        ((now - card.last_review_date) as f64 / MS_PER_DAY as f64).max(0.0)
    } else {
        0.0
    };

    let mut interval = card.interval;
    let mut repetitions = card.repetitions;
    let mut ease_factor = card.ease_factor;

    if rating == Rating::Wrong {
        repetitions = 0;
        interval = 0;
    } else {
        let mut effective_interval = interval;
        if days_since_last_review < interval as f64 && interval > 1 {
            effective_interval = (days_since_last_review.round() as i64).max(1);
        }

        interval = match repetitions {
            0 => 1,
            1 => 6,
            _ => (effective_interval as f64 * ease_factor).round() as i64,
        };
        repetitions += 1;
    }

    match rating {
        Rating::Hard => {
            ease_factor = (ease_factor - EASE_STEP).max(MIN_EASE_FACTOR);
            if interval > 1 {
                interval = ((interval as f64 * HARD_INTERVAL_FACTOR).round() as i64).max(1);
            }
        }
        Rating::Easy => ease_factor += EASE_STEP,
        Rating::Wrong => {}
    }

    next.interval = interval;
    next.repetitions = repetitions;
    next.ease_factor = ease_factor;
    next.next_review = if interval == 0 {
        now + RELEARN_DELAY_MS
    } else {
        now + interval * MS_PER_DAY
    };
    next.last_review_date = now;
    next.is_flagged_error = rating != Rating::Easy;
    next.history.push(ReviewLog {
        date: now,
        rating,
        interval,
    });

    next
}
