//! Reconciles a local and a remote snapshot.
//!
//! Progress never regresses: counters take the maximum, collections take the
//! union. A single flashcard is never blended; the more recently reviewed copy
//! wins whole. Ties go to the local side.

use crate::models::{Flashcard, Folder, GamificationState, PageReadProgress, ProgressData, SyncData};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Merges two snapshots, stamping the result with the current time.
pub fn merge(local: &SyncData, remote: &SyncData) -> SyncData {
    merge_at(local, remote, Utc::now().timestamp_millis())
}

pub fn merge_at(local: &SyncData, remote: &SyncData, now: i64) -> SyncData {
    SyncData {
        timestamp: now,
        gamification: merge_gamification(&local.gamification, &remote.gamification),
        progress: merge_progress(&local.progress, &remote.progress),
        folders: merge_folders(&local.folders, &remote.folders),
        flashcards: merge_flashcards(&local.flashcards, &remote.flashcards),
    }
}

pub fn merge_gamification(local: &GamificationState, remote: &GamificationState) -> GamificationState {
    let base = if local.xp >= remote.xp { local } else { remote };

    GamificationState {
        total_correct_answers: local.total_correct_answers.max(remote.total_correct_answers),
        total_questions_answered: local
            .total_questions_answered
            .max(remote.total_questions_answered),
        max_correct_answers_in_a_day: local
            .max_correct_answers_in_a_day
            .max(remote.max_correct_answers_in_a_day),
        unlocked_themes: union(&local.unlocked_themes, &remote.unlocked_themes),
        unlocked_badges: union(&local.unlocked_badges, &remote.unlocked_badges),
        pdfs_with_questions_generated: union(
            &local.pdfs_with_questions_generated,
            &remote.pdfs_with_questions_generated,
        ),
        pages_read_per_pdf: merge_pages_read(&local.pages_read_per_pdf, &remote.pages_read_per_pdf),
        completed_pages_per_pdf: merge_completed_pages(
            &local.completed_pages_per_pdf,
            &remote.completed_pages_per_pdf,
        ),
        ..base.clone()
    }
}

fn merge_pages_read(
    local: &BTreeMap<String, PageReadProgress>,
    remote: &BTreeMap<String, PageReadProgress>,
) -> BTreeMap<String, PageReadProgress> {
    let mut merged = local.clone();
    for (id, theirs) in remote {
        merged
            .entry(id.clone())
            .and_modify(|ours| {
                ours.read_pages.extend(theirs.read_pages.iter().copied());
                ours.total_pages = ours.total_pages.max(theirs.total_pages);
            })
            .or_insert_with(|| theirs.clone());
    }
    merged
}

fn merge_completed_pages(
    local: &BTreeMap<String, BTreeSet<u32>>,
    remote: &BTreeMap<String, BTreeSet<u32>>,
) -> BTreeMap<String, BTreeSet<u32>> {
    let mut merged = local.clone();
    for (id, pages) in remote {
        merged.entry(id.clone()).or_default().extend(pages.iter().copied());
    }
    merged
}

pub fn merge_progress(
    local: &BTreeMap<String, ProgressData>,
    remote: &BTreeMap<String, ProgressData>,
) -> BTreeMap<String, ProgressData> {
    let mut merged = local.clone();

    for (id, theirs) in remote {
        let Some(ours) = local.get(id) else {
            merged.insert(id.clone(), theirs.clone());
            continue;
        };

        let base = if theirs.session_date > ours.session_date { theirs } else { ours };

        let mut questions_by_page = ours.questions_by_page.clone();
        questions_by_page.extend(
            theirs
                .questions_by_page
                .iter()
                .map(|(page, questions)| (page.clone(), questions.clone())),
        );

        merged.insert(
            id.clone(),
            ProgressData {
                questions_by_page,
                pages_completed: ours.pages_completed.max(theirs.pages_completed),
                questions_answered: ours.questions_answered.max(theirs.questions_answered),
                flashcards_created: ours.flashcards_created.max(theirs.flashcards_created),
                ..base.clone()
            },
        );
    }

    merged
}

/// Folders keyed by id; shared folders keep the local name.
pub fn merge_folders(local: &[Folder], remote: &[Folder]) -> Vec<Folder> {
    let mut merged: Vec<Folder> = local.to_vec();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, folder) in merged.iter().enumerate() {
        index.entry(folder.id.clone()).or_insert(i);
    }

    for folder in remote {
        match index.get(&folder.id).copied() {
            Some(i) => merged[i].files = union(&merged[i].files, &folder.files),
            None => {
                index.insert(folder.id.clone(), merged.len());
                merged.push(folder.clone());
            }
        }
    }

    merged
}

/// Cards keyed by id; the copy with the later `last_review_date` wins whole.
pub fn merge_flashcards(local: &[Flashcard], remote: &[Flashcard]) -> Vec<Flashcard> {
    let mut merged: Vec<Flashcard> = local.to_vec();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (i, card) in merged.iter().enumerate() {
        index.entry(card.id.clone()).or_insert(i);
    }

    for card in remote {
        match index.get(&card.id).copied() {
            Some(i) => {
                if card.last_review_date > merged[i].last_review_date {
                    merged[i] = card.clone();
                }
            }
            None => {
                index.insert(card.id.clone(), merged.len());
                merged.push(card.clone());
            }
        }
    }

    merged
}

/// Order-preserving union: `a` first, then the new items of `b`.
fn union(a: &[String], b: &[String]) -> Vec<String> {
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    a.iter()
        .chain(b.iter())
        .filter(|item| seen.insert(item.as_str()))
        .cloned()
        .collect()
}
