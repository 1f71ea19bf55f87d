//! Local SQLite persistence.
//!
//! Cards live one per row in `flashcards`, with schedule fields as columns and the
//! question payload and history as JSON. Gamification, progress and folders are
//! stored whole as JSON values in the `app_state` key/value table.

use crate::error::{Result, StoreError};
use crate::models::{Flashcard, Folder, GamificationState, ProgressData, SyncData};
use log::{debug, info};
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;

const GAMIFICATION_KEY: &str = "gamification";
const PROGRESS_KEY: &str = "progress";
const FOLDERS_KEY: &str = "folders";
const LAST_SYNC_KEY: &str = "last_sync";

/// Opens (or creates) the database file and its tables.
pub fn init_database(path: &Path) -> Result<Connection> {
    let conn = Connection::open(path)?;
    create_tables(&conn)?;
    info!("Opened database '{}'", path.display());
    Ok(conn)
}

/// Opens a throwaway in-memory database with the tables created.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    create_tables(&conn)?;
    Ok(conn)
}

fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS flashcards (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            source_pdf_id TEXT NOT NULL,
            source_pdf_name TEXT NOT NULL,
            question TEXT NOT NULL,
            created_at INTEGER NOT NULL,
            next_review INTEGER NOT NULL,
            last_review_date INTEGER NOT NULL DEFAULT 0,
            interval_days INTEGER NOT NULL DEFAULT 0,
            ease_factor REAL NOT NULL DEFAULT 2.5,
            repetitions INTEGER NOT NULL DEFAULT 0,
            is_flagged_error INTEGER NOT NULL DEFAULT 1,
            history TEXT NOT NULL DEFAULT '[]'
        )",
        (),
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS app_state (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        (),
    )?;

    Ok(())
}

fn insert_card(tx: &Transaction, card: &Flashcard, position: i64) -> Result<()> {
    tx.execute(
        "INSERT INTO flashcards (id, position, source_pdf_id, source_pdf_name, question, created_at,
             next_review, last_review_date, interval_days, ease_factor, repetitions, is_flagged_error, history)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
         ON CONFLICT(id) DO UPDATE SET
             source_pdf_id = excluded.source_pdf_id,
             source_pdf_name = excluded.source_pdf_name,
             question = excluded.question,
             created_at = excluded.created_at,
             next_review = excluded.next_review,
             last_review_date = excluded.last_review_date,
             interval_days = excluded.interval_days,
             ease_factor = excluded.ease_factor,
             repetitions = excluded.repetitions,
             is_flagged_error = excluded.is_flagged_error,
             history = excluded.history",
        params![
            card.id,
            position,
            card.source_pdf_id,
            card.source_pdf_name,
            serde_json::to_string(&card.question)?,
            card.created_at,
            card.next_review,
            card.last_review_date,
            card.interval,
            card.ease_factor,
            card.repetitions,
            card.is_flagged_error,
            serde_json::to_string(&card.history)?,
        ],
    )?;
    Ok(())
}

fn read_card(row: &Row) -> rusqlite::Result<(Flashcard, String, String)> {
    let question: String = row.get(3)?;
    let history: String = row.get(11)?;
    let card = Flashcard {
        id: row.get(0)?,
        question: Default::default(),
        source_pdf_id: row.get(1)?,
        source_pdf_name: row.get(2)?,
        created_at: row.get(4)?,
        next_review: row.get(5)?,
        last_review_date: row.get(6)?,
        interval: row.get(7)?,
        ease_factor: row.get(8)?,
        repetitions: row.get(9)?,
        is_flagged_error: row.get(10)?,
        history: Vec::new(),
    };
    Ok((card, question, history))
}

/// Loads every card in insertion order.
pub fn load_flashcards(conn: &Connection) -> Result<Vec<Flashcard>> {
    let mut stmt = conn.prepare(
        "SELECT id, source_pdf_id, source_pdf_name, question, created_at, next_review, last_review_date,
                interval_days, ease_factor, repetitions, is_flagged_error, history
         FROM flashcards
         ORDER BY position ASC",
    )?;

    let rows = stmt
        .query_map([], read_card)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    rows.into_iter()
        .map(|(mut card, question, history)| -> Result<Flashcard> {
            card.question = serde_json::from_str(&question)?;
            card.history = serde_json::from_str(&history)?;
            Ok(card)
        })
        .collect()
}

/// Replaces the stored deck with `cards`.
pub fn save_flashcards(conn: &mut Connection, cards: &[Flashcard]) -> Result<()> {
    let tx = conn.transaction()?;
    write_flashcards(&tx, cards)?;
    tx.commit()?;
    debug!("Saved {} cards", cards.len());
    Ok(())
}

fn write_flashcards(tx: &Transaction, cards: &[Flashcard]) -> Result<()> {
    tx.execute("DELETE FROM flashcards", ())?;
    for (position, card) in cards.iter().enumerate() {
        insert_card(tx, card, position as i64)?;
    }
    Ok(())
}

/// Inserts a new card at the end of the deck or updates an existing one in place.
pub fn upsert_flashcard(conn: &mut Connection, card: &Flashcard) -> Result<()> {
    let tx = conn.transaction()?;
    let position: i64 = tx.query_row(
        "SELECT COALESCE(
             (SELECT position FROM flashcards WHERE id = ?1),
             (SELECT COALESCE(MAX(position) + 1, 0) FROM flashcards))",
        params![card.id],
        |row| row.get(0),
    )?;
    insert_card(&tx, card, position)?;
    tx.commit()?;
    Ok(())
}

/// Fetches one card, or `CardNotFound`.
pub fn get_flashcard(conn: &Connection, card_id: &str) -> Result<Flashcard> {
    load_flashcards(conn)?
        .into_iter()
        .find(|c| c.id == card_id)
        .ok_or_else(|| StoreError::CardNotFound(card_id.to_string()))
}

/// Deletes one card; `CardNotFound` when no row matched.
pub fn delete_flashcard(conn: &Connection, card_id: &str) -> Result<()> {
    let deleted = conn.execute("DELETE FROM flashcards WHERE id = ?1", params![card_id])?;
    if deleted == 0 {
        return Err(StoreError::CardNotFound(card_id.to_string()));
    }
    Ok(())
}

fn get_state<T: DeserializeOwned>(conn: &Connection, key: &str) -> Result<Option<T>> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM app_state WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        Some(json) => Ok(Some(serde_json::from_str(&json)?)),
        None => Ok(None),
    }
}

fn put_state<T: Serialize>(conn: &Connection, key: &str, value: &T) -> Result<()> {
    conn.execute(
        "INSERT INTO app_state (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, serde_json::to_string(value)?],
    )?;
    Ok(())
}

/// Loads the gamification state, defaulting when none is stored.
pub fn load_gamification(conn: &Connection) -> Result<GamificationState> {
    Ok(get_state(conn, GAMIFICATION_KEY)?.unwrap_or_default())
}

/// Stores the gamification state.
pub fn save_gamification(conn: &Connection, state: &GamificationState) -> Result<()> {
    put_state(conn, GAMIFICATION_KEY, state)
}

/// Loads per-document progress keyed by document id.
pub fn load_progress(conn: &Connection) -> Result<BTreeMap<String, ProgressData>> {
    Ok(get_state(conn, PROGRESS_KEY)?.unwrap_or_default())
}

/// Stores per-document progress.
pub fn save_progress(conn: &Connection, progress: &BTreeMap<String, ProgressData>) -> Result<()> {
    put_state(conn, PROGRESS_KEY, progress)
}

/// Loads all folders.
pub fn load_folders(conn: &Connection) -> Result<Vec<Folder>> {
    Ok(get_state(conn, FOLDERS_KEY)?.unwrap_or_default())
}

/// Stores all folders.
pub fn save_folders(conn: &Connection, folders: &[Folder]) -> Result<()> {
    put_state(conn, FOLDERS_KEY, &folders)
}

/// Epoch ms of the last completed sync, if any.
pub fn last_sync(conn: &Connection) -> Result<Option<i64>> {
    get_state(conn, LAST_SYNC_KEY)
}

/// Records the timestamp of a completed sync.
pub fn set_last_sync(conn: &Connection, timestamp: i64) -> Result<()> {
    put_state(conn, LAST_SYNC_KEY, &timestamp)
}

/// Builds a snapshot of everything stored locally, stamped with `now`.
pub fn load_snapshot(conn: &Connection, now: i64) -> Result<SyncData> {
    Ok(SyncData {
        timestamp: now,
        gamification: load_gamification(conn)?,
        progress: load_progress(conn)?,
        folders: load_folders(conn)?,
        flashcards: load_flashcards(conn)?,
    })
}

/// Replaces all local data with `snapshot` in a single transaction.
/// Leaves `last_sync` untouched.
pub fn replace_snapshot(conn: &mut Connection, snapshot: &SyncData) -> Result<()> {
    let tx = conn.transaction()?;
    put_state(&tx, GAMIFICATION_KEY, &snapshot.gamification)?;
    put_state(&tx, PROGRESS_KEY, &snapshot.progress)?;
    put_state(&tx, FOLDERS_KEY, &snapshot.folders)?;
    write_flashcards(&tx, &snapshot.flashcards)?;
    tx.commit()?;

    info!(
        "Replaced local data: {} cards, {} folders, {} documents",
        snapshot.flashcards.len(),
        snapshot.folders.len(),
        snapshot.progress.len()
    );
    Ok(())
}
