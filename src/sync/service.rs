//! Runs one sync: local snapshot + remote snapshot → merged truth on both sides.
use super::merge::merge_at;
use super::remote::RemoteStore;
use crate::database::db;
use crate::error::Result;
use log::info;
use rusqlite::Connection;

/// Summary of a finished sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// False on the first sync, when the local snapshot was only uploaded.
    pub remote_existed: bool,
    pub flashcards: usize,
    pub folders: usize,
    pub documents: usize,
    pub timestamp: i64,
}

/// Owns the local database and the remote. `sync` takes `&mut self`, so at most
/// one sync runs at a time against a given pair.
pub struct SyncService<R: RemoteStore> {
    conn: Connection,
    remote: R,
}

impl<R: RemoteStore> SyncService<R> {
    pub fn new(conn: Connection, remote: R) -> Self {
        Self { conn, remote }
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn sync(&mut self, now: i64) -> Result<SyncReport> {
        let local = db::load_snapshot(&self.conn, now)?;

        let (snapshot, remote_existed) = match self.remote.fetch()? {
            Some(remote) => {
                info!(
                    "Sync: merging {} local and {} remote cards",
                    local.flashcards.len(),
                    remote.flashcards.len()
                );
                (merge_at(&local, &remote, now), true)
            }
            None => {
                info!("Sync: no remote snapshot, uploading local data");
                (local, false)
            }
        };

        db::replace_snapshot(&mut self.conn, &snapshot)?;
        db::set_last_sync(&self.conn, snapshot.timestamp)?;
        self.remote.replace(&snapshot)?;

        let report = SyncReport {
            remote_existed,
            flashcards: snapshot.flashcards.len(),
            folders: snapshot.folders.len(),
            documents: snapshot.progress.len(),
            timestamp: snapshot.timestamp,
        };
        info!("Sync: done ({} cards)", report.flashcards);
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Deck, Folder, GamificationState, Question, Rating, SyncData};
    use crate::sync::remote::{FileRemote, MemoryRemote};

    fn question(text: &str) -> Question {
        Question {
            question_text: text.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_first_sync_uploads_local() {
        let mut conn = db::open_in_memory().unwrap();
        let mut deck = Deck::default();
        deck.add_error(&question("Q1"), "doc", "Doc.pdf", 1);
        db::save_flashcards(&mut conn, &deck.flashcards).unwrap();

        let mut service = SyncService::new(conn, MemoryRemote::default());
        let report = service.sync(500).unwrap();

        assert!(!report.remote_existed);
        assert_eq!(report.flashcards, 1);
        let uploaded = service.remote().snapshot.clone().unwrap();
        assert_eq!(uploaded.flashcards, deck.flashcards);
        assert_eq!(uploaded.timestamp, 500);
        assert_eq!(db::last_sync(service.conn()).unwrap(), Some(500));
    }

    #[test]
    fn test_sync_merges_both_ways() {
        let mut local_deck = Deck::default();
        let shared = local_deck.add_error(&question("shared"), "doc", "Doc.pdf", 1);
        local_deck.add_error(&question("local only"), "doc", "Doc.pdf", 2);

        let mut remote_deck = Deck::new(local_deck.flashcards.clone());
        remote_deck.remove_flashcard(&local_deck.flashcards[1].id.clone());
        remote_deck.process_review(&shared, Rating::Easy, true, 1_000);
        let remote_only = remote_deck.add_error(&question("remote only"), "doc2", "Other.pdf", 3);

        let mut conn = db::open_in_memory().unwrap();
        db::save_flashcards(&mut conn, &local_deck.flashcards).unwrap();
        db::save_gamification(
            &conn,
            &GamificationState {
                xp: 10,
                total_correct_answers: 8,
                ..Default::default()
            },
        )
        .unwrap();
        db::save_folders(&conn, &[Folder::new("f1", "Local name")]).unwrap();

        let remote = MemoryRemote {
            snapshot: Some(SyncData {
                timestamp: 7,
                gamification: GamificationState {
                    xp: 30,
                    total_correct_answers: 5,
                    ..Default::default()
                },
                folders: vec![Folder::new("f1", "Remote name"), Folder::new("f2", "Other")],
                flashcards: remote_deck.flashcards.clone(),
                ..Default::default()
            }),
        };

        let mut service = SyncService::new(conn, remote);
        let report = service.sync(2_000).unwrap();
        assert!(report.remote_existed);
        assert_eq!(report.flashcards, 3);
        assert_eq!(report.folders, 2);

        let local = db::load_snapshot(service.conn(), 2_000).unwrap();
        let uploaded = service.remote().snapshot.clone().unwrap();
        assert_eq!(local, uploaded);

        let merged = Deck::new(local.flashcards);
        assert_eq!(merged.get(&shared).unwrap().last_review_date, 1_000);
        assert!(merged.get(&remote_only).is_some());
        assert_eq!(local.gamification.xp, 30);
        assert_eq!(local.gamification.total_correct_answers, 8);
        assert_eq!(local.folders[0].name, "Local name");
    }

    #[test]
    fn test_sync_through_file_remote_is_stable() {
        let dir = tempfile::tempdir().unwrap();
        let remote_path = dir.path().join("kian_app_data.json");

        let mut conn = db::open_in_memory().unwrap();
        let mut deck = Deck::default();
        deck.add_error(&question("Q1"), "doc", "Doc.pdf", 1);
        db::save_flashcards(&mut conn, &deck.flashcards).unwrap();

        let mut service = SyncService::new(conn, FileRemote::new(remote_path.clone()));
        service.sync(10).unwrap();
        let first = db::load_snapshot(service.conn(), 0).unwrap();

        let report = service.sync(20).unwrap();
        assert!(report.remote_existed);
        let second = db::load_snapshot(service.conn(), 0).unwrap();
        assert_eq!(first, second);
        assert_eq!(db::last_sync(service.conn()).unwrap(), Some(20));
    }
}
