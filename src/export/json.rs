//! JSON import/export of whole snapshots.
//! The same format is used for backups and for the shared sync blob.

use crate::error::Result;
use crate::models::SyncData;
use log::info;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

/// Writes a snapshot as pretty JSON. The file is written next to `path` first and
/// then renamed over it, so readers never see a half-written snapshot.
pub fn export_snapshot_to_path(snapshot: &SyncData, path: &Path) -> Result<()> {
    let json_string = serde_json::to_string_pretty(snapshot)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("json.tmp");
    let mut file = File::create(&tmp_path)?;
    file.write_all(json_string.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp_path, path)?;

    info!(
        "Exported snapshot with {} cards to '{}'",
        snapshot.flashcards.len(),
        path.display()
    );
    Ok(())
}

/// Reads a snapshot. Fails if the file doesn't exist or isn't a valid snapshot.
pub fn import_snapshot(path: &Path) -> Result<SyncData> {
    let mut file = File::open(path)?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    let snapshot: SyncData = serde_json::from_str(&contents)?;

    info!(
        "Imported snapshot with {} cards from '{}'",
        snapshot.flashcards.len(),
        path.display()
    );
    Ok(snapshot)
}
