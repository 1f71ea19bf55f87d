//! Remote side of a sync: somewhere a whole snapshot can be read and replaced.
use crate::error::Result;
use crate::export::json::{export_snapshot_to_path, import_snapshot};
use crate::models::SyncData;
use log::debug;
use std::path::{Path, PathBuf};

/// Whole-snapshot access to a remote blob. No partial reads or writes.
pub trait RemoteStore {
    /// Returns `None` when no snapshot has been uploaded yet.
    fn fetch(&mut self) -> Result<Option<SyncData>>;

    fn replace(&mut self, snapshot: &SyncData) -> Result<()>;
}

/// Snapshot kept as a JSON file, e.g. inside a cloud-synced folder.
pub struct FileRemote {
    path: PathBuf,
}

impl FileRemote {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RemoteStore for FileRemote {
    fn fetch(&mut self) -> Result<Option<SyncData>> {
        if !self.path.exists() {
            debug!("No remote snapshot at '{}'", self.path.display());
            return Ok(None);
        }
        import_snapshot(&self.path).map(Some)
    }

    fn replace(&mut self, snapshot: &SyncData) -> Result<()> {
        export_snapshot_to_path(snapshot, &self.path)
    }
}

/// Remote held in memory.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    pub snapshot: Option<SyncData>,
}

impl RemoteStore for MemoryRemote {
    fn fetch(&mut self) -> Result<Option<SyncData>> {
        Ok(self.snapshot.clone())
    }

    fn replace(&mut self, snapshot: &SyncData) -> Result<()> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }
}
