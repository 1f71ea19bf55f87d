//! Multi-device sync: merge policy, remote stores and the sync run itself.
pub mod merge;
pub mod remote;
pub mod service;

pub use merge::{merge, merge_at};
pub use remote::{FileRemote, MemoryRemote, RemoteStore};
pub use service::{SyncReport, SyncService};
