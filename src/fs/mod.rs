//! Filesystem access used for include resolution and template loading.

mod local;
mod memory;

pub use local::LocalFs;
pub use memory::MemoryFs;

use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};

pub trait FileSystem: Send + Sync {
    /// Whether `path` names an existing file.
    fn exists(&self, path: &Path) -> bool;

    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Last modification time, `None` when the backend does not track it.
    fn modified(&self, path: &Path) -> io::Result<Option<DateTime<Utc>>>;

    /// All files below `dir`, recursively.
    fn list(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}
