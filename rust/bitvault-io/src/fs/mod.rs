#[cfg_attr(unix, path = "unix.rs")]
#[cfg_attr(windows, path = "windows.rs")]
mod platform;

pub use platform::*;

use serde::{Deserialize, Serialize};

/// How writes to a backing file reach stable storage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Every write returns only after the data (though not necessarily the
    /// file metadata) is on stable storage.
    #[default]
    Durable,
    /// Writes go through the page cache and are flushed by the OS, or by an
    /// explicit `sync_data`.
    Buffered,
}
