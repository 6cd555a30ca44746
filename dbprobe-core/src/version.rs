//! Memoized version string.
//!
//! The version is read at most once per process and never invalidated.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use tracing::debug;

/// Version file read when none is configured.
pub const DEFAULT_VERSION_FILE: &str = "./public/nc.txt";

/// Reported when a configured version file cannot be read.
pub const NOT_AVAILABLE: &str = "Not available";

static GLOBAL: OnceLock<VersionCell> = OnceLock::new();

/// Lazily computed version string.
#[derive(Debug)]
pub struct VersionCell {
    file: Option<PathBuf>,
    value: OnceLock<String>,
}

impl VersionCell {
    /// Version read from `file`, or resolved from the defaults when `None`.
    pub fn new(file: Option<PathBuf>) -> Self {
        Self {
            file,
            value: OnceLock::new(),
        }
    }

    /// The version, computed on first access.
    pub fn get(&self) -> &str {
        self.value.get_or_init(|| load(self.file.as_deref()))
    }
}

fn load(file: Option<&Path>) -> String {
    match file {
        Some(path) => read_version(path).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        None => read_version(Path::new(DEFAULT_VERSION_FILE))
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
    }
}

fn read_version(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            debug!(path = %path.display(), "Version file read");
            Some(content.trim().to_string()).filter(|v| !v.is_empty())
        }
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Version file unreadable");
            None
        }
    }
}

/// Process-wide version string.
///
/// The first call fixes the file used; later calls return the cached value.
pub fn version_string(file: Option<&Path>) -> &'static str {
    GLOBAL
        .get_or_init(|| VersionCell::new(file.map(Path::to_path_buf)))
        .get()
}
