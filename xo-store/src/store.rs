//! Flat-file JSON store.
//!
//! Each piece of state lives in its own JSON file inside one directory.
//! Reads are forgiving: a missing, empty or corrupt file yields the empty
//! default so the bot can always start. Writes go through a temp file and
//! a rename so a crash never leaves a half-written file behind.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use xo_core::error::{XoError, XoResult};

/// Directory-backed JSON store.
#[derive(Debug, Clone)]
pub struct Store {
    dir: PathBuf,
}

impl Store {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: &Path) -> XoResult<Self> {
        std::fs::create_dir_all(dir).map_err(|e| {
            XoError::Storage(format!("failed to create {}: {e}", dir.display()))
        })?;
        debug!("store opened at {}", dir.display());
        Ok(Self { dir: dir.to_path_buf() })
    }

    /// The directory holding the state files.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of a state file.
    pub fn path(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Load a state file, falling back to the default value.
    pub fn load<T>(&self, file: &str) -> T
    where
        T: DeserializeOwned + Default,
    {
        let path = self.path(file);
        let contents = match std::fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{file} does not exist yet, starting empty");
                return T::default();
            }
            Err(e) => {
                warn!("failed to read {}: {e}", path.display());
                return T::default();
            }
        };

        if contents.trim().is_empty() {
            return T::default();
        }

        match serde_json::from_str(&contents) {
            Ok(value) => value,
            Err(e) => {
                warn!("ignoring unparsable {}: {e}", path.display());
                T::default()
            }
        }
    }

    /// Replace the contents of a state file with `value`.
    pub fn save<T>(&self, file: &str, value: &T) -> XoResult<()>
    where
        T: Serialize,
    {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value.serialize(&mut ser)?;

        let path = self.path(file);
        let tmp = self.path(&format!("{file}.tmp"));
        std::fs::write(&tmp, &buf)
            .map_err(|e| XoError::Storage(format!("failed to write {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| XoError::Storage(format!("failed to replace {}: {e}", path.display())))?;
        debug!("saved {file} ({} bytes)", buf.len());
        Ok(())
    }
}
