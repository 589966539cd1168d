//! Local key-value store.
//!
//! One file per key under the data directory. Writes go through a temp file
//! in the same directory followed by a rename, so a stored value is either
//! fully replaced or untouched; a failed write never corrupts what was there
//! before.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::{PlannerError, PlannerResult};

const TMP_SUFFIX: &str = ".tmp";

/// Durable on-device key-value storage.
pub struct LocalStore {
    dir: PathBuf,
    /// Total byte budget across all keys, when set.
    quota: Option<u64>,
}

impl LocalStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> PlannerResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(LocalStore { dir, quota: None })
    }

    /// Open a store with a total size quota in bytes. Writes that would push
    /// the store past the quota fail with `StorageFull` without writing.
    pub fn with_quota(dir: impl Into<PathBuf>, quota: u64) -> PlannerResult<Self> {
        let mut store = Self::open(dir)?;
        store.quota = Some(quota);
        Ok(store)
    }

    /// Read the value stored under `key`. A missing key is `None`, never an
    /// error.
    pub fn get(&self, key: &str) -> PlannerResult<Option<String>> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Store `value` under `key`, replacing any previous value atomically.
    pub fn set(&self, key: &str, value: &str) -> PlannerResult<()> {
        let path = self.path_for(key);

        if let Some(quota) = self.quota {
            let others = self.used_bytes_excluding(&path)?;
            if others + value.len() as u64 > quota {
                return Err(PlannerError::StorageFull);
            }
        }

        let temp = self.dir.join(format!(
            "{}{}",
            path.file_name().and_then(|n| n.to_str()).unwrap_or("key"),
            TMP_SUFFIX
        ));

        std::fs::write(&temp, value).map_err(map_write_err)?;
        std::fs::rename(&temp, &path)?;
        Ok(())
    }

    /// Remove `key`. Removing a missing key is fine.
    pub fn remove(&self, key: &str) -> PlannerResult<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(encode_key(key))
    }

    fn used_bytes_excluding(&self, skip: &Path) -> PlannerResult<u64> {
        let mut total = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.path() == skip {
                continue;
            }
            total += entry.metadata()?.len();
        }
        Ok(total)
    }
}

fn map_write_err(e: io::Error) -> PlannerError {
    if e.kind() == io::ErrorKind::StorageFull {
        PlannerError::StorageFull
    } else {
        e.into()
    }
}

/// Encode a key into a filename. Alphanumerics, `-` and `_` pass through;
/// everything else becomes `%XX`, so distinct keys can never collide.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' => out.push(byte as char),
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
