// JSON-file-backed key-value store

use crate::kv::{KvStore, validate_key};
use eyre::{Context, Result};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Key-value store with one file per key
///
/// Writes go to a temporary file that is synced and renamed over the target,
/// so readers only ever see a complete value. An advisory lock file keeps two
/// processes from interleaving writes.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open or create the store inside `dir`
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).context("Failed to create data directory")?;
        Ok(Self { dir })
    }

    /// Path of the file holding `key`
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(key)))
    }

    fn lock_file(&self, key: &str) -> Result<File> {
        let path = self.dir.join(format!(".{}.lock", file_stem(key)));
        OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(path)
            .context("Failed to open lock file")
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;

        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }

        let lock = self.lock_file(key)?;
        lock.lock_shared().context("Failed to acquire shared lock")?;
        let value = fs::read_to_string(&path).context("Failed to read value file")?;

        Ok(Some(value))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;

        let path = self.path_for(key);
        let tmp_path = self.dir.join(format!(".{}.tmp", file_stem(key)));

        let lock = self.lock_file(key)?;
        lock.lock_exclusive().context("Failed to acquire file lock")?;

        let mut tmp = File::create(&tmp_path).context("Failed to create temporary file")?;
        tmp.write_all(value.as_bytes())?;
        tmp.sync_all()?;
        fs::rename(&tmp_path, &path).context("Failed to replace value file")?;

        debug!(file = ?path, bytes = value.len(), "Stored value");
        // Lock is released when `lock` is dropped
        Ok(())
    }
}

/// Filesystem-safe name for a key, one-to-one: `@tasks_key` becomes `%40tasks_key`
///
/// Lowercase ASCII letters, digits, `_` and `-` are kept; every other byte is
/// written as `%XX`. Uppercase letters are escaped too so keys differing only
/// in case stay apart on case-insensitive filesystems.
fn file_stem(key: &str) -> String {
    let mut stem = String::with_capacity(key.len());
    for byte in key.bytes() {
        match byte {
            b'a'..=b'z' | b'0'..=b'9' | b'_' | b'-' => stem.push(byte as char),
            _ => stem.push_str(&format!("%{:02X}", byte)),
        }
    }
    stem
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("@tasks_key"), "%40tasks_key");
        assert_eq!(file_stem("a/b"), "a%2Fb");
        assert_eq!(file_stem("Key"), "%4Bey");
        assert_eq!(file_stem("100%"), "100%25");
        assert_eq!(file_stem("ü"), "%C3%BC");
    }

    #[test]
    fn test_distinct_keys_stay_distinct() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();

        let keys = ["@tasks_key", "tasks_key", "_tasks_key", "a/b", "a_b", "a%2Fb", "Key", "key"];
        for (i, key) in keys.iter().enumerate() {
            store.set(key, &i.to_string()).unwrap();
        }

        for (i, key) in keys.iter().enumerate() {
            assert_eq!(store.get(key).unwrap(), Some(i.to_string()), "key {}", key);
        }
    }

    #[test]
    fn test_get_missing_key() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::open(temp.path()).unwrap();
        assert_eq!(store.get("@tasks_key").unwrap(), None);
    }

    #[test]
    fn test_set_then_get() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::open(temp.path()).unwrap();

        store.set("@tasks_key", "[]").unwrap();
        store.set("@tasks_key", "[1,2]").unwrap();

        assert_eq!(store.get("@tasks_key").unwrap().as_deref(), Some("[1,2]"));
        assert!(temp.path().join("%40tasks_key.json").exists());
        assert!(!temp.path().join(".%40tasks_key.tmp").exists());
    }

    #[test]
    fn test_open_creates_directory() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a").join("b");

        let mut store = FileStore::open(&dir).unwrap();
        store.set("k", "v").unwrap();
        assert_eq!(fs::read_to_string(dir.join("k.json")).unwrap(), "v");
    }
}
