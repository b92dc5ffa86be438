use super::{PrefValue, PreferenceStorage};
use crate::constants::{
    PREFERENCES_CORRUPT_FILE_NAME, PREFERENCES_FILE_NAME, PREFERENCES_LOCK_FILE_NAME,
};
use crate::errors::{LockError, StorageError, StorageResult};
use fs2::FileExt;
use std::collections::BTreeMap;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

type Document = BTreeMap<String, PrefValue>;

/// Preference storage backed by a JSON document in the data directory.
///
/// Every write is a read-modify-write of the whole document: the current file
/// is read, the change applied, and the result written to a temporary file in
/// the same directory which then replaces the original with a single rename.
/// Readers therefore always see either the old or the new document.
///
/// Writes hold an exclusive advisory lock (`preferences.lock`) so a second
/// kansha process cannot interleave its own read-modify-write. A lock that is
/// already held fails fast with [`LockError::FileBusy`].
///
/// Reads of a document that is not valid JSON fail with
/// [`StorageError::Decode`]. The next write moves it aside as
/// `preferences.json.corrupt` and starts a fresh document.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
    lock_path: PathBuf,
    corrupt_path: PathBuf,
}

impl FilePreferences {
    /// Opens (without reading) the preference document in `data_dir`.
    ///
    /// The directory must already exist; see
    /// [`ensure_data_directory_exists`](crate::config::ensure_data_directory_exists).
    pub fn open(data_dir: &Path) -> Self {
        FilePreferences {
            path: data_dir.join(PREFERENCES_FILE_NAME),
            lock_path: data_dir.join(PREFERENCES_LOCK_FILE_NAME),
            corrupt_path: data_dir.join(PREFERENCES_CORRUPT_FILE_NAME),
        }
    }

    /// Location of the preference document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> StorageResult<Document> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Document::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Document::new());
        }
        serde_json::from_str(&content).map_err(StorageError::Decode)
    }

    fn write_document(&self, document: &Document) -> StorageResult<()> {
        let serialized = serde_json::to_vec_pretty(document).map_err(StorageError::Encode)?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));

        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(&serialized)?;
        temp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            let permissions = fs::Permissions::from_mode(crate::constants::DEFAULT_FILE_PERMISSIONS);
            temp.as_file().set_permissions(permissions)?;
        }

        temp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;
        debug!(bytes = serialized.len(), "Preference document replaced");
        Ok(())
    }

    fn acquire_lock(&self) -> StorageResult<File> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&self.lock_path)
            .map_err(|source| LockError::AcquisitionFailed {
                path: self.lock_path.clone(),
                source,
            })?;

        match file.try_lock_exclusive() {
            Ok(()) => Ok(file),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Err(LockError::FileBusy {
                path: self.lock_path.clone(),
            }
            .into()),
            Err(source) => Err(LockError::AcquisitionFailed {
                path: self.lock_path.clone(),
                source,
            }
            .into()),
        }
    }

    fn update<F>(&self, change: F) -> StorageResult<()>
    where
        F: FnOnce(&mut Document),
    {
        let lock = self.acquire_lock()?;
        let result = self.read_for_update().and_then(|mut document| {
            change(&mut document);
            self.write_document(&document)
        });
        if let Err(e) = lock.unlock() {
            debug!(error = %e, "Failed to release preference lock");
        }
        result
    }

    /// Reads the document for a write, replacing an undecodable one.
    fn read_for_update(&self) -> StorageResult<Document> {
        match self.read_document() {
            Err(StorageError::Decode(e)) => {
                warn!(error = %e, path = %self.path.display(), "Replacing undecodable preference document");
                if let Err(e) = fs::rename(&self.path, &self.corrupt_path) {
                    warn!(error = %e, "Failed to move undecodable preference document aside");
                }
                Ok(Document::new())
            }
            other => other,
        }
    }
}

impl PreferenceStorage for FilePreferences {
    fn get(&self, key: &str) -> StorageResult<Option<PrefValue>> {
        Ok(self.read_document()?.remove(key))
    }

    fn set(&self, key: &str, value: PrefValue) -> StorageResult<()> {
        self.update(|document| {
            document.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.update(|document| {
            document.remove(key);
        })
    }
}
