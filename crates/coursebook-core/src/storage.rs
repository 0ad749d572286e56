//! Persistence of the course book.
//!
//! The session only sees [`CourseBookStorage`]. [`JsonCourseBookStorage`]
//! keeps the book in one JSON file; writes hold an exclusive advisory lock on
//! a sibling `.lock` file and go through a temp file plus rename, so a
//! reader never sees a half-written book. [`MemoryStorage`] keeps it in
//! memory for tests and throwaway sessions.

use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::book::CourseBook;
use crate::error::ErrorCode;

const LOCK_TIMEOUT: Duration = Duration::from_secs(2);

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("{}: cannot access {}: {source}", ErrorCode::StorageFailed.code(), .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{}: {} is not a valid course book: {reason}", ErrorCode::CorruptDataFile.code(), .path.display())]
    Corrupt { path: PathBuf, reason: String },
    #[error("{}: lock timed out after {waited:?} at {}", ErrorCode::LockContention.code(), .path.display())]
    LockTimeout { path: PathBuf, waited: Duration },
    #[error("{}: {0}", ErrorCode::StorageFailed.code())]
    Unavailable(String),
}

impl StorageError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } | Self::Unavailable(_) => ErrorCode::StorageFailed,
            Self::Corrupt { .. } => ErrorCode::CorruptDataFile,
            Self::LockTimeout { .. } => ErrorCode::LockContention,
        }
    }

    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        self.code().hint()
    }

    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Where the course book lives between sessions.
pub trait CourseBookStorage {
    /// Read the stored book. `Ok(None)` means nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when stored data exists but cannot be read
    /// or does not form a valid course book.
    fn load(&self) -> Result<Option<CourseBook>, StorageError>;

    /// Replace the stored book with `book`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the book cannot be written.
    fn save(&mut self, book: &CourseBook) -> Result<(), StorageError>;
}

// ---------------------------------------------------------------------------
// JSON file
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct JsonCourseBookStorage {
    path: PathBuf,
}

impl JsonCourseBookStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock_path(&self) -> PathBuf {
        self.sibling(".lock")
    }

    fn temp_path(&self) -> PathBuf {
        self.sibling(".tmp")
    }

    /// `<data file name><suffix>` in the data file's directory.
    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(suffix);
        self.path.with_file_name(name)
    }

    fn corrupt(&self, reason: &dyn std::fmt::Display) -> StorageError {
        StorageError::Corrupt {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl CourseBookStorage for JsonCourseBookStorage {
    fn load(&self) -> Result<Option<CourseBook>, StorageError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no data file yet");
                return Ok(None);
            }
            Err(err) => return Err(StorageError::io(&self.path, err)),
        };
        let parsed: CourseBook = serde_json::from_str(&content).map_err(|err| self.corrupt(&err))?;
        // Deserialising does not see duplicates across entries.
        let book = CourseBook::from_persons(parsed.persons().to_vec(), parsed.theme())
            .map_err(|err| self.corrupt(&err))?;
        info!(path = %self.path.display(), persons = book.len(), "loaded course book");
        Ok(Some(book))
    }

    fn save(&mut self, book: &CourseBook) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| StorageError::io(parent, err))?;
        }
        let lock = WriteLock::acquire(&self.lock_path(), LOCK_TIMEOUT)?;

        let json = serde_json::to_string_pretty(book)
            .map_err(|err| StorageError::Unavailable(err.to_string()))?;
        let temp = self.temp_path();
        let written = File::create(&temp).and_then(|mut file| {
            file.write_all(json.as_bytes())?;
            file.sync_all()
        });
        if let Err(err) = written {
            discard(&temp);
            return Err(StorageError::io(&temp, err));
        }
        if let Err(err) = fs::rename(&temp, &self.path) {
            discard(&temp);
            return Err(StorageError::io(&self.path, err));
        }

        drop(lock);
        info!(path = %self.path.display(), persons = book.len(), "saved course book");
        Ok(())
    }
}

/// Best-effort removal of a half-written temp file.
fn discard(temp: &Path) {
    match fs::remove_file(temp) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => {
            warn!(path = %temp.display(), error = %err, "could not remove temp file");
        }
        _ => {}
    }
}

/// Exclusive advisory lock held for the duration of a write.
#[derive(Debug)]
struct WriteLock {
    file: File,
}

impl WriteLock {
    fn acquire(path: &Path, timeout: Duration) -> Result<Self, StorageError> {
        let start = Instant::now();
        loop {
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(path)
                .map_err(|err| StorageError::io(path, err))?;
            if file.try_lock_exclusive().is_ok() {
                return Ok(Self { file });
            }
            if start.elapsed() >= timeout {
                return Err(StorageError::LockTimeout {
                    path: path.to_path_buf(),
                    waited: start.elapsed(),
                });
            }
            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl Drop for WriteLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

// ---------------------------------------------------------------------------
// In memory
// ---------------------------------------------------------------------------

/// Keeps the last saved book in memory and counts saves.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    book: Option<CourseBook>,
    saves: usize,
    failing: bool,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that starts out holding `book`.
    #[must_use]
    pub const fn with_book(book: CourseBook) -> Self {
        Self {
            book: Some(book),
            saves: 0,
            failing: false,
        }
    }

    /// Storage whose every save fails.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn book(&self) -> Option<&CourseBook> {
        self.book.as_ref()
    }

    #[must_use]
    pub const fn saves(&self) -> usize {
        self.saves
    }
}

impl CourseBookStorage for MemoryStorage {
    fn load(&self) -> Result<Option<CourseBook>, StorageError> {
        Ok(self.book.clone())
    }

    fn save(&mut self, book: &CourseBook) -> Result<(), StorageError> {
        if self.failing {
            return Err(StorageError::Unavailable("storage is read-only".into()));
        }
        self.book = Some(book.clone());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::test_support::{alice, benson};
    use crate::model::Theme;

    fn sample() -> CourseBook {
        CourseBook::from_persons([alice(), benson()], Theme::Light).unwrap()
    }

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = JsonCourseBookStorage::new(dir.path().join("nothing.json"));
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("coursebook.json");
        let mut storage = JsonCourseBookStorage::new(&path);
        storage.save(&sample()).unwrap();

        assert!(path.exists());
        assert!(!storage.temp_path().exists());
        assert_eq!(storage.load().unwrap(), Some(sample()));
    }

    #[test]
    fn failed_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coursebook.json");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("occupied"), "x").unwrap();

        let mut storage = JsonCourseBookStorage::new(&path);
        let err = storage.save(&sample()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::StorageFailed);
        assert!(!storage.temp_path().exists());
    }

    #[test]
    fn lock_file_sits_next_to_data() {
        let storage = JsonCourseBookStorage::new("/tmp/cb/book.json");
        assert_eq!(storage.lock_path(), PathBuf::from("/tmp/cb/book.json.lock"));
    }

    #[test]
    fn garbage_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coursebook.json");
        fs::write(&path, "{ not json").unwrap();
        let err = JsonCourseBookStorage::new(&path).load().unwrap_err();
        assert_eq!(err.code(), ErrorCode::CorruptDataFile);
        assert!(err.to_string().starts_with("E5004"));
    }

    #[test]
    fn invalid_field_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coursebook.json");
        fs::write(
            &path,
            r#"{"persons":[{"name":"Bad!","phone":"123","email":"a@bc.com","address":"x"}]}"#,
        )
        .unwrap();
        let err = JsonCourseBookStorage::new(&path).load().unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { .. }));
    }

    #[test]
    fn duplicates_are_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coursebook.json");
        let entry = r#"{"name":"Amy","phone":"123","email":"a@bc.com","address":"x"}"#;
        fs::write(&path, format!(r#"{{"persons":[{entry},{entry}]}}"#)).unwrap();
        let err = JsonCourseBookStorage::new(&path).load().unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn held_lock_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let lock_path = dir.path().join("held.lock");
        let _held = WriteLock::acquire(&lock_path, Duration::from_millis(50)).unwrap();
        let err = WriteLock::acquire(&lock_path, Duration::from_millis(20)).unwrap_err();
        assert_eq!(err.code(), ErrorCode::LockContention);
        assert!(err.hint().is_some());
    }

    #[test]
    fn memory_storage_counts_saves() {
        let mut storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_none());
        storage.save(&sample()).unwrap();
        assert_eq!(storage.saves(), 1);
        assert_eq!(storage.book(), Some(&sample()));

        let mut failing = MemoryStorage::failing();
        assert_eq!(
            failing.save(&sample()).unwrap_err().code(),
            ErrorCode::StorageFailed
        );
    }
}
