pub mod error;
pub mod models;
pub mod queries;
pub mod revocation;

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info};

pub use error::{DbError, Result};
pub use models::{Chirp, RevokedToken, Snapshot, User};
pub use queries::MAX_CHIRP_LENGTH;

/// Single-file JSON database.
///
/// The file is the only state: every operation reads the whole document,
/// and every mutation writes the whole document back. The lock guards the
/// path, so a mutation's read-modify-write runs as one critical section
/// and concurrent readers never see a half-applied change. Nothing here
/// protects against a second process writing the same file.
pub struct Database {
    path: RwLock<PathBuf>,
}

impl Database {
    /// Open the database at `path`, creating an empty document if the file
    /// doesn't exist. An existing document must decode or opening fails.
    pub fn open(path: &Path) -> Result<Self> {
        let db = Self {
            path: RwLock::new(path.to_path_buf()),
        };

        let snapshot = db.load()?;
        info!(
            "Database opened at {} ({} chirps, {} users, {} revoked tokens)",
            path.display(),
            snapshot.chirps.len(),
            snapshot.users.len(),
            snapshot.revoked_tokens.len()
        );
        Ok(db)
    }

    /// Open the database at `path`, discarding whatever it held.
    pub fn create(path: &Path) -> Result<Self> {
        let db = Self {
            path: RwLock::new(path.to_path_buf()),
        };
        db.reset()?;
        Ok(db)
    }

    /// Read and decode the whole document under a shared lock.
    pub fn load(&self) -> Result<Snapshot> {
        {
            let path = self.read_lock()?;
            if let Some(snapshot) = read_document(&path)? {
                return Ok(snapshot);
            }
        }

        // File is missing: initialize it under the exclusive lock. Another
        // thread may have won the race, so check again first.
        let path = self.write_lock()?;
        match read_document(&path)? {
            Some(snapshot) => Ok(snapshot),
            None => {
                let empty = Snapshot::default();
                write_document(&path, &empty)?;
                info!("Initialized empty database at {}", path.display());
                Ok(empty)
            }
        }
    }

    /// Overwrite the whole document.
    pub fn replace(&self, snapshot: &Snapshot) -> Result<()> {
        let path = self.write_lock()?;
        write_document(&path, snapshot)
    }

    /// Throw away the file and start from an empty document. Development only.
    pub fn reset(&self) -> Result<()> {
        let path = self.write_lock()?;
        match fs::remove_file(&*path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(DbError::Write(e)),
        }
        write_document(&path, &Snapshot::default())?;

        info!("Database reset at {}", path.display());
        Ok(())
    }

    pub fn with_snapshot<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Snapshot) -> Result<T>,
    {
        let snapshot = self.load()?;
        f(&snapshot)
    }

    /// Run a read-modify-write under the exclusive lock. The document is
    /// written back only if `f` succeeds; a failed decode aborts before any
    /// write is attempted.
    pub fn with_snapshot_mut<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Snapshot) -> Result<T>,
    {
        let path = self.write_lock()?;
        let mut snapshot = read_document(&path)?.unwrap_or_default();

        let out = f(&mut snapshot)?;

        write_document(&path, &snapshot)?;
        debug!("Wrote database to {}", path.display());
        Ok(out)
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, PathBuf>> {
        self.path.read().map_err(|_| DbError::Poisoned)
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, PathBuf>> {
        self.path.write().map_err(|_| DbError::Poisoned)
    }
}

/// `Ok(None)` when the file doesn't exist.
fn read_document(path: &Path) -> Result<Option<Snapshot>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(DbError::Read(e)),
    };

    serde_json::from_slice(&data)
        .map(Some)
        .map_err(DbError::Corrupt)
}

/// Write to a sibling temp file, then rename over the document so a reader
/// sees either the old or the new contents, never a partial write.
fn write_document(path: &Path, snapshot: &Snapshot) -> Result<()> {
    let data = serde_json::to_vec_pretty(snapshot).map_err(DbError::Encode)?;

    let tmp = temp_path(path);
    fs::write(&tmp, &data).map_err(DbError::Write)?;
    fs::rename(&tmp, path).map_err(DbError::Write)?;
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_else(|| OsString::from("database"));
    name.push(".tmp");
    path.with_file_name(name)
}
