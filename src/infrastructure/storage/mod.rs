//! Storage directory manager.
//!
//! Owns the two managed directories (`files` for uploads, `audio` for
//! synthesized speech). Names are sanitized before every filesystem access,
//! so a caller-supplied name can never resolve outside its directory.
//! Retention is enforced by [`StorageManager::sweep`], which callers run
//! after each successful write rather than on a timer.

pub mod filename;

use chrono::{DateTime, Local, Utc};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::fs;

pub use filename::{is_allowed_type, sanitize_filename, ALLOWED_EXTENSIONS};

/// Files older than this are deleted by the sweep
pub const RETENTION_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

const AUDIO_PREFIX: &str = "response";
const AUDIO_EXTENSION: &str = "mp3";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("file not found: {0}")]
    NotFound(String),
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("file {0} is not valid UTF-8 text")]
    NotText(String),
}

/// One of the two managed directories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    Files,
    Audio,
}

impl StorageArea {
    pub const ALL: [StorageArea; 2] = [StorageArea::Files, StorageArea::Audio];

    pub fn dir_name(&self) -> &'static str {
        match self {
            StorageArea::Files => "files",
            StorageArea::Audio => "audio",
        }
    }
}

impl std::fmt::Display for StorageArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dir_name())
    }
}

/// A file persisted in one of the managed directories
#[derive(Debug, Clone)]
pub struct StoredFile {
    pub original_name: String,
    pub stored_name: String,
    pub area: StorageArea,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a retention sweep
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    pub scanned: usize,
    pub deleted: usize,
    pub failed: usize,
}

pub struct StorageManager {
    root: PathBuf,
    retention: Duration,
}

impl StorageManager {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_retention(root, RETENTION_WINDOW)
    }

    pub fn with_retention(root: impl Into<PathBuf>, retention: Duration) -> Self {
        Self {
            root: root.into(),
            retention,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn area_dir(&self, area: StorageArea) -> PathBuf {
        self.root.join(area.dir_name())
    }

    /// Create both managed directories if they are missing
    pub async fn ensure_dirs(&self) -> Result<(), StorageError> {
        for area in StorageArea::ALL {
            let dir = self.area_dir(area);
            fs::create_dir_all(&dir)
                .await
                .map_err(|source| StorageError::Io { path: dir, source })?;
        }
        Ok(())
    }

    /// Store uploaded bytes as `<timestamp>_<sanitized original name>`
    pub async fn store(
        &self,
        area: StorageArea,
        bytes: &[u8],
        original_name: &str,
    ) -> Result<StoredFile, StorageError> {
        let now = Local::now();
        let stored_name = format!(
            "{}_{}",
            timestamp_prefix(&now),
            sanitize_filename(original_name)
        );
        self.write(area, &stored_name, bytes).await?;

        Ok(StoredFile {
            original_name: original_name.to_string(),
            stored_name,
            area,
            created_at: now.with_timezone(&Utc),
        })
    }

    /// Store synthesized speech as `response_<timestamp>.mp3`
    pub async fn store_audio(&self, bytes: &[u8]) -> Result<StoredFile, StorageError> {
        let now = Local::now();
        let stored_name = format!(
            "{}_{}.{}",
            AUDIO_PREFIX,
            timestamp_prefix(&now),
            AUDIO_EXTENSION
        );
        self.write(StorageArea::Audio, &stored_name, bytes).await?;

        Ok(StoredFile {
            original_name: stored_name.clone(),
            stored_name,
            area: StorageArea::Audio,
            created_at: now.with_timezone(&Utc),
        })
    }

    /// Read a stored file. The name is sanitized before lookup.
    pub async fn read(&self, area: StorageArea, stored_name: &str) -> Result<Vec<u8>, StorageError> {
        let safe_name = sanitize_filename(stored_name);
        let path = self.area_dir(area).join(&safe_name);

        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(safe_name)),
            Err(source) => Err(StorageError::Io { path, source }),
        }
    }

    /// Read a stored file as UTF-8 text
    pub async fn read_text(&self, area: StorageArea, stored_name: &str) -> Result<String, StorageError> {
        let bytes = self.read(area, stored_name).await?;
        String::from_utf8(bytes).map_err(|_| StorageError::NotText(sanitize_filename(stored_name)))
    }

    /// Delete every file in both areas whose last modification is older than
    /// the retention window. Failures are logged and skipped.
    pub async fn sweep(&self) -> SweepReport {
        let now = SystemTime::now();
        let mut report = SweepReport::default();

        for area in StorageArea::ALL {
            let dir = self.area_dir(area);
            let mut entries = match fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => {
                    tracing::error!(error = %e, dir = %dir.display(), "Failed to list storage directory");
                    report.failed += 1;
                    continue;
                }
            };

            loop {
                let entry = match entries.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        tracing::error!(error = %e, dir = %dir.display(), "Failed to read directory entry");
                        report.failed += 1;
                        break;
                    }
                };

                let path = entry.path();
                let metadata = match entry.metadata().await {
                    Ok(metadata) => metadata,
                    // Removed by a concurrent sweep
                    Err(e) if e.kind() == ErrorKind::NotFound => continue,
                    Err(e) => {
                        tracing::warn!(error = %e, path = %path.display(), "Failed to stat stored file");
                        report.failed += 1;
                        continue;
                    }
                };

                if !metadata.is_file() {
                    continue;
                }
                report.scanned += 1;

                let modified = match metadata.modified() {
                    Ok(modified) => modified,
                    Err(e) => {
                        tracing::warn!(error = %e, path = %path.display(), "Modification time unavailable");
                        report.failed += 1;
                        continue;
                    }
                };

                if !is_expired(modified, now, self.retention) {
                    continue;
                }

                match fs::remove_file(&path).await {
                    Ok(()) => report.deleted += 1,
                    Err(e) if e.kind() == ErrorKind::NotFound => report.deleted += 1,
                    Err(e) => {
                        tracing::error!(error = %e, path = %path.display(), "Failed to delete expired file");
                        report.failed += 1;
                    }
                }
            }
        }

        if report.deleted > 0 || report.failed > 0 {
            tracing::info!(
                scanned = report.scanned,
                deleted = report.deleted,
                failed = report.failed,
                "Storage sweep finished"
            );
        }

        report
    }

    /// True when both directories exist and accept writes
    pub async fn is_writable(&self) -> bool {
        for area in StorageArea::ALL {
            match fs::metadata(self.area_dir(area)).await {
                Ok(metadata) if metadata.is_dir() && !metadata.permissions().readonly() => {}
                _ => return false,
            }
        }
        true
    }

    async fn write(&self, area: StorageArea, stored_name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let path = self.area_dir(area).join(stored_name);
        fs::write(&path, bytes)
            .await
            .map_err(|source| StorageError::Io {
                path: path.clone(),
                source,
            })?;

        tracing::info!(
            area = %area,
            stored_name = stored_name,
            size_bytes = bytes.len(),
            "File stored"
        );
        Ok(())
    }
}

/// `YYYYmmdd_HHMMSS_ffffff`, microsecond resolution
fn timestamp_prefix(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S_%6f").to_string()
}

fn is_expired(modified: SystemTime, now: SystemTime, retention: Duration) -> bool {
    // Files stamped in the future are never expired
    now.duration_since(modified)
        .map(|age| age > retention)
        .unwrap_or(false)
}
