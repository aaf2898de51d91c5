//! Ephemeral on-disk slots for uploads and generated PDFs.
//!
//! Uploads live in a `NamedTempFile` and vanish when it drops, on every exit path.
//! Outputs are written to a temp file first and then persisted under
//! `<uuid>_<download name>`, so concurrent requests never collide and a failed
//! write leaves nothing behind. The uuid prefix doubles as the download token.
//! Outputs nobody downloads are removed by `sweep_expired` once they outlive the
//! store's TTL.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tempfile::{Builder, NamedTempFile};
use tracing::{debug, warn};
use uuid::Uuid;

/// Download base name used when the upload's name sanitizes to nothing.
pub const FALLBACK_BASE_NAME: &str = "table";

/// How long an undelivered PDF is kept.
pub const DEFAULT_OUTPUT_TTL: Duration = Duration::from_secs(60 * 60);

#[derive(Debug, Clone)]
pub struct TempStore {
    dir: PathBuf,
    output_ttl: Duration,
}

/// A generated PDF waiting to be downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOutput {
    /// Name on disk and in the download URL.
    pub file_name: String,
    /// Name offered to the browser.
    pub download_name: String,
}

impl TempStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        TempStore {
            dir: dir.into(),
            output_ttl: DEFAULT_OUTPUT_TTL,
        }
    }

    pub fn with_output_ttl(mut self, output_ttl: Duration) -> Self {
        self.output_ttl = output_ttl;
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Writes an upload to a fresh temp file that is deleted when the handle drops.
    pub fn stage_input(&self, bytes: &[u8], extension: &str) -> std::io::Result<NamedTempFile> {
        let mut file = Builder::new()
            .prefix("upload-")
            .suffix(&format!(".{extension}"))
            .tempfile_in(&self.dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        Ok(file)
    }

    /// Persists a finished PDF under a new unique token.
    pub fn store_output(&self, bytes: &[u8], download_name: &str) -> std::io::Result<StoredOutput> {
        let token = Uuid::new_v4();
        let file_name = format!("{token}_{download_name}");

        let mut file = Builder::new().prefix(".pending-").tempfile_in(&self.dir)?;
        file.write_all(bytes)?;
        file.flush()?;
        file.persist_noclobber(self.dir.join(&file_name))
            .map_err(|e| e.error)?;

        Ok(StoredOutput {
            file_name,
            download_name: download_name.to_string(),
        })
    }

    /// Maps a download file name back to its path and browser-facing name.
    ///
    /// Returns `None` for anything this store could not have produced, which
    /// includes every path-traversal attempt.
    pub fn resolve(&self, file_name: &str) -> Option<(PathBuf, String)> {
        let (token, download_name) = file_name.split_once('_')?;
        Uuid::parse_str(token).ok()?;
        let well_formed = download_name.ends_with(".pdf")
            && download_name.len() > ".pdf".len()
            && sanitize_filename(download_name) == download_name;
        if !well_formed {
            return None;
        }
        Some((self.dir.join(file_name), download_name.to_string()))
    }

    /// Reads a stored PDF and deletes it. `Ok(None)` when it does not exist.
    pub async fn take_output(&self, file_name: &str) -> std::io::Result<Option<(Vec<u8>, String)>> {
        let Some((path, download_name)) = self.resolve(file_name) else {
            return Ok(None);
        };
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };
        if let Err(e) = tokio::fs::remove_file(&path).await {
            warn!(path = %path.display(), "Failed to remove delivered PDF: {e}");
        }
        Ok(Some((bytes, download_name)))
    }

    /// Deletes stored PDFs older than the TTL and returns how many went.
    ///
    /// Only names `resolve` accepts are touched, so staged uploads and pending
    /// writes of in-flight requests are left alone.
    pub fn sweep_expired(&self) -> std::io::Result<usize> {
        let now = SystemTime::now();
        let mut removed = 0;
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if self.resolve(name).is_none() {
                continue;
            }
            // Gone already when a download raced us.
            let Ok(modified) = entry.metadata().and_then(|m| m.modified()) else {
                continue;
            };
            if now.duration_since(modified).unwrap_or_default() < self.output_ttl {
                continue;
            }
            match std::fs::remove_file(entry.path()) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(file = name, "Failed to remove expired PDF: {e}"),
            }
        }
        if removed > 0 {
            debug!(removed, "Swept expired PDFs");
        }
        Ok(removed)
    }
}

/// Reduces a user-supplied filename to ASCII letters, digits, `.`, `-` and `_`.
///
/// Path separators and whitespace runs become `_`; leading and trailing dots and
/// underscores are stripped so the result can never name a parent directory.
pub fn sanitize_filename(name: &str) -> String {
    let spaced = name.replace(|c| c == '/' || c == '\\', " ");
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// `report.xlsx` → `report.pdf`, sanitized.
pub fn download_name_for(original_name: &str) -> String {
    let base = original_name
        .rsplit_once('.')
        .map_or(original_name, |(base, _)| base);
    let base = sanitize_filename(base);
    if base.is_empty() {
        format!("{FALLBACK_BASE_NAME}.pdf")
    } else {
        format!("{base}.pdf")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("My Report 2024.xlsx"), "My_Report_2024.xlsx");
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("..\\win\\file.csv"), "win_file.csv");
        assert_eq!(sanitize_filename("résumé.csv"), "rsum.csv");
        assert_eq!(sanitize_filename("...hidden"), "hidden");
        assert_eq!(sanitize_filename("漢字"), "");
    }

    #[test]
    fn test_download_name_for() {
        assert_eq!(download_name_for("sales q1.xlsx"), "sales_q1.pdf");
        assert_eq!(download_name_for("archive.2024.csv"), "archive.2024.pdf");
        assert_eq!(download_name_for("漢字.csv"), "table.pdf");
    }

    #[test]
    fn test_staged_input_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let store = TempStore::new(dir.path());
        let staged = store.stage_input(b"a,b\n1,2\n", "csv").unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("csv"));
        assert_eq!(std::fs::read(&path).unwrap(), b"a,b\n1,2\n");

        drop(staged);
        assert!(!path.exists());
    }

    #[test]
    fn test_outputs_get_unique_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = TempStore::new(dir.path());
        let first = store.store_output(b"%PDF-1", "r.pdf").unwrap();
        let second = store.store_output(b"%PDF-2", "r.pdf").unwrap();

        assert_ne!(first.file_name, second.file_name);
        assert!(first.file_name.ends_with("_r.pdf"));
        assert_eq!(std::fs::read(dir.path().join(&first.file_name)).unwrap(), b"%PDF-1");
        assert_eq!(std::fs::read(dir.path().join(&second.file_name)).unwrap(), b"%PDF-2");
        // only the two persisted outputs remain, no pending temp files
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_resolve_rejects_foreign_names() {
        let store = TempStore::new("/tmp/sheetpress");
        let token = Uuid::new_v4();
        assert!(store.resolve(&format!("{token}_report.pdf")).is_some());
        assert!(store.resolve("report.pdf").is_none());
        assert!(store.resolve("not-a-uuid_report.pdf").is_none());
        assert!(store.resolve(&format!("{token}_../../etc/passwd")).is_none());
        assert!(store.resolve(&format!("{token}_report.csv")).is_none());
        assert!(store.resolve(&format!("{token}_.pdf")).is_none());
    }

    fn age(path: &Path, by: Duration) {
        let file = std::fs::File::options().write(true).open(path).unwrap();
        file.set_modified(SystemTime::now() - by).unwrap();
    }

    #[test]
    fn test_sweep_removes_only_expired_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let store = TempStore::new(dir.path()).with_output_ttl(Duration::from_secs(60));
        let stale = store.store_output(b"%PDF-old", "old.pdf").unwrap();
        let fresh = store.store_output(b"%PDF-new", "new.pdf").unwrap();
        let staged = store.stage_input(b"a\n1\n", "csv").unwrap();
        age(&dir.path().join(&stale.file_name), Duration::from_secs(2 * 60 * 60));
        age(staged.path(), Duration::from_secs(2 * 60 * 60));

        assert_eq!(store.sweep_expired().unwrap(), 1);
        assert!(!dir.path().join(&stale.file_name).exists());
        assert!(dir.path().join(&fresh.file_name).exists());
        assert!(staged.path().exists());

        assert_eq!(store.sweep_expired().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_take_output_reads_once_then_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let store = TempStore::new(dir.path());
        let stored = store.store_output(b"%PDF-data", "inventory.pdf").unwrap();

        let (bytes, name) = store.take_output(&stored.file_name).await.unwrap().unwrap();
        assert_eq!(bytes, b"%PDF-data");
        assert_eq!(name, "inventory.pdf");
        assert!(!dir.path().join(&stored.file_name).exists());

        assert!(store.take_output(&stored.file_name).await.unwrap().is_none());
    }
}
