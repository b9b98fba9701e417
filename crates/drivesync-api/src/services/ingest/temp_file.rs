use crate::constants::FALLBACK_TEMP_SEED;
use drivesync_core::validation::file_stem;
use std::io;
use std::path::Path;
use tempfile::TempPath;

/// Longest part of the file name carried into the temp file name.
const MAX_SEED_CHARS: usize = 64;

/// Temporary file owned by one ingestion.
///
/// The file is deleted when the handle is dropped, on every path including panics and
/// cancelled requests. [`TempFileHandle::release`] gives the file up instead, for when the
/// asset store has taken it over.
#[derive(Debug)]
pub struct TempFileHandle {
    path: TempPath,
}

impl TempFileHandle {
    /// Create a uniquely named, empty file in `dir`, named after `file_name` when it has
    /// anything usable left.
    pub fn allocate(dir: &Path, file_name: &str) -> io::Result<Self> {
        let seed: String = match file_stem(file_name) {
            "" => FALLBACK_TEMP_SEED.to_string(),
            stem => stem.chars().take(MAX_SEED_CHARS).collect(),
        };

        let file = tempfile::Builder::new()
            .prefix(&format!("{}-", seed))
            .suffix(".tmp")
            .tempfile_in(dir)?;

        Ok(Self {
            path: file.into_temp_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Basename of the temp file, used when the upload has no usable name.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Write `bytes` as the whole content of the file.
    pub async fn write_all(&self, bytes: &[u8]) -> io::Result<()> {
        tokio::fs::write(&*self.path, bytes).await
    }

    /// Delete the file now. Failures are logged and otherwise ignored.
    pub fn discard(self) {
        let path_display = self.path.display().to_string();
        if let Err(e) = self.path.close() {
            if e.kind() != io::ErrorKind::NotFound {
                tracing::debug!(error = %e, path = %path_display, "Failed to remove temp file");
            }
        }
    }

    /// Stop tracking the file without deleting it.
    pub fn release(self) {
        if let Err(e) = self.path.keep() {
            std::mem::forget(e.path);
        }
    }
}
