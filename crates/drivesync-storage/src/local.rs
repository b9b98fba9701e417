use crate::mime::{is_allowed, normalize_mime_type};
use crate::traits::{AssetStore, AssetStoreError, AssetStoreResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use drivesync_core::models::{AssetId, AssetMetadata};
use drivesync_core::validation::{file_stem, sanitize_file_name, truncate_to_char_boundary};
use lru::LruCache;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::num::NonZeroUsize;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;

const MEDIA_DIR: &str = "media";
const INDEX_DIR: &str = "index";
const FALLBACK_FILE_NAME: &str = "drive-upload";
const MAX_NAME_ATTEMPTS: usize = 10_000;
/// Filesystem limit for a single path component, in bytes.
const MAX_NAME_BYTES: usize = 255;
const RECORD_CACHE_SIZE: usize = 1024;

/// Characters left as-is in URL path segments (RFC 3986 unreserved).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Persisted description of a registered asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: AssetId,
    /// Path below the media directory, forward slashes
    pub storage_key: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

/// Local filesystem asset store
///
/// Registered files are moved into `media/{YYYY}/{MM}/` under the root and described by a
/// JSON record in `index/`. Recently used records are kept in a bounded in-memory cache.
#[derive(Clone)]
pub struct LocalAssetStore {
    media_path: PathBuf,
    index_path: PathBuf,
    base_url: String,
    max_file_size: u64,
    allowed_mime_types: Vec<String>,
    records: Arc<Mutex<LruCache<AssetId, AssetRecord>>>,
}

impl LocalAssetStore {
    /// Create a new LocalAssetStore instance
    ///
    /// # Arguments
    /// * `root` - Root directory, e.g. "./data/media-store"
    /// * `base_url` - Base URL the media directory is served under, e.g. "http://localhost:4000/media"
    /// * `max_file_size` - Largest accepted file in bytes
    /// * `allowed_mime_types` - Exact types or `type/*` wildcards
    pub async fn new(
        root: impl Into<PathBuf>,
        base_url: String,
        max_file_size: u64,
        allowed_mime_types: Vec<String>,
    ) -> AssetStoreResult<Self> {
        let root = root.into();
        let media_path = root.join(MEDIA_DIR);
        let index_path = root.join(INDEX_DIR);

        for dir in [&media_path, &index_path] {
            fs::create_dir_all(dir).await.map_err(|e| {
                AssetStoreError::ConfigError(format!(
                    "Failed to create storage directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(LocalAssetStore {
            media_path,
            index_path,
            base_url,
            max_file_size,
            allowed_mime_types,
            records: Arc::new(Mutex::new(LruCache::new(
                NonZeroUsize::new(RECORD_CACHE_SIZE).unwrap_or(NonZeroUsize::MIN),
            ))),
        })
    }

    #[cfg(test)]
    fn with_record_cache(mut self, capacity: NonZeroUsize) -> Self {
        self.records = Arc::new(Mutex::new(LruCache::new(capacity)));
        self
    }

    /// Directory holding the stored files, the one `base_url` points at.
    pub fn media_path(&self) -> &Path {
        &self.media_path
    }

    /// Convert storage key to filesystem path, rejecting keys that escape the media directory.
    fn key_to_path(&self, storage_key: &str) -> AssetStoreResult<PathBuf> {
        let well_formed = !storage_key.is_empty()
            && !storage_key.contains('\\')
            && Path::new(storage_key)
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !well_formed {
            return Err(AssetStoreError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        let path = self.media_path.join(storage_key);

        if let (Ok(canonical), Ok(base_canonical)) =
            (path.canonicalize(), self.media_path.canonicalize())
        {
            if canonical.strip_prefix(&base_canonical).is_err() {
                return Err(AssetStoreError::InvalidKey(
                    "Storage key resolves outside storage directory".to_string(),
                ));
            }
        }

        Ok(path)
    }

    /// Generate public URL for a storage key, percent-encoding each segment
    fn generate_url(&self, key: &str) -> String {
        let path = key
            .split('/')
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn record_path(&self, asset_id: &AssetId) -> PathBuf {
        self.index_path.join(format!("{}.json", asset_id))
    }

    /// Look up a record, falling back to the on-disk index on a cache miss.
    pub async fn record(&self, asset_id: &AssetId) -> AssetStoreResult<Option<AssetRecord>> {
        if let Some(record) = self.records.lock().await.get(asset_id) {
            return Ok(Some(record.clone()));
        }

        let raw = match fs::read(self.record_path(asset_id)).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let record: AssetRecord = serde_json::from_slice(&raw).map_err(|e| {
            AssetStoreError::ConfigError(format!("Corrupt asset record {}: {}", asset_id, e))
        })?;

        self.records.lock().await.put(*asset_id, record.clone());
        Ok(Some(record))
    }

    /// Stored bytes of an asset
    pub async fn read(&self, asset_id: &AssetId) -> AssetStoreResult<Vec<u8>> {
        let record = self
            .record(asset_id)
            .await?
            .ok_or_else(|| AssetStoreError::NotFound(asset_id.to_string()))?;
        let path = self.key_to_path(&record.storage_key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(AssetStoreError::NotFound(record.storage_key))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn check_file(&self, size: u64, mime_type: &str) -> AssetStoreResult<()> {
        if !is_allowed(mime_type, &self.allowed_mime_types) {
            return Err(AssetStoreError::UnsupportedType(mime_type.to_string()));
        }
        if size == 0 {
            return Err(AssetStoreError::EmptyFile);
        }
        if size > self.max_file_size {
            return Err(AssetStoreError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Create an empty placeholder at the first free `{dir}/{name}`, `{dir}/{stem}-1.{ext}`, ...
    /// and return its key. The placeholder is replaced by the real file afterwards.
    async fn reserve_key(&self, dir_key: &str, file_name: &str) -> AssetStoreResult<(String, PathBuf)> {
        fs::create_dir_all(self.media_path.join(dir_key)).await?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let key = format!("{}/{}", dir_key, numbered_name(file_name, attempt));
            let path = self.key_to_path(&key)?;

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(_) => return Ok((key, path)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Err(AssetStoreError::Rejected {
            status: Some(409),
            code: "name-exhausted".to_string(),
            message: format!("No free file name left for {}", file_name),
        })
    }

    async fn write_record(&self, record: &AssetRecord) -> AssetStoreResult<()> {
        let json = serde_json::to_vec_pretty(record).map_err(|e| {
            AssetStoreError::ConfigError(format!("Failed to encode asset record: {}", e))
        })?;
        let path = self.record_path(&record.id);
        let staging = path.with_extension("json.tmp");

        fs::write(&staging, json).await?;
        if let Err(e) = fs::rename(&staging, &path).await {
            let _ = fs::remove_file(&staging).await;
            return Err(e.into());
        }
        Ok(())
    }
}

/// `photo.png` -> `photo.png`, `photo-1.png`, `photo-2.png`, ...
///
/// The stem is shortened when the suffix would push the name past [`MAX_NAME_BYTES`].
fn numbered_name(file_name: &str, attempt: usize) -> String {
    if attempt == 0 {
        return file_name.to_string();
    }
    let suffix = format!("-{}", attempt);
    let stem = file_stem(file_name);
    let extension = &file_name[stem.len()..];
    let budget = MAX_NAME_BYTES.saturating_sub(suffix.len() + extension.len());
    format!(
        "{}{}{}",
        truncate_to_char_boundary(stem, budget),
        suffix,
        extension
    )
}

/// Move `src` onto `dest`, copying when a rename is not possible (e.g. across devices).
async fn move_file(src: &Path, dest: &Path) -> std::io::Result<()> {
    match fs::rename(src, dest).await {
        Ok(()) => Ok(()),
        Err(rename_err) => {
            tracing::debug!(
                error = %rename_err,
                src = %src.display(),
                "Rename failed, copying instead"
            );
            fs::copy(src, dest).await?;
            if let Err(e) = fs::remove_file(src).await {
                tracing::warn!(error = %e, path = %src.display(), "Failed to remove source after copy");
            }
            Ok(())
        }
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn register_asset(
        &self,
        temp_path: &Path,
        file_name: &str,
        mime_type: &str,
        metadata: &AssetMetadata,
    ) -> AssetStoreResult<AssetId> {
        let start = std::time::Instant::now();
        let mime_type = normalize_mime_type(mime_type);
        let size = fs::metadata(temp_path).await?.len();
        self.check_file(size, &mime_type)?;

        let mut name = sanitize_file_name(file_name);
        if name.is_empty() {
            name = temp_path
                .file_name()
                .map(|n| sanitize_file_name(&n.to_string_lossy()))
                .unwrap_or_default();
        }
        if name.is_empty() {
            name = FALLBACK_FILE_NAME.to_string();
        }

        let created_at = Utc::now();
        let dir_key = created_at.format("%Y/%m").to_string();
        let (storage_key, dest) = self.reserve_key(&dir_key, &name).await?;

        if let Err(e) = move_file(temp_path, &dest).await {
            let _ = fs::remove_file(&dest).await;
            return Err(e.into());
        }

        let record = AssetRecord {
            id: AssetId::new(),
            storage_key,
            file_name: name,
            mime_type,
            size_bytes: size,
            category: metadata.category.clone(),
            created_at,
        };

        if let Err(e) = self.write_record(&record).await {
            if move_file(&dest, temp_path).await.is_err() {
                let _ = fs::remove_file(&dest).await;
            }
            return Err(e);
        }

        tracing::info!(
            asset_id = %record.id,
            key = %record.storage_key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local asset registered"
        );

        let id = record.id;
        self.records.lock().await.put(id, record);
        Ok(id)
    }

    async fn public_url(&self, asset_id: &AssetId) -> AssetStoreResult<Option<String>> {
        Ok(self
            .record(asset_id)
            .await?
            .map(|record| self.generate_url(&record.storage_key)))
    }

    async fn health_check(&self) -> AssetStoreResult<()> {
        for dir in [&self.media_path, &self.index_path] {
            let meta = fs::metadata(dir).await?;
            if !meta.is_dir() || meta.permissions().readonly() {
                return Err(AssetStoreError::ConfigError(format!(
                    "{} is not a writable directory",
                    dir.display()
                )));
            }
        }
        Ok(())
    }
}
