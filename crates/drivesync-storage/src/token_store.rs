//! Sync token persistence.

use async_trait::async_trait;
use drivesync_core::token::{TokenProvider, TokenResult, TokenStoreError};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::RwLock;
use tokio::fs;
use uuid::Uuid;

/// Token kept in a single file.
///
/// Every `get` re-reads the file so a regeneration from the CLI is picked up by a running
/// service without a restart. Writes go to a sibling file first and are renamed into
/// place, so readers never observe a partially written token.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl TokenProvider for FileTokenStore {
    async fn get(&self) -> TokenResult<Option<String>> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let token = raw.trim();
        if token.is_empty() {
            return Ok(None);
        }
        if token.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(TokenStoreError::Corrupt(format!(
                "{} contains more than one token",
                self.path.display()
            )));
        }
        Ok(Some(token.to_string()))
    }

    async fn set(&self, token: &str) -> TokenResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sync_token".to_string());
        let staging = self
            .path
            .with_file_name(format!(".{}.{}", file_name, Uuid::new_v4().simple()));

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        options.mode(0o600);

        let write = async {
            use tokio::io::AsyncWriteExt;
            let mut file = options.open(&staging).await?;
            file.write_all(token.as_bytes()).await?;
            file.write_all(b"\n").await?;
            file.sync_all().await?;
            fs::rename(&staging, &self.path).await
        };

        if let Err(e) = write.await {
            let _ = fs::remove_file(&staging).await;
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), "Sync token written");
        Ok(())
    }
}

/// Process-local token store, used by tests and embedders that manage the secret themselves.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenProvider for InMemoryTokenStore {
    async fn get(&self) -> TokenResult<Option<String>> {
        let guard = self
            .token
            .read()
            .map_err(|_| TokenStoreError::Corrupt("token lock poisoned".to_string()))?;
        Ok(guard.clone().filter(|t| !t.is_empty()))
    }

    async fn set(&self, token: &str) -> TokenResult<()> {
        let mut guard = self
            .token
            .write()
            .map_err(|_| TokenStoreError::Corrupt("token lock poisoned".to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use drivesync_core::token::{ensure_sync_token, regenerate_sync_token};
    use tempfile::TempDir;

    #[tokio::test]
    async fn missing_file_means_no_token() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("sync_token"));
        assert_eq!(store.get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_and_nested_parent() {
        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested/dir/sync_token"));
        store.set("abc123").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("abc123"));

        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("nested/dir"))
            .unwrap()
            .collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = FileTokenStore::new(dir.path().join("sync_token"));
        store.set("secret").await.unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn regeneration_is_visible_to_other_handles() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sync_token");
        let service = FileTokenStore::new(&path);
        let cli = FileTokenStore::new(&path);

        assert!(ensure_sync_token(&service).await.unwrap());
        let old = service.get().await.unwrap().unwrap();
        let new = regenerate_sync_token(&cli).await.unwrap();

        assert_ne!(old, new);
        assert_eq!(service.get().await.unwrap(), Some(new));
    }

    #[tokio::test]
    async fn blank_file_means_no_token() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sync_token");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(FileTokenStore::new(path).get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn in_memory_store() {
        let store = InMemoryTokenStore::new();
        assert_eq!(store.get().await.unwrap(), None);
        store.set("t").await.unwrap();
        assert_eq!(store.get().await.unwrap().as_deref(), Some("t"));
        assert_eq!(
            InMemoryTokenStore::with_token("x").get().await.unwrap().as_deref(),
            Some("x")
        );
    }
}
