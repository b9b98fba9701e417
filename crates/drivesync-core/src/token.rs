//! Sync token: the single shared secret that authorizes upload calls.
//!
//! The token lives behind a [`TokenProvider`] so the request path never touches ambient
//! global state. It is generated once when absent and replaced only by an explicit
//! regeneration; both writes are last-write-wins.

use async_trait::async_trait;
use rand::distr::Alphanumeric;
use rand::Rng;
use thiserror::Error;

/// Length of generated tokens, in characters.
pub const SYNC_TOKEN_LENGTH: usize = 40;

/// Token persistence errors
#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("Token store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store is corrupt: {0}")]
    Corrupt(String),
}

pub type TokenResult<T> = Result<T, TokenStoreError>;

/// Small key-value interface over the persisted sync token.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current token, `None` when none has been generated yet.
    async fn get(&self) -> TokenResult<Option<String>>;

    /// Replace the current token.
    async fn set(&self, token: &str) -> TokenResult<()>;
}

/// Generate a fresh token: 40 ASCII letters and digits.
pub fn generate_sync_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SYNC_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Make sure a token exists, generating one if the store is empty.
///
/// Returns `true` when a new token was created.
pub async fn ensure_sync_token(provider: &dyn TokenProvider) -> TokenResult<bool> {
    match provider.get().await? {
        Some(existing) if !existing.is_empty() => Ok(false),
        _ => {
            provider.set(&generate_sync_token()).await?;
            tracing::info!("Generated initial sync token");
            Ok(true)
        }
    }
}

/// Overwrite the current token with a freshly generated one and return it.
pub async fn regenerate_sync_token(provider: &dyn TokenProvider) -> TokenResult<String> {
    let token = generate_sync_token();
    provider.set(&token).await?;
    tracing::info!("Sync token regenerated");
    Ok(token)
}
