//! Route and header constants

/// Namespace of the upload API
pub const API_PREFIX: &str = "/drive-sync/v1";

/// Header carrying the shared sync token
pub const SYNC_TOKEN_HEADER: &str = "x-drive-sync-token";

/// URL prefix stored media is served under when media serving is enabled
pub const MEDIA_PREFIX: &str = "/media";

/// Seed for temp file names when the sanitized file name is empty
pub const FALLBACK_TEMP_SEED: &str = "drive-upload";
