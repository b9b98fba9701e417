use drivesync_core::TokenProvider;
use subtle::ConstantTimeEq;

/// Outcome of checking a request's sync token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Deny,
}

fn secure_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Compare the token presented by the caller with the stored one.
///
/// Denies when either side is absent or empty. A token store that cannot be read also
/// denies: the request is rejected as unauthorized rather than failing open.
pub async fn authenticate(provider: &dyn TokenProvider, provided: Option<&str>) -> AuthDecision {
    let Some(provided) = provided.filter(|p| !p.is_empty()) else {
        return AuthDecision::Deny;
    };

    let stored = match provider.get().await {
        Ok(Some(stored)) if !stored.is_empty() => stored,
        Ok(_) => {
            tracing::warn!("No sync token configured, rejecting upload");
            return AuthDecision::Deny;
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read sync token");
            return AuthDecision::Deny;
        }
    };

    if secure_compare(provided, &stored) {
        AuthDecision::Allow
    } else {
        AuthDecision::Deny
    }
}
