//! Write authorization.

use statboard::{Result, StatsError};
use std::sync::Arc;
use thiserror::Error;

const SCHEME: &str = "Key ";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("mutation key must not be empty")]
    EmptySecret,
}

/// Checks `Authorization: Key <secret>` headers against the mutation key.
#[derive(Clone)]
pub struct Authorizer {
    secret: Arc<str>,
}

impl Authorizer {
    pub fn new<S: AsRef<str>>(secret: S) -> std::result::Result<Self, AuthError> {
        let secret = secret.as_ref();
        if secret.is_empty() {
            return Err(AuthError::EmptySecret);
        }
        Ok(Self {
            secret: Arc::from(secret),
        })
    }

    /// Runs before any write logic; a missing or wrong header is
    /// [`StatsError::Unauthorized`].
    pub fn check(&self, header: Option<&str>) -> Result<()> {
        match header.and_then(|value| value.strip_prefix(SCHEME)) {
            Some(presented) if presented == &*self.secret => Ok(()),
            _ => Err(StatsError::Unauthorized),
        }
    }
}

impl std::fmt::Debug for Authorizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Authorizer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_header() {
        let auth = Authorizer::new("hunter2").unwrap();

        assert!(auth.check(Some("Key hunter2")).is_ok());
        assert!(matches!(auth.check(None), Err(StatsError::Unauthorized)));
        assert!(auth.check(Some("hunter2")).is_err());
        assert!(auth.check(Some("Bearer hunter2")).is_err());
        assert!(auth.check(Some("Key hunter")).is_err());
        assert!(auth.check(Some("Key ")).is_err());
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(matches!(Authorizer::new(""), Err(AuthError::EmptySecret)));
    }
}
