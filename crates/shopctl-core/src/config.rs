//! Client configuration
//!
//! One configuration value selects the backend base URL; the session
//! credential is cached on disk between invocations.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable selecting the backend base URL
pub const ENV_API_URL: &str = "SHOPCTL_API_URL";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Backend connection settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    /// Create a config for the given base URL (trailing slashes trimmed)
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read the base URL from `SHOPCTL_API_URL`
    pub fn from_env() -> Result<Self> {
        match std::env::var(ENV_API_URL) {
            Ok(url) if !url.trim().is_empty() => Ok(Self::new(url.trim())),
            _ => Err(Error::config(format!(
                "{} is not set. Point it at the backend, e.g. https://api.example.com/api",
                ENV_API_URL
            ))),
        }
    }
}

/// On-disk cache for the opaque backend session cookie.
///
/// The credential is stored verbatim and never inspected; clearing the
/// cache is how logout and 401 handling forget the session.
#[derive(Debug, Clone)]
pub struct CredentialCache {
    path: PathBuf,
}

impl CredentialCache {
    /// Cache at the default per-user location
    pub fn default_path() -> Result<Self> {
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::config("Could not determine config directory"))?;
        Ok(Self {
            path: dir.join("shopctl").join("session"),
        })
    }

    /// Cache at an explicit path (used by tests)
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }

    /// Load the cached credential, if any
    pub fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }

    /// Persist the credential
    pub fn store(&self, credential: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, credential)?;
        Ok(())
    }

    /// Forget the credential
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trimmed() {
        let config = ApiConfig::new("https://api.example.com/api/");
        assert_eq!(config.base_url, "https://api.example.com/api");
    }

    #[test]
    fn test_credential_cache_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CredentialCache::at(dir.path().join("nested").join("session"));

        assert!(cache.load().is_none());

        cache.store("session=abc123").unwrap();
        assert_eq!(cache.load().as_deref(), Some("session=abc123"));

        cache.clear().unwrap();
        assert!(cache.load().is_none());
    }

    #[test]
    fn test_credential_cache_clear_missing_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let cache = CredentialCache::at(dir.path().join("session"));
        assert!(cache.clear().is_ok());
    }
}
