//! Secret configuration file storage.
//!
//! Provides loading of secret configuration from ~/.config/fitfeed/secret.json.

use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use fitfeed_core::config::SecretConfig;
use fitfeed_core::error::{FitfeedError, Result};
use fitfeed_core::secret::SecretService;

use crate::paths::FitfeedPaths;

/// Errors that can occur during secret storage operations.
#[derive(Debug)]
pub enum SecretStorageError {
    /// Configuration file not found.
    NotFound(PathBuf),
    /// File I/O error.
    IoError(std::io::Error),
    /// JSON parsing error.
    ParseError(serde_json::Error),
    /// Config directory not found.
    ConfigDirNotFound,
}

impl std::fmt::Display for SecretStorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretStorageError::NotFound(path) => {
                write!(f, "Secret file not found at: {}", path.display())
            }
            SecretStorageError::IoError(e) => write!(f, "I/O error: {}", e),
            // serde_json errors never echo the offending input, so this is safe to print.
            SecretStorageError::ParseError(e) => write!(f, "JSON parse error: {}", e),
            SecretStorageError::ConfigDirNotFound => {
                write!(f, "Could not determine home directory")
            }
        }
    }
}

impl std::error::Error for SecretStorageError {}

impl From<std::io::Error> for SecretStorageError {
    fn from(e: std::io::Error) -> Self {
        SecretStorageError::IoError(e)
    }
}

impl From<serde_json::Error> for SecretStorageError {
    fn from(e: serde_json::Error) -> Self {
        SecretStorageError::ParseError(e)
    }
}

impl From<SecretStorageError> for FitfeedError {
    fn from(e: SecretStorageError) -> Self {
        match e {
            SecretStorageError::NotFound(path) => {
                FitfeedError::not_found("secret file", path.display().to_string())
            }
            SecretStorageError::ParseError(err) => err.into(),
            other => FitfeedError::config(other.to_string()),
        }
    }
}

/// Storage for the secret configuration file (secret.json).
///
/// Responsibilities:
/// - Load secret.json from the config directory
/// - Create a blank template with 0600 permissions on first start
///
/// Does NOT:
/// - Validate keys against the backend
/// - Handle encryption (plaintext JSON storage)
pub struct SecretStorage {
    path: PathBuf,
}

impl SecretStorage {
    /// Creates a SecretStorage at the location resolved by `paths`.
    pub fn new(paths: &FitfeedPaths) -> std::result::Result<Self, SecretStorageError> {
        let path = paths
            .secret_file()
            .map_err(|_| SecretStorageError::ConfigDirNotFound)?;
        Ok(Self { path })
    }

    /// Creates a new SecretStorage with a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads the secret configuration from the JSON file.
    pub fn load(&self) -> std::result::Result<SecretConfig, SecretStorageError> {
        if !self.path.exists() {
            return Err(SecretStorageError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        let config = serde_json::from_str(&content)?;

        Ok(config)
    }

    /// Writes a blank template if the file does not exist yet.
    ///
    /// On Unix the file is restricted to the owner (0600).
    pub fn ensure_template(&self) -> std::result::Result<(), SecretStorageError> {
        if self.path.exists() {
            return Ok(());
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let template_json = serde_json::to_string_pretty(&SecretConfig::default())?;
        fs::write(&self.path, template_json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.path, permissions)?;
        }

        tracing::info!("[SecretStorage] Created secret template at {:?}", self.path);
        Ok(())
    }

    /// Returns the path to the secret file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

#[async_trait]
impl SecretService for SecretStorage {
    async fn load_secrets(&self) -> Result<SecretConfig> {
        Ok(self.load()?)
    }

    async fn secret_file_exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        let storage = SecretStorage::with_path(file_path.clone());

        match storage.load() {
            Err(SecretStorageError::NotFound(path)) => assert_eq!(path, file_path),
            other => panic!("Expected NotFound error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_valid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, r#"{ "backend": { "anon_key": "anon-123" } }"#).unwrap();

        let config = SecretStorage::with_path(file_path).load().unwrap();
        assert_eq!(config.backend.anon_key, "anon-123");
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("secret.json");
        fs::write(&file_path, r#"{ invalid json"#).unwrap();

        let result = SecretStorage::with_path(file_path).load();
        assert!(matches!(result, Err(SecretStorageError::ParseError(_))));
    }

    #[test]
    fn test_template_is_created_once() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("config").join("secret.json");
        let storage = SecretStorage::with_path(file_path.clone());

        storage.ensure_template().unwrap();
        let config = storage.load().unwrap();
        assert!(config.backend.anon_key.is_empty());

        fs::write(&file_path, r#"{ "backend": { "anon_key": "kept" } }"#).unwrap();
        storage.ensure_template().unwrap();
        assert_eq!(storage.load().unwrap().backend.anon_key, "kept");

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let storage = SecretStorage::with_path(temp_dir.path().join("fresh.json"));
            storage.ensure_template().unwrap();
            let mode = fs::metadata(storage.path()).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o600);
        }
    }

    #[tokio::test]
    async fn test_secret_service_maps_missing_file_to_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let storage = SecretStorage::with_path(temp_dir.path().join("secret.json"));

        assert!(!storage.secret_file_exists().await);
        let err = storage.load_secrets().await.unwrap_err();
        assert!(err.is_not_found());
    }
}
