use crate::{env_or_default, env_required, ConfigError, FromEnv};
use std::path::PathBuf;

/// Which persistence backend holds developer and identity records
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StorageBackend {
    /// Volatile in-process maps, for tests and quick local runs
    Memory,
    /// JSON files under the data directory, rewritten atomically
    File,
}

/// Where uploaded profile photos end up
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PhotoStoreKind {
    /// Saved under `<data_dir>/uploads` and served from `/uploads`
    Local,
    /// Forwarded to an external photo host over HTTP
    Remote,
}

/// Storage configuration for records and photos
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    pub photo_store: PhotoStoreKind,
    /// Base URL of the external photo host, required for [`PhotoStoreKind::Remote`]
    pub photo_host_url: Option<String>,
}

impl StorageConfig {
    /// Directory for locally stored photo uploads
    pub fn uploads_dir(&self) -> PathBuf {
        self.data_dir.join("uploads")
    }

    /// Path of the developers collection file
    pub fn developers_file(&self) -> PathBuf {
        self.data_dir.join("developers.json")
    }

    /// Path of the identities collection file
    pub fn identities_file(&self) -> PathBuf {
        self.data_dir.join("identities.json")
    }
}

impl FromEnv for StorageConfig {
    /// Reads from environment variables:
    /// - STORAGE_BACKEND: "memory" or "file" (default: "file")
    /// - DATA_DIR: directory for JSON files and uploads (default: "./data")
    /// - PHOTO_STORE: "local" or "remote" (default: "local")
    /// - PHOTO_HOST_URL: required when PHOTO_STORE=remote
    fn from_env() -> Result<Self, ConfigError> {
        let backend = match env_or_default("STORAGE_BACKEND", "file").to_ascii_lowercase().as_str() {
            "memory" => StorageBackend::Memory,
            "file" => StorageBackend::File,
            other => {
                return Err(ConfigError::InvalidValue {
                    key: "STORAGE_BACKEND".to_string(),
                    details: format!("expected 'memory' or 'file', got '{}'", other),
                })
            }
        };

        let data_dir = PathBuf::from(env_or_default("DATA_DIR", "./data"));

        let photo_store = match env_or_default("PHOTO_STORE", "local").to_ascii_lowercase().as_str() {
            "local" => PhotoStoreKind::Local,
            "remote" => PhotoStoreKind::Remote,
            other => {
                return Err(ConfigError::InvalidValue {
                    key: "PHOTO_STORE".to_string(),
                    details: format!("expected 'local' or 'remote', got '{}'", other),
                })
            }
        };

        let photo_host_url = match photo_store {
            PhotoStoreKind::Remote => Some(env_required("PHOTO_HOST_URL")?),
            PhotoStoreKind::Local => None,
        };

        Ok(Self {
            backend,
            data_dir,
            photo_store,
            photo_host_url,
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from("./data"),
            photo_store: PhotoStoreKind::Local,
            photo_host_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", None::<&str>),
                ("DATA_DIR", None),
                ("PHOTO_STORE", None),
            ],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.backend, StorageBackend::File);
                assert_eq!(config.data_dir, PathBuf::from("./data"));
                assert_eq!(config.photo_store, PhotoStoreKind::Local);
                assert!(config.photo_host_url.is_none());
            },
        );
    }

    #[test]
    fn test_storage_config_memory_backend() {
        temp_env::with_var("STORAGE_BACKEND", Some("memory"), || {
            let config = StorageConfig::from_env().unwrap();
            assert_eq!(config.backend, StorageBackend::Memory);
        });
    }

    #[test]
    fn test_storage_config_backend_case_insensitive() {
        temp_env::with_var("STORAGE_BACKEND", Some("MEMORY"), || {
            let config = StorageConfig::from_env().unwrap();
            assert_eq!(config.backend, StorageBackend::Memory);
        });
    }

    #[test]
    fn test_storage_config_unknown_backend() {
        temp_env::with_var("STORAGE_BACKEND", Some("postgres"), || {
            let result = StorageConfig::from_env();
            assert!(result.is_err());
            assert!(result.unwrap_err().to_string().contains("STORAGE_BACKEND"));
        });
    }

    #[test]
    fn test_storage_config_remote_requires_host_url() {
        temp_env::with_vars(
            [("PHOTO_STORE", Some("remote")), ("PHOTO_HOST_URL", None)],
            || {
                let result = StorageConfig::from_env();
                assert!(result.is_err());
                assert!(result.unwrap_err().to_string().contains("PHOTO_HOST_URL"));
            },
        );
    }

    #[test]
    fn test_storage_config_remote_with_host_url() {
        temp_env::with_vars(
            [
                ("PHOTO_STORE", Some("remote")),
                ("PHOTO_HOST_URL", Some("https://photos.example.com")),
            ],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.photo_store, PhotoStoreKind::Remote);
                assert_eq!(
                    config.photo_host_url.as_deref(),
                    Some("https://photos.example.com")
                );
            },
        );
    }

    #[test]
    fn test_storage_config_derived_paths() {
        temp_env::with_var("DATA_DIR", Some("/var/lib/devdir"), || {
            let config = StorageConfig::from_env().unwrap();
            assert_eq!(config.uploads_dir(), PathBuf::from("/var/lib/devdir/uploads"));
            assert_eq!(
                config.developers_file(),
                PathBuf::from("/var/lib/devdir/developers.json")
            );
            assert_eq!(
                config.identities_file(),
                PathBuf::from("/var/lib/devdir/identities.json")
            );
        });
    }
}
