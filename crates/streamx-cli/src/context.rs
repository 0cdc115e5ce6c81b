use color_eyre::eyre::eyre;
use color_eyre::Result;
use streamx_catalog::{create_catalog, TmdbClient};
use streamx_config::{Config, CredentialStore, PathManager, StorageBackendKind};
use streamx_store::MediaStateStore;
use tracing::debug;

/// Load the config file, falling back to defaults when it cannot be read.
///
/// The load error is handed back so the caller decides whether it is fatal.
pub fn load_config(paths: &PathManager) -> (Config, Option<anyhow::Error>) {
    match Config::load_or_default(&paths.config_file()) {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    }
}

pub fn load_credentials(paths: &PathManager) -> Result<CredentialStore> {
    let credentials_file = paths.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    Ok(cred_store)
}

/// Everything a command needs: locations, configuration and the opened store.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub store: MediaStateStore,
}

impl AppContext {
    pub fn open(paths: PathManager, config: Config) -> Result<Self> {
        let store = match config.storage.backend {
            StorageBackendKind::File => {
                let dir = config.storage_dir(&paths);
                debug!("Opening file storage at {}", dir.display());
                MediaStateStore::open_dir(dir.clone())
                    .map_err(|e| eyre!("Failed to open storage at {}: {}", dir.display(), e))?
            }
            StorageBackendKind::Memory => {
                debug!("Using in-memory storage, nothing will be persisted");
                MediaStateStore::in_memory()
            }
        };

        Ok(Self { paths, config, store })
    }

    pub fn credentials(&self) -> Result<CredentialStore> {
        load_credentials(&self.paths)
    }

    /// Catalog client; fails when the config is invalid or no API key is set
    pub fn catalog(&self) -> Result<TmdbClient> {
        self.config
            .validate()
            .map_err(|e| eyre!("Configuration validation failed: {}", e))?;
        let credentials = self.credentials()?;
        create_catalog(&self.config.catalog, &credentials).map_err(|e| {
            eyre!("{}. Run 'streamx config api-key' or set STREAMX_API_KEY.", e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_falls_back_on_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::from_base(dir.path().to_path_buf());
        std::fs::write(paths.config_file(), "storage = [").unwrap();

        let (config, error) = load_config(&paths);

        assert!(error.is_some());
        assert_eq!(config.storage.backend, StorageBackendKind::default());
    }

    #[test]
    fn test_load_config_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let paths = PathManager::from_base(dir.path().to_path_buf());

        let (config, error) = load_config(&paths);

        assert!(error.is_none());
        assert_eq!(config.catalog.language, Config::default().catalog.language);
    }
}
