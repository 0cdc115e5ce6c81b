pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{CatalogConfig, Config, LoggingConfig, StorageBackendKind, StorageConfig};
pub use credentials::CredentialStore;
pub use paths::{PathManager, container_base_path};
