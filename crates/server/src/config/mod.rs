mod cache;
mod repository;
mod server;
mod storage;
mod upload;

#[cfg(test)]
mod tests;

pub use cache::*;
pub use repository::*;
pub use server::*;
pub use storage::*;
pub use upload::*;

use serde::Deserialize;

/// Top-level configuration for the filehub server, loaded from a TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct FilehubConfig {
    /// HTTP server bind and lifecycle configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload size ceiling and content-type allow-list.
    #[serde(default)]
    pub upload: UploadConfig,
    /// Object storage configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Metadata cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Metadata repository configuration.
    #[serde(default)]
    pub repository: RepositoryConfig,
}
