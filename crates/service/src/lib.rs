//! File upload orchestration for filehub.
//!
//! [`FileService`] ties a [`StorageClient`], a [`FileRepository`] and a
//! [`CacheClient`] together. Uploads run storage write, metadata insert and
//! cache population in that order; reads go through the cache first and fall
//! back to the repository.
//!
//! [`StorageClient`]: filehub_storage::StorageClient
//! [`FileRepository`]: filehub_repository::FileRepository
//! [`CacheClient`]: filehub_cache::CacheClient

pub mod config;
pub mod error;
pub mod service;

pub use config::FileServiceConfig;
pub use error::ServiceError;
pub use service::{FileService, cache_key};
