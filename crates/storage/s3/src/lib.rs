//! AWS S3 storage backend for filehub.
//!
//! Provides [`S3ObjectStore`], the production implementation of
//! [`StorageClient`]. Every `put` writes a new object under a fresh UUIDv7
//! key, so retrying an upload never overwrites an earlier object.
//!
//! Works against AWS S3 and any S3-compatible endpoint (`MinIO`,
//! `LocalStack`) via `endpoint_url` and `force_path_style`.
//!
//! # Example
//!
//! ```ignore
//! use filehub_storage_s3::{S3ObjectStore, S3StoreConfig};
//!
//! let config = S3StoreConfig::new("ap-southeast-1", "uploads");
//! let store = S3ObjectStore::new(config).await;
//! ```
//!
//! [`StorageClient`]: filehub_storage::StorageClient

pub mod auth;
mod config;
mod error;
mod store;

pub use config::S3StoreConfig;
pub use error::classify_sdk_error;
pub use store::S3ObjectStore;
