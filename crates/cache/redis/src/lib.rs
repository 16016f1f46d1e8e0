//! Redis cache backend for filehub.
//!
//! Provides [`RedisCacheClient`], a `deadpool-redis` backed implementation
//! of the [`CacheClient`] trait from `filehub-cache`.
//!
//! Values are plain Redis strings written with `SET ... PX`, so each write
//! replaces the whole value and carries its own expiry.
//!
//! # Example
//!
//! ```ignore
//! use filehub_cache_redis::{RedisCacheClient, RedisCacheConfig};
//!
//! let config = RedisCacheConfig::default();
//! let cache = RedisCacheClient::new(&config)?;
//! ```
//!
//! [`CacheClient`]: filehub_cache::CacheClient

mod client;
mod config;

pub use client::RedisCacheClient;
pub use config::RedisCacheConfig;
