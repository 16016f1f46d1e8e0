pub mod api;
pub mod cache_factory;
pub mod config;
pub mod error;
pub mod repository_factory;
pub mod storage_factory;
