pub mod client;
pub mod error;
pub mod testing;

pub use client::CacheClient;
pub use error::CacheError;
