pub mod client;
pub mod error;
pub mod testing;

pub use client::{Locator, StorageClient, extension_for};
pub use error::StorageError;
