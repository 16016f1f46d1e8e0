mod cache;

pub use cache::MemoryCacheClient;
