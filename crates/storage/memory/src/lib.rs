mod store;

pub use store::{DEFAULT_MOCK_BASE_URL, MockObjectStore};
