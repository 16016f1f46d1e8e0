pub mod error;
pub mod policy;
pub mod record;
pub mod types;

pub use error::PolicyViolation;
pub use policy::{UploadPolicy, is_image, normalize_content_type};
pub use record::{FileRecord, NewFile, StoredFile};
pub use types::{FileId, OwnerId};
