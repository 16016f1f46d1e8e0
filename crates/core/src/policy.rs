use serde::{Deserialize, Serialize};

use crate::error::PolicyViolation;

/// Size ceiling and content-type allow-list applied to every upload.
///
/// The same policy is enforced by the service before any side effect and by
/// each storage backend on `put`, so a backend never accepts bytes the
/// service would have rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadPolicy {
    /// Maximum payload size in bytes.
    pub max_size_bytes: u64,

    /// Accepted MIME types. An empty list accepts any type.
    pub allowed_content_types: Vec<String>,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            max_size_bytes: 100 * 1024,
            allowed_content_types: vec![
                "image/jpeg".to_owned(),
                "image/jpg".to_owned(),
                "image/png".to_owned(),
            ],
        }
    }
}

impl UploadPolicy {
    /// Check a payload's content type and size against this policy.
    pub fn check(&self, content_type: &str, size_bytes: u64) -> Result<(), PolicyViolation> {
        if size_bytes == 0 {
            return Err(PolicyViolation::Empty);
        }
        if size_bytes > self.max_size_bytes {
            return Err(PolicyViolation::TooLarge {
                size: size_bytes,
                limit: self.max_size_bytes,
            });
        }
        if !self.allows(content_type) {
            return Err(PolicyViolation::ContentTypeNotAllowed(
                content_type.to_owned(),
            ));
        }
        Ok(())
    }

    /// Return `true` if the content type is on the allow-list.
    pub fn allows(&self, content_type: &str) -> bool {
        if self.allowed_content_types.is_empty() {
            return true;
        }
        let normalized = normalize_content_type(content_type);
        self.allowed_content_types
            .iter()
            .any(|allowed| normalize_content_type(allowed) == normalized)
    }
}

/// Lowercase a MIME type and strip any parameters (`; charset=...`).
pub fn normalize_content_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Return `true` for `image/*` content types.
pub fn is_image(content_type: &str) -> bool {
    normalize_content_type(content_type).starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_accepts_small_png() {
        let policy = UploadPolicy::default();
        assert!(policy.check("image/png", 10).is_ok());
    }

    #[test]
    fn rejects_empty_payload() {
        let policy = UploadPolicy::default();
        assert_eq!(policy.check("image/png", 0), Err(PolicyViolation::Empty));
    }

    #[test]
    fn rejects_oversized_payload() {
        let policy = UploadPolicy {
            max_size_bytes: 16,
            ..UploadPolicy::default()
        };
        assert_eq!(
            policy.check("image/png", 17),
            Err(PolicyViolation::TooLarge {
                size: 17,
                limit: 16
            })
        );
        assert!(policy.check("image/png", 16).is_ok());
    }

    #[test]
    fn rejects_disallowed_type() {
        let policy = UploadPolicy::default();
        assert!(matches!(
            policy.check("application/pdf", 10),
            Err(PolicyViolation::ContentTypeNotAllowed(ct)) if ct == "application/pdf"
        ));
    }

    #[test]
    fn content_type_match_ignores_case_and_parameters() {
        let policy = UploadPolicy::default();
        assert!(policy.allows("IMAGE/PNG"));
        assert!(policy.allows("image/jpeg; q=0.9"));
    }

    #[test]
    fn empty_allow_list_accepts_anything() {
        let policy = UploadPolicy {
            max_size_bytes: 1024,
            allowed_content_types: Vec::new(),
        };
        assert!(policy.check("application/octet-stream", 1).is_ok());
    }

    #[test]
    fn image_detection() {
        assert!(is_image("image/png"));
        assert!(is_image("Image/JPEG; foo=bar"));
        assert!(!is_image("text/plain"));
    }
}
