//! Validation of admin image uploads.
//!
//! Files are checked before any byte reaches the CMS: content type,
//! per-file size, and per-request count. Every rejection names the
//! offending file so the admin UI can report errors per file.

use thiserror::Error;

/// Content types accepted for product images.
pub const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];

/// Maximum size per image file.
pub const MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

/// Maximum number of images per upload request.
pub const MAX_IMAGES: usize = 4;

/// Rejection of an uploaded image.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Too many images: at most {MAX_IMAGES} per upload")]
    TooManyImages,

    #[error("{filename}: unsupported type {content_type}, expected JPEG, PNG, or WebP")]
    UnsupportedType {
        filename: String,
        content_type: String,
    },

    #[error("{filename}: file exceeds the 10 MB limit")]
    TooLarge { filename: String },
}

/// Validate one image against the type and size limits.
///
/// # Errors
///
/// Returns an [`UploadError`] naming the file when it is rejected.
pub fn validate_image(filename: &str, content_type: &str, size: usize) -> Result<(), UploadError> {
    if !ALLOWED_CONTENT_TYPES.contains(&content_type) {
        return Err(UploadError::UnsupportedType {
            filename: filename.to_owned(),
            content_type: content_type.to_owned(),
        });
    }

    if size > MAX_FILE_BYTES {
        return Err(UploadError::TooLarge {
            filename: filename.to_owned(),
        });
    }

    Ok(())
}

/// Validate the number of images in one upload request.
///
/// # Errors
///
/// Returns [`UploadError::TooManyImages`] above [`MAX_IMAGES`].
pub const fn validate_image_count(count: usize) -> Result<(), UploadError> {
    if count > MAX_IMAGES {
        return Err(UploadError::TooManyImages);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_types() {
        for content_type in ALLOWED_CONTENT_TYPES {
            assert_eq!(validate_image("a.img", content_type, 1024), Ok(()));
        }
    }

    #[test]
    fn test_rejects_unsupported_type() {
        let err = validate_image("sketchy.gif", "image/gif", 1024).unwrap_err();
        assert_eq!(
            err,
            UploadError::UnsupportedType {
                filename: "sketchy.gif".to_string(),
                content_type: "image/gif".to_string(),
            }
        );
        assert!(err.to_string().contains("sketchy.gif"));
    }

    #[test]
    fn test_rejects_oversized_file() {
        let err = validate_image("huge.png", "image/png", MAX_FILE_BYTES + 1).unwrap_err();
        assert_eq!(
            err,
            UploadError::TooLarge {
                filename: "huge.png".to_string(),
            }
        );
    }

    #[test]
    fn test_size_limit_is_inclusive() {
        assert_eq!(validate_image("exact.png", "image/png", MAX_FILE_BYTES), Ok(()));
    }

    #[test]
    fn test_image_count_limit() {
        assert_eq!(validate_image_count(MAX_IMAGES), Ok(()));
        assert_eq!(
            validate_image_count(MAX_IMAGES + 1),
            Err(UploadError::TooManyImages)
        );
    }
}
