//! Article image handling: constraint checks, naming, and the move into the
//! configured directory. Only the resulting filename is persisted on the
//! article, never the directory.

use crate::error::AppError;
use std::fs;
use std::path::{Path, PathBuf};

pub const MAX_IMAGE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Webp,
}

impl ImageKind {
    /// Sniffs the content type from magic bytes; the client-supplied
    /// filename and declared MIME type are not trusted.
    pub fn detect(data: &[u8]) -> Option<ImageKind> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageKind::Jpeg)
        } else if data.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
            Some(ImageKind::Png)
        } else if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
            Some(ImageKind::Webp)
        } else {
            None
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            ImageKind::Jpeg => "jpeg",
            ImageKind::Png => "png",
            ImageKind::Webp => "webp",
        }
    }
}

pub fn images_directory() -> PathBuf {
    std::env::var("IMAGES_DIRECTORY")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("uploads/images"))
}

/// Applies the article form's image constraints: at most 2 MiB, content one
/// of jpeg/png/webp.
pub fn validate(data: &[u8]) -> Result<ImageKind, AppError> {
    if data.len() > MAX_IMAGE_BYTES {
        return Err(AppError::Validation(
            "image exceeds the 2 MiB limit".to_owned(),
        ));
    }
    ImageKind::detect(data).ok_or_else(|| {
        AppError::Validation("please provide a valid image (.jpeg, .png, .webp)".to_owned())
    })
}

/// Derives the stored filename from the client-supplied one:
/// `"My Photo.PNG"` becomes `my-photo-<token>.png`. The extension comes
/// from the detected content type, not from the client name.
pub fn unique_filename(client_name: &str, kind: ImageKind) -> String {
    let stem = Path::new(client_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("image");
    let mut slug = voca_rs::manipulate::slugify(stem);
    if slug.is_empty() {
        slug = "image".to_owned();
    }
    format!(
        "{}-{}.{}",
        slug,
        uuid::Uuid::new_v4().simple(),
        kind.extension()
    )
}

/// Writes the validated bytes under `dir`. The caller decides what a failed
/// move means; the current policy is to log it and save the article without
/// an image reference.
pub fn store(dir: &Path, filename: &str, data: &[u8]) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(filename), data)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn detects_the_three_accepted_formats() {
        assert_eq!(
            ImageKind::detect(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]),
            Some(ImageKind::Jpeg)
        );
        assert_eq!(ImageKind::detect(&PNG_HEADER), Some(ImageKind::Png));
        let mut webp = b"RIFF\x00\x00\x00\x00WEBPVP8 ".to_vec();
        webp.extend_from_slice(&[0u8; 8]);
        assert_eq!(ImageKind::detect(&webp), Some(ImageKind::Webp));
        assert_eq!(ImageKind::detect(b"GIF89a"), None);
        assert_eq!(ImageKind::detect(b""), None);
    }

    #[test]
    fn validate_rejects_oversized_and_foreign_content() {
        let mut oversized = PNG_HEADER.to_vec();
        oversized.resize(MAX_IMAGE_BYTES + 1, 0);
        assert!(validate(&oversized).is_err());
        assert!(validate(b"GIF89a...").is_err());
        assert_eq!(validate(&PNG_HEADER).unwrap(), ImageKind::Png);
    }

    #[test]
    fn stored_name_is_slugified_with_a_uniqueness_token() {
        let name = unique_filename("My Photo.PNG", ImageKind::Png);
        assert!(name.starts_with("my-photo-"), "got {}", name);
        assert!(name.ends_with(".png"), "got {}", name);
        // slug + "-" + 32 hex chars + "." + ext
        assert_eq!(name.len(), "my-photo-".len() + 32 + ".png".len());
        assert!(!name.contains(' '));

        let again = unique_filename("My Photo.PNG", ImageKind::Png);
        assert_ne!(name, again);
    }

    #[test]
    fn unnameable_clients_still_get_a_filename() {
        let name = unique_filename("", ImageKind::Jpeg);
        assert!(name.starts_with("image-"), "got {}", name);
        assert!(name.ends_with(".jpeg"));
    }

    #[test]
    fn store_writes_into_the_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        store(dir.path(), "a-b.png", &PNG_HEADER).expect("write must succeed");
        let read = std::fs::read(dir.path().join("a-b.png")).expect("file must exist");
        assert_eq!(read, PNG_HEADER);
    }
}
