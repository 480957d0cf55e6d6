//! Product image uploads.
//!
//! Images are written under `<static_dir>/<subdir>/` and referenced from
//! product rows by a path relative to the static root (`uploads/mug.png`),
//! which is also their public URL under `/static/`.
//!
//! # Filename sanitization
//!
//! 1. The extension is the text after the last `.` of the submitted name,
//!    lowercased, and must be in the allow list.
//! 2. Only the final path component (split on `/` and `\`) is kept.
//! 3. Non-ASCII characters are dropped, whitespace runs become `_`, and
//!    anything outside `[A-Za-z0-9_.-]` is dropped.
//! 4. Leading/trailing `.` and `_` are trimmed; an empty stem becomes `upload`.
//!
//! Two uploads with the same sanitized name overwrite each other.

mod error;

pub use error::UploadError;

use std::path::{Component, Path, PathBuf};

use axum::body::Bytes;
use tracing::instrument;

use crate::config::UploadConfig;

/// Stem used when sanitization leaves nothing behind.
const FALLBACK_STEM: &str = "upload";

/// An image file received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Filename as submitted by the browser.
    pub file_name: String,
    pub bytes: Bytes,
}

/// Stores and removes product images on the local filesystem.
#[derive(Debug, Clone)]
pub struct ImageUploads {
    static_dir: PathBuf,
    subdir: String,
    allowed_extensions: Vec<String>,
}

impl ImageUploads {
    /// Create an upload store from configuration.
    #[must_use]
    pub fn new(config: &UploadConfig) -> Self {
        Self {
            static_dir: config.static_dir.clone(),
            subdir: config.subdir.clone(),
            allowed_extensions: config.allowed_extensions.clone(),
        }
    }

    /// Whether the submitted filename has an allowed image extension.
    #[must_use]
    pub fn is_allowed(&self, file_name: &str) -> bool {
        extension(file_name).is_some_and(|ext| self.allowed_extensions.contains(&ext))
    }

    /// Validate and store an uploaded image.
    ///
    /// Returns the path relative to the static root, or an empty string when
    /// no file was submitted. Nothing is written for a rejected file.
    ///
    /// # Errors
    ///
    /// Returns `UploadError::UnsupportedType` for a disallowed extension and
    /// `UploadError::Io` if the file cannot be written.
    #[instrument(skip(self, upload), fields(file_name))]
    pub async fn save(&self, upload: Option<UploadedImage>) -> Result<String, UploadError> {
        let Some(upload) = upload.filter(|upload| !upload.file_name.is_empty()) else {
            return Ok(String::new());
        };
        tracing::Span::current().record("file_name", upload.file_name.as_str());

        if !self.is_allowed(&upload.file_name) {
            return Err(UploadError::UnsupportedType {
                file_name: upload.file_name,
            });
        }
        let Some(file_name) = sanitize_filename(&upload.file_name) else {
            return Err(UploadError::UnsupportedType {
                file_name: upload.file_name,
            });
        };

        let dir = self.static_dir.join(&self.subdir);
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(&file_name), &upload.bytes).await?;

        tracing::info!(stored_as = %file_name, bytes = upload.bytes.len(), "Image uploaded");
        Ok(format!("{}/{file_name}", self.subdir))
    }

    /// Delete a stored image, best effort.
    ///
    /// Empty paths and paths that would escape the static root are ignored.
    /// Filesystem errors are logged and swallowed. Returns whether a file was
    /// removed.
    #[instrument(skip(self))]
    pub async fn remove(&self, image_url: &str) -> bool {
        if image_url.is_empty() {
            return false;
        }

        let relative = Path::new(image_url);
        if !relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
        {
            tracing::warn!("Refusing to delete image outside the static root");
            return false;
        }

        match tokio::fs::remove_file(self.static_dir.join(relative)).await {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Image already missing from disk");
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to delete image");
                false
            }
        }
    }
}

/// Lowercased text after the last `.`, if there is one.
fn extension(file_name: &str) -> Option<String> {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
}

/// Sanitize a submitted filename into `<stem>.<ext>`.
///
/// Returns `None` if the name has no extension or the extension has no
/// safe characters left.
#[must_use]
pub fn sanitize_filename(file_name: &str) -> Option<String> {
    let base = file_name.rsplit(['/', '\\']).next().unwrap_or_default();
    let (stem, ext) = base.rsplit_once('.')?;

    let ext: String = ext
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    if ext.is_empty() {
        return None;
    }

    let stem = sanitize_stem(stem);
    let stem = if stem.is_empty() { FALLBACK_STEM } else { &stem };

    Some(format!("{stem}.{ext}"))
}

fn sanitize_stem(stem: &str) -> String {
    let joined = stem
        .chars()
        .filter(char::is_ascii)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}
