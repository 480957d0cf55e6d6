//! Upload error types.

use thiserror::Error;

/// Errors that can occur while storing an uploaded image.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file extension is not in the allow list.
    #[error("unsupported image type: {file_name}")]
    UnsupportedType { file_name: String },

    /// Writing the file failed.
    #[error("upload io error: {0}")]
    Io(#[from] std::io::Error),
}
