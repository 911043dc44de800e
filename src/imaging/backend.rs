//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the operations every backend must
//! support: identify, read_orientation, compose, and render_upright.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the
//! `image` crate for pixels and `kamadak-exif` for the orientation tag.

use super::orientation::Orientation;
use super::params::{ComposeParams, UprightParams};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("{message}")]
    NotFound { path: PathBuf, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {}: {message}", path.display())]
    Decode { path: PathBuf, message: String },
    #[error("Failed to encode {}: {message}", path.display())]
    Encode { path: PathBuf, message: String },
}

impl BackendError {
    /// Classify an I/O error raised while touching `path`.
    ///
    /// `NotFound` keeps the path in its message so callers can tell which of
    /// several inputs was missing.
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            BackendError::NotFound {
                path: path.to_path_buf(),
                message: format!("{}: {}", path.display(), err),
            }
        } else {
            BackendError::Io(err)
        }
    }
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Trait for image processing backends.
///
/// Operations never return a half-valid image: decode failures are errors.
pub trait ImageBackend: Sync {
    /// Get image dimensions.
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError>;

    /// Read the EXIF orientation tag. Absent EXIF is `Orientation::Normal`.
    fn read_orientation(&self, path: &Path) -> Result<Orientation, BackendError>;

    /// Rotate the base, draw the overlay along its bottom edge, and write a
    /// JPEG to `params.output`. Returns the output dimensions.
    fn compose(&self, params: &ComposeParams) -> Result<Dimensions, BackendError>;

    /// Decode and rotate a photo into an RGBA buffer.
    fn render_upright(&self, params: &UprightParams) -> Result<RgbaImage, BackendError>;
}
