//! High-level image operations.
//!
//! These functions combine orientation resolution with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::orientation::{Orientation, Rotation};
use super::params::{ComposeParams, Quality, UprightParams};
use crate::gallery::{GalleryEntry, GalleryError, MediaStore};
use log::{debug, warn};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

#[derive(Error, Debug)]
pub enum SaveError {
    #[error(transparent)]
    Imaging(#[from] BackendError),
    #[error(transparent)]
    Gallery(#[from] GalleryError),
}

/// Read the photo's orientation tag and turn it into a rotation.
pub fn resolve_rotation(
    backend: &impl ImageBackend,
    path: &Path,
) -> Result<(Orientation, Rotation)> {
    let orientation = backend.read_orientation(path)?;
    let rotation = orientation.rotation();
    debug!(
        "{}: orientation {} → {}°",
        path.display(),
        orientation.exif_value(),
        rotation.degrees()
    );
    Ok((orientation, rotation))
}

/// Configuration for overlay composition.
#[derive(Debug, Clone, Default)]
pub struct ComposeConfig {
    pub quality: Quality,
}

/// What an overlay composition produced.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeOutcome {
    /// The photo path, now holding the composited JPEG.
    pub path: PathBuf,
    pub orientation: Orientation,
    pub rotation: Rotation,
    pub dimensions: Dimensions,
}

/// Plan an in-place composition without executing it.
pub fn plan_compose(
    image_path: &Path,
    overlay_path: &Path,
    rotation: Rotation,
    config: &ComposeConfig,
) -> ComposeParams {
    ComposeParams {
        base: image_path.to_path_buf(),
        overlay: overlay_path.to_path_buf(),
        output: image_path.to_path_buf(),
        rotation,
        quality: config.quality,
    }
}

/// Correct the photo's rotation, draw the overlay along its bottom edge and
/// replace the photo with the JPEG result.
///
/// The photo is only replaced once the new JPEG is fully written.
pub fn add_overlay_to_image(
    backend: &impl ImageBackend,
    image_path: &Path,
    overlay_path: &Path,
    config: &ComposeConfig,
) -> Result<ComposeOutcome> {
    let (orientation, rotation) = resolve_rotation(backend, image_path)?;
    let params = plan_compose(image_path, overlay_path, rotation, config);
    let dimensions = backend.compose(&params)?;

    Ok(ComposeOutcome {
        path: image_path.to_path_buf(),
        orientation,
        rotation,
        dimensions,
    })
}

/// Title and description attached to gallery inserts.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveConfig {
    pub title: String,
    pub description: String,
}

/// Rotate the photo upright and insert it into the media store.
///
/// An EXIF read failure here is logged and the photo is saved as stored;
/// a missing photo still fails when it is decoded.
pub fn save_image(
    backend: &impl ImageBackend,
    store: &impl MediaStore,
    image_path: &Path,
    config: &SaveConfig,
) -> std::result::Result<GalleryEntry, SaveError> {
    let rotation = match resolve_rotation(backend, image_path) {
        Ok((_, rotation)) => rotation,
        Err(e) => {
            warn!("could not read EXIF from {}: {}", image_path.display(), e);
            Rotation::None
        }
    };

    let upright = backend.render_upright(&UprightParams {
        source: image_path.to_path_buf(),
        rotation,
    })?;

    let entry = store.insert_image(&upright, &config.title, &config.description)?;
    Ok(entry)
}
