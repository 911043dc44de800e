//! EXIF orientation tag and the upright rotation it implies.
//!
//! Only the four pure rotations are corrected. Mirrored orientations
//! (2, 4, 5, 7) and anything out of range resolve to [`Rotation::None`],
//! the same as a photo with no EXIF block at all.
//!
//! ```text
//!     Tag  Orientation      Rotation to upright
//!     1    Normal           0°
//!     3    Rotate180        180°
//!     6    Rotate90         90° clockwise
//!     8    Rotate270        270° clockwise
//!     *    anything else    0°
//! ```

use super::backend::BackendError;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIF orientation tag value (TIFF tag 0x0112).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    Transpose,
    Rotate90,
    Transverse,
    Rotate270,
    /// A tag value outside 1..=8.
    Unknown(u32),
}

impl Orientation {
    /// Map a raw numeric tag value.
    pub fn from_exif(value: u32) -> Self {
        match value {
            1 => Self::Normal,
            2 => Self::FlipHorizontal,
            3 => Self::Rotate180,
            4 => Self::FlipVertical,
            5 => Self::Transpose,
            6 => Self::Rotate90,
            7 => Self::Transverse,
            8 => Self::Rotate270,
            other => Self::Unknown(other),
        }
    }

    pub fn exif_value(self) -> u32 {
        match self {
            Self::Normal => 1,
            Self::FlipHorizontal => 2,
            Self::Rotate180 => 3,
            Self::FlipVertical => 4,
            Self::Transpose => 5,
            Self::Rotate90 => 6,
            Self::Transverse => 7,
            Self::Rotate270 => 8,
            Self::Unknown(v) => v,
        }
    }

    /// Rotation needed to bring stored pixels upright.
    pub fn rotation(self) -> Rotation {
        match self {
            Self::Rotate90 => Rotation::Cw90,
            Self::Rotate180 => Rotation::Cw180,
            Self::Rotate270 => Rotation::Cw270,
            _ => Rotation::None,
        }
    }
}

/// Clockwise rotation in quarter turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    pub fn degrees(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Cw90 => 90,
            Self::Cw180 => 180,
            Self::Cw270 => 270,
        }
    }

    /// True when the rotation exchanges width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(self, Self::Cw90 | Self::Cw270)
    }
}

/// Read the orientation tag from an image file.
///
/// A missing file is a [`BackendError::NotFound`]; a read failure part-way
/// through the container is [`BackendError::Io`]. A file with no EXIF block,
/// no orientation field, or a container kamadak-exif does not understand
/// reads as [`Orientation::Normal`].
pub fn read_orientation(path: &Path) -> Result<Orientation, BackendError> {
    let file = File::open(path).map_err(|e| BackendError::from_io(path, e))?;
    let mut reader = BufReader::new(file);

    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::Io(e)) => return Err(BackendError::from_io(path, e)),
        Err(e) => {
            debug!("no usable EXIF in {}: {}", path.display(), e);
            return Ok(Orientation::Normal);
        }
    };

    let orientation = exif
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .map(Orientation::from_exif)
        .unwrap_or_default();

    Ok(orientation)
}
