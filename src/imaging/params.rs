//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which resolves orientation and decides where output goes) and the
//! [`backend`](super::backend) (which does the actual pixel work). This
//! separation allows swapping backends (e.g. for testing with a mock) without
//! changing operation logic.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 100). Clamped on construction.
//! - [`ComposeParams`]: base + overlay sources, output path, rotation, quality.
//! - [`UprightParams`]: source and rotation for an in-memory upright render.

use super::orientation::Rotation;
use std::path::PathBuf;

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub const MAX: Quality = Quality(100);

    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self::MAX
    }
}

/// Parameters for an overlay composition.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeParams {
    pub base: PathBuf,
    pub overlay: PathBuf,
    /// Where the JPEG lands. May equal `base`; the write is atomic.
    pub output: PathBuf,
    pub rotation: Rotation,
    pub quality: Quality,
}

/// Parameters for decoding and rotating a photo without writing it.
#[derive(Debug, Clone, PartialEq)]
pub struct UprightParams {
    pub source: PathBuf,
    pub rotation: Rotation,
}
