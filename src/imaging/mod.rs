//! Image processing in pure Rust.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::image_dimensions` |
//! | **EXIF orientation** | `kamadak-exif` (`Tag::Orientation`, primary IFD) |
//! | **Rotate upright** | `DynamicImage::rotate90/180/270` |
//! | **Overlay** | nearest-neighbour stretch drawn straight into the canvas |
//! | **Encode** | `JpegEncoder`, quality 100 by default |
//!
//! The module is split into:
//! - **Orientation**: EXIF tag model and reader
//! - **Calculations**: Pure functions for dimension and layout math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
pub mod orientation;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use calculations::{OverlayLayout, calculate_overlay_layout, calculate_rotated_dimensions};
pub use operations::{
    ComposeConfig, ComposeOutcome, SaveConfig, SaveError, add_overlay_to_image, save_image,
};
pub use orientation::{Orientation, Rotation};
pub use params::{ComposeParams, Quality, UprightParams};
pub use rust_backend::RustBackend;
