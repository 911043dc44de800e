//! Pure calculation functions for rotation and overlay placement.
//!
//! All functions here are pure and testable without any I/O or images.

use super::orientation::Rotation;

/// Dimensions of an image after rotating it.
///
/// Quarter turns swap width and height; 0° and 180° keep them.
///
/// # Examples
/// ```
/// # use overlay_composer::imaging::{Rotation, calculate_rotated_dimensions};
/// assert_eq!(calculate_rotated_dimensions((300, 400), Rotation::Cw90), (400, 300));
/// assert_eq!(calculate_rotated_dimensions((300, 400), Rotation::Cw180), (300, 400));
/// ```
pub fn calculate_rotated_dimensions(dims: (u32, u32), rotation: Rotation) -> (u32, u32) {
    let (w, h) = dims;
    if rotation.swaps_axes() { (h, w) } else { (w, h) }
}

/// Destination rectangle for the overlay on the rotated base photo.
///
/// `y` is signed: an overlay taller than the base starts above the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayLayout {
    pub x: i64,
    pub y: i64,
    pub width: u32,
    pub height: u32,
}

impl OverlayLayout {
    /// True when nothing would be drawn.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Stretch the overlay to the base width and anchor it to the bottom edge.
///
/// The height keeps the overlay's aspect ratio. The ratio is taken in `f32`
/// and the product truncated, so a 400×100 overlay on a 400-wide base is
/// exactly 100 rows tall.
///
/// # Arguments
/// * `base` - Rotated base photo dimensions (width, height)
/// * `overlay` - Original overlay dimensions (width, height)
pub fn calculate_overlay_layout(base: (u32, u32), overlay: (u32, u32)) -> OverlayLayout {
    let (base_w, base_h) = base;
    let (overlay_w, overlay_h) = overlay;

    let height = if overlay_w == 0 {
        0
    } else {
        let aspect = overlay_h as f32 / overlay_w as f32;
        (base_w as f32 * aspect) as u32
    };

    OverlayLayout {
        x: 0,
        y: base_h as i64 - height as i64,
        width: base_w,
        height,
    }
}
