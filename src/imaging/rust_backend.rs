//! Pure Rust image processing backend.
//!
//! Everything is statically linked into the binary.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` (pure Rust decoders) |
//! | EXIF orientation | `kamadak-exif` via [`read_orientation`](super::orientation::read_orientation) |
//! | Rotate | `DynamicImage::rotate90` / `rotate180` / `rotate270` (exact pixel permutation) |
//! | Overlay stretch + composite | nearest-neighbour sampling straight into the canvas, visible rows only |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` |
//! | Replace in place | `tempfile::NamedTempFile::persist` (rename over the original) |

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{OverlayLayout, calculate_overlay_layout};
use super::orientation::{Orientation, Rotation, read_orientation};
use super::params::{ComposeParams, Quality, UprightParams};
use image::codecs::jpeg::JpegEncoder;
use image::{
    DynamicImage, ExtendedColorType, ImageEncoder, ImageError, ImageReader, RgbImage, RgbaImage,
};
use log::debug;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(e) => BackendError::from_io(path, e),
        other => BackendError::Decode {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}

fn encode_error(path: &Path, err: ImageError) -> BackendError {
    match err {
        ImageError::IoError(e) => BackendError::Io(e),
        other => BackendError::Encode {
            path: path.to_path_buf(),
            message: other.to_string(),
        },
    }
}

/// Load and decode an image from disk.
///
/// The format is sniffed from the content, so a PNG saved as `.jpg` still decodes.
fn load_image(path: &Path) -> Result<DynamicImage, BackendError> {
    ImageReader::open(path)
        .map_err(|e| BackendError::from_io(path, e))?
        .with_guessed_format()
        .map_err(|e| BackendError::from_io(path, e))?
        .decode()
        .map_err(|e| decode_error(path, e))
}

/// Rotate clockwise by whole quarter turns.
///
/// Rotating about the centre and recomputing the bounding box reduces to a
/// pixel permutation for these angles, so no resampling happens.
pub fn rotate(img: &DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::None => img.clone(),
        Rotation::Cw90 => img.rotate90(),
        Rotation::Cw180 => img.rotate180(),
        Rotation::Cw270 => img.rotate270(),
    }
}

/// Rotate the base upright and draw the overlay across its bottom edge.
///
/// The canvas has exactly the rotated base's dimensions. Base pixels are
/// copied first, then the stretched overlay replaces whatever it covers.
/// Overlay rows above the canvas top are clipped.
///
/// Overlay pixels are copied as-is, alpha included, with no blending. The
/// JPEG encoder later drops alpha, so a fully transparent overlay pixel such
/// as `(0, 0, 255, 0)` ends up as solid blue in the written file.
pub fn compose_images(
    base: &DynamicImage,
    overlay: &DynamicImage,
    rotation: Rotation,
) -> RgbaImage {
    let mut canvas = rotate(base, rotation).to_rgba8();
    let (width, height) = canvas.dimensions();

    let layout = calculate_overlay_layout((width, height), (overlay.width(), overlay.height()));
    debug!(
        "overlay {}x{} placed at ({}, {}) as {}x{} on {}x{}",
        overlay.width(),
        overlay.height(),
        layout.x,
        layout.y,
        layout.width,
        layout.height,
        width,
        height
    );

    if !layout.is_empty() {
        draw_stretched(&mut canvas, &overlay.to_rgba8(), &layout);
    }

    canvas
}

/// Nearest source index for destination index `dst` when `src_len` samples
/// are stretched over `dst_len`. Samples at pixel centres.
fn nearest(dst: u64, dst_len: u64, src_len: u64) -> u32 {
    (((2 * dst + 1) * src_len) / (2 * dst_len)).min(src_len - 1) as u32
}

/// Stretch `overlay` onto the `layout` rectangle of `canvas`, replacing pixels.
///
/// Only destination pixels inside the canvas are visited, so the cost is
/// bounded by the canvas size however tall the layout is.
fn draw_stretched(canvas: &mut RgbaImage, overlay: &RgbaImage, layout: &OverlayLayout) {
    let (canvas_w, canvas_h) = canvas.dimensions();
    let (src_w, src_h) = overlay.dimensions();
    if src_w == 0 || src_h == 0 {
        return;
    }

    let top = layout.y.max(0);
    let bottom = (layout.y + layout.height as i64).min(canvas_h as i64);
    let left = layout.x.max(0);
    let right = (layout.x + layout.width as i64).min(canvas_w as i64);

    for cy in top..bottom {
        let sy = nearest((cy - layout.y) as u64, layout.height as u64, src_h as u64);
        for cx in left..right {
            let sx = nearest((cx - layout.x) as u64, layout.width as u64, src_w as u64);
            canvas.put_pixel(cx as u32, cy as u32, *overlay.get_pixel(sx, sy));
        }
    }
}

/// Encode an RGBA buffer as baseline JPEG. Alpha is dropped.
pub(crate) fn write_jpeg<W: Write>(
    image: &RgbaImage,
    writer: W,
    quality: Quality,
) -> Result<(), ImageError> {
    let (width, height) = image.dimensions();
    let rgb = RgbImage::from_fn(width, height, |x, y| {
        let p = image.get_pixel(x, y);
        image::Rgb([p[0], p[1], p[2]])
    });
    JpegEncoder::new_with_quality(writer, quality.value()).write_image(
        rgb.as_raw(),
        width,
        height,
        ExtendedColorType::Rgb8,
    )
}

/// Encode into a sibling temp file, then rename it over `output`.
///
/// Until the rename, `output` is untouched; a failed encode leaves the
/// original bytes in place and the temp file is removed on drop.
fn write_jpeg_atomic(
    image: &RgbaImage,
    output: &Path,
    quality: Quality,
) -> Result<(), BackendError> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp =
        tempfile::NamedTempFile::new_in(dir).map_err(|e| BackendError::from_io(dir, e))?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write_jpeg(image, &mut writer, quality).map_err(|e| encode_error(output, e))?;
        writer.flush()?;
    }

    // Keep the replaced file's permissions rather than the temp file's 0600.
    if let Ok(meta) = std::fs::metadata(output) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }

    tmp.persist(output).map_err(|e| BackendError::Io(e.error))?;
    Ok(())
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, BackendError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| decode_error(path, e))?;
        Ok(Dimensions { width, height })
    }

    fn read_orientation(&self, path: &Path) -> Result<Orientation, BackendError> {
        read_orientation(path)
    }

    fn compose(&self, params: &ComposeParams) -> Result<Dimensions, BackendError> {
        let base = load_image(&params.base)?;
        let overlay = load_image(&params.overlay)?;

        let canvas = compose_images(&base, &overlay, params.rotation);
        write_jpeg_atomic(&canvas, &params.output, params.quality)?;

        Ok(Dimensions {
            width: canvas.width(),
            height: canvas.height(),
        })
    }

    fn render_upright(&self, params: &UprightParams) -> Result<RgbaImage, BackendError> {
        let img = load_image(&params.source)?;
        Ok(rotate(&img, params.rotation).to_rgba8())
    }
}
