//! Fixture builders shared by the integration tests.

#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use std::path::Path;

pub const RED: Rgb<u8> = Rgb([220, 20, 20]);
pub const BLUE: Rgb<u8> = Rgb([20, 20, 220]);

fn jpeg_bytes(img: &RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, 95)
        .write_image(
            img.as_raw(),
            img.width(),
            img.height(),
            image::ExtendedColorType::Rgb8,
        )
        .unwrap();
    bytes
}

/// Solid-colour JPEG, optionally tagged with an EXIF orientation.
pub fn write_jpeg(path: &Path, width: u32, height: u32, color: Rgb<u8>, orientation: Option<u16>) {
    let jpeg = jpeg_bytes(&RgbImage::from_pixel(width, height, color));
    let bytes = match orientation {
        None => jpeg,
        Some(value) => {
            let mut tagged = jpeg[..2].to_vec();
            tagged.extend_from_slice(&orientation_app1(value));
            tagged.extend_from_slice(&jpeg[2..]);
            tagged
        }
    };
    std::fs::write(path, bytes).unwrap();
}

/// JPEG whose top half is `top` and bottom half is `bottom`.
pub fn write_split_jpeg(
    path: &Path,
    width: u32,
    height: u32,
    top: Rgb<u8>,
    bottom: Rgb<u8>,
    orientation: u16,
) {
    let img = RgbImage::from_fn(width, height, |_, y| {
        if y < height / 2 { top } else { bottom }
    });
    let jpeg = jpeg_bytes(&img);
    let mut tagged = jpeg[..2].to_vec();
    tagged.extend_from_slice(&orientation_app1(orientation));
    tagged.extend_from_slice(&jpeg[2..]);
    std::fs::write(path, tagged).unwrap();
}

pub fn write_png(path: &Path, width: u32, height: u32, color: Rgba<u8>) {
    RgbaImage::from_pixel(width, height, color).save(path).unwrap();
}

/// APP1 segment: `Exif\0\0` + big-endian TIFF with one Orientation entry.
fn orientation_app1(value: u16) -> Vec<u8> {
    let mut seg = vec![0xFF, 0xE1, 0x00, 0x22];
    seg.extend_from_slice(b"Exif\0\0");
    seg.extend_from_slice(b"MM\x00\x2A\x00\x00\x00\x08");
    seg.extend_from_slice(&[0x00, 0x01]);
    seg.extend_from_slice(&[0x01, 0x12, 0x00, 0x03, 0x00, 0x00, 0x00, 0x01]);
    seg.extend_from_slice(&value.to_be_bytes());
    seg.extend_from_slice(&[0x00, 0x00]);
    seg.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    seg
}

pub fn load(path: &Path) -> RgbaImage {
    image::open(path).unwrap().to_rgba8()
}

/// Channel-wise closeness, tolerant of JPEG error.
pub fn assert_near(actual: Rgba<u8>, expected: Rgb<u8>, at: (u32, u32)) {
    for c in 0..3 {
        let d = (actual[c] as i32 - expected[c] as i32).abs();
        assert!(
            d <= 16,
            "pixel {at:?} = {actual:?}, expected about {expected:?}"
        );
    }
}

pub fn is_jpeg(path: &Path) -> bool {
    let bytes = std::fs::read(path).unwrap();
    bytes.starts_with(&[0xFF, 0xD8])
}
