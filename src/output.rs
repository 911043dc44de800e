//! CLI output formatting for every subcommand.
//!
//! # Output Format
//!
//! ## add-overlay
//!
//! ```text
//! photo.jpg
//!     Orientation: 6 (rotated 90°)
//!     Output: 4000x3000 JPEG, replaced in place
//! ```
//!
//! ## save
//!
//! ```text
//! photo.jpg → gallery/2T2000s-1760880000123.jpg
//!     Title: 2T2000s
//!     Description: Taken from the 2T200s app
//!     Size: 3000x4000
//! ```
//!
//! ## serve (on stderr, after EOF)
//!
//! ```text
//! Served 12 requests: 10 succeeded, 2 failed (1 malformed)
//! ```
//!
//! # Architecture
//!
//! Each subcommand has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper. Format functions do no I/O.

use crate::channel::ServeStats;
use crate::gallery::GalleryEntry;
use crate::imaging::{ComposeOutcome, Orientation};
use std::path::Path;

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `6 (rotated 90°)`, `1 (upright)`, `5 (mirrored, not corrected)`.
fn orientation_label(orientation: Orientation) -> String {
    let value = orientation.exif_value();
    let degrees = orientation.rotation().degrees();
    match orientation {
        Orientation::Normal => format!("{value} (upright)"),
        Orientation::Rotate90 | Orientation::Rotate180 | Orientation::Rotate270 => {
            format!("{value} (rotated {degrees}°)")
        }
        Orientation::Unknown(_) => format!("{value} (unknown, not corrected)"),
        _ => format!("{value} (mirrored, not corrected)"),
    }
}

pub fn format_compose_output(outcome: &ComposeOutcome) -> Vec<String> {
    vec![
        outcome.path.display().to_string(),
        format!(
            "{}Orientation: {}",
            indent(1),
            orientation_label(outcome.orientation)
        ),
        format!(
            "{}Output: {}x{} JPEG, replaced in place",
            indent(1),
            outcome.dimensions.width,
            outcome.dimensions.height
        ),
    ]
}

pub fn format_save_output(source: &Path, stored: &Path, entry: &GalleryEntry) -> Vec<String> {
    let mut lines = vec![
        format!("{} → {}", source.display(), stored.display()),
        format!("{}Title: {}", indent(1), entry.title),
    ];
    if !entry.description.is_empty() {
        lines.push(format!("{}Description: {}", indent(1), entry.description));
    }
    lines.push(format!("{}Size: {}x{}", indent(1), entry.width, entry.height));
    lines
}

pub fn format_orientation_output(path: &Path, orientation: Orientation) -> Vec<String> {
    vec![format!(
        "{}: orientation {}",
        path.display(),
        orientation_label(orientation)
    )]
}

pub fn format_serve_summary(stats: &ServeStats) -> String {
    let mut line = format!(
        "Served {} requests: {} succeeded, {} failed",
        stats.requests, stats.succeeded, stats.failed
    );
    if stats.malformed > 0 {
        line.push_str(&format!(" ({} malformed)", stats.malformed));
    }
    line
}

pub fn print_compose_output(outcome: &ComposeOutcome) {
    for line in format_compose_output(outcome) {
        println!("{}", line);
    }
}

pub fn print_save_output(source: &Path, stored: &Path, entry: &GalleryEntry) {
    for line in format_save_output(source, stored, entry) {
        println!("{}", line);
    }
}

pub fn print_orientation_output(path: &Path, orientation: Orientation) {
    for line in format_orientation_output(path, orientation) {
        println!("{}", line);
    }
}

/// Goes to stderr: stdout carries the JSON responses.
pub fn print_serve_summary(stats: &ServeStats) {
    eprintln!("{}", format_serve_summary(stats));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::{Dimensions, Rotation};
    use std::path::PathBuf;

    #[test]
    fn compose_output_shows_rotation_and_size() {
        let outcome = ComposeOutcome {
            path: PathBuf::from("photo.jpg"),
            orientation: Orientation::Rotate90,
            rotation: Rotation::Cw90,
            dimensions: Dimensions {
                width: 400,
                height: 300,
            },
        };
        assert_eq!(
            format_compose_output(&outcome),
            vec![
                "photo.jpg",
                "    Orientation: 6 (rotated 90°)",
                "    Output: 400x300 JPEG, replaced in place",
            ]
        );
    }

    #[test]
    fn orientation_labels() {
        assert_eq!(orientation_label(Orientation::Normal), "1 (upright)");
        assert_eq!(orientation_label(Orientation::Rotate270), "8 (rotated 270°)");
        assert_eq!(
            orientation_label(Orientation::FlipHorizontal),
            "2 (mirrored, not corrected)"
        );
        assert_eq!(
            orientation_label(Orientation::Unknown(12)),
            "12 (unknown, not corrected)"
        );
    }

    #[test]
    fn save_output_skips_empty_description() {
        let entry = GalleryEntry {
            file_name: "t-1.jpg".into(),
            title: "t".into(),
            description: String::new(),
            mime_type: "image/jpeg".into(),
            width: 3,
            height: 4,
            date_added: 1,
        };
        let lines = format_save_output(Path::new("a.jpg"), Path::new("g/t-1.jpg"), &entry);
        assert_eq!(lines, vec!["a.jpg → g/t-1.jpg", "    Title: t", "    Size: 3x4"]);
    }

    #[test]
    fn serve_summary_mentions_malformed_only_when_present() {
        let mut stats = ServeStats {
            requests: 3,
            succeeded: 2,
            failed: 1,
            malformed: 0,
        };
        assert_eq!(
            format_serve_summary(&stats),
            "Served 3 requests: 2 succeeded, 1 failed"
        );
        stats.malformed = 1;
        assert_eq!(
            format_serve_summary(&stats),
            "Served 3 requests: 2 succeeded, 1 failed (1 malformed)"
        );
    }
}
