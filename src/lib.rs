//! # Overlay Composer
//!
//! Stamps a branding overlay across the bottom of a photo and hands finished
//! photos to a gallery. The photo's EXIF orientation is honoured first, so the
//! overlay always lands along the bottom edge of the picture as the viewer
//! sees it.
//!
//! # Architecture: Command → Worker → Backend
//!
//! ```text
//! caller ──MethodCall──▶ Dispatcher ──▶ Composer ──▶ ImageBackend (decode, rotate, composite, encode)
//!        ◀────Reply─────                           └─▶ MediaStore   (gallery insert)
//! ```
//!
//! A call names a method and carries string arguments. It is decoded once into
//! a typed [`channel::Command`], executed on a worker thread, and answered with
//! exactly one [`channel::Reply`]. The `serve` subcommand speaks this protocol
//! as JSON lines on stdin/stdout; the one-shot `add-overlay` and `save`
//! subcommands call the same [`imaging`] operations directly.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`channel`] | Method calls, typed commands, replies, the worker thread, and the JSON-lines wire |
//! | [`imaging`] | Orientation, overlay layout math, the `image`-crate backend, high-level operations |
//! | [`gallery`] | `MediaStore` trait and the directory-backed gallery |
//! | [`config`] | `composer.toml` loading, stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Overlay Geometry
//!
//! The overlay is stretched to the full width of the upright photo and keeps
//! its own aspect ratio, so its height is `width × overlay_h / overlay_w`,
//! truncated. It is pinned to the bottom-left corner. An overlay proportionally
//! taller than the photo starts above the top edge and is clipped there. The
//! pure math lives in [`imaging::calculate_overlay_layout`].
//!
//! ## In-Place, Atomic Replacement
//!
//! `addOverlayToImage` overwrites the photo it was given. The JPEG is encoded
//! to a temporary file beside the photo and renamed over it, so a failure at
//! any point leaves the original bytes untouched.
//!
//! ## Only Rotations Are Corrected
//!
//! EXIF orientations 1, 3, 6 and 8 map to 0°, 180°, 90° and 270°. The mirrored
//! orientations (2, 4, 5, 7) are treated as upright. See
//! [`imaging::Orientation::rotation`].
//!
//! ## Exactly One Reply
//!
//! Every call produces one terminal [`channel::Reply`]: success, a coded error,
//! or not-implemented. Failures are values, never panics.

pub mod channel;
pub mod config;
pub mod gallery;
pub mod imaging;
pub mod output;

#[cfg(test)]
pub(crate) mod test_helpers;
