//! Shared photo gallery: where `saveImage` puts upright photos.
//!
//! [`MediaStore`] is the seam. The production store is [`DirectoryGallery`],
//! a plain directory of JPEGs plus an `index.json` listing every insert in
//! order:
//!
//! ```text
//! gallery/
//! ├── index.json
//! ├── 2T2000s-1760880000123.jpg
//! └── 2T2000s-1760880000123-1.jpg   # same millisecond, suffixed
//! ```
//!
//! Each index entry records title, description, file name, mime type,
//! dimensions, and the insertion time in Unix milliseconds.

use crate::imaging::Quality;
use crate::imaging::rust_backend::write_jpeg;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

pub const INDEX_FILE: &str = "index.json";
pub const JPEG_MIME: &str = "image/jpeg";

#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Gallery index error: {0}")]
    Index(#[from] serde_json::Error),
    #[error("Failed to encode gallery image: {0}")]
    Encode(String),
}

/// One registered image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryEntry {
    pub file_name: String,
    pub title: String,
    pub description: String,
    pub mime_type: String,
    pub width: u32,
    pub height: u32,
    /// Unix milliseconds.
    pub date_added: u64,
}

/// A user-visible image collection that accepts new images.
pub trait MediaStore {
    fn insert_image(
        &self,
        image: &RgbaImage,
        title: &str,
        description: &str,
    ) -> Result<GalleryEntry, GalleryError>;
}

/// Directory-backed gallery with a JSON index.
#[derive(Debug, Clone)]
pub struct DirectoryGallery {
    root: PathBuf,
    quality: Quality,
}

impl DirectoryGallery {
    pub fn new(root: impl Into<PathBuf>, quality: Quality) -> Self {
        Self {
            root: root.into(),
            quality,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a stored entry.
    pub fn path_of(&self, entry: &GalleryEntry) -> PathBuf {
        self.root.join(&entry.file_name)
    }

    /// All entries in insertion order. An absent index is an empty gallery.
    pub fn entries(&self) -> Result<Vec<GalleryEntry>, GalleryError> {
        let index_path = self.root.join(INDEX_FILE);
        if !index_path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&index_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn write_index(&self, entries: &[GalleryEntry]) -> Result<(), GalleryError> {
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), entries)?;
        tmp.as_file_mut().flush()?;
        tmp.persist(self.root.join(INDEX_FILE))
            .map_err(|e| GalleryError::Io(e.error))?;
        Ok(())
    }
}

/// Reduce a title to characters safe in a file name.
fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned
    }
}

/// Pick `<stem>-<millis>.jpg`, adding `-1`, `-2`… until the name is free.
fn unique_file_name(root: &Path, stem: &str, millis: u64) -> String {
    let base = format!("{stem}-{millis}");
    let mut candidate = format!("{base}.jpg");
    let mut n = 1;
    while root.join(&candidate).exists() {
        candidate = format!("{base}-{n}.jpg");
        n += 1;
    }
    candidate
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

impl MediaStore for DirectoryGallery {
    fn insert_image(
        &self,
        image: &RgbaImage,
        title: &str,
        description: &str,
    ) -> Result<GalleryEntry, GalleryError> {
        fs::create_dir_all(&self.root)?;
        let mut entries = self.entries()?;

        // Encode beside the gallery; nothing appears under a final name
        // until the index is about to be written.
        let mut tmp = tempfile::NamedTempFile::new_in(&self.root)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            write_jpeg(image, &mut writer, self.quality)
                .map_err(|e| GalleryError::Encode(e.to_string()))?;
            writer.flush()?;
        }

        let date_added = now_millis();
        let file_name = unique_file_name(&self.root, &sanitize_title(title), date_added);
        let path = self.root.join(&file_name);

        let entry = GalleryEntry {
            file_name,
            title: title.to_string(),
            description: description.to_string(),
            mime_type: JPEG_MIME.to_string(),
            width: image.width(),
            height: image.height(),
            date_added,
        };
        entries.push(entry.clone());

        tmp.persist_noclobber(&path).map_err(|e| GalleryError::Io(e.error))?;
        if let Err(e) = self.write_index(&entries) {
            let _ = fs::remove_file(&path);
            return Err(e);
        }

        Ok(entry)
    }
}
