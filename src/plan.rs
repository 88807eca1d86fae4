//! Destination path planning for imported photos.
//!
//! Every photo lands under the static photo root at
//! `<gallery slug>/<sanitized filename>`. The plan is a pure function of the
//! gallery name and the source file name — re-importing the same gallery with
//! the same source files overwrites the same destinations, which is the
//! documented re-run behavior.
//!
//! Filenames keep their original casing (the folder is lowercased via the
//! slug, the file is not): `My Photo.JPG` → `My-Photo.jpg`. Two sources that
//! share a base name and extension plan to the same destination; last write
//! wins, by design.

use crate::slug::slugify;
use std::path::Path;

/// Planned destination for one source image, relative to the photo root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DestPath {
    /// Slug-named folder, one per gallery.
    pub folder: String,
    /// Sanitized base name plus lowercased original extension.
    pub filename: String,
}

impl DestPath {
    /// `folder/filename`, the form stored in photo records.
    pub fn relative(&self) -> String {
        format!("{}/{}", self.folder, self.filename)
    }
}

/// Plan the destination for `source` within the gallery named `gallery_name`.
pub fn plan_destination(gallery_name: &str, source: &Path) -> DestPath {
    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();

    let safe_stem = sanitize_stem(&stem);
    let filename = if ext.is_empty() {
        safe_stem
    } else {
        format!("{safe_stem}.{ext}")
    };

    DestPath {
        folder: slugify(gallery_name),
        filename,
    }
}

/// Sanitize a file stem: case preserved, whitespace and non-alphanumerics
/// replaced by hyphens, runs collapsed, leading/trailing hyphens stripped.
fn sanitize_stem(stem: &str) -> String {
    let mut out = String::with_capacity(stem.len());
    let mut prev_hyphen = false;
    for c in stem.trim().chars() {
        let mapped = if c.is_ascii_alphanumeric() { c } else { '-' };
        if mapped == '-' {
            if !prev_hyphen {
                out.push('-');
            }
            prev_hyphen = true;
        } else {
            out.push(mapped);
            prev_hyphen = false;
        }
    }
    out.trim_matches('-').to_string()
}
