//! Image optimization into the static photo tree.
//!
//! Takes a planned destination from [`plan`](crate::plan) and produces the
//! file under the photo root, re-encoding where a pure-Rust encoder exists
//! for the format:
//!
//! | Extension | Action |
//! |---|---|
//! | jpg / jpeg | re-encode at the configured quality |
//! | png | re-encode at the configured compression tier |
//! | webp | lossless re-encode |
//! | gif, anything else | byte-for-byte copy |
//!
//! With `optimize` disabled everything is a byte copy. A transcoding failure
//! is never fatal: the source is copied verbatim and the outcome records the
//! reason so the caller can warn. Only an I/O failure on the fallback copy
//! itself propagates.

use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::codecs::webp::WebPEncoder;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::plan::DestPath;

#[derive(Error, Debug)]
pub enum OptimizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Lossy encoding quality (1-100). Clamped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// PNG compression level (0-9). Clamped on construction.
///
/// The pure-Rust encoder exposes fast/default/best tiers rather than zlib
/// levels; [`Compression::tier`] maps 0-2 → fast, 3-6 → default, 7-9 → best.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compression(u32);

impl Compression {
    pub fn new(value: u32) -> Self {
        Self(value.min(9))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    fn tier(self) -> CompressionType {
        match self.0 {
            0..=2 => CompressionType::Fast,
            3..=6 => CompressionType::Default,
            _ => CompressionType::Best,
        }
    }
}

impl Default for Compression {
    fn default() -> Self {
        Self(9)
    }
}

/// Knobs shared by every image in an import run.
#[derive(Debug, Clone, Copy, Default)]
pub struct Settings {
    pub quality: Quality,
    pub compression: Compression,
    /// When false, every file is copied verbatim.
    pub optimize: bool,
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Re-encoded through a format-specific encoder.
    Transcoded,
    /// Byte-for-byte copy (gif, unknown extension, or optimize disabled).
    Copied,
    /// Transcoding failed; fell back to a byte copy. Carries the reason.
    CopiedFallback(String),
}

/// Write `source` to `photos_root/<dest>`, creating missing directories.
///
/// Returns the destination path and what was done to get the bytes there.
pub fn optimize_into(
    source: &Path,
    photos_root: &Path,
    dest: &DestPath,
    settings: &Settings,
) -> Result<(PathBuf, Outcome), OptimizeError> {
    let gallery_dir = photos_root.join(&dest.folder);
    fs::create_dir_all(&gallery_dir)?;
    let dest_path = gallery_dir.join(&dest.filename);

    if !settings.optimize {
        fs::copy(source, &dest_path)?;
        return Ok((dest_path, Outcome::Copied));
    }

    let ext = source
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let transcode = match ext.as_str() {
        "jpg" | "jpeg" => transcode_jpeg(source, &dest_path, settings.quality),
        "png" => transcode_png(source, &dest_path, settings.compression),
        "webp" => transcode_webp(source, &dest_path),
        // gif and anything unrecognized: no transcoding path exists
        _ => {
            fs::copy(source, &dest_path)?;
            return Ok((dest_path, Outcome::Copied));
        }
    };

    match transcode {
        Ok(()) => Ok((dest_path, Outcome::Transcoded)),
        Err(reason) => {
            // Per-file errors are non-fatal: overwrite any partial output
            // with the original bytes.
            fs::copy(source, &dest_path)?;
            Ok((dest_path, Outcome::CopiedFallback(reason)))
        }
    }
}

fn transcode_jpeg(source: &Path, dest: &Path, quality: Quality) -> Result<(), String> {
    let img = decode(source)?;
    let writer = open_writer(dest)?;
    let encoder = JpegEncoder::new_with_quality(writer, quality.value() as u8);
    // JPEG has no alpha channel; flatten unconditionally.
    img.to_rgb8()
        .write_with_encoder(encoder)
        .map_err(|e| format!("jpeg encode: {e}"))
}

fn transcode_png(source: &Path, dest: &Path, compression: Compression) -> Result<(), String> {
    let img = decode(source)?;
    let writer = open_writer(dest)?;
    let encoder = PngEncoder::new_with_quality(writer, compression.tier(), FilterType::Adaptive);
    img.write_with_encoder(encoder)
        .map_err(|e| format!("png encode: {e}"))
}

fn transcode_webp(source: &Path, dest: &Path) -> Result<(), String> {
    let img = decode(source)?;
    // The lossless WebP encoder accepts RGB8/RGBA8 only.
    let img = match img {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_) => img,
        other => DynamicImage::ImageRgba8(other.to_rgba8()),
    };
    let writer = open_writer(dest)?;
    let encoder = WebPEncoder::new_lossless(writer);
    img.write_with_encoder(encoder)
        .map_err(|e| format!("webp encode: {e}"))
}

fn decode(source: &Path) -> Result<DynamicImage, String> {
    image::open(source).map_err(|e| format!("decode {}: {e}", source.display()))
}

fn open_writer(dest: &Path) -> Result<BufWriter<File>, String> {
    File::create(dest)
        .map(BufWriter::new)
        .map_err(|e| format!("create {}: {e}", dest.display()))
}
