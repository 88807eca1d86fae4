//! Best-effort image inspection.
//!
//! Reads dimensions, pixel format, aspect ratio, and EXIF orientation from a
//! source file. Inspection never fails the pipeline: an unreadable or
//! unrecognized file yields [`Inspection::Unavailable`] instead of an error,
//! and the caller records the photo without dimensions.
//!
//! The two outcomes are a real enum rather than a struct of `Option`s so
//! callers cannot half-use a failed inspection — either the whole record is
//! there or none of it is.

use exif::{In, Tag};
use image::ImageFormat;
use image::ImageReader;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Metadata read from an image file header.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
    /// Format name as stored in photo records ("jpeg", "png", ...).
    pub format: String,
    /// Width / height, rounded to two decimals. `None` when height is zero.
    pub aspect_ratio: Option<f64>,
    /// EXIF orientation tag; 1 (upright) when absent.
    pub orientation: u32,
}

/// Result of inspecting a source image.
#[derive(Debug, Clone, PartialEq)]
pub enum Inspection {
    Inspected(ImageInfo),
    Unavailable,
}

impl Inspection {
    pub fn info(&self) -> Option<&ImageInfo> {
        match self {
            Inspection::Inspected(info) => Some(info),
            Inspection::Unavailable => None,
        }
    }
}

/// Inspect an image file. Never errors; any read failure is `Unavailable`.
pub fn inspect(path: &Path) -> Inspection {
    match read_header(path) {
        Some((width, height, format)) => {
            let aspect_ratio = if height > 0 {
                Some(round2(width as f64 / height as f64))
            } else {
                None
            };
            Inspection::Inspected(ImageInfo {
                width,
                height,
                format: format_name(format).to_string(),
                aspect_ratio,
                orientation: read_orientation(path).unwrap_or(1),
            })
        }
        None => Inspection::Unavailable,
    }
}

/// Dimensions and format from the file header, without a full decode.
fn read_header(path: &Path) -> Option<(u32, u32, ImageFormat)> {
    let reader = ImageReader::open(path).ok()?.with_guessed_format().ok()?;
    let format = reader.format()?;
    let (width, height) = reader.into_dimensions().ok()?;
    Some((width, height, format))
}

/// EXIF orientation (1-8), if the file carries EXIF at all.
fn read_orientation(path: &Path) -> Option<u32> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = exif::Reader::new().read_from_container(&mut reader).ok()?;
    exif.get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
}

fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Png => "png",
        ImageFormat::Gif => "gif",
        ImageFormat::WebP => "webp",
        _ => "unknown",
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
