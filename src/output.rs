//! Console output for the import tool.
//!
//! Follows one rule throughout: each kind of output has a pure `format_*`
//! function returning lines (testable, no I/O) and a thin `print_*` wrapper
//! that writes them to stdout. Warnings share a single `warning:` prefix so
//! they are grep-able in long runs.
//!
//! No machine-readable output is produced; this is an operator-facing tool.

use std::path::Path;

use crate::import::{ImportOptions, ImportReport, SkipReason};
use crate::inspect::Inspection;
use crate::optimize::Outcome;
use crate::plan::DestPath;
use crate::resolve::GalleryInput;
use crate::routes::FlatRoute;
use crate::store::queries::GalleryWithCover;
use crate::store::{Gallery, Photo};

/// 4 spaces per depth level, matching the nav rendering.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

// ============================================================================
// Warnings and progress (printed as the pipeline runs)
// ============================================================================

pub fn print_skip_warning(path: &Path, reason: SkipReason) {
    let why = match reason {
        SkipReason::UnsupportedType => "unsupported file type",
        SkipReason::NotFound => "file not found",
    };
    println!("warning: skipping {}: {}", path.display(), why);
}

pub fn print_fallback_warning(path: &Path, reason: &str) {
    println!(
        "warning: could not optimize {}, copied original ({})",
        path.display(),
        reason
    );
}

pub fn print_resolve_warning(message: &str) {
    println!("warning: {message}");
}

pub fn print_gallery_created(name: &str, id: i64, persisted: bool) {
    if persisted {
        println!("Created gallery \"{name}\" (id {id})");
    } else {
        println!("Processing gallery \"{name}\" (no database configured, records skipped)");
    }
}

pub fn print_image_progress(position: usize, total: usize, source: &Path) {
    println!("[{position}/{total}] {}", display_name(source));
}

pub fn print_image_done(dest: &DestPath, inspection: &Inspection) {
    let mut line = format!("{}→ {}", indent(1), dest.relative());
    if let Some(info) = inspection.info() {
        line.push_str(&format!(" ({}x{}", info.width, info.height));
        if let Some(ratio) = info.aspect_ratio {
            line.push_str(&format!(", {ratio}:1"));
        }
        line.push(')');
    }
    println!("{line}");
}

// ============================================================================
// Dry run
// ============================================================================

/// One planned destination per input image, then the gallery metadata and
/// settings that would apply. Nothing on disk or in the store changes.
pub fn format_dry_run(
    gallery: &GalleryInput,
    options: &ImportOptions,
    formats: &str,
) -> Vec<String> {
    let mut lines = vec![
        "Dry run: nothing will be imported".to_string(),
        String::new(),
    ];
    for source in &gallery.images {
        let dest = crate::plan::plan_destination(&gallery.name, source);
        lines.push(format!("{} → {}", source.display(), dest.relative()));
    }
    lines.push(String::new());
    lines.push(format!("Gallery: \"{}\"", gallery.name));
    lines.push(format!("Description: {}", gallery.description));
    lines.push(format!("Formats: {formats}"));
    lines.push(format!(
        "Quality: {}, compression: {}, optimization {}",
        options.settings.quality.value(),
        options.settings.compression.value(),
        if options.settings.optimize {
            "enabled"
        } else {
            "disabled"
        },
    ));
    lines
}

pub fn print_dry_run(gallery: &GalleryInput, options: &ImportOptions, formats: &str) {
    for line in format_dry_run(gallery, options, formats) {
        println!("{line}");
    }
}

// ============================================================================
// Import summary
// ============================================================================

pub fn format_summary(report: &ImportReport) -> Vec<String> {
    let transcoded = report
        .photos
        .iter()
        .filter(|p| p.outcome == Outcome::Transcoded)
        .count();
    let copied = report.photos.len() - transcoded;

    let mut lines = vec![String::new()];
    if report.persisted {
        lines.push(format!(
            "Imported {} photos into gallery \"{}\" (id {})",
            report.photos.len(),
            report.gallery_name,
            report.gallery_id,
        ));
    } else {
        lines.push(format!(
            "Processed {} photos for gallery \"{}\" (no records written)",
            report.photos.len(),
            report.gallery_name,
        ));
    }
    lines.push(format!(
        "{}{} transcoded, {} copied, {} skipped",
        indent(1),
        transcoded,
        copied,
        report.skipped.len()
    ));
    lines.push(format!("{}slug: {}", indent(1), report.slug));
    match report.cover {
        Some(id) if report.persisted => lines.push(format!("{}cover: photo {id}", indent(1))),
        _ => lines.push(format!("{}cover: none", indent(1))),
    }
    lines
}

pub fn print_summary(report: &ImportReport) {
    for line in format_summary(report) {
        println!("{line}");
    }
}

// ============================================================================
// Read-side listings (list / show / nav)
// ============================================================================

pub fn format_gallery_list(galleries: &[GalleryWithCover]) -> Vec<String> {
    if galleries.is_empty() {
        return vec!["No galleries".to_string()];
    }
    let mut lines = Vec::new();
    for entry in galleries {
        let g = &entry.gallery;
        lines.push(format!(
            "{:0>3} {} ({} photos)",
            g.display_order.unwrap_or_default() + 1,
            g.name,
            g.photos.len()
        ));
        lines.push(format!("{}slug: {}", indent(1), g.slug));
        match &entry.cover {
            Some(photo) => lines.push(format!("{}cover: {}", indent(1), photo.path)),
            None => lines.push(format!("{}cover: none", indent(1))),
        }
    }
    lines
}

pub fn print_gallery_list(galleries: &[GalleryWithCover]) {
    for line in format_gallery_list(galleries) {
        println!("{line}");
    }
}

pub fn format_gallery_detail(gallery: &Gallery, photos: &[Photo]) -> Vec<String> {
    let mut lines = vec![format!("{} ({} photos)", gallery.name, photos.len())];
    if let Some(description) = &gallery.description {
        if !description.is_empty() {
            lines.push(format!(
                "{}{}",
                indent(1),
                description.lines().next().unwrap_or("")
            ));
        }
    }
    for (position, photo) in photos.iter().enumerate() {
        let marker = if gallery.cover == Some(photo.id) {
            " [cover]"
        } else {
            ""
        };
        lines.push(format!(
            "{}{:0>3} {}{}",
            indent(1),
            position + 1,
            photo.path,
            marker
        ));
    }
    lines
}

pub fn print_gallery_detail(gallery: &Gallery, photos: &[Photo]) {
    for line in format_gallery_detail(gallery, photos) {
        println!("{line}");
    }
}

pub fn format_nav(routes: &[FlatRoute]) -> Vec<String> {
    routes
        .iter()
        .map(|r| format!("{}{} → {}", indent(r.depth), r.name, r.href))
        .collect()
}

pub fn print_nav(routes: &[FlatRoute]) {
    for line in format_nav(routes) {
        println!("{line}");
    }
}
