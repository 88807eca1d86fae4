//! The import pipeline orchestrator.
//!
//! Sequences one import run end to end:
//!
//! ```text
//! validate → create gallery → per image: plan / optimize / inspect / persist
//!          → link photos → select cover (optional) → report
//! ```
//!
//! Images are processed sequentially in input order, and that order is
//! preserved all the way into the gallery's photo list. Per-file trouble
//! (transcode failure, unreadable metadata) degrades gracefully inside the
//! [`optimize`](crate::optimize) and [`inspect`](crate::inspect) steps;
//! anything that escapes them — store failures above all — aborts the run.
//! No rollback is attempted: records created before the failure remain.
//!
//! Two ports are injected rather than reached for globally, so the whole
//! pipeline runs under test against fakes:
//!
//! - [`GalleryStore`] — the persistence gateway (real, or no-op when no
//!   database is configured; the no-op variant still writes image files).
//! - [`CoverPicker`] — the cover-selection decision. The CLI wires a console
//!   prompt here when attended; tests script it.

use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::inspect::{self, Inspection};
use crate::optimize::{self, Outcome, Settings};
use crate::output;
use crate::plan::{self, DestPath};
use crate::resolve::{self, GalleryInput};
use crate::slug::slugify;
use crate::store::{GalleryId, GalleryStore, NewGallery, NewPhoto, PhotoId, StoreError};

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("no valid images found to import")]
    NoValidImages,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Optimize(#[from] optimize::OptimizeError),
}

/// Run-wide knobs that are not part of the gallery input itself.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Static asset root the slug-named gallery folders go under.
    pub photos_root: PathBuf,
    pub settings: Settings,
}

/// Why a candidate file was dropped during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedType,
    NotFound,
}

/// One image that made it through the pipeline.
#[derive(Debug, Clone)]
pub struct ProcessedPhoto {
    pub source: PathBuf,
    pub dest: DestPath,
    pub outcome: Outcome,
    pub inspection: Inspection,
    pub id: PhotoId,
}

/// Everything that happened during a run, for the final summary.
#[derive(Debug)]
pub struct ImportReport {
    pub gallery_name: String,
    pub slug: String,
    pub gallery_id: GalleryId,
    /// False when running against the no-op store.
    pub persisted: bool,
    pub photos: Vec<ProcessedPhoto>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
    pub cover: Option<PhotoId>,
}

/// Cover-selection port. Returns a zero-based index into the processed
/// photos, or `None` for "no cover".
pub trait CoverPicker {
    fn pick(&self, photos: &[ProcessedPhoto]) -> Option<usize>;
}

/// Picker for unattended runs: never selects a cover.
pub struct NoPicker;

impl CoverPicker for NoPicker {
    fn pick(&self, _photos: &[ProcessedPhoto]) -> Option<usize> {
        None
    }
}

/// Interpret an operator's cover selection: 1-based, where `0`, anything
/// non-numeric, or anything out of range means "no cover".
pub fn parse_cover_selection(input: &str, count: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= count => Some(n - 1),
        _ => None,
    }
}

/// Filter candidates down to supported, existing files. Order is preserved.
pub fn validate_images(candidates: &[PathBuf]) -> (Vec<PathBuf>, Vec<(PathBuf, SkipReason)>) {
    let mut valid = Vec::new();
    let mut skipped = Vec::new();
    for path in candidates {
        if !resolve::is_supported_image(path) {
            skipped.push((path.clone(), SkipReason::UnsupportedType));
        } else if !path.exists() {
            skipped.push((path.clone(), SkipReason::NotFound));
        } else {
            valid.push(path.clone());
        }
    }
    (valid, skipped)
}

/// Run a full import. Progress is printed as it happens; the returned report
/// feeds the final summary.
pub fn run(
    store: &mut dyn GalleryStore,
    picker: &dyn CoverPicker,
    gallery: &GalleryInput,
    options: &ImportOptions,
) -> Result<ImportReport, ImportError> {
    let (valid, skipped) = validate_images(&gallery.images);
    for (path, reason) in &skipped {
        output::print_skip_warning(path, *reason);
    }
    if valid.is_empty() {
        return Err(ImportError::NoValidImages);
    }

    let slug = slugify(&gallery.name);
    let persisted = store.is_persistent();
    let gallery_id = store.create_gallery(&NewGallery {
        slug: &slug,
        name: &gallery.name,
        description: &gallery.description,
    })?;
    output::print_gallery_created(&gallery.name, gallery_id, persisted);

    let total = valid.len();
    let mut photos: Vec<ProcessedPhoto> = Vec::with_capacity(total);
    for (index, source) in valid.iter().enumerate() {
        output::print_image_progress(index + 1, total, source);

        let dest = plan::plan_destination(&gallery.name, source);
        let (_, outcome) = optimize::optimize_into(source, &options.photos_root, &dest, &options.settings)?;
        if let Outcome::CopiedFallback(reason) = &outcome {
            output::print_fallback_warning(source, reason);
        }

        let inspection = inspect::inspect(source);

        let description = format!("Imported from {}", basename(source));
        let id = store.insert_photo(&NewPhoto {
            path: &dest.relative(),
            description: &description,
            display_order: index as i64,
        })?;

        output::print_image_done(&dest, &inspection);
        photos.push(ProcessedPhoto {
            source: source.clone(),
            dest,
            outcome,
            inspection,
            id,
        });
    }

    let ids: Vec<PhotoId> = photos.iter().map(|p| p.id).collect();
    store.link_photos(gallery_id, &ids)?;

    // An out-of-range pick from a misbehaving picker means no cover.
    let cover = match picker.pick(&photos).and_then(|index| photos.get(index)) {
        Some(photo) => {
            let id = photo.id;
            store.set_cover(gallery_id, id)?;
            Some(id)
        }
        None => None,
    };

    Ok(ImportReport {
        gallery_name: gallery.name.clone(),
        slug,
        gallery_id,
        persisted,
        photos,
        skipped,
        cover,
    })
}

fn basename(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::{Compression, Quality};
    use crate::store::NoopStore;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Store double that records every call in order.
    #[derive(Default)]
    struct RecordingStore {
        calls: RefCell<Vec<String>>,
        next_id: i64,
    }

    impl RecordingStore {
        fn calls(&self) -> Vec<String> {
            self.calls.borrow().clone()
        }
    }

    impl GalleryStore for RecordingStore {
        fn create_gallery(&mut self, gallery: &NewGallery) -> Result<GalleryId, StoreError> {
            self.calls
                .borrow_mut()
                .push(format!("gallery {} ({})", gallery.slug, gallery.name));
            self.next_id += 1;
            Ok(self.next_id)
        }

        fn insert_photo(&mut self, photo: &NewPhoto) -> Result<PhotoId, StoreError> {
            self.calls
                .borrow_mut()
                .push(format!("photo {} order {}", photo.path, photo.display_order));
            self.next_id += 1;
            Ok(self.next_id)
        }

        fn link_photos(&mut self, gallery: GalleryId, photos: &[PhotoId]) -> Result<(), StoreError> {
            self.calls
                .borrow_mut()
                .push(format!("link {gallery} {photos:?}"));
            Ok(())
        }

        fn set_cover(&mut self, gallery: GalleryId, cover: PhotoId) -> Result<(), StoreError> {
            self.calls.borrow_mut().push(format!("cover {gallery} {cover}"));
            Ok(())
        }
    }

    struct ScriptedPicker(Option<usize>);

    impl CoverPicker for ScriptedPicker {
        fn pick(&self, _photos: &[ProcessedPhoto]) -> Option<usize> {
            self.0
        }
    }

    fn options(root: &Path) -> ImportOptions {
        ImportOptions {
            photos_root: root.to_path_buf(),
            settings: Settings {
                quality: Quality::default(),
                compression: Compression::default(),
                optimize: true,
            },
        }
    }

    fn write_png(path: &Path) {
        image::RgbImage::from_pixel(2, 2, image::Rgb([1, 2, 3]))
            .save_with_format(path, image::ImageFormat::Png)
            .unwrap();
    }

    fn input(dir: &TempDir, names: &[&str]) -> GalleryInput {
        let images = names
            .iter()
            .map(|n| {
                let p = dir.path().join(n);
                if n.ends_with(".png") {
                    write_png(&p);
                } else {
                    fs::write(&p, b"bytes").unwrap();
                }
                p
            })
            .collect();
        GalleryInput {
            name: "My Gallery".into(),
            description: "desc".into(),
            images,
        }
    }

    #[test]
    fn sequences_gallery_photos_link_in_order() {
        let dir = TempDir::new().unwrap();
        let gallery = input(&dir, &["one.png", "two.png"]);
        let root = dir.path().join("photos");
        let mut store = RecordingStore::default();

        let report = run(&mut store, &NoPicker, &gallery, &options(&root)).unwrap();

        assert_eq!(report.slug, "my-gallery");
        assert_eq!(report.photos.len(), 2);
        assert_eq!(
            store.calls(),
            vec![
                "gallery my-gallery (My Gallery)",
                "photo my-gallery/one.png order 0",
                "photo my-gallery/two.png order 1",
                "link 1 [2, 3]",
            ]
        );
        assert!(root.join("my-gallery/one.png").exists());
        assert!(root.join("my-gallery/two.png").exists());
    }

    #[test]
    fn validation_skips_unsupported_and_missing() {
        let dir = TempDir::new().unwrap();
        let mut gallery = input(&dir, &["ok.png", "doc.pdf"]);
        gallery.images.push(dir.path().join("ghost.jpg"));
        let mut store = RecordingStore::default();

        let report = run(
            &mut store,
            &NoPicker,
            &gallery,
            &options(&dir.path().join("photos")),
        )
        .unwrap();

        assert_eq!(report.photos.len(), 1);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(report.skipped[0].1, SkipReason::UnsupportedType);
        assert_eq!(report.skipped[1].1, SkipReason::NotFound);
    }

    #[test]
    fn zero_valid_images_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let gallery = GalleryInput {
            name: "G".into(),
            description: "".into(),
            images: vec![dir.path().join("missing.jpg")],
        };
        let mut store = RecordingStore::default();

        let err = run(
            &mut store,
            &NoPicker,
            &gallery,
            &options(&dir.path().join("photos")),
        )
        .unwrap_err();

        assert!(matches!(err, ImportError::NoValidImages));
        assert!(store.calls().is_empty());
    }

    #[test]
    fn transcode_failure_falls_back_and_continues() {
        let dir = TempDir::new().unwrap();
        // .png extension but not decodable: transcode fails, copy succeeds
        let gallery = input(&dir, &["broken.png"]);
        fs::write(&gallery.images[0], b"not a png").unwrap();
        let root = dir.path().join("photos");
        let mut store = RecordingStore::default();

        let report = run(&mut store, &NoPicker, &gallery, &options(&root)).unwrap();

        assert!(matches!(report.photos[0].outcome, Outcome::CopiedFallback(_)));
        assert_eq!(report.photos[0].inspection, Inspection::Unavailable);
        assert!(root.join("my-gallery/broken.png").exists());
    }

    #[test]
    fn scripted_cover_selection_sets_cover() {
        let dir = TempDir::new().unwrap();
        let gallery = input(&dir, &["a.png", "b.png"]);
        let mut store = RecordingStore::default();

        let report = run(
            &mut store,
            &ScriptedPicker(Some(1)),
            &gallery,
            &options(&dir.path().join("photos")),
        )
        .unwrap();

        assert_eq!(report.cover, Some(report.photos[1].id));
        assert!(store.calls().last().unwrap().starts_with("cover 1 "));
    }

    #[test]
    fn out_of_range_cover_pick_means_no_cover() {
        let dir = TempDir::new().unwrap();
        let gallery = input(&dir, &["a.png"]);
        let mut store = RecordingStore::default();

        let report = run(
            &mut store,
            &ScriptedPicker(Some(99)),
            &gallery,
            &options(&dir.path().join("photos")),
        )
        .unwrap();

        assert_eq!(report.cover, None);
        assert!(!store.calls().iter().any(|c| c.starts_with("cover")));
    }

    #[test]
    fn noop_store_still_writes_files() {
        let dir = TempDir::new().unwrap();
        let gallery = input(&dir, &["a.png"]);
        let root = dir.path().join("photos");
        let mut store = NoopStore::new();

        let report = run(&mut store, &NoPicker, &gallery, &options(&root)).unwrap();

        assert!(!report.persisted);
        assert!(root.join("my-gallery/a.png").exists());
    }

    #[test]
    fn cover_selection_parsing() {
        assert_eq!(parse_cover_selection("1", 3), Some(0));
        assert_eq!(parse_cover_selection(" 3 ", 3), Some(2));
        assert_eq!(parse_cover_selection("0", 3), None);
        assert_eq!(parse_cover_selection("4", 3), None);
        assert_eq!(parse_cover_selection("x", 3), None);
        assert_eq!(parse_cover_selection("", 3), None);
    }
}
