//! Persistence gateway for galleries and photos.
//!
//! The import pipeline talks to a [`GalleryStore`] — a narrow, write-oriented
//! port with exactly the four operations the orchestrator needs. Two
//! implementations exist:
//!
//! - [`SqliteStore`]: the real store, over a bundled-SQLite database.
//! - [`NoopStore`]: selected when no connection string is configured. Image
//!   files are still processed and written; only record keeping is skipped.
//!
//! The store handle is constructed once (in `main`) and threaded through the
//! orchestrator explicitly — there is no global connection state.
//!
//! ## Connection string
//!
//! `GALERIE_DATABASE_URL`, falling back to `DATABASE_URL`. A `.env` file in
//! the working directory is honored. The value is a SQLite database path.

mod sqlite;

pub mod queries;

pub use sqlite::SqliteStore;

use thiserror::Error;

/// Environment variables consulted for the connection string, in order.
pub const ENV_VARS: [&str; 2] = ["GALERIE_DATABASE_URL", "DATABASE_URL"];

pub type GalleryId = i64;
pub type PhotoId = i64;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("invalid photo list for gallery {0}: {1}")]
    PhotoList(GalleryId, serde_json::Error),
    #[error("no such gallery: {0}")]
    NoSuchGallery(String),
}

/// A gallery record to be created.
#[derive(Debug, Clone)]
pub struct NewGallery<'a> {
    pub slug: &'a str,
    pub name: &'a str,
    pub description: &'a str,
}

/// A photo record to be created.
#[derive(Debug, Clone)]
pub struct NewPhoto<'a> {
    /// Path relative to the static photo root, `folder/filename`.
    pub path: &'a str,
    pub description: &'a str,
    pub display_order: i64,
}

/// A stored gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct Gallery {
    pub id: GalleryId,
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    /// Photo ids in display order.
    pub photos: Vec<PhotoId>,
    pub cover: Option<PhotoId>,
    pub display_order: Option<i64>,
}

/// A stored photo.
#[derive(Debug, Clone, PartialEq)]
pub struct Photo {
    pub id: PhotoId,
    pub path: String,
    pub description: Option<String>,
    pub display_order: Option<i64>,
}

/// Write-side port used by the import orchestrator.
pub trait GalleryStore {
    fn create_gallery(&mut self, gallery: &NewGallery) -> Result<GalleryId, StoreError>;

    fn insert_photo(&mut self, photo: &NewPhoto) -> Result<PhotoId, StoreError>;

    /// Replace the gallery's photo list with `photos`, preserving order.
    fn link_photos(&mut self, gallery: GalleryId, photos: &[PhotoId]) -> Result<(), StoreError>;

    fn set_cover(&mut self, gallery: GalleryId, cover: PhotoId) -> Result<(), StoreError>;

    /// False for the no-op store; lets callers phrase output accurately.
    fn is_persistent(&self) -> bool {
        true
    }
}

/// Store selected when no connection string is configured: accepts every
/// operation and records nothing. Ids are handed out sequentially so callers
/// can still thread them through the pipeline.
#[derive(Debug, Default)]
pub struct NoopStore {
    next_id: i64,
}

impl NoopStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl GalleryStore for NoopStore {
    fn create_gallery(&mut self, _gallery: &NewGallery) -> Result<GalleryId, StoreError> {
        Ok(self.next())
    }

    fn insert_photo(&mut self, _photo: &NewPhoto) -> Result<PhotoId, StoreError> {
        Ok(self.next())
    }

    fn link_photos(&mut self, _gallery: GalleryId, _photos: &[PhotoId]) -> Result<(), StoreError> {
        Ok(())
    }

    fn set_cover(&mut self, _gallery: GalleryId, _cover: PhotoId) -> Result<(), StoreError> {
        Ok(())
    }

    fn is_persistent(&self) -> bool {
        false
    }
}

/// The configured connection string, if any.
pub fn database_url() -> Option<String> {
    ENV_VARS.iter().find_map(|var| std::env::var(var).ok())
}
