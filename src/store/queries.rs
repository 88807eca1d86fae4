//! Read-side queries backing the site's server-rendered pages.
//!
//! The gallery index page lists every gallery with a cover photo; the
//! gallery detail page shows one gallery's photos in order. The same two
//! reads power the `list` and `show` CLI subcommands, so the import tool can
//! verify what the site will see.
//!
//! Cover hydration follows the site's rule: the explicit cover photo if one
//! is set, else the first photo in the gallery's list; galleries with no
//! photos have no cover.

use rusqlite::params;

use super::{Gallery, Photo, SqliteStore, StoreError};

/// A gallery joined with its effective cover photo.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryWithCover {
    pub gallery: Gallery,
    pub cover: Option<Photo>,
}

impl SqliteStore {
    /// All galleries ordered by display order, each with its cover hydrated.
    pub fn galleries_with_covers(&self) -> Result<Vec<GalleryWithCover>, StoreError> {
        let galleries = self.all_galleries()?;
        let mut out = Vec::with_capacity(galleries.len());
        for gallery in galleries {
            // A gallery with no photos has no cover, whatever the column says.
            let cover_id = if gallery.photos.is_empty() {
                None
            } else {
                gallery.cover.or_else(|| gallery.photos.first().copied())
            };
            let cover = match cover_id {
                Some(id) => self.photo_by_id(id)?,
                None => None,
            };
            out.push(GalleryWithCover { gallery, cover });
        }
        Ok(out)
    }

    /// One gallery by slug, with its photos in display order.
    pub fn gallery_by_slug(&self, slug: &str) -> Result<(Gallery, Vec<Photo>), StoreError> {
        let result = self.conn.query_row(
            "SELECT id, slug, name, description, photos, cover, display_order
             FROM galleries WHERE slug = ?1 LIMIT 1",
            params![slug],
            row_to_gallery,
        );
        let gallery = match result {
            Ok(row) => gallery_from_row(row)?,
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                return Err(StoreError::NoSuchGallery(slug.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        // The JSON list is already in display order; fetch in that order.
        let mut photos = Vec::with_capacity(gallery.photos.len());
        for id in &gallery.photos {
            if let Some(photo) = self.photo_by_id(*id)? {
                photos.push(photo);
            }
        }
        Ok((gallery, photos))
    }

    fn all_galleries(&self) -> Result<Vec<Gallery>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, slug, name, description, photos, cover, display_order
             FROM galleries ORDER BY display_order, id",
        )?;
        let rows: Vec<GalleryRow> = stmt
            .query_map([], row_to_gallery)?
            .collect::<Result<_, _>>()?;
        rows.into_iter().map(gallery_from_row).collect()
    }
}

/// Raw gallery row before the photo-list JSON is decoded.
struct GalleryRow {
    id: i64,
    slug: String,
    name: String,
    description: Option<String>,
    photos_json: String,
    cover: Option<i64>,
    display_order: Option<i64>,
}

fn row_to_gallery(row: &rusqlite::Row) -> rusqlite::Result<GalleryRow> {
    Ok(GalleryRow {
        id: row.get(0)?,
        slug: row.get(1)?,
        name: row.get(2)?,
        description: row.get(3)?,
        photos_json: row.get(4)?,
        cover: row.get(5)?,
        display_order: row.get(6)?,
    })
}

fn gallery_from_row(row: GalleryRow) -> Result<Gallery, StoreError> {
    let photos = SqliteStore::decode_photo_ids(row.id, &row.photos_json)?;
    Ok(Gallery {
        id: row.id,
        slug: row.slug,
        name: row.name,
        description: row.description,
        photos,
        cover: row.cover,
        display_order: row.display_order,
    })
}
