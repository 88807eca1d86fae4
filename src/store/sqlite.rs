//! SQLite implementation of the gallery store.
//!
//! Schema mirrors the site's two tables. The postgres original keeps the
//! gallery → photo relation as an `integer[]` column; SQLite has no array
//! type, so the photo list is a JSON array in a TEXT column, decoded with
//! serde_json on the way out.

use rusqlite::{Connection, params};
use std::path::Path;

use super::{GalleryId, GalleryStore, NewGallery, NewPhoto, Photo, PhotoId, StoreError};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS photos (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    path          TEXT NOT NULL,
    description   TEXT,
    display_order INTEGER
);
CREATE TABLE IF NOT EXISTS galleries (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    slug          TEXT NOT NULL,
    name          TEXT NOT NULL,
    description   TEXT,
    photos        TEXT NOT NULL DEFAULT '[]',
    cover         INTEGER REFERENCES photos(id),
    display_order INTEGER
);
";

pub struct SqliteStore {
    pub(crate) conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`, creating parent directories.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).ok();
            }
        }
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Create the tables. Idempotent.
    pub fn initialize(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub(crate) fn decode_photo_ids(id: GalleryId, json: &str) -> Result<Vec<PhotoId>, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::PhotoList(id, e))
    }

    pub(crate) fn photo_by_id(&self, id: PhotoId) -> Result<Option<Photo>, StoreError> {
        let result = self.conn.query_row(
            "SELECT id, path, description, display_order FROM photos WHERE id = ?1",
            [id],
            |row| {
                Ok(Photo {
                    id: row.get(0)?,
                    path: row.get(1)?,
                    description: row.get(2)?,
                    display_order: row.get(3)?,
                })
            },
        );
        match result {
            Ok(photo) => Ok(Some(photo)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl GalleryStore for SqliteStore {
    fn create_gallery(&mut self, gallery: &NewGallery) -> Result<GalleryId, StoreError> {
        let display_order: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM galleries",
            [],
            |row| row.get(0),
        )?;
        self.conn.execute(
            "INSERT INTO galleries (slug, name, description, photos, display_order)
             VALUES (?1, ?2, ?3, '[]', ?4)",
            params![gallery.slug, gallery.name, gallery.description, display_order],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn insert_photo(&mut self, photo: &NewPhoto) -> Result<PhotoId, StoreError> {
        self.conn.execute(
            "INSERT INTO photos (path, description, display_order) VALUES (?1, ?2, ?3)",
            params![photo.path, photo.description, photo.display_order],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn link_photos(&mut self, gallery: GalleryId, photos: &[PhotoId]) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(photos).map_err(|e| StoreError::PhotoList(gallery, e))?;
        self.conn.execute(
            "UPDATE galleries SET photos = ?1 WHERE id = ?2",
            params![json, gallery],
        )?;
        Ok(())
    }

    fn set_cover(&mut self, gallery: GalleryId, cover: PhotoId) -> Result<(), StoreError> {
        self.conn.execute(
            "UPDATE galleries SET cover = ?1 WHERE id = ?2",
            params![cover, gallery],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        store.initialize().unwrap();
        store
    }

    #[test]
    fn initialize_is_idempotent() {
        let store = store();
        store.initialize().unwrap();
    }

    #[test]
    fn create_link_and_cover_round_trip() {
        let mut store = store();
        let gallery = store
            .create_gallery(&NewGallery {
                slug: "alps",
                name: "Alps",
                description: "mountains",
            })
            .unwrap();

        let mut ids = Vec::new();
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            ids.push(
                store
                    .insert_photo(&NewPhoto {
                        path: &format!("alps/{name}.jpg"),
                        description: "",
                        display_order: i as i64,
                    })
                    .unwrap(),
            );
        }
        store.link_photos(gallery, &ids).unwrap();
        store.set_cover(gallery, ids[1]).unwrap();

        let (json, cover): (String, Option<i64>) = store
            .conn
            .query_row(
                "SELECT photos, cover FROM galleries WHERE id = ?1",
                [gallery],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(SqliteStore::decode_photo_ids(gallery, &json).unwrap(), ids);
        assert_eq!(cover, Some(ids[1]));
    }

    #[test]
    fn galleries_get_increasing_display_order() {
        let mut store = store();
        for slug in ["one", "two", "three"] {
            store
                .create_gallery(&NewGallery {
                    slug,
                    name: slug,
                    description: "",
                })
                .unwrap();
        }
        let orders: Vec<i64> = {
            let mut stmt = store
                .conn
                .prepare("SELECT display_order FROM galleries ORDER BY id")
                .unwrap();
            stmt.query_map([], |row| row.get(0))
                .unwrap()
                .map(|r| r.unwrap())
                .collect()
        };
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn photo_by_id_maps_missing_to_none() {
        let store = store();
        assert_eq!(store.photo_by_id(99).unwrap(), None);
    }
}
