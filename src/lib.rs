//! # Galerie
//!
//! Import tool and data layer for a personal photo-gallery site. The site
//! itself is a thin server-rendered front over two tables (galleries and
//! photos); this crate owns everything that feeds those tables: an offline
//! import pipeline that ingests image files, optimizes them into the static
//! asset tree, and records them in the database, plus the read-side queries
//! and navigation helpers the site's pages use.
//!
//! # Architecture: One Sequential Pipeline
//!
//! An import run is a single pass, one image at a time:
//!
//! ```text
//! resolve inputs → validate → create gallery
//!   → per image: plan path → optimize → inspect → persist record
//! → link photos → select cover (optional) → summary
//! ```
//!
//! There is no parallelism and no shared mutable state: exactly one writer,
//! one process, one run. Per-file problems degrade (a transcode failure
//! copies the original; unreadable metadata is recorded as unavailable);
//! everything else aborts the run with a nonzero exit and no rollback.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`slug`] | gallery name → URL/filesystem-safe slug |
//! | [`plan`] | deterministic destination folder + filename planning |
//! | [`inspect`] | best-effort image metadata (dimensions, format, orientation) |
//! | [`optimize`] | transcode/copy into the static photo tree, with fallback |
//! | [`resolve`] | manual-mode glob expansion and folder-mode scanning |
//! | [`store`] | persistence gateway: SQLite store, no-op store, read queries |
//! | [`import`] | the orchestrator sequencing one run end to end |
//! | [`routes`] | pure route-tree builder for site navigation |
//! | [`output`] | CLI output formatting: dry-run plans, progress, summaries |
//!
//! # Design Decisions
//!
//! ## Ports Over Globals
//!
//! The orchestrator is parameterized over two traits: [`store::GalleryStore`]
//! (the persistence gateway) and [`import::CoverPicker`] (the interactive
//! cover selection). The CLI wires in the real SQLite store and a console
//! prompt; tests wire in recording fakes. When no connection string is
//! configured the store is [`store::NoopStore`] and the run still processes
//! files, so the tool is useful without a database at all.
//!
//! ## Pure-Rust Imaging
//!
//! All transcoding goes through the `image` crate's pure-Rust encoders —
//! no ImageMagick, no sharp, no system libraries. Formats without a
//! pure-Rust encoding path (gif) are copied byte-for-byte, as is anything
//! unrecognized. A failed transcode never fails the run; the original bytes
//! are copied and the summary says so.
//!
//! ## Deterministic Destinations
//!
//! The destination of every photo is a pure function of the gallery name and
//! the source file name. Re-running an import with the same inputs rewrites
//! the same files. Duplicate base names collide by design: last write wins.

pub mod import;
pub mod inspect;
pub mod optimize;
pub mod output;
pub mod plan;
pub mod resolve;
pub mod routes;
pub mod slug;
pub mod store;
