//! Input resolution for an import run.
//!
//! Two mutually exclusive modes, selected by the CLI:
//!
//! - **Manual**: the operator supplies the gallery name, a description
//!   (literal text or a markdown file reference), and glob patterns for the
//!   images. Patterns are expanded against the filesystem; a pattern that
//!   fails to parse or expand is a warning, not a fatal error.
//! - **Folder**: the operator points at one directory. A non-recursive scan
//!   finds the first markdown file (name order), which supplies the gallery
//!   name (first `# ` heading line, else the file stem) and description
//!   (full trimmed content). Image files in the same directory become the
//!   import set. A folder without a markdown file or without images is fatal.
//!
//! Resolution produces a [`GalleryInput`]: everything the orchestrator needs
//! to run, independent of where it came from.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Extensions accepted as importable images.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Directory names never descended into during glob expansion.
const IGNORED_DIRS: &[&str] = &[".git", "node_modules", "target"];

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Carries the per-pattern warnings gathered before the match came up
    /// empty, so callers can still surface them.
    #[error("no files matched the provided patterns")]
    NoFilesMatched { warnings: Vec<String> },
    #[error("could not read description file {0}")]
    DescriptionFile(PathBuf),
    #[error("no markdown file found in {0}")]
    NoMarkdownFile(PathBuf),
    #[error("no image files found in {0}")]
    NoImageFiles(PathBuf),
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}

/// How the operator described the import on the command line.
#[derive(Debug, Clone)]
pub enum ImportSource {
    Manual {
        name: String,
        /// Literal text, or a markdown file reference (see [`is_file_reference`]).
        description: String,
        patterns: Vec<String>,
    },
    Folder(PathBuf),
}

/// Resolved gallery metadata plus the candidate image list, in input order.
#[derive(Debug, Clone)]
pub struct GalleryInput {
    pub name: String,
    pub description: String,
    pub images: Vec<PathBuf>,
}

/// Resolution output: the gallery input and any non-fatal warnings hit along
/// the way (unparseable patterns, unreadable matches).
#[derive(Debug)]
pub struct Resolved {
    pub gallery: GalleryInput,
    pub warnings: Vec<String>,
}

/// Resolve an [`ImportSource`] into a concrete [`GalleryInput`].
pub fn resolve(source: &ImportSource) -> Result<Resolved, ResolveError> {
    match source {
        ImportSource::Manual {
            name,
            description,
            patterns,
        } => resolve_manual(name, description, patterns),
        ImportSource::Folder(path) => resolve_folder(path),
    }
}

fn resolve_manual(
    name: &str,
    description: &str,
    patterns: &[String],
) -> Result<Resolved, ResolveError> {
    let mut warnings = Vec::new();
    let images = expand_patterns(patterns, &mut warnings);
    if images.is_empty() {
        return Err(ResolveError::NoFilesMatched { warnings });
    }

    let description = if is_file_reference(description) {
        let path = Path::new(description);
        fs::read_to_string(path)
            .map(|s| s.trim().to_string())
            .map_err(|_| ResolveError::DescriptionFile(path.to_path_buf()))?
    } else {
        description.to_string()
    };

    Ok(Resolved {
        gallery: GalleryInput {
            name: name.to_string(),
            description,
            images,
        },
        warnings,
    })
}

fn resolve_folder(folder: &Path) -> Result<Resolved, ResolveError> {
    if !folder.is_dir() {
        return Err(ResolveError::NotADirectory(folder.to_path_buf()));
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(folder)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file())
        .collect();
    entries.sort();

    let markdown = entries
        .iter()
        .find(|p| has_extension(p, &["md", "markdown"]))
        .ok_or_else(|| ResolveError::NoMarkdownFile(folder.to_path_buf()))?;

    let images: Vec<PathBuf> = entries
        .iter()
        .filter(|p| is_supported_image(p))
        .cloned()
        .collect();
    if images.is_empty() {
        return Err(ResolveError::NoImageFiles(folder.to_path_buf()));
    }

    let content = fs::read_to_string(markdown)?;
    let name = first_heading(&content).unwrap_or_else(|| {
        markdown
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default()
    });

    Ok(Resolved {
        gallery: GalleryInput {
            name,
            description: content.trim().to_string(),
            images,
        },
        warnings: Vec::new(),
    })
}

/// Expand glob patterns to files, preserving pattern order. Pattern and
/// per-match failures are collected as warnings and skipped.
fn expand_patterns(patterns: &[String], warnings: &mut Vec<String>) -> Vec<PathBuf> {
    let mut expanded = Vec::new();
    for pattern in patterns {
        let paths = match glob::glob(pattern) {
            Ok(paths) => paths,
            Err(e) => {
                warnings.push(format!("could not expand pattern \"{pattern}\": {e}"));
                continue;
            }
        };
        for entry in paths {
            match entry {
                Ok(path) if path.is_dir() => {}
                Ok(path) if in_ignored_dir(&path) => {}
                Ok(path) => expanded.push(path),
                Err(e) => warnings.push(format!("skipping unreadable match: {e}")),
            }
        }
    }
    expanded
}

fn in_ignored_dir(path: &Path) -> bool {
    path.components().any(|c| {
        c.as_os_str()
            .to_str()
            .is_some_and(|s| IGNORED_DIRS.contains(&s))
    })
}

/// Decide whether a description argument names a markdown file rather than
/// being literal text: it ends in a markdown extension, contains a path
/// separator, or starts with a relative-path prefix.
pub fn is_file_reference(description: &str) -> bool {
    let lower = description.to_lowercase();
    lower.ends_with(".md")
        || lower.ends_with(".markdown")
        || description.contains('/')
        || description.contains(std::path::MAIN_SEPARATOR)
        || description.starts_with("./")
        || description.starts_with("../")
}

/// First `# ` heading line of a markdown document, if any.
fn first_heading(content: &str) -> Option<String> {
    content
        .lines()
        .find(|line| line.starts_with("# "))
        .map(|line| line.trim_start_matches("# ").trim().to_string())
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}

/// Extension membership in the supported image set.
pub fn is_supported_image(path: &Path) -> bool {
    has_extension(path, SUPPORTED_EXTENSIONS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn supported_extension_check_is_case_insensitive() {
        assert!(is_supported_image(Path::new("a.JPG")));
        assert!(is_supported_image(Path::new("a.webp")));
        assert!(!is_supported_image(Path::new("a.tiff")));
        assert!(!is_supported_image(Path::new("noext")));
    }

    #[test]
    fn file_reference_heuristics() {
        assert!(is_file_reference("notes.md"));
        assert!(is_file_reference("README.MARKDOWN"));
        assert!(is_file_reference("./desc.txt"));
        assert!(is_file_reference("../desc"));
        assert!(is_file_reference("docs/desc"));
        assert!(!is_file_reference("A summer of film photography"));
        assert!(!is_file_reference("Short description."));
    }

    #[test]
    fn manual_mode_expands_globs_in_pattern_order() {
        let dir = TempDir::new().unwrap();
        for name in ["b.jpg", "a.jpg", "c.png"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }
        let jpgs = format!("{}/*.jpg", dir.path().display());
        let pngs = format!("{}/*.png", dir.path().display());

        let resolved = resolve(&ImportSource::Manual {
            name: "G".into(),
            description: "desc".into(),
            patterns: vec![jpgs, pngs],
        })
        .unwrap();

        let names: Vec<_> = resolved
            .gallery
            .images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.jpg", "b.jpg", "c.png"]);
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn manual_mode_with_no_matches_is_fatal() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.jpg", dir.path().display());
        let err = resolve(&ImportSource::Manual {
            name: "G".into(),
            description: "d".into(),
            patterns: vec![pattern],
        })
        .unwrap_err();
        assert!(matches!(err, ResolveError::NoFilesMatched { .. }));
    }

    #[test]
    fn no_match_error_keeps_pattern_warnings() {
        let err = resolve(&ImportSource::Manual {
            name: "G".into(),
            description: "d".into(),
            patterns: vec!["[".into()],
        })
        .unwrap_err();
        let ResolveError::NoFilesMatched { warnings } = err else {
            panic!("expected NoFilesMatched");
        };
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("could not expand pattern \"[\""));
    }

    #[test]
    fn bad_pattern_is_warning_when_other_patterns_match() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        let good = format!("{}/*.jpg", dir.path().display());

        let resolved = resolve(&ImportSource::Manual {
            name: "G".into(),
            description: "d".into(),
            patterns: vec!["[".into(), good],
        })
        .unwrap();
        assert_eq!(resolved.gallery.images.len(), 1);
        assert_eq!(resolved.warnings.len(), 1);
    }

    #[test]
    fn manual_mode_description_file_is_read() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        let md = dir.path().join("about.md");
        fs::write(&md, "  Rolling hills.\n").unwrap();
        let pattern = format!("{}/*.jpg", dir.path().display());

        let resolved = resolve(&ImportSource::Manual {
            name: "G".into(),
            description: md.to_string_lossy().into_owned(),
            patterns: vec![pattern],
        })
        .unwrap();
        assert_eq!(resolved.gallery.description, "Rolling hills.");
    }

    #[test]
    fn folder_mode_reads_heading_and_images() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("info.md"),
            "# My Gallery\n\nShot on a rainy week.\n",
        )
        .unwrap();
        for name in ["1.jpg", "2.png", "3.webp", "notes.txt"] {
            fs::write(dir.path().join(name), b"x").unwrap();
        }

        let resolved = resolve(&ImportSource::Folder(dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved.gallery.name, "My Gallery");
        assert!(resolved.gallery.description.starts_with("# My Gallery"));
        assert_eq!(resolved.gallery.images.len(), 3);
        // directory-listing (name) order
        let names: Vec<_> = resolved
            .gallery
            .images
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["1.jpg", "2.png", "3.webp"]);
    }

    #[test]
    fn folder_mode_name_falls_back_to_file_stem() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("winter-walks.md"), "No heading here.\n").unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();

        let resolved = resolve(&ImportSource::Folder(dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved.gallery.name, "winter-walks");
    }

    #[test]
    fn folder_mode_without_markdown_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.jpg"), b"x").unwrap();
        let err = resolve(&ImportSource::Folder(dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ResolveError::NoMarkdownFile(_)));
    }

    #[test]
    fn folder_mode_without_images_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("info.md"), "# G\n").unwrap();
        let err = resolve(&ImportSource::Folder(dir.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ResolveError::NoImageFiles(_)));
    }

    #[test]
    fn folder_scan_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("info.md"), "# G\n").unwrap();
        fs::write(dir.path().join("top.jpg"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/deep.jpg"), b"x").unwrap();

        let resolved = resolve(&ImportSource::Folder(dir.path().to_path_buf())).unwrap();
        assert_eq!(resolved.gallery.images.len(), 1);
    }

    #[test]
    fn first_heading_requires_single_hash() {
        assert_eq!(first_heading("## Sub\n# Top\n"), Some("Top".to_string()));
        assert_eq!(first_heading("plain text"), None);
    }
}
