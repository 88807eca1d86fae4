use clap::{ArgGroup, Parser, Subcommand};
use galerie::import::{self, CoverPicker, ImportOptions, NoPicker, ProcessedPhoto};
use galerie::optimize::{Compression, Quality, Settings};
use galerie::output;
use galerie::resolve::{self, ImportSource};
use galerie::routes::{RouteDef, flatten_routes, routes_tree};
use galerie::store::{self, GalleryStore, NoopStore, SqliteStore};
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "galerie")]
#[command(about = "Import photos into a personal gallery site")]
#[command(long_about = "\
Import photos into a personal gallery site

Two import modes, mutually exclusive:

  Manual:  --name, --description (text or a markdown file path), and one or
           more --paths globs.
  Folder:  --folder DIR. The first markdown file in the folder supplies the
           gallery name (first '# ' heading, else the file stem) and
           description (full content); images in the folder are imported in
           name order.

Processed images land under the photo root, one slug-named folder per
gallery. Records go to the SQLite database named by GALERIE_DATABASE_URL
(falling back to DATABASE_URL; a .env file is honored). With neither set,
files are still processed but nothing is recorded.")]
#[command(version = version_string())]
struct Cli {
    /// Static asset root for processed photos
    #[arg(long, default_value = "static/photos", global = true)]
    photos_root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args)]
#[command(group(ArgGroup::new("mode").required(true).args(["name", "folder"])))]
struct ImportArgs {
    /// Gallery name (manual mode)
    #[arg(short, long, requires_all = ["description", "paths"])]
    name: Option<String>,

    /// Gallery description: literal text or a markdown file path (manual mode)
    #[arg(short, long)]
    description: Option<String>,

    /// Image file paths or glob patterns (manual mode)
    #[arg(short, long, num_args = 1..)]
    paths: Vec<String>,

    /// Folder whose markdown file and images define the gallery
    #[arg(long, conflicts_with_all = ["name", "description", "paths"])]
    folder: Option<PathBuf>,

    /// Comma-separated format allowlist (informational)
    #[arg(short, long, default_value = "jpg,jpeg,png,gif,webp")]
    format: String,

    /// JPEG quality (1-100)
    #[arg(short, long, default_value_t = 90,
          value_parser = clap::value_parser!(u32).range(1..=100))]
    quality: u32,

    /// PNG compression level (0-9)
    #[arg(short, long, default_value_t = 9,
          value_parser = clap::value_parser!(u32).range(0..=9))]
    compression: u32,

    /// Skip optimization and copy files verbatim
    #[arg(long)]
    no_optimize: bool,

    /// Show planned destinations without writing anything
    #[arg(long)]
    dry_run: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Import images as a new gallery
    Import(ImportArgs),
    /// Create the database tables
    InitDb,
    /// List galleries with their cover photos
    List,
    /// Show one gallery and its photos
    Show { slug: String },
    /// Print the site navigation tree
    Nav,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let photos_root = cli.photos_root.clone();

    match cli.command {
        Command::Import(args) => run_import(args, &photos_root)?,
        Command::InitDb => {
            let url = require_database_url()?;
            let store = SqliteStore::open(Path::new(&url))?;
            store.initialize()?;
            println!("Initialized database at {url}");
        }
        Command::List => {
            let store = open_store()?;
            output::print_gallery_list(&store.galleries_with_covers()?);
        }
        Command::Show { slug } => {
            let store = open_store()?;
            let (gallery, photos) = store.gallery_by_slug(&slug)?;
            output::print_gallery_detail(&gallery, &photos);
        }
        Command::Nav => {
            let store = open_store()?;
            let mut defs = vec![RouteDef::new("bio"), RouteDef::new("photos")];
            for entry in store.galleries_with_covers()? {
                defs.push(RouteDef::named(
                    format!("photos/{}", entry.gallery.slug),
                    entry.gallery.name.clone(),
                ));
            }
            output::print_nav(&flatten_routes(&routes_tree(&defs)));
        }
    }

    Ok(())
}

fn run_import(args: ImportArgs, photos_root: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = match args.folder {
        Some(folder) => ImportSource::Folder(folder),
        // clap guarantees name+description+paths in manual mode
        None => ImportSource::Manual {
            name: args.name.unwrap_or_default(),
            description: args.description.unwrap_or_default(),
            patterns: args.paths,
        },
    };

    let resolved = resolve::resolve(&source).inspect_err(|e| {
        // Surface per-pattern diagnostics even when nothing matched at all.
        if let resolve::ResolveError::NoFilesMatched { warnings } = e {
            for warning in warnings {
                output::print_resolve_warning(warning);
            }
        }
    })?;
    for warning in &resolved.warnings {
        output::print_resolve_warning(warning);
    }

    let options = ImportOptions {
        photos_root: photos_root.to_path_buf(),
        settings: Settings {
            quality: Quality::new(args.quality),
            compression: Compression::new(args.compression),
            optimize: !args.no_optimize,
        },
    };

    if args.dry_run {
        output::print_dry_run(&resolved.gallery, &options, &args.format);
        return Ok(());
    }

    let mut store: Box<dyn GalleryStore> = match store::database_url() {
        Some(url) => {
            let store = SqliteStore::open(Path::new(&url))?;
            store.initialize()?;
            Box::new(store)
        }
        None => {
            output::print_resolve_warning(
                "no GALERIE_DATABASE_URL or DATABASE_URL set; records will be skipped",
            );
            Box::new(NoopStore::new())
        }
    };

    // Only prompt for a cover when someone is actually at the terminal.
    let picker: Box<dyn CoverPicker> = if std::io::stdin().is_terminal() {
        Box::new(ConsolePicker)
    } else {
        Box::new(NoPicker)
    };

    let report = import::run(store.as_mut(), picker.as_ref(), &resolved.gallery, &options)?;
    output::print_summary(&report);
    Ok(())
}

fn require_database_url() -> Result<String, Box<dyn std::error::Error>> {
    store::database_url()
        .ok_or_else(|| "no GALERIE_DATABASE_URL or DATABASE_URL set".into())
}

fn open_store() -> Result<SqliteStore, Box<dyn std::error::Error>> {
    let url = require_database_url()?;
    let store = SqliteStore::open(Path::new(&url))?;
    store.initialize()?;
    Ok(store)
}

/// Cover selection at the terminal: lists the processed photos and reads a
/// 1-based choice, where 0 or anything unparseable means no cover.
struct ConsolePicker;

impl CoverPicker for ConsolePicker {
    fn pick(&self, photos: &[ProcessedPhoto]) -> Option<usize> {
        if photos.is_empty() {
            return None;
        }
        println!();
        println!("Select a cover photo:");
        for (position, photo) in photos.iter().enumerate() {
            println!("  {} {}", position + 1, photo.dest.relative());
        }
        print!("Cover (1-{}, 0 for none): ", photos.len());
        std::io::stdout().flush().ok();

        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line).ok()?;
        import::parse_cover_selection(&line, photos.len())
    }
}
