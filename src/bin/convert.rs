//! Conversion Binary
//!
//! Converts a labeled media manifest into paired payload/label
//! key-value stores.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use datasetkv::{BackendKind, Config, Pipeline};

/// Convert a set of labeled media files to paired key-value stores
#[derive(Parser, Debug)]
#[command(name = "convert")]
#[command(about = "Convert a labeled media manifest into payload/label key-value stores")]
#[command(version)]
struct Args {
    /// Root folder holding all media files
    root_folder: PathBuf,

    /// Manifest file: one `relativePath label1 label2 label3` per line
    list_file: PathBuf,

    /// Destination path for the payload store (must not exist)
    payload_db: PathBuf,

    /// Destination path for the label store (must not exist)
    label_db: PathBuf,

    /// Treat media as grayscale
    #[arg(long)]
    gray: bool,

    /// Randomly shuffle the order of rows (labels move with their row)
    #[arg(long)]
    shuffle: bool,

    /// Storage engine backing both stores
    #[arg(long, default_value = "log")]
    backend: String,

    /// Width media is resized to (0 keeps the source width)
    #[arg(long = "resize_width", default_value = "0")]
    resize_width: u32,

    /// Height media is resized to (0 keeps the source height)
    #[arg(long = "resize_height", default_value = "0")]
    resize_height: u32,

    /// Check that all records in one store have the same data size
    #[arg(long = "check_size")]
    check_size: bool,

    /// Store the original encoded file bytes instead of decoded pixels
    #[arg(long)]
    encoded: bool,

    /// Encode type for pre-encoded payloads ('png', 'jpg', ...)
    #[arg(long = "encode_type", default_value = "")]
    encode_type: String,

    /// Seed for the shuffle RNG (omit for OS entropy)
    #[arg(long)]
    seed: Option<u64>,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,datasetkv=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    // Insufficient or invalid arguments: print usage, exit 1
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    let backend: BackendKind = match args.backend.parse() {
        Ok(kind) => kind,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("datasetkv convert v{}", datasetkv::VERSION);
    tracing::info!("manifest: {}", args.list_file.display());
    tracing::info!(
        "payload store: {} | label store: {} | backend: {}",
        args.payload_db.display(),
        args.label_db.display(),
        backend
    );

    let mut builder = Config::builder(
        &args.root_folder,
        &args.list_file,
        &args.payload_db,
        &args.label_db,
    )
    .backend(backend)
    .gray(args.gray)
    .shuffle(args.shuffle)
    .resize(args.resize_width, args.resize_height)
    .check_size(args.check_size)
    .encoded(args.encoded)
    .encode_type(args.encode_type);

    if let Some(seed) = args.seed {
        builder = builder.shuffle_seed(seed);
    }

    // All fatal conditions surface here; only this entry point decides
    // to terminate the process.
    match Pipeline::new(builder.build()).run() {
        Ok(summary) => {
            tracing::info!(
                "done: {} rows written, {} skipped (of {})",
                summary.rows_written,
                summary.rows_skipped,
                summary.rows_total
            );
        }
        Err(e) => {
            tracing::error!("conversion failed: {}", e);
            std::process::exit(1);
        }
    }
}
