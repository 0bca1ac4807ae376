//! Configuration for a conversion run
//!
//! Centralized configuration with sensible defaults. Options and the
//! randomness seed are passed explicitly into the pipeline entry point;
//! nothing here is ambient process state.

use std::path::PathBuf;

use crate::store::BackendKind;

/// Number of buffered puts after which a transaction is committed
/// and a fresh one opened.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Main configuration for one conversion run
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Input Configuration
    // -------------------------------------------------------------------------
    /// Root folder holding all media files; manifest paths are relative to it
    pub root_folder: PathBuf,

    /// Manifest file: one `relativePath label1 label2 label3` row per line
    pub manifest_path: PathBuf,

    // -------------------------------------------------------------------------
    // Output Configuration
    // -------------------------------------------------------------------------
    /// Destination path for the payload store (must not exist)
    pub payload_db: PathBuf,

    /// Destination path for the label store (must not exist)
    pub label_db: PathBuf,

    /// Which storage engine backs the two stores
    pub backend: BackendKind,

    // -------------------------------------------------------------------------
    // Row Processing Configuration
    // -------------------------------------------------------------------------
    /// Shuffle manifest order before writing
    pub shuffle: bool,

    /// Seed for the shuffle RNG; `None` seeds from OS entropy
    pub shuffle_seed: Option<u64>,

    /// Treat media as grayscale (single channel)
    pub gray: bool,

    /// Resize width in pixels; 0 keeps the source width
    pub resize_width: u32,

    /// Resize height in pixels; 0 keeps the source height
    pub resize_height: u32,

    /// Enforce that all records in one store share one data size
    pub check_size: bool,

    /// Store the original compressed file bytes instead of decoded pixels
    pub encoded: bool,

    /// Encode type for pre-encoded payloads (e.g. "png"); empty means
    /// infer from the file extension
    pub encode_type: String,

    /// Commit threshold for the transaction batchers
    pub batch_size: usize,
}

impl Config {
    /// Create a config for the given input/output paths with default options
    pub fn new(
        root_folder: impl Into<PathBuf>,
        manifest_path: impl Into<PathBuf>,
        payload_db: impl Into<PathBuf>,
        label_db: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root_folder: root_folder.into(),
            manifest_path: manifest_path.into(),
            payload_db: payload_db.into(),
            label_db: label_db.into(),
            backend: BackendKind::Log,
            shuffle: false,
            shuffle_seed: None,
            gray: false,
            resize_width: 0,
            resize_height: 0,
            check_size: false,
            encoded: false,
            encode_type: String::new(),
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Create a new config builder
    pub fn builder(
        root_folder: impl Into<PathBuf>,
        manifest_path: impl Into<PathBuf>,
        payload_db: impl Into<PathBuf>,
        label_db: impl Into<PathBuf>,
    ) -> ConfigBuilder {
        ConfigBuilder {
            config: Config::new(root_folder, manifest_path, payload_db, label_db),
        }
    }

    /// Pre-encoding is in effect when requested explicitly or implied by
    /// an explicit encode type.
    pub fn effective_encoded(&self) -> bool {
        self.encoded || !self.encode_type.is_empty()
    }
}

/// Builder for Config
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Select the storage engine
    pub fn backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    /// Enable manifest shuffling
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.config.shuffle = shuffle;
        self
    }

    /// Fix the shuffle RNG seed (reproducible ordering)
    pub fn shuffle_seed(mut self, seed: u64) -> Self {
        self.config.shuffle_seed = Some(seed);
        self
    }

    /// Force grayscale decoding
    pub fn gray(mut self, gray: bool) -> Self {
        self.config.gray = gray;
        self
    }

    /// Set the resize dimensions; 0 keeps the source dimension
    pub fn resize(mut self, width: u32, height: u32) -> Self {
        self.config.resize_width = width;
        self.config.resize_height = height;
        self
    }

    /// Enforce uniform record data size per store
    pub fn check_size(mut self, check: bool) -> Self {
        self.config.check_size = check;
        self
    }

    /// Store original compressed file bytes instead of decoded pixels
    pub fn encoded(mut self, encoded: bool) -> Self {
        self.config.encoded = encoded;
        self
    }

    /// Set the encode type for pre-encoded payloads
    pub fn encode_type(mut self, encode_type: impl Into<String>) -> Self {
        self.config.encode_type = encode_type.into();
        self
    }

    /// Set the commit threshold for the transaction batchers
    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
