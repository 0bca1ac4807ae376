//! Manifest Module
//!
//! Parses the input listing into ordered `(relativePath, labels)` rows
//! and optionally randomizes their order.
//!
//! ## Responsibilities
//! - Permissive line parsing (missing/unparseable labels default to 0)
//! - Composite label derivation at parse time
//! - Order randomization that moves a row's path and labels as one unit

mod entry;
mod parser;
mod shuffle;

pub use entry::{LabelPair, ManifestEntry};
pub use parser::{parse_file, parse_line};
pub use shuffle::{rng_from_seed, shuffle_entries};
