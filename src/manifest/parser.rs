//! Manifest parser
//!
//! Reads the listing file into an ordered sequence of [`ManifestEntry`].

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::Result;

use super::{LabelPair, ManifestEntry};

/// Parse a manifest file.
///
/// One row per line: `relativePath label1 label2 label3`, whitespace
/// delimited. Blank lines are skipped. An empty manifest is not an
/// error; downstream components tolerate zero rows.
pub fn parse_file(path: &Path) -> Result<Vec<ManifestEntry>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut entries = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(parse_line(&line));
    }

    Ok(entries)
}

/// Parse one manifest line.
///
/// Parsing is deliberately permissive: absent or unparseable numeric
/// fields become 0, never an error. A malformed label therefore shows
/// up as label 0 downstream, not as a rejected row.
pub fn parse_line(line: &str) -> ManifestEntry {
    let mut fields = line.split_whitespace();

    let path = fields.next().unwrap_or("").to_string();
    let label1 = parse_label(fields.next());
    let label2 = parse_label(fields.next());
    let label3 = parse_label(fields.next());

    ManifestEntry::new(path, LabelPair::from_raw(label1, label2, label3))
}

fn parse_label(field: Option<&str>) -> i32 {
    field.and_then(|s| s.parse().ok()).unwrap_or(0)
}
