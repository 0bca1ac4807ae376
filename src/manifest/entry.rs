//! Manifest entry definitions

/// Labels attached to one manifest row.
///
/// The composite label packs the second and third raw fields into a
/// single value: `composite = label2 * 4 + label3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelPair {
    /// First raw label, stored as-is
    pub primary: i32,

    /// Derived combination of the second and third raw labels
    pub composite: i32,
}

impl LabelPair {
    /// Derive the label pair from the three raw manifest fields
    pub fn from_raw(label1: i32, label2: i32, label3: i32) -> Self {
        Self {
            primary: label1,
            composite: label2 * 4 + label3,
        }
    }
}

/// One parsed manifest row: a media path relative to the root folder
/// plus its labels. Immutable after parsing; shuffling reorders whole
/// entries so a path can never drift away from its own labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    /// Path relative to the run's root folder
    pub path: String,

    /// Labels derived from the row's raw fields
    pub labels: LabelPair,
}

impl ManifestEntry {
    pub fn new(path: impl Into<String>, labels: LabelPair) -> Self {
        Self {
            path: path.into(),
            labels,
        }
    }
}
