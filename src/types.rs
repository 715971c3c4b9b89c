//! Common types used throughout the application

use serde::Serialize;

/// Immutable metadata snapshot for one package version, as reported by the
/// package database at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageRecord {
    pub name: String,
    /// Installed size in bytes. Only ordering treats unknown/negative values
    /// as zero; the stored value is kept as reported.
    pub installed_size: i64,
    pub description: String,
    /// Direct dependency names, bare (version constraints stripped).
    pub depends: Vec<String>,
}

/// An installed package with a newer version available. `record` holds the
/// *new* version's metadata; `selected` is the only field that ever changes
/// after the candidate list is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpgradeCandidate {
    pub record: PackageRecord,
    pub selected: bool,
}

impl UpgradeCandidate {
    pub fn new(record: PackageRecord) -> Self {
        Self {
            record,
            selected: false,
        }
    }
}

/// Human-readable size, binary units.
pub fn size_str(bytes: i64) -> String {
    if bytes <= 0 {
        return String::from("-");
    }
    let bytes = bytes as u64;
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{bytes} B")
    }
}
