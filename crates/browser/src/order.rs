//! Entry ordering and size label formatting.

use std::cmp::Ordering;

/// Ordering applied within the directory group and within the file group.
#[derive(Debug, Clone, Copy, Default)]
pub enum EntryOrder {
    /// Byte-wise comparison of names.
    CaseSensitive,
    /// Comparison of lowercased names.
    #[default]
    CaseInsensitive,
    /// Caller-supplied comparison of names.
    Custom(fn(&str, &str) -> Ordering),
}

impl EntryOrder {
    /// Compares two entry names.
    ///
    /// Ties are broken on the raw names so the result is total: entries are
    /// addressed by position and must not move between identical listings.
    pub fn compare(&self, a: &str, b: &str) -> Ordering {
        let primary = match self {
            EntryOrder::CaseSensitive => a.cmp(b),
            EntryOrder::CaseInsensitive => a.to_lowercase().cmp(&b.to_lowercase()),
            EntryOrder::Custom(cmp) => cmp(a, b),
        };
        primary.then_with(|| a.cmp(b))
    }
}

/// How file sizes are rendered into an entry's size label.
#[derive(Debug, Clone, Copy, Default)]
pub enum SizeFormat {
    /// Raw byte count: `10000 B`.
    #[default]
    Bytes,
    /// Binary units with one decimal: `9.8 KiB`.
    Binary,
    /// Caller-supplied formatter.
    Custom(fn(u64) -> String),
}

const BINARY_UNITS: &[&str] = &["KiB", "MiB", "GiB", "TiB"];

impl SizeFormat {
    pub fn format(&self, bytes: u64) -> String {
        match self {
            SizeFormat::Bytes => format!("{bytes} B"),
            SizeFormat::Binary => format_binary(bytes),
            SizeFormat::Custom(f) => f(bytes),
        }
    }
}

fn format_binary(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = BINARY_UNITS[0];
    for next in &BINARY_UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}
