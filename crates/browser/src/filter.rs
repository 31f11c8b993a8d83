//! File extension whitelist.

use std::collections::BTreeSet;

/// Extensions admitted when the caller configures nothing else.
pub const DEFAULT_EXTENSIONS: &[&str] = &[
    ".dff", ".dol", ".elf", ".gcm", ".gcz", ".iso", ".wad", ".wbfs",
];

/// Normalized set of lowercase, dot-prefixed extensions.
///
/// An empty whitelist admits no files at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionWhitelist {
    exts: BTreeSet<String>,
}

impl ExtensionWhitelist {
    /// Builds a whitelist, normalizing each item.
    ///
    /// `"ISO"`, `".iso"` and `" .Iso "` all become `".iso"`. Empty items are
    /// dropped.
    pub fn new<I, S>(exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exts = exts
            .into_iter()
            .filter_map(|e| normalize(e.as_ref()))
            .collect();
        Self { exts }
    }

    /// A whitelist that admits nothing.
    pub fn empty() -> Self {
        Self {
            exts: BTreeSet::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.exts.is_empty()
    }

    /// Whether `ext` (any case, with or without the dot) is whitelisted.
    pub fn contains(&self, ext: &str) -> bool {
        normalize(ext).is_some_and(|e| self.exts.contains(&e))
    }

    /// Whether a file called `name` passes the filter.
    pub fn admits(&self, name: &str) -> bool {
        match extension_of(name) {
            Some(ext) => self.exts.contains(&ext.to_lowercase()),
            None => false,
        }
    }

    /// Iterates the normalized extensions in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.exts.iter().map(String::as_str)
    }
}

impl Default for ExtensionWhitelist {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSIONS)
    }
}

/// Returns the extension of `name` including its leading dot.
///
/// The extension starts at the last `.`; names without one have none.
pub fn extension_of(name: &str) -> Option<&str> {
    name.rfind('.').map(|idx| &name[idx..])
}

fn normalize(ext: &str) -> Option<String> {
    let ext = ext.trim();
    let bare = ext.strip_prefix('.').unwrap_or(ext);
    if bare.is_empty() {
        return None;
    }
    Some(format!(".{}", bare.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_from_last_dot() {
        assert_eq!(extension_of("game.iso"), Some(".iso"));
        assert_eq!(extension_of("backup.tar.gz"), Some(".gz"));
        assert_eq!(extension_of("trailing."), Some("."));
        assert_eq!(extension_of("README"), None);
    }

    #[test]
    fn new_normalizes_items() {
        let wl = ExtensionWhitelist::new(["ISO", ".Gcz", " .wbfs ", "", "."]);
        let exts: Vec<&str> = wl.iter().collect();
        assert_eq!(exts, vec![".gcz", ".iso", ".wbfs"]);
    }

    #[test]
    fn admits_is_case_insensitive_on_the_name() {
        let wl = ExtensionWhitelist::new([".iso"]);
        assert!(wl.admits("game.iso"));
        assert!(wl.admits("GAME.ISO"));
        assert!(wl.admits("Game.Iso"));
        assert!(!wl.admits("game.iso.txt"));
        assert!(!wl.admits("game"));
        assert!(!wl.admits("iso"));
    }

    #[test]
    fn empty_whitelist_admits_nothing() {
        let wl = ExtensionWhitelist::empty();
        assert!(wl.is_empty());
        assert!(!wl.admits("game.iso"));
    }

    #[test]
    fn default_is_dolphin_set() {
        let wl = ExtensionWhitelist::default();
        for ext in DEFAULT_EXTENSIONS {
            assert!(wl.contains(ext), "missing {ext}");
        }
        assert!(wl.contains("WBFS"));
        assert!(!wl.contains(".txt"));
    }
}
