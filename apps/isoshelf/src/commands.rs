//! Subcommand implementations.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use isoshelf_browser::{Activation, BrowseCursor, EntryKind, Listing};
use isoshelf_registry::{IniStore, PathRegistry};

use crate::config::Config;

/// Prints the listing of `dir` (or the configured start directory).
pub fn ls(config: &Config, dir: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let dir = dir.unwrap_or_else(|| config.start_dir());
    let listing = config.lister().list(&dir, &config.whitelist());
    print_listing(&listing, json)
}

/// Activates entry `index` of `dir`'s listing.
///
/// Directories print their own listing; a file registers `dir` as a source
/// directory.
pub fn open(config: &Config, dir: &Path, index: usize, json: bool) -> anyhow::Result<()> {
    let mut cursor = BrowseCursor::open(config.lister(), config.whitelist(), dir);

    match cursor.activate(index) {
        None => bail!(
            "no entry at index {index} in {} ({} entries)",
            cursor.current_dir().display(),
            cursor.listing().len()
        ),
        Some(Activation::Entered(_)) => print_listing(cursor.listing(), json),
        Some(Activation::FileChosen { source_dir, file }) => {
            tracing::debug!(file = %file.display(), "file chosen");
            register(config, &source_dir)
        }
    }
}

/// Registers `dir` as a source directory.
pub fn add(config: &Config, dir: &Path) -> anyhow::Result<()> {
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }
    let dir = std::path::absolute(dir)?;
    register(config, &dir)
}

/// Prints all registered source directories.
pub fn sources(config: &Config) -> anyhow::Result<()> {
    let registry = open_registry(config)?;
    for path in registry.paths() {
        println!("{path}");
    }
    Ok(())
}

fn register(config: &Config, dir: &Path) -> anyhow::Result<()> {
    let mut registry = open_registry(config)?;
    let path = dir.to_string_lossy();

    if registry.register_if_absent(&path)? {
        println!("added source directory {path}");
    } else {
        println!("{path} is already a source directory");
    }
    Ok(())
}

fn open_registry(config: &Config) -> anyhow::Result<PathRegistry<IniStore>> {
    let ini_path = config.ini_path();
    let store = IniStore::open(&ini_path)
        .with_context(|| format!("failed to open {}", ini_path.display()))?;
    Ok(PathRegistry::new(store))
}

fn print_listing(listing: &Listing, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(listing)?);
    } else {
        print!("{}", render_listing(listing));
    }
    Ok(())
}

/// Renders a listing as numbered lines, indices matching `open`.
pub fn render_listing(listing: &Listing) -> String {
    let mut out = format!("{}\n", listing.dir().display());
    for (idx, entry) in listing.entries().iter().enumerate() {
        let marker = match entry.kind() {
            EntryKind::ParentLink => "up ",
            EntryKind::Directory => "dir",
            EntryKind::File => "   ",
        };
        let _ = write!(out, "{idx:>4}  {marker}  {}", entry.name());
        if let Some(size) = entry.size_label() {
            let _ = write!(out, "  ({size})");
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use isoshelf_browser::{DirectoryLister, ExtensionWhitelist};
    use std::fs;

    fn test_config(tmp: &Path) -> Config {
        Config {
            ini_path: tmp.join("Dolphin.ini").to_string_lossy().into_owned(),
            ..Config::default()
        }
    }

    #[test]
    fn render_marks_kinds_and_sizes() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("saves")).unwrap();
        fs::write(tmp.path().join("game.iso"), vec![0u8; 10]).unwrap();

        let listing = DirectoryLister::new().list(tmp.path(), &ExtensionWhitelist::default());
        let text = render_listing(&listing);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], tmp.path().display().to_string());
        assert_eq!(lines[1], "   0  up   ..");
        assert_eq!(lines[2], "   1  dir  saves");
        assert_eq!(lines[3], "   2       game.iso  (10 B)");
    }

    #[test]
    fn open_file_registers_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let roms = tmp.path().join("roms");
        fs::create_dir(&roms).unwrap();
        fs::write(roms.join("melee.iso"), b"ISO").unwrap();
        let config = test_config(tmp.path());

        // [.., melee.iso]
        open(&config, &roms, 1, false).unwrap();
        open(&config, &roms, 1, false).unwrap();

        let registry = open_registry(&config).unwrap();
        assert_eq!(registry.paths(), vec![roms.to_string_lossy().into_owned()]);
    }

    #[test]
    fn open_out_of_range_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let config = test_config(tmp.path());
        assert!(open(&config, tmp.path(), 42, false).is_err());
    }

    #[test]
    fn add_rejects_files() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("game.iso");
        fs::write(&file, b"ISO").unwrap();
        let config = test_config(tmp.path());

        assert!(add(&config, &file).is_err());
        assert!(add(&config, tmp.path()).is_ok());
        assert_eq!(open_registry(&config).unwrap().count(), 1);
    }
}
