//! Caller-held navigation state.
//!
//! A [`BrowseCursor`] remembers which directory is being shown and turns a
//! selected index into either a new listing or a chosen source directory.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::filter::ExtensionWhitelist;
use crate::fs::{FileSystem, OsFileSystem};
use crate::lister::DirectoryLister;
use crate::types::{EntryKind, Listing};

/// Outcome of activating an entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// A directory or the parent link was activated; the cursor now shows it.
    Entered(PathBuf),
    /// A file was activated. `source_dir` is the directory that contains it,
    /// which is what gets registered as a source location.
    FileChosen { source_dir: PathBuf, file: PathBuf },
}

/// Navigation cursor over a [`DirectoryLister`].
pub struct BrowseCursor<F = OsFileSystem> {
    lister: DirectoryLister<F>,
    whitelist: ExtensionWhitelist,
    listing: Listing,
}

impl<F: FileSystem> BrowseCursor<F> {
    /// Lists `start` and positions the cursor there.
    pub fn open(lister: DirectoryLister<F>, whitelist: ExtensionWhitelist, start: &Path) -> Self {
        let listing = lister.list(start, &whitelist);
        Self {
            lister,
            whitelist,
            listing,
        }
    }

    /// The listing currently shown.
    pub fn listing(&self) -> &Listing {
        &self.listing
    }

    pub fn current_dir(&self) -> &Path {
        self.listing.dir()
    }

    pub fn whitelist(&self) -> &ExtensionWhitelist {
        &self.whitelist
    }

    /// Re-lists the current directory.
    pub fn refresh(&mut self) {
        let dir = self.listing.dir().to_path_buf();
        self.listing = self.lister.list(&dir, &self.whitelist);
    }

    /// Replaces the current listing with one for `dir`.
    pub fn navigate_to(&mut self, dir: &Path) {
        self.listing = self.lister.list(dir, &self.whitelist);
    }

    /// Activates the entry at `index` of the current listing.
    ///
    /// Returns `None` and leaves the cursor untouched when `index` is out of
    /// range.
    pub fn activate(&mut self, index: usize) -> Option<Activation> {
        let entry = self.listing.get(index)?;
        let target = entry.path().to_path_buf();

        match entry.kind() {
            EntryKind::Directory | EntryKind::ParentLink => {
                debug!(dir = %target.display(), "entering directory");
                self.navigate_to(&target);
                Some(Activation::Entered(target))
            }
            EntryKind::File => Some(Activation::FileChosen {
                source_dir: self.listing.dir().to_path_buf(),
                file: target,
            }),
        }
    }
}

/// Directory a browse session starts in: the user's home, else the root.
pub fn default_start_dir() -> PathBuf {
    #[cfg(windows)]
    let home = std::env::var_os("USERPROFILE");
    #[cfg(not(windows))]
    let home = std::env::var_os("HOME");

    match home {
        Some(home) if !home.is_empty() => PathBuf::from(home),
        _ => PathBuf::from("/"),
    }
}
