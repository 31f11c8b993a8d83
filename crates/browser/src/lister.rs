//! Directory listing for source selection.

use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::{debug, warn};

use crate::filter::ExtensionWhitelist;
use crate::fs::{FileSystem, FsKind, OsFileSystem};
use crate::order::{EntryOrder, SizeFormat};
use crate::types::{Entry, EntryKind, Listing};

/// Builds filtered, sorted listings of single directories.
#[derive(Debug, Clone, Default)]
pub struct DirectoryLister<F = OsFileSystem> {
    fs: F,
    order: EntryOrder,
    size_format: SizeFormat,
}

impl DirectoryLister {
    /// Creates a lister over the host filesystem with default ordering and
    /// byte-count size labels.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<F: FileSystem> DirectoryLister<F> {
    /// Creates a lister over a custom filesystem.
    pub fn with_fs(fs: F) -> Self {
        Self {
            fs,
            order: EntryOrder::default(),
            size_format: SizeFormat::default(),
        }
    }

    /// Sets the ordering used within the directory and file groups.
    pub fn order(mut self, order: EntryOrder) -> Self {
        self.order = order;
        self
    }

    /// Sets how file size labels are rendered.
    pub fn size_format(mut self, size_format: SizeFormat) -> Self {
        self.size_format = size_format;
        self
    }

    /// Lists the direct children of `dir`.
    ///
    /// Hidden children are skipped, directories are always kept, and files
    /// are kept only when `whitelist` admits their extension. Directories
    /// come before files, each group sorted by the configured order, and a
    /// `..` entry leads the listing unless `dir` is the filesystem root.
    ///
    /// Never fails: an unreadable directory lists as empty and a child that
    /// cannot be inspected is logged and left out.
    pub fn list(&self, dir: &Path, whitelist: &ExtensionWhitelist) -> Listing {
        let dir = absolutize(dir);

        let children = match self.fs.read_dir(&dir) {
            Ok(children) => children,
            Err(e) => {
                warn!(dir = %dir.display(), error = %e, "cannot read directory, listing as empty");
                Vec::new()
            }
        };

        let mut dirs = Vec::new();
        let mut files = Vec::new();

        for child in children {
            match self.inspect(&child, whitelist) {
                Ok(Some(entry)) if entry.kind() == EntryKind::Directory => dirs.push(entry),
                Ok(Some(entry)) => files.push(entry),
                Ok(None) => {}
                Err(e) => {
                    warn!(path = %child.display(), error = %e, "skipping entry");
                }
            }
        }

        dirs.sort_by(|a, b| self.order.compare(a.name(), b.name()));
        files.sort_by(|a, b| self.order.compare(a.name(), b.name()));

        let mut entries = Vec::with_capacity(dirs.len() + files.len() + 1);
        if let Some(parent) = dir.parent() {
            entries.push(Entry::parent_link(parent));
        }
        entries.extend(dirs);
        entries.extend(files);

        debug!(dir = %dir.display(), entries = entries.len(), "directory listed");
        Listing::new(dir, entries)
    }

    /// Classifies one child. `Ok(None)` means the child is filtered out.
    fn inspect(&self, path: &Path, whitelist: &ExtensionWhitelist) -> io::Result<Option<Entry>> {
        if self.fs.is_hidden(path)? {
            return Ok(None);
        }

        let Some(name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return Ok(None);
        };

        let meta = self.fs.metadata(path)?;
        let entry = match meta.kind {
            FsKind::Directory => Some(Entry::directory(name, path)),
            FsKind::File if whitelist.admits(&name) => {
                let label = self.size_format.format(meta.len);
                Some(Entry::file(name, path, label))
            }
            FsKind::File | FsKind::Other => None,
        };
        Ok(entry)
    }
}

/// Lists `dir` with the default lister.
pub fn list_directory(dir: &Path, whitelist: &ExtensionWhitelist) -> Listing {
    DirectoryLister::new().list(dir, whitelist)
}

/// Resolves a relative path against the working directory and folds `.` and
/// `..` components, without touching the filesystem. `..` at the root stays
/// at the root.
fn absolutize(dir: &Path) -> PathBuf {
    let absolute = if dir.is_absolute() {
        dir.to_path_buf()
    } else {
        std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf())
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(normalized.components().next_back(), Some(Component::Normal(_))) {
                    normalized.pop();
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}
