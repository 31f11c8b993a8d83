//! Filesystem access used by the lister.
//!
//! [`OsFileSystem`] talks to the host; tests substitute their own
//! [`FileSystem`] to inject failures and control enumeration order.

use std::io;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Type of a filesystem object, as far as the lister cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsKind {
    Directory,
    File,
    /// Sockets, devices, FIFOs and the like.
    Other,
}

/// Metadata needed to classify one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FsMetadata {
    pub kind: FsKind,
    /// Size in bytes.
    pub len: u64,
}

/// The filesystem queries a directory listing is built from.
pub trait FileSystem {
    /// Returns the full paths of the direct children of `dir`.
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    /// Whether the filesystem reports `path` as hidden.
    fn is_hidden(&self, path: &Path) -> io::Result<bool>;

    /// Metadata for `path`, following symlinks.
    fn metadata(&self, path: &Path) -> io::Result<FsMetadata>;
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        (**self).read_dir(dir)
    }

    fn is_hidden(&self, path: &Path) -> io::Result<bool> {
        (**self).is_hidden(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<FsMetadata> {
        (**self).metadata(path)
    }
}

/// The host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
    fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut children = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            match entry {
                Ok(entry) => children.push(entry.path()),
                Err(e) => warn!(dir = %dir.display(), error = %e, "skipping unreadable child"),
            }
        }
        Ok(children)
    }

    fn is_hidden(&self, path: &Path) -> io::Result<bool> {
        is_hidden_impl(path)
    }

    fn metadata(&self, path: &Path) -> io::Result<FsMetadata> {
        let meta = std::fs::metadata(path)?;
        let kind = if meta.is_dir() {
            FsKind::Directory
        } else if meta.is_file() {
            FsKind::File
        } else {
            FsKind::Other
        };
        Ok(FsMetadata {
            kind,
            len: meta.len(),
        })
    }
}

fn has_dot_prefix(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}

#[cfg(unix)]
fn is_hidden_impl(path: &Path) -> io::Result<bool> {
    Ok(has_dot_prefix(path))
}

#[cfg(windows)]
fn is_hidden_impl(path: &Path) -> io::Result<bool> {
    use std::os::windows::fs::MetadataExt;

    const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

    if has_dot_prefix(path) {
        return Ok(true);
    }
    let meta = std::fs::symlink_metadata(path)?;
    Ok(meta.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
}

#[cfg(not(any(unix, windows)))]
fn is_hidden_impl(path: &Path) -> io::Result<bool> {
    Ok(has_dot_prefix(path))
}
