//! Listing data types.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// Name shown for the parent-navigation entry.
pub const PARENT_LINK_NAME: &str = "..";

/// What an [`Entry`] resolves to when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    Directory,
    File,
    /// Synthetic "go up one directory" entry.
    ParentLink,
}

/// One item of a directory listing.
///
/// Fields are private so that the kind-specific invariants hold: a parent
/// link is always named `..`, files always carry a size label and
/// directories never do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    name: String,
    path: PathBuf,
    kind: EntryKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    size_label: Option<String>,
}

impl Entry {
    /// Creates a subdirectory entry.
    pub fn directory(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::Directory,
            size_label: None,
        }
    }

    /// Creates a regular file entry with its formatted size.
    pub fn file(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        size_label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            kind: EntryKind::File,
            size_label: Some(size_label.into()),
        }
    }

    /// Creates the `..` entry pointing at `parent`.
    pub fn parent_link(parent: impl Into<PathBuf>) -> Self {
        Self {
            name: PARENT_LINK_NAME.into(),
            path: parent.into(),
            kind: EntryKind::ParentLink,
            size_label: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Absolute path this entry resolves to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Human-readable size, present only for files.
    pub fn size_label(&self) -> Option<&str> {
        self.size_label.as_deref()
    }

    /// Whether activating this entry lists another directory.
    pub fn is_navigable(&self) -> bool {
        matches!(self.kind, EntryKind::Directory | EntryKind::ParentLink)
    }
}

/// The browsable contents of one directory.
///
/// Immutable once built; the next listing replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    dir: PathBuf,
    entries: Vec<Entry>,
}

impl Listing {
    pub(crate) fn new(dir: PathBuf, entries: Vec<Entry>) -> Self {
        Self { dir, entries }
    }

    /// Directory this listing was built from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Returns the entry at `index`, as addressed by a list view.
    pub fn get(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The `..` entry, absent at the filesystem root.
    pub fn parent_link(&self) -> Option<&Entry> {
        self.entries
            .first()
            .filter(|e| e.kind == EntryKind::ParentLink)
    }

    /// Short label for the listed directory: its base name, or the whole
    /// path when there is none (the root).
    pub fn title(&self) -> String {
        match self.dir.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.dir.display().to_string(),
        }
    }
}
