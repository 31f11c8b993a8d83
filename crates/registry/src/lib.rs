//! Known source directory registry.
//!
//! Source directories are the places the user has pointed the browser at
//! to find game images. They live in a section/key config store as a count
//! plus indexed paths (`General.GCMPathes`, `General.GCMPath0..`), the same
//! layout Dolphin uses in `Dolphin.ini`.
//!
//! # Stores
//!
//! - [`MemoryStore`]: in-process map, for tests and embedding
//! - [`IniStore`]: INI file on disk, written through on every set

pub mod error;
pub mod ini;
pub mod registry;
pub mod store;

// Re-export primary types for convenience.
pub use error::StoreError;
pub use ini::{IniFile, IniStore};
pub use registry::{COUNT_KEY, MAX_PATHS, PATH_KEY_PREFIX, PathRegistry, SECTION};
pub use store::{ConfigStore, MemoryStore};
