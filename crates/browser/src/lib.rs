//! Directory browsing for locating game images.
//!
//! Produces one-directory-at-a-time listings: hidden children are skipped,
//! files are filtered by an extension whitelist, directories come before
//! files, and a `..` entry leads every listing except the root's. Listing
//! never fails; unreadable directories and uninspectable children degrade to
//! fewer entries and a log line.

mod cursor;
mod filter;
pub mod fs;
mod lister;
mod order;
mod types;

pub use cursor::{Activation, BrowseCursor, default_start_dir};
pub use filter::{DEFAULT_EXTENSIONS, ExtensionWhitelist, extension_of};
pub use lister::{DirectoryLister, list_directory};
pub use order::{EntryOrder, SizeFormat};
pub use types::{Entry, EntryKind, Listing, PARENT_LINK_NAME};
