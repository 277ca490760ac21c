//! Bookmark store port.
//!
//! The import and export pipelines only ever talk to a store through
//! [`BookmarkStore`]: one read of the whole tree, and one `create` call per
//! node. [`SqliteStore`] is the persistent store used by the CLI,
//! [`MemoryStore`] backs tests and dry runs.

pub mod memory;
pub mod sqlite;

use crate::error::Result;
use crate::models::{BookmarkNode, CreateDetails};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Titles of the folders every store starts with, in display order
pub const ROOT_FOLDERS: [&str; 4] = [
    "Bookmarks Menu",
    "Bookmarks Toolbar",
    "Other Bookmarks",
    "Mobile Bookmarks",
];

/// Position in [`ROOT_FOLDERS`] of the folder receiving nodes created without a parent
pub const UNFILED_FOLDER_INDEX: usize = 2;

pub trait BookmarkStore {
    /// The whole tree; the first element is the root
    fn get_tree(&self) -> Result<Vec<BookmarkNode>>;

    /// Create one node: a bookmark when `details.url` is set, a folder otherwise
    fn create(&self, details: &CreateDetails) -> Result<BookmarkNode>;
}

impl<S: BookmarkStore + ?Sized> BookmarkStore for &S {
    fn get_tree(&self) -> Result<Vec<BookmarkNode>> {
        (**self).get_tree()
    }

    fn create(&self, details: &CreateDetails) -> Result<BookmarkNode> {
        (**self).create(details)
    }
}

pub(crate) fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
