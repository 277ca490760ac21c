pub mod export;
pub mod import;

// Re-export main functions for convenience
pub use export::{export_tree, filter_children, serialize_tree, EXPORT_MIME_TYPE};
pub use import::{add_bookmarks_to, import_file, import_json, parse_export, ImportSummary};
