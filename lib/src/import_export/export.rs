use crate::error::{MarkportError, Result};
use crate::files::FileHost;
use crate::models::BookmarkNode;
use crate::store::BookmarkStore;
use log::{debug, info};
use std::collections::HashSet;
use std::path::PathBuf;

pub const EXPORT_MIME_TYPE: &str = "application/json";

/// Prune every child whose id is in `excluded`, then recurse into what is left
///
/// Separators go too: they have no checkbox, so they can never be picked.
/// The node itself is never removed, only its descendants.
pub fn filter_children(node: &mut BookmarkNode, excluded: &HashSet<String>) {
    let Some(children) = node.children.as_mut() else {
        return;
    };

    children.retain(|child| {
        !child.is_separator()
            && !child
                .id
                .as_ref()
                .is_some_and(|id| excluded.contains(id))
    });

    for child in children.iter_mut() {
        filter_children(child, excluded);
    }
}

/// Two-space indented JSON array, the export file format
pub fn serialize_tree(tree: &[BookmarkNode]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tree)?)
}

/// Export pipeline: read the store, drop deselected subtrees, download as JSON
///
/// The filter works on the copy returned by the store; the store itself is
/// never touched.
pub fn export_tree<S, F>(
    store: &S,
    files: &F,
    excluded: &HashSet<String>,
    filename: &str,
) -> Result<PathBuf>
where
    S: BookmarkStore + ?Sized,
    F: FileHost + ?Sized,
{
    let mut tree = store.get_tree()?;
    let root = tree
        .first_mut()
        .ok_or_else(|| MarkportError::Other("bookmark store returned an empty tree".to_string()))?;

    filter_children(root, excluded);
    let (folders, bookmarks) = root.count_descendants();
    debug!(
        "Exporting {} folder(s) and {} bookmark(s), {} id(s) excluded",
        folders,
        bookmarks,
        excluded.len()
    );

    let json = serialize_tree(&tree)?;
    let path = files.download(filename, EXPORT_MIME_TYPE, json.as_bytes())?;
    info!("Exported bookmarks to {}", path.display());
    Ok(path)
}
