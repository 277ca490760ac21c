use crate::error::{MarkportError, Result};
use crate::files::FileHost;
use crate::models::{BookmarkNode, CreateDetails, NodeType};
use crate::store::BookmarkStore;
use log::{debug, info};
use serde_json::Value;
use std::path::Path;

/// What an import created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Id of the top-level folder everything was imported into
    pub folder_id: String,
    pub folders: usize,
    pub bookmarks: usize,
}

/// Parse an exported file: a JSON array whose first element is the root.
///
/// Only that first element is decoded; whatever follows it is ignored.
pub fn parse_export(text: &str) -> Result<BookmarkNode> {
    let roots: Vec<Value> = serde_json::from_str(text)?;
    let root = roots.into_iter().next().ok_or_else(|| {
        MarkportError::InvalidInput("bookmark file contains no root node".to_string())
    })?;
    Ok(serde_json::from_value(root)?)
}

/// Recreate `node` (and everything below it) under the folder `destination_id`
pub fn add_bookmarks_to<S>(
    store: &S,
    destination_id: &str,
    node: &BookmarkNode,
    summary: &mut ImportSummary,
) -> Result<()>
where
    S: BookmarkStore + ?Sized,
{
    if node.is_separator() {
        return Ok(());
    }

    // Root containers usually carry no title. Treating an untitled node as a
    // transparent wrapper imports its children straight into the destination
    // instead of adding a nameless folder level.
    if node.title.as_deref() == Some("") {
        for child in node.children() {
            add_bookmarks_to(store, destination_id, child, summary)?;
        }
        return Ok(());
    }

    if node.kind() == NodeType::Bookmark {
        let url = node.url.as_deref().ok_or_else(|| {
            MarkportError::InvalidInput(format!("bookmark '{}' has no url", node.title()))
        })?;
        store.create(&CreateDetails::bookmark(
            Some(destination_id),
            node.title(),
            url,
        ))?;
        summary.bookmarks += 1;
        return Ok(());
    }

    let folder = store.create(&CreateDetails::folder(Some(destination_id), node.title()))?;
    summary.folders += 1;
    let folder_id = folder
        .id
        .ok_or_else(|| MarkportError::Other("store returned a folder without id".to_string()))?;

    for child in node.children() {
        add_bookmarks_to(store, &folder_id, child, summary)?;
    }
    Ok(())
}

/// Import pipeline for already-read text
///
/// Nothing is created unless the text parses. Only the first root is
/// imported, into a new top-level folder titled `folder_title`. A failure
/// part-way leaves what was already created in place.
pub fn import_json<S>(store: &S, text: &str, folder_title: &str) -> Result<ImportSummary>
where
    S: BookmarkStore + ?Sized,
{
    let root = parse_export(text)?;

    let folder = store.create(&CreateDetails::folder(None, folder_title))?;
    let folder_id = folder
        .id
        .ok_or_else(|| MarkportError::Other("store returned a folder without id".to_string()))?;
    debug!("Importing into new folder {} ({})", folder_title, folder_id);

    let mut summary = ImportSummary {
        folder_id,
        ..ImportSummary::default()
    };
    let destination = summary.folder_id.clone();
    add_bookmarks_to(store, &destination, &root, &mut summary)?;

    info!(
        "Imported {} folder(s) and {} bookmark(s)",
        summary.folders, summary.bookmarks
    );
    Ok(summary)
}

/// Import pipeline: read the user's file, then import it
pub fn import_file<S, F>(store: &S, files: &F, path: &Path, folder_title: &str) -> Result<ImportSummary>
where
    S: BookmarkStore + ?Sized,
    F: FileHost + ?Sized,
{
    let text = files.read_text(path)?;
    import_json(store, &text, folder_title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::MemoryFiles;
    use crate::import_export::export::{filter_children, serialize_tree};
    use crate::store::{MemoryStore, SqliteStore};
    use rstest::rstest;
    use std::cell::Cell;
    use std::collections::HashSet;

    /// Memory store that rejects every create after the first `limit`
    struct FlakyStore {
        inner: MemoryStore,
        limit: usize,
        calls: Cell<usize>,
    }

    impl BookmarkStore for FlakyStore {
        fn get_tree(&self) -> Result<Vec<BookmarkNode>> {
            self.inner.get_tree()
        }

        fn create(&self, details: &CreateDetails) -> Result<BookmarkNode> {
            self.calls.set(self.calls.get() + 1);
            if self.calls.get() > self.limit {
                return Err(MarkportError::InvalidParent("store is read-only".to_string()));
            }
            self.inner.create(details)
        }
    }

    fn imported_folder<'a>(tree: &'a [BookmarkNode], summary: &ImportSummary) -> &'a BookmarkNode {
        tree[0].find(&summary.folder_id).unwrap()
    }

    /// Titles, kinds and urls, ids left out
    fn shape(node: &BookmarkNode) -> String {
        let own = match node.kind() {
            NodeType::Bookmark => format!("{}<{}>", node.title(), node.url.as_deref().unwrap_or("")),
            _ => node.title().to_string(),
        };
        if node.is_folder() {
            let children: Vec<String> = node.children().iter().map(shape).collect();
            format!("{}[{}]", own, children.join(","))
        } else {
            own
        }
    }

    #[test]
    fn test_empty_title_is_flattened() {
        let store = MemoryStore::new();
        let json = r#"[{"title": "", "children": [
            {"title": "A", "type": "bookmark", "url": "https://a.org"},
            {"title": "B", "type": "bookmark", "url": "https://b.org"}
        ]}]"#;

        let summary = import_json(&store, json, "Imported Bookmarks").unwrap();
        assert_eq!(summary.bookmarks, 2);
        assert_eq!(summary.folders, 0);

        let tree = store.get_tree().unwrap();
        let folder = imported_folder(&tree, &summary);
        assert_eq!(folder.title(), "Imported Bookmarks");
        assert_eq!(shape(folder), "Imported Bookmarks[A<https://a.org>,B<https://b.org>]");
    }

    #[test]
    fn test_untitled_node_without_children_creates_nothing() {
        let store = MemoryStore::new();
        let summary = import_json(&store, r#"[{"title": ""}]"#, "Imported Bookmarks").unwrap();
        assert_eq!(summary.folders + summary.bookmarks, 0);
        // Only the top-level folder
        assert_eq!(store.create_calls(), 1);
    }

    #[test]
    fn test_nested_folders_and_order() {
        let store = MemoryStore::new();
        let json = r#"[{"title": "", "type": "folder", "children": [
            {"title": "Toolbar", "type": "folder", "children": [
                {"title": "Rust", "type": "bookmark", "url": "https://rust-lang.org"},
                {"title": "", "type": "separator"},
                {"title": "Docs", "type": "folder", "children": [
                    {"title": "Std", "type": "bookmark", "url": "https://doc.rust-lang.org/std/"}
                ]},
                {"title": "Crates", "type": "bookmark", "url": "https://crates.io"}
            ]},
            {"title": "Empty", "type": "folder"}
        ]}]"#;

        let summary = import_json(&store, json, "Imported Bookmarks").unwrap();
        assert_eq!(summary.folders, 3);
        assert_eq!(summary.bookmarks, 3);

        let tree = store.get_tree().unwrap();
        assert_eq!(
            shape(imported_folder(&tree, &summary)),
            "Imported Bookmarks[Toolbar[Rust<https://rust-lang.org>,Docs[Std<https://doc.rust-lang.org/std/>],Crates<https://crates.io>],Empty[]]"
        );
    }

    #[test]
    fn test_only_first_root_is_imported() {
        let store = MemoryStore::new();
        let json = r#"[
            {"title": "First", "type": "folder", "children": []},
            {"title": "Second", "type": "folder", "children": []}
        ]"#;
        let summary = import_json(&store, json, "Imported Bookmarks").unwrap();
        let tree = store.get_tree().unwrap();
        assert_eq!(shape(imported_folder(&tree, &summary)), "Imported Bookmarks[First[]]");
    }

    #[test]
    fn test_later_roots_are_not_decoded() {
        let store = MemoryStore::new();
        let json = r#"[
            {"title": "", "children": [{"title": "A", "url": "https://a.org"}]},
            {"title": 5}
        ]"#;
        let summary = import_json(&store, json, "Imported Bookmarks").unwrap();
        assert_eq!(summary.bookmarks, 1);
        let tree = store.get_tree().unwrap();
        assert_eq!(
            shape(imported_folder(&tree, &summary)),
            "Imported Bookmarks[A<https://a.org>]"
        );
    }

    #[test]
    fn test_missing_title_is_not_a_wrapper() {
        let store = MemoryStore::new();
        let json = r#"[{"title": "Root", "type": "folder", "children": [
            {"type": "bookmark", "url": "https://a.org"},
            {"children": [{"title": "B", "url": "https://b.org"}]}
        ]}]"#;

        let summary = import_json(&store, json, "Imported Bookmarks").unwrap();
        assert_eq!((summary.folders, summary.bookmarks), (2, 2));

        let tree = store.get_tree().unwrap();
        assert_eq!(
            shape(imported_folder(&tree, &summary)),
            "Imported Bookmarks[Root[<https://a.org>,[B<https://b.org>]]]"
        );
    }

    #[test]
    fn test_typeless_nodes_are_inferred() {
        let store = MemoryStore::new();
        let json = r#"[{"title": "Old", "children": [{"title": "A", "url": "https://a.org"}]}]"#;
        let summary = import_json(&store, json, "Imported Bookmarks").unwrap();
        assert_eq!((summary.folders, summary.bookmarks), (1, 1));
    }

    #[rstest]
    #[case("this is not json")]
    #[case("{\"title\": \"object, not array\"}")]
    #[case("[")]
    #[case("[]")]
    fn test_bad_input_creates_nothing(#[case] text: &str) {
        let store = MemoryStore::new();
        let result = import_json(&store, text, "Imported Bookmarks");
        assert!(result.is_err());
        assert_eq!(store.create_calls(), 0);
    }

    #[test]
    fn test_bookmark_without_url_is_rejected() {
        let store = MemoryStore::new();
        let json = r#"[{"title": "", "children": [{"title": "A", "type": "bookmark"}]}]"#;
        let result = import_json(&store, json, "Imported Bookmarks");
        assert!(matches!(result, Err(MarkportError::InvalidInput(_))));
    }

    #[test]
    fn test_store_failure_stops_without_rollback() {
        let store = FlakyStore {
            inner: MemoryStore::new(),
            limit: 2,
            calls: Cell::new(0),
        };
        let json = r#"[{"title": "", "children": [
            {"title": "A", "type": "bookmark", "url": "https://a.org"},
            {"title": "B", "type": "bookmark", "url": "https://b.org"},
            {"title": "C", "type": "bookmark", "url": "https://c.org"}
        ]}]"#;

        let result = import_json(&store, json, "Imported Bookmarks");
        assert!(matches!(result, Err(MarkportError::InvalidParent(_))));
        // Top-level folder plus "A" stay; nothing after the failure is attempted
        assert_eq!(store.calls.get(), 3);
        let tree = store.get_tree().unwrap();
        assert_eq!(tree[0].count_descendants(), (5, 1));
    }

    #[test]
    fn test_import_file_reads_through_file_port() {
        let store = MemoryStore::new();
        let files = MemoryFiles::new().with_file(
            "bookmarks.json",
            r#"[{"title": "", "children": [{"title": "A", "url": "https://a.org"}]}]"#,
        );

        let summary =
            import_file(&store, &files, Path::new("bookmarks.json"), "Imported Bookmarks").unwrap();
        assert_eq!(summary.bookmarks, 1);

        let missing = import_file(&store, &files, Path::new("nope.json"), "Imported Bookmarks");
        assert!(matches!(missing, Err(MarkportError::Io(_))));
    }

    #[test]
    fn test_round_trip_reproduces_tree() {
        let source = SqliteStore::init_in_memory().unwrap();
        let dev = source.create(&CreateDetails::folder(None, "Dev")).unwrap();
        source
            .create(&CreateDetails::bookmark(dev.id.as_deref(), "Rust", "https://rust-lang.org"))
            .unwrap();
        let sub = source
            .create(&CreateDetails::folder(dev.id.as_deref(), "Sub"))
            .unwrap();
        source
            .create(&CreateDetails::bookmark(sub.id.as_deref(), "Std", "https://doc.rust-lang.org/std/"))
            .unwrap();
        source
            .create(&CreateDetails::bookmark(None, "LWN", "https://lwn.net"))
            .unwrap();

        let mut exported = source.get_tree().unwrap();
        filter_children(&mut exported[0], &HashSet::new());
        let json = serialize_tree(&exported).unwrap();

        let target = SqliteStore::init_in_memory().unwrap();
        let summary = import_json(&target, &json, "Imported Bookmarks").unwrap();

        let tree = target.get_tree().unwrap();
        let imported = imported_folder(&tree, &summary);

        // The untitled root is flattened: its top-level folders land directly
        // under "Imported Bookmarks"
        let expected: Vec<String> = exported[0].children().iter().map(shape).collect();
        let actual: Vec<String> = imported.children().iter().map(shape).collect();
        assert_eq!(actual, expected);
        assert_ne!(imported.children()[0].id, exported[0].children()[0].id);
    }
}
