use super::{now_millis, BookmarkStore, ROOT_FOLDERS, UNFILED_FOLDER_INDEX};
use crate::error::{MarkportError, Result};
use crate::models::{BookmarkNode, CreateDetails, NodeType};
use std::cell::{Cell, RefCell};

/// Bookmark store kept entirely in memory
///
/// Ids are handed out sequentially as strings, starting with the root at `"1"`.
pub struct MemoryStore {
    root: RefCell<BookmarkNode>,
    next_id: Cell<u64>,
    create_calls: Cell<usize>,
}

impl MemoryStore {
    /// Store holding the root and the standard top-level folders
    pub fn new() -> Self {
        let store = Self::empty();
        {
            let mut root = store.root.borrow_mut();
            let children = root.children.get_or_insert_with(Vec::new);
            for (index, title) in ROOT_FOLDERS.iter().enumerate() {
                let mut folder = BookmarkNode::folder(title, Vec::new()).with_id(&store.take_id());
                folder.parent_id = Some("1".to_string());
                folder.index = Some(index);
                children.push(folder);
            }
        }
        store
    }

    /// Store holding only an untitled root
    pub fn empty() -> Self {
        let mut root = BookmarkNode::folder("", Vec::new()).with_id("1");
        root.index = Some(0);
        Self {
            root: RefCell::new(root),
            next_id: Cell::new(2),
            create_calls: Cell::new(0),
        }
    }

    /// Store whose tree is `root`, ids kept as given
    pub fn with_tree(root: BookmarkNode) -> Self {
        let store = Self::empty();
        store.next_id.set(max_numeric_id(&root) + 1);
        *store.root.borrow_mut() = root;
        store
    }

    /// Number of `create` calls received, failed ones included
    pub fn create_calls(&self) -> usize {
        self.create_calls.get()
    }

    fn take_id(&self) -> String {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        id.to_string()
    }

    fn default_parent_id(&self) -> Result<String> {
        let root = self.root.borrow();
        match root.children().get(UNFILED_FOLDER_INDEX) {
            Some(folder) if folder.is_folder() => Ok(folder.id_str().to_string()),
            _ => Ok(root.id_str().to_string()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn max_numeric_id(node: &BookmarkNode) -> u64 {
    let own = node.id.as_deref().and_then(|id| id.parse().ok()).unwrap_or(0);
    node.children()
        .iter()
        .map(max_numeric_id)
        .fold(own, u64::max)
}

fn find_mut<'a>(node: &'a mut BookmarkNode, id: &str) -> Option<&'a mut BookmarkNode> {
    if node.id.as_deref() == Some(id) {
        return Some(node);
    }
    node.children
        .as_mut()?
        .iter_mut()
        .find_map(|child| find_mut(child, id))
}

impl BookmarkStore for MemoryStore {
    fn get_tree(&self) -> Result<Vec<BookmarkNode>> {
        Ok(vec![self.root.borrow().clone()])
    }

    fn create(&self, details: &CreateDetails) -> Result<BookmarkNode> {
        self.create_calls.set(self.create_calls.get() + 1);

        let parent_id = match &details.parent_id {
            Some(id) => id.clone(),
            None => self.default_parent_id()?,
        };
        let id = self.take_id();

        let mut root = self.root.borrow_mut();
        let parent = find_mut(&mut root, &parent_id)
            .ok_or_else(|| MarkportError::InvalidParent(format!("no node with id {}", parent_id)))?;
        if parent.kind() != NodeType::Folder {
            return Err(MarkportError::InvalidParent(format!(
                "node {} is not a folder",
                parent_id
            )));
        }

        let siblings = parent.children.get_or_insert_with(Vec::new);
        let node = BookmarkNode {
            id: Some(id),
            parent_id: Some(parent_id),
            index: Some(siblings.len()),
            title: Some(details.title.clone()),
            node_type: Some(details.node_type()),
            url: details.url.clone(),
            date_added: Some(now_millis()),
            date_group_modified: None,
            children: match details.node_type() {
                NodeType::Folder => Some(Vec::new()),
                _ => None,
            },
        };
        siblings.push(node.clone());
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_store_has_standard_folders() {
        let store = MemoryStore::new();
        let tree = store.get_tree().unwrap();
        assert_eq!(tree.len(), 1);

        let titles: Vec<&str> = tree[0].children().iter().map(|c| c.title()).collect();
        assert_eq!(titles, ROOT_FOLDERS);
        assert_eq!(tree[0].id.as_deref(), Some("1"));
    }

    #[test]
    fn test_create_without_parent_goes_to_unfiled() {
        let store = MemoryStore::new();
        let folder = store.create(&CreateDetails::folder(None, "Imported")).unwrap();

        let tree = store.get_tree().unwrap();
        let unfiled = &tree[0].children()[UNFILED_FOLDER_INDEX];
        assert_eq!(unfiled.children()[0].id, folder.id);
        assert_eq!(folder.parent_id, unfiled.id);
    }

    #[test]
    fn test_create_assigns_fresh_ids_and_indices() {
        let store = MemoryStore::new();
        let folder = store.create(&CreateDetails::folder(None, "Dev")).unwrap();
        let a = store
            .create(&CreateDetails::bookmark(folder.id.as_deref(), "A", "https://a.org"))
            .unwrap();
        let b = store
            .create(&CreateDetails::bookmark(folder.id.as_deref(), "B", "https://b.org"))
            .unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.index, Some(0));
        assert_eq!(b.index, Some(1));
        assert_eq!(b.kind(), NodeType::Bookmark);
        assert!(b.children.is_none());
        assert_eq!(store.create_calls(), 3);
    }

    #[test]
    fn test_create_under_bookmark_is_rejected() {
        let store = MemoryStore::new();
        let bookmark = store
            .create(&CreateDetails::bookmark(None, "A", "https://a.org"))
            .unwrap();
        let result = store.create(&CreateDetails::folder(bookmark.id.as_deref(), "Nope"));
        assert!(matches!(result, Err(MarkportError::InvalidParent(_))));
    }

    #[test]
    fn test_create_under_missing_parent_is_rejected() {
        let store = MemoryStore::new();
        let result = store.create(&CreateDetails::folder(Some("404"), "Nope"));
        assert!(matches!(result, Err(MarkportError::InvalidParent(_))));
    }

    #[test]
    fn test_with_tree_does_not_reuse_ids() {
        let tree = BookmarkNode::folder(
            "",
            vec![BookmarkNode::folder("Dev", Vec::new()).with_id("41")],
        )
        .with_id("1");
        let store = MemoryStore::with_tree(tree);
        let created = store.create(&CreateDetails::folder(Some("41"), "Sub")).unwrap();
        assert_eq!(created.id.as_deref(), Some("42"));
    }

    #[test]
    fn test_empty_store_files_under_root() {
        let store = MemoryStore::empty();
        let folder = store.create(&CreateDetails::folder(None, "Top")).unwrap();
        assert_eq!(folder.parent_id.as_deref(), Some("1"));
    }
}
