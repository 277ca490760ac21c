use crate::models::{BookmarkNode, NodeType};

/// Icon shown in front of a tree item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Bookmark,
    /// Collapsed folder (red)
    FolderClosed,
    /// Expanded folder (blue)
    FolderOpen,
}

impl Icon {
    pub fn asset(&self) -> &'static str {
        match self {
            Icon::Bookmark => "bookmark.svg",
            Icon::FolderClosed => "folder-red.svg",
            Icon::FolderOpen => "folder-blue.svg",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemKind {
    /// Bookmark leaf; the label opens `url` in a new viewing context
    Link { url: String },
    Folder {
        expanded: bool,
        children: Vec<TreeItem>,
    },
}

/// Interactive mirror of one bookmark node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeItem {
    /// Copied from the node so unchecked items map back to store ids
    pub id: Option<String>,
    pub label: String,
    pub checked: bool,
    /// Hidden until the parent folder is expanded
    pub hidden: bool,
    pub kind: ItemKind,
}

impl TreeItem {
    pub fn icon(&self) -> Icon {
        match self.kind {
            ItemKind::Link { .. } => Icon::Bookmark,
            ItemKind::Folder { expanded: true, .. } => Icon::FolderOpen,
            ItemKind::Folder { expanded: false, .. } => Icon::FolderClosed,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, ItemKind::Folder { .. })
    }

    pub fn is_expanded(&self) -> bool {
        matches!(self.kind, ItemKind::Folder { expanded: true, .. })
    }

    pub fn url(&self) -> Option<&str> {
        match &self.kind {
            ItemKind::Link { url } => Some(url),
            ItemKind::Folder { .. } => None,
        }
    }

    pub fn children(&self) -> &[TreeItem] {
        match &self.kind {
            ItemKind::Folder { children, .. } => children,
            ItemKind::Link { .. } => &[],
        }
    }

    pub fn children_mut(&mut self) -> &mut [TreeItem] {
        match &mut self.kind {
            ItemKind::Folder { children, .. } => children,
            ItemKind::Link { .. } => &mut [],
        }
    }

    /// Depth-first search for the item carrying `id`
    pub fn find(&self, id: &str) -> Option<&TreeItem> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: &str) -> Option<&mut TreeItem> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children_mut()
            .iter_mut()
            .find_map(|child| child.find_mut(id))
    }
}

/// Build the interactive tree for `node`
///
/// Separators produce no item, and are dropped from their parent's list.
/// Every item starts checked and hidden; folders start collapsed.
pub fn generate_tree(node: &BookmarkNode) -> Option<TreeItem> {
    let kind = match node.kind() {
        NodeType::Separator => return None,
        NodeType::Bookmark => ItemKind::Link {
            url: node.url.clone().unwrap_or_default(),
        },
        NodeType::Folder => ItemKind::Folder {
            expanded: false,
            children: node.children().iter().filter_map(generate_tree).collect(),
        },
    };

    Some(TreeItem {
        id: node.id.clone(),
        label: node.title().to_string(),
        checked: true,
        hidden: true,
        kind,
    })
}

/// Build the tree for the store root: visible, and labelled `root_label`
/// instead of the store's (usually empty) root title.
pub fn generate_root(root: &BookmarkNode, root_label: &str) -> Option<TreeItem> {
    let mut item = generate_tree(root)?;
    item.hidden = false;
    item.label = root_label.to_string();
    Some(item)
}
