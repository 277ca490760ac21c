use serde::{Deserialize, Deserializer, Serialize};

/// Kind of a bookmark-store record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Bookmark,
    Folder,
    Separator,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Bookmark => "bookmark",
            NodeType::Folder => "folder",
            NodeType::Separator => "separator",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s {
            "bookmark" => Some(NodeType::Bookmark),
            "folder" => Some(NodeType::Folder),
            "separator" => Some(NodeType::Separator),
            _ => None,
        }
    }
}

/// One record of the bookmark store, and the shape written to / read from
/// the exported JSON file.
///
/// Field names follow the browser bookmark API (`parentId`, `dateAdded`, ...).
/// Optional fields are left out of the JSON when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkNode {
    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    #[serde(
        default,
        deserialize_with = "deserialize_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,

    /// `None` when the key is missing, which is not the same as `""`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<NodeType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_group_modified: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<BookmarkNode>>,
}

/// Ids are strings in every browser store, but hand-written files sometimes
/// carry plain numbers.
fn deserialize_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(Option::<RawId>::deserialize(deserializer)?.map(|raw| match raw {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    }))
}

impl BookmarkNode {
    pub fn bookmark(title: &str, url: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            node_type: Some(NodeType::Bookmark),
            url: Some(url.to_string()),
            ..Self::default()
        }
    }

    pub fn folder(title: &str, children: Vec<BookmarkNode>) -> Self {
        Self {
            title: Some(title.to_string()),
            node_type: Some(NodeType::Folder),
            children: Some(children),
            ..Self::default()
        }
    }

    pub fn separator() -> Self {
        Self {
            node_type: Some(NodeType::Separator),
            ..Self::default()
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Effective kind of the node.
    ///
    /// An explicit `type` wins. Older hosts omit it, in which case a node
    /// with a `url` is a bookmark and anything else is folder-like.
    pub fn kind(&self) -> NodeType {
        match self.node_type {
            Some(kind) => kind,
            None if self.url.is_some() => NodeType::Bookmark,
            None => NodeType::Folder,
        }
    }

    pub fn is_separator(&self) -> bool {
        self.kind() == NodeType::Separator
    }

    pub fn is_folder(&self) -> bool {
        self.kind() == NodeType::Folder
    }

    pub fn children(&self) -> &[BookmarkNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn id_str(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    /// Number of (folders, bookmarks) below this node, the node itself excluded
    pub fn count_descendants(&self) -> (usize, usize) {
        self.children()
            .iter()
            .fold((0, 0), |(folders, bookmarks), child| {
                let (f, b) = child.count_descendants();
                match child.kind() {
                    NodeType::Folder => (folders + f + 1, bookmarks + b),
                    NodeType::Bookmark => (folders + f, bookmarks + b + 1),
                    NodeType::Separator => (folders + f, bookmarks + b),
                }
            })
    }

    /// Depth-first search for the node carrying `id`
    pub fn find(&self, id: &str) -> Option<&BookmarkNode> {
        if self.id.as_deref() == Some(id) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(id))
    }
}

/// Arguments of a store `create` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDetails {
    /// Parent folder; `None` lets the store pick its default location
    pub parent_id: Option<String>,
    pub title: String,
    /// Present for bookmarks, absent for folders
    pub url: Option<String>,
}

impl CreateDetails {
    pub fn folder(parent_id: Option<&str>, title: &str) -> Self {
        Self {
            parent_id: parent_id.map(str::to_string),
            title: title.to_string(),
            url: None,
        }
    }

    pub fn bookmark(parent_id: Option<&str>, title: &str, url: &str) -> Self {
        Self {
            parent_id: parent_id.map(str::to_string),
            title: title.to_string(),
            url: Some(url.to_string()),
        }
    }

    pub fn node_type(&self) -> NodeType {
        if self.url.is_some() {
            NodeType::Bookmark
        } else {
            NodeType::Folder
        }
    }
}
