use super::{now_millis, BookmarkStore, ROOT_FOLDERS, UNFILED_FOLDER_INDEX};
use crate::error::{MarkportError, Result};
use crate::models::{BookmarkNode, CreateDetails, NodeType};
use log::debug;
use rusqlite::{Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Bookmark store persisted in a SQLite database
pub struct SqliteStore {
    conn: Connection,
    db_path: PathBuf,
}

/// One row of the `nodes` table
struct NodeRow {
    id: i64,
    parent_id: Option<i64>,
    node_type: String,
    title: String,
    url: Option<String>,
    date_added: Option<i64>,
    date_group_modified: Option<i64>,
}

impl NodeRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            parent_id: row.get(1)?,
            node_type: row.get(2)?,
            title: row.get(3)?,
            url: row.get(4)?,
            date_added: row.get(5)?,
            date_group_modified: row.get(6)?,
        })
    }

    fn kind(&self) -> NodeType {
        NodeType::from_string(&self.node_type).unwrap_or(NodeType::Folder)
    }

    fn into_node(self, index: usize, children: Option<Vec<BookmarkNode>>) -> BookmarkNode {
        let kind = self.kind();
        BookmarkNode {
            id: Some(self.id.to_string()),
            parent_id: self.parent_id.map(|p| p.to_string()),
            index: Some(index),
            title: Some(self.title),
            node_type: Some(kind),
            url: self.url,
            date_added: self.date_added,
            date_group_modified: self.date_group_modified,
            children: match kind {
                NodeType::Folder => Some(children.unwrap_or_default()),
                _ => None,
            },
        }
    }
}

const NODE_COLUMNS: &str = "id, parent_id, type, title, url, date_added, date_group_modified";

impl SqliteStore {
    pub fn init_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn,
            db_path: PathBuf::from(":memory:"),
        };
        store.setup_tables()?;
        Ok(store)
    }

    pub fn init(db_path: &Path) -> Result<Self> {
        let conn = Connection::open(db_path)?;
        let store = Self {
            conn,
            db_path: db_path.to_path_buf(),
        };
        store.setup_tables()?;
        Ok(store)
    }

    /// Get the database file path
    pub fn get_path(&self) -> &Path {
        &self.db_path
    }

    fn setup_tables(&self) -> Result<()> {
        self.conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        self.conn.execute(
            "CREATE TABLE if not exists nodes (
                id integer PRIMARY KEY,
                parent_id integer default NULL REFERENCES nodes(id) ON DELETE CASCADE,
                position integer NOT NULL default 0,
                type text NOT NULL,
                title text NOT NULL default '',
                url text default NULL,
                date_added integer default NULL,
                date_group_modified integer default NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_parent ON nodes(parent_id, position)",
            [],
        )?;

        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM nodes", [], |row| row.get(0))?;
        if count == 0 {
            self.seed_roots()?;
        }
        Ok(())
    }

    /// Untitled root plus the standard top-level folders
    fn seed_roots(&self) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        let now = now_millis();

        tx.execute(
            "INSERT INTO nodes (parent_id, position, type, title, date_added) VALUES (NULL, 0, 'folder', '', ?1)",
            [now],
        )?;
        let root_id = tx.last_insert_rowid();

        for (position, title) in ROOT_FOLDERS.iter().enumerate() {
            tx.execute(
                "INSERT INTO nodes (parent_id, position, type, title, date_added) VALUES (?1, ?2, 'folder', ?3, ?4)",
                (root_id, position as i64, title, now),
            )?;
        }

        tx.commit()?;
        debug!("Seeded bookmark store with root {}", root_id);
        Ok(())
    }

    fn root_id(&self) -> Result<i64> {
        Ok(self.conn.query_row(
            "SELECT id FROM nodes WHERE parent_id IS NULL ORDER BY id LIMIT 1",
            [],
            |row| row.get(0),
        )?)
    }

    fn default_parent_id(&self) -> Result<i64> {
        let root_id = self.root_id()?;
        let unfiled = self
            .conn
            .query_row(
                "SELECT id FROM nodes WHERE parent_id = ?1 AND type = 'folder'
                 ORDER BY position, id LIMIT 1 OFFSET ?2",
                (root_id, UNFILED_FOLDER_INDEX as i64),
                |row| row.get(0),
            )
            .optional()?;
        Ok(unfiled.unwrap_or(root_id))
    }

    fn parse_id(id: &str) -> Option<i64> {
        id.trim().parse().ok()
    }

    /// Fetch a single node, children not included
    pub fn get_node(&self, id: &str) -> Result<Option<BookmarkNode>> {
        let Some(id) = Self::parse_id(id) else {
            return Ok(None);
        };

        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM nodes WHERE id = ?1", NODE_COLUMNS),
                [id],
                NodeRow::from_row,
            )
            .optional()?;

        match row {
            Some(row) => {
                let index = match row.parent_id {
                    Some(parent_id) => self.conn.query_row(
                        "SELECT COUNT(*) FROM nodes WHERE parent_id = ?1
                         AND (position < (SELECT position FROM nodes WHERE id = ?2)
                              OR (position = (SELECT position FROM nodes WHERE id = ?2) AND id < ?2))",
                        (parent_id, id),
                        |r| r.get::<_, i64>(0),
                    )? as usize,
                    None => 0,
                };
                Ok(Some(row.into_node(index, None)))
            }
            None => Ok(None),
        }
    }

    /// Delete a node and everything below it
    ///
    /// The root and the standard top-level folders cannot be removed.
    pub fn remove_tree(&self, id: &str) -> Result<usize> {
        let numeric = Self::parse_id(id).ok_or_else(|| MarkportError::NodeNotFound(id.to_string()))?;
        let row = self
            .conn
            .query_row(
                "SELECT parent_id FROM nodes WHERE id = ?1",
                [numeric],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?;

        let parent_id = match row {
            None => return Err(MarkportError::NodeNotFound(id.to_string())),
            Some(parent_id) => parent_id,
        };
        let root_id = self.root_id()?;
        if parent_id.is_none() || parent_id == Some(root_id) {
            return Err(MarkportError::InvalidInput(format!(
                "node {} is a built-in folder and cannot be removed",
                id
            )));
        }

        let (folders, bookmarks) = self
            .get_tree()?
            .first()
            .and_then(|root| root.find(id))
            .map(|node| node.count_descendants())
            .unwrap_or((0, 0));

        let tx = self.conn.unchecked_transaction()?;
        tx.execute("DELETE FROM nodes WHERE id = ?1", [numeric])?;
        tx.execute(
            "UPDATE nodes SET date_group_modified = ?1 WHERE id = ?2",
            (now_millis(), parent_id),
        )?;
        tx.commit()?;

        let removed = folders + bookmarks + 1;
        debug!("Removed node {} ({} entries)", id, removed);
        Ok(removed)
    }
}

impl BookmarkStore for SqliteStore {
    fn get_tree(&self) -> Result<Vec<BookmarkNode>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM nodes ORDER BY position, id",
            NODE_COLUMNS
        ))?;
        let rows = stmt.query_map([], NodeRow::from_row)?;

        let mut roots = Vec::new();
        let mut by_parent: HashMap<i64, Vec<NodeRow>> = HashMap::new();
        for row in rows {
            let row = row?;
            match row.parent_id {
                Some(parent_id) => by_parent.entry(parent_id).or_default().push(row),
                None => roots.push(row),
            }
        }

        fn assemble(
            row: NodeRow,
            index: usize,
            by_parent: &mut HashMap<i64, Vec<NodeRow>>,
        ) -> BookmarkNode {
            let children = by_parent.remove(&row.id).map(|rows| {
                rows.into_iter()
                    .enumerate()
                    .map(|(i, child)| assemble(child, i, by_parent))
                    .collect()
            });
            row.into_node(index, children)
        }

        roots.sort_by_key(|row| row.id);
        let tree = roots
            .into_iter()
            .enumerate()
            .map(|(i, row)| assemble(row, i, &mut by_parent))
            .collect();
        Ok(tree)
    }

    fn create(&self, details: &CreateDetails) -> Result<BookmarkNode> {
        let parent_id = match &details.parent_id {
            Some(id) => Self::parse_id(id)
                .ok_or_else(|| MarkportError::InvalidParent(format!("no node with id {}", id)))?,
            None => self.default_parent_id()?,
        };

        let parent_type: Option<String> = self
            .conn
            .query_row("SELECT type FROM nodes WHERE id = ?1", [parent_id], |row| {
                row.get(0)
            })
            .optional()?;
        match parent_type.as_deref() {
            None => {
                return Err(MarkportError::InvalidParent(format!(
                    "no node with id {}",
                    parent_id
                )))
            }
            Some("folder") => {}
            Some(_) => {
                return Err(MarkportError::InvalidParent(format!(
                    "node {} is not a folder",
                    parent_id
                )))
            }
        }

        let tx = self.conn.unchecked_transaction()?;
        let now = now_millis();
        let position: i64 = tx.query_row(
            "SELECT COALESCE(MAX(position) + 1, 0) FROM nodes WHERE parent_id = ?1",
            [parent_id],
            |row| row.get(0),
        )?;

        tx.execute(
            "INSERT INTO nodes (parent_id, position, type, title, url, date_added) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                parent_id,
                position,
                details.node_type().as_str(),
                &details.title,
                &details.url,
                now,
            ),
        )?;
        let id = tx.last_insert_rowid();

        tx.execute(
            "UPDATE nodes SET date_group_modified = ?1 WHERE id = ?2",
            (now, parent_id),
        )?;
        tx.commit()?;

        debug!(
            "Created {} {} under {}",
            details.node_type().as_str(),
            id,
            parent_id
        );

        self.get_node(&id.to_string())?
            .ok_or_else(|| MarkportError::NodeNotFound(id.to_string()))
    }
}
