use super::render::{ItemKind, TreeItem};
use crate::error::{MarkportError, Result};
use log::debug;
use std::collections::HashSet;

/// Part of a tree row that received a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The row itself (label, icon)
    Row,
    /// The row's checkbox
    Checkbox,
}

/// Outcome of a click on the export menu
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEvent {
    Expanded,
    Collapsed,
    /// Checkbox toggled; the value was cascaded to every descendant
    Checked(bool),
    /// Bookmark row clicked: open the link
    OpenLink(String),
}

/// Export selection menu: a checkbox tree with collapsible folders
#[derive(Debug, Clone)]
pub struct Menu {
    root: TreeItem,
}

impl Menu {
    pub fn new(root: TreeItem) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &TreeItem {
        &self.root
    }

    fn item_mut(&mut self, id: &str) -> Result<&mut TreeItem> {
        self.root
            .find_mut(id)
            .ok_or_else(|| MarkportError::NodeNotFound(id.to_string()))
    }

    /// Route a click on the row with `id`
    ///
    /// A checkbox click flips the checkbox and cascades the new value; it
    /// never changes expand state. A row click toggles a folder, or asks
    /// for a bookmark's link to be opened.
    pub fn click(&mut self, id: &str, target: ClickTarget) -> Result<MenuEvent> {
        let item = self.item_mut(id)?;
        match target {
            ClickTarget::Checkbox => {
                let value = !item.checked;
                set_checked(item, value);
                debug!("Checkbox {} set to {}", id, value);
                Ok(MenuEvent::Checked(value))
            }
            ClickTarget::Row => {
                if let ItemKind::Link { url } = &item.kind {
                    return Ok(MenuEvent::OpenLink(url.clone()));
                }
                Ok(if toggle_expanded(item) {
                    MenuEvent::Expanded
                } else {
                    MenuEvent::Collapsed
                })
            }
        }
    }

    /// Force the checkbox of `id` (and of everything below it) to `value`
    pub fn set_checked(&mut self, id: &str, value: bool) -> Result<()> {
        let item = self.item_mut(id)?;
        set_checked(item, value);
        Ok(())
    }

    /// Expand or collapse every folder
    pub fn set_expanded_all(&mut self, expanded: bool) {
        fn walk(item: &mut TreeItem, expanded: bool) {
            if item.is_folder() && item.is_expanded() != expanded {
                toggle_expanded(item);
            }
            for child in item.children_mut() {
                walk(child, expanded);
            }
        }
        walk(&mut self.root, expanded);
    }

    /// Ids of every unchecked item, at any depth and whether shown or not
    pub fn excluded_ids(&self) -> HashSet<String> {
        fn collect(item: &TreeItem, out: &mut HashSet<String>) {
            if !item.checked {
                if let Some(id) = &item.id {
                    out.insert(id.clone());
                }
            }
            for child in item.children() {
                collect(child, out);
            }
        }

        let mut excluded = HashSet::new();
        collect(&self.root, &mut excluded);
        excluded
    }

    /// Items currently on screen, with their depth, in display order
    pub fn visible_items(&self) -> Vec<(usize, &TreeItem)> {
        fn walk<'a>(item: &'a TreeItem, depth: usize, out: &mut Vec<(usize, &'a TreeItem)>) {
            if item.hidden {
                return;
            }
            out.push((depth, item));
            for child in item.children() {
                walk(child, depth + 1, out);
            }
        }

        let mut items = Vec::new();
        walk(&self.root, 0, &mut items);
        items
    }
}

/// Binary cascade: `value` overwrites the item and all its descendants
pub fn set_checked(item: &mut TreeItem, value: bool) {
    item.checked = value;
    for child in item.children_mut() {
        set_checked(child, value);
    }
}

/// Flip a folder between collapsed and expanded; returns the new state.
///
/// Only direct children change visibility: deeper items keep their own
/// state and are shown again when their folder is.
fn toggle_expanded(item: &mut TreeItem) -> bool {
    match &mut item.kind {
        ItemKind::Folder { expanded, children } => {
            *expanded = !*expanded;
            for child in children.iter_mut() {
                child.hidden = !*expanded;
            }
            *expanded
        }
        ItemKind::Link { .. } => false,
    }
}
