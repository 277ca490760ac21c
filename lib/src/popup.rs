//! The two-tab popup: `Import` (file picker) and `Export` (checkbox tree).
//!
//! Every user action is one handler. Handlers run their pipeline to the end
//! and route the outcome, success or failure, to the message box.

use crate::browser;
use crate::config::Config;
use crate::error::{MarkportError, Result};
use crate::files::FileHost;
use crate::import_export::{export_tree, import_file, ImportSummary};
use crate::message::MessageBox;
use crate::store::BookmarkStore;
use crate::tree::{generate_root, ClickTarget, Menu, MenuEvent};
use log::{debug, error};
use std::path::{Path, PathBuf};

pub const IMPORT_SUCCESS: &str = "Successfully imported bookmarks";
pub const EXPORT_SUCCESS: &str = "Successfully exported";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Import,
    Export,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Import => "import",
            Tab::Export => "export",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "import" => Some(Tab::Import),
            "export" => Some(Tab::Export),
            _ => None,
        }
    }
}

pub struct Popup<'a, S: ?Sized, F: ?Sized> {
    store: &'a S,
    files: &'a F,
    config: &'a Config,
    tab: Tab,
    menu: Option<Menu>,
    message: MessageBox,
}

impl<'a, S, F> Popup<'a, S, F>
where
    S: BookmarkStore + ?Sized,
    F: FileHost + ?Sized,
{
    pub fn new(store: &'a S, files: &'a F, config: &'a Config) -> Self {
        Self {
            store,
            files,
            config,
            tab: Tab::default(),
            menu: None,
            message: MessageBox::new(),
        }
    }

    /// New popup with the export tree already loaded
    pub fn open(store: &'a S, files: &'a F, config: &'a Config) -> Self {
        let mut popup = Self::new(store, files, config);
        popup.load();
        popup
    }

    /// Initial load: build the export tree from the store
    pub fn load(&mut self) {
        match self.build_menu() {
            Ok(menu) => self.menu = Some(menu),
            Err(e) => self.fail(e),
        }
    }

    fn build_menu(&self) -> Result<Menu> {
        let tree = self.store.get_tree()?;
        let root = tree
            .first()
            .ok_or_else(|| MarkportError::Other("bookmark store returned an empty tree".to_string()))?;
        let item = generate_root(root, &self.config.root_label)
            .ok_or_else(|| MarkportError::Other("bookmark root is a separator".to_string()))?;
        debug!("Loaded export tree rooted at {:?}", item.id);
        Ok(Menu::new(item))
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn switch_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn menu(&self) -> Option<&Menu> {
        self.menu.as_ref()
    }

    pub fn menu_mut(&mut self) -> Option<&mut Menu> {
        self.menu.as_mut()
    }

    pub fn message(&self) -> &MessageBox {
        &self.message
    }

    pub fn dismiss_message(&mut self) {
        self.message.dismiss();
    }

    /// Click on a row or checkbox of the export tree
    pub fn click_menu(&mut self, id: &str, target: ClickTarget) -> Option<MenuEvent> {
        let result = match self.menu.as_mut() {
            Some(menu) => menu.click(id, target),
            None => Err(MarkportError::Other("bookmark tree is not loaded".to_string())),
        };
        match result {
            Ok(event) => Some(event),
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    /// Open a bookmark's link; a failure goes to the message box
    pub fn open_link(&mut self, url: &str) -> bool {
        let result = if url.is_empty() {
            Err(MarkportError::InvalidInput("bookmark has no url".to_string()))
        } else {
            browser::open_url(url)
        };
        match result {
            Ok(()) => true,
            Err(e) => {
                self.fail(e);
                false
            }
        }
    }

    /// Show the stored fields of node `id` (children left out) in the message box
    pub fn show_node(&mut self, id: &str) {
        match self.node_details(id) {
            Ok(details) => self.message.spawn(details),
            Err(e) => self.fail(e),
        }
    }

    fn node_details(&self, id: &str) -> Result<serde_json::Value> {
        let tree = self.store.get_tree()?;
        let mut node = tree
            .iter()
            .find_map(|root| root.find(id))
            .cloned()
            .ok_or_else(|| MarkportError::NodeNotFound(id.to_string()))?;
        node.children = None;
        Ok(serde_json::to_value(&node)?)
    }

    /// File selected in the import tab
    pub fn select_file(&mut self, path: &Path) -> Option<ImportSummary> {
        match import_file(self.store, self.files, path, &self.config.import_folder_title) {
            Ok(summary) => {
                self.message.spawn(IMPORT_SUCCESS);
                Some(summary)
            }
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    /// Export button: everything still checked in the tree is exported
    pub fn click_export(&mut self) -> Option<PathBuf> {
        let excluded = self
            .menu
            .as_ref()
            .map(Menu::excluded_ids)
            .unwrap_or_default();

        match export_tree(self.store, self.files, &excluded, &self.config.export_filename) {
            Ok(path) => {
                self.message.spawn(EXPORT_SUCCESS);
                Some(path)
            }
            Err(e) => {
                self.fail(e);
                None
            }
        }
    }

    fn fail(&mut self, e: MarkportError) {
        error!("{}", e);
        self.message.spawn(&e);
    }
}
