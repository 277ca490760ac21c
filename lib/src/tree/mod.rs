//! Interactive checkbox tree used to pick what gets exported.

pub mod menu;
pub mod render;

pub use menu::{ClickTarget, Menu, MenuEvent};
pub use render::{generate_root, generate_tree, Icon, ItemKind, TreeItem};
