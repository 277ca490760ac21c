use super::{AppContext, PortCommand};
use crate::cli::get_exe_name;
use crate::output::colorize::{Colorize, ColorizeMenu};
use markport::error::{MarkportError, Result};
use markport::store::BookmarkStore;
use markport::tree::{generate_root, ClickTarget, Menu};

#[derive(Debug, Clone)]
pub struct TreeCommand {
    pub expand_all: bool,
}

impl PortCommand for TreeCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let tree = ctx.store.get_tree()?;
        let root = tree
            .first()
            .and_then(|root| generate_root(root, &ctx.config.root_label))
            .ok_or_else(|| MarkportError::Other("bookmark store is empty".to_string()))?;

        let mut menu = Menu::new(root);
        if self.expand_all {
            menu.set_expanded_all(true);
        } else if let Some(id) = menu.root().id.clone() {
            // The top level is always shown
            menu.click(&id, ClickTarget::Row)?;
        }

        print!("{}", ColorizeMenu::new(&menu, ctx.nc).to_colored());

        let (_, bookmarks) = tree[0].count_descendants();
        if bookmarks == 0 {
            eprintln!(
                "No bookmarks yet. Add some with `{0} add` or `{0} import <file>`.",
                get_exe_name()
            );
        }
        Ok(())
    }
}
