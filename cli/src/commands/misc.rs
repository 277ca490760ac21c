use super::{AppContext, PortCommand};
use crate::interactive;
use markport::browser;
use markport::error::Result;
use markport::models::NodeType;

#[derive(Debug, Clone)]
pub struct OpenCommand {
    pub ids: Vec<String>,
}

impl PortCommand for OpenCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        for id in &self.ids {
            match ctx.store.get_node(id)? {
                Some(node) if node.kind() == NodeType::Bookmark => {
                    let url = node.url.unwrap_or_default();
                    eprintln!("Opening: {}", url);
                    browser::open_url(&url)?;
                }
                Some(_) => eprintln!("Node {} is not a bookmark", id),
                None => eprintln!("Node {} not found", id),
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ShellCommand;

impl PortCommand for ShellCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        interactive::run_with_context(ctx)
    }
}

#[derive(Debug, Clone)]
pub struct ConfigCommand {
    pub save: bool,
}

impl PortCommand for ConfigCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        print!("{}", ctx.config.to_yaml()?);
        if self.save {
            match ctx.config_path {
                Some(path) => ctx.config.save_to_path(path)?,
                None => ctx.config.save()?,
            }
            eprintln!("✓ Configuration saved");
        }
        Ok(())
    }
}
