use markport::config::Config;
use markport::error::Result;
use markport::store::SqliteStore;
use std::path::Path;

pub struct AppContext<'a> {
    pub store: &'a SqliteStore,
    pub config: &'a Config,
    /// Config file given with `--config`, if any
    pub config_path: Option<&'a Path>,
    /// Disable color output
    pub nc: bool,
}

pub mod add;
pub mod delete;
pub mod import_export;
pub mod misc;
pub mod tree;

pub trait PortCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()>;
}

/// Enum-based dispatch for commands (avoids Box<dyn PortCommand>)
pub enum CommandEnum {
    Tree(tree::TreeCommand),
    Import(import_export::ImportCommand),
    Export(import_export::ExportCommand),
    Add(add::AddCommand),
    Delete(delete::DeleteCommand),
    Open(misc::OpenCommand),
    Shell(misc::ShellCommand),
    Config(misc::ConfigCommand),
}

impl CommandEnum {
    pub fn execute(&self, ctx: &AppContext) -> Result<()> {
        match self {
            Self::Tree(cmd) => cmd.execute(ctx),
            Self::Import(cmd) => cmd.execute(ctx),
            Self::Export(cmd) => cmd.execute(ctx),
            Self::Add(cmd) => cmd.execute(ctx),
            Self::Delete(cmd) => cmd.execute(ctx),
            Self::Open(cmd) => cmd.execute(ctx),
            Self::Shell(cmd) => cmd.execute(ctx),
            Self::Config(cmd) => cmd.execute(ctx),
        }
    }
}
