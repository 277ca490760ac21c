use crate::commands::{
    add::AddCommand,
    delete::DeleteCommand,
    import_export::{ExportCommand, ImportCommand},
    misc::{ConfigCommand, OpenCommand, ShellCommand},
    tree::TreeCommand,
    AppContext, CommandEnum,
};
use clap::{Parser, Subcommand};
use markport::config::Config;
use markport::error::Result;
use markport::store::SqliteStore;
use std::path::PathBuf;
use std::sync::OnceLock;

pub fn get_exe_name() -> &'static str {
    static EXE_NAME: OnceLock<String> = OnceLock::new();
    EXE_NAME.get_or_init(|| {
        std::env::args()
            .next()
            .as_ref()
            .map(std::path::Path::new)
            .and_then(|path| path.file_name())
            .and_then(|name| name.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "markport".to_string())
    })
}

#[derive(Parser)]
#[command(author, version, about, long_about = None, disable_version_flag = true)]
pub struct Cli {
    /// Show the program version and exit
    #[arg(short = 'v', long = "version")]
    pub version: bool,

    /// Optional custom bookmark store path
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Use a throwaway in-memory bookmark store (dry run)
    #[arg(long, conflicts_with = "db")]
    pub memory: bool,

    /// Optional custom configuration file path
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Disable color output
    #[arg(long)]
    pub nc: bool,

    /// Show debug information
    #[arg(short = 'g', long = "debug")]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the bookmark tree
    Tree {
        /// Expand every folder
        #[arg(short, long)]
        all: bool,
    },

    /// Import bookmarks from an exported JSON file
    Import {
        /// File path to import from
        file: PathBuf,

        /// Title of the folder the bookmarks are imported into
        #[arg(long)]
        folder: Option<String>,
    },

    /// Export the bookmark tree to a JSON file
    Export {
        /// Node ids to leave out, with everything below them
        #[arg(short = 'x', long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Directory to save the file in (default: download directory)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// File name to save as
        #[arg(long)]
        filename: Option<String>,
    },

    /// Add a bookmark, or a folder when no URL is given
    Add {
        /// Title of the new node
        title: String,

        /// URL of the bookmark
        #[arg(short, long)]
        url: Option<String>,

        /// Parent folder id (default: Other Bookmarks)
        #[arg(short, long)]
        parent: Option<String>,
    },

    /// Remove a node and everything below it
    Rm {
        /// Node id to remove
        id: String,
    },

    /// Open bookmark(s) in browser
    Open {
        /// Bookmark ids to open
        #[arg(required = true, num_args = 1..)]
        ids: Vec<String>,
    },

    /// Start the interactive import/export popup
    Shell,

    /// Print the effective configuration
    Config {
        /// Also write it to the default config file
        #[arg(long)]
        save: bool,
    },
}

impl Commands {
    fn into_command(self) -> CommandEnum {
        match self {
            Commands::Tree { all } => CommandEnum::Tree(TreeCommand { expand_all: all }),
            Commands::Import { file, folder } => CommandEnum::Import(ImportCommand { file, folder }),
            Commands::Export {
                exclude,
                output_dir,
                filename,
            } => CommandEnum::Export(ExportCommand {
                exclude,
                output_dir,
                filename,
            }),
            Commands::Add { title, url, parent } => {
                CommandEnum::Add(AddCommand { title, url, parent })
            }
            Commands::Rm { id } => CommandEnum::Delete(DeleteCommand { id }),
            Commands::Open { ids } => CommandEnum::Open(OpenCommand { ids }),
            Commands::Shell => CommandEnum::Shell(ShellCommand),
            Commands::Config { save } => CommandEnum::Config(ConfigCommand { save }),
        }
    }
}

pub fn handle_args(cli: Cli, store: &SqliteStore, config: &Config) -> Result<()> {
    let ctx = AppContext {
        store,
        config,
        config_path: cli.config.as_deref(),
        nc: cli.nc,
    };

    // No subcommand: show the top of the tree
    let command = cli
        .command
        .map(Commands::into_command)
        .unwrap_or(CommandEnum::Tree(TreeCommand { expand_all: false }));

    command.execute(&ctx)
}
