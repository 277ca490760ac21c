mod cli;
mod commands;
mod interactive;
mod output;

use clap::Parser;
use log::debug;
use markport::{config, error::Result, store::SqliteStore, utils};

fn main() -> Result<()> {
    let args = cli::Cli::parse();

    // Initialize logger; --debug only changes the default, RUST_LOG still wins
    let default_filter = if args.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if args.version {
        println!("markport {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let store = if args.memory {
        SqliteStore::init_in_memory()?
    } else {
        let db_path = if let Some(path) = &args.db {
            path.clone()
        } else {
            utils::get_default_dbdir().join("bookmarks.db")
        };

        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        SqliteStore::init(&db_path)?
    };
    debug!("Bookmark store: {}", store.get_path().display());

    // Load configuration
    let cfg = if let Some(config_path) = &args.config {
        config::Config::load_from_path(config_path)?
    } else {
        config::Config::load()
    };

    cli::handle_args(args, &store, &cfg)?;

    Ok(())
}
