use crate::commands::AppContext;
use crate::output::colorize::{Colorize, ColorizeMenu, ColorizeMessage};
use markport::error::{MarkportError, Result};
use markport::files::FileHost;
use markport::popup::{Popup, Tab};
use markport::store::BookmarkStore;
use markport::tree::{ClickTarget, MenuEvent};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::Path;

pub fn run_with_context(ctx: &AppContext) -> Result<()> {
    let files = ctx.config.disk_files();
    let mut popup = Popup::open(ctx.store, &files, ctx.config);
    let mut rl = DefaultEditor::new().map_err(|e| MarkportError::Other(e.to_string()))?;

    println!("markport popup - type '?' for help");
    report(&popup, ctx.nc);

    loop {
        let prompt = format!("{}> ", popup.tab().as_str());
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                rl.add_history_entry(line)
                    .map_err(|e| MarkportError::Other(e.to_string()))?;

                match line {
                    "q" | "quit" | "exit" => break,
                    "?" | "help" => print_help(),
                    _ => handle_command(&mut popup, ctx.nc, line),
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("^C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("^D");
                break;
            }
            Err(err) => {
                eprintln!("Error: {:?}", err);
                break;
            }
        }
    }
    Ok(())
}

fn print_help() {
    println!(
        "
POPUP COMMANDS:

TABS:
    tab                    Show the current tab
    tab import|export      Switch tab

EXPORT TREE:
    ls  or tree            Show the visible part of the tree
    <id>                   Click a row: toggle a folder, open a bookmark
    t <id>                 Same as <id>
    x <id>                 Click a checkbox (applies to everything below)
    info <id>              Show the stored fields of a node
    expand-all             Expand every folder
    collapse-all           Collapse every folder
    export                 Export everything still checked (export tab)

IMPORT:
    import <file>          Import an exported JSON file (import tab)

MESSAGES:
    msg                    Show the last message again
    ok  or dismiss         Hide the message box
    reload                 Rebuild the tree from the bookmark store

HELP & EXIT:
    ?  or help             Show this help
    q  or quit or exit     Exit
    ^D or ^C               Exit
"
    );
}

/// Print the message box, if it is showing
fn report<S, F>(popup: &Popup<'_, S, F>, nc: bool)
where
    S: BookmarkStore + ?Sized,
    F: FileHost + ?Sized,
{
    if !popup.message().is_visible() {
        return;
    }
    if let Some(content) = popup.message().content() {
        println!("{}", ColorizeMessage::new(content, nc).to_colored());
    }
}

fn print_tree<S, F>(popup: &Popup<'_, S, F>, nc: bool)
where
    S: BookmarkStore + ?Sized,
    F: FileHost + ?Sized,
{
    match popup.menu() {
        Some(menu) => print!("{}", ColorizeMenu::new(menu, nc).to_colored()),
        None => println!("Bookmark tree is not loaded; try 'reload'"),
    }
}

fn click<S, F>(popup: &mut Popup<'_, S, F>, nc: bool, id: &str, target: ClickTarget)
where
    S: BookmarkStore + ?Sized,
    F: FileHost + ?Sized,
{
    match popup.click_menu(id, target) {
        Some(MenuEvent::OpenLink(url)) => {
            println!("Opening: {}", url);
            if !popup.open_link(&url) {
                report(popup, nc);
            }
        }
        Some(_) => print_tree(popup, nc),
        None => report(popup, nc),
    }
}

/// Every failure ends up in the popup's message box
fn handle_command<S, F>(popup: &mut Popup<'_, S, F>, nc: bool, line: &str)
where
    S: BookmarkStore + ?Sized,
    F: FileHost + ?Sized,
{
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return;
    }

    let cmd = parts[0];
    let args = &parts[1..];

    match cmd {
        "ls" | "tree" => print_tree(popup, nc),
        "tab" => match args.first() {
            None => println!("{}", popup.tab().as_str()),
            Some(name) => match Tab::from_string(name) {
                Some(tab) => popup.switch_tab(tab),
                None => println!("Unknown tab '{}': use import or export", name),
            },
        },
        "x" | "t" => match args.first() {
            Some(id) => {
                let target = if cmd == "x" {
                    ClickTarget::Checkbox
                } else {
                    ClickTarget::Row
                };
                click(popup, nc, id, target);
            }
            None => println!("Usage: {} <id>", cmd),
        },
        "info" => match args.first() {
            Some(id) => {
                popup.show_node(id);
                report(popup, nc);
            }
            None => println!("Usage: info <id>"),
        },
        "expand-all" | "collapse-all" => match popup.menu_mut() {
            Some(menu) => {
                menu.set_expanded_all(cmd == "expand-all");
                print_tree(popup, nc);
            }
            None => println!("Bookmark tree is not loaded; try 'reload'"),
        },
        "import" => {
            if popup.tab() != Tab::Import {
                println!("Switch to the import tab first: tab import");
                return;
            }
            if args.is_empty() {
                println!("Usage: import <file>");
                return;
            }
            let path = args.join(" ");
            if let Some(summary) = popup.select_file(Path::new(&path)) {
                println!(
                    "{} folder(s), {} bookmark(s) added under #{}",
                    summary.folders, summary.bookmarks, summary.folder_id
                );
            }
            report(popup, nc);
        }
        "export" => {
            if popup.tab() != Tab::Export {
                println!("Switch to the export tab first: tab export");
                return;
            }
            if let Some(path) = popup.click_export() {
                println!("Saved to {}", path.display());
            }
            report(popup, nc);
        }
        "msg" => match popup.message().content() {
            Some(content) => println!("{}", ColorizeMessage::new(content, nc).to_colored()),
            None => println!("No message"),
        },
        "ok" | "dismiss" => popup.dismiss_message(),
        "reload" => {
            popup.load();
            report(popup, nc);
        }
        _ if parts.len() == 1 && cmd.chars().all(|c| c.is_ascii_digit()) => {
            click(popup, nc, cmd, ClickTarget::Row);
        }
        _ => println!("Unknown command: {} (type '?' for help)", cmd),
    }
}
