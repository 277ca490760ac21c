use markport::message::MessageContent;
use markport::tree::{Icon, Menu, TreeItem};
use owo_colors::OwoColorize;

pub trait Colorize {
    fn to_colored(&self) -> String;
}

/// Visible rows of the export tree, one per line
pub struct ColorizeMenu<'a> {
    menu: &'a Menu,
    no_color: bool,
}

impl<'a> ColorizeMenu<'a> {
    pub fn new(menu: &'a Menu, no_color: bool) -> Self {
        Self { menu, no_color }
    }

    fn row(&self, depth: usize, item: &TreeItem) -> String {
        let indent = "  ".repeat(depth);
        let checkbox = if item.checked { "[x]" } else { "[ ]" };
        let glyph = icon_glyph(item.icon());
        let label = if item.label.is_empty() {
            "(untitled)"
        } else {
            item.label.as_str()
        };
        let id = item.id.as_deref().unwrap_or("-");

        if self.no_color {
            return match item.url() {
                Some(url) => format!("{}{} {} {} <{}> #{}\n", indent, checkbox, glyph, label, url, id),
                None => format!("{}{} {} {} #{}\n", indent, checkbox, glyph, label, id),
            };
        }

        let checkbox = if item.checked {
            checkbox.green().to_string()
        } else {
            checkbox.red().to_string()
        };
        let id = format!("#{}", id).bright_blue().to_string();

        match (item.icon(), item.url()) {
            (Icon::Bookmark, Some(url)) => format!(
                "{}{} {} {} {} {}\n",
                indent,
                checkbox,
                glyph,
                label.green(),
                format!("<{}>", url).yellow(),
                id
            ),
            (Icon::FolderOpen, _) => format!(
                "{}{} {} {} {}\n",
                indent,
                checkbox,
                glyph.blue(),
                label.bold().blue(),
                id
            ),
            _ => format!(
                "{}{} {} {} {}\n",
                indent,
                checkbox,
                glyph.red(),
                label.bold(),
                id
            ),
        }
    }
}

fn icon_glyph(icon: Icon) -> &'static str {
    match icon {
        Icon::Bookmark => "•",
        Icon::FolderClosed => "▸",
        Icon::FolderOpen => "▾",
    }
}

impl<'a> Colorize for ColorizeMenu<'a> {
    fn to_colored(&self) -> String {
        self.menu
            .visible_items()
            .into_iter()
            .map(|(depth, item)| self.row(depth, item))
            .collect()
    }
}

/// Message box contents: failures in red, everything else in green
pub struct ColorizeMessage<'a> {
    content: &'a MessageContent,
    no_color: bool,
}

impl<'a> ColorizeMessage<'a> {
    pub fn new(content: &'a MessageContent, no_color: bool) -> Self {
        Self { content, no_color }
    }
}

impl<'a> Colorize for ColorizeMessage<'a> {
    fn to_colored(&self) -> String {
        let text = self.content.render();
        if self.no_color {
            return text;
        }
        if !self.content.is_failure() {
            return text.green().to_string();
        }

        let mut lines = text.lines();
        let mut out = lines.next().unwrap_or_default().red().bold().to_string();
        for line in lines {
            out.push('\n');
            out.push_str(&line.dimmed().to_string());
        }
        out
    }
}
