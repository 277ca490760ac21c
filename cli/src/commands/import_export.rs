use super::{AppContext, PortCommand};
use markport::error::Result;
use markport::files::DiskFiles;
use markport::import_export;
use log::debug;
use std::collections::HashSet;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ImportCommand {
    pub file: PathBuf,
    pub folder: Option<String>,
}

impl PortCommand for ImportCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let files = ctx.config.disk_files();
        let folder_title = self
            .folder
            .as_deref()
            .unwrap_or(ctx.config.import_folder_title.as_str());

        let summary = import_export::import_file(ctx.store, &files, &self.file, folder_title)?;
        eprintln!(
            "✓ Successfully imported {} bookmark(s) in {} folder(s) from {} into '{}' (id {})",
            summary.bookmarks,
            summary.folders,
            self.file.display(),
            folder_title,
            summary.folder_id
        );
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ExportCommand {
    pub exclude: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub filename: Option<String>,
}

impl PortCommand for ExportCommand {
    fn execute(&self, ctx: &AppContext) -> Result<()> {
        let files = match &self.output_dir {
            Some(dir) => DiskFiles::new(dir.clone(), ctx.config.conflict_action),
            None => ctx.config.disk_files(),
        };
        let filename = self
            .filename
            .as_deref()
            .unwrap_or(ctx.config.export_filename.as_str());
        let excluded: HashSet<String> = self.exclude.iter().cloned().collect();
        debug!("Exporting to {:?}, excluding {:?}", files.download_dir(), excluded);

        let path = import_export::export_tree(ctx.store, &files, &excluded, filename)?;
        eprintln!("✓ Exported bookmarks to {}", path.display());
        Ok(())
    }
}
