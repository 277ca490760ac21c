//! File port: reading user-selected files and saving downloads.

use crate::error::{MarkportError, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub trait FileHost {
    /// Full text content of a user-selected file
    fn read_text(&self, path: &Path) -> Result<String>;

    /// Save `payload` as `filename`; returns where it ended up
    fn download(&self, filename: &str, mime_type: &str, payload: &[u8]) -> Result<PathBuf>;
}

/// What to do when a download target already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictAction {
    /// Pick a free name: `bookmarks(1).json`, `bookmarks(2).json`, ...
    #[default]
    Uniquify,
    Overwrite,
}

/// Files on the local disk, downloads saved into one directory
pub struct DiskFiles {
    download_dir: PathBuf,
    conflict_action: ConflictAction,
}

impl DiskFiles {
    pub fn new(download_dir: PathBuf, conflict_action: ConflictAction) -> Self {
        Self {
            download_dir,
            conflict_action,
        }
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    fn target_path(&self, filename: &str) -> PathBuf {
        let target = self.download_dir.join(filename);
        match self.conflict_action {
            ConflictAction::Overwrite => target,
            ConflictAction::Uniquify => unique_path(&self.download_dir, filename),
        }
    }
}

/// First `name(n).ext` in `dir` that does not exist yet, or `name.ext` itself
pub fn unique_path(dir: &Path, filename: &str) -> PathBuf {
    let candidate = dir.join(filename);
    if !candidate.exists() {
        return candidate;
    }

    let (stem, ext) = match filename.rfind('.') {
        Some(pos) if pos > 0 => filename.split_at(pos),
        _ => (filename, ""),
    };

    (1..)
        .map(|n| dir.join(format!("{}({}){}", stem, n, ext)))
        .find(|path| !path.exists())
        .unwrap_or(candidate)
}

fn check_filename(filename: &str) -> Result<()> {
    if filename.is_empty()
        || filename.contains(['/', '\\'])
        || filename == "."
        || filename == ".."
    {
        return Err(MarkportError::InvalidInput(format!(
            "'{}' is not a valid download filename",
            filename
        )));
    }
    Ok(())
}

impl FileHost for DiskFiles {
    fn read_text(&self, path: &Path) -> Result<String> {
        let text = fs::read_to_string(path)?;
        debug!("Read {} bytes from {}", text.len(), path.display());
        Ok(text)
    }

    fn download(&self, filename: &str, mime_type: &str, payload: &[u8]) -> Result<PathBuf> {
        check_filename(filename)?;
        fs::create_dir_all(&self.download_dir)?;

        let target = self.target_path(filename);

        // Written next to the target and renamed into place, so a failed
        // download never leaves a truncated file behind.
        let mut temp = tempfile::NamedTempFile::new_in(&self.download_dir)?;
        temp.write_all(payload)?;
        temp.flush()?;
        temp.persist(&target)
            .map_err(|e| MarkportError::Download(format!("{}: {}", target.display(), e.error)))?;

        info!(
            "Saved {} ({}, {} bytes)",
            target.display(),
            mime_type,
            payload.len()
        );
        Ok(target)
    }
}

/// A finished in-memory download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime_type: String,
    pub payload: Vec<u8>,
}

impl Download {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

/// File port kept in memory: readable files are registered up front,
/// downloads are recorded
#[derive(Default)]
pub struct MemoryFiles {
    files: HashMap<PathBuf, String>,
    downloads: RefCell<Vec<Download>>,
    fail_downloads: bool,
}

impl MemoryFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>, content: &str) -> Self {
        self.files.insert(path.into(), content.to_string());
        self
    }

    /// Every download request fails
    pub fn failing_downloads(mut self) -> Self {
        self.fail_downloads = true;
        self
    }

    pub fn downloads(&self) -> Vec<Download> {
        self.downloads.borrow().clone()
    }
}

impl FileHost for MemoryFiles {
    fn read_text(&self, path: &Path) -> Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            MarkportError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", path.display()),
            ))
        })
    }

    fn download(&self, filename: &str, mime_type: &str, payload: &[u8]) -> Result<PathBuf> {
        check_filename(filename)?;
        if self.fail_downloads {
            return Err(MarkportError::Download(format!(
                "{}: download refused",
                filename
            )));
        }
        self.downloads.borrow_mut().push(Download {
            filename: filename.to_string(),
            mime_type: mime_type.to_string(),
            payload: payload.to_vec(),
        });
        Ok(PathBuf::from(filename))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[test]
    fn test_download_writes_file() {
        let dir = TempDir::new().unwrap();
        let files = DiskFiles::new(dir.path().to_path_buf(), ConflictAction::Uniquify);

        let path = files
            .download("bookmarks.json", "application/json", b"[]")
            .unwrap();
        assert_eq!(path, dir.path().join("bookmarks.json"));
        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }

    #[test]
    fn test_download_uniquifies_existing_names() {
        let dir = TempDir::new().unwrap();
        let files = DiskFiles::new(dir.path().to_path_buf(), ConflictAction::Uniquify);

        files.download("bookmarks.json", "application/json", b"1").unwrap();
        let second = files.download("bookmarks.json", "application/json", b"2").unwrap();
        let third = files.download("bookmarks.json", "application/json", b"3").unwrap();

        assert_eq!(second, dir.path().join("bookmarks(1).json"));
        assert_eq!(third, dir.path().join("bookmarks(2).json"));
        assert_eq!(fs::read_to_string(dir.path().join("bookmarks.json")).unwrap(), "1");
    }

    #[test]
    fn test_download_overwrite() {
        let dir = TempDir::new().unwrap();
        let files = DiskFiles::new(dir.path().to_path_buf(), ConflictAction::Overwrite);

        files.download("bookmarks.json", "application/json", b"old").unwrap();
        let path = files.download("bookmarks.json", "application/json", b"new").unwrap();

        assert_eq!(path, dir.path().join("bookmarks.json"));
        assert_eq!(fs::read_to_string(path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_download_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let files = DiskFiles::new(nested.clone(), ConflictAction::Uniquify);

        files.download("x.json", "application/json", b"{}").unwrap();
        assert!(nested.join("x.json").exists());
    }

    #[rstest]
    #[case("")]
    #[case("../escape.json")]
    #[case("nested/file.json")]
    #[case("..")]
    fn test_download_rejects_bad_names(#[case] filename: &str) {
        let dir = TempDir::new().unwrap();
        let files = DiskFiles::new(dir.path().to_path_buf(), ConflictAction::Uniquify);

        let result = files.download(filename, "application/json", b"[]");
        assert!(matches!(result, Err(MarkportError::InvalidInput(_))));
    }

    #[rstest]
    #[case("bookmarks.json", "bookmarks(1).json")]
    #[case("README", "README(1)")]
    #[case(".hidden", ".hidden(1)")]
    #[case("archive.tar.gz", "archive.tar(1).gz")]
    fn test_unique_path_names(#[case] existing: &str, #[case] expected: &str) {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(existing), "x").unwrap();
        assert_eq!(unique_path(dir.path(), existing), dir.path().join(expected));
    }

    #[test]
    fn test_read_text_missing_file() {
        let dir = TempDir::new().unwrap();
        let files = DiskFiles::new(dir.path().to_path_buf(), ConflictAction::Uniquify);
        let result = files.read_text(&dir.path().join("missing.json"));
        assert!(matches!(result, Err(MarkportError::Io(_))));
    }

    #[test]
    fn test_memory_files() {
        let files = MemoryFiles::new().with_file("in.json", "[1]");
        assert_eq!(files.read_text(Path::new("in.json")).unwrap(), "[1]");
        assert!(files.read_text(Path::new("other.json")).is_err());

        files.download("out.json", "application/json", b"[2]").unwrap();
        let downloads = files.downloads();
        assert_eq!(downloads.len(), 1);
        assert_eq!(downloads[0].text(), "[2]");
        assert_eq!(downloads[0].mime_type, "application/json");
    }
}
