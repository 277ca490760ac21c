/// Error type for the markport library
///
/// Using `thiserror` crate for automatic `Error` trait implementation and `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum MarkportError {
    /// Database-related errors (SQLite bookmark store)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O errors (file reads, downloads)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing/serialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML parsing/serialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A node id the store does not know
    #[error("Bookmark node {0} not found")]
    NodeNotFound(String),

    /// Creation under a parent that is missing or not a folder
    #[error("Invalid parent: {0}")]
    InvalidParent(String),

    /// Download facility failures
    #[error("Download failed: {0}")]
    Download(String),

    /// Generic error for cases that don't fit other categories
    #[error("{0}")]
    Other(String),
}

impl MarkportError {
    /// Short, stable name shown in front of the message (`Name: message`)
    pub fn name(&self) -> &'static str {
        match self {
            MarkportError::Database(_) => "DatabaseError",
            MarkportError::Io(_) => "IoError",
            MarkportError::Json(_) => "JsonError",
            MarkportError::Yaml(_) => "YamlError",
            MarkportError::Config(_) => "ConfigError",
            MarkportError::InvalidInput(_) => "InvalidInputError",
            MarkportError::NodeNotFound(_) => "NotFoundError",
            MarkportError::InvalidParent(_) => "InvalidParentError",
            MarkportError::Download(_) => "DownloadError",
            MarkportError::Other(_) => "Error",
        }
    }
}

/// Result type alias using MarkportError
pub type Result<T> = std::result::Result<T, MarkportError>;

impl From<String> for MarkportError {
    fn from(s: String) -> Self {
        MarkportError::Other(s)
    }
}

impl From<&str> for MarkportError {
    fn from(s: &str) -> Self {
        MarkportError::Other(s.to_string())
    }
}

impl From<serde_yaml::Error> for MarkportError {
    fn from(err: serde_yaml::Error) -> Self {
        MarkportError::Yaml(err.to_string())
    }
}

impl From<serde_json::Error> for MarkportError {
    fn from(err: serde_json::Error) -> Self {
        MarkportError::Json(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_conversion() {
        let err: MarkportError = serde_json::from_str::<Vec<u8>>("{oops")
            .unwrap_err()
            .into();
        assert_eq!(err.name(), "JsonError");
        assert!(err.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn test_string_conversion_is_other() {
        let err: MarkportError = "something broke".into();
        assert_eq!(err.name(), "Error");
        assert_eq!(err.to_string(), "something broke");
    }

    #[test]
    fn test_io_error_keeps_source() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.json");
        let err = MarkportError::from(io);
        assert_eq!(err.name(), "IoError");
        assert!(err.source().is_some());
    }
}
