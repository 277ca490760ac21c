pub mod browser;
pub mod config;
pub mod error;
pub mod files;
pub mod import_export;
pub mod message;
pub mod models;
pub mod popup;
pub mod store;
pub mod tree;
pub mod utils;

// Re-export error types for convenience
pub use error::MarkportError;
