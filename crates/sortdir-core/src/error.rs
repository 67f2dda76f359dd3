use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SortdirError {
    #[error("Path does not exist: {path}")]
    PathNotFound { path: PathBuf },

    #[error("Path is not a folder: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Category folder is blocked by a file: {path}")]
    CategoryPathBlocked { path: PathBuf },

    #[error("Invalid category name: '{name}' - must be non-empty and contain no path separators")]
    InvalidCategoryName { name: String },

    #[error("Invalid extension '{extension}' in category '{category}'")]
    InvalidExtension { category: String, extension: String },

    #[error("Invalid skip pattern: {0}")]
    InvalidPattern(#[from] glob::PatternError),

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Config directory not found")]
    ConfigDirNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SortdirError>;

impl SortdirError {
    /// True for the failures raised while validating the target folder,
    /// before any entry has been touched.
    pub fn is_invalid_target(&self) -> bool {
        matches!(self, Self::PathNotFound { .. } | Self::NotADirectory { .. })
    }
}
