//! Builtin Category Definitions
//!
//! The default table, used whenever no config overrides it.
//! Order is significant: the first category listing an extension wins.

use serde::{Deserialize, Serialize};

/// Category for extensions that no table entry claims.
pub const FALLBACK_CATEGORY: &str = "Other";

pub const BUILTIN_CATEGORIES: &[BuiltinCategory] = &[
    BuiltinCategory {
        name: "Images",
        extensions: &[
            ".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp", ".tiff", ".heic",
        ],
    },
    BuiltinCategory {
        name: "Documents",
        extensions: &[
            ".pdf", ".doc", ".docx", ".txt", ".md", ".rtf", ".ppt", ".pptx", ".xls", ".xlsx",
        ],
    },
    BuiltinCategory {
        name: "Audio",
        extensions: &[".mp3", ".wav", ".m4a", ".aac", ".flac", ".ogg"],
    },
    BuiltinCategory {
        name: "Video",
        extensions: &[".mp4", ".mov", ".mkv", ".avi", ".wmv"],
    },
    BuiltinCategory {
        name: "Archives",
        extensions: &[".zip", ".rar", ".7z", ".tar", ".gz"],
    },
    BuiltinCategory {
        name: "Code",
        extensions: &[
            ".py", ".js", ".ts", ".java", ".cpp", ".c", ".cs", ".rb", ".go", ".rs", ".html",
            ".css", ".sql",
        ],
    },
];

/// Static builtin definition
#[derive(Debug, Clone)]
pub struct BuiltinCategory {
    /// Category name, also the name of the subfolder files are moved into
    pub name: &'static str,
    /// Lowercase extensions, leading dot included
    pub extensions: &'static [&'static str],
}

/// Runtime category definition
///
/// Built from the builtin table or from a `[[categories]]` entry of the config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDef {
    pub name: String,
    pub extensions: Vec<String>,
}

impl From<&BuiltinCategory> for CategoryDef {
    fn from(builtin: &BuiltinCategory) -> Self {
        Self {
            name: builtin.name.to_string(),
            extensions: builtin.extensions.iter().map(|s| s.to_string()).collect(),
        }
    }
}
