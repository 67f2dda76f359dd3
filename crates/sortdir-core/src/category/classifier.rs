//! Category Classifier
//!
//! Maps a file extension to a category name using an injected [`CategoryTable`].

use std::collections::HashMap;
use std::path::Path;

use super::builtin::FALLBACK_CATEGORY;
use super::table::{normalize_extension, CategoryTable};

/// Extension-based classifier
///
/// The lookup index is built once from the table; the first category
/// listing an extension owns it.
#[derive(Debug, Clone)]
pub struct CategoryClassifier {
    table: CategoryTable,
    index: HashMap<String, usize>,
}

impl CategoryClassifier {
    pub fn new(table: CategoryTable) -> Self {
        let mut index = HashMap::new();
        for (pos, cat) in table.all().iter().enumerate() {
            for ext in &cat.extensions {
                index.entry(ext.clone()).or_insert(pos);
            }
        }
        Self { table, index }
    }

    pub fn builtin() -> Self {
        Self::new(CategoryTable::builtin())
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// Category for an extension such as `".JPG"`; `"Other"` when nothing matches.
    pub fn pick_category(&self, extension: &str) -> &str {
        let ext = normalize_extension(extension);
        self.index
            .get(&ext)
            .map(|&pos| self.table.all()[pos].name.as_str())
            .unwrap_or(FALLBACK_CATEGORY)
    }

    /// Category for a file path, based on its final extension.
    pub fn classify_path(&self, path: &Path) -> &str {
        self.pick_category(&extension_of(path))
    }
}

impl Default for CategoryClassifier {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Final extension of a path with its leading dot, or `""`.
///
/// `archive.tar.gz` gives `.gz`; `.bashrc` and `Makefile` give `""`.
pub fn extension_of(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => format!(".{}", ext.to_string_lossy()),
        _ => String::new(),
    }
}
