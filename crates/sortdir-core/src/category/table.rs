//! Category Table
//!
//! Ordered runtime table of categories: builtin entries merged with
//! the `[[categories]]` section of the config file.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SortdirError};

use super::builtin::{CategoryDef, BUILTIN_CATEGORIES};

/// Ordered category table
///
/// Lookup walks the entries front to back, so position decides which
/// category wins when two of them list the same extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<CategoryDef>,
}

impl CategoryTable {
    /// Builtin categories only
    pub fn builtin() -> Self {
        let categories = BUILTIN_CATEGORIES.iter().map(CategoryDef::from).collect();
        Self { categories }
    }

    /// Empty table; every extension falls back.
    pub fn empty() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Build a table from explicit definitions, validating and normalizing each one.
    pub fn from_defs(defs: Vec<CategoryDef>) -> Result<Self> {
        let mut table = Self::empty();
        for def in defs {
            table.upsert(def)?;
        }
        Ok(table)
    }

    /// Apply config entries
    ///
    /// - an entry with an existing name replaces that category in place
    /// - an entry with a new name is appended after the existing ones
    pub fn with_config(mut self, entries: &[CategoryConfigEntry]) -> Result<Self> {
        for entry in entries {
            self.upsert(CategoryDef {
                name: entry.name.clone(),
                extensions: entry.extensions.clone(),
            })?;
        }
        Ok(self)
    }

    fn upsert(&mut self, def: CategoryDef) -> Result<()> {
        let def = normalize_def(def)?;
        match self.categories.iter_mut().find(|c| c.name == def.name) {
            Some(existing) => *existing = def,
            None => self.categories.push(def),
        }
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&CategoryDef> {
        self.categories.iter().find(|c| c.name == name)
    }

    /// All categories in lookup order
    pub fn all(&self) -> &[CategoryDef] {
        &self.categories
    }

    pub fn names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Extensions listed by more than one category.
    ///
    /// Returns `(extension, winning category, shadowed category)` triples in table order.
    pub fn shadowed_extensions(&self) -> Vec<(String, String, String)> {
        let mut owner: HashMap<&str, &str> = HashMap::new();
        let mut shadowed = Vec::new();

        for cat in &self.categories {
            for ext in &cat.extensions {
                match owner.get(ext.as_str()) {
                    Some(winner) if *winner != cat.name => {
                        shadowed.push((ext.clone(), winner.to_string(), cat.name.clone()));
                    }
                    Some(_) => {}
                    None => {
                        owner.insert(ext, &cat.name);
                    }
                }
            }
        }

        shadowed
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

/// `[[categories]]` entry of the config file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryConfigEntry {
    pub name: String,
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// Lowercase an extension and make sure it carries its leading dot.
///
/// `"JPG"`, `".JPG"` and `" .jpg "` all become `".jpg"`. The empty string stays empty.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.is_empty() || ext.starts_with('.') {
        ext
    } else {
        format!(".{}", ext)
    }
}

fn normalize_def(def: CategoryDef) -> Result<CategoryDef> {
    validate_category_name(&def.name)?;

    let mut extensions: Vec<String> = Vec::with_capacity(def.extensions.len());
    for raw in &def.extensions {
        let ext = normalize_extension(raw);
        if ext.len() < 2 || ext[1..].contains('.') || ext.contains(['/', '\\']) {
            return Err(SortdirError::InvalidExtension {
                category: def.name.clone(),
                extension: raw.clone(),
            });
        }
        if !extensions.contains(&ext) {
            extensions.push(ext);
        }
    }

    Ok(CategoryDef {
        name: def.name,
        extensions,
    })
}

/// Category names become folder names, so they must be a single path component.
pub fn validate_category_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed != name
        || name == "."
        || name == ".."
        || name.contains(['/', '\\', '\0'])
    {
        return Err(SortdirError::InvalidCategoryName {
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, exts: &[&str]) -> CategoryConfigEntry {
        CategoryConfigEntry {
            name: name.to_string(),
            extensions: exts.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_table_builtin() {
        let table = CategoryTable::builtin();
        assert!(table.get("Images").is_some());
        assert!(table.get("Code").is_some());
        assert!(table.get("nonexistent").is_none());
        assert_eq!(table.names()[0], "Images");
    }

    #[test]
    fn test_override_keeps_position() {
        let table = CategoryTable::builtin()
            .with_config(&[entry("Documents", &[".txt"])])
            .unwrap();

        assert_eq!(table.names()[1], "Documents");
        assert_eq!(table.get("Documents").unwrap().extensions, vec![".txt"]);
        assert_eq!(table.len(), BUILTIN_CATEGORIES.len());
    }

    #[test]
    fn test_new_category_is_appended() {
        let table = CategoryTable::builtin()
            .with_config(&[entry("Ebooks", &["EPUB", ".mobi"])])
            .unwrap();

        assert_eq!(table.names().last(), Some(&"Ebooks"));
        assert_eq!(
            table.get("Ebooks").unwrap().extensions,
            vec![".epub", ".mobi"]
        );
    }

    #[test]
    fn test_invalid_category_name() {
        for bad in ["", " ", "..", ".", "a/b", "a\\b", " Images"] {
            let err = CategoryTable::empty()
                .with_config(&[entry(bad, &[".x"])])
                .unwrap_err();
            assert!(
                matches!(err, SortdirError::InvalidCategoryName { .. }),
                "expected rejection of {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_invalid_extension() {
        for bad in ["", ".", "tar.gz", "a/b"] {
            let err = CategoryTable::empty()
                .with_config(&[entry("X", &[bad])])
                .unwrap_err();
            assert!(
                matches!(err, SortdirError::InvalidExtension { .. }),
                "expected rejection of {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_duplicate_extensions_collapse_within_category() {
        let table = CategoryTable::from_defs(vec![CategoryDef {
            name: "Images".to_string(),
            extensions: vec![".JPG".to_string(), "jpg".to_string()],
        }])
        .unwrap();
        assert_eq!(table.get("Images").unwrap().extensions, vec![".jpg"]);
    }

    #[test]
    fn test_shadowed_extensions() {
        let table = CategoryTable::builtin()
            .with_config(&[entry("Web", &[".html", ".wasm"])])
            .unwrap();

        let shadowed = table.shadowed_extensions();
        assert_eq!(
            shadowed,
            vec![(".html".to_string(), "Code".to_string(), "Web".to_string())]
        );
        assert!(CategoryTable::builtin().shadowed_extensions().is_empty());
    }

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension("JPG"), ".jpg");
        assert_eq!(normalize_extension(".Jpg"), ".jpg");
        assert_eq!(normalize_extension(" .md "), ".md");
        assert_eq!(normalize_extension(""), "");
    }
}
