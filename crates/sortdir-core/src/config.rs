use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::category::{CategoryConfigEntry, CategoryTable};
use crate::error::{Result, SortdirError};

const CONFIG_DIR: &str = "sortdir";
const CONFIG_FILE: &str = "config.toml";

/// Default config template with rich comments
const DEFAULT_CONFIG_TEMPLATE: &str = r#"# sortdir configuration file

# Drop the builtin categories (Images, Documents, Audio, Video, Archives, Code)
# and use only the [[categories]] below.
# Default: false
replace_builtin = false

# File name patterns to leave in place (glob syntax)
# Default: []
# Example: skip = [".DS_Store", "*.part", "desktop.ini"]
skip = []

# Extra categories, checked after the builtin ones.
# A category with a builtin name replaces that builtin in place.
#
# [[categories]]
# name = "Ebooks"
# extensions = [".epub", ".mobi", ".azw3"]
"#;

/// Global configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Start from an empty table instead of the builtin one
    #[serde(default)]
    pub replace_builtin: bool,

    /// Glob patterns matched against file names; matching entries are left alone
    #[serde(default)]
    pub skip: Vec<String>,

    /// Category overrides and additions, in lookup order
    #[serde(default)]
    pub categories: Vec<CategoryConfigEntry>,
}

impl Config {
    /// Load config from a file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| SortdirError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Save config to a file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml(path)?)?;
        Ok(())
    }

    /// Render as TOML
    pub fn to_toml(&self, path: &Path) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| SortdirError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Default config file location (`<config dir>/sortdir/config.toml`)
    pub fn default_path() -> Result<PathBuf> {
        let dir = dirs::config_dir().ok_or(SortdirError::ConfigDirNotFound)?;
        Ok(dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Write the commented default template unless a file already exists.
    pub fn init(path: &Path) -> Result<PathBuf> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        if !path.exists() {
            fs::write(path, DEFAULT_CONFIG_TEMPLATE)?;
        }

        Ok(path.to_path_buf())
    }

    /// Effective category table
    pub fn category_table(&self) -> Result<CategoryTable> {
        let base = if self.replace_builtin {
            CategoryTable::empty()
        } else {
            CategoryTable::builtin()
        };
        base.with_config(&self.categories)
    }

    /// Compiled skip patterns
    pub fn skip_patterns(&self) -> Result<Vec<Pattern>> {
        self.skip
            .iter()
            .map(|p| Pattern::new(p).map_err(SortdirError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_default() {
        let tmp = TempDir::new().unwrap();
        let config = Config::load(&tmp.path().join("nope.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.category_table().unwrap(), CategoryTable::builtin());
    }

    #[test]
    fn test_template_parses() {
        let config = Config::parse(DEFAULT_CONFIG_TEMPLATE, Path::new("template")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_does_not_overwrite() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sortdir/config.toml");

        Config::init(&path).unwrap();
        assert!(path.exists());

        fs::write(&path, "replace_builtin = true\n").unwrap();
        Config::init(&path).unwrap();
        assert!(Config::load(&path).unwrap().replace_builtin);
    }

    #[test]
    fn test_categories_in_file_order() {
        let content = r#"
skip = [".DS_Store"]

[[categories]]
name = "Ebooks"
extensions = ["EPUB", ".mobi"]

[[categories]]
name = "Images"
extensions = [".jpg"]
"#;
        let config = Config::parse(content, Path::new("test.toml")).unwrap();
        let table = config.category_table().unwrap();

        assert_eq!(table.names()[0], "Images");
        assert_eq!(table.get("Images").unwrap().extensions, vec![".jpg"]);
        assert_eq!(table.names().last(), Some(&"Ebooks"));
        assert_eq!(config.skip_patterns().unwrap().len(), 1);
    }

    #[test]
    fn test_replace_builtin() {
        let content = r#"
replace_builtin = true

[[categories]]
name = "Raw"
extensions = [".cr2", ".nef"]
"#;
        let config = Config::parse(content, Path::new("test.toml")).unwrap();
        let table = config.category_table().unwrap();
        assert_eq!(table.names(), vec!["Raw"]);
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = Config::parse("skip = 3", Path::new("bad.toml")).unwrap_err();
        match err {
            SortdirError::ConfigParse { path, .. } => assert_eq!(path, PathBuf::from("bad.toml")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_skip_pattern() {
        let config = Config {
            skip: vec!["[".to_string()],
            ..Config::default()
        };
        assert!(matches!(
            config.skip_patterns(),
            Err(SortdirError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/config.toml");
        let config = Config {
            replace_builtin: false,
            skip: vec!["*.part".to_string()],
            categories: vec![CategoryConfigEntry {
                name: "Fonts".to_string(),
                extensions: vec![".ttf".to_string()],
            }],
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
