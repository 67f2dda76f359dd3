//! # Category Module
//!
//! Groups files into named buckets ("Images", "Documents", ...) by extension.
//!
//! ## Module layout
//!
//! - `builtin`: builtin category definitions
//! - `table`: ordered runtime table (builtin + config)
//! - `classifier`: extension lookup
//!
//! ## Example
//!
//! ```rust
//! use sortdir_core::category::{CategoryClassifier, CategoryTable};
//!
//! let classifier = CategoryClassifier::new(CategoryTable::builtin());
//! assert_eq!(classifier.pick_category(".JPG"), "Images");
//! assert_eq!(classifier.pick_category(".xyz"), "Other");
//! ```
//!
//! When two categories list the same extension, the one earlier in the
//! table wins. Config entries that add a category are appended, so they
//! never take an extension away from a builtin one unless they replace it by name.

mod builtin;
mod classifier;
mod table;

pub use builtin::{BuiltinCategory, CategoryDef, BUILTIN_CATEGORIES, FALLBACK_CATEGORY};
pub use classifier::{extension_of, CategoryClassifier};
pub use table::{
    normalize_extension, validate_category_name, CategoryConfigEntry, CategoryTable,
};
