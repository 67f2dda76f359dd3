pub mod category;
pub mod config;
pub mod error;
pub mod organizer;
pub mod placement;

pub use category::{
    extension_of, BuiltinCategory, CategoryClassifier, CategoryConfigEntry, CategoryDef,
    CategoryTable, BUILTIN_CATEGORIES, FALLBACK_CATEGORY,
};
pub use config::Config;
pub use error::{Result, SortdirError};
pub use organizer::{
    organize, EntryCallback, EntryStatus, FileEntry, OrganizeSummary, Organizer, PlannedMove,
};
pub use placement::{
    place, resolve_destination, resolve_destination_excluding, split_name, PlacementDecision,
};
