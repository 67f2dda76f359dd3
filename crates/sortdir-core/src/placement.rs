//! Collision-safe destination paths.

use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Where one entry goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementDecision {
    pub category: String,
    pub destination_path: PathBuf,
}

/// Compute `folder/category/file_name`, or the first free `stem (n).suffix`
/// alternative when that path is taken.
///
/// Only inspects the filesystem; creating the folder and moving the file is up to the caller.
pub fn resolve_destination(folder: &Path, category: &str, file_name: &OsStr) -> PathBuf {
    resolve_destination_excluding(folder, category, file_name, &HashSet::new())
}

/// Like [`resolve_destination`], but paths in `claimed` count as taken even
/// when nothing exists there yet.
pub fn resolve_destination_excluding(
    folder: &Path,
    category: &str,
    file_name: &OsStr,
    claimed: &HashSet<PathBuf>,
) -> PathBuf {
    let taken = |path: &Path| claimed.contains(path) || occupied(path);

    let dest_dir = folder.join(category);
    let candidate = dest_dir.join(file_name);
    if !taken(&candidate) {
        return candidate;
    }

    let (stem, suffix) = split_name(file_name);
    let mut n: u64 = 1;
    loop {
        let mut name = stem.clone();
        name.push(format!(" ({})", n));
        name.push(&suffix);

        let candidate = dest_dir.join(&name);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// Build a [`PlacementDecision`] for a file name already classified into `category`,
/// steering clear of destinations already `claimed` in this run.
pub fn place(
    folder: &Path,
    category: &str,
    file_name: &OsStr,
    claimed: &HashSet<PathBuf>,
) -> PlacementDecision {
    PlacementDecision {
        category: category.to_string(),
        destination_path: resolve_destination_excluding(folder, category, file_name, claimed),
    }
}

// Dangling symlinks count as taken too.
fn occupied(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Split a file name into stem and suffix (suffix keeps its dot).
///
/// `photo.jpg` → (`photo`, `.jpg`), `archive.tar.gz` → (`archive.tar`, `.gz`),
/// `.bashrc` → (`.bashrc`, ``), `notes.` → (`notes.`, ``).
pub fn split_name(file_name: &OsStr) -> (OsString, OsString) {
    let path = Path::new(file_name);
    match (path.file_stem(), path.extension()) {
        (Some(stem), Some(ext)) if !ext.is_empty() => {
            let mut suffix = OsString::from(".");
            suffix.push(ext);
            (stem.to_os_string(), suffix)
        }
        _ => (file_name.to_os_string(), OsString::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn test_free_slot_is_used_directly() {
        let tmp = TempDir::new().unwrap();
        let dest = resolve_destination(tmp.path(), "Images", OsStr::new("photo.jpg"));
        assert_eq!(dest, tmp.path().join("Images").join("photo.jpg"));
    }

    #[test]
    fn test_collision_gets_counter() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Images/photo.jpg"));

        let dest = resolve_destination(tmp.path(), "Images", OsStr::new("photo.jpg"));
        assert_eq!(dest, tmp.path().join("Images").join("photo (1).jpg"));
    }

    #[test]
    fn test_counter_skips_taken_slots() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Images/photo.jpg"));
        touch(&tmp.path().join("Images/photo (1).jpg"));
        touch(&tmp.path().join("Images/photo (2).jpg"));

        let dest = resolve_destination(tmp.path(), "Images", OsStr::new("photo.jpg"));
        assert_eq!(dest, tmp.path().join("Images").join("photo (3).jpg"));
        assert!(!dest.exists());
    }

    #[test]
    fn test_collision_without_suffix() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp.path().join("Other/Makefile"));

        let dest = resolve_destination(tmp.path(), "Other", OsStr::new("Makefile"));
        assert_eq!(dest, tmp.path().join("Other").join("Makefile (1)"));
    }

    #[test]
    fn test_collision_with_directory() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("Documents/notes.txt")).unwrap();

        let dest = resolve_destination(tmp.path(), "Documents", OsStr::new("notes.txt"));
        assert_eq!(dest, tmp.path().join("Documents").join("notes (1).txt"));
    }

    #[test]
    fn test_place_records_category() {
        let tmp = TempDir::new().unwrap();
        let decision = place(tmp.path(), "Archives", OsStr::new("a.zip"), &HashSet::new());
        assert_eq!(decision.category, "Archives");
        assert_eq!(
            decision.destination_path,
            tmp.path().join("Archives").join("a.zip")
        );
    }

    #[test]
    fn test_claimed_paths_count_as_taken() {
        let tmp = TempDir::new().unwrap();
        let images = tmp.path().join("Images");
        touch(&images.join("photo.jpg"));
        let claimed: HashSet<PathBuf> = [images.join("photo (1).jpg")].into_iter().collect();

        let dest = resolve_destination_excluding(
            tmp.path(),
            "Images",
            OsStr::new("photo.jpg"),
            &claimed,
        );
        assert_eq!(dest, images.join("photo (2).jpg"));

        let decision = place(tmp.path(), "Images", OsStr::new("photo (1).jpg"), &claimed);
        assert_eq!(decision.destination_path, images.join("photo (1) (1).jpg"));
    }

    #[test]
    fn test_split_name() {
        let split = |s: &str| {
            let (a, b) = split_name(OsStr::new(s));
            format!("{}|{}", a.to_string_lossy(), b.to_string_lossy())
        };
        assert_eq!(split("photo.jpg"), "photo|.jpg");
        assert_eq!(split("archive.tar.gz"), "archive.tar|.gz");
        assert_eq!(split(".bashrc"), ".bashrc|");
        assert_eq!(split("README"), "README|");
        assert_eq!(split("notes."), "notes.|");
    }
}
