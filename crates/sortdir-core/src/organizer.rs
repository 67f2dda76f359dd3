use std::collections::{BTreeMap, HashSet};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::category::{extension_of, CategoryClassifier};
use crate::config::Config;
use crate::error::{Result, SortdirError};
use crate::placement::place;

/// Callback type for per-entry progress reporting
pub type EntryCallback<'a> = Option<&'a dyn Fn(EntryStatus, &str)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    Moved,
    WouldMove,
    Skipped,
}

/// A file directly inside the folder being organized
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: OsString,
    /// Final extension with its leading dot, `""` when there is none
    pub extension: String,
}

impl FileEntry {
    pub fn from_path(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_os_string();
        Some(Self {
            path: path.to_path_buf(),
            name,
            extension: extension_of(path),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub category: String,
    pub destination: PathBuf,
}

impl PlannedMove {
    /// `photo.jpg -> Images/photo (1).jpg`
    pub fn describe(&self) -> String {
        let from = self
            .source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let to = self
            .destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{} -> {}/{}", from, self.category, to)
    }
}

#[derive(Debug, Default, Serialize)]
pub struct OrganizeSummary {
    pub folder: PathBuf,
    pub dry_run: bool,
    /// Entries moved (or that would be moved in a dry run)
    pub processed: usize,
    /// Entries left in place because they matched a skip pattern
    pub skipped: usize,
    /// Per-category counts, ordered by category name
    pub counts: BTreeMap<String, usize>,
    pub moves: Vec<PlannedMove>,
}

/// Sorts the files of one folder into category subfolders
pub struct Organizer {
    classifier: CategoryClassifier,
    skip: Vec<Pattern>,
}

impl Organizer {
    pub fn new(classifier: CategoryClassifier) -> Self {
        Self {
            classifier,
            skip: Vec::new(),
        }
    }

    pub fn builtin() -> Self {
        Self::new(CategoryClassifier::builtin())
    }

    /// Build from a loaded config: category table plus skip patterns.
    pub fn from_config(config: &Config) -> Result<Self> {
        let table = config.category_table()?;
        for (ext, winner, shadowed) in table.shadowed_extensions() {
            warn!(
                "extension {} is listed by both {} and {}; {} wins",
                ext, winner, shadowed, winner
            );
        }
        Ok(Self::new(CategoryClassifier::new(table)).with_skip_patterns(config.skip_patterns()?))
    }

    pub fn with_skip_patterns(mut self, skip: Vec<Pattern>) -> Self {
        self.skip = skip;
        self
    }

    pub fn classifier(&self) -> &CategoryClassifier {
        &self.classifier
    }

    /// Organize the files directly inside `folder`
    ///
    /// Subdirectories are left alone and not descended into. With `dry_run`
    /// nothing on disk changes; the returned summary lists what would happen.
    ///
    /// Every destination is planned before the first move, so a dry run
    /// reports the same moves a real run performs, and a category path
    /// occupied by a plain file fails the run before anything is touched.
    pub fn organize(
        &self,
        folder: &Path,
        dry_run: bool,
        on_entry: EntryCallback<'_>,
    ) -> Result<OrganizeSummary> {
        validate_folder(folder)?;
        info!(folder = %folder.display(), dry_run, "organizing");

        let steps = self.plan(list_files(folder)?, folder);
        check_category_folders(folder, &steps)?;

        let mut summary = OrganizeSummary {
            folder: folder.to_path_buf(),
            dry_run,
            ..OrganizeSummary::default()
        };

        for step in steps {
            let planned = match step {
                Step::Skip(name) => {
                    if let Some(f) = on_entry {
                        f(EntryStatus::Skipped, &name);
                    }
                    summary.skipped += 1;
                    continue;
                }
                Step::Move(planned) => planned,
            };

            let status = if dry_run {
                EntryStatus::WouldMove
            } else {
                fs::create_dir_all(folder.join(&planned.category))?;
                move_file(&planned.source, &planned.destination)?;
                EntryStatus::Moved
            };

            if let Some(f) = on_entry {
                f(status, &planned.describe());
            }

            *summary.counts.entry(planned.category.clone()).or_insert(0) += 1;
            summary.processed += 1;
            summary.moves.push(planned);
        }

        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            "done"
        );
        Ok(summary)
    }

    /// Decide every entry's fate without touching the disk.
    fn plan(&self, entries: Vec<FileEntry>, folder: &Path) -> Vec<Step> {
        let mut claimed: HashSet<PathBuf> = HashSet::new();
        let mut steps = Vec::with_capacity(entries.len());

        for entry in entries {
            let name = entry.name.to_string_lossy().into_owned();

            if self.is_skipped(&name) {
                debug!(file = %name, "matches a skip pattern");
                steps.push(Step::Skip(name));
                continue;
            }

            let category = self.classifier.pick_category(&entry.extension);
            let decision = place(folder, category, &entry.name, &claimed);
            debug!(
                file = %name,
                extension = %entry.extension,
                category,
                destination = %decision.destination_path.display(),
                "placement decided"
            );

            claimed.insert(decision.destination_path.clone());
            steps.push(Step::Move(PlannedMove {
                source: entry.path,
                category: decision.category,
                destination: decision.destination_path,
            }));
        }

        steps
    }

    fn is_skipped(&self, name: &str) -> bool {
        self.skip.iter().any(|p| p.matches(name))
    }
}

impl Default for Organizer {
    fn default() -> Self {
        Self::builtin()
    }
}

enum Step {
    Skip(String),
    Move(PlannedMove),
}

/// Organize `folder` with the builtin categories, reporting nothing along the way.
pub fn organize(folder: &Path, dry_run: bool) -> Result<OrganizeSummary> {
    Organizer::builtin().organize(folder, dry_run, None)
}

fn validate_folder(folder: &Path) -> Result<()> {
    if !folder.exists() {
        return Err(SortdirError::PathNotFound {
            path: folder.to_path_buf(),
        });
    }
    if !folder.is_dir() {
        return Err(SortdirError::NotADirectory {
            path: folder.to_path_buf(),
        });
    }
    Ok(())
}

/// Fail when a category this run needs is a plain file (or a link to one).
fn check_category_folders(folder: &Path, steps: &[Step]) -> Result<()> {
    let mut seen = HashSet::new();
    for step in steps {
        let Step::Move(planned) = step else {
            continue;
        };
        if !seen.insert(planned.category.as_str()) {
            continue;
        }
        let path = folder.join(&planned.category);
        if path.symlink_metadata().is_ok() && !path.is_dir() {
            return Err(SortdirError::CategoryPathBlocked { path });
        }
    }
    Ok(())
}

/// Non-directory entries directly inside `folder`, sorted by file name.
///
/// The listing is collected up front so category folders created while
/// moving never show up in it.
fn list_files(folder: &Path) -> Result<Vec<FileEntry>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(io::Error::from)?;
        // Symlinks to directories count as directories.
        if entry.file_type().is_dir() || entry.path().is_dir() {
            continue;
        }
        if let Some(file) = FileEntry::from_path(entry.path()) {
            files.push(file);
        }
    }

    Ok(files)
}

fn move_file(src: &Path, dst: &Path) -> io::Result<()> {
    match fs::rename(src, dst) {
        Ok(()) => Ok(()),
        Err(e) if is_cross_device(&e) => copy_then_remove(src, dst),
        Err(e) => Err(e),
    }
}

/// Fallback for moves across filesystems. Symlinks are recreated as links
/// pointing at the same target, not replaced by a copy of what they point to.
fn copy_then_remove(src: &Path, dst: &Path) -> io::Result<()> {
    if src.symlink_metadata()?.file_type().is_symlink() {
        let target = fs::read_link(src)?;
        create_symlink(&target, dst)?;
    } else {
        fs::copy(src, dst)?;
    }
    fs::remove_file(src)
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

#[cfg(not(any(unix, windows)))]
fn create_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are not supported on this platform",
    ))
}

#[cfg(unix)]
fn is_cross_device(e: &io::Error) -> bool {
    // EXDEV
    e.raw_os_error() == Some(18)
}

#[cfg(windows)]
fn is_cross_device(e: &io::Error) -> bool {
    // ERROR_NOT_SAME_DEVICE
    e.raw_os_error() == Some(17)
}

#[cfg(not(any(unix, windows)))]
fn is_cross_device(_e: &io::Error) -> bool {
    false
}
