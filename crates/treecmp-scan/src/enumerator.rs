//! JWalk-based parallel tree enumerator.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use jwalk::{Parallelism, WalkDir};

use treecmp_core::{CompareConfig, CompareError, EntryKind, PathEntry, ScanWarning};

use crate::listing::TreeListing;

/// Enumerates every entry beneath a root using jwalk.
#[derive(Debug, Default, Clone, Copy)]
pub struct JwalkEnumerator;

impl JwalkEnumerator {
    /// Create a new enumerator.
    pub fn new() -> Self {
        Self
    }

    /// List every entry strictly beneath `root`.
    ///
    /// Directories below the root that cannot be listed are marked unreadable
    /// and the walk continues. A root that is not a directory, a root that
    /// cannot be listed, and an invalid ignore pattern are fatal.
    pub fn enumerate(&self, root: impl AsRef<Path>, config: &CompareConfig) -> Result<TreeListing, CompareError> {
        let start = Instant::now();
        let root = root.as_ref();

        let metadata = std::fs::metadata(root).map_err(|e| CompareError::io(root, e))?;
        if !metadata.is_dir() {
            return Err(CompareError::NotADirectory {
                path: root.to_path_buf(),
            });
        }

        let matcher = config.ignore_matcher()?;
        let filter_config = config.clone();

        let walker = WalkDir::new(root)
            .parallelism(parallelism(config.threads))
            .skip_hidden(false)
            .follow_links(false)
            .process_read_dir(move |depth, _path, _state, children| {
                // The root is passed through here too, with no depth
                if depth.is_none() {
                    return;
                }
                // Pruning here also stops descent into ignored directories
                children.retain(|child| match child {
                    Ok(entry) => {
                        let name = entry.file_name();
                        !filter_config.should_skip_hidden(&name.to_string_lossy()) && !matcher.is_match(name)
                    }
                    Err(_) => true,
                });
            })
            .try_into_iter()
            .map_err(|e| walk_error(root, e))?;

        let mut listing = TreeListing::new(root);

        for entry_result in walker {
            let mut entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                    match below_root(root, &path) {
                        Some(relative) => {
                            let warning = scan_warning(&path, &err);
                            tracing::warn!(path = %path.display(), "{}", warning.message);
                            listing.mark_unreadable(relative, warning);
                        }
                        None => return Err(walk_error(root, err)),
                    }
                    continue;
                }
            };

            let read_children_error = entry.read_children_error.take();

            if entry.depth == 0 {
                if let Some(err) = read_children_error {
                    return Err(walk_error(root, err));
                }
                continue;
            }

            let path = entry.path();
            let Some(relative) = below_root(root, &path) else {
                continue;
            };
            let kind = EntryKind::from_file_type(entry.file_type());
            listing.insert(PathEntry::new(relative.clone(), kind));

            if let Some(err) = read_children_error {
                let warning = scan_warning(&path, &err);
                tracing::warn!(path = %path.display(), "{}", warning.message);
                listing.mark_unreadable(relative, warning);
            }
        }

        tracing::debug!(
            root = %root.display(),
            entries = listing.len(),
            unreadable = listing.unreadable.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "enumerated tree"
        );

        Ok(listing)
    }
}

/// Map the thread setting onto jwalk's parallelism.
///
/// Each walk gets its own pool; walks start from inside rayon jobs, where
/// the global pool may have no free worker.
fn parallelism(threads: usize) -> Parallelism {
    match threads {
        1 => Parallelism::Serial,
        // Zero lets rayon pick the thread count
        n => Parallelism::RayonNewPool(n),
    }
}

fn scan_warning(path: &Path, err: &jwalk::Error) -> ScanWarning {
    let denied = err
        .io_error()
        .is_some_and(|e| e.kind() == ErrorKind::PermissionDenied);
    if denied {
        ScanWarning::permission_denied(path)
    } else {
        ScanWarning::read_error(path, err)
    }
}

/// Convert a walk failure that leaves the whole tree unknown.
fn walk_error(root: &Path, err: jwalk::Error) -> CompareError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
    let message = err.to_string();
    match err.into_io_error() {
        Some(source) => CompareError::io(path, source),
        None => CompareError::Walk { path, message },
    }
}

/// Relative path of something strictly beneath `root`.
fn below_root(root: &Path, path: &Path) -> Option<PathBuf> {
    relative_to(root, path).filter(|relative| !relative.as_os_str().is_empty())
}

fn relative_to(root: &Path, path: &Path) -> Option<PathBuf> {
    path.strip_prefix(root).ok().map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;
    use treecmp_core::WarningKind;

    fn create_test_tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let root = temp.path();

        fs::create_dir(root.join("dir1")).unwrap();
        fs::create_dir(root.join("dir2")).unwrap();
        fs::create_dir(root.join("dir1/subdir")).unwrap();

        fs::write(root.join("file1.txt"), "hello").unwrap();
        fs::write(root.join("dir1/file2.txt"), "world world world").unwrap();
        fs::write(root.join("dir1/subdir/file3.txt"), "test").unwrap();
        fs::write(root.join("dir2/file4.log"), "another file here").unwrap();
        fs::write(root.join(".hidden"), "secret").unwrap();

        temp
    }

    #[test]
    fn test_basic_enumeration() {
        let temp = create_test_tree();
        let listing = JwalkEnumerator::new()
            .enumerate(temp.path(), &CompareConfig::new())
            .unwrap();

        assert_eq!(listing.stats.files, 5);
        assert_eq!(listing.stats.dirs, 3);
        assert!(listing.contains(Path::new("dir1/subdir/file3.txt")));
        assert!(listing.contains(Path::new(".hidden")));
        // The root itself is never listed
        assert!(!listing.contains(Path::new("")));
        assert!(listing.warnings.is_empty());
    }

    #[test]
    fn test_empty_root() {
        let temp = TempDir::new().unwrap();
        let listing = JwalkEnumerator::new()
            .enumerate(temp.path(), &CompareConfig::new())
            .unwrap();

        assert!(listing.is_empty());
    }

    #[test]
    fn test_ignore_patterns_prune_directories() {
        let temp = create_test_tree();
        let config = CompareConfig::builder()
            .ignore_patterns(vec!["dir2".to_string(), "*.txt".to_string()])
            .build()
            .unwrap();

        let listing = JwalkEnumerator::new().enumerate(temp.path(), &config).unwrap();

        assert!(!listing.contains(Path::new("dir2")));
        assert!(!listing.contains(Path::new("dir2/file4.log")));
        assert!(!listing.contains(Path::new("file1.txt")));
        assert!(listing.contains(Path::new("dir1/subdir")));
    }

    #[test]
    fn test_skip_hidden() {
        let temp = create_test_tree();
        let config = CompareConfig::builder().include_hidden(false).build().unwrap();

        let listing = JwalkEnumerator::new().enumerate(temp.path(), &config).unwrap();

        assert!(!listing.contains(Path::new(".hidden")));
        assert!(listing.contains(Path::new("file1.txt")));
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let temp = create_test_tree();
        let serial = CompareConfig::builder().threads(1usize).build().unwrap();

        let a = JwalkEnumerator::new().enumerate(temp.path(), &serial).unwrap();
        let b = JwalkEnumerator::new()
            .enumerate(temp.path(), &CompareConfig::new())
            .unwrap();

        assert_eq!(a.entries, b.entries);
    }

    #[test]
    fn test_root_must_be_directory() {
        let temp = create_test_tree();
        let result = JwalkEnumerator::new().enumerate(temp.path().join("file1.txt"), &CompareConfig::new());

        assert!(matches!(result, Err(CompareError::NotADirectory { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_is_not_followed() {
        let temp = create_test_tree();
        std::os::unix::fs::symlink(temp.path().join("dir1"), temp.path().join("link")).unwrap();

        let listing = JwalkEnumerator::new()
            .enumerate(temp.path(), &CompareConfig::new())
            .unwrap();

        assert_eq!(listing.entries.get(Path::new("link")), Some(&EntryKind::Symlink));
        assert!(!listing.contains(Path::new("link/file2.txt")));
    }

    #[test]
    fn test_hidden_root_is_walked_when_skipping_hidden() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join(".config");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("visible.txt"), "v").unwrap();
        fs::write(root.join(".secret"), "s").unwrap();
        let config = CompareConfig::builder().include_hidden(false).build().unwrap();

        let listing = JwalkEnumerator::new().enumerate(&root, &config).unwrap();

        assert!(listing.contains(Path::new("visible.txt")));
        assert!(!listing.contains(Path::new(".secret")));
    }

    #[test]
    fn test_ignore_pattern_matching_root_name_keeps_root() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("build");
        fs::create_dir_all(root.join("build")).unwrap();
        fs::write(root.join("main.rs"), "fn main() {}").unwrap();
        let config = CompareConfig::builder()
            .ignore_patterns(vec!["build".to_string()])
            .build()
            .unwrap();

        let listing = JwalkEnumerator::new().enumerate(&root, &config).unwrap();

        assert!(listing.contains(Path::new("main.rs")));
        assert!(!listing.contains(Path::new("build")));
    }

    #[test]
    fn test_default_settings_inside_single_worker_pool() {
        let temp = create_test_tree();
        let pool = rayon::ThreadPoolBuilder::new().num_threads(1).build().unwrap();

        let (first, second) = pool.install(|| {
            rayon::join(
                || JwalkEnumerator::new().enumerate(temp.path(), &CompareConfig::new()),
                || JwalkEnumerator::new().enumerate(temp.path(), &CompareConfig::new()),
            )
        });
        let first = first.unwrap();
        let second = second.unwrap();

        assert_eq!(first.stats.files, 5);
        assert_eq!(first.entries, second.entries);
        assert!(first.warnings.is_empty());
        assert!(first.unreadable.is_empty());
    }

    #[test]
    fn test_below_root() {
        let root = Path::new("/data/root");
        assert_eq!(below_root(root, Path::new("/data/root/a/b")), Some(PathBuf::from("a/b")));
        assert_eq!(below_root(root, root), None);
        assert_eq!(below_root(root, Path::new("/elsewhere")), None);
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_directory_is_marked() {
        use std::os::unix::fs::PermissionsExt;

        let temp = create_test_tree();
        let locked = temp.path().join("dir1");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        let listable = fs::read_dir(&locked).is_ok();
        let listing = JwalkEnumerator::new()
            .enumerate(temp.path(), &CompareConfig::new())
            .unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        if listable {
            eprintln!("skipped: {} is still listable for this user", locked.display());
            return;
        }
        assert!(listing.contains(Path::new("dir1")));
        assert!(listing.is_unreadable(Path::new("dir1")));
        assert!(!listing.contains(Path::new("dir1/file2.txt")));
        assert_eq!(listing.warnings.len(), 1);
        assert_eq!(listing.warnings[0].kind, WarningKind::PermissionDenied);
        assert_eq!(listing.warnings[0].path, locked);
    }

    #[cfg(unix)]
    #[test]
    fn test_unlistable_root_is_an_error() {
        use std::os::unix::fs::PermissionsExt;

        let temp = create_test_tree();
        let root = temp.path().join("dir2");
        fs::set_permissions(&root, fs::Permissions::from_mode(0o300)).unwrap();

        let listable = fs::read_dir(&root).is_ok();
        let result = JwalkEnumerator::new().enumerate(&root, &CompareConfig::new());
        fs::set_permissions(&root, fs::Permissions::from_mode(0o755)).unwrap();

        if listable {
            eprintln!("skipped: {} is still listable for this user", root.display());
            return;
        }
        assert!(matches!(result, Err(CompareError::PermissionDenied { .. })));
    }
}
