//! Recursive artifact copying.

use std::path::Path;

use tracing::warn;
use walkdir::WalkDir;

/// Counters from a tree copy.
#[derive(Debug, Default, Clone, Copy)]
pub struct CopyStats {
    pub files_copied: usize,
    pub entries_skipped: usize,
}

/// Copy every file under `source` into `destination`, preserving relative
/// structure and overwriting same-named files.
///
/// Individual entry failures are logged and skipped; one bad file must not
/// abort the whole tree copy. Only a missing source or an uncreatable
/// destination fails the call. Symlinks are not followed and are skipped.
pub fn copy_tree(source: &Path, destination: &Path) -> std::io::Result<CopyStats> {
    if !source.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("source directory does not exist: {}", source.display()),
        ));
    }
    std::fs::create_dir_all(destination)?;

    let mut stats = CopyStats::default();
    for entry in WalkDir::new(source).follow_links(false).min_depth(1) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry: {err}");
                stats.entries_skipped += 1;
                continue;
            }
        };
        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = destination.join(relative);

        let file_type = entry.file_type();
        if file_type.is_symlink() {
            warn!("skipping symlink: {}", entry.path().display());
            stats.entries_skipped += 1;
        } else if file_type.is_dir() {
            if let Err(err) = std::fs::create_dir_all(&target) {
                warn!("could not create {}: {err}", target.display());
                stats.entries_skipped += 1;
            }
        } else if let Err(err) = std::fs::copy(entry.path(), &target) {
            warn!("could not copy {}: {err}", entry.path().display());
            stats.entries_skipped += 1;
        } else {
            stats.files_copied += 1;
        }
    }
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(path: &Path, contents: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_copy_preserves_structure() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write(&src.join("catalog.json"), "{}");
        write(&src.join("bundles/level1.bundle"), "data");
        write(&src.join("bundles/deep/level2.bundle"), "more");

        let stats = copy_tree(&src, &dst).unwrap();
        assert_eq!(stats.files_copied, 3);
        assert_eq!(stats.entries_skipped, 0);
        assert_eq!(fs::read_to_string(dst.join("catalog.json")).unwrap(), "{}");
        assert_eq!(
            fs::read_to_string(dst.join("bundles/deep/level2.bundle")).unwrap(),
            "more"
        );
    }

    #[test]
    fn test_copy_overwrites_existing_files() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write(&src.join("catalog.json"), "new");
        write(&dst.join("catalog.json"), "old");

        copy_tree(&src, &dst).unwrap();
        assert_eq!(fs::read_to_string(dst.join("catalog.json")).unwrap(), "new");
    }

    #[test]
    fn test_copy_merges_into_existing_destination() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write(&src.join("a.txt"), "a");
        write(&dst.join("b.txt"), "b");

        copy_tree(&src, &dst).unwrap();
        assert!(dst.join("a.txt").exists());
        assert!(dst.join("b.txt").exists());
    }

    #[test]
    fn test_missing_source_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let result = copy_tree(&tmp.path().join("nope"), &tmp.path().join("dst"));
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        write(&src.join("real.txt"), "data");
        std::os::unix::fs::symlink(src.join("real.txt"), src.join("link.txt")).unwrap();

        let stats = copy_tree(&src, &dst).unwrap();
        assert_eq!(stats.files_copied, 1);
        assert_eq!(stats.entries_skipped, 1);
        assert!(!dst.join("link.txt").exists());
    }
}
