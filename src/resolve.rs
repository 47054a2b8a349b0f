//! Disk path resolution for groups and file references.

use crate::descriptor::SourceTree;
use std::path::{Component, Path, PathBuf};

/// The anchor actually used for a record.
///
/// Parsers often leave `sourceTree` unset on top-level synchronized roots,
/// so a missing anchor is read as `SOURCE_ROOT`.
pub fn effective_source_tree(source_tree: SourceTree) -> SourceTree {
    match source_tree {
        SourceTree::None => SourceTree::SourceRoot,
        other => other,
    }
}

/// Resolves a record's `path` to an absolute, lexically normalized path.
///
/// `parent` is the resolved path of the enclosing group and `project_root`
/// the directory holding the `.xcodeproj`; both are expected to be absolute.
/// A record without a path resolves to `parent` itself.
pub fn resolve_path(
    path: Option<&str>,
    source_tree: SourceTree,
    parent: &Path,
    project_root: &Path,
) -> PathBuf {
    let Some(path) = path.filter(|p| !p.is_empty()) else {
        return parent.to_path_buf();
    };
    #[cfg(feature = "logging")]
    if source_tree == SourceTree::None {
        tracing::debug!("No usable sourceTree for '{}', resolving against project root", path);
    }
    let joined = match effective_source_tree(source_tree) {
        SourceTree::Absolute => PathBuf::from(path),
        SourceTree::Group => parent.join(path),
        SourceTree::SourceRoot | SourceTree::None => project_root.join(path),
    };
    normalize(&joined)
}

/// Removes `.` and folds `..` without touching the file system.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
