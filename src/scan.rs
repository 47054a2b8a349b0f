//! File-system listing for synchronized folders.

use crate::error::{TraversalWarning, XcnavError};
use crate::node::{LeafOrigin, LogicalNode};
use crate::options::ScanOptions;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// One immediate child of a scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, XcnavError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| XcnavError::Pattern(format!("'{}': {}", pattern, e)))?;
        builder.add(glob);
    }
    builder
        .build()
        .map_err(|e| XcnavError::Pattern(format!("failed to build glob set: {}", e)))
}

pub(crate) struct Scanner {
    ignore_dirs: GlobSet,
    ignore_files: GlobSet,
    bundle_extensions: Vec<String>,
}

impl Scanner {
    pub(crate) fn new(options: &ScanOptions) -> Result<Self, XcnavError> {
        Ok(Self {
            ignore_dirs: build_globset(&options.ignore_dirs)?,
            ignore_files: build_globset(&options.ignore_files)?,
            bundle_extensions: options
                .bundle_extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_ascii_lowercase())
                .collect(),
        })
    }

    fn is_ignored(&self, name: &str, is_dir: bool) -> bool {
        if is_dir {
            self.ignore_dirs.is_match(name)
        } else {
            self.ignore_files.is_match(name)
        }
    }

    fn is_bundle(&self, name: &str) -> bool {
        crate::node::extension_hint(name)
            .is_some_and(|ext| self.bundle_extensions.iter().any(|b| *b == ext))
    }

    /// Lists the immediate, non-ignored children of `dir` sorted by name.
    ///
    /// Symbolic links are listed as files and never followed.
    pub(crate) fn list(&self, dir: &Path) -> Result<Vec<ScanEntry>, TraversalWarning> {
        let walk = WalkBuilder::new(dir)
            .standard_filters(false)
            .follow_links(false)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();
        let mut entries = Vec::new();
        for result in walk {
            let entry = result.map_err(|e| TraversalWarning::FileSystemAccess {
                path: dir.to_path_buf(),
                message: e.to_string(),
            })?;
            if entry.depth() == 0 {
                continue;
            }
            let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.is_ignored(&name, is_dir) {
                continue;
            }
            entries.push(ScanEntry {
                name,
                path: entry.into_path(),
                is_dir,
            });
        }
        Ok(entries)
    }

    /// Builds the child nodes of `dir`, descending into subdirectories.
    ///
    /// A directory that cannot be listed contributes no children; the
    /// failure is pushed onto `warnings`.
    pub(crate) fn scan(&self, dir: &Path, warnings: &mut Vec<TraversalWarning>) -> Vec<LogicalNode> {
        let entries = match self.list(dir) {
            Ok(entries) => entries,
            Err(warning) => {
                #[cfg(feature = "logging")]
                tracing::warn!("{}", warning);
                warnings.push(warning);
                return Vec::new();
            }
        };
        entries
            .into_iter()
            .map(|entry| {
                if entry.is_dir && !self.is_bundle(&entry.name) {
                    let children = self.scan(&entry.path, warnings);
                    LogicalNode::SyncFolder {
                        name: entry.name,
                        disk_path: Some(entry.path),
                        children,
                    }
                } else {
                    LogicalNode::leaf(entry.name, Some(entry.path), LeafOrigin::Disk)
                }
            })
            .collect()
    }
}

/// Builds a disk-only tree rooted at `root` using the synchronized-folder policy.
///
/// The root becomes a [`LogicalNode::SyncFolder`] named after the directory.
///
/// # Errors
///
/// Fails if an ignore pattern is not a valid glob, or if `root` is not a directory.
pub fn scan_tree(
    root: impl AsRef<Path>,
    options: &ScanOptions,
) -> Result<(LogicalNode, Vec<TraversalWarning>), XcnavError> {
    let root = std::path::absolute(root.as_ref()).map_err(|e| XcnavError::io(root.as_ref(), e))?;
    let root = crate::resolve::normalize(&root);
    if !root.is_dir() {
        return Err(XcnavError::NotADirectory(root));
    }
    let scanner = Scanner::new(options)?;
    let mut warnings = Vec::new();
    let children = scanner.scan(&root, &mut warnings);
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());
    Ok((
        LogicalNode::SyncFolder {
            name,
            disk_path: Some(root),
            children,
        },
        warnings,
    ))
}
