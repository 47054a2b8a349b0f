//! The logical navigator tree.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where a [`LogicalNode::Leaf`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafOrigin {
    /// A file reference declared in the project descriptor.
    Reference,
    /// A file found by scanning a synchronized folder.
    Disk,
    /// A target's build product standing in for an empty synchronized folder.
    Product,
}

/// One node of the navigator tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogicalNode {
    /// A group whose children are declared in the descriptor, in declaration order.
    VirtualGroup {
        name: String,
        /// Set for the per-language variants of a localized file.
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        localized: bool,
        children: Vec<LogicalNode>,
    },
    /// A folder whose children come from the file system.
    ///
    /// `disk_path` is `None` when the folder did not exist on disk.
    SyncFolder {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        disk_path: Option<PathBuf>,
        children: Vec<LogicalNode>,
    },
    Leaf {
        name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        extension_hint: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        disk_path: Option<PathBuf>,
        origin: LeafOrigin,
    },
}

impl LogicalNode {
    pub fn leaf(name: impl Into<String>, disk_path: Option<PathBuf>, origin: LeafOrigin) -> Self {
        let name = name.into();
        LogicalNode::Leaf {
            extension_hint: extension_hint(&name),
            name,
            disk_path,
            origin,
        }
    }

    pub fn product(name: impl Into<String>) -> Self {
        Self::leaf(name, None, LeafOrigin::Product)
    }

    pub fn name(&self) -> &str {
        match self {
            LogicalNode::VirtualGroup { name, .. }
            | LogicalNode::SyncFolder { name, .. }
            | LogicalNode::Leaf { name, .. } => name,
        }
    }

    pub fn children(&self) -> &[LogicalNode] {
        match self {
            LogicalNode::VirtualGroup { children, .. }
            | LogicalNode::SyncFolder { children, .. } => children,
            LogicalNode::Leaf { .. } => &[],
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, LogicalNode::Leaf { .. })
    }

    pub fn disk_path(&self) -> Option<&Path> {
        match self {
            LogicalNode::VirtualGroup { .. } => None,
            LogicalNode::SyncFolder { disk_path, .. } | LogicalNode::Leaf { disk_path, .. } => {
                disk_path.as_deref()
            }
        }
    }

    /// Finds the first node named `name` in pre-order.
    pub fn find(&self, name: &str) -> Option<&LogicalNode> {
        if self.name() == name {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find(name))
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(LogicalNode::node_count).sum::<usize>()
    }

    /// Flattens the subtree into the regular files it refers to, in tree order.
    ///
    /// Leaves without a disk path (products) and paths that are not regular
    /// files at call time are left out; a file reachable twice is listed once.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let mut out = Vec::new();
        self.collect_files(&mut out);
        out
    }

    fn collect_files(&self, out: &mut Vec<PathBuf>) {
        match self {
            LogicalNode::Leaf {
                disk_path: Some(path),
                ..
            } => {
                if path.is_file() && !out.contains(path) {
                    out.push(path.clone());
                } else if path.is_dir() {
                    collect_dir_files(path, out);
                }
            }
            LogicalNode::Leaf { .. } => {}
            LogicalNode::VirtualGroup { children, .. }
            | LogicalNode::SyncFolder { children, .. } => {
                for child in children {
                    child.collect_files(out);
                }
            }
        }
    }
}

/// Bundle leaves (asset catalogs, playgrounds) contribute the files inside them.
fn collect_dir_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let walk = ignore::WalkBuilder::new(dir)
        .standard_filters(false)
        .sort_by_file_name(|a, b| a.cmp(b))
        .build();
    for entry in walk.flatten() {
        let path = entry.path();
        if entry.file_type().is_some_and(|t| t.is_file()) && !out.iter().any(|p| p == path) {
            out.push(path.to_path_buf());
        }
    }
}

/// Lower-cased extension of a file name, without the dot.
pub fn extension_hint(name: &str) -> Option<String> {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
}
