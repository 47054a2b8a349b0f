//! Assembles the navigator tree from a project descriptor and the disk.

use crate::descriptor::{GroupKind, GroupRecord, ObjectRecord, ProjectDescriptor};
use crate::error::{TraversalWarning, XcnavError};
use crate::fallback::{Fallback, ProductIndex};
use crate::node::{LeafOrigin, LogicalNode};
use crate::options::NavigatorOptions;
use crate::resolve::{normalize, resolve_path};
use crate::scan::Scanner;
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A build target as listed next to the group tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetSummary {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    /// Display names of the files in the target's sources build phase.
    pub source_files: Vec<String>,
}

/// The result of [`build_navigator`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigatorTree {
    pub project: String,
    pub root: LogicalNode,
    pub targets: Vec<TargetSummary>,
    /// Everything that was skipped or degraded along the way.
    pub warnings: Vec<TraversalWarning>,
}

/// Builds the navigator tree for `descriptor`.
///
/// Problems below the main group never fail the build; they are recorded in
/// [`NavigatorTree::warnings`].
///
/// # Errors
///
/// Fails if an ignore pattern is invalid, the project root cannot be made
/// absolute, or the main group is missing or is not a group.
pub fn build_navigator(
    descriptor: &ProjectDescriptor,
    options: &NavigatorOptions,
) -> Result<NavigatorTree, XcnavError> {
    #[cfg(feature = "logging")]
    tracing::debug!(
        "Building navigator for {} with root {}",
        descriptor.name,
        options.project_root.display()
    );
    let project_root = std::path::absolute(&options.project_root)
        .map_err(|e| XcnavError::io(&options.project_root, e))?;
    let main_group = match descriptor.get(&descriptor.main_group) {
        Some(ObjectRecord::Group(group)) => group,
        Some(other) => {
            return Err(XcnavError::Descriptor(format!(
                "main group {} is a {}",
                descriptor.main_group,
                other.isa()
            )));
        }
        None => {
            return Err(XcnavError::Descriptor(format!(
                "main group {} is not defined",
                descriptor.main_group
            )));
        }
    };

    let mut assembler = Assembler {
        descriptor,
        project_root: normalize(&project_root),
        scanner: Scanner::new(&options.scan)?,
        products: ProductIndex::new(descriptor),
        visited: HashSet::new(),
        warnings: Vec::new(),
    };
    let root = assembler.root(main_group);
    let targets = assembler.targets();
    Ok(NavigatorTree {
        project: descriptor.name.clone(),
        root,
        targets,
        warnings: assembler.warnings,
    })
}

struct Assembler<'a> {
    descriptor: &'a ProjectDescriptor,
    project_root: PathBuf,
    scanner: Scanner,
    products: ProductIndex<'a>,
    visited: HashSet<&'a str>,
    warnings: Vec<TraversalWarning>,
}

impl<'a> Assembler<'a> {
    fn warn(&mut self, warning: TraversalWarning) {
        #[cfg(feature = "logging")]
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn root(&mut self, main_group: &'a GroupRecord) -> LogicalNode {
        let descriptor = self.descriptor;
        self.visited.insert(descriptor.main_group.as_str());
        let project_root = self.project_root.clone();
        let name = ObjectRecord::Group(main_group.clone())
            .display_name()
            .unwrap_or_else(|| descriptor.name.clone());
        self.group(&descriptor.main_group, name, main_group, &project_root)
    }

    fn visit(&mut self, id: &'a str, parent_path: &Path) -> Option<LogicalNode> {
        let descriptor = self.descriptor;
        let Some(record) = descriptor.get(id) else {
            self.warn(TraversalWarning::DescriptorLookup { id: id.to_string() });
            return None;
        };
        let name = record
            .display_name()
            .unwrap_or_else(|| format!("Unnamed {}", record.isa()));
        match record {
            ObjectRecord::Group(group) => {
                if !self.visited.insert(id) {
                    self.warn(TraversalWarning::Revisited { id: id.to_string() });
                    return None;
                }
                Some(self.group(id, name, group, parent_path))
            }
            ObjectRecord::File(file) => {
                let path = resolve_path(
                    file.path.as_deref(),
                    file.source_tree,
                    parent_path,
                    &self.project_root,
                );
                Some(LogicalNode::leaf(name, Some(path), LeafOrigin::Reference))
            }
            ObjectRecord::Target(_) | ObjectRecord::Other { .. } => {
                self.warn(TraversalWarning::UnrecognizedKind {
                    id: id.to_string(),
                    isa: record.isa().to_string(),
                });
                None
            }
        }
    }

    fn group(
        &mut self,
        id: &str,
        name: String,
        group: &'a GroupRecord,
        parent_path: &Path,
    ) -> LogicalNode {
        let path = resolve_path(
            group.path.as_deref(),
            group.source_tree,
            parent_path,
            &self.project_root,
        );
        match group.kind {
            GroupKind::Virtual | GroupKind::Variant => {
                let mut children = Vec::with_capacity(group.children.len());
                for child in &group.children {
                    if let Some(node) = self.visit(child, &path) {
                        children.push(node);
                    }
                }
                LogicalNode::VirtualGroup {
                    name,
                    localized: group.kind == GroupKind::Variant,
                    children,
                }
            }
            GroupKind::Synchronized => self.sync_folder(id, name, path),
        }
    }

    fn sync_folder(&mut self, id: &str, name: String, path: PathBuf) -> LogicalNode {
        let (disk_path, mut children) = if path.is_dir() {
            let children = self.scanner.scan(&path, &mut self.warnings);
            (Some(path), children)
        } else {
            self.warn(TraversalWarning::FileSystemAccess {
                message: "directory does not exist".to_string(),
                path,
            });
            (None, Vec::new())
        };
        if children.is_empty() {
            match self.products.resolve(id, &name) {
                Fallback::Product(product) => {
                    #[cfg(feature = "logging")]
                    tracing::debug!("'{}' is empty, showing product {}", name, product);
                    children.push(LogicalNode::product(product));
                }
                Fallback::Unresolved { target } => {
                    self.warn(TraversalWarning::TargetProductUnresolved {
                        group: name.clone(),
                        target,
                    });
                }
                Fallback::NoTarget => {}
            }
        }
        LogicalNode::SyncFolder {
            name,
            disk_path,
            children,
        }
    }

    fn targets(&mut self) -> Vec<TargetSummary> {
        let descriptor = self.descriptor;
        let mut out = Vec::with_capacity(descriptor.targets.len());
        for id in &descriptor.targets {
            let target = match descriptor.get(id) {
                Some(ObjectRecord::Target(target)) => target,
                Some(other) => {
                    self.warn(TraversalWarning::UnrecognizedKind {
                        id: id.clone(),
                        isa: other.isa().to_string(),
                    });
                    continue;
                }
                None => {
                    self.warn(TraversalWarning::DescriptorLookup { id: id.clone() });
                    continue;
                }
            };
            let source_files = target
                .source_files
                .iter()
                .filter_map(|file| descriptor.get(file))
                .filter_map(ObjectRecord::display_name)
                .collect();
            out.push(TargetSummary {
                name: target.name.clone(),
                product: self.products.product_name(target),
                source_files,
            });
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FileRecord, SourceTree, TargetRecord};
    use crate::options::NavigatorBuilder;

    #[test]
    fn cyclic_groups_terminate() {
        let mut d = ProjectDescriptor::new("Loop", "G0");
        d.insert(
            "G0",
            ObjectRecord::Group(GroupRecord::new(GroupKind::Virtual).children(["G1"])),
        )
        .insert(
            "G1",
            ObjectRecord::Group(GroupRecord::new(GroupKind::Virtual).name("Inner").children(["G0", "G1"])),
        );
        let tree = build_navigator(&d, &NavigatorBuilder::new("/nonexistent-root").build()).unwrap();
        assert_eq!(tree.root.name(), "Loop");
        assert_eq!(tree.root.children().len(), 1);
        assert!(tree.root.children()[0].children().is_empty());
        assert_eq!(
            tree.warnings,
            vec![
                TraversalWarning::Revisited { id: "G0".into() },
                TraversalWarning::Revisited { id: "G1".into() },
            ]
        );
    }

    #[test]
    fn variant_groups_are_localized() {
        let mut d = ProjectDescriptor::new("Demo", "G0");
        d.insert(
            "G0",
            ObjectRecord::Group(GroupRecord::new(GroupKind::Virtual).children(["V1", "G1"])),
        )
        .insert(
            "V1",
            ObjectRecord::Group(GroupRecord::new(GroupKind::Variant).name("Main.storyboard").children(["F1"])),
        )
        .insert("G1", ObjectRecord::Group(GroupRecord::new(GroupKind::Virtual).name("Views")))
        .insert("F1", ObjectRecord::File(FileRecord::new("Base", SourceTree::Group)));
        let tree = build_navigator(&d, &NavigatorBuilder::new("/nonexistent-root").build()).unwrap();
        assert!(matches!(
            tree.root.find("Main.storyboard"),
            Some(LogicalNode::VirtualGroup { localized: true, children, .. }) if children.len() == 1
        ));
        assert!(matches!(
            tree.root.find("Views"),
            Some(LogicalNode::VirtualGroup { localized: false, .. })
        ));
        let json = serde_json::to_value(&tree.root).unwrap();
        assert_eq!(json["children"][0]["localized"], true);
        assert!(json["children"][1].get("localized").is_none());
    }

    #[test]
    fn targets_in_tree_are_skipped_but_listed() {
        let mut d = ProjectDescriptor::new("Demo", "G0");
        d.insert(
            "G0",
            ObjectRecord::Group(GroupRecord::new(GroupKind::Virtual).children(["T1", "F1"])),
        )
        .insert(
            "F1",
            ObjectRecord::File(FileRecord::new("main.swift", SourceTree::Group)),
        )
        .insert_target(
            "T1",
            TargetRecord {
                name: "App".into(),
                source_files: vec!["F1".into(), "gone".into()],
                ..Default::default()
            },
        );
        let tree = build_navigator(&d, &NavigatorBuilder::new("/nonexistent-root").build()).unwrap();
        assert_eq!(tree.root.children().len(), 1);
        assert_eq!(tree.root.children()[0].name(), "main.swift");
        assert_eq!(tree.targets.len(), 1);
        assert_eq!(tree.targets[0].source_files, vec!["main.swift"]);
        assert_eq!(tree.targets[0].product, None);
        assert!(matches!(
            tree.warnings.as_slice(),
            [TraversalWarning::UnrecognizedKind { id, .. }] if id == "T1"
        ));
    }

    #[test]
    fn main_group_must_be_a_group() {
        let mut d = ProjectDescriptor::new("Demo", "F1");
        d.insert(
            "F1",
            ObjectRecord::File(FileRecord::new("main.swift", SourceTree::Group)),
        );
        let err = build_navigator(&d, &NavigatorOptions::default()).unwrap_err();
        assert!(matches!(err, XcnavError::Descriptor(_)));
    }
}
