//! Target product lookup for synchronized folders that scan empty.

use crate::descriptor::{ObjectRecord, ProjectDescriptor, TargetRecord};
use std::collections::HashMap;

/// What an empty synchronized folder should show instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Fallback {
    Product(String),
    /// A target owns the folder but its product reference does not resolve.
    Unresolved { target: String },
    NoTarget,
}

pub(crate) struct ProductIndex<'a> {
    descriptor: &'a ProjectDescriptor,
    by_root: HashMap<&'a str, &'a TargetRecord>,
    by_name: HashMap<&'a str, &'a TargetRecord>,
}

impl<'a> ProductIndex<'a> {
    pub(crate) fn new(descriptor: &'a ProjectDescriptor) -> Self {
        let mut by_root = HashMap::new();
        let mut by_name = HashMap::new();
        let targets = descriptor.targets.iter().filter_map(|id| match descriptor.get(id) {
            Some(ObjectRecord::Target(target)) => Some(target),
            _ => None,
        });
        for target in targets {
            by_name.entry(target.name.as_str()).or_insert(target);
            for group in &target.synchronized_groups {
                by_root.entry(group.as_str()).or_insert(target);
            }
        }
        Self {
            descriptor,
            by_root,
            by_name,
        }
    }

    /// The target a synchronized folder belongs to.
    ///
    /// Ownership through `fileSystemSynchronizedGroups` wins, then a target
    /// with the folder's name, then `<name>Extension` (widgets and app
    /// extensions are usually laid out that way).
    pub(crate) fn target_for(&self, group_id: &str, display_name: &str) -> Option<&'a TargetRecord> {
        self.by_root
            .get(group_id)
            .or_else(|| self.by_name.get(display_name))
            .or_else(|| self.by_name.get(format!("{}Extension", display_name).as_str()))
            .copied()
    }

    pub(crate) fn product_name(&self, target: &TargetRecord) -> Option<String> {
        let id = target.product_reference.as_deref()?;
        self.descriptor.get(id)?.display_name()
    }

    pub(crate) fn resolve(&self, group_id: &str, display_name: &str) -> Fallback {
        let Some(target) = self.target_for(group_id, display_name) else {
            return Fallback::NoTarget;
        };
        match self.product_name(target) {
            Some(product) => Fallback::Product(product),
            None => Fallback::Unresolved {
                target: target.name.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{FileRecord, SourceTree};

    fn descriptor() -> ProjectDescriptor {
        let mut d = ProjectDescriptor::new("Demo", "G0");
        d.insert(
            "F1",
            ObjectRecord::File(FileRecord::new("Core.framework", SourceTree::None)),
        )
        .insert(
            "F2",
            ObjectRecord::File(FileRecord::new("WidgetsExtension.appex", SourceTree::None)),
        )
        .insert_target(
            "T1",
            TargetRecord {
                name: "Core".into(),
                product_reference: Some("F1".into()),
                synchronized_groups: vec!["S9".into()],
                ..Default::default()
            },
        )
        .insert_target(
            "T2",
            TargetRecord {
                name: "WidgetsExtension".into(),
                product_reference: Some("F2".into()),
                ..Default::default()
            },
        )
        .insert_target(
            "T3",
            TargetRecord {
                name: "Broken".into(),
                product_reference: Some("missing".into()),
                ..Default::default()
            },
        );
        d
    }

    #[test]
    fn owning_target_wins_over_name() {
        let d = descriptor();
        let index = ProductIndex::new(&d);
        assert_eq!(
            index.resolve("S9", "Anything"),
            Fallback::Product("Core.framework".into())
        );
        assert_eq!(index.resolve("S1", "Core"), Fallback::Product("Core.framework".into()));
    }

    #[test]
    fn extension_suffix_matches_widget_targets() {
        let d = descriptor();
        let index = ProductIndex::new(&d);
        assert_eq!(
            index.resolve("S2", "Widgets"),
            Fallback::Product("WidgetsExtension.appex".into())
        );
    }

    #[test]
    fn dangling_product_is_unresolved() {
        let d = descriptor();
        let index = ProductIndex::new(&d);
        assert_eq!(
            index.resolve("S3", "Broken"),
            Fallback::Unresolved {
                target: "Broken".into()
            }
        );
        assert_eq!(index.resolve("S4", "Nobody"), Fallback::NoTarget);
    }
}
