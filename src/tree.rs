//! Console rendering of the navigator tree.

use crate::navigator::NavigatorTree;
use crate::node::{LeafOrigin, LogicalNode};

const RULE: &str = "----------------------------------------------------";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Prefix every node with an icon for its kind or file type.
    pub icons: bool,
    /// Append the target listing below the tree.
    pub targets: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            icons: true,
            targets: true,
        }
    }
}

/// Renders the whole navigator: a header, the tree and the target listing.
pub fn render_tree(tree: &NavigatorTree, options: &RenderOptions) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Xcode Project Structure for: {}", tree.project));
    lines.push(RULE.to_string());
    lines.push(render_node(&tree.root, options.icons));
    lines.push(RULE.to_string());
    if options.targets && !tree.targets.is_empty() {
        lines.push("Targets:".to_string());
        for target in &tree.targets {
            let icon = if options.icons { "🎯 " } else { "" };
            let mut line = format!("{}{}", icon, target.name);
            if let Some(product) = &target.product {
                line.push_str(&format!(" -> {}", product));
            }
            if !target.source_files.is_empty() {
                line.push_str(&format!(" ({} source files)", target.source_files.len()));
            }
            lines.push(line);
        }
    }
    lines.join("\n")
}

/// Renders a subtree with `├──`/`└──` connectors, one node per line.
pub fn render_node(node: &LogicalNode, icons: bool) -> String {
    let mut lines = vec![label(node, icons, false)];
    push_children(node, "", icons, matches!(node, LogicalNode::SyncFolder { .. }), &mut lines);
    lines.join("\n")
}

fn push_children(
    node: &LogicalNode,
    prefix: &str,
    icons: bool,
    in_sync_folder: bool,
    lines: &mut Vec<String>,
) {
    let children = node.children();
    for (i, child) in children.iter().enumerate() {
        let last = i + 1 == children.len();
        let connector = if last { "└── " } else { "├── " };
        lines.push(format!("{}{}{}", prefix, connector, label(child, icons, in_sync_folder)));
        let nested = format!("{}{}", prefix, if last { "    " } else { "│   " });
        let in_sync = in_sync_folder || matches!(child, LogicalNode::SyncFolder { .. });
        push_children(child, &nested, icons, in_sync, lines);
    }
}

fn label(node: &LogicalNode, icons: bool, in_sync_folder: bool) -> String {
    match node {
        LogicalNode::Leaf {
            name,
            origin: LeafOrigin::Product,
            ..
        } => {
            if icons {
                format!("➡️ Product: {}", name)
            } else {
                format!("Product: {}", name)
            }
        }
        LogicalNode::VirtualGroup {
            name,
            localized: true,
            ..
        } => {
            if icons {
                format!("🌍 {} (Localized Group)", name)
            } else {
                format!("{} (Localized Group)", name)
            }
        }
        _ if icons => format!("{} {}", icon_for(node, in_sync_folder), node.name()),
        LogicalNode::Leaf { name, .. } => name.clone(),
        LogicalNode::VirtualGroup { name, .. } | LogicalNode::SyncFolder { name, .. } => {
            format!("{}/", name)
        }
    }
}

fn icon_for(node: &LogicalNode, in_sync_folder: bool) -> &'static str {
    match node {
        LogicalNode::VirtualGroup { .. } => "🗂️",
        // A folder nested inside a synchronized root is a plain directory.
        LogicalNode::SyncFolder { .. } if in_sync_folder => "📁",
        LogicalNode::SyncFolder { .. } => "🔗",
        LogicalNode::Leaf { extension_hint, .. } => file_icon(extension_hint.as_deref()),
    }
}

/// Icon for a file by lower-cased extension.
pub fn file_icon(extension: Option<&str>) -> &'static str {
    match extension.unwrap_or("") {
        "swift" => "𝑺",
        "h" | "hpp" => "𝒉",
        "m" | "mm" | "c" | "cpp" => "𝒎",
        "json" => "｛｝",
        "plist" => "⚙️",
        "intentdefinition" => "💡",
        "strings" | "stringsdict" => "🌍",
        "entitlements" => "🔑",
        "storyboard" | "xib" => "📱",
        "png" | "jpg" | "jpeg" | "gif" | "heic" | "svg" => "🖼️",
        "pdf" => "📰",
        "xcassets" => "🎨",
        "playground" => "🎈",
        _ => "📄",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> LogicalNode {
        LogicalNode::VirtualGroup {
            name: "Demo".into(),
            localized: false,
            children: vec![
                LogicalNode::VirtualGroup {
                    name: "Views".into(),
                    localized: false,
                    children: vec![LogicalNode::leaf("A.swift", None, LeafOrigin::Reference)],
                },
                LogicalNode::SyncFolder {
                    name: "Sources".into(),
                    disk_path: None,
                    children: vec![
                        LogicalNode::SyncFolder {
                            name: "Models".into(),
                            disk_path: None,
                            children: vec![LogicalNode::leaf("User.swift", None, LeafOrigin::Disk)],
                        },
                        LogicalNode::product("Core.framework"),
                    ],
                },
            ],
        }
    }

    #[test]
    fn renders_connectors_and_icons() {
        let expected = "\
🗂️ Demo
├── 🗂️ Views
│   └── 𝑺 A.swift
└── 🔗 Sources
    ├── 📁 Models
    │   └── 𝑺 User.swift
    └── ➡️ Product: Core.framework";
        assert_eq!(render_node(&sample(), true), expected);
    }

    #[test]
    fn plain_rendering_marks_folders() {
        let rendered = render_node(&sample(), false);
        assert!(rendered.starts_with("Demo/\n├── Views/\n│   └── A.swift"));
        assert!(rendered.ends_with("    └── Product: Core.framework"));
    }

    #[test]
    fn localized_groups_are_marked() {
        let group = LogicalNode::VirtualGroup {
            name: "Localizable.strings".into(),
            localized: true,
            children: vec![
                LogicalNode::leaf("en", None, LeafOrigin::Reference),
                LogicalNode::leaf("pt-BR", None, LeafOrigin::Reference),
            ],
        };
        assert_eq!(
            render_node(&group, true),
            "🌍 Localizable.strings (Localized Group)\n├── 📄 en\n└── 📄 pt-BR"
        );
        assert!(render_node(&group, false).starts_with("Localizable.strings (Localized Group)\n"));
    }

    #[test]
    fn unknown_extensions_use_generic_icon() {
        assert_eq!(file_icon(Some("rs")), "📄");
        assert_eq!(file_icon(None), "📄");
        assert_eq!(file_icon(Some("stringsdict")), "🌍");
    }
}
