//! Output formatting for reports.
//!
//! Provides functions to format a [`Report`] into Markdown, plain text, or JSON.
//! The plain text layout follows the printed report: tree, summary table, then
//! every file's content.

use crate::node::{LeafOrigin, LogicalNode};
use crate::sanitize::sanitize;
use crate::types::{ContentStatus, Report, ReportEntry};
use crate::XcnavError;
use std::fs;
use std::path::Path;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Markdown,
    Text,
    Json,
}

impl OutputFormat {
    /// Returns the conventional file extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Text => "txt",
            OutputFormat::Json => "json",
        }
    }
}

/// Formats the report into a string.
pub fn format_report(
    report: &Report,
    format: OutputFormat,
    pretty: bool,
) -> Result<String, XcnavError> {
    match format {
        OutputFormat::Markdown => Ok(format_markdown(report)),
        OutputFormat::Text => Ok(format_text(report)),
        OutputFormat::Json => format_json(report, pretty),
    }
}

/// Writes the formatted report to a file, creating missing parent directories.
pub fn write_report_to_file(
    report: &Report,
    format: OutputFormat,
    path: impl AsRef<Path>,
    pretty: bool,
) -> Result<(), XcnavError> {
    let path = path.as_ref();
    let content = format_report(report, format, pretty)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| XcnavError::io(parent, e))?;
    }
    fs::write(path, content).map_err(|e| XcnavError::io(path, e))?;
    Ok(())
}

// ----------------------- Internal formatting -----------------------

fn format_markdown(report: &Report) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(&format!("# Xcode Project Report: {}\n\n", report.project));
    out.push_str(&format!("*Generated: {}*\n", report.generated_at));
    out.push_str(&format!("*Source: `{}`*\n\n", report.root.display()));

    markdown_tree(&report.tree, 0, &mut out);
    out.push_str("\n---\n\n");

    out.push_str("## Extraction Summary\n\n");
    push_summary_counts(report, &mut out, "- ");
    out.push('\n');
    out.push_str("| File Path | Status | Details |\n");
    out.push_str("| :--- | :--- | :--- |\n");
    for file in sorted_by_path(&report.files) {
        out.push_str(&format!(
            "| `{}` | {} | {} |\n",
            file.relative_path.replace('|', "\\|"),
            status_label(file),
            status_details(file).replace('|', "\\|"),
        ));
    }
    out.push_str("\n---\n\n");

    out.push_str("## File Contents\n\n");
    for file in &report.files {
        out.push_str(&format!("### File: `{}`\n\n", file.relative_path));
        out.push_str(&format!("```{}\n", file.language));
        out.push_str(&file.content);
        if !file.content.ends_with('\n') {
            out.push('\n');
        }
        out.push_str("```\n\n");
    }
    out
}

fn markdown_tree(node: &LogicalNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let name = sanitize(node.name());
    match node {
        LogicalNode::Leaf {
            origin: LeafOrigin::Product,
            ..
        } => out.push_str(&format!("{}* {} (product)\n", indent, name)),
        LogicalNode::Leaf { .. } => out.push_str(&format!("{}* {}\n", indent, name)),
        LogicalNode::VirtualGroup { children, .. } | LogicalNode::SyncFolder { children, .. } => {
            out.push_str(&format!("{}* **{}/**\n", indent, name));
            for child in children {
                markdown_tree(child, depth + 1, out);
            }
        }
    }
}

fn format_text(report: &Report) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(&format!("Xcode Project Report: {}\n", report.project));
    out.push_str(&format!("Generated: {}\n", report.generated_at));
    out.push_str(&format!("Source: {}\n\n", report.root.display()));

    out.push_str("Directory Tree:\n");
    text_tree(&report.tree, 0, &mut out);

    out.push_str("\nExtraction Summary:\n");
    push_summary_counts(report, &mut out, "  ");
    out.push('\n');
    let width = report
        .files
        .iter()
        .map(|f| f.relative_path.len())
        .max()
        .unwrap_or(0)
        .max("File Path".len());
    out.push_str(&format!("{:<width$}  {:<14}  {}\n", "File Path", "Status", "Details"));
    for file in sorted_by_path(&report.files) {
        out.push_str(&format!(
            "{:<width$}  {:<14}  {}\n",
            file.relative_path,
            status_label(file),
            status_details(file),
        ));
    }

    out.push_str("\nFile Contents:\n");
    for file in &report.files {
        out.push_str(&format!("\n--- {} ---\n", file.relative_path));
        out.push_str(&file.content);
        if !file.content.ends_with('\n') {
            out.push('\n');
        }
    }
    out
}

fn text_tree(node: &LogicalNode, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let name = sanitize(node.name());
    if node.is_leaf() {
        out.push_str(&format!("{}{}\n", indent, name));
        return;
    }
    out.push_str(&format!("{}{}/\n", indent, name));
    for child in node.children() {
        text_tree(child, depth + 1, out);
    }
}

fn format_json(report: &Report, pretty: bool) -> Result<String, XcnavError> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(json)
}

fn push_summary_counts(report: &Report, out: &mut String, bullet: &str) {
    let s = &report.summary;
    for (label, count) in [
        ("Total files processed", s.total),
        ("Code files", s.code),
        ("Data files", s.data),
        ("Other text files", s.other_text),
        ("Non-text files", s.non_text),
        ("Files with errors", s.errors),
    ] {
        out.push_str(&format!("{}{}: {}\n", bullet, label, count));
    }
}

fn sorted_by_path(files: &[ReportEntry]) -> Vec<&ReportEntry> {
    let mut sorted: Vec<_> = files.iter().collect();
    sorted.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    sorted
}

fn status_label(file: &ReportEntry) -> String {
    match file.status {
        ContentStatus::Full => "Full".to_string(),
        ContentStatus::Partial => {
            let pct = match (file.extracted_chars, file.total_chars) {
                (Some(extracted), Some(total)) if total > 0 => extracted * 100 / total,
                _ => 0,
            };
            format!("Partial ({}%)", pct)
        }
        ContentStatus::NonText => "Non-Text".to_string(),
        ContentStatus::Error => "Error".to_string(),
    }
}

fn status_details(file: &ReportEntry) -> String {
    match file.status {
        ContentStatus::Full => format!("{} chars", file.total_chars.unwrap_or(0)),
        ContentStatus::Partial => format!(
            "{} / {} chars",
            file.extracted_chars.unwrap_or(0),
            file.total_chars.unwrap_or(0)
        ),
        ContentStatus::NonText => "N/A".to_string(),
        ContentStatus::Error => file
            .error
            .as_deref()
            .unwrap_or_default()
            .chars()
            .take(80)
            .collect(),
    }
}

/// Language hint for a fenced code block.
///
/// `.h` headers are attributed to Objective-C or C++ when a sibling file
/// in the same directory has a matching implementation extension.
pub(crate) fn language_hint(name: &str, siblings: &[String]) -> &'static str {
    if name == "Podfile" {
        return "ruby";
    }
    if name == "Cartfile" {
        return "yaml";
    }
    let ext = crate::node::extension_hint(name).unwrap_or_default();
    match ext.as_str() {
        "storyboard" | "xib" | "xcscheme" | "entitlements" | "plist" | "xml" => "xml",
        "h" => {
            let has = |exts: &[&str]| {
                siblings.iter().any(|s| {
                    crate::node::extension_hint(s).is_some_and(|e| exts.contains(&e.as_str()))
                })
            };
            if has(&["m", "mm"]) {
                "objective-c"
            } else if has(&["cpp", "cxx", "cc"]) {
                "cpp"
            } else {
                "c"
            }
        }
        "m" | "mm" => "objective-c",
        "cpp" | "cc" | "cxx" | "hpp" => "cpp",
        "pbxproj" => "text",
        "rs" => "rust", "toml" => "toml", "json" => "json", "md" | "markdown" => "markdown",
        "txt" => "text", "html" | "htm" => "html", "css" => "css", "scss" => "scss",
        "js" => "javascript", "ts" => "typescript", "py" => "python", "sh" | "bash" => "bash",
        "yml" | "yaml" => "yaml", "c" => "c", "go" => "go", "rb" => "ruby", "php" => "php",
        "swift" => "swift", "java" => "java", "kt" | "kts" => "kotlin", "dart" => "dart",
        _ => "",
    }
}
