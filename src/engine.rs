use crate::error::XcnavError;
use crate::node::LogicalNode;
use crate::options::{ContentOptions, ReportOptions, char_limit};
use crate::output::language_hint;
use crate::sanitize::{expand_tabs, sanitize};
use crate::scan::scan_tree;
use crate::types::{ContentStatus, FileClass, Report, ReportEntry, ReportSummary};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

const SNIFF_LEN: u64 = 4096;
const NON_TEXT_PLACEHOLDER: &str = "[Non-text file; content not displayed]";

/// Decides [`FileClass`] from configured extensions and bare file names.
///
/// Every configured entry matches both as an extension (case-insensitive,
/// leading dot optional) and as an exact file name, so `Podfile` and `.swift`
/// can share one list.
pub(crate) struct Classifier {
    code: Vec<(String, String)>,
    data: Vec<(String, String)>,
}

impl Classifier {
    pub(crate) fn new(options: &ContentOptions) -> Self {
        fn normalize(entries: &[String]) -> Vec<(String, String)> {
            entries
                .iter()
                .map(|e| e.trim())
                .filter(|e| !e.is_empty())
                .map(|e| {
                    let bare = e.trim_start_matches('.');
                    (format!(".{}", bare.to_ascii_lowercase()), bare.to_string())
                })
                .collect()
        }
        Self {
            code: normalize(&options.code_extensions),
            data: normalize(&options.data_extensions),
        }
    }

    pub(crate) fn classify(&self, path: &Path) -> FileClass {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let ext = path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy().to_ascii_lowercase()))
            .unwrap_or_default();
        let matches = |set: &[(String, String)]| {
            set.iter()
                .any(|(e, n)| (!ext.is_empty() && *e == ext) || *n == name)
        };
        if matches(&self.code) {
            FileClass::Code
        } else if matches(&self.data) {
            FileClass::Data
        } else {
            FileClass::Other
        }
    }
}

/// Whether a file should have its content extracted, judged by name only.
fn looks_like_text(path: &Path, class: FileClass) -> bool {
    if class != FileClass::Other {
        return true;
    }
    if path.extension().is_some_and(|ext| ext == "pbxproj") {
        return true;
    }
    mime_guess::from_path(path).first().is_some_and(|mime| {
        let essence = mime.essence_str();
        essence.starts_with("text/")
            || matches!(
                essence,
                "application/xml"
                    | "application/json"
                    | "application/javascript"
                    | "application/x-plist"
                    | "application/yaml"
                    | "application/x-yaml"
            )
    })
}

struct Extracted {
    status: ContentStatus,
    content: String,
    total_chars: Option<usize>,
    extracted_chars: Option<usize>,
}

fn read_file_content(path: &Path, limit: Option<usize>) -> Result<Extracted, XcnavError> {
    let file = File::open(path).map_err(|e| XcnavError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut bytes = Vec::with_capacity(SNIFF_LEN as usize);
    reader
        .by_ref()
        .take(SNIFF_LEN)
        .read_to_end(&mut bytes)
        .map_err(|e| XcnavError::io(path, e))?;
    if content_inspector::inspect(&bytes).is_binary() {
        #[cfg(feature = "logging")]
        tracing::debug!("Binary content in {}", path.display());
        return Ok(Extracted {
            status: ContentStatus::NonText,
            content: NON_TEXT_PLACEHOLDER.to_string(),
            total_chars: None,
            extracted_chars: None,
        });
    }
    reader
        .read_to_end(&mut bytes)
        .map_err(|e| XcnavError::io(path, e))?;
    let text = sanitize(&expand_tabs(&String::from_utf8_lossy(&bytes)));
    // Sanitized text is pure ASCII, so byte offsets are character offsets.
    let total = text.len();
    match limit {
        Some(limit) if total > limit => {
            #[cfg(feature = "logging")]
            tracing::debug!("Truncating {} at {} of {} chars", path.display(), limit, total);
            let mut content = text[..limit].to_string();
            content.push_str(&format!("\n\n[Truncated at {} of {} chars]", limit, total));
            Ok(Extracted {
                status: ContentStatus::Partial,
                content,
                total_chars: Some(total),
                extracted_chars: Some(limit),
            })
        }
        _ => Ok(Extracted {
            status: ContentStatus::Full,
            content: text,
            total_chars: Some(total),
            extracted_chars: Some(total),
        }),
    }
}

fn relative_display(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");
    sanitize(&joined)
}

fn process_file(
    path: PathBuf,
    root: &Path,
    classifier: &Classifier,
    options: &ContentOptions,
    siblings: &[String],
) -> ReportEntry {
    let class = classifier.classify(&path);
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let relative_path = relative_display(&path, root);
    let limit = if name == "project.pbxproj" {
        char_limit(options.max_pbxproj_chars)
    } else {
        match class {
            FileClass::Code => char_limit(options.max_code_chars),
            FileClass::Data => char_limit(options.max_data_chars),
            FileClass::Other => None,
        }
    };
    let extracted = if looks_like_text(&path, class) {
        read_file_content(&path, limit)
    } else {
        Ok(Extracted {
            status: ContentStatus::NonText,
            content: NON_TEXT_PLACEHOLDER.to_string(),
            total_chars: None,
            extracted_chars: None,
        })
    };
    match extracted {
        Ok(extracted) => ReportEntry {
            language: if extracted.status == ContentStatus::NonText {
                "text".to_string()
            } else {
                language_hint(&name, siblings).to_string()
            },
            path,
            relative_path,
            class,
            status: extracted.status,
            content: extracted.content,
            total_chars: extracted.total_chars,
            extracted_chars: extracted.extracted_chars,
            error: None,
        },
        Err(e) => {
            #[cfg(feature = "logging")]
            tracing::warn!("Could not read {}: {}", path.display(), e);
            ReportEntry {
                content: format!("[Error reading {}: {}]", sanitize(&name), e),
                error: Some(e.to_string()),
                language: "text".to_string(),
                path,
                relative_path,
                class,
                status: ContentStatus::Error,
                total_chars: None,
                extracted_chars: None,
            }
        }
    }
}

/// Walks `options.root` and reports on every file that survives the ignore rules.
///
/// # Errors
///
/// Fails if the root is not a directory or an ignore pattern is invalid.
/// Individual unreadable files are reported with [`ContentStatus::Error`].
pub fn report(options: &ReportOptions) -> Result<Report, XcnavError> {
    #[cfg(feature = "logging")]
    tracing::debug!("Starting report for root: {}", options.root.display());
    let (tree, _warnings) = scan_tree(&options.root, &options.scan)?;
    let root = tree
        .disk_path()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| options.root.clone());
    Ok(report_from_tree(root, tree, &options.content))
}

/// Reports on the files a tree refers to, in tree order.
///
/// Paths are shown relative to `root`; files outside it keep their full path.
pub fn report_from_tree(
    root: impl AsRef<Path>,
    tree: LogicalNode,
    options: &ContentOptions,
) -> Report {
    let root = root.as_ref();
    let classifier = Classifier::new(options);
    let paths = tree.file_paths();

    let mut siblings: HashMap<PathBuf, Vec<String>> = HashMap::new();
    for path in &paths {
        if let (Some(parent), Some(name)) = (path.parent(), path.file_name()) {
            siblings
                .entry(parent.to_path_buf())
                .or_default()
                .push(name.to_string_lossy().into_owned());
        }
    }

    let mut summary = ReportSummary::default();
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        let names = path
            .parent()
            .and_then(|p| siblings.get(p))
            .map(Vec::as_slice)
            .unwrap_or_default();
        let entry = process_file(path.clone(), root, &classifier, options, names);
        summary.record(entry.class, entry.status);
        files.push(entry);
    }
    #[cfg(feature = "logging")]
    tracing::debug!("Processed {} files", files.len());

    let project = root
        .file_name()
        .map(|n| sanitize(&n.to_string_lossy()))
        .unwrap_or_default();
    Report {
        project,
        root: root.to_path_buf(),
        generated_at: chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        tree,
        files,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_by_extension_and_bare_name() {
        let classifier = Classifier::new(&ContentOptions::default());
        assert_eq!(classifier.classify(Path::new("a/View.SWIFT")), FileClass::Code);
        assert_eq!(classifier.classify(Path::new("Podfile")), FileClass::Code);
        assert_eq!(classifier.classify(Path::new("Info.plist")), FileClass::Data);
        assert_eq!(classifier.classify(Path::new("script.py")), FileClass::Other);
        assert_eq!(classifier.classify(Path::new("Makefile")), FileClass::Other);
    }

    #[test]
    fn extensions_without_dot_are_accepted() {
        let options = ContentOptions {
            code_extensions: vec!["py".into()],
            data_extensions: vec![],
            ..Default::default()
        };
        let classifier = Classifier::new(&options);
        assert_eq!(classifier.classify(Path::new("tool.PY")), FileClass::Code);
        assert_eq!(classifier.classify(Path::new("View.swift")), FileClass::Other);
    }

    #[test]
    fn mime_decides_for_unclassified_files() {
        assert!(looks_like_text(Path::new("notes.csv"), FileClass::Other));
        assert!(looks_like_text(Path::new("page.html"), FileClass::Other));
        assert!(!looks_like_text(Path::new("icon.png"), FileClass::Other));
        assert!(!looks_like_text(Path::new("blob.unknownext"), FileClass::Other));
        assert!(looks_like_text(Path::new("icon.png"), FileClass::Data));
        assert!(looks_like_text(Path::new("App.xcodeproj/project.pbxproj"), FileClass::Other));
    }

    #[test]
    fn relative_paths_use_forward_slashes() {
        let root = Path::new("/work/App");
        assert_eq!(
            relative_display(Path::new("/work/App/Sources/Café.swift"), root),
            "Sources/Cafe.swift"
        );
    }
}
