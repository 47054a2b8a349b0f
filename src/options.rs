use crate::error::XcnavError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// How synchronized folders (and report directories) are listed.
///
/// Ignore patterns are globs matched against an entry's file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanOptions {
    pub ignore_dirs: Vec<String>,
    pub ignore_files: Vec<String>,
    /// Directory extensions shown as a single leaf instead of being descended into.
    pub bundle_extensions: Vec<String>,
}
impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ignore_dirs: strings(&[".*", "__pycache__", "build", "DerivedData"]),
            ignore_files: strings(&[".*"]),
            bundle_extensions: strings(&["xcassets", "playground", "xcdatamodeld"]),
        }
    }
}
impl ScanOptions {
    /// Defaults for report generation: skips dependency caches and tooling folders
    /// and descends into every directory.
    pub fn report_defaults() -> Self {
        Self {
            ignore_dirs: strings(&[
                ".*",
                "Pods",
                "build",
                "DerivedData",
                "Carthage",
                "Scripts",
                "xcuserdata",
                "*.xcworkspace",
            ]),
            ignore_files: strings(&[
                ".*",
                "Podfile.lock",
                "Cartfile.resolved",
                "Package.resolved",
            ]),
            bundle_extensions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigatorOptions {
    /// Directory that `SOURCE_ROOT` paths are relative to.
    pub project_root: PathBuf,
    pub scan: ScanOptions,
}
impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            scan: ScanOptions::default(),
        }
    }
}
#[derive(Debug, Default)]
pub struct NavigatorBuilder {
    options: NavigatorOptions,
}
impl NavigatorBuilder {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            options: NavigatorOptions {
                project_root: project_root.into(),
                ..Default::default()
            },
        }
    }
    pub fn scan_options(mut self, scan: ScanOptions) -> Self {
        self.options.scan = scan;
        self
    }
    pub fn ignore_dirs(mut self, patterns: Vec<String>) -> Self {
        self.options.scan.ignore_dirs = patterns;
        self
    }
    pub fn ignore_files(mut self, patterns: Vec<String>) -> Self {
        self.options.scan.ignore_files = patterns;
        self
    }
    pub fn bundle_extensions(mut self, extensions: Vec<String>) -> Self {
        self.options.scan.bundle_extensions = extensions;
        self
    }
    pub fn build(self) -> NavigatorOptions {
        self.options
    }
}

/// File classification and content limits for reports.
///
/// Limits are character counts; a negative limit means unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentOptions {
    /// Extensions (with or without the dot) or bare file names of code files.
    pub code_extensions: Vec<String>,
    pub data_extensions: Vec<String>,
    pub max_code_chars: i64,
    pub max_data_chars: i64,
    pub max_pbxproj_chars: i64,
}
impl Default for ContentOptions {
    fn default() -> Self {
        Self {
            code_extensions: strings(&[
                ".swift", ".h", ".m", ".mm", ".c", ".cpp", ".hpp", "Podfile", "Cartfile",
            ]),
            data_extensions: strings(&[
                ".plist",
                ".json",
                ".xml",
                ".yaml",
                ".yml",
                ".storyboard",
                ".xib",
                ".entitlements",
                ".xcscheme",
                ".md",
                ".txt",
                ".rtf",
            ]),
            max_code_chars: 200_000,
            max_data_chars: 15_000,
            max_pbxproj_chars: -1,
        }
    }
}

pub(crate) fn char_limit(value: i64) -> Option<usize> {
    usize::try_from(value).ok()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportOptions {
    pub root: PathBuf,
    pub scan: ScanOptions,
    pub content: ContentOptions,
}
impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            scan: ScanOptions::report_defaults(),
            content: ContentOptions::default(),
        }
    }
}
#[derive(Debug, Default)]
pub struct ReportBuilder {
    options: ReportOptions,
}
impl ReportBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            options: ReportOptions {
                root: root.into(),
                ..Default::default()
            },
        }
    }
    pub fn scan_options(mut self, scan: ScanOptions) -> Self {
        self.options.scan = scan;
        self
    }
    pub fn content_options(mut self, content: ContentOptions) -> Self {
        self.options.content = content;
        self
    }
    pub fn ignore_dirs(mut self, patterns: Vec<String>) -> Self {
        self.options.scan.ignore_dirs = patterns;
        self
    }
    pub fn ignore_files(mut self, patterns: Vec<String>) -> Self {
        self.options.scan.ignore_files = patterns;
        self
    }
    pub fn code_extensions(mut self, extensions: Vec<String>) -> Self {
        self.options.content.code_extensions = extensions;
        self
    }
    pub fn data_extensions(mut self, extensions: Vec<String>) -> Self {
        self.options.content.data_extensions = extensions;
        self
    }
    pub fn max_code_chars(mut self, limit: i64) -> Self {
        self.options.content.max_code_chars = limit;
        self
    }
    pub fn max_data_chars(mut self, limit: i64) -> Self {
        self.options.content.max_data_chars = limit;
        self
    }
    pub fn max_pbxproj_chars(mut self, limit: i64) -> Self {
        self.options.content.max_pbxproj_chars = limit;
        self
    }
    pub fn build(self) -> ReportOptions {
        self.options
    }
}

/// Settings read from an `xcnav.toml` file.
///
/// ```toml
/// [tree]
/// ignore_dirs = [".*", "build"]
///
/// [report.scan]
/// ignore_files = [".*", "Package.resolved"]
///
/// [report.content]
/// max_data_chars = 5000
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub tree: ScanOptions,
    pub report: ReportSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSettings {
    pub scan: ScanOptions,
    pub content: ContentOptions,
}
impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            scan: ScanOptions::report_defaults(),
            content: ContentOptions::default(),
        }
    }
}

impl ConfigFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, XcnavError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| XcnavError::io(path, e))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self, XcnavError> {
        toml::from_str(text).map_err(|e| XcnavError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_limit_is_unlimited() {
        assert_eq!(char_limit(-1), None);
        assert_eq!(char_limit(0), Some(0));
        assert_eq!(char_limit(15_000), Some(15_000));
    }

    #[test]
    fn config_file_overrides_only_given_fields() {
        let config = ConfigFile::parse(
            r#"
[tree]
ignore_dirs = ["Vendor"]

[report.content]
max_data_chars = 10
"#,
        )
        .unwrap();
        assert_eq!(config.tree.ignore_dirs, vec!["Vendor"]);
        assert_eq!(config.tree.ignore_files, ScanOptions::default().ignore_files);
        assert_eq!(config.report.content.max_data_chars, 10);
        assert_eq!(config.report.content.max_code_chars, 200_000);
        assert_eq!(config.report.scan, ScanOptions::report_defaults());
    }

    #[test]
    fn config_file_rejects_unknown_sections() {
        assert!(matches!(
            ConfigFile::parse("[pdf]\nfont = \"Courier\"\n"),
            Err(XcnavError::Config(_))
        ));
    }
}
