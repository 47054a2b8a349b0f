use crate::node::LogicalNode;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a file is treated by the report, decided by its extension or name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileClass {
    Code,
    Data,
    Other,
}

/// How much of a file made it into the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Full,
    Partial,
    NonText,
    Error,
}

/// A single file of the report with its extracted content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportEntry {
    /// The full path to the file.
    pub path: PathBuf,
    /// Path relative to the report root, sanitized, with `/` separators.
    pub relative_path: String,
    pub class: FileClass,
    pub status: ContentStatus,
    /// The sanitized content, or a bracketed placeholder for non-text and unreadable files.
    ///
    /// Truncated content ends with a `[Truncated at N of M chars]` marker.
    pub content: String,
    /// Characters after sanitizing, for text files that could be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_chars: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_chars: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Fenced code block language hint; empty when unknown.
    pub language: String,
}

/// Per-category file counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub code: usize,
    pub data: usize,
    pub other_text: usize,
    pub non_text: usize,
    pub errors: usize,
}

impl ReportSummary {
    pub(crate) fn record(&mut self, class: FileClass, status: ContentStatus) {
        self.total += 1;
        match (status, class) {
            (ContentStatus::Error, _) => self.errors += 1,
            (ContentStatus::NonText, _) => self.non_text += 1,
            (_, FileClass::Code) => self.code += 1,
            (_, FileClass::Data) => self.data += 1,
            (_, FileClass::Other) => self.other_text += 1,
        }
    }
}

/// The complete result of a report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Sanitized name of the project (the root directory's name).
    pub project: String,
    pub root: PathBuf,
    /// Local time the report was generated, `%Y-%m-%d %H:%M:%S`.
    pub generated_at: String,
    /// The tree the files were collected from.
    pub tree: LogicalNode,
    pub files: Vec<ReportEntry>,
    pub summary: ReportSummary,
}
