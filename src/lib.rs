//! # xcnav
//!
//! `xcnav` reconstructs the Xcode project navigator from a `project.pbxproj`
//! descriptor and the files on disk, and turns a project into a single
//! report document with every source file's content.
//!
//! The navigator mixes two kinds of folders: virtual groups, whose children
//! are listed in the descriptor, and synchronized folders, whose children are
//! whatever is in the mirrored directory. Empty synchronized folders that belong
//! to a target show the target's product instead.
//!
//! # Features
//!
//! - `logging` (default): Enables debug logging via the `tracing` crate, and
//!   the `-v` switch of the `xcnav` binary.
//!
//! # Example
//!
//! ```no_run
//! use xcnav::{NavigatorBuilder, ProjectDescriptor, RenderOptions, build_navigator, locate_project, render_tree};
//!
//! let location = locate_project("MyApp").expect("No project found");
//! let descriptor = ProjectDescriptor::load(&location.descriptor).expect("Unreadable descriptor");
//! let options = NavigatorBuilder::new(&location.root).build();
//!
//! let tree = build_navigator(&descriptor, &options).expect("Failed to build navigator");
//! println!("{}", render_tree(&tree, &RenderOptions::default()));
//! for warning in &tree.warnings {
//!     eprintln!("warning: {}", warning);
//! }
//! ```

mod descriptor;
mod engine;
mod error;
mod fallback;
mod locate;
mod navigator;
mod node;
mod options;
pub mod output;
mod resolve;
mod sanitize;
mod scan;
mod tree;
mod types;

pub use descriptor::{
    FileRecord, GroupKind, GroupRecord, ObjectId, ObjectRecord, ProjectDescriptor, SourceTree,
    TargetRecord,
};
pub use engine::{report, report_from_tree};
pub use error::{TraversalWarning, XcnavError};
pub use locate::{ProjectLocation, locate_project};
pub use navigator::{NavigatorTree, TargetSummary, build_navigator};
pub use node::{LeafOrigin, LogicalNode};
pub use options::{
    ConfigFile, ContentOptions, NavigatorBuilder, NavigatorOptions, ReportBuilder, ReportOptions,
    ReportSettings, ScanOptions,
};
pub use resolve::{effective_source_tree, resolve_path};
pub use sanitize::sanitize;
pub use scan::{ScanEntry, scan_tree};
pub use tree::{RenderOptions, file_icon, render_node, render_tree};
pub use types::{ContentStatus, FileClass, Report, ReportEntry, ReportSummary};
